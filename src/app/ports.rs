//! Port traits — the hexagonal boundary between domain logic and the
//! outside world.
//!
//! ```text
//!   SensorPort ──▶ ┌──────────────────┐ ──▶ NotifyPort
//!                  │    AppService    │
//!                  │  (sample loop)   │ ──▶ EventSink
//!                  └──────────────────┘
//! ```
//!
//! Driven adapters (the CCS811 glue, the BLE adapter, the log sink)
//! implement these traits. [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::sensors::GasReading;

/// Read-side port: the sample loop calls this once per tick.
///
/// Implementations must be bounded — a read returns within the transport
/// timeout and surfaces failures as a fault-status reading, never by
/// blocking or panicking.
pub trait SensorPort {
    fn read(&mut self) -> GasReading;
}

/// Write-side port: push one encoded frame to the subscribed peer.
///
/// Fire-and-forget. The caller gates on connection state; if the peer
/// unsubscribed in the meantime the call has no observable effect and is
/// not an error. No acknowledgement is awaited, nothing is buffered.
pub trait NotifyPort {
    fn notify(&mut self, frame: &[u8]);
}

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log today;
/// anything else tomorrow).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
