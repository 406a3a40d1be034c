//! Outbound application events.
//!
//! [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. The adapter on the other
//! side decides what to do with them — today that is the serial log.

use crate::error::{EncodeError, SensorError};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The sample loop is armed and about to take its first tick.
    Started,

    /// Terminal startup failure. Emitted exactly once; nothing follows.
    Halted { reason: &'static str },

    /// One good sample was taken (emitted whether or not a peer is
    /// connected).
    Sample { eco2: u16, tvoc: u16 },

    /// The tick's read failed; its sample was skipped.
    SensorFault(SensorError),

    /// The tick's frame could not be encoded; nothing was sent.
    EncodeFault(EncodeError),
}
