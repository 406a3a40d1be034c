//! Application service — the sample/encode/notify pipeline.
//!
//! [`AppService`] owns the per-tick orchestration and the shared
//! [`PeerLink`]. All I/O flows through port traits injected at call
//! sites, making the entire service testable with mock adapters.

use std::sync::Arc;

use log::{error, info};

use crate::link::PeerLink;
use crate::sensors::ReadingStatus;
use crate::wire;

use super::events::AppEvent;
use super::ports::{EventSink, NotifyPort, SensorPort};

/// Liveness of the service, for supervisors and tests.
///
/// `Halted` is terminal: it is reached once, at startup, when the sensor
/// cannot be brought up — a device that cannot read its sensor has no
/// purpose continuing. It is never entered mid-run; per-tick sensor
/// faults stay per-tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Running,
    Halted,
}

/// The application service orchestrates the periodic pipeline:
/// read → validate → encode → (if connected) notify.
pub struct AppService {
    link: Arc<PeerLink>,
    health: Health,
    tick_count: u64,
    frames_sent: u64,
    fault_count: u64,
}

impl AppService {
    /// Construct the service around the shared connection flag.
    pub fn new(link: Arc<PeerLink>) -> Self {
        Self {
            link,
            health: Health::Running,
            tick_count: 0,
            frames_sent: 0,
            fault_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce the armed sample loop.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!("sample loop armed");
    }

    /// Enter the terminal halted state.
    ///
    /// Called exactly once, from startup, when sensor initialisation
    /// fails. Emits a single diagnostic; every subsequent [`tick`] is a
    /// no-op, so no further sampling or radio traffic can occur.
    ///
    /// [`tick`]: AppService::tick
    pub fn mark_halted(&mut self, reason: &'static str, sink: &mut impl EventSink) {
        if self.health == Health::Halted {
            return;
        }
        self.health = Health::Halted;
        sink.emit(&AppEvent::Halted { reason });
        error!("halted: {reason} — no further sampling will occur");
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one sample tick.
    ///
    /// A fault isolates to this tick: the sample is skipped, a diagnostic
    /// is emitted, and the next tick proceeds normally. A reading that
    /// cannot be delivered (no peer) is dropped, never buffered — latest
    /// value wins.
    pub fn tick(
        &mut self,
        sensor: &mut impl SensorPort,
        radio: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) {
        if self.health == Health::Halted {
            return;
        }
        self.tick_count += 1;

        let reading = sensor.read();
        match reading.status {
            ReadingStatus::Ok => {
                sink.emit(&AppEvent::Sample {
                    eco2: reading.eco2,
                    tvoc: reading.tvoc,
                });
                match wire::encode(&reading) {
                    Ok(frame) => {
                        if self.link.is_connected() {
                            radio.notify(frame.as_bytes());
                            self.frames_sent += 1;
                        }
                    }
                    Err(e) => {
                        self.fault_count += 1;
                        sink.emit(&AppEvent::EncodeFault(e));
                    }
                }
            }
            ReadingStatus::Fault(e) => {
                self.fault_count += 1;
                sink.emit(&AppEvent::SensorFault(e));
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn health(&self) -> Health {
        self.health
    }

    /// Ticks executed since startup (halted ticks don't count).
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Frames actually handed to the radio.
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Per-tick faults observed (sensor or encode).
    pub fn fault_count(&self) -> u64 {
        self.fault_count
    }
}
