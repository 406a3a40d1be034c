//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production). This is the device's only
//! local diagnostic channel — nothing is ever reported back over the
//! radio link.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Sample { eco2, tvoc } => {
                info!("eco2={eco2} ppm  tvoc={tvoc} ppb");
            }
            AppEvent::SensorFault(e) => {
                warn!("SENSOR | read skipped: {e}");
            }
            AppEvent::EncodeFault(e) => {
                warn!("WIRE | frame dropped: {e}");
            }
            AppEvent::Started => {
                info!("START | sampling");
            }
            AppEvent::Halted { reason } => {
                error!("HALT | {reason}");
            }
        }
    }
}
