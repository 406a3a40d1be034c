//! Mock port implementations for integration tests.
//!
//! Records every notify call and every emitted event so tests can assert
//! on the full history without touching real I2C or a radio.

use airlink::app::events::AppEvent;
use airlink::app::ports::{EventSink, NotifyPort, SensorPort};
use airlink::error::SensorError;
use airlink::sensors::{GasReading, ReadingStatus};

// ── Scripted sensor ───────────────────────────────────────────

/// Replays a fixed sequence of readings, one per tick, and counts how
/// often it was read. Reading past the script repeats the last entry.
pub struct ScriptedSensor {
    script: Vec<GasReading>,
    pub reads: usize,
}

#[allow(dead_code)]
impl ScriptedSensor {
    pub fn new(script: Vec<GasReading>) -> Self {
        assert!(!script.is_empty(), "script must hold at least one reading");
        Self { script, reads: 0 }
    }

    pub fn ok(eco2: u16, tvoc: u16) -> GasReading {
        GasReading {
            eco2,
            tvoc,
            status: ReadingStatus::Ok,
            raw: 0,
        }
    }

    pub fn fault() -> GasReading {
        GasReading::fault(SensorError::DeviceError(0x02))
    }
}

impl SensorPort for ScriptedSensor {
    fn read(&mut self) -> GasReading {
        let idx = self.reads.min(self.script.len() - 1);
        self.reads += 1;
        self.script[idx]
    }
}

// ── Recording radio ───────────────────────────────────────────

/// Captures every frame handed to the notify primitive.
#[derive(Default)]
pub struct RecordingRadio {
    pub sent: Vec<Vec<u8>>,
}

#[allow(dead_code)]
impl RecordingRadio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotifyPort for RecordingRadio {
    fn notify(&mut self, frame: &[u8]) {
        self.sent.push(frame.to_vec());
    }
}

// ── Recording sink ────────────────────────────────────────────

/// Captures every emitted [`AppEvent`].
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sensor_faults(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::SensorFault(_)))
            .count()
    }

    pub fn samples(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Sample { .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
