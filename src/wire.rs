//! Outbound wire encoding for the notify endpoint.
//!
//! The frame format is a contract with peer UART apps:
//! `"<eco2>,<tvoc>\n"` — two unsigned decimal integers, comma-separated,
//! newline-terminated, ASCII only, no leading zeros, no sign. Changing it
//! requires a protocol version bump coordinated with the clients.

use core::fmt::Write;

use crate::error::EncodeError;
use crate::sensors::{GasReading, ReadingStatus};

/// Frame buffer capacity. Worst case is `"65535,65535\n"` — 12 bytes.
pub const FRAME_CAP: usize = 16;

/// One encoded notify payload. Built fresh each tick, never retained.
pub type Frame = heapless::String<FRAME_CAP>;

/// Encode an OK reading into its wire frame.
///
/// Defined only for `ReadingStatus::Ok`; a fault reading is rejected with
/// [`EncodeError::FaultReading`] rather than silently encoding garbage.
/// A frame that would not fit the buffer is [`EncodeError::Overflow`],
/// never a truncated send.
pub fn encode(reading: &GasReading) -> Result<Frame, EncodeError> {
    if !matches!(reading.status, ReadingStatus::Ok) {
        return Err(EncodeError::FaultReading);
    }

    let mut frame = Frame::new();
    writeln!(frame, "{},{}", reading.eco2, reading.tvoc).map_err(|_| EncodeError::Overflow)?;
    Ok(frame)
}
