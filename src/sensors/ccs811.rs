//! CCS811 gas sensor driver (I2C, `embedded-hal` 1.0).
//!
//! Covers application bootstrap (HW_ID check, APP_START), drive-mode
//! configuration, and ALG_RESULT_DATA reads. Register map per the ams
//! CCS811 datasheet. Generic over the bus so the host tests drive it with
//! a fake; blocking bounds come from the bus implementation's timeout.

use embedded_hal::i2c::I2c;

/// Slave address with the ADDR pin low.
pub const ADDR_LOW: u8 = 0x5A;
/// Slave address with the ADDR pin high (the usual breakout strapping).
pub const ADDR_HIGH: u8 = 0x5B;

const REG_STATUS: u8 = 0x00;
const REG_MEAS_MODE: u8 = 0x01;
const REG_ALG_RESULT_DATA: u8 = 0x02;
const REG_HW_ID: u8 = 0x20;
const REG_ERROR_ID: u8 = 0xE0;
const REG_APP_START: u8 = 0xF4;

const HW_ID_CCS811: u8 = 0x81;

const STATUS_ERROR: u8 = 0x01;
const STATUS_DATA_READY: u8 = 0x08;
const STATUS_APP_VALID: u8 = 0x10;
const STATUS_FW_MODE_APP: u8 = 0x80;

/// Measurement drive mode (MEAS_MODE bits 6:4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DriveMode {
    Idle = 0,
    EverySecond = 1,
    EveryTenSeconds = 2,
    EverySixtySeconds = 3,
}

/// Driver-level error, parametrised over the bus error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ccs811Error<E> {
    /// The underlying I2C transaction failed.
    Bus(E),
    /// HW_ID register returned something other than 0x81.
    WrongHardwareId(u8),
    /// STATUS reports no valid application firmware.
    AppInvalid,
    /// APP_START was issued but the sensor stayed in boot mode.
    AppStartFailed,
    /// DATA_READY is clear — no new sample since the last read.
    DataNotReady,
    /// The ERROR status bit is set (carries ERROR_ID).
    ErrorStatus(u8),
}

/// One decoded ALG_RESULT_DATA block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgResult {
    /// Equivalent CO2, ppm.
    pub eco2: u16,
    /// Total volatile organic compounds, ppb.
    pub tvoc: u16,
    /// STATUS byte echoed inside the result block.
    pub status: u8,
    /// ERROR_ID byte echoed inside the result block.
    pub error_id: u8,
    /// Raw current/voltage word (diagnostic only).
    pub raw: u16,
}

pub struct Ccs811<I2C> {
    i2c: I2C,
    addr: u8,
}

impl<I2C: I2c> Ccs811<I2C> {
    pub fn new(i2c: I2C, addr: u8) -> Self {
        Self { i2c, addr }
    }

    /// Verify the part and boot it into application mode.
    ///
    /// Must be called exactly once before [`start`](Self::start). Any
    /// failure here is unrecoverable for the device's purpose.
    pub fn begin(&mut self) -> Result<(), Ccs811Error<I2C::Error>> {
        let hw_id = self.read_reg(REG_HW_ID)?;
        if hw_id != HW_ID_CCS811 {
            return Err(Ccs811Error::WrongHardwareId(hw_id));
        }

        let status = self.read_reg(REG_STATUS)?;
        if status & STATUS_APP_VALID == 0 {
            return Err(Ccs811Error::AppInvalid);
        }

        // APP_START is a register address written with no payload.
        self.i2c
            .write(self.addr, &[REG_APP_START])
            .map_err(Ccs811Error::Bus)?;

        let status = self.read_reg(REG_STATUS)?;
        if status & STATUS_FW_MODE_APP == 0 {
            return Err(Ccs811Error::AppStartFailed);
        }
        Ok(())
    }

    /// Set the periodic measurement mode.
    pub fn start(&mut self, mode: DriveMode) -> Result<(), Ccs811Error<I2C::Error>> {
        self.i2c
            .write(self.addr, &[REG_MEAS_MODE, (mode as u8) << 4])
            .map_err(Ccs811Error::Bus)
    }

    /// Read one ALG_RESULT_DATA block.
    ///
    /// Checks STATUS first: a set ERROR flag is surfaced with its ERROR_ID
    /// (reading ERROR_ID also clears the flag on the device), and a clear
    /// DATA_READY means the previous sample would be re-delivered, so the
    /// caller gets [`Ccs811Error::DataNotReady`] instead.
    pub fn read(&mut self) -> Result<AlgResult, Ccs811Error<I2C::Error>> {
        let status = self.read_reg(REG_STATUS)?;
        if status & STATUS_ERROR != 0 {
            let error_id = self.read_reg(REG_ERROR_ID)?;
            return Err(Ccs811Error::ErrorStatus(error_id));
        }
        if status & STATUS_DATA_READY == 0 {
            return Err(Ccs811Error::DataNotReady);
        }

        let mut buf = [0u8; 8];
        self.i2c
            .write_read(self.addr, &[REG_ALG_RESULT_DATA], &mut buf)
            .map_err(Ccs811Error::Bus)?;

        Ok(AlgResult {
            eco2: u16::from_be_bytes([buf[0], buf[1]]),
            tvoc: u16::from_be_bytes([buf[2], buf[3]]),
            status: buf[4],
            error_id: buf[5],
            raw: u16::from_be_bytes([buf[6], buf[7]]),
        })
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, Ccs811Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.addr, &[reg], &mut buf)
            .map_err(Ccs811Error::Bus)?;
        Ok(buf[0])
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
