//! I2C master primitives against the pendant's register file.

use embedded_hal_async::i2c::I2c;

use pendant_protocol::{
    CountsPacket, StatusPacket, BUTTONS_MEM_OFFSET, COUNTS_LEN, COUNTS_MEM_OFFSET, STATUS_LEN,
};

use crate::error::LinkError;

/// I2C session with a memory-mapped pendant.
///
/// Every transfer leads with the 16-bit big-endian memory address the
/// pendant should position its register pointer at.
pub struct PendantLink<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> PendantLink<I2C>
where
    I2C: I2c,
{
    /// Create a new session.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `address` — 7-bit pendant address, normally
    ///   [`DEFAULT_ADDRESS`](crate::DEFAULT_ADDRESS)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Write a status packet to offset 0 of the register file.
    pub async fn write_status(
        &mut self,
        packet: &StatusPacket,
    ) -> Result<(), LinkError<I2C::Error>> {
        let mut buf = [0u8; 2 + STATUS_LEN];
        buf[0..2].copy_from_slice(&0u16.to_be_bytes());
        buf[2..].copy_from_slice(&packet.to_bytes());
        self.i2c.write(self.address, &buf).await?;
        Ok(())
    }

    /// Read the counts packet from its fixed offset.
    pub async fn read_counts(&mut self) -> Result<CountsPacket, LinkError<I2C::Error>> {
        let mem = COUNTS_MEM_OFFSET.to_be_bytes();
        let mut raw = [0u8; COUNTS_LEN];
        self.i2c.write_read(self.address, &mem, &mut raw).await?;
        Ok(CountsPacket::from_bytes(&raw))
    }

    /// Zero the buttons word so a press is only counted once.
    pub async fn clear_buttons(&mut self) -> Result<(), LinkError<I2C::Error>> {
        let mut buf = [0u8; 6];
        buf[0..2].copy_from_slice(&BUTTONS_MEM_OFFSET.to_be_bytes());
        self.i2c.write(self.address, &buf).await?;
        Ok(())
    }
}
