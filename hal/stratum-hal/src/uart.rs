//! UART serial link to the display controller
//!
//! The display is write-mostly: the UI pushes complete command frames and
//! never waits for an answer (the handshake reply is the one exception and
//! is parsed by the protocol crate, not here).

/// UART transmitter
///
/// Blocking trait for sending data over a UART interface.
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Adapter exposing any [`embedded_io::Write`] sink as a [`UartTx`]
///
/// Chip HALs already implement `embedded_io::Write` for their UART drivers,
/// so boards normally only need to wrap the driver.
pub struct IoUart<W> {
    inner: W,
}

impl<W> IoUart<W> {
    /// Wrap a writer
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Give the writer back
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: embedded_io::Write> UartTx for IoUart<W> {
    type Error = W::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl UartConfig {
    /// Standard DWIN panel link speed
    pub const DISPLAY: Self = Self { baudrate: 115_200 };

    /// Host serial speed selected by the "115k baud" setting
    pub const fn host(baud_115k: bool) -> Self {
        Self {
            baudrate: if baud_115k { 115_200 } else { 250_000 },
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::DISPLAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_uart_forwards_bytes() {
        let mut buf = [0u8; 8];
        {
            let mut uart = IoUart::new(&mut buf[..]);
            uart.write_blocking(&[0xAA, 0x3D]).unwrap();
            uart.flush().unwrap();
        }
        assert_eq!(&buf[..2], &[0xAA, 0x3D]);
    }

    #[test]
    fn test_host_baud_selection() {
        assert_eq!(UartConfig::host(true).baudrate, 115_200);
        assert_eq!(UartConfig::host(false).baudrate, 250_000);
        assert_eq!(UartConfig::default(), UartConfig::DISPLAY);
    }
}
