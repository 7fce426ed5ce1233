//! UART-backed frame transport

use stratum_display::Transport;
use stratum_hal::uart::UartTx;

/// Sends frames over a [`UartTx`]
///
/// Write errors are logged and counted; the frame is dropped.
pub struct UartTransport<U: UartTx> {
    uart: U,
    errors: u32,
}

impl<U: UartTx> UartTransport<U> {
    pub const fn new(uart: U) -> Self {
        Self { uart, errors: 0 }
    }

    /// Number of frames that failed to send
    pub fn errors(&self) -> u32 {
        self.errors
    }

    pub fn into_inner(self) -> U {
        self.uart
    }
}

impl<U: UartTx> Transport for UartTransport<U> {
    fn send_bytes(&mut self, bytes: &[u8]) {
        if self.uart.write_blocking(bytes).is_err() {
            self.errors = self.errors.saturating_add(1);
            warn!("display uart write failed ({} bytes)", bytes.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlakyUart {
        written: std::vec::Vec<u8>,
        fail: bool,
    }

    impl UartTx for FlakyUart {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.written.extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    #[test]
    fn test_bytes_forwarded() {
        let mut transport = UartTransport::new(FlakyUart {
            written: std::vec::Vec::new(),
            fail: false,
        });
        transport.send_bytes(&[0xAA, 0x3D, 0xCC, 0x33, 0xC3, 0x3C]);
        assert_eq!(transport.errors(), 0);
        assert_eq!(transport.into_inner().written.len(), 6);
    }

    #[test]
    fn test_write_error_counted_not_raised() {
        let mut transport = UartTransport::new(FlakyUart {
            written: std::vec::Vec::new(),
            fail: true,
        });
        transport.send_bytes(&[0xAA]);
        transport.send_bytes(&[0xAA]);
        assert_eq!(transport.errors(), 2);
    }
}
