//! LSB-first bit stream and CRC-32 for the settings record

/// Ran past the end of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Overflow;

/// Packs fields of arbitrary bit width, least significant bit first
pub struct BitWriter<'a> {
    buf: &'a mut [u8],
    bit: usize,
}

impl<'a> BitWriter<'a> {
    /// Writer over `buf`; the buffer is zeroed first
    pub fn new(buf: &'a mut [u8]) -> Self {
        buf.fill(0);
        Self { buf, bit: 0 }
    }

    /// Bits written so far
    pub fn position(&self) -> usize {
        self.bit
    }

    /// Write the low `bits` bits of `value`
    pub fn write(&mut self, value: u64, bits: u8) -> Result<(), Overflow> {
        if self.bit + bits as usize > self.buf.len() * 8 {
            return Err(Overflow);
        }
        for i in 0..bits {
            if (value >> i) & 1 != 0 {
                let at = self.bit + i as usize;
                self.buf[at / 8] |= 1 << (at % 8);
            }
        }
        self.bit += bits as usize;
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), Overflow> {
        self.write(value as u64, 1)
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), Overflow> {
        self.write(value as u64, 8)
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), Overflow> {
        self.write(value as u64, 16)
    }

    pub fn write_i16(&mut self, value: i16) -> Result<(), Overflow> {
        self.write(value as u16 as u64, 16)
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), Overflow> {
        self.write(value.to_bits() as u64, 32)
    }
}

/// Reads fields written by [`BitWriter`]
pub struct BitReader<'a> {
    buf: &'a [u8],
    bit: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, bit: 0 }
    }

    pub fn position(&self) -> usize {
        self.bit
    }

    pub fn read(&mut self, bits: u8) -> Result<u64, Overflow> {
        if self.bit + bits as usize > self.buf.len() * 8 {
            return Err(Overflow);
        }
        let mut value = 0u64;
        for i in 0..bits {
            let at = self.bit + i as usize;
            if self.buf[at / 8] & (1 << (at % 8)) != 0 {
                value |= 1 << i;
            }
        }
        self.bit += bits as usize;
        Ok(value)
    }

    pub fn read_bool(&mut self) -> Result<bool, Overflow> {
        Ok(self.read(1)? != 0)
    }

    pub fn read_u8(&mut self) -> Result<u8, Overflow> {
        Ok(self.read(8)? as u8)
    }

    pub fn read_u16(&mut self) -> Result<u16, Overflow> {
        Ok(self.read(16)? as u16)
    }

    pub fn read_i16(&mut self) -> Result<i16, Overflow> {
        Ok(self.read(16)? as u16 as i16)
    }

    pub fn read_f32(&mut self) -> Result<f32, Overflow> {
        Ok(f32::from_bits(self.read(32)? as u32))
    }
}

/// CRC-32 (IEEE, reflected) of `data`
pub fn crc32(data: &[u8]) -> u32 {
    !crc32_update(0xFFFF_FFFF, data)
}

fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB88320;
    let mut crc = crc;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lsb_first_packing() {
        let mut buf = [0u8; 2];
        let mut w = BitWriter::new(&mut buf);
        w.write_bool(true).unwrap();
        w.write(0b101, 3).unwrap();
        w.write(0x3FF, 10).unwrap();
        assert_eq!(w.position(), 14);
        // bit0 = 1, bits1..3 = 101, bits4..13 = all ones
        assert_eq!(buf, [0b1111_1011, 0b0011_1111]);
    }

    #[test]
    fn test_overflow() {
        let mut buf = [0u8; 1];
        let mut w = BitWriter::new(&mut buf);
        w.write(0, 6).unwrap();
        assert_eq!(w.write(0, 3), Err(Overflow));

        let mut r = BitReader::new(&buf);
        assert_eq!(r.read(9), Err(Overflow));
    }

    #[test]
    fn test_crc32_check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    proptest! {
        #[test]
        fn prop_fields_read_back(a in any::<u16>(), b in 0u64..8, c in any::<i16>(), flag in any::<bool>()) {
            let mut buf = [0u8; 8];
            let mut w = BitWriter::new(&mut buf);
            w.write_bool(flag).unwrap();
            w.write(b, 3).unwrap();
            w.write_u16(a).unwrap();
            w.write_i16(c).unwrap();

            let mut r = BitReader::new(&buf);
            prop_assert_eq!(r.read_bool().unwrap(), flag);
            prop_assert_eq!(r.read(3).unwrap(), b);
            prop_assert_eq!(r.read_u16().unwrap(), a);
            prop_assert_eq!(r.read_i16().unwrap(), c);
        }
    }
}
