//! Little-endian writer helpers shared by every encoder.

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

use crate::string::BinString;

/// Container-specific write operations on top of [`WriteBytesExt`].
pub(crate) trait BinWrite: Write {
    /// Write a 32-bit element count.
    fn write_count(&mut self, count: usize) -> io::Result<()> {
        let count = u32::try_from(count).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("count {} does not fit in 32 bits", count),
            )
        })?;
        self.write_u32::<LittleEndian>(count)
    }

    fn write_string(&mut self, value: &BinString) -> io::Result<()> {
        self.write_count(value.len())?;
        self.write_all(value.as_bytes())
    }

    fn write_f32s(&mut self, values: &[f32]) -> io::Result<()> {
        for &v in values {
            self.write_f32::<LittleEndian>(v)?;
        }
        Ok(())
    }

    fn write_u32s(&mut self, values: &[u32]) -> io::Result<()> {
        for &v in values {
            self.write_u32::<LittleEndian>(v)?;
        }
        Ok(())
    }

    fn write_counted_f32s(&mut self, values: &[f32]) -> io::Result<()> {
        self.write_count(values.len())?;
        self.write_f32s(values)
    }

    fn write_counted_u32s(&mut self, values: &[u32]) -> io::Result<()> {
        self.write_count(values.len())?;
        self.write_u32s(values)
    }
}

impl<W: Write + ?Sized> BinWrite for W {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::ByteCursor;

    #[test]
    fn test_counted_arrays_read_back() {
        let mut buf = Vec::new();
        buf.write_counted_u32s(&[3, 1, 4]).unwrap();
        buf.write_counted_f32s(&[0.25]).unwrap();
        buf.write_string(&BinString::from("mat")).unwrap();

        let mut cursor = ByteCursor::new(&buf);
        assert_eq!(cursor.read_counted_u32s().unwrap(), vec![3, 1, 4]);
        assert_eq!(cursor.read_counted_f32s().unwrap(), vec![0.25]);
        assert_eq!(cursor.read_string().unwrap().as_bytes(), b"mat");
        assert!(cursor.is_empty());
    }
}
