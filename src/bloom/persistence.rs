//! Plain-text bit dump: one `0` or `1` per line, in index order.
use super::BloomFilter;
use crate::error::{BloomError, BloomResult};
use bitvec::{order::Lsb0, vec::BitVec};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

impl BloomFilter {
    pub fn write_bits<W: Write>(&self, writer: W) -> BloomResult<()> {
        let mut writer = BufWriter::new(writer);
        for bit in self.bits().iter().by_vals() {
            writer.write_all(if bit { b"1\n" } else { b"0\n" })?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Replaces the bit vector with one read from `reader`.
    ///
    /// The dump is parsed into a scratch vector first; on any error the
    /// filter keeps its previous bits.
    pub fn read_bits<R: BufRead>(&mut self, reader: R) -> BloomResult<()> {
        let expected = self.bit_vector_size();
        let mut bits: BitVec<usize, Lsb0> = BitVec::with_capacity(expected);

        for (line_no, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            let bit = match line.trim_ascii() {
                b"0" => false,
                b"1" => true,
                other => {
                    let token = String::from_utf8_lossy(other);
                    warn!(line = line_no + 1, %token, "Rejected bit dump");
                    return Err(BloomError::CorruptData(format!(
                        "invalid bit token {token:?} on line {}",
                        line_no + 1
                    )));
                }
            };
            if bits.len() == expected {
                warn!(expected, "Rejected bit dump: too many bits");
                return Err(BloomError::CorruptData(format!(
                    "bit dump is longer than expected {expected} bits"
                )));
            }
            bits.push(bit);
        }

        if bits.len() != expected {
            warn!(expected, actual = bits.len(), "Rejected bit dump");
            return Err(BloomError::CorruptData(format!(
                "bit dump has {} bits, expected {expected}",
                bits.len()
            )));
        }

        self.replace_bits(bits);
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> BloomResult<()> {
        let path = path.as_ref();
        self.write_bits(File::create(path)?)?;
        debug!(
            path = %path.display(),
            m = self.bit_vector_size(),
            "Saved bit dump"
        );
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> BloomResult<()> {
        let path = path.as_ref();
        self.read_bits(BufReader::new(File::open(path)?))?;
        debug!(
            path = %path.display(),
            m = self.bit_vector_size(),
            "Loaded bit dump"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn filled_filter() -> BloomFilter {
        let mut filter = BloomFilter::new(0.1, 20).unwrap();
        filter.add(["a", "b", "c"]);
        filter
    }

    #[test]
    fn test_write_format() {
        let filter = filled_filter();
        let mut out = Vec::new();
        filter.write_bits(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), filter.bit_vector_size());
        assert!(lines.iter().all(|l| *l == "0" || *l == "1"));
        assert_eq!(
            lines.iter().filter(|l| **l == "1").count(),
            filter.count_ones()
        );
    }

    #[test]
    fn test_read_restores_bits() {
        let source = filled_filter();
        let mut out = Vec::new();
        source.write_bits(&mut out).unwrap();

        let mut target = BloomFilter::new(0.1, 20).unwrap();
        target.read_bits(Cursor::new(out)).unwrap();
        assert_eq!(target.bits(), source.bits());
    }

    #[test]
    fn test_bad_token_keeps_previous_bits() {
        let mut filter = filled_filter();
        let before = filter.bits().clone();

        let mut dump = "1\n".repeat(filter.bit_vector_size() - 1);
        dump.push_str("2\n");

        let err = filter.read_bits(Cursor::new(dump)).unwrap_err();
        assert!(matches!(err, BloomError::CorruptData(_)));
        assert_eq!(filter.bits(), &before);
    }

    #[test]
    fn test_invalid_utf8_is_corrupt() {
        let mut filter = filled_filter();
        let before = filter.bits().clone();

        let m = filter.bit_vector_size();
        let mut dump = "0\n".repeat(m - 1).into_bytes();
        dump.extend_from_slice(b"\xff\n");

        let err = filter.read_bits(Cursor::new(dump)).unwrap_err();
        assert!(matches!(err, BloomError::CorruptData(_)));
        assert_eq!(filter.bits(), &before);
    }

    #[test]
    fn test_crlf_line_endings_accepted() {
        let source = filled_filter();
        let mut out = Vec::new();
        source.write_bits(&mut out).unwrap();
        let crlf = String::from_utf8(out).unwrap().replace('\n', "\r\n");

        let mut target = BloomFilter::new(0.1, 20).unwrap();
        target.read_bits(Cursor::new(crlf)).unwrap();
        assert_eq!(target.bits(), source.bits());
    }

    #[test]
    fn test_length_mismatch() {
        let mut filter = filled_filter();
        let m = filter.bit_vector_size();

        let short = "0\n".repeat(m - 1);
        assert!(matches!(
            filter.read_bits(Cursor::new(short)),
            Err(BloomError::CorruptData(_))
        ));

        let long = "0\n".repeat(m + 1);
        assert!(matches!(
            filter.read_bits(Cursor::new(long)),
            Err(BloomError::CorruptData(_))
        ));
    }
}
