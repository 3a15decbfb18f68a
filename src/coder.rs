use crate::{
    constant::{MAGIC, Version},
    error::CodecError,
    predictor::Predictor,
};

// Coder ------------------------------------------------------------------------------------------------------------------------------ Coder

// Framed stream layout, all little endian:
// magic (4) | major (2) | minor (2) | patch (2) | level (1) | length (8) | payload
const HEADER_LEN: usize = 19;

/// Carry-less coding interval. Both ends of [lo, hi] narrow toward the
/// coded value; whenever their top bytes agree that byte is settled and
/// the interval widens by 8 bits.
struct Range {
    lo: u32,
    hi: u32,
}
impl Range {
    fn new() -> Range {
        Range {
            lo: 0,
            hi: 0xFFFF_FFFF,
        }
    }

    /// Split the interval at the predictor's 12 bit probability of a 1,
    /// nudged so neither half is ever empty.
    fn split(&self, pr: i32) -> u32 {
        let p = if pr < 2048 { pr + 1 } else { pr } as u32;
        let w = self.hi - self.lo;
        self.lo + (w >> 12) * p + ((w & 0xFFF) * p >> 12)
    }

    /// Keep the half selected by the bit.
    fn narrow(&mut self, bit: i32, mid: u32) {
        if bit == 1 {
            self.hi = mid;
        }
        else {
            self.lo = mid + 1;
        }
    }

    fn settled(&self) -> bool {
        (self.lo ^ self.hi) & 0xFF00_0000 == 0
    }

    /// Retire the agreed top byte and widen.
    fn shift(&mut self) -> u8 {
        let byte = (self.hi >> 24) as u8;
        self.hi = (self.hi << 8) | 255;
        self.lo <<= 8;
        byte
    }
}

/// Compresses a byte stream against a fresh Predictor sized by the
/// memory level. The output frames itself (magic, version, level,
/// original length), so extraction needs nothing but the stream.
pub struct Encoder {
    range:      Range,
    predictor:  Predictor,
    level:      u32,
    out:        Vec<u8>,
}
impl Encoder {
    pub fn new(level: u32) -> Encoder {
        Encoder {
            range:      Range::new(),
            predictor:  Predictor::new(level),
            level,
            out:        Vec::new(),
        }
    }

    fn code_bit(&mut self, bit: i32) {
        let mid = self.range.split(self.predictor.p());
        self.range.narrow(bit, mid);
        self.predictor.update(bit);
        while self.range.settled() {
            let byte = self.range.shift();
            self.out.push(byte);
        }
    }

    /// Compress data into a framed stream, most significant bit of each
    /// byte first. The bit fed to the predictor is always the bit just
    /// priced by it.
    pub fn encode(mut self, data: &[u8]) -> Vec<u8> {
        self.out = Vec::with_capacity(HEADER_LEN + data.len() / 2);
        let version = Version::current();
        self.out.extend_from_slice(&MAGIC.to_le_bytes());
        self.out.extend_from_slice(&version.major.to_le_bytes());
        self.out.extend_from_slice(&version.minor.to_le_bytes());
        self.out.extend_from_slice(&version.patch.to_le_bytes());
        self.out.push(self.level as u8);
        self.out.extend_from_slice(&(data.len() as u64).to_le_bytes());

        for &byte in data.iter() {
            for i in (0..8).rev() {
                self.code_bit(((byte >> i) & 1) as i32);
            }
        }
        // One more byte pins the interval for the decoder.
        self.out.push((self.range.hi >> 24) as u8);
        self.out
    }
}

/// Counterpart of Encoder: validates the frame, rebuilds a Predictor at
/// the recorded level, and recovers each bit by comparing a 4-byte
/// window of the payload against the same interval splits.
pub struct Decoder {
    range:      Range,
    predictor:  Predictor,
    window:     u32,
    stream:     Vec<u8>,
    cursor:     usize,
    len:        usize, // original byte length from the frame
}
impl Decoder {
    /// Parse and validate the frame, then prime the coding window.
    pub fn new(stream: Vec<u8>) -> Result<Decoder, CodecError> {
        if stream.len() < HEADER_LEN {
            return Err(CodecError::TruncatedStream);
        }
        let magic = u32::from_le_bytes(stream[0..4].try_into().unwrap());
        if magic != MAGIC {
            return Err(CodecError::InvalidMagicNumber(magic));
        }
        let version = Version {
            major: u16::from_le_bytes(stream[4..6].try_into().unwrap()),
            minor: u16::from_le_bytes(stream[6..8].try_into().unwrap()),
            patch: u16::from_le_bytes(stream[8..10].try_into().unwrap()),
        };
        if version != Version::current() {
            return Err(CodecError::InvalidVersion(version));
        }
        let level = stream[10];
        if level > 9 {
            return Err(CodecError::InvalidLevel(level));
        }
        let len = u64::from_le_bytes(stream[11..19].try_into().unwrap()) as usize;

        let mut d = Decoder {
            range:      Range::new(),
            predictor:  Predictor::new(level as u32),
            window:     0,
            stream,
            cursor:     HEADER_LEN,
            len,
        };
        for _ in 0..4 {
            d.window = (d.window << 8) | d.fetch() as u32;
        }
        Ok(d)
    }

    /// Original (uncompressed) length recorded in the frame.
    pub fn len(&self) -> usize {
        self.len
    }

    fn fetch(&mut self) -> u8 {
        let byte = self.stream.get(self.cursor).copied().unwrap_or(0);
        self.cursor += 1;
        byte
    }

    fn next_bit(&mut self) -> i32 {
        let mid = self.range.split(self.predictor.p());
        let bit = (self.window <= mid) as i32;
        self.range.narrow(bit, mid);
        self.predictor.update(bit);
        while self.range.settled() {
            self.range.shift();
            self.window = (self.window << 8) | self.fetch() as u32;
        }
        bit
    }

    /// Recover the original bytes.
    pub fn decode(mut self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len);
        for _ in 0..self.len {
            let mut byte = 1i32; // leading-1 accumulator, like c0
            while byte < 256 {
                byte = byte * 2 + self.next_bit();
            }
            out.push((byte - 256) as u8);
        }
        out
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rejects_garbage() {
        assert!(matches!(Decoder::new(vec![0; 4]), Err(CodecError::TruncatedStream)));
        assert!(matches!(
            Decoder::new(vec![0xAA; HEADER_LEN + 4]),
            Err(CodecError::InvalidMagicNumber(_))
        ));
    }

    #[test]
    fn frame_rejects_bad_level() {
        let stream = Encoder::new(0).encode(b"x");
        let mut bad = stream.clone();
        bad[10] = 10;
        assert!(matches!(Decoder::new(bad), Err(CodecError::InvalidLevel(10))));
    }

    #[test]
    fn frame_carries_length_and_level() {
        let stream = Encoder::new(1).encode(b"abc");
        let dec = Decoder::new(stream).unwrap();
        assert_eq!(dec.len(), 3);
        assert_eq!(dec.decode(), b"abc");
    }
}
