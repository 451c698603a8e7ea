//! Self-describing container that stores the Huffman tree together with the encoded text,
//! so that the text can be decoded without the session that encoded it.
//!
//! Layout (integers are little-endian):
//! - magic bytes `HUFT`,
//! - format version (`u8`, currently 1),
//! - payload format (`u8`): 0 for textual (`'0'`/`'1'` bytes), 1 for packed (8 bits per byte),
//! - number of symbols of the original text (`u64`),
//! - number of encoded bits (`u64`),
//! - the tree, as written by [`Tree::write_shape`],
//! - the payload.

use std::io::{Read, Write};

use bit_vec::BitVec;
use log::{debug, warn};

use crate::bits::{packed_bits, BitSink};
use crate::{HuffmanError, Result, Session, Tree};

/// Magic bytes that begin each container.
pub const MAGIC: [u8; 4] = *b"HUFT";

/// Version of the container format.
pub const VERSION: u8 = 1;

/// Representation of the encoded bits in the container.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PayloadFormat {
    /// One ASCII `'0'` or `'1'` byte per bit.
    #[default]
    Text,
    /// 8 bits per byte, the first bit in the most significant bit of the first byte.
    Packed,
}

impl PayloadFormat {
    fn tag(self) -> u8 {
        match self { PayloadFormat::Text => 0, PayloadFormat::Packed => 1 }
    }

    fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(PayloadFormat::Text),
            1 => Ok(PayloadFormat::Packed),
            other => Err(HuffmanError::InvalidHeader(format!("unknown payload format {other}"))),
        }
    }

    /// Returns the number of payload bytes needed to store `bits` bits.
    pub fn payload_bytes(self, bits: u64) -> u64 {
        match self { PayloadFormat::Text => bits, PayloadFormat::Packed => bits.div_ceil(8) }
    }
}

/// Encoded text together with the tree needed to decode it.
#[derive(Clone, Debug)]
pub struct Container {
    pub format: PayloadFormat,
    /// Number of symbols of the original text.
    pub symbols: u64,
    /// Number of encoded bits.
    pub bits: u64,
    pub tree: Tree,
    pub payload: Vec<u8>,
}

fn read_u8(input: &mut dyn Read) -> std::io::Result<u8> {
    let mut buff = [0u8; 1];
    input.read_exact(&mut buff)?;
    Ok(buff[0])
}

fn read_u64(input: &mut dyn Read) -> std::io::Result<u64> {
    let mut buff = [0u8; 8];
    input.read_exact(&mut buff)?;
    Ok(u64::from_le_bytes(buff))
}

impl Container {
    /// Encodes `text` with `session` and packs the result, in given `format`, together with the tree.
    pub fn pack(session: &Session, text: &str, format: PayloadFormat) -> Result<Self> {
        let (bits, payload) = match format {
            PayloadFormat::Text => {
                let encoded = session.encode(text)?;
                (encoded.len() as u64, encoded.into_bytes())
            }
            PayloadFormat::Packed => {
                let mut encoded = BitVec::new();
                session.encode_into(text, &mut encoded)?;
                (encoded.bit_len() as u64, encoded.to_bytes())
            }
        };
        Ok(Self { format, symbols: text.chars().count() as u64, bits, tree: session.tree().clone(), payload })
    }

    /// Returns number of bytes which `write` will write.
    pub fn write_bytes(&self) -> usize {
        MAGIC.len() + 2 + 2 * std::mem::size_of::<u64>() + self.tree.write_shape_bytes() + self.payload.len()
    }

    /// Writes `self` to the given `output`.
    pub fn write(&self, output: &mut dyn Write) -> std::io::Result<()> {
        output.write_all(&MAGIC)?;
        output.write_all(&[VERSION, self.format.tag()])?;
        output.write_all(&self.symbols.to_le_bytes())?;
        output.write_all(&self.bits.to_le_bytes())?;
        self.tree.write_shape(output)?;
        output.write_all(&self.payload)
    }

    /// Reads `Container` from the given `input`.
    pub fn read(input: &mut dyn Read) -> Result<Self> {
        let mut magic = [0u8; 4];
        input.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(HuffmanError::InvalidHeader(format!("wrong magic bytes {magic:02x?}")));
        }
        let version = read_u8(input)?;
        if version != VERSION {
            return Err(HuffmanError::InvalidHeader(format!("unsupported version {version}")));
        }
        let format = PayloadFormat::from_tag(read_u8(input)?)?;
        let symbols = read_u64(input)?;
        let bits = read_u64(input)?;
        let tree = Tree::read_shape(input)?;
        let payload_len = format.payload_bytes(bits);
        let mut payload = Vec::new();
        Read::take(&mut *input, payload_len).read_to_end(&mut payload)?;
        if (payload.len() as u64) < payload_len {
            return Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof,
                format!("payload has {} bytes, while {} are expected", payload.len(), payload_len)).into());
        }
        let mut rest = [0u8];
        if input.read(&mut rest)? != 0 {
            warn!("ignoring data that follows the payload");
        }
        debug!("read container: {format:?} payload of {bits} bits, {symbols} symbols, {} tree nodes", tree.len());
        Ok(Self { format, symbols, bits, tree, payload })
    }

    /// Decodes the text stored in `self`.
    pub fn unpack(&self) -> Result<String> {
        let session = Session::from_tree(self.tree.clone())?;
        let text = match self.format {
            PayloadFormat::Text => {
                let bits = std::str::from_utf8(&self.payload).map_err(|_|
                    HuffmanError::InvalidHeader("textual payload is not valid UTF-8".into()))?;
                session.decode(bits)?
            }
            PayloadFormat::Packed => {
                if self.format.payload_bytes(self.bits) > self.payload.len() as u64 {
                    return Err(HuffmanError::InvalidHeader("payload shorter than declared".into()));
                }
                session.decode_bits(packed_bits(&self.payload, self.bits as usize))?
            }
        };
        let found = text.chars().count() as u64;
        if found != self.symbols {
            return Err(HuffmanError::LengthMismatch { expected: self.symbols, found });
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack_write_read(text: &str, format: PayloadFormat) -> Container {
        let session = Session::build(text).unwrap();
        let container = Container::pack(&session, text, format).unwrap();
        let mut buff = Vec::new();
        container.write(&mut buff).unwrap();
        assert_eq!(buff.len(), container.write_bytes());
        Container::read(&mut &buff[..]).unwrap()
    }

    #[test]
    fn text_payload() {
        let container = pack_write_read("aaaabbbcc", PayloadFormat::Text);
        assert_eq!(container.format, PayloadFormat::Text);
        assert_eq!(container.symbols, 9);
        assert_eq!(container.bits, 14);
        assert_eq!(container.payload, b"00001111111010");
        assert_eq!(container.unpack().unwrap(), "aaaabbbcc");
    }

    #[test]
    fn packed_payload() {
        let text = "Litwo! Ojczyzno moja! ty jesteś jak zdrowie.";
        let container = pack_write_read(text, PayloadFormat::Packed);
        assert_eq!(container.payload.len() as u64, container.bits.div_ceil(8));
        assert_eq!(container.unpack().unwrap(), text);
    }

    #[test]
    fn single_symbol() {
        let container = pack_write_read("aaaa", PayloadFormat::Packed);
        assert_eq!(container.bits, 4);
        assert_eq!(container.payload, [0]);
        assert_eq!(container.unpack().unwrap(), "aaaa");
    }

    #[test]
    fn malformed() {
        assert!(matches!(Container::read(&mut &b"HUFX"[..]), Err(HuffmanError::InvalidHeader(_))));
        assert!(matches!(Container::read(&mut &b"HUF"[..]), Err(HuffmanError::Io(_))));
        let mut buff = Vec::new();
        Container::pack(&Session::build("ab").unwrap(), "ab", PayloadFormat::Text).unwrap().write(&mut buff).unwrap();
        buff[4] = 9;
        assert!(matches!(Container::read(&mut &buff[..]), Err(HuffmanError::InvalidHeader(_))));
        buff[4] = VERSION;
        buff[5] = 7;
        assert!(matches!(Container::read(&mut &buff[..]), Err(HuffmanError::InvalidHeader(_))));
        buff[5] = 0;
        buff.pop();
        assert!(matches!(Container::read(&mut &buff[..]), Err(HuffmanError::Io(_))));
    }

    #[test]
    fn length_mismatch() {
        let session = Session::build("abc").unwrap();
        let mut container = Container::pack(&session, "abc", PayloadFormat::Text).unwrap();
        container.symbols = 4;
        assert!(matches!(container.unpack(), Err(HuffmanError::LengthMismatch { expected: 4, found: 3 })));
    }
}
