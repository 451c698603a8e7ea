//! Tools to deal with codewords and code tables.

use std::collections::BTreeMap;
use std::fmt;

use dyn_size_of::GetSize;

use crate::{HuffmanError, Result, Tree};

/// `Code` represents a binary codeword.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, Hash)]
pub struct Code {
    /// Bits of the codeword. The lowest bit contains the last bit of the codeword.
    pub content: u64,
    /// Length of the codeword in bits.
    pub len: u32,
}

impl Code {
    /// The largest number of bits that can be stored in the code.
    pub const CAPACITY: u32 = u64::BITS;

    /// Constructs the codeword that consists of the given `bits`.
    /// Returns [`HuffmanError::CodeTooLong`] if there are more than [`Self::CAPACITY`] bits.
    pub fn from_bits(bits: &[bool]) -> Result<Self> {
        if bits.len() > Self::CAPACITY as usize {
            return Err(HuffmanError::CodeTooLong { len: bits.len() as u32 });
        }
        let mut result = Self::default();
        for bit in bits { result.push(*bit); }
        Ok(result)
    }

    /// Appends `bit` to the end of `self`. The result is undefined if `self` is already full.
    #[inline] pub fn push(&mut self, bit: bool) {
        self.content = (self.content << 1) | bit as u64;
        self.len += 1;
    }

    /// Gets `bit_nr`-th bit, counting from the beginning of the codeword.
    #[inline] pub fn get(&self, bit_nr: u32) -> bool {
        (self.content >> (self.len - bit_nr - 1)) & 1 == 1
    }

    /// Returns iterator over the bits of `self`, from the first one.
    pub fn bits(self) -> impl ExactSizeIterator<Item = bool> {
        (0..self.len).map(move |i| self.get(i))
    }

    /// Returns whether `self` is a prefix of (or equal to) `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.content.checked_shr(other.len - self.len).unwrap_or(0) == self.content
    }

    /// Returns whether `self` consists of zero bits.
    #[inline] pub fn is_empty(&self) -> bool { self.len == 0 }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Map from symbols to their codewords, derived from a Huffman tree.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct CodeTable {
    codes: BTreeMap<char, Code>,
}

impl GetSize for CodeTable {
    fn size_bytes_dyn(&self) -> usize {
        self.codes.len() * (std::mem::size_of::<char>() + std::mem::size_of::<Code>())
    }
    const USES_DYN_MEM: bool = true;
}

impl CodeTable {
    /// Derives codewords of all leaves of `tree`: `0` for each descent to the left child and `1`
    /// for each descent to the right one. The only symbol of a single-leaf tree gets the code `0`.
    pub fn from_tree(tree: &Tree) -> Result<Self> {
        let mut codes = BTreeMap::new();
        let mut result = Ok(());
        tree.for_each_leaf(|symbol, _, path| {
            if result.is_err() { return; }
            let code = if path.is_empty() { Code::from_bits(&[false]) } else { Code::from_bits(path) };
            match code {
                Ok(code) => { codes.insert(symbol, code); }
                Err(e) => result = Err(e),
            }
        });
        result.map(|()| Self { codes })
    }

    /// Returns the codeword of `symbol`.
    #[inline] pub fn get(&self, symbol: char) -> Option<Code> { self.codes.get(&symbol).copied() }

    /// Returns the codeword of `symbol` or [`HuffmanError::UnknownSymbol`].
    #[inline] pub fn code(&self, symbol: char) -> Result<Code> {
        self.get(symbol).ok_or(HuffmanError::UnknownSymbol(symbol))
    }

    /// Returns the number of symbols in the table.
    #[inline] pub fn len(&self) -> usize { self.codes.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.codes.is_empty() }

    /// Returns iterator over symbol-codeword pairs, in ascending order of symbols.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (char, Code)> + '_ {
        self.codes.iter().map(|(s, c)| (*s, *c))
    }

    /// Returns the number of bits needed to encode symbols occurring with given `frequencies`,
    /// or [`HuffmanError::UnknownSymbol`] if any of them is not in the table.
    pub fn encoded_len<'f, I>(&self, frequencies: I) -> Result<u64>
        where I: IntoIterator<Item = (&'f char, &'f u32)>
    {
        frequencies.into_iter().try_fold(0u64, |acc, (symbol, count)|
            Ok(acc + self.code(*symbol)?.len as u64 * *count as u64))
    }

    /// Returns whether no codeword is a prefix of another one.
    ///
    /// Runs in *O(n log n)* time: after sorting codes by their bits (aligned to the left),
    /// a codeword can only be a prefix of its successor.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<Code> = self.codes.values().copied().collect();
        codes.sort_unstable_by_key(|c| (c.content.checked_shl(Code::CAPACITY - c.len).unwrap_or(0), c.len));
        codes.windows(2).all(|w| !w[0].is_prefix_of(&w[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreemap;

    fn table(frequencies: &BTreeMap<char, u32>) -> CodeTable {
        CodeTable::from_tree(&Tree::from_frequencies(frequencies).unwrap()).unwrap()
    }

    fn rendered(table: &CodeTable) -> BTreeMap<char, String> {
        table.iter().map(|(s, c)| (s, c.to_string())).collect()
    }

    #[test]
    fn code_bits() {
        let code = Code::from_bits(&[true, false, true, true]).unwrap();
        assert_eq!(code, Code { content: 0b1011, len: 4 });
        assert!(code.get(0));
        assert!(!code.get(1));
        assert!(code.get(3));
        assert_eq!(code.bits().collect::<Vec<_>>(), [true, false, true, true]);
        assert_eq!(code.to_string(), "1011");
        assert!(Code { content: 0b10, len: 2 }.is_prefix_of(&code));
        assert!(!Code { content: 0b11, len: 2 }.is_prefix_of(&code));
        assert!(!code.is_prefix_of(&Code { content: 0b10, len: 2 }));
        assert!(matches!(Code::from_bits(&[false; 65]), Err(HuffmanError::CodeTooLong { len: 65 })));
        assert_eq!(Code::from_bits(&[true; 64]).unwrap().to_string(), "1".repeat(64));
    }

    #[test]
    fn single_symbol() {
        let codes = table(&btreemap!('a' => 4));
        assert_eq!(rendered(&codes), btreemap!('a' => "0".to_string()));
        assert!(codes.is_prefix_free());
    }

    #[test]
    fn three_symbols() {
        let frequencies = btreemap!('a' => 4, 'b' => 3, 'c' => 2);
        let codes = table(&frequencies);
        assert_eq!(rendered(&codes), btreemap!(
            'a' => "0".to_string(),
            'b' => "11".to_string(),
            'c' => "10".to_string()
        ));
        assert_eq!(codes.encoded_len(&frequencies).unwrap(), 14);
        assert!(codes.is_prefix_free());
        assert!(matches!(codes.code('x'), Err(HuffmanError::UnknownSymbol('x'))));
    }

    #[test]
    fn six_symbols() {
        //       /    \
        //     /  \   / \
        //    / \  f  e  d
        //   a  /\
        //      cb
        let frequencies = btreemap!('d' => 12, 'e' => 11, 'f' => 10, 'a' => 3, 'b' => 2, 'c' => 1);
        let codes = table(&frequencies);
        assert_eq!(codes.len(), 6);
        assert_eq!(codes.get('a').map(|c| c.len), Some(3));
        assert_eq!(codes.get('b').map(|c| c.len), Some(4));
        assert_eq!(codes.get('c').map(|c| c.len), Some(4));
        assert_eq!(codes.get('d').map(|c| c.len), Some(2));
        assert_eq!(codes.get('e').map(|c| c.len), Some(2));
        assert_eq!(codes.get('f').map(|c| c.len), Some(2));
        assert_eq!(codes.encoded_len(&frequencies).unwrap(), 3*3 + 2*4 + 1*4 + (12+11+10)*2);
        assert!(codes.is_prefix_free());
    }

    #[test]
    fn prefix_detection() {
        let mut codes = table(&btreemap!('a' => 1, 'b' => 1));
        assert!(codes.is_prefix_free());
        codes.codes.insert('c', Code { content: 0b1, len: 1 });
        codes.codes.insert('d', Code { content: 0b10, len: 2 });
        assert!(!codes.is_prefix_free());
    }
}
