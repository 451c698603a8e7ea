use std::collections::BTreeMap;

use dyn_size_of::GetSize;
use log::debug;

use crate::bits::{text_bits, BitSink};
use crate::frequencies::{count_symbols, Frequencies};
use crate::{CodeTable, CompressionStats, Decoder, DecodingResult, HuffmanError, Result, Tree};

/// Huffman tree together with the code table derived from it.
///
/// The bits produced by [`Session::encode`] can only be decoded by the session
/// that produced them (or by a session with the same tree).
#[derive(Clone, Debug)]
pub struct Session {
    tree: Tree,
    codes: CodeTable,
    /// Frequencies the tree has been built for; empty for sessions constructed from a tree.
    frequencies: BTreeMap<char, u32>,
}

impl GetSize for Session {
    fn size_bytes_dyn(&self) -> usize {
        self.tree.size_bytes_dyn() + self.codes.size_bytes_dyn()
            + self.frequencies.len() * (std::mem::size_of::<char>() + std::mem::size_of::<u32>())
    }
    const USES_DYN_MEM: bool = true;
}

impl Session {
    /// Counts the symbols of `text` and builds the tree and the code table for them.
    ///
    /// Returns [`HuffmanError::EmptyInput`] if `text` is empty.
    pub fn build(text: &str) -> Result<Self> {
        Self::from_frequencies(count_symbols(text))
    }

    /// Builds the tree and the code table for given `frequencies`.
    pub fn from_frequencies(frequencies: BTreeMap<char, u32>) -> Result<Self> {
        let tree = Tree::from_frequencies(&frequencies)?;
        let codes = CodeTable::from_tree(&tree)?;
        debug!("built Huffman tree of {} nodes for {} distinct symbols ({} occurrences)",
               tree.len(), codes.len(), tree.weight());
        Ok(Self { tree, codes, frequencies })
    }

    /// Constructs the session that uses given `tree` (e.g. read from a container).
    pub fn from_tree(tree: Tree) -> Result<Self> {
        let codes = CodeTable::from_tree(&tree)?;
        Ok(Self { tree, codes, frequencies: BTreeMap::new() })
    }

    /// Returns the Huffman tree.
    #[inline] pub fn tree(&self) -> &Tree { &self.tree }

    /// Returns the code table.
    #[inline] pub fn codes(&self) -> &CodeTable { &self.codes }

    /// Returns the frequencies of symbols the session has been built for.
    #[inline] pub fn frequencies(&self) -> &BTreeMap<char, u32> { &self.frequencies }

    /// Returns the number of bits of the encoded text the session has been built for.
    pub fn encoded_len(&self) -> u64 {
        self.tree.weighted_path_length()
    }

    /// Returns statistics of compressing the text the session has been built for.
    pub fn stats(&self) -> CompressionStats {
        CompressionStats {
            symbols: self.frequencies.total(),
            distinct_symbols: self.frequencies.len(),
            encoded_bits: if self.frequencies.is_empty() { 0 } else { self.encoded_len() },
            entropy: self.frequencies.entropy(),
        }
    }

    /// Appends codewords of all symbols of `text` to `sink`.
    ///
    /// Returns [`HuffmanError::UnknownSymbol`] if `text` contains a symbol absent in the code table;
    /// in such a case, `sink` can contain codewords of symbols preceding the unknown one.
    pub fn encode_into<S: BitSink + ?Sized>(&self, text: &str, sink: &mut S) -> Result<()> {
        for symbol in text.chars() {
            sink.push_code(self.codes.code(symbol)?);
        }
        Ok(())
    }

    /// Encodes `text` as the textual stream of `'0'` and `'1'` characters.
    pub fn encode(&self, text: &str) -> Result<String> {
        let mut result = String::new();
        self.encode_into(text, &mut result)?;
        Ok(result)
    }

    /// Decodes all symbols from the `bits` iterator.
    ///
    /// Returns [`HuffmanError::TruncatedStream`] if `bits` end in the middle of a codeword.
    pub fn decode_bits<I: IntoIterator<Item = bool>>(&self, bits: I) -> Result<String> {
        let mut bits = bits.into_iter();
        let mut result = String::new();
        let mut decoder = Decoder::new(&self.tree);
        while let DecodingResult::Value(symbol) = decoder.decode_next(&mut bits) {
            result.push(symbol);
        }
        match decoder.consumed_bits() {
            0 => Ok(result),
            consumed => Err(HuffmanError::TruncatedStream { consumed }),
        }
    }

    /// Decodes the textual stream `bits` of `'0'` and `'1'` characters.
    ///
    /// Returns an empty string for empty `bits`,
    /// [`HuffmanError::InvalidBit`] if `bits` contain any other character, and
    /// [`HuffmanError::TruncatedStream`] if `bits` end in the middle of a codeword.
    pub fn decode(&self, bits: &str) -> Result<String> {
        let mut invalid = None;
        let decoded = self.decode_bits(text_bits(bits).map_while(|bit| match bit {
            Ok(bit) => Some(bit),
            Err(e) => { invalid = Some(e); None }
        }));
        match invalid {
            Some(e) => Err(e),
            None => decoded,
        }
    }
}
