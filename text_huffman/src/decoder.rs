use crate::tree::{Node, NodeId, Tree};

/// Result of bit decoding returned by `consume` method of [`Decoder`].
#[derive(PartialOrd, Ord, PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum DecodingResult<T> {
    /// Completed value that has been successfully decoded.
    Value(T),
    /// The codeword is incomplete and the next bit is needed.
    Incomplete,
}

impl<T> DecodingResult<T> {
    /// Returns the decoded value, if any.
    #[inline] pub fn value(self) -> Option<T> {
        match self {
            DecodingResult::Value(v) => Some(v),
            DecodingResult::Incomplete => None
        }
    }
}

/// Decoder that decodes a symbol for given codeword, consuming one bit at a time,
/// by walking down the Huffman tree from its root.
///
/// Time complexity of decoding the whole codeword is *O(length of the codeword)*.
/// Memory complexity: *O(1)*
pub struct Decoder<'tree> {
    tree: &'tree Tree,
    /// Current position in the tree.
    node: NodeId,
    /// Number of bits consumed since construction or last reset.
    consumed: u32,
}

impl<'tree> Decoder<'tree> {
    /// Constructs decoder for given `tree`.
    pub fn new(tree: &'tree Tree) -> Self {
        Self { tree, node: tree.root(), consumed: 0 }
    }

    /// Resets `self` to initial state and makes it ready to decode next symbol.
    #[inline] pub fn reset(&mut self) {
        self.node = self.tree.root();
        self.consumed = 0;
    }

    /// Returns the number of bits consumed since construction or last reset.
    #[inline(always)] pub fn consumed_bits(&self) -> u32 { self.consumed }

    /// Consumes a `bit` of the codeword (`false` = `0` = left, `true` = `1` = right) and returns:
    /// - a symbol if the given `bit` finishes the codeword;
    /// - [`DecodingResult::Incomplete`] if the codeword is incomplete and the next bit is needed.
    ///
    /// If the tree consists of a single leaf, each bit decodes its symbol.
    /// After a symbol is returned, `self` should be [reset](Self::reset) before consuming the next bit.
    pub fn consume(&mut self, bit: bool) -> DecodingResult<char> {
        self.consumed += 1;
        if let Node::Internal { left, right, .. } = *self.tree.node(self.node) {
            self.node = if bit { right } else { left };
        }
        match *self.tree.node(self.node) {
            Node::Leaf { symbol, .. } => DecodingResult::Value(symbol),
            Node::Internal { .. } => DecodingResult::Incomplete,
        }
    }

    /// Tries to decode and return a single symbol from the `bits` iterator,
    /// consuming as many bits as needed.
    /// If successful, it [resets](Self::reset) `self` to be ready to decode the next symbol.
    ///
    /// Returns [`DecodingResult::Incomplete`] if the iterator exhausted before the symbol was decoded
    /// ([`Self::consumed_bits`] enables checking if the iterator yielded any bit before exhausting).
    pub fn decode_next<I: Iterator<Item = bool>>(&mut self, bits: &mut I) -> DecodingResult<char> {
        for bit in bits {
            if let DecodingResult::Value(symbol) = self.consume(bit) {
                self.reset();
                return DecodingResult::Value(symbol);
            }
        }
        DecodingResult::Incomplete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreemap;

    #[test]
    fn three_symbols() {
        // a = 0, c = 10, b = 11
        let tree = Tree::from_frequencies(&btreemap!('a' => 4, 'b' => 3, 'c' => 2)).unwrap();
        let mut decoder_for_a = Decoder::new(&tree);
        assert_eq!(decoder_for_a.consume(false), DecodingResult::Value('a'));
        let mut decoder_for_b = Decoder::new(&tree);
        assert_eq!(decoder_for_b.consume(true), DecodingResult::Incomplete);
        assert_eq!(decoder_for_b.consumed_bits(), 1);
        assert_eq!(decoder_for_b.consume(true), DecodingResult::Value('b'));
        decoder_for_b.reset();
        assert_eq!(decoder_for_b.consumed_bits(), 0);
        assert_eq!(decoder_for_b.consume(true), DecodingResult::Incomplete);
        assert_eq!(decoder_for_b.consume(false), DecodingResult::Value('c'));
    }

    #[test]
    fn single_leaf() {
        let tree = Tree::from_frequencies(&btreemap!('a' => 4)).unwrap();
        let mut decoder = Decoder::new(&tree);
        assert_eq!(decoder.consume(false), DecodingResult::Value('a'));
        decoder.reset();
        assert_eq!(decoder.consume(false).value(), Some('a'));
    }

    #[test]
    fn decode_next() {
        let tree = Tree::from_frequencies(&btreemap!('a' => 4, 'b' => 3, 'c' => 2)).unwrap();
        let mut decoder = Decoder::new(&tree);
        let mut bits = [true, false, false, true, true, true].into_iter();
        assert_eq!(decoder.decode_next(&mut bits), DecodingResult::Value('c'));
        assert_eq!(decoder.decode_next(&mut bits), DecodingResult::Value('a'));
        assert_eq!(decoder.decode_next(&mut bits), DecodingResult::Value('b'));
        assert_eq!(decoder.decode_next(&mut bits), DecodingResult::Incomplete);
        assert_eq!(decoder.consumed_bits(), 1);
        assert_eq!(decoder.decode_next(&mut bits), DecodingResult::Incomplete);
    }
}
