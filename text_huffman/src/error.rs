use thiserror::Error;

/// Errors reported by the Huffman coding engine.
#[derive(Error, Debug)]
pub enum HuffmanError {
    /// Nothing to build from: the text or the frequency table is empty.
    #[error("empty input: nothing to compress")]
    EmptyInput,

    #[error("symbol {0:?} has zero frequency")]
    ZeroFrequency(char),

    /// The text contains a symbol the code table was not built for.
    #[error("symbol {0:?} is not in the code table")]
    UnknownSymbol(char),

    /// The bit stream ends inside a codeword.
    #[error("bit stream truncated after {consumed} bits of an incomplete codeword")]
    TruncatedStream { consumed: u32 },

    /// Encoding or decoding was requested before any successful build.
    #[error("no Huffman tree: nothing to decode")]
    MissingTree,

    #[error("invalid bit {found:?} at position {position} (expected '0' or '1')")]
    InvalidBit { position: usize, found: char },

    #[error("codeword of {len} bits exceeds the supported 64 bits")]
    CodeTooLong { len: u32 },

    #[error("invalid container header: {0}")]
    InvalidHeader(String),

    #[error("decoded {found} symbols, while the header declares {expected}")]
    LengthMismatch { expected: u64, found: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
