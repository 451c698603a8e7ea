#![doc = include_str!("../README.md")]

mod error;
pub use error::HuffmanError;
pub mod frequencies;
pub use frequencies::{Frequencies, count_symbols};
pub mod tree;
pub use tree::{Node, NodeId, Tree};
mod code;
pub use code::{Code, CodeTable};
mod decoder;
pub use decoder::{Decoder, DecodingResult};
pub mod bits;
pub use bits::BitSink;
mod stats;
pub use stats::{CompressionStats, compression_ratio};
mod session;
pub use session::Session;
mod codec;
pub use codec::{Codec, SharedCodec};
pub mod container;
pub use container::{Container, PayloadFormat};

/// Result type returned by the operations of this crate.
pub type Result<T> = std::result::Result<T, HuffmanError>;
