use std::fmt;

/// Returns the size of `encoded_bits` relative to `symbols` stored on 8 bits each, in percent.
///
/// Returns `0.0` for zero `symbols`.
pub fn compression_ratio(encoded_bits: u64, symbols: u64) -> f64 {
    if symbols == 0 { return 0.0; }
    encoded_bits as f64 / (symbols * 8) as f64 * 100.0
}

/// Statistics of compressing a text.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct CompressionStats {
    /// Number of symbols in the original text.
    pub symbols: u64,
    /// Number of distinct symbols in the original text.
    pub distinct_symbols: usize,
    /// Number of bits of the encoded text.
    pub encoded_bits: u64,
    /// Shannon entropy of the original text, in bits per symbol.
    pub entropy: f64,
}

impl CompressionStats {
    /// Returns the number of encoded bits relative to 8 bits per original symbol, in percent.
    #[inline] pub fn ratio_percent(&self) -> f64 {
        compression_ratio(self.encoded_bits, self.symbols)
    }

    /// Returns the lower bound (given by entropy) of the number of bits needed to encode the text
    /// with any coding that assigns a codeword to each symbol.
    pub fn entropy_bound_bits(&self) -> u64 {
        (self.entropy * self.symbols as f64 - 1e-9).ceil().max(0.0) as u64
    }

    /// Returns average length of codeword per symbol, in bits.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.symbols == 0 { 0.0 } else { self.encoded_bits as f64 / self.symbols as f64 }
    }

    /// Returns how many bits more than the entropy bound the encoding takes.
    #[inline] pub fn redundancy_bits(&self) -> u64 {
        self.encoded_bits.saturating_sub(self.entropy_bound_bits())
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Symbols: {} ({} distinct)", self.symbols, self.distinct_symbols)?;
        writeln!(f, "Compressed size: {} bits ({:.3} bits/symbol, entropy {:.3})",
                 self.encoded_bits, self.bits_per_symbol(), self.entropy)?;
        write!(f, "Compression Ratio: {:.2}%", self.ratio_percent())
    }
}
