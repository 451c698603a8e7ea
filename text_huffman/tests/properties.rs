use std::collections::BTreeMap;

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_pcg::Pcg64Mcg;

use text_huffman::{count_symbols, Codec, Container, HuffmanError, PayloadFormat, Session};

/// Returns pseudo-random text of `len` symbols drawn from `alphabet`,
/// each successive symbol occurring `1+spread` times more often than the previous one.
fn random_text(alphabet: &[char], len: usize, spread: f64, seed: u64) -> String {
    let weights: Vec<_> = (1..=alphabet.len() as i32).map(|v| (1.0 + spread).powi(v)).collect();
    let dist = WeightedIndex::new(weights).unwrap();
    let rng = Pcg64Mcg::seed_from_u64(seed);
    dist.sample_iter(rng).take(len).map(|i| alphabet[i]).collect()
}

fn alphabets() -> Vec<Vec<char>> {
    vec![
        vec!['x'],
        vec!['0', '1'],
        ('a'..='z').collect(),
        "aąbcćdeęfghijklłmnńoóprsśtuwyzźż .,!?".chars().collect(),
        (0x3040u32..0x3040 + 300).filter_map(char::from_u32).collect(),
    ]
}

/// Cost of the optimal prefix code, computed independently: sum of weights of all merged nodes.
fn optimal_cost(frequencies: &BTreeMap<char, u32>) -> u64 {
    let mut weights: Vec<u64> = frequencies.values().map(|v| *v as u64).collect();
    if weights.len() == 1 { return weights[0]; }
    let mut cost = 0;
    while weights.len() > 1 {
        weights.sort_unstable_by(|a, b| b.cmp(a));
        let merged = weights.pop().unwrap() + weights.pop().unwrap();
        cost += merged;
        weights.push(merged);
    }
    cost
}

#[test]
fn round_trip() {
    for (seed, alphabet) in alphabets().into_iter().enumerate() {
        for (len, spread) in [(1, 0.0), (7, 0.5), (1000, 0.0), (5000, 0.05), (5000, 1.0)] {
            let text = random_text(&alphabet, len, spread, seed as u64);
            let session = Session::build(&text).unwrap();
            let encoded = session.encode(&text).unwrap();
            assert_eq!(encoded.len() as u64, session.encoded_len());
            assert_eq!(session.decode(&encoded).unwrap(), text);
        }
    }
}

#[test]
fn prefix_free_and_optimal() {
    for (seed, alphabet) in alphabets().into_iter().enumerate() {
        for spread in [0.0, 0.01, 0.3, 2.0] {
            let text = random_text(&alphabet, 3000, spread, 100 + seed as u64);
            let frequencies = count_symbols(&text);
            let session = Session::from_frequencies(frequencies.clone()).unwrap();
            assert!(session.codes().is_prefix_free());
            assert_eq!(session.codes().len(), frequencies.len());
            assert_eq!(session.encoded_len(), optimal_cost(&frequencies));
            // never worse than the fixed-length code
            let fixed_len = (frequencies.len() as f64).log2().ceil().max(1.0) as u64;
            assert!(session.encoded_len() <= fixed_len * text.chars().count() as u64);
            let stats = session.stats();
            assert!(stats.encoded_bits >= stats.entropy_bound_bits());
            assert!(stats.bits_per_symbol() <= stats.entropy + 1.0);
        }
    }
}

#[test]
fn deterministic() {
    let text = random_text(&('a'..='p').collect::<Vec<_>>(), 2000, 0.0, 7);
    let first = Session::build(&text).unwrap();
    let second = Session::build(&text).unwrap();
    assert_eq!(first.tree().depths(), second.tree().depths());
    assert_eq!(first.codes(), second.codes());
    assert_eq!(first.encode(&text).unwrap(), second.encode(&text).unwrap());
}

#[test]
fn equally_frequent_symbols_expand() {
    // 512 equally frequent symbols need 9 bits each
    let alphabet: Vec<char> = (0x400u32..0x400 + 512).filter_map(char::from_u32).collect();
    let text: String = alphabet.iter().collect();
    let session = Session::build(&text).unwrap();
    assert!(session.codes().iter().all(|(_, code)| code.len == 9));
    assert!(session.stats().ratio_percent() > 100.0);
}

#[test]
fn codec_workflow() {
    let mut codec = Codec::new();
    assert!(matches!(codec.build(""), Err(HuffmanError::EmptyInput)));
    assert!(matches!(codec.encode(""), Err(HuffmanError::MissingTree)));
    assert!(matches!(codec.decode(""), Err(HuffmanError::MissingTree)));
    let text = random_text(&('a'..='f').collect::<Vec<_>>(), 500, 0.7, 3);
    codec.build(&text).unwrap();
    let encoded = codec.encode(&text).unwrap();
    assert_eq!(codec.decode(&encoded).unwrap(), text);
}

#[test]
fn containers() {
    for (seed, alphabet) in alphabets().into_iter().enumerate() {
        let text = random_text(&alphabet, 777, 0.2, 50 + seed as u64);
        let session = Session::build(&text).unwrap();
        for format in [PayloadFormat::Text, PayloadFormat::Packed] {
            let mut file = Vec::new();
            Container::pack(&session, &text, format).unwrap().write(&mut file).unwrap();
            assert_eq!(Container::read(&mut &file[..]).unwrap().unpack().unwrap(), text);
        }
    }
}
