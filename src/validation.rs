/// Validation tests for the Huffman codec.
///
/// These tests verify:
/// 1. **Round-trip correctness** over a broad set of generated corpora
/// 2. **Code-table properties** - prefix freedom, optimal ordering of lengths
/// 3. **Determinism** - repeated builds and rebuilt frequency tables agree
/// 4. **Error paths** - every failure kind surfaces through the public API
/// 5. **Entropy bounds** - average code length sits within one bit of entropy
#[cfg(test)]
mod tests {
    use crate::frequency::{self, SymbolOrder};
    use crate::huffman::{BuildOptions, HuffmanTree};
    use crate::{build_tree, decode, encode, traverse, BitStream, HuffError};

    // ---------------------------------------------------------------
    // Helper: generate diverse test vectors
    // ---------------------------------------------------------------

    /// Highly compressible: single byte repeated.
    fn data_all_zeros(n: usize) -> Vec<u8> {
        vec![0u8; n]
    }

    /// Every byte value once (uniform distribution, 8 bits entropy).
    fn data_uniform() -> Vec<u8> {
        (0..=255u8).collect()
    }

    /// Skewed distribution: 90% one byte, 10% another.
    fn data_skewed(n: usize) -> Vec<u8> {
        (0..n).map(|i| if i % 10 == 0 { 1 } else { 0 }).collect()
    }

    /// Repetitive text with structure.
    fn data_repeating_text() -> Vec<u8> {
        b"the quick brown fox jumps over the lazy dog. ".repeat(100)
    }

    /// Binary data with some structure (sawtooth).
    fn data_sawtooth(n: usize) -> Vec<u8> {
        (0..n).map(|i| (i % 256) as u8).collect()
    }

    /// Fibonacci-weighted symbols: the worst case for tree depth.
    fn data_fibonacci(symbols: u8) -> Vec<u8> {
        let (mut a, mut b) = (1usize, 1usize);
        let mut v = Vec::new();
        for s in 0..symbols {
            v.extend(std::iter::repeat(s).take(a));
            (a, b) = (b, a + b);
        }
        v
    }

    /// Pseudo-random bytes from a fixed LCG seed.
    fn data_lcg(n: usize) -> Vec<u8> {
        let mut state = 0x2545_F491u32;
        (0..n)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (state >> 16) as u8
            })
            .collect()
    }

    // ---------------------------------------------------------------
    // 1. Round-trip validation
    // ---------------------------------------------------------------

    macro_rules! round_trip_test {
        ($name:ident, $data:expr) => {
            mod $name {
                use super::*;

                #[test]
                fn packed() {
                    let input = $data;
                    let tree = build_tree(&input).unwrap();
                    let bits = encode(&tree, &input).unwrap();
                    let decoded = decode(&tree, &bits).unwrap();
                    assert_eq!(decoded, input, "packed round-trip failed");
                }

                #[test]
                fn text() {
                    let input = $data;
                    let tree = build_tree(&input).unwrap();
                    let text = encode(&tree, &input).unwrap().to_text();
                    let decoded = tree.decode_text(&text).unwrap();
                    assert_eq!(decoded, input, "text round-trip failed");
                }

                #[test]
                fn reassembled_parts() {
                    let input = $data;
                    let tree = build_tree(&input).unwrap();
                    let (bytes, len) = encode(&tree, &input).unwrap().into_parts();
                    let bits = BitStream::from_parts(bytes, len).unwrap();
                    assert_eq!(decode(&tree, &bits).unwrap(), input);
                }

                #[test]
                fn prefix_free() {
                    let input = $data;
                    let tree = build_tree(&input).unwrap();
                    assert!(tree.code_table().is_prefix_free());
                    assert_eq!(tree.code_table().len(), tree.leaf_count());
                }
            }
        };
    }

    round_trip_test!(rt_zeros_100, data_all_zeros(100));
    round_trip_test!(rt_zeros_5000, data_all_zeros(5000));
    round_trip_test!(rt_uniform, data_uniform());
    round_trip_test!(rt_skewed_1000, data_skewed(1000));
    round_trip_test!(rt_repeating_text, data_repeating_text());
    round_trip_test!(rt_sawtooth_1024, data_sawtooth(1024));
    round_trip_test!(rt_fibonacci_25, data_fibonacci(25));
    round_trip_test!(rt_lcg_4096, data_lcg(4096));
    round_trip_test!(rt_single_byte, vec![42u8]);
    round_trip_test!(rt_two_bytes, vec![0u8, 255]);

    // ---------------------------------------------------------------
    // 2. Code-table properties
    // ---------------------------------------------------------------

    #[test]
    fn more_frequent_never_longer() {
        for input in [data_repeating_text(), data_skewed(999), data_fibonacci(20)] {
            let tree = build_tree(&input).unwrap();
            let freq = frequency::get_frequency(&input).unwrap();
            let codes: Vec<(u64, u8)> = freq
                .entries(SymbolOrder::ByteValue)
                .map(|e| (e.count, tree.get_code(e.symbol).unwrap().len()))
                .collect();
            for &(count_a, len_a) in &codes {
                for &(count_b, len_b) in &codes {
                    if count_a > count_b {
                        assert!(len_a <= len_b, "{count_a}:{len_a} vs {count_b}:{len_b}");
                    }
                }
            }
        }
    }

    #[test]
    fn fibonacci_depth_grows_linearly() {
        let tree = build_tree(&data_fibonacci(30)).unwrap();
        assert_eq!(tree.max_code_len(), 29);
    }

    #[test]
    fn kraft_equality_holds() {
        // A full binary tree satisfies sum(2^-len) == 1 exactly.
        let tree = build_tree(&data_lcg(2048)).unwrap();
        let max = tree.max_code_len() as u32;
        let sum: u128 = tree
            .code_table()
            .iter()
            .map(|(_, c)| 1u128 << (max - c.len() as u32))
            .sum();
        assert_eq!(sum, 1u128 << max);
    }

    #[test]
    fn traverse_matches_frequencies() {
        let input = data_repeating_text();
        let tree = build_tree(&input).unwrap();
        let freq = frequency::get_frequency(&input).unwrap();
        let mut seen = 0;
        for visit in traverse(&tree) {
            if let Some(symbol) = visit.symbol {
                assert_eq!(visit.weight, freq.get(symbol));
                assert_eq!(
                    visit.depth,
                    tree.get_code(symbol).unwrap().len() as usize
                );
                seen += 1;
            }
        }
        assert_eq!(seen, freq.used());
        assert_eq!(traverse(&tree).count(), tree.node_count());
    }

    // ---------------------------------------------------------------
    // 3. Determinism
    // ---------------------------------------------------------------

    #[test]
    fn repeated_builds_agree() {
        let input = data_lcg(10_000);
        let first = build_tree(&input).unwrap();
        for _ in 0..5 {
            let again = build_tree(&input).unwrap();
            assert_eq!(first.code_table(), again.code_table());
        }
    }

    #[test]
    fn rebuilt_from_frequencies_agrees() {
        for order in [SymbolOrder::FirstOccurrence, SymbolOrder::ByteValue] {
            let input = data_sawtooth(700);
            let tree = HuffmanTree::from_data_with(&input, BuildOptions { order }).unwrap();
            let freq = tree.frequency_table().unwrap();
            let rebuilt = HuffmanTree::from_frequency_table(&freq).unwrap();
            assert_eq!(tree.code_table(), rebuilt.code_table());
            let bits = encode(&tree, &input).unwrap();
            assert_eq!(decode(&rebuilt, &bits).unwrap(), input);
        }
    }

    #[test]
    fn golden_codes_for_known_corpus() {
        let tree = build_tree(b"aaaabbbcc").unwrap();
        let codes: Vec<(u8, String)> = tree
            .code_table()
            .iter()
            .map(|(s, c)| (s, c.to_string()))
            .collect();
        assert_eq!(
            codes,
            vec![
                (b'a', "0".to_string()),
                (b'b', "11".to_string()),
                (b'c', "10".to_string()),
            ]
        );
    }

    // ---------------------------------------------------------------
    // 4. Error paths
    // ---------------------------------------------------------------

    #[test]
    fn empty_corpus() {
        assert_eq!(build_tree(&[]).unwrap_err(), HuffError::EmptyInput);
    }

    #[test]
    fn unknown_symbol_is_surfaced() {
        let tree = build_tree(b"ab").unwrap();
        assert!(matches!(
            encode(&tree, b"cab"),
            Err(HuffError::UnknownSymbol {
                symbol: b'c',
                offset: 0
            })
        ));
    }

    #[test]
    fn every_proper_prefix_is_truncated() {
        let input = data_repeating_text();
        let tree = build_tree(&input).unwrap();
        for (_, code) in tree.code_table().iter() {
            let text = code.to_string();
            for cut in 1..text.len() {
                assert_eq!(
                    tree.decode_text(&text[..cut]),
                    Err(HuffError::TruncatedStream { pending: cut }),
                    "prefix {} of {}",
                    &text[..cut],
                    text
                );
            }
        }
    }

    #[test]
    fn mismatched_tree_fails_or_differs() {
        let input = data_repeating_text();
        let tree = build_tree(&input).unwrap();
        let other = build_tree(&data_uniform()).unwrap();
        let bits = encode(&tree, &input).unwrap();
        match decode(&other, &bits) {
            Ok(decoded) => assert_ne!(decoded, input),
            Err(e) => assert!(matches!(e, HuffError::TruncatedStream { .. })),
        }
    }

    // ---------------------------------------------------------------
    // 5. Entropy bounds
    // ---------------------------------------------------------------

    #[test]
    fn average_length_within_one_bit_of_entropy() {
        for input in [data_repeating_text(), data_skewed(5000), data_lcg(8192)] {
            let tree = build_tree(&input).unwrap();
            let freq = frequency::get_frequency(&input).unwrap();
            let bits = tree.encoded_bits(&freq).unwrap();
            let avg = bits as f64 / freq.total() as f64;
            let h = freq.entropy();
            assert!(avg >= h - 1e-9, "avg {avg} below entropy {h}");
            assert!(avg < h + 1.0, "avg {avg} not within one bit of {h}");
            assert_eq!(encode(&tree, &input).unwrap().len() as u64, bits);
        }
    }
}
