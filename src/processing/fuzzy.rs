//! Lexical similarity scores on a 0-100 scale.

use std::collections::BTreeSet;

/// Normalized indel similarity: `100 * 2 * lcs / (len(a) + len(b))`,
/// counted in characters. Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }

    100.0 * (2 * longest_common_subsequence(&a, &b)) as f64 / total as f64
}

/// Similarity of the whitespace token sets of `a` and `b`, insensitive to
/// word order and repetition.
///
/// Sorted intersection and differences are joined back into strings and
/// compared with [`ratio`]; the best of those comparisons wins. A side with
/// no tokens scores 0, and one token set contained in the other scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = join(tokens_a.intersection(&tokens_b));
    let diff_ab = join(tokens_a.difference(&tokens_b));
    let diff_ba = join(tokens_b.difference(&tokens_a));

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let with_intersection = |diff: &str| {
        if intersection.is_empty() {
            diff.to_string()
        } else {
            format!("{intersection} {diff}")
        }
    };
    let combined_ab = with_intersection(&diff_ab);
    let combined_ba = with_intersection(&diff_ba);

    let mut best = ratio(&combined_ab, &combined_ba);
    if !intersection.is_empty() {
        best = best
            .max(ratio(&intersection, &combined_ab))
            .max(ratio(&intersection, &combined_ba));
    }
    best
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
