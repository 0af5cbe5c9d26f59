use std::collections::HashMap;

use crate::text::tokenize;

/// Highest n-gram order; each order carries weight `1 / MAX_ORDER`.
pub const MAX_ORDER: usize = 4;

/// Numerator used for orders with no matching n-gram (smoothing method 1).
pub const SMOOTHING_EPSILON: f64 = 0.1;

/// Sentence-level BLEU of `response` against a single `reference`.
///
/// Uniform weights over 1..=4-grams, clipped precision, brevity penalty, and
/// epsilon smoothing of empty orders. Returns 0.0 when no unigram matches.
pub fn sentence_bleu(response: &str, reference: &str) -> f64 {
    let hypothesis = tokenize(response);
    let reference = tokenize(reference);
    bleu_from_tokens(&hypothesis, &reference)
}

pub(crate) fn bleu_from_tokens(hypothesis: &[String], reference: &[String]) -> f64 {
    let precisions: Vec<(usize, usize)> = (1..=MAX_ORDER)
        .map(|n| clipped_precision(hypothesis, reference, n))
        .collect();

    if precisions[0].0 == 0 {
        return 0.0;
    }

    let penalty = brevity_penalty(reference.len(), hypothesis.len());
    let weight = 1.0 / MAX_ORDER as f64;

    let log_sum: f64 = precisions
        .iter()
        .map(|&(numerator, denominator)| {
            let p = if numerator == 0 {
                SMOOTHING_EPSILON / denominator as f64
            } else {
                numerator as f64 / denominator as f64
            };
            weight * p.ln()
        })
        .sum();

    penalty * log_sum.exp()
}

/// Clipped n-gram matches and the (at least 1) hypothesis n-gram count.
fn clipped_precision(hypothesis: &[String], reference: &[String], n: usize) -> (usize, usize) {
    let hyp_counts = ngram_counts(hypothesis, n);
    let ref_counts = ngram_counts(reference, n);

    let matched = hyp_counts
        .iter()
        .map(|(gram, count)| (*count).min(ref_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    let total: usize = hyp_counts.values().sum();

    (matched, total.max(1))
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    if tokens.len() < n {
        return counts;
    }
    for gram in tokens.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

fn brevity_penalty(reference_len: usize, hypothesis_len: usize) -> f64 {
    if hypothesis_len > reference_len {
        1.0
    } else if hypothesis_len == 0 {
        0.0
    } else {
        (1.0 - reference_len as f64 / hypothesis_len as f64).exp()
    }
}
