use crate::text::rouge_tokens;

/// ROUGE-L F-measure of `response` (prediction) against `reference` (target).
///
/// Both sides go through [`rouge_tokens`], so inflections of the same stem match.
pub fn rouge_l(response: &str, reference: &str) -> f64 {
    let prediction = rouge_tokens(response);
    let target = rouge_tokens(reference);

    if prediction.is_empty() || target.is_empty() {
        return 0.0;
    }

    let lcs = lcs_length(&target, &prediction) as f64;
    let precision = lcs / prediction.len() as f64;
    let recall = lcs / target.len() as f64;

    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

/// Length of the longest common subsequence, two-row DP.
pub(crate) fn lcs_length<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
