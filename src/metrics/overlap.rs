use std::collections::HashSet;

use crate::text::tokenize;

/// Token-overlap F1.
///
/// The overlap is counted over distinct tokens, while precision and recall divide by
/// the full (duplicate-including) token counts of each side.
pub fn token_f1(response: &str, reference: &str) -> f64 {
    let response_tokens = tokenize(response);
    let reference_tokens = tokenize(reference);

    let response_set: HashSet<&String> = response_tokens.iter().collect();
    let reference_set: HashSet<&String> = reference_tokens.iter().collect();
    let common = response_set.intersection(&reference_set).count();

    if common == 0 {
        return 0.0;
    }

    let precision = common as f64 / response_tokens.len() as f64;
    let recall = common as f64 / reference_tokens.len() as f64;

    if precision + recall == 0.0 {
        return 0.0;
    }

    2.0 * precision * recall / (precision + recall)
}
