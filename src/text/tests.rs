use super::*;

#[test]
fn test_tokenize_lowercases_and_strips_punctuation() {
    assert_eq!(
        tokenize("Hello, World! It's 2024."),
        vec!["hello", "world", "it", "s", "2024"]
    );
}

#[test]
fn test_tokenize_keeps_underscores_and_unicode_letters() {
    assert_eq!(tokenize("snake_case café"), vec!["snake_case", "café"]);
}

#[test]
fn test_tokenize_empty_and_symbols_only() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("?!... --- ***").is_empty());
}

#[test]
fn test_word_count_splits_on_whitespace_only() {
    assert_eq!(word_count("one, two;  three\nfour"), 4);
    assert_eq!(word_count("   "), 0);
}

#[test]
fn test_rouge_tokens_stem_long_tokens_only() {
    let tokens = rouge_tokens("The cats are running");
    assert_eq!(tokens, vec!["the", "cat", "are", "run"]);
}

#[test]
fn test_rouge_tokens_use_snowball_english() {
    // Snowball keeps "generous"; classic Porter would give "gener".
    assert_eq!(rouge_tokens("generously"), vec!["generous"]);
    assert_eq!(rouge_tokens("connections connected"), vec!["connect", "connect"]);
}

#[test]
fn test_rouge_tokens_drop_non_ascii() {
    assert_eq!(rouge_tokens("naïve résumé"), vec!["na", "ve", "r", "sum"]);
}

#[test]
fn test_stopwords() {
    assert_eq!(ENGLISH_STOPWORDS.len(), 179);
    assert!(is_stopword("the"));
    assert!(is_stopword("don't"));
    assert!(!is_stopword("inflation"));
}

#[test]
fn test_stopword_ratio() {
    let tokens = tokenize("what is the capital of france");
    // what, is, the, of are stop words
    assert!((stopword_ratio(&tokens) - 4.0 / 6.0).abs() < 1e-9);
    assert_eq!(stopword_ratio(&[]), 0.0);
}
