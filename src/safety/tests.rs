use super::*;
use crate::embedding::{
    EmbeddingError, LabelScore, SentenceConfig, SentenceEmbedder, ToxicityClassifier,
    ToxicityConfig, ToxicityError,
};

struct FixedClassifier(Vec<LabelScore>);

impl TextClassifier for FixedClassifier {
    fn classify(&self, _text: &str) -> Result<Vec<LabelScore>, ToxicityError> {
        Ok(self.0.clone())
    }
}

struct FailingClassifier;

impl TextClassifier for FailingClassifier {
    fn classify(&self, _text: &str) -> Result<Vec<LabelScore>, ToxicityError> {
        Err(ToxicityError::InferenceFailed {
            reason: "no device".to_string(),
        })
    }
}

/// Maps text to a 2-d vector: one axis for "rust", one for everything else.
struct AxisEmbedder;

impl Embedder for AxisEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.contains("rust") {
            Ok(vec![1.0, 0.0])
        } else {
            Ok(vec![0.0, 1.0])
        }
    }

    fn embedding_dim(&self) -> usize {
        2
    }
}

fn checks_with(classifier: Arc<dyn TextClassifier>) -> SafetyChecks {
    let embedder = SentenceEmbedder::load(SentenceConfig::stub()).expect("stub loads");
    SafetyChecks::new(Arc::new(embedder), classifier)
}

fn stub_checks() -> SafetyChecks {
    checks_with(Arc::new(ToxicityClassifier::stub()))
}

#[test]
fn test_knowledge_gap_identical_passes() {
    let gap = stub_checks()
        .knowledge_gap("borrow checker rules", "borrow checker rules")
        .expect("checks");
    assert!(gap.passed);
    assert!((gap.similarity - 1.0).abs() < 1e-6);
}

#[test]
fn test_knowledge_gap_unrelated_fails() {
    let checks = SafetyChecks::new(Arc::new(AxisEmbedder), Arc::new(ToxicityClassifier::stub()));
    let gap = checks
        .knowledge_gap("rust ownership", "baking bread")
        .expect("checks");
    assert!(!gap.passed);
    assert_eq!(gap.similarity, 0.0);
}

#[test]
fn test_context_alignment() {
    let checks = SafetyChecks::new(Arc::new(AxisEmbedder), Arc::new(ToxicityClassifier::stub()));
    let aligned = checks
        .context_alignment("rust answer", "rust context")
        .expect("checks");
    assert!((aligned - 1.0).abs() < 1e-9);
}

#[test]
fn test_hallucination_blank_inputs() {
    let checks = stub_checks();
    assert_eq!(checks.hallucination_score("   ", "reference").expect("ok"), 0.0);
    assert_eq!(checks.hallucination_score("response", "").expect("ok"), 0.0);
}

#[test]
fn test_hallucination_score_is_rounded() {
    let score = stub_checks()
        .hallucination_score("the cat sat on the mat", "the cat sat on a mat")
        .expect("checks");
    assert_eq!(score, round3(score));
    assert!(score > 0.0 && score <= 1.0);
}

#[test]
fn test_toxicity_uses_toxic_label() {
    let checks = checks_with(Arc::new(FixedClassifier(vec![
        LabelScore::new("insult", 0.9),
        LabelScore::new(TOXIC_LABEL, 0.87654),
    ])));
    let verdict = checks.toxicity("whatever").expect("checks");
    assert!(verdict.flagged);
    assert_eq!(verdict.score, 0.877);
}

#[test]
fn test_toxicity_missing_label_is_zero() {
    let checks = checks_with(Arc::new(FixedClassifier(vec![LabelScore::new(
        "insult", 0.99,
    )])));
    let verdict = checks.toxicity("whatever").expect("checks");
    assert!(!verdict.flagged);
    assert_eq!(verdict.score, 0.0);
}

#[test]
fn test_toxicity_threshold_is_strict() {
    let checks = checks_with(Arc::new(FixedClassifier(vec![LabelScore::new(
        TOXIC_LABEL,
        0.5,
    )])));
    assert!(!checks.toxicity("x").expect("checks").flagged);
}

#[test]
fn test_toxicity_classifier_error_surfaces() {
    let checks = checks_with(Arc::new(FailingClassifier));
    assert!(matches!(
        checks.toxicity("x"),
        Err(SafetyError::Toxicity(_))
    ));
}

#[test]
fn test_stub_classifier_end_to_end() {
    let checks = stub_checks();
    assert!(!checks.toxicity("Have a lovely day").expect("checks").flagged);
    assert!(checks.toxicity("you stupid idiot").expect("checks").flagged);
}

#[test]
fn test_toxicity_cutoff_is_fixed() {
    let classifier = ToxicityClassifier::load(ToxicityConfig::stub()).expect("stub loads");
    let checks = checks_with(Arc::new(classifier));

    let verdict = checks.toxicity("you idiot").expect("checks");
    assert!(verdict.flagged);
    assert_eq!(verdict.score, 0.65);

    let barely = checks_with(Arc::new(FixedClassifier(vec![LabelScore::new(
        TOXIC_LABEL,
        0.5004,
    )])));
    let verdict = barely.toxicity("x").expect("checks");
    assert!(verdict.flagged);
    assert_eq!(verdict.score, 0.5);
}
