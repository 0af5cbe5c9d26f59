use super::*;
use crate::embedding::cosine_similarity;
use std::path::PathBuf;

mod config_tests {
    use super::*;

    #[test]
    fn test_sentence_config_default() {
        let config = SentenceConfig::default();
        assert_eq!(config.embedding_dim, SENTENCE_EMBEDDING_DIM);
        assert_eq!(config.max_seq_len, SENTENCE_MAX_SEQ_LEN);
        assert!(!config.testing_stub);
        assert!(config.model_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_sentence_config_from_optional_dir() {
        let config = SentenceConfig::from_optional_dir(Some(PathBuf::from("/models/minilm")));
        assert_eq!(config.model_dir, PathBuf::from("/models/minilm"));
        assert!(!config.testing_stub);

        assert!(SentenceConfig::from_optional_dir(None).testing_stub);
    }

    #[test]
    fn test_validate_requires_model_dir() {
        let err = SentenceConfig::default().validate().unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidConfig { .. }));
    }

    #[test]
    fn test_validate_reports_missing_files() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let err = SentenceConfig::new(dir.path()).validate().unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelNotFound { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_dim() {
        let config = SentenceConfig {
            embedding_dim: 0,
            ..SentenceConfig::stub()
        };
        assert!(config.validate().is_err());
    }
}

mod stub_tests {
    use super::*;

    fn stub() -> SentenceEmbedder {
        SentenceEmbedder::load(SentenceConfig::stub()).expect("stub loads")
    }

    #[test]
    fn test_stub_dimension_and_norm() {
        let embedder = stub();
        assert!(embedder.is_stub());

        let v = embedder.embed("The quick brown fox").expect("embeds");
        assert_eq!(v.len(), SENTENCE_EMBEDDING_DIM);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stub_is_deterministic() {
        let a = stub().embed("inflation rose in march").expect("embeds");
        let b = stub().embed("inflation rose in march").expect("embeds");
        assert_eq!(a, b);
    }

    #[test]
    fn test_stub_ignores_case_and_punctuation() {
        let embedder = stub();
        let a = embedder.embed("Hello, World!").expect("embeds");
        let b = embedder.embed("hello world").expect("embeds");
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_stub_overlap_beats_disjoint() {
        let embedder = stub();
        let base = embedder
            .embed("paris is the capital of france")
            .expect("embeds");
        let close = embedder
            .embed("the capital of france is paris")
            .expect("embeds");
        let far = embedder
            .embed("quantum chromodynamics lattice")
            .expect("embeds");

        assert!(cosine_similarity(&base, &close) > cosine_similarity(&base, &far));
    }

    #[test]
    fn test_stub_empty_text_is_zero_vector() {
        let v = stub().embed("   ").expect("embeds");
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_debug_output() {
        let debug_str = format!("{:?}", stub());
        assert!(debug_str.contains("SentenceEmbedder"));
        assert!(debug_str.contains("Stub"));
    }
}
