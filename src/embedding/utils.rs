use std::io;
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};

/// Files every BERT-style model directory must contain.
pub const REQUIRED_MODEL_FILES: [&str; 3] = ["config.json", "model.safetensors", "tokenizer.json"];

/// Returns the first required file missing from `model_dir`, if any.
pub fn missing_model_file(model_dir: &Path) -> Option<PathBuf> {
    REQUIRED_MODEL_FILES
        .iter()
        .map(|name| model_dir.join(name))
        .find(|path| !path.exists())
}

/// Loads `tokenizer.json` from a model directory with truncation at `max_len` tokens.
pub fn load_tokenizer(model_dir: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let mut tokenizer =
        Tokenizer::from_file(model_dir.join("tokenizer.json")).map_err(io::Error::other)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_padding(None)
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;

    Ok(tokenizer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_file_reports_first_gap() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        assert_eq!(
            missing_model_file(dir.path()),
            Some(dir.path().join("config.json"))
        );

        std::fs::write(dir.path().join("config.json"), "{}").expect("write");
        assert_eq!(
            missing_model_file(dir.path()),
            Some(dir.path().join("model.safetensors"))
        );
    }

    #[test]
    fn test_load_tokenizer_missing_file() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        assert!(load_tokenizer(dir.path(), 128).is_err());
    }
}
