use std::path::PathBuf;

pub const MAX_SEQ_LEN: usize = crate::constants::DEFAULT_CLASSIFIER_MAX_SEQ_LEN;

/// Where the toxicity model lives. `None` selects the lexicon stub.
#[derive(Debug, Clone, Default)]
pub struct ToxicityConfig {
    pub model_dir: Option<PathBuf>,
}

impl ToxicityConfig {
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: Some(model_dir.into()),
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn from_optional_dir(model_dir: Option<PathBuf>) -> Self {
        Self { model_dir }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref path) = self.model_dir
            && path.as_os_str().is_empty()
        {
            return Err("model_dir cannot be empty when provided".to_string());
        }

        Ok(())
    }
}
