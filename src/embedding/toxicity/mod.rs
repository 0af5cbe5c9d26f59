pub mod config;
pub mod error;


pub use config::{MAX_SEQ_LEN, ToxicityConfig};
pub use error::ToxicityError;

use candle_core::Tensor;
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::embedding::bert::BertSequenceClassifier;
use crate::embedding::device::select_device;
use crate::embedding::utils::{load_tokenizer, missing_model_file};
use crate::text::tokenize;

/// Label carrying the toxic-class probability.
pub const TOXIC_LABEL: &str = "toxic";

/// Label the stub reports alongside [`TOXIC_LABEL`].
pub const NON_TOXIC_LABEL: &str = "non-toxic";

/// One entry of a classifier's output distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Produces a labeled probability distribution for a text.
pub trait TextClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ToxicityError>;
}

const STUB_LEXICON: &[&str] = &[
    "idiot",
    "idiots",
    "stupid",
    "moron",
    "dumb",
    "loser",
    "hate",
    "kill",
    "trash",
    "pathetic",
    "worthless",
    "jerk",
];

pub struct ToxicityClassifier {
    config: ToxicityConfig,
    model: Option<(BertSequenceClassifier, Tokenizer, candle_core::Device)>,
}

impl std::fmt::Debug for ToxicityClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToxicityClassifier")
            .field("config", &self.config)
            .field("model_loaded", &self.is_model_loaded())
            .finish()
    }
}

impl ToxicityClassifier {
    pub fn load(config: ToxicityConfig) -> Result<Self, ToxicityError> {
        if let Err(reason) = config.validate() {
            return Err(ToxicityError::InvalidConfig { reason });
        }

        let Some(model_dir) = config.model_dir.clone() else {
            info!("No toxicity model configured, operating in stub mode");
            return Ok(Self {
                config,
                model: None,
            });
        };

        if !model_dir.exists() {
            return Err(ToxicityError::ModelNotFound { path: model_dir });
        }
        if let Some(missing) = missing_model_file(&model_dir) {
            return Err(ToxicityError::ModelLoadFailed {
                reason: format!("Missing {}", missing.display()),
            });
        }

        let device = select_device("toxicity-classifier");

        info!(
            model_dir = %model_dir.display(),
            "Loading toxicity model"
        );

        let classifier = BertSequenceClassifier::load(&model_dir, &device).map_err(|e| {
            ToxicityError::ModelLoadFailed {
                reason: format!("Failed to load BERT classifier: {}", e),
            }
        })?;

        let tokenizer =
            load_tokenizer(&model_dir, MAX_SEQ_LEN).map_err(|e| ToxicityError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            })?;

        info!(
            labels = ?classifier.labels(),
            activation = ?classifier.activation(),
            "Toxicity model loaded"
        );

        Ok(Self {
            config,
            model: Some((classifier, tokenizer, device)),
        })
    }

    pub fn stub() -> Self {
        Self {
            config: ToxicityConfig::stub(),
            model: None,
        }
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn config(&self) -> &ToxicityConfig {
        &self.config
    }

    fn classify_with_model(
        &self,
        text: &str,
        classifier: &BertSequenceClassifier,
        tokenizer: &Tokenizer,
        device: &candle_core::Device,
    ) -> Result<Vec<LabelScore>, ToxicityError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| ToxicityError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

        let probabilities =
            classifier.probabilities(&input_ids, &type_ids, Some(&attention_mask))?;

        Ok(classifier
            .labels()
            .iter()
            .zip(probabilities)
            .map(|(label, p)| LabelScore::new(label.clone(), p as f64))
            .collect())
    }

    fn classify_stub(&self, text: &str) -> Vec<LabelScore> {
        let hits = tokenize(text)
            .iter()
            .filter(|token| STUB_LEXICON.contains(&token.as_str()))
            .count();

        let toxic = if hits == 0 {
            0.01
        } else {
            (0.35 + 0.3 * hits as f64).min(0.99)
        };

        vec![
            LabelScore::new(TOXIC_LABEL, toxic),
            LabelScore::new(NON_TOXIC_LABEL, 1.0 - toxic),
        ]
    }
}

impl TextClassifier for ToxicityClassifier {
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ToxicityError> {
        debug!(
            text_len = text.len(),
            model_loaded = self.is_model_loaded(),
            "Classifying text for toxicity"
        );

        match &self.model {
            Some((classifier, tokenizer, device)) => {
                self.classify_with_model(text, classifier, tokenizer, device)
            }
            None => Ok(self.classify_stub(text)),
        }
    }
}
