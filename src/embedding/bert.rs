use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use candle::{D, DType, Device, IndexOp, Result, Tensor};
use candle_core as candle;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use serde::Deserialize;

/// How logits become label probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Independent per-label probabilities (multi-label heads such as toxic-bert).
    Sigmoid,
    /// A single distribution over all labels.
    Softmax,
}

#[derive(Debug, Default, Deserialize)]
struct HeadMetadata {
    #[serde(default)]
    id2label: BTreeMap<String, String>,
    #[serde(default)]
    problem_type: Option<String>,
}

impl HeadMetadata {
    fn labels(&self) -> Vec<String> {
        let mut indexed: Vec<(usize, &String)> = self
            .id2label
            .iter()
            .filter_map(|(id, label)| id.parse::<usize>().ok().map(|id| (id, label)))
            .collect();
        indexed.sort_by_key(|(id, _)| *id);
        indexed.into_iter().map(|(_, label)| label.clone()).collect()
    }

    fn activation(&self) -> Activation {
        match self.problem_type.as_deref() {
            Some("multi_label_classification") => Activation::Sigmoid,
            _ => Activation::Softmax,
        }
    }
}

struct SequenceClassificationHead {
    bert: BertModel,
    pooler: Option<Linear>,
    classifier: Linear,
}

impl SequenceClassificationHead {
    fn load(vb: VarBuilder, config: &Config, num_labels: usize) -> Result<Self> {
        let bert_vb = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            vb.pp("bert")
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            vb.pp("roberta")
        } else {
            vb.clone()
        };

        let hidden_size = config.hidden_size;
        let pooler = if bert_vb.contains_tensor("pooler.dense.weight") {
            Some(candle_nn::linear(
                hidden_size,
                hidden_size,
                bert_vb.pp("pooler").pp("dense"),
            )?)
        } else {
            None
        };
        let bert = BertModel::load(bert_vb, config)?;
        let classifier = candle_nn::linear(hidden_size, num_labels, vb.pp("classifier"))?;

        Ok(Self {
            bert,
            pooler,
            classifier,
        })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let output = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = output.i((.., 0, ..))?;
        let pooled = match &self.pooler {
            Some(dense) => dense.forward(&cls_token)?.tanh()?,
            None => cls_token,
        };
        self.classifier.forward(&pooled)
    }
}

/// BERT encoder + sequence-classification head, loaded from a Hugging Face model directory.
#[derive(Clone)]
pub struct BertSequenceClassifier {
    head: Arc<SequenceClassificationHead>,
    labels: Arc<[String]>,
    activation: Activation,
}

impl BertSequenceClassifier {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let weights_path = model_dir.join("model.safetensors");

        let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;
        let metadata: HeadMetadata = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse label metadata: {}", e)))?;

        let labels = metadata.labels();
        if labels.is_empty() {
            return Err(candle::Error::Msg(
                "config.json declares no id2label entries".to_string(),
            ));
        }

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        let head = SequenceClassificationHead::load(vb, &config, labels.len())?;

        Ok(Self {
            head: Arc::new(head),
            labels: labels.into(),
            activation: metadata.activation(),
        })
    }

    /// Label names in output order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Returns one probability per label for a single encoded input (`[1, seq_len]` tensors).
    pub fn probabilities(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Vec<f32>> {
        let logits = self
            .head
            .forward(input_ids, token_type_ids, attention_mask)?;
        let probs = match self.activation {
            Activation::Sigmoid => candle_nn::ops::sigmoid(&logits)?,
            Activation::Softmax => candle_nn::ops::softmax(&logits, D::Minus1)?,
        };
        probs.squeeze(0)?.to_vec1::<f32>()
    }
}
