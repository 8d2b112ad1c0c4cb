use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Emotion categories the engine understands. Anything the model emits
/// outside this set folds to `Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Sadness,
    Joy,
    Anger,
    Fear,
    Surprise,
    Love,
    Neutral,
}

impl EmotionLabel {
    pub fn from_model_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "sadness" => Self::Sadness,
            "joy" => Self::Joy,
            "anger" => Self::Anger,
            "fear" => Self::Fear,
            "surprise" => Self::Surprise,
            "love" => Self::Love,
            _ => Self::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sadness => "sadness",
            Self::Joy => "joy",
            Self::Anger => "anger",
            Self::Fear => "fear",
            Self::Surprise => "surprise",
            Self::Love => "love",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polarity labels, serialized the way the sst-2 model spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn from_model_label(label: &str) -> Self {
        match label.to_ascii_uppercase().as_str() {
            "POSITIVE" => Self::Positive,
            "NEGATIVE" => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

/// Polarity plus classifier confidence. The score is how sure the model
/// is of the label, not how strong the sentiment is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f64,
}

impl Sentiment {
    /// Fixed value used whenever sentiment analysis is unavailable.
    pub fn neutral_fallback() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.5,
        }
    }
}

/// One (label, score) pair from a classification head.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredLabel {
    pub label: String,
    pub score: f64,
}

#[async_trait]
pub trait EmotionModel: Send + Sync {
    /// Returns the model's score for each emotion label it knows.
    async fn classify(&self, text: &str) -> Result<Vec<ScoredLabel>>;
}

#[async_trait]
pub trait SentimentModel: Send + Sync {
    /// Returns the model's best polarity label with its confidence.
    async fn analyze(&self, text: &str) -> Result<ScoredLabel>;
}

// -----------------------------------------------------------------------------
// Hugging Face inference backends
// -----------------------------------------------------------------------------

const DEFAULT_API_BASE: &str = "https://api-inference.huggingface.co/models";
pub const EMOTION_MODEL_ID: &str = "bhadresh-savani/distilbert-base-uncased-emotion";
pub const SENTIMENT_MODEL_ID: &str = "distilbert-base-uncased-finetuned-sst-2-english";

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Text-classification call against a hosted inference endpoint. Used for
/// both models; they differ only in the model id baked into the URL.
#[derive(Clone)]
pub struct HfTextClassifier {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl HfTextClassifier {
    pub fn new(
        client: reqwest::Client,
        api_base: &str,
        model_id: &str,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: format!("{}/{}", api_base.trim_end_matches('/'), model_id),
            token: token.into(),
        }
    }

    async fn request(&self, text: &str) -> Result<Vec<ScoredLabel>> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&InferenceRequest { inputs: text })
            .send()
            .await
            .context("inference request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("inference API returned {}", status);
        }

        // The API wraps results in one array per input sequence.
        let batches: Vec<Vec<ScoredLabel>> = response
            .json()
            .await
            .context("failed to decode inference response")?;

        batches
            .into_iter()
            .next()
            .context("inference response contained no results")
    }
}

#[async_trait]
impl EmotionModel for HfTextClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<ScoredLabel>> {
        self.request(text).await
    }
}

#[async_trait]
impl SentimentModel for HfTextClassifier {
    async fn analyze(&self, text: &str) -> Result<ScoredLabel> {
        // Labels come back sorted by score, best first.
        self.request(text)
            .await?
            .into_iter()
            .next()
            .context("inference response contained no labels")
    }
}

// -----------------------------------------------------------------------------
// Adapter
// -----------------------------------------------------------------------------

/// Wraps the two models and absorbs every failure into fixed fallbacks.
/// Callers never see a classification error: a missing backend, a failed
/// call, or an empty result all come back as the neutral defaults.
pub struct Classifiers {
    emotion: Option<Arc<dyn EmotionModel>>,
    sentiment: Option<Arc<dyn SentimentModel>>,
}

impl Classifiers {
    pub fn new(
        emotion: Option<Arc<dyn EmotionModel>>,
        sentiment: Option<Arc<dyn SentimentModel>>,
    ) -> Self {
        Self { emotion, sentiment }
    }

    /// Builds API-backed classifiers from the environment. Without
    /// HF_API_TOKEN both models are disabled and every request gets the
    /// neutral fallback.
    pub fn from_env() -> Self {
        let token = match std::env::var("HF_API_TOKEN") {
            Ok(token) if !token.is_empty() => token,
            _ => {
                warn!("HF_API_TOKEN not set, emotion and sentiment classification disabled");
                return Self::disabled();
            }
        };
        let api_base =
            std::env::var("HF_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let client = reqwest::Client::new();
        let emotion =
            HfTextClassifier::new(client.clone(), &api_base, EMOTION_MODEL_ID, token.clone());
        let sentiment = HfTextClassifier::new(client, &api_base, SENTIMENT_MODEL_ID, token);

        Self::new(Some(Arc::new(emotion)), Some(Arc::new(sentiment)))
    }

    pub fn disabled() -> Self {
        Self::new(None, None)
    }

    pub async fn detect_emotion(&self, text: &str) -> EmotionLabel {
        let Some(model) = &self.emotion else {
            return EmotionLabel::Neutral;
        };

        match model.classify(text).await {
            Ok(scored) => resolve_emotion(&scored),
            Err(e) => {
                warn!("emotion classification failed: {:#}", e);
                EmotionLabel::Neutral
            }
        }
    }

    pub async fn analyze_sentiment(&self, text: &str) -> Sentiment {
        let Some(model) = &self.sentiment else {
            return Sentiment::neutral_fallback();
        };

        match model.analyze(text).await {
            Ok(top) => Sentiment {
                label: SentimentLabel::from_model_label(&top.label),
                score: top.score.clamp(0.0, 1.0),
            },
            Err(e) => {
                warn!("sentiment analysis failed: {:#}", e);
                Sentiment::neutral_fallback()
            }
        }
    }
}

/// Max-score label wins. On equal scores the first-seen label is kept, so
/// the model's own output order decides ties.
fn resolve_emotion(scored: &[ScoredLabel]) -> EmotionLabel {
    let mut best: Option<&ScoredLabel> = None;
    for candidate in scored {
        if best.map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }

    best.map(|top| EmotionLabel::from_model_label(&top.label))
        .unwrap_or(EmotionLabel::Neutral)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(pairs: &[(&str, f64)]) -> Vec<ScoredLabel> {
        pairs
            .iter()
            .map(|(label, score)| ScoredLabel {
                label: label.to_string(),
                score: *score,
            })
            .collect()
    }

    #[test]
    fn resolve_picks_max_score() {
        let labels = scored(&[("sadness", 0.1), ("joy", 0.7), ("anger", 0.2)]);
        assert_eq!(resolve_emotion(&labels), EmotionLabel::Joy);
    }

    #[test]
    fn resolve_keeps_first_label_on_tie() {
        let labels = scored(&[("fear", 0.4), ("anger", 0.4), ("joy", 0.2)]);
        assert_eq!(resolve_emotion(&labels), EmotionLabel::Fear);
    }

    #[test]
    fn resolve_empty_distribution_is_neutral() {
        assert_eq!(resolve_emotion(&[]), EmotionLabel::Neutral);
    }

    #[test]
    fn unknown_model_label_folds_to_neutral() {
        assert_eq!(
            EmotionLabel::from_model_label("disgust"),
            EmotionLabel::Neutral
        );
        assert_eq!(EmotionLabel::from_model_label("JOY"), EmotionLabel::Joy);
    }

    #[test]
    fn sentiment_label_parsing_is_case_insensitive() {
        assert_eq!(
            SentimentLabel::from_model_label("negative"),
            SentimentLabel::Negative
        );
        assert_eq!(
            SentimentLabel::from_model_label("something-else"),
            SentimentLabel::Neutral
        );
    }

    #[tokio::test]
    async fn disabled_classifiers_return_fallbacks() {
        let classifiers = Classifiers::disabled();
        assert_eq!(
            classifiers.detect_emotion("anything").await,
            EmotionLabel::Neutral
        );
        assert_eq!(
            classifiers.analyze_sentiment("anything").await,
            Sentiment::neutral_fallback()
        );
    }

    struct BrokenModel;

    #[async_trait]
    impl EmotionModel for BrokenModel {
        async fn classify(&self, _text: &str) -> Result<Vec<ScoredLabel>> {
            anyhow::bail!("model exploded")
        }
    }

    #[async_trait]
    impl SentimentModel for BrokenModel {
        async fn analyze(&self, _text: &str) -> Result<ScoredLabel> {
            anyhow::bail!("model exploded")
        }
    }

    #[tokio::test]
    async fn failing_models_are_absorbed_into_fallbacks() {
        let classifiers = Classifiers::new(Some(Arc::new(BrokenModel)), Some(Arc::new(BrokenModel)));
        assert_eq!(
            classifiers.detect_emotion("hello").await,
            EmotionLabel::Neutral
        );
        assert_eq!(
            classifiers.analyze_sentiment("hello").await,
            Sentiment::neutral_fallback()
        );
    }

    #[test]
    fn emotion_label_serializes_lowercase() {
        let json = serde_json::to_string(&EmotionLabel::Sadness).unwrap();
        assert_eq!(json, "\"sadness\"");
    }

    #[test]
    fn sentiment_label_serializes_uppercase() {
        let json = serde_json::to_string(&SentimentLabel::Negative).unwrap();
        assert_eq!(json, "\"NEGATIVE\"");
    }
}
