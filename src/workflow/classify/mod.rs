pub mod extract;
pub mod prompt;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::domain::classification::ClassificationResult;
use crate::domain::ticket::Vocabulary;
use crate::error::ModelError;
use crate::services::LanguageModelService;

pub use prompt::build_prompt;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Ways a single classification attempt can miss. All of them resolve to
/// [`ClassificationResult::fallback`].
#[derive(Debug, Error)]
enum ClassifyError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("response did not contain a parseable JSON object: {0}")]
    Unparseable(#[from] serde_json::Error),
    #[error("invalid category/priority in {payload}")]
    Rejected { payload: Value },
}

/// Suggests a category and priority for a ticket description.
///
/// Without a model the classifier answers with the fallback immediately.
pub struct Classifier {
    model: Option<Arc<dyn LanguageModelService>>,
    vocabulary: Vocabulary,
    timeout: Duration,
}

impl Classifier {
    pub fn new(
        model: Option<Arc<dyn LanguageModelService>>,
        vocabulary: Vocabulary,
        timeout: Duration,
    ) -> Self {
        Self {
            model,
            vocabulary,
            timeout,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    pub async fn classify(&self, description: &str) -> ClassificationResult {
        let Some(model) = &self.model else {
            debug!("no language model configured, skipping classification");
            return ClassificationResult::fallback();
        };

        match self.try_classify(model.as_ref(), description).await {
            Ok(result) => {
                debug!(
                    category = result.category(),
                    priority = result.priority(),
                    "ticket classified"
                );
                result
            }
            Err(ClassifyError::Model(err)) => {
                error!(kind = err.kind(), "classification request failed: {err}");
                ClassificationResult::fallback()
            }
            Err(err @ ClassifyError::Unparseable(_)) => {
                warn!("classification response unusable: {err}");
                ClassificationResult::fallback()
            }
            Err(ClassifyError::Rejected { payload }) => {
                warn!(%payload, "model returned invalid category/priority");
                ClassificationResult::fallback()
            }
        }
    }

    async fn try_classify(
        &self,
        model: &dyn LanguageModelService,
        description: &str,
    ) -> Result<ClassificationResult, ClassifyError> {
        let prompt = build_prompt(description);

        let raw = tokio::time::timeout(self.timeout, model.generate(&prompt, self.timeout))
            .await
            .map_err(|_| ModelError::Timeout(self.timeout))??;

        let (strategy, span) = extract::extract(&raw);
        debug!(strategy = strategy.as_str(), "extracted response payload");

        let payload: Value = serde_json::from_str(span)?;
        validate_payload(&payload, &self.vocabulary).ok_or(ClassifyError::Rejected { payload })
    }
}

/// Accept `payload` only when both `category` and `priority` are vocabulary
/// members. A single bad field rejects the whole suggestion.
pub fn validate_payload(payload: &Value, vocabulary: &Vocabulary) -> Option<ClassificationResult> {
    let category = payload.get("category")?.as_str()?;
    let priority = payload.get("priority")?.as_str()?;

    if vocabulary.accepts_category(category) && vocabulary.accepts_priority(priority) {
        Some(ClassificationResult::suggested(category, priority))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;

    enum Reply {
        Text(&'static str),
        Fail(fn() -> ModelError),
        Hang,
    }

    struct StubModel {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl StubModel {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LanguageModelService for StubModel {
        async fn generate(&self, prompt: &str, _timeout: Duration) -> Result<String, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(prompt.starts_with("Categorize the following support ticket"));
            match &self.reply {
                Reply::Text(text) => Ok((*text).to_string()),
                Reply::Fail(make) => Err(make()),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(String::new())
                }
            }
        }
    }

    fn classifier_with(model: &Arc<StubModel>) -> Classifier {
        Classifier::new(
            Some(model.clone() as Arc<dyn LanguageModelService>),
            Vocabulary::ticket_defaults(),
            DEFAULT_TIMEOUT,
        )
    }

    async fn classify_reply(reply: Reply) -> ClassificationResult {
        let model = StubModel::new(reply);
        classifier_with(&model).classify("I was charged twice this month").await
    }

    #[tokio::test]
    async fn without_model_returns_fallback() {
        let classifier = Classifier::new(None, Vocabulary::ticket_defaults(), DEFAULT_TIMEOUT);
        assert!(!classifier.is_enabled());
        assert_eq!(
            classifier.classify("anything").await,
            ClassificationResult::fallback()
        );
    }

    #[tokio::test]
    async fn accepts_fenced_json() {
        let model = StubModel::new(Reply::Text(
            "```json\n{\"category\":\"billing\",\"priority\":\"high\"}\n```",
        ));
        let result = classifier_with(&model).classify("double charge").await;
        assert_eq!(result, ClassificationResult::suggested("billing", "high"));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn parses_the_extracted_span_not_the_whole_reply() {
        let result = classify_reply(Reply::Text(
            "Here it is:\n```json\n{\"category\":\"technical\",\"priority\":\"medium\"}\n```\nSee {docs} for details.",
        ))
        .await;
        assert_eq!(result, ClassificationResult::suggested("technical", "medium"));
    }

    #[tokio::test]
    async fn invalid_priority_rejects_whole_suggestion() {
        let result = classify_reply(Reply::Text(
            "Sure! {\"category\":\"billing\",\"priority\":\"extreme\"}",
        ))
        .await;
        assert_eq!(result, ClassificationResult::fallback());
        assert_eq!(result.category(), None);
    }

    #[tokio::test]
    async fn prose_without_braces_falls_back() {
        let result = classify_reply(Reply::Text("I cannot classify this.")).await;
        assert!(result.is_fallback());
    }

    #[tokio::test]
    async fn two_objects_fall_back_cleanly() {
        let result = classify_reply(Reply::Text(
            "{\"category\":\"billing\",\"priority\":\"low\"} or maybe {\"category\":\"general\",\"priority\":\"low\"}",
        ))
        .await;
        assert!(result.is_fallback());
    }

    #[tokio::test]
    async fn missing_or_non_string_fields_fall_back() {
        assert!(classify_reply(Reply::Text("{\"category\":\"billing\"}")).await.is_fallback());
        assert!(
            classify_reply(Reply::Text("{\"category\":\"billing\",\"priority\":3}"))
                .await
                .is_fallback()
        );
        assert!(
            classify_reply(Reply::Text("[\"billing\",\"high\"]"))
                .await
                .is_fallback()
        );
    }

    #[tokio::test]
    async fn vocabulary_membership_is_case_sensitive() {
        let result = classify_reply(Reply::Text(
            "{\"category\":\"Billing\",\"priority\":\"high\"}",
        ))
        .await;
        assert!(result.is_fallback());
    }

    #[tokio::test]
    async fn model_failures_fall_back_without_retry() {
        let failures: [fn() -> ModelError; 5] = [
            || ModelError::Timeout(DEFAULT_TIMEOUT),
            || ModelError::Transport("connection reset".to_string()),
            || ModelError::Provider {
                status: StatusCode::FORBIDDEN,
                body: "API key not valid".to_string(),
            },
            || ModelError::Decode("expected value".to_string()),
            || ModelError::EmptyResponse,
        ];

        for make in failures {
            let model = StubModel::new(Reply::Fail(make));
            let result = classifier_with(&model).classify("cannot log in").await;
            assert!(result.is_fallback());
            assert_eq!(model.calls(), 1);
        }
    }

    #[tokio::test]
    async fn slow_model_is_cut_off_by_timeout() {
        let model = StubModel::new(Reply::Hang);
        let classifier = Classifier::new(
            Some(model.clone() as Arc<dyn LanguageModelService>),
            Vocabulary::ticket_defaults(),
            Duration::from_millis(20),
        );

        let started = std::time::Instant::now();
        let result = classifier.classify("site is down").await;

        assert!(result.is_fallback());
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn repeated_calls_are_identical() {
        let model = StubModel::new(Reply::Text(
            "{\"category\":\"technical\",\"priority\":\"critical\"}",
        ));
        let classifier = classifier_with(&model);

        let first = classifier.classify("database is down").await;
        let second = classifier.classify("database is down").await;

        assert_eq!(first, second);
        assert_eq!(first, ClassificationResult::suggested("technical", "critical"));
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn concurrent_calls_share_classifier() {
        let model = StubModel::new(Reply::Text(
            "{\"category\":\"account\",\"priority\":\"medium\"}",
        ));
        let classifier = Arc::new(classifier_with(&model));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let classifier = classifier.clone();
                tokio::spawn(async move { classifier.classify(&format!("reset password {i}")).await })
            })
            .collect();

        for handle in handles {
            let result = handle.await.unwrap();
            assert_eq!(result, ClassificationResult::suggested("account", "medium"));
        }
        assert_eq!(model.calls(), 8);
    }

    #[tokio::test]
    async fn vocabulary_decides_what_validates() {
        let reply = "{\"category\":\"sales\",\"priority\":\"p1\"}";

        let default_model = StubModel::new(Reply::Text(reply));
        assert!(classifier_with(&default_model).classify("quote").await.is_fallback());

        let custom_model = StubModel::new(Reply::Text(reply));
        let classifier = Classifier::new(
            Some(custom_model.clone() as Arc<dyn LanguageModelService>),
            Vocabulary::new(["sales", "support"], ["p1", "p2"]),
            DEFAULT_TIMEOUT,
        );
        assert_eq!(
            classifier.classify("quote").await,
            ClassificationResult::suggested("sales", "p1")
        );
    }

    #[test]
    fn validates_payload_against_vocabulary() {
        let vocabulary = Vocabulary::ticket_defaults();
        assert_eq!(
            validate_payload(&json!({ "category": "general", "priority": "low", "extra": 1 }), &vocabulary),
            Some(ClassificationResult::suggested("general", "low"))
        );
        assert_eq!(
            validate_payload(&json!({ "category": "general", "priority": null }), &vocabulary),
            None
        );
        assert_eq!(validate_payload(&json!("general"), &vocabulary), None);
    }
}
