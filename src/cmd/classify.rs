use std::io::{self, Read};

use crate::context::AppContext;
use crate::domain::classification::{ClassificationRequest, ClassificationResult};
use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct ClassifyCommandArgs {
    pub description: Option<String>,
}

pub async fn run(ctx: &AppContext, args: ClassifyCommandArgs) -> AppResult<ClassificationResult> {
    let description = match args.description {
        Some(description) => description,
        None => read_stdin()?,
    };
    let request = ClassificationRequest::new(&description)?;
    Ok(ctx.classifier.classify(request.description()).await)
}

fn read_stdin() -> AppResult<String> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::{AppConfig, LlmProvider};
    use crate::error::AppError;

    fn offline_context() -> AppContext {
        AppContext::from_config(AppConfig {
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            llm_provider: LlmProvider::Gemini,
            request_timeout: Duration::from_secs(10),
        })
    }

    #[tokio::test]
    async fn blank_description_is_rejected_at_the_boundary() {
        let result = run(
            &offline_context(),
            ClassifyCommandArgs {
                description: Some("   ".to_string()),
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn offline_context_returns_fallback() {
        let result = run(
            &offline_context(),
            ClassifyCommandArgs {
                description: Some("Refund has not arrived".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(result, ClassificationResult::fallback());
    }
}
