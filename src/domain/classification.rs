use serde::Serialize;

use crate::error::{AppError, AppResult};

/// A ticket description that has passed the intake boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    description: String,
}

impl ClassificationRequest {
    pub fn new(description: &str) -> AppResult<Self> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput(
                "description must not be empty".to_string(),
            ));
        }
        Ok(Self {
            description: trimmed.to_string(),
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Suggested category and priority. Either both are set or neither is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    suggested_category: Option<String>,
    suggested_priority: Option<String>,
}

impl ClassificationResult {
    pub const fn fallback() -> Self {
        Self {
            suggested_category: None,
            suggested_priority: None,
        }
    }

    pub fn suggested(category: impl Into<String>, priority: impl Into<String>) -> Self {
        Self {
            suggested_category: Some(category.into()),
            suggested_priority: Some(priority.into()),
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.suggested_category.as_deref()
    }

    pub fn priority(&self) -> Option<&str> {
        self.suggested_priority.as_deref()
    }

    pub fn is_fallback(&self) -> bool {
        self.suggested_category.is_none()
    }
}

impl Default for ClassificationResult {
    fn default() -> Self {
        Self::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_trims_description() {
        let request = ClassificationRequest::new("  printer is on fire \n").unwrap();
        assert_eq!(request.description(), "printer is on fire");
    }

    #[test]
    fn request_rejects_blank_description() {
        assert!(matches!(
            ClassificationRequest::new(" \t\n"),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn fallback_serializes_both_keys_as_null() {
        let json = serde_json::to_value(ClassificationResult::fallback()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "suggested_category": null, "suggested_priority": null })
        );
    }

    #[test]
    fn suggestion_serializes_both_keys() {
        let result = ClassificationResult::suggested("billing", "high");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "suggested_category": "billing", "suggested_priority": "high" })
        );
        assert!(!result.is_fallback());
    }
}
