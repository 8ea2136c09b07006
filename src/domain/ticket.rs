#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Billing,
    Technical,
    Account,
    General,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Billing,
        Category::Technical,
        Category::Account,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Billing => "billing",
            Category::Technical => "technical",
            Category::Account => "account",
            Category::General => "general",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Billing => "Billing",
            Category::Technical => "Technical",
            Category::Account => "Account",
            Category::General => "General",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Open,
        Status::InProgress,
        Status::Resolved,
        Status::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
            Status::Closed => "Closed",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

/// Accepted category and priority tokens, in display order.
///
/// The classifier only reads these; membership is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    categories: Vec<String>,
    priorities: Vec<String>,
}

impl Vocabulary {
    pub fn new<C, P>(categories: C, priorities: P) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            categories: dedup(categories.into_iter().map(Into::into)),
            priorities: dedup(priorities.into_iter().map(Into::into)),
        }
    }

    pub fn ticket_defaults() -> Self {
        Self::new(
            Category::ALL.iter().map(Category::as_str),
            Priority::ALL.iter().map(Priority::as_str),
        )
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn priorities(&self) -> &[String] {
        &self.priorities
    }

    pub fn accepts_category(&self, value: &str) -> bool {
        self.categories.iter().any(|c| c == value)
    }

    pub fn accepts_priority(&self, value: &str) -> bool {
        self.priorities.iter().any(|p| p == value)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::ticket_defaults()
    }
}

fn dedup(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tokens_exactly() {
        assert_eq!(Category::from_str("billing"), Some(Category::Billing));
        assert_eq!(Category::from_str("Billing"), None);
        assert_eq!(Priority::from_str("critical"), Some(Priority::Critical));
        assert_eq!(Priority::from_str(" high"), None);
        assert_eq!(Status::from_str("in_progress"), Some(Status::InProgress));
        assert_eq!(Status::default(), Status::Open);
    }

    #[test]
    fn default_vocabulary_matches_ticket_model() {
        let vocabulary = Vocabulary::ticket_defaults();
        assert_eq!(
            vocabulary.categories(),
            ["billing", "technical", "account", "general"]
        );
        assert_eq!(vocabulary.priorities(), ["low", "medium", "high", "critical"]);
        assert!(vocabulary.accepts_category("account"));
        assert!(!vocabulary.accepts_category("ACCOUNT"));
        assert!(!vocabulary.accepts_priority("extreme"));
    }

    #[test]
    fn custom_vocabulary_keeps_order_and_drops_duplicates() {
        let vocabulary = Vocabulary::new(["sales", "ops", "sales"], ["p1", "p2"]);
        assert_eq!(vocabulary.categories(), ["sales", "ops"]);
        assert!(vocabulary.accepts_priority("p2"));
        assert!(!vocabulary.accepts_category("billing"));
    }
}
