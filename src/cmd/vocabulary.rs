use crate::domain::ticket::{Category, Priority, Status};

/// Render the accepted ticket tokens, one `token (Label)` per line.
pub fn render() -> String {
    let mut out = String::new();
    section(&mut out, "Categories", Category::ALL.iter().map(|c| (c.as_str(), c.label())));
    section(&mut out, "Priorities", Priority::ALL.iter().map(|p| (p.as_str(), p.label())));
    section(&mut out, "Statuses", Status::ALL.iter().map(|s| (s.as_str(), s.label())));
    out
}

fn section<'a>(out: &mut String, title: &str, entries: impl Iterator<Item = (&'a str, &'a str)>) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(title);
    out.push_str(":\n");
    for (token, label) in entries {
        out.push_str(&format!("  {token} ({label})\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_section() {
        let rendered = render();
        assert!(rendered.starts_with("Categories:\n  billing (Billing)\n"));
        assert!(rendered.contains("Priorities:\n  low (Low)\n"));
        assert!(rendered.contains("  in_progress (In Progress)\n"));
    }
}
