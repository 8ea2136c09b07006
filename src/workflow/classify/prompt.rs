const PROMPT_HEADER: &str = "Categorize the following support ticket and assign a priority.\n\
Return ONLY valid JSON in this format:\n\
{\n  \"category\": \"billing|technical|account|general\",\n  \"priority\": \"low|medium|high|critical\"\n}\n\n\
Ticket description:\n";

/// Render the classification instruction for `description`.
///
/// The description is embedded verbatim; it is never parsed, so braces and
/// newlines need no escaping.
pub fn build_prompt(description: &str) -> String {
    let mut prompt = String::with_capacity(PROMPT_HEADER.len() + description.len());
    prompt.push_str(PROMPT_HEADER);
    prompt.push_str(description);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_fixed_template() {
        let prompt = build_prompt("I was charged twice.");
        assert_eq!(
            prompt,
            "Categorize the following support ticket and assign a priority.\n\
             Return ONLY valid JSON in this format:\n\
             {\n  \"category\": \"billing|technical|account|general\",\n  \"priority\": \"low|medium|high|critical\"\n}\n\n\
             Ticket description:\n\
             I was charged twice."
        );
    }

    #[test]
    fn embeds_braces_and_newlines_verbatim() {
        let description = "login fails\n{\"code\": 401}\n```";
        let prompt = build_prompt(description);
        assert!(prompt.ends_with(description));
        assert_eq!(build_prompt(description), prompt);
    }
}
