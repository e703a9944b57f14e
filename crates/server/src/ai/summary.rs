//! Plain-language trial summaries

use std::borrow::Cow;

use trialfinder_core::TrialDetails;

use super::client::{CompletionOptions, OpenAiClient};
use crate::error::ProviderError;

const SYSTEM_PROMPT: &str = r#"You are a helpful medical communicator who explains clinical trials to patients and their families in plain language.

Avoid medical jargon. When a technical term is unavoidable, explain it in simple words.

Structure every answer into these sections:
1. What is being studied
2. Who can participate
3. What participants will do
4. Possible benefits and risks"#;

/// Criteria text beyond this many characters is cut from the prompt
pub const CRITERIA_EXCERPT_CHARS: usize = 500;

const SUMMARY_OPTIONS: CompletionOptions = CompletionOptions {
    max_tokens: 500,
    temperature: 0.7,
};

/// First `max_chars` characters of `text`, with `...` appended when cut
fn excerpt(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// Build the user prompt for a trial
pub fn build_prompt(details: &TrialDetails) -> String {
    let eligibility = &details.eligibility;
    let criteria = excerpt(eligibility.criteria.trim(), CRITERIA_EXCERPT_CHARS);

    format!(
        "Please explain this clinical trial in simple terms:\n\n\
         Title: {}\n\
         Condition: {}\n\
         Description: {}\n\
         Eligibility: {} participants, ages {} to {}\n\
         Criteria (excerpt): {}",
        details.title.trim(),
        details.condition.trim(),
        details.description.trim(),
        eligibility.gender,
        eligibility.min_age,
        eligibility.max_age,
        criteria,
    )
}

/// Ask the LLM provider for a plain-language summary of a trial
pub async fn summarize(
    client: &OpenAiClient,
    details: &TrialDetails,
) -> Result<String, ProviderError> {
    let prompt = build_prompt(details);

    tracing::debug!(
        model = client.model(),
        prompt_bytes = prompt.len(),
        "Requesting trial summary"
    );

    client.complete(SYSTEM_PROMPT, &prompt, SUMMARY_OPTIONS).await
}
