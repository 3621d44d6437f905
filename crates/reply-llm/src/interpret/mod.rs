//! Turning a `CompletionResult` into suggestions or a single text.

mod candidate;
mod suggestions;
mod text;

pub use candidate::{evaluate_candidate, evaluate_result, CandidateIssue, EvaluationContext};
pub use suggestions::parse_suggestions;
pub use text::parse_single_text;

use crate::types::CompletionResult;

/// Evaluate the result and parse the accepted candidate as a suggestion list.
///
/// A candidate without text yields an empty list; the caller decides whether
/// that is an error.
pub fn interpret_suggestions(
    result: &CompletionResult,
    context: &EvaluationContext<'_>,
) -> Result<Vec<String>, CandidateIssue> {
    let candidate = evaluate_result(result, context)?;
    Ok(candidate
        .text
        .as_deref()
        .map(parse_suggestions)
        .unwrap_or_default())
}

/// Evaluate the result and return the accepted candidate's trimmed text.
pub fn interpret_text(
    result: &CompletionResult,
    context: &EvaluationContext<'_>,
) -> Result<String, CandidateIssue> {
    let candidate = evaluate_result(result, context)?;
    Ok(candidate
        .text
        .as_deref()
        .map(parse_single_text)
        .unwrap_or_default())
}
