//! Classification of provider candidates before their text is parsed.

use thiserror::Error;

use crate::types::{Candidate, CompletionResult, FinishReason};

/// Provider-side reasons a completion cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateIssue {
    #[error("The provider returned no candidate")]
    NoResponse,

    #[error("Blocked by safety filters: {}", .categories.join(", "))]
    SafetyBlocked { categories: Vec<String> },

    #[error("Generation was stopped by safety filters")]
    SafetyStopped,

    #[error("Generation was blocked for reciting existing material")]
    RecitationBlocked,

    #[error("{activity} output hit the {limit}-token limit (maxOutputTokens = {limit}); shorten the input and retry")]
    TruncatedOutput { activity: String, limit: u32 },
}

/// Settings the evaluation needs to word its issues.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub max_output_tokens: u32,
    pub activity_label: &'a str,
}

/// Check one candidate. On success the candidate is handed back for extraction.
pub fn evaluate_candidate<'c>(
    candidate: Option<&'c Candidate>,
    context: &EvaluationContext<'_>,
) -> Result<&'c Candidate, CandidateIssue> {
    let candidate = candidate.ok_or(CandidateIssue::NoResponse)?;

    let categories = candidate.blocked_categories();
    if !categories.is_empty() {
        return Err(CandidateIssue::SafetyBlocked { categories });
    }

    match candidate.finish_reason {
        Some(FinishReason::MaxTokens) => Err(CandidateIssue::TruncatedOutput {
            activity: context.activity_label.to_string(),
            limit: context.max_output_tokens,
        }),
        Some(FinishReason::Safety) => Err(CandidateIssue::SafetyStopped),
        Some(FinishReason::Recitation) => Err(CandidateIssue::RecitationBlocked),
        _ => Ok(candidate),
    }
}

/// Check a whole result: a prompt-level block wins, otherwise the first candidate is evaluated.
pub fn evaluate_result<'r>(
    result: &'r CompletionResult,
    context: &EvaluationContext<'_>,
) -> Result<&'r Candidate, CandidateIssue> {
    if result.candidates.is_empty() {
        if let Some(reason) = &result.prompt_block_reason {
            return Err(CandidateIssue::SafetyBlocked {
                categories: vec![reason.clone()],
            });
        }
    }
    evaluate_candidate(result.first(), context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SafetyRating;

    const CONTEXT: EvaluationContext<'static> = EvaluationContext {
        max_output_tokens: 1024,
        activity_label: "Reply generation",
    };

    fn finished(reason: FinishReason) -> Candidate {
        Candidate {
            text: Some("[]".to_string()),
            finish_reason: Some(reason),
            safety_ratings: Vec::new(),
        }
    }

    #[test]
    fn absent_candidate_is_no_response() {
        assert_eq!(evaluate_candidate(None, &CONTEXT), Err(CandidateIssue::NoResponse));
    }

    #[test]
    fn max_tokens_names_the_ceiling() {
        for limit in [1, 256, 1024, 8192] {
            let context = EvaluationContext {
                max_output_tokens: limit,
                activity_label: "Proofreading",
            };
            let issue = evaluate_candidate(Some(&finished(FinishReason::MaxTokens)), &context)
                .unwrap_err();
            assert!(issue.to_string().contains(&limit.to_string()), "{issue}");
            assert!(issue.to_string().contains("Proofreading"));
        }
    }

    #[test]
    fn safety_and_recitation_finishes() {
        assert_eq!(
            evaluate_candidate(Some(&finished(FinishReason::Safety)), &CONTEXT),
            Err(CandidateIssue::SafetyStopped)
        );
        assert_eq!(
            evaluate_candidate(Some(&finished(FinishReason::Recitation)), &CONTEXT),
            Err(CandidateIssue::RecitationBlocked)
        );
    }

    #[test]
    fn blocked_rating_wins_over_finish_reason() {
        let mut candidate = finished(FinishReason::MaxTokens);
        candidate.safety_ratings.push(SafetyRating {
            category: "HARM_CATEGORY_DANGEROUS_CONTENT".to_string(),
            probability: Some("HIGH".to_string()),
            blocked: true,
        });
        assert_eq!(
            evaluate_candidate(Some(&candidate), &CONTEXT),
            Err(CandidateIssue::SafetyBlocked {
                categories: vec!["HARM_CATEGORY_DANGEROUS_CONTENT".to_string()]
            })
        );
    }

    #[test]
    fn stop_other_and_missing_reasons_pass() {
        for reason in [
            Some(FinishReason::Stop),
            Some(FinishReason::Other("FINISH_REASON_UNSPECIFIED".to_string())),
            None,
        ] {
            let candidate = Candidate {
                finish_reason: reason,
                ..finished(FinishReason::Stop)
            };
            assert!(evaluate_candidate(Some(&candidate), &CONTEXT).is_ok());
        }
    }

    #[test]
    fn prompt_block_without_candidates_is_safety_blocked() {
        let result = CompletionResult {
            candidates: Vec::new(),
            prompt_block_reason: Some("OTHER".to_string()),
        };
        assert_eq!(
            evaluate_result(&result, &CONTEXT),
            Err(CandidateIssue::SafetyBlocked {
                categories: vec!["OTHER".to_string()]
            })
        );
        assert_eq!(
            evaluate_result(&CompletionResult::default(), &CONTEXT),
            Err(CandidateIssue::NoResponse)
        );
    }
}
