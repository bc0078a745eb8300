use crate::models::SubmissionResult;
use crate::state::SharedState;

use super::parser::RawSubmission;
use super::rules;

/// Validate and deliver one submission. Always produces an application-level
/// result; the caller decides how to serialize it.
pub async fn run(state: &SharedState, raw: RawSubmission) -> SubmissionResult {
    let payload = match rules::validate(&raw) {
        Ok(payload) => payload,
        Err(errors) => {
            tracing::debug!("Submission rejected: {:?}", errors.keys().collect::<Vec<_>>());
            return SubmissionResult::rejected(errors);
        }
    };

    let Some(dispatcher) = &state.dispatcher else {
        tracing::error!("Submission received but no mail transport is configured");
        return SubmissionResult::unavailable();
    };

    match dispatcher.dispatch(&payload).await {
        Ok(()) => {
            tracing::info!(project = %payload.project_name, "Application relayed");
            SubmissionResult::accepted()
        }
        Err(e) => {
            tracing::error!("Delivery failed: {e}");
            SubmissionResult::failed(&e)
        }
    }
}
