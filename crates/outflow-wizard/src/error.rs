use thiserror::Error;

use outflow_api::ApiError;

use crate::gate::ConfirmationPending;

/// Errors surfaced by wizard operations.
///
/// Every error leaves the wizard in a deterministic state: either unchanged
/// (validation, timeout) or rolled back to the step that was active before
/// the failed call. [`WizardError::Cancelled`] is deliberately separate from
/// the failure variants so callers can show a neutral notice instead of an
/// error.
#[derive(Debug, Error)]
pub enum WizardError {
    /// Missing or invalid user input; reported before any network call.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    ConfirmationPending(#[from] ConfirmationPending),

    /// A long-running request exceeded its deadline. Distinguished from
    /// generic transport failure so the caller can suggest retrying.
    #[error("the {operation} request timed out")]
    Timeout { operation: &'static str },

    /// The enrichment poll ceiling was reached and the proceed-anyway policy
    /// is disabled.
    #[error("lead enrichment did not finish within the polling window")]
    EnrichmentTimedOut,

    /// The campaign-creation stream reported a terminal error or ended
    /// without confirming the campaign.
    #[error("campaign creation failed: {0}")]
    CampaignFailed(String),

    /// The user stopped the operation; not a failure.
    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Api(#[from] ApiError),
}
