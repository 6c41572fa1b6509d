//! The campaign-creation wizard: a client-side state machine over the Remote
//! Campaign API.
//!
//! [`WizardController`] owns the whole in-progress draft — form inputs, the
//! selected Ideal Customer Profile, sourced leads, email variants, chosen
//! sending identities — and advances through six linear steps, one network
//! operation per forward transition. Streamed campaign creation runs through
//! a pull-based event loop that pauses on [`ConfirmationGate`] requests and
//! can be cancelled idempotently at any point.
//!
//! Views are expected to be pure projections of [`WizardState`]; nothing in
//! this crate renders anything.

pub mod controller;
pub mod error;
pub mod gate;
pub mod linkedin;
pub mod progress;
pub mod state;
pub mod stats;

pub use controller::{
    CampaignProgress, LeadSearchOutcome, VariantField, WizardController, WizardOptions,
};
pub use error::WizardError;
pub use gate::{ConfirmationGate, ConfirmationKind, ConfirmationPending, ConfirmationRequest};
pub use linkedin::{LinkedinFlow, LinkedinLauncher};
pub use progress::{ProgressBoard, ProgressStep};
pub use state::{CampaignDraft, WizardState, WizardStep};
pub use stats::{summarize, CampaignStats};
