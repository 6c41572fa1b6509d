//! Typed HTTP client for the Remote Campaign API.
//!
//! The backend owns all substantive work — AI copywriting, lead sourcing and
//! enrichment, campaign creation in the email-sending platform, LinkedIn
//! messaging, domain purchasing. This crate only models its request/response
//! contracts: one typed method per endpoint on [`CampaignApiClient`], a
//! Server-Sent-Events reader ([`sse::EventStream`]) for the streamed
//! campaign-creation endpoints, and a bounded poller
//! ([`poll::poll_enrichment`]) for the asynchronous lead-enrichment stage.

pub mod client;
pub mod error;
pub mod poll;
pub mod sse;
pub mod types;

pub use client::CampaignApiClient;
pub use error::ApiError;
pub use poll::{poll_enrichment, LeadPollConfig, PollOutcome};
pub use sse::{
    CampaignCreated, CampaignEvent, CancelToken, EventStream, Frame, FrameDecoder,
    LeadConfirmation, ProgressUpdate, SseError, StepStatus,
};
