//! Bounded polling for the asynchronous lead-enrichment stage.
//!
//! Lead search returns immediately with a correlation id while the backend
//! enriches prospects in the background. [`poll_enrichment`] checks the
//! preview endpoint on a fixed interval with a hard attempt ceiling; attempts
//! are strictly sequential — the next one is scheduled only after the
//! previous response (or failure) has been fully handled.

use std::time::Duration;

use outflow_core::AppConfig;

use crate::client::CampaignApiClient;
use crate::types::Lead;

/// Tuning for the enrichment poll loop.
#[derive(Debug, Clone)]
pub struct LeadPollConfig {
    /// Delay between attempts.
    pub interval: Duration,
    /// Hard ceiling on attempts; acts as the loop's built-in timeout.
    pub max_attempts: u32,
}

impl LeadPollConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.lead_poll_interval_ms),
            max_attempts: config.lead_poll_max_attempts,
        }
    }
}

impl Default for LeadPollConfig {
    fn default() -> Self {
        // 24 × 5 s ≈ two minutes, matching the backend's typical enrichment time.
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 24,
        }
    }
}

/// How a poll loop ended.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// Enrichment finished; at least one lead is ready.
    Complete(Vec<Lead>),
    /// The attempt ceiling was reached. Carries whatever leads the last
    /// attempt saw (possibly none); the caller decides whether that is
    /// enough to proceed.
    Exhausted { leads: Vec<Lead>, attempts: u32 },
}

/// Poll the lead preview endpoint until enrichment completes or the attempt
/// ceiling is reached.
///
/// Transport and API errors consume an attempt and are logged rather than
/// propagated — a flaky poll must not abort the whole search, and the
/// ceiling bounds the total wait either way.
pub async fn poll_enrichment(
    client: &CampaignApiClient,
    enrichment_id: &str,
    limit: u32,
    config: &LeadPollConfig,
) -> PollOutcome {
    let mut last_seen: Vec<Lead> = Vec::new();

    for attempt in 1..=config.max_attempts {
        match client.lead_preview(enrichment_id, limit).await {
            Ok(preview) => {
                if preview.success && !preview.leads.is_empty() {
                    tracing::info!(
                        enrichment_id,
                        attempt,
                        leads = preview.leads.len(),
                        "lead enrichment complete"
                    );
                    return PollOutcome::Complete(preview.leads);
                }
                if preview.enriching_count > 0 {
                    tracing::debug!(
                        enrichment_id,
                        attempt,
                        enriching = preview.enriching_count,
                        "leads found, contact enrichment still running"
                    );
                }
                last_seen = preview.leads;
            }
            Err(err) => {
                tracing::warn!(
                    enrichment_id,
                    attempt,
                    max_attempts = config.max_attempts,
                    error = %err,
                    "lead preview attempt failed"
                );
            }
        }

        if attempt < config.max_attempts {
            tokio::time::sleep(config.interval).await;
        }
    }

    tracing::warn!(
        enrichment_id,
        attempts = config.max_attempts,
        leads = last_seen.len(),
        "lead enrichment polling ceiling reached"
    );
    PollOutcome::Exhausted {
        leads: last_seen,
        attempts: config.max_attempts,
    }
}
