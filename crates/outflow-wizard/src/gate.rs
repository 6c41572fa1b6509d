//! The confirmation gate: a single blocking prompt that pauses forward
//! progress until the user accepts or rejects.
//!
//! The gate holds at most one pending request and never times out on its
//! own. Requesting a second confirmation while one is open is rejected —
//! deterministically, rather than queueing or replacing — so a misbehaving
//! caller cannot silently drop a prompt the user is looking at.

use thiserror::Error;

use outflow_api::types::Lead;

/// What the pending confirmation is about. Each kind carries only the data
/// its resolution needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationKind {
    /// Sign-off before the cost-incurring campaign-creation call is made.
    CostWarning,
    /// Mid-stream approval of the scraped lead list; the server holds the
    /// session open under `session_id` until it is resolved.
    LeadApproval {
        lead_list_id: String,
        leads: Vec<Lead>,
        session_id: String,
    },
}

/// A prompt awaiting explicit user consent.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationRequest {
    pub title: String,
    pub message: String,
    pub estimated_cost: Option<String>,
    pub kind: ConfirmationKind,
}

/// Returned when a confirmation is requested while another is pending.
#[derive(Debug, Error)]
#[error("a confirmation is already pending")]
pub struct ConfirmationPending;

/// Holds the single pending [`ConfirmationRequest`]. The rendering layer
/// displays it; the controller resolves it.
#[derive(Debug, Default)]
pub struct ConfirmationGate {
    pending: Option<ConfirmationRequest>,
}

impl ConfirmationGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a pending request.
    ///
    /// # Errors
    ///
    /// Rejected with [`ConfirmationPending`] while another request is open.
    pub fn request(&mut self, request: ConfirmationRequest) -> Result<(), ConfirmationPending> {
        if self.pending.is_some() {
            return Err(ConfirmationPending);
        }
        self.pending = Some(request);
        Ok(())
    }

    #[must_use]
    pub fn pending(&self) -> Option<&ConfirmationRequest> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending request. The gate is cleared before the caller runs
    /// any continuation, so a continuation may immediately request again.
    pub fn resolve(&mut self) -> Option<ConfirmationRequest> {
        self.pending.take()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost_request() -> ConfirmationRequest {
        ConfirmationRequest {
            title: "Create campaign".to_owned(),
            message: "This will incur API costs.".to_owned(),
            estimated_cost: Some("est. $0.10 - $5.00".to_owned()),
            kind: ConfirmationKind::CostWarning,
        }
    }

    #[test]
    fn second_request_is_rejected_while_pending() {
        let mut gate = ConfirmationGate::new();
        gate.request(cost_request()).expect("first request accepted");
        assert!(gate.request(cost_request()).is_err());
        assert!(gate.is_pending());
    }

    #[test]
    fn resolve_clears_before_continuation() {
        let mut gate = ConfirmationGate::new();
        gate.request(cost_request()).expect("request accepted");
        let taken = gate.resolve().expect("request present");
        assert_eq!(taken.kind, ConfirmationKind::CostWarning);
        assert!(!gate.is_pending());
        // The continuation may open the next gate right away.
        gate.request(cost_request()).expect("gate reusable after resolve");
    }

    #[test]
    fn resolve_on_empty_gate_is_none() {
        let mut gate = ConfirmationGate::new();
        assert!(gate.resolve().is_none());
    }
}
