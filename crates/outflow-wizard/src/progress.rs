//! Progress display state for streamed campaign creation.

use outflow_api::{ProgressUpdate, StepStatus};

/// One row of the creation progress display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressStep {
    pub ordinal: u32,
    pub status: StepStatus,
    pub message: String,
    pub log: Option<String>,
}

/// Ordered progress steps with contiguous ordinals starting at 1.
///
/// Statuses only move forward (pending → in progress → completed); a late or
/// duplicated frame can never regress a step that already finished. The only
/// way back to pending is a wholesale [`ProgressBoard::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressBoard {
    steps: Vec<ProgressStep>,
}

/// Labels the board is seeded with before the stream reports anything.
const SEED_STEPS: [&str; 4] = [
    "Prepare approved email variants",
    "Create campaign in the sending platform",
    "Add leads to the campaign",
    "Save the campaign",
];

impl Default for ProgressBoard {
    fn default() -> Self {
        Self::seeded(&SEED_STEPS)
    }
}

impl ProgressBoard {
    #[must_use]
    pub fn seeded(labels: &[&str]) -> Self {
        let steps = labels
            .iter()
            .enumerate()
            .map(|(i, label)| ProgressStep {
                ordinal: u32::try_from(i).unwrap_or(u32::MAX).saturating_add(1),
                status: StepStatus::Pending,
                message: (*label).to_owned(),
                log: None,
            })
            .collect();
        Self { steps }
    }

    #[must_use]
    pub fn steps(&self) -> &[ProgressStep] {
        &self.steps
    }

    /// Apply one streamed progress frame.
    ///
    /// An update for the next unseen ordinal appends a new row, keeping
    /// ordinals contiguous; updates beyond that gap are dropped with a
    /// warning rather than leaving holes.
    pub fn apply(&mut self, update: &ProgressUpdate) {
        if update.step == 0 {
            tracing::warn!("dropping progress frame with ordinal 0");
            return;
        }
        let index = (update.step - 1) as usize;

        if index == self.steps.len() {
            self.steps.push(ProgressStep {
                ordinal: update.step,
                status: update.status,
                message: update.message.clone().unwrap_or_default(),
                log: update.log.clone(),
            });
            return;
        }

        let Some(step) = self.steps.get_mut(index) else {
            tracing::warn!(
                ordinal = update.step,
                known = self.steps.len(),
                "dropping non-contiguous progress frame"
            );
            return;
        };

        if rank(update.status) < rank(step.status) {
            return;
        }
        step.status = update.status;
        if let Some(message) = &update.message {
            step.message.clone_from(message);
        }
        if let Some(log) = &update.log {
            step.log = Some(log.clone());
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn rank(status: StepStatus) -> u8 {
    match status {
        StepStatus::Pending => 0,
        StepStatus::InProgress => 1,
        StepStatus::Warning => 2,
        StepStatus::Completed | StepStatus::Success | StepStatus::Error => 3,
    }
}
