//! Wizard state: the transient aggregate of everything collected across the
//! six steps. Nothing here is persisted — a reset or a finished campaign
//! discards it.

use std::collections::BTreeSet;

use outflow_api::types::{DfyDomain, EmailAccount, EmailVariant, IcpProfile, Lead};

use crate::progress::ProgressBoard;

/// The six linear wizard steps. `back` moves to the previous step and
/// discards what was collected after it; the only way into [`Launched`] is a
/// successfully streamed campaign creation.
///
/// [`Launched`]: WizardStep::Launched
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    /// Enter the website URL and lead count; run ICP analysis.
    Analyze,
    /// Pick one of the suggested Ideal Customer Profiles.
    ChooseProfile,
    /// Review the sourced leads.
    ReviewLeads,
    /// Review, edit, or regenerate the email variants.
    ReviewEmails,
    /// Pick sending domains/accounts, name the campaign, create it.
    SendingSetup,
    /// Campaign created.
    Launched,
}

impl WizardStep {
    /// 1-based position, as shown to the user.
    #[must_use]
    pub fn ordinal(self) -> u8 {
        match self {
            WizardStep::Analyze => 1,
            WizardStep::ChooseProfile => 2,
            WizardStep::ReviewLeads => 3,
            WizardStep::ReviewEmails => 4,
            WizardStep::SendingSetup => 5,
            WizardStep::Launched => 6,
        }
    }

    #[must_use]
    pub fn previous(self) -> Option<Self> {
        match self {
            WizardStep::Analyze => None,
            WizardStep::ChooseProfile => Some(WizardStep::Analyze),
            WizardStep::ReviewLeads => Some(WizardStep::ChooseProfile),
            WizardStep::ReviewEmails => Some(WizardStep::ReviewLeads),
            WizardStep::SendingSetup => Some(WizardStep::ReviewEmails),
            WizardStep::Launched => Some(WizardStep::SendingSetup),
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WizardStep::Analyze => "website analysis",
            WizardStep::ChooseProfile => "profile selection",
            WizardStep::ReviewLeads => "lead review",
            WizardStep::ReviewEmails => "email review",
            WizardStep::SendingSetup => "sending setup",
            WizardStep::Launched => "launched",
        };
        write!(f, "{name}")
    }
}

/// The user's form inputs, mutated by edits until campaign creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignDraft {
    pub name: String,
    pub source_url: String,
    pub target_audience: String,
    pub sender_name: String,
    pub requested_lead_count: u32,
}

impl Default for CampaignDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            source_url: String::new(),
            target_audience: String::new(),
            sender_name: String::new(),
            requested_lead_count: 10,
        }
    }
}

/// Everything the wizard has collected so far. Owned and mutated exclusively
/// by the controller; views only read it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardState {
    pub step: WizardStep,
    pub draft: CampaignDraft,
    pub suggested_icps: Vec<IcpProfile>,
    pub selected_icp: Option<IcpProfile>,
    pub enrichment_id: Option<String>,
    pub leads: Vec<Lead>,
    /// Variants exactly as the backend generated them.
    pub variants: Vec<EmailVariant>,
    /// The user-editable copy submitted with campaign creation.
    pub edited_variants: Vec<EmailVariant>,
    pub matched_domains: Vec<DfyDomain>,
    pub existing_accounts: Vec<EmailAccount>,
    pub selected_domains: BTreeSet<String>,
    pub selected_accounts: BTreeSet<String>,
    pub progress: ProgressBoard,
    pub campaign_id: Option<String>,
    /// Messages streamed during campaign creation, in arrival order.
    pub creation_log: Vec<String>,
}

impl Default for WizardStep {
    fn default() -> Self {
        WizardStep::Analyze
    }
}

impl WizardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything collected after `target`, keeping earlier data.
    /// Used by the back transition.
    pub(crate) fn discard_beyond(&mut self, target: WizardStep) {
        if target < WizardStep::Launched {
            self.campaign_id = None;
            self.progress.reset();
            self.creation_log.clear();
        }
        if target < WizardStep::SendingSetup {
            self.matched_domains.clear();
            self.existing_accounts.clear();
            self.selected_domains.clear();
            self.selected_accounts.clear();
        }
        if target < WizardStep::ReviewEmails {
            self.variants.clear();
            self.edited_variants.clear();
        }
        if target < WizardStep::ReviewLeads {
            self.selected_icp = None;
            self.enrichment_id = None;
            self.leads.clear();
        }
        if target < WizardStep::ChooseProfile {
            self.suggested_icps.clear();
        }
    }
}
