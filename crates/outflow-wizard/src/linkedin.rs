//! LinkedIn launch flow for an existing campaign.
//!
//! Modeled as an explicit tagged union: each state carries only the fields
//! that are valid in it, so there is no "message populated but step says
//! otherwise" ambiguity. Transitions that do not apply to the current state
//! are rejected with a validation error.

use outflow_api::types::{Lead, LinkedinAccount};
use outflow_api::CampaignApiClient;

use crate::error::WizardError;

/// Where the launch flow currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkedinFlow {
    Idle,
    /// No connected account; the user must complete the hosted auth flow at
    /// `auth_url`, then start over.
    ConnectPrompt { auth_url: String },
    /// Pick which connected account sends the messages.
    SelectAccount {
        campaign_id: String,
        accounts: Vec<LinkedinAccount>,
    },
    /// Review and edit the generated message before launching.
    Compose {
        campaign_id: String,
        account_id: String,
        message: String,
        leads: Vec<Lead>,
    },
    /// Final consent gate: launching sends messages and incurs costs.
    ConfirmLaunch {
        campaign_id: String,
        account_id: String,
        message: String,
        leads: Vec<Lead>,
    },
    Launched {
        sent_count: u32,
        connection_requests_sent: u32,
    },
}

/// Drives [`LinkedinFlow`] against the Remote Campaign API.
pub struct LinkedinLauncher {
    client: CampaignApiClient,
    flow: LinkedinFlow,
}

impl LinkedinLauncher {
    #[must_use]
    pub fn new(client: CampaignApiClient) -> Self {
        Self {
            client,
            flow: LinkedinFlow::Idle,
        }
    }

    #[must_use]
    pub fn flow(&self) -> &LinkedinFlow {
        &self.flow
    }

    /// Start the flow for a campaign: check connected accounts, and either
    /// move to account selection or hand back the hosted-auth URL.
    ///
    /// # Errors
    ///
    /// API errors from the account or connect calls; the flow stays `Idle`.
    pub async fn begin(&mut self, campaign_id: &str) -> Result<&LinkedinFlow, WizardError> {
        let accounts = self.client.linkedin_accounts().await?;
        if accounts.has_account {
            self.flow = LinkedinFlow::SelectAccount {
                campaign_id: campaign_id.to_owned(),
                accounts: accounts.accounts,
            };
        } else {
            let auth_url = self.client.linkedin_connect(Some(campaign_id)).await?;
            self.flow = LinkedinFlow::ConnectPrompt { auth_url };
        }
        Ok(&self.flow)
    }

    /// Choose the sending account; generates the outreach message and loads
    /// the campaign's LinkedIn-enabled leads.
    ///
    /// # Errors
    ///
    /// Validation outside `SelectAccount`, or for an unknown account id; API
    /// errors leave the selection state unchanged.
    pub async fn choose_account(&mut self, account_id: &str) -> Result<&LinkedinFlow, WizardError> {
        let LinkedinFlow::SelectAccount {
            campaign_id,
            accounts,
        } = &self.flow
        else {
            return Err(WizardError::Validation(
                "no account selection is in progress".to_owned(),
            ));
        };
        if !accounts.iter().any(|a| a.id == account_id) {
            return Err(WizardError::Validation(format!(
                "no connected account with id '{account_id}'"
            )));
        }
        let campaign_id = campaign_id.clone();

        let message = self.client.linkedin_generate_message(&campaign_id).await?;
        let leads = self
            .client
            .linkedin_campaign_leads(&campaign_id, 25)
            .await?;

        self.flow = LinkedinFlow::Compose {
            campaign_id,
            account_id: account_id.to_owned(),
            message,
            leads,
        };
        Ok(&self.flow)
    }

    /// Replace the message text while composing.
    ///
    /// # Errors
    ///
    /// Validation outside `Compose`.
    pub fn edit_message(&mut self, text: &str) -> Result<(), WizardError> {
        let LinkedinFlow::Compose { message, .. } = &mut self.flow else {
            return Err(WizardError::Validation(
                "no message is being composed".to_owned(),
            ));
        };
        *message = text.to_owned();
        Ok(())
    }

    /// Move to the final consent gate.
    ///
    /// # Errors
    ///
    /// Validation outside `Compose` or when the message is empty.
    pub fn request_launch(&mut self) -> Result<&LinkedinFlow, WizardError> {
        let (campaign_id, account_id, message, leads) = match &self.flow {
            LinkedinFlow::Compose {
                campaign_id,
                account_id,
                message,
                leads,
            } => (
                campaign_id.clone(),
                account_id.clone(),
                message.clone(),
                leads.clone(),
            ),
            _ => {
                return Err(WizardError::Validation(
                    "no message is being composed".to_owned(),
                ))
            }
        };
        if message.trim().is_empty() {
            return Err(WizardError::Validation(
                "the outreach message is empty".to_owned(),
            ));
        }
        self.flow = LinkedinFlow::ConfirmLaunch {
            campaign_id,
            account_id,
            message,
            leads,
        };
        Ok(&self.flow)
    }

    /// Send it. A `needs_auth` response routes back to the connect prompt
    /// instead of failing.
    ///
    /// # Errors
    ///
    /// Validation outside `ConfirmLaunch`; API errors leave the gate open so
    /// the user can retry.
    pub async fn confirm_launch(&mut self) -> Result<&LinkedinFlow, WizardError> {
        let LinkedinFlow::ConfirmLaunch {
            campaign_id,
            account_id,
            message,
            ..
        } = &self.flow
        else {
            return Err(WizardError::Validation(
                "no launch is awaiting confirmation".to_owned(),
            ));
        };
        let campaign_id = campaign_id.clone();
        let account_id = account_id.clone();
        let message = message.clone();

        let outcome = self
            .client
            .linkedin_launch(&campaign_id, &message, &account_id)
            .await?;

        if outcome.needs_auth {
            let auth_url = self.client.linkedin_connect(Some(&campaign_id)).await?;
            self.flow = LinkedinFlow::ConnectPrompt { auth_url };
        } else {
            tracing::info!(
                campaign_id = %campaign_id,
                sent = outcome.sent_count,
                "LinkedIn campaign launched"
            );
            self.flow = LinkedinFlow::Launched {
                sent_count: outcome.sent_count,
                connection_requests_sent: outcome.connection_requests_sent,
            };
        }
        Ok(&self.flow)
    }

    /// Step back from the consent gate to composing. Pure local transition.
    ///
    /// # Errors
    ///
    /// Validation outside `ConfirmLaunch`.
    pub fn cancel_launch(&mut self) -> Result<&LinkedinFlow, WizardError> {
        let (campaign_id, account_id, message, leads) = match &self.flow {
            LinkedinFlow::ConfirmLaunch {
                campaign_id,
                account_id,
                message,
                leads,
            } => (
                campaign_id.clone(),
                account_id.clone(),
                message.clone(),
                leads.clone(),
            ),
            _ => {
                return Err(WizardError::Validation(
                    "no launch is awaiting confirmation".to_owned(),
                ))
            }
        };
        self.flow = LinkedinFlow::Compose {
            campaign_id,
            account_id,
            message,
            leads,
        };
        Ok(&self.flow)
    }

    pub fn reset(&mut self) {
        self.flow = LinkedinFlow::Idle;
    }
}
