//! The wizard controller: one owner for the campaign draft, the confirmation
//! gate, and the in-flight streaming session.
//!
//! Every forward transition is one method, one network operation, one step
//! advanced on success. Failures roll the wizard back to the step that was
//! active before the call — the single exception is lead polling, whose
//! proceed-on-exhaustion policy is an explicit configuration choice.
//!
//! Streamed campaign creation is pull-driven: the controller reads one frame
//! at a time and, while a lead-approval gate is open, reads nothing — so a
//! second gate frame cannot arrive before the first is resolved, and events
//! are handled strictly in arrival order. The cancellation token for the
//! stream is created when the stream opens, owned here, and invalidated when
//! the operation ends; `cancel` is idempotent.

use outflow_api::types::IcpCampaignRequest;
use outflow_api::{
    poll_enrichment, ApiError, CampaignApiClient, CampaignEvent, CancelToken, EventStream, Frame,
    LeadPollConfig, PollOutcome, SseError,
};
use outflow_core::AppConfig;

use crate::error::WizardError;
use crate::gate::{ConfirmationGate, ConfirmationKind, ConfirmationRequest};
use crate::state::{WizardState, WizardStep};

/// Behavior knobs for the controller, derived from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct WizardOptions {
    pub lead_poll: LeadPollConfig,
    /// On poll exhaustion, advance to lead review with whatever was found
    /// instead of failing the step.
    pub proceed_on_poll_exhaustion: bool,
}

impl WizardOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            lead_poll: LeadPollConfig::from_app_config(config),
            proceed_on_poll_exhaustion: config.lead_poll_proceed_on_exhaustion,
        }
    }
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            lead_poll: LeadPollConfig::default(),
            proceed_on_poll_exhaustion: true,
        }
    }
}

/// How a lead search ended when the wizard advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadSearchOutcome {
    /// Enrichment finished within the polling window.
    Complete { found: usize },
    /// The polling ceiling was reached; the wizard advanced anyway with
    /// whatever was available. Worth a warning in the UI.
    Exhausted { found: usize },
}

/// Where a campaign-creation drive currently stands.
#[derive(Debug)]
pub enum CampaignProgress {
    /// A confirmation gate is open; call
    /// [`WizardController::resolve_confirmation`] to continue.
    AwaitingConfirmation,
    Completed { campaign_id: String },
    /// The user declined a confirmation; nothing was created.
    Cancelled,
}

/// Which field of an email variant a local edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantField {
    Subject,
    Body,
}

struct ActiveStream {
    events: EventStream,
}

/// Client-side state machine driving campaign creation. See the module docs
/// for the concurrency and failure model.
pub struct WizardController {
    client: CampaignApiClient,
    options: WizardOptions,
    state: WizardState,
    gate: ConfirmationGate,
    stream: Option<ActiveStream>,
    cancel: Option<CancelToken>,
}

impl WizardController {
    #[must_use]
    pub fn new(client: CampaignApiClient, options: WizardOptions) -> Self {
        Self {
            client,
            options,
            state: WizardState::new(),
            gate: ConfirmationGate::new(),
            stream: None,
            cancel: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// The open confirmation request, if any.
    #[must_use]
    pub fn confirmation(&self) -> Option<&ConfirmationRequest> {
        self.gate.pending()
    }

    /// Handle for cancelling the in-flight stream from outside the current
    /// borrow (e.g. a signal handler). `None` when nothing is in flight.
    #[must_use]
    pub fn cancel_handle(&self) -> Option<CancelToken> {
        self.cancel.clone()
    }

    // -----------------------------------------------------------------------
    // Form edits: pure local mutations.
    // -----------------------------------------------------------------------

    pub fn set_source_url(&mut self, url: impl Into<String>) {
        self.state.draft.source_url = url.into();
    }

    pub fn set_campaign_name(&mut self, name: impl Into<String>) {
        self.state.draft.name = name.into();
    }

    pub fn set_sender_name(&mut self, name: impl Into<String>) {
        self.state.draft.sender_name = name.into();
    }

    pub fn set_target_audience(&mut self, audience: impl Into<String>) {
        self.state.draft.target_audience = audience.into();
    }

    pub fn set_requested_lead_count(&mut self, count: u32) {
        self.state.draft.requested_lead_count = count;
    }

    // -----------------------------------------------------------------------
    // Forward transitions.
    // -----------------------------------------------------------------------

    /// Step 1 → 2: analyze the website and store the suggested profiles.
    ///
    /// Uses the long analyze timeout; a timeout maps to
    /// [`WizardError::Timeout`] so the UI can say "took too long" instead of
    /// a generic failure.
    ///
    /// # Errors
    ///
    /// Validation if the URL is empty (no network call is made); otherwise
    /// the mapped API error, leaving the wizard at step 1.
    pub async fn start_analysis(&mut self) -> Result<usize, WizardError> {
        self.ensure_step(WizardStep::Analyze)?;
        let url = self.state.draft.source_url.trim().to_owned();
        if url.is_empty() {
            return Err(WizardError::Validation(
                "enter a website URL to analyze".to_owned(),
            ));
        }

        let icps = match self.client.analyze_icps(&url).await {
            Ok(icps) => icps,
            Err(err) if err.is_timeout() => {
                return Err(WizardError::Timeout {
                    operation: "website analysis",
                })
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(count = icps.len(), "ICP analysis complete");
        self.state.suggested_icps = icps;
        self.state.step = WizardStep::ChooseProfile;
        Ok(self.state.suggested_icps.len())
    }

    /// Step 2 → 3: select a profile, start the lead search, and poll the
    /// enrichment until it completes or the attempt ceiling is reached.
    ///
    /// Polling attempts are strictly sequential and bounded; on exhaustion
    /// the wizard advances with whatever leads were found when
    /// `proceed_on_poll_exhaustion` is set, and fails with
    /// [`WizardError::EnrichmentTimedOut`] otherwise.
    ///
    /// # Errors
    ///
    /// Validation for an out-of-range index (no network call); an API error
    /// from the search call leaves the wizard at step 2 with no profile
    /// selected.
    pub async fn select_icp(&mut self, index: usize) -> Result<LeadSearchOutcome, WizardError> {
        self.ensure_step(WizardStep::ChooseProfile)?;
        let Some(icp) = self.state.suggested_icps.get(index).cloned() else {
            return Err(WizardError::Validation(format!(
                "no suggested profile at index {index}"
            )));
        };

        self.state.selected_icp = Some(icp.clone());
        let search = self
            .client
            .search_leads(
                &self.state.draft.source_url,
                &icp.target_audience,
                self.state.draft.requested_lead_count,
            )
            .await;
        let enrichment_id = match search {
            Ok(id) => id,
            Err(err) => {
                self.state.selected_icp = None;
                return Err(err.into());
            }
        };
        self.state.enrichment_id = Some(enrichment_id.clone());

        let outcome = poll_enrichment(
            &self.client,
            &enrichment_id,
            self.state.draft.requested_lead_count,
            &self.options.lead_poll,
        )
        .await;

        match outcome {
            PollOutcome::Complete(leads) => {
                let found = leads.len();
                self.state.leads = leads;
                self.state.step = WizardStep::ReviewLeads;
                Ok(LeadSearchOutcome::Complete { found })
            }
            PollOutcome::Exhausted { leads, attempts } => {
                if self.options.proceed_on_poll_exhaustion {
                    let found = leads.len();
                    tracing::warn!(
                        attempts,
                        found,
                        "enrichment polling exhausted — advancing with partial results"
                    );
                    self.state.leads = leads;
                    self.state.step = WizardStep::ReviewLeads;
                    Ok(LeadSearchOutcome::Exhausted { found })
                } else {
                    Err(WizardError::EnrichmentTimedOut)
                }
            }
        }
    }

    /// Step 3 → 4: generate the A/B email variants and keep both the
    /// canonical and the editable copy.
    ///
    /// # Errors
    ///
    /// Validation if no profile is selected; otherwise the API error, with
    /// the wizard left at step 3.
    pub async fn generate_emails(&mut self) -> Result<usize, WizardError> {
        self.ensure_step(WizardStep::ReviewLeads)?;
        let Some(icp) = self.state.selected_icp.clone() else {
            return Err(WizardError::Validation(
                "no customer profile is selected".to_owned(),
            ));
        };

        let variants = self
            .client
            .generate_emails(&self.state.draft.source_url, &icp)
            .await?;
        self.state.variants.clone_from(&variants);
        self.state.edited_variants = variants;
        self.state.step = WizardStep::ReviewEmails;
        Ok(self.state.edited_variants.len())
    }

    /// Regenerate a single variant in place. Other variants — including
    /// local edits to them — are untouched, and the wizard stays at step 4.
    ///
    /// # Errors
    ///
    /// Validation for an out-of-range index (no network call); otherwise the
    /// API error.
    pub async fn regenerate_variant(&mut self, index: usize) -> Result<(), WizardError> {
        self.ensure_step(WizardStep::ReviewEmails)?;
        if index >= self.state.edited_variants.len() {
            return Err(WizardError::Validation(format!(
                "no email variant at index {index}"
            )));
        }
        let Some(icp) = self.state.selected_icp.clone() else {
            return Err(WizardError::Validation(
                "no customer profile is selected".to_owned(),
            ));
        };

        let variant = self
            .client
            .regenerate_email(&self.state.draft.source_url, &icp, index)
            .await?;
        self.state.edited_variants[index] = variant;
        Ok(())
    }

    /// Local edit of one variant field. No network call.
    ///
    /// # Errors
    ///
    /// Validation for an out-of-range index.
    pub fn edit_variant(
        &mut self,
        index: usize,
        field: VariantField,
        value: &str,
    ) -> Result<(), WizardError> {
        let Some(variant) = self.state.edited_variants.get_mut(index) else {
            return Err(WizardError::Validation(format!(
                "no email variant at index {index}"
            )));
        };
        match field {
            VariantField::Subject => variant.subject = value.to_owned(),
            VariantField::Body => variant.body = value.to_owned(),
        }
        Ok(())
    }

    /// Step 4 → 5: fetch matched sending domains and existing accounts. The
    /// wizard advances even when both lists are empty — creation can proceed
    /// with zero pre-provisioned identities.
    ///
    /// # Errors
    ///
    /// The API error, with the wizard left at step 4.
    pub async fn match_domains(&mut self) -> Result<(usize, usize), WizardError> {
        self.ensure_step(WizardStep::ReviewEmails)?;
        let matches = self
            .client
            .match_domains(&self.state.draft.source_url)
            .await?;
        let counts = (matches.matched_domains.len(), matches.existing_accounts.len());
        self.state.matched_domains = matches.matched_domains;
        self.state.existing_accounts = matches.existing_accounts;
        self.state.step = WizardStep::SendingSetup;
        Ok(counts)
    }

    /// Toggle a suggested domain in or out of the selection. Returns whether
    /// it is selected afterwards.
    pub fn toggle_domain(&mut self, domain: &str) -> bool {
        if self.state.selected_domains.remove(domain) {
            false
        } else {
            self.state.selected_domains.insert(domain.to_owned());
            true
        }
    }

    /// Toggle an existing account in or out of the selection. Returns whether
    /// it is selected afterwards.
    pub fn toggle_account(&mut self, email: &str) -> bool {
        if self.state.selected_accounts.remove(email) {
            false
        } else {
            self.state.selected_accounts.insert(email.to_owned());
            true
        }
    }

    /// Step 5 → 6, part one: validate the draft and open the cost-warning
    /// gate. No network call happens until the confirmation is approved.
    ///
    /// # Errors
    ///
    /// Validation if the campaign name is empty, or
    /// [`WizardError::ConfirmationPending`] if a gate is already open.
    pub fn create_campaign(&mut self) -> Result<CampaignProgress, WizardError> {
        self.ensure_step(WizardStep::SendingSetup)?;
        if self.state.draft.name.trim().is_empty() {
            return Err(WizardError::Validation(
                "enter a campaign name".to_owned(),
            ));
        }

        let lead_count = self.state.leads.len();
        self.gate.request(ConfirmationRequest {
            title: "Create campaign".to_owned(),
            message: format!(
                "This will generate the campaign in the sending platform and add {lead_count} leads."
            ),
            estimated_cost: Some("est. $0.10 - $5.00 depending on lead count".to_owned()),
            kind: ConfirmationKind::CostWarning,
        })?;
        Ok(CampaignProgress::AwaitingConfirmation)
    }

    /// Resolve the open confirmation gate.
    ///
    /// Approving the cost warning opens the streaming session and drives it;
    /// approving a lead-approval gate notifies the server, then resumes the
    /// paused stream. Rejection aborts whatever is in flight and reports
    /// [`CampaignProgress::Cancelled`].
    ///
    /// # Errors
    ///
    /// Validation when no confirmation is pending; stream and API failures
    /// as for [`WizardController::create_campaign`].
    pub async fn resolve_confirmation(
        &mut self,
        approve: bool,
    ) -> Result<CampaignProgress, WizardError> {
        let Some(request) = self.gate.resolve() else {
            return Err(WizardError::Validation(
                "no confirmation is pending".to_owned(),
            ));
        };

        match request.kind {
            ConfirmationKind::CostWarning => {
                if approve {
                    self.open_campaign_stream().await
                } else {
                    tracing::info!("campaign creation declined at cost review");
                    Ok(CampaignProgress::Cancelled)
                }
            }
            ConfirmationKind::LeadApproval { session_id, .. } => {
                if approve {
                    if let Err(err) = self.client.confirm_leads(&session_id, true).await {
                        self.teardown_stream();
                        return Err(err.into());
                    }
                    self.drive_stream().await
                } else {
                    self.teardown_stream();
                    tracing::info!("lead list rejected — campaign creation aborted");
                    Ok(CampaignProgress::Cancelled)
                }
            }
        }
    }

    /// Back transition: return to the previous step, discarding what was
    /// collected after it.
    ///
    /// # Errors
    ///
    /// Validation at step 1, or while a stream/confirmation is in flight.
    pub fn back(&mut self) -> Result<(), WizardError> {
        if self.stream.is_some() || self.gate.is_pending() {
            return Err(WizardError::Validation(
                "resolve or cancel the current operation first".to_owned(),
            ));
        }
        let Some(previous) = self.state.step.previous() else {
            return Err(WizardError::Validation(
                "already at the first step".to_owned(),
            ));
        };
        self.state.step = previous;
        self.state.discard_beyond(previous);
        Ok(())
    }

    /// Abort any in-flight stream and pending confirmation. Idempotent:
    /// calling this twice, or after the operation finished, changes nothing.
    pub fn cancel(&mut self) {
        if self.cancel.is_none() && self.stream.is_none() && !self.gate.is_pending() {
            return;
        }
        self.teardown_stream();
        tracing::info!("campaign operation cancelled");
    }

    /// Full reset to the initial state, aborting anything in flight.
    pub fn reset(&mut self) {
        self.teardown_stream();
        self.state = WizardState::new();
    }

    // -----------------------------------------------------------------------
    // Streaming internals.
    // -----------------------------------------------------------------------

    async fn open_campaign_stream(&mut self) -> Result<CampaignProgress, WizardError> {
        let Some(icp) = self.state.selected_icp.clone() else {
            return Err(WizardError::Validation(
                "no customer profile is selected".to_owned(),
            ));
        };
        let request = IcpCampaignRequest {
            campaign_name: self.state.draft.name.clone(),
            url: self.state.draft.source_url.clone(),
            user_id: self.client.user_id().to_owned(),
            selected_icp: icp,
            enrichment_id: self.state.enrichment_id.clone().unwrap_or_default(),
            lead_count: u32::try_from(self.state.leads.len()).unwrap_or(u32::MAX),
            approved_variants: self.state.edited_variants.clone(),
            selected_domains: self.state.selected_domains.iter().cloned().collect(),
            selected_accounts: self.state.selected_accounts.iter().cloned().collect(),
            sender_name: self.state.draft.sender_name.clone(),
        };

        let token = CancelToken::new();
        let events = self
            .client
            .create_icp_campaign(&request, token.clone())
            .await?;

        self.cancel = Some(token);
        self.state.progress.reset();
        self.state.creation_log.clear();
        self.stream = Some(ActiveStream { events });
        self.drive_stream().await
    }

    /// Read frames until the stream pauses on a gate or terminates. While a
    /// gate is pending this function is not running, so no frame beyond the
    /// gate frame is consumed until the gate resolves.
    async fn drive_stream(&mut self) -> Result<CampaignProgress, WizardError> {
        loop {
            let frame = {
                let Some(active) = self.stream.as_mut() else {
                    return Err(WizardError::Validation(
                        "no campaign creation is in flight".to_owned(),
                    ));
                };
                active.events.next_frame().await
            };

            match frame {
                Ok(Some(Frame::Event(event))) => {
                    if let Some(progress) = self.handle_event(event)? {
                        return Ok(progress);
                    }
                }
                Ok(Some(Frame::Malformed { line, error })) => {
                    tracing::warn!(line = %line, error = %error, "skipping malformed stream frame");
                }
                Ok(None) => {
                    self.teardown_stream();
                    return Err(WizardError::CampaignFailed(
                        "the stream ended before the campaign was confirmed".to_owned(),
                    ));
                }
                Err(SseError::Cancelled) => {
                    self.teardown_stream();
                    return Err(WizardError::Cancelled);
                }
                Err(SseError::Transport(e)) => {
                    self.teardown_stream();
                    return Err(WizardError::Api(ApiError::Http(e)));
                }
            }
        }
    }

    fn handle_event(
        &mut self,
        event: CampaignEvent,
    ) -> Result<Option<CampaignProgress>, WizardError> {
        match event {
            CampaignEvent::Progress(update) => {
                self.state.progress.apply(&update);
                if let Some(message) = update.message {
                    self.state.creation_log.push(message);
                }
                Ok(None)
            }
            CampaignEvent::AwaitingLeadConfirmation(details) => {
                let request = ConfirmationRequest {
                    title: "Review scraped leads".to_owned(),
                    message: format!(
                        "{} leads are ready to be added to the campaign. Review them before continuing.",
                        details.leads.len()
                    ),
                    estimated_cost: None,
                    kind: ConfirmationKind::LeadApproval {
                        lead_list_id: details.lead_list_id,
                        leads: details.leads,
                        session_id: details.session_id,
                    },
                };
                match self.gate.request(request) {
                    Ok(()) => Ok(Some(CampaignProgress::AwaitingConfirmation)),
                    // Unreachable while the stream pauses on an open gate,
                    // but a misbehaving server must not corrupt state.
                    Err(rejected) => {
                        self.teardown_stream();
                        Err(rejected.into())
                    }
                }
            }
            CampaignEvent::Done(done) => {
                self.state.campaign_id = Some(done.campaign_id.clone());
                self.state.step = WizardStep::Launched;
                self.stream = None;
                self.cancel = None;
                tracing::info!(campaign_id = %done.campaign_id, "campaign created");
                Ok(Some(CampaignProgress::Completed {
                    campaign_id: done.campaign_id,
                }))
            }
            CampaignEvent::Error { message } => {
                self.teardown_stream();
                Err(WizardError::CampaignFailed(message))
            }
        }
    }

    /// Release the stream, its cancellation token, and any pending gate.
    /// The wizard step is untouched: streaming never advances the step until
    /// the terminal frame, so the pre-operation step is already current.
    fn teardown_stream(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        self.stream = None;
        self.gate.clear();
    }

    fn ensure_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.state.step == expected {
            Ok(())
        } else {
            Err(WizardError::Validation(format!(
                "this action belongs to the {expected} step (currently at {})",
                self.state.step
            )))
        }
    }
}
