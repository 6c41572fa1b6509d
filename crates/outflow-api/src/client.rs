//! HTTP client for the Remote Campaign API.
//!
//! Wraps `reqwest` with typed request/response handling for every backend
//! endpoint the product consumes. Non-2xx responses surface the FastAPI-style
//! `detail` message as [`ApiError::Api`]; body-shape mismatches surface as
//! [`ApiError::Deserialize`] with the endpoint as context.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use outflow_core::AppConfig;

use crate::error::ApiError;
use crate::sse::{CancelToken, EventStream};
use crate::types::{
    AnalyticsResponse, AnalyzeResponse, Campaign, CampaignAnalytics, CampaignStreamRequest,
    CampaignsResponse, CreateCampaignResponse, DomainMatchResponse, DomainOrder,
    DomainOrderQuote, DomainOrdersResponse, EmailVariant, GenerateEmailsResponse, IcpCampaignRequest,
    IcpProfile, Lead, LeadListResponse, LeadPreview, LeadSearchResponse, LinkedinAccountsResponse,
    LinkedinConnectResponse, LinkedinLaunchResponse, LinkedinLeadsResponse,
    LinkedinMessageResponse, OrderPrewarmedRequest, PrewarmedDomainsResponse,
    RegenerateEmailResponse,
};

/// Client for the Remote Campaign API.
///
/// Holds the HTTP client, the normalized base URL, and the configured user
/// id. Use [`CampaignApiClient::new`] in production or
/// [`CampaignApiClient::with_base_url`] to point at a mock server in tests.
///
/// The underlying `reqwest::Client` carries no client-wide timeout: the
/// streamed campaign-creation bodies stay open for minutes. Instead every
/// non-streaming call applies a per-request timeout — the configured default
/// for ordinary calls, the long analyze timeout for ICP analysis.
#[derive(Debug, Clone)]
pub struct CampaignApiClient {
    client: Client,
    base_url: Url,
    user_id: String,
    request_timeout: Duration,
    analyze_timeout: Duration,
}

impl CampaignApiClient {
    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::Url`] if the configured base URL does
    /// not parse.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        Self::with_base_url(
            &config.api_base_url,
            &config.user_id,
            config.request_timeout_secs,
            config.analyze_timeout_secs,
        )
    }

    /// Creates a client with an explicit base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::Url`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        user_id: &str,
        request_timeout_secs: u64,
        analyze_timeout_secs: u64,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent("outflow/0.1 (campaign-dashboard)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join() appends endpoint paths instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ApiError::Url(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            user_id: user_id.to_owned(),
            request_timeout: Duration::from_secs(request_timeout_secs),
            analyze_timeout: Duration::from_secs(analyze_timeout_secs),
        })
    }

    /// The configured user id sent with user-scoped requests.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    // -----------------------------------------------------------------------
    // Campaign dashboard
    // -----------------------------------------------------------------------

    /// Lists the user's campaigns.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Api`] if the API returns a non-2xx status.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, ApiError> {
        let url = self.endpoint("api/campaigns")?;
        let builder = self
            .client
            .get(url)
            .query(&[("user_id", self.user_id.as_str())])
            .timeout(self.request_timeout);
        let envelope: CampaignsResponse = self.send_json(builder, "GET /api/campaigns").await?;
        Ok(envelope.campaigns)
    }

    /// Fetches sending-platform analytics for one campaign.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn campaign_analytics(
        &self,
        campaign_id: &str,
    ) -> Result<CampaignAnalytics, ApiError> {
        let url = self.endpoint(&format!("api/analytics/{campaign_id}"))?;
        let builder = self
            .client
            .get(url)
            .query(&[("user_id", self.user_id.as_str())])
            .timeout(self.request_timeout);
        let envelope: AnalyticsResponse = self
            .send_json(builder, "GET /api/analytics/{campaign_id}")
            .await?;
        Ok(envelope.analytics)
    }

    /// Fetches the enriched leads of a campaign's lead list.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn list_leads(&self, list_id: &str) -> Result<Vec<Lead>, ApiError> {
        let url = self.endpoint(&format!("api/leads/{list_id}"))?;
        let builder = self.client.get(url).timeout(self.request_timeout);
        let envelope: LeadListResponse =
            self.send_json(builder, "GET /api/leads/{list_id}").await?;
        Ok(envelope.leads)
    }

    // -----------------------------------------------------------------------
    // ICP wizard
    // -----------------------------------------------------------------------

    /// Analyzes a website and suggests Ideal Customer Profiles.
    ///
    /// Uses the long analyze timeout (default 180 s): the backend performs
    /// web research for this call and routinely takes minutes. A timeout here
    /// reports `true` from [`ApiError::is_timeout`] so the caller can show a
    /// distinct message.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn analyze_icps(&self, url: &str) -> Result<Vec<IcpProfile>, ApiError> {
        let endpoint = self.endpoint("api/icp/analyze")?;
        let builder = self
            .client
            .post(endpoint)
            .json(&serde_json::json!({ "url": url }))
            .timeout(self.analyze_timeout);
        let envelope: AnalyzeResponse = self.send_json(builder, "POST /api/icp/analyze").await?;
        Ok(envelope.icps)
    }

    /// Starts a lead search for the selected profile. Returns the enrichment
    /// correlation id to poll with [`crate::poll::poll_enrichment`].
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn search_leads(
        &self,
        url: &str,
        target_audience: &str,
        lead_count: u32,
    ) -> Result<String, ApiError> {
        let endpoint = self.endpoint("api/icp/search-leads")?;
        let builder = self
            .client
            .post(endpoint)
            .json(&serde_json::json!({
                "url": url,
                "target_audience": target_audience,
                "lead_count": lead_count,
            }))
            .timeout(self.request_timeout);
        let envelope: LeadSearchResponse = self
            .send_json(builder, "POST /api/icp/search-leads")
            .await?;
        Ok(envelope.enrichment_id)
    }

    /// One enrichment poll attempt.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn lead_preview(
        &self,
        enrichment_id: &str,
        limit: u32,
    ) -> Result<LeadPreview, ApiError> {
        let url = self.endpoint(&format!("api/icp/leads/{enrichment_id}"))?;
        let builder = self
            .client
            .get(url)
            .query(&[("limit", limit.to_string())])
            .timeout(self.request_timeout);
        self.send_json(builder, "GET /api/icp/leads/{enrichment_id}")
            .await
    }

    /// Generates the A/B email variants for the selected profile.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn generate_emails(
        &self,
        url: &str,
        icp: &IcpProfile,
    ) -> Result<Vec<EmailVariant>, ApiError> {
        let endpoint = self.endpoint("api/icp/generate-emails")?;
        let builder = self
            .client
            .post(endpoint)
            .json(&serde_json::json!({ "url": url, "selected_icp": icp }))
            .timeout(self.request_timeout);
        let envelope: GenerateEmailsResponse = self
            .send_json(builder, "POST /api/icp/generate-emails")
            .await?;
        Ok(envelope.variants)
    }

    /// Regenerates a single variant, leaving the others untouched server-side.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn regenerate_email(
        &self,
        url: &str,
        icp: &IcpProfile,
        variant_index: usize,
    ) -> Result<EmailVariant, ApiError> {
        let endpoint = self.endpoint("api/icp/regenerate-email")?;
        let builder = self
            .client
            .post(endpoint)
            .json(&serde_json::json!({
                "url": url,
                "selected_icp": icp,
                "variant_index": variant_index,
            }))
            .timeout(self.request_timeout);
        let envelope: RegenerateEmailResponse = self
            .send_json(builder, "POST /api/icp/regenerate-email")
            .await?;
        Ok(envelope.variant)
    }

    /// Matches pre-provisioned sending domains and existing accounts to the
    /// user's website. Either list may be empty.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn match_domains(&self, url: &str) -> Result<DomainMatchResponse, ApiError> {
        let endpoint = self.endpoint("api/icp/match-domains")?;
        let builder = self
            .client
            .post(endpoint)
            .json(&serde_json::json!({ "url": url }))
            .timeout(self.request_timeout);
        self.send_json(builder, "POST /api/icp/match-domains").await
    }

    // -----------------------------------------------------------------------
    // Campaign creation
    // -----------------------------------------------------------------------

    /// One-shot campaign creation, used as a fallback when streaming is not
    /// wanted.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn create_campaign(
        &self,
        url: &str,
        target_audience: &str,
    ) -> Result<CreateCampaignResponse, ApiError> {
        let endpoint = self.endpoint("api/create-campaign")?;
        let builder = self
            .client
            .post(endpoint)
            .json(&serde_json::json!({
                "url": url,
                "target_audience": target_audience,
                "user_id": self.user_id,
            }))
            .timeout(self.request_timeout);
        self.send_json(builder, "POST /api/create-campaign").await
    }

    /// Opens the streamed non-ICP campaign-creation session.
    ///
    /// # Errors
    ///
    /// [`ApiError::Api`] if the server refuses the session; otherwise the
    /// returned [`EventStream`] reports problems frame by frame.
    pub async fn create_campaign_stream(
        &self,
        request: &CampaignStreamRequest,
        cancel: CancelToken,
    ) -> Result<EventStream, ApiError> {
        let endpoint = self.endpoint("api/create-campaign-stream")?;
        self.open_stream(endpoint, request, cancel).await
    }

    /// Opens the streamed ICP campaign-creation session carrying the full
    /// accumulated wizard draft.
    ///
    /// # Errors
    ///
    /// [`ApiError::Api`] if the server refuses the session; otherwise the
    /// returned [`EventStream`] reports problems frame by frame.
    pub async fn create_icp_campaign(
        &self,
        request: &IcpCampaignRequest,
        cancel: CancelToken,
    ) -> Result<EventStream, ApiError> {
        let endpoint = self.endpoint("api/icp/create-campaign")?;
        self.open_stream(endpoint, request, cancel).await
    }

    /// Resolves a server-held lead-approval session.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn confirm_leads(&self, session_id: &str, confirmed: bool) -> Result<(), ApiError> {
        let endpoint = self.endpoint("api/confirm-leads")?;
        let response = self
            .client
            .post(endpoint)
            .json(&serde_json::json!({
                "session_id": session_id,
                "confirmed": confirmed,
            }))
            .timeout(self.request_timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_detail(&body),
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // LinkedIn
    // -----------------------------------------------------------------------

    /// Connected-account status in the messaging connector.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn linkedin_accounts(&self) -> Result<LinkedinAccountsResponse, ApiError> {
        let url = self.endpoint("api/linkedin/accounts")?;
        let builder = self.client.get(url).timeout(self.request_timeout);
        self.send_json(builder, "GET /api/linkedin/accounts").await
    }

    /// Starts the hosted auth flow; returns the URL to send the user to.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn linkedin_connect(&self, campaign_id: Option<&str>) -> Result<String, ApiError> {
        let url = self.endpoint("api/linkedin/connect")?;
        let builder = self
            .client
            .post(url)
            .json(&serde_json::json!({ "campaign_id": campaign_id }))
            .timeout(self.request_timeout);
        let envelope: LinkedinConnectResponse =
            self.send_json(builder, "POST /api/linkedin/connect").await?;
        Ok(envelope.auth_url)
    }

    /// Generates the LinkedIn outreach message for a campaign.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn linkedin_generate_message(&self, campaign_id: &str) -> Result<String, ApiError> {
        let url = self.endpoint("api/linkedin/generate-message")?;
        let builder = self
            .client
            .post(url)
            .json(&serde_json::json!({
                "campaign_id": campaign_id,
                "user_id": self.user_id,
            }))
            .timeout(self.request_timeout);
        let envelope: LinkedinMessageResponse = self
            .send_json(builder, "POST /api/linkedin/generate-message")
            .await?;
        Ok(envelope.message)
    }

    /// Leads of a campaign that have LinkedIn profiles attached.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn linkedin_campaign_leads(
        &self,
        campaign_id: &str,
        limit: u32,
    ) -> Result<Vec<Lead>, ApiError> {
        let url = self.endpoint(&format!("api/linkedin/campaign-leads/{campaign_id}"))?;
        let builder = self
            .client
            .get(url)
            .query(&[
                ("user_id", self.user_id.clone()),
                ("limit", limit.to_string()),
            ])
            .timeout(self.request_timeout);
        let envelope: LinkedinLeadsResponse = self
            .send_json(builder, "GET /api/linkedin/campaign-leads/{campaign_id}")
            .await?;
        Ok(envelope.leads)
    }

    /// Launches LinkedIn messaging for a campaign through the given connected
    /// account.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn linkedin_launch(
        &self,
        campaign_id: &str,
        message: &str,
        account_id: &str,
    ) -> Result<LinkedinLaunchResponse, ApiError> {
        let url = self.endpoint("api/linkedin/launch-campaign")?;
        let builder = self
            .client
            .post(url)
            .json(&serde_json::json!({
                "campaign_id": campaign_id,
                "user_id": self.user_id,
                "message": message,
                "account_id": account_id,
            }))
            .timeout(self.request_timeout);
        self.send_json(builder, "POST /api/linkedin/launch-campaign")
            .await
    }

    // -----------------------------------------------------------------------
    // Domain purchasing
    // -----------------------------------------------------------------------

    /// Browses the pre-warmed domain inventory for the given extensions.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn prewarmed_domains(&self, extensions: &[&str]) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint("api/domains/prewarmed")?;
        let builder = self
            .client
            .post(url)
            .json(&serde_json::json!({ "extensions": extensions }))
            .timeout(self.request_timeout);
        let envelope: PrewarmedDomainsResponse = self
            .send_json(builder, "POST /api/domains/prewarmed")
            .await?;
        Ok(envelope.domains)
    }

    /// Lists placed domain orders.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn domain_orders(&self, limit: u32) -> Result<Vec<DomainOrder>, ApiError> {
        let url = self.endpoint("api/domains/orders")?;
        let builder = self
            .client
            .get(url)
            .query(&[("limit", limit.to_string())])
            .timeout(self.request_timeout);
        let envelope: DomainOrdersResponse =
            self.send_json(builder, "GET /api/domains/orders").await?;
        Ok(envelope.items)
    }

    /// Quotes (with `simulation: true`) or places a pre-warmed domain order.
    ///
    /// # Errors
    ///
    /// See [`CampaignApiClient::list_campaigns`].
    pub async fn order_prewarmed(
        &self,
        request: &OrderPrewarmedRequest,
    ) -> Result<DomainOrderQuote, ApiError> {
        let url = self.endpoint("api/domains/order/prewarmed")?;
        let builder = self
            .client
            .post(url)
            .json(request)
            .timeout(self.request_timeout);
        self.send_json(builder, "POST /api/domains/order/prewarmed")
            .await
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Url(format!("invalid endpoint '{path}': {e}")))
    }

    async fn open_stream<B: serde::Serialize>(
        &self,
        endpoint: Url,
        body: &B,
        cancel: CancelToken,
    ) -> Result<EventStream, ApiError> {
        let response = self.client.post(endpoint).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_detail(&body),
            });
        }
        Ok(EventStream::from_response(response, cancel))
    }

    /// Sends the request, maps non-2xx statuses to [`ApiError::Api`], and
    /// parses the body as `T`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_detail(&body),
            });
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Pulls the FastAPI `detail` field out of an error body, falling back to the
/// raw body text.
fn extract_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.detail,
        Err(_) if body.trim().is_empty() => "unknown error".to_owned(),
        Err(_) => body.trim().to_owned(),
    }
}
