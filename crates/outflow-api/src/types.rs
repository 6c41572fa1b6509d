//! Remote Campaign API wire types.
//!
//! Response structs model only the fields this client consumes; everything
//! else in a response body is ignored. Optional wire fields carry
//! `#[serde(default)]` so partially-populated payloads from the backend's
//! best-effort enrichment stages still deserialize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Campaign dashboard
// ---------------------------------------------------------------------------

/// Envelope for `GET /api/campaigns`.
#[derive(Debug, Deserialize)]
pub struct CampaignsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

/// A previously created campaign as stored by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Campaign {
    #[serde(default)]
    pub id: String,
    pub campaign_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub sent: u64,
    #[serde(default)]
    pub opened: u64,
    #[serde(default)]
    pub clicked: u64,
    #[serde(default)]
    pub replied: u64,
    #[serde(default)]
    pub open_rate: f64,
    #[serde(default)]
    pub click_rate: f64,
    #[serde(default)]
    pub reply_rate: f64,
    /// Lead-list id from the sourcing run, when one exists; key for
    /// `GET /api/leads/{list_id}`.
    #[serde(default)]
    pub supersearch_list_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Envelope for `GET /api/analytics/{campaign_id}`.
#[derive(Debug, Deserialize)]
pub struct AnalyticsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub campaign_id: String,
    #[serde(default)]
    pub analytics: CampaignAnalytics,
}

/// Sending-platform counters for one campaign.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CampaignAnalytics {
    #[serde(default)]
    pub sent: u64,
    #[serde(default)]
    pub opened: u64,
    #[serde(default)]
    pub clicked: u64,
    #[serde(default)]
    pub replied: u64,
    #[serde(default)]
    pub open_rate: f64,
    #[serde(default)]
    pub click_rate: f64,
    #[serde(default)]
    pub reply_rate: f64,
}

// ---------------------------------------------------------------------------
// Leads
// ---------------------------------------------------------------------------

/// One sourced prospect. `email` is the identity within a result set;
/// everything else is enrichment data that may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "linkedin")]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Envelope for `GET /api/leads/{list_id}`.
#[derive(Debug, Deserialize)]
pub struct LeadListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub leads: Vec<Lead>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Envelope for `GET /api/icp/leads/{enrichment_id}` — one poll attempt's view
/// of an in-progress enrichment.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadPreview {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub leads: Vec<Lead>,
    /// Number of prospects found but still waiting on contact enrichment.
    #[serde(default)]
    pub enriching_count: u32,
}

// ---------------------------------------------------------------------------
// ICP analysis
// ---------------------------------------------------------------------------

/// An Ideal Customer Profile suggested by the analysis endpoint. Immutable
/// once received; the user selects exactly one for the rest of the flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcpProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub target_audience: String,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub company_size: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub success: bool,
    pub icps: Vec<IcpProfile>,
}

#[derive(Debug, Deserialize)]
pub struct LeadSearchResponse {
    #[serde(default)]
    pub success: bool,
    /// Correlation id for the enrichment poll loop. The backend returns the
    /// lead-list resource id here, not the raw enrichment job id.
    pub enrichment_id: String,
}

// ---------------------------------------------------------------------------
// Email copy
// ---------------------------------------------------------------------------

/// One email copy alternative of an A/B set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailVariant {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateEmailsResponse {
    #[serde(default)]
    pub success: bool,
    pub variants: Vec<EmailVariant>,
}

#[derive(Debug, Deserialize)]
pub struct RegenerateEmailResponse {
    #[serde(default)]
    pub success: bool,
    pub variant: EmailVariant,
}

// ---------------------------------------------------------------------------
// Sending identities
// ---------------------------------------------------------------------------

/// A pre-provisioned "done-for-you" sending domain suggested for this
/// campaign, with the matcher's 0–100 fit score.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DfyDomain {
    pub domain: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub suggested_use: String,
}

/// An email sending account already provisioned in the user's workspace.
///
/// The backend spells these fields differently per endpoint
/// (`email_provider`/`is_pre_warmed_up`/`timestamp_created` on the domains
/// endpoints, `warmup_status` on the matcher); aliases normalize them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmailAccount {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, alias = "email_provider")]
    pub provider_code: i64,
    #[serde(
        default,
        alias = "is_pre_warmed_up",
        alias = "warmup_status",
        deserialize_with = "flag_from_bool_or_int"
    )]
    pub is_pre_warmed: bool,
    #[serde(default, alias = "timestamp_created")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "timestamp_cancelled")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Envelope for `POST /api/icp/match-domains`.
#[derive(Debug, Default, Deserialize)]
pub struct DomainMatchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub matched_domains: Vec<DfyDomain>,
    #[serde(default)]
    pub existing_accounts: Vec<EmailAccount>,
}

// ---------------------------------------------------------------------------
// Campaign creation
// ---------------------------------------------------------------------------

/// Body for `POST /api/create-campaign-stream` (the non-ICP streamed flow).
#[derive(Debug, Clone, Serialize)]
pub struct CampaignStreamRequest {
    pub campaign_name: String,
    pub url: String,
    pub target_audience: String,
    pub sender_name: String,
    pub lead_count: u32,
    pub user_id: String,
}

/// Body for `POST /api/icp/create-campaign` — the full accumulated wizard
/// draft: selected profile, enrichment correlation id, approved copy, and
/// the chosen sending identities.
#[derive(Debug, Clone, Serialize)]
pub struct IcpCampaignRequest {
    pub campaign_name: String,
    pub url: String,
    pub user_id: String,
    pub selected_icp: IcpProfile,
    pub enrichment_id: String,
    pub lead_count: u32,
    pub approved_variants: Vec<EmailVariant>,
    pub selected_domains: Vec<String>,
    pub selected_accounts: Vec<String>,
    pub sender_name: String,
}

/// Envelope for the one-shot `POST /api/create-campaign` fallback.
#[derive(Debug, Deserialize)]
pub struct CreateCampaignResponse {
    #[serde(default)]
    pub variants: Vec<EmailVariant>,
    pub campaign_id: String,
}

// ---------------------------------------------------------------------------
// LinkedIn
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LinkedinAccountsResponse {
    #[serde(default)]
    pub has_account: bool,
    #[serde(default)]
    pub accounts: Vec<LinkedinAccount>,
}

/// A connected LinkedIn account in the messaging connector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinkedinAccount {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LinkedinConnectResponse {
    #[serde(default)]
    pub success: bool,
    pub auth_url: String,
}

#[derive(Debug, Deserialize)]
pub struct LinkedinMessageResponse {
    #[serde(default)]
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LinkedinLeadsResponse {
    #[serde(default)]
    pub leads: Vec<Lead>,
}

/// Outcome of `POST /api/linkedin/launch-campaign`. `needs_auth` means the
/// connector session expired and the user must re-run the hosted auth flow.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkedinLaunchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub sent_count: u32,
    #[serde(default)]
    pub connection_requests_sent: u32,
    #[serde(default)]
    pub needs_auth: bool,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Domain purchasing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PrewarmedDomainsResponse {
    #[serde(default)]
    pub domains: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DomainOrdersResponse {
    #[serde(default)]
    pub items: Vec<DomainOrder>,
}

/// One placed domain order in the sending platform's workspace.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DomainOrder {
    #[serde(default)]
    pub workspace_id: String,
    pub domain: String,
    #[serde(default)]
    pub forwarding_domain: Option<String>,
    #[serde(default)]
    pub is_pre_warmed_up: bool,
    #[serde(default)]
    pub timestamp_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub timestamp_cancelled: Option<DateTime<Utc>>,
}

/// Body for `POST /api/domains/order/prewarmed`. With `simulation` set the
/// backend prices the order without placing it.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPrewarmedRequest {
    pub domain: String,
    pub number_of_accounts: u32,
    pub simulation: bool,
}

/// Pricing breakdown for a (simulated or placed) pre-warmed domain order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DomainOrderQuote {
    #[serde(default)]
    pub order_is_valid: bool,
    #[serde(default)]
    pub number_of_domains_ordered: u32,
    #[serde(default)]
    pub number_of_accounts_ordered: u32,
    #[serde(default)]
    pub price_per_account_per_month: f64,
    #[serde(default)]
    pub price_per_domain_per_year: f64,
    #[serde(default)]
    pub total_price_per_month: f64,
    #[serde(default)]
    pub total_price_per_year: f64,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub total_discount: f64,
    #[serde(default)]
    pub order_placed: bool,
}

/// Accepts `true`/`false` as well as the 0/1 integers some endpoints use for
/// warm-up flags.
fn flag_from_bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => b,
        Raw::Int(n) => n != 0,
    })
}
