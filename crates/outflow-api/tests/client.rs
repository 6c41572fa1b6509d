//! Integration tests for `CampaignApiClient` using wiremock HTTP mocks.

use outflow_api::types::OrderPrewarmedRequest;
use outflow_api::{ApiError, CampaignApiClient};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> CampaignApiClient {
    CampaignApiClient::with_base_url(base_url, "test-user", 30, 180)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn list_campaigns_sends_user_id_and_parses_rows() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "success": true,
        "campaigns": [
            {
                "id": "row-1",
                "campaign_id": "C1",
                "url": "https://acme.test",
                "target_audience": "Heads of RevOps",
                "status": "active",
                "sent": 120,
                "opened": 48,
                "replied": 6,
                "open_rate": 40.0,
                "reply_rate": 5.0,
                "created_at": "2025-07-01T09:30:00Z"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/campaigns"))
        .and(query_param("user_id", "test-user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let campaigns = client.list_campaigns().await.expect("should parse campaigns");

    assert_eq!(campaigns.len(), 1);
    assert_eq!(campaigns[0].campaign_id, "C1");
    assert_eq!(campaigns[0].status, "active");
    assert_eq!(campaigns[0].sent, 120);
    assert!(campaigns[0].created_at.is_some());
}

#[tokio::test]
async fn analyze_icps_parses_profiles() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "success": true,
        "icps": [
            {
                "name": "Seed-stage SaaS founders",
                "description": "Founders without a sales team",
                "target_audience": "Founders at 2-15 person B2B SaaS companies",
                "pain_points": ["No outbound motion", "No time to prospect"],
                "company_size": "2-15"
            },
            {
                "name": "Agency owners",
                "target_audience": "Owners of marketing agencies",
                "pain_points": [],
                "company_size": "5-50"
            }
        ],
        "url": "https://acme.test"
    });

    Mock::given(method("POST"))
        .and(path("/api/icp/analyze"))
        .and(body_partial_json(serde_json::json!({"url": "https://acme.test"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let icps = client
        .analyze_icps("https://acme.test")
        .await
        .expect("should parse ICPs");

    assert_eq!(icps.len(), 2);
    assert_eq!(icps[0].name, "Seed-stage SaaS founders");
    assert_eq!(icps[0].pain_points.len(), 2);
    assert_eq!(icps[1].description, "");
}

#[tokio::test]
async fn search_leads_returns_enrichment_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/icp/search-leads"))
        .and(body_partial_json(serde_json::json!({
            "url": "https://acme.test",
            "target_audience": "Founders",
            "lead_count": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "enrichment_id": "E1",
            "message": "Lead search started."
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let enrichment_id = client
        .search_leads("https://acme.test", "Founders", 10)
        .await
        .expect("should return enrichment id");
    assert_eq!(enrichment_id, "E1");
}

#[tokio::test]
async fn lead_preview_parses_enriching_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/icp/leads/E1"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "leads": [],
            "enriching_count": 3
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let preview = client
        .lead_preview("E1", 10)
        .await
        .expect("should parse preview");
    assert!(!preview.success);
    assert!(preview.leads.is_empty());
    assert_eq!(preview.enriching_count, 3);
}

#[tokio::test]
async fn match_domains_parses_both_lists() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/icp/match-domains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "matched_domains": [
                {
                    "domain": "acme-mail.com",
                    "score": 92,
                    "reasoning": "Close to your brand name",
                    "suggested_use": "Primary sending domain"
                }
            ],
            "existing_accounts": [
                {
                    "email": "jane@acme-mail.com",
                    "first_name": "Jane",
                    "last_name": "Doe",
                    "warmup_status": 1
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let matches = client
        .match_domains("https://acme.test")
        .await
        .expect("should parse match response");

    assert_eq!(matches.matched_domains.len(), 1);
    assert_eq!(matches.matched_domains[0].score, 92);
    assert_eq!(matches.existing_accounts.len(), 1);
    assert!(matches.existing_accounts[0].is_pre_warmed);
}

#[tokio::test]
async fn non_2xx_surfaces_fastapi_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/icp/generate-emails"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "detail": "copy generation failed"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let icp = sample_icp();
    let result = client.generate_emails("https://acme.test", &icp).await;

    match result {
        Err(ApiError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "copy generation failed");
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn regenerate_email_sends_variant_index() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/icp/regenerate-email"))
        .and(body_partial_json(serde_json::json!({"variant_index": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "variant": {"subject": "Fresh angle", "body": "Hi {{first_name}},"}
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let variant = client
        .regenerate_email("https://acme.test", &sample_icp(), 1)
        .await
        .expect("should parse variant");
    assert_eq!(variant.subject, "Fresh angle");
}

#[tokio::test]
async fn linkedin_launch_parses_outcome() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/linkedin/launch-campaign"))
        .and(body_partial_json(serde_json::json!({
            "campaign_id": "C1",
            "account_id": "acct-9",
            "user_id": "test-user"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "sent_count": 7,
            "connection_requests_sent": 3,
            "needs_auth": false
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = client
        .linkedin_launch("C1", "Hi there", "acct-9")
        .await
        .expect("should parse launch outcome");
    assert_eq!(outcome.sent_count, 7);
    assert_eq!(outcome.connection_requests_sent, 3);
    assert!(!outcome.needs_auth);
}

#[tokio::test]
async fn order_prewarmed_round_trips_simulation_flag() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/domains/order/prewarmed"))
        .and(body_partial_json(serde_json::json!({
            "domain": "acme-mail.com",
            "number_of_accounts": 2,
            "simulation": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "order_is_valid": true,
            "number_of_domains_ordered": 1,
            "number_of_accounts_ordered": 2,
            "total_price": 34.0,
            "total_price_per_month": 12.0,
            "order_placed": false
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let quote = client
        .order_prewarmed(&OrderPrewarmedRequest {
            domain: "acme-mail.com".to_owned(),
            number_of_accounts: 2,
            simulation: true,
        })
        .await
        .expect("should parse quote");

    assert!(quote.order_is_valid);
    assert!(!quote.order_placed);
    assert!((quote.total_price - 34.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn confirm_leads_posts_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/confirm-leads"))
        .and(body_partial_json(serde_json::json!({
            "session_id": "S1",
            "confirmed": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .confirm_leads("S1", true)
        .await
        .expect("confirm should succeed");
}

fn sample_icp() -> outflow_api::types::IcpProfile {
    outflow_api::types::IcpProfile {
        name: "Founders".to_owned(),
        description: String::new(),
        target_audience: "Founders at seed-stage SaaS".to_owned(),
        pain_points: vec![],
        company_size: "2-15".to_owned(),
    }
}
