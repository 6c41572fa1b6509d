//! Integration tests for the LinkedIn launch flow against wiremock.

use outflow_api::CampaignApiClient;
use outflow_wizard::{LinkedinFlow, LinkedinLauncher, WizardError};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn launcher(server: &MockServer) -> LinkedinLauncher {
    let client = CampaignApiClient::with_base_url(&server.uri(), "test-user", 30, 180)
        .expect("client construction should not fail");
    LinkedinLauncher::new(client)
}

async fn mount_accounts(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/linkedin/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "has_account": true,
            "accounts": [{"id": "acct-9", "name": "Jane Doe"}]
        })))
        .mount(server)
        .await;
}

async fn mount_compose_calls(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/linkedin/generate-message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "Hi {{first_name}}, saw your work at {{company_name}}."
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/linkedin/campaign-leads/C1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "leads": [
                {"email": "a@x.com", "first_name": "Ada", "linkedin_url": "https://linkedin.com/in/ada"}
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn begin_without_account_prompts_for_connection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/linkedin/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "has_account": false,
            "accounts": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/linkedin/connect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "auth_url": "https://auth.connector.example/session/1"
        })))
        .mount(&server)
        .await;

    let mut flow = launcher(&server);
    flow.begin("C1").await.expect("begin should succeed");
    assert!(matches!(
        flow.flow(),
        LinkedinFlow::ConnectPrompt { auth_url } if auth_url.contains("auth.connector.example")
    ));
}

#[tokio::test]
async fn full_flow_reaches_launched() {
    let server = MockServer::start().await;
    mount_accounts(&server).await;
    mount_compose_calls(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/linkedin/launch-campaign"))
        .and(body_partial_json(serde_json::json!({
            "campaign_id": "C1",
            "account_id": "acct-9"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "sent_count": 5,
            "connection_requests_sent": 2,
            "needs_auth": false
        })))
        .mount(&server)
        .await;

    let mut flow = launcher(&server);
    flow.begin("C1").await.expect("begin");
    assert!(matches!(flow.flow(), LinkedinFlow::SelectAccount { accounts, .. } if accounts.len() == 1));

    flow.choose_account("acct-9").await.expect("choose account");
    let LinkedinFlow::Compose { message, leads, .. } = flow.flow() else {
        panic!("expected compose state, got {:?}", flow.flow());
    };
    assert!(message.contains("{{first_name}}"));
    assert_eq!(leads.len(), 1);

    flow.edit_message("Hi Ada, quick question.").expect("edit");
    flow.request_launch().expect("request launch");
    assert!(matches!(flow.flow(), LinkedinFlow::ConfirmLaunch { .. }));

    flow.confirm_launch().await.expect("launch");
    assert!(matches!(
        flow.flow(),
        LinkedinFlow::Launched { sent_count: 5, connection_requests_sent: 2 }
    ));
}

#[tokio::test]
async fn needs_auth_routes_back_to_connect_prompt() {
    let server = MockServer::start().await;
    mount_accounts(&server).await;
    mount_compose_calls(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/linkedin/launch-campaign"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "needs_auth": true,
            "message": "LinkedIn session expired"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/linkedin/connect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "auth_url": "https://auth.connector.example/session/2"
        })))
        .mount(&server)
        .await;

    let mut flow = launcher(&server);
    flow.begin("C1").await.expect("begin");
    flow.choose_account("acct-9").await.expect("choose account");
    flow.request_launch().expect("request launch");
    flow.confirm_launch().await.expect("launch call succeeds");

    assert!(matches!(flow.flow(), LinkedinFlow::ConnectPrompt { .. }));
}

#[tokio::test]
async fn transitions_outside_their_state_are_rejected() {
    let server = MockServer::start().await;
    mount_accounts(&server).await;
    mount_compose_calls(&server).await;

    let mut flow = launcher(&server);
    assert!(matches!(
        flow.edit_message("hello"),
        Err(WizardError::Validation(_))
    ));
    assert!(matches!(flow.request_launch(), Err(WizardError::Validation(_))));
    assert!(matches!(
        flow.confirm_launch().await,
        Err(WizardError::Validation(_))
    ));

    flow.begin("C1").await.expect("begin");
    assert!(matches!(
        flow.choose_account("missing").await,
        Err(WizardError::Validation(_))
    ));

    flow.choose_account("acct-9").await.expect("choose account");
    flow.request_launch().expect("request launch");
    flow.cancel_launch().expect("cancel back to compose");
    assert!(matches!(flow.flow(), LinkedinFlow::Compose { .. }));

    flow.reset();
    assert!(matches!(flow.flow(), LinkedinFlow::Idle));
}

#[tokio::test]
async fn empty_message_cannot_reach_the_launch_gate() {
    let server = MockServer::start().await;
    mount_accounts(&server).await;
    mount_compose_calls(&server).await;

    let mut flow = launcher(&server);
    flow.begin("C1").await.expect("begin");
    flow.choose_account("acct-9").await.expect("choose account");
    flow.edit_message("   ").expect("edit");
    assert!(matches!(flow.request_launch(), Err(WizardError::Validation(_))));
    assert!(matches!(flow.flow(), LinkedinFlow::Compose { .. }));
}
