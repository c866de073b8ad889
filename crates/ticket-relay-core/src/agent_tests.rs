//! Tests for the fire-and-forget agent launcher.

use super::*;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn launcher_for(server: &MockServer, api_key: Option<&str>, repository: Option<&str>) -> AgentLauncher {
    AgentLauncher::new(AgentConfig {
        api_key: api_key.map(str::to_string),
        repository: repository.map(str::to_string),
        git_ref: "main".to_string(),
        agents_url: format!("{}/v0/agents", server.uri()),
    })
}

/// Wait for the detached launch task to reach the mock server.
async fn wait_for_requests(server: &MockServer, count: usize) {
    for _ in 0..100 {
        let received = server.received_requests().await.unwrap_or_default().len();
        if received >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn received_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| serde_json::from_slice(&request.body).expect("launch body is JSON"))
        .collect()
}

#[tokio::test]
async fn test_launch_posts_prompt_source_and_target() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v0/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "agent-123",
            "target": { "branchName": "PROJ-1/cursor" }
        })))
        .mount(&server)
        .await;

    let launcher = launcher_for(&server, Some("test-key"), None);
    launcher.launch(LaunchRequest {
        prompt_text: "Implement the thing".to_string(),
        issue_key: Some("PROJ-1".to_string()),
        repo: Some("https://github.com/acme/widgets".to_string()),
    });

    wait_for_requests(&server, 1).await;
    let bodies = received_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({
            "prompt": { "text": "Implement the thing" },
            "source": {
                "repository": "https://github.com/acme/widgets",
                "ref": "main"
            },
            "target": {
                "branchName": "PROJ-1/cursor",
                "autoCreatePr": true
            }
        })
    );
}

#[tokio::test]
async fn test_launch_uses_basic_auth_derived_from_the_api_key() {
    let server = MockServer::start().await;
    // base64("test-key:")
    Mock::given(method("POST"))
        .and(path("/v0/agents"))
        .and(header("authorization", "Basic dGVzdC1rZXk6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let launcher = launcher_for(&server, Some("test-key"), Some("acme/widgets"));
    launcher.launch(LaunchRequest {
        prompt_text: "Implement the thing".to_string(),
        issue_key: None,
        repo: None,
    });

    wait_for_requests(&server, 1).await;
}

#[tokio::test]
async fn test_target_is_omitted_without_an_issue_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let launcher = launcher_for(&server, Some("test-key"), Some("acme/widgets"));
    launcher.launch(LaunchRequest {
        prompt_text: "Implement the thing".to_string(),
        issue_key: None,
        repo: None,
    });

    wait_for_requests(&server, 1).await;
    let bodies = received_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].get("target").is_none());
    assert_eq!(
        bodies[0].pointer("/source/repository").and_then(Value::as_str),
        Some("acme/widgets")
    );
}

#[tokio::test]
async fn test_launch_without_api_key_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let launcher = launcher_for(&server, None, Some("acme/widgets"));
    launcher.launch(LaunchRequest {
        prompt_text: "Implement the thing".to_string(),
        issue_key: Some("PROJ-1".to_string()),
        repo: None,
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_launch_without_any_repository_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let launcher = launcher_for(&server, Some("test-key"), None);
    launcher.launch(LaunchRequest {
        prompt_text: "Implement the thing".to_string(),
        issue_key: Some("PROJ-1".to_string()),
        repo: None,
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_api_failure_is_swallowed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let launcher = launcher_for(&server, Some("test-key"), Some("acme/widgets"));
    // Must not panic or surface anywhere; failure is only logged.
    launcher.launch(LaunchRequest {
        prompt_text: "Implement the thing".to_string(),
        issue_key: Some("PROJ-1".to_string()),
        repo: None,
    });

    wait_for_requests(&server, 1).await;
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 1);
}

#[tokio::test]
async fn test_unparseable_success_body_still_counts_as_launched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let launcher = launcher_for(&server, Some("test-key"), Some("acme/widgets"));
    launcher.launch(LaunchRequest {
        prompt_text: "Implement the thing".to_string(),
        issue_key: Some("PROJ-1".to_string()),
        repo: None,
    });

    wait_for_requests(&server, 1).await;
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 1);
}
