mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

const NOT_ALLOWED: &str = "Not Allowed To Access This Endpoint";

#[tokio::test]
async fn missing_token_is_rejected_everywhere() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let requests = [
        client.get(server.url("/api/v1/projects")),
        client.post(server.url("/api/v1/projects")).json(&json!({ "name": "kanban" })),
        client.get(server.url("/api/v1/projects/1")),
        client.put(server.url("/api/v1/projects/1")).json(&json!({ "name": "kanban" })),
        client.delete(server.url("/api/v1/projects/1")),
    ];

    for request in requests {
        let res = request.send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = res.json::<Value>().await?;
        assert_eq!(body, json!({ "message": NOT_ALLOWED, "status_code": 401 }));
    }
    Ok(())
}

#[tokio::test]
async fn expired_token_is_unauthorized() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::forge_token("a@b.com", "1", -60);

    let res = reqwest::Client::new()
        .get(server.url("/api/v1/projects"))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new()
        .get(server.url("/api/v1/projects"))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], NOT_ALLOWED);
    Ok(())
}

#[tokio::test]
async fn valid_token_reaches_stubs() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::forge_token("a@b.com", "1", 600);

    let res = client
        .get(server.url("/api/v1/projects"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "application/json");

    let res = client
        .put(server.url("/api/v1/projects/42"))
        .bearer_auth(&token)
        .json(&json!({ "name": "renamed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["id"], "42");
    assert_eq!(body["message"], "Update not implemented");

    let res = client
        .delete(server.url("/api/v1/projects/42"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn invalid_project_body_is_rejected_before_storage() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::forge_token("a@b.com", "1", 600);

    // A body that got past validation would fail at the store with "Invalid Request".
    let res = reqwest::Client::new()
        .post(server.url("/api/v1/projects"))
        .bearer_auth(&token)
        .json(&json!({ "description": "missing a name", "dependencies": [1, 2] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let message = res.json::<Value>().await?["message"].as_str().unwrap_or_default().to_string();
    assert!(message.contains("name"), "unexpected message {}", message);
    Ok(())
}

#[tokio::test]
async fn login_body_is_schema_checked() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/v1/auth/login"))
        .json(&json!({ "user_name": "a@b.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(server.url("/api/v1/auth/register"))
        .header("content-type", "application/json")
        .body("[]")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "Invalid Request Payload");
    Ok(())
}
