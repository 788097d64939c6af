//! End-to-end tests: stdio requests through the registry to a fake panel.

use std::sync::Arc;

use ptero_search::{LazyPanelClient, PanelConfig, SearchError};
use ptero_tools::{ToolMode, ToolRegistry, build_registry, handle_line, run_stdio_server};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn registry_for(server: &MockServer, mode: ToolMode) -> ToolRegistry {
    let client = LazyPanelClient::from_config(PanelConfig::new(server.uri(), "ptla_tools"));
    build_registry(Arc::new(client), mode)
}

async fn call(registry: &ToolRegistry, request: Value) -> Value {
    let response = handle_line(registry, &request.to_string()).await;
    serde_json::to_value(response).expect("serialize response")
}

fn content(response: &Value) -> Value {
    serde_json::from_str(response["content"].as_str().expect("content")).expect("content is JSON")
}

#[tokio::test]
async fn search_users_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/application/users"))
        .and(header("authorization", "Bearer ptla_tools"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"attributes": {"id": 4, "username": "carol", "email": "carol@example.com", "first_name": "Carol", "last_name": "Danvers"}},
                {"attributes": {"id": 5, "username": "zed", "email": "zed@example.com", "first_name": "", "last_name": ""}}
            ],
            "meta": {"pagination": {"total": 2, "per_page": 100, "current_page": 1, "total_pages": 1}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_for(&server, ToolMode::ReadOnly);
    let response = call(
        &registry,
        json!({"id": 1, "tool": "ptero_ai_search_users", "args": {"query": "carol"}}),
    )
    .await;

    assert_eq!(response["ok"], true);
    let result = content(&response);
    let matches = result["matches"].as_array().expect("matches");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["id"], 4);
    assert_eq!(matches[0]["name"], "Carol Danvers");
    assert_eq!(result["scanned"]["items"], 2);
}

#[tokio::test]
async fn route_tool_sends_body_and_encoded_path() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/application/servers/12/details"))
        .and(body_json(json!({"name": "Survival", "user": 4})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"object": "server", "attributes": {"id": 12, "name": "Survival"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_for(&server, ToolMode::Full);
    let response = call(
        &registry,
        json!({
            "id": "patch",
            "tool": "ptero_app_patch_servers_server_details",
            "args": {"server": 12, "body": {"name": "Survival", "user": 4}}
        }),
    )
    .await;

    assert_eq!(response["ok"], true, "{response}");
    assert_eq!(content(&response)["attributes"]["name"], "Survival");
}

#[tokio::test]
async fn no_content_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/application/servers/3/suspend"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_for(&server, ToolMode::Full);
    let response = call(
        &registry,
        json!({"id": 9, "tool": "ptero_app_post_servers_server_suspend", "args": {"server": "3"}}),
    )
    .await;

    assert_eq!(content(&response), json!({"status": 204}));
}

#[tokio::test]
async fn panel_errors_become_tool_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/application/users/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"code": "NotFoundHttpException", "status": "404", "detail": "not found"}]
        })))
        .mount(&server)
        .await;

    let registry = registry_for(&server, ToolMode::ReadOnly);
    let response = call(
        &registry,
        json!({"id": 2, "tool": "ptero_ai_get_user_summary", "args": {"user": 999}}),
    )
    .await;

    assert_eq!(response["ok"], false);
    assert_eq!(response["error"]["code"], "PANEL_ERROR");
    assert!(
        response["error"]["message"]
            .as_str()
            .expect("message")
            .contains("404")
    );
}

#[tokio::test]
async fn read_only_blocks_writes_without_calling_panel() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let registry = registry_for(&server, ToolMode::ReadOnly);
    let response = call(
        &registry,
        json!({"id": 3, "tool": "ptero_app_delete_servers_server", "args": {"server": 1}}),
    )
    .await;
    assert_eq!(response["error"]["code"], "TOOL_BLOCKED");

    let response = call(
        &registry,
        json!({"id": 4, "tool": "ptero_app_request", "args": {"method": "DELETE", "path": "/api/application/servers/1"}}),
    )
    .await;
    assert_eq!(response["error"]["code"], "TOOL_BLOCKED");
}

#[tokio::test]
async fn tools_list_works_without_configuration() {
    let client = LazyPanelClient::new(|| Err(SearchError::Config("PANEL_URL is not set".into())));
    let registry = build_registry(Arc::new(client), ToolMode::Full);

    let response = call(&registry, json!({"id": 1, "tool": "tools/list"})).await;
    let tools = response["tools"].as_array().expect("tools");
    assert!(tools.iter().any(|t| t["name"] == "ptero_ai_panel_totals"));

    let response = call(&registry, json!({"id": 2, "tool": "ptero_ai_panel_totals"})).await;
    assert_eq!(response["error"]["code"], "CONFIG_INVALID");
}

#[tokio::test]
async fn stdio_session_answers_every_line() {
    let server = MockServer::start().await;
    for (collection, total) in [
        ("users", 42),
        ("servers", 7),
        ("nodes", 2),
        ("locations", 1),
        ("nests", 5),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("/api/application/{collection}")))
            .and(query_param("per_page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [],
                "meta": {"pagination": {"total": total}}
            })))
            .mount(&server)
            .await;
    }

    let registry = registry_for(&server, ToolMode::ReadOnly);
    let input = concat!(
        r#"{"id": 1, "tool": "ptero_ai_panel_totals", "args": {}}"#,
        "\n",
        r#"{"id": 2, "tool": "ptero_ai_panel_totals", "args": {"extra": true}}"#,
        "\n",
    );
    let mut output = Vec::new();
    run_stdio_server(&registry, input.as_bytes(), &mut output)
        .await
        .expect("serve");

    let lines: Vec<Value> = String::from_utf8(output)
        .expect("utf8")
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        content(&lines[0]),
        json!({"locations": 1, "nests": 5, "nodes": 2, "servers": 7, "users": 42})
    );
    assert_eq!(lines[1]["error"]["code"], "TOOL_VALIDATION");
    assert!(
        lines[1]["error"]["message"]
            .as_str()
            .expect("message")
            .contains("extra")
    );
}
