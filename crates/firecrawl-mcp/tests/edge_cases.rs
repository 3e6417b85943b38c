//! Edge case integration tests for firecrawl-mcp.
//!
//! Drives the protocol handler end to end against a mock Firecrawl API.

use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use firecrawl_core::{ClientConfig, FirecrawlClient};
use firecrawl_mcp::protocol::ProtocolHandler;
use firecrawl_mcp::transport::{framing, StdioTransport};
use firecrawl_mcp::types::error_codes::*;
use firecrawl_mcp::types::mcp_error_codes::*;
use firecrawl_mcp::types::*;

// ─────────────────────── helpers ───────────────────────

fn handler_for(server: &MockServer) -> ProtocolHandler {
    let client =
        FirecrawlClient::new(ClientConfig::new("fc-test-key").with_api_url(server.uri())).unwrap();
    ProtocolHandler::new(Arc::new(client))
}

/// Build an MCP JSON-RPC request.
fn mcp_request(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

/// Build an initialize request.
fn init_request() -> Value {
    mcp_request(
        0,
        "initialize",
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "1.0" }
        }),
    )
}

fn tool_call(id: i64, name: &str, arguments: Value) -> Value {
    mcp_request(id, "tools/call", json!({ "name": name, "arguments": arguments }))
}

/// Send a JSON-RPC message through the handler and return the response.
async fn send(handler: &ProtocolHandler, msg: Value) -> Option<Value> {
    let parsed: JsonRpcMessage = serde_json::from_value(msg).unwrap();
    handler.handle_message(parsed).await
}

/// Send and unwrap the response.
async fn send_unwrap(handler: &ProtocolHandler, msg: Value) -> Value {
    send(handler, msg).await.expect("expected response")
}

/// Text of the first content block of a tool result.
fn tool_text(resp: &Value) -> &str {
    resp["result"]["content"][0]["text"].as_str().unwrap()
}

fn tool_json(resp: &Value) -> Value {
    serde_json::from_str(tool_text(resp)).unwrap()
}

fn is_error(resp: &Value) -> bool {
    resp["result"]["isError"].as_bool().unwrap_or(false)
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|r| r.len())
        .unwrap_or(0)
}

// ─────────────────────── lifecycle ───────────────────────

#[tokio::test]
async fn initialize_reports_server_and_capabilities() {
    let server = MockServer::start().await;
    let handler = handler_for(&server);

    let resp = send_unwrap(&handler, init_request()).await;
    assert_eq!(resp["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(resp["result"]["serverInfo"]["name"], "firecrawl-mcp");
    assert!(resp["result"]["capabilities"]["tools"].is_object());

    assert!(!handler.is_initialized().await);
    let notif = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
    assert!(send(&handler, notif).await.is_none());
    assert!(handler.is_initialized().await);
}

#[tokio::test]
async fn tools_list_has_all_ten_tools() {
    let server = MockServer::start().await;
    let handler = handler_for(&server);

    let resp = send_unwrap(&handler, mcp_request(1, "tools/list", json!({}))).await;
    let names: Vec<&str> = resp["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();

    assert_eq!(names.len(), 10);
    for expected in [
        "scrape_url",
        "search",
        "start_crawl",
        "check_crawl_status",
        "cancel_crawl",
        "start_batch_scrape",
        "check_batch_scrape_status",
        "start_extract",
        "check_extract_status",
        "quick_web_extract",
    ] {
        assert!(names.contains(&expected), "missing {expected}");
    }
}

#[tokio::test]
async fn cancellation_notification_gets_no_reply() {
    let server = MockServer::start().await;
    let handler = handler_for(&server);

    let notif = json!({
        "jsonrpc": "2.0",
        "method": "notifications/cancelled",
        "params": { "requestId": 7, "reason": "user aborted" }
    });
    assert!(send(&handler, notif).await.is_none());
}

// ─────────────────────── tool errors ───────────────────────

#[tokio::test]
async fn malformed_url_fails_without_remote_call() {
    let server = MockServer::start().await;
    let handler = handler_for(&server);

    let resp = send_unwrap(&handler, tool_call(1, "scrape_url", json!({ "url": "not-a-url" }))).await;
    assert!(is_error(&resp));
    assert!(tool_text(&resp).contains("not-a-url"));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn missing_argument_is_invalid_params() {
    let server = MockServer::start().await;
    let handler = handler_for(&server);

    let resp = send_unwrap(&handler, tool_call(1, "scrape_url", json!({}))).await;
    assert_eq!(resp["error"]["code"], INVALID_PARAMS);
}

#[tokio::test]
async fn unknown_tool_is_tool_not_found() {
    let server = MockServer::start().await;
    let handler = handler_for(&server);

    let resp = send_unwrap(&handler, tool_call(1, "map_site", json!({}))).await;
    assert_eq!(resp["error"]["code"], TOOL_NOT_FOUND);
}

#[tokio::test]
async fn unknown_method_is_method_not_found() {
    let server = MockServer::start().await;
    let handler = handler_for(&server);

    let resp = send_unwrap(&handler, mcp_request(1, "sampling/createMessage", json!({}))).await;
    assert_eq!(resp["error"]["code"], METHOD_NOT_FOUND);
}

#[tokio::test]
async fn remote_failure_is_tool_error_not_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(
            ResponseTemplate::new(402).set_body_json(json!({ "error": "Insufficient credits" })),
        )
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    let resp = send_unwrap(
        &handler,
        tool_call(1, "scrape_url", json!({ "url": "https://a.com" })),
    )
    .await;
    assert!(resp.get("error").is_none());
    assert!(is_error(&resp));
    assert!(tool_text(&resp).contains("Insufficient credits"));
}

// ─────────────────────── jobs ───────────────────────

#[tokio::test]
async fn batch_scrape_scenario() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/batch/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "id": "job_123"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/batch/scrape/job_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "scraping" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/batch/scrape/job_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "total": 2,
            "completed": 2,
            "data": [
                { "markdown": "A", "metadata": { "sourceURL": "https://a.com" } },
                { "markdown": "B", "metadata": { "sourceURL": "https://b.com" } }
            ]
        })))
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    let started = send_unwrap(
        &handler,
        tool_call(
            1,
            "start_batch_scrape",
            json!({ "urls": ["https://a.com", "https://b.com"] }),
        ),
    )
    .await;
    assert!(!is_error(&started));
    let job_id = tool_json(&started)["job_id"].as_str().unwrap().to_string();
    assert_eq!(job_id, "job_123");

    let running = send_unwrap(
        &handler,
        tool_call(2, "check_batch_scrape_status", json!({ "job_id": job_id })),
    )
    .await;
    let running = tool_json(&running);
    assert_eq!(running["state"], "running");
    assert!(running.get("payload").is_none());

    let done = send_unwrap(
        &handler,
        tool_call(3, "check_batch_scrape_status", json!({ "job_id": job_id })),
    )
    .await;
    let done = tool_json(&done);
    assert_eq!(done["state"], "completed");
    assert_eq!(done["payload"]["documents"]["https://a.com"]["markdown"], "A");
    assert_eq!(done["payload"]["documents"]["https://b.com"]["markdown"], "B");
}

#[tokio::test]
async fn invalid_job_id_never_reaches_remote() {
    let server = MockServer::start().await;
    let handler = handler_for(&server);

    let resp = send_unwrap(
        &handler,
        tool_call(1, "check_crawl_status", json!({ "job_id": "../admin" })),
    )
    .await;
    assert!(is_error(&resp));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn cancel_finished_crawl_is_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/crawl/crawl_9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "completed" })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "cancelled" })))
        .expect(0)
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    let resp = send_unwrap(&handler, tool_call(1, "cancel_crawl", json!({ "job_id": "crawl_9" }))).await;
    assert!(is_error(&resp));
    assert!(tool_text(&resp).contains("crawl_9"));
    assert!(tool_text(&resp).contains("already completed"));
}

#[tokio::test]
async fn scrape_url_tool_returns_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .and(body_partial_json(json!({ "url": "https://a.com/" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "markdown": "# Alpha",
                "metadata": { "sourceURL": "https://a.com/" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    let resp = send_unwrap(&handler, tool_call(1, "scrape_url", json!({ "url": "https://a.com" }))).await;
    assert!(!is_error(&resp));
    let doc = tool_json(&resp);
    assert_eq!(doc["markdown"], "# Alpha");
    assert_eq!(doc["metadata"]["sourceURL"], "https://a.com/");
}

#[tokio::test]
async fn quick_extract_returns_data_by_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .and(body_partial_json(json!({ "url": "https://a.com/", "formats": ["extract"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "extract": { "price": 10 } }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .and(body_partial_json(json!({ "url": "https://b.com/", "formats": ["extract"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "extract": { "price": 12 } }
        })))
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    let resp = send_unwrap(
        &handler,
        tool_call(
            1,
            "quick_web_extract",
            json!({
                "urls": ["https://a.com", "https://b.com"],
                "schema": { "price": "number" }
            }),
        ),
    )
    .await;
    assert!(!is_error(&resp));
    let data = tool_json(&resp);
    assert_eq!(data["https://a.com"]["price"], 10);
    assert_eq!(data["https://b.com"]["price"], 12);
}

#[tokio::test]
async fn quick_extract_without_schema_or_prompt_fails() {
    let server = MockServer::start().await;
    let handler = handler_for(&server);

    let resp = send_unwrap(
        &handler,
        tool_call(1, "quick_web_extract", json!({ "urls": ["https://a.com"] })),
    )
    .await;
    assert!(is_error(&resp));
    assert_eq!(request_count(&server).await, 0);
}

// ─────────────────────── resources & prompts ───────────────────────

#[tokio::test]
async fn config_resource_does_not_leak_key() {
    let server = MockServer::start().await;
    let handler = handler_for(&server);

    let resp = send_unwrap(
        &handler,
        mcp_request(1, "resources/read", json!({ "uri": "firecrawl://config" })),
    )
    .await;
    let text = resp["result"]["contents"][0]["text"].as_str().unwrap();
    assert!(text.contains(&server.uri()));
    assert!(!text.contains("fc-test-key"));
}

#[tokio::test]
async fn unknown_job_resource_is_resource_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/extract/ext_404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Job not found" })))
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    let resp = send_unwrap(
        &handler,
        mcp_request(1, "resources/read", json!({ "uri": "firecrawl://extract/ext_404" })),
    )
    .await;
    assert_eq!(resp["error"]["code"], RESOURCE_NOT_FOUND);
}

#[tokio::test]
async fn resource_templates_cover_every_job_kind() {
    let server = MockServer::start().await;
    let handler = handler_for(&server);

    let resp = send_unwrap(&handler, mcp_request(1, "resources/templates/list", json!({}))).await;
    let templates = resp["result"]["resourceTemplates"].as_array().unwrap();
    assert_eq!(templates.len(), 3);
}

#[tokio::test]
async fn prompt_expands_with_arguments() {
    let server = MockServer::start().await;
    let handler = handler_for(&server);

    let resp = send_unwrap(
        &handler,
        mcp_request(
            1,
            "prompts/get",
            json!({ "name": "extract_data", "arguments": { "urls": "https://a.com", "fields": "title, price" } }),
        ),
    )
    .await;
    let text = resp["result"]["messages"][0]["content"]["text"].as_str().unwrap();
    assert!(text.contains("title, price"));
    assert!(text.contains("quick_web_extract"));

    let resp = send_unwrap(&handler, mcp_request(2, "prompts/get", json!({ "name": "nope" }))).await;
    assert_eq!(resp["error"]["code"], PROMPT_NOT_FOUND);
}

// ─────────────────────── transport ───────────────────────

#[tokio::test]
async fn malformed_json_gets_parse_error() {
    let err = framing::parse_message("{not json").unwrap_err();
    let framed = framing::parse_error_response(&err).unwrap();
    let value: Value = serde_json::from_str(framed.trim()).unwrap();
    assert_eq!(value["error"]["code"], PARSE_ERROR);
    assert!(value["id"].is_null());
}

#[tokio::test]
async fn stdio_serves_requests_until_eof() {
    let server = MockServer::start().await;
    let transport = StdioTransport::new(handler_for(&server));

    let input = format!(
        "{}\n\n{}\n{{broken\n{}\n",
        init_request(),
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        mcp_request(1, "ping", json!({})),
    );
    let mut output = Vec::new();
    transport.serve(input.as_bytes(), &mut output).await.unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    // initialize, parse error, ping; the notification and blank line get nothing
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["id"], 0);
    assert_eq!(lines[1]["error"]["code"], PARSE_ERROR);
    assert_eq!(lines[2]["id"], 1);
    assert!(lines[2]["result"].is_object());
}

fn served_lines(output: Vec<u8>) -> Vec<Value> {
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[tokio::test]
async fn stdio_survives_non_utf8_line() {
    let server = MockServer::start().await;
    let transport = StdioTransport::new(handler_for(&server));

    let mut input = b"\xff\xfe garbage\n".to_vec();
    input.extend_from_slice(format!("{}\n", mcp_request(1, "ping", json!({}))).as_bytes());
    let mut output = Vec::new();
    transport.serve(&input[..], &mut output).await.unwrap();

    let lines = served_lines(output);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["error"]["code"], PARSE_ERROR);
    assert!(lines[0]["id"].is_null());
    assert_eq!(lines[1]["id"], 1);
    assert!(lines[1]["result"].is_object());
}

#[tokio::test]
async fn stdio_rejects_oversized_line_and_continues() {
    let server = MockServer::start().await;
    let transport = StdioTransport::new(handler_for(&server));

    let mut input = vec![b' '; framing::MAX_MESSAGE_BYTES + 10];
    input.push(b'\n');
    input.extend_from_slice(format!("{}\n", mcp_request(2, "ping", json!({}))).as_bytes());
    let mut output = Vec::new();
    transport.serve(&input[..], &mut output).await.unwrap();

    let lines = served_lines(output);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["error"]["code"], INVALID_REQUEST);
    assert!(lines[0]["id"].is_null());
    assert_eq!(lines[1]["id"], 2);
}
