use bedrock_api::config::BedrockApiConfig;
use bedrock_api::error::BedrockApiError;
use bedrock_api::headers::{build_headers, ACCEPT_EVENT_STREAM, ACCEPT_JSON};

fn config() -> BedrockApiConfig {
    BedrockApiConfig::new("us-west-2", "AGENT1", "ALIAS1")
}

#[test]
fn build_headers_sets_bearer_authorization_and_accept() {
    let headers = build_headers(&config(), "token-123", ACCEPT_EVENT_STREAM)
        .expect("headers should build");

    assert_eq!(
        headers.get("authorization").map(String::as_str),
        Some("Bearer token-123")
    );
    assert_eq!(
        headers.get("accept").map(String::as_str),
        Some(ACCEPT_EVENT_STREAM)
    );
    assert_eq!(
        headers.get("content-type").map(String::as_str),
        Some(ACCEPT_JSON)
    );
}

#[test]
fn build_headers_trims_the_supplied_credential() {
    let headers =
        build_headers(&config(), "  token-123  ", ACCEPT_JSON).expect("headers should build");

    assert_eq!(
        headers.get("authorization").map(String::as_str),
        Some("Bearer token-123")
    );
}

#[test]
fn build_headers_rejects_blank_credentials() {
    let error = build_headers(&config(), "   ", ACCEPT_JSON)
        .err()
        .expect("blank credential must fail");
    assert!(matches!(error, BedrockApiError::MissingCredential));
}

#[test]
fn build_headers_prefers_configured_user_agent() {
    let config = config().with_user_agent("chat-client/2.0");
    let headers = build_headers(&config, "token", ACCEPT_JSON).expect("headers should build");

    assert_eq!(
        headers.get("user-agent").map(String::as_str),
        Some("chat-client/2.0")
    );
}

#[test]
fn build_headers_lowercases_and_merges_extra_headers() {
    let config = config().insert_header("X-Custom-Tag", " tagged ");
    let headers = build_headers(&config, "token", ACCEPT_JSON).expect("headers should build");

    assert_eq!(
        headers.get("x-custom-tag").map(String::as_str),
        Some("tagged")
    );
}
