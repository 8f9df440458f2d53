use bedrock_api::url::{default_endpoint, invoke_path, memory_path, normalize_endpoint};

#[test]
fn default_endpoint_embeds_the_region() {
    assert_eq!(
        default_endpoint("eu-central-1"),
        "https://bedrock-agent-runtime.eu-central-1.amazonaws.com"
    );
}

#[test]
fn default_endpoint_falls_back_when_region_is_blank() {
    assert_eq!(
        default_endpoint("   "),
        "https://bedrock-agent-runtime.us-west-2.amazonaws.com"
    );
}

#[test]
fn normalize_endpoint_strips_trailing_slashes() {
    assert_eq!(
        normalize_endpoint("https://vpce.example.com/", "us-east-1"),
        "https://vpce.example.com"
    );
}

#[test]
fn normalize_endpoint_adds_scheme_to_bare_hosts() {
    assert_eq!(
        normalize_endpoint("proxy.internal:8443", "us-east-1"),
        "https://proxy.internal:8443"
    );
}

#[test]
fn normalize_endpoint_uses_regional_default_for_blank_input() {
    assert_eq!(
        normalize_endpoint("", "ap-southeast-2"),
        "https://bedrock-agent-runtime.ap-southeast-2.amazonaws.com"
    );
}

#[test]
fn invoke_path_addresses_the_session_text_resource() {
    assert_eq!(
        invoke_path("AGENT1", "ALIAS1", "session-1"),
        "/agents/AGENT1/agentAliases/ALIAS1/sessions/session-1/text"
    );
}

#[test]
fn memory_path_addresses_the_memory_resource() {
    assert_eq!(
        memory_path("AGENT1", "ALIAS1", "memory-user"),
        "/agents/AGENT1/agentAliases/ALIAS1/memories/memory-user"
    );
}
