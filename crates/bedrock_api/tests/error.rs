use bedrock_api::error::{parse_error_message, BedrockApiError};
use reqwest::StatusCode;

#[test]
fn parse_error_message_reads_service_message_field() {
    let message = parse_error_message(
        StatusCode::BAD_REQUEST,
        r#"{"message":"Memory is not enabled for this agent"}"#,
    );
    assert_eq!(message, "Memory is not enabled for this agent");
}

#[test]
fn parse_error_message_accepts_capitalized_message_field() {
    let message = parse_error_message(StatusCode::FORBIDDEN, r#"{"Message":"Access denied"}"#);
    assert_eq!(message, "Access denied");
}

#[test]
fn parse_error_message_falls_back_to_raw_body() {
    let message = parse_error_message(StatusCode::BAD_GATEWAY, "upstream connect error");
    assert_eq!(message, "upstream connect error");
}

#[test]
fn parse_error_message_falls_back_to_canonical_reason_for_empty_body() {
    let message = parse_error_message(StatusCode::SERVICE_UNAVAILABLE, "");
    assert_eq!(message, "Service Unavailable");
}

#[test]
fn validation_rejections_are_detected_from_the_error_type_header() {
    let error = BedrockApiError::Service {
        status: StatusCode::BAD_REQUEST,
        error_type: Some("ValidationException".to_owned()),
        message: "memoryId is not valid".to_owned(),
    };
    assert!(error.is_validation_rejection());

    let other = BedrockApiError::Service {
        status: StatusCode::BAD_REQUEST,
        error_type: Some("ResourceNotFoundException".to_owned()),
        message: "no such alias".to_owned(),
    };
    assert!(!other.is_validation_rejection());
}

#[test]
fn validation_rejections_are_detected_from_stream_exceptions() {
    let error = BedrockApiError::StreamException {
        kind: "validationException".to_owned(),
        message: "bad input".to_owned(),
    };
    assert!(error.is_validation_rejection());
}

#[test]
fn service_errors_render_status_type_and_message() {
    let error = BedrockApiError::Service {
        status: StatusCode::BAD_REQUEST,
        error_type: Some("ValidationException".to_owned()),
        message: "memoryId is not valid".to_owned(),
    };
    let rendered = error.to_string();
    assert!(rendered.contains("400"));
    assert!(rendered.contains("ValidationException"));
    assert!(rendered.contains("memoryId is not valid"));
}
