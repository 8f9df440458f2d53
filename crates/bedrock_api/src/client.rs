use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::config::BedrockApiConfig;
use crate::error::{parse_error_message, BedrockApiError};
use crate::events::{decode_event, AgentStreamEvent};
use crate::eventstream::EventStreamParser;
use crate::headers::{build_headers, ACCEPT_EVENT_STREAM, ACCEPT_JSON};
use crate::memory::{GetAgentMemoryResponse, MEMORY_TYPE_SESSION_SUMMARY};
use crate::payload::InvokeAgentRequest;
use crate::retry::{is_retryable_http_error, retry_delay_ms, MAX_RETRIES};
use crate::url::{invoke_path, memory_path};

const HEADER_ERROR_TYPE: &str = "x-amzn-errortype";

#[derive(Debug)]
pub struct BedrockAgentClient {
    http: Client,
    config: BedrockApiConfig,
}

impl BedrockAgentClient {
    pub fn new(config: BedrockApiConfig) -> Result<Self, BedrockApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(BedrockApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &BedrockApiConfig {
        &self.config
    }

    pub fn invoke_url(&self, session_id: &str) -> String {
        format!(
            "{}{}",
            self.config.base_url(),
            invoke_path(&self.config.agent_id, &self.config.agent_alias_id, session_id)
        )
    }

    pub fn memory_url(&self, memory_id: &str) -> String {
        format!(
            "{}{}",
            self.config.base_url(),
            memory_path(&self.config.agent_id, &self.config.agent_alias_id, memory_id)
        )
    }

    fn header_map(&self, bearer_token: &str, accept: &str) -> Result<HeaderMap, BedrockApiError> {
        let headers = build_headers(&self.config, bearer_token, accept)?;
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                    BedrockApiError::InvalidEndpoint(format!("invalid header key: {key}"))
                })?,
                HeaderValue::from_str(&value).map_err(|_| {
                    BedrockApiError::InvalidEndpoint(format!("invalid header value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    pub fn build_invoke_request(
        &self,
        bearer_token: &str,
        session_id: &str,
        request: &InvokeAgentRequest,
    ) -> Result<reqwest::RequestBuilder, BedrockApiError> {
        let headers = self.header_map(bearer_token, ACCEPT_EVENT_STREAM)?;
        Ok(self
            .http
            .post(self.invoke_url(session_id))
            .headers(headers)
            .json(request))
    }

    fn build_memory_request(
        &self,
        bearer_token: &str,
        memory_id: &str,
    ) -> Result<reqwest::RequestBuilder, BedrockApiError> {
        let headers = self.header_map(bearer_token, ACCEPT_JSON)?;
        Ok(self
            .http
            .get(self.memory_url(memory_id))
            .headers(headers)
            .query(&[("memoryType", MEMORY_TYPE_SESSION_SUMMARY)]))
    }

    async fn send_with_retry<B>(&self, build: B) -> Result<Response, BedrockApiError>
    where
        B: Fn() -> Result<reqwest::RequestBuilder, BedrockApiError>,
    {
        let mut last_status: Option<StatusCode> = None;
        let mut last_error = None;

        for attempt in 0..=MAX_RETRIES {
            let response = build()?.send().await.map_err(BedrockApiError::from);

            match response {
                Ok(response) => {
                    if response.status().is_success() {
                        return Ok(response);
                    }

                    let status = response.status();
                    last_status = Some(status);
                    let error_type = response
                        .headers()
                        .get(HEADER_ERROR_TYPE)
                        .and_then(|value| value.to_str().ok())
                        .map(|value| value.split(':').next().unwrap_or(value).to_owned());
                    let body = response.text().await.unwrap_or_else(|_| {
                        status
                            .canonical_reason()
                            .unwrap_or("request failed")
                            .to_string()
                    });
                    let message = parse_error_message(status, &body);
                    last_error = Some(message.clone());

                    if attempt < MAX_RETRIES && is_retryable_http_error(status.as_u16(), &message) {
                        debug!(attempt, status = status.as_u16(), "retrying agent request");
                        tokio::time::sleep(retry_delay_ms(attempt)).await;
                        continue;
                    }

                    return Err(BedrockApiError::Service {
                        status,
                        error_type,
                        message,
                    });
                }
                Err(error) => {
                    let message = error.to_string();
                    last_error = Some(message.clone());
                    if attempt < MAX_RETRIES {
                        debug!(attempt, error = %message, "retrying after transport error");
                        tokio::time::sleep(retry_delay_ms(attempt)).await;
                        continue;
                    }
                    return Err(BedrockApiError::RetryExhausted {
                        status: last_status,
                        last_error,
                    });
                }
            }
        }

        Err(BedrockApiError::RetryExhausted {
            status: last_status,
            last_error,
        })
    }

    /// Issue a streaming invocation and hand each normalized event to the
    /// caller in arrival order. Modeled service exceptions abort the stream
    /// and surface as [`BedrockApiError::StreamException`].
    pub async fn invoke_with_handler<F>(
        &self,
        bearer_token: &str,
        session_id: &str,
        request: &InvokeAgentRequest,
        mut on_event: F,
    ) -> Result<(), BedrockApiError>
    where
        F: FnMut(AgentStreamEvent),
    {
        let response = self
            .send_with_retry(|| self.build_invoke_request(bearer_token, session_id, request))
            .await?;

        debug!(session_id, end_session = request.end_session, "agent stream opened");
        let mut bytes = response.bytes_stream();
        let mut parser = EventStreamParser::default();

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(BedrockApiError::from)?;
            for frame in parser.feed(&chunk)? {
                let Some(event) = decode_event(&frame) else {
                    continue;
                };
                if let AgentStreamEvent::Exception { kind, message } = event {
                    return Err(BedrockApiError::StreamException { kind, message });
                }
                on_event(event);
            }
        }

        if !parser.is_empty_buffer() {
            return Err(BedrockApiError::MalformedFrame(
                "stream ended mid-frame".to_owned(),
            ));
        }

        Ok(())
    }

    /// Fetch memory records for a memory id, filtered server-side to
    /// session summaries.
    pub async fn get_agent_memory(
        &self,
        bearer_token: &str,
        memory_id: &str,
    ) -> Result<GetAgentMemoryResponse, BedrockApiError> {
        let response = self
            .send_with_retry(|| self.build_memory_request(bearer_token, memory_id))
            .await?;

        response
            .json::<GetAgentMemoryResponse>()
            .await
            .map_err(BedrockApiError::from)
    }
}
