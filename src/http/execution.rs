use std::error::Error as _;

use futures_util::StreamExt;
use hyper::ext::ReasonPhrase;
use reqwest::Client;

use crate::dispatch::OutcomeKind;

/// Issues one GET and turns the response or error into an outcome.
///
/// The body is drained (not inspected) so the connection can be reused.
pub(super) async fn send_get(client: &Client, url: &str) -> OutcomeKind {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            let status_text = reason_phrase(&response);
            match drain_response_body(response).await {
                Ok(_bytes) => OutcomeKind::Success {
                    status_code: status.as_u16(),
                    status_text,
                },
                Err(err) => OutcomeKind::Failure {
                    error_description: describe_error(&err),
                },
            }
        }
        Err(err) => OutcomeKind::Failure {
            error_description: describe_error(&err),
        },
    }
}

/// The reason phrase the server sent, or the canonical one for the status.
///
/// hyper records the phrase only when it differs from the canonical text.
fn reason_phrase(response: &reqwest::Response) -> String {
    response.extensions().get::<ReasonPhrase>().map_or_else(
        || {
            response
                .status()
                .canonical_reason()
                .unwrap_or_default()
                .to_owned()
        },
        |reason| String::from_utf8_lossy(reason.as_bytes()).into_owned(),
    )
}

/// The error message followed by its source chain, joined with `: `.
pub(super) fn describe_error(err: &reqwest::Error) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !description.contains(&text) {
            description.push_str(": ");
            description.push_str(&text);
        }
        source = cause.source();
    }
    description
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
