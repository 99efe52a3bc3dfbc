//! Blocking client for the check endpoint, with retries.

use crate::{CLIENT_REQUEST_TIMEOUT_SECS, CheckResponse};
use anyhow::{Context, Result, anyhow};
use log::warn;
use reqwest::blocking::{Client, Response};
use std::{thread, time::Duration};

fn check_url(api_base: &str) -> String {
    format!("{}/api/check", api_base.trim_end_matches('/'))
}

/// Decode a non-5xx response from the check endpoint.
fn read_check_response(response: Response) -> Result<bool> {
    let status = response.status();
    if !status.is_success() {
        let msg = response.text().unwrap_or_default();
        return Err(anyhow!("Server rejected the check ({status}): {msg}"));
    }
    let body = response
        .json::<CheckResponse>()
        .context("Failed to deserialize check response")?;
    Ok(body.result)
}

/// Ask the server whether `digits` is a reference chunk.
/// The digits are sent as-is; the server strips anything that is not a digit.
///
/// Timeouts, refused connections and 5xx responses are retried up to `max_attempts` times,
/// waiting 1s, 2s, 4s... between tries. Anything else fails immediately.
///
/// # Errors
/// Returns an error if the client cannot be built, the server rejects the request,
/// every attempt fails, or the body is not a check response.
pub fn check_digits_remote(api_base: &str, digits: &str, max_attempts: u32) -> Result<bool> {
    let url = check_url(api_base);
    let client = Client::builder()
        .timeout(Duration::from_secs(CLIENT_REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")?;
    let max_attempts = max_attempts.max(1);

    let mut attempt = 1;
    loop {
        let failure = match client.get(&url).query(&[("digits", digits)]).send() {
            Ok(response) if response.status().is_server_error() => {
                format!("server error {}", response.status())
            }
            Ok(response) => return read_check_response(response),
            Err(e) if e.is_timeout() || e.is_connect() => format!("network error: {e}"),
            Err(e) => return Err(e).context("Failed to send check request"),
        };

        if attempt >= max_attempts {
            return Err(anyhow!("Check failed after {attempt} attempts, last {failure}"));
        }
        let backoff = Duration::from_secs(1 << (attempt - 1).min(6));
        warn!(
            "Check attempt {attempt}/{max_attempts} failed ({failure}), retrying in {}s",
            backoff.as_secs()
        );
        thread::sleep(backoff);
        attempt += 1;
    }
}
