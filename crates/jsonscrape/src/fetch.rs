//! The retrying fetch loop.
//!
//! One logical fetch issues up to `max_attempts` HTTP requests.
//! Every failure is logged at its point of occurrence before the
//! retry decision; the decision itself lives in
//! `jsonscrape_core::retry` as a pure function.

use serde_json::Value;

use jsonscrape_core::retry::{self, RetryPolicy};
use jsonscrape_core::settings::RequestSpec;

use crate::error::Error;
use crate::transport::HttpTransport;

/// Perform one HTTP request and parse its JSON body, retrying
/// transient failures with linear backoff.
///
/// The attempt counter starts at 1 and the first try counts toward
/// the policy's `max_attempts`. A non-retryable failure propagates
/// immediately with no backoff.
pub async fn fetch_json_once<T: HttpTransport>(
    transport: &T,
    request: &RequestSpec,
    policy: &RetryPolicy,
) -> Result<Value, Error> {
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        match try_fetch(transport, request).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                log::error!(
                    "[fetch] attempt {attempt} failed for {url}: {err}",
                    url = request.url
                );

                if !retry::should_retry(policy, attempt, err.status(), &err.to_string()) {
                    return Err(err);
                }

                tokio::time::sleep(retry::backoff_delay(policy, attempt)).await;
            }
        }
    }
}

async fn try_fetch<T: HttpTransport>(transport: &T, request: &RequestSpec) -> Result<Value, Error> {
    let response = transport.send(request).await?;

    if !(200..300).contains(&response.status) {
        return Err(Error::Http {
            status: response.status,
            url: request.url.clone(),
        });
    }

    serde_json::from_str(&response.body)
        .map_err(|e| Error::Parse(format!("invalid JSON from {}: {e}", request.url)))
}
