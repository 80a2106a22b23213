//! Shared plumbing for outbound gateway calls: a reqwest client with
//! an explicit per-request timeout and a bounded retry with backoff.
//! Only transport-level failures and upstream 5xx are retried; the
//! caller sees the final outcome, never a partial one.

use std::time::Duration;

use tracing::warn;

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_MS: u64 = 250;

pub fn client(timeout_secs: u64) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Send a request, retrying up to `MAX_ATTEMPTS` with doubling delay.
/// `build` is invoked per attempt because a `RequestBuilder` is
/// consumed by `send`.
pub async fn send_with_retry<F>(label: &str, build: F) -> anyhow::Result<reqwest::Response>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        let result = build().send().await;
        let retryable = match &result {
            Ok(resp) => resp.status().is_server_error(),
            Err(e) => e.is_timeout() || e.is_connect(),
        };
        if !retryable || attempt >= MAX_ATTEMPTS {
            return Ok(result?);
        }
        let delay = Duration::from_millis(BACKOFF_BASE_MS << (attempt - 1));
        warn!(
            gateway = label,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "gateway request failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_with_timeout() {
        assert!(client(5).is_ok());
    }

    #[tokio::test]
    async fn unreachable_host_errors_after_retries() {
        let http = client(1).expect("client");
        // Reserved TLD, connection refused or DNS failure either way.
        let err = send_with_retry("test", || http.get("http://gateway.invalid/x"))
            .await
            .unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
