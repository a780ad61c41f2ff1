//! Ordered request strategies and the "first success wins" combinator.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::config::Config;
use crate::error::{AttemptFailure, FetchError};

/// One way of reaching the results API: through a relay or directly.
#[async_trait]
pub trait RequestStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Fetches `target` and returns the response body.
    async fn fetch(&self, target: &str, timeout: Duration) -> Result<String, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The target URL is appended verbatim to the relay prefix.
    Relay { prefix: String },
    /// The target URL is percent-encoded before being appended.
    EncodedRelay { prefix: String },
    Direct,
}

impl Route {
    pub fn request_url(&self, target: &str) -> String {
        match self {
            Route::Relay { prefix } => format!("{}{}", prefix, target),
            Route::EncodedRelay { prefix } => {
                let encoded: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
                format!("{}{}", prefix, encoded)
            }
            Route::Direct => target.to_string(),
        }
    }
}

pub struct HttpStrategy {
    name: String,
    route: Route,
    client: Client,
}

impl HttpStrategy {
    pub fn new(name: impl Into<String>, route: Route, client: Client) -> Self {
        Self {
            name: name.into(),
            route,
            client,
        }
    }
}

#[async_trait]
impl RequestStrategy for HttpStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, target: &str, timeout: Duration) -> Result<String, FetchError> {
        let url = self.route.request_url(target);
        debug!("{} GET {}", self.name, url);

        let response = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| classify(e, timeout))
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(timeout)
    } else {
        FetchError::from(err)
    }
}

/// The relay, encoded relay, direct chain, in that order.
pub fn default_chain(config: &Config, client: Client) -> Vec<Box<dyn RequestStrategy>> {
    vec![
        Box::new(HttpStrategy::new(
            "primary-relay",
            Route::Relay {
                prefix: config.primary_relay.clone(),
            },
            client.clone(),
        )),
        Box::new(HttpStrategy::new(
            "secondary-relay",
            Route::EncodedRelay {
                prefix: config.secondary_relay.clone(),
            },
            client.clone(),
        )),
        Box::new(HttpStrategy::new("direct", Route::Direct, client)),
    ]
}

/// Tries each strategy in turn. An attempt succeeds only when the strategy
/// returns a body within `timeout` and `accept` takes it; the first such
/// value is returned together with the strategy name. Later strategies are
/// never started once one succeeds.
pub async fn first_success<T, F>(
    strategies: &[Box<dyn RequestStrategy>],
    target: &str,
    timeout: Duration,
    mut accept: F,
) -> Result<(String, T), FetchError>
where
    F: FnMut(&str) -> Result<T, FetchError>,
{
    let mut failures = Vec::with_capacity(strategies.len());

    for strategy in strategies {
        let outcome = match tokio::time::timeout(timeout, strategy.fetch(target, timeout)).await {
            Ok(Ok(body)) => accept(&body),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(FetchError::Timeout(timeout)),
        };

        match outcome {
            Ok(value) => return Ok((strategy.name().to_string(), value)),
            Err(e) => {
                warn!("⚠ {} failed: {}", strategy.name(), e);
                failures.push(AttemptFailure {
                    strategy: strategy.name().to_string(),
                    error: Box::new(e),
                });
            }
        }
    }

    Err(FetchError::Exhausted(failures))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Canned {
        name: &'static str,
        delay: Duration,
        reply: Result<&'static str, FetchError>,
        calls: Arc<AtomicUsize>,
    }

    impl Canned {
        fn boxed(
            name: &'static str,
            delay_ms: u64,
            reply: Result<&'static str, FetchError>,
            calls: &Arc<AtomicUsize>,
        ) -> Box<dyn RequestStrategy> {
            Box::new(Self {
                name,
                delay: Duration::from_millis(delay_ms),
                reply,
                calls: Arc::clone(calls),
            })
        }
    }

    #[async_trait]
    impl RequestStrategy for Canned {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(&self, _target: &str, _timeout: Duration) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.reply.clone().map(str::to_string)
        }
    }

    fn accept_all(body: &str) -> Result<String, FetchError> {
        Ok(body.to_string())
    }

    #[test]
    fn test_route_request_url() {
        let target = "https://api.example.com/Lotto649Result?period&pageNum=1";
        assert_eq!(
            Route::Relay {
                prefix: "https://relay.one/".to_string()
            }
            .request_url(target),
            "https://relay.one/https://api.example.com/Lotto649Result?period&pageNum=1"
        );
        assert_eq!(
            Route::EncodedRelay {
                prefix: "https://relay.two/raw?url=".to_string()
            }
            .request_url(target),
            "https://relay.two/raw?url=https%3A%2F%2Fapi.example.com%2FLotto649Result%3Fperiod%26pageNum%3D1"
        );
        assert_eq!(Route::Direct.request_url(target), target);
    }

    #[tokio::test]
    async fn test_first_success_stops_at_first_winner() {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategies = vec![
            Canned::boxed("one", 0, Err(FetchError::Status(502)), &calls),
            Canned::boxed("two", 0, Ok("second"), &calls),
            Canned::boxed("three", 0, Ok("third"), &calls),
        ];

        let (name, body) = first_success(&strategies, "t", Duration::from_secs(8), accept_all)
            .await
            .unwrap();

        assert_eq!(name, "two");
        assert_eq!(body, "second");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rejected_body_moves_to_next_strategy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategies = vec![
            Canned::boxed("one", 0, Ok("<html>"), &calls),
            Canned::boxed("two", 0, Ok("{}"), &calls),
        ];

        let (name, _) = first_success(&strategies, "t", Duration::from_secs(8), |body| {
            if body.starts_with('{') {
                Ok(())
            } else {
                Err(FetchError::Payload("not json".to_string()))
            }
        })
        .await
        .unwrap();

        assert_eq!(name, "two");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_attempt_times_out() {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategies = vec![
            Canned::boxed("slow", 9_000, Ok("late"), &calls),
            Canned::boxed("fast", 100, Ok("early"), &calls),
        ];

        let started = tokio::time::Instant::now();
        let (name, body) = first_success(&strategies, "t", Duration::from_secs(8), accept_all)
            .await
            .unwrap();

        assert_eq!((name.as_str(), body.as_str()), ("fast", "early"));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(8_100));
        assert!(elapsed < Duration::from_millis(8_200));
    }

    #[tokio::test]
    async fn test_exhaustion_reports_every_attempt() {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategies = vec![
            Canned::boxed("one", 0, Err(FetchError::Status(500)), &calls),
            Canned::boxed("two", 0, Err(FetchError::Transport("reset".to_string())), &calls),
        ];

        let err = first_success(&strategies, "t", Duration::from_secs(8), accept_all)
            .await
            .unwrap_err();

        let failures = match err {
            FetchError::Exhausted(failures) => failures,
            other => panic!("expected exhaustion, got {other:?}"),
        };
        let names: Vec<_> = failures.iter().map(|f| f.strategy.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
        assert_eq!(*failures[0].error, FetchError::Status(500));
    }
}
