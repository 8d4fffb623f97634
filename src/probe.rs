//! HTTP probing and UP/DOWN classification

use crate::endpoint::Endpoint;
use crate::errors::{MonitorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Default request timeout and latency threshold
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_LATENCY_THRESHOLD: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Up,
    Down,
}

impl Status {
    pub fn is_up(self) -> bool {
        self == Status::Up
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Up => write!(f, "UP"),
            Status::Down => write!(f, "DOWN"),
        }
    }
}

/// Outcome of a single probe
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeResult {
    pub status: Status,
    /// Round-trip latency, absent when no response arrived
    pub latency_ms: Option<u64>,
    pub status_code: Option<u16>,
}

impl ProbeResult {
    /// A response was received
    pub fn responded(status_code: u16, latency: Duration, threshold: Duration) -> Self {
        Self {
            status: classify(status_code, latency, threshold),
            latency_ms: Some(latency.as_millis() as u64),
            status_code: Some(status_code),
        }
    }

    /// The request failed outright (timeout, connection error, DNS, ...)
    pub fn no_response() -> Self {
        Self {
            status: Status::Down,
            latency_ms: None,
            status_code: None,
        }
    }
}

/// UP only for a 2xx status that arrived strictly under the threshold
pub fn classify(status_code: u16, latency: Duration, threshold: Duration) -> Status {
    if (200..300).contains(&status_code) && latency < threshold {
        Status::Up
    } else {
        Status::Down
    }
}

/// Something that can check an endpoint once
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, endpoint: &Endpoint) -> ProbeResult;
}

/// reqwest-backed prober: one attempt per call, no retries
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    timeout: Duration,
    latency_threshold: Duration,
}

impl HttpProber {
    pub fn new(probe_timeout: Duration, latency_threshold: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(probe_timeout)
            .user_agent(format!("endpoint_monitor/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(MonitorError::Http)?;

        Ok(Self {
            client,
            timeout: probe_timeout,
            latency_threshold,
        })
    }

    fn build_request(&self, endpoint: &Endpoint) -> Result<reqwest::RequestBuilder> {
        let mut request = self
            .client
            .request(endpoint.http_method()?, endpoint.url.clone());

        for (key, value) in &endpoint.headers {
            request = request.header(key, value);
        }

        if let Some(body) = endpoint.json_body()? {
            request = request.json(&body);
        }

        Ok(request)
    }
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe(&self, endpoint: &Endpoint) -> ProbeResult {
        let request = match self.build_request(endpoint) {
            Ok(request) => request,
            Err(e) => {
                warn!("Could not build request for {}: {}", endpoint.name, e);
                return ProbeResult::no_response();
            }
        };

        let start = Instant::now();
        let response = match timeout(self.timeout, request.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                debug!("Request to {} failed: {}", endpoint.url, e);
                return ProbeResult::no_response();
            }
            Err(_) => {
                debug!("Request to {} timed out after {:?}", endpoint.url, self.timeout);
                return ProbeResult::no_response();
            }
        };
        let latency = start.elapsed();

        let result = ProbeResult::responded(
            response.status().as_u16(),
            latency,
            self.latency_threshold,
        );

        debug!(
            "{} answered {} in {}ms",
            endpoint.url,
            response.status(),
            latency.as_millis()
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::RequestBody;
    use url::Url;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn endpoint(server: &MockServer, route: &str) -> Endpoint {
        let url = Url::parse(&format!("{}{}", server.uri(), route)).unwrap();
        Endpoint::new("mock", url)
    }

    #[test]
    fn test_classify() {
        let threshold = DEFAULT_LATENCY_THRESHOLD;
        assert_eq!(classify(204, Duration::from_millis(100), threshold), Status::Up);
        assert_eq!(classify(200, Duration::from_millis(499), threshold), Status::Up);
        assert_eq!(classify(500, Duration::from_millis(10), threshold), Status::Down);
        assert_eq!(classify(500, Duration::from_millis(900), threshold), Status::Down);
        assert_eq!(classify(301, Duration::from_millis(10), threshold), Status::Down);
        assert_eq!(classify(200, Duration::from_millis(600), threshold), Status::Down);
        assert_eq!(classify(200, Duration::from_millis(500), threshold), Status::Down);
    }

    #[test]
    fn test_no_response_has_no_latency() {
        let result = ProbeResult::no_response();
        assert_eq!(result.status, Status::Down);
        assert!(result.latency_ms.is_none());
        assert!(result.status_code.is_none());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Up.to_string(), "UP");
        assert_eq!(Status::Down.to_string(), "DOWN");
    }

    #[tokio::test]
    async fn test_probe_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let prober = HttpProber::new(Duration::from_secs(2), DEFAULT_LATENCY_THRESHOLD).unwrap();
        let result = prober.probe(&endpoint(&server, "/health")).await;

        assert_eq!(result.status, Status::Up);
        assert_eq!(result.status_code, Some(204));
        assert!(result.latency_ms.is_some());
    }

    #[tokio::test]
    async fn test_probe_server_error_is_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let prober = HttpProber::new(Duration::from_secs(2), DEFAULT_LATENCY_THRESHOLD).unwrap();
        let result = prober.probe(&endpoint(&server, "/")).await;

        assert_eq!(result.status, Status::Down);
        assert_eq!(result.status_code, Some(500));
        assert!(result.latency_ms.is_some());
    }

    #[tokio::test]
    async fn test_slow_response_is_down_with_latency() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(600)))
            .mount(&server)
            .await;

        let prober = HttpProber::new(Duration::from_secs(5), DEFAULT_LATENCY_THRESHOLD).unwrap();
        let result = prober.probe(&endpoint(&server, "/slow")).await;

        assert_eq!(result.status, Status::Down);
        assert_eq!(result.status_code, Some(200));
        assert!(result.latency_ms.unwrap() >= 600);
    }

    #[tokio::test]
    async fn test_timeout_is_down_without_latency() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(1500)))
            .mount(&server)
            .await;

        let prober = HttpProber::new(DEFAULT_PROBE_TIMEOUT, DEFAULT_LATENCY_THRESHOLD).unwrap();
        let result = prober.probe(&endpoint(&server, "/hang")).await;

        assert_eq!(result.status, Status::Down);
        assert!(result.latency_ms.is_none());
        assert!(result.status_code.is_none());
    }

    #[tokio::test]
    async fn test_connection_error_is_down() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{}/health", addr)).unwrap();
        let prober = HttpProber::new(DEFAULT_PROBE_TIMEOUT, DEFAULT_LATENCY_THRESHOLD).unwrap();
        let result = prober.probe(&Endpoint::new("closed", url)).await;

        assert_eq!(result.status, Status::Down);
        assert!(result.latency_ms.is_none());
    }

    #[tokio::test]
    async fn test_probe_sends_method_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/body"))
            .and(header("x-api-key", "secret"))
            .and(body_json(serde_json::json!({"foo": "bar"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let ep = endpoint(&server, "/body")
            .with_method("POST")
            .with_header("x-api-key", "secret")
            .with_body(RequestBody::Text(r#"{"foo":"bar"}"#.to_string()));

        let prober = HttpProber::new(Duration::from_secs(2), DEFAULT_LATENCY_THRESHOLD).unwrap();
        let result = prober.probe(&ep).await;

        assert_eq!(result.status, Status::Up);
    }
}
