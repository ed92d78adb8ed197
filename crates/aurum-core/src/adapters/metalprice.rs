use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::source::{LatestRequest, OhlcRequest, PriceSource, RateResponse, SourceError};

pub const DEFAULT_BASE_URL: &str = "https://api.metalpriceapi.com/v1";

/// metalpriceapi.com adapter.
///
/// Returns the provider's JSON as a [`RateResponse`] without interpreting
/// `success`; only transport failures, non-2xx statuses and undecodable bodies
/// become [`SourceError`]s.
#[derive(Clone)]
pub struct MetalPriceAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    timeout_ms: u64,
}

impl MetalPriceAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn ohlc_url(&self, req: &OhlcRequest) -> String {
        let mut url = format!(
            "{}/ohlc?api_key={}&base={}&currency={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&req.base),
            urlencoding::encode(&req.quote),
        );
        if let Some(date) = req.date {
            url.push_str("&date=");
            url.push_str(&date.format_iso());
        }
        url
    }

    fn latest_url(&self, req: &LatestRequest) -> String {
        format!(
            "{}/latest?api_key={}&base={}&currencies={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&req.base),
            urlencoding::encode(&req.quote),
        )
    }

    async fn fetch(
        &self,
        endpoint: &'static str,
        url: String,
    ) -> Result<RateResponse, SourceError> {
        if self.api_key.trim().is_empty() {
            return Err(SourceError::invalid_request("metalprice api key is not configured"));
        }

        let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);
        let response = self.http_client.execute(request).await.map_err(|error| {
            if error.timed_out() {
                SourceError::unavailable(format!(
                    "metalprice timed out after {} ms",
                    self.timeout_ms
                ))
            } else {
                SourceError::unavailable(format!("metalprice transport error: {}", error.message()))
            }
        })?;
        debug!(endpoint, status = response.status, "metalprice responded");

        if !response.is_success() {
            let detail = serde_json::from_str::<RateResponse>(&response.body)
                .ok()
                .and_then(|body| body.error_message().map(str::to_owned))
                .unwrap_or_default();
            return Err(SourceError::unavailable(format!(
                "metalprice returned status {} {}",
                response.status, detail
            )
            .trim_end()
            .to_owned()));
        }

        serde_json::from_str(&response.body).map_err(|error| {
            SourceError::invalid_response(format!("failed to parse metalprice {endpoint}: {error}"))
        })
    }
}

impl PriceSource for MetalPriceAdapter {
    fn name(&self) -> &'static str {
        "metalprice"
    }

    fn ohlc<'a>(
        &'a self,
        req: OhlcRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RateResponse, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch("ohlc", self.ohlc_url(&req)).await })
    }

    fn latest<'a>(
        &'a self,
        req: LatestRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RateResponse, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch("latest", self.latest_url(&req)).await })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::http_client::{HttpError, HttpResponse};
    use crate::source::SourceErrorKind;
    use crate::TradeDate;

    struct CannedHttpClient {
        response: Result<HttpResponse, HttpError>,
        seen: Mutex<Vec<String>>,
    }

    impl CannedHttpClient {
        fn new(response: Result<HttpResponse, HttpError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl HttpClient for CannedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.seen.lock().expect("lock").push(request.url);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn ohlc_request() -> OhlcRequest {
        OhlcRequest::new(
            "XAU",
            "MYR",
            Some(TradeDate::parse("2024-01-02").expect("date")),
        )
        .expect("request")
    }

    #[tokio::test]
    async fn builds_ohlc_query_with_date() {
        let client = CannedHttpClient::new(Ok(HttpResponse::ok_json(
            r#"{"success":true,"rate":{"open":9800.0,"high":9900.0,"low":9700.0,"close":9850.0}}"#,
        )));
        let adapter = MetalPriceAdapter::new(client.clone(), "key-123")
            .with_base_url("https://metal.example/v1/");

        let response = adapter.ohlc(ohlc_request()).await.expect("ohlc");

        assert!(response.success);
        let seen = client.seen.lock().expect("lock");
        assert_eq!(
            seen[0],
            "https://metal.example/v1/ohlc?api_key=key-123&base=XAU&currency=MYR&date=2024-01-02"
        );
    }

    #[tokio::test]
    async fn non_success_status_is_unavailable() {
        let client = CannedHttpClient::new(Ok(HttpResponse::with_status(
            401,
            r#"{"success":false,"error":{"statusCode":101,"message":"invalid api key"}}"#,
        )));
        let adapter = MetalPriceAdapter::new(client, "bad");

        let error = adapter.ohlc(ohlc_request()).await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(error.message().contains("401"));
        assert!(error.message().contains("invalid api key"));
    }

    #[tokio::test]
    async fn undecodable_body_is_invalid_response() {
        let client = CannedHttpClient::new(Ok(HttpResponse::ok_json("<html>")));
        let adapter = MetalPriceAdapter::new(client, "key");

        let error = adapter.ohlc(ohlc_request()).await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidResponse);
    }

    #[tokio::test]
    async fn missing_api_key_skips_the_call() {
        let client = CannedHttpClient::new(Ok(HttpResponse::ok_json("{}")));
        let adapter = MetalPriceAdapter::new(client.clone(), "  ");

        let error = adapter
            .latest(LatestRequest::new("XAU", "MYR").expect("request"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
        assert!(client.seen.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn transport_errors_are_unavailable() {
        let client = CannedHttpClient::new(Err(HttpError::new("connection refused")));
        let adapter = MetalPriceAdapter::new(client, "key");

        let error = adapter
            .latest(LatestRequest::new("XAU", "MYR").expect("request"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert_eq!(
            error.message(),
            "metalprice transport error: connection refused"
        );
    }

    #[tokio::test]
    async fn timeouts_name_the_configured_limit() {
        let client = CannedHttpClient::new(Err(HttpError::timeout("request timeout")));
        let adapter = MetalPriceAdapter::new(client, "key").with_timeout_ms(2_500);

        let error = adapter
            .latest(LatestRequest::new("XAU", "MYR").expect("request"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert_eq!(error.message(), "metalprice timed out after 2500 ms");
    }
}
