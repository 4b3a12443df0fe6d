//! Binance USDT-M futures kline client (public endpoints, no authentication).

use async_trait::async_trait;
use chrono::Utc;
use dogetrade_core::error::DataError;
use dogetrade_core::traits::MarketDataSource;
use dogetrade_core::types::{Candle, Interval, Series};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://fapi.binance.com";

/// Largest `limit` the klines endpoint accepts.
pub const MAX_KLINES_PER_REQUEST: usize = 1500;

/// Binance error code for an unknown symbol.
const INVALID_SYMBOL_CODE: i64 = -1121;

/// One kline row as returned by the exchange.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kline {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: i64,
}

impl Kline {
    pub fn to_candle(&self) -> Candle {
        Candle::new(
            self.open_time,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        )
    }

    /// Whether the candle had closed at `now_ms`.
    pub fn is_closed(&self, now_ms: i64) -> bool {
        self.close_time < now_ms
    }
}

fn field_i64(row: &[Value], index: usize) -> Result<i64, DataError> {
    row.get(index)
        .and_then(Value::as_i64)
        .ok_or_else(|| DataError::ParseError(format!("kline field {} is not an integer", index)))
}

/// Prices and volumes are sent as decimal strings.
fn field_f64(row: &[Value], index: usize) -> Result<f64, DataError> {
    let value = row.get(index);
    let parsed = match value {
        Some(Value::String(s)) => s.parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        DataError::ParseError(format!("kline field {} is not a number: {:?}", index, value))
    })
}

/// Parse a klines response body.
///
/// Each row is `[open_time, "open", "high", "low", "close", "volume",
/// close_time, ...]`; trailing fields are ignored.
pub fn parse_klines(body: &str) -> Result<Vec<Kline>, DataError> {
    let rows: Vec<Vec<Value>> =
        serde_json::from_str(body).map_err(|e| DataError::ParseError(e.to_string()))?;

    rows.iter()
        .map(|row| {
            Ok(Kline {
                open_time: field_i64(row, 0)?,
                open: field_f64(row, 1)?,
                high: field_f64(row, 2)?,
                low: field_f64(row, 3)?,
                close: field_f64(row, 4)?,
                volume: field_f64(row, 5)?,
                close_time: field_i64(row, 6)?,
            })
        })
        .collect()
}

/// Map an error response to a [`DataError`].
fn api_error(symbol: &str, status: reqwest::StatusCode, body: &str) -> DataError {
    let code = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("code").and_then(Value::as_i64));

    match code {
        Some(INVALID_SYMBOL_CODE) => DataError::SymbolNotFound(symbol.to_string()),
        _ => DataError::ApiError(format!("Binance API error {}: {}", status, body)),
    }
}

/// Binance futures market data client.
///
/// Owns its HTTP client; construct one and hand it to whoever needs data.
#[derive(Debug, Clone)]
pub struct BinanceFuturesClient {
    client: Client,
    base_url: String,
    closed_only: bool,
}

impl BinanceFuturesClient {
    /// Create a client for the public futures endpoint.
    pub fn new() -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;
        Ok(Self::with_client(client, DEFAULT_BASE_URL))
    }

    /// Create a client around an existing HTTP client and base URL.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            closed_only: false,
        }
    }

    /// Point the client at another endpoint (testnet, proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Drop the still-forming last candle from responses.
    pub fn with_closed_only(mut self, closed_only: bool) -> Self {
        self.closed_only = closed_only;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn klines_url(&self, symbol: &str, interval: Interval, limit: usize) -> String {
        format!(
            "{}/fapi/v1/klines?symbol={}&interval={}&limit={}",
            self.base_url, symbol, interval, limit
        )
    }

    /// Fetch raw klines, oldest first.
    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Kline>, DataError> {
        let clamped = limit.clamp(1, MAX_KLINES_PER_REQUEST);
        if clamped != limit {
            warn!(requested = limit, used = clamped, "Kline limit out of range, clamping");
        }

        let url = self.klines_url(symbol, interval, clamped);
        debug!(symbol, interval = %interval, limit = clamped, "Fetching klines from Binance");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        if !status.is_success() {
            return Err(api_error(symbol, status, &body));
        }

        let klines = parse_klines(&body)?;
        debug!(count = klines.len(), "Fetched klines");
        Ok(klines)
    }
}

#[async_trait]
impl MarketDataSource for BinanceFuturesClient {
    async fn fetch_series(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Series, DataError> {
        let mut klines = self.get_klines(symbol, interval, limit).await?;

        if self.closed_only {
            let now = Utc::now().timestamp_millis();
            klines.retain(|k| k.is_closed(now));
        }
        if klines.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        Series::new(symbol, interval, klines.iter().map(Kline::to_candle).collect())
    }

    fn name(&self) -> &str {
        "binance-futures"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const FIXTURE: &str = r#"[
        [1700000000000, "0.06010", "0.06050", "0.05990", "0.06030", "1250000", 1700000899999, "75300.1", 812, "600000", "36150.2", "0"],
        [1700000900000, "0.06030", "0.06100", "0.06020", "0.06090", "980000.5", 1700001799999, "59500.4", 640, "510000", "31060.0", "0"]
    ]"#;

    #[test]
    fn test_parse_klines() {
        let klines = parse_klines(FIXTURE).unwrap();
        assert_eq!(klines.len(), 2);

        let first = klines[0];
        assert_eq!(first.open_time, 1_700_000_000_000);
        assert_eq!(first.open, 0.0601);
        assert_eq!(first.close, 0.0603);
        assert_eq!(first.volume, 1_250_000.0);
        assert_eq!(first.close_time, 1_700_000_899_999);

        let candle = klines[1].to_candle();
        assert_eq!(candle.timestamp, 1_700_000_900_000);
        assert_eq!(candle.high, 0.061);
        assert_eq!(candle.volume, 980_000.5);
    }

    #[test]
    fn test_parse_klines_rejects_bad_rows() {
        assert!(matches!(
            parse_klines(r#"[[1700000000000, "abc", "1", "1", "1", "1", 1700000899999]]"#),
            Err(DataError::ParseError(_))
        ));
        assert!(matches!(
            parse_klines(r#"[[1700000000000, "1", "1"]]"#),
            Err(DataError::ParseError(_))
        ));
        assert!(matches!(
            parse_klines(r#"{"code": -1121}"#),
            Err(DataError::ParseError(_))
        ));
        assert_eq!(parse_klines("[]").unwrap(), vec![]);
    }

    #[test]
    fn test_api_error_mapping() {
        let err = api_error(
            "NOPEUSDT",
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"code":-1121,"msg":"Invalid symbol."}"#,
        );
        assert!(matches!(err, DataError::SymbolNotFound(ref s) if s == "NOPEUSDT"));

        let err = api_error("DOGEUSDT", reqwest::StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(matches!(err, DataError::ApiError(ref msg) if msg.contains("429")));
    }

    #[test]
    fn test_klines_url() {
        let client = BinanceFuturesClient::with_client(Client::new(), DEFAULT_BASE_URL)
            .with_base_url("http://localhost:1234/");
        assert_eq!(client.base_url(), "http://localhost:1234");
        assert_eq!(
            client.klines_url("DOGEUSDT", Interval::Minute15, 500),
            "http://localhost:1234/fapi/v1/klines?symbol=DOGEUSDT&interval=15m&limit=500"
        );
    }

    #[test]
    fn test_closed_filter() {
        let kline = parse_klines(FIXTURE).unwrap()[0];
        assert!(kline.is_closed(1_700_000_900_000));
        assert!(!kline.is_closed(1_700_000_899_999));
    }

    /// Serve one canned HTTP response and hand back the request line.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut request = Vec::new();
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        (base, handle)
    }

    fn local_client(base: String) -> BinanceFuturesClient {
        let http = Client::builder().no_proxy().build().unwrap();
        BinanceFuturesClient::with_client(http, base)
    }

    #[tokio::test]
    async fn test_fetch_series_over_http() {
        let (base, handle) = serve_once("200 OK", FIXTURE).await;
        let source: Box<dyn MarketDataSource> = Box::new(local_client(base));

        let series = source
            .fetch_series("DOGEUSDT", Interval::Minute15, 2)
            .await
            .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.symbol, "DOGEUSDT");
        assert_eq!(series.closes(), vec![0.0603, 0.0609]);

        let request_line = handle.await.unwrap();
        assert_eq!(
            request_line,
            "GET /fapi/v1/klines?symbol=DOGEUSDT&interval=15m&limit=2 HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_fetch_unknown_symbol() {
        let (base, handle) =
            serve_once("400 Bad Request", r#"{"code":-1121,"msg":"Invalid symbol."}"#).await;
        let client = local_client(base);

        let err = client
            .fetch_series("NOPEUSDT", Interval::Hour1, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound(_)));
        handle.await.unwrap();
    }
}
