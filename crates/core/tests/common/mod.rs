// ═══════════════════════════════════════════════════════════════════
// Shared test helpers — scripted PriceProvider
// ═══════════════════════════════════════════════════════════════════

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crypto_calc_core::errors::CoreError;
use crypto_calc_core::models::asset::Asset;
use crypto_calc_core::models::quote::Quote;
use crypto_calc_core::providers::traits::PriceProvider;

/// What the provider answers for one history year.
#[derive(Debug, Clone)]
pub enum YearScript {
    Price(f64),
    NoData,
    Fail,
    /// Fail this many times, then return the price.
    FailThenPrice(u32, f64),
}

/// A provider whose every answer is configured up front.
/// Records each call as a string like "quote:bitcoin" or "history:bitcoin:01-01-2013".
pub struct ScriptedProvider {
    assets: Vec<Asset>,
    fail_listing: bool,
    prices: HashMap<String, f64>,
    years: HashMap<i32, YearScript>,
    /// Sleep before answering the Nth quote call (0-based).
    quote_delays: HashMap<usize, Duration>,
    quote_calls: AtomicUsize,
    failures_seen: Mutex<HashMap<i32, u32>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            assets: vec![
                Asset::new("bitcoin", "Bitcoin", "btc", Some(1)),
                Asset::new("ethereum", "Ethereum", "eth", Some(2)),
                Asset::new("tether", "Tether", "usdt", Some(3)),
            ],
            fail_listing: false,
            prices: HashMap::from([
                ("bitcoin".to_string(), 60_000.0),
                ("ethereum".to_string(), 3_000.0),
                ("tether".to_string(), 1.0),
            ]),
            years: HashMap::new(),
            quote_delays: HashMap::new(),
            quote_calls: AtomicUsize::new(0),
            failures_seen: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_assets(mut self, assets: Vec<Asset>) -> Self {
        self.assets = assets;
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn with_price(mut self, asset_id: &str, price: f64) -> Self {
        self.prices.insert(asset_id.to_string(), price);
        self
    }

    pub fn without_price(mut self, asset_id: &str) -> Self {
        self.prices.remove(asset_id);
        self
    }

    pub fn with_year(mut self, year: i32, script: YearScript) -> Self {
        self.years.insert(year, script);
        self
    }

    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>, script: YearScript) -> Self {
        for year in years {
            self.years.insert(year, script.clone());
        }
        self
    }

    pub fn with_quote_delay(mut self, call_index: usize, delay: Duration) -> Self {
        self.quote_delays.insert(call_index, delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn history_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("history:"))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn api_error(message: impl Into<String>) -> CoreError {
    CoreError::Api {
        provider: "Scripted".into(),
        message: message.into(),
    }
}

#[async_trait]
impl PriceProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn list_assets(&self, limit: u32) -> Result<Vec<Asset>, CoreError> {
        self.record(format!("list:{limit}"));
        if self.fail_listing {
            return Err(CoreError::Network("connection reset".into()));
        }
        Ok(self.assets.iter().take(limit as usize).cloned().collect())
    }

    async fn get_quote(&self, asset_id: &str) -> Result<Quote, CoreError> {
        let index = self.quote_calls.fetch_add(1, Ordering::SeqCst);
        self.record(format!("quote:{asset_id}"));
        if let Some(delay) = self.quote_delays.get(&index) {
            tokio::time::sleep(*delay).await;
        }
        let price = self
            .prices
            .get(asset_id)
            .copied()
            .ok_or_else(|| api_error(format!("no quote for {asset_id}")))?;
        Ok(Quote {
            asset_id: asset_id.to_string(),
            price_usd: price,
            change_24h_percent: Some(1.5),
        })
    }

    async fn get_historical_price(
        &self,
        asset_id: &str,
        date: NaiveDate,
    ) -> Result<Option<f64>, CoreError> {
        self.record(format!("history:{asset_id}:{}", date.format("%d-%m-%Y")));
        match self.years.get(&date.year()).cloned().unwrap_or(YearScript::NoData) {
            YearScript::Price(p) => Ok(Some(p)),
            YearScript::NoData => Ok(None),
            YearScript::Fail => Err(api_error(format!("429 for {}", date.year()))),
            YearScript::FailThenPrice(n, p) => {
                let mut seen = self.failures_seen.lock().unwrap();
                let count = seen.entry(date.year()).or_insert(0);
                if *count < n {
                    *count += 1;
                    Err(api_error(format!("transient failure for {}", date.year())))
                } else {
                    Ok(Some(p))
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Canned HTTP server — real sockets for the CoinGecko client
// ═══════════════════════════════════════════════════════════════════

/// Minimal HTTP/1.1 server on 127.0.0.1 that answers every request with
/// whatever `respond` returns for its request target (path + query).
/// Each connection serves one request and is closed.
pub struct CannedServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let respond = Arc::new(respond);

        let seen = requests.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(serve_one(socket, seen.clone(), respond.clone()));
            }
        });

        Self {
            base_url: format!("http://{addr}/api/v3"),
            requests,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Raw request heads (request line + headers), in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Just the "GET /path?query HTTP/1.1" lines.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|head| head.lines().next().unwrap_or_default().to_string())
            .collect()
    }
}

async fn serve_one<F>(mut socket: TcpStream, seen: Arc<Mutex<Vec<String>>>, respond: Arc<F>)
where
    F: Fn(&str) -> (u16, String),
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf).to_string();
    let target = head.split_whitespace().nth(1).unwrap_or_default().to_string();
    seen.lock().unwrap().push(head);

    let (status, body) = respond(&target);
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        429 => "Too Many Requests",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}
