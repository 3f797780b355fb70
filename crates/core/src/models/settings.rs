use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public CoinGecko API root.
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// How many assets the catalog asks for.
pub const DEFAULT_CATALOG_SIZE: u32 = 1000;

/// Asset the historical replay is computed for.
pub const DEFAULT_REFERENCE_ASSET: &str = "bitcoin";

/// First year of the historical replay.
pub const FIRST_HISTORY_YEAR: i32 = 2009;

/// Pause before each dated history request.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(1200);

/// How the historical builder paces and retries its per-year requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FetchPolicy {
    /// Wait `delay` before every request, never retry.
    FixedDelay { delay: Duration },

    /// Wait `delay` before the first attempt, then retry failed requests
    /// up to `max_retries` times. Backoff doubles from `initial_backoff`,
    /// capped at `max_backoff`, plus up to `jitter` of random extra wait.
    ExponentialBackoff {
        delay: Duration,
        initial_backoff: Duration,
        max_backoff: Duration,
        max_retries: u32,
        jitter: Duration,
    },
}

impl FetchPolicy {
    /// Production-leaning backoff: 5 retries starting at 2s, capped at 30s.
    pub fn backoff() -> Self {
        FetchPolicy::ExponentialBackoff {
            delay: DEFAULT_REQUEST_DELAY,
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(30),
            max_retries: 5,
            jitter: Duration::from_millis(500),
        }
    }

    /// No waiting at all. Handy against local mocks.
    pub fn immediate() -> Self {
        FetchPolicy::FixedDelay {
            delay: Duration::ZERO,
        }
    }

    /// Pause taken before the first attempt of each request.
    pub fn request_delay(&self) -> Duration {
        match self {
            FetchPolicy::FixedDelay { delay } => *delay,
            FetchPolicy::ExponentialBackoff { delay, .. } => *delay,
        }
    }

    pub fn max_retries(&self) -> u32 {
        match self {
            FetchPolicy::FixedDelay { .. } => 0,
            FetchPolicy::ExponentialBackoff { max_retries, .. } => *max_retries,
        }
    }

    /// Wait before retry number `attempt + 1` (attempt counts from 0).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        match self {
            FetchPolicy::FixedDelay { .. } => Duration::ZERO,
            FetchPolicy::ExponentialBackoff {
                initial_backoff,
                max_backoff,
                jitter,
                ..
            } => {
                let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
                let base = initial_backoff.saturating_mul(factor).min(*max_backoff);
                let jitter_ms = u64::try_from(jitter.as_millis()).unwrap_or(u64::MAX);
                let extra = if jitter_ms == 0 {
                    0
                } else {
                    rand::rng().random_range(0..=jitter_ms)
                };
                base + Duration::from_millis(extra)
            }
        }
    }
}

impl Default for FetchPolicy {
    fn default() -> Self {
        FetchPolicy::FixedDelay {
            delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

/// Runtime configuration for the calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the price service API, without trailing slash
    pub base_url: String,

    /// Optional demo/pro key, sent as a header when present
    pub api_key: Option<String>,

    /// `per_page` for the market listing
    pub catalog_size: u32,

    /// Asset the historical replay is computed for
    pub reference_asset_id: String,

    /// First year of the replay; the last is the current calendar year
    pub first_year: i32,

    pub fetch_policy: FetchPolicy,

    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            catalog_size: DEFAULT_CATALOG_SIZE,
            reference_asset_id: DEFAULT_REFERENCE_ASSET.to_string(),
            first_year: FIRST_HISTORY_YEAR,
            fetch_policy: FetchPolicy::default(),
            request_timeout: None,
        }
    }
}
