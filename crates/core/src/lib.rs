pub mod errors;
pub mod format;
pub mod models;
pub mod providers;
pub mod services;
pub mod session;

use chrono::Datelike;
use models::{
    asset::{Asset, Catalog},
    historical::HistoricalReport,
    profit::{InputMode, ProfitForm, ProfitSummary},
    quote::AssetQuote,
    settings::Settings,
};
use providers::{coingecko::CoinGeckoProvider, traits::PriceProvider};
use services::{
    catalog_service::CatalogService,
    historical_service::{HistoricalService, EMPTY_HISTORY_MESSAGE},
    profit_service::{evaluate_form, mirror_investment, mirror_quantity},
    quote_service::QuoteService,
};
use session::{Session, Slot};
use std::sync::{Arc, Mutex, MutexGuard};

use errors::CoreError;

/// Main entry point for the calculator core.
///
/// Cheap to clone; clones share one `Session`, so a front end can hand a
/// clone to each task it spawns. Results of superseded requests are dropped
/// by the session rather than overwriting newer ones.
#[must_use]
#[derive(Clone)]
pub struct CryptoCalculator {
    settings: Settings,
    catalog_service: CatalogService,
    quote_service: QuoteService,
    historical_service: HistoricalService,
    session: Arc<Mutex<Session>>,
}

impl std::fmt::Debug for CryptoCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.lock();
        f.debug_struct("CryptoCalculator")
            .field("base_url", &self.settings.base_url)
            .field("catalog", &session.catalog().len())
            .field("quote", &session.quote().map(|q| q.asset.id.as_str()))
            .field("history_rows", &session.history().map(|h| h.entries.len()))
            .finish()
    }
}

impl CryptoCalculator {
    /// Build a calculator talking to the CoinGecko API described by `settings`.
    pub fn new(settings: Settings) -> Self {
        let provider = Arc::new(CoinGeckoProvider::new(&settings));
        Self::with_provider(settings, provider)
    }

    /// Build a calculator on top of any price provider.
    pub fn with_provider(settings: Settings, provider: Arc<dyn PriceProvider>) -> Self {
        Self {
            catalog_service: CatalogService::new(provider.clone(), settings.catalog_size),
            quote_service: QuoteService::new(provider.clone()),
            historical_service: HistoricalService::new(
                provider,
                settings.reference_asset_id.clone(),
                settings.first_year,
                settings.fetch_policy.clone(),
            ),
            settings,
            session: Arc::new(Mutex::new(Session::new())),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ── Catalog ─────────────────────────────────────────────────────

    /// Fetch the asset listing and publish it.
    /// On failure the error is logged and the previous catalog is kept.
    pub async fn load_catalog(&self) -> Result<usize, CoreError> {
        let ticket = self.lock().begin(Slot::Catalog);

        match self.catalog_service.load().await {
            Ok(catalog) => {
                let count = catalog.len();
                if !self.lock().commit_catalog(ticket, catalog) {
                    tracing::debug!("Discarding superseded catalog load #{}", ticket.generation());
                }
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("Failed to load asset catalog: {}", e);
                self.lock().abandon(ticket);
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Catalog {
        self.lock().catalog().clone()
    }

    /// Selection-list search over the loaded catalog, in catalog order.
    #[must_use]
    pub fn search_assets(&self, query: &str, limit: Option<usize>) -> Vec<Asset> {
        self.lock()
            .catalog()
            .search(query, limit)
            .into_iter()
            .cloned()
            .collect()
    }

    // ── Quotes ──────────────────────────────────────────────────────

    /// Select an asset from the catalog and fetch its quote.
    /// On failure the error is logged and the previous quote stays visible.
    pub async fn select_asset(&self, asset_id: &str) -> Result<AssetQuote, CoreError> {
        let (ticket, catalog) = {
            let mut session = self.lock();
            (session.begin(Slot::Quote), session.catalog().clone())
        };

        match self.quote_service.fetch(&catalog, asset_id).await {
            Ok(quote) => {
                if !self.lock().commit_quote(ticket, quote.clone()) {
                    tracing::debug!("Discarding superseded quote for {}", quote.asset.id);
                }
                Ok(quote)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch quote for '{}': {}", asset_id, e);
                self.lock().abandon(ticket);
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn current_quote(&self) -> Option<AssetQuote> {
        self.lock().quote().cloned()
    }

    // ── Profit ──────────────────────────────────────────────────────

    /// Mirror the value typed in `mode` into the other field using the
    /// current quote: an amount becomes a quantity and vice versa.
    #[must_use]
    pub fn mirror_value(&self, mode: InputMode, value: f64) -> Option<f64> {
        let price = self.lock().quote()?.price_usd();
        Some(match mode {
            InputMode::Amount => mirror_quantity(value, price),
            InputMode::Quantity => mirror_investment(value, price),
        })
    }

    /// Validate `form` and compute its profit summary against the current quote.
    pub fn calculate_profit(&self, form: &ProfitForm) -> Result<ProfitSummary, CoreError> {
        let session = self.lock();
        evaluate_form(form, session.quote())
    }

    // ── Historical replay ───────────────────────────────────────────

    /// Replay `investment` over every year up to the current calendar year.
    pub async fn run_history(&self, investment: f64) -> Result<HistoricalReport, CoreError> {
        let current_year = chrono::Utc::now().year();
        self.run_history_until(investment, current_year).await
    }

    /// Replay `investment` over `first_year..=last_year`.
    ///
    /// Every call starts from scratch. A run that finishes after a newer one
    /// has started still returns its report but does not publish it.
    /// Returns `EmptyHistory` when no year resolved.
    pub async fn run_history_until(
        &self,
        investment: f64,
        last_year: i32,
    ) -> Result<HistoricalReport, CoreError> {
        if !investment.is_finite() || investment <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Investment must be a positive number, got {investment}"
            )));
        }

        let ticket = self.lock().begin(Slot::History);

        match self.historical_service.build(investment, last_year).await {
            Ok(report) => {
                let empty = report.is_empty();
                if !self
                    .lock()
                    .commit_history(ticket, report.clone(), EMPTY_HISTORY_MESSAGE)
                {
                    tracing::debug!(
                        "Discarding superseded history run #{} (${})",
                        ticket.generation(),
                        investment
                    );
                }
                if empty {
                    return Err(CoreError::EmptyHistory(EMPTY_HISTORY_MESSAGE.to_string()));
                }
                Ok(report)
            }
            Err(e) => {
                tracing::warn!("Historical run for ${} failed: {}", investment, e);
                self.lock().fail_history(ticket, EMPTY_HISTORY_MESSAGE);
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn history(&self) -> Option<HistoricalReport> {
        self.lock().history().cloned()
    }

    /// Page-level error of the most recent published run, if any.
    #[must_use]
    pub fn history_error(&self) -> Option<String> {
        self.lock().history_error().map(str::to_string)
    }

    // ── Session ─────────────────────────────────────────────────────

    #[must_use]
    pub fn is_loading(&self, slot: Slot) -> bool {
        self.lock().is_loading(slot)
    }

    /// Copy of the whole session state.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }
}
