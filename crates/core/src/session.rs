use serde::Serialize;

use crate::models::asset::Catalog;
use crate::models::historical::HistoricalReport;
use crate::models::quote::AssetQuote;

/// Independently updated parts of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Slot {
    Catalog,
    Quote,
    History,
}

/// Issued when a request for a slot starts. Only the ticket carrying the
/// slot's latest generation may publish a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Ticket {
    slot: Slot,
    generation: u64,
}

impl Ticket {
    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SlotState {
    pub generation: u64,
    pub loading: bool,
}

/// In-memory state behind the calculator's views.
///
/// Each slot has one writer path and a monotonically increasing generation.
/// Results from a superseded request are dropped instead of overwriting
/// newer data.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    catalog: Catalog,
    quote: Option<AssetQuote>,
    history: Option<HistoricalReport>,
    history_error: Option<String>,
    catalog_slot: SlotState,
    quote_slot: SlotState,
    history_slot: SlotState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut SlotState {
        match slot {
            Slot::Catalog => &mut self.catalog_slot,
            Slot::Quote => &mut self.quote_slot,
            Slot::History => &mut self.history_slot,
        }
    }

    pub fn slot(&self, slot: Slot) -> SlotState {
        match slot {
            Slot::Catalog => self.catalog_slot,
            Slot::Quote => self.quote_slot,
            Slot::History => self.history_slot,
        }
    }

    pub fn is_loading(&self, slot: Slot) -> bool {
        self.slot(slot).loading
    }

    /// Start a request for `slot`, superseding any request still in flight.
    pub fn begin(&mut self, slot: Slot) -> Ticket {
        let state = self.slot_mut(slot);
        state.generation += 1;
        state.loading = true;
        Ticket {
            slot,
            generation: state.generation,
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.slot(ticket.slot).generation == ticket.generation
    }

    /// Clear the loading flag if `ticket` is still current.
    fn settle(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.slot_mut(ticket.slot).loading = false;
        true
    }

    pub fn commit_catalog(&mut self, ticket: Ticket, catalog: Catalog) -> bool {
        debug_assert_eq!(ticket.slot, Slot::Catalog);
        if !self.settle(ticket) {
            return false;
        }
        self.catalog = catalog;
        true
    }

    pub fn commit_quote(&mut self, ticket: Ticket, quote: AssetQuote) -> bool {
        debug_assert_eq!(ticket.slot, Slot::Quote);
        if !self.settle(ticket) {
            return false;
        }
        self.quote = Some(quote);
        true
    }

    /// Publish a finished historical run. An empty report also sets the
    /// page-level error; anything else clears it.
    pub fn commit_history(&mut self, ticket: Ticket, report: HistoricalReport, empty_message: &str) -> bool {
        debug_assert_eq!(ticket.slot, Slot::History);
        if !self.settle(ticket) {
            return false;
        }
        self.history_error = report.is_empty().then(|| empty_message.to_string());
        self.history = Some(report);
        true
    }

    /// A historical run failed outright. Previous rows are cleared and the
    /// page-level error set.
    pub fn fail_history(&mut self, ticket: Ticket, message: impl Into<String>) -> bool {
        debug_assert_eq!(ticket.slot, Slot::History);
        if !self.settle(ticket) {
            return false;
        }
        self.history = None;
        self.history_error = Some(message.into());
        true
    }

    /// A catalog or quote request failed. The slot keeps its previous value.
    pub fn abandon(&mut self, ticket: Ticket) -> bool {
        self.settle(ticket)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn quote(&self) -> Option<&AssetQuote> {
        self.quote.as_ref()
    }

    pub fn history(&self) -> Option<&HistoricalReport> {
        self.history.as_ref()
    }

    pub fn history_error(&self) -> Option<&str> {
        self.history_error.as_deref()
    }
}
