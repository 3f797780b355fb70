use crate::errors::CoreError;
use crate::models::profit::{InputMode, ProfitForm, ProfitSummary};
use crate::models::quote::AssetQuote;

/// Compute a profit summary from already-resolved inputs.
///
/// Formulas are applied as-is: no clamping, no rounding, no guard against a
/// zero quantity (which yields infinities/NaN). `buy_price` and
/// `breakeven_price` are the same quotient.
pub fn calculate_profit(investment: f64, quantity: f64, target_price: f64) -> ProfitSummary {
    let buy_price = investment / quantity;
    let potential_value = quantity * target_price;
    let profit_amount = potential_value - investment;
    let profit_percent = profit_amount / investment * 100.0;

    ProfitSummary {
        investment,
        quantity,
        buy_price,
        target_price,
        potential_value,
        profit_amount,
        profit_percent,
        breakeven_price: investment / quantity,
    }
}

/// Quantity bought by `investment` at `price_usd`.
pub fn mirror_quantity(investment: f64, price_usd: f64) -> f64 {
    investment / price_usd
}

/// Cost of `quantity` at `price_usd`.
pub fn mirror_investment(quantity: f64, price_usd: f64) -> f64 {
    quantity * price_usd
}

/// Validate a submitted form and compute its summary against `quote`.
///
/// The form's asset must be the quoted asset; the entered field is taken
/// verbatim and the other one mirrored through the quote price.
pub fn evaluate_form(form: &ProfitForm, quote: Option<&AssetQuote>) -> Result<ProfitSummary, CoreError> {
    let form = form.validate()?;

    let quote = quote.ok_or_else(|| {
        CoreError::ValidationError(format!("No current price loaded for {}", form.asset_id))
    })?;
    if quote.asset.id != form.asset_id {
        return Err(CoreError::ValidationError(format!(
            "Loaded price is for {}, not {}",
            quote.asset.id, form.asset_id
        )));
    }

    let price = quote.price_usd();
    let (investment, quantity) = match form.mode {
        InputMode::Amount => (form.value, mirror_quantity(form.value, price)),
        InputMode::Quantity => (mirror_investment(form.value, price), form.value),
    };

    Ok(calculate_profit(investment, quantity, form.target_price))
}
