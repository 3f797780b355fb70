use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Which of investment/quantity the user typed. The other one is mirrored
/// through the current quote price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    /// User enters a USD investment; quantity = amount / price
    #[default]
    Amount,
    /// User enters a coin quantity; investment = quantity × price
    Quantity,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputMode::Amount => write!(f, "amount"),
            InputMode::Quantity => write!(f, "quantity"),
        }
    }
}

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    Asset,
    Amount,
    Quantity,
    TargetPrice,
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormField::Asset => write!(f, "asset"),
            FormField::Amount => write!(f, "amount"),
            FormField::Quantity => write!(f, "quantity"),
            FormField::TargetPrice => write!(f, "target price"),
        }
    }
}

/// A validation message scoped to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    pub fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Raw form state as submitted. Every field is optional until validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitForm {
    pub asset_id: Option<String>,
    pub mode: InputMode,
    /// USD investment in `Amount` mode, coin quantity in `Quantity` mode
    pub value: Option<f64>,
    pub target_price: Option<f64>,
}

impl ProfitForm {
    pub fn amount(asset_id: impl Into<String>, investment: f64, target_price: f64) -> Self {
        Self {
            asset_id: Some(asset_id.into()),
            mode: InputMode::Amount,
            value: Some(investment),
            target_price: Some(target_price),
        }
    }

    pub fn quantity(asset_id: impl Into<String>, quantity: f64, target_price: f64) -> Self {
        Self {
            asset_id: Some(asset_id.into()),
            mode: InputMode::Quantity,
            value: Some(quantity),
            target_price: Some(target_price),
        }
    }

    /// Check every field and collect all messages at once, so a front end
    /// can show them next to their inputs.
    pub fn validate(&self) -> Result<ValidatedForm, CoreError> {
        let mut errors = Vec::new();

        let asset_id = match self.asset_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Some(id.to_string()),
            _ => {
                errors.push(FieldError::new(FormField::Asset, "Please select a cryptocurrency"));
                None
            }
        };

        let (value_field, missing_message) = match self.mode {
            InputMode::Amount => (FormField::Amount, "Please enter an investment amount"),
            InputMode::Quantity => (FormField::Quantity, "Please enter a quantity"),
        };
        let value = match self.value {
            None => {
                errors.push(FieldError::new(value_field, missing_message));
                None
            }
            Some(v) if !v.is_finite() || v <= 0.0 => {
                errors.push(FieldError::new(value_field, "Must be a positive number"));
                None
            }
            Some(v) => Some(v),
        };

        let target_price = match self.target_price {
            None => {
                errors.push(FieldError::new(FormField::TargetPrice, "Please enter a target price"));
                None
            }
            Some(v) if !v.is_finite() || v < 0.0 => {
                errors.push(FieldError::new(
                    FormField::TargetPrice,
                    "Target price must be zero or greater",
                ));
                None
            }
            Some(v) => Some(v),
        };

        match (asset_id, value, target_price) {
            (Some(asset_id), Some(value), Some(target_price)) if errors.is_empty() => {
                Ok(ValidatedForm {
                    asset_id,
                    mode: self.mode,
                    value,
                    target_price,
                })
            }
            _ => Err(CoreError::InvalidForm(errors)),
        }
    }
}

/// A form that passed validation. Still needs the quote price to resolve
/// the mirrored field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedForm {
    pub asset_id: String,
    pub mode: InputMode,
    pub value: f64,
    pub target_price: f64,
}

/// Result of a profit calculation.
///
/// `buy_price` and `breakeven_price` are both investment / quantity. There
/// is no fee or slippage model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitSummary {
    pub investment: f64,
    pub quantity: f64,
    pub buy_price: f64,
    pub target_price: f64,

    /// quantity × target_price
    pub potential_value: f64,

    /// potential_value − investment
    pub profit_amount: f64,

    /// profit_amount / investment × 100
    pub profit_percent: f64,

    pub breakeven_price: f64,
}

impl ProfitSummary {
    pub fn is_profit(&self) -> bool {
        self.profit_amount > 0.0 && !self.is_breakeven()
    }

    /// True when the result rounds to zero cents, e.g. a target equal to the buy price.
    pub fn is_breakeven(&self) -> bool {
        self.profit_amount.abs() < 0.005
    }
}
