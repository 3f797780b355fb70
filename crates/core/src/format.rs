//! Display helpers shared by every front end.
//!
//! Formatting never feeds back into calculations; values stay full `f64`.

const NOT_AVAILABLE: &str = "N/A";

/// Insert `,` every three digits of an unsigned integer string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `|value|` with `decimals` places and grouped integer part, plus whether a
/// minus sign is needed (never for values that round to zero).
fn grouped(value: f64, decimals: usize) -> (bool, String) {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut out = group_thousands(int_part);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }

    let negative = value < 0.0 && out.chars().any(|c| c.is_ascii_digit() && c != '0');
    (negative, out)
}

/// "$1,234.56", "-$12.00"
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let (negative, body) = grouped(value, 2);
    if negative {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// Like `format_usd`, with more decimals for sub-dollar prices.
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let decimals = match value.abs() {
        v if v >= 1.0 || v == 0.0 => 2,
        v if v >= 0.01 => 4,
        _ => 8,
    };
    let (negative, body) = grouped(value, decimals);
    if negative {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// "+12.34%", "-100.00%", "0.00%"
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let (negative, body) = grouped(value, 2);
    if negative {
        format!("-{body}%")
    } else if value > 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("+{body}%")
    } else {
        format!("{body}%")
    }
}

/// "1,200,000x" for big multipliers, "2.50x" below 100.
pub fn format_multiplier(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let decimals = if value.abs() >= 100.0 { 0 } else { 2 };
    let (negative, body) = grouped(value, decimals);
    if negative {
        format!("-{body}x")
    } else {
        format!("{body}x")
    }
}

/// Coin amounts: up to 8 decimals, trailing zeros dropped.
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let (negative, body) = grouped(value, 8);
    let body = if body.contains('.') {
        body.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        body
    };
    if negative {
        format!("-{body}")
    } else {
        body
    }
}

/// "$1.20B", "$3.40M", "$5.60K", "$999.00"
pub fn format_compact_usd(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let abs = value.abs();
    let mut unit = COMPACT_UNITS.iter().position(|(size, _)| abs >= *size);

    // Pick the unit after rounding: 999,999 is "$1.00M", not "$1,000.00K".
    let rounds_up = |divisor: f64| round_cents(abs / divisor) >= 1000.0;
    unit = match unit {
        Some(i) if i > 0 && rounds_up(COMPACT_UNITS[i].0) => Some(i - 1),
        None if rounds_up(1.0) => Some(COMPACT_UNITS.len() - 1),
        other => other,
    };

    match unit {
        Some(i) => {
            let (size, suffix) = COMPACT_UNITS[i];
            format!("{}{suffix}", format_usd(value / size))
        }
        None => format_usd(value),
    }
}

const COMPACT_UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
