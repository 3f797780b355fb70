use crypto_calc_core::format::{
    format_compact_usd, format_multiplier, format_percent, format_price, format_quantity,
    format_usd,
};
use crypto_calc_core::models::asset::Asset;
use crypto_calc_core::models::historical::HistoricalReport;
use crypto_calc_core::models::luxury::LUXURY_ITEMS;
use crypto_calc_core::models::profit::ProfitSummary;
use crypto_calc_core::models::quote::AssetQuote;

pub fn print_assets(assets: &[Asset]) {
    if assets.is_empty() {
        println!("No matching assets.");
        return;
    }
    for asset in assets {
        let rank = asset
            .market_cap_rank
            .map(|r| format!("#{r}"))
            .unwrap_or_else(|| "-".to_string());
        println!("{rank:>6}  {:<32} {}", asset.display_label(), asset.id);
    }
}

pub fn print_quote(quote: &AssetQuote) {
    let change = quote
        .quote
        .change_24h_percent
        .map(format_percent)
        .unwrap_or_else(|| "n/a".to_string());
    println!(
        "{}: {} ({} 24h)",
        quote.asset.display_label(),
        format_price(quote.price_usd()),
        change
    );
}

pub fn print_profit(quote: &AssetQuote, summary: &ProfitSummary) {
    let symbol = quote.asset.symbol.to_uppercase();
    println!();
    println!("  Investment:       {}", format_usd(summary.investment));
    println!("  Quantity:         {} {symbol}", format_quantity(summary.quantity));
    println!("  Buy price:        {}", format_price(summary.buy_price));
    println!("  Target price:     {}", format_price(summary.target_price));
    println!("  Potential value:  {}", format_usd(summary.potential_value));
    let outcome = if summary.is_breakeven() {
        "Break-even:"
    } else if summary.is_profit() {
        "Profit:"
    } else {
        "Loss:"
    };
    println!(
        "  {outcome:<18}{} ({})",
        format_usd(summary.profit_amount),
        format_percent(summary.profit_percent)
    );
    println!("  Breakeven price:  {}", format_price(summary.breakeven_price));
}

pub fn print_history(report: &HistoricalReport) {
    println!(
        "{} today: {}  |  investment per year: {}",
        report.asset_id,
        format_price(report.current_price_usd),
        format_usd(report.investment)
    );
    println!();
    println!(
        "{:<6} {:>14} {:>18} {:>16} {:>12}  Could buy",
        "Year", "Price", "Coins", "Worth today", "Multiple"
    );

    for entry in &report.entries {
        let items = LUXURY_ITEMS
            .iter()
            .filter(|item| entry.affordable_items.iter().any(|name| name == item.name))
            .map(|item| item.emoji)
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{:<6} {:>14} {:>18} {:>16} {:>12}  {}",
            format!("{}{}", entry.year, if entry.seeded { "*" } else { "" }),
            format_price(entry.historical_price_usd),
            format_quantity(entry.asset_amount),
            format_compact_usd(entry.current_value),
            format_multiplier(entry.multiplier),
            items
        );
    }

    if report.entries.iter().any(|e| e.seeded) {
        println!();
        println!("* illustrative price, no market data for that year");
    }
    for skipped in &report.skipped {
        println!("{}: skipped ({})", skipped.year, skipped.reason);
    }
}
