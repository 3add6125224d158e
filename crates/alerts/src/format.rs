//! Alert message formatting.

use chrono::{DateTime, Utc};
use scanner_core::Opportunity;

/// Escape text for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format an opportunity as an alert message.
pub fn format_opportunity_message(opportunity: &Opportunity, now: DateTime<Utc>) -> String {
    format!(
        "🚀 <b>Arbitrage Opportunity Detected</b> 🚀\n\n\
         <b>Network:</b> {}\n\
         <b>Pair:</b> {}\n\
         <b>Buy At:</b> {} ({:.6})\n\
         <b>Sell At:</b> {} ({:.6})\n\
         <b>Profit Spread:</b> {:.2}%\n\n\
         ⏱ <i>{}</i>",
        opportunity.network,
        escape_html(&opportunity.pair),
        escape_html(opportunity.buy.venue.as_str()),
        opportunity.buy.price,
        escape_html(opportunity.sell.venue.as_str()),
        opportunity.sell.price,
        opportunity.spread_pct,
        now.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use scanner_core::{Chain, PriceQuote};

    #[test]
    fn test_format_message() {
        let opp = Opportunity::new(
            Chain::Ethereum,
            "WETH/USDC".into(),
            PriceQuote::new("uniswap_v2".into(), 3000.0),
            PriceQuote::new("sushiswap".into(), 3020.0),
        );
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();

        assert_eq!(
            format_opportunity_message(&opp, now),
            "🚀 <b>Arbitrage Opportunity Detected</b> 🚀\n\n\
             <b>Network:</b> ethereum\n\
             <b>Pair:</b> WETH/USDC\n\
             <b>Buy At:</b> uniswap_v2 (3000.000000)\n\
             <b>Sell At:</b> sushiswap (3020.000000)\n\
             <b>Profit Spread:</b> 0.67%\n\n\
             ⏱ <i>2024-05-01 12:30:00 UTC</i>"
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&c"), "a&lt;b&gt;&amp;c");
        assert_eq!(escape_html("plain"), "plain");
    }
}
