//! Turns the rate page markup into a [`RateSnapshot`]

pub mod patterns;
pub mod text;

use crate::core::{CurrencyQuote, ExtractionFailure, FetchError, RateSnapshot, TargetCurrencySet};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// How rows are located in the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    /// Scan by name when the markup has table blocks, by code otherwise.
    #[default]
    Auto,
    /// Walk the rows of the largest table, keyed by localized currency name.
    ByName,
    /// One pattern match per currency code.
    ByCode,
}

pub struct RateExtractor {
    currencies: TargetCurrencySet,
    strategy: ParseStrategy,
    code_patterns: Vec<(String, Regex)>,
}

impl RateExtractor {
    pub fn new(
        currencies: TargetCurrencySet,
        strategy: ParseStrategy,
    ) -> Result<Self, regex::Error> {
        let code_patterns = currencies
            .codes()
            .map(|code| patterns::code_row_pattern(code).map(|re| (code.to_string(), re)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            currencies,
            strategy,
            code_patterns,
        })
    }

    pub fn extract(&self, markup: &str) -> Result<RateSnapshot, FetchError> {
        let published_at = text::extract_timestamp(markup).unwrap_or_else(|| {
            warn!("No publish timestamp found in page");
            String::new()
        });

        let table = patterns::largest_table(markup);
        let strategy = match (self.strategy, table) {
            (ParseStrategy::Auto, Some(_)) => ParseStrategy::ByName,
            (ParseStrategy::Auto, None) => ParseStrategy::ByCode,
            (forced, _) => forced,
        };
        debug!(?strategy, has_table = table.is_some(), "Extracting rate rows");

        let found = match strategy {
            ParseStrategy::ByCode => self.by_code(markup),
            _ => self.by_name(table.unwrap_or(markup)),
        };

        if found.is_empty() {
            // Judge the failure by the row shape the strategy that ran accepts
            let rows = match strategy {
                ParseStrategy::ByCode => {
                    patterns::count_data_rows(markup, patterns::MIN_CODE_ROW_CELLS)
                }
                _ => patterns::count_data_rows(table.unwrap_or(markup), patterns::MIN_DATA_CELLS),
            };
            let failure = if rows == 0 {
                ExtractionFailure::UnrecognizedLayout
            } else {
                ExtractionFailure::NoTargetCurrencies { rows }
            };
            return Err(failure.into());
        }

        Ok(RateSnapshot::new(published_at, self.assemble(found)))
    }

    fn by_code(&self, markup: &str) -> Vec<CurrencyQuote> {
        self.code_patterns
            .iter()
            .filter_map(|(code, re)| {
                let caps = re.captures(markup)?;
                let name = self.currencies.name_of(code).unwrap_or(code);
                Some(CurrencyQuote::new(code.as_str(), name, text::normalize_price(&caps[1])))
            })
            .collect()
    }

    fn by_name(&self, table: &str) -> Vec<CurrencyQuote> {
        patterns::rows(table)
            .filter(|cells| cells.len() >= patterns::MIN_DATA_CELLS)
            .filter_map(|cells| {
                let code = self.currencies.code_for_name(&cells[0])?;
                // Column 4 is the spot/cash selling price
                Some(CurrencyQuote::new(code, cells[0].as_str(), text::normalize_price(&cells[3])))
            })
            .collect()
    }

    /// First quote per code wins; output follows the canonical order.
    fn assemble(&self, found: Vec<CurrencyQuote>) -> Vec<CurrencyQuote> {
        let mut by_code: HashMap<String, CurrencyQuote> = HashMap::new();
        for quote in found {
            if !self.currencies.contains(quote.code()) {
                continue;
            }
            by_code.entry(quote.code().to_string()).or_insert(quote);
        }
        self.currencies
            .codes()
            .filter_map(|code| by_code.remove(code))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(strategy: ParseStrategy) -> RateExtractor {
        RateExtractor::new(TargetCurrencySet::boc(), strategy).unwrap()
    }

    fn extract(markup: &str) -> Result<RateSnapshot, FetchError> {
        extractor(ParseStrategy::Auto).extract(markup)
    }

    fn name_row(name: &str, spot_sell: &str) -> String {
        let prices = format!("<td>100.01</td><td>99.50</td><td>{spot_sell}</td><td>101.90</td>");
        format!("<tr><td>{name}</td>{prices}<td>100.20</td><td>2024.05.01 09:30:05</td></tr>\n")
    }

    fn page(rows: &str) -> String {
        format!(
            r#"<html><body>
<table class="nav"><tr><td>首页</td></tr></table>
<div class="publish">发布时间：2024/05/01 09:30:05</div>
<table cellpadding="0" align="left" cellspacing="0" width="100%">
<tr><th>货币名称</th><th>现汇买入价</th><th>现钞买入价</th><th>现汇卖出价</th>
<th>现钞卖出价</th><th>中行折算价</th><th>发布日期</th><th>发布时间</th></tr>
{rows}</table>
</body></html>"#
        )
    }

    #[test]
    fn test_full_page_canonical_order() {
        // Source order differs from the canonical order
        let rows = [
            name_row("澳大利亚元", "472.04"),
            name_row("加拿大元", "527.43"),
            name_row("欧元", "772.84"),
            name_row("英镑", "906.07"),
            name_row("港币", "92.01"),
            name_row("日元", "4.6038"),
            name_row("美元", "719.54"),
            name_row("瑞士法郎", "790.12"),
        ]
        .concat();
        let snapshot = extract(&page(&rows)).unwrap();

        assert_eq!(snapshot.published_at(), "2024-05-01 09:30:05");
        let codes: Vec<_> = snapshot.quotes().iter().map(|q| q.code()).collect();
        assert_eq!(codes, vec!["GBP", "EUR", "USD", "HKD", "JPY", "AUD", "CAD"]);
        assert_eq!(snapshot.quote("USD").unwrap().price(), "719.54");
        assert_eq!(snapshot.quote("USD").unwrap().name(), "美元");
        assert_eq!(snapshot.quote("JPY").unwrap().price(), "4.6038");
        assert!(snapshot.quote("CHF").is_none());
    }

    #[test]
    fn test_partial_page_omits_missing_codes() {
        let rows = [name_row("美元", "719.54"), name_row("英镑", "906.07")].concat();
        let snapshot = extract(&page(&rows)).unwrap();
        let codes: Vec<_> = snapshot.quotes().iter().map(|q| q.code()).collect();
        assert_eq!(codes, vec!["GBP", "USD"]);
        assert!(snapshot.quotes().iter().all(|q| !q.price().is_empty()));
    }

    #[test]
    fn test_short_and_unknown_rows_are_skipped() {
        let rows = [
            "<tr><td>美元</td><td>1</td><td>2</td><td>3</td></tr>\n".to_string(),
            name_row("新西兰元", "430.00"),
            name_row("欧元", "772.84"),
        ]
        .concat();
        let snapshot = extract(&page(&rows)).unwrap();
        assert_eq!(snapshot.quotes().len(), 1);
        assert_eq!(snapshot.quotes()[0].code(), "EUR");
        assert_eq!(snapshot.quotes()[0].price(), "772.84");
    }

    #[test]
    fn test_first_match_per_code_wins() {
        let rows = [name_row("美元", "719.54"), name_row("美元", "999.99")].concat();
        let snapshot = extract(&page(&rows)).unwrap();
        assert_eq!(snapshot.quotes().len(), 1);
        assert_eq!(snapshot.quotes()[0].price(), "719.54");
    }

    #[test]
    fn test_blank_price_uses_placeholder() {
        let rows = name_row("港币", "&nbsp;");
        let snapshot = extract(&page(&rows)).unwrap();
        assert_eq!(snapshot.quotes()[0].price(), text::UNAVAILABLE);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let markup = page(&[name_row("美元", "719.54"), name_row("日元", "4.6038")].concat());
        let extractor = extractor(ParseStrategy::Auto);
        let first = extractor.extract(&markup).unwrap();
        assert_eq!(first, extractor.extract(&markup).unwrap());
    }

    #[test]
    fn test_missing_timestamp_left_empty() {
        let markup = r#"<table>
<tr><td>美元</td><td>1</td><td>2</td><td>7.19</td><td>4</td></tr>
</table>"#;
        let snapshot = extract(markup).unwrap();
        assert_eq!(snapshot.published_at(), "");
        assert_eq!(snapshot.quotes().len(), 1);
    }

    #[test]
    fn test_unrelated_markup_is_unrecognized() {
        let err = extract("<html><body><p>Access denied</p></body></html>").unwrap_err();
        assert!(matches!(
            err,
            FetchError::ExtractionFailed(ExtractionFailure::UnrecognizedLayout)
        ));
    }

    #[test]
    fn test_table_without_target_currencies() {
        let rows = [
            name_row("瑞士法郎", "790.12"),
            name_row("新西兰元", "430.00"),
        ]
        .concat();
        let err = extract(&page(&rows)).unwrap_err();
        assert!(err.is_extraction_failure());
        assert!(matches!(
            err,
            FetchError::ExtractionFailed(ExtractionFailure::NoTargetCurrencies { rows: 2 })
        ));
    }

    #[test]
    fn test_code_anchored_fragment_without_table() {
        // Relay fragments carry rows but no <table> wrapper
        let markup = r#"
<tr><td>CAD</td><td>520.10</td><td>503.70</td><td>&nbsp;527.43</td><td>529.80</td></tr>
<tr><td>USD</td><td>716.50</td><td>710.70</td><td>719.54<b></b></td><td>719.54</td></tr>
<tr><td>CHF</td><td>780.00</td><td>760.00</td><td>790.12</td><td>792.00</td></tr>
<p>Updated 2024.05.01 09:30:05</p>"#;
        let snapshot = extract(markup).unwrap();
        let codes: Vec<_> = snapshot.quotes().iter().map(|q| q.code()).collect();
        assert_eq!(codes, vec!["USD", "CAD"]);
        assert_eq!(snapshot.quote("USD").unwrap().price(), "719.54");
        assert_eq!(snapshot.quote("USD").unwrap().name(), "美元");
        assert_eq!(snapshot.quote("CAD").unwrap().price(), "527.43");
        assert_eq!(snapshot.published_at(), "2024-05-01 09:30:05");
    }

    #[test]
    fn test_code_rows_without_target_currencies() {
        let other = r#"
<tr><td>CHF</td><td>1</td><td>2</td><td>790.12</td></tr>
<tr><td>NZD</td><td>1</td><td>2</td><td>430.00</td></tr>"#;
        let err = extract(other).unwrap_err();
        assert!(matches!(
            err,
            FetchError::ExtractionFailed(ExtractionFailure::NoTargetCurrencies { rows: 2 })
        ));

        // Same shape with a tracked code extracts normally
        let snapshot = extract(&other.replace("CHF", "USD")).unwrap();
        assert_eq!(snapshot.quote("USD").unwrap().price(), "790.12");
    }

    #[test]
    fn test_forced_by_code_on_table_page() {
        let markup = r#"<table>
<tr><td>GBP</td><td>1</td><td>2</td><td>906.07</td><td>4</td></tr>
<tr><td>HKD</td><td>1</td><td>2</td><td>92.01</td><td>4</td></tr>
</table>"#;
        // Auto picks the name scan on table pages, which finds nothing here
        assert!(extract(markup).is_err());

        let snapshot = extractor(ParseStrategy::ByCode).extract(markup).unwrap();
        let codes: Vec<_> = snapshot.quotes().iter().map(|q| q.code()).collect();
        assert_eq!(codes, vec!["GBP", "HKD"]);
    }

    #[test]
    fn test_forced_by_name_without_table() {
        let markup = "<tr><td>英镑</td><td>1</td><td>2</td><td>906.07</td><td>4</td></tr>";
        let snapshot = extractor(ParseStrategy::ByName).extract(markup).unwrap();
        assert_eq!(snapshot.quotes()[0].code(), "GBP");
    }

    #[test]
    fn test_parse_strategy_serde_names() {
        let strategy: ParseStrategy = serde_yaml::from_str("by_name").unwrap();
        assert_eq!(strategy, ParseStrategy::ByName);
        let serialized = serde_yaml::to_string(&ParseStrategy::Auto).unwrap();
        assert_eq!(serialized.trim(), "auto");
    }
}
