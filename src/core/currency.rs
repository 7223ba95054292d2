//! Currency quotes and the fixed set of currencies we track

use serde::{Deserialize, Serialize};

/// One currency's extracted display price.
///
/// The price is kept as text so the source's exact precision survives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyQuote {
    code: String,
    name: String,
    price: String,
}

impl CurrencyQuote {
    pub fn new(code: impl Into<String>, name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            price: price.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> &str {
        &self.price
    }
}

/// Fixed mapping from currency code to the localized name used on the page.
///
/// Entry order is the canonical output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetCurrencySet {
    entries: Vec<(String, String)>,
}

impl TargetCurrencySet {
    pub fn new<C, N>(entries: impl IntoIterator<Item = (C, N)>) -> Self
    where
        C: Into<String>,
        N: Into<String>,
    {
        let mut seen = Vec::new();
        let entries = entries
            .into_iter()
            .map(|(code, name)| (code.into(), name.into()))
            .filter(|(code, _)| {
                if seen.contains(code) {
                    false
                } else {
                    seen.push(code.clone());
                    true
                }
            })
            .collect();
        Self { entries }
    }

    /// The seven currencies listed by the Bank of China rate page.
    pub fn boc() -> Self {
        Self::new([
            ("GBP", "英镑"),
            ("EUR", "欧元"),
            ("USD", "美元"),
            ("HKD", "港币"),
            ("JPY", "日元"),
            ("AUD", "澳大利亚元"),
            ("CAD", "加拿大元"),
        ])
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(code, _)| code.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.iter().any(|(c, _)| c == code)
    }

    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, name)| name.as_str())
    }

    pub fn code_for_name(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, n)| n == name)
            .map(|(code, _)| code.as_str())
    }
}

impl Default for TargetCurrencySet {
    fn default() -> Self {
        Self::boc()
    }
}
