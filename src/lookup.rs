//! Static code tables and the price tier policy used by the code resolver.
//!
//! The built-in tables reproduce the source dashboard's constants exactly,
//! including its spellings. They are plain values handed to the resolver, so
//! tests and config files can substitute their own.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{PipelineError, Result};

const COUNTRIES: &[(i64, &str)] = &[
    (1, "India"),
    (14, "Australia"),
    (30, "Brazil"),
    (37, "Canada"),
    (94, "Indonesia"),
    (148, "New Zeland"),
    (162, "Philippines"),
    (166, "Qatar"),
    (184, "Singapure"),
    (189, "South Africa"),
    (191, "Sri Lanka"),
    (208, "Turkey"),
    (214, "United Arab Emirates"),
    (215, "England"),
    (216, "United States of America"),
];

const COLORS: &[(&str, &str)] = &[
    ("3F7E00", "darkgreen"),
    ("5BA829", "green"),
    ("9ACD32", "lightgreen"),
    ("CDD614", "orange"),
    ("FFBA00", "red"),
    ("CBCBC8", "darkred"),
    ("FF7800", "darkred"),
];

/// Country and rating-color lookup tables
#[derive(Debug, Clone, PartialEq)]
pub struct CodeTables {
    countries: BTreeMap<i64, String>,
    colors: BTreeMap<String, String>,
}

impl CodeTables {
    pub fn new(countries: BTreeMap<i64, String>, colors: BTreeMap<String, String>) -> Self {
        Self { countries, colors }
    }

    pub fn country(&self, code: i64) -> Option<&str> {
        self.countries.get(&code).map(|s| s.as_str())
    }

    pub fn color(&self, hex: &str) -> Option<&str> {
        self.colors.get(hex).map(|s| s.as_str())
    }

    pub fn countries(&self) -> &BTreeMap<i64, String> {
        &self.countries
    }

    pub fn colors(&self) -> &BTreeMap<String, String> {
        &self.colors
    }

    pub fn with_countries(self, countries: BTreeMap<i64, String>) -> Self {
        Self { countries, ..self }
    }

    pub fn with_colors(self, colors: BTreeMap<String, String>) -> Self {
        Self { colors, ..self }
    }
}

impl Default for CodeTables {
    fn default() -> Self {
        Self {
            countries: COUNTRIES
                .iter()
                .map(|(code, name)| (*code, name.to_string()))
                .collect(),
            colors: COLORS
                .iter()
                .map(|(hex, name)| (hex.to_string(), name.to_string()))
                .collect(),
        }
    }
}

/// Price tier derived from the numeric price range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Cheap,
    Normal,
    Expensive,
    Gourmet,
}

impl PriceType {
    pub const ALL: [PriceType; 4] = [
        PriceType::Cheap,
        PriceType::Normal,
        PriceType::Expensive,
        PriceType::Gourmet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceType::Cheap => "cheap",
            PriceType::Normal => "normal",
            PriceType::Expensive => "expensive",
            PriceType::Gourmet => "gourmet",
        }
    }
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PriceType {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        PriceType::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| PipelineError::Config(format!("Unknown price type: {}", s)))
    }
}

/// Maps price range codes to tiers.
///
/// Codes 1, 2 and 3 map to cheap, normal and expensive. Anything else,
/// including text that is not an integer, gets `unmatched`, which is
/// gourmet unless configured otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePolicy {
    pub unmatched: PriceType,
}

impl PricePolicy {
    pub fn new(unmatched: PriceType) -> Self {
        Self { unmatched }
    }

    pub fn tier(&self, price_range: i64) -> PriceType {
        match price_range {
            1 => PriceType::Cheap,
            2 => PriceType::Normal,
            3 => PriceType::Expensive,
            _ => self.unmatched,
        }
    }

    /// Tier for a raw cell value
    pub fn tier_for(&self, raw: &str) -> PriceType {
        match parse_integral(raw) {
            Some(code) => self.tier(code),
            None => self.unmatched,
        }
    }
}

impl Default for PricePolicy {
    fn default() -> Self {
        Self::new(PriceType::Gourmet)
    }
}

/// Parse an integer, also accepting integral floats such as `"2.0"`.
pub fn parse_integral(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(f as i64),
        _ => None,
    }
}
