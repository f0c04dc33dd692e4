use std::collections::HashSet;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::lookup::PriceType;
use crate::parser::Restaurant;

/// Membership filters over the cleaned table.
///
/// `None` means no restriction. An empty set matches nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantFilter {
    pub countries: Option<HashSet<String>>,
    pub cities: Option<HashSet<String>>,
    pub price_types: Option<HashSet<PriceType>>,
}

impl RestaurantFilter {
    pub fn matches(&self, r: &Restaurant) -> bool {
        self.countries.as_ref().map_or(true, |s| s.contains(&r.country))
            && self.cities.as_ref().map_or(true, |s| s.contains(&r.city))
            && self
                .price_types
                .as_ref()
                .map_or(true, |s| s.contains(&r.price_type))
    }

    /// Rows passing every filter, in table order
    pub fn apply<'a>(&self, rows: &'a [Restaurant]) -> Vec<&'a Restaurant> {
        rows.iter().filter(|r| self.matches(r)).collect()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.countries.is_none() && self.cities.is_none() && self.price_types.is_none()
    }
}

/// Build a filter from comma-separated command line values
pub fn resolve_filter(
    countries: Option<Vec<String>>,
    cities: Option<Vec<String>>,
    price_types: Option<Vec<String>>,
) -> Result<RestaurantFilter> {
    let price_types = price_types
        .map(|list| {
            list.iter()
                .map(|p| {
                    p.trim()
                        .parse::<PriceType>()
                        .map_err(|_| PipelineError::Filter(format!("Unknown price type: {}", p)))
                })
                .collect::<Result<HashSet<PriceType>>>()
        })
        .transpose()?;

    let to_set = |list: Vec<String>| -> HashSet<String> {
        list.into_iter().map(|s| s.trim().to_string()).collect()
    };

    let filter = RestaurantFilter {
        countries: countries.map(to_set),
        cities: cities.map(to_set),
        price_types,
    };

    debug!(?filter, "Resolved filter");
    Ok(filter)
}
