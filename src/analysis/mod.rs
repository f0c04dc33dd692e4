//! Read-only views over the cleaned table: headline counts, grouped
//! aggregates, rankings, price-tier mixes and column statistics.

pub mod group;
pub mod mix;
pub mod rank;
pub mod stats;

use serde::Serialize;
use std::collections::HashSet;

use crate::parser::Restaurant;

pub use group::{group_aggregate, select, Field, GroupKey, GroupQuery, GroupRow, Metric, Predicate};
pub use mix::{price_mix, PriceMix};
pub use rank::{best_by_group, top_restaurants, RankField};
pub use stats::{column_stats, describe, ColumnStats};

/// Headline metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub restaurants: usize,
    pub countries: usize,
    pub cities: usize,
    pub total_votes: i64,
    pub cuisines: usize,
}

pub fn overview(rows: &[&Restaurant]) -> Overview {
    let restaurants: HashSet<i64> = rows.iter().map(|r| r.restaurant_id).collect();
    let countries: HashSet<&str> = rows.iter().map(|r| r.country.as_str()).collect();
    let cities: HashSet<&str> = rows.iter().map(|r| r.city.as_str()).collect();
    let cuisines: HashSet<&str> = rows.iter().map(|r| r.cuisines.as_str()).collect();

    Overview {
        restaurants: restaurants.len(),
        countries: countries.len(),
        cities: cities.len(),
        total_votes: rows.iter().map(|r| r.votes).sum(),
        cuisines: cuisines.len(),
    }
}
