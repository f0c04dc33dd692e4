use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use super::group::GroupKey;
use crate::error::{PipelineError, Result};
use crate::parser::Restaurant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankField {
    Votes,
    AggregateRating,
    AverageCostForTwo,
}

impl RankField {
    fn value(&self, r: &Restaurant) -> f64 {
        match self {
            RankField::Votes => r.votes as f64,
            RankField::AggregateRating => r.aggregate_rating,
            RankField::AverageCostForTwo => r.average_cost_for_two,
        }
    }
}

impl FromStr for RankField {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "votes" => Ok(RankField::Votes),
            "aggregate_rating" => Ok(RankField::AggregateRating),
            "average_cost_for_two" => Ok(RankField::AverageCostForTwo),
            other => Err(PipelineError::Query(format!("Cannot rank by {}", other))),
        }
    }
}

/// Restaurants ordered by `field`, ties broken by `restaurant_id` ascending
pub fn top_restaurants<'a>(
    rows: &[&'a Restaurant],
    field: RankField,
    ascending: bool,
    n: Option<usize>,
) -> Vec<&'a Restaurant> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| {
        let by_field = if ascending {
            field.value(a).total_cmp(&field.value(b))
        } else {
            field.value(b).total_cmp(&field.value(a))
        };
        by_field.then(a.restaurant_id.cmp(&b.restaurant_id))
    });
    if let Some(n) = n {
        ranked.truncate(n);
    }
    ranked
}

/// Best rated restaurant of each group, groups in label order
pub fn best_by_group<'a>(rows: &[&'a Restaurant], key: GroupKey) -> Vec<(String, &'a Restaurant)> {
    let mut best: BTreeMap<String, &'a Restaurant> = BTreeMap::new();
    for &r in rows {
        let label = key.label(r);
        let replace = best
            .get(&label)
            .map_or(true, |current| better(current, r) == Ordering::Greater);
        if replace {
            best.insert(label, r);
        }
    }
    best.into_iter().collect()
}

// Greater when `candidate` outranks `current`
fn better(current: &Restaurant, candidate: &Restaurant) -> Ordering {
    candidate
        .aggregate_rating
        .total_cmp(&current.aggregate_rating)
        .then(current.restaurant_id.cmp(&candidate.restaurant_id))
}
