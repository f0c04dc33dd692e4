use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{PipelineError, Result};
use crate::parser::Restaurant;

/// Column a table can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Country,
    City,
    Cuisines,
    PriceType,
    HasOnlineDelivery,
    HasTableBooking,
    IsDeliveringNow,
}

impl GroupKey {
    pub const ALL: [GroupKey; 7] = [
        GroupKey::Country,
        GroupKey::City,
        GroupKey::Cuisines,
        GroupKey::PriceType,
        GroupKey::HasOnlineDelivery,
        GroupKey::HasTableBooking,
        GroupKey::IsDeliveringNow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GroupKey::Country => "country",
            GroupKey::City => "city",
            GroupKey::Cuisines => "cuisines",
            GroupKey::PriceType => "price_type",
            GroupKey::HasOnlineDelivery => "has_online_delivery",
            GroupKey::HasTableBooking => "has_table_booking",
            GroupKey::IsDeliveringNow => "is_delivering_now",
        }
    }

    /// Group label of a row; flags are labelled `0`/`1` as in the output file
    pub fn label(&self, r: &Restaurant) -> String {
        let flag = |b: bool| u8::from(b).to_string();
        match self {
            GroupKey::Country => r.country.clone(),
            GroupKey::City => r.city.clone(),
            GroupKey::Cuisines => r.cuisines.clone(),
            GroupKey::PriceType => r.price_type.to_string(),
            GroupKey::HasOnlineDelivery => flag(r.has_online_delivery),
            GroupKey::HasTableBooking => flag(r.has_table_booking),
            GroupKey::IsDeliveringNow => flag(r.is_delivering_now),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for GroupKey {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| PipelineError::Query(format!("Unknown group key: {}", s)))
    }
}

/// Column a metric is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    RestaurantId,
    Country,
    City,
    Cuisines,
    Votes,
    AggregateRating,
    AverageCostForTwo,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::RestaurantId => "restaurant_id",
            Field::Country => "country",
            Field::City => "city",
            Field::Cuisines => "cuisines",
            Field::Votes => "votes",
            Field::AggregateRating => "aggregate_rating",
            Field::AverageCostForTwo => "average_cost_for_two",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Field::Votes | Field::AggregateRating | Field::AverageCostForTwo
        )
    }

    fn number(&self, r: &Restaurant) -> f64 {
        match self {
            Field::RestaurantId => r.restaurant_id as f64,
            Field::Votes => r.votes as f64,
            Field::AggregateRating => r.aggregate_rating,
            Field::AverageCostForTwo => r.average_cost_for_two,
            Field::Country | Field::City | Field::Cuisines => f64::NAN,
        }
    }

    fn text<'a>(&self, r: &'a Restaurant) -> std::borrow::Cow<'a, str> {
        match self {
            Field::Country => r.country.as_str().into(),
            Field::City => r.city.as_str().into(),
            Field::Cuisines => r.cuisines.as_str().into(),
            Field::RestaurantId => r.restaurant_id.to_string().into(),
            Field::Votes => r.votes.to_string().into(),
            Field::AggregateRating => r.aggregate_rating.to_string().into(),
            Field::AverageCostForTwo => r.average_cost_for_two.to_string().into(),
        }
    }
}

impl FromStr for Field {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "restaurant_id" => Ok(Field::RestaurantId),
            "country" => Ok(Field::Country),
            "city" => Ok(Field::City),
            "cuisines" => Ok(Field::Cuisines),
            "votes" => Ok(Field::Votes),
            "aggregate_rating" => Ok(Field::AggregateRating),
            "average_cost_for_two" => Ok(Field::AverageCostForTwo),
            other => Err(PipelineError::Query(format!("Unknown field: {}", other))),
        }
    }
}

/// Aggregate computed per group
///
/// Parsed from `count`, `nunique:<field>`, `mean:<field>` or `sum:<field>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Count,
    NUnique(Field),
    Mean(Field),
    Sum(Field),
}

impl Metric {
    fn compute(&self, rows: &[&Restaurant]) -> f64 {
        match self {
            Metric::Count => rows.len() as f64,
            Metric::NUnique(field) => {
                let distinct: HashSet<_> = rows.iter().map(|r| field.text(r)).collect();
                distinct.len() as f64
            }
            Metric::Mean(field) => {
                let sum: f64 = rows.iter().map(|r| field.number(r)).sum();
                sum / rows.len() as f64
            }
            Metric::Sum(field) => rows.iter().map(|r| field.number(r)).sum(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Count => write!(f, "count"),
            Metric::NUnique(field) => write!(f, "nunique:{}", field.name()),
            Metric::Mean(field) => write!(f, "mean:{}", field.name()),
            Metric::Sum(field) => write!(f, "sum:{}", field.name()),
        }
    }
}

impl FromStr for Metric {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (op, field) = match s.split_once(':') {
            Some((op, field)) => (op, Some(field.parse::<Field>()?)),
            None => (s, None),
        };

        let numeric = |field: Option<Field>| match field {
            Some(f) if f.is_numeric() => Ok(f),
            Some(f) => Err(PipelineError::Query(format!(
                "{} needs a numeric field, got {}",
                op,
                f.name()
            ))),
            None => Err(PipelineError::Query(format!("{} needs a field", op))),
        };

        match op {
            "count" if field.is_none() => Ok(Metric::Count),
            "nunique" => field
                .map(Metric::NUnique)
                .ok_or_else(|| PipelineError::Query("nunique needs a field".to_string())),
            "mean" => numeric(field).map(Metric::Mean),
            "sum" => numeric(field).map(Metric::Sum),
            _ => Err(PipelineError::Query(format!("Unknown metric: {}", s))),
        }
    }
}

/// Row-level condition applied before grouping
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    RatingAtLeast(f64),
    RatingBelow(f64),
    OnlineDelivery,
    TableBooking,
    DeliveringNow,
    Cuisine(String),
}

impl Predicate {
    pub fn matches(&self, r: &Restaurant) -> bool {
        match self {
            Predicate::RatingAtLeast(min) => r.aggregate_rating >= *min,
            Predicate::RatingBelow(max) => r.aggregate_rating < *max,
            Predicate::OnlineDelivery => r.has_online_delivery,
            Predicate::TableBooking => r.has_table_booking,
            Predicate::DeliveringNow => r.is_delivering_now,
            Predicate::Cuisine(c) => r.cuisines == *c,
        }
    }
}

/// Rows passing every predicate
pub fn select<'a>(rows: &[&'a Restaurant], predicates: &[Predicate]) -> Vec<&'a Restaurant> {
    rows.iter()
        .copied()
        .filter(|r| predicates.iter().all(|p| p.matches(r)))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupQuery {
    pub key: GroupKey,
    pub metric: Metric,
    pub predicates: Vec<Predicate>,
    pub ascending: bool,
    pub top: Option<usize>,
}

impl GroupQuery {
    pub fn new(key: GroupKey, metric: Metric) -> Self {
        Self {
            key,
            metric,
            predicates: Vec::new(),
            ascending: false,
            top: None,
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    pub fn top(mut self, top: Option<usize>) -> Self {
        self.top = top;
        self
    }
}

/// One output row of a grouped aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub group: String,
    pub value: f64,
    /// Rows that fell into the group
    pub rows: usize,
}

/// Group `rows` by the query key and compute its metric per group.
///
/// Sorted by value (descending unless `ascending`), ties by group label.
pub fn group_aggregate(rows: &[&Restaurant], query: &GroupQuery) -> Vec<GroupRow> {
    let mut groups: BTreeMap<String, Vec<&Restaurant>> = BTreeMap::new();
    for r in select(rows, &query.predicates) {
        groups.entry(query.key.label(r)).or_default().push(r);
    }

    let mut out: Vec<GroupRow> = groups
        .into_iter()
        .map(|(group, members)| GroupRow {
            value: query.metric.compute(&members),
            rows: members.len(),
            group,
        })
        .collect();

    out.sort_by(|a, b| {
        let by_value = if query.ascending {
            a.value.total_cmp(&b.value)
        } else {
            b.value.total_cmp(&a.value)
        };
        match by_value {
            Ordering::Equal => a.group.cmp(&b.group),
            other => other,
        }
    });

    if let Some(n) = query.top {
        out.truncate(n);
    }
    out
}
