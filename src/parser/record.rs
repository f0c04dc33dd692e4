use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::lookup::{parse_integral, PriceType};
use crate::schema::{ColumnType, RESTAURANTS};

/// One cleaned restaurant. Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub country: String,
    pub city: String,
    pub address: String,
    pub locality: String,
    pub locality_verbose: String,
    pub longitude: f64,
    pub latitude: f64,
    pub cuisines: String,
    pub price_type: PriceType,
    pub average_cost_for_two: f64,
    pub currency: String,
    #[serde(with = "flag")]
    pub has_table_booking: bool,
    #[serde(with = "flag")]
    pub has_online_delivery: bool,
    #[serde(with = "flag")]
    pub is_delivering_now: bool,
    pub aggregate_rating: f64,
    pub rating_color: String,
    pub color_name: String,
    pub rating_text: String,
    pub votes: i64,
}

/// A typed cell ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }
}

impl Restaurant {
    /// Build a record from the 21 canonical cells, in canonical order.
    pub fn from_cells(cells: &[&str], line: u64) -> Result<Self> {
        let [restaurant_id, restaurant_name, country, city, address, locality, locality_verbose, longitude, latitude, cuisines, price_type, average_cost_for_two, currency, has_table_booking, has_online_delivery, is_delivering_now, aggregate_rating, rating_color, color_name, rating_text, votes] =
            cells
        else {
            return Err(PipelineError::InvalidValue {
                column: "*",
                value: cells.len().to_string(),
                line,
                reason: format!("expected {} cells", RESTAURANTS.columns.len()),
            });
        };

        Ok(Self {
            restaurant_id: integer("restaurant_id", restaurant_id, line)?,
            restaurant_name: restaurant_name.to_string(),
            country: country.to_string(),
            city: city.to_string(),
            address: address.to_string(),
            locality: locality.to_string(),
            locality_verbose: locality_verbose.to_string(),
            longitude: real("longitude", longitude, line)?,
            latitude: real("latitude", latitude, line)?,
            cuisines: cuisines.to_string(),
            price_type: price_type.parse().map_err(|_| PipelineError::InvalidValue {
                column: "price_type",
                value: price_type.to_string(),
                line,
                reason: "not a price tier".to_string(),
            })?,
            average_cost_for_two: real("average_cost_for_two", average_cost_for_two, line)?,
            currency: currency.to_string(),
            has_table_booking: flag_value("has_table_booking", has_table_booking, line)?,
            has_online_delivery: flag_value("has_online_delivery", has_online_delivery, line)?,
            is_delivering_now: flag_value("is_delivering_now", is_delivering_now, line)?,
            aggregate_rating: rating(aggregate_rating, line)?,
            rating_color: rating_color.to_string(),
            color_name: color_name.to_string(),
            rating_text: rating_text.to_string(),
            votes: integer("votes", votes, line)?,
        })
    }

    /// Cell values in canonical column order
    pub fn sql_values(&self) -> Vec<SqlValue> {
        let flag = |b: bool| SqlValue::Integer(i64::from(b));
        let text = |s: &str| SqlValue::Text(s.to_string());

        vec![
            SqlValue::Integer(self.restaurant_id),
            text(&self.restaurant_name),
            text(&self.country),
            text(&self.city),
            text(&self.address),
            text(&self.locality),
            text(&self.locality_verbose),
            SqlValue::Real(self.longitude),
            SqlValue::Real(self.latitude),
            text(&self.cuisines),
            text(self.price_type.as_str()),
            SqlValue::Real(self.average_cost_for_two),
            text(&self.currency),
            flag(self.has_table_booking),
            flag(self.has_online_delivery),
            flag(self.is_delivering_now),
            SqlValue::Real(self.aggregate_rating),
            text(&self.rating_color),
            text(&self.color_name),
            text(&self.rating_text),
            SqlValue::Integer(self.votes),
        ]
    }

    /// Value of a numeric column, for statistics
    pub fn numeric(&self, column: &str) -> Option<f64> {
        let col = RESTAURANTS.column(column)?;
        if !col.col_type.is_numeric() {
            return None;
        }
        let value = match column {
            "restaurant_id" => self.restaurant_id as f64,
            "longitude" => self.longitude,
            "latitude" => self.latitude,
            "average_cost_for_two" => self.average_cost_for_two,
            "has_table_booking" => f64::from(u8::from(self.has_table_booking)),
            "has_online_delivery" => f64::from(u8::from(self.has_online_delivery)),
            "is_delivering_now" => f64::from(u8::from(self.is_delivering_now)),
            "aggregate_rating" => self.aggregate_rating,
            "votes" => self.votes as f64,
            _ => return None,
        };
        Some(value)
    }
}

/// Numeric column names in canonical order
pub fn numeric_columns() -> Vec<&'static str> {
    RESTAURANTS
        .columns
        .iter()
        .filter(|c| c.col_type != ColumnType::Text)
        .map(|c| c.name)
        .collect()
}

fn integer(column: &'static str, value: &str, line: u64) -> Result<i64> {
    parse_integral(value).ok_or_else(|| invalid(column, value, line, "not an integer"))
}

fn real(column: &'static str, value: &str, line: u64) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(column, value, line, "not a number")),
    }
}

fn rating(value: &str, line: u64) -> Result<f64> {
    let v = real("aggregate_rating", value, line)?;
    if (0.0..=5.0).contains(&v) {
        Ok(v)
    } else {
        Err(invalid("aggregate_rating", value, line, "outside 0.0 to 5.0"))
    }
}

fn flag_value(column: &'static str, value: &str, line: u64) -> Result<bool> {
    match parse_integral(value) {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => Err(invalid(column, value, line, "expected 0 or 1")),
    }
}

fn invalid(column: &'static str, value: &str, line: u64, reason: &str) -> PipelineError {
    PipelineError::InvalidValue {
        column,
        value: value.to_string(),
        line,
        reason: reason.to_string(),
    }
}

/// Booleans written and read as 0/1
mod flag {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(de::Error::custom(format!("expected 0 or 1, got {}", other))),
        }
    }
}
