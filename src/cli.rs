use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::analysis::{GroupKey, Metric, Predicate, RankField};
use crate::error::Result;
use crate::filter::{resolve_filter, RestaurantFilter};

#[derive(Parser, Debug)]
#[command(name = "restaurant-prep")]
#[command(version, about = "Clean a restaurant marketplace dataset and query it")]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Membership filters shared by the report commands
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only these countries (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub country: Option<Vec<String>>,

    /// Only these cities (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub city: Option<Vec<String>>,

    /// Only these price types (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub price_type: Option<Vec<String>>,
}

impl FilterArgs {
    pub fn resolve(&self) -> Result<RestaurantFilter> {
        resolve_filter(
            self.country.clone(),
            self.city.clone(),
            self.price_type.clone(),
        )
    }
}

/// Row conditions applied before grouping or ranking
#[derive(Args, Debug, Clone, Default)]
pub struct PredicateArgs {
    /// Keep rows rated at least this
    #[arg(long)]
    pub min_rating: Option<f64>,

    /// Keep rows rated strictly below this
    #[arg(long)]
    pub below_rating: Option<f64>,

    /// Keep restaurants with online delivery
    #[arg(long)]
    pub online_delivery: bool,

    /// Keep restaurants taking table bookings
    #[arg(long)]
    pub table_booking: bool,

    /// Keep restaurants delivering now
    #[arg(long)]
    pub delivering_now: bool,

    /// Keep one cuisine
    #[arg(long)]
    pub cuisine: Option<String>,
}

impl PredicateArgs {
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        if let Some(min) = self.min_rating {
            out.push(Predicate::RatingAtLeast(min));
        }
        if let Some(max) = self.below_rating {
            out.push(Predicate::RatingBelow(max));
        }
        if self.online_delivery {
            out.push(Predicate::OnlineDelivery);
        }
        if self.table_booking {
            out.push(Predicate::TableBooking);
        }
        if self.delivering_now {
            out.push(Predicate::DeliveringNow);
        }
        if let Some(c) = &self.cuisine {
            out.push(Predicate::Cuisine(c.clone()));
        }
        out
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean the source file and write the processed dataset
    Prepare {
        /// Raw source CSV
        input: PathBuf,

        /// Output path (defaults to the configured or data directory path)
        output: Option<PathBuf>,

        /// Output delimiter
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Also write the table into this SQLite database
        #[arg(long)]
        sqlite: Option<PathBuf>,
    },

    /// Clean the source file and write the `;`-separated export
    Export {
        input: PathBuf,
        output: PathBuf,
    },

    /// Headline counts
    Overview {
        input: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Grouped aggregate, e.g. `--group-by city --metric nunique:restaurant_id`
    Query {
        input: PathBuf,

        /// country, city, cuisines, price_type or a flag column
        #[arg(short, long)]
        group_by: GroupKey,

        /// count, nunique:<field>, mean:<field> or sum:<field>
        #[arg(short, long, default_value = "count")]
        metric: Metric,

        #[command(flatten)]
        predicates: PredicateArgs,

        /// Sort ascending instead of descending
        #[arg(long)]
        ascending: bool,

        /// Keep the first N groups
        #[arg(short, long)]
        top: Option<usize>,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long)]
        json: bool,
    },

    /// Ranked restaurants
    Top {
        input: PathBuf,

        /// votes, aggregate_rating or average_cost_for_two
        #[arg(short, long, default_value = "aggregate_rating")]
        by: RankField,

        #[arg(long)]
        ascending: bool,

        #[arg(short, long, default_value_t = 10)]
        top: usize,

        /// Best rated restaurant per group instead of a single ranking
        #[arg(long)]
        per: Option<GroupKey>,

        #[command(flatten)]
        predicates: PredicateArgs,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long)]
        json: bool,
    },

    /// Percentage of each price type per group
    PriceMix {
        input: PathBuf,

        #[arg(short, long, default_value = "cuisines")]
        by: GroupKey,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long)]
        json: bool,
    },

    /// Statistics of the numeric columns
    Describe {
        input: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long)]
        json: bool,
    },

    /// Print the country and rating-color tables
    Lookups,

    /// Print the output columns
    Columns,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Field;

    #[test]
    fn test_query_args() {
        let cli = Cli::try_parse_from([
            "restaurant-prep",
            "query",
            "data.csv",
            "--group-by",
            "city",
            "--metric",
            "mean:aggregate_rating",
            "--min-rating",
            "4",
            "--country",
            "India,Brazil",
            "--top",
            "10",
        ])
        .unwrap();

        match cli.command {
            Commands::Query {
                group_by,
                metric,
                predicates,
                top,
                filters,
                ..
            } => {
                assert_eq!(group_by, GroupKey::City);
                assert_eq!(metric, Metric::Mean(Field::AggregateRating));
                assert_eq!(predicates.predicates(), vec![Predicate::RatingAtLeast(4.0)]);
                assert_eq!(top, Some(10));
                assert_eq!(
                    filters.country,
                    Some(vec!["India".to_string(), "Brazil".to_string()])
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["restaurant-prep", "columns", "-v", "--config", "a.toml"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
    }

    #[test]
    fn test_bad_metric_rejected() {
        let result = Cli::try_parse_from([
            "restaurant-prep",
            "query",
            "data.csv",
            "--group-by",
            "city",
            "--metric",
            "mean:city",
        ]);
        assert!(result.is_err());
    }
}
