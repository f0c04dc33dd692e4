use anyhow::{Context, Result};
use restaurant_prep::{
    analysis::{
        best_by_group, describe, group_aggregate, overview, price_mix, select, top_restaurants,
        GroupQuery,
    },
    cli::{Cli, Commands, FilterArgs},
    config::{delimiter_byte, Settings},
    logging::init_logging,
    lookup::PriceType,
    parser::Restaurant,
    pipeline::{Pipeline, PreparedDataset},
    schema::RESTAURANTS,
    ui::LogUi,
    writer::{write_sqlite, EXPORT_DELIMITER, SINK_DELIMITER},
};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())
        .with_context(|| format!("Failed to load configuration {:?}", cli.config))?;
    let pipeline = Pipeline::from_settings(&settings)?;
    let mut ui = LogUi::new();

    match cli.command {
        Commands::Prepare {
            input,
            output,
            delimiter,
            sqlite,
        } => {
            let start = Instant::now();

            let output = match output {
                Some(p) => p,
                None => settings.output_path()?,
            };
            let delimiter = match delimiter {
                Some(c) => delimiter_byte(c)?,
                None => settings.delimiter()?.unwrap_or(SINK_DELIMITER),
            };

            let dataset = pipeline
                .run(&input, &output, delimiter, &mut ui)
                .with_context(|| format!("Failed to prepare {:?}", input))?;

            if let Some(db) = sqlite {
                let count = write_sqlite(&db, dataset.restaurants(), &mut ui)
                    .with_context(|| format!("Failed to write {:?}", db))?;
                println!("Wrote {} rows to {:?}", count, db);
            }

            println!(
                "\nCreated {:?} ({}) in {:.1}s",
                output,
                dataset.report,
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Export { input, output } => {
            let dataset = pipeline
                .run(&input, &output, EXPORT_DELIMITER, &mut ui)
                .with_context(|| format!("Failed to export {:?}", input))?;
            println!("Exported {} rows to {:?}", dataset.report.output_rows, output);
        }

        Commands::Overview {
            input,
            filters,
            json,
        } => {
            let dataset = prepare(&pipeline, &input, &mut ui)?;
            let rows = filtered(&dataset, &filters)?;
            let o = overview(&rows);
            if json {
                print_json(&o)?;
            } else {
                println!("Restaurants: {}", o.restaurants);
                println!("Countries:   {}", o.countries);
                println!("Cities:      {}", o.cities);
                println!("Votes:       {}", o.total_votes);
                println!("Cuisines:    {}", o.cuisines);
            }
        }

        Commands::Query {
            input,
            group_by,
            metric,
            predicates,
            ascending,
            top,
            filters,
            json,
        } => {
            let dataset = prepare(&pipeline, &input, &mut ui)?;
            let rows = filtered(&dataset, &filters)?;

            let mut query = GroupQuery::new(group_by, metric)
                .ascending(ascending)
                .top(top);
            query.predicates = predicates.predicates();

            let out = group_aggregate(&rows, &query);
            if json {
                print_json(&out)?;
            } else {
                println!("{:<32} {}", group_by, metric);
                for row in &out {
                    println!("{:<32} {}", row.group, format_value(row.value));
                }
            }
        }

        Commands::Top {
            input,
            by,
            ascending,
            top,
            per,
            predicates,
            filters,
            json,
        } => {
            let dataset = prepare(&pipeline, &input, &mut ui)?;
            let rows = filtered(&dataset, &filters)?;
            let rows = select(&rows, &predicates.predicates());

            if let Some(key) = per {
                let best = best_by_group(&rows, key);
                if json {
                    print_json(&best)?;
                } else {
                    for (group, r) in &best {
                        println!("{:<32} {}", group, describe_restaurant(r));
                    }
                }
            } else {
                let ranked = top_restaurants(&rows, by, ascending, Some(top));
                if json {
                    print_json(&ranked)?;
                } else {
                    for r in ranked {
                        println!("{}", describe_restaurant(r));
                    }
                }
            }
        }

        Commands::PriceMix {
            input,
            by,
            filters,
            json,
        } => {
            let dataset = prepare(&pipeline, &input, &mut ui)?;
            let rows = filtered(&dataset, &filters)?;
            let mix = price_mix(&rows, by);
            if json {
                print_json(&mix)?;
            } else {
                print!("{:<32}", by);
                for tier in PriceType::ALL {
                    print!(" {:>10}", tier);
                }
                println!();
                for m in &mix {
                    print!("{:<32}", m.group);
                    for tier in PriceType::ALL {
                        print!(" {:>9.2}%", m.share(tier));
                    }
                    println!();
                }
            }
        }

        Commands::Describe {
            input,
            filters,
            json,
        } => {
            let dataset = prepare(&pipeline, &input, &mut ui)?;
            let rows = filtered(&dataset, &filters)?;
            let stats = describe(&rows);
            if json {
                print_json(&stats)?;
            } else {
                println!(
                    "{:<22} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8}",
                    "column", "min", "max", "range", "mean", "median", "std", "skew", "kurtosis"
                );
                let opt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));
                for s in &stats {
                    println!(
                        "{:<22} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>8} {:>8}",
                        s.column,
                        s.min,
                        s.max,
                        s.range,
                        s.mean,
                        s.median,
                        s.std,
                        opt(s.skew),
                        opt(s.kurtosis)
                    );
                }
            }
        }

        Commands::Lookups => {
            let tables = pipeline.resolver().tables();
            println!("Countries:\n");
            for (code, name) in tables.countries() {
                println!("  {:>4}  {}", code, name);
            }
            println!("\nRating colors:\n");
            for (hex, name) in tables.colors() {
                println!("  {}  {}", hex, name);
            }
            println!(
                "\nPrice ranges: 1 cheap, 2 normal, 3 expensive, other {}",
                pipeline.resolver().price_policy().unmatched
            );
        }

        Commands::Columns => {
            println!("Output columns:\n");
            for column in RESTAURANTS.columns {
                println!("  {:<24} {}", column.name, column.col_type.sql_type());
            }
        }
    }

    Ok(())
}

fn prepare(pipeline: &Pipeline, input: &Path, ui: &mut LogUi) -> Result<PreparedDataset> {
    pipeline
        .prepare(input, ui)
        .with_context(|| format!("Failed to prepare {:?}", input))
}

fn filtered<'a>(dataset: &'a PreparedDataset, filters: &FilterArgs) -> Result<Vec<&'a Restaurant>> {
    let filter = filters.resolve()?;
    Ok(filter.apply(dataset.restaurants()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn describe_restaurant(r: &Restaurant) -> String {
    format!(
        "{:>10}  {:<40} {:<24} {:.1} ({} votes, {} {})",
        r.restaurant_id,
        r.restaurant_name,
        r.city,
        r.aggregate_rating,
        r.votes,
        r.average_cost_for_two,
        r.currency
    )
}
