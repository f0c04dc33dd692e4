use tracing::debug;

use super::table::Table;
use crate::error::{PipelineError, Result};
use crate::lookup::{parse_integral, CodeTables, PricePolicy};
use crate::schema::{COLOR_NAME, COUNTRY, COUNTRY_CODE, PRICE_RANGE, PRICE_TYPE, RATING_COLOR};

const STAGE: &str = "resolver";

/// Translates country codes, rating colors and price ranges into labels.
///
/// Unknown country or color codes abort the run; they are never defaulted.
#[derive(Debug, Clone, Default)]
pub struct CodeResolver {
    tables: CodeTables,
    price_policy: PricePolicy,
}

impl CodeResolver {
    pub fn new(tables: CodeTables, price_policy: PricePolicy) -> Self {
        Self {
            tables,
            price_policy,
        }
    }

    pub fn tables(&self) -> &CodeTables {
        &self.tables
    }

    pub fn price_policy(&self) -> PricePolicy {
        self.price_policy
    }

    pub fn resolve(&self, table: Table) -> Result<Table> {
        let table = table.derive(STAGE, COUNTRY_CODE, COUNTRY, |code, line| {
            self.country_name(code, line).map(str::to_string)
        })?;

        let table = table.derive(STAGE, RATING_COLOR, COLOR_NAME, |hex, line| {
            self.color_name(hex, line).map(str::to_string)
        })?;

        let table = table.derive(STAGE, PRICE_RANGE, PRICE_TYPE, |raw, _| {
            Ok(self.price_policy.tier_for(raw).to_string())
        })?;

        debug!(rows = table.len(), "Resolved codes");
        Ok(table)
    }

    pub fn country_name(&self, code: &str, line: u64) -> Result<&str> {
        parse_integral(code)
            .and_then(|c| self.tables.country(c))
            .ok_or_else(|| PipelineError::UnknownCode {
                table: "country",
                code: code.to_string(),
                line,
            })
    }

    pub fn color_name(&self, hex: &str, line: u64) -> Result<&str> {
        self.tables
            .color(hex)
            .ok_or_else(|| PipelineError::UnknownCode {
                table: "rating color",
                code: hex.to_string(),
                line,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::table::Row;
    use std::collections::BTreeMap;

    fn table(rows: &[[&str; 3]]) -> Table {
        Table::new(
            vec![COUNTRY_CODE.into(), RATING_COLOR.into(), PRICE_RANGE.into()],
            rows.iter()
                .enumerate()
                .map(|(i, r)| Row {
                    line: i as u64 + 2,
                    values: r.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_resolves_all_three_codes() {
        let resolver = CodeResolver::default();
        let out = resolver
            .resolve(table(&[["1", "3F7E00", "1"], ["216", "CBCBC8", "4"]]))
            .unwrap();

        let country = out.column_index(COUNTRY).unwrap();
        let color = out.column_index(COLOR_NAME).unwrap();
        let price = out.column_index(PRICE_TYPE).unwrap();

        assert_eq!(out.rows[0].values[country], "India");
        assert_eq!(out.rows[0].values[color], "darkgreen");
        assert_eq!(out.rows[0].values[price], "cheap");
        assert_eq!(out.rows[1].values[country], "United States of America");
        assert_eq!(out.rows[1].values[color], "darkred");
        assert_eq!(out.rows[1].values[price], "gourmet");

        // source code columns are still there
        assert!(out.column_index(COUNTRY_CODE).is_some());
        assert!(out.column_index(PRICE_RANGE).is_some());
    }

    #[test]
    fn test_unknown_country_code() {
        let err = CodeResolver::default()
            .resolve(table(&[["1", "3F7E00", "1"], ["999", "3F7E00", "1"]]))
            .unwrap_err();

        match err {
            PipelineError::UnknownCode { table, code, line } => {
                assert_eq!(table, "country");
                assert_eq!(code, "999");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_color_code() {
        let err = CodeResolver::default()
            .resolve(table(&[["1", "000000", "1"]]))
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnknownCode { table: "rating color", .. }));
    }

    #[test]
    fn test_injected_tables() {
        let countries = BTreeMap::from([(999, "Atlantis".to_string())]);
        let tables = CodeTables::default().with_countries(countries);
        let resolver = CodeResolver::new(tables, PricePolicy::default());

        let out = resolver.resolve(table(&[["999", "5BA829", "2"]])).unwrap();
        assert_eq!(out.rows[0].values[3], "Atlantis");
        assert_eq!(out.rows[0].values[4], "green");
        assert_eq!(out.rows[0].values[5], "normal");

        assert!(resolver.resolve(table(&[["1", "5BA829", "2"]])).is_err());
    }
}
