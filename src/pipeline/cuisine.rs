use super::table::Table;
use crate::error::Result;
use crate::schema::CUISINES;

/// Everything before the first comma, untouched otherwise.
pub fn primary_cuisine(cuisines: &str) -> &str {
    cuisines.split(',').next().unwrap_or(cuisines)
}

/// Collapse the multi-value cuisines column to its first listed cuisine
pub fn simplify(table: Table) -> Result<Table> {
    table.derive("simplifier", CUISINES, CUISINES, |value, _| {
        Ok(primary_cuisine(value).to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::pipeline::table::Row;

    #[test]
    fn test_primary_cuisine() {
        assert_eq!(primary_cuisine("Chinese, Thai"), "Chinese");
        assert_eq!(primary_cuisine("Seafood"), "Seafood");
        assert_eq!(primary_cuisine(" Italian ,Pizza"), " Italian ");
        assert_eq!(primary_cuisine(",Thai"), "");
    }

    #[test]
    fn test_simplify_column() {
        let table = Table::new(
            vec!["restaurant_id".into(), CUISINES.into()],
            vec![Row {
                line: 2,
                values: vec!["7".into(), "Japanese, Sushi, Ramen".into()],
            }],
        );
        let out = simplify(table).unwrap();
        assert_eq!(out.rows[0].values, vec!["7", "Japanese"]);
    }

    #[test]
    fn test_simplify_without_cuisines() {
        let table = Table::new(vec!["restaurant_id".into()], Vec::new());
        let err = simplify(table).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { ref column, .. } if column == CUISINES));
        assert_eq!(err.stage(), "simplifier");
    }
}
