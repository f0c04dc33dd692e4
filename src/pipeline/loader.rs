use csv::{ReaderBuilder, Trim};
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

use super::table::{RawRow, RawTable};
use crate::error::{PipelineError, Result};

/// Cell values read as missing, matching what a dataframe library treats as NA
pub const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Read a comma-separated source file into memory
pub fn load_csv(path: &Path) -> Result<RawTable> {
    let not_found = |source| PipelineError::SourceNotFound {
        path: path.to_path_buf(),
        source,
    };

    let meta = fs::metadata(path).map_err(not_found)?;
    if !meta.is_file() {
        return Err(not_found(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    let file = File::open(path).map_err(not_found)?;

    let table = load_from_reader(BufReader::new(file))?;
    debug!(path = ?path, rows = table.rows.len(), "Loaded source");
    Ok(table)
}

/// Read raw rows from any reader.
///
/// Short rows are padded with nulls. Cells beyond the header width are dropped
/// with a warning.
pub fn load_from_reader<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let width = headers.len();
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() > width {
            warn!(
                line,
                cells = record.len(),
                expected = width,
                "Dropping cells beyond the header"
            );
        }

        let mut values: Vec<Option<String>> = record
            .iter()
            .take(width)
            .map(|cell| {
                if is_null(cell) {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();
        values.resize(width, None);

        rows.push(RawRow { line, values });
    }

    Ok(RawTable { headers, rows })
}

fn is_null(cell: &str) -> bool {
    NULL_MARKERS.contains(&cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_marks_nulls_and_pads() {
        let data = "Restaurant ID,Address,Votes\n1,Main St,10\n2,,NaN\n3\n";
        let table = load_from_reader(data.as_bytes()).unwrap();

        assert_eq!(table.headers, vec!["Restaurant ID", "Address", "Votes"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(
            table.rows[0].values,
            vec![Some("1".into()), Some("Main St".into()), Some("10".into())]
        );
        assert_eq!(table.rows[1].values, vec![Some("2".into()), None, None]);
        assert_eq!(table.rows[2].values, vec![Some("3".into()), None, None]);
        assert_eq!(table.rows[0].line, 2);
    }

    #[test]
    fn test_quoted_commas_stay_in_cell() {
        let data = "Cuisines\n\"Chinese, Thai\"\n";
        let table = load_from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.rows[0].values, vec![Some("Chinese, Thai".into())]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::SourceNotFound { .. }));
        assert_eq!(err.stage(), "loader");
    }

    #[test]
    fn test_directory_is_not_a_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_csv(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::SourceNotFound { ref path, .. } if path == dir.path()));
        assert_eq!(err.stage(), "loader");
    }

    #[test]
    fn test_extra_cells_are_dropped() {
        let data = "A,B\n1,2,3,4\n5,6\n";
        let table = load_from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.rows[0].values, vec![Some("1".into()), Some("2".into())]);
        assert_eq!(table.rows[1].values, vec![Some("5".into()), Some("6".into())]);
        assert_eq!(table.rows[1].line, 3);
    }
}
