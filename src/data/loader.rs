use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use super::classify::infer_column;
use super::error::{DashboardError, DataResult};
use super::model::Dataset;

/// Field spellings read as missing values (the pandas `read_csv` defaults).
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read and parse a CSV file from disk.
pub fn load_file(path: &Path) -> DataResult<Dataset> {
    let raw = std::fs::read(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load(&raw)
}

/// Parse comma-separated text with a header row into a typed [`Dataset`].
///
/// * Empty fields and the usual NA spellings (see [`NA_TOKENS`]) are missing.
/// * Every record must have as many fields as the header.
/// * Blank lines are skipped.
///
/// Column types are inferred after the whole input has been read.
pub fn load(raw: &[u8]) -> DataResult<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(raw);

    let headers = normalize_headers(reader.headers()?);
    if headers.is_empty() {
        return Err(DashboardError::parse("no columns to parse from input"));
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        for (column, field) in cells.iter_mut().zip(record.iter()) {
            column.push(if is_missing(field) {
                None
            } else {
                Some(field.to_string())
            });
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| infer_column(name, values))
        .collect();
    let dataset = Dataset::new(columns)?;

    log::debug!(
        "parsed {} rows x {} columns",
        dataset.len(),
        dataset.column_count()
    );
    Ok(dataset)
}

pub fn is_missing(field: &str) -> bool {
    NA_TOKENS.contains(&field)
}

// ---------------------------------------------------------------------------
// Header normalisation
// ---------------------------------------------------------------------------

/// Strip a leading BOM, name blank headers `Unnamed: {i}` and suffix
/// repeated names with `.1`, `.2`, ...
fn normalize_headers(raw: &StringRecord) -> Vec<String> {
    // A lone empty header means an empty input, not one unnamed column.
    if raw.len() == 1 && raw.get(0).is_some_and(|h| h.trim_start_matches('\u{feff}').is_empty()) {
        return Vec::new();
    }

    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for (i, header) in raw.iter().enumerate() {
        let header = if i == 0 {
            header.trim_start_matches('\u{feff}')
        } else {
            header
        };
        let base = if header.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            header.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 0;
        while names.contains(&name) {
            suffix += 1;
            name = format!("{base}.{suffix}");
        }
        names.push(name);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, ColumnKind};

    #[test]
    fn loads_typed_columns() {
        let ds = load(b"building_type,kwh,hour\nOffice,120,1\nOffice,140,2\nResidential,30,1\n")
            .unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.column_names().collect::<Vec<_>>(),
            vec!["building_type", "kwh", "hour"]
        );
        assert_eq!(
            ds.column("building_type").unwrap().kind(),
            ColumnKind::Categorical
        );
        assert_eq!(ds.column("kwh").unwrap().kind(), ColumnKind::Numeric);
        assert_eq!(ds.column("kwh").unwrap().cell(2), CellValue::Integer(30));
    }

    #[test]
    fn empty_fields_and_na_tokens_are_missing() {
        let ds = load(b"zone,kwh\nA,\nNA,5.5\n,n/a\n").unwrap();
        let zone = ds.column("zone").unwrap();
        let kwh = ds.column("kwh").unwrap();
        assert_eq!(zone.kind(), ColumnKind::Categorical);
        assert_eq!(zone.text_values().unwrap(), &[Some("A".to_string()), None, None]);
        assert_eq!(kwh.numeric_values().unwrap(), &[None, Some(5.5), None]);
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let ds = load(b"site,kwh\n\"Lab, East\",3\n").unwrap();
        assert_eq!(ds.column("site").unwrap().cell(0), CellValue::Text("Lab, East"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let ds = load(b"a,b\n1,2\n\n3,4\n").unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn header_only_input_has_zero_rows() {
        let ds = load(b"a,b\n").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.column_count(), 2);
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        assert!(matches!(load(b""), Err(DashboardError::Parse { .. })));
        assert!(matches!(load(b"\n\n"), Err(DashboardError::Parse { .. })));
    }

    #[test]
    fn ragged_rows_are_a_parse_error() {
        let err = load(b"a,b\n1,2\n3\n").unwrap_err();
        match err {
            DashboardError::Parse { message } => assert!(message.contains("expected 2 fields")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let err = load(b"a,b\n1,\xff\xfe\n").unwrap_err();
        assert!(matches!(err, DashboardError::Parse { .. }));
    }

    #[test]
    fn headers_are_normalized() {
        let ds = load("\u{feff}kwh,,kwh,kwh\n1,2,3,4\n".as_bytes()).unwrap();
        assert_eq!(
            ds.column_names().collect::<Vec<_>>(),
            vec!["kwh", "Unnamed: 1", "kwh.1", "kwh.2"]
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::Io { .. }));
    }
}
