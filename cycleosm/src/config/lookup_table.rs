use crate::model::osm::OsmError;
use std::path::Path;

/// a headerless key/value table read from a CSV file. row order is preserved
/// since some tables (the precedence table) encode rank by position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTable {
    pub name: String,
    rows: Vec<(String, String)>,
}

impl LookupTable {
    pub fn from_rows<I, K, V>(name: &str, rows: I) -> LookupTable
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        LookupTable {
            name: String::from(name),
            rows: rows
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// reads a two-column table. rows must have exactly two non-empty columns.
    pub fn read_pairs(filepath: &Path) -> Result<LookupTable, OsmError> {
        let name = filepath.to_string_lossy().to_string();
        let records = read_records(filepath)?;
        let mut rows = Vec::with_capacity(records.len());
        for (idx, record) in records.into_iter().enumerate() {
            match &record[..] {
                [key, value] if !key.is_empty() && !value.is_empty() => {
                    rows.push((key.clone(), value.clone()))
                }
                _ => {
                    return Err(OsmError::ConfigurationError(format!(
                        "table {name} row {idx} is malformed, expected 2 columns, found {record:?}"
                    )))
                }
            }
        }
        let table = LookupTable { name, rows };
        table.non_empty()
    }

    /// reads a single-column list. each row's first column is a key and the
    /// value is left empty.
    pub fn read_list(filepath: &Path) -> Result<LookupTable, OsmError> {
        let name = filepath.to_string_lossy().to_string();
        let records = read_records(filepath)?;
        let mut rows = Vec::with_capacity(records.len());
        for (idx, record) in records.into_iter().enumerate() {
            match record.first() {
                Some(key) if !key.is_empty() => rows.push((key.clone(), String::new())),
                _ => {
                    return Err(OsmError::ConfigurationError(format!(
                        "table {name} row {idx} has an empty entry"
                    )))
                }
            }
        }
        let table = LookupTable { name, rows };
        table.non_empty()
    }

    pub fn rows(&self) -> &[(String, String)] {
        &self.rows
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.rows.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn non_empty(self) -> Result<LookupTable, OsmError> {
        if self.rows.is_empty() {
            Err(OsmError::ConfigurationError(format!(
                "table {} is empty",
                self.name
            )))
        } else {
            Ok(self)
        }
    }
}

/// reads every row of a headerless CSV, trimming whitespace (including the
/// non-breaking spaces spreadsheet exports leave behind) and skipping blank lines.
fn read_records(filepath: &Path) -> Result<Vec<Vec<String>>, OsmError> {
    let name = filepath.to_string_lossy().to_string();
    if !filepath.is_file() {
        return Err(OsmError::ConfigurationError(format!(
            "table {name} does not exist"
        )));
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(filepath)
        .map_err(|e| OsmError::CsvReadError(name.clone(), e))?;
    let mut records = vec![];
    for row in reader.records() {
        let record = row.map_err(|e| OsmError::CsvReadError(name.clone(), e))?;
        let fields = record
            .iter()
            .map(|f| f.replace('\u{a0}', "").trim().to_string())
            .collect::<Vec<_>>();
        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }
        records.push(fields);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::LookupTable;
    use std::io::Write;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_pairs_preserves_order() {
        let file = write_file("shared_lane,Shared Road\nlane,Bike Lane\ntrack,Protected Bike Lane\n");
        let table = LookupTable::read_pairs(file.path()).unwrap();
        let keys = table.keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, vec!["shared_lane", "lane", "track"]);
        assert_eq!(table.rows()[1].1, "Bike Lane");
    }

    #[test]
    fn test_read_pairs_strips_nbsp() {
        let file = write_file("residential\u{a0},1\n");
        let table = LookupTable::read_pairs(file.path()).unwrap();
        assert_eq!(table.rows()[0], (String::from("residential"), String::from("1")));
    }

    #[test]
    fn test_read_pairs_rejects_malformed_row() {
        let file = write_file("residential,1\nprimary\n");
        assert!(LookupTable::read_pairs(file.path()).is_err());
    }

    #[test]
    fn test_read_list() {
        let file = write_file("no\nnone\n\nsidewalk\n");
        let table = LookupTable::read_list(file.path()).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_empty_file_rejected() {
        let file = write_file("");
        assert!(LookupTable::read_list(file.path()).is_err());
        assert!(LookupTable::read_pairs(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_rejected() {
        let result = LookupTable::read_pairs(std::path::Path::new("/no/such/table.csv"));
        assert!(result.is_err());
    }
}
