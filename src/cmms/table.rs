use std::io::Read;

use super::mapping::ColumnAliases;
use super::CmmsImportError;

/// Named-column string table decoded from a CMMS export. Cell typing is
/// deferred to the calculators, which parse the columns they need.
#[derive(Debug, Clone, PartialEq)]
pub struct CmmsTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CmmsTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CmmsImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = csv_reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { columns, rows })
    }

    /// Rename vendor headers to their canonical names.
    pub fn with_aliases(mut self, aliases: &ColumnAliases) -> Self {
        for column in &mut self.columns {
            if let Some(canonical) = aliases.resolve(column) {
                *column = canonical.to_string();
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Values of one column in row order, padding short rows with "".
    pub fn column_values(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }
}
