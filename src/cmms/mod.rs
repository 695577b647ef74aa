//! CMMS export ingestion and reliability metric calculators — the
//! evidence-based "data cruncher" side of an assessment.

mod calculators;
mod mapping;
mod table;

use std::io::Read;
use std::path::Path;

pub use calculators::{
    bad_actors, data_graveyard_index, pm_compliance, reactive_ratio, work_type_distribution,
    BadActor, DataGraveyardMetrics, MetricError, PmComplianceMetrics, ReactiveRatioMetrics,
    WorkTypeDistribution,
};
pub use mapping::{pm_aliases, work_order_aliases, ColumnAliases};
pub use table::CmmsTable;

#[derive(Debug)]
pub enum CmmsImportError {
    Io(std::io::Error),
    Malformed(csv::Error),
}

impl std::fmt::Display for CmmsImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CmmsImportError::Io(err) => write!(f, "failed to read CMMS export: {}", err),
            CmmsImportError::Malformed(err) => {
                write!(f, "CMMS export is not a tabular file: {}", err)
            }
        }
    }
}

impl std::error::Error for CmmsImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CmmsImportError::Io(err) => Some(err),
            CmmsImportError::Malformed(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CmmsImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CmmsImportError {
    fn from(err: csv::Error) -> Self {
        Self::Malformed(err)
    }
}

/// Entry points for loading CMMS exports with vendor headers resolved to
/// the canonical column names the calculators expect.
pub struct CmmsImporter;

impl CmmsImporter {
    pub fn work_orders_from_path<P: AsRef<Path>>(path: P) -> Result<CmmsTable, CmmsImportError> {
        let file = std::fs::File::open(path)?;
        Self::work_orders_from_reader(file)
    }

    pub fn work_orders_from_reader<R: Read>(reader: R) -> Result<CmmsTable, CmmsImportError> {
        let table = CmmsTable::from_csv_reader(reader)?;
        Ok(table.with_aliases(&work_order_aliases()))
    }

    pub fn pm_records_from_path<P: AsRef<Path>>(path: P) -> Result<CmmsTable, CmmsImportError> {
        let file = std::fs::File::open(path)?;
        Self::pm_records_from_reader(file)
    }

    pub fn pm_records_from_reader<R: Read>(reader: R) -> Result<CmmsTable, CmmsImportError> {
        let table = CmmsTable::from_csv_reader(reader)?;
        Ok(table.with_aliases(&pm_aliases()))
    }
}
