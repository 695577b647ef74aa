//! Pure metric calculators over CMMS tables. Each one counts, bands the
//! ratio through the shared threshold table, and reports the severity label
//! alongside the 1-5 score.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use super::table::CmmsTable;
use crate::assessment::scoring::{round1, Band, BandEdge, BandTable};

/// Work order categories treated as reactive demand.
const REACTIVE_TYPES: [&str; 4] = ["emergency", "corrective", "breakdown", "urgent"];

/// Priority values that imply reactive work when no type column exists.
const REACTIVE_PRIORITIES: [&str; 3] = ["1", "emergency", "urgent"];

/// Closure notes that say nothing about what was actually done.
const GENERIC_CLOSURE_NOTES: [&str; 7] = ["done", "fixed", "complete", "ok", "n/a", "closed", ""];

/// Closure notes shorter than this cannot support root cause analysis.
const MIN_CLOSURE_NOTE_CHARS: usize = 10;

/// PM completions inside this many days after the due date still count on time.
const PM_GRACE_DAYS: i64 = 7;

/// Reactive work order categories counted when ranking bad actors.
const FAILURE_TYPES: [&str; 3] = ["corrective", "emergency", "breakdown"];

/// Columns accepted as the asset identifier, in preference order.
const ASSET_COLUMNS: [&str; 4] = ["asset_id", "equipment", "equipment_id", "asset"];

/// Severity band carried by every CMMS metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MetricBand {
    label: &'static str,
    score: u8,
}

const REACTIVE_FLOOR: MetricBand = MetricBand {
    label: "EXCELLENT - Proactive Maintenance",
    score: 5,
};

const PM_FLOOR: MetricBand = MetricBand {
    label: "CRITICAL - PM Program Breaking Down",
    score: 1,
};

const GRAVEYARD_FLOOR: MetricBand = MetricBand {
    label: "EXCELLENT - High data quality",
    score: 5,
};

fn reactive_bands() -> BandTable<MetricBand> {
    BandTable::new(
        BandEdge::Exclusive,
        vec![
            Band {
                lower_bound: 0.60,
                value: MetricBand {
                    label: "CRITICAL - REACTIVE SPIRAL",
                    score: 1,
                },
            },
            Band {
                lower_bound: 0.40,
                value: MetricBand {
                    label: "HIGH - Reactive Dominant",
                    score: 2,
                },
            },
            Band {
                lower_bound: 0.25,
                value: MetricBand {
                    label: "MEDIUM - Balanced but Reactive-Heavy",
                    score: 3,
                },
            },
            Band {
                lower_bound: 0.15,
                value: MetricBand {
                    label: "GOOD - Preventive Focus",
                    score: 4,
                },
            },
        ],
    )
}

fn pm_bands() -> BandTable<MetricBand> {
    BandTable::new(
        BandEdge::Inclusive,
        vec![
            Band {
                lower_bound: 0.95,
                value: MetricBand {
                    label: "EXCELLENT",
                    score: 5,
                },
            },
            Band {
                lower_bound: 0.85,
                value: MetricBand {
                    label: "GOOD",
                    score: 4,
                },
            },
            Band {
                lower_bound: 0.70,
                value: MetricBand {
                    label: "ACCEPTABLE",
                    score: 3,
                },
            },
            Band {
                lower_bound: 0.50,
                value: MetricBand {
                    label: "POOR",
                    score: 2,
                },
            },
        ],
    )
}

fn graveyard_bands() -> BandTable<MetricBand> {
    BandTable::new(
        BandEdge::Exclusive,
        vec![
            Band {
                lower_bound: 0.40,
                value: MetricBand {
                    label: "SEVERE DATA GRAVEYARD - Cannot perform RCA",
                    score: 1,
                },
            },
            Band {
                lower_bound: 0.20,
                value: MetricBand {
                    label: "POOR - Significant data quality issues",
                    score: 2,
                },
            },
            Band {
                lower_bound: 0.10,
                value: MetricBand {
                    label: "ACCEPTABLE - Some improvement needed",
                    score: 3,
                },
            },
            Band {
                lower_bound: 0.04,
                value: MetricBand {
                    label: "GOOD - Minor gaps",
                    score: 4,
                },
            },
        ],
    )
}

/// Error enumeration for tables the calculators cannot analyze.
#[derive(Debug, thiserror::Error)]
pub enum MetricError {
    #[error("missing required column: {column}")]
    MissingColumn { column: &'static str },
    #[error("column {column} holds '{value}', expected {expected}")]
    TypeMismatch {
        column: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Reactive vs preventive demand profile of a work order history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactiveRatioMetrics {
    pub metric: &'static str,
    pub total_work_orders: usize,
    pub reactive_work_orders: usize,
    pub preventive_work_orders: usize,
    /// Percent of total demand that is reactive, one decimal.
    pub reactive_ratio: f64,
    pub severity: &'static str,
    pub score: u8,
    pub threshold_50_percent: bool,
}

pub fn reactive_ratio(table: &CmmsTable) -> Result<ReactiveRatioMetrics, MetricError> {
    let total = table.len();

    let reactive = if let Some(types) = table.column_values("work_order_type") {
        types
            .iter()
            .filter(|value| REACTIVE_TYPES.contains(&value.to_ascii_lowercase().as_str()))
            .count()
    } else if let Some(priorities) = table.column_values("priority") {
        priorities
            .iter()
            .filter(|value| REACTIVE_PRIORITIES.contains(&value.to_ascii_lowercase().as_str()))
            .count()
    } else {
        return Err(MetricError::MissingColumn {
            column: "work_order_type or priority",
        });
    };

    let ratio = if total > 0 {
        reactive as f64 / total as f64
    } else {
        0.0
    };
    let band = reactive_bands()
        .classify(ratio)
        .copied()
        .unwrap_or(REACTIVE_FLOOR);

    Ok(ReactiveRatioMetrics {
        metric: "Reactive Ratio",
        total_work_orders: total,
        reactive_work_orders: reactive,
        preventive_work_orders: total - reactive,
        reactive_ratio: round1(ratio * 100.0),
        severity: band.label,
        score: band.score,
        threshold_50_percent: ratio > 0.5,
    })
}

/// On-time completion rate of the preventive maintenance program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PmComplianceMetrics {
    pub metric: &'static str,
    pub total_pms: usize,
    pub on_time_pms: usize,
    pub late_pms: usize,
    /// Percent completed within the grace window, one decimal.
    pub compliance_rate: f64,
    /// Mean lateness across records completed after the due date; `None`
    /// when nothing was late.
    pub average_days_late: Option<f64>,
    pub severity: &'static str,
    pub score: u8,
}

pub fn pm_compliance(table: &CmmsTable) -> Result<PmComplianceMetrics, MetricError> {
    let due_dates = table
        .column_values("due_date")
        .ok_or(MetricError::MissingColumn { column: "due_date" })?;
    let completed_dates =
        table
            .column_values("completed_date")
            .ok_or(MetricError::MissingColumn {
                column: "completed_date",
            })?;

    let total = due_dates.len();
    let mut on_time = 0usize;
    let mut days_late_all = Vec::with_capacity(total);

    for (due_raw, completed_raw) in due_dates.iter().zip(&completed_dates) {
        let due = parse_date("due_date", due_raw)?;
        let completed = parse_date("completed_date", completed_raw)?;
        let days_late = (completed - due).num_days();
        if days_late <= PM_GRACE_DAYS {
            on_time += 1;
        }
        days_late_all.push(days_late);
    }

    let compliance = if total > 0 {
        on_time as f64 / total as f64
    } else {
        0.0
    };

    let overdue: Vec<i64> = days_late_all.into_iter().filter(|days| *days > 0).collect();
    let average_days_late = if overdue.is_empty() {
        None
    } else {
        Some(round1(
            overdue.iter().sum::<i64>() as f64 / overdue.len() as f64,
        ))
    };

    let band = pm_bands().classify(compliance).copied().unwrap_or(PM_FLOOR);

    Ok(PmComplianceMetrics {
        metric: "PM Compliance",
        total_pms: total,
        on_time_pms: on_time,
        late_pms: total - on_time,
        compliance_rate: round1(compliance * 100.0),
        average_days_late,
        severity: band.label,
        score: band.score,
    })
}

/// Share of closure records too thin to support root cause analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataGraveyardMetrics {
    pub metric: &'static str,
    pub total_work_orders: usize,
    pub poor_quality_closures: usize,
    /// Percent of closures that are generic or too short, one decimal.
    pub graveyard_percentage: f64,
    pub severity: &'static str,
    pub score: u8,
}

pub fn data_graveyard_index(table: &CmmsTable) -> Result<DataGraveyardMetrics, MetricError> {
    let notes = table
        .column_values("closure_notes")
        .ok_or(MetricError::MissingColumn {
            column: "closure_notes",
        })?;

    let total = notes.len();
    let poor_quality = notes
        .iter()
        .filter(|note| {
            let trimmed = note.trim();
            GENERIC_CLOSURE_NOTES.contains(&trimmed.to_lowercase().as_str())
                || trimmed.chars().count() < MIN_CLOSURE_NOTE_CHARS
        })
        .count();

    let percentage = if total > 0 {
        poor_quality as f64 / total as f64
    } else {
        0.0
    };
    let band = graveyard_bands()
        .classify(percentage)
        .copied()
        .unwrap_or(GRAVEYARD_FLOOR);

    Ok(DataGraveyardMetrics {
        metric: "Data Graveyard Index",
        total_work_orders: total,
        poor_quality_closures: poor_quality,
        graveyard_percentage: round1(percentage * 100.0),
        severity: band.label,
        score: band.score,
    })
}

/// Work order counts and shares per recorded type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkTypeDistribution {
    pub counts: BTreeMap<String, usize>,
    pub percentages: BTreeMap<String, f64>,
}

pub fn work_type_distribution(table: &CmmsTable) -> Result<WorkTypeDistribution, MetricError> {
    let types = table
        .column_values("work_order_type")
        .ok_or(MetricError::MissingColumn {
            column: "work_order_type",
        })?;

    let total = types.len();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for value in types {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }

    let percentages = counts
        .iter()
        .map(|(work_type, count)| {
            let share = if total > 0 {
                round1(*count as f64 / total as f64 * 100.0)
            } else {
                0.0
            };
            (work_type.clone(), share)
        })
        .collect();

    Ok(WorkTypeDistribution {
        counts,
        percentages,
    })
}

/// One asset ranked by reactive work order count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadActor {
    pub asset: String,
    pub failure_count: usize,
}

/// Top failing assets. Counts reactive work orders per asset, or every work
/// order when no type column is present.
pub fn bad_actors(table: &CmmsTable, top_n: usize) -> Result<Vec<BadActor>, MetricError> {
    let asset_column = ASSET_COLUMNS
        .iter()
        .find(|column| table.has_column(column))
        .copied()
        .ok_or(MetricError::MissingColumn { column: "asset_id" })?;

    let assets = table
        .column_values(asset_column)
        .ok_or(MetricError::MissingColumn { column: "asset_id" })?;
    let types = table.column_values("work_order_type");

    let mut failures: HashMap<&str, usize> = HashMap::new();
    for (index, asset) in assets.iter().enumerate() {
        let is_failure = match &types {
            Some(values) => FAILURE_TYPES.contains(&values[index].to_ascii_lowercase().as_str()),
            None => true,
        };
        if is_failure && !asset.is_empty() {
            *failures.entry(*asset).or_insert(0) += 1;
        }
    }

    let mut actors: Vec<BadActor> = failures
        .into_iter()
        .map(|(asset, failure_count)| BadActor {
            asset: asset.to_string(),
            failure_count,
        })
        .collect();
    actors.sort_by(|a, b| {
        b.failure_count
            .cmp(&a.failure_count)
            .then_with(|| a.asset.cmp(&b.asset))
    });
    actors.truncate(top_n);

    Ok(actors)
}

fn parse_date(column: &'static str, raw: &str) -> Result<NaiveDate, MetricError> {
    let trimmed = raw.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.naive_utc().date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return Ok(date);
    }

    Err(MetricError::TypeMismatch {
        column,
        value: raw.to_string(),
        expected: "a date (YYYY-MM-DD)",
    })
}
