//! Column alias resolution for heterogeneous CMMS exports. Vendors spell
//! the same columns differently; the calculators only ever see canonical
//! names.

/// Maps vendor spellings of a column onto its canonical name.
#[derive(Debug, Clone)]
pub struct ColumnAliases {
    entries: &'static [(&'static str, &'static [&'static str])],
}

impl ColumnAliases {
    pub fn resolve(&self, header: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(canonical, aliases)| {
                *canonical == header
                    || aliases.iter().any(|alias| alias.eq_ignore_ascii_case(header))
            })
            .map(|(canonical, _)| *canonical)
    }
}

const WORK_ORDER_ALIASES: &[(&str, &[&str])] = &[
    ("work_order_number", &["WO Number", "Work Order ID", "WO#"]),
    ("work_order_type", &["Type", "WO Type", "Work Type", "Order Type"]),
    ("priority", &["Priority", "Priority Level"]),
    ("status", &["Status", "WO Status"]),
    ("created_date", &["Created", "Date Created", "Entry Date"]),
    ("completed_date", &["Completed", "Date Completed", "Finish Date"]),
    ("closure_notes", &["Notes", "Resolution", "Closure Notes", "Comments"]),
    ("asset_id", &["Asset", "Asset ID", "Equipment", "Equipment ID"]),
];

const PM_ALIASES: &[(&str, &[&str])] = &[
    ("pm_number", &["PM Number", "PM ID"]),
    ("due_date", &["Due Date", "Scheduled Date"]),
    ("completed_date", &["Completed Date", "Actual Date"]),
    ("status", &["Status"]),
];

/// Aliases observed across common work order exports.
pub fn work_order_aliases() -> ColumnAliases {
    ColumnAliases {
        entries: WORK_ORDER_ALIASES,
    }
}

/// Aliases observed across common PM schedule exports.
pub fn pm_aliases() -> ColumnAliases {
    ColumnAliases { entries: PM_ALIASES }
}
