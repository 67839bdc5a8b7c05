// One exported entry, names resolved at read time (a snapshot, not a live
// reference).

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub user_name: String,
    pub project_name: String,
    pub invoice_item_name: String,
    pub minutes: u32,
    pub remark: Option<String>,
}
