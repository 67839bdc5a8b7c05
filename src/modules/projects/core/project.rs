// Project domain types and input shapes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_NAME_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    /// Display position within the project.
    pub ordinal: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub enabled: bool,
    pub users: Vec<Uuid>,
    pub invoice_items: Vec<InvoiceItem>,
}

/// Invoice item as seen from a user's perspective: the unit a time entry is
/// logged against, carrying its project names for display and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInvoiceItem {
    pub id: Uuid,
    pub name: String,
    pub ordinal: u32,
    pub project_id: Uuid,
    pub project_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewInvoiceItem {
    pub name: String,
    pub ordinal: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub enabled: bool,
    pub users: Vec<Uuid>,
    pub invoice_items: Vec<NewInvoiceItem>,
}

/// Desired full state for a project update. Items with an id refer to
/// existing rows; items without one are created.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectUpdate {
    pub name: String,
    pub enabled: bool,
    pub users: Vec<Uuid>,
    pub invoice_items: Vec<InvoiceItemUpdate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceItemUpdate {
    pub id: Option<Uuid>,
    pub name: String,
    pub ordinal: u32,
}

/// Checks the shared name rule: non-blank after trimming, at most 64 characters.
pub fn name_is_valid(name: &str) -> bool {
    !name.trim().is_empty() && name.chars().count() <= MAX_NAME_LENGTH
}
