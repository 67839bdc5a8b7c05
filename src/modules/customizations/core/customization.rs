// Per-user invoice item customization: display color plus the gate that
// decides whether the item accepts entries on a given date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::core::color::Color;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItemCustomization {
    pub user_id: Uuid,
    pub invoice_item_id: Uuid,
    pub color: Color,
    pub enabled: bool,
    pub active_from: Option<NaiveDate>,
    pub active_to: Option<NaiveDate>,
}

impl InvoiceItemCustomization {
    /// Whether an entry dated `date` may reference this item: the item must be
    /// enabled and the date must fall inside the active range, each bound
    /// applying only when set.
    pub fn allows_entry_on(&self, date: NaiveDate) -> bool {
        self.enabled
            && self.active_from.is_none_or(|from| from <= date)
            && self.active_to.is_none_or(|to| to >= date)
    }

    /// The gate applied when no customization row exists: always open.
    pub fn default_for(user_id: Uuid, invoice_item_id: Uuid) -> Self {
        Self {
            user_id,
            invoice_item_id,
            color: Color::default(),
            enabled: true,
            active_from: None,
            active_to: None,
        }
    }
}
