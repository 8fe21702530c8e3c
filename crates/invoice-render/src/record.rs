//! Invoice records

use serde::{Deserialize, Serialize};

/// One invoice as supplied by the caller
///
/// Records are read-only input. Dates are display strings and are not
/// parsed; `client_info` is rendered verbatim in the given order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub invoice_no: String,
    pub invoice_date: String,
    pub due_date: String,
    pub client_info: Vec<String>,
    pub items: Vec<LineItem>,
}

/// One line of the item table
///
/// `quantity` and `line_total` keep their external textual form;
/// `line_total` must parse as a decimal number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub unit: String,
    pub quantity: String,
    pub line_total: String,
}

/// First non-numeric line_total in a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLineTotal {
    pub index: usize,
    pub value: String,
}

impl InvoiceRecord {
    /// Check every item's `line_total` parses as a decimal
    ///
    /// Reports the first offending item. Runs before any drawing so a bad
    /// record never produces partial output.
    pub fn validate(&self) -> Result<(), InvalidLineTotal> {
        for (index, item) in self.items.iter().enumerate() {
            if item.line_total.trim().parse::<f64>().is_err() {
                return Err(InvalidLineTotal {
                    index,
                    value: item.line_total.clone(),
                });
            }
        }
        Ok(())
    }
}
