//! Monetary totals

use crate::record::{InvalidLineTotal, LineItem};

/// Derived amounts for one render
///
/// Full-precision arithmetic throughout; values are rounded to two fraction
/// digits only when formatted for display. Intermediate rounding would skew
/// the VAT amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonetaryTotals {
    pub subtotal: f64,
    pub discount: f64,
    pub vat: f64,
    pub grand_total: f64,
}

/// Derive totals from line items and theme rates
///
/// `subtotal` sums the items in order; `discount = subtotal * discount_rate`;
/// `vat = (subtotal - discount) * vat_rate`;
/// `grand_total = subtotal - discount + vat`. Rates outside [0, 1] are
/// accepted as-is; rate validation is deliberately permissive.
pub fn compute_totals(
    items: &[LineItem],
    discount_rate: f64,
    vat_rate: f64,
) -> Result<MonetaryTotals, InvalidLineTotal> {
    let mut subtotal = 0.0_f64;
    for (index, item) in items.iter().enumerate() {
        let value: f64 = item.line_total.trim().parse().map_err(|_| InvalidLineTotal {
            index,
            value: item.line_total.clone(),
        })?;
        subtotal += value;
    }

    let discount = subtotal * discount_rate;
    let vat = (subtotal - discount) * vat_rate;
    let grand_total = subtotal - discount + vat;

    Ok(MonetaryTotals {
        subtotal,
        discount,
        vat,
        grand_total,
    })
}
