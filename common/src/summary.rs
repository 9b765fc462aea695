//! Claim aggregation
//!
//! Derived view over the root state: per-category totals and joined
//! remarks in the fixed category order, recomputed from scratch on every
//! call. No aggregate state is stored anywhere.
//!
//! Entries whose category is outside the category universe are excluded
//! from the rows and from the grand total. This is intentional: such
//! entries can only exist via imported documents, and the printed form
//! has no row to put them on.

use crate::types::{category_universe, ClaimState};

/// One row of the printable summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    /// 1-based item number on the form
    pub index: usize,
    pub name: String,
    pub total_amount: f64,
    /// Non-empty remarks of matching entries, comma-joined
    pub remarks: String,
}

/// Aggregates entries by category over the category universe.
///
/// Pure function of the state: calling it twice on an unchanged state
/// yields identical rows and grand total.
pub fn summarize(state: &ClaimState) -> (Vec<SummaryRow>, f64) {
    let rows: Vec<SummaryRow> = category_universe(state)
        .into_iter()
        .enumerate()
        .map(|(i, category)| {
            let matching: Vec<_> = state
                .entries
                .iter()
                .filter(|e| e.category == category)
                .collect();

            let total_amount = matching.iter().map(|e| e.amount).sum();
            let remarks = matching
                .iter()
                .map(|e| e.remark.trim())
                .filter(|r| !r.is_empty())
                .collect::<Vec<_>>()
                .join(", ");

            SummaryRow {
                index: i + 1,
                name: category,
                total_amount,
                remarks,
            }
        })
        .collect();

    let grand_total = rows.iter().map(|r| r.total_amount).sum();
    (rows, grand_total)
}
