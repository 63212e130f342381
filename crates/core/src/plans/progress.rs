//! Cumulative savings series for progress charts.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::plans_model::{MonthlyEntry, Plan};

/// One point of the progress series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPoint {
    pub month_index: i32,
    /// First day of the calendar month the point is labelled with.
    pub period: NaiveDate,
    pub amount: Decimal,
    pub cumulative: Decimal,
    /// Straight-line target for this point.
    pub ideal: Decimal,
}

/// Builds the series from a plan's entries.
///
/// Periods count forward from the month of the earliest recorded entry.
pub fn progress_series(plan: &Plan, entries: &[MonthlyEntry]) -> Vec<ProgressPoint> {
    let mut ordered: Vec<&MonthlyEntry> = entries.iter().collect();
    ordered.sort_by_key(|entry| entry.month_index);

    let Some(first) = ordered.first() else {
        return Vec::new();
    };
    let anchor = first_of_month(first.recorded_date);

    let ideal_step = if plan.term_months > 0 {
        plan.goal / Decimal::from(plan.term_months)
    } else {
        Decimal::ZERO
    };

    let mut cumulative = Decimal::ZERO;
    ordered
        .into_iter()
        .enumerate()
        .map(|(position, entry)| {
            cumulative = cumulative.saturating_add(entry.amount);
            let offset = u32::try_from(position).unwrap_or(u32::MAX);
            ProgressPoint {
                month_index: entry.month_index,
                period: anchor
                    .checked_add_months(Months::new(offset))
                    .unwrap_or(anchor),
                amount: entry.amount,
                cumulative,
                ideal: ideal_step.saturating_mul(Decimal::from(position + 1)),
            }
        })
        .collect()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
