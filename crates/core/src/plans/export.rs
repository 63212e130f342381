//! Tabular export of a plan and its monthly history.

use std::io::Write;

use rust_decimal::{Decimal, RoundingStrategy};

use super::plans_model::{MonthlyEntry, Plan};
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::Result;

fn money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(
        DISPLAY_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    );
    format!("{:.2}", rounded)
}

/// Writes the plan summary block followed by the monthly history as CSV.
pub fn write_history_csv<W: Write>(
    writer: W,
    owner_label: &str,
    plan: &Plan,
    entries: &[MonthlyEntry],
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    wtr.write_record(["Savings Plan", owner_label])?;
    wtr.write_record(["Metric", "Value"])?;
    wtr.write_record(["Goal", money(plan.goal).as_str()])?;
    wtr.write_record(["Term (months)", plan.term_months.to_string().as_str()])?;
    wtr.write_record(["Monthly Income", money(plan.monthly_income).as_str()])?;
    wtr.write_record(["Food", money(plan.monthly_food).as_str()])?;
    wtr.write_record(["Transport", money(plan.monthly_transport).as_str()])?;
    wtr.write_record(["Other Expenses", money(plan.monthly_other).as_str()])?;
    wtr.write_record(["Total Saved", money(plan.saved_total).as_str()])?;
    wtr.write_record(["Current Month", plan.current_month.to_string().as_str()])?;
    wtr.write_record([""])?;

    wtr.write_record(["Monthly History"])?;
    wtr.write_record(["Month", "Amount Saved", "Date"])?;

    let mut ordered: Vec<&MonthlyEntry> = entries.iter().collect();
    ordered.sort_by_key(|entry| entry.month_index);
    for entry in ordered {
        wtr.write_record([
            entry.month_index.to_string(),
            money(entry.amount),
            entry.recorded_date.format("%Y-%m-%d").to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Convenience wrapper returning the CSV as bytes.
pub fn history_csv(owner_label: &str, plan: &Plan, entries: &[MonthlyEntry]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_history_csv(&mut buffer, owner_label, plan, entries)?;
    Ok(buffer)
}
