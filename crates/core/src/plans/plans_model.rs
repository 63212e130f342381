//! Plan domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::accrual::{Evaluation, PlanNotice, ProgressTier};
use crate::constants::{FIRST_MONTH, MAX_AMOUNT};
use crate::errors::{Result, ValidationError};

/// Domain model representing a savings plan under tracking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub user_id: String,
    pub goal: Decimal,
    pub term_months: i32,
    pub monthly_income: Decimal,
    pub monthly_food: Decimal,
    pub monthly_transport: Decimal,
    pub monthly_other: Decimal,
    pub saved_total: Decimal,
    /// Next month to be finalized, 1-based.
    pub current_month: i32,
    pub start_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Plan {
    /// The scalar fields the accrual engine evaluates.
    pub fn inputs(&self) -> PlanInputs {
        PlanInputs {
            goal: self.goal,
            term_months: self.term_months,
            monthly_income: self.monthly_income,
            monthly_food: self.monthly_food,
            monthly_transport: self.monthly_transport,
            monthly_other: self.monthly_other,
            saved_total: self.saved_total,
        }
    }

    pub fn status(&self) -> PlanStatus {
        if self.current_month > self.term_months {
            PlanStatus::Complete
        } else {
            PlanStatus::Active
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status() == PlanStatus::Complete
    }
}

/// Lifecycle state of a plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    Active,
    Complete,
}

/// Plan figures as entered, stored or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanInputs {
    pub goal: Decimal,
    pub term_months: i32,
    pub monthly_income: Decimal,
    #[serde(default)]
    pub monthly_food: Decimal,
    #[serde(default)]
    pub monthly_transport: Decimal,
    #[serde(default)]
    pub monthly_other: Decimal,
    #[serde(default)]
    pub saved_total: Decimal,
}

impl PlanInputs {
    /// Sum of the expense categories, `None` if it does not fit a `Decimal`.
    pub fn total_expenses(&self) -> Option<Decimal> {
        self.monthly_food
            .checked_add(self.monthly_transport)?
            .checked_add(self.monthly_other)
    }

    pub fn disposable_income(&self) -> Option<Decimal> {
        self.monthly_income.checked_sub(self.total_expenses()?)
    }
}

/// Input model for creating a new plan.
///
/// A new plan always starts at month 1 with nothing saved.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewPlan {
    pub id: Option<String>,
    pub user_id: String,
    pub goal: Decimal,
    pub term_months: i32,
    pub monthly_income: Decimal,
    #[serde(default)]
    pub monthly_food: Decimal,
    #[serde(default)]
    pub monthly_transport: Decimal,
    #[serde(default)]
    pub monthly_other: Decimal,
    pub start_date: Option<NaiveDate>,
}

impl NewPlan {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("userId".to_string()).into());
        }
        validate_terms(self.goal, self.term_months)?;
        validate_amounts(&[
            ("goal", self.goal),
            ("monthlyIncome", self.monthly_income),
            ("monthlyFood", self.monthly_food),
            ("monthlyTransport", self.monthly_transport),
            ("monthlyOther", self.monthly_other),
        ])
    }
}

/// Edits to the goal, term and budget of an existing plan.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpdate {
    pub goal: Decimal,
    pub term_months: i32,
    pub monthly_income: Decimal,
    #[serde(default)]
    pub monthly_food: Decimal,
    #[serde(default)]
    pub monthly_transport: Decimal,
    #[serde(default)]
    pub monthly_other: Decimal,
}

impl PlanUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_terms(self.goal, self.term_months)?;
        validate_amounts(&[
            ("goal", self.goal),
            ("monthlyIncome", self.monthly_income),
            ("monthlyFood", self.monthly_food),
            ("monthlyTransport", self.monthly_transport),
            ("monthlyOther", self.monthly_other),
        ])
    }

    /// Validates the update against the stored plan it applies to.
    pub fn validate_for(&self, plan: &Plan) -> Result<()> {
        self.validate()?;
        if plan.current_month > self.term_months + 1 {
            return Err(ValidationError::InvalidInput(format!(
                "Term of {} months is shorter than the {} months already finalized",
                self.term_months,
                plan.current_month - 1
            ))
            .into());
        }
        Ok(())
    }
}

fn validate_terms(goal: Decimal, term_months: i32) -> Result<()> {
    if goal <= Decimal::ZERO {
        return Err(
            ValidationError::InvalidInput("Goal must be greater than zero".to_string()).into(),
        );
    }
    if term_months < FIRST_MONTH {
        return Err(
            ValidationError::InvalidInput("Term must be at least one month".to_string()).into(),
        );
    }
    Ok(())
}

fn validate_amounts(fields: &[(&str, Decimal)]) -> Result<()> {
    for (name, value) in fields {
        if *value < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "{} cannot be negative (got {})",
                name, value
            ))
            .into());
        }
        if *value > MAX_AMOUNT {
            return Err(ValidationError::InvalidInput(format!(
                "{} cannot exceed {} (got {})",
                name, MAX_AMOUNT, value
            ))
            .into());
        }
    }
    Ok(())
}

/// Immutable record of one finalized month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyEntry {
    pub id: String,
    pub plan_id: String,
    pub month_index: i32,
    pub amount: Decimal,
    pub recorded_date: NaiveDate,
}

/// Input model for a monthly entry that has not been stored yet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewMonthlyEntry {
    pub id: Option<String>,
    pub plan_id: String,
    pub month_index: i32,
    pub amount: Decimal,
    pub recorded_date: NaiveDate,
}

/// Evaluated state of a stored plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanReadout {
    pub plan: Plan,
    pub status: PlanStatus,
    pub evaluation: Evaluation,
    pub progress_tier: ProgressTier,
    pub affordable: bool,
    pub suggested_deposit: Decimal,
}

/// A persisted month close.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordedMonth {
    pub plan: Plan,
    pub entry: MonthlyEntry,
    pub notices: Vec<PlanNotice>,
}
