//! Database models for plans and monthly entries.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::errors::StorageError;
use ahorros_core::plans::{MonthlyEntry, Plan, PlanUpdate};

/// Money is stored as decimal text; anything that does not parse back is
/// reported rather than read as zero.
fn parse_money(field: &str, value: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value).map_err(|e| {
        StorageError::SerializationError(format!("Invalid {} '{}': {}", field, value, e))
    })
}

/// Database model for plans
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlanDB {
    pub id: String,
    pub user_id: String,
    pub goal: String,
    pub term_months: i32,
    pub monthly_income: String,
    pub monthly_food: String,
    pub monthly_transport: String,
    pub monthly_other: String,
    pub saved_total: String,
    pub current_month: i32,
    pub start_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Goal, term and budget columns of a plan row
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::plans)]
pub struct PlanTermsDB {
    pub goal: String,
    pub term_months: i32,
    pub monthly_income: String,
    pub monthly_food: String,
    pub monthly_transport: String,
    pub monthly_other: String,
    pub updated_at: NaiveDateTime,
}

impl PlanTermsDB {
    pub fn new(update: &PlanUpdate, updated_at: NaiveDateTime) -> Self {
        Self {
            goal: update.goal.to_string(),
            term_months: update.term_months,
            monthly_income: update.monthly_income.to_string(),
            monthly_food: update.monthly_food.to_string(),
            monthly_transport: update.monthly_transport.to_string(),
            monthly_other: update.monthly_other.to_string(),
            updated_at,
        }
    }
}

/// Progress columns of a plan row
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::plans)]
pub struct PlanProgressDB {
    pub saved_total: String,
    pub current_month: i32,
    pub updated_at: NaiveDateTime,
}

impl PlanProgressDB {
    pub fn new(plan: &Plan, updated_at: NaiveDateTime) -> Self {
        Self {
            saved_total: plan.saved_total.to_string(),
            current_month: plan.current_month,
            updated_at,
        }
    }
}

/// Database model for monthly entries
#[derive(
    Queryable, Identifiable, Insertable, Associations, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(belongs_to(PlanDB, foreign_key = plan_id))]
#[diesel(table_name = crate::schema::monthly_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MonthlyEntryDB {
    pub id: String,
    pub plan_id: String,
    pub month_index: i32,
    pub amount: String,
    pub recorded_date: NaiveDate,
}

impl TryFrom<PlanDB> for Plan {
    type Error = StorageError;

    fn try_from(db: PlanDB) -> Result<Self, Self::Error> {
        Ok(Self {
            goal: parse_money("goal", &db.goal)?,
            monthly_income: parse_money("monthly_income", &db.monthly_income)?,
            monthly_food: parse_money("monthly_food", &db.monthly_food)?,
            monthly_transport: parse_money("monthly_transport", &db.monthly_transport)?,
            monthly_other: parse_money("monthly_other", &db.monthly_other)?,
            saved_total: parse_money("saved_total", &db.saved_total)?,
            id: db.id,
            user_id: db.user_id,
            term_months: db.term_months,
            current_month: db.current_month,
            start_date: db.start_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<Plan> for PlanDB {
    fn from(domain: Plan) -> Self {
        Self {
            id: domain.id,
            user_id: domain.user_id,
            goal: domain.goal.to_string(),
            term_months: domain.term_months,
            monthly_income: domain.monthly_income.to_string(),
            monthly_food: domain.monthly_food.to_string(),
            monthly_transport: domain.monthly_transport.to_string(),
            monthly_other: domain.monthly_other.to_string(),
            saved_total: domain.saved_total.to_string(),
            current_month: domain.current_month,
            start_date: domain.start_date,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

impl TryFrom<MonthlyEntryDB> for MonthlyEntry {
    type Error = StorageError;

    fn try_from(db: MonthlyEntryDB) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: parse_money("amount", &db.amount)?,
            id: db.id,
            plan_id: db.plan_id,
            month_index: db.month_index,
            recorded_date: db.recorded_date,
        })
    }
}

impl From<MonthlyEntry> for MonthlyEntryDB {
    fn from(domain: MonthlyEntry) -> Self {
        Self {
            id: domain.id,
            plan_id: domain.plan_id,
            month_index: domain.month_index,
            amount: domain.amount.to_string(),
            recorded_date: domain.recorded_date,
        }
    }
}
