use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use uuid::Uuid;

use ahorros_core::errors::{DatabaseError, Error};
use ahorros_core::plans::{
    finalize_month, reset, MonthClose, MonthlyEntry, NewPlan, Plan, PlanRepositoryTrait,
    PlanUpdate,
};
use ahorros_core::Result;

use super::model::{MonthlyEntryDB, PlanDB, PlanProgressDB, PlanTermsDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{monthly_entries, plans};

fn plan_not_found(plan_id: &str) -> Error {
    Error::Database(DatabaseError::NotFound(format!("Plan {} not found", plan_id)))
}

fn to_plans(rows: Vec<PlanDB>) -> Result<Vec<Plan>> {
    rows.into_iter()
        .map(|row| Plan::try_from(row).map_err(Error::from))
        .collect()
}

fn to_entries(rows: Vec<MonthlyEntryDB>) -> Result<Vec<MonthlyEntry>> {
    rows.into_iter()
        .map(|row| MonthlyEntry::try_from(row).map_err(Error::from))
        .collect()
}

fn load_plan(conn: &mut SqliteConnection, plan_id: &str) -> Result<Plan> {
    let row = plans::table
        .find(plan_id)
        .select(PlanDB::as_select())
        .first::<PlanDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .ok_or_else(|| plan_not_found(plan_id))?;
    Ok(Plan::try_from(row)?)
}

/// Writes the progress columns only; goal, term and budget are left as stored.
fn store_progress(conn: &mut SqliteConnection, plan: &Plan) -> Result<()> {
    diesel::update(plans::table.find(&plan.id))
        .set(PlanProgressDB::new(plan, Utc::now().naive_utc()))
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(())
}

pub struct PlanRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PlanRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        PlanRepository { pool, writer }
    }
}

#[async_trait]
impl PlanRepositoryTrait for PlanRepository {
    fn get_plan(&self, plan_id: &str) -> Result<Plan> {
        let mut conn = get_connection(&self.pool)?;
        load_plan(&mut conn, plan_id)
    }

    fn get_latest_plan_for_user(&self, user_id: &str) -> Result<Option<Plan>> {
        let mut conn = get_connection(&self.pool)?;
        let row = plans::table
            .filter(plans::user_id.eq(user_id))
            .order((plans::created_at.desc(), plans::id.desc()))
            .select(PlanDB::as_select())
            .first::<PlanDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(|row| Plan::try_from(row).map_err(Error::from))
            .transpose()
    }

    fn list_plans_for_user(&self, user_id: &str) -> Result<Vec<Plan>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = plans::table
            .filter(plans::user_id.eq(user_id))
            .order((plans::created_at.asc(), plans::id.asc()))
            .select(PlanDB::as_select())
            .load::<PlanDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_plans(rows)
    }

    fn get_entries(&self, plan_id: &str) -> Result<Vec<MonthlyEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = monthly_entries::table
            .filter(monthly_entries::plan_id.eq(plan_id))
            .order(monthly_entries::month_index.asc())
            .select(MonthlyEntryDB::as_select())
            .load::<MonthlyEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_entries(rows)
    }

    fn get_entries_in_range(
        &self,
        plan_id: &str,
        from_month: i32,
        to_month: i32,
    ) -> Result<Vec<MonthlyEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = monthly_entries::table
            .filter(monthly_entries::plan_id.eq(plan_id))
            .filter(monthly_entries::month_index.between(from_month, to_month))
            .order(monthly_entries::month_index.asc())
            .select(MonthlyEntryDB::as_select())
            .load::<MonthlyEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_entries(rows)
    }

    async fn insert_plan(&self, new_plan: NewPlan) -> Result<Plan> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Plan> {
                let now = Utc::now().naive_utc();
                let plan = Plan {
                    id: new_plan
                        .id
                        .unwrap_or_else(|| Uuid::now_v7().to_string()),
                    user_id: new_plan.user_id,
                    goal: new_plan.goal,
                    term_months: new_plan.term_months,
                    monthly_income: new_plan.monthly_income,
                    monthly_food: new_plan.monthly_food,
                    monthly_transport: new_plan.monthly_transport,
                    monthly_other: new_plan.monthly_other,
                    saved_total: rust_decimal::Decimal::ZERO,
                    current_month: ahorros_core::constants::FIRST_MONTH,
                    start_date: new_plan.start_date.unwrap_or_else(|| now.date()),
                    created_at: now,
                    updated_at: now,
                };

                let row = diesel::insert_into(plans::table)
                    .values(PlanDB::from(plan))
                    .returning(PlanDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Plan::try_from(row)?)
            })
            .await
    }

    async fn update_plan(&self, plan_id: &str, update: PlanUpdate) -> Result<Plan> {
        let plan_id = plan_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Plan> {
                let current = load_plan(conn, &plan_id)?;
                update.validate_for(&current)?;
                diesel::update(plans::table.find(&plan_id))
                    .set(PlanTermsDB::new(&update, Utc::now().naive_utc()))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                load_plan(conn, &plan_id)
            })
            .await
    }

    async fn record_month(&self, close: MonthClose) -> Result<(Plan, MonthlyEntry)> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<(Plan, MonthlyEntry)> {
                    let MonthClose { entry, .. } = close;
                    let plan_id = entry.plan_id.clone();
                    let finalized_month = entry.month_index;

                    let current = load_plan(conn, &plan_id)?;
                    if current.current_month != finalized_month {
                        return Err(Error::Database(DatabaseError::TransactionFailed(format!(
                            "Plan {} is at month {}, not month {}",
                            plan_id, current.current_month, finalized_month
                        ))));
                    }
                    // The deposit is applied to the stored total, not the caller's copy.
                    let advanced = finalize_month(&current, entry.amount, entry.recorded_date)?;
                    store_progress(conn, &advanced.plan)?;

                    let entry_row = MonthlyEntryDB {
                        id: entry.id.unwrap_or_else(|| Uuid::now_v7().to_string()),
                        plan_id: entry.plan_id,
                        month_index: finalized_month,
                        amount: entry.amount.to_string(),
                        recorded_date: entry.recorded_date,
                    };
                    let stored_entry = diesel::insert_into(monthly_entries::table)
                        .values(&entry_row)
                        .returning(MonthlyEntryDB::as_returning())
                        .get_result(conn)
                        .map_err(StorageError::from)?;

                    debug!("Recorded month {} of plan {}", finalized_month, plan_id);
                    Ok((
                        load_plan(conn, &plan_id)?,
                        MonthlyEntry::try_from(stored_entry)?,
                    ))
                },
            )
            .await
    }

    async fn reset_plan(&self, plan_id: &str) -> Result<Plan> {
        let plan_id = plan_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Plan> {
                let current = load_plan(conn, &plan_id)?;
                let removed =
                    diesel::delete(monthly_entries::table.filter(monthly_entries::plan_id.eq(&plan_id)))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                debug!("Removed {} monthly entries of plan {}", removed, plan_id);
                store_progress(conn, &reset(&current))?;
                load_plan(conn, &plan_id)
            })
            .await
    }

    async fn delete_plans_for_user(&self, user_id: &str) -> Result<usize> {
        let user_id_owned = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let owned_plans = plans::table
                    .filter(plans::user_id.eq(&user_id_owned))
                    .select(plans::id);
                diesel::delete(
                    monthly_entries::table.filter(monthly_entries::plan_id.eq_any(owned_plans)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;

                Ok(
                    diesel::delete(plans::table.filter(plans::user_id.eq(&user_id_owned)))
                        .execute(conn)
                        .map_err(StorageError::from)?,
                )
            })
            .await
    }
}
