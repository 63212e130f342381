use super::accrual::{Evaluation, MonthClose};
use super::plans_model::{
    MonthlyEntry, NewPlan, Plan, PlanInputs, PlanReadout, PlanUpdate, RecordedMonth,
};
use super::progress::ProgressPoint;
use crate::errors::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for plan repository operations.
///
/// Every write method is applied as a single atomic unit.
#[async_trait]
pub trait PlanRepositoryTrait: Send + Sync {
    fn get_plan(&self, plan_id: &str) -> Result<Plan>;
    /// Most recently created plan of a user.
    fn get_latest_plan_for_user(&self, user_id: &str) -> Result<Option<Plan>>;
    fn list_plans_for_user(&self, user_id: &str) -> Result<Vec<Plan>>;
    /// Entries of a plan ordered by month.
    fn get_entries(&self, plan_id: &str) -> Result<Vec<MonthlyEntry>>;
    /// Entries with `from_month <= month_index <= to_month`, ordered by month.
    fn get_entries_in_range(
        &self,
        plan_id: &str,
        from_month: i32,
        to_month: i32,
    ) -> Result<Vec<MonthlyEntry>>;
    async fn insert_plan(&self, new_plan: NewPlan) -> Result<Plan>;
    /// Replaces goal, term and budget only. The term is checked against the
    /// stored `current_month` in the same unit of work.
    async fn update_plan(&self, plan_id: &str, update: PlanUpdate) -> Result<Plan>;
    /// Advances the stored plan by the entry amount and appends the entry, or
    /// neither. Fails if the stored plan is no longer at the entry's month.
    async fn record_month(&self, close: MonthClose) -> Result<(Plan, MonthlyEntry)>;
    /// Deletes every entry of the plan and clears its progress, or neither.
    async fn reset_plan(&self, plan_id: &str) -> Result<Plan>;
    /// Deletes all plans of a user together with their entries.
    async fn delete_plans_for_user(&self, user_id: &str) -> Result<usize>;
}

/// Trait for plan service operations
#[async_trait]
pub trait PlanServiceTrait: Send + Sync {
    fn evaluate_inputs(&self, inputs: &PlanInputs) -> Evaluation;
    fn get_plan(&self, plan_id: &str) -> Result<Plan>;
    fn get_latest_plan_for_user(&self, user_id: &str) -> Result<Option<Plan>>;
    fn list_plans_for_user(&self, user_id: &str) -> Result<Vec<Plan>>;
    fn evaluate_plan(&self, plan_id: &str) -> Result<PlanReadout>;
    fn get_entries(&self, plan_id: &str) -> Result<Vec<MonthlyEntry>>;
    fn get_entries_in_range(
        &self,
        plan_id: &str,
        from_month: i32,
        to_month: i32,
    ) -> Result<Vec<MonthlyEntry>>;
    fn get_progress(&self, plan_id: &str) -> Result<Vec<ProgressPoint>>;
    fn export_history_csv(&self, plan_id: &str) -> Result<Vec<u8>>;
    async fn create_plan(&self, new_plan: NewPlan) -> Result<Plan>;
    async fn update_plan(&self, plan_id: &str, update: PlanUpdate) -> Result<Plan>;
    async fn finalize_month(&self, plan_id: &str, amount: Decimal) -> Result<RecordedMonth>;
    async fn reset_plan(&self, plan_id: &str) -> Result<Plan>;
    async fn delete_user_data(&self, user_id: &str) -> Result<usize>;
}
