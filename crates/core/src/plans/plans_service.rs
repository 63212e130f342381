use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;

use super::accrual::{self, Evaluation};
use super::export;
use super::plans_model::{
    MonthlyEntry, NewPlan, Plan, PlanInputs, PlanReadout, PlanUpdate, RecordedMonth,
};
use super::plans_traits::{PlanRepositoryTrait, PlanServiceTrait};
use super::progress::{self, ProgressPoint};
use crate::errors::{Result, ValidationError};

pub struct PlanService {
    plan_repository: Arc<dyn PlanRepositoryTrait>,
}

impl PlanService {
    pub fn new(plan_repository: Arc<dyn PlanRepositoryTrait>) -> Self {
        PlanService { plan_repository }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}

#[async_trait]
impl PlanServiceTrait for PlanService {
    fn evaluate_inputs(&self, inputs: &PlanInputs) -> Evaluation {
        accrual::evaluate(inputs)
    }

    fn get_plan(&self, plan_id: &str) -> Result<Plan> {
        self.plan_repository.get_plan(plan_id)
    }

    fn get_latest_plan_for_user(&self, user_id: &str) -> Result<Option<Plan>> {
        self.plan_repository.get_latest_plan_for_user(user_id)
    }

    fn list_plans_for_user(&self, user_id: &str) -> Result<Vec<Plan>> {
        self.plan_repository.list_plans_for_user(user_id)
    }

    fn evaluate_plan(&self, plan_id: &str) -> Result<PlanReadout> {
        let plan = self.plan_repository.get_plan(plan_id)?;
        let evaluation = accrual::evaluate(&plan.inputs());
        Ok(PlanReadout {
            status: plan.status(),
            progress_tier: evaluation.progress_tier(),
            affordable: evaluation.is_affordable(),
            suggested_deposit: accrual::suggested_deposit(&plan),
            evaluation,
            plan,
        })
    }

    fn get_entries(&self, plan_id: &str) -> Result<Vec<MonthlyEntry>> {
        self.plan_repository.get_entries(plan_id)
    }

    fn get_entries_in_range(
        &self,
        plan_id: &str,
        from_month: i32,
        to_month: i32,
    ) -> Result<Vec<MonthlyEntry>> {
        if from_month > to_month {
            return Err(ValidationError::InvalidInput(format!(
                "Invalid month range {}..={}",
                from_month, to_month
            ))
            .into());
        }
        self.plan_repository
            .get_entries_in_range(plan_id, from_month, to_month)
    }

    fn get_progress(&self, plan_id: &str) -> Result<Vec<ProgressPoint>> {
        let plan = self.plan_repository.get_plan(plan_id)?;
        let entries = self.plan_repository.get_entries(plan_id)?;
        Ok(progress::progress_series(&plan, &entries))
    }

    fn export_history_csv(&self, plan_id: &str) -> Result<Vec<u8>> {
        let plan = self.plan_repository.get_plan(plan_id)?;
        let entries = self.plan_repository.get_entries(plan_id)?;
        debug!(
            "Exporting {} monthly entries of plan {}",
            entries.len(),
            plan_id
        );
        export::history_csv(&plan.user_id, &plan, &entries)
    }

    async fn create_plan(&self, mut new_plan: NewPlan) -> Result<Plan> {
        new_plan.validate()?;
        if new_plan.start_date.is_none() {
            new_plan.start_date = Some(Self::today());
        }
        let plan = self.plan_repository.insert_plan(new_plan).await?;
        info!(
            "Created plan {} for user {} ({} over {} months)",
            plan.id, plan.user_id, plan.goal, plan.term_months
        );
        Ok(plan)
    }

    async fn update_plan(&self, plan_id: &str, update: PlanUpdate) -> Result<Plan> {
        update.validate()?;
        let plan = self.plan_repository.update_plan(plan_id, update).await?;
        info!(
            "Updated plan {} ({} over {} months)",
            plan.id, plan.goal, plan.term_months
        );
        Ok(plan)
    }

    async fn finalize_month(&self, plan_id: &str, amount: Decimal) -> Result<RecordedMonth> {
        let plan = self.plan_repository.get_plan(plan_id)?;
        let close = accrual::finalize_month(&plan, amount, Self::today()).map_err(|e| {
            warn!("Rejected month close for plan {}: {}", plan_id, e);
            e
        })?;
        let notices = close.notices.clone();
        let (plan, entry) = self.plan_repository.record_month(close).await?;
        info!(
            "Finalized month {} of plan {}: saved {}, total {}",
            entry.month_index, plan.id, entry.amount, plan.saved_total
        );
        Ok(RecordedMonth {
            plan,
            entry,
            notices,
        })
    }

    async fn reset_plan(&self, plan_id: &str) -> Result<Plan> {
        let plan = self.plan_repository.reset_plan(plan_id).await?;
        info!("Reset plan {}", plan.id);
        Ok(plan)
    }

    async fn delete_user_data(&self, user_id: &str) -> Result<usize> {
        let deleted = self.plan_repository.delete_plans_for_user(user_id).await?;
        info!("Deleted {} plans of user {}", deleted, user_id);
        Ok(deleted)
    }
}
