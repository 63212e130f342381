//! Plans module - savings plans, the accrual engine, services, and traits.

pub mod accrual;
pub mod export;
mod plans_model;
mod plans_service;
mod plans_traits;
pub mod progress;


pub use accrual::{
    evaluate, finalize_month, reset, suggested_deposit, AccrualError, Evaluation, MonthClose,
    PlanNotice, ProgressTier,
};
pub use plans_model::{
    MonthlyEntry, NewMonthlyEntry, NewPlan, Plan, PlanInputs, PlanReadout, PlanStatus,
    PlanUpdate, RecordedMonth,
};
pub use plans_service::PlanService;
pub use plans_traits::{PlanRepositoryTrait, PlanServiceTrait};
pub use progress::{progress_series, ProgressPoint};
