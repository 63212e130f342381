//! SQLite storage implementation for savings plans and their monthly ledger.

mod model;
mod repository;

pub use model::{MonthlyEntryDB, PlanDB, PlanProgressDB, PlanTermsDB};
pub use repository::PlanRepository;
