//! Savings accrual engine.
//!
//! Pure functions over a plan's current figures: the readout shown to the user
//! (`evaluate`), the month-close transition (`finalize_month`) and the reset
//! transition (`reset`). Nothing here touches storage; callers persist the
//! returned values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::plans_model::{NewMonthlyEntry, Plan, PlanInputs};
use crate::constants::{CLOSE_TO_GOAL_PERCENT, FIRST_MONTH, HALFWAY_PERCENT};

const HUNDRED: Decimal = dec!(100);

/// Current-state readout of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "status",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Evaluation {
    /// The term is zero or negative.
    InvalidTerm,
    /// Expenses are larger than income; no contribution math is attempted.
    ExpensesExceedIncome { shortfall: Decimal },
    /// Nothing left to save.
    GoalReached { disposable: Decimal, surplus: Decimal },
    /// A figure is too large to compute with.
    AmountOutOfRange,
    /// Still saving; the contribution spreads what is missing over the whole term.
    OnTrack {
        required_monthly_contribution: Decimal,
        remaining: Decimal,
        percent_complete: Decimal,
        disposable: Decimal,
    },
}

impl Evaluation {
    pub fn required_monthly_contribution(&self) -> Decimal {
        match self {
            Evaluation::OnTrack {
                required_monthly_contribution,
                ..
            } => *required_monthly_contribution,
            _ => Decimal::ZERO,
        }
    }

    pub fn percent_complete(&self) -> Decimal {
        match self {
            Evaluation::OnTrack {
                percent_complete, ..
            } => *percent_complete,
            Evaluation::GoalReached { .. } => HUNDRED,
            _ => Decimal::ZERO,
        }
    }

    pub fn remaining(&self) -> Option<Decimal> {
        match self {
            Evaluation::OnTrack { remaining, .. } => Some(*remaining),
            Evaluation::GoalReached { .. } => Some(Decimal::ZERO),
            _ => None,
        }
    }

    pub fn disposable(&self) -> Option<Decimal> {
        match self {
            Evaluation::OnTrack { disposable, .. } | Evaluation::GoalReached { disposable, .. } => {
                Some(*disposable)
            }
            _ => None,
        }
    }

    /// Whether the disposable income covers the required contribution.
    pub fn is_affordable(&self) -> bool {
        match self {
            Evaluation::OnTrack {
                required_monthly_contribution,
                disposable,
                ..
            } => required_monthly_contribution <= disposable,
            Evaluation::GoalReached { .. } => true,
            _ => false,
        }
    }

    /// How much the required contribution exceeds the disposable income, if it does.
    pub fn contribution_gap(&self) -> Option<Decimal> {
        match self {
            Evaluation::OnTrack {
                required_monthly_contribution,
                disposable,
                ..
            } if required_monthly_contribution > disposable => {
                required_monthly_contribution.checked_sub(*disposable)
            }
            _ => None,
        }
    }

    pub fn progress_tier(&self) -> ProgressTier {
        ProgressTier::from_percent(self.percent_complete())
    }
}

/// Coarse progress classification used for progress alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressTier {
    Behind,
    Halfway,
    Close,
    Reached,
}

impl ProgressTier {
    pub fn from_percent(percent: Decimal) -> Self {
        if percent >= HUNDRED {
            ProgressTier::Reached
        } else if percent >= CLOSE_TO_GOAL_PERCENT {
            ProgressTier::Close
        } else if percent >= HALFWAY_PERCENT {
            ProgressTier::Halfway
        } else {
            ProgressTier::Behind
        }
    }
}

/// Rejected month-close transitions. The plan is left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccrualError {
    #[error("Plan already complete: month {current_month} is past the {term_months}-month term")]
    PlanAlreadyComplete { current_month: i32, term_months: i32 },

    #[error("Saved amount cannot be negative (got {0})")]
    NegativeAmount(Decimal),

    #[error("Saved amount {amount_saved} does not fit on top of {saved_total}")]
    AmountOutOfRange {
        saved_total: Decimal,
        amount_saved: Decimal,
    },
}

/// Conditions the caller should surface after a month is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanNotice {
    /// The goal was met within the term.
    GoalReachedEarly,
    /// The month just finalized was the last month of the term.
    TermComplete,
}

/// Result of a successful month close: the plan after the transition and the
/// entry to append. Both must be persisted together.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthClose {
    pub plan: Plan,
    pub entry: NewMonthlyEntry,
    pub notices: Vec<PlanNotice>,
}

/// Computes the readout for a set of plan figures.
pub fn evaluate(inputs: &PlanInputs) -> Evaluation {
    if inputs.term_months <= 0 {
        return Evaluation::InvalidTerm;
    }

    let Some(disposable) = inputs.disposable_income() else {
        return Evaluation::AmountOutOfRange;
    };
    if disposable < Decimal::ZERO {
        return Evaluation::ExpensesExceedIncome {
            shortfall: -disposable,
        };
    }

    let Some(remaining) = inputs.goal.checked_sub(inputs.saved_total) else {
        return Evaluation::AmountOutOfRange;
    };
    if remaining <= Decimal::ZERO {
        return Evaluation::GoalReached {
            disposable,
            surplus: -remaining,
        };
    }

    Evaluation::OnTrack {
        required_monthly_contribution: remaining / Decimal::from(inputs.term_months),
        remaining,
        percent_complete: percent_complete(inputs.saved_total, inputs.goal),
        disposable,
    }
}

/// `saved / goal * 100` clamped to `[0, 100]`; zero for a non-positive goal.
pub fn percent_complete(saved_total: Decimal, goal: Decimal) -> Decimal {
    if goal <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let overflowed = if saved_total.is_sign_negative() {
        Decimal::ZERO
    } else {
        HUNDRED
    };
    saved_total
        .checked_div(goal)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .unwrap_or(overflowed)
        .clamp(Decimal::ZERO, HUNDRED)
}

/// Advances a plan by exactly one month.
pub fn finalize_month(
    plan: &Plan,
    amount_saved: Decimal,
    recorded_on: NaiveDate,
) -> Result<MonthClose, AccrualError> {
    if plan.current_month > plan.term_months {
        return Err(AccrualError::PlanAlreadyComplete {
            current_month: plan.current_month,
            term_months: plan.term_months,
        });
    }
    if amount_saved < Decimal::ZERO {
        return Err(AccrualError::NegativeAmount(amount_saved));
    }

    let finalized_month = plan.current_month;
    let new_saved_total = plan.saved_total.checked_add(amount_saved).ok_or(
        AccrualError::AmountOutOfRange {
            saved_total: plan.saved_total,
            amount_saved,
        },
    )?;

    let mut notices = Vec::new();
    if new_saved_total >= plan.goal && finalized_month <= plan.term_months {
        notices.push(PlanNotice::GoalReachedEarly);
    }
    if finalized_month == plan.term_months {
        notices.push(PlanNotice::TermComplete);
    }

    let entry = NewMonthlyEntry {
        id: None,
        plan_id: plan.id.clone(),
        month_index: finalized_month,
        amount: amount_saved,
        recorded_date: recorded_on,
    };

    Ok(MonthClose {
        plan: Plan {
            saved_total: new_saved_total,
            current_month: finalized_month + 1,
            ..plan.clone()
        },
        entry,
        notices,
    })
}

/// Clears progress. Goal, term and budget are kept.
pub fn reset(plan: &Plan) -> Plan {
    Plan {
        saved_total: Decimal::ZERO,
        current_month: FIRST_MONTH,
        ..plan.clone()
    }
}

/// Deposit to pre-fill when asking how much was saved this month: what is
/// still missing spread over the months left, including the current one.
pub fn suggested_deposit(plan: &Plan) -> Decimal {
    let remaining = plan.goal.saturating_sub(plan.saved_total);
    let months_left = plan.term_months - plan.current_month + 1;
    if remaining > Decimal::ZERO && months_left > 0 {
        remaining / Decimal::from(months_left)
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> PlanInputs {
        PlanInputs {
            goal: dec!(1200),
            term_months: 6,
            monthly_income: dec!(1000),
            monthly_food: dec!(300),
            monthly_transport: dec!(100),
            monthly_other: dec!(50),
            saved_total: Decimal::ZERO,
        }
    }

    fn plan(goal: Decimal, term_months: i32) -> Plan {
        let created = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Plan {
            id: "plan-1".to_string(),
            user_id: "user-1".to_string(),
            goal,
            term_months,
            monthly_income: dec!(1000),
            monthly_food: dec!(300),
            monthly_transport: dec!(100),
            monthly_other: dec!(50),
            saved_total: Decimal::ZERO,
            current_month: 1,
            start_date: created.date(),
            created_at: created,
            updated_at: created,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
    }

    #[test]
    fn test_on_track_scenario() {
        let evaluation = evaluate(&inputs());
        assert_eq!(
            evaluation,
            Evaluation::OnTrack {
                required_monthly_contribution: dec!(200),
                remaining: dec!(1200),
                percent_complete: Decimal::ZERO,
                disposable: dec!(550),
            }
        );
        assert!(evaluation.is_affordable());
        assert_eq!(evaluation.contribution_gap(), None);
        assert_eq!(evaluation.progress_tier(), ProgressTier::Behind);
    }

    #[test]
    fn test_evaluation_serializes_with_status_tag() {
        let value = serde_json::to_value(evaluate(&inputs())).unwrap();
        assert_eq!(value["status"], "ON_TRACK");
        assert_eq!(value["requiredMonthlyContribution"], 200.0);
        assert_eq!(value["disposable"], 550.0);

        let value = serde_json::to_value(Evaluation::InvalidTerm).unwrap();
        assert_eq!(value, serde_json::json!({ "status": "INVALID_TERM" }));
    }

    #[test]
    fn test_expenses_exceed_income_scenario() {
        let evaluation = evaluate(&PlanInputs {
            monthly_income: dec!(300),
            ..inputs()
        });
        assert_eq!(
            evaluation,
            Evaluation::ExpensesExceedIncome {
                shortfall: dec!(150)
            }
        );
        assert_eq!(evaluation.required_monthly_contribution(), Decimal::ZERO);
        assert!(!evaluation.is_affordable());
    }

    #[test]
    fn test_zero_disposable_is_not_a_shortfall() {
        let evaluation = evaluate(&PlanInputs {
            monthly_income: dec!(450),
            ..inputs()
        });
        assert_eq!(evaluation.disposable(), Some(Decimal::ZERO));
        assert_eq!(evaluation.contribution_gap(), Some(dec!(200)));
        assert!(!evaluation.is_affordable());
    }

    #[test]
    fn test_invalid_term_short_circuits() {
        for term in [0, -3] {
            let evaluation = evaluate(&PlanInputs {
                term_months: term,
                monthly_income: Decimal::ZERO,
                ..inputs()
            });
            assert_eq!(evaluation, Evaluation::InvalidTerm);
        }
    }

    #[test]
    fn test_goal_reached_reports_surplus() {
        let evaluation = evaluate(&PlanInputs {
            saved_total: dec!(1300),
            ..inputs()
        });
        assert_eq!(
            evaluation,
            Evaluation::GoalReached {
                disposable: dec!(550),
                surplus: dec!(100),
            }
        );
        assert_eq!(evaluation.percent_complete(), dec!(100));
        assert_eq!(evaluation.remaining(), Some(Decimal::ZERO));
        assert_eq!(evaluation.progress_tier(), ProgressTier::Reached);
    }

    #[test]
    fn test_percent_is_kept_exact_and_clamped() {
        let evaluation = evaluate(&PlanInputs {
            saved_total: dec!(400),
            ..inputs()
        });
        assert_eq!(evaluation.remaining(), Some(dec!(800)));
        assert_eq!(
            evaluation.required_monthly_contribution(),
            dec!(800) / dec!(6)
        );
        assert_eq!(evaluation.percent_complete().round_dp(2), dec!(33.33));

        assert_eq!(percent_complete(dec!(-5), dec!(100)), Decimal::ZERO);
        assert_eq!(percent_complete(dec!(500), dec!(100)), dec!(100));
        assert_eq!(percent_complete(dec!(50), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_oversized_figures_are_out_of_range() {
        let evaluation = evaluate(&PlanInputs {
            monthly_food: Decimal::MAX,
            monthly_transport: Decimal::MAX,
            ..inputs()
        });
        assert_eq!(evaluation, Evaluation::AmountOutOfRange);
        assert_eq!(evaluation.percent_complete(), Decimal::ZERO);
        assert!(!evaluation.is_affordable());

        let evaluation = evaluate(&PlanInputs {
            goal: Decimal::MAX,
            saved_total: Decimal::MIN,
            ..inputs()
        });
        assert_eq!(evaluation, Evaluation::AmountOutOfRange);

        let evaluation = evaluate(&PlanInputs {
            monthly_income: Decimal::MIN,
            monthly_food: Decimal::MAX,
            ..inputs()
        });
        assert_eq!(evaluation, Evaluation::AmountOutOfRange);
    }

    #[test]
    fn test_degenerate_goal_counts_as_reached() {
        let evaluation = evaluate(&PlanInputs {
            goal: Decimal::ZERO,
            ..inputs()
        });
        assert!(matches!(evaluation, Evaluation::GoalReached { .. }));
    }

    #[test]
    fn test_progress_tiers() {
        assert_eq!(ProgressTier::from_percent(dec!(49.99)), ProgressTier::Behind);
        assert_eq!(ProgressTier::from_percent(dec!(50)), ProgressTier::Halfway);
        assert_eq!(ProgressTier::from_percent(dec!(80)), ProgressTier::Close);
        assert_eq!(ProgressTier::from_percent(dec!(100)), ProgressTier::Reached);
    }

    #[test]
    fn test_finalize_three_months_completes_plan() {
        let mut current = plan(dec!(300), 3);
        let mut last_notices = Vec::new();
        for month in 1..=3 {
            let close = finalize_month(&current, dec!(100), today()).unwrap();
            assert_eq!(close.entry.month_index, month);
            assert_eq!(close.entry.amount, dec!(100));
            assert_eq!(close.entry.plan_id, "plan-1");
            current = close.plan;
            last_notices = close.notices;
        }
        assert_eq!(current.saved_total, dec!(300));
        assert_eq!(current.current_month, 4);
        assert!(current.is_complete());
        assert_eq!(
            last_notices,
            vec![PlanNotice::GoalReachedEarly, PlanNotice::TermComplete]
        );
    }

    #[test]
    fn test_goal_reached_early_notice() {
        let close = finalize_month(&plan(dec!(300), 6), dec!(350), today()).unwrap();
        assert_eq!(close.notices, vec![PlanNotice::GoalReachedEarly]);
        assert_eq!(close.plan.current_month, 2);
    }

    #[test]
    fn test_finalize_past_term_is_rejected() {
        let mut complete = plan(dec!(1000), 4);
        complete.current_month = 5;
        let before = complete.clone();
        assert_eq!(
            finalize_month(&complete, dec!(10), today()),
            Err(AccrualError::PlanAlreadyComplete {
                current_month: 5,
                term_months: 4
            })
        );
        assert_eq!(complete, before);
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let p = plan(dec!(1000), 4);
        assert_eq!(
            finalize_month(&p, dec!(-0.01), today()),
            Err(AccrualError::NegativeAmount(dec!(-0.01)))
        );
    }

    #[test]
    fn test_deposit_that_overflows_the_total_is_rejected() {
        let mut p = plan(Decimal::MAX, 4);
        p.saved_total = Decimal::MAX - dec!(10);
        let before = p.clone();
        assert_eq!(
            finalize_month(&p, Decimal::MAX, today()),
            Err(AccrualError::AmountOutOfRange {
                saved_total: Decimal::MAX - dec!(10),
                amount_saved: Decimal::MAX,
            })
        );
        assert_eq!(p, before);
        assert_eq!(suggested_deposit(&p), dec!(10) / dec!(4));
    }

    #[test]
    fn test_zero_amount_still_advances() {
        let close = finalize_month(&plan(dec!(1000), 4), Decimal::ZERO, today()).unwrap();
        assert_eq!(close.plan.current_month, 2);
        assert_eq!(close.plan.saved_total, Decimal::ZERO);
        assert!(close.notices.is_empty());
    }

    #[test]
    fn test_reset_keeps_goal_and_budget() {
        let mut p = plan(dec!(1000), 4);
        p.saved_total = dec!(750);
        p.current_month = 5;
        let fresh = reset(&p);
        assert_eq!(fresh.saved_total, Decimal::ZERO);
        assert_eq!(fresh.current_month, 1);
        assert_eq!(fresh.goal, p.goal);
        assert_eq!(fresh.term_months, p.term_months);
        assert_eq!(fresh.monthly_income, p.monthly_income);
        assert!(!fresh.is_complete());
    }

    #[test]
    fn test_suggested_deposit_spreads_over_months_left() {
        let mut p = plan(dec!(1000), 4);
        p.saved_total = dec!(400);
        p.current_month = 3;
        assert_eq!(suggested_deposit(&p), dec!(300));

        p.current_month = 5;
        assert_eq!(suggested_deposit(&p), Decimal::ZERO);

        p.current_month = 2;
        p.saved_total = dec!(1000);
        assert_eq!(suggested_deposit(&p), Decimal::ZERO);
    }
}
