//! Return planning and execution.
//!
//! A return retires one reservation and puts the copy back on the shelf.
//! There is no precondition to plan against: the planner only warns when
//! it cannot see a matching reservation, and the executor decides.

use crate::error::Result;
use crate::reservation::LoanKey;
use crate::store::{ReservationFilter, Store};

use super::executor::PlanExecutor;
use super::plan::{OperationPlan, PlanAction};

/// Options for a return operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnOptions {
    /// Borrower and title being returned.
    pub key: LoanKey,
}

impl ReturnOptions {
    /// Creates return options for `key`.
    #[must_use]
    pub const fn new(key: LoanKey) -> Self {
        Self { key }
    }
}

/// A return plan generator.
pub struct ReturnPlan {
    options: ReturnOptions,
}

impl ReturnPlan {
    /// Creates a new return planner.
    #[must_use]
    pub const fn new(options: ReturnOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for this return.
    ///
    /// The plan always contains the return action. If no matching
    /// reservation is visible, a warning is attached; executing the plan
    /// will then fail with
    /// [`Error::NoMatchingReservation`](crate::Error::NoMatchingReservation).
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn build_plan<S: Store>(&self, store: &S) -> Result<OperationPlan> {
        let key = &self.options.key;
        let filter = ReservationFilter::all()
            .borrower(key.borrower.clone())
            .title(key.title.clone());
        let held = store.read(|ops| ops.list_reservations(&filter))?;

        let mut plan =
            OperationPlan::new(format!("Return {key}")).add_action(PlanAction::Return(key.clone()));
        match held.len() {
            0 => {
                plan = plan.add_warning(format!(
                    "{} holds no copy of '{}'",
                    key.borrower, key.title
                ));
            }
            1 => {}
            n => {
                plan = plan.add_warning(format!(
                    "{} holds {n} copies of '{}'; the oldest loan is returned",
                    key.borrower, key.title
                ));
            }
        }
        Ok(plan)
    }
}

/// Returns one copy of `key.title` held by `key.borrower`.
///
/// When the borrower holds several copies, the oldest reservation is
/// retired.
///
/// # Errors
///
/// Returns [`Error::NoMatchingReservation`](crate::Error::NoMatchingReservation)
/// if the borrower holds no copy of the title; counters are left untouched.
/// Returns [`Error::InventoryInconsistent`](crate::Error::InventoryInconsistent)
/// if the reservation exists but the book shows no loaned copy. Nothing is
/// changed on error.
pub fn return_copy<S: Store>(store: &mut S, key: LoanKey) -> Result<()> {
    let plan = ReturnPlan::new(ReturnOptions::new(key)).build_plan(&*store)?;
    PlanExecutor::new(store).execute(&plan)?;
    Ok(())
}
