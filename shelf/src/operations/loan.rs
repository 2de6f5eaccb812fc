//! Loan planning and execution.
//!
//! Loaning moves one copy of a title from the shelf to a borrower. The
//! planner checks the borrowing cap and availability against a read
//! snapshot; the executor repeats both checks inside the write
//! transaction, where the conditional decrement is what finally decides
//! which of several racing borrowers gets the last copy.

use crate::error::{Error, Result};
use crate::reservation::{LoanKey, Reservation};
use crate::store::Store;

use super::executor::PlanExecutor;
use super::plan::{OperationPlan, PlanAction};

/// Default maximum number of active reservations per borrower.
pub const DEFAULT_BORROWING_CAP: u32 = 4;

/// Lending rules in force.
///
/// # Examples
///
/// ```
/// use shelf::LoanPolicy;
///
/// assert_eq!(LoanPolicy::default().borrowing_cap, 4);
/// assert_eq!(LoanPolicy::with_cap(2).borrowing_cap, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanPolicy {
    /// Maximum active reservations a single borrower may hold.
    pub borrowing_cap: u32,
}

impl LoanPolicy {
    /// A policy with the given cap.
    #[must_use]
    pub const fn with_cap(borrowing_cap: u32) -> Self {
        Self { borrowing_cap }
    }
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self::with_cap(DEFAULT_BORROWING_CAP)
    }
}

/// Options for a loan operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanOptions {
    /// Borrower and title.
    pub key: LoanKey,
}

impl LoanOptions {
    /// Creates loan options for `key`.
    #[must_use]
    pub const fn new(key: LoanKey) -> Self {
        Self { key }
    }
}

/// A loan plan generator.
pub struct LoanPlan {
    options: LoanOptions,
    policy: LoanPolicy,
}

impl LoanPlan {
    /// Creates a new loan planner.
    #[must_use]
    pub const fn new(options: LoanOptions, policy: &LoanPolicy) -> Self {
        Self {
            options,
            policy: *policy,
        }
    }

    /// Builds an operation plan for this loan request.
    ///
    /// Checks, in order, that the borrower is under the cap and that a copy
    /// is on the shelf. Does not modify the store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyReservations`] or
    /// [`Error::NoCopiesAvailable`] if a check fails, or a store error.
    pub fn build_plan<S: Store>(&self, store: &S) -> Result<OperationPlan> {
        let key = &self.options.key;
        let cap = self.policy.borrowing_cap;

        store.read(|ops| {
            let current = ops.count_active(&key.borrower)?;
            if current >= cap {
                return Err(Error::TooManyReservations { current, cap });
            }

            let availability = ops.availability(&key.title)?;
            if availability.available == 0 {
                return Err(Error::NoCopiesAvailable {
                    title: key.title.to_string(),
                    loaned: availability.loaned,
                });
            }

            let mut plan = OperationPlan::new(format!("Loan {key}"))
                .add_action(PlanAction::Loan {
                    key: key.clone(),
                    cap,
                });
            if current + 1 == cap {
                plan = plan.add_warning(format!(
                    "{} will be at the borrowing limit of {cap}",
                    key.borrower
                ));
            }
            Ok(plan)
        })
    }
}

/// Loans one copy of `key.title` to `key.borrower`.
///
/// # Errors
///
/// Returns [`Error::TooManyReservations`] when the borrower already holds
/// `policy.borrowing_cap` reservations, [`Error::NoCopiesAvailable`] when
/// no copy is on the shelf (including when the title is unknown), or a
/// store error. Nothing is changed on error.
pub fn loan<S: Store>(store: &mut S, policy: &LoanPolicy, key: LoanKey) -> Result<Reservation> {
    let title = key.title.to_string();
    let plan = LoanPlan::new(LoanOptions::new(key), policy).build_plan(&*store)?;
    let result = PlanExecutor::new(store).execute(&plan)?;

    result
        .reservations
        .into_iter()
        .next()
        .ok_or_else(|| Error::InventoryInconsistent {
            title,
            details: "loan committed without creating a reservation".into(),
        })
}
