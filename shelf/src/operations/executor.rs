//! Plan execution engine.
//!
//! The executor applies every action of a plan inside one store
//! transaction. Each action re-validates the rules its planner checked,
//! because the plan was built from reads that may be stale by now.

use crate::book::Book;
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::reservation::{LoanKey, Reservation};
use crate::store::{LibraryOps, Store};

use super::plan::{OperationPlan, PlanAction};

static SYSTEM_CLOCK: SystemClock = SystemClock;

/// Result of executing a plan.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    /// Whether this was a dry-run (no actual changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were taken (or would be taken in dry-run).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// Reservations created by loan actions.
    pub reservations: Vec<Reservation>,

    /// Keys whose reservations were retired by return actions.
    pub returned: Vec<LoanKey>,

    /// Books created by add-book actions.
    pub books: Vec<Book>,
}

impl ExecutionResult {
    fn describe(plan: &OperationPlan, dry_run: bool) -> Self {
        Self {
            dry_run,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            ..Self::default()
        }
    }

    /// The first reservation created, if any.
    #[must_use]
    pub fn reservation(&self) -> Option<&Reservation> {
        self.reservations.first()
    }

    /// The first book created, if any.
    #[must_use]
    pub fn book(&self) -> Option<&Book> {
        self.books.first()
    }
}

/// Executes operation plans against a store.
///
/// # Examples
///
/// ```
/// use shelf::operations::{LoanOptions, LoanPlan, PlanExecutor};
/// use shelf::{LoanKey, LoanPolicy, MemoryStore, NewBook, Title};
///
/// let mut store = MemoryStore::new();
/// shelf::add_book(&mut store, NewBook::new(Title::new("Dune").unwrap(), "Frank Herbert")).unwrap();
///
/// let key = LoanKey::parse("alice", "Dune").unwrap();
/// let plan = LoanPlan::new(LoanOptions::new(key), &LoanPolicy::default())
///     .build_plan(&store)
///     .unwrap();
///
/// // Dry-run execution
/// let result = PlanExecutor::new(&mut store).dry_run().execute(&plan).unwrap();
/// assert!(result.dry_run);
/// assert!(result.reservations.is_empty());
///
/// // Normal execution
/// let result = PlanExecutor::new(&mut store).execute(&plan).unwrap();
/// assert_eq!(result.reservations.len(), 1);
/// ```
pub struct PlanExecutor<'a, S: Store> {
    store: &'a mut S,
    clock: &'a dyn Clock,
    dry_run: bool,
}

impl<'a, S: Store> PlanExecutor<'a, S> {
    /// Creates a new plan executor using the system clock.
    #[must_use]
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            clock: &SYSTEM_CLOCK,
            dry_run: false,
        }
    }

    /// Timestamps new rows with `clock` instead of the system clock.
    #[must_use]
    pub fn with_clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the executor to dry-run mode.
    ///
    /// In dry-run mode, the executor reports the plan but does not touch
    /// the store.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// All actions are applied in a single transaction: either every one
    /// of them takes effect or none does.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any action; the transaction is
    /// rolled back.
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::describe(plan, self.dry_run);
        if self.dry_run || plan.is_empty() {
            return Ok(result);
        }

        let now = self.clock.now();
        self.store.transaction(|ops| {
            for action in &plan.actions {
                apply_action(ops, action, now, &mut result)?;
            }
            Ok(())
        })?;

        log::debug!("{}: {} action(s) applied", plan.description, plan.len());
        Ok(result)
    }
}

fn apply_action(
    ops: &dyn LibraryOps,
    action: &PlanAction,
    now: std::time::SystemTime,
    result: &mut ExecutionResult,
) -> Result<()> {
    match action {
        PlanAction::Loan { key, cap } => {
            let current = ops.count_active(&key.borrower)?;
            if current >= *cap {
                return Err(Error::TooManyReservations { current, cap: *cap });
            }

            if !ops.decrement_available(&key.title)? {
                let availability = ops.availability(&key.title)?;
                return Err(Error::NoCopiesAvailable {
                    title: key.title.to_string(),
                    loaned: availability.loaned,
                });
            }

            let reservation = ops.create_reservation(key, now)?;
            result.reservations.push(reservation);
        }
        PlanAction::Return(key) => {
            if !ops.delete_reservation(key)? {
                return Err(Error::NoMatchingReservation {
                    borrower: key.borrower.to_string(),
                    title: key.title.to_string(),
                });
            }

            if !ops.increment_available(&key.title)? {
                let details = if ops.get_book(&key.title)?.is_some() {
                    "no loaned copy to restore"
                } else {
                    "title is not catalogued"
                };
                return Err(Error::InventoryInconsistent {
                    title: key.title.to_string(),
                    details: details.into(),
                });
            }

            result.returned.push(key.clone());
        }
        PlanAction::AddBook(book) => {
            let created = ops.insert_book(book, now)?;
            result.books.push(created);
        }
    }
    Ok(())
}
