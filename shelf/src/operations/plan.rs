//! Plan types for lending operations.
//!
//! A plan describes the state transitions an operation will make without
//! making them. Plans are built from advisory reads; the executor re-checks
//! every rule inside its transaction.

use crate::book::NewBook;
use crate::reservation::LoanKey;

/// A single state transition to apply during plan execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    /// Move one copy of `key.title` to `key.borrower`.
    Loan {
        /// Borrower and title.
        key: LoanKey,
        /// Reservation cap to enforce for the borrower.
        cap: u32,
    },

    /// Retire one reservation matching `key` and restock the copy.
    Return(LoanKey),

    /// Catalogue a new book.
    AddBook(NewBook),
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Loan { key, .. } => {
                format!("Loan a copy of '{}' to {}", key.title, key.borrower)
            }
            Self::Return(key) => {
                format!("Return a copy of '{}' from {}", key.title, key.borrower)
            }
            Self::AddBook(book) => {
                format!(
                    "Add '{}' by {} with {} cop{}",
                    book.title,
                    if book.author.is_empty() { "unknown author" } else { &book.author },
                    book.copies,
                    if book.copies == 1 { "y" } else { "ies" }
                )
            }
        }
    }
}

/// A complete operation plan describing all actions to be taken.
///
/// Plans are generated during the planning phase and can be inspected,
/// logged, or executed. They include a description, a sequence of actions,
/// and any warnings that should be communicated to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates a new operation plan with the given description.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Loan Dune to alice");
    /// assert_eq!(plan.description, "Loan Dune to alice");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf::operations::{OperationPlan, PlanAction};
    /// use shelf::LoanKey;
    ///
    /// let key = LoanKey::parse("alice", "Dune").unwrap();
    /// let plan = OperationPlan::new("Test").add_action(PlanAction::Return(key));
    ///
    /// assert_eq!(plan.len(), 1);
    /// ```
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Title;

    #[test]
    fn test_plan_builder() {
        let key = LoanKey::parse("alice", "Dune").unwrap();
        let plan = OperationPlan::new("Test")
            .add_action(PlanAction::Loan { key, cap: 4 })
            .add_warning("careful");

        assert_eq!(plan.len(), 1);
        assert!(!plan.is_empty());
        assert_eq!(plan.warnings, vec!["careful".to_string()]);
    }

    #[test]
    fn test_action_descriptions() {
        let key = LoanKey::parse("alice", "Dune").unwrap();
        assert_eq!(
            PlanAction::Loan {
                key: key.clone(),
                cap: 4
            }
            .description(),
            "Loan a copy of 'Dune' to alice"
        );
        assert_eq!(
            PlanAction::Return(key).description(),
            "Return a copy of 'Dune' from alice"
        );

        let book = NewBook::new(Title::new("Emma").unwrap(), "Austen").with_copies(2);
        assert_eq!(
            PlanAction::AddBook(book).description(),
            "Add 'Emma' by Austen with 2 copies"
        );

        let book = NewBook::new(Title::new("Beowulf").unwrap(), "");
        assert_eq!(
            PlanAction::AddBook(book).description(),
            "Add 'Beowulf' by unknown author with 1 copy"
        );
    }
}
