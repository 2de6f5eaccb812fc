//! Cataloguing new books.

use crate::book::{Book, NewBook};
use crate::error::{Error, Result};
use crate::store::Store;

use super::executor::PlanExecutor;
use super::plan::{OperationPlan, PlanAction};

/// Options for an add-book operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddBookOptions {
    /// The book to catalogue.
    pub book: NewBook,
}

impl AddBookOptions {
    /// Creates add-book options.
    #[must_use]
    pub const fn new(book: NewBook) -> Self {
        Self { book }
    }
}

/// An add-book plan generator.
pub struct AddBookPlan {
    options: AddBookOptions,
}

impl AddBookPlan {
    /// Creates a new add-book planner.
    #[must_use]
    pub const fn new(options: AddBookOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for adding the book.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if no copies are requested, or
    /// [`Error::BookAlreadyExists`] if the title is already catalogued.
    pub fn build_plan<S: Store>(&self, store: &S) -> Result<OperationPlan> {
        let book = &self.options.book;
        if book.copies == 0 {
            return Err(Error::Validation {
                field: "copies".into(),
                message: "a book must be added with at least one copy".into(),
            });
        }

        if store.read(|ops| ops.get_book(&book.title))?.is_some() {
            return Err(Error::BookAlreadyExists {
                title: book.title.to_string(),
            });
        }

        let mut plan = OperationPlan::new(format!("Add '{}'", book.title))
            .add_action(PlanAction::AddBook(book.clone()));
        if book.author.is_empty() {
            plan = plan.add_warning(format!("'{}' has no author", book.title));
        }
        Ok(plan)
    }
}

/// Catalogues a new book with all of its copies on the shelf.
///
/// # Errors
///
/// Returns [`Error::BookAlreadyExists`] if the title is taken (also when
/// another writer adds it between the check and the insert), or
/// [`Error::Validation`] when `book.copies` is zero.
pub fn add_book<S: Store>(store: &mut S, book: NewBook) -> Result<Book> {
    let title = book.title.to_string();
    let plan = AddBookPlan::new(AddBookOptions::new(book)).build_plan(&*store)?;
    let result = PlanExecutor::new(store).execute(&plan)?;

    result
        .books
        .into_iter()
        .next()
        .ok_or_else(|| Error::InventoryInconsistent {
            title,
            details: "insert committed without returning the book".into(),
        })
}
