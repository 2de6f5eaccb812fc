//! Property-based tests for the loan and return operations.
//!
//! Random sequences of loans and returns must leave every book's counters
//! consistent with its copies and its reservation rows.

use proptest::prelude::*;

use crate::store::{ReservationFilter, Store};
use crate::{add_book, loan, return_copy, Error, LoanKey, LoanPolicy, MemoryStore, NewBook, Title};

const TITLES: [&str; 3] = ["Dune", "Emma", "Ulysses"];
const BORROWERS: [&str; 3] = ["alice", "bob", "carol"];

#[derive(Debug, Clone)]
enum Step {
    Loan(usize, usize),
    Return(usize, usize),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    (any::<bool>(), 0..BORROWERS.len(), 0..TITLES.len()).prop_map(|(is_loan, b, t)| {
        if is_loan {
            Step::Loan(b, t)
        } else {
            Step::Return(b, t)
        }
    })
}

fn key(borrower: usize, title: usize) -> LoanKey {
    LoanKey::parse(BORROWERS[borrower], TITLES[title]).unwrap()
}

fn stock<S: Store>(store: &mut S, copies: &[u32]) {
    for (title, &n) in TITLES.iter().zip(copies) {
        add_book(
            store,
            NewBook::new(Title::new(title).unwrap(), "Author").with_copies(n),
        )
        .unwrap();
    }
}

/// Applies `steps`, checking that every failure is a policy violation and
/// that the invariants hold after each step.
fn run_and_check<S: Store>(
    store: &mut S,
    copies: &[u32],
    cap: u32,
    steps: &[Step],
) -> Result<(), TestCaseError> {
    let policy = LoanPolicy::with_cap(cap);
    for step in steps {
        let result = match *step {
            Step::Loan(b, t) => loan(store, &policy, key(b, t)).map(|_| ()),
            Step::Return(b, t) => return_copy(store, key(b, t)),
        };
        if let Err(e) = result {
            prop_assert!(
                matches!(
                    e,
                    Error::TooManyReservations { .. }
                        | Error::NoCopiesAvailable { .. }
                        | Error::NoMatchingReservation { .. }
                ),
                "unexpected error {e}"
            );
        }

        store
            .read(|ops| {
                for (title, &total) in TITLES.iter().zip(copies) {
                    let title = Title::new(title)?;
                    let book = ops.get_book(&title)?.ok_or(Error::NotFound {
                        resource: title.to_string(),
                    })?;
                    assert_eq!(book.total_copies(), total);
                    assert_eq!(book.num_loaned, ops.count_for_title(&title)?);
                }
                for borrower in BORROWERS {
                    let filter = ReservationFilter::all().borrower(crate::Borrower::new(borrower)?);
                    let held = ops.list_reservations(&filter)?;
                    assert!(u32::try_from(held.len()).unwrap_or(u32::MAX) <= cap);
                }
                Ok(())
            })
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn memory_store_preserves_invariants(
        copies in prop::collection::vec(1u32..4, TITLES.len()),
        cap in 1u32..5,
        steps in prop::collection::vec(step_strategy(), 1..60),
    ) {
        let mut store = MemoryStore::new();
        stock(&mut store, &copies);
        run_and_check(&mut store, &copies, cap, &steps)?;
    }

    // Returns only ever undo loans, so after returning everything the
    // shelf is full again.
    #[test]
    fn returning_everything_restores_the_shelf(
        copies in prop::collection::vec(1u32..4, TITLES.len()),
        steps in prop::collection::vec(step_strategy(), 1..40),
    ) {
        let mut store = MemoryStore::new();
        stock(&mut store, &copies);
        run_and_check(&mut store, &copies, 4, &steps)?;

        let outstanding = store
            .read(|ops| ops.list_reservations(&ReservationFilter::all()))
            .unwrap();
        for reservation in outstanding {
            return_copy(&mut store, reservation.key().clone()).unwrap();
        }

        for (title, &total) in TITLES.iter().zip(&copies) {
            let availability = store
                .read(|ops| ops.availability(&Title::new(title).unwrap()))
                .unwrap();
            prop_assert_eq!(availability.available, total);
            prop_assert_eq!(availability.loaned, 0);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn sqlite_store_preserves_invariants(
        copies in prop::collection::vec(1u32..4, TITLES.len()),
        cap in 1u32..5,
        steps in prop::collection::vec(step_strategy(), 1..40),
    ) {
        let mut db = crate::database::Database::open_in_memory().unwrap();
        stock(&mut db, &copies);
        run_and_check(&mut db, &copies, cap, &steps)?;
    }
}
