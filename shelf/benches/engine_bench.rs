use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use tempfile::TempDir;

use shelf::database::{Database, DatabaseConfig};
use shelf::{LoanKey, LoanPolicy, MemoryStore, NewBook, ReservationFilter, Store, Title, DAY};

const LIST_SIZES: &[usize] = &[10, 100, 500];

fn setup_database() -> (TempDir, Database) {
    let temp_dir = TempDir::new().expect("failed to create temporary directory");
    let db_path = temp_dir.path().join("shelf.db");
    let db = Database::open(DatabaseConfig::new(&db_path)).expect("failed to open database");
    (temp_dir, db)
}

fn stock<S: Store>(store: &mut S, title: &str, copies: u32) {
    let book = NewBook::new(Title::new(title).expect("valid title"), "Bench Author")
        .with_copies(copies);
    shelf::add_book(store, book).expect("failed to add book");
}

fn key(borrower: &str, title: &str) -> LoanKey {
    LoanKey::parse(borrower, title).expect("failed to build key")
}

/// `count` borrowers each holding one copy of "Dune".
fn populate_loans<S: Store>(store: &mut S, count: usize) {
    stock(store, "Dune", u32::try_from(count).expect("count fits in u32"));
    for index in 0..count {
        shelf::loan(store, &LoanPolicy::default(), key(&format!("reader-{index}"), "Dune"))
            .expect("failed to loan");
    }
}

fn bench_loan_return_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("loan_return_cycle");

    group.bench_function("sqlite", |b| {
        let (_temp_dir, mut db) = setup_database();
        stock(&mut db, "Dune", 1);
        b.iter(|| {
            let reservation = shelf::loan(&mut db, &LoanPolicy::default(), key("alice", "Dune"))
                .expect("failed to loan");
            shelf::return_copy(&mut db, reservation.key().clone()).expect("failed to return");
            black_box(reservation);
        });
    });

    group.bench_function("memory", |b| {
        let mut store = MemoryStore::new();
        stock(&mut store, "Dune", 1);
        b.iter(|| {
            let reservation = shelf::loan(&mut store, &LoanPolicy::default(), key("alice", "Dune"))
                .expect("failed to loan");
            shelf::return_copy(&mut store, reservation.key().clone()).expect("failed to return");
            black_box(reservation);
        });
    });

    group.finish();
}

fn bench_rejected_loan(c: &mut Criterion) {
    c.bench_function("rejected_loan", |b| {
        let (_temp_dir, mut db) = setup_database();
        stock(&mut db, "Dune", 1);
        shelf::loan(&mut db, &LoanPolicy::default(), key("alice", "Dune")).expect("failed to loan");
        b.iter(|| {
            let err = shelf::loan(&mut db, &LoanPolicy::default(), key("bob", "Dune"));
            black_box(err.is_err());
        });
    });
}

fn bench_list_reservations(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_reservations");

    for &size in LIST_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &count| {
            b.iter_batched(
                || {
                    let (temp_dir, mut db) = setup_database();
                    populate_loans(&mut db, count);
                    (temp_dir, db)
                },
                |(temp_dir, db)| {
                    let _temp_dir = temp_dir;
                    let reservations = db
                        .read(|ops| ops.list_reservations(&ReservationFilter::all()))
                        .expect("failed to list reservations");
                    black_box(reservations);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_overdue_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("overdue_scan");

    for &size in LIST_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &count| {
            b.iter_batched(
                || {
                    let (temp_dir, mut db) = setup_database();
                    populate_loans(&mut db, count);
                    (temp_dir, db)
                },
                |(temp_dir, db)| {
                    let _temp_dir = temp_dir;
                    let now = std::time::SystemTime::now() + DAY * 8;
                    let overdue = db
                        .read(|ops| ops.list_overdue(DAY * 7, now))
                        .expect("failed to scan");
                    black_box(overdue);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    engine_bench,
    bench_loan_return_cycle,
    bench_rejected_loan,
    bench_list_reservations,
    bench_overdue_scan
);
criterion_main!(engine_bench);
