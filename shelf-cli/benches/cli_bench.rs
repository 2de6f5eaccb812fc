use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};

use assert_cmd::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::TempDir;

static CLI_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn shelf(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shelf").expect("failed to locate shelf binary");
    cmd.stdout(Stdio::null())
        .stderr(Stdio::null())
        .args(["--data-dir", data_dir.path().to_str().unwrap(), "--quiet"])
        .args(["--role", "senior-librarian"]);
    cmd
}

fn run(mut cmd: Command, args: &[&str]) {
    let status = cmd.args(args).status().expect("failed to execute shelf");
    assert!(status.success(), "shelf {args:?} failed");
}

fn initialize_data_dir(data_dir: &TempDir) {
    run(shelf(data_dir), &["init"]);
}

fn bench_cli_startup(c: &mut Criterion) {
    c.bench_function("cli_startup_version", |b| {
        b.iter(|| {
            let mut cmd = Command::cargo_bin("shelf").expect("failed to locate shelf binary");
            let output = cmd.arg("--version").output().expect("failed to run shelf");
            black_box(output);
        });
    });
}

fn bench_cli_loan(c: &mut Criterion) {
    c.bench_function("cli_loan", |b| {
        b.iter_batched(
            || {
                let data_dir = TempDir::new().expect("failed to create temp dir");
                initialize_data_dir(&data_dir);
                run(shelf(&data_dir), &["add-book", "Dune", "--copies", "100"]);
                data_dir
            },
            |data_dir| {
                let counter = CLI_COUNTER.fetch_add(1, Ordering::Relaxed);
                let borrower = format!("reader-{counter}");
                let status = shelf(&data_dir)
                    .args(["loan", &borrower, "Dune"])
                    .status()
                    .expect("failed to execute shelf loan");
                black_box(status.success());
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_cli_list(c: &mut Criterion) {
    c.bench_function("cli_list_reservations", |b| {
        b.iter_batched(
            || {
                let data_dir = TempDir::new().expect("failed to create temp dir");
                initialize_data_dir(&data_dir);
                run(shelf(&data_dir), &["add-book", "Dune", "--copies", "50"]);
                for i in 0..50 {
                    run(shelf(&data_dir), &["loan", &format!("reader-{i}"), "Dune"]);
                }
                data_dir
            },
            |data_dir| {
                let mut cmd = Command::cargo_bin("shelf").expect("failed to locate shelf binary");
                let output = cmd
                    .args([
                        "--data-dir",
                        data_dir.path().to_str().unwrap(),
                        "list",
                        "reservations",
                        "--format",
                        "json",
                    ])
                    .output()
                    .expect("failed to execute shelf list");
                black_box(output);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(cli_benches, bench_cli_startup, bench_cli_loan, bench_cli_list);
criterion_main!(cli_benches);
