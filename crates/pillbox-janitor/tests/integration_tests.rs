//! Integration tests for pillbox-janitor
//!
//! Runs retention passes against real SQLite databases.

use chrono::{Duration, NaiveDate};
use pillbox_domain::{NewPill, PillStore, StoreProvider};
use pillbox_janitor::{Janitor, JanitorConfig, JanitorWorker};
use pillbox_store::{SqliteDatabase, SqliteStore};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

fn seed(store: &mut SqliteStore, ages: &[i64]) {
    for age in ages {
        store
            .create(NewPill::new(
                "rojo",
                format!("hace-{}", age),
                "info",
                today() - Duration::days(*age),
            ))
            .unwrap();
    }
}

#[test]
fn test_sweep_boundary_on_sqlite() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    seed(&mut store, &[366, 365, 364, 0]);

    let mut janitor = Janitor::default_config();
    let report = janitor.sweep_at(&mut store, today()).unwrap();

    assert_eq!(report.deleted, 1);
    let drawings: Vec<String> = store
        .list_all()
        .unwrap()
        .into_iter()
        .map(|p| p.drawing)
        .collect();
    assert_eq!(drawings, vec!["hace-365", "hace-364", "hace-0"]);
}

#[test]
fn test_leap_year_window() {
    // 2024 is a leap year: 365 days before 2025-03-01 is 2024-03-01
    let mut store = SqliteStore::new(":memory:").unwrap();
    let feb_29 = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let mar_01 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    store.create(NewPill::new("azul", "bisiesto", "x", feb_29)).unwrap();
    store.create(NewPill::new("azul", "marzo", "x", mar_01)).unwrap();

    let mut janitor = Janitor::default_config();
    assert_eq!(janitor.cutoff_for(today()).unwrap(), mar_01);
    assert_eq!(janitor.sweep_at(&mut store, today()).unwrap().deleted, 1);
    assert_eq!(store.list_all().unwrap()[0].drawing, "marzo");
}

#[test]
fn test_dry_run_on_sqlite() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    seed(&mut store, &[1000, 500, 10]);

    let mut janitor = Janitor::new(JanitorConfig {
        dry_run: true,
        ..Default::default()
    });
    let report = janitor.sweep_at(&mut store, today()).unwrap();

    assert_eq!(report.deleted, 2);
    assert_eq!(store.list_all().unwrap().len(), 3);
}

#[test]
fn test_worker_pass_against_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let db = SqliteDatabase::new(dir.path().join("pills.db"));
    db.initialize().unwrap();

    let recent = chrono::Local::now().date_naive() - Duration::days(30);
    let ancient = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
    {
        let mut session = db.open().unwrap();
        session.create(NewPill::new("verde", "a", "x", ancient)).unwrap();
        session.create(NewPill::new("verde", "b", "x", recent)).unwrap();
    }

    let mut worker = JanitorWorker::default_config();
    let report = worker.run_pass(&db).unwrap();
    assert_eq!(report.deleted, 1);

    let remaining = db.open().unwrap().list_all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].date, recent);
}

#[test]
fn test_worker_pass_survives_missing_database() {
    let dir = tempfile::tempdir().unwrap();
    // Parent directory does not exist, so the session cannot be opened
    let db = SqliteDatabase::new(dir.path().join("missing").join("pills.db"));

    let mut worker = JanitorWorker::default_config();
    assert!(worker.run_pass(&db).is_none());
    assert_eq!(worker.metrics().failed_sweeps, 1);
}
