// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde_json::json;
use smartbudget::models::{EntryKind, Transaction};
use smartbudget::services::Transactions;
use smartbudget::store::MemoryStore;
use smartbudget::{cli, commands::exporter};
use tempfile::tempdir;

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    let txs = Transactions::new(&store);
    let _ = txs.create(&Transaction {
        amount: Decimal::new(1234, 2),
        category: "Groceries".into(),
        kind: EntryKind::Expense,
        description: "Corner Shop".into(),
        date: chrono::NaiveDate::from_ymd_opt(2025, 1, 2),
        ..Transaction::default()
    });
    let _ = txs.create(&Transaction {
        amount: Decimal::new(3000, 0),
        category: "Salary".into(),
        kind: EntryKind::Income,
        description: "Payday".into(),
        date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1),
        ..Transaction::default()
    });
    store
}

fn run_export(store: &MemoryStore, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "smartbudget",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    let (_, export_m) = matches.subcommand().expect("export subcommand");
    exporter::handle(store, export_m)
}

#[test]
fn export_transactions_writes_pretty_json() {
    let store = seeded_store();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&store, "json", &out_str).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert!(contents.contains("\n  {"), "expected pretty JSON");
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);
    // oldest first
    assert_eq!(parsed[0]["description"], json!("Payday"));
    assert_eq!(parsed[0]["type"], json!("income"));
    assert_eq!(parsed[1]["amount"], json!("12.34"));
    assert_eq!(parsed[1]["date"], json!("2025-01-02"));
}

#[test]
fn export_transactions_writes_csv() {
    let store = seeded_store();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&store, "csv", &out_str).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["id", "date", "type", "category", "amount", "description"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[1][3], "Groceries");
    assert_eq!(&rows[1][4], "12.34");
}

#[test]
fn unknown_format_is_an_error() {
    let store = seeded_store();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.xml");
    let out_str = out_path.to_string_lossy().to_string();

    let err = run_export(&store, "xml", &out_str).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out_path.exists());
}
