// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{Reply, ScriptedStore, record};
use rust_decimal::Decimal;
use serde_json::json;
use smartbudget::commands::budgets::year_of;
use smartbudget::gateway::NoticeKind;
use smartbudget::services::Budgets;
use smartbudget::store::MemoryStore;
use smartbudget::wire::{Operator, RecordResult, Response};

#[test]
fn upsert_twice_keeps_one_budget_with_latest_limit() {
    let store = MemoryStore::new();
    let budgets = Budgets::new(&store);

    let first = budgets.upsert_budget("Food", Decimal::new(200, 0), "2025-04", 2025);
    assert!(first.is_clean());
    let second = budgets.upsert_budget("Food", Decimal::new(250, 0), "2025-04", 2025);
    assert!(second.is_clean());
    assert_eq!(first.value.and_then(|b| b.id), second.value.and_then(|b| b.id));

    assert_eq!(store.len("budget_c"), 1);
    let listed = budgets.get_by_month("2025-04").into_value();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].monthly_limit, Decimal::new(250, 0));
    assert_eq!(listed[0].category, "Food");
}

#[test]
fn upsert_keys_on_all_three_fields() {
    let store = MemoryStore::new();
    let budgets = Budgets::new(&store);
    let _ = budgets.upsert_budget("Food", Decimal::new(200, 0), "2025-04", 2025);
    let _ = budgets.upsert_budget("Food", Decimal::new(200, 0), "2025-05", 2025);
    let _ = budgets.upsert_budget("Rent", Decimal::new(900, 0), "2025-04", 2025);
    assert_eq!(store.len("budget_c"), 3);
    assert_eq!(budgets.get_by_month("2025-04").into_value().len(), 2);
}

#[test]
fn upsert_with_duplicate_matches_creates_another() {
    let store = MemoryStore::new();
    for _ in 0..2 {
        store.seed(
            "budget_c",
            record(json!({"category_c": "Food", "month_c": "2025-04", "year_c": 2025, "monthly_limit_c": 100})),
        );
    }
    let out = Budgets::new(&store).upsert_budget("Food", Decimal::new(150, 0), "2025-04", 2025);
    assert!(out.value.is_some());
    assert_eq!(store.len("budget_c"), 3);
}

#[test]
fn upsert_sends_key_lookup_then_create() {
    let store = ScriptedStore::new(vec![
        Reply::List(Response::ok(vec![])),
        Reply::Write(Response::with_results(vec![RecordResult::accepted(record(
            json!({"Id": 1, "category_c": "Food", "month_c": "2025-04", "year_c": 2025}),
        ))])),
    ]);
    let out = Budgets::new(&store).upsert_budget("Food", Decimal::new(150, 0), "2025-04", 2025);
    assert!(out.value.is_some());

    let calls = store.calls();
    assert_eq!(calls[0].op, "fetch");
    let conditions = &calls[0].params.as_ref().unwrap().conditions;
    let fields: Vec<&str> = conditions.iter().map(|c| c.field_name.as_str()).collect();
    assert_eq!(fields, vec!["category_c", "month_c", "year_c"]);
    assert!(conditions.iter().all(|c| c.operator == Operator::EqualTo));
    assert_eq!(calls[1].op, "create");
    assert_eq!(calls[1].records[0]["Name"], json!("Food Budget"));
}

#[test]
fn failed_lookup_still_creates_and_keeps_the_notice() {
    let store = ScriptedStore::new(vec![
        Reply::Down,
        Reply::Write(Response::with_results(vec![RecordResult::accepted(record(
            json!({"Id": 2, "category_c": "Food"}),
        ))])),
    ]);
    let out = Budgets::new(&store).upsert_budget("Food", Decimal::new(150, 0), "2025-04", 2025);
    assert!(out.value.is_some());
    assert_eq!(out.notices.len(), 1);
    assert_eq!(out.notices[0].kind, NoticeKind::TransportFailure);
}

#[test]
fn year_defaults_from_month() {
    assert_eq!(year_of("2025-04").unwrap(), 2025);
    assert!(year_of("April").is_err());
}
