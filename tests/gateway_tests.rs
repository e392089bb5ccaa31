// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{Reply, ScriptedStore, record};
use rust_decimal::Decimal;
use serde_json::json;
use smartbudget::gateway::{Gateway, NoticeKind, Query};
use smartbudget::models::{BankAccount, EntryKind, Transaction};
use smartbudget::services::{BankAccounts, Transactions};
use smartbudget::wire::{FieldError, RecordResult, Response, SortDirection};

fn tx(amount: i64) -> Transaction {
    Transaction {
        amount: Decimal::new(amount, 0),
        category: "Food".into(),
        kind: EntryKind::Expense,
        description: "Lunch".into(),
        ..Transaction::default()
    }
}

#[test]
fn empty_store_lists_nothing_without_notices() {
    let store = ScriptedStore::new(vec![Reply::List(Response::ok(vec![]))]);
    let out = Transactions::new(&store).get_all();
    assert!(out.value.is_empty());
    assert!(out.is_clean());
}

#[test]
fn envelope_failure_yields_empty_list_and_one_notice() {
    let store = ScriptedStore::new(vec![Reply::List(Response::failed("quota exceeded"))]);
    let out = BankAccounts::new(&store).get_all();
    assert!(out.value.is_empty());
    assert_eq!(out.notices.len(), 1);
    assert_eq!(out.notices[0].kind, NoticeKind::EnvelopeFailure);
    assert!(out.notices[0].message.contains("quota exceeded"));
}

#[test]
fn transport_failure_is_a_notice_not_an_error() {
    let store = ScriptedStore::new(vec![Reply::Down]);
    let out = Transactions::new(&store).get_all();
    assert!(out.value.is_empty());
    assert_eq!(out.notices.len(), 1);
    assert_eq!(out.notices[0].kind, NoticeKind::TransportFailure);
    assert!(out.notices[0].message.contains("503"));
}

#[test]
fn list_requests_selection_and_default_sort() {
    let store = ScriptedStore::new(vec![Reply::List(Response::ok(vec![]))]);
    let _ = Transactions::new(&store).get_all();

    let calls = store.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].table, "transaction_c");
    let params = calls[0].params.clone().unwrap();
    let names: Vec<&str> = params.selected_names().collect();
    assert_eq!(&names[..2], &["Id", "Name"]);
    assert!(names.contains(&"amount_c"));
    assert_eq!(params.order_by.len(), 1);
    assert_eq!(params.order_by[0].field_name, "date_c");
    assert_eq!(params.order_by[0].sort_type, SortDirection::Desc);
}

#[test]
fn explicit_sort_and_filters_use_external_names() {
    let store = ScriptedStore::new(vec![Reply::List(Response::ok(vec![]))]);
    let q = Query::new()
        .eq("category", "Food")
        .sort("amount", SortDirection::Asc)
        .page(10, 20);
    let _ = Transactions::new(&store).list(&q);

    let params = store.calls()[0].params.clone().unwrap();
    assert_eq!(params.conditions[0].field_name, "category_c");
    assert_eq!(params.conditions[0].values, vec![json!("Food")]);
    assert_eq!(params.order_by[0].field_name, "amount_c");
    let paging = params.paging_info.unwrap();
    assert_eq!((paging.limit, paging.offset), (10, 20));
}

#[test]
fn list_translates_records_and_skips_malformed_ones() {
    let store = ScriptedStore::new(vec![Reply::List(Response::ok(vec![
        record(json!({"Id": 1, "Name": "Rent", "amount_c": 900, "type_c": "expense", "date_c": "2025-03-01"})),
        record(json!({"Id": 2, "amount_c": 5, "date_c": "last tuesday"})),
    ]))]);
    let out = Transactions::new(&store).get_all();
    assert_eq!(out.value.len(), 1);
    let t = &out.value[0];
    assert_eq!(t.id, Some(1));
    assert_eq!(t.description, "Rent");
    assert_eq!(t.amount, Decimal::new(900, 0));

    assert_eq!(out.notices.len(), 1);
    assert_eq!(out.notices[0].kind, NoticeKind::PartialRecordFailure);
    assert_eq!(out.notices[0].message, "Skipped unreadable transaction record 2");
    assert_eq!(out.notices[0].details.len(), 1);
}

#[test]
fn list_reads_capitalized_type_and_offsetless_timestamp() {
    let store = ScriptedStore::new(vec![Reply::List(Response::ok(vec![
        record(json!({"Id": 1, "amount_c": 40, "type_c": "expense", "created_at_c": "2025-03-01T10:00:00"})),
        record(json!({"Id": 2, "amount_c": 3000, "type_c": "Income", "created_at_c": "2025-03-02T08:15:00Z"})),
        record(json!({"Id": 3, "amount_c": 12, "type_c": "Expense", "created_at_c": "soon"})),
    ]))]);
    let out = Transactions::new(&store).get_all();
    assert!(out.is_clean(), "unexpected notices: {:?}", out.notices);
    assert_eq!(out.value.len(), 3);

    let first = out.value[0].created_at.unwrap();
    assert_eq!(first.to_rfc3339(), "2025-03-01T10:00:00+00:00");
    assert_eq!(out.value[1].kind, EntryKind::Income);
    assert_eq!(out.value[2].kind, EntryKind::Expense);
    assert!(out.value[2].created_at.is_none());
}

#[test]
fn unknown_type_is_reported_not_dropped_silently() {
    let store = ScriptedStore::new(vec![Reply::List(Response::ok(vec![
        record(json!({"Id": 8, "amount_c": 5, "type_c": "transfer"})),
    ]))]);
    let out = Transactions::new(&store).get_all();
    assert!(out.value.is_empty());
    assert_eq!(out.notices.len(), 1);
    assert!(out.notices[0].message.ends_with("record 8"));
    assert!(out.notices[0].is_error());
}

#[test]
fn partial_batch_failure_reports_one_notice_per_failed_record() {
    let rejected = RecordResult {
        success: false,
        message: Some("Validation failed".into()),
        errors: vec![
            FieldError {
                field_label: "Amount".into(),
                message: Some("is required".into()),
            },
            FieldError {
                field_label: "Date".into(),
                message: None,
            },
        ],
        ..RecordResult::default()
    };
    let store = ScriptedStore::new(vec![Reply::Write(Response::with_results(vec![
        RecordResult::accepted(record(json!({"Id": 7, "amount_c": 12}))),
        rejected,
        RecordResult::rejected("Duplicate"),
    ]))]);
    let out = Transactions::new(&store).create(&tx(12));

    assert_eq!(out.value.and_then(|t| t.id), Some(7));
    assert_eq!(out.notices.len(), 2);
    assert!(out.notices.iter().all(|n| n.kind == NoticeKind::PartialRecordFailure));
    assert_eq!(
        out.notices[0].details,
        vec!["Amount: is required".to_string(), "Date: invalid value".to_string()]
    );
    assert_eq!(out.notices[1].message, "Duplicate");
}

#[test]
fn all_records_rejected_yields_absent_value() {
    let store = ScriptedStore::new(vec![Reply::Write(Response::with_results(vec![
        RecordResult::rejected("nope"),
    ]))]);
    let out = Transactions::new(&store).create(&tx(5));
    assert!(out.value.is_none());
    assert_eq!(out.notices.len(), 1);
}

#[test]
fn create_sends_name_and_created_at() {
    let store = ScriptedStore::new(vec![Reply::Write(Response::with_results(vec![
        RecordResult::accepted(record(json!({"Id": 1}))),
    ]))]);
    let _ = Transactions::new(&store).create(&tx(3));

    let calls = store.calls();
    let sent = &calls[0].records[0];
    assert_eq!(sent["Name"], json!("Lunch"));
    assert_eq!(sent["category_c"], json!("Food"));
    assert_eq!(sent["type_c"], json!("expense"));
    assert!(sent.contains_key("created_at_c"));
    assert!(!sent.contains_key("Id"));
}

#[test]
fn update_injects_id() {
    let store = ScriptedStore::new(vec![Reply::Write(Response::with_results(vec![
        RecordResult::accepted(record(json!({"Id": 4, "account_name_c": "Main"}))),
    ]))]);
    let account = BankAccount {
        account_name: "Main".into(),
        bank_name: "First".into(),
        ..BankAccount::default()
    };
    let out = BankAccounts::new(&store).update(4, &account);
    assert_eq!(out.value.map(|a| a.account_name), Some("Main".to_string()));
    let calls = store.calls();
    assert_eq!(calls[0].op, "update");
    assert_eq!(calls[0].records[0]["Id"], json!(4));
}

#[test]
fn get_by_id_missing_is_not_found() {
    let store = ScriptedStore::new(vec![Reply::One(Response {
        success: true,
        message: None,
        data: None,
        results: None,
    })]);
    let out = BankAccounts::new(&store).get_by_id(99);
    assert!(out.value.is_none());
    assert_eq!(out.notices.len(), 1);
    assert_eq!(out.notices[0].kind, NoticeKind::NotFound);
    assert_eq!(out.notices[0].message, "Bank account not found");
    assert!(!out.notices[0].is_error());
}

#[test]
fn delete_succeeds_when_store_confirms() {
    let store = ScriptedStore::new(vec![Reply::Write(Response::with_results(vec![
        RecordResult {
            success: true,
            ..RecordResult::default()
        },
    ]))]);
    let out = Transactions::new(&store).delete(3);
    assert!(out.value);
    assert!(out.is_clean());
    assert_eq!(store.calls()[0].ids, vec![3]);
}

#[test]
fn batch_delete_counts_confirmed_records() {
    let ok = RecordResult {
        success: true,
        ..RecordResult::default()
    };
    let store = ScriptedStore::new(vec![Reply::Write(Response::with_results(vec![
        ok.clone(),
        RecordResult::rejected("locked"),
        ok,
    ]))]);
    let out = Transactions::new(&store).delete_many(&[1, 2, 3]);
    assert_eq!(out.value.requested, 3);
    assert_eq!(out.value.deleted, 2);
    assert!(!out.value.is_complete());
    assert_eq!(out.notices.len(), 1);
}

#[test]
fn empty_batch_delete_makes_no_request() {
    let store = ScriptedStore::new(vec![]);
    let out = Transactions::new(&store).delete_many(&[]);
    assert!(out.value.is_complete());
    assert!(store.calls().is_empty());
}

#[test]
fn rejected_delete_envelope_is_false() {
    let store = ScriptedStore::new(vec![Reply::Write(Response::failed("forbidden"))]);
    let out = Gateway::<_, Transaction>::new(&store).delete(1);
    assert!(!out.value);
    assert_eq!(out.notices[0].kind, NoticeKind::EnvelopeFailure);
}

#[test]
fn adjust_floors_at_zero_and_sends_only_the_field() {
    let store = ScriptedStore::new(vec![
        Reply::One(Response::ok(record(json!({"Id": 5, "current_amount_c": 50})))),
        Reply::Write(Response::with_results(vec![RecordResult::accepted(record(
            json!({"Id": 5, "Name": "Trip", "current_amount_c": 0}),
        ))])),
    ]);
    let goals = smartbudget::services::SavingsGoals::new(&store);
    let out = goals.update_amount(5, Decimal::new(-80, 0));

    let goal = out.value.unwrap();
    assert_eq!(goal.current_amount, Decimal::ZERO);
    assert_eq!(goal.title, "Trip");

    let calls = store.calls();
    let selected: Vec<String> = calls[0]
        .params
        .as_ref()
        .unwrap()
        .selected_names()
        .map(str::to_string)
        .collect();
    assert_eq!(selected, vec!["Id", "current_amount_c"]);
    let patch = &calls[1].records[0];
    assert_eq!(patch.len(), 2);
    assert_eq!(patch["Id"], json!(5));
    assert_eq!(patch["current_amount_c"], json!(0.0));
}
