// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use clap::ArgMatches;

use super::{confirm, delete_report, ids_of, settle};
use crate::gateway::{Outcome, Query};
use crate::models::{EntryKind, Transaction};
use crate::services::Transactions;
use crate::store::RecordStore;
use crate::utils::{
    format_currency, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table,
};
use crate::wire::Operator;

pub fn handle<S: RecordStore + ?Sized>(store: &S, m: &ArgMatches, ccy: &str) -> Result<()> {
    let txs = Transactions::new(store);
    match m.subcommand() {
        Some(("list", sub)) => list(&txs, sub, ccy)?,
        Some(("add", sub)) => add(&txs, sub)?,
        Some(("edit", sub)) => edit(&txs, sub)?,
        Some(("rm", sub)) => {
            delete_report("Transaction", settle(txs.delete_many(&ids_of(sub))));
        }
        _ => {}
    }
    Ok(())
}

fn parse_kind(s: &str) -> Result<EntryKind> {
    s.parse::<EntryKind>().map_err(anyhow::Error::msg)
}

/// Amounts are stored as magnitudes; the type carries the direction.
fn parse_amount(s: &str) -> Result<rust_decimal::Decimal> {
    let amount = parse_decimal(s)?;
    if amount.is_zero() {
        bail!("Amount must not be zero");
    }
    Ok(amount.abs())
}

fn add<S: RecordStore + ?Sized>(txs: &Transactions<'_, S>, sub: &ArgMatches) -> Result<()> {
    let arg = |name: &str| sub.get_one::<String>(name).map(String::as_str).unwrap_or_default();
    let tx = Transaction {
        amount: parse_amount(arg("amount"))?,
        category: arg("category").trim().to_string(),
        kind: parse_kind(arg("type"))?,
        description: arg("description").trim().to_string(),
        date: Some(parse_date(arg("date"))?),
        ..Transaction::default()
    };
    if tx.category.is_empty() {
        bail!("Category is required");
    }
    confirm(&settle(txs.create(&tx)), "Transaction added successfully");
    Ok(())
}

fn edit<S: RecordStore + ?Sized>(txs: &Transactions<'_, S>, sub: &ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("missing id")?;
    let Some(mut tx) = settle(txs.get_by_id(id)) else {
        return Ok(());
    };
    if let Some(v) = sub.get_one::<String>("amount") {
        tx.amount = parse_amount(v)?;
    }
    if let Some(v) = sub.get_one::<String>("category") {
        tx.category = v.trim().to_string();
    }
    if let Some(v) = sub.get_one::<String>("type") {
        tx.kind = parse_kind(v)?;
    }
    if let Some(v) = sub.get_one::<String>("date") {
        tx.date = Some(parse_date(v)?);
    }
    if let Some(v) = sub.get_one::<String>("description") {
        tx.description = v.trim().to_string();
    }
    confirm(&settle(txs.update(id, &tx)), "Transaction updated successfully");
    Ok(())
}

fn list<S: RecordStore + ?Sized>(
    txs: &Transactions<'_, S>,
    sub: &ArgMatches,
    ccy: &str,
) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = settle(query_rows(txs, sub)?);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.map(|id| id.to_string()).unwrap_or_default(),
                    t.date.map(|d| d.to_string()).unwrap_or_default(),
                    t.kind.to_string(),
                    t.category.clone(),
                    format_currency(t.amount, ccy),
                    t.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Date", "Type", "Category", "Amount", "Description"], rows)
        );
    }
    Ok(())
}

/// Runs the `tx list` filters against the store.
pub fn query_rows<S: RecordStore + ?Sized>(
    txs: &Transactions<'_, S>,
    sub: &ArgMatches,
) -> Result<Outcome<Vec<Transaction>>> {
    let mut query = Query::new();
    if let Some(month) = sub.get_one::<String>("month") {
        query = query.filter("date", Operator::StartsWith, parse_month(month)?);
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        query = query.eq("category", cat.as_str());
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        query = query.page(*limit, 0);
    }
    Ok(txs.list(&query))
}
