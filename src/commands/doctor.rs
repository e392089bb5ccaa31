// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use rust_decimal::Decimal;

use super::settle;
use crate::models::{Budget, Category, SavingsGoal, Transaction};
use crate::services::{Budgets, Categories, SavingsGoals, Transactions};
use crate::store::RecordStore;
use crate::utils::pretty_table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub code: &'static str,
    pub detail: String,
}

fn issue(code: &'static str, detail: String) -> Issue {
    Issue { code, detail }
}

pub fn handle<S: RecordStore + ?Sized>(store: &S) -> Result<()> {
    let txs = settle(Transactions::new(store).get_all());
    let budgets = settle(Budgets::new(store).get_all());
    let categories = settle(Categories::new(store).get_all());
    let goals = settle(SavingsGoals::new(store).get_all());

    let issues = find_issues(&txs, &budgets, &categories, &goals);
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.code.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn find_issues(
    txs: &[Transaction],
    budgets: &[Budget],
    categories: &[Category],
    goals: &[SavingsGoal],
) -> Vec<Issue> {
    let mut out = Vec::new();

    // 1) Budgets sharing a key; upsert cannot prevent these
    let mut by_key: BTreeMap<(&str, &str, i32), Vec<String>> = BTreeMap::new();
    for b in budgets {
        by_key
            .entry((b.category.as_str(), b.month.as_str(), b.year))
            .or_default()
            .push(b.id.map(|id| id.to_string()).unwrap_or_else(|| "?".into()));
    }
    for ((cat, month, year), ids) in by_key {
        if ids.len() > 1 {
            out.push(issue(
                "duplicate_budget",
                format!("{} {} ({}): ids {}", cat, month, year, ids.join(", ")),
            ));
        }
    }

    // 2) Transactions pointing at a category that does not exist
    let known: HashSet<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    for t in txs {
        if !t.category.is_empty() && !known.contains(t.category.as_str()) {
            out.push(issue(
                "unknown_category",
                format!("transaction {}: '{}'", label(t.id), t.category),
            ));
        }
    }

    // 3) Amounts are magnitudes; a negative one contradicts the type
    for t in txs.iter().filter(|t| t.amount < Decimal::ZERO) {
        out.push(issue(
            "amount_sign",
            format!("transaction {}: {} of {}", label(t.id), t.kind, t.amount),
        ));
    }

    // 4) Goals below zero
    for g in goals.iter().filter(|g| g.current_amount < Decimal::ZERO) {
        out.push(issue(
            "negative_goal",
            format!("goal {} '{}': {}", label(g.id), g.title, g.current_amount),
        ));
    }

    out
}

fn label(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "?".into())
}
