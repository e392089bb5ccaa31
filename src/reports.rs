// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregations behind the dashboard and reports pages. Pure functions over
//! data that has already been fetched.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Budget, EntryKind, SavingsGoal, Transaction};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// `part / whole` in percent, two decimals. Saturates at `Decimal::MAX`
/// (or `MIN` for a negative ratio) when the result does not fit.
fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    match part.checked_div(whole).and_then(|r| r.checked_mul(HUNDRED)) {
        Some(p) => p.round_dp(2),
        None if part.is_sign_negative() != whole.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

fn month_of(t: &Transaction) -> Option<String> {
    t.date.map(|d| d.format("%Y-%m").to_string())
}

/// Expenses are counted by magnitude whatever sign the caller stored.
fn expense_amount(t: &Transaction) -> Decimal {
    t.amount.abs()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCashflow {
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Income and expense per `YYYY-MM`, newest month first. Undated
/// transactions are left out.
pub fn cashflow(transactions: &[Transaction], months: Option<usize>) -> Vec<MonthlyCashflow> {
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions {
        let Some(m) = month_of(t) else { continue };
        let entry = map.entry(m).or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.kind {
            EntryKind::Income => entry.0 += t.amount.abs(),
            EntryKind::Expense => entry.1 += expense_amount(t),
        }
    }
    map.into_iter()
        .rev()
        .take(months.unwrap_or(usize::MAX))
        .map(|(month, (income, expense))| MonthlyCashflow {
            month,
            income,
            expense,
            net: income - expense,
        })
        .collect()
}

/// Expense totals per category for `month`, largest first.
pub fn spending_by_category(transactions: &[Transaction], month: &str) -> Vec<(String, Decimal)> {
    let mut agg: HashMap<String, Decimal> = HashMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.kind == EntryKind::Expense && month_of(t).as_deref() == Some(month))
    {
        let cat = if t.category.trim().is_empty() {
            "(uncategorized)".to_string()
        } else {
            t.category.clone()
        };
        *agg.entry(cat).or_insert(Decimal::ZERO) += expense_amount(t);
    }
    let mut items: Vec<_> = agg.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    /// Share of the limit used, in percent, two decimals.
    pub percent_used: Decimal,
    pub over_budget: bool,
}

/// Each budget of `month` against the expenses recorded in that month.
pub fn budget_status(
    budgets: &[Budget],
    transactions: &[Transaction],
    month: &str,
) -> Vec<BudgetStatus> {
    let spent = spending_by_category(transactions, month);
    let mut out: Vec<BudgetStatus> = budgets
        .iter()
        .filter(|b| b.month == month)
        .map(|b| {
            let used = spent
                .iter()
                .find(|(cat, _)| cat == &b.category)
                .map_or(Decimal::ZERO, |(_, amt)| *amt);
            let percent_used = if b.monthly_limit.is_zero() {
                if used.is_zero() { Decimal::ZERO } else { HUNDRED }
            } else {
                percent_of(used, b.monthly_limit)
            };
            BudgetStatus {
                category: b.category.clone(),
                limit: b.monthly_limit,
                spent: used,
                remaining: b.monthly_limit - used,
                percent_used,
                over_budget: used > b.monthly_limit,
            }
        })
        .collect();
    out.sort_by(|a, b| a.category.cmp(&b.category));
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub title: String,
    pub percent: Decimal,
    pub remaining: Decimal,
    pub days_left: Option<i64>,
    pub reached: bool,
}

pub fn goal_progress(goal: &SavingsGoal, today: NaiveDate) -> GoalProgress {
    let percent = if goal.target_amount <= Decimal::ZERO {
        HUNDRED
    } else {
        percent_of(goal.current_amount, goal.target_amount).min(HUNDRED)
    };
    let remaining = (goal.target_amount - goal.current_amount).max(Decimal::ZERO);
    GoalProgress {
        title: goal.title.clone(),
        percent,
        remaining,
        days_left: goal.deadline.map(|d| (d - today).num_days()),
        reached: goal.current_amount >= goal.target_amount,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_balance: Decimal,
    pub month_income: Decimal,
    pub month_expense: Decimal,
    pub month_net: Decimal,
    /// Net as a percent of income; zero without income.
    pub savings_rate: Decimal,
}

pub fn dashboard_summary(
    total_balance: Decimal,
    transactions: &[Transaction],
    month: &str,
) -> DashboardSummary {
    let this_month = cashflow(transactions, None)
        .into_iter()
        .find(|c| c.month == month);
    let (income, expense) = this_month.map_or((Decimal::ZERO, Decimal::ZERO), |c| {
        (c.income, c.expense)
    });
    let net = income - expense;
    let savings_rate = if income.is_zero() {
        Decimal::ZERO
    } else {
        percent_of(net, income)
    };
    DashboardSummary {
        total_balance,
        month_income: income,
        month_expense: expense,
        month_net: net,
        savings_rate,
    }
}
