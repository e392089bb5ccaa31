// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use super::Budgets;
use crate::gateway::{Outcome, Query};
use crate::models::Budget;
use crate::store::RecordStore;

/// Fields that identify a budget; the store itself does not enforce them.
pub const BUDGET_KEY: [&str; 3] = ["category", "month", "year"];

impl<S: RecordStore + ?Sized> Budgets<'_, S> {
    pub fn get_by_month(&self, month: &str) -> Outcome<Vec<Budget>> {
        self.list(&Query::new().eq("month", month))
    }

    /// Sets the limit for (category, month, year), creating the budget if
    /// none exists yet.
    pub fn upsert_budget(
        &self,
        category: &str,
        monthly_limit: Decimal,
        month: &str,
        year: i32,
    ) -> Outcome<Option<Budget>> {
        let budget = Budget {
            id: None,
            category: category.to_string(),
            monthly_limit,
            month: month.to_string(),
            year,
        };
        self.upsert_by_key(&BUDGET_KEY, &budget)
    }
}
