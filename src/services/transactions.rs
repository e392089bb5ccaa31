// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Transactions;
use crate::gateway::{Outcome, Query};
use crate::models::Transaction;
use crate::store::RecordStore;
use crate::wire::Operator;

impl<S: RecordStore + ?Sized> Transactions<'_, S> {
    /// Transactions dated in `month` (`YYYY-MM`), newest first.
    pub fn get_by_month(&self, month: &str) -> Outcome<Vec<Transaction>> {
        self.list(&Query::new().filter("date", Operator::StartsWith, month))
    }

    pub fn get_by_category(&self, category: &str) -> Outcome<Vec<Transaction>> {
        self.list(&Query::new().eq("category", category))
    }
}
