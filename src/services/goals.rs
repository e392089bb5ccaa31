// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use super::SavingsGoals;
use crate::gateway::Outcome;
use crate::models::SavingsGoal;
use crate::store::RecordStore;

impl<S: RecordStore + ?Sized> SavingsGoals<'_, S> {
    /// Adds `delta` (negative to withdraw) to the saved amount. The amount
    /// never drops below zero.
    pub fn update_amount(&self, id: i64, delta: Decimal) -> Outcome<Option<SavingsGoal>> {
        self.adjust_numeric_field(id, "currentAmount", delta)
    }
}
