// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Categories;
use crate::gateway::{Outcome, Query};
use crate::models::{Category, EntryKind};
use crate::store::RecordStore;

impl<S: RecordStore + ?Sized> Categories<'_, S> {
    pub fn get_by_type(&self, kind: EntryKind) -> Outcome<Vec<Category>> {
        self.list(&Query::new().eq("type", kind.as_str()))
    }
}
