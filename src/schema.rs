// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Static per-table configuration: which external field backs which
//! internal field, and the few per-entity rules the store cannot express.

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::models::{BankAccount, Budget, Category, SavingsGoal, Transaction};
use crate::wire::{
    FetchParams, ID_FIELD, NAME_FIELD, OrderBy, Record, RecordId, SortDirection, TAGS_FIELD,
};

/// Internal (camelCase) name paired with the store's column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    pub internal: &'static str,
    pub external: &'static str,
}

const fn field(internal: &'static str, external: &'static str) -> FieldMap {
    FieldMap { internal, external }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub table: &'static str,
    pub fields: &'static [FieldMap],
    pub default_sort: Option<(&'static str, SortDirection)>,
}

impl Schema {
    pub fn external_name(&self, internal: &str) -> Option<&'static str> {
        if internal == ID_FIELD {
            return Some(ID_FIELD);
        }
        self.fields
            .iter()
            .find(|f| f.internal == internal)
            .map(|f| f.external)
    }

    /// Translates an internal name, passing unknown names through so the
    /// store can reject them.
    pub fn resolve(&self, internal: &str) -> String {
        self.external_name(internal)
            .map(str::to_string)
            .unwrap_or_else(|| internal.to_string())
    }

    /// `Id`, `Name`, then every mapped column.
    pub fn selection(&self) -> FetchParams {
        let mut names = vec![ID_FIELD, NAME_FIELD];
        names.extend(
            self.fields
                .iter()
                .map(|f| f.external)
                .filter(|e| *e != NAME_FIELD),
        );
        FetchParams::select(names)
    }

    pub fn default_order(&self) -> Vec<OrderBy> {
        self.default_sort
            .map(|(internal, dir)| OrderBy {
                field_name: self.resolve(internal),
                sort_type: dir,
            })
            .into_iter()
            .collect()
    }

    /// Internal object to store record. Nulls are left out so the store
    /// keeps its own defaults.
    pub fn to_external(&self, internal: &Map<String, Value>) -> Record {
        let mut out = Record::new();
        for f in self.fields {
            match internal.get(f.internal) {
                Some(Value::Null) | None => {}
                Some(v) => {
                    out.insert(f.external.to_string(), v.clone());
                }
            }
        }
        out
    }

    /// Store record to internal object. Fields the store left out or nulled
    /// are simply absent.
    pub fn to_internal(&self, record: &Record) -> Map<String, Value> {
        let mut out = Map::new();
        if let Some(id) = record.get(ID_FIELD).filter(|v| !v.is_null()) {
            out.insert(ID_FIELD.to_string(), id.clone());
        }
        for f in self.fields {
            match record.get(f.external) {
                Some(Value::Null) | None => {}
                Some(v) => {
                    out.insert(f.internal.to_string(), v.clone());
                }
            }
        }
        out
    }
}

/// A type stored in one table of the record store.
pub trait Entity: Serialize + DeserializeOwned + Clone + Sized {
    const SCHEMA: Schema;
    /// Plural noun used in logs and notices, e.g. "bank accounts".
    const PLURAL: &'static str;
    const SINGULAR: &'static str;

    fn id(&self) -> Option<RecordId>;

    /// Value written to the reserved `Name` column.
    fn record_name(&self) -> String;

    /// Create-time defaults the caller does not supply.
    fn prepare_create(&mut self) {}

    /// Read-time fallbacks, given the reserved `Name` column.
    fn fill_from_name(&mut self, _name: &str) {}

    fn to_record(&self) -> Result<Record, serde_json::Error> {
        let internal = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let mut record = Self::SCHEMA.to_external(&internal);
        record.insert(NAME_FIELD.to_string(), Value::String(self.record_name()));
        Ok(record)
    }

    fn from_record(record: &Record) -> Result<Self, serde_json::Error> {
        let internal = Self::SCHEMA.to_internal(record);
        let mut entity: Self = serde_json::from_value(Value::Object(internal))?;
        if let Some(name) = record.get(NAME_FIELD).and_then(Value::as_str) {
            entity.fill_from_name(name);
        }
        Ok(entity)
    }
}

impl Entity for Transaction {
    const SCHEMA: Schema = Schema {
        table: "transaction_c",
        fields: &[
            field("amount", "amount_c"),
            field("category", "category_c"),
            field("type", "type_c"),
            field("description", "description_c"),
            field("date", "date_c"),
            field("createdAt", "created_at_c"),
        ],
        default_sort: Some(("date", SortDirection::Desc)),
    };
    const PLURAL: &'static str = "transactions";
    const SINGULAR: &'static str = "Transaction";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn record_name(&self) -> String {
        if self.description.trim().is_empty() {
            "Transaction".to_string()
        } else {
            self.description.clone()
        }
    }

    fn prepare_create(&mut self) {
        self.created_at = Some(Utc::now());
    }

    fn fill_from_name(&mut self, name: &str) {
        if self.description.is_empty() {
            self.description = name.to_string();
        }
    }
}

impl Entity for Budget {
    const SCHEMA: Schema = Schema {
        table: "budget_c",
        fields: &[
            field("category", "category_c"),
            field("monthlyLimit", "monthly_limit_c"),
            field("month", "month_c"),
            field("year", "year_c"),
        ],
        default_sort: None,
    };
    const PLURAL: &'static str = "budgets";
    const SINGULAR: &'static str = "Budget";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn record_name(&self) -> String {
        format!("{} Budget", self.category)
    }
}

impl Entity for Category {
    const SCHEMA: Schema = Schema {
        table: "category_c",
        fields: &[
            field("name", "name_c"),
            field("type", "type_c"),
            field("color", "color_c"),
            field("isCustom", "is_custom_c"),
        ],
        default_sort: None,
    };
    const PLURAL: &'static str = "categories";
    const SINGULAR: &'static str = "Category";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn record_name(&self) -> String {
        self.name.clone()
    }

    fn prepare_create(&mut self) {
        self.is_custom = true;
    }

    fn fill_from_name(&mut self, name: &str) {
        if self.name.is_empty() {
            self.name = name.to_string();
        }
    }
}

impl Entity for SavingsGoal {
    const SCHEMA: Schema = Schema {
        table: "savings_goal_c",
        fields: &[
            field("title", "title_c"),
            field("targetAmount", "target_amount_c"),
            field("currentAmount", "current_amount_c"),
            field("deadline", "deadline_c"),
            field("createdAt", "created_at_c"),
        ],
        default_sort: Some(("deadline", SortDirection::Asc)),
    };
    const PLURAL: &'static str = "savings goals";
    const SINGULAR: &'static str = "Savings goal";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn record_name(&self) -> String {
        self.title.clone()
    }

    fn prepare_create(&mut self) {
        self.created_at = Some(Utc::now());
    }

    fn fill_from_name(&mut self, name: &str) {
        if self.title.is_empty() {
            self.title = name.to_string();
        }
    }
}

impl Entity for BankAccount {
    const SCHEMA: Schema = Schema {
        table: "bank_accounts_c",
        fields: &[
            field("tags", TAGS_FIELD),
            field("accountName", "account_name_c"),
            field("accountNumber", "account_number_c"),
            field("bankName", "bank_name_c"),
            field("balance", "balance_c"),
        ],
        default_sort: Some(("accountName", SortDirection::Asc)),
    };
    const PLURAL: &'static str = "bank accounts";
    const SINGULAR: &'static str = "Bank account";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn record_name(&self) -> String {
        self.account_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_starts_with_reserved_fields() {
        let params = BankAccount::SCHEMA.selection();
        let names: Vec<&str> = params.selected_names().collect();
        assert_eq!(
            names,
            vec![
                "Id",
                "Name",
                "Tags",
                "account_name_c",
                "account_number_c",
                "bank_name_c",
                "balance_c"
            ]
        );
    }

    #[test]
    fn unknown_field_passes_through() {
        assert_eq!(Budget::SCHEMA.resolve("monthlyLimit"), "monthly_limit_c");
        assert_eq!(Budget::SCHEMA.resolve("Id"), "Id");
        assert_eq!(Budget::SCHEMA.resolve("nope_c"), "nope_c");
    }
}
