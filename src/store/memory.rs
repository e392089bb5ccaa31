// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-process record store with the hosted store's envelope behavior.
//! Backs the integration tests.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use super::RecordStore;
use crate::errors::Result;
use crate::wire::{
    Condition, FetchParams, ID_FIELD, Operator, Record, RecordId, RecordResult, Response,
    SortDirection, WriteResponse,
};

type Table = BTreeMap<RecordId, Record>;

#[derive(Default)]
struct Tables {
    next_id: RecordId,
    rows: HashMap<String, Table>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Inserts a raw record as-is (external names), returning its id.
    pub fn seed(&self, table: &str, mut record: Record) -> RecordId {
        let mut t = self.lock();
        t.next_id += 1;
        let id = t.next_id;
        record.insert(ID_FIELD.to_string(), Value::from(id));
        t.rows.entry(table.to_string()).or_default().insert(id, record);
        id
    }

    pub fn len(&self, table: &str) -> usize {
        self.lock().rows.get(table).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }

    /// Raw copy of one stored record.
    pub fn raw(&self, table: &str, id: RecordId) -> Option<Record> {
        self.lock().rows.get(table).and_then(|t| t.get(&id)).cloned()
    }
}

fn project(record: &Record, params: &FetchParams) -> Record {
    if params.fields.is_empty() {
        return record.clone();
    }
    let mut out = Record::new();
    if let Some(id) = record.get(ID_FIELD) {
        out.insert(ID_FIELD.to_string(), id.clone());
    }
    for name in params.selected_names() {
        if let Some(v) = record.get(name) {
            out.insert(name.to_string(), v.clone());
        }
    }
    out
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Less),
        (_, Value::Null) => Some(Ordering::Greater),
        _ => None,
    }
}

fn text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches(record: &Record, cond: &Condition) -> bool {
    let field = record.get(&cond.field_name).unwrap_or(&Value::Null);
    if cond.operator == Operator::NotEqualTo {
        return cond
            .values
            .iter()
            .all(|wanted| compare(field, wanted) != Some(Ordering::Equal));
    }
    cond.values.iter().any(|wanted| match cond.operator {
        Operator::EqualTo | Operator::NotEqualTo => {
            compare(field, wanted) == Some(Ordering::Equal)
        }
        Operator::StartsWith => !field.is_null() && text(field).starts_with(&text(wanted)),
        Operator::Contains => !field.is_null() && text(field).contains(&text(wanted)),
        Operator::GreaterThan => compare(field, wanted) == Some(Ordering::Greater),
        Operator::GreaterThanOrEqualTo => matches!(
            compare(field, wanted),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::LessThan => compare(field, wanted) == Some(Ordering::Less),
        Operator::LessThanOrEqualTo => matches!(
            compare(field, wanted),
            Some(Ordering::Less | Ordering::Equal)
        ),
    })
}

impl RecordStore for MemoryStore {
    fn fetch_records(&self, table: &str, params: &FetchParams) -> Result<Response<Vec<Record>>> {
        let t = self.lock();
        let mut rows: Vec<&Record> = t
            .rows
            .get(table)
            .map(|rows| {
                rows.values()
                    .filter(|r| params.conditions.iter().all(|c| matches(r, c)))
                    .collect()
            })
            .unwrap_or_default();

        for order in params.order_by.iter().rev() {
            rows.sort_by(|a, b| {
                let x = a.get(&order.field_name).unwrap_or(&Value::Null);
                let y = b.get(&order.field_name).unwrap_or(&Value::Null);
                let ord = compare(x, y).unwrap_or(Ordering::Equal);
                match order.sort_type {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let (offset, limit) = params
            .paging_info
            .map_or((0, usize::MAX), |p| (p.offset, p.limit));
        let data = rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|r| project(r, params))
            .collect();
        Ok(Response::ok(data))
    }

    fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &FetchParams,
    ) -> Result<Response<Record>> {
        let t = self.lock();
        let found = t.rows.get(table).and_then(|rows| rows.get(&id));
        Ok(match found {
            Some(r) => Response::ok(project(r, params)),
            None => Response {
                success: true,
                message: None,
                data: None,
                results: None,
            },
        })
    }

    fn create_records(&self, table: &str, records: Vec<Record>) -> Result<WriteResponse> {
        let mut t = self.lock();
        let mut results = Vec::with_capacity(records.len());
        for mut record in records {
            t.next_id += 1;
            let id = t.next_id;
            record.insert(ID_FIELD.to_string(), Value::from(id));
            t.rows
                .entry(table.to_string())
                .or_default()
                .insert(id, record.clone());
            results.push(RecordResult::accepted(record));
        }
        Ok(Response::with_results(results))
    }

    fn update_records(&self, table: &str, records: Vec<Record>) -> Result<WriteResponse> {
        let mut t = self.lock();
        let rows = t.rows.entry(table.to_string()).or_default();
        let results = records
            .into_iter()
            .map(|patch| {
                let existing = match patch.get(ID_FIELD).and_then(Value::as_i64) {
                    Some(id) => rows.get_mut(&id),
                    None => None,
                };
                match existing {
                    Some(existing) => {
                        for (k, v) in patch {
                            existing.insert(k, v);
                        }
                        RecordResult::accepted(existing.clone())
                    }
                    None => RecordResult::rejected("Record does not exist"),
                }
            })
            .collect();
        Ok(Response::with_results(results))
    }

    fn delete_records(&self, table: &str, ids: &[RecordId]) -> Result<WriteResponse> {
        let mut t = self.lock();
        let rows = t.rows.entry(table.to_string()).or_default();
        let results = ids
            .iter()
            .map(|id| match rows.remove(id) {
                Some(_) => RecordResult {
                    success: true,
                    ..RecordResult::default()
                },
                None => RecordResult::rejected(format!("Record {} does not exist", id)),
            })
            .collect();
        Ok(Response::with_results(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::OrderBy;
    use serde_json::json;

    fn rec(v: Value) -> Record {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn fetch_filters_sorts_and_pages() {
        let store = MemoryStore::new();
        for (d, a) in [("2025-01-03", 3), ("2025-02-01", 1), ("2025-01-10", 2)] {
            store.seed("t", rec(json!({"date_c": d, "amount_c": a})));
        }
        let params = FetchParams {
            conditions: vec![Condition {
                field_name: "date_c".into(),
                operator: Operator::StartsWith,
                values: vec![json!("2025-01")],
            }],
            order_by: vec![OrderBy {
                field_name: "amount_c".into(),
                sort_type: SortDirection::Desc,
            }],
            ..FetchParams::default()
        };
        let env = store.fetch_records("t", &params).unwrap();
        let amounts: Vec<i64> = env
            .data
            .unwrap()
            .iter()
            .map(|r| r["amount_c"].as_i64().unwrap())
            .collect();
        assert_eq!(amounts, vec![3, 2]);
    }

    #[test]
    fn numbers_compare_across_representations() {
        assert_eq!(compare(&json!(2024), &json!(2024.0)), Some(Ordering::Equal));
    }

    #[test]
    fn update_of_missing_record_is_rejected() {
        let store = MemoryStore::new();
        let env = store
            .update_records("t", vec![rec(json!({"Id": 9, "x": 1}))])
            .unwrap();
        let results = env.results.unwrap();
        assert!(!results[0].success);
    }
}
