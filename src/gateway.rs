// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Generic CRUD gateway over one table of the record store.
//!
//! Every operation issues one request (two for [`Gateway::upsert_by_key`]
//! and [`Gateway::adjust_numeric_field`]), translates field names through
//! the entity's [`Schema`](crate::schema::Schema), and folds every failure
//! into [`Notice`]s next to a soft value: an empty list, `None` or `false`.
//! Nothing here retries, caches or locks.

use std::fmt;
use std::marker::PhantomData;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::errors::Error;
use crate::schema::Entity;
use crate::store::RecordStore;
use crate::wire::{
    Condition, FetchParams, ID_FIELD, Operator, OrderBy, PagingInfo, Record, RecordId,
    RecordResult, Response, SortDirection, WriteResponse,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The store rejected the whole request.
    EnvelopeFailure,
    /// A batch write was accepted for some records only.
    PartialRecordFailure,
    /// A read by id came back empty.
    NotFound,
    /// The request never produced an envelope.
    TransportFailure,
}

/// A user-facing message produced by a gateway operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// Field-level messages, one per rejected field.
    pub details: Vec<String>,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind != NoticeKind::NotFound
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for d in &self.details {
            write!(f, "; {}", d)?;
        }
        Ok(())
    }
}

/// Soft value plus whatever went wrong producing it.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Outcome<T> {
    pub value: T,
    pub notices: Vec<Notice>,
}

impl<T> Outcome<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            notices: Vec::new(),
        }
    }

    fn with(value: T, notices: Vec<Notice>) -> Self {
        Self { value, notices }
    }

    pub fn is_clean(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            notices: self.notices,
        }
    }

    fn prepend(mut self, mut earlier: Vec<Notice>) -> Self {
        earlier.append(&mut self.notices);
        self.notices = earlier;
        self
    }
}

/// Result of a batch delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteSummary {
    pub requested: usize,
    pub deleted: usize,
}

impl DeleteSummary {
    /// Every requested id was removed.
    pub fn is_complete(&self) -> bool {
        self.deleted == self.requested
    }
}

/// Filter, sort and paging for [`Gateway::list`], in internal field names.
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<(String, Operator, Vec<Value>)>,
    sort: Option<(String, SortDirection)>,
    paging: Option<PagingInfo>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: &str, op: Operator, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), op, vec![value.into()]));
        self
    }

    pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.filter(field, Operator::EqualTo, value)
    }

    pub fn sort(mut self, field: &str, dir: SortDirection) -> Self {
        self.sort = Some((field.to_string(), dir));
        self
    }

    pub fn page(mut self, limit: usize, offset: usize) -> Self {
        self.paging = Some(PagingInfo { limit, offset });
        self
    }

    fn to_params<E: Entity>(&self) -> FetchParams {
        let schema = E::SCHEMA;
        let mut params = schema.selection();
        params.conditions = self
            .filters
            .iter()
            .map(|(field, op, values)| Condition {
                field_name: schema.resolve(field),
                operator: *op,
                values: values.clone(),
            })
            .collect();
        params.order_by = match &self.sort {
            Some((field, dir)) => vec![OrderBy {
                field_name: schema.resolve(field),
                sort_type: *dir,
            }],
            None => schema.default_order(),
        };
        params.paging_info = self.paging;
        params
    }
}

#[derive(Debug, Clone, Copy)]
enum Write {
    Create,
    Update,
    Delete,
}

impl Write {
    fn verb(self) -> &'static str {
        match self {
            Write::Create => "create",
            Write::Update => "update",
            Write::Delete => "delete",
        }
    }

    fn gerund(self) -> &'static str {
        match self {
            Write::Create => "creating",
            Write::Update => "updating",
            Write::Delete => "deleting",
        }
    }
}

/// Accepted records of a batch write, plus notices for the rejected ones.
struct Settled {
    accepted: Vec<RecordResult>,
    notices: Vec<Notice>,
}

/// CRUD surface for entity `E` over any [`RecordStore`].
pub struct Gateway<'s, S: ?Sized, E> {
    store: &'s S,
    _entity: PhantomData<fn() -> E>,
}

impl<S: ?Sized, E> Clone for Gateway<'_, S, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized, E> Copy for Gateway<'_, S, E> {}

fn transport_notice(action: &str, plural: &str, err: &Error) -> Notice {
    error!("Error {} {}: {}", action, plural, err);
    Notice::new(NoticeKind::TransportFailure, err.to_string())
}

fn envelope_notice<D>(env: &Response<D>, fallback: &str) -> Notice {
    let message = env.message.clone().unwrap_or_else(|| fallback.to_string());
    error!("{}", message);
    Notice::new(NoticeKind::EnvelopeFailure, message)
}

impl<'s, S, E> Gateway<'s, S, E>
where
    S: RecordStore + ?Sized,
    E: Entity,
{
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &'s S {
        self.store
    }

    fn table(&self) -> &'static str {
        E::SCHEMA.table
    }

    /// Translates records, skipping any the entity type cannot hold. Each
    /// skipped record gets a notice. Missing fields become defaults.
    fn translate_all(records: Vec<Record>) -> Outcome<Vec<E>> {
        let mut out = Outcome::new(Vec::with_capacity(records.len()));
        for r in &records {
            match E::from_record(r) {
                Ok(e) => out.value.push(e),
                Err(err) => out.notices.push(unreadable_notice::<E>(r, &err)),
            }
        }
        out
    }

    fn translate_one(record: &Record) -> Outcome<Option<E>> {
        match E::from_record(record) {
            Ok(e) => Outcome::new(Some(e)),
            Err(err) => Outcome::with(None, vec![unreadable_notice::<E>(record, &err)]),
        }
    }

    pub fn get_all(&self) -> Outcome<Vec<E>> {
        self.list(&Query::default())
    }

    pub fn list(&self, query: &Query) -> Outcome<Vec<E>> {
        let params = query.to_params::<E>();
        debug!(table = self.table(), "listing {}", E::PLURAL);
        match self.store.fetch_records(self.table(), &params) {
            Err(err) => Outcome::with(
                Vec::new(),
                vec![transport_notice("fetching", E::PLURAL, &err)],
            ),
            Ok(env) if !env.success => Outcome::with(
                Vec::new(),
                vec![envelope_notice(&env, "Failed to fetch records")],
            ),
            Ok(env) => Self::translate_all(env.data.unwrap_or_default()),
        }
    }

    pub fn get_by_id(&self, id: RecordId) -> Outcome<Option<E>> {
        let params = E::SCHEMA.selection();
        match self.store.get_record_by_id(self.table(), id, &params) {
            Err(err) => Outcome::with(
                None,
                vec![transport_notice("fetching", E::PLURAL, &err)],
            ),
            Ok(Response { data: Some(record), .. }) => Self::translate_one(&record),
            Ok(env) if !env.success => Outcome::with(
                None,
                vec![envelope_notice(&env, "Failed to fetch record")],
            ),
            Ok(_) => {
                debug!("{} {} not found", E::SINGULAR, id);
                Outcome::with(
                    None,
                    vec![Notice::new(
                        NoticeKind::NotFound,
                        format!("{} not found", E::SINGULAR),
                    )],
                )
            }
        }
    }

    /// Partitions a batch write reply. One notice per rejected record,
    /// carrying its field errors as details.
    fn settle(&self, write: Write, reply: crate::errors::Result<WriteResponse>) -> Settled {
        let env = match reply {
            Err(err) => {
                return Settled {
                    accepted: Vec::new(),
                    notices: vec![transport_notice(write.gerund(), E::PLURAL, &err)],
                };
            }
            Ok(env) => env,
        };
        if !env.success {
            return Settled {
                accepted: Vec::new(),
                notices: vec![envelope_notice(&env, "Request rejected by record store")],
            };
        }

        let (accepted, failed): (Vec<_>, Vec<_>) = env
            .results
            .unwrap_or_default()
            .into_iter()
            .partition(|r| r.success);

        if !failed.is_empty() {
            error!(
                "Failed to {} {} {}: {}",
                write.verb(),
                failed.len(),
                E::PLURAL,
                serde_json::to_string(&failed).unwrap_or_default()
            );
        }
        let notices = failed
            .into_iter()
            .map(|r| {
                let message = r.message.unwrap_or_else(|| {
                    format!("Failed to {} {}", write.verb(), E::SINGULAR.to_lowercase())
                });
                Notice {
                    kind: NoticeKind::PartialRecordFailure,
                    message,
                    details: r.errors.iter().map(ToString::to_string).collect(),
                }
            })
            .collect();
        Settled { accepted, notices }
    }

    fn first_accepted(settled: Settled) -> Outcome<Option<E>> {
        let written = settled.accepted.into_iter().next().and_then(|r| r.data);
        match written {
            Some(data) => Self::translate_one(&data).prepend(settled.notices),
            None => Outcome::with(None, settled.notices),
        }
    }

    fn encode(&self, entity: &E, action: &str) -> Result<Record, Outcome<Option<E>>> {
        entity.to_record().map_err(|err| {
            let err = Error::from(err);
            Outcome::with(None, vec![transport_notice(action, E::PLURAL, &err)])
        })
    }

    pub fn create(&self, entity: &E) -> Outcome<Option<E>> {
        let mut draft = entity.clone();
        draft.prepare_create();
        let record = match self.encode(&draft, "creating") {
            Ok(r) => r,
            Err(outcome) => return outcome,
        };
        let reply = self.store.create_records(self.table(), vec![record]);
        Self::first_accepted(self.settle(Write::Create, reply))
    }

    /// Full-record replace of `id`.
    pub fn update(&self, id: RecordId, entity: &E) -> Outcome<Option<E>> {
        let mut record = match self.encode(entity, "updating") {
            Ok(r) => r,
            Err(outcome) => return outcome,
        };
        record.insert(ID_FIELD.to_string(), Value::from(id));
        let reply = self.store.update_records(self.table(), vec![record]);
        Self::first_accepted(self.settle(Write::Update, reply))
    }

    /// Sends only the given external fields for `id`.
    fn update_partial(&self, id: RecordId, mut patch: Record) -> Outcome<Option<E>> {
        patch.insert(ID_FIELD.to_string(), Value::from(id));
        let reply = self.store.update_records(self.table(), vec![patch]);
        Self::first_accepted(self.settle(Write::Update, reply))
    }

    /// `true` when the store confirmed the record is gone.
    pub fn delete(&self, id: RecordId) -> Outcome<bool> {
        self.delete_many(&[id]).map(|s| s.deleted > 0)
    }

    pub fn delete_many(&self, ids: &[RecordId]) -> Outcome<DeleteSummary> {
        let requested = ids.len();
        if ids.is_empty() {
            return Outcome::new(DeleteSummary::default());
        }
        let reply = self.store.delete_records(self.table(), ids);
        let settled = self.settle(Write::Delete, reply);
        Outcome::with(
            DeleteSummary {
                requested,
                deleted: settled.accepted.len(),
            },
            settled.notices,
        )
    }

    /// Updates the single record whose `key_fields` equal the entity's,
    /// or creates one when there is no such record, more than one, or the
    /// lookup itself failed.
    ///
    /// Lookup and write are separate requests: two callers racing on the
    /// same key can both create.
    pub fn upsert_by_key(&self, key_fields: &[&str], entity: &E) -> Outcome<Option<E>> {
        let internal = match serde_json::to_value(entity) {
            Ok(Value::Object(map)) => map,
            Ok(_) => serde_json::Map::new(),
            Err(err) => {
                let err = Error::from(err);
                return Outcome::with(None, vec![transport_notice("upserting", E::PLURAL, &err)]);
            }
        };
        let query = key_fields.iter().fold(Query::new(), |q, field| {
            let value = internal.get(*field).cloned().unwrap_or(Value::Null);
            q.eq(field, value)
        });

        let existing = self.list(&query);
        let lookup_notices = existing.notices;
        let matches: Vec<RecordId> = existing.value.iter().filter_map(|e| e.id()).collect();

        let outcome = match matches.as_slice() {
            [id] => {
                debug!("Updating existing {} {}", E::SINGULAR.to_lowercase(), id);
                self.update(*id, entity)
            }
            found => {
                if found.len() > 1 {
                    warn!(
                        "{} records share key {:?}; creating another",
                        found.len(),
                        key_fields
                    );
                }
                self.create(entity)
            }
        };
        outcome.prepend(lookup_notices)
    }

    /// Reads one numeric field, adds `delta`, floors at zero and writes
    /// back only that field.
    ///
    /// Not atomic: a concurrent adjustment between the read and the write
    /// is lost.
    pub fn adjust_numeric_field(
        &self,
        id: RecordId,
        field: &str,
        delta: Decimal,
    ) -> Outcome<Option<E>> {
        let column = E::SCHEMA.resolve(field);
        let params = FetchParams::select([ID_FIELD.to_string(), column.clone()]);

        let current = match self.store.get_record_by_id(self.table(), id, &params) {
            Err(err) => {
                return Outcome::with(None, vec![transport_notice("fetching", E::PLURAL, &err)]);
            }
            Ok(Response { data: Some(record), .. }) => {
                record.get(&column).map(decimal_of).unwrap_or_default()
            }
            Ok(_) => {
                let message = format!("{} not found", E::SINGULAR);
                error!("{} ({})", message, id);
                return Outcome::with(None, vec![Notice::new(NoticeKind::NotFound, message)]);
            }
        };

        let next = (current + delta).max(Decimal::ZERO);
        debug!(%current, %delta, %next, "adjusting {} of {}", column, id);
        let mut patch = Record::new();
        patch.insert(column, serde_json::to_value(next).unwrap_or(Value::Null));
        self.update_partial(id, patch)
    }
}

fn unreadable_notice<E: Entity>(record: &Record, err: &serde_json::Error) -> Notice {
    let noun = E::SINGULAR.to_lowercase();
    let message = match record.get(ID_FIELD).and_then(Value::as_i64) {
        Some(id) => format!("Skipped unreadable {} record {}", noun, id),
        None => format!("Skipped unreadable {} record", noun),
    };
    warn!("{}: {}", message, err);
    Notice {
        kind: NoticeKind::PartialRecordFailure,
        message,
        details: vec![err.to_string()],
    }
}

/// Lenient numeric read: numbers, numeric strings, anything else is zero.
fn decimal_of(v: &Value) -> Decimal {
    match v {
        Value::Number(n) => n
            .to_string()
            .parse::<Decimal>()
            .ok()
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok()))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decimal_of_is_lenient() {
        assert_eq!(decimal_of(&json!(50)), Decimal::new(50, 0));
        assert_eq!(decimal_of(&json!(12.5)), Decimal::new(125, 1));
        assert_eq!(decimal_of(&json!("7.25")), Decimal::new(725, 2));
        assert_eq!(decimal_of(&json!(null)), Decimal::ZERO);
        assert_eq!(decimal_of(&json!("abc")), Decimal::ZERO);
    }

    #[test]
    fn notice_display_joins_details() {
        let n = Notice {
            kind: NoticeKind::PartialRecordFailure,
            message: "Record rejected".into(),
            details: vec!["Amount: required".into(), "Date: invalid".into()],
        };
        assert_eq!(n.to_string(), "Record rejected; Amount: required; Date: invalid");
    }

    #[test]
    fn delete_summary_completeness() {
        assert!(DeleteSummary { requested: 2, deleted: 2 }.is_complete());
        assert!(!DeleteSummary { requested: 2, deleted: 1 }.is_complete());
    }
}
