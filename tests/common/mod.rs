// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;
use smartbudget::errors::{Error, Result};
use smartbudget::store::RecordStore;
use smartbudget::wire::{FetchParams, Record, RecordId, Response, WriteResponse};

/// Canned reply for the next store call.
pub enum Reply {
    List(Response<Vec<Record>>),
    One(Response<Record>),
    Write(WriteResponse),
    /// The request never got an envelope back.
    Down,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub op: &'static str,
    pub table: String,
    pub params: Option<FetchParams>,
    pub records: Vec<Record>,
    pub ids: Vec<RecordId>,
}

/// Store that answers from a script and records every request.
#[derive(Default)]
pub struct ScriptedStore {
    replies: RefCell<VecDeque<Reply>>,
    pub calls: RefCell<Vec<Call>>,
}

impl ScriptedStore {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn next(&self, call: Call) -> Reply {
        self.calls.borrow_mut().push(call);
        self.replies
            .borrow_mut()
            .pop_front()
            .expect("store called more often than scripted")
    }
}

fn down() -> Error {
    Error::Status {
        status: 503,
        body: "service unavailable".into(),
    }
}

fn call(op: &'static str, table: &str) -> Call {
    Call {
        op,
        table: table.to_string(),
        params: None,
        records: Vec::new(),
        ids: Vec::new(),
    }
}

impl RecordStore for ScriptedStore {
    fn fetch_records(&self, table: &str, params: &FetchParams) -> Result<Response<Vec<Record>>> {
        let c = Call {
            params: Some(params.clone()),
            ..call("fetch", table)
        };
        match self.next(c) {
            Reply::List(r) => Ok(r),
            Reply::Down => Err(down()),
            _ => panic!("fetch_records got a non-list reply"),
        }
    }

    fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &FetchParams,
    ) -> Result<Response<Record>> {
        let c = Call {
            params: Some(params.clone()),
            ids: vec![id],
            ..call("get", table)
        };
        match self.next(c) {
            Reply::One(r) => Ok(r),
            Reply::Down => Err(down()),
            _ => panic!("get_record_by_id got a non-single reply"),
        }
    }

    fn create_records(&self, table: &str, records: Vec<Record>) -> Result<WriteResponse> {
        let c = Call {
            records,
            ..call("create", table)
        };
        match self.next(c) {
            Reply::Write(r) => Ok(r),
            Reply::Down => Err(down()),
            _ => panic!("create_records got a non-write reply"),
        }
    }

    fn update_records(&self, table: &str, records: Vec<Record>) -> Result<WriteResponse> {
        let c = Call {
            records,
            ..call("update", table)
        };
        match self.next(c) {
            Reply::Write(r) => Ok(r),
            Reply::Down => Err(down()),
            _ => panic!("update_records got a non-write reply"),
        }
    }

    fn delete_records(&self, table: &str, ids: &[RecordId]) -> Result<WriteResponse> {
        let c = Call {
            ids: ids.to_vec(),
            ..call("delete", table)
        };
        match self.next(c) {
            Reply::Write(r) => Ok(r),
            Reply::Down => Err(down()),
            _ => panic!("delete_records got a non-write reply"),
        }
    }
}

pub fn record(v: Value) -> Record {
    v.as_object().cloned().expect("record must be a JSON object")
}
