// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transport seam between the gateway and the hosted record store.

pub mod http;
pub mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

use crate::errors::Result;
use crate::wire::{FetchParams, Record, RecordId, Response, WriteResponse};

/// The five calls the hosted store understands.
///
/// `Err` means the request itself failed (network, timeout, undecodable
/// reply). A reply with `success: false` is still `Ok`.
pub trait RecordStore {
    fn fetch_records(&self, table: &str, params: &FetchParams) -> Result<Response<Vec<Record>>>;

    fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &FetchParams,
    ) -> Result<Response<Record>>;

    fn create_records(&self, table: &str, records: Vec<Record>) -> Result<WriteResponse>;

    fn update_records(&self, table: &str, records: Vec<Record>) -> Result<WriteResponse>;

    fn delete_records(&self, table: &str, ids: &[RecordId]) -> Result<WriteResponse>;
}
