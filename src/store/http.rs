// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::RecordStore;
use crate::config::AppConfig;
use crate::errors::{Error, Result};
use crate::utils::http_client;
use crate::wire::{
    DeleteRequest, FetchParams, Record, RecordId, Response, WriteRequest, WriteResponse,
};

/// Record store reached over HTTPS with project credentials in headers.
pub struct HttpStore {
    client: Client,
    base_url: String,
    project_id: String,
    public_key: String,
}

impl HttpStore {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = http_client(config.timeout())?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            public_key: config.public_key.clone(),
        })
    }

    fn records_url(&self, table: &str) -> String {
        format!("{}/tables/{}/records", self.base_url, table)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("X-Project-Id", &self.project_id)
            .header("X-Public-Key", &self.public_key)
    }

    fn send<D: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Response<D>> {
        let resp = self.authorized(req).send()?;
        let status = resp.status();
        let body = resp.text()?;
        decode_envelope(status.as_u16(), &body)
    }
}

/// Non-2xx replies that still carry an envelope are passed on as that
/// envelope; anything else is a transport error.
fn decode_envelope<D: DeserializeOwned>(status: u16, body: &str) -> Result<Response<D>> {
    match serde_json::from_str::<Response<D>>(body) {
        Ok(envelope) => Ok(envelope),
        Err(_) if !(200..300).contains(&status) => Err(Error::Status {
            status,
            body: body.chars().take(200).collect(),
        }),
        Err(e) => Err(Error::Decode(e)),
    }
}

impl RecordStore for HttpStore {
    fn fetch_records(&self, table: &str, params: &FetchParams) -> Result<Response<Vec<Record>>> {
        let url = format!("{}/query", self.records_url(table));
        debug!(%url, "fetch records");
        self.send(self.client.post(url).json(params))
    }

    fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &FetchParams,
    ) -> Result<Response<Record>> {
        let url = format!("{}/{}/query", self.records_url(table), id);
        debug!(%url, "get record");
        self.send(self.client.post(url).json(params))
    }

    fn create_records(&self, table: &str, records: Vec<Record>) -> Result<WriteResponse> {
        debug!(table, count = records.len(), "create records");
        let body = WriteRequest { records };
        self.send(self.client.post(self.records_url(table)).json(&body))
    }

    fn update_records(&self, table: &str, records: Vec<Record>) -> Result<WriteResponse> {
        debug!(table, count = records.len(), "update records");
        let body = WriteRequest { records };
        self.send(self.client.put(self.records_url(table)).json(&body))
    }

    fn delete_records(&self, table: &str, ids: &[RecordId]) -> Result<WriteResponse> {
        debug!(table, ?ids, "delete records");
        let body = DeleteRequest {
            record_ids: ids.to_vec(),
        };
        self.send(self.client.delete(self.records_url(table)).json(&body))
    }
}
