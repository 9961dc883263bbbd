//! Shared test fixtures.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use rdw_vehicle_mcp::mcp::{McpServer, Transport};
use rdw_vehicle_mcp::plate::Kenteken;
use rdw_vehicle_mcp::rdw::{DataFetcher, Dataset, FetchResult};

/// In-memory data provider.
///
/// Datasets without canned records answer with an empty list; datasets
/// marked as failing answer like an unreachable provider.
#[derive(Default)]
pub struct FakeRdw {
    records: HashMap<Dataset, Vec<Value>>,
    failing: Vec<Dataset>,
    calls: Mutex<Vec<(Dataset, String)>>,
}

impl FakeRdw {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, dataset: Dataset, records: Vec<Value>) -> Self {
        self.records.insert(dataset, records);
        self
    }

    pub fn failing(mut self, dataset: Dataset) -> Self {
        self.failing.push(dataset);
        self
    }

    pub fn calls(&self) -> Vec<(Dataset, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataFetcher for FakeRdw {
    async fn fetch(&self, dataset: Dataset, kenteken: &Kenteken) -> FetchResult {
        self.calls
            .lock()
            .unwrap()
            .push((dataset, kenteken.to_string()));

        if self.failing.contains(&dataset) {
            return FetchResult::failed(dataset);
        }
        FetchResult::success(dataset, self.records.get(&dataset).cloned().unwrap_or_default())
    }
}

pub fn server(fake: FakeRdw) -> (McpServer, Arc<FakeRdw>) {
    let fake = Arc::new(fake);
    (McpServer::new(fake.clone()), fake)
}

/// Feeds `input` through a full session and returns the response lines.
pub async fn run_session(server: &McpServer, input: &str) -> Vec<Value> {
    let mut transport = Transport::new(input.as_bytes(), Vec::new());
    server.serve(&mut transport).await.unwrap();

    let (_, output) = transport.into_inner();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// The text of the first content item of a `call_tool` response.
pub fn content_text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}
