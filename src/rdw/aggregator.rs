//! Turns a resolved tool and a plate into a text payload.
//!
//! Single-dataset tools perform one fetch. The aggregate tool fans out one
//! task per dataset on a [`JoinSet`] and always waits for every task; a
//! failed or empty dataset contributes an empty list rather than aborting
//! the others.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinSet;

use crate::plate::Kenteken;
use crate::rdw::catalog::{ResultShape, ToolDefinition};
use crate::rdw::dataset::Dataset;
use crate::rdw::fetcher::{DataFetcher, FetchResult};

/// Records of several datasets combined under their Dutch labels.
///
/// Serialises as `{"kenteken": ..., "<label>": [...], ...}` with the labels in
/// the tool's dataset order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedPayload {
    /// The normalised plate that was queried.
    pub kenteken: Kenteken,
    /// Records per dataset label, empty lists included.
    #[serde(flatten)]
    pub sections: IndexMap<&'static str, Vec<Value>>,
}

impl AggregatedPayload {
    /// Records stored under `label`, if that label is part of the payload.
    #[must_use]
    pub fn section(&self, label: &str) -> Option<&[Value]> {
        self.sections.get(label).map(Vec::as_slice)
    }
}

/// What a tool call resolved to, before rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// No records at all for this plate.
    NotFound(Kenteken),
    /// The first record of a unique-per-plate dataset.
    SingleRecord(Value),
    /// All records of one dataset.
    RecordList(Vec<Value>),
    /// Several datasets combined.
    Aggregate(AggregatedPayload),
}

impl ToolOutcome {
    /// Renders the outcome as the text returned to the client.
    ///
    /// Data is pretty-printed JSON with two-space indentation.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be serialised.
    pub fn render(&self, tool: &ToolDefinition) -> Result<String, serde_json::Error> {
        match self {
            Self::NotFound(kenteken) => Ok(tool.not_found_text(kenteken)),
            Self::SingleRecord(record) => serde_json::to_string_pretty(record),
            Self::RecordList(records) => serde_json::to_string_pretty(records),
            Self::Aggregate(payload) => serde_json::to_string_pretty(payload),
        }
    }
}

/// Resolves tools against a shared [`DataFetcher`].
#[derive(Clone)]
pub struct ResultAggregator {
    fetcher: Arc<dyn DataFetcher>,
}

impl ResultAggregator {
    /// Creates an aggregator over `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn DataFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetches the tool's dataset(s) for `kenteken` and shapes the result.
    pub async fn resolve_tool(&self, tool: &ToolDefinition, kenteken: &Kenteken) -> ToolOutcome {
        match tool.shape {
            ResultShape::SingleRecord | ResultShape::RecordList => {
                let Some(&dataset) = tool.datasets.first() else {
                    return ToolOutcome::NotFound(kenteken.clone());
                };
                let result = self.fetcher.fetch(dataset, kenteken).await;
                Self::shape_single(tool.shape, result, kenteken)
            }
            ResultShape::Aggregate => {
                let results = self.fetch_all(tool.datasets, kenteken).await;
                Self::combine(results, kenteken)
            }
        }
    }

    fn shape_single(shape: ResultShape, result: FetchResult, kenteken: &Kenteken) -> ToolOutcome {
        let mut records = result.records;
        if records.is_empty() {
            return ToolOutcome::NotFound(kenteken.clone());
        }

        if shape == ResultShape::SingleRecord {
            ToolOutcome::SingleRecord(records.swap_remove(0))
        } else {
            ToolOutcome::RecordList(records)
        }
    }

    fn combine(results: Vec<FetchResult>, kenteken: &Kenteken) -> ToolOutcome {
        if results.iter().all(FetchResult::is_empty) {
            return ToolOutcome::NotFound(kenteken.clone());
        }

        ToolOutcome::Aggregate(AggregatedPayload {
            kenteken: kenteken.clone(),
            sections: results
                .into_iter()
                .map(|result| (result.dataset.label(), result.records))
                .collect(),
        })
    }

    /// Fetches every dataset concurrently; results keep `datasets` order.
    async fn fetch_all(&self, datasets: &[Dataset], kenteken: &Kenteken) -> Vec<FetchResult> {
        let mut tasks = JoinSet::new();
        for (index, &dataset) in datasets.iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let kenteken = kenteken.clone();
            tasks.spawn(async move { (index, fetcher.fetch(dataset, &kenteken).await) });
        }

        // A task that dies keeps its failed placeholder.
        let mut results: Vec<FetchResult> =
            datasets.iter().map(|&d| FetchResult::failed(d)).collect();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = result,
                Err(e) => tracing::error!(error = %e, "Dataset fetch task failed"),
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Barrier;

    use super::*;
    use crate::plate::normalize;
    use crate::rdw::catalog::ToolCatalog;

    /// Canned records per dataset; `None` simulates a provider failure.
    #[derive(Default)]
    struct StaticFetcher {
        responses: HashMap<Dataset, Option<Vec<Value>>>,
        panics_on: Option<Dataset>,
        calls: Mutex<Vec<(Dataset, String)>>,
    }

    impl StaticFetcher {
        fn with(mut self, dataset: Dataset, records: Vec<Value>) -> Self {
            self.responses.insert(dataset, Some(records));
            self
        }

        fn failing(mut self, dataset: Dataset) -> Self {
            self.responses.insert(dataset, None);
            self
        }
    }

    #[async_trait]
    impl DataFetcher for StaticFetcher {
        async fn fetch(&self, dataset: Dataset, kenteken: &Kenteken) -> FetchResult {
            self.calls
                .lock()
                .unwrap()
                .push((dataset, kenteken.to_string()));
            assert!(self.panics_on != Some(dataset), "simulated fetch crash");
            match self.responses.get(&dataset) {
                Some(Some(records)) => FetchResult::success(dataset, records.clone()),
                Some(None) => FetchResult::failed(dataset),
                None => FetchResult::success(dataset, Vec::new()),
            }
        }
    }

    async fn resolve(fetcher: StaticFetcher, tool: &str, plate: &str) -> (ToolOutcome, String) {
        let catalog = ToolCatalog::new();
        let tool = catalog.resolve(tool).unwrap();
        let aggregator = ResultAggregator::new(Arc::new(fetcher));
        let outcome = aggregator.resolve_tool(tool, &normalize(plate)).await;
        let text = outcome.render(tool).unwrap();
        (outcome, text)
    }

    #[tokio::test]
    async fn single_record_exposes_first_element() {
        let fetcher = StaticFetcher::default().with(
            Dataset::Info,
            vec![json!({"kenteken": "41TDK8", "merk": "VOLKSWAGEN"}), json!({"ignored": true})],
        );

        let (outcome, text) = resolve(fetcher, "get_vehicle_info", "41-tdk-8").await;
        assert_eq!(
            outcome,
            ToolOutcome::SingleRecord(json!({"kenteken": "41TDK8", "merk": "VOLKSWAGEN"}))
        );
        assert_eq!(
            text,
            serde_json::to_string_pretty(&json!({"kenteken": "41TDK8", "merk": "VOLKSWAGEN"}))
                .unwrap()
        );
    }

    #[tokio::test]
    async fn record_list_exposes_all_elements() {
        let axles = vec![json!({"as_nummer": "1"}), json!({"as_nummer": "2"})];
        let fetcher = StaticFetcher::default().with(Dataset::Axles, axles.clone());

        let (outcome, text) = resolve(fetcher, "get_vehicle_axles", "BB943Z").await;
        assert_eq!(outcome, ToolOutcome::RecordList(axles.clone()));
        assert_eq!(text, serde_json::to_string_pretty(&axles).unwrap());
    }

    #[tokio::test]
    async fn empty_dataset_is_not_found() {
        let (outcome, text) = resolve(StaticFetcher::default(), "get_vehicle_info", "41 TDK 8").await;
        assert_eq!(outcome, ToolOutcome::NotFound(normalize("41TDK8")));
        assert_eq!(text, "Geen voertuig gevonden voor kenteken: 41TDK8");
    }

    #[tokio::test]
    async fn failed_fetch_reads_as_not_found() {
        let fetcher = StaticFetcher::default().failing(Dataset::Fuel);
        let (outcome, text) = resolve(fetcher, "get_vehicle_fuel", "41TDK8").await;
        assert_eq!(outcome, ToolOutcome::NotFound(normalize("41TDK8")));
        assert!(text.starts_with("Geen brandstofgegevens gevonden"));
    }

    #[tokio::test]
    async fn axles_not_found_carries_caveat() {
        let (_, text) = resolve(StaticFetcher::default(), "get_vehicle_axles", "41TDK8").await;
        assert!(text.contains("41TDK8"));
        assert!(text.contains("lichte personenauto's"));
    }

    #[tokio::test]
    async fn aggregate_all_empty_is_not_found() {
        let fetcher = StaticFetcher::default().failing(Dataset::VehicleClass);
        let (outcome, text) = resolve(fetcher, "get_vehicle_bodywork", "41TDK8").await;
        assert_eq!(outcome, ToolOutcome::NotFound(normalize("41TDK8")));
        assert_eq!(text, "Geen carrosserie-informatie gevonden voor kenteken: 41TDK8");
    }

    #[tokio::test]
    async fn aggregate_keeps_empty_sections() {
        let fetcher = StaticFetcher::default()
            .with(Dataset::Bodywork, vec![json!({"carrosserietype": "AB"})])
            .failing(Dataset::BodyworkSpecific);

        let (outcome, text) = resolve(fetcher, "get_vehicle_bodywork", "41-TDK-8").await;
        let ToolOutcome::Aggregate(payload) = outcome else {
            panic!("expected aggregate outcome");
        };
        assert_eq!(payload.kenteken.as_str(), "41TDK8");
        assert_eq!(payload.section("carrosserie").unwrap().len(), 1);
        assert!(payload.section("carrosserie_specifiek").unwrap().is_empty());
        assert!(payload.section("voertuigklasse").unwrap().is_empty());

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({
                "kenteken": "41TDK8",
                "carrosserie": [{"carrosserietype": "AB"}],
                "carrosserie_specifiek": [],
                "voertuigklasse": []
            })
        );
    }

    #[tokio::test]
    async fn aggregate_text_keeps_label_order() {
        let fetcher = StaticFetcher::default().with(Dataset::VehicleClass, vec![json!({"k": 1})]);
        let (_, text) = resolve(fetcher, "get_vehicle_bodywork", "41TDK8").await;

        let positions: Vec<usize> = ["\"kenteken\"", "\"carrosserie\"", "\"carrosserie_specifiek\"", "\"voertuigklasse\""]
            .iter()
            .map(|key| text.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn aggregate_queries_every_dataset_once() {
        let fetcher = Arc::new(StaticFetcher::default());
        let aggregator = ResultAggregator::new(fetcher.clone());
        let catalog = ToolCatalog::new();
        let tool = catalog.resolve("get_vehicle_bodywork").unwrap();

        aggregator.resolve_tool(tool, &normalize("41tdk8")).await;

        let mut calls = fetcher.calls.lock().unwrap().clone();
        calls.sort_by_key(|(dataset, _)| dataset.key());
        assert_eq!(
            calls,
            vec![
                (Dataset::Bodywork, "41TDK8".to_string()),
                (Dataset::BodyworkSpecific, "41TDK8".to_string()),
                (Dataset::VehicleClass, "41TDK8".to_string()),
            ]
        );
    }

    /// Holds each fetch until all of the barrier's parties are in flight.
    struct RendezvousFetcher {
        barrier: Barrier,
    }

    #[async_trait]
    impl DataFetcher for RendezvousFetcher {
        async fn fetch(&self, dataset: Dataset, _kenteken: &Kenteken) -> FetchResult {
            self.barrier.wait().await;
            FetchResult::success(dataset, vec![json!({"dataset": dataset.key()})])
        }
    }

    #[tokio::test]
    async fn aggregate_fetches_run_concurrently() {
        let fetcher = RendezvousFetcher {
            barrier: Barrier::new(3),
        };
        let aggregator = ResultAggregator::new(Arc::new(fetcher));
        let catalog = ToolCatalog::new();
        let tool = catalog.resolve("get_vehicle_bodywork").unwrap();

        // Sequential fetching never gets past the first barrier wait.
        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            aggregator.resolve_tool(tool, &normalize("41TDK8")),
        )
        .await
        .expect("bodywork datasets were not fetched concurrently");

        let ToolOutcome::Aggregate(payload) = outcome else {
            panic!("expected aggregate outcome");
        };
        assert_eq!(payload.section("carrosserie").unwrap().len(), 1);
        assert_eq!(payload.section("carrosserie_specifiek").unwrap().len(), 1);
        assert_eq!(payload.section("voertuigklasse").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn crashed_task_does_not_sink_the_others() {
        let fetcher = StaticFetcher {
            panics_on: Some(Dataset::Bodywork),
            ..StaticFetcher::default()
        }
        .with(Dataset::VehicleClass, vec![json!({"voertuigklasse": "M1"})]);

        let (outcome, _) = resolve(fetcher, "get_vehicle_bodywork", "41TDK8").await;
        let ToolOutcome::Aggregate(payload) = outcome else {
            panic!("expected aggregate outcome");
        };
        assert!(payload.section("carrosserie").unwrap().is_empty());
        assert_eq!(payload.section("voertuigklasse").unwrap().len(), 1);
    }
}
