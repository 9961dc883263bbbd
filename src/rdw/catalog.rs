//! The static tool catalog.
//!
//! Built once at startup and never mutated. The order of [`ToolCatalog::list`]
//! is the declaration order below and is part of the wire contract.

use serde::Serialize;
use serde_json::{json, Value};

use crate::plate::Kenteken;
use crate::rdw::dataset::Dataset;

/// How the records of a tool's dataset(s) are exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// Only the first record (the dataset is unique per plate).
    SingleRecord,
    /// The full record list.
    RecordList,
    /// Several datasets fetched concurrently and combined under labels.
    Aggregate,
}

/// Wording of a tool's "no data" answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NotFoundMessage {
    subject: &'static str,
    caveat: Option<&'static str>,
}

/// A tool definition, as advertised by `list_tools`.
///
/// Only `name`, `description` and `inputSchema` are serialised; the dataset
/// routing stays server-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: &'static str,
    /// Human-readable description (Dutch).
    pub description: &'static str,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
    /// Datasets queried by this tool, in payload order.
    #[serde(skip)]
    pub datasets: &'static [Dataset],
    /// How the fetched records are exposed.
    #[serde(skip)]
    pub shape: ResultShape,
    #[serde(skip)]
    not_found: NotFoundMessage,
}

impl ToolDefinition {
    fn new(
        name: &'static str,
        description: &'static str,
        datasets: &'static [Dataset],
        shape: ResultShape,
        subject: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            input_schema: kenteken_schema(),
            datasets,
            shape,
            not_found: NotFoundMessage {
                subject,
                caveat: None,
            },
        }
    }

    fn with_caveat(mut self, caveat: &'static str) -> Self {
        self.not_found.caveat = Some(caveat);
        self
    }

    /// The "no data" text for this tool.
    #[must_use]
    pub fn not_found_text(&self, kenteken: &Kenteken) -> String {
        let NotFoundMessage { subject, caveat } = self.not_found;
        match caveat {
            Some(caveat) => format!("Geen {subject} gevonden voor kenteken: {kenteken}. {caveat}"),
            None => format!("Geen {subject} gevonden voor kenteken: {kenteken}"),
        }
    }
}

fn kenteken_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "kenteken": {
                "type": "string",
                "description": "Het kenteken van het voertuig (bijv. '41TDK8', '41-TDK-8'). Tekens worden automatisch genormaliseerd."
            }
        },
        "required": ["kenteken"]
    })
}

/// Registry of every tool the server exposes.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<ToolDefinition>,
}

impl ToolCatalog {
    /// Builds the RDW tool catalog.
    #[must_use]
    pub fn new() -> Self {
        use Dataset::{
            Axles, Bodywork, BodyworkSpecific, Fuel, Info, Odometer, Remarks, Subcategory, Tracks,
            VehicleClass,
        };
        use ResultShape::{Aggregate, RecordList, SingleRecord};

        let tools = vec![
            ToolDefinition::new(
                "get_vehicle_info",
                "Haal gedetailleerde technische informatie op over een Nederlands voertuig op basis van het kenteken.",
                &[Info],
                SingleRecord,
                "voertuig",
            ),
            ToolDefinition::new(
                "get_odometer_judgment",
                "Haal het tellerstandoordeel van een Nederlands voertuig op basis van het kenteken.",
                &[Odometer],
                SingleRecord,
                "tellerstandoordeel",
            ),
            ToolDefinition::new(
                "get_vehicle_fuel",
                "Haal brandstof- en emissiegegevens op van een Nederlands voertuig op basis van het kenteken.",
                &[Fuel],
                RecordList,
                "brandstofgegevens",
            ),
            ToolDefinition::new(
                "get_vehicle_axles",
                "Haal informatie op over de assen van een voertuig op basis van het kenteken (vooral voor vrachtwagens en aanhangers).",
                &[Axles],
                RecordList,
                "as-informatie",
            )
            .with_caveat("Let op: lichte personenauto's hebben vaak geen vermelding in deze dataset."),
            ToolDefinition::new(
                "get_vehicle_remarks",
                "Haal de geregistreerde bijzonderheden van een Nederlands voertuig op basis van het kenteken.",
                &[Remarks],
                RecordList,
                "bijzonderheden",
            ),
            ToolDefinition::new(
                "get_vehicle_subcategory",
                "Haal de subcategorie van een Nederlands voertuig op basis van het kenteken.",
                &[Subcategory],
                RecordList,
                "subcategorie-informatie",
            ),
            ToolDefinition::new(
                "get_vehicle_tracks",
                "Haal informatie op over de rupsbanden van een voertuig op basis van het kenteken.",
                &[Tracks],
                RecordList,
                "rupsband-informatie",
            ),
            ToolDefinition::new(
                "get_vehicle_bodywork",
                "Haal carrosserie-informatie, specifieke carrosseriegegevens en de voertuigklasse van een Nederlands voertuig op basis van het kenteken.",
                &[Bodywork, BodyworkSpecific, VehicleClass],
                Aggregate,
                "carrosserie-informatie",
            ),
        ];

        Self { tools }
    }

    /// All tools, in declaration order.
    #[must_use]
    pub fn list(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Looks up a tool by name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|tool| tool.name == name)
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plate::normalize;

    #[test]
    fn lists_eight_tools_in_order() {
        let catalog = ToolCatalog::new();
        let names: Vec<&str> = catalog.list().iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            [
                "get_vehicle_info",
                "get_odometer_judgment",
                "get_vehicle_fuel",
                "get_vehicle_axles",
                "get_vehicle_remarks",
                "get_vehicle_subcategory",
                "get_vehicle_tracks",
                "get_vehicle_bodywork",
            ]
        );
    }

    #[test]
    fn routing_table() {
        let catalog = ToolCatalog::new();
        let route = |name: &str| {
            let tool = catalog.resolve(name).unwrap();
            (tool.datasets.to_vec(), tool.shape)
        };

        assert_eq!(route("get_vehicle_info"), (vec![Dataset::Info], ResultShape::SingleRecord));
        assert_eq!(
            route("get_odometer_judgment"),
            (vec![Dataset::Odometer], ResultShape::SingleRecord)
        );
        assert_eq!(route("get_vehicle_fuel"), (vec![Dataset::Fuel], ResultShape::RecordList));
        assert_eq!(route("get_vehicle_axles"), (vec![Dataset::Axles], ResultShape::RecordList));
        assert_eq!(
            route("get_vehicle_remarks"),
            (vec![Dataset::Remarks], ResultShape::RecordList)
        );
        assert_eq!(
            route("get_vehicle_subcategory"),
            (vec![Dataset::Subcategory], ResultShape::RecordList)
        );
        assert_eq!(route("get_vehicle_tracks"), (vec![Dataset::Tracks], ResultShape::RecordList));
        assert_eq!(
            route("get_vehicle_bodywork"),
            (
                vec![Dataset::Bodywork, Dataset::BodyworkSpecific, Dataset::VehicleClass],
                ResultShape::Aggregate
            )
        );
    }

    #[test]
    fn unknown_tool_is_not_resolved() {
        assert!(ToolCatalog::new().resolve("does_not_exist").is_none());
    }

    #[test]
    fn schemas_require_kenteken_string() {
        for tool in ToolCatalog::new().list() {
            assert_eq!(tool.input_schema["type"], "object");
            assert_eq!(tool.input_schema["properties"]["kenteken"]["type"], "string");
            assert_eq!(tool.input_schema["required"], json!(["kenteken"]));
        }
    }

    #[test]
    fn serialises_only_public_fields() {
        let catalog = ToolCatalog::new();
        let value = serde_json::to_value(catalog.resolve("get_vehicle_bodywork").unwrap()).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
        assert!(value.get("inputSchema").is_some());
        assert!(value.get("datasets").is_none());
    }

    #[test]
    fn not_found_messages() {
        let catalog = ToolCatalog::new();
        let plate = normalize("41-tdk-8");

        assert_eq!(
            catalog.resolve("get_vehicle_info").unwrap().not_found_text(&plate),
            "Geen voertuig gevonden voor kenteken: 41TDK8"
        );
        assert_eq!(
            catalog.resolve("get_vehicle_axles").unwrap().not_found_text(&plate),
            "Geen as-informatie gevonden voor kenteken: 41TDK8. Let op: lichte personenauto's hebben vaak geen vermelding in deze dataset."
        );
    }
}
