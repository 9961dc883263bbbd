//! The fixed set of RDW open-data datasets.
//!
//! Every dataset is a Socrata resource on `opendata.rdw.nl` that accepts a
//! `kenteken` query parameter and answers with a JSON array of records.

use std::fmt;

use serde::Serialize;

/// Base URL shared by all RDW resources.
const RDW_RESOURCE_BASE: &str = "https://opendata.rdw.nl/resource";

/// One upstream RDW dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// Gekentekende voertuigen (main registration record).
    Info,
    /// Tellerstandoordeel.
    Odometer,
    /// Brandstof.
    Fuel,
    /// Assen.
    Axles,
    /// Bijzonderheden.
    Remarks,
    /// Subcategorie voertuig.
    Subcategory,
    /// Rupsbanden.
    Tracks,
    /// Carrosserie.
    Bodywork,
    /// Carrosserie specifiek.
    BodyworkSpecific,
    /// Voertuigklasse.
    VehicleClass,
}

impl Dataset {
    /// All datasets in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Info,
        Self::Odometer,
        Self::Fuel,
        Self::Axles,
        Self::Remarks,
        Self::Subcategory,
        Self::Tracks,
        Self::Bodywork,
        Self::BodyworkSpecific,
        Self::VehicleClass,
    ];

    /// Stable dataset key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Odometer => "odometer",
            Self::Fuel => "fuel",
            Self::Axles => "axles",
            Self::Remarks => "remarks",
            Self::Subcategory => "subcategory",
            Self::Tracks => "tracks",
            Self::Bodywork => "bodywork",
            Self::BodyworkSpecific => "bodywork_specific",
            Self::VehicleClass => "vehicle_class",
        }
    }

    /// Dutch label used when the dataset appears in a combined payload.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "gekentekende_voertuigen",
            Self::Odometer => "tellerstandoordeel",
            Self::Fuel => "brandstof",
            Self::Axles => "assen",
            Self::Remarks => "bijzonderheden",
            Self::Subcategory => "subcategorie",
            Self::Tracks => "rupsbanden",
            Self::Bodywork => "carrosserie",
            Self::BodyworkSpecific => "carrosserie_specifiek",
            Self::VehicleClass => "voertuigklasse",
        }
    }

    /// Socrata resource identifier.
    const fn resource_id(self) -> &'static str {
        match self {
            Self::Info => "m9d7-ebf2",
            Self::Odometer => "jqs4-4kvw",
            Self::Fuel => "8ys7-d773",
            Self::Axles => "3huj-srit",
            Self::Remarks => "7ug8-2dtt",
            Self::Subcategory => "2ba7-embk",
            Self::Tracks => "3xwf-ince",
            Self::Bodywork => "vezc-m2t6",
            Self::BodyworkSpecific => "jhie-znh9",
            Self::VehicleClass => "kmfi-hrps",
        }
    }

    /// Full endpoint URL, without query string.
    #[must_use]
    pub fn endpoint(self) -> String {
        format!("{RDW_RESOURCE_BASE}/{}.json", self.resource_id())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
