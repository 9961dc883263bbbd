//! Registration-plate (kenteken) normalisation.
//!
//! The RDW datasets key every record on the plate written in upper case
//! without separators, so `41-tdk-8`, `41 TDK 8` and `41TDK8` must all end
//! up as `41TDK8`. No format validation is performed: whatever remains after
//! normalisation is sent to the provider as-is.

use std::fmt;

use serde::Serialize;

/// A normalised registration plate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Kenteken(String);

impl Kenteken {
    /// Returns the normalised plate as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Kenteken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Kenteken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalises a plate: upper case, hyphens and whitespace removed.
///
/// Total and idempotent.
#[must_use]
pub fn normalize(input: &str) -> Kenteken {
    Kenteken(
        input
            .to_uppercase()
            .chars()
            .filter(|c| *c != '-' && !c.is_whitespace())
            .collect(),
    )
}
