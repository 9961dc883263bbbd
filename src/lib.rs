//! rdw-vehicle-mcp: MCP server for Dutch vehicle-registry (RDW) lookups
//!
//! This library exposes the RDW open-data datasets as MCP tools. Every tool
//! takes a registration plate (`kenteken`), queries one or more fixed RDW
//! endpoints and answers with a single text payload.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Error types
//! - [`mcp`]: MCP protocol implementation
//! - [`plate`]: Registration-plate normalisation
//! - [`rdw`]: Datasets, fetching, the tool catalog and result aggregation

pub mod config;
pub mod error;
pub mod mcp;
pub mod plate;
pub mod rdw;
