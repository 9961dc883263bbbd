//! Model Context Protocol (MCP) server implementation.
//!
//! This module exposes the RDW lookups as tools to an MCP client. The server
//! communicates over a newline-delimited transport (stdio by default) using
//! JSON-RPC 2.0 messages.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                          MCP Server                           │
//! │                                                               │
//! │   ┌─────────────┐    ┌─────────────┐    ┌─────────────────┐   │
//! │   │  Transport  │───▶│  Dispatch   │───▶│  ToolCatalog +  │   │
//! │   │   (stdio)   │    │  (methods)  │    │ ResultAggregator│   │
//! │   └─────────────┘    └─────────────┘    └─────────────────┘   │
//! │                                                  │            │
//! │                                                  ▼            │
//! │                                         ┌─────────────────┐   │
//! │                                         │   DataFetcher   │   │
//! │                                         │  (RDW over HTTP)│   │
//! │                                         └─────────────────┘   │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod protocol;
pub mod server;
pub mod transport;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::{Dispatch, McpServer, ToolCallResult};
pub use transport::{StdioTransport, Transport};
