//! Tool modules: trait, registry, dispatcher, and the built-in tools.

pub mod base;
pub mod dispatch;
pub mod name;
pub mod pdf;
pub mod python;
pub mod registry;
pub mod schema;
pub mod web;
pub mod wikipedia;

#[cfg(test)]
pub(crate) mod testing;

pub use base::{optional_u64, require_string, Tool, ToolArgs};
pub use name::ToolName;
pub use registry::{ToolRegistry, ToolRegistryBuilder};

/// User-Agent header sent by the HTTP-backed tools.
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_7_2) AppleWebKit/537.36 (KHTML, like Gecko)";
