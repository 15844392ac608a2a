//! Tool Registry — immutable table of the tools offered to the model.
//!
//! Built once through [`ToolRegistryBuilder`] (or [`ToolRegistry::builtin`])
//! and shared read-only afterwards, typically behind an `Arc`. Each tool's
//! parameter schema is compiled at registration.

use std::collections::BTreeMap;
use std::sync::Arc;

use neochat_core::config::schema::ToolsConfig;
use neochat_core::types::ToolDefinition;
use tracing::{error, info, warn};

use super::base::Tool;
use super::name::ToolName;
use super::pdf::ParsePdfTool;
use super::python::PythonTool;
use super::schema::ArgumentValidator;
use super::web::{BrowseWebTool, SearchWebTool};
use super::wikipedia::WikipediaSummaryTool;

// ─────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────

/// Stores tools keyed by [`ToolName`]. There is no way to add or remove a
/// tool once the registry is built.
pub struct ToolRegistry {
    tools: BTreeMap<ToolName, RegisteredTool>,
}

/// A tool together with its compiled parameter schema.
struct RegisteredTool {
    tool: Arc<dyn Tool>,
    arguments: ArgumentValidator,
}

impl ToolRegistry {
    /// Start building a registry.
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Registry holding all five built-in tools.
    pub fn builtin(config: &ToolsConfig) -> Self {
        Self::builder()
            .register(Arc::new(WikipediaSummaryTool::new(&config.wikipedia)))
            .register(Arc::new(PythonTool::new(&config.python)))
            .register(Arc::new(BrowseWebTool::new(&config.web)))
            .register(Arc::new(SearchWebTool::new(&config.search)))
            .register(Arc::new(ParsePdfTool::new(&config.pdf)))
            .build()
    }

    /// Look up a tool by identifier.
    pub fn get(&self, name: ToolName) -> Option<&Arc<dyn Tool>> {
        self.tools.get(&name).map(|entry| &entry.tool)
    }

    /// Look up a tool by the raw name the model sent.
    pub fn lookup(&self, raw: &str) -> Option<&Arc<dyn Tool>> {
        self.resolve(raw).map(|(tool, _)| tool)
    }

    /// Look up a tool and its argument validator by the raw name.
    pub(crate) fn resolve(&self, raw: &str) -> Option<(&Arc<dyn Tool>, &ArgumentValidator)> {
        let name = raw.parse::<ToolName>().ok()?;
        self.tools
            .get(&name)
            .map(|entry| (&entry.tool, &entry.arguments))
    }

    /// Check if a tool is registered.
    pub fn has(&self, name: ToolName) -> bool {
        self.tools.contains_key(&name)
    }

    /// Names of all registered tools, in declaration order.
    pub fn tool_names(&self) -> Vec<ToolName> {
        self.tools.keys().copied().collect()
    }

    /// Get the LLM-facing definitions for all registered tools.
    pub fn get_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|entry| entry.tool.to_definition())
            .collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// ─────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────

/// Collects tools before the registry is frozen.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: BTreeMap<ToolName, RegisteredTool>,
}

impl ToolRegistryBuilder {
    /// Register a tool. A later registration under the same name wins.
    ///
    /// A tool whose parameter schema does not compile is left out, so the
    /// model is never offered a tool whose calls could not be validated.
    pub fn register(mut self, tool: Arc<dyn Tool>) -> Self {
        let name = tool.name();
        let arguments = match ArgumentValidator::compile(&tool.parameters()) {
            Ok(arguments) => arguments,
            Err(e) => {
                error!(tool = %name, error = %e, "skipping tool with a broken parameter schema");
                return self;
            }
        };
        if self
            .tools
            .insert(name, RegisteredTool { tool, arguments })
            .is_some()
        {
            warn!(tool = %name, "tool registered twice, keeping the latest");
        } else {
            info!(tool = %name, "registered tool");
        }
        self
    }

    pub fn build(self) -> ToolRegistry {
        ToolRegistry { tools: self.tools }
    }
}
