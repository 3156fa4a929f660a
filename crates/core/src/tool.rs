//! Tool trait — the abstraction over model-callable local actions.
//!
//! A tool performs one side effect (a file download, an external-process
//! invocation) and returns a human-readable result string. The set of tools
//! is fixed and closed at startup: the registry is built once and never
//! mutated while the session runs.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::ToolError;
use crate::provider::ToolDefinition;

/// The core Tool trait.
///
/// Implementations parse their input into a strongly-typed argument struct
/// first — missing required fields must fail before any side effect begins.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "download_pdb").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's input object.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool and return its success message.
    async fn execute(
        &self,
        input: serde_json::Value,
    ) -> std::result::Result<String, ToolError>;

    /// Convert this tool into a declaration for the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// The fixed set of named actions the model may request.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool declarations (for sending to the model).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> =
            self.tools.values().map(|t| t.to_definition()).collect();
        // Deterministic declaration order regardless of map iteration.
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Look up and execute a tool by name.
    ///
    /// An unrecognized name is a configuration error surfaced as
    /// `ToolError::NotFound`; the caller decides how to render it.
    pub async fn execute(
        &self,
        name: &str,
        input: serde_json::Value,
    ) -> std::result::Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.execute(input).await
    }

    /// List all registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
