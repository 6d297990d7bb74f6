use crate::domain::ports::ToolHandler;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Callback signature for tools registered from plain closures.
pub type ToolFn = dyn Fn(&Map<String, Value>) -> anyhow::Result<Value> + Send + Sync;

/// Adapts a closure into a [`ToolHandler`].
pub struct FnTool {
    name: String,
    response_key: String,
    callback: Box<ToolFn>,
}

impl FnTool {
    pub fn new(
        name: impl Into<String>,
        response_key: impl Into<String>,
        callback: impl Fn(&Map<String, Value>) -> anyhow::Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            response_key: response_key.into(),
            callback: Box::new(callback),
        }
    }
}

#[async_trait]
impl ToolHandler for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn response_key(&self) -> &str {
        &self.response_key
    }

    async fn invoke(&self, args: &Map<String, Value>) -> anyhow::Result<Value> {
        (self.callback)(args)
    }
}

/// Locally-executable functions, keyed by the wire-format name the model
/// calls them by.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under its own name, replacing any previous handler
    /// with that name.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        tracing::debug!("🔧 Registered tool: {}", handler.name());
        self.handlers.insert(handler.name().to_string(), handler);
    }

    /// Registers a closure-backed tool.
    pub fn register_fn(
        &mut self,
        name: impl Into<String>,
        response_key: impl Into<String>,
        callback: impl Fn(&Map<String, Value>) -> anyhow::Result<Value> + Send + Sync + 'static,
    ) {
        self.register(Arc::new(FnTool::new(name, response_key, callback)));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted for stable display.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
