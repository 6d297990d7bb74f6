pub mod scrabble;

use crate::core::registry::ToolRegistry;
use std::sync::Arc;

/// Registry preloaded with every built-in tool.
pub fn builtin_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(scrabble::ScrabbleScore));
    registry
}
