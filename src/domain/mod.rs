// Domain layer: wire-format models and ports (interfaces). No dependencies
// beyond serde and the error type.

pub mod model;
pub mod ports;
