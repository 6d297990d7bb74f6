pub mod registry;
pub mod session;

pub use crate::domain::model::{
    Content, FunctionCall, GenerateContentRequest, GenerateContentResponse, Part,
};
pub use crate::domain::ports::{Storage, ToolHandler};
pub use crate::utils::error::Result;
