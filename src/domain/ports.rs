use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Byte-level persistence for run artifacts such as session transcripts.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// A locally-executable function the model may call by name.
///
/// Handlers report failures through `anyhow` so ad-hoc closures can use `?`
/// freely; the session packages a failure into the conversation as an error
/// response instead of propagating it.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Wire-format name the model calls this handler by.
    fn name(&self) -> &str;

    /// Field the handler's value is reported under in the tool response.
    fn response_key(&self) -> &str {
        "result"
    }

    async fn invoke(&self, args: &Map<String, Value>) -> anyhow::Result<Value>;
}
