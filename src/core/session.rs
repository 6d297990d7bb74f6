use crate::api::GeminiClient;
use crate::core::registry::ToolRegistry;
use crate::domain::model::{
    Content, FunctionCall, GenerateContentRequest, GenerateContentResponse, Part,
};
use crate::utils::error::Result;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Why a session stopped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The model answered without requesting further tool calls.
    ModelCompleted,
    /// The iteration ceiling was hit while calls were still being issued.
    IterationCapReached,
    /// A request failed after at least one successful round; the last good
    /// response stands as final.
    RequestFailed { message: String },
}

/// One executed (or attempted) tool call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInvocation {
    pub name: String,
    pub args: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub duration_ms: u64,
}

/// Outcome of one bounded function-calling session.
#[derive(Debug)]
pub struct SessionReport {
    pub iterations: usize,
    pub stop: StopReason,
    pub initial_prompt: Option<String>,
    pub final_text: Option<String>,
    pub invocations: Vec<ToolInvocation>,
    pub contents: Vec<Content>,
    pub last_response: Option<GenerateContentResponse>,
    pub duration: Duration,
}

impl SessionReport {
    /// 組出存檔用的 JSON 逐字稿。
    pub fn transcript_value(&self, payload_file: Option<&str>, model: &str) -> Value {
        json!({
            "recorded_at": chrono::Utc::now().to_rfc3339(),
            "model": model,
            "payload_file": payload_file,
            "iterations": self.iterations,
            "stop": self.stop,
            "initial_prompt": self.initial_prompt,
            "final_text": self.final_text,
            "duration_ms": self.duration.as_millis() as u64,
            "tool_invocations": self.invocations,
            "contents": self.contents,
        })
    }

    /// Timestamped transcript filename.
    pub fn transcript_filename(&self) -> String {
        format!(
            "transcript-{}.json",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        )
    }
}

/// Drives the bounded function-calling conversation loop: send, extract calls,
/// execute locally, answer as the tool role, repeat.
pub struct ToolCallSession {
    client: GeminiClient,
    registry: ToolRegistry,
    max_iterations: usize,
    log_payloads: bool,
}

impl ToolCallSession {
    pub fn new(client: GeminiClient, registry: ToolRegistry) -> Self {
        Self {
            client,
            registry,
            max_iterations: 10,
            log_payloads: true,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_payload_logging(mut self, log_payloads: bool) -> Self {
        self.log_payloads = log_payloads;
        self
    }

    /// Runs the loop until the model stops calling tools, the iteration
    /// ceiling is hit, or a request fails mid-conversation. A failure on the
    /// very first request is a hard error; later failures end the session
    /// with the last good response kept.
    pub async fn run(&self, request: GenerateContentRequest) -> Result<SessionReport> {
        let started = Instant::now();
        let initial_prompt = request.first_user_text().map(str::to_string);
        let mut contents = request.contents.clone();
        let mut current = request.clone();
        let mut last_response: Option<GenerateContentResponse> = None;
        let mut invocations = Vec::new();
        let mut iterations = 0;
        let mut stop = StopReason::IterationCapReached;

        for iteration in 1..=self.max_iterations {
            info!("🔁 Iteration {} of up to {}", iteration, self.max_iterations);
            self.log_json("Request payload", &current);

            let response = match self.client.generate_content(&current).await {
                Ok(response) => response,
                Err(e) if last_response.is_some() => {
                    error!("❌ API call failed during iteration {}: {}", iteration, e);
                    stop = StopReason::RequestFailed {
                        message: e.to_string(),
                    };
                    break;
                }
                Err(e) => return Err(e),
            };

            iterations = iteration;
            self.log_json("Response payload", &response);

            let calls: Vec<FunctionCall> =
                response.function_calls().into_iter().cloned().collect();
            let model_turn = response.first_content().cloned();
            last_response = Some(response);

            if calls.is_empty() {
                info!("✅ No function calls in the latest response. Halting iteration.");
                stop = StopReason::ModelCompleted;
                break;
            }

            match model_turn {
                Some(mut content) => {
                    // 回應偶爾不帶 role,補上 model 以維持對話結構
                    if content.role.is_none() {
                        content.role = Some("model".to_string());
                    }
                    contents.push(content);
                }
                None => {
                    warn!("⚠️ Could not find the model's content part in the current response.")
                }
            }

            let parts = self.execute_calls(&calls, &mut invocations).await;
            contents.push(Content::tool(parts));

            if iteration == self.max_iterations {
                warn!("⏹️ Max iterations reached. The current response is considered final.");
                stop = StopReason::IterationCapReached;
                break;
            }

            current = request.next_turn(contents.clone());
        }

        let final_text = last_response
            .as_ref()
            .and_then(|response| response.first_text())
            .map(str::to_string);

        let report = SessionReport {
            iterations,
            stop,
            initial_prompt,
            final_text,
            invocations,
            contents,
            last_response,
            duration: started.elapsed(),
        };

        info!(
            "📊 Session ended after {} iteration(s), {} tool invocation(s), {:?}",
            report.iterations,
            report.invocations.len(),
            report.duration
        );

        Ok(report)
    }

    /// Executes every extracted call in order and packages one
    /// functionResponse part per call. Unknown names and handler failures
    /// answer the model with an `error` field instead of aborting.
    async fn execute_calls(
        &self,
        calls: &[FunctionCall],
        invocations: &mut Vec<ToolInvocation>,
    ) -> Vec<Part> {
        info!("🛠️ Executing {} extracted function call(s)", calls.len());
        let mut parts = Vec::with_capacity(calls.len());

        for call in calls {
            let args = call.args_object();
            let call_started = Instant::now();
            let mut content = args.clone();
            let mut result = None;
            let mut error = None;

            match self.registry.get(&call.name) {
                Some(handler) => match handler.invoke(&args).await {
                    Ok(value) => {
                        info!("✅ Result of local {}: {}", call.name, value);
                        content.insert(handler.response_key().to_string(), value.clone());
                        result = Some(value);
                    }
                    Err(e) => {
                        let message = format!("{:#}", e);
                        error!("❌ Error calling local {}: {}", call.name, message);
                        content.insert("error".to_string(), Value::String(message.clone()));
                        error = Some(message);
                    }
                },
                None => {
                    let message = format!("unknown function: {}", call.name);
                    warn!(
                        "⚠️ Function '{}' is not a known invokable function",
                        call.name
                    );
                    content.insert("error".to_string(), Value::String(message.clone()));
                    error = Some(message);
                }
            }

            parts.push(Part::function_response(
                call.name.clone(),
                json!({ "content": content }),
            ));

            invocations.push(ToolInvocation {
                name: call.name.clone(),
                args: Value::Object(args),
                result,
                error,
                duration_ms: call_started.elapsed().as_millis() as u64,
            });
        }

        parts
    }

    fn log_json<T: Serialize>(&self, label: &str, value: &T) {
        if self.log_payloads {
            info!("{}:\n{}", label, pretty_json(value));
        } else {
            debug!("{}:\n{}", label, pretty_json(value));
        }
    }
}

fn pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}
