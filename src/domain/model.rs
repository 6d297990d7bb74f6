use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for `models/{model}:generateContent`.
///
/// Serialized with snake_case keys, matching the payload files on disk;
/// camelCase spellings are accepted when reading. Absent optional sections are
/// omitted entirely rather than sent as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateContentRequest {
    #[serde(default)]
    pub contents: Vec<Content>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "generationConfig"
    )]
    pub generation_config: Option<GenerationConfig>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "systemInstruction"
    )]
    pub system_instruction: Option<Content>,
}

impl GenerateContentRequest {
    /// First text part of the first contents entry, if the shape allows.
    pub fn first_user_text(&self) -> Option<&str> {
        self.contents.first()?.first_text()
    }

    /// Follow-up request for the next loop iteration: the accumulated
    /// conversation plus this payload's original tools, generation config and
    /// system instruction.
    pub fn next_turn(&self, contents: Vec<Content>) -> Self {
        Self {
            contents,
            tools: self.tools.clone(),
            generation_config: self.generation_config.clone(),
            system_instruction: self.system_instruction.clone(),
        }
    }
}

/// One conversation entry: an optional role plus its parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, deserialize_with = "parts_one_or_many")]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        }
    }

    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: Some("model".to_string()),
            parts,
        }
    }

    pub fn tool(parts: Vec<Part>) -> Self {
        Self {
            role: Some("tool".to_string()),
            parts,
        }
    }

    pub fn first_text(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            Part::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// `system_instruction` is often written as a bare part object instead of a
/// one-element array; accept both spellings.
fn parts_one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<Part>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<Part>),
        One(Part),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(parts) => parts,
        OneOrMany::One(part) => vec![part],
    })
}

/// One part of a content entry. Part shapes this client does not model are
/// kept verbatim so they survive a round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: FunctionCall,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: FunctionResponse,
    },
    Text {
        text: String,
    },
    Other(Value),
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn function_response(name: impl Into<String>, response: Value) -> Self {
        Part::FunctionResponse {
            function_response: FunctionResponse {
                name: name.into(),
                response,
            },
        }
    }
}

/// A model-issued tool call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
}

impl FunctionCall {
    /// Argument object for execution. Absent or non-object args collapse to an
    /// empty map.
    pub fn args_object(&self) -> Map<String, Value> {
        match &self.args {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        }
    }
}

/// The reply sent back for one tool call, carried under a `"role": "tool"`
/// entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

/// Tool declaration block advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    #[serde(alias = "functionDeclarations")]
    pub function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionDeclaration {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON schema for the arguments, passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// Generation settings. The API expects camelCase keys; snake_case spellings
/// are accepted when reading. Keys this client does not model are kept in
/// `extra` and round-tripped unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "top_p")]
    pub top_p: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "top_k")]
    pub top_k: Option<u32>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "candidate_count"
    )]
    pub candidate_count: Option<u32>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "max_output_tokens"
    )]
    pub max_output_tokens: Option<u32>,

    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

/// Response body from `generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Every functionCall part across all candidates, in API order.
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| match part {
                Part::FunctionCall { function_call } => Some(function_call),
                _ => None,
            })
            .collect()
    }

    /// First text part of the first candidate, if the shape allows.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates.first()?.content.as_ref()?.first_text()
    }

    /// The first candidate's content.
    pub fn first_content(&self) -> Option<&Content> {
        self.candidates.first()?.content.as_ref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

/// Response body from `GET /v1beta/models`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<ModelInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub supported_generation_methods: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_token_limit: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_token_limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_with_snake_case_keys_and_omits_absent_sections() {
        let request = GenerateContentRequest {
            contents: vec![Content::user("Hello")],
            tools: None,
            generation_config: Some(GenerationConfig {
                temperature: Some(1.0),
                top_p: Some(1.0),
                ..GenerationConfig::default()
            }),
            system_instruction: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "Hello"}]}],
                "generation_config": {"temperature": 1.0, "topP": 1.0}
            })
        );
    }

    #[test]
    fn request_accepts_camel_case_aliases() {
        let request: GenerateContentRequest = serde_json::from_value(json!({
            "contents": [{"role": "user", "parts": [{"text": "hi"}]}],
            "generationConfig": {"temperature": 0.5, "top_p": 0.9},
            "systemInstruction": {"parts": [{"text": "Be brief."}]}
        }))
        .unwrap();

        let config = request.generation_config.unwrap();
        assert_eq!(config.temperature, Some(0.5));
        assert_eq!(config.top_p, Some(0.9));
        assert_eq!(
            request.system_instruction.unwrap().first_text(),
            Some("Be brief.")
        );
    }

    #[test]
    fn system_instruction_accepts_a_bare_part_object() {
        let request: GenerateContentRequest = serde_json::from_value(json!({
            "system_instruction": {"parts": {"text": "You are an expert travel advisor."}},
            "contents": [{"role": "user", "parts": [{"text": "hi"}]}]
        }))
        .unwrap();

        assert_eq!(
            request.system_instruction.unwrap().first_text(),
            Some("You are an expert travel advisor.")
        );
    }

    #[test]
    fn function_calls_preserve_candidate_and_part_order() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [
                    {"functionCall": {"name": "first", "args": {"word": "apple"}}},
                    {"text": "thinking"},
                    {"functionCall": {"name": "second", "args": {}}}
                ]}},
                {"content": {"role": "model", "parts": [
                    {"functionCall": {"name": "third"}}
                ]}}
            ]
        }))
        .unwrap();

        let names: Vec<&str> = response
            .function_calls()
            .iter()
            .map(|call| call.name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn first_text_skips_leading_function_call_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model", "parts": [
                {"functionCall": {"name": "noop", "args": {}}},
                {"text": "the answer"}
            ]}}]
        }))
        .unwrap();

        assert_eq!(response.first_text(), Some("the answer"));
    }

    #[test]
    fn first_text_is_none_for_empty_or_missing_content() {
        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.first_text(), None);

        let no_content: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "MAX_TOKENS"}]}))
                .unwrap();
        assert_eq!(no_content.first_text(), None);
        assert!(no_content.function_calls().is_empty());
    }

    #[test]
    fn unknown_part_shapes_round_trip_unchanged() {
        let original = json!({"inlineData": {"mimeType": "image/png", "data": "aGk="}});
        let part: Part = serde_json::from_value(original.clone()).unwrap();
        assert!(matches!(part, Part::Other(_)));
        assert_eq!(serde_json::to_value(&part).unwrap(), original);
    }

    #[test]
    fn args_object_collapses_non_objects_to_empty() {
        let with_args: FunctionCall =
            serde_json::from_value(json!({"name": "f", "args": {"word": "Zephyr"}})).unwrap();
        assert_eq!(with_args.args_object().get("word"), Some(&json!("Zephyr")));

        let without_args: FunctionCall = serde_json::from_value(json!({"name": "f"})).unwrap();
        assert!(without_args.args_object().is_empty());

        let scalar_args: FunctionCall =
            serde_json::from_value(json!({"name": "f", "args": 7})).unwrap();
        assert!(scalar_args.args_object().is_empty());
    }

    #[test]
    fn next_turn_carries_tools_config_and_instruction_from_the_original() {
        let original: GenerateContentRequest = serde_json::from_value(json!({
            "system_instruction": {"parts": [{"text": "instructions"}]},
            "contents": [{"role": "user", "parts": [{"text": "score a word"}]}],
            "tools": [{"function_declarations": [{"name": "get_min_scrabble_word_score"}]}],
            "generation_config": {"temperature": 1, "topP": 1}
        }))
        .unwrap();

        let follow_up = original.next_turn(vec![
            Content::user("score a word"),
            Content::tool(vec![Part::function_response(
                "get_min_scrabble_word_score",
                json!({"content": {"word": "Apple", "score": 9}}),
            )]),
        ]);

        assert_eq!(follow_up.contents.len(), 2);
        assert_eq!(follow_up.tools, original.tools);
        assert_eq!(follow_up.generation_config, original.generation_config);
        assert_eq!(follow_up.system_instruction, original.system_instruction);
    }

    #[test]
    fn generation_config_keeps_unmodeled_keys() {
        let config: GenerationConfig = serde_json::from_value(json!({
            "temperature": 1,
            "topP": 1,
            "responseMimeType": "text/plain"
        }))
        .unwrap();

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["responseMimeType"], json!("text/plain"));
    }

    #[test]
    fn model_list_parses_camel_case_fields() {
        let list: ModelList = serde_json::from_value(json!({
            "models": [{
                "name": "models/gemini-2.5-flash-preview-05-20",
                "displayName": "Gemini 2.5 Flash Preview",
                "supportedGenerationMethods": ["generateContent"],
                "inputTokenLimit": 1048576
            }]
        }))
        .unwrap();

        assert_eq!(list.models.len(), 1);
        assert_eq!(
            list.models[0].display_name.as_deref(),
            Some("Gemini 2.5 Flash Preview")
        );
        assert_eq!(list.models[0].input_token_limit, Some(1048576));
    }
}
