use crate::domain::model::{Content, GenerateContentRequest, GenerationConfig};
use rand::Rng;

/// A system instruction paired with the prompts it can answer.
pub struct Scenario {
    pub instruction: &'static str,
    pub prompts: &'static [&'static str],
}

/// Built-in probe scenarios. Prompt text is sent as-is.
pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        instruction: "You are an expert travel advisor. You are helpful and polite.",
        prompts: &[
            "If someone tells me <<Expect cool weather when you visit>>, speaking of Seattle in May, what would the expected temperature range be?",
            "If I am visiting Seattle in June (I will be flying in), should I rent a car, or would it be better to take public transit and uber/lyft?",
        ],
    },
    Scenario {
        instruction: "You are a nutritionist. You provide matter-of-fact information, in your thorough, explanatory answers.",
        prompts: &[
            "For a given amount of protein consumption, is it better for me if I consume it earlier in the day, or later in the day? I Want to optimize for absorbtion and satiety.",
            "Should I consider an apple to be a good source of fiber? How much fiber should a healthy adult consume ddaily?",
            "About how many grams of carbohydrate does a medium sized <<Cosmic Crisp>> apple supply? About how many carbs would a normal 2500-calorie diet include?",
            "What are the macro ratios I should shoot for in my daily diet, if I'm a normal healty adult male?",
        ],
    },
];

/// Picks a scenario uniformly, then one of its prompts.
pub fn pick_scenario(rng: &mut impl Rng) -> (&'static str, &'static str) {
    let scenario = &SCENARIOS[rng.gen_range(0..SCENARIOS.len())];
    let prompt = scenario.prompts[rng.gen_range(0..scenario.prompts.len())];
    (scenario.instruction, prompt)
}

/// One-shot generation request: instruction as system_instruction, prompt as
/// the sole user turn, `temperature` and `topP` pinned to 1.
pub fn build_scenario_request(instruction: &str, prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(prompt)],
        tools: None,
        generation_config: Some(GenerationConfig {
            temperature: Some(1.0),
            top_p: Some(1.0),
            ..GenerationConfig::default()
        }),
        system_instruction: Some(Content {
            role: None,
            parts: vec![crate::domain::model::Part::text(instruction)],
        }),
    }
}
