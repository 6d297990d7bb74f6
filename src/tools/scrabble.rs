use crate::domain::ports::ToolHandler;
use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::{json, Map, Value};

/// Standard Scrabble tile values; unlisted ASCII characters score 0.
fn letter_value(letter: char) -> u32 {
    match letter {
        'A' | 'E' | 'I' | 'L' | 'N' | 'O' | 'R' | 'S' | 'T' | 'U' => 1,
        'D' | 'G' => 2,
        'B' | 'C' | 'M' | 'P' => 3,
        'F' | 'H' | 'V' | 'W' | 'Y' => 4,
        'K' => 5,
        'J' | 'X' => 8,
        'Q' | 'Z' => 10,
        _ => 0,
    }
}

/// Scores a word with standard Scrabble tile values, case-insensitively.
/// Any non-ASCII character makes the whole score 0. Words longer than 9
/// characters earn one bonus point per extra character.
pub fn word_score(word: &str) -> u32 {
    let mut score = 0;
    let mut length = 0;

    for ch in word.chars() {
        if !ch.is_ascii() {
            return 0;
        }
        score += letter_value(ch.to_ascii_uppercase());
        length += 1;
    }

    if length > 9 {
        score += length - 9;
    }

    score
}

/// Word-scoring tool callable by the model.
pub struct ScrabbleScore;

#[async_trait]
impl ToolHandler for ScrabbleScore {
    fn name(&self) -> &str {
        "get_min_scrabble_word_score"
    }

    fn response_key(&self) -> &str {
        "score"
    }

    async fn invoke(&self, args: &Map<String, Value>) -> anyhow::Result<Value> {
        let word = args
            .get("word")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("missing required string argument 'word'"))?;
        Ok(json!(word_score(word)))
    }
}
