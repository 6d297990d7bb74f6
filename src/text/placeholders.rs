use rand::seq::SliceRandom;
use rand::Rng;

pub const NAMES: &[&str] = &[
    "Roberto", "Blake", "Carson", "Ali", "Sundar", "Suresh", "Surpreet", "Yinbang", "Cal",
    "Maria", "David", "Aisha", "Kenji",
];

pub const PLACES: &[&str] = &[
    "Chicago, IL",
    "Seattle, WA",
    "Indianapolis, IN",
    "Pittsburgh, PA",
    "Baltimore, MD",
    "Portland, OR",
    "Portland, ME",
    "Frankfort, KY",
    "Louisville, KY",
    "Nashville, TN",
    "Raleigh, NC",
];

/// Alphabetical; deliberately mixes real words with Jabberwocky-style nonsense
/// so scoring prompts cover unknown words too.
pub const ENGLISH_WORDS: &[&str] = &[
    "Apple",
    "Boredom",
    "Borogoves",
    "Brillig",
    "Cacophony",
    "Concrete",
    "Dystopian",
    "Eledricious",
    "Ephemeral",
    "Flummox",
    "Gargantuan",
    "Gimble",
    "Gyrattable",
    "Halcyon",
    "Incandescent",
    "Juxtaposition",
    "Kaleidoscope",
    "Labyrinth",
    "Manxome",
    "Mellifluous",
    "Mimserable",
    "Nefarious",
    "Onomatopoeia",
    "Parameter",
    "Pulsameter",
    "Quintessential",
    "Quixotic",
    "Rabblerouser",
    "Serendipity",
    "Slithy",
    "Standoffish",
    "Tesseract",
    "Toves",
    "Ubiquitous",
    "Vicarious",
    "Wabe",
    "Wanderlust",
    "Xylophone",
    "Yare",
    "Zephyr",
];

/// Placeholder tokens and the word banks they draw from, applied in order.
pub const DEFAULT_REPLACEMENTS: &[(&str, &[&str])] = &[
    (":NAME", NAMES),
    (":PLACE", PLACES),
    (":ENGLISH_WORD", ENGLISH_WORDS),
];

/// Draws words without replacement; refills with a fresh shuffle once the pool
/// runs dry. Duplicates are only possible across a refill boundary.
struct ShufflePool<'a> {
    source: &'a [&'a str],
    pool: Vec<&'a str>,
}

impl<'a> ShufflePool<'a> {
    fn new(source: &'a [&'a str]) -> Self {
        Self {
            source,
            pool: Vec::new(),
        }
    }

    fn next(&mut self, rng: &mut impl Rng) -> Option<&'a str> {
        if self.pool.is_empty() {
            if self.source.is_empty() {
                return None;
            }
            self.pool = self.source.to_vec();
            self.pool.shuffle(rng);
        }
        self.pool.pop()
    }
}

/// Replaces every occurrence of each placeholder token with words drawn from
/// its bank, first occurrence first. Operates on raw text, so it can run on a
/// payload file before JSON parsing. An empty bank leaves its token in place.
pub fn replace_placeholders(
    text: &str,
    replacements: &[(&str, &[&str])],
    rng: &mut impl Rng,
) -> String {
    let mut result = text.to_string();

    for (token, bank) in replacements {
        let mut pool = ShufflePool::new(bank);
        while result.contains(token) {
            match pool.next(rng) {
                Some(word) => result = result.replacen(token, word, 1),
                None => break,
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn replaces_every_occurrence_of_known_tokens() {
        let mut rng = StdRng::seed_from_u64(7);
        let text = ":NAME is travelling from :PLACE to :PLACE to meet :NAME.";

        let result = replace_placeholders(text, DEFAULT_REPLACEMENTS, &mut rng);

        assert!(!result.contains(":NAME"));
        assert!(!result.contains(":PLACE"));
    }

    #[test]
    fn draws_are_distinct_until_the_bank_is_exhausted() {
        let bank: &[&str] = &["alpha", "beta", "gamma"];
        let replacements: &[(&str, &[&str])] = &[(":W", bank)];
        let mut rng = StdRng::seed_from_u64(42);

        let result = replace_placeholders(":W :W :W", replacements, &mut rng);

        let used: HashSet<&str> = result.split(' ').collect();
        assert_eq!(used.len(), 3, "all three words used once: {}", result);
    }

    #[test]
    fn pool_refills_after_exhaustion() {
        let bank: &[&str] = &["solo"];
        let replacements: &[(&str, &[&str])] = &[(":W", bank)];
        let mut rng = StdRng::seed_from_u64(1);

        let result = replace_placeholders(":W and :W and :W", replacements, &mut rng);

        assert_eq!(result, "solo and solo and solo");
    }

    #[test]
    fn empty_bank_leaves_the_token_in_place() {
        let replacements: &[(&str, &[&str])] = &[(":W", &[])];
        let mut rng = StdRng::seed_from_u64(1);

        let result = replace_placeholders("keep :W here", replacements, &mut rng);

        assert_eq!(result, "keep :W here");
    }

    #[test]
    fn unknown_tokens_are_untouched() {
        let mut rng = StdRng::seed_from_u64(1);

        let result = replace_placeholders(":UNKNOWN stays", DEFAULT_REPLACEMENTS, &mut rng);

        assert_eq!(result, ":UNKNOWN stays");
    }

    #[test]
    fn substitution_is_plain_text_rewriting() {
        let bank: &[&str] = &["Apple"];
        let replacements: &[(&str, &[&str])] = &[(":ENGLISH_WORD", bank)];
        let mut rng = StdRng::seed_from_u64(1);

        let raw = r#"{"text": "What is the score for ':ENGLISH_WORD'?"}"#;
        let result = replace_placeholders(raw, replacements, &mut rng);

        assert_eq!(result, r#"{"text": "What is the score for 'Apple'?"}"#);
        assert!(serde_json::from_str::<serde_json::Value>(&result).is_ok());
    }
}
