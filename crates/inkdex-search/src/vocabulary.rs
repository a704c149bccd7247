//! Interpreter vocabulary: the word lists driving intent classification.
//!
//! Kept as data rather than inline literals so the taxonomy can be extended
//! (new body parts, new trigger phrases) without touching dispatch logic.
//! The struct deserializes from JSON, so a deployment can ship its own
//! vocabulary file; `Default` carries the built-in lists.

use serde::{Deserialize, Serialize};

/// Word lists consulted by the query interpreter, in rule order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterpreterVocabulary {
    /// Words that signal a similarity search.
    pub similarity_triggers: Vec<String>,
    /// Phrases that introduce a reference path ("similar to X", "like X").
    pub reference_markers: Vec<String>,
    /// Body-part tokens recognized for categorical search.
    pub body_parts: Vec<String>,
    /// Phrases that negate tattoo presence.
    pub negation_phrases: Vec<String>,
    /// Words that introduce a folder/path fragment.
    pub path_markers: Vec<String>,
    /// Words stripped from keyword terms.
    pub stop_words: Vec<String>,
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for InterpreterVocabulary {
    fn default() -> Self {
        Self {
            similarity_triggers: strings(&["similar", "like", "resembles"]),
            reference_markers: strings(&["similar to", "like"]),
            body_parts: strings(&[
                "arm", "leg", "back", "chest", "face", "neck", "shoulder", "hand", "foot",
                "ankle", "thigh", "calf", "forearm", "wrist",
            ]),
            negation_phrases: strings(&[
                "no tattoo",
                "without tattoo",
                "non-tattoo",
                "clean skin",
            ]),
            path_markers: strings(&["folder", "directory", "path", "in"]),
            stop_words: strings(&[
                "show",
                "find",
                "search",
                "me",
                "for",
                "images",
                "with",
                "tattoo",
                "tattoos",
                "containing",
            ]),
        }
    }
}

impl InterpreterVocabulary {
    /// Canonical vocabulary entry for `token` (already lower-cased,
    /// punctuation-trimmed), if it names a known body part. Accepts a
    /// trailing plural `s`.
    pub fn canonical_body_part(&self, token: &str) -> Option<&str> {
        self.body_parts
            .iter()
            .find(|p| {
                token == p.as_str()
                    || (token.len() == p.len() + 1 && token.strip_suffix('s') == Some(p.as_str()))
            })
            .map(|p| p.as_str())
    }

    /// True when `token` is a known body part.
    pub fn is_body_part(&self, token: &str) -> bool {
        self.canonical_body_part(token).is_some()
    }

    /// True when `token` is on the stop-word list.
    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.iter().any(|w| w == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lists_are_populated() {
        let vocab = InterpreterVocabulary::default();
        assert!(vocab.body_parts.contains(&"arm".to_string()));
        assert!(vocab.body_parts.contains(&"wrist".to_string()));
        assert!(vocab.stop_words.contains(&"tattoos".to_string()));
        assert!(vocab.negation_phrases.contains(&"clean skin".to_string()));
    }

    #[test]
    fn test_body_part_plural_matching() {
        let vocab = InterpreterVocabulary::default();
        assert!(vocab.is_body_part("arm"));
        assert!(vocab.is_body_part("arms"));
        assert!(vocab.is_body_part("forearm"));
        assert!(!vocab.is_body_part("armchair"));
        assert!(!vocab.is_body_part("torso"));
    }

    #[test]
    fn test_vocabulary_deserializes_with_partial_overrides() {
        let json = r#"{ "bodyParts": ["arm", "torso"] }"#;
        let vocab: InterpreterVocabulary = serde_json::from_str(json).unwrap();
        assert!(vocab.is_body_part("torso"));
        // Unspecified lists keep their defaults
        assert!(vocab.is_stop_word("containing"));
    }
}
