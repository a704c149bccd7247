//! Rule-based query interpreter: free text in, typed search intent out.
//!
//! Classification is an ordered list of `(name, predicate/builder)` rules
//! evaluated top to bottom with no scoring or backtracking. Ordering encodes
//! precedence: similarity and body-part cues are stronger signals than the
//! generic keyword fallthrough, because a similarity phrase or body-part
//! token is rarely also a meaningful literal keyword.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use inkdex_core::{clamp_limit, defaults, SearchIntent};

use crate::vocabulary::InterpreterVocabulary;

/// Numeric-limit override: "limit 5", "show 20", "find 3", "get 10".
static LIMIT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:limit|show|find|get)\s+(\d+)\b").unwrap());

/// Filler tokens skipped between a path marker and its argument.
const ARTICLES: &[&str] = &["the", "a", "an", "my"];

/// Normalized view of one query, shared by every rule.
struct QueryContext<'a> {
    /// Lower-cased text with any limit pattern removed.
    lower: String,
    /// Punctuation-trimmed tokens, original case.
    tokens: Vec<String>,
    /// Lower-cased tokens, parallel to `tokens`.
    lower_tokens: Vec<String>,
    vocab: &'a InterpreterVocabulary,
    /// Result limit for the produced intent, already clamped.
    limit: i64,
}

fn trim_token(token: &str) -> &str {
    token.trim_matches(|c| {
        matches!(
            c,
            ',' | '.' | '!' | '?' | ';' | ':' | '"' | '\'' | '(' | ')' | '[' | ']'
        )
    })
}

impl<'a> QueryContext<'a> {
    fn new(raw: &str, vocab: &'a InterpreterVocabulary, default_limit: i64) -> Self {
        let mut limit = default_limit;
        let mut text = raw.to_string();

        if let Some(caps) = LIMIT_PATTERN.captures(raw) {
            if let Ok(n) = caps[1].parse::<i64>() {
                limit = clamp_limit(n, default_limit);
            }
            let span = caps.get(0).expect("capture 0 always present").range();
            text.replace_range(span, " ");
        }

        let tokens: Vec<String> = text
            .split_whitespace()
            .map(|t| trim_token(t).to_string())
            .filter(|t| !t.is_empty())
            .collect();
        let lower_tokens: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        Self {
            lower: text.to_lowercase(),
            tokens,
            lower_tokens,
            vocab,
            limit,
        }
    }

    /// Index of the token right after the first occurrence of `phrase`
    /// (matched as a token subsequence, case-insensitive).
    fn index_after_phrase(&self, phrase: &str) -> Option<usize> {
        let phrase_tokens: Vec<String> = phrase.split_whitespace().map(str::to_lowercase).collect();
        let n = phrase_tokens.len();
        if n == 0 || self.lower_tokens.len() < n {
            return None;
        }
        (0..=self.lower_tokens.len() - n)
            .find(|&i| self.lower_tokens[i..i + n] == phrase_tokens[..])
            .map(|i| i + n)
    }

    /// Original-case token right after `phrase`, skipping filler articles
    /// and nested markers.
    fn argument_after_phrase(&self, phrase: &str) -> Option<&str> {
        let mut idx = self.index_after_phrase(phrase)?;
        while let Some(tok) = self.lower_tokens.get(idx) {
            let is_filler = ARTICLES.contains(&tok.as_str())
                || self.vocab.path_markers.iter().any(|m| m == tok);
            if !is_filler {
                return Some(self.tokens[idx].as_str());
            }
            idx += 1;
        }
        None
    }
}

type RuleFn = fn(&QueryContext<'_>) -> Option<SearchIntent>;

/// Classification rules in precedence order. The keyword fallthrough is not
/// listed; it always matches.
const RULES: &[(&str, RuleFn)] = &[
    ("similarity", match_similarity),
    ("body_part", match_body_part),
    ("exclusion", match_exclusion),
    ("path", match_path),
];

fn looks_like_path(token: &str) -> bool {
    token.contains('/') || token.contains(':')
}

fn match_similarity(ctx: &QueryContext<'_>) -> Option<SearchIntent> {
    let triggered = ctx
        .lower_tokens
        .iter()
        .any(|t| ctx.vocab.similarity_triggers.iter().any(|s| s == t));
    if !triggered {
        return None;
    }

    let reference_path = ctx
        .vocab
        .reference_markers
        .iter()
        .filter_map(|marker| ctx.index_after_phrase(marker))
        .filter_map(|idx| ctx.tokens.get(idx))
        .find(|tok| looks_like_path(tok))
        .map(|tok| tok.to_string());

    // No resolvable reference leaves the path empty; the orchestrator turns
    // that into a clarifying response rather than running the strategy.
    Some(SearchIntent::Similarity {
        reference_path,
        image_data: None,
        limit: ctx.limit,
    })
}

fn match_body_part(ctx: &QueryContext<'_>) -> Option<SearchIntent> {
    let part = ctx
        .lower_tokens
        .iter()
        .find_map(|t| ctx.vocab.canonical_body_part(t))
        .map(|p| p.to_string())
        .or_else(|| {
            ctx.argument_after_phrase("body part")
                .map(|t| t.to_lowercase())
        })?;

    Some(SearchIntent::BodyPart {
        part,
        limit: ctx.limit,
    })
}

fn match_exclusion(ctx: &QueryContext<'_>) -> Option<SearchIntent> {
    let negated = ctx
        .vocab
        .negation_phrases
        .iter()
        .any(|phrase| ctx.lower.contains(phrase.as_str()));
    negated.then(|| SearchIntent::Exclusion { limit: ctx.limit })
}

fn match_path(ctx: &QueryContext<'_>) -> Option<SearchIntent> {
    for marker in &ctx.vocab.path_markers {
        if let Some(fragment) = ctx.argument_after_phrase(marker) {
            return Some(SearchIntent::Path {
                fragment: fragment.to_string(),
                limit: ctx.limit,
            });
        }
    }
    None
}

fn keyword_fallback(ctx: &QueryContext<'_>) -> SearchIntent {
    let term = ctx
        .tokens
        .iter()
        .zip(&ctx.lower_tokens)
        .filter(|(_, lower)| !ctx.vocab.is_stop_word(lower))
        .map(|(original, _)| original.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    SearchIntent::Keyword {
        term,
        limit: ctx.limit,
    }
}

/// Deterministic, explainable classifier over a fixed intent set.
pub struct QueryInterpreter {
    vocab: InterpreterVocabulary,
    default_limit: i64,
}

impl QueryInterpreter {
    /// Interpreter with the built-in vocabulary and chat default limit.
    pub fn new() -> Self {
        Self {
            vocab: InterpreterVocabulary::default(),
            default_limit: defaults::CHAT_LIMIT,
        }
    }

    /// Interpreter with a custom vocabulary.
    pub fn with_vocabulary(vocab: InterpreterVocabulary) -> Self {
        Self {
            vocab,
            default_limit: defaults::CHAT_LIMIT,
        }
    }

    /// Override the limit used when the text names none.
    pub fn with_default_limit(mut self, default_limit: i64) -> Self {
        self.default_limit = default_limit;
        self
    }

    /// The vocabulary in use.
    pub fn vocabulary(&self) -> &InterpreterVocabulary {
        &self.vocab
    }

    /// Classify `text` into exactly one search intent. Never fails: text
    /// matching no rule becomes a keyword intent with stop-words stripped.
    pub fn interpret(&self, text: &str) -> SearchIntent {
        let ctx = QueryContext::new(text, &self.vocab, self.default_limit);

        for (name, rule) in RULES {
            if let Some(intent) = rule(&ctx) {
                debug!(
                    subsystem = "search",
                    component = "interpreter",
                    op = "interpret",
                    rule = name,
                    strategy = %intent.strategy(),
                    "Query classified"
                );
                return intent;
            }
        }

        let intent = keyword_fallback(&ctx);
        debug!(
            subsystem = "search",
            component = "interpreter",
            op = "interpret",
            rule = "keyword",
            strategy = %intent.strategy(),
            "Query classified"
        );
        intent
    }
}

impl Default for QueryInterpreter {
    fn default() -> Self {
        Self::new()
    }
}
