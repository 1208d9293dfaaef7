//! Turns free-text model output into a validated, wardrobe-resolved outfit.
//!
//! Nothing in the response is trusted: the JSON object is located by an
//! ordered list of extraction strategies, every field is checked for
//! presence and type, and every item id is resolved against the slot's
//! candidate list before it is used.
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::{
    error::RecommendationError,
    models::{ClothingItem, OutfitConstraints, ResolvedOutfit, Slot},
    services::wardrobe::PartitionedWardrobe,
};

const DEFAULT_NAME: &str = "Recommended Outfit";

/// A way of locating a JSON object inside model output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// The whole response is the object
    Direct,
    /// First `{` through last `}`
    GreedyBraceSpan,
    /// Each balanced `{...}` block in order, string-literal aware
    BalancedScan,
}

/// Strategies in the order they are attempted
pub const EXTRACTION_STRATEGIES: [ExtractionStrategy; 3] = [
    ExtractionStrategy::Direct,
    ExtractionStrategy::GreedyBraceSpan,
    ExtractionStrategy::BalancedScan,
];

fn greedy_span_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex is valid"))
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Top-level balanced `{...}` blocks in order, ignoring braces inside strings
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = idx;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    blocks.push(&text[start..=idx]);
                }
            }
            _ => {}
        }
    }

    blocks
}

impl ExtractionStrategy {
    /// Attempts to pull a JSON object out of `text`
    pub fn extract(&self, text: &str) -> Option<Map<String, Value>> {
        match self {
            ExtractionStrategy::Direct => parse_object(text.trim()),
            ExtractionStrategy::GreedyBraceSpan => greedy_span_regex()
                .find(text)
                .and_then(|m| parse_object(m.as_str())),
            ExtractionStrategy::BalancedScan => {
                balanced_objects(text).into_iter().find_map(parse_object)
            }
        }
    }
}

/// Runs the extraction strategies in order, stopping at the first success
pub fn extract_json_object(
    text: &str,
) -> Result<(ExtractionStrategy, Map<String, Value>), RecommendationError> {
    for strategy in EXTRACTION_STRATEGIES {
        if let Some(object) = strategy.extract(text) {
            return Ok((strategy, object));
        }
        tracing::debug!(strategy = ?strategy, "JSON extraction strategy failed");
    }

    Err(RecommendationError::MalformedRecommendation(
        "no JSON object found in model response".to_string(),
    ))
}

/// Reads `obj[slot].id` as a string.
///
/// `Ok(None)` means the slot is absent, not an object, or has no/null id.
/// Numeric ids are rendered as their decimal text.
fn slot_id(object: &Map<String, Value>, slot: Slot) -> Result<Option<String>, RecommendationError> {
    let key = slot.to_string();
    let Some(entry) = object.get(&key) else {
        return Ok(None);
    };

    let Value::Object(inner) = entry else {
        return Ok(None);
    };
    let id = inner.get("id");

    match id {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(RecommendationError::UnknownItemReference {
            slot,
            id: other.to_string(),
        }),
    }
}

/// Non-empty string field, if present
fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn resolve_required(
    object: &Map<String, Value>,
    wardrobe: &PartitionedWardrobe,
    slot: Slot,
) -> Result<ClothingItem, RecommendationError> {
    let id = slot_id(object, slot)?.ok_or_else(|| {
        RecommendationError::IncompleteRecommendation(format!("response has no {} id", slot))
    })?;

    wardrobe
        .resolve(slot, &id)
        .cloned()
        .ok_or(RecommendationError::UnknownItemReference { slot, id })
}

fn resolve_shoes(object: &Map<String, Value>, wardrobe: &PartitionedWardrobe) -> Option<ClothingItem> {
    let id = match slot_id(object, Slot::Shoes) {
        Ok(Some(id)) => id,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unusable shoes reference");
            return None;
        }
    };

    let shoes = wardrobe.resolve(Slot::Shoes, &id).cloned();
    if shoes.is_none() {
        tracing::warn!(shoes_id = %id, "Recommended shoes not in wardrobe, omitting");
    }
    shoes
}

/// Validates a parsed object and resolves its item references
pub fn resolve_outfit(
    object: &Map<String, Value>,
    wardrobe: &PartitionedWardrobe,
    constraints: &OutfitConstraints,
) -> Result<ResolvedOutfit, RecommendationError> {
    let top = resolve_required(object, wardrobe, Slot::Top)?;
    let bottom = resolve_required(object, wardrobe, Slot::Bottom)?;
    let shoes = resolve_shoes(object, wardrobe);

    Ok(ResolvedOutfit {
        name: text_field(object, "name").unwrap_or_else(|| DEFAULT_NAME.to_string()),
        description: text_field(object, "description").unwrap_or_default(),
        top,
        bottom,
        shoes,
        occasion: text_field(object, "occasion").unwrap_or_else(|| constraints.occasion.clone()),
        weather: text_field(object, "weather").unwrap_or_else(|| constraints.weather.clone()),
        season: text_field(object, "season").unwrap_or_else(|| constraints.season.clone()),
    })
}

/// Full parse: extraction, validation, resolution.
///
/// Deterministic: the same text, wardrobe and constraints always produce the
/// same result.
pub fn parse_recommendation(
    text: &str,
    wardrobe: &PartitionedWardrobe,
    constraints: &OutfitConstraints,
) -> Result<ResolvedOutfit, RecommendationError> {
    let (strategy, object) = extract_json_object(text)?;

    if strategy != ExtractionStrategy::Direct {
        tracing::info!(strategy = ?strategy, "Model response needed fallback JSON extraction");
    }

    resolve_outfit(&object, wardrobe, constraints)
}
