use crate::services::{
    prompt::tagging_prompt,
    providers::{GenerativeModel, ImageInput},
};

/// Splits a tagging response into normalised tags.
///
/// Accepts a JSON string array when the reply is bracketed and parses,
/// otherwise treats it as a comma-separated list (outer brackets dropped).
pub fn parse_tag_response(text: &str) -> Vec<String> {
    let text = text.trim().trim_matches('"').trim();

    if text.starts_with('[') && text.ends_with(']') {
        match serde_json::from_str::<Vec<String>>(text) {
            Ok(tags) => return normalise(tags.iter().map(String::as_str)),
            Err(e) => {
                tracing::debug!(error = %e, "Tag response is not a JSON array, splitting on commas");
            }
        }
    }

    normalise(
        text.trim_start_matches('[')
            .trim_end_matches(']')
            .split(','),
    )
}

fn normalise<'a>(tags: impl Iterator<Item = &'a str>) -> Vec<String> {
    tags.map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// User tags first, then generated ones; lower-cased, first occurrence wins
pub fn merge_tags(user_tags: &[String], generated: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(user_tags.len() + generated.len());

    for tag in user_tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .chain(generated.iter().cloned())
    {
        if !tag.is_empty() && !merged.contains(&tag) {
            merged.push(tag);
        }
    }

    merged
}

/// Asks the model for tags describing an image and merges them with the user's.
///
/// Any model failure falls back to the user tags unchanged.
pub async fn tag_image(
    model: &dyn GenerativeModel,
    image: &ImageInput,
    category: &str,
    name: &str,
    user_tags: &[String],
) -> Vec<String> {
    let prompt = tagging_prompt(category, name, user_tags);

    let response = match model.generate_with_image(&prompt, image).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                error = %e,
                provider = model.name(),
                name = %name,
                "Image tagging failed, keeping user tags"
            );
            return user_tags.to_vec();
        }
    };

    let generated = parse_tag_response(&response);
    let tags = merge_tags(user_tags, &generated);

    tracing::info!(
        name = %name,
        category = %category,
        user_tags = user_tags.len(),
        generated = generated.len(),
        total = tags.len(),
        "Image tagged"
    );

    tags
}
