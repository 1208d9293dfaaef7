use std::fmt::Write as _;

use crate::{
    models::{ClothingItem, OutfitConstraints},
    services::wardrobe::PartitionedWardrobe,
};

const NO_PREFERENCE: &str = "None specified";

/// One candidate line: id, quoted name, bracketed tags
fn item_line(item: &ClothingItem) -> String {
    format!(
        "- ID: {}, Name: \"{}\", Tags: [{}]",
        item.id,
        item.name,
        item.tags.join(", ")
    )
}

fn section(out: &mut String, title: &str, items: &[ClothingItem], empty_line: &str) {
    let _ = writeln!(out, "{} ({} items):", title, items.len());
    if items.is_empty() {
        let _ = writeln!(out, "{}", empty_line);
    }
    for item in items {
        let _ = writeln!(out, "{}", item_line(item));
    }
    out.push('\n');
}

/// Builds the outfit recommendation prompt.
///
/// The output contract is stated twice; the parser still treats the reply as
/// untrusted.
pub fn recommendation_prompt(constraints: &OutfitConstraints, wardrobe: &PartitionedWardrobe) -> String {
    let preference = constraints
        .additional_info
        .as_deref()
        .map(str::trim)
        .filter(|info| !info.is_empty())
        .unwrap_or(NO_PREFERENCE);

    let mut out = String::new();

    out.push_str("I need an outfit recommendation based on the following requirements:\n");
    let _ = writeln!(out, "- Weather: {}", constraints.weather);
    let _ = writeln!(out, "- Season: {}", constraints.season);
    let _ = writeln!(out, "- Occasion: {}", constraints.occasion);
    let _ = writeln!(out, "- Additional preferences: {}", preference);
    out.push('\n');

    out.push_str("Here are the clothing items available in the user's wardrobe:\n\n");
    section(&mut out, "TOPS", &wardrobe.tops, "No tops available");
    section(&mut out, "BOTTOMS", &wardrobe.bottoms, "No bottoms available");
    section(&mut out, "SHOES", &wardrobe.shoes, "No shoes available");

    out.push_str(
        "Based on these requirements and available items, create the perfect outfit by \
         selecting exactly one top, exactly one bottom, and one pair of shoes (if available; \
         shoes are optional).\n\n",
    );

    out.push_str("Consider the following when making your recommendation:\n");
    let _ = writeln!(
        out,
        "1. Weather appropriateness - select items suitable for {} weather",
        constraints.weather
    );
    let _ = writeln!(
        out,
        "2. Season compatibility - the outfit should be appropriate for {}",
        constraints.season
    );
    let _ = writeln!(
        out,
        "3. Occasion suitability - the style should match {} settings",
        constraints.occasion
    );
    out.push_str("4. Color coordination and style matching between items\n");
    let _ = writeln!(out, "5. Additional preferences: {}", preference);
    out.push('\n');

    out.push_str(
        "IMPORTANT: Your response MUST be a single valid JSON object that can be parsed \
         as-is.\n\n",
    );
    out.push_str("Format your response as a JSON object with exactly these fields:\n");
    out.push_str("{\n");
    out.push_str("  \"name\": \"A creative name for the outfit\",\n");
    out.push_str(
        "  \"description\": \"A brief description of the outfit and why it suits the requirements\",\n",
    );
    out.push_str("  \"top\": { \"id\": \"ID of the selected top\" },\n");
    out.push_str("  \"bottom\": { \"id\": \"ID of the selected bottom\" },\n");
    out.push_str("  \"shoes\": { \"id\": \"ID of the selected shoes, or null if none\" },\n");
    let _ = writeln!(out, "  \"occasion\": \"{}\",", constraints.occasion);
    let _ = writeln!(out, "  \"weather\": \"{}\",", constraints.weather);
    let _ = writeln!(out, "  \"season\": \"{}\"", constraints.season);
    out.push_str("}\n\n");

    out.push_str(
        "REMEMBER: Return ONLY the JSON object above with double-quoted property names and \
         string values. The \"top\" and \"bottom\" ids must be copied from the lists above; \
         \"shoes\" may have a null id. Do not include explanations, markdown code fences, or \
         any other text.\n",
    );

    out
}

/// Builds the image tagging prompt
pub fn tagging_prompt(category: &str, name: &str, user_tags: &[String]) -> String {
    let mut out = String::new();

    out.push_str("Analyze this clothing image. Details:\n");
    let _ = writeln!(out, "- Category: {}", category);
    let _ = writeln!(out, "- Name: {}", name);
    if !user_tags.is_empty() {
        let _ = writeln!(out, "- User tags: {}", user_tags.join(", "));
    }
    out.push('\n');

    out.push_str("Generate 5-10 tags for this clothing item covering:\n");
    out.push_str("- Season appropriateness (summer, winter, fall, spring)\n");
    out.push_str("- Occasions (casual, formal, party, work, etc.)\n");
    out.push_str("- Style attributes (vintage, modern, classic, trendy, etc.)\n");
    out.push_str("- Colors and patterns\n");
    out.push_str("- Materials (when detectable)\n\n");

    out.push_str("IMPORTANT: Return ONLY a comma-separated list of tags, nothing else.\n");
    out.push_str(
        "Example response: \"summer, casual, floral, lightweight, cotton, blue, breathable, vacation\"\n",
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::wardrobe::tests::record;

    fn constraints(additional_info: Option<&str>) -> OutfitConstraints {
        OutfitConstraints {
            user_id: "user-1".to_string(),
            weather: "sunny".to_string(),
            season: "summer".to_string(),
            occasion: "casual".to_string(),
            additional_info: additional_info.map(str::to_string),
        }
    }

    #[test]
    fn test_prompt_lists_candidates() {
        let wardrobe = PartitionedWardrobe::partition(vec![
            record("A", "tops", &["casual", "blue"]),
            record("B", "bottoms", &["casual"]),
            record("S", "shoes", &[]),
        ]);

        let prompt = recommendation_prompt(&constraints(Some("no wool")), &wardrobe);

        assert!(prompt.contains("- Weather: sunny"));
        assert!(prompt.contains("- Season: summer"));
        assert!(prompt.contains("- Occasion: casual"));
        assert!(prompt.contains("- Additional preferences: no wool"));
        assert!(prompt.contains("TOPS (1 items):"));
        assert!(prompt.contains("- ID: A, Name: \"Item A\", Tags: [casual, blue]"));
        assert!(prompt.contains("- ID: B, Name: \"Item B\", Tags: [casual]"));
        assert!(prompt.contains("- ID: S, Name: \"Item S\", Tags: []"));
        assert!(!prompt.contains("No shoes available"));
    }

    #[test]
    fn test_prompt_without_shoes_or_preference() {
        let wardrobe = PartitionedWardrobe::partition(vec![
            record("A", "tops", &[]),
            record("B", "bottoms", &[]),
        ]);

        let prompt = recommendation_prompt(&constraints(None), &wardrobe);

        assert!(prompt.contains("SHOES (0 items):\nNo shoes available"));
        assert!(prompt.contains("- Additional preferences: None specified"));
    }

    #[test]
    fn test_prompt_states_output_contract() {
        let wardrobe = PartitionedWardrobe::partition(vec![
            record("A", "tops", &[]),
            record("B", "bottoms", &[]),
        ]);

        let prompt = recommendation_prompt(&constraints(Some("   ")), &wardrobe);

        assert!(prompt.contains("\"top\": { \"id\""));
        assert!(prompt.contains("\"bottom\": { \"id\""));
        assert!(prompt.contains("\"shoes\": { \"id\""));
        assert!(prompt.contains("\"occasion\": \"casual\""));
        assert!(prompt.contains("Return ONLY the JSON object"));
        assert!(prompt.contains("None specified"));
    }

    #[test]
    fn test_tagging_prompt_includes_user_tags() {
        let prompt = tagging_prompt("tops", "Linen shirt", &["white".to_string()]);
        assert!(prompt.contains("- Category: tops"));
        assert!(prompt.contains("- Name: Linen shirt"));
        assert!(prompt.contains("- User tags: white"));

        let bare = tagging_prompt("shoes", "Sneakers", &[]);
        assert!(!bare.contains("User tags"));
    }
}
