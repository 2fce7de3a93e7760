//! Prompt builders for the generation backend.
//!
//! The JSON shapes requested here are suggestions to the model, not a
//! contract: everything that comes back still goes through the parser
//! and sanitizer before it can touch the record store.

/// Identification from a photo. The plant check is folded into the same
/// call; a non-plant subject must come back with `isPlant: false`.
pub fn identify_image_prompt() -> String {
    r#"Analyze this image.
First determine whether it shows a plant (flower, tree, grass, or any botanical subject).
Then, if it is a plant, identify it.
Return ONLY a JSON object with this schema:
{
    "isPlant": true or false,
    "confidence": "high" or "medium" or "low",
    "name": "Korean common name",
    "englishName": "English common name",
    "scientificName": "Scientific name (Genus species)"
}
If the image is not a plant, set isPlant to false and leave the other fields null."#
        .to_string()
}

/// Pick one plant for a user situation.
pub fn identify_text_prompt(situation: &str) -> String {
    format!(
        r#"User situation: "{situation}"
Recommend 1 suitable plant.
Return ONLY a JSON object:
{{
    "isPlant": true,
    "confidence": "high" or "medium" or "low",
    "name": "Korean name",
    "englishName": "English name",
    "scientificName": "Scientific name (Genus species)"
}}"#
    )
}

/// Full record synthesis, grounded by web search where the backend
/// supports it.
pub fn synthesis_prompt(display_name: &str, scientific_name: &str) -> String {
    format!(
        r##"Use web search to find accurate, up-to-date information about the plant '{display_name}' (scientific name: {scientific_name}).

[SEARCH INSTRUCTIONS]
- Search for accurate taxonomy (genus, species, family)
- Verify the actual flowering months and seasons
- Find real historical or cultural stories about this plant
- Confirm the flower language in Korean culture
- Check the plant's characteristics: color, scent, habitat

[OUTPUT INSTRUCTIONS]
1. Return ONLY a valid JSON object (no markdown, no explanation).
2. Generate 2 or more stories based on REAL facts found via search.
   - Allowed genres: HISTORY, MYTH, SCIENCE, ART, EPISODE
3. season must be one of: SPRING, SUMMER, FALL, WINTER
4. Category, flower, color and scent groups should use short Korean or
   English labels; they are normalized server-side.

[JSON STRUCTURE]
{{
    "name": "{display_name}",
    "scientificName": "{scientific_name}",
    "englishName": "English common name from search",
    "taxonomy": {{ "genus": "...", "species": "...", "family": "..." }},
    "horticulture": {{
        "category": "specific trade category",
        "categoryGroup": "one of: 꽃과 풀 / 나무와 조경 / 실내 인테리어 / 텃밭과 정원",
        "usage": ["usage1", "usage2"],
        "management": "care instructions from search",
        "preContent": "2-3 sentence description"
    }},
    "habitat": "natural habitat from search",
    "stories": [
        {{ "genre": "HISTORY", "content": "factual story (2-3 sentences)" }},
        {{ "genre": "SCIENCE", "content": "another factual story" }}
    ],
    "season": "SPRING or SUMMER or FALL or WINTER",
    "bloomingMonths": [1, 2, 3],
    "searchKeywords": ["keyword1", "keyword2"],
    "colorInfo": {{ "hexCodes": ["#FFFFFF"], "colorLabels": ["..."], "colorGroup": ["..."] }},
    "scentInfo": {{ "scentTags": ["..."], "scentGroup": ["..."] }},
    "flowerInfo": {{ "language": "flower language from search", "flowerGroup": "..." }}
}}"##
    )
}

/// Image URL discovery for a plant, best-effort.
pub fn media_prompt(
    display_name: &str,
    english_name: Option<&str>,
    scientific_name: &str,
    count: usize,
) -> String {
    let english = english_name.unwrap_or("unknown");
    format!(
        r#"Use web search to find up to {count} publicly accessible photo URLs of the plant '{display_name}' (English: {english}, scientific name: {scientific_name}).
Only include direct image URLs whose subject is this plant.
Return ONLY a JSON object:
{{ "images": ["https://...", "https://..."] }}
Return an empty list if no suitable image is found."#
    )
}

/// Free-text recommendation essay for the situation flow.
pub fn essay_prompt(situation: &str, display_name: &str, flower_language: &str, summary: &str) -> String {
    format!(
        r#"Role: 30-year veteran florist & essayist.
Task: write a touching, comforting essay (around 400 characters).
Tone: warm, gentle, polite Korean (~해요 style).

User situation: "{situation}"
Plant: {display_name} (flower language: {flower_language})
Feature: {summary}

Output: only the essay text."#
    )
}
