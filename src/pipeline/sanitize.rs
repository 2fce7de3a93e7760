//! Record sanitizer: turns the generator's untrusted JSON into a
//! schema-complete [`PlantDraft`].
//!
//! The sanitizer is the only boundary between dynamic generator output
//! and the typed record model. It never errors: every enumerated field
//! is forced onto its closed vocabulary and every missing substructure
//! is backfilled with deterministic placeholder content derived from the
//! fallback names. Generator-invented identifiers are dropped here; the
//! orchestrator assigns the real id at commit time.

use serde_json::Value;

use super::classify::{
    classify_category_group, classify_color_group, classify_flower_group, classify_scent_group,
    classify_season, classify_story_genre,
};
use super::types::PlantDraft;
use crate::models::{
    ColorGroup, ColorInfo, FlowerInfo, Horticulture, ScentGroup, ScentInfo, Season, Story,
    Taxonomy,
};

/// Signal fields that count toward "the generator actually knew this
/// plant": name, taxonomy, flower language, stories. Fewer than 2 of
/// them in the raw candidate marks the result as fallback-only.
const MIN_SIGNAL_FIELDS: usize = 2;

/// Sanitize a raw generated candidate.
///
/// Returns the repaired draft and `is_fallback` — true when the raw
/// candidate carried so little real content that persisting it would
/// store placeholders instead of a plant.
pub fn sanitize_candidate(
    raw: &Value,
    fallback_name: &str,
    fallback_scientific: &str,
) -> (PlantDraft, bool) {
    let obj = raw.as_object();
    let empty = serde_json::Map::new();
    let obj = obj.unwrap_or(&empty);

    let raw_name = get_str(obj, &["name", "displayName", "display_name"]);
    let raw_taxonomy = get_nonempty_obj(obj, &["taxonomy"]);
    let raw_flower = get_nonempty_obj(obj, &["flowerInfo", "flower_info", "flowerMeaning"]);
    let raw_stories = get_nonempty_array(obj, &["stories", "narratives"]);

    let signals = [
        raw_name.is_some(),
        raw_taxonomy.is_some(),
        raw_flower.is_some(),
        raw_stories.is_some(),
    ]
    .iter()
    .filter(|present| **present)
    .count();
    let is_fallback = signals < MIN_SIGNAL_FIELDS;

    let display_name = raw_name.unwrap_or(fallback_name).trim().to_string();
    let scientific_name = get_str(obj, &["scientificName", "scientific_name"])
        .unwrap_or(fallback_scientific)
        .trim()
        .to_string();
    let english_name =
        get_str(obj, &["englishName", "english_name"]).map(|s| s.trim().to_string());

    let taxonomy = sanitize_taxonomy(raw_taxonomy, &display_name, &scientific_name);
    let horticulture = sanitize_horticulture(obj);
    let habitat = get_str(obj, &["habitat"]).map(str::to_string).unwrap_or_else(|| {
        format!("Habitat of {display_name} is not yet documented.")
    });
    let flower_info = sanitize_flower_info(raw_flower);
    let color_info = sanitize_color_info(obj);
    let scent_info = sanitize_scent_info(obj);
    let stories = sanitize_stories(raw_stories, &display_name);
    let season = classify_season(get_str(obj, &["season"]).unwrap_or_default());
    let blooming_months = sanitize_blooming_months(obj, season);
    let search_keywords = sanitize_search_keywords(obj, &display_name, &scientific_name);

    let draft = PlantDraft {
        display_name,
        scientific_name,
        english_name,
        taxonomy,
        horticulture,
        habitat,
        flower_info,
        color_info,
        scent_info,
        stories,
        season,
        blooming_months,
        search_keywords,
    };

    if is_fallback {
        tracing::warn!(
            name = %draft.display_name,
            signals,
            "Generated candidate is mostly fallback content"
        );
    }

    (draft, is_fallback)
}

fn sanitize_taxonomy(
    raw: Option<&serde_json::Map<String, Value>>,
    display_name: &str,
    scientific_name: &str,
) -> Taxonomy {
    let mut tokens = scientific_name.split_whitespace();
    let genus_fallback = tokens
        .next()
        .filter(|t| !t.is_empty())
        .unwrap_or(display_name)
        .to_string();
    let species_fallback = tokens.next().unwrap_or("sp.").to_string();

    match raw {
        Some(t) => Taxonomy {
            genus: get_str(t, &["genus"]).unwrap_or(&genus_fallback).to_string(),
            species: get_str(t, &["species"])
                .unwrap_or(&species_fallback)
                .to_string(),
            family: get_str(t, &["family"]).unwrap_or("Unclassified").to_string(),
        },
        None => Taxonomy {
            genus: genus_fallback,
            species: species_fallback,
            family: "Unclassified".to_string(),
        },
    }
}

fn sanitize_horticulture(obj: &serde_json::Map<String, Value>) -> Horticulture {
    let horti = get_nonempty_obj(obj, &["horticulture"]);
    let empty = serde_json::Map::new();
    let horti = horti.unwrap_or(&empty);

    Horticulture {
        category: get_str(horti, &["category"]).unwrap_or("unclassified").to_string(),
        category_group: classify_category_group(
            get_str(horti, &["categoryGroup", "category_group"]).unwrap_or_default(),
        ),
        usage: string_list(horti.get("usage").or_else(|| horti.get("usageTags"))),
        management: get_str(horti, &["management"]).map(str::to_string),
        summary: get_str(horti, &["preContent", "summary", "pre_content"]).map(str::to_string),
    }
}

fn sanitize_flower_info(raw: Option<&serde_json::Map<String, Value>>) -> FlowerInfo {
    let empty = serde_json::Map::new();
    let flower = raw.unwrap_or(&empty);
    FlowerInfo {
        language: get_str(flower, &["language", "text"]).unwrap_or("아름다움").to_string(),
        group: classify_flower_group(
            get_str(flower, &["flowerGroup", "group", "flower_group"]).unwrap_or_default(),
        ),
    }
}

fn sanitize_color_info(obj: &serde_json::Map<String, Value>) -> ColorInfo {
    let empty = serde_json::Map::new();
    let color = get_nonempty_obj(obj, &["colorInfo", "color_info", "colorProfile"])
        .unwrap_or(&empty);

    let mut groups: Vec<ColorGroup> = string_list(
        color.get("colorGroup").or_else(|| color.get("groups")),
    )
    .iter()
    .map(|v| classify_color_group(v))
    .collect();
    groups.sort_by_key(|g| g.as_str());
    groups.dedup();
    if groups.is_empty() {
        groups.push(ColorGroup::WhiteCream);
    }

    let hex_codes = string_list(color.get("hexCodes").or_else(|| color.get("hex_codes")));
    ColorInfo {
        hex_codes: if hex_codes.is_empty() {
            vec!["#FFFFFF".to_string()]
        } else {
            hex_codes
        },
        labels: string_list(color.get("colorLabels").or_else(|| color.get("labels"))),
        groups,
    }
}

fn sanitize_scent_info(obj: &serde_json::Map<String, Value>) -> ScentInfo {
    let empty = serde_json::Map::new();
    let scent = get_nonempty_obj(obj, &["scentInfo", "scent_info", "scentProfile"])
        .unwrap_or(&empty);

    let mut groups: Vec<ScentGroup> = string_list(
        scent.get("scentGroup").or_else(|| scent.get("groups")),
    )
    .iter()
    .map(|v| classify_scent_group(v))
    .collect();
    groups.sort_by_key(|g| g.as_str());
    groups.dedup();
    if groups.is_empty() {
        groups.push(ScentGroup::Unscented);
    }

    ScentInfo {
        tags: string_list(scent.get("scentTags").or_else(|| scent.get("tags"))),
        groups,
    }
}

fn sanitize_stories(raw: Option<&Vec<Value>>, display_name: &str) -> Vec<Story> {
    let mut stories = Vec::new();
    if let Some(items) = raw {
        for item in items {
            match item {
                // Bare strings are undated anecdotes.
                Value::String(text) if !text.trim().is_empty() => stories.push(Story {
                    genre: crate::models::StoryGenre::Episode,
                    content: text.trim().to_string(),
                }),
                Value::Object(entry) => {
                    let content = get_str(entry, &["content", "text"]);
                    if let Some(content) = content {
                        stories.push(Story {
                            genre: classify_story_genre(
                                get_str(entry, &["genre"]).unwrap_or_default(),
                            ),
                            content: content.to_string(),
                        });
                    }
                }
                _ => {}
            }
        }
    }
    if stories.is_empty() {
        stories.push(Story {
            genre: crate::models::StoryGenre::Episode,
            content: format!("{display_name} has not been documented in detail yet."),
        });
    }
    stories
}

fn sanitize_blooming_months(obj: &serde_json::Map<String, Value>, season: Season) -> Vec<u32> {
    let mut months: Vec<u32> = obj
        .get("bloomingMonths")
        .or_else(|| obj.get("blooming_months"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_u64)
                .filter(|m| (1..=12).contains(m))
                .map(|m| m as u32)
                .collect()
        })
        .unwrap_or_default();
    months.sort_unstable();
    months.dedup();

    if months.is_empty() {
        // Deterministic backfill from the season.
        months = match season {
            Season::Spring => vec![3, 4, 5],
            Season::Summer => vec![6, 7, 8],
            Season::Fall => vec![9, 10, 11],
            Season::Winter => vec![12, 1, 2],
        };
        months.sort_unstable();
    }
    months
}

fn sanitize_search_keywords(
    obj: &serde_json::Map<String, Value>,
    display_name: &str,
    scientific_name: &str,
) -> Vec<String> {
    let mut keywords = string_list(
        obj.get("searchKeywords").or_else(|| obj.get("search_keywords")),
    );
    if keywords.is_empty() {
        keywords.push(display_name.to_string());
        if !scientific_name.is_empty() {
            keywords.push(scientific_name.to_string());
        }
    }
    keywords.dedup();
    keywords
}

/// First non-empty string among the candidate keys.
fn get_str<'a>(obj: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn get_nonempty_obj<'a>(
    obj: &'a serde_json::Map<String, Value>,
    keys: &[&str],
) -> Option<&'a serde_json::Map<String, Value>> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(Value::as_object)
        .find(|m| !m.is_empty())
}

fn get_nonempty_array<'a>(
    obj: &'a serde_json::Map<String, Value>,
    keys: &[&str],
) -> Option<&'a Vec<Value>> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(Value::as_array)
        .find(|a| !a.is_empty())
}

/// Accepts a scalar string or a list of strings; anything else is empty.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryGroup, FlowerGroup, StoryGenre};
    use serde_json::json;

    fn full_candidate() -> Value {
        json!({
            "name": "라벤더",
            "scientificName": "Lavandula angustifolia",
            "englishName": "Lavender",
            "taxonomy": {"genus": "Lavandula", "species": "angustifolia", "family": "꿀풀과"},
            "horticulture": {
                "category": "허브",
                "categoryGroup": "텃밭과 정원",
                "usage": ["관상용", "방향제"],
                "management": "Well-drained soil, full sun",
                "preContent": "보라색 향기 식물"
            },
            "habitat": "Mediterranean hillsides",
            "stories": [
                {"genre": "HISTORY", "content": "Romans perfumed baths with it."},
                "Bees love the long blooming spikes."
            ],
            "season": "SUMMER",
            "bloomingMonths": [6, 7, 8],
            "searchKeywords": ["lavender", "허브"],
            "colorInfo": {"hexCodes": ["#967BB6"], "colorLabels": ["보라"], "colorGroup": ["보라"]},
            "scentInfo": {"scentTags": ["은은한"], "scentGroup": ["FRESH"]},
            "flowerInfo": {"language": "침묵", "flowerGroup": "위로/슬픔"}
        })
    }

    #[test]
    fn full_candidate_is_not_fallback() {
        let (draft, is_fallback) =
            sanitize_candidate(&full_candidate(), "라벤더", "Lavandula angustifolia");
        assert!(!is_fallback);
        assert_eq!(draft.display_name, "라벤더");
        assert_eq!(draft.taxonomy.genus, "Lavandula");
        assert_eq!(draft.season, Season::Summer);
        assert_eq!(
            draft.horticulture.category_group,
            CategoryGroup::KitchenGarden
        );
        assert_eq!(draft.flower_info.group, FlowerGroup::ComfortSorrow);
        assert_eq!(draft.color_info.groups, vec![ColorGroup::Blue]);
        assert_eq!(draft.scent_info.groups, vec![ScentGroup::FreshCool]);
    }

    #[test]
    fn bare_string_story_coerced_to_episode() {
        let (draft, _) = sanitize_candidate(&full_candidate(), "라벤더", "");
        assert_eq!(draft.stories.len(), 2);
        assert_eq!(draft.stories[0].genre, StoryGenre::History);
        assert_eq!(draft.stories[1].genre, StoryGenre::Episode);
        assert!(draft.stories[1].content.contains("Bees"));
    }

    #[test]
    fn unknown_genre_defaults_to_episode() {
        let raw = json!({
            "name": "장미",
            "stories": [{"genre": "GOSSIP", "content": "..."}]
        });
        let (draft, _) = sanitize_candidate(&raw, "장미", "Rosa canina");
        assert_eq!(draft.stories[0].genre, StoryGenre::Episode);
    }

    #[test]
    fn empty_candidate_is_fallback_but_schema_complete() {
        let (draft, is_fallback) = sanitize_candidate(&json!({}), "수국", "Hydrangea macrophylla");
        assert!(is_fallback);
        assert_eq!(draft.display_name, "수국");
        assert_eq!(draft.scientific_name, "Hydrangea macrophylla");
        assert_eq!(draft.taxonomy.genus, "Hydrangea");
        assert_eq!(draft.taxonomy.species, "macrophylla");
        assert_eq!(draft.taxonomy.family, "Unclassified");
        assert!(!draft.stories.is_empty());
        assert!(!draft.blooming_months.is_empty());
        assert!(!draft.search_keywords.is_empty());
        assert_eq!(draft.color_info.groups, vec![ColorGroup::WhiteCream]);
        assert_eq!(draft.scent_info.groups, vec![ScentGroup::Unscented]);
    }

    #[test]
    fn non_object_candidate_is_fallback() {
        let (draft, is_fallback) =
            sanitize_candidate(&json!("I do not know this plant"), "수국", "");
        assert!(is_fallback);
        assert_eq!(draft.display_name, "수국");
        // no scientific name: genus falls back to the display name
        assert_eq!(draft.taxonomy.genus, "수국");
        assert_eq!(draft.taxonomy.species, "sp.");
    }

    #[test]
    fn single_signal_is_fallback() {
        let raw = json!({"name": "수국"});
        let (_, is_fallback) = sanitize_candidate(&raw, "수국", "");
        assert!(is_fallback);
    }

    #[test]
    fn two_signals_pass_the_gate() {
        let raw = json!({
            "name": "수국",
            "flowerInfo": {"language": "진심", "flowerGroup": "감사/존경"}
        });
        let (draft, is_fallback) = sanitize_candidate(&raw, "수국", "");
        assert!(!is_fallback);
        assert_eq!(draft.flower_info.group, FlowerGroup::GratitudeRespect);
    }

    #[test]
    fn scalar_group_values_accepted() {
        let raw = json!({
            "name": "동백",
            "colorInfo": {"colorGroup": "RED"},
            "scentInfo": {"scentGroup": "무향"}
        });
        let (draft, _) = sanitize_candidate(&raw, "동백", "Camellia japonica");
        assert_eq!(draft.color_info.groups, vec![ColorGroup::RedPink]);
        assert_eq!(draft.scent_info.groups, vec![ScentGroup::Unscented]);
    }

    #[test]
    fn blooming_months_filtered_and_backfilled() {
        let raw = json!({
            "name": "동백",
            "season": "WINTER",
            "bloomingMonths": [0, 13, 99]
        });
        let (draft, _) = sanitize_candidate(&raw, "동백", "");
        // out-of-range input discarded, backfilled from the season
        assert_eq!(draft.blooming_months, vec![1, 2, 12]);
    }

    #[test]
    fn generator_id_fields_are_ignored() {
        let raw = json!({
            "_id": "42",
            "id": "evil-id",
            "name": "장미",
            "taxonomy": {"genus": "Rosa", "species": "canina", "family": "Rosaceae"}
        });
        let (draft, _) = sanitize_candidate(&raw, "장미", "Rosa canina");
        let as_json = serde_json::to_value(&draft).unwrap();
        assert!(as_json.get("id").is_none());
        assert!(as_json.get("_id").is_none());
    }

    #[test]
    fn enum_fields_total_over_nonsense_input() {
        let raw = json!({
            "name": "x",
            "season": "rainy",
            "horticulture": {"categoryGroup": "???"},
            "flowerInfo": {"language": "y", "flowerGroup": "zzz"},
            "colorInfo": {"colorGroup": ["nonsense", ""]},
            "scentInfo": {"scentGroup": ["???"]}
        });
        let (draft, _) = sanitize_candidate(&raw, "x", "");
        assert_eq!(draft.season, Season::Spring);
        assert_eq!(
            draft.horticulture.category_group,
            CategoryGroup::FlowersAndGrasses
        );
        assert_eq!(draft.flower_info.group, FlowerGroup::HappinessJoy);
        assert_eq!(draft.color_info.groups, vec![ColorGroup::WhiteCream]);
        assert_eq!(draft.scent_info.groups, vec![ScentGroup::SoftCalm]);
    }
}
