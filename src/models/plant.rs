use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{CategoryGroup, ColorGroup, FlowerGroup, ScentGroup, Season, StoryGenre};

/// Weight of one detail view in the popularity score.
pub const VIEW_WEIGHT: i64 = 1;
/// Weight of one favorite in the popularity score.
pub const FAVORITE_WEIGHT: i64 = 10;

/// Popularity change for a combined view/favorite delta.
///
/// Pure function; the repository applies the result with a single
/// `$inc`-style UPDATE so `popularity_score` always stays recomputable
/// from the two counters.
pub fn popularity_delta(view_delta: i64, favorite_delta: i64) -> i64 {
    view_delta * VIEW_WEIGHT + favorite_delta * FAVORITE_WEIGHT
}

/// Botanical classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub genus: String,
    pub species: String,
    pub family: String,
}

/// Horticultural profile and care notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horticulture {
    /// Free-form trade category (e.g. "perennial", "조경수목").
    pub category: String,
    pub category_group: CategoryGroup,
    pub usage: Vec<String>,
    pub management: Option<String>,
    /// Two-to-three sentence description shown on cards.
    pub summary: Option<String>,
}

/// Flower-language entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowerInfo {
    pub language: String,
    pub group: FlowerGroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorInfo {
    pub hex_codes: Vec<String>,
    pub labels: Vec<String>,
    pub groups: Vec<ColorGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScentInfo {
    pub tags: Vec<String>,
    pub groups: Vec<ScentGroup>,
}

/// A generated narrative about the plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub genre: StoryGenre,
    pub content: String,
}

/// The canonical stored record for one real-world plant.
///
/// `id` is assigned once at creation and never reused. Engagement
/// counters are mutated only through the repository increment helpers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: Uuid,
    pub display_name: String,
    pub scientific_name: String,
    pub english_name: Option<String>,
    pub taxonomy: Taxonomy,
    pub horticulture: Horticulture,
    pub habitat: String,
    pub flower_info: FlowerInfo,
    pub color_info: ColorInfo,
    pub scent_info: ScentInfo,
    pub stories: Vec<Story>,
    pub season: Season,
    /// Flowering months, 1-12.
    pub blooming_months: Vec<u32>,
    pub search_keywords: Vec<String>,
    /// At most 3 entries; `primary_image` is the first when present.
    pub images: Vec<String>,
    pub primary_image: Option<String>,
    pub view_count: i64,
    pub favorite_count: i64,
    pub popularity_score: i64,
    pub created_at: NaiveDateTime,
}

/// Fully-populated record fixture shared by repository/pipeline tests.
#[cfg(test)]
pub(crate) fn test_plant(display_name: &str, scientific_name: &str) -> Plant {
    use super::enums::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    let mut tokens = scientific_name.split_whitespace();
    Plant {
        id: Uuid::new_v4(),
        display_name: display_name.into(),
        scientific_name: scientific_name.into(),
        english_name: Some("Dog rose".into()),
        taxonomy: Taxonomy {
            genus: tokens.next().unwrap_or_default().into(),
            species: tokens.next().unwrap_or_default().into(),
            family: "Rosaceae".into(),
        },
        horticulture: Horticulture {
            category: "shrub".into(),
            category_group: CategoryGroup::FlowersAndGrasses,
            usage: vec!["ornamental".into()],
            management: Some("Full sun, moderate water".into()),
            summary: Some("A hardy climbing rose.".into()),
        },
        habitat: "Hedgerows and woodland edges".into(),
        flower_info: FlowerInfo {
            language: "passion".into(),
            group: FlowerGroup::LoveConfession,
        },
        color_info: ColorInfo {
            hex_codes: vec!["#FFC0CB".into()],
            labels: vec!["pink".into()],
            groups: vec![ColorGroup::RedPink],
        },
        scent_info: ScentInfo {
            tags: vec!["musky".into()],
            groups: vec![ScentGroup::SweetFloral],
        },
        stories: vec![Story {
            genre: StoryGenre::Myth,
            content: "Linked to Aphrodite in Greek myth.".into(),
        }],
        season: Season::Summer,
        blooming_months: vec![5, 6, 7],
        search_keywords: vec!["rose".into()],
        images: vec!["https://img.example/rose-1.jpg".into()],
        primary_image: Some("https://img.example/rose-1.jpg".into()),
        view_count: 0,
        favorite_count: 0,
        popularity_score: 0,
        created_at: NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
    }
}
