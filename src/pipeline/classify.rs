//! Taxonomy normalizer: maps free-form generator labels onto the fixed
//! closed vocabularies. Every function here is total — any string,
//! including empty, foreign-language or nonsense input, lands on a
//! member of the target enum. Raw generator text is never persisted.
//!
//! Handles English and Korean label variants.

use crate::models::{CategoryGroup, ColorGroup, FlowerGroup, ScentGroup, Season, StoryGenre};

/// Season labels arrive as enum tokens, English words or Korean words.
/// Default: Spring.
pub fn classify_season(value: &str) -> Season {
    let v = value.trim().to_lowercase();
    match v.as_str() {
        "spring" | "봄" => return Season::Spring,
        "summer" | "여름" => return Season::Summer,
        "fall" | "autumn" | "가을" => return Season::Fall,
        "winter" | "겨울" => return Season::Winter,
        _ => {}
    }
    if v.contains("summer") || v.contains("여름") {
        Season::Summer
    } else if v.contains("fall") || v.contains("autumn") || v.contains("가을") {
        Season::Fall
    } else if v.contains("winter") || v.contains("겨울") {
        Season::Winter
    } else {
        Season::Spring
    }
}

/// Story genres are prompted as uppercase tokens; anything off-list
/// becomes Episode.
pub fn classify_story_genre(value: &str) -> StoryGenre {
    match value.trim().to_uppercase().as_str() {
        "MYTH" | "LEGEND" => StoryGenre::Myth,
        "SCIENCE" | "BOTANY" => StoryGenre::Science,
        "HISTORY" => StoryGenre::History,
        "ART" | "LITERATURE" => StoryGenre::Art,
        _ => StoryGenre::Episode,
    }
}

/// Horticultural category group. Default: flowers and grasses.
pub fn classify_category_group(value: &str) -> CategoryGroup {
    let v = value.trim().to_lowercase();
    if v.contains("나무") || v.contains("조경") || v.contains("tree") || v.contains("shrub")
        || v.contains("landscape")
    {
        CategoryGroup::TreesAndLandscape
    } else if v.contains("실내") || v.contains("indoor") || v.contains("interior")
        || v.contains("house")
    {
        CategoryGroup::IndoorDecor
    } else if v.contains("채소") || v.contains("텃밭") || v.contains("vegetable")
        || v.contains("kitchen") || v.contains("herb") || v.contains("crop")
    {
        CategoryGroup::KitchenGarden
    } else {
        CategoryGroup::FlowersAndGrasses
    }
}

/// Flower-language sentiment group. Default: happiness/joy.
pub fn classify_flower_group(value: &str) -> FlowerGroup {
    let v = value.trim().to_lowercase();
    if v.contains("사랑") || v.contains("고백") || v.contains("love") || v.contains("romance")
        || v.contains("passion")
    {
        FlowerGroup::LoveConfession
    } else if v.contains("위로") || v.contains("슬픔") || v.contains("comfort")
        || v.contains("sorrow") || v.contains("grief")
    {
        FlowerGroup::ComfortSorrow
    } else if v.contains("감사") || v.contains("존경") || v.contains("gratitude")
        || v.contains("respect") || v.contains("thank")
    {
        FlowerGroup::GratitudeRespect
    } else if v.contains("이별") || v.contains("그리움") || v.contains("parting")
        || v.contains("farewell") || v.contains("longing")
    {
        FlowerGroup::PartingLonging
    } else {
        FlowerGroup::HappinessJoy
    }
}

/// Color group. Default: white/cream.
pub fn classify_color_group(value: &str) -> ColorGroup {
    let v = value.trim().to_lowercase();
    if v.contains("노랑") || v.contains("주황") || v.contains("yellow") || v.contains("orange")
        || v.contains("gold")
    {
        ColorGroup::YellowOrange
    } else if v.contains("빨") || v.contains("붉") || v.contains("분홍") || v.contains("red")
        || v.contains("pink") || v.contains("magenta") || v.contains("crimson")
    {
        ColorGroup::RedPink
    } else if v.contains("푸") || v.contains("파랑") || v.contains("보라") || v.contains("blue")
        || v.contains("sky") || v.contains("purple") || v.contains("violet")
    {
        ColorGroup::Blue
    } else if v.contains("갈") || v.contains("검") || v.contains("brown") || v.contains("black")
    {
        ColorGroup::BrownBlack
    } else {
        ColorGroup::WhiteCream
    }
}

/// Scent group. Default: soft/calm.
pub fn classify_scent_group(value: &str) -> ScentGroup {
    let v = value.trim().to_lowercase();
    if v.contains("무향") || v.contains("unscented") || v.contains("no scent")
        || v.contains("none") || v.contains("scentless")
    {
        ScentGroup::Unscented
    } else if v.contains("달콤") || v.contains("화사") || v.contains("sweet")
        || v.contains("floral") || v.contains("honey")
    {
        ScentGroup::SweetFloral
    } else if v.contains("싱그") || v.contains("시원") || v.contains("fresh")
        || v.contains("cool") || v.contains("green") || v.contains("citrus")
    {
        ScentGroup::FreshCool
    } else {
        ScentGroup::SoftCalm
    }
}
