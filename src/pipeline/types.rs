use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::GenerationError;
use crate::models::{
    ColorInfo, FlowerInfo, Horticulture, IdentificationConfidence, Plant, ScentInfo, Season,
    Story, Taxonomy,
};

/// A record carries at most this many image references.
pub const MAX_RECORD_IMAGES: usize = 3;

/// What a classifier produced from a photo or a situation text.
/// Transient — used to locate or seed a canonical record, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
    pub display_name: String,
    /// "Genus species" when the classifier knows it.
    pub scientific_name: Option<String>,
    /// Weak signal: used for media search, never for resolution.
    pub english_name: Option<String>,
    pub confidence: Option<IdentificationConfidence>,
}

impl Identification {
    pub fn named(display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            scientific_name: None,
            english_name: None,
            confidence: None,
        }
    }

    pub fn with_scientific_name(display_name: &str, scientific_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            scientific_name: Some(scientific_name.to_string()),
            english_name: None,
            confidence: None,
        }
    }
}

/// Sanitizer output: a schema-complete record body, before the
/// orchestrator assigns the id, media, counters and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantDraft {
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
    pub blooming_months: Vec<u32>,
    pub search_keywords: Vec<String>,
}

/// How a resolution terminated. Every `resolve_or_create` call ends in
/// exactly one of these, or in an error (rejected / rolled back).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Resolver hit before any generation ran.
    Found,
    /// A concurrent or earlier writer owns the record; the generated
    /// candidate (if any) was discarded.
    Merged,
    /// This call created the record.
    Committed,
}

/// A resolved record plus how it was obtained.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub plant: Plant,
    pub outcome: ResolutionOutcome,
}

impl Resolved {
    pub fn is_newly_created(&self) -> bool {
        self.outcome == ResolutionOutcome::Committed
    }
}

/// Record store failures at the capability boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Unique-key rejection: a concurrent writer won the race.
    #[error("unique key conflict")]
    Conflict,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Vision/text classifier boundary. Returns None when the input is not
/// a recognizable plant.
#[async_trait]
pub trait PlantIdentifier: Send + Sync {
    async fn identify_from_image(
        &self,
        image: &[u8],
    ) -> Result<Option<Identification>, GenerationError>;

    async fn identify_from_text(
        &self,
        situation: &str,
    ) -> Result<Option<Identification>, GenerationError>;
}

/// Structured content synthesis for a full record shape. Output is an
/// untrusted JSON document; callers must pass it through the sanitizer.
#[async_trait]
pub trait RecordSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        display_name: &str,
        scientific_name: &str,
    ) -> Result<serde_json::Value, GenerationError>;
}

/// Best-effort image discovery, up to [`MAX_RECORD_IMAGES`] URLs.
#[async_trait]
pub trait MediaFinder: Send + Sync {
    async fn find_images(
        &self,
        display_name: &str,
        english_name: Option<&str>,
        scientific_name: &str,
    ) -> Result<Vec<String>, GenerationError>;
}

/// Free-text recommendation essay; not schema-validated.
#[async_trait]
pub trait EssayWriter: Send + Sync {
    async fn recommendation_essay(
        &self,
        situation: &str,
        plant: &Plant,
    ) -> Result<String, GenerationError>;
}

/// The record store capability. The store is the single source of truth
/// for uniqueness: `insert` must reject a duplicate display name with
/// `StoreError::Conflict` rather than overwrite.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, id: &Uuid) -> Result<Option<Plant>, StoreError>;

    async fn get_by_display_name(&self, display_name: &str)
        -> Result<Option<Plant>, StoreError>;

    async fn get_by_scientific_name(
        &self,
        scientific_name: &str,
    ) -> Result<Option<Plant>, StoreError>;

    /// First record whose scientific name starts with the genus token,
    /// case-insensitively. Iteration order is engine-defined.
    async fn find_by_genus_prefix(&self, genus: &str) -> Result<Option<Plant>, StoreError>;

    async fn insert(&self, plant: &Plant) -> Result<(), StoreError>;

    /// Best-effort delete used by commit rollback; absent ids are fine.
    async fn delete(&self, id: &Uuid) -> Result<(), StoreError>;

    async fn record_view(&self, id: &Uuid) -> Result<(), StoreError>;

    async fn record_favorite_delta(&self, id: &Uuid, delta: i64) -> Result<(), StoreError>;
}

/// Per-user favorite membership (the dedupe layer in front of the
/// non-idempotent favorite counter).
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Returns false when the membership already existed.
    async fn add_favorite(&self, user_id: &str, plant_id: &Uuid) -> Result<bool, StoreError>;

    /// Returns false when the membership was absent.
    async fn remove_favorite(&self, user_id: &str, plant_id: &Uuid)
        -> Result<bool, StoreError>;

    async fn is_favorite(&self, user_id: &str, plant_id: &Uuid) -> Result<bool, StoreError>;

    async fn list_favorites(&self, user_id: &str) -> Result<Vec<Uuid>, StoreError>;
}
