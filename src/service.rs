//! Plant service: the caller-facing flows on top of the resolution
//! pipeline — image search, situation-based recommendation, detail
//! lookup and the favorites toggle.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::models::Plant;
use crate::pipeline::orchestrator::RecordOrchestrator;
use crate::pipeline::types::{
    EssayWriter, FavoriteStore, MediaFinder, PlantIdentifier, RecordStore, RecordSynthesizer,
    Resolved, StoreError,
};
use crate::pipeline::ResolutionError;

/// Shown when the essay backend fails; the recommendation itself still
/// succeeds.
const ESSAY_FALLBACK: &str = "에세이 작성 중 오류가 발생했습니다.";

/// Image-search response: the record plus per-request decorations.
#[derive(Debug, Clone)]
pub struct PlantSearchResult {
    pub plant: Plant,
    pub is_newly_created: bool,
    pub is_favorite: bool,
}

/// Situation-recommendation response.
#[derive(Debug, Clone)]
pub struct PlantRecommendation {
    pub plant: Plant,
    pub recommendation: String,
}

/// Detail response.
#[derive(Debug, Clone)]
pub struct PlantDetail {
    pub plant: Plant,
    pub is_favorite: bool,
}

pub struct PlantService {
    records: Arc<dyn RecordStore>,
    favorites: Arc<dyn FavoriteStore>,
    identifier: Arc<dyn PlantIdentifier>,
    essayist: Arc<dyn EssayWriter>,
    orchestrator: RecordOrchestrator,
}

impl PlantService {
    pub fn new(
        records: Arc<dyn RecordStore>,
        favorites: Arc<dyn FavoriteStore>,
        identifier: Arc<dyn PlantIdentifier>,
        synthesizer: Arc<dyn RecordSynthesizer>,
        media: Arc<dyn MediaFinder>,
        essayist: Arc<dyn EssayWriter>,
    ) -> Self {
        let orchestrator = RecordOrchestrator::new(Arc::clone(&records), synthesizer, media);
        Self {
            records,
            favorites,
            identifier,
            essayist,
            orchestrator,
        }
    }

    /// Identify a photo and resolve it to a canonical record.
    pub async fn search_by_image(
        &self,
        image: &[u8],
        user_id: Option<&str>,
    ) -> Result<PlantSearchResult, ResolutionError> {
        let identification = self
            .identifier
            .identify_from_image(image)
            .await?
            .ok_or(ResolutionError::NotIdentifiable)?;

        info!(name = %identification.display_name, "image identified");
        let Resolved { plant, outcome } =
            self.orchestrator.resolve_or_create(&identification).await?;

        let is_favorite = self.favorite_flag(user_id, &plant.id).await;
        Ok(PlantSearchResult {
            is_newly_created: outcome == crate::pipeline::types::ResolutionOutcome::Committed,
            is_favorite,
            plant,
        })
    }

    /// Recommend a plant for a free-text situation, with an essay.
    pub async fn recommend_by_situation(
        &self,
        situation: &str,
    ) -> Result<PlantRecommendation, ResolutionError> {
        let identification = self
            .identifier
            .identify_from_text(situation)
            .await?
            .ok_or(ResolutionError::NotIdentifiable)?;

        info!(name = %identification.display_name, "situation mapped to plant");
        let Resolved { plant, .. } =
            self.orchestrator.resolve_or_create(&identification).await?;

        // The essay is decoration; its failure never fails the flow.
        let recommendation = match self.essayist.recommendation_essay(situation, &plant).await {
            Ok(essay) => essay,
            Err(e) => {
                warn!(name = %plant.display_name, error = %e, "essay generation failed");
                ESSAY_FALLBACK.to_string()
            }
        };

        Ok(PlantRecommendation {
            plant,
            recommendation,
        })
    }

    /// Fetch a record and count the view. The counter update is logged,
    /// never fatal, and the returned snapshot predates it.
    pub async fn get_plant_detail(
        &self,
        plant_id: &Uuid,
        user_id: Option<&str>,
    ) -> Result<Option<PlantDetail>, ResolutionError> {
        let Some(plant) = self.records.get(plant_id).await.map_err(store_error)? else {
            return Ok(None);
        };

        if let Err(e) = self.records.record_view(plant_id).await {
            warn!(id = %plant_id, error = %e, "view counter update failed");
        }

        let is_favorite = self.favorite_flag(user_id, plant_id).await;
        Ok(Some(PlantDetail { plant, is_favorite }))
    }

    /// Toggle a favorite. Membership changes first, then the counter;
    /// if the counter update fails the membership change is compensated
    /// so a retry cannot double-count.
    pub async fn toggle_favorite(
        &self,
        user_id: &str,
        plant_id: &Uuid,
    ) -> Result<bool, ResolutionError> {
        if self.records.get(plant_id).await.map_err(store_error)?.is_none() {
            return Err(ResolutionError::RecordNotFound(*plant_id));
        }

        let currently_favorite = self
            .favorites
            .is_favorite(user_id, plant_id)
            .await
            .map_err(store_error)?;

        if currently_favorite {
            let removed = self
                .favorites
                .remove_favorite(user_id, plant_id)
                .await
                .map_err(store_error)?;
            if removed {
                if let Err(e) = self.records.record_favorite_delta(plant_id, -1).await {
                    self.compensate_membership(user_id, plant_id, true).await;
                    return Err(store_error(e));
                }
            }
            Ok(false)
        } else {
            let added = self
                .favorites
                .add_favorite(user_id, plant_id)
                .await
                .map_err(store_error)?;
            if added {
                if let Err(e) = self.records.record_favorite_delta(plant_id, 1).await {
                    self.compensate_membership(user_id, plant_id, false).await;
                    return Err(store_error(e));
                }
            }
            Ok(true)
        }
    }

    /// Undo a membership change whose counter update failed.
    async fn compensate_membership(&self, user_id: &str, plant_id: &Uuid, re_add: bool) {
        let result = if re_add {
            self.favorites.add_favorite(user_id, plant_id).await.map(|_| ())
        } else {
            self.favorites
                .remove_favorite(user_id, plant_id)
                .await
                .map(|_| ())
        };
        if let Err(e) = result {
            warn!(
                user_id,
                id = %plant_id,
                error = %e,
                "favorite membership compensation failed; counter and membership may disagree"
            );
        }
    }

    async fn favorite_flag(&self, user_id: Option<&str>, plant_id: &Uuid) -> bool {
        let Some(user_id) = user_id else {
            return false;
        };
        match self.favorites.is_favorite(user_id, plant_id).await {
            Ok(flag) => flag,
            Err(e) => {
                warn!(user_id, id = %plant_id, error = %e, "favorite lookup failed");
                false
            }
        }
    }
}

fn store_error(e: StoreError) -> ResolutionError {
    ResolutionError::StoreUnavailable(e.to_string())
}
