//! Generation orchestrator: resolve-or-create with exactly-once commit.
//!
//! The store is the only arbiter of uniqueness. This code never assumes
//! an in-process lock is enough — other service instances may be racing —
//! so creation is: resolve, generate, sanitize, re-check, insert, and
//! fold a duplicate-key rejection back into the winner's record.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::resolver;
use super::sanitize::sanitize_candidate;
use super::types::{
    Identification, MediaFinder, PlantDraft, RecordStore, RecordSynthesizer, Resolved,
    ResolutionOutcome, StoreError, MAX_RECORD_IMAGES,
};
use super::ResolutionError;
use crate::models::Plant;

pub struct RecordOrchestrator {
    store: Arc<dyn RecordStore>,
    synthesizer: Arc<dyn RecordSynthesizer>,
    media: Arc<dyn MediaFinder>,
}

impl RecordOrchestrator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        synthesizer: Arc<dyn RecordSynthesizer>,
        media: Arc<dyn MediaFinder>,
    ) -> Self {
        Self {
            store,
            synthesizer,
            media,
        }
    }

    /// Resolve an identification, creating the canonical record when no
    /// tier matches. Concurrent calls for the same plant converge on one
    /// stored record regardless of timing.
    pub async fn resolve_or_create(
        &self,
        identification: &Identification,
    ) -> Result<Resolved, ResolutionError> {
        // Read-only resolution first; a hit mutates nothing.
        if let Some(plant) = resolver::resolve(self.store.as_ref(), identification)
            .await
            .map_err(read_error)?
        {
            debug!(name = %plant.display_name, "resolved to existing record");
            return Ok(Resolved {
                plant,
                outcome: ResolutionOutcome::Found,
            });
        }

        let display_name = identification.display_name.trim().to_string();
        let scientific_name = identification
            .scientific_name
            .as_deref()
            .and_then(resolver::normalize_scientific_name)
            .unwrap_or_default();

        info!(name = %display_name, "record miss; generating");

        // Content synthesis and media discovery run concurrently and are
        // joined: the re-check below must see both results. Synthesis
        // failure is fatal; media failure degrades to zero images.
        let (candidate, media) = tokio::join!(
            self.synthesizer.synthesize(&display_name, &scientific_name),
            self.media.find_images(
                &display_name,
                identification.english_name.as_deref(),
                &scientific_name,
            ),
        );
        let raw = candidate?;
        let images = match media {
            Ok(urls) => urls,
            Err(e) => {
                warn!(name = %display_name, error = %e, "media discovery failed; committing without images");
                Vec::new()
            }
        };

        let (draft, is_fallback) = sanitize_candidate(&raw, &display_name, &scientific_name);
        if is_fallback {
            return Err(ResolutionError::GenerationUnreliable);
        }

        // The generator may have corrected the subject's name; re-check
        // under the sanitized identity before committing.
        let sanitized_identity = Identification {
            display_name: draft.display_name.clone(),
            scientific_name: Some(draft.scientific_name.clone()).filter(|s| !s.is_empty()),
            english_name: draft.english_name.clone(),
            confidence: None,
        };
        if let Some(existing) = resolver::resolve(self.store.as_ref(), &sanitized_identity)
            .await
            .map_err(read_error)?
        {
            info!(name = %existing.display_name, "record appeared during generation; discarding candidate");
            return Ok(Resolved {
                plant: existing,
                outcome: ResolutionOutcome::Merged,
            });
        }

        let plant = assemble_record(draft, images);
        self.commit(plant).await
    }

    /// Insert the freshly assembled record. The insert runs on a
    /// detached task: once submitted it completes even if the caller is
    /// cancelled, so no generated record is silently dropped mid-write.
    async fn commit(&self, plant: Plant) -> Result<Resolved, ResolutionError> {
        let store = Arc::clone(&self.store);
        let record = plant.clone();
        let submitted = tokio::spawn(async move { store.insert(&record).await });

        match submitted.await {
            Ok(Ok(())) => {
                info!(name = %plant.display_name, id = %plant.id, "record committed");
                Ok(Resolved {
                    plant,
                    outcome: ResolutionOutcome::Committed,
                })
            }
            Ok(Err(StoreError::Conflict)) => {
                // A concurrent writer won between the re-check and the
                // insert. Their record is the canonical one.
                info!(name = %plant.display_name, "duplicate-key conflict; merging into winner");
                let existing = self
                    .store
                    .get_by_display_name(&plant.display_name)
                    .await
                    .map_err(read_error)?
                    .ok_or_else(|| {
                        ResolutionError::StoreUnavailable(
                            "conflicting record not readable after duplicate-key rejection".into(),
                        )
                    })?;
                Ok(Resolved {
                    plant: existing,
                    outcome: ResolutionOutcome::Merged,
                })
            }
            Ok(Err(StoreError::Unavailable(reason))) => {
                self.rollback_partial_commit(&plant.id).await;
                Err(ResolutionError::StoreUnavailable(reason))
            }
            Err(join_error) => {
                self.rollback_partial_commit(&plant.id).await;
                Err(ResolutionError::StoreUnavailable(format!(
                    "commit task aborted: {join_error}"
                )))
            }
        }
    }

    /// Best-effort cleanup of a possibly half-written record. Runs on
    /// every failed commit path so no other call site needs to remember.
    async fn rollback_partial_commit(&self, id: &Uuid) {
        if let Err(e) = self.store.delete(id).await {
            warn!(id = %id, error = %e, "rollback delete failed; record may need manual cleanup");
        }
    }
}

/// Attach media and runtime fields to a sanitized draft.
fn assemble_record(draft: PlantDraft, mut images: Vec<String>) -> Plant {
    images.truncate(MAX_RECORD_IMAGES);
    let primary_image = images.first().cloned();
    Plant {
        id: Uuid::new_v4(),
        display_name: draft.display_name,
        scientific_name: draft.scientific_name,
        english_name: draft.english_name,
        taxonomy: draft.taxonomy,
        horticulture: draft.horticulture,
        habitat: draft.habitat,
        flower_info: draft.flower_info,
        color_info: draft.color_info,
        scent_info: draft.scent_info,
        stories: draft.stories,
        season: draft.season,
        blooming_months: draft.blooming_months,
        search_keywords: draft.search_keywords,
        images,
        primary_image,
        view_count: 0,
        favorite_count: 0,
        popularity_score: 0,
        created_at: Utc::now().naive_utc(),
    }
}

/// Read-side store failures. Reads cannot conflict; a conflict here
/// means the store misbehaved.
fn read_error(e: StoreError) -> ResolutionError {
    ResolutionError::StoreUnavailable(e.to_string())
}
