//! Canonical resolver: tiered, read-only lookup of an identification
//! against the record store.
//!
//! Tier order is a contract: scientific-name exact, display-name exact,
//! then genus fuzzy. The first hit wins. Lookup errors propagate —
//! only a genuine absence resolves to `None`.

use tracing::debug;

use super::types::{Identification, RecordStore, StoreError};
use crate::models::Plant;

/// Trim and collapse inner whitespace; `None` for blank input.
pub fn normalize_scientific_name(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// True when the species part is a placeholder ("Rosa sp.", "Rosa spp."),
/// i.e. the classifier only knew the genus. Exact lookup on such a name
/// would never match a concrete species record.
pub fn has_placeholder_species(scientific_name: &str) -> bool {
    scientific_name.split_whitespace().skip(1).any(|token| {
        let t = token.trim_end_matches('.').to_lowercase();
        t == "sp" || t == "spp"
    })
}

/// Leading taxonomic token of a scientific name.
pub fn genus_token(scientific_name: &str) -> Option<&str> {
    scientific_name.split_whitespace().next()
}

/// Resolve an identification to a stored record, or `None`.
pub async fn resolve(
    store: &dyn RecordStore,
    identification: &Identification,
) -> Result<Option<Plant>, StoreError> {
    let scientific = identification
        .scientific_name
        .as_deref()
        .and_then(normalize_scientific_name);

    // Tier 1: scientific name, exact
    if let Some(sci) = scientific.as_deref() {
        if !has_placeholder_species(sci) {
            debug!(scientific_name = sci, "resolver tier 1: scientific name exact");
            if let Some(plant) = store.get_by_scientific_name(sci).await? {
                return Ok(Some(plant));
            }
        }
    }

    // Tier 2: display name, exact
    let display_name = identification.display_name.trim();
    if !display_name.is_empty() {
        debug!(display_name, "resolver tier 2: display name exact");
        if let Some(plant) = store.get_by_display_name(display_name).await? {
            return Ok(Some(plant));
        }
    }

    // Tier 3: genus fuzzy. No ranking among genus-mates; the store's
    // iteration order decides, which is not deterministic across engines.
    if let Some(genus) = scientific.as_deref().and_then(genus_token) {
        let genus = genus.to_lowercase();
        debug!(genus = %genus, "resolver tier 3: genus fuzzy");
        if let Some(plant) = store.find_by_genus_prefix(&genus).await? {
            return Ok(Some(plant));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteRecordStore;
    use crate::models::plant::test_plant;

    async fn store_with(plants: &[(&str, &str)]) -> SqliteRecordStore {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        for (name, sci) in plants {
            store.insert(&test_plant(name, sci)).await.unwrap();
        }
        store
    }

    #[test]
    fn placeholder_species_detection() {
        assert!(has_placeholder_species("Rosa sp."));
        assert!(has_placeholder_species("Rosa sp"));
        assert!(has_placeholder_species("Rosa spp."));
        assert!(has_placeholder_species("Quercus SPP"));
        assert!(!has_placeholder_species("Rosa canina"));
        assert!(!has_placeholder_species("Rosa"));
        // "spinosissima" must not be mistaken for a placeholder
        assert!(!has_placeholder_species("Rosa spinosissima"));
    }

    #[test]
    fn scientific_name_normalization() {
        assert_eq!(
            normalize_scientific_name("  Rosa   canina "),
            Some("Rosa canina".into())
        );
        assert_eq!(normalize_scientific_name("   "), None);
        assert_eq!(normalize_scientific_name(""), None);
    }

    #[tokio::test]
    async fn tier1_scientific_name_exact() {
        let store = store_with(&[("장미", "Rosa canina")]).await;
        let hit = resolve(
            &store,
            &Identification::with_scientific_name("들장미", "Rosa canina"),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(hit.display_name, "장미");
    }

    #[tokio::test]
    async fn tier2_display_name_exact() {
        let store = store_with(&[("장미", "Rosa canina")]).await;
        let hit = resolve(&store, &Identification::named("장미"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.scientific_name, "Rosa canina");
    }

    #[tokio::test]
    async fn tier3_genus_fuzzy_match() {
        let store = store_with(&[("장미", "Rosa canina")]).await;
        // No exact match for Rosa rugosa; genus tier finds the stored Rosa.
        let hit = resolve(
            &store,
            &Identification::with_scientific_name("해당화", "Rosa rugosa"),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(hit.display_name, "장미");
    }

    #[tokio::test]
    async fn foreign_genus_is_not_found() {
        let store = store_with(&[("장미", "Rosa canina")]).await;
        let miss = resolve(
            &store,
            &Identification::with_scientific_name("라벤더", "Lavandula officinalis"),
        )
        .await
        .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn placeholder_species_skips_exact_but_genus_matches() {
        let store = store_with(&[("장미", "Rosa canina")]).await;
        let hit = resolve(
            &store,
            &Identification::with_scientific_name("어떤 장미", "Rosa sp."),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(hit.display_name, "장미");
    }

    #[tokio::test]
    async fn absent_scientific_name_skips_fuzzy_tier() {
        let store = store_with(&[("장미", "Rosa canina")]).await;
        let miss = resolve(&store, &Identification::named("이름없는 꽃"))
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn exact_scientific_beats_display_name() {
        let store = store_with(&[("장미", "Rosa canina"), ("가짜 장미", "Portulaca grandiflora")])
            .await;
        // display_name points at one record, scientific name at another
        let hit = resolve(
            &store,
            &Identification::with_scientific_name("가짜 장미", "Rosa canina"),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(hit.display_name, "장미");
    }
}
