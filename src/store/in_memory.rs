use super::traits::Storage;
use crate::domain::*;
use crate::error::{CellarError, Result};
use crate::metrics::StoreMetrics;
use crate::store::query::{
    sort_varietals, sort_wineries, sort_wines, Page, Sort, SortDirection, WineFilter,
    WineSortField, WineryFilter, WinerySortField,
};
use crate::store::{integrity, DataFiles, Dataset};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Highest score `rate_wine` accepts; the lowest is 1.
pub const MAX_SCORE: i32 = 5;

struct Cellar {
    dataset: Dataset,
    /// Favorite wine ids, in the order they were added.
    favorites: Vec<String>,
    ratings: HashMap<String, Vec<u8>>,
    lists: Vec<WineList>,
}

impl Cellar {
    fn wine(&self, id: &str) -> Option<&Wine> {
        self.dataset.wines.iter().find(|w| w.id == id)
    }

    fn require_wine(&self, id: &str) -> Result<&Wine> {
        self.wine(id).ok_or_else(|| CellarError::not_found("Wine", id))
    }

    fn mark_favorite(&mut self, wine_id: &str, favorite: bool) -> Result<()> {
        self.require_wine(wine_id)?;
        let present = self.favorites.iter().any(|f| f == wine_id);
        if favorite && !present {
            self.favorites.push(wine_id.to_string());
        } else if !favorite && present {
            self.favorites.retain(|f| f != wine_id);
        }
        Ok(())
    }

    fn list_mut(&mut self, id: &str) -> Result<&mut WineList> {
        self.lists
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| CellarError::not_found("Wine list", id))
    }
}

/// In-memory storage over the loaded dataset. Lookups are linear scans.
///
/// Varietals and wineries are read-only. Wine mutations optionally rewrite `wines.json`.
pub struct InMemoryStorage {
    cellar: RwLock<Cellar>,
    write_back: Option<DataFiles>,
    // Serializes write-backs so the file always ends with the latest snapshot
    write_back_lock: Mutex<()>,
}

impl InMemoryStorage {
    /// Build a store from an already-loaded dataset, checking referential integrity.
    pub fn new(dataset: Dataset) -> Result<Self> {
        integrity::validate(&dataset)?;
        StoreMetrics::record_records_loaded(
            dataset.varietals.len() + dataset.wineries.len() + dataset.wines.len(),
        );
        Ok(Self {
            cellar: RwLock::new(Cellar {
                dataset,
                favorites: Vec::new(),
                ratings: HashMap::new(),
                lists: Vec::new(),
            }),
            write_back: None,
            write_back_lock: Mutex::new(()),
        })
    }

    /// Load the data files and optionally keep them as the write-back target.
    pub fn open(files: DataFiles, write_back: bool) -> Result<Self> {
        let storage = Self::new(files.load()?)?;
        Ok(if write_back {
            storage.with_write_back(files)
        } else {
            storage
        })
    }

    pub fn with_write_back(mut self, files: DataFiles) -> Self {
        info!("Write-back enabled for {}", files.wines_path().display());
        self.write_back = Some(files);
        self
    }

    /// Rewrite `wines.json` from the current state. Failures are logged, not returned:
    /// the in-memory change stands either way.
    async fn persist_wines(&self) {
        let Some(files) = &self.write_back else {
            return;
        };
        let _guard = self.write_back_lock.lock().await;
        let wines = self.cellar.read().await.dataset.wines.clone();
        match files.write_wines(&wines).await {
            Ok(()) => StoreMetrics::record_write_back(true),
            Err(e) => {
                warn!("Write-back to {} failed: {}", files.wines_path().display(), e);
                StoreMetrics::record_write_back(false);
            }
        }
    }
}

fn validate_new_wine(wine: &NewWine) -> Result<()> {
    if wine.name.trim().is_empty() {
        return Err(CellarError::Validation("wine name must not be empty".to_string()));
    }
    if !wine.abv.is_finite() || !(0.0..=100.0).contains(&wine.abv) {
        return Err(CellarError::Validation(format!(
            "abv must be between 0 and 100, got {}",
            wine.abv
        )));
    }
    if !wine.price.is_finite() || wine.price < 0.0 {
        return Err(CellarError::Validation(format!(
            "price must not be negative, got {}",
            wine.price
        )));
    }
    if wine.vintage <= 0 {
        return Err(CellarError::Validation(format!(
            "vintage must be a positive year, got {}",
            wine.vintage
        )));
    }
    Ok(())
}

/// `max + 1` when every id is numeric and that does not overflow, otherwise a fresh uuid.
fn next_wine_id(wines: &[Wine]) -> String {
    let numeric: Option<Vec<u64>> = wines.iter().map(|w| w.id.parse::<u64>().ok()).collect();
    numeric
        .and_then(|ids| ids.into_iter().max().unwrap_or(0).checked_add(1))
        .map(|id| id.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn dedupe_preserving_order(ids: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn list_varietals(
        &self,
        sort: Option<SortDirection>,
        page: Page,
    ) -> Result<Vec<Varietal>> {
        let cellar = self.cellar.read().await;
        let mut varietals = cellar.dataset.varietals.clone();
        if let Some(direction) = sort {
            sort_varietals(&mut varietals, direction);
        }
        Ok(page.apply(varietals))
    }

    async fn get_varietal(&self, id: &str) -> Result<Option<Varietal>> {
        let cellar = self.cellar.read().await;
        Ok(cellar.dataset.varietals.iter().find(|v| v.id == id).cloned())
    }

    async fn get_varietals_by_ids(&self, ids: &[String]) -> Result<Vec<Varietal>> {
        let cellar = self.cellar.read().await;
        Ok(cellar
            .dataset
            .varietals
            .iter()
            .filter(|v| ids.contains(&v.id))
            .cloned()
            .collect())
    }

    async fn list_wineries(
        &self,
        filter: &WineryFilter,
        sort: Option<Sort<WinerySortField>>,
        page: Page,
    ) -> Result<Vec<Winery>> {
        let cellar = self.cellar.read().await;
        let mut wineries: Vec<Winery> = cellar
            .dataset
            .wineries
            .iter()
            .filter(|w| filter.matches(w))
            .cloned()
            .collect();
        if let Some(sort) = sort {
            sort_wineries(&mut wineries, sort);
        }
        Ok(page.apply(wineries))
    }

    async fn get_winery(&self, id: &str) -> Result<Option<Winery>> {
        let cellar = self.cellar.read().await;
        Ok(cellar.dataset.wineries.iter().find(|w| w.id == id).cloned())
    }

    async fn get_wineries_by_ids(&self, ids: &[String]) -> Result<Vec<Winery>> {
        let cellar = self.cellar.read().await;
        Ok(cellar
            .dataset
            .wineries
            .iter()
            .filter(|w| ids.contains(&w.id))
            .cloned()
            .collect())
    }

    async fn list_wines(
        &self,
        filter: &WineFilter,
        sort: Option<Sort<WineSortField>>,
        page: Page,
    ) -> Result<Vec<Wine>> {
        filter.validate()?;
        let cellar = self.cellar.read().await;
        let data = &cellar.dataset;
        let mut wines: Vec<Wine> = data
            .wines
            .iter()
            .filter(|w| filter.matches(w, &data.varietals, &data.wineries))
            .cloned()
            .collect();
        if let Some(sort) = sort {
            sort_wines(&mut wines, sort);
        }
        Ok(page.apply(wines))
    }

    async fn count_wines(&self, filter: &WineFilter) -> Result<usize> {
        filter.validate()?;
        let cellar = self.cellar.read().await;
        let data = &cellar.dataset;
        Ok(data
            .wines
            .iter()
            .filter(|w| filter.matches(w, &data.varietals, &data.wineries))
            .count())
    }

    async fn get_wine(&self, id: &str) -> Result<Option<Wine>> {
        let cellar = self.cellar.read().await;
        Ok(cellar.wine(id).cloned())
    }

    async fn wines_by_varietal(&self, varietal_id: &str) -> Result<Vec<Wine>> {
        let cellar = self.cellar.read().await;
        Ok(cellar
            .dataset
            .wines
            .iter()
            .filter(|w| w.varietal_id == varietal_id)
            .cloned()
            .collect())
    }

    async fn wines_by_winery(&self, winery_id: &str) -> Result<Vec<Wine>> {
        let cellar = self.cellar.read().await;
        Ok(cellar
            .dataset
            .wines
            .iter()
            .filter(|w| w.winery_id == winery_id)
            .cloned()
            .collect())
    }

    async fn create_wine(&self, new_wine: NewWine) -> Result<Wine> {
        validate_new_wine(&new_wine)?;

        let wine = {
            let mut cellar = self.cellar.write().await;
            if !cellar
                .dataset
                .varietals
                .iter()
                .any(|v| v.id == new_wine.varietal_id)
            {
                return Err(CellarError::Integrity(format!(
                    "unknown varietal_id '{}'",
                    new_wine.varietal_id
                )));
            }
            if !cellar
                .dataset
                .wineries
                .iter()
                .any(|w| w.id == new_wine.winery_id)
            {
                return Err(CellarError::Integrity(format!(
                    "unknown winery_id '{}'",
                    new_wine.winery_id
                )));
            }

            let wine = Wine {
                id: next_wine_id(&cellar.dataset.wines),
                name: new_wine.name.trim().to_string(),
                varietal_id: new_wine.varietal_id,
                winery_id: new_wine.winery_id,
                vintage: new_wine.vintage,
                abv: new_wine.abv,
                price: new_wine.price,
                tasting_notes: new_wine.tasting_notes,
            };
            cellar.dataset.wines.push(wine.clone());
            wine
        };

        info!("Created wine: {} with id {}", wine.name, wine.id);
        StoreMetrics::record_mutation("create_wine");
        self.persist_wines().await;
        Ok(wine)
    }

    async fn delete_wine(&self, id: &str) -> Result<bool> {
        let removed = {
            let mut cellar = self.cellar.write().await;
            let before = cellar.dataset.wines.len();
            cellar.dataset.wines.retain(|w| w.id != id);
            let removed = cellar.dataset.wines.len() != before;
            if removed {
                cellar.favorites.retain(|f| f != id);
                cellar.ratings.remove(id);
                for list in cellar.lists.iter_mut() {
                    list.wine_ids.retain(|w| w != id);
                }
            }
            removed
        };

        if removed {
            info!("Deleted wine with id {}", id);
            StoreMetrics::record_mutation("delete_wine");
            self.persist_wines().await;
        }
        Ok(removed)
    }

    async fn set_favorite(&self, wine_id: &str, favorite: bool) -> Result<bool> {
        let mut cellar = self.cellar.write().await;
        cellar.mark_favorite(wine_id, favorite)?;

        debug!("Set favorite for wine {} to {}", wine_id, favorite);
        StoreMetrics::record_mutation("set_favorite");
        Ok(favorite)
    }

    async fn toggle_favorite(&self, wine_id: &str) -> Result<bool> {
        // Read and flip under one guard so concurrent toggles cannot cancel out
        let mut cellar = self.cellar.write().await;
        cellar.require_wine(wine_id)?;
        let favorite = !cellar.favorites.iter().any(|f| f == wine_id);
        cellar.mark_favorite(wine_id, favorite)?;

        debug!("Toggled favorite for wine {} to {}", wine_id, favorite);
        StoreMetrics::record_mutation("toggle_favorite");
        Ok(favorite)
    }

    async fn is_favorite(&self, wine_id: &str) -> Result<bool> {
        let cellar = self.cellar.read().await;
        cellar.require_wine(wine_id)?;
        Ok(cellar.favorites.iter().any(|f| f == wine_id))
    }

    async fn list_favorites(&self) -> Result<Vec<Wine>> {
        let cellar = self.cellar.read().await;
        Ok(cellar
            .favorites
            .iter()
            .filter_map(|id| cellar.wine(id).cloned())
            .collect())
    }

    async fn rate_wine(&self, wine_id: &str, score: i32) -> Result<RatingSummary> {
        if !(1..=MAX_SCORE).contains(&score) {
            return Err(CellarError::Validation(format!(
                "score must be between 1 and {}, got {}",
                MAX_SCORE, score
            )));
        }

        let mut cellar = self.cellar.write().await;
        cellar.require_wine(wine_id)?;
        let scores = cellar.ratings.entry(wine_id.to_string()).or_default();
        scores.push(score as u8);
        let summary = RatingSummary::from_scores(scores);

        debug!("Rated wine {} with {} ({} ratings)", wine_id, score, summary.count);
        StoreMetrics::record_mutation("rate_wine");
        Ok(summary)
    }

    async fn rating(&self, wine_id: &str) -> Result<RatingSummary> {
        let cellar = self.cellar.read().await;
        Ok(cellar
            .ratings
            .get(wine_id)
            .map(|scores| RatingSummary::from_scores(scores))
            .unwrap_or_default())
    }

    async fn create_list(&self, new_list: NewWineList) -> Result<WineList> {
        let name = new_list.name.trim();
        if name.is_empty() {
            return Err(CellarError::Validation("list name must not be empty".to_string()));
        }

        let mut cellar = self.cellar.write().await;
        for wine_id in &new_list.wine_ids {
            cellar.require_wine(wine_id)?;
        }

        let list = WineList {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: new_list.description,
            wine_ids: dedupe_preserving_order(new_list.wine_ids),
            created_at: Utc::now(),
        };
        cellar.lists.push(list.clone());

        info!("Created wine list: {} with id {}", list.name, list.id);
        StoreMetrics::record_mutation("create_list");
        Ok(list)
    }

    async fn get_list(&self, id: &str) -> Result<Option<WineList>> {
        let cellar = self.cellar.read().await;
        Ok(cellar.lists.iter().find(|l| l.id == id).cloned())
    }

    async fn list_lists(&self) -> Result<Vec<WineList>> {
        let cellar = self.cellar.read().await;
        Ok(cellar.lists.clone())
    }

    async fn add_to_list(&self, list_id: &str, wine_id: &str) -> Result<WineList> {
        let mut cellar = self.cellar.write().await;
        cellar.require_wine(wine_id)?;
        let list = cellar.list_mut(list_id)?;
        if !list.wine_ids.iter().any(|w| w == wine_id) {
            list.wine_ids.push(wine_id.to_string());
        }
        let list = list.clone();

        StoreMetrics::record_mutation("add_to_list");
        Ok(list)
    }

    async fn remove_from_list(&self, list_id: &str, wine_id: &str) -> Result<WineList> {
        let mut cellar = self.cellar.write().await;
        let list = cellar.list_mut(list_id)?;
        list.wine_ids.retain(|w| w != wine_id);
        let list = list.clone();

        StoreMetrics::record_mutation("remove_from_list");
        Ok(list)
    }

    async fn delete_list(&self, id: &str) -> Result<bool> {
        let mut cellar = self.cellar.write().await;
        let before = cellar.lists.len();
        cellar.lists.retain(|l| l.id != id);
        let removed = cellar.lists.len() != before;
        if removed {
            info!("Deleted wine list with id {}", id);
            StoreMetrics::record_mutation("delete_list");
        }
        Ok(removed)
    }

    async fn lists_containing(&self, wine_id: &str) -> Result<Vec<WineList>> {
        let cellar = self.cellar.read().await;
        Ok(cellar
            .lists
            .iter()
            .filter(|l| l.wine_ids.iter().any(|w| w == wine_id))
            .cloned()
            .collect())
    }

    async fn stats(&self) -> Result<CellarStats> {
        let cellar = self.cellar.read().await;
        Ok(CellarStats {
            varietals: cellar.dataset.varietals.len(),
            wineries: cellar.dataset.wineries.len(),
            wines: cellar.dataset.wines.len(),
            favorites: cellar.favorites.len(),
            lists: cellar.lists.len(),
        })
    }
}
