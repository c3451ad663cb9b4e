use crate::domain::{Varietal, Winery};
use crate::store::Storage;
use async_graphql::dataloader::{DataLoader, Loader};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// DataLoader for batching varietal lookups from `Wine.varietal`
pub struct VarietalLoader {
    storage: Arc<dyn Storage>,
}

impl VarietalLoader {
    pub fn new(storage: Arc<dyn Storage>) -> DataLoader<Self> {
        DataLoader::new(Self { storage }, tokio::spawn)
    }
}

#[async_trait]
impl Loader<String> for VarietalLoader {
    type Value = Varietal;
    type Error = String;

    async fn load(&self, keys: &[String]) -> Result<HashMap<String, Self::Value>, Self::Error> {
        let varietals = self
            .storage
            .get_varietals_by_ids(keys)
            .await
            .map_err(|e| e.to_string())?;

        Ok(varietals.into_iter().map(|v| (v.id.clone(), v)).collect())
    }
}

/// DataLoader for batching winery lookups from `Wine.winery`
pub struct WineryLoader {
    storage: Arc<dyn Storage>,
}

impl WineryLoader {
    pub fn new(storage: Arc<dyn Storage>) -> DataLoader<Self> {
        DataLoader::new(Self { storage }, tokio::spawn)
    }
}

#[async_trait]
impl Loader<String> for WineryLoader {
    type Value = Winery;
    type Error = String;

    async fn load(&self, keys: &[String]) -> Result<HashMap<String, Self::Value>, Self::Error> {
        let wineries = self
            .storage
            .get_wineries_by_ids(keys)
            .await
            .map_err(|e| e.to_string())?;

        Ok(wineries.into_iter().map(|w| (w.id.clone(), w)).collect())
    }
}
