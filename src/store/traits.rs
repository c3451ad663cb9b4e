use crate::domain::*;
use crate::error::Result;
use crate::store::query::{
    Page, Sort, SortDirection, WineFilter, WineSortField, WineryFilter, WinerySortField,
};
use async_trait::async_trait;

/// Data-access layer over varietals, wineries, wines and the process-local user state
/// (favorites, ratings, wine lists).
#[async_trait]
pub trait Storage: Send + Sync {
    // Varietal operations
    async fn list_varietals(
        &self,
        sort: Option<SortDirection>,
        page: Page,
    ) -> Result<Vec<Varietal>>;
    async fn get_varietal(&self, id: &str) -> Result<Option<Varietal>>;
    async fn get_varietals_by_ids(&self, ids: &[String]) -> Result<Vec<Varietal>>;

    // Winery operations
    async fn list_wineries(
        &self,
        filter: &WineryFilter,
        sort: Option<Sort<WinerySortField>>,
        page: Page,
    ) -> Result<Vec<Winery>>;
    async fn get_winery(&self, id: &str) -> Result<Option<Winery>>;
    async fn get_wineries_by_ids(&self, ids: &[String]) -> Result<Vec<Winery>>;

    // Wine operations
    async fn list_wines(
        &self,
        filter: &WineFilter,
        sort: Option<Sort<WineSortField>>,
        page: Page,
    ) -> Result<Vec<Wine>>;
    async fn count_wines(&self, filter: &WineFilter) -> Result<usize>;
    async fn get_wine(&self, id: &str) -> Result<Option<Wine>>;
    async fn wines_by_varietal(&self, varietal_id: &str) -> Result<Vec<Wine>>;
    async fn wines_by_winery(&self, winery_id: &str) -> Result<Vec<Wine>>;
    async fn create_wine(&self, wine: NewWine) -> Result<Wine>;
    async fn delete_wine(&self, id: &str) -> Result<bool>;

    // Favorites
    async fn set_favorite(&self, wine_id: &str, favorite: bool) -> Result<bool>;
    async fn toggle_favorite(&self, wine_id: &str) -> Result<bool>;
    async fn is_favorite(&self, wine_id: &str) -> Result<bool>;
    async fn list_favorites(&self) -> Result<Vec<Wine>>;

    // Ratings
    async fn rate_wine(&self, wine_id: &str, score: i32) -> Result<RatingSummary>;
    async fn rating(&self, wine_id: &str) -> Result<RatingSummary>;

    // Wine lists
    async fn create_list(&self, list: NewWineList) -> Result<WineList>;
    async fn get_list(&self, id: &str) -> Result<Option<WineList>>;
    async fn list_lists(&self) -> Result<Vec<WineList>>;
    async fn add_to_list(&self, list_id: &str, wine_id: &str) -> Result<WineList>;
    async fn remove_from_list(&self, list_id: &str, wine_id: &str) -> Result<WineList>;
    async fn delete_list(&self, id: &str) -> Result<bool>;
    async fn lists_containing(&self, wine_id: &str) -> Result<Vec<WineList>>;

    async fn stats(&self) -> Result<CellarStats>;
}
