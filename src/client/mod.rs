//! GraphQL client for the wine catalogue with a normalized response cache

pub mod cache;
pub mod models;

pub use cache::NormalizedCache;
pub use models::{
    FavoriteStatus, VarietalSummary, WineDetail, WineFilterArgs, WineListSummary, WineSummary,
    WinerySummary,
};

use crate::error::{CellarError, Result};
use models::{GraphQLRequest, GraphQLResponseBody};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:4000/graphql";

const WINE_SUMMARY_FIELDS: &str = r#"
    __typename id name vintage price isFavorite
    varietal { __typename id name color }
    winery { __typename id name country }
"#;

const WINE_DETAIL_FIELDS: &str = r#"
    __typename id name vintage abv price tastingNotes isFavorite
    rating { average count }
    varietal { __typename id name color }
    winery { __typename id name country }
"#;

const WINE_LIST_FIELDS: &str = r#"
    __typename id name description
    wines { __typename id name }
"#;

pub struct CellarClient {
    http: reqwest::Client,
    endpoint: String,
    cache: Mutex<NormalizedCache>,
}

impl CellarClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_http_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            cache: Mutex::new(NormalizedCache::new()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a GraphQL operation and return its `data`.
    ///
    /// Successful query results are normalized into the cache under the operation key;
    /// mutation results only update the entities they return.
    pub async fn execute(&self, query: &str, variables: Value) -> Result<Value> {
        let request = GraphQLRequest {
            query,
            variables: &variables,
        };

        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        let text = response.text().await?;

        let body: GraphQLResponseBody = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(CellarError::GraphQL {
                    message: format!("HTTP {}: {}", status, text),
                    code: None,
                });
            }
            Err(e) => return Err(e.into()),
        };

        if !body.errors.is_empty() {
            let message = body
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            let code = body.errors.iter().find_map(|e| e.code());
            debug!("GraphQL errors from {}: {}", self.endpoint, message);
            return Err(CellarError::GraphQL { message, code });
        }

        let data = body.data.ok_or_else(|| CellarError::GraphQL {
            message: "response carried no data".to_string(),
            code: None,
        })?;

        let mut cache = self.cache.lock().await;
        if cache::is_mutation(query) {
            cache.write_entities(&data);
        } else {
            cache.write_result(&cache::operation_key(query, &variables), &data);
        }
        drop(cache);

        Ok(data)
    }

    /// A previously fetched result rebuilt from the cache, if it is still complete
    pub async fn cached(&self, query: &str, variables: &Value) -> Option<Value> {
        let key = cache::operation_key(query, variables);
        self.cache.lock().await.read_result(&key)
    }

    /// Current fields of a cached entity such as `Wine:1`
    pub async fn cached_entity(&self, key: &str) -> Option<Value> {
        self.cache.lock().await.entity(key)
    }

    /// Number of query results held in the cache
    pub async fn cached_result_count(&self) -> usize {
        self.cache.lock().await.result_count()
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
        field: &str,
    ) -> Result<T> {
        let mut data = self.execute(query, variables).await?;
        let value = data
            .get_mut(field)
            .map(Value::take)
            .ok_or_else(|| CellarError::GraphQL {
                message: format!("response is missing field '{}'", field),
                code: None,
            })?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn wines(
        &self,
        filter: Option<WineFilterArgs>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Vec<WineSummary>> {
        let query = format!(
            "query Wines($filter: WineFilter, $limit: Int, $offset: Int) {{ wines(filter: $filter, limit: $limit, offset: $offset) {{ {} }} }}",
            WINE_SUMMARY_FIELDS
        );
        let variables = json!({ "filter": filter, "limit": limit, "offset": offset });
        self.fetch(&query, variables, "wines").await
    }

    pub async fn wine(&self, id: &str) -> Result<Option<WineDetail>> {
        let query = format!(
            "query Wine($id: ID!) {{ wine(id: $id) {{ {} }} }}",
            WINE_DETAIL_FIELDS
        );
        self.fetch(&query, json!({ "id": id }), "wine").await
    }

    pub async fn varietals(&self) -> Result<Vec<VarietalSummary>> {
        let query =
            "query Varietals { varietals { __typename id name color description wineCount } }";
        self.fetch(query, json!({}), "varietals").await
    }

    pub async fn wineries(&self) -> Result<Vec<WinerySummary>> {
        let query = "query Wineries { wineries { __typename id name region country foundedYear wineCount } }";
        self.fetch(query, json!({}), "wineries").await
    }

    pub async fn wine_lists(&self) -> Result<Vec<WineListSummary>> {
        let query = format!("query WineLists {{ wineLists {{ {} }} }}", WINE_LIST_FIELDS);
        self.fetch(&query, json!({}), "wineLists").await
    }

    pub async fn rate_wine(&self, id: &str, score: i32) -> Result<WineDetail> {
        let query = format!(
            "mutation RateWine($id: ID!, $score: Int!) {{ rateWine(wineId: $id, score: $score) {{ {} }} }}",
            WINE_DETAIL_FIELDS
        );
        self.fetch(&query, json!({ "id": id, "score": score }), "rateWine")
            .await
    }

    pub async fn create_wine_list(
        &self,
        name: &str,
        wine_ids: &[String],
    ) -> Result<WineListSummary> {
        let query = format!(
            "mutation CreateWineList($input: NewWineListInput!) {{ createWineList(input: $input) {{ {} }} }}",
            WINE_LIST_FIELDS
        );
        let variables = json!({ "input": { "name": name, "wineIds": wine_ids } });
        self.fetch(&query, variables, "createWineList").await
    }

    /// Flip a wine's favorite flag, showing the expected state in the cache right away.
    ///
    /// The optimistic value is only written when the wine is already cached; it is dropped
    /// in favour of the server's answer, or rolled back if the request fails.
    pub async fn toggle_favorite(&self, id: &str) -> Result<FavoriteStatus> {
        let entity_key = format!("Wine:{}", id);
        let layer_id = format!("toggle-favorite:{}:{}", id, Uuid::new_v4());

        {
            let mut cache = self.cache.lock().await;
            let current = cache
                .entity(&entity_key)
                .and_then(|wine| wine.get("isFavorite").and_then(Value::as_bool));
            if let Some(current) = current {
                let mut fields = Map::new();
                fields.insert("isFavorite".to_string(), Value::Bool(!current));
                cache.write_optimistic(&layer_id, &entity_key, fields);
            }
        }

        let query = "mutation ToggleFavorite($id: ID!) { toggleFavorite(wineId: $id) { __typename id isFavorite } }";
        let result = self
            .fetch::<FavoriteStatus>(query, json!({ "id": id }), "toggleFavorite")
            .await;

        let mut cache = self.cache.lock().await;
        match result {
            Ok(status) => {
                cache.commit(&layer_id);
                Ok(status)
            }
            Err(e) => {
                if cache.rollback(&layer_id) {
                    warn!("Rolled back optimistic favorite toggle for wine {}: {}", id, e);
                }
                Err(e)
            }
        }
    }
}
