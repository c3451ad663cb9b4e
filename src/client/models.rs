// Client-side models for GraphQL responses
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarietalRef {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WineryRef {
    pub id: String,
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WineSummary {
    pub id: String,
    pub name: String,
    pub vintage: i32,
    pub price: f64,
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
    pub varietal: VarietalRef,
    pub winery: WineryRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSummary {
    pub average: Option<f64>,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WineDetail {
    pub id: String,
    pub name: String,
    pub vintage: i32,
    pub abv: f64,
    pub price: f64,
    #[serde(rename = "tastingNotes")]
    pub tasting_notes: String,
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
    pub rating: RatingSummary,
    pub varietal: VarietalRef,
    pub winery: WineryRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarietalSummary {
    pub id: String,
    pub name: String,
    pub color: String,
    pub description: String,
    #[serde(rename = "wineCount")]
    pub wine_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinerySummary {
    pub id: String,
    pub name: String,
    pub region: String,
    pub country: String,
    #[serde(rename = "foundedYear")]
    pub founded_year: i32,
    #[serde(rename = "wineCount")]
    pub wine_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WineListEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WineListSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub wines: Vec<WineListEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteStatus {
    pub id: String,
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
}

/// Optional criteria for `CellarClient::wines`; absent fields are left out of the request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WineFilterArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub varietal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winery_id: Option<String>,
    /// GraphQL enum value, e.g. `RED`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct GraphQLRequest<'a> {
    pub query: &'a str,
    pub variables: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQLResponseBody {
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Vec<GraphQLErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQLErrorBody {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

impl GraphQLErrorBody {
    pub fn code(&self) -> Option<String> {
        self.extensions
            .as_ref()?
            .get("code")?
            .as_str()
            .map(str::to_string)
    }
}
