use crate::domain::{NewWine, NewWineList, WineColor};
use crate::store::{
    Sort, SortDirection, WineFilter, WineSortField, WineryFilter, WinerySortField,
};
use async_graphql::{InputObject, ID};

#[derive(Debug, Default, InputObject)]
#[graphql(name = "WineFilter")]
pub struct WineFilterInput {
    pub varietal_id: Option<ID>,
    pub winery_id: Option<ID>,
    /// Color of the wine's varietal
    pub color: Option<WineColor>,
    /// Country of the wine's winery (case-insensitive)
    pub country: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_vintage: Option<i32>,
    pub max_vintage: Option<i32>,
    /// Case-insensitive match on name or tasting notes
    pub search: Option<String>,
}

impl From<WineFilterInput> for WineFilter {
    fn from(input: WineFilterInput) -> Self {
        Self {
            varietal_id: input.varietal_id.map(|id| id.0),
            winery_id: input.winery_id.map(|id| id.0),
            color: input.color,
            country: input.country,
            min_price: input.min_price,
            max_price: input.max_price,
            min_vintage: input.min_vintage,
            max_vintage: input.max_vintage,
            search: input.search,
        }
    }
}

#[derive(Debug, InputObject)]
#[graphql(name = "WineSort")]
pub struct WineSortInput {
    pub field: WineSortField,
    #[graphql(default)]
    pub direction: SortDirection,
}

impl From<WineSortInput> for Sort<WineSortField> {
    fn from(input: WineSortInput) -> Self {
        Sort {
            field: input.field,
            direction: input.direction,
        }
    }
}

#[derive(Debug, Default, InputObject)]
#[graphql(name = "WineryFilter")]
pub struct WineryFilterInput {
    pub country: Option<String>,
    pub region: Option<String>,
}

impl From<WineryFilterInput> for WineryFilter {
    fn from(input: WineryFilterInput) -> Self {
        Self {
            country: input.country,
            region: input.region,
        }
    }
}

#[derive(Debug, InputObject)]
#[graphql(name = "WinerySort")]
pub struct WinerySortInput {
    pub field: WinerySortField,
    #[graphql(default)]
    pub direction: SortDirection,
}

impl From<WinerySortInput> for Sort<WinerySortField> {
    fn from(input: WinerySortInput) -> Self {
        Sort {
            field: input.field,
            direction: input.direction,
        }
    }
}

#[derive(Debug, InputObject)]
pub struct NewWineInput {
    pub name: String,
    pub varietal_id: ID,
    pub winery_id: ID,
    pub vintage: i32,
    pub abv: f64,
    pub price: f64,
    #[graphql(default)]
    pub tasting_notes: String,
}

impl From<NewWineInput> for NewWine {
    fn from(input: NewWineInput) -> Self {
        Self {
            name: input.name,
            varietal_id: input.varietal_id.0,
            winery_id: input.winery_id.0,
            vintage: input.vintage,
            abv: input.abv,
            price: input.price,
            tasting_notes: input.tasting_notes,
        }
    }
}

#[derive(Debug, InputObject)]
pub struct NewWineListInput {
    pub name: String,
    pub description: Option<String>,
    #[graphql(default)]
    pub wine_ids: Vec<ID>,
}

impl From<NewWineListInput> for NewWineList {
    fn from(input: NewWineListInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            wine_ids: input.wine_ids.into_iter().map(|id| id.0).collect(),
        }
    }
}
