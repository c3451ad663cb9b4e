//! Filtering, sorting and pagination over the in-memory collections.

use crate::domain::{Varietal, Wine, WineColor, Winery};
use crate::error::{CellarError, Result};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, async_graphql::Enum)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, async_graphql::Enum)]
pub enum WineSortField {
    Name,
    Vintage,
    Price,
    Abv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, async_graphql::Enum)]
pub enum WinerySortField {
    Name,
    FoundedYear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F> Sort<F> {
    pub fn asc(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// Criteria for listing wines. Every present criterion must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WineFilter {
    pub varietal_id: Option<String>,
    pub winery_id: Option<String>,
    /// Matches the color of the wine's varietal.
    pub color: Option<WineColor>,
    /// Matches the country of the wine's winery, case-insensitively.
    pub country: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_vintage: Option<i32>,
    pub max_vintage: Option<i32>,
    /// Case-insensitive substring of the name or tasting notes.
    pub search: Option<String>,
}

impl WineFilter {
    pub fn is_empty(&self) -> bool {
        *self == WineFilter::default()
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(CellarError::Validation(format!(
                    "minPrice ({}) is greater than maxPrice ({})",
                    min, max
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min_vintage, self.max_vintage) {
            if min > max {
                return Err(CellarError::Validation(format!(
                    "minVintage ({}) is greater than maxVintage ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }

    pub fn matches(&self, wine: &Wine, varietals: &[Varietal], wineries: &[Winery]) -> bool {
        if let Some(varietal_id) = &self.varietal_id {
            if &wine.varietal_id != varietal_id {
                return false;
            }
        }
        if let Some(winery_id) = &self.winery_id {
            if &wine.winery_id != winery_id {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if wine.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if wine.price > max {
                return false;
            }
        }
        if let Some(min) = self.min_vintage {
            if wine.vintage < min {
                return false;
            }
        }
        if let Some(max) = self.max_vintage {
            if wine.vintage > max {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty()
                && !wine.name.to_lowercase().contains(&needle)
                && !wine.tasting_notes.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(color) = self.color {
            let varietal_color = varietals
                .iter()
                .find(|v| v.id == wine.varietal_id)
                .map(|v| v.color);
            if varietal_color != Some(color) {
                return false;
            }
        }
        if let Some(country) = &self.country {
            let matches_country = wineries
                .iter()
                .find(|w| w.id == wine.winery_id)
                .map_or(false, |w| same_text(&w.country, country));
            if !matches_country {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WineryFilter {
    pub country: Option<String>,
    pub region: Option<String>,
}

impl WineryFilter {
    pub fn matches(&self, winery: &Winery) -> bool {
        let country_ok = self
            .country
            .as_ref()
            .map_or(true, |c| same_text(&winery.country, c));
        let region_ok = self
            .region
            .as_ref()
            .map_or(true, |r| same_text(&winery.region, r));
        country_ok && region_ok
    }
}

/// Case-insensitive equality with Unicode case folding, ignoring surrounding whitespace.
fn same_text(value: &str, query: &str) -> bool {
    value.trim().to_lowercase() == query.trim().to_lowercase()
}

/// Offset/limit window over a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page {
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Page {
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a page from GraphQL arguments. Limits above `max_limit` are clamped and an
    /// absent limit means `max_limit`.
    pub fn from_args(limit: Option<i32>, offset: Option<i32>, max_limit: usize) -> Result<Self> {
        let offset = match offset {
            Some(o) if o < 0 => {
                return Err(CellarError::Validation(format!(
                    "offset must not be negative, got {}",
                    o
                )))
            }
            Some(o) => o as usize,
            None => 0,
        };
        let limit = match limit {
            Some(l) if l < 0 => {
                return Err(CellarError::Validation(format!(
                    "limit must not be negative, got {}",
                    l
                )))
            }
            Some(l) => (l as usize).min(max_limit),
            None => max_limit,
        };
        Ok(Self {
            limit: Some(limit),
            offset,
        })
    }

    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let limit = self.limit.unwrap_or(usize::MAX);
        items.into_iter().skip(self.offset).take(limit).collect()
    }
}

pub fn sort_wines(wines: &mut [Wine], sort: Sort<WineSortField>) {
    // sort_by is stable, so ties keep file order
    wines.sort_by(|a, b| {
        let ordering = match sort.field {
            WineSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            WineSortField::Vintage => a.vintage.cmp(&b.vintage),
            WineSortField::Price => a.price.total_cmp(&b.price),
            WineSortField::Abv => a.abv.total_cmp(&b.abv),
        };
        sort.direction.apply(ordering)
    });
}

pub fn sort_varietals(varietals: &mut [Varietal], direction: SortDirection) {
    varietals.sort_by(|a, b| direction.apply(a.name.to_lowercase().cmp(&b.name.to_lowercase())));
}

pub fn sort_wineries(wineries: &mut [Winery], sort: Sort<WinerySortField>) {
    wineries.sort_by(|a, b| {
        let ordering = match sort.field {
            WinerySortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            WinerySortField::FoundedYear => a.founded_year.cmp(&b.founded_year),
        };
        sort.direction.apply(ordering)
    });
}
