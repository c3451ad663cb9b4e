pub mod files;
pub mod in_memory;
pub mod integrity;
pub mod query;
pub mod traits;

pub use files::{DataFiles, Dataset};
pub use in_memory::InMemoryStorage;
pub use query::{
    Page, Sort, SortDirection, WineFilter, WineSortField, WineryFilter, WinerySortField,
};
pub use traits::Storage;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Dataset;
    use crate::domain::{Varietal, Wine, WineColor, Winery};

    fn varietal(id: &str, name: &str, color: WineColor) -> Varietal {
        Varietal {
            id: id.to_string(),
            name: name.to_string(),
            color,
            description: format!("{} grapes", name),
        }
    }

    fn winery(id: &str, name: &str, region: &str, country: &str, founded_year: i32) -> Winery {
        Winery {
            id: id.to_string(),
            name: name.to_string(),
            region: region.to_string(),
            country: country.to_string(),
            founded_year,
            description: format!("{} in {}", name, region),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn wine(
        id: &str,
        name: &str,
        varietal_id: &str,
        winery_id: &str,
        vintage: i32,
        abv: f64,
        price: f64,
        tasting_notes: &str,
    ) -> Wine {
        Wine {
            id: id.to_string(),
            name: name.to_string(),
            varietal_id: varietal_id.to_string(),
            winery_id: winery_id.to_string(),
            vintage,
            abv,
            price,
            tasting_notes: tasting_notes.to_string(),
        }
    }

    /// Four varietals, three wineries, four wines. Chardonnay has no wines.
    pub fn sample_dataset() -> Dataset {
        Dataset {
            varietals: vec![
                varietal("1", "Cabernet Sauvignon", WineColor::Red),
                varietal("2", "Chardonnay", WineColor::White),
                varietal("3", "Sauvignon Blanc", WineColor::White),
                varietal("4", "Pinot Noir", WineColor::Red),
            ],
            wineries: vec![
                winery("1", "Stag Ridge Cellars", "Napa Valley", "USA", 1972),
                winery("2", "Domaine des Combes", "Burgundy", "France", 1850),
                winery("3", "Wairau Estate", "Marlborough", "New Zealand", 1985),
            ],
            wines: vec![
                wine(
                    "1",
                    "Stag Ridge Cabernet",
                    "1",
                    "1",
                    2018,
                    14.5,
                    35.0,
                    "Blackcurrant, cedar and firm tannins",
                ),
                wine(
                    "2",
                    "Combes Premier Cru",
                    "4",
                    "2",
                    2018,
                    13.0,
                    65.0,
                    "Red cherry and forest floor",
                ),
                wine(
                    "3",
                    "Wairau Sauvignon Blanc",
                    "3",
                    "3",
                    2021,
                    12.5,
                    22.0,
                    "Grapefruit, passionfruit and cut grass",
                ),
                wine(
                    "4",
                    "Combes Bourgogne Rouge",
                    "4",
                    "2",
                    2019,
                    12.5,
                    28.0,
                    "Raspberry and light spice",
                ),
            ],
        }
    }
}
