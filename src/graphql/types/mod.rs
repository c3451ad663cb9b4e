pub mod inputs;
pub mod stats;
pub mod varietal;
pub mod wine;
pub mod wine_list;
pub mod winery;

pub use inputs::{
    NewWineInput, NewWineListInput, WineFilterInput, WineSortInput, WineryFilterInput,
    WinerySortInput,
};
pub use stats::{CellarStats, Rating};
pub use varietal::Varietal;
pub use wine::Wine;
pub use wine_list::WineList;
pub use winery::Winery;
