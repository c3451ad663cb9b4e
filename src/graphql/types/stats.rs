use crate::domain::{CellarStats as DomainStats, RatingSummary};
use async_graphql::SimpleObject;

/// Aggregate of the scores a wine has received
#[derive(Debug, Clone, SimpleObject)]
pub struct Rating {
    /// Mean score, null until the wine has been rated
    pub average: Option<f64>,
    pub count: i32,
}

impl From<RatingSummary> for Rating {
    fn from(summary: RatingSummary) -> Self {
        Self {
            average: summary.average,
            count: summary.count as i32,
        }
    }
}

/// Collection sizes
#[derive(Debug, Clone, SimpleObject)]
pub struct CellarStats {
    pub varietals: i32,
    pub wineries: i32,
    pub wines: i32,
    pub favorites: i32,
    pub lists: i32,
}

impl From<DomainStats> for CellarStats {
    fn from(stats: DomainStats) -> Self {
        Self {
            varietals: stats.varietals as i32,
            wineries: stats.wineries as i32,
            wines: stats.wines as i32,
            favorites: stats.favorites as i32,
            lists: stats.lists as i32,
        }
    }
}
