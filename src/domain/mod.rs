use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Color classification of a varietal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, async_graphql::Enum,
)]
#[serde(rename_all = "lowercase")]
pub enum WineColor {
    Red,
    White,
    Rose,
    Sparkling,
    Dessert,
    Orange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Varietal {
    pub id: String,
    pub name: String,
    pub color: WineColor,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Winery {
    pub id: String,
    pub name: String,
    pub region: String,
    pub country: String,
    pub founded_year: i32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wine {
    pub id: String,
    pub name: String,
    pub varietal_id: String,
    pub winery_id: String,
    pub vintage: i32,
    /// Alcohol by volume, in percent.
    pub abv: f64,
    pub price: f64,
    #[serde(default)]
    pub tasting_notes: String,
}

/// Arguments for creating a wine; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewWine {
    pub name: String,
    pub varietal_id: String,
    pub winery_id: String,
    pub vintage: i32,
    pub abv: f64,
    pub price: f64,
    pub tasting_notes: String,
}

/// A user-curated, ordered list of wines. Process-local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineList {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub wine_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWineList {
    pub name: String,
    pub description: Option<String>,
    pub wine_ids: Vec<String>,
}

/// Aggregate of the scores a wine has received.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
    pub average: Option<f64>,
    pub count: usize,
}

impl RatingSummary {
    pub fn from_scores(scores: &[u8]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }
        let total: u32 = scores.iter().map(|s| u32::from(*s)).sum();
        Self {
            average: Some(f64::from(total) / scores.len() as f64),
            count: scores.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellarStats {
    pub varietals: usize,
    pub wineries: usize,
    pub wines: usize,
    pub favorites: usize,
    pub lists: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_serializes_lowercase() {
        let json = serde_json::to_string(&WineColor::Sparkling).unwrap();
        assert_eq!(json, "\"sparkling\"");
        let parsed: WineColor = serde_json::from_str("\"rose\"").unwrap();
        assert_eq!(parsed, WineColor::Rose);
    }

    #[test]
    fn test_rating_summary() {
        assert_eq!(RatingSummary::from_scores(&[]), RatingSummary::default());

        let summary = RatingSummary::from_scores(&[4, 5, 3]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average, Some(4.0));
    }

    #[test]
    fn test_wine_without_tasting_notes_parses() {
        let wine: Wine = serde_json::from_str(
            r#"{"id":"1","name":"Test","varietal_id":"2","winery_id":"3","vintage":2019,"abv":13.5,"price":24.0}"#,
        )
        .unwrap();
        assert_eq!(wine.tasting_notes, "");
        assert_eq!(wine.varietal_id, "2");
    }
}
