//! Client-side normalized cache
//!
//! Objects that carry both `__typename` and `id` are stored once under `Typename:id` and
//! referenced as `{"__ref": "Typename:id"}` from root results and from other entities.
//! Each root result remembers the selection it was fetched with, so reading it back
//! rebuilds the same shape from the current entity values. Optimistic layers sit on top
//! of the base entities until they are committed or rolled back.

use serde_json::{Map, Value};
use std::collections::HashMap;

pub const REF_FIELD: &str = "__ref";

type Fields = Map<String, Value>;

/// Selection structure recorded when a result is written
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Scalar,
    Entity(Vec<(String, Shape)>),
    Object(Vec<(String, Shape)>),
    /// Element shape, unknown when the list was empty at write time
    List(Option<Box<Shape>>),
}

/// Cache key of an object, if it identifies an entity
pub fn entity_key(object: &Fields) -> Option<String> {
    let typename = object.get("__typename")?.as_str()?;
    let id = match object.get("id")? {
        Value::String(id) => id.clone(),
        Value::Number(id) => id.to_string(),
        _ => return None,
    };
    Some(format!("{}:{}", typename, id))
}

/// Cache key for a root result: the query with collapsed whitespace plus its variables
pub fn operation_key(query: &str, variables: &Value) -> String {
    let query = query.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{}|{}", query, variables)
}

/// Whether a document is a mutation; its response only updates entities
pub fn is_mutation(query: &str) -> bool {
    query.trim_start().starts_with("mutation")
}

#[derive(Debug, Default)]
pub struct NormalizedCache {
    entities: HashMap<String, Fields>,
    results: HashMap<String, (Value, Shape)>,
    layers: Vec<(String, HashMap<String, Fields>)>,
}

impl NormalizedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `data` into the entity store and remember it under `key`.
    pub fn write_result(&mut self, key: &str, data: &Value) {
        let (normalized, shape) = self.normalize(data);
        self.results.insert(key.to_string(), (normalized, shape));
    }

    /// Merge the entities in `data` without keeping a root result for it.
    pub fn write_entities(&mut self, data: &Value) {
        self.normalize(data);
    }

    /// Rebuild a stored result from the current entities and optimistic layers.
    ///
    /// Returns `None` when the result was never written or a referenced entity or field is
    /// no longer available.
    pub fn read_result(&self, key: &str) -> Option<Value> {
        let (value, shape) = self.results.get(key)?;
        self.denormalize(value, shape)
    }

    /// Current fields of an entity, optimistic layers applied
    pub fn entity(&self, key: &str) -> Option<Value> {
        self.resolve_entity(key).map(Value::Object)
    }

    /// Overlay `fields` on an entity inside the named optimistic layer.
    pub fn write_optimistic(&mut self, layer_id: &str, entity_key: &str, fields: Fields) {
        let position = match self.layers.iter().position(|(id, _)| id == layer_id) {
            Some(position) => position,
            None => {
                self.layers.push((layer_id.to_string(), HashMap::new()));
                self.layers.len() - 1
            }
        };

        let layer = &mut self.layers[position].1;
        let entry = layer.entry(entity_key.to_string()).or_default();
        for (name, value) in fields {
            entry.insert(name, value);
        }
    }

    /// Discard an optimistic layer. Returns false when no such layer exists.
    pub fn rollback(&mut self, layer_id: &str) -> bool {
        self.remove_layer(layer_id)
    }

    /// Drop an optimistic layer once the authoritative result has been written.
    pub fn commit(&mut self, layer_id: &str) -> bool {
        self.remove_layer(layer_id)
    }

    /// Remove an entity from the base store and every optimistic layer.
    pub fn evict(&mut self, entity_key: &str) -> bool {
        let mut removed = self.entities.remove(entity_key).is_some();
        for (_, layer) in &mut self.layers {
            removed |= layer.remove(entity_key).is_some();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.results.clear();
        self.layers.clear();
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    pub fn has_layer(&self, layer_id: &str) -> bool {
        self.layers.iter().any(|(id, _)| id == layer_id)
    }

    fn remove_layer(&mut self, layer_id: &str) -> bool {
        let before = self.layers.len();
        self.layers.retain(|(id, _)| id != layer_id);
        self.layers.len() != before
    }

    fn normalize(&mut self, value: &Value) -> (Value, Shape) {
        match value {
            Value::Object(object) => {
                let mut fields = Fields::new();
                let mut shape = Vec::with_capacity(object.len());
                for (name, child) in object {
                    let (normalized, child_shape) = self.normalize(child);
                    fields.insert(name.clone(), normalized);
                    shape.push((name.clone(), child_shape));
                }

                match entity_key(object) {
                    Some(key) => {
                        let entity = self.entities.entry(key.clone()).or_default();
                        for (name, field) in fields {
                            entity.insert(name, field);
                        }
                        (reference(&key), Shape::Entity(shape))
                    }
                    None => (Value::Object(fields), Shape::Object(shape)),
                }
            }
            Value::Array(items) => {
                let mut element_shape = None;
                let normalized = items
                    .iter()
                    .map(|item| {
                        let (normalized, shape) = self.normalize(item);
                        if element_shape.is_none() {
                            element_shape = Some(Box::new(shape));
                        }
                        normalized
                    })
                    .collect();
                (Value::Array(normalized), Shape::List(element_shape))
            }
            scalar => (scalar.clone(), Shape::Scalar),
        }
    }

    fn denormalize(&self, value: &Value, shape: &Shape) -> Option<Value> {
        if value.is_null() {
            return Some(Value::Null);
        }

        match shape {
            Shape::Scalar => Some(value.clone()),
            Shape::Entity(selection) => {
                let key = value.get(REF_FIELD)?.as_str()?;
                let entity = self.resolve_entity(key)?;
                self.select(&entity, selection)
            }
            Shape::Object(selection) => self.select(value.as_object()?, selection),
            Shape::List(element) => {
                let items = value.as_array()?;
                if items.is_empty() {
                    return Some(Value::Array(Vec::new()));
                }
                let element = element.as_deref()?;
                items
                    .iter()
                    .map(|item| self.denormalize(item, element))
                    .collect::<Option<Vec<_>>>()
                    .map(Value::Array)
            }
        }
    }

    fn select(&self, fields: &Fields, selection: &[(String, Shape)]) -> Option<Value> {
        let mut out = Fields::new();
        for (name, shape) in selection {
            let value = fields.get(name)?;
            out.insert(name.clone(), self.denormalize(value, shape)?);
        }
        Some(Value::Object(out))
    }

    fn resolve_entity(&self, key: &str) -> Option<Fields> {
        let mut merged = self.entities.get(key).cloned();
        for (_, layer) in &self.layers {
            if let Some(overlay) = layer.get(key) {
                let entity = merged.get_or_insert_with(Fields::new);
                for (name, value) in overlay {
                    entity.insert(name.clone(), value.clone());
                }
            }
        }
        merged
    }
}

fn reference(key: &str) -> Value {
    let mut object = Fields::new();
    object.insert(REF_FIELD.to_string(), Value::String(key.to_string()));
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    fn wines_result() -> Value {
        json!({
            "wines": [
                {
                    "__typename": "Wine", "id": "1", "name": "Stag Ridge Cabernet",
                    "isFavorite": false,
                    "varietal": { "__typename": "Varietal", "id": "1", "name": "Cabernet Sauvignon" }
                },
                {
                    "__typename": "Wine", "id": "2", "name": "Combes Pinot Noir",
                    "isFavorite": true,
                    "varietal": { "__typename": "Varietal", "id": "4", "name": "Pinot Noir" }
                }
            ]
        })
    }

    #[test]
    fn test_entity_key() {
        assert_eq!(
            entity_key(&fields(json!({"__typename": "Wine", "id": "7"}))),
            Some("Wine:7".to_string())
        );
        assert_eq!(
            entity_key(&fields(json!({"__typename": "Wine", "id": 7}))),
            Some("Wine:7".to_string())
        );
        assert_eq!(entity_key(&fields(json!({"id": "7"}))), None);
        assert_eq!(entity_key(&fields(json!({"__typename": "Rating"}))), None);
    }

    #[test]
    fn test_operation_key_ignores_whitespace() {
        let vars = json!({"id": "1"});
        assert_eq!(
            operation_key("query { wine(id: $id) {\n  id\n} }", &vars),
            operation_key("query { wine(id: $id) { id } }", &vars)
        );
        assert_ne!(
            operation_key("{ wines { id } }", &json!({})),
            operation_key("{ wines { id } }", &json!({"limit": 1}))
        );
    }

    #[test]
    fn test_is_mutation() {
        assert!(is_mutation("  mutation Rate($id: ID!) { rateWine(wineId: $id, score: 4) { id } }"));
        assert!(!is_mutation("query Wines { wines { id } }"));
        assert!(!is_mutation("{ stats { wines } }"));
    }

    #[test]
    fn test_write_entities_keeps_no_root_result() {
        let mut cache = NormalizedCache::new();
        cache.write_result("wines", &wines_result());

        for _ in 0..3 {
            cache.write_entities(
                &json!({"toggleFavorite": {"__typename": "Wine", "id": "1", "isFavorite": true}}),
            );
        }

        assert_eq!(cache.result_count(), 1);
        assert_eq!(cache.read_result("wines").unwrap()["wines"][0]["isFavorite"], true);
    }

    #[test]
    fn test_round_trip_through_references() {
        let mut cache = NormalizedCache::new();
        let data = wines_result();
        cache.write_result("wines", &data);

        assert_eq!(cache.read_result("wines"), Some(data));
        assert_eq!(cache.entity_count(), 4);

        let wine = cache.entity("Wine:1").unwrap();
        assert_eq!(wine["varietal"], json!({"__ref": "Varietal:1"}));
    }

    #[test]
    fn test_queries_share_entities() {
        let mut cache = NormalizedCache::new();
        cache.write_result("wines", &wines_result());
        cache.write_result(
            "wine:1",
            &json!({"wine": {"__typename": "Wine", "id": "1", "name": "Stag Ridge Reserve", "price": 40.0}}),
        );

        // one entity, updated by the second query and visible through the first
        assert_eq!(cache.entity_count(), 4);
        let wines = cache.read_result("wines").unwrap();
        assert_eq!(wines["wines"][0]["name"], "Stag Ridge Reserve");
        assert_eq!(cache.entity("Wine:1").unwrap()["price"], 40.0);
    }

    #[test]
    fn test_optimistic_layer_visible_until_rollback() {
        let mut cache = NormalizedCache::new();
        cache.write_result("wines", &wines_result());

        cache.write_optimistic("toggle", "Wine:1", fields(json!({"isFavorite": true})));
        assert!(cache.has_layer("toggle"));
        assert_eq!(cache.read_result("wines").unwrap()["wines"][0]["isFavorite"], true);
        assert_eq!(cache.entity("Wine:1").unwrap()["isFavorite"], true);

        assert!(cache.rollback("toggle"));
        assert!(!cache.has_layer("toggle"));
        assert_eq!(cache.read_result("wines").unwrap()["wines"][0]["isFavorite"], false);
        assert!(!cache.rollback("toggle"));
    }

    #[test]
    fn test_commit_keeps_server_value() {
        let mut cache = NormalizedCache::new();
        cache.write_result("wines", &wines_result());
        cache.write_optimistic("toggle", "Wine:2", fields(json!({"isFavorite": false})));

        cache.write_result(
            "toggle-response",
            &json!({"toggleFavorite": {"__typename": "Wine", "id": "2", "isFavorite": false}}),
        );
        assert!(cache.commit("toggle"));

        assert_eq!(cache.entity("Wine:2").unwrap()["isFavorite"], false);
        assert_eq!(cache.read_result("wines").unwrap()["wines"][1]["isFavorite"], false);
    }

    #[test]
    fn test_layers_apply_newest_last() {
        let mut cache = NormalizedCache::new();
        cache.write_result("wines", &wines_result());
        cache.write_optimistic("first", "Wine:1", fields(json!({"name": "First"})));
        cache.write_optimistic("second", "Wine:1", fields(json!({"name": "Second"})));
        assert_eq!(cache.entity("Wine:1").unwrap()["name"], "Second");

        cache.rollback("second");
        assert_eq!(cache.entity("Wine:1").unwrap()["name"], "First");
    }

    #[test]
    fn test_evicted_entity_misses() {
        let mut cache = NormalizedCache::new();
        cache.write_result("wines", &wines_result());

        assert!(cache.evict("Varietal:4"));
        assert!(cache.entity("Varietal:4").is_none());
        assert!(cache.read_result("wines").is_none());
        assert!(!cache.evict("Varietal:4"));
    }

    #[test]
    fn test_nulls_and_empty_lists() {
        let mut cache = NormalizedCache::new();
        let data = json!({"wine": null, "favorites": [], "stats": {"wines": 4}});
        cache.write_result("misc", &data);
        assert_eq!(cache.read_result("misc"), Some(data));
    }

    #[test]
    fn test_clear() {
        let mut cache = NormalizedCache::new();
        cache.write_result("wines", &wines_result());
        cache.write_optimistic("toggle", "Wine:1", Fields::new());
        cache.clear();

        assert_eq!(cache.entity_count(), 0);
        assert!(cache.read_result("wines").is_none());
        assert!(!cache.has_layer("toggle"));
    }
}
