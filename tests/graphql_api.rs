use anyhow::Result;
use async_graphql::{Request, Variables};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::tempdir;
use wine_graph::config::GraphQLConfig;
use wine_graph::graphql::{create_schema, GraphQLSchema};
use wine_graph::store::{DataFiles, InMemoryStorage, Storage};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn schema() -> Result<GraphQLSchema> {
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::open(
        DataFiles::new(data_dir()),
        false,
    )?);
    Ok(create_schema(storage, &GraphQLConfig::default()))
}

async fn run(schema: &GraphQLSchema, query: &str, variables: Value) -> Value {
    let response = schema
        .execute(Request::new(query).variables(Variables::from_json(variables)))
        .await;
    assert!(
        response.errors.is_empty(),
        "unexpected errors: {:?}",
        response.errors
    );
    response.data.into_json().unwrap()
}

/// Execute a query expected to fail and return the first error's code
async fn error_code(schema: &GraphQLSchema, query: &str, variables: Value) -> String {
    let response = schema
        .execute(Request::new(query).variables(Variables::from_json(variables)))
        .await;
    let error = response.errors.first().expect("expected an error");
    let extensions = serde_json::to_value(&error.extensions).unwrap();
    extensions["code"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_shipped_data_references_resolve() -> Result<()> {
    let dataset = DataFiles::new(data_dir()).load()?;
    for wine in &dataset.wines {
        assert!(dataset.varietals.iter().any(|v| v.id == wine.varietal_id));
        assert!(dataset.wineries.iter().any(|w| w.id == wine.winery_id));
    }
    Ok(())
}

#[tokio::test]
async fn test_varietals_in_file_order_without_duplicates() -> Result<()> {
    let schema = schema()?;
    let dataset = DataFiles::new(data_dir()).load()?;

    let data = run(&schema, "{ varietals { id name } }", json!({})).await;
    let ids: Vec<&str> = data["varietals"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect();
    let expected: Vec<&str> = dataset.varietals.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, expected);

    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
    Ok(())
}

#[tokio::test]
async fn test_nested_varietal_matches_direct_lookup() -> Result<()> {
    let schema = schema()?;
    let data = run(
        &schema,
        "{ wines { id varietalId varietal { id name color description } } }",
        json!({}),
    )
    .await;

    for wine in data["wines"].as_array().unwrap() {
        let direct = run(
            &schema,
            "query($id: ID!) { varietal(id: $id) { id name color description } }",
            json!({ "id": wine["varietalId"] }),
        )
        .await;
        assert_eq!(wine["varietal"], direct["varietal"]);
    }
    Ok(())
}

#[tokio::test]
async fn test_unknown_ids_resolve_to_null() -> Result<()> {
    let schema = schema()?;
    let data = run(
        &schema,
        r#"{ wine(id: "999") { id } varietal(id: "999") { id } winery(id: "999") { id } wineList(id: "999") { id } }"#,
        json!({}),
    )
    .await;
    assert_eq!(
        data,
        json!({ "wine": null, "varietal": null, "winery": null, "wineList": null })
    );
    Ok(())
}

#[tokio::test]
async fn test_favorite_is_reflected_immediately() -> Result<()> {
    let schema = schema()?;

    let data = run(
        &schema,
        r#"mutation { setFavorite(wineId: "3", favorite: true) { id isFavorite } }"#,
        json!({}),
    )
    .await;
    assert_eq!(data["setFavorite"]["isFavorite"], true);

    let data = run(
        &schema,
        r#"{ wine(id: "3") { isFavorite } favorites { id } stats { favorites } }"#,
        json!({}),
    )
    .await;
    assert_eq!(data["wine"]["isFavorite"], true);
    assert_eq!(data["favorites"], json!([{ "id": "3" }]));
    assert_eq!(data["stats"]["favorites"], 1);

    let data = run(
        &schema,
        r#"mutation { toggleFavorite(wineId: "3") { isFavorite } }"#,
        json!({}),
    )
    .await;
    assert_eq!(data["toggleFavorite"]["isFavorite"], false);
    Ok(())
}

#[tokio::test]
async fn test_filters_compose_and_sort() -> Result<()> {
    let schema = schema()?;

    let data = run(
        &schema,
        r#"{ wines(filter: { color: RED, country: "france" }) { id } wineCount(filter: { color: RED }) }"#,
        json!({}),
    )
    .await;
    assert_eq!(data["wines"], json!([{ "id": "2" }, { "id": "4" }]));
    assert_eq!(data["wineCount"], 7);

    let data = run(
        &schema,
        "{ wines(sort: { field: PRICE }, limit: 2) { id price } }",
        json!({}),
    )
    .await;
    assert_eq!(data["wines"][0]["id"], "11");
    assert_eq!(data["wines"][1]["id"], "10");

    // equal vintages keep file order under a stable sort
    let data = run(
        &schema,
        "{ wines(sort: { field: VINTAGE, direction: DESC }, filter: { minVintage: 2022 }) { id } }",
        json!({}),
    )
    .await;
    assert_eq!(data["wines"], json!([{ "id": "10" }, { "id": "11" }]));

    let data = run(&schema, "{ wines(offset: 1000) { id } }", json!({})).await;
    assert_eq!(data["wines"], json!([]));
    Ok(())
}

#[tokio::test]
async fn test_wineries_filter_and_counts() -> Result<()> {
    let schema = schema()?;
    let data = run(
        &schema,
        r#"{ wineries(filter: { country: "France" }, sort: { field: FOUNDED_YEAR }) { name wineCount } }"#,
        json!({}),
    )
    .await;
    assert_eq!(
        data["wineries"],
        json!([
            { "name": "Domaine des Combes", "wineCount": 3 },
            { "name": "Château La Garrigue", "wineCount": 1 }
        ])
    );
    Ok(())
}

#[tokio::test]
async fn test_rating_bounds_and_average() -> Result<()> {
    let schema = schema()?;
    let rate = "mutation($score: Int!) { rateWine(wineId: \"1\", score: $score) { rating { average count } } }";

    assert_eq!(error_code(&schema, rate, json!({ "score": 6 })).await, "BAD_USER_INPUT");
    assert_eq!(error_code(&schema, rate, json!({ "score": 0 })).await, "BAD_USER_INPUT");

    run(&schema, rate, json!({ "score": 4 })).await;
    let data = run(&schema, rate, json!({ "score": 5 })).await;
    assert_eq!(
        data["rateWine"]["rating"],
        json!({ "average": 4.5, "count": 2 })
    );

    let data = run(&schema, r#"{ wine(id: "2") { rating { average count } } }"#, json!({})).await;
    assert_eq!(data["wine"]["rating"], json!({ "average": null, "count": 0 }));
    Ok(())
}

#[tokio::test]
async fn test_error_codes() -> Result<()> {
    let schema = schema()?;

    assert_eq!(
        error_code(
            &schema,
            r#"mutation { setFavorite(wineId: "999", favorite: true) { id } }"#,
            json!({})
        )
        .await,
        "NOT_FOUND"
    );
    assert_eq!(
        error_code(&schema, "{ wines(limit: -1) { id } }", json!({})).await,
        "BAD_USER_INPUT"
    );
    assert_eq!(
        error_code(
            &schema,
            r#"{ wines(filter: { minPrice: 50, maxPrice: 10 }) { id } }"#,
            json!({})
        )
        .await,
        "BAD_USER_INPUT"
    );
    assert_eq!(
        error_code(
            &schema,
            r#"mutation { createWineList(input: { name: "Cellar", wineIds: ["999"] }) { id } }"#,
            json!({})
        )
        .await,
        "NOT_FOUND"
    );
    Ok(())
}

#[tokio::test]
async fn test_create_wine_with_dangling_reference_is_rejected() -> Result<()> {
    let schema = schema()?;
    let create = r#"mutation { createWine(input: {
        name: "Ghost Merlot", varietalId: "999", wineryId: "1",
        vintage: 2020, abv: 13.5, price: 20.0
    }) { id } }"#;

    assert_eq!(error_code(&schema, create, json!({})).await, "INTEGRITY_VIOLATION");

    let data = run(&schema, "{ wineCount }", json!({})).await;
    assert_eq!(data["wineCount"], 14);
    Ok(())
}

#[tokio::test]
async fn test_wine_lists_lifecycle() -> Result<()> {
    let schema = schema()?;

    let data = run(
        &schema,
        r#"mutation { createWineList(input: { name: "Weeknight", description: "Under $30", wineIds: ["3", "10"] }) { id name description wineCount } }"#,
        json!({}),
    )
    .await;
    let list_id = data["createWineList"]["id"].as_str().unwrap().to_string();
    assert_eq!(data["createWineList"]["wineCount"], 2);

    let vars = json!({ "list": list_id, "wine": "11" });
    let add = "mutation($list: ID!, $wine: ID!) { addWineToList(listId: $list, wineId: $wine) { wines { id } } }";
    run(&schema, add, vars.clone()).await;
    let data = run(&schema, add, vars.clone()).await;
    assert_eq!(
        data["addWineToList"]["wines"],
        json!([{ "id": "3" }, { "id": "10" }, { "id": "11" }])
    );

    let data = run(
        &schema,
        r#"{ wine(id: "11") { lists { name } } }"#,
        json!({}),
    )
    .await;
    assert_eq!(data["wine"]["lists"], json!([{ "name": "Weeknight" }]));

    let data = run(
        &schema,
        "mutation($list: ID!, $wine: ID!) { removeWineFromList(listId: $list, wineId: $wine) { wineCount } }",
        json!({ "list": list_id, "wine": "3" }),
    )
    .await;
    assert_eq!(data["removeWineFromList"]["wineCount"], 2);

    // deleting a wine removes it from lists
    let data = run(&schema, r#"mutation { deleteWine(id: "10") }"#, json!({})).await;
    assert_eq!(data["deleteWine"], true);
    let data = run(
        &schema,
        "query($id: ID!) { wineList(id: $id) { wines { id } } }",
        json!({ "id": list_id }),
    )
    .await;
    assert_eq!(data["wineList"]["wines"], json!([{ "id": "11" }]));

    let delete = "mutation($id: ID!) { deleteWineList(id: $id) }";
    let data = run(&schema, delete, json!({ "id": list_id })).await;
    assert_eq!(data["deleteWineList"], true);
    let data = run(&schema, delete, json!({ "id": list_id })).await;
    assert_eq!(data["deleteWineList"], false);
    Ok(())
}

#[tokio::test]
async fn test_created_wine_survives_reload_with_write_back() -> Result<()> {
    let dir = tempdir()?;
    let files = DataFiles::new(dir.path());
    files.write_dataset(&DataFiles::new(data_dir()).load()?)?;

    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::open(files.clone(), true)?);
    let schema = create_schema(storage, &GraphQLConfig::default());

    let data = run(
        &schema,
        r#"mutation { createWine(input: {
            name: "Wairau Chardonnay", varietalId: "2", wineryId: "3",
            vintage: 2022, abv: 13.0, price: 27.0, tastingNotes: "Peach and flint"
        }) { id name winery { name } } }"#,
        json!({}),
    )
    .await;
    assert_eq!(data["createWine"]["id"], "15");
    assert_eq!(data["createWine"]["winery"]["name"], "Wairau Estate");

    let reloaded = files.load()?;
    let wine = reloaded.wines.iter().find(|w| w.id == "15").unwrap();
    assert_eq!(wine.name, "Wairau Chardonnay");
    assert_eq!(wine.tasting_notes, "Peach and flint");
    Ok(())
}

#[tokio::test]
async fn test_depth_limit() -> Result<()> {
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::open(
        DataFiles::new(data_dir()),
        false,
    )?);
    let config = GraphQLConfig {
        max_depth: 3,
        ..GraphQLConfig::default()
    };
    let schema = create_schema(storage, &config);

    let response = schema
        .execute("{ wines { varietal { wines { varietal { name } } } } }")
        .await;
    assert!(response.is_err());
    Ok(())
}

#[test]
fn test_sdl_exposes_operations() -> Result<()> {
    let sdl = schema()?.sdl();
    for needle in [
        "wineCount(filter: WineFilter): Int!",
        "toggleFavorite(wineId: ID!): Wine!",
        "enum WineColor",
        "input NewWineListInput",
    ] {
        assert!(sdl.contains(needle), "SDL is missing {}", needle);
    }
    Ok(())
}
