use crate::config::GraphQLConfig;
use crate::graphql::loaders::{VarietalLoader, WineryLoader};
use crate::graphql::resolvers::{Mutation, Query};
use crate::store::Storage;
use async_graphql::dataloader::DataLoader;
use async_graphql::{EmptySubscription, Schema};
use std::sync::Arc;

/// GraphQL context containing shared application state
pub struct GraphQLContext {
    pub storage: Arc<dyn Storage>,
    pub varietal_loader: DataLoader<VarietalLoader>,
    pub winery_loader: DataLoader<WineryLoader>,
    /// Upper bound (and default) for `limit` arguments
    pub max_page_size: usize,
}

/// The complete GraphQL schema
pub type GraphQLSchema = Schema<Query, Mutation, EmptySubscription>;

/// Create a new GraphQL schema with the given storage
pub fn create_schema(storage: Arc<dyn Storage>, config: &GraphQLConfig) -> GraphQLSchema {
    let varietal_loader = VarietalLoader::new(storage.clone());
    let winery_loader = WineryLoader::new(storage.clone());

    let mut builder = Schema::build(Query, Mutation, EmptySubscription)
        .data(GraphQLContext {
            storage,
            varietal_loader,
            winery_loader,
            max_page_size: config.max_page_size,
        })
        .limit_depth(config.max_depth)
        .limit_complexity(config.max_complexity);

    if !config.introspection {
        builder = builder.disable_introspection();
    }

    builder.finish()
}
