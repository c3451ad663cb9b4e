use crate::error::CellarError;
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::{NewWineInput, NewWineListInput, Wine, WineList};
use async_graphql::{Context, ErrorExtensions, FieldResult, Object, ResultExt, ID};
use tracing::info;

/// Root mutation object for GraphQL
pub struct Mutation;

/// Re-read a wine after a user-state mutation so the response carries fresh fields.
async fn reload_wine(context: &GraphQLContext, wine_id: &str) -> FieldResult<Wine> {
    match context.storage.get_wine(wine_id).await.extend()? {
        Some(wine) => Ok(wine.into()),
        None => Err(CellarError::not_found("wine", wine_id).extend()),
    }
}

#[Object]
impl Mutation {
    /// Mark or unmark a wine as a favorite
    async fn set_favorite(
        &self,
        ctx: &Context<'_>,
        wine_id: ID,
        favorite: bool,
    ) -> FieldResult<Wine> {
        let context = ctx.data::<GraphQLContext>()?;
        let state = context
            .storage
            .set_favorite(&wine_id, favorite)
            .await
            .extend()?;
        info!("Wine {} favorite set to {}", wine_id.as_str(), state);
        reload_wine(context, &wine_id).await
    }

    /// Flip the favorite flag of a wine
    async fn toggle_favorite(&self, ctx: &Context<'_>, wine_id: ID) -> FieldResult<Wine> {
        let context = ctx.data::<GraphQLContext>()?;
        let state = context.storage.toggle_favorite(&wine_id).await.extend()?;
        info!("Wine {} favorite toggled to {}", wine_id.as_str(), state);
        reload_wine(context, &wine_id).await
    }

    /// Record a score between 1 and 5
    async fn rate_wine(&self, ctx: &Context<'_>, wine_id: ID, score: i32) -> FieldResult<Wine> {
        let context = ctx.data::<GraphQLContext>()?;
        let summary = context.storage.rate_wine(&wine_id, score).await.extend()?;
        info!(
            "Wine {} rated {} ({} ratings)",
            wine_id.as_str(),
            score,
            summary.count
        );
        reload_wine(context, &wine_id).await
    }

    async fn create_wine_list(
        &self,
        ctx: &Context<'_>,
        input: NewWineListInput,
    ) -> FieldResult<WineList> {
        let context = ctx.data::<GraphQLContext>()?;
        let list = context.storage.create_list(input.into()).await.extend()?;
        Ok(list.into())
    }

    /// Append a wine to a list; adding a wine that is already present is a no-op
    async fn add_wine_to_list(
        &self,
        ctx: &Context<'_>,
        list_id: ID,
        wine_id: ID,
    ) -> FieldResult<WineList> {
        let context = ctx.data::<GraphQLContext>()?;
        let list = context
            .storage
            .add_to_list(&list_id, &wine_id)
            .await
            .extend()?;
        info!("Added wine {} to list {}", wine_id.as_str(), list_id.as_str());
        Ok(list.into())
    }

    async fn remove_wine_from_list(
        &self,
        ctx: &Context<'_>,
        list_id: ID,
        wine_id: ID,
    ) -> FieldResult<WineList> {
        let context = ctx.data::<GraphQLContext>()?;
        let list = context
            .storage
            .remove_from_list(&list_id, &wine_id)
            .await
            .extend()?;
        info!(
            "Removed wine {} from list {}",
            wine_id.as_str(),
            list_id.as_str()
        );
        Ok(list.into())
    }

    /// Returns false when no list had the given id
    async fn delete_wine_list(&self, ctx: &Context<'_>, id: ID) -> FieldResult<bool> {
        let context = ctx.data::<GraphQLContext>()?;
        Ok(context.storage.delete_list(&id).await.extend()?)
    }

    /// Add a wine to the catalogue; persisted when write-back is enabled
    async fn create_wine(&self, ctx: &Context<'_>, input: NewWineInput) -> FieldResult<Wine> {
        let context = ctx.data::<GraphQLContext>()?;
        let wine = context.storage.create_wine(input.into()).await.extend()?;
        Ok(wine.into())
    }

    /// Remove a wine along with its favorite flag, ratings and list entries
    async fn delete_wine(&self, ctx: &Context<'_>, id: ID) -> FieldResult<bool> {
        let context = ctx.data::<GraphQLContext>()?;
        Ok(context.storage.delete_wine(&id).await.extend()?)
    }
}
