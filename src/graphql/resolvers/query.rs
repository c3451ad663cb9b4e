use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::{
    CellarStats, Varietal, Wine, WineFilterInput, WineList, WineSortInput, Winery,
    WineryFilterInput, WinerySortInput,
};
use crate::store::{Page, SortDirection, WineFilter, WineryFilter};
use async_graphql::{Context, FieldResult, Object, ResultExt, ID};

/// Root query object for GraphQL
pub struct Query;

#[Object]
impl Query {
    /// All varietals, in file order unless a sort direction on name is given
    async fn varietals(
        &self,
        ctx: &Context<'_>,
        sort_direction: Option<SortDirection>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> FieldResult<Vec<Varietal>> {
        let context = ctx.data::<GraphQLContext>()?;
        let page = Page::from_args(limit, offset, context.max_page_size).extend()?;

        let varietals = context
            .storage
            .list_varietals(sort_direction, page)
            .await
            .extend()?;
        Ok(varietals.into_iter().map(|v| v.into()).collect())
    }

    /// Get a varietal by ID
    async fn varietal(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<Varietal>> {
        let context = ctx.data::<GraphQLContext>()?;
        let varietal = context.storage.get_varietal(&id).await.extend()?;
        Ok(varietal.map(|v| v.into()))
    }

    async fn wineries(
        &self,
        ctx: &Context<'_>,
        filter: Option<WineryFilterInput>,
        sort: Option<WinerySortInput>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> FieldResult<Vec<Winery>> {
        let context = ctx.data::<GraphQLContext>()?;
        let page = Page::from_args(limit, offset, context.max_page_size).extend()?;
        let filter: WineryFilter = filter.map(Into::into).unwrap_or_default();

        let wineries = context
            .storage
            .list_wineries(&filter, sort.map(Into::into), page)
            .await
            .extend()?;
        Ok(wineries.into_iter().map(|w| w.into()).collect())
    }

    /// Get a winery by ID
    async fn winery(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<Winery>> {
        let context = ctx.data::<GraphQLContext>()?;
        let winery = context.storage.get_winery(&id).await.extend()?;
        Ok(winery.map(|w| w.into()))
    }

    /// Wines matching every criterion of the filter
    async fn wines(
        &self,
        ctx: &Context<'_>,
        filter: Option<WineFilterInput>,
        sort: Option<WineSortInput>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> FieldResult<Vec<Wine>> {
        let context = ctx.data::<GraphQLContext>()?;
        let page = Page::from_args(limit, offset, context.max_page_size).extend()?;
        let filter: WineFilter = filter.map(Into::into).unwrap_or_default();

        let wines = context
            .storage
            .list_wines(&filter, sort.map(Into::into), page)
            .await
            .extend()?;
        Ok(wines.into_iter().map(|w| w.into()).collect())
    }

    /// Number of wines matching the filter, ignoring pagination
    async fn wine_count(
        &self,
        ctx: &Context<'_>,
        filter: Option<WineFilterInput>,
    ) -> FieldResult<i32> {
        let context = ctx.data::<GraphQLContext>()?;
        let filter: WineFilter = filter.map(Into::into).unwrap_or_default();
        let count = context.storage.count_wines(&filter).await.extend()?;
        Ok(count as i32)
    }

    /// Get a wine by ID
    async fn wine(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<Wine>> {
        let context = ctx.data::<GraphQLContext>()?;
        let wine = context.storage.get_wine(&id).await.extend()?;
        Ok(wine.map(|w| w.into()))
    }

    /// Favorite wines, in the order they were marked
    async fn favorites(&self, ctx: &Context<'_>) -> FieldResult<Vec<Wine>> {
        let context = ctx.data::<GraphQLContext>()?;
        let wines = context.storage.list_favorites().await.extend()?;
        Ok(wines.into_iter().map(|w| w.into()).collect())
    }

    async fn wine_lists(&self, ctx: &Context<'_>) -> FieldResult<Vec<WineList>> {
        let context = ctx.data::<GraphQLContext>()?;
        let lists = context.storage.list_lists().await.extend()?;
        Ok(lists.into_iter().map(|l| l.into()).collect())
    }

    async fn wine_list(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<WineList>> {
        let context = ctx.data::<GraphQLContext>()?;
        let list = context.storage.get_list(&id).await.extend()?;
        Ok(list.map(|l| l.into()))
    }

    async fn stats(&self, ctx: &Context<'_>) -> FieldResult<CellarStats> {
        let context = ctx.data::<GraphQLContext>()?;
        let stats = context.storage.stats().await.extend()?;
        Ok(stats.into())
    }
}
