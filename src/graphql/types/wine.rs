use crate::domain::Wine as DomainWine;
use crate::error::CellarError;
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::{Rating, Varietal, WineList, Winery};
use async_graphql::{Context, ErrorExtensions, FieldResult, Object, ResultExt, ID};

/// GraphQL representation of a Wine
#[derive(Clone)]
pub struct Wine {
    pub inner: DomainWine,
}

impl From<DomainWine> for Wine {
    fn from(wine: DomainWine) -> Self {
        Self { inner: wine }
    }
}

#[Object]
impl Wine {
    /// The unique identifier for the wine
    async fn id(&self) -> ID {
        ID(self.inner.id.clone())
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    /// Identifier of the wine's varietal
    async fn varietal_id(&self) -> ID {
        ID(self.inner.varietal_id.clone())
    }

    /// Identifier of the producing winery
    async fn winery_id(&self) -> ID {
        ID(self.inner.winery_id.clone())
    }

    /// Harvest year
    async fn vintage(&self) -> i32 {
        self.inner.vintage
    }

    /// Alcohol by volume, in percent
    async fn abv(&self) -> f64 {
        self.inner.abv
    }

    async fn price(&self) -> f64 {
        self.inner.price
    }

    async fn tasting_notes(&self) -> &str {
        &self.inner.tasting_notes
    }

    /// The varietal this wine is made from
    async fn varietal(&self, ctx: &Context<'_>) -> FieldResult<Varietal> {
        let context = ctx.data::<GraphQLContext>()?;

        // Use DataLoader to batch varietal lookups
        match context
            .varietal_loader
            .load_one(self.inner.varietal_id.clone())
            .await
        {
            Ok(Some(varietal)) => Ok(varietal.into()),
            Ok(None) => Err(CellarError::Integrity(format!(
                "wine '{}' references unknown varietal_id '{}'",
                self.inner.id, self.inner.varietal_id
            ))
            .extend()),
            Err(e) => Err(e.into()),
        }
    }

    /// The winery that produces this wine
    async fn winery(&self, ctx: &Context<'_>) -> FieldResult<Winery> {
        let context = ctx.data::<GraphQLContext>()?;

        match context
            .winery_loader
            .load_one(self.inner.winery_id.clone())
            .await
        {
            Ok(Some(winery)) => Ok(winery.into()),
            Ok(None) => Err(CellarError::Integrity(format!(
                "wine '{}' references unknown winery_id '{}'",
                self.inner.id, self.inner.winery_id
            ))
            .extend()),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the wine is marked as a favorite
    async fn is_favorite(&self, ctx: &Context<'_>) -> FieldResult<bool> {
        let context = ctx.data::<GraphQLContext>()?;
        context.storage.is_favorite(&self.inner.id).await.extend()
    }

    /// Average score and number of ratings
    async fn rating(&self, ctx: &Context<'_>) -> FieldResult<Rating> {
        let context = ctx.data::<GraphQLContext>()?;
        let summary = context.storage.rating(&self.inner.id).await.extend()?;
        Ok(summary.into())
    }

    /// Wine lists that include this wine
    async fn lists(&self, ctx: &Context<'_>) -> FieldResult<Vec<WineList>> {
        let context = ctx.data::<GraphQLContext>()?;
        let lists = context
            .storage
            .lists_containing(&self.inner.id)
            .await
            .extend()?;
        Ok(lists.into_iter().map(|l| l.into()).collect())
    }
}
