use crate::domain::Winery as DomainWinery;
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::Wine;
use async_graphql::{Context, FieldResult, Object, ResultExt, ID};

/// GraphQL representation of a Winery
#[derive(Clone)]
pub struct Winery {
    pub inner: DomainWinery,
}

impl From<DomainWinery> for Winery {
    fn from(winery: DomainWinery) -> Self {
        Self { inner: winery }
    }
}

#[Object]
impl Winery {
    /// The unique identifier for the winery
    async fn id(&self) -> ID {
        ID(self.inner.id.clone())
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    /// Wine region, e.g. "Burgundy"
    async fn region(&self) -> &str {
        &self.inner.region
    }

    async fn country(&self) -> &str {
        &self.inner.country
    }

    async fn founded_year(&self) -> i32 {
        self.inner.founded_year
    }

    async fn description(&self) -> &str {
        &self.inner.description
    }

    /// Wines produced by this winery, in file order
    async fn wines(&self, ctx: &Context<'_>) -> FieldResult<Vec<Wine>> {
        let context = ctx.data::<GraphQLContext>()?;
        let wines = context
            .storage
            .wines_by_winery(&self.inner.id)
            .await
            .extend()?;
        Ok(wines.into_iter().map(|w| w.into()).collect())
    }

    async fn wine_count(&self, ctx: &Context<'_>) -> FieldResult<i32> {
        let context = ctx.data::<GraphQLContext>()?;
        let wines = context
            .storage
            .wines_by_winery(&self.inner.id)
            .await
            .extend()?;
        Ok(wines.len() as i32)
    }
}
