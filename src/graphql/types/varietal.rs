use crate::domain::{Varietal as DomainVarietal, WineColor};
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::Wine;
use async_graphql::{Context, FieldResult, Object, ResultExt, ID};

/// GraphQL representation of a Varietal
#[derive(Clone)]
pub struct Varietal {
    pub inner: DomainVarietal,
}

impl From<DomainVarietal> for Varietal {
    fn from(varietal: DomainVarietal) -> Self {
        Self { inner: varietal }
    }
}

#[Object]
impl Varietal {
    /// The unique identifier for the varietal
    async fn id(&self) -> ID {
        ID(self.inner.id.clone())
    }

    /// Grape name, e.g. "Cabernet Sauvignon"
    async fn name(&self) -> &str {
        &self.inner.name
    }

    async fn color(&self) -> WineColor {
        self.inner.color
    }

    async fn description(&self) -> &str {
        &self.inner.description
    }

    /// Wines made from this varietal, in file order
    async fn wines(&self, ctx: &Context<'_>) -> FieldResult<Vec<Wine>> {
        let context = ctx.data::<GraphQLContext>()?;
        let wines = context
            .storage
            .wines_by_varietal(&self.inner.id)
            .await
            .extend()?;
        Ok(wines.into_iter().map(|w| w.into()).collect())
    }

    async fn wine_count(&self, ctx: &Context<'_>) -> FieldResult<i32> {
        let context = ctx.data::<GraphQLContext>()?;
        let wines = context
            .storage
            .wines_by_varietal(&self.inner.id)
            .await
            .extend()?;
        Ok(wines.len() as i32)
    }
}
