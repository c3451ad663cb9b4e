use crate::domain::WineList as DomainWineList;
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::Wine;
use async_graphql::{Context, FieldResult, Object, ResultExt, ID};
use chrono::{DateTime, Utc};

/// GraphQL representation of a user-curated wine list
#[derive(Clone)]
pub struct WineList {
    pub inner: DomainWineList,
}

impl From<DomainWineList> for WineList {
    fn from(list: DomainWineList) -> Self {
        Self { inner: list }
    }
}

#[Object]
impl WineList {
    async fn id(&self) -> ID {
        ID(self.inner.id.clone())
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    async fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// Wines on the list, in the order they were added
    async fn wines(&self, ctx: &Context<'_>) -> FieldResult<Vec<Wine>> {
        let context = ctx.data::<GraphQLContext>()?;
        let mut wines = Vec::with_capacity(self.inner.wine_ids.len());

        for wine_id in &self.inner.wine_ids {
            if let Some(wine) = context.storage.get_wine(wine_id).await.extend()? {
                wines.push(wine.into());
            }
        }

        Ok(wines)
    }

    async fn wine_count(&self) -> i32 {
        self.inner.wine_ids.len() as i32
    }
}
