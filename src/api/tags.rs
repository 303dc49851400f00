use crate::{
    auth::{require_caller, Caller},
    error::PantryError,
    models::{ingredients::Ingredient, recipe::upload::IdentifierSource, tags::Tag},
    search,
};

use super::{
    views::{IngredientView, TagView},
    Api,
};

impl<I: IdentifierSource> Api<'_, I> {
    /// `GET /tags/` (`?assigned_only=1` to skip unused tags)
    #[tracing::instrument(skip(self))]
    pub async fn list_tags(
        &self,
        caller: Option<&Caller>,
        assigned_only: bool,
    ) -> Result<Vec<TagView>, PantryError> {
        let caller = require_caller(caller)?;

        let tags = search::list_tags(self.db, caller, assigned_only).await?;
        Ok(tags.into_iter().map(TagView::from).collect())
    }

    /// `POST /tags/`
    #[tracing::instrument(skip(self))]
    pub async fn create_tag(&self, caller: Option<&Caller>, name: &str) -> Result<TagView, PantryError> {
        let caller = require_caller(caller)?;

        Tag::create(self.db, caller.user_id, name)
            .await
            .map(TagView::from)
    }

    /// `GET /ingredients/`
    #[tracing::instrument(skip(self))]
    pub async fn list_ingredients(
        &self,
        caller: Option<&Caller>,
        assigned_only: bool,
    ) -> Result<Vec<IngredientView>, PantryError> {
        let caller = require_caller(caller)?;

        let ingredients = search::list_ingredients(self.db, caller, assigned_only).await?;
        Ok(ingredients.into_iter().map(IngredientView::from).collect())
    }

    /// `POST /ingredients/`
    #[tracing::instrument(skip(self))]
    pub async fn create_ingredient(
        &self,
        caller: Option<&Caller>,
        name: &str,
    ) -> Result<IngredientView, PantryError> {
        let caller = require_caller(caller)?;

        Ingredient::create(self.db, caller.user_id, name)
            .await
            .map(IngredientView::from)
    }
}
