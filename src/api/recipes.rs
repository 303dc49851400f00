use crate::{
    auth::{require_caller, Caller},
    error::PantryError,
    models::recipe::{
        upload::{remove_image_file, IdentifierSource},
        NewRecipe, Recipe, RecipePatch,
    },
    search::{self, filters::RecipeFilter},
};

use super::{
    views::{RecipeDetailView, RecipeImageView, RecipeView},
    Api,
};

/// Query parameters for `GET /recipes/`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub struct RecipeListParams {
    /// Comma-separated tag ids, like `1,2`.
    pub tags: Option<String>,
    /// Comma-separated ingredient ids.
    pub ingredients: Option<String>,
    /// Text the title should contain.
    pub title: Option<String>,
}

impl RecipeListParams {
    fn into_filters(self) -> Result<Vec<RecipeFilter>, PantryError> {
        let mut filters =
            RecipeFilter::from_params(self.tags.as_deref(), self.ingredients.as_deref())?;

        if let Some(title) = self.title.filter(|t| !t.trim().is_empty()) {
            filters.push(RecipeFilter::Title(title));
        }

        Ok(filters)
    }
}

impl<I: IdentifierSource> Api<'_, I> {
    /// `GET /recipes/`
    #[tracing::instrument(skip(self))]
    pub async fn list_recipes(
        &self,
        caller: Option<&Caller>,
        params: RecipeListParams,
    ) -> Result<Vec<RecipeView>, PantryError> {
        let caller = require_caller(caller)?;
        let filters = params.into_filters()?;

        let recipes = search::list_recipes(self.db, caller, filters).await?;

        let mut views = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            views.push(RecipeView::load(self.db, recipe).await?);
        }

        Ok(views)
    }

    /// `GET /recipes/{id}/`
    #[tracing::instrument(skip(self))]
    pub async fn retrieve_recipe(
        &self,
        caller: Option<&Caller>,
        id: i64,
    ) -> Result<RecipeDetailView, PantryError> {
        let caller = require_caller(caller)?;

        let recipe = Recipe::get(self.db, caller.user_id, id).await?;
        RecipeDetailView::load(self.db, recipe).await
    }

    /// `POST /recipes/`
    #[tracing::instrument(skip(self))]
    pub async fn create_recipe(
        &self,
        caller: Option<&Caller>,
        new: NewRecipe,
    ) -> Result<RecipeDetailView, PantryError> {
        let caller = require_caller(caller)?;

        let recipe = Recipe::create(self.db, caller.user_id, new).await?;
        RecipeDetailView::load(self.db, recipe).await
    }

    /// `PATCH /recipes/{id}/`
    #[tracing::instrument(skip(self))]
    pub async fn partial_update_recipe(
        &self,
        caller: Option<&Caller>,
        id: i64,
        patch: RecipePatch,
    ) -> Result<RecipeDetailView, PantryError> {
        let caller = require_caller(caller)?;

        let mut recipe = Recipe::get(self.db, caller.user_id, id).await?;
        recipe.update(self.db, patch).await?;
        RecipeDetailView::load(self.db, recipe).await
    }

    /// `DELETE /recipes/{id}/`
    ///
    /// Also removes the recipe's image file.
    #[tracing::instrument(skip(self))]
    pub async fn destroy_recipe(&self, caller: Option<&Caller>, id: i64) -> Result<(), PantryError> {
        let caller = require_caller(caller)?;

        let recipe = Recipe::get(self.db, caller.user_id, id).await?;
        let image = recipe.image.clone();
        recipe.delete(self.db).await?;

        if let Some(image) = image {
            remove_image_file(self.config, &image).await;
        }

        Ok(())
    }

    /// `POST /recipes/{id}/upload-image/`
    #[tracing::instrument(skip(self, bytes))]
    pub async fn upload_recipe_image(
        &self,
        caller: Option<&Caller>,
        id: i64,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<RecipeImageView, PantryError> {
        let caller = require_caller(caller)?;

        let mut recipe = Recipe::get(self.db, caller.user_id, id).await?;
        recipe
            .upload_image(self.db, self.config, &self.ids, original_filename, bytes)
            .await?;

        Ok(RecipeImageView {
            id: recipe.id,
            image: recipe.image,
        })
    }
}
