//! What the handlers send back.

use crate::{
    database::Database,
    error::PantryError,
    models::{
        ingredients::Ingredient,
        recipe::{Price, Recipe},
        tags::Tag,
    },
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TagView {
    pub id: i64,
    pub name: String,
}

impl From<Tag> for TagView {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct IngredientView {
    pub id: i64,
    pub name: String,
}

impl From<Ingredient> for IngredientView {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
        }
    }
}

/// A recipe in a listing. Tags and ingredients are just their ids.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RecipeView {
    pub id: i64,
    pub title: String,
    pub time_minutes: u32,
    pub price: Price,
    pub link: String,
    pub tags: Vec<i64>,
    pub ingredients: Vec<i64>,
    pub image: Option<String>,
}

impl RecipeView {
    /// Builds the view, looking up the recipe's links.
    pub async fn load(db: &Database, recipe: Recipe) -> Result<Self, PantryError> {
        let tags = recipe.tags(db).await?.into_iter().map(|t| t.id).collect();
        let ingredients = recipe
            .ingredients(db)
            .await?
            .into_iter()
            .map(|i| i.id)
            .collect();

        Ok(Self {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            tags,
            ingredients,
            image: recipe.image,
        })
    }
}

/// A single recipe, with its tags and ingredients spelled out.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RecipeDetailView {
    pub id: i64,
    pub title: String,
    pub time_minutes: u32,
    pub price: Price,
    pub link: String,
    pub tags: Vec<TagView>,
    pub ingredients: Vec<IngredientView>,
    pub image: Option<String>,
}

impl RecipeDetailView {
    pub async fn load(db: &Database, recipe: Recipe) -> Result<Self, PantryError> {
        let tags = recipe.tags(db).await?.into_iter().map(TagView::from).collect();
        let ingredients = recipe
            .ingredients(db)
            .await?
            .into_iter()
            .map(IngredientView::from)
            .collect();

        Ok(Self {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            tags,
            ingredients,
            image: recipe.image,
        })
    }
}

/// The response to an image upload.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RecipeImageView {
    pub id: i64,
    pub image: Option<String>,
}
