use sea_query::*;

use super::filters::{RecipeFilter, ToQuery};

/// the recipe table
#[derive(Iden)]
pub enum Recipes {
    Table,
    Id,
    UserId,
    Title,
    TimeMinutes,
    PriceCents,
    Link,
    Image,
}

#[derive(Iden)]
pub enum Tags {
    Table,
    Id,
    UserId,
    Name,
}

#[derive(Iden)]
pub enum Ingredients {
    Table,
    Id,
    UserId,
    Name,
}

/// recipe <-> tag links
#[derive(Iden)]
pub enum RecipeTags {
    Table,
    RecipeId,
    TagId,
}

/// recipe <-> ingredient links
#[derive(Iden)]
pub enum RecipeIngredients {
    Table,
    RecipeId,
    IngredientId,
}

impl ToQuery for RecipeFilter {
    #[tracing::instrument]
    fn to_query(self) -> SimpleExpr {
        match self {
            // "has any of these tags". a subquery keeps each recipe to one row
            RecipeFilter::Tags(ids) => {
                tracing::debug!("Looking for recipes with tags: {ids:?}");
                Expr::col(Recipes::Id).in_subquery(
                    Query::select()
                        .column(RecipeTags::RecipeId)
                        .from(RecipeTags::Table)
                        .and_where(Expr::col(RecipeTags::TagId).is_in(ids))
                        .to_owned(),
                )
            }

            RecipeFilter::Ingredients(ids) => {
                tracing::debug!("Looking for recipes with ingredients: {ids:?}");
                Expr::col(Recipes::Id).in_subquery(
                    Query::select()
                        .column(RecipeIngredients::RecipeId)
                        .from(RecipeIngredients::Table)
                        .and_where(Expr::col(RecipeIngredients::IngredientId).is_in(ids))
                        .to_owned(),
                )
            }

            // note that `LIKE` is case-insensitive (for ASCII) in SQLite :)
            RecipeFilter::Title(text) => {
                tracing::debug!("Checking for title containing: `{text}`");
                let pattern = format!("%{}%", escape_like(text.trim()));
                Expr::col(Recipes::Title).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
            }
        }
    }
}

const LIKE_ESCAPE: char = '\\';

/// Makes `%` and `_` in user text match themselves.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
