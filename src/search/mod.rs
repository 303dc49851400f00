//! Ownership-scoped listings.
//!
//! Every query built here starts from "owned by the requesting user". There
//! is no way to list someone else's records.

use sea_query::{Asterisk, Cond, Expr, Order, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder as _;

use crate::{
    auth::Caller,
    database::Database,
    error::PantryError,
    models::{ingredients::Ingredient, recipe::Recipe, tags::Tag},
};

use self::{
    filters::{RecipeFilter, ToQuery as _},
    query::{Ingredients, RecipeIngredients, RecipeTags, Recipes, Tags},
};

pub mod filters;
pub mod query;

/// Lists the caller's recipes, newest first.
#[tracing::instrument(skip(db))]
pub async fn list_recipes(
    db: &Database,
    requesting_user: &Caller,
    filters: Vec<RecipeFilter>,
) -> Result<Vec<Recipe>, PantryError> {
    let cond = filters.into_iter().fold(
        Cond::all().add(Expr::col(Recipes::UserId).eq(requesting_user.user_id)),
        |cond, filter| cond.add(filter.to_query()),
    );

    let (select, values) = Query::select()
        .column(Asterisk)
        .from(Recipes::Table)
        .cond_where(cond)
        .order_by(Recipes::Id, Order::Desc)
        .build_sqlx(SqliteQueryBuilder);
    tracing::debug!("recipe listing: `{select}`");

    let mut conn = db.acquire().await?;
    let recipes = sqlx::query_as_with::<_, Recipe, _>(&select, values)
        .fetch_all(&mut *conn)
        .await
        .inspect_err(|e| tracing::error!("Recipe listing failed! err: {e}"))?;

    Ok(recipes)
}

/// Lists the caller's tags by descending name.
///
/// With `assigned_only`, only tags used by at least one recipe are returned.
#[tracing::instrument(skip(db))]
pub async fn list_tags(
    db: &Database,
    requesting_user: &Caller,
    assigned_only: bool,
) -> Result<Vec<Tag>, PantryError> {
    let mut cond = Cond::all().add(Expr::col(Tags::UserId).eq(requesting_user.user_id));
    if assigned_only {
        cond = cond.add(
            Expr::col(Tags::Id).in_subquery(
                Query::select()
                    .column(RecipeTags::TagId)
                    .from(RecipeTags::Table)
                    .to_owned(),
            ),
        );
    }

    let (select, values) = Query::select()
        .column(Asterisk)
        .from(Tags::Table)
        .cond_where(cond)
        .order_by(Tags::Name, Order::Desc)
        .order_by(Tags::Id, Order::Desc)
        .build_sqlx(SqliteQueryBuilder);

    let mut conn = db.acquire().await?;
    let tags = sqlx::query_as_with::<_, Tag, _>(&select, values)
        .fetch_all(&mut *conn)
        .await?;

    Ok(tags)
}

/// Lists the caller's ingredients. Same rules as [`list_tags`].
#[tracing::instrument(skip(db))]
pub async fn list_ingredients(
    db: &Database,
    requesting_user: &Caller,
    assigned_only: bool,
) -> Result<Vec<Ingredient>, PantryError> {
    let mut cond = Cond::all().add(Expr::col(Ingredients::UserId).eq(requesting_user.user_id));
    if assigned_only {
        cond = cond.add(
            Expr::col(Ingredients::Id).in_subquery(
                Query::select()
                    .column(RecipeIngredients::IngredientId)
                    .from(RecipeIngredients::Table)
                    .to_owned(),
            ),
        );
    }

    let (select, values) = Query::select()
        .column(Asterisk)
        .from(Ingredients::Table)
        .cond_where(cond)
        .order_by(Ingredients::Name, Order::Desc)
        .order_by(Ingredients::Id, Order::Desc)
        .build_sqlx(SqliteQueryBuilder);

    let mut conn = db.acquire().await?;
    let ingredients = sqlx::query_as_with::<_, Ingredient, _>(&select, values)
        .fetch_all(&mut *conn)
        .await?;

    Ok(ingredients)
}
