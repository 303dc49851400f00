//! Recipes, plus the tags and ingredients attached to them.

use core::{fmt, str::FromStr};

use sqlx::{query::Query, sqlite::SqliteArguments, Sqlite, SqliteConnection};

use crate::{
    database::{Database, InsertIntoTable, INGREDIENTS_TABLE, TAGS_TABLE},
    error::PantryError,
};

use super::{ingredients::Ingredient, tags::Tag};

pub mod upload;

/// A price with two fractional digits, stored as whole cents.
///
/// It's unsigned, so a negative price can't exist. Serialized as a string
/// like `"3.00"`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    sqlx::Type,
)]
#[serde(into = "String", try_from = "String")]
#[sqlx(transparent)]
pub struct Price(u32);

impl Price {
    pub const fn from_cents(cents: u32) -> Self {
        Self(cents)
    }

    pub const fn cents(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Price {
    type Err = PantryError;

    /// Parses `"5"`, `"5.5"`, or `"5.50"`. Signs, exponents, and more than
    /// two fractional digits are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || PantryError::InvalidArgument(format!("`{s}` isn't a valid price"));

        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty())
            || frac.len() > 2
            || !all_digits(whole)
            || !all_digits(frac)
        {
            return Err(invalid());
        }

        let whole: u32 = match whole {
            "" => 0,
            w => w.parse().map_err(|_| invalid())?,
        };
        let frac: u32 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u32>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(frac))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl From<Price> for String {
    fn from(value: Price) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Price {
    type Error = PantryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A recipe, as stored in the `recipes` table.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Recipe {
    /// Unique ID, assigned by the database. Newer recipes have larger IDs.
    pub id: i64,

    /// The user that owns this recipe.
    pub user_id: i64,

    pub title: String,

    /// How long it takes to make, in minutes.
    pub time_minutes: u32,

    #[sqlx(rename = "price_cents")]
    pub price: Price,

    /// A link to the recipe somewhere else. Empty when there isn't one.
    pub link: String,

    /// Path to the recipe's image, relative to the media directory.
    ///
    /// Set afterwards by [`Recipe::upload_image`].
    pub image: Option<String>,
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Everything needed to create a recipe.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct NewRecipe {
    pub title: String,
    pub time_minutes: u32,
    pub price: Price,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub tags: Vec<i64>,
    #[serde(default)]
    pub ingredients: Vec<i64>,
}

/// A partial update. `None` leaves a field alone.
///
/// `tags` and `ingredients` replace the whole set when present.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub time_minutes: Option<u32>,
    pub price: Option<Price>,
    pub link: Option<String>,
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<i64>>,
}

impl Recipe {
    /// Creates a recipe, linking the given tags and ingredients.
    ///
    /// Everything happens in one transaction. If any tag or ingredient isn't
    /// the user's, nothing is saved.
    #[tracing::instrument(skip(db))]
    pub async fn create(db: &Database, user_id: i64, new: NewRecipe) -> Result<Self, PantryError> {
        let title = required_title(&new.title)?;

        let mut tx = db.pool().begin().await?;
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes
            (user_id, title, time_minutes, price_cents, link, image)
            VALUES
            ($1, $2, $3, $4, $5, NULL)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(new.time_minutes)
        .bind(new.price)
        .bind(new.link.unwrap_or_default())
        .fetch_one(&mut *tx)
        .await
        .inspect_err(|e| tracing::error!("Recipe insertion failed! err: {e}"))?;

        link_tags(&mut tx, &recipe, &new.tags).await?;
        link_ingredients(&mut tx, &recipe, &new.ingredients).await?;
        tx.commit().await?;

        tracing::debug!(recipe_id = recipe.id, "created recipe");
        Ok(recipe)
    }

    /// Grabs one of the user's recipes.
    ///
    /// A recipe owned by someone else is [`PantryError::NotFound`].
    #[tracing::instrument(skip(db))]
    pub async fn get(db: &Database, user_id: i64, id: i64) -> Result<Self, PantryError> {
        let mut conn = db.acquire().await?;

        sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(PantryError::not_found("recipe", id))
    }

    /// Applies a partial update and saves it.
    ///
    /// On any error (including [`PantryError::NotFound`] for a recipe that
    /// was deleted meanwhile) `self` is left as it was.
    #[tracing::instrument(skip(db))]
    pub async fn update(&mut self, db: &Database, patch: RecipePatch) -> Result<(), PantryError> {
        let mut updated = self.clone();
        if let Some(ref title) = patch.title {
            updated.title = required_title(title)?.to_string();
        }
        if let Some(time_minutes) = patch.time_minutes {
            updated.time_minutes = time_minutes;
        }
        if let Some(price) = patch.price {
            updated.price = price;
        }
        if let Some(link) = patch.link {
            updated.link = link;
        }

        let mut tx = db.pool().begin().await?;
        updated.write_fields(&mut tx).await?;

        if let Some(tags) = patch.tags {
            sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
                .bind(updated.id)
                .execute(&mut *tx)
                .await?;
            link_tags(&mut tx, &updated, &tags).await?;
        }
        if let Some(ingredients) = patch.ingredients {
            sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
                .bind(updated.id)
                .execute(&mut *tx)
                .await?;
            link_ingredients(&mut tx, &updated, &ingredients).await?;
        }

        tx.commit().await?;
        *self = updated;
        Ok(())
    }

    /// Writes this recipe's fields back to the database.
    ///
    /// The recipe must still exist. If it's been deleted in the meantime, this
    /// is [`PantryError::NotFound`] and nothing is written.
    #[tracing::instrument(skip(db))]
    pub async fn save(&self, db: &Database) -> Result<(), PantryError> {
        let mut conn = db.acquire().await?;
        self.write_fields(&mut conn).await
    }

    /// Updates the stored row in place. Never inserts.
    async fn write_fields(&self, conn: &mut SqliteConnection) -> Result<(), PantryError> {
        // the owner never changes, and an update can't cross owners
        let res = sqlx::query(
            r#"
            UPDATE recipes SET
                title = $1,
                time_minutes = $2,
                price_cents = $3,
                link = $4,
                image = $5
            WHERE id = $6 AND user_id = $7
            "#,
        )
        .bind(&self.title)
        .bind(self.time_minutes)
        .bind(self.price)
        .bind(&self.link)
        .bind(&self.image)
        .bind(self.id)
        .bind(self.user_id)
        .execute(&mut *conn)
        .await
        .inspect_err(|e| tracing::error!("Failed to save recipe. err: {e}"))?;

        if res.rows_affected() == 0 {
            tracing::debug!(recipe_id = self.id, "recipe is gone; not saving");
            return Err(PantryError::not_found("recipe", self.id));
        }

        Ok(())
    }

    /// Deletes this recipe and its tag/ingredient links.
    ///
    /// The image file (if any) is left on disk. See
    /// [`upload::remove_image_file`].
    #[tracing::instrument(skip(db))]
    pub async fn delete(self, db: &Database) -> Result<(), PantryError> {
        let mut conn = db.acquire().await?;
        sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(self.id)
            .bind(self.user_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Attaches one of the owner's tags.
    #[tracing::instrument(skip(db))]
    pub async fn attach_tag(&self, db: &Database, tag_id: i64) -> Result<(), PantryError> {
        let mut conn = db.acquire().await?;
        link_tags(&mut conn, self, &[tag_id]).await
    }

    #[tracing::instrument(skip(db))]
    pub async fn detach_tag(&self, db: &Database, tag_id: i64) -> Result<(), PantryError> {
        let mut conn = db.acquire().await?;
        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1 AND tag_id = $2")
            .bind(self.id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Attaches one of the owner's ingredients.
    #[tracing::instrument(skip(db))]
    pub async fn attach_ingredient(&self, db: &Database, ingredient_id: i64) -> Result<(), PantryError> {
        let mut conn = db.acquire().await?;
        link_ingredients(&mut conn, self, &[ingredient_id]).await
    }

    #[tracing::instrument(skip(db))]
    pub async fn detach_ingredient(&self, db: &Database, ingredient_id: i64) -> Result<(), PantryError> {
        let mut conn = db.acquire().await?;
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1 AND ingredient_id = $2")
            .bind(self.id)
            .bind(ingredient_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// The tags on this recipe, oldest first.
    #[tracing::instrument(skip(db))]
    pub async fn tags(&self, db: &Database) -> Result<Vec<Tag>, PantryError> {
        let mut conn = db.acquire().await?;

        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT tags.* FROM tags
            INNER JOIN recipe_tags ON recipe_tags.tag_id = tags.id
            WHERE recipe_tags.recipe_id = $1
            ORDER BY tags.id
            "#,
        )
        .bind(self.id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(tags)
    }

    /// The ingredients in this recipe, oldest first.
    #[tracing::instrument(skip(db))]
    pub async fn ingredients(&self, db: &Database) -> Result<Vec<Ingredient>, PantryError> {
        let mut conn = db.acquire().await?;

        let ingredients = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT ingredients.* FROM ingredients
            INNER JOIN recipe_ingredients ON recipe_ingredients.ingredient_id = ingredients.id
            WHERE recipe_ingredients.recipe_id = $1
            ORDER BY ingredients.id
            "#,
        )
        .bind(self.id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(ingredients)
    }
}

/// A row in the `recipe_tags` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, sqlx::FromRow)]
pub struct RecipeTag {
    pub recipe_id: i64,
    pub tag_id: i64,
}

impl InsertIntoTable for RecipeTag {
    fn make_insertion_query(&self) -> Query<'_, Sqlite, SqliteArguments<'_>> {
        sqlx::query(
            "INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(self.recipe_id)
        .bind(self.tag_id)
    }
}

/// A row in the `recipe_ingredients` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, sqlx::FromRow)]
pub struct RecipeIngredient {
    pub recipe_id: i64,
    pub ingredient_id: i64,
}

impl InsertIntoTable for RecipeIngredient {
    fn make_insertion_query(&self) -> Query<'_, Sqlite, SqliteArguments<'_>> {
        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(self.recipe_id)
        .bind(self.ingredient_id)
    }
}

fn required_title(title: &str) -> Result<&str, PantryError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(PantryError::InvalidArgument(
            "recipes must have a title".into(),
        ));
    }

    Ok(title)
}

async fn link_tags(
    conn: &mut SqliteConnection,
    recipe: &Recipe,
    tag_ids: &[i64],
) -> Result<(), PantryError> {
    for &tag_id in tag_ids {
        ensure_owned(conn, TAGS_TABLE, "tag", recipe.user_id, tag_id).await?;

        RecipeTag {
            recipe_id: recipe.id,
            tag_id,
        }
        .make_insertion_query()
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

async fn link_ingredients(
    conn: &mut SqliteConnection,
    recipe: &Recipe,
    ingredient_ids: &[i64],
) -> Result<(), PantryError> {
    for &ingredient_id in ingredient_ids {
        ensure_owned(conn, INGREDIENTS_TABLE, "ingredient", recipe.user_id, ingredient_id).await?;

        RecipeIngredient {
            recipe_id: recipe.id,
            ingredient_id,
        }
        .make_insertion_query()
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Fails with `NotFound` unless the row exists and belongs to `user_id`.
async fn ensure_owned(
    conn: &mut SqliteConnection,
    table: &'static str,
    what: &'static str,
    user_id: i64,
    id: i64,
) -> Result<(), PantryError> {
    let query = format!("SELECT COUNT(*) FROM {table} WHERE id = $1 AND user_id = $2");
    let owned: i64 = sqlx::query_scalar(&query)
        .bind(id)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

    if owned == 0 {
        tracing::debug!("refusing to link {what} `{id}`: not owned by user `{user_id}`");
        return Err(PantryError::not_found(what, id));
    }

    Ok(())
}
