//! Ingredients. Same shape as tags, kept in their own table.

use core::fmt;

use crate::{database::Database, error::PantryError};

use super::tags::required_name;

#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    sqlx::FromRow,
)]
pub struct Ingredient {
    pub id: i64,
    /// The owning user.
    pub user_id: i64,
    pub name: String,
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Ingredient {
    #[tracing::instrument(skip(db))]
    pub async fn create(db: &Database, user_id: i64, name: &str) -> Result<Self, PantryError> {
        let name = required_name(name)?;

        let mut conn = db.acquire().await?;
        let ingredient = sqlx::query_as::<_, Ingredient>(
            "INSERT INTO ingredients (user_id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&mut *conn)
        .await
        .inspect_err(|e| tracing::error!("Ingredient insertion failed! err: {e}"))?;

        Ok(ingredient)
    }

    /// Owner-scoped lookup, like [`Tag::get`](super::tags::Tag::get).
    #[tracing::instrument(skip(db))]
    pub async fn get(db: &Database, user_id: i64, id: i64) -> Result<Self, PantryError> {
        let mut conn = db.acquire().await?;

        sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(PantryError::not_found("ingredient", id))
    }

    #[tracing::instrument(skip(db))]
    pub async fn rename(&mut self, db: &Database, name: &str) -> Result<(), PantryError> {
        let name = required_name(name)?;

        let mut conn = db.acquire().await?;
        sqlx::query("UPDATE ingredients SET name = $1 WHERE id = $2 AND user_id = $3")
            .bind(name)
            .bind(self.id)
            .bind(self.user_id)
            .execute(&mut *conn)
            .await?;

        self.name = name.to_string();
        Ok(())
    }

    #[tracing::instrument(skip(db))]
    pub async fn delete(self, db: &Database) -> Result<(), PantryError> {
        let mut conn = db.acquire().await?;
        sqlx::query("DELETE FROM ingredients WHERE id = $1 AND user_id = $2")
            .bind(self.id)
            .bind(self.user_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
