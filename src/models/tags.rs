//! Tags, like "vegan" or "dessert".
//!
//! A tag belongs to exactly one user. Other users can't see it, attach it,
//! or even learn that it exists.

use core::fmt;

use crate::{database::Database, error::PantryError};

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
pub struct Tag {
    /// Unique ID, assigned by the database.
    pub id: i64,

    /// The user that owns this tag.
    pub user_id: i64,

    /// A short name describing this tag.
    ///
    /// Names aren't unique, even for a single user. Use the `id` to
    /// reference a tag.
    pub name: String,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Tag {
    /// Creates a new tag for the given user.
    #[tracing::instrument(skip(db))]
    pub async fn create(db: &Database, user_id: i64, name: &str) -> Result<Self, PantryError> {
        let name = required_name(name)?;

        let mut conn = db.acquire().await?;
        let tag = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (user_id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&mut *conn)
        .await
        .inspect_err(|e| tracing::error!("Tag insertion failed! err: {e}"))?;

        Ok(tag)
    }

    /// Grabs one of the user's tags.
    ///
    /// Someone else's tag is reported as [`PantryError::NotFound`].
    #[tracing::instrument(skip(db))]
    pub async fn get(db: &Database, user_id: i64, id: i64) -> Result<Self, PantryError> {
        let mut conn = db.acquire().await?;

        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(PantryError::not_found("tag", id))
    }

    /// Gives this tag a new name.
    #[tracing::instrument(skip(db))]
    pub async fn rename(&mut self, db: &Database, name: &str) -> Result<(), PantryError> {
        let name = required_name(name)?;

        let mut conn = db.acquire().await?;
        sqlx::query("UPDATE tags SET name = $1 WHERE id = $2 AND user_id = $3")
            .bind(name)
            .bind(self.id)
            .bind(self.user_id)
            .execute(&mut *conn)
            .await?;

        self.name = name.to_string();
        Ok(())
    }

    /// Deletes this tag. Recipes using it simply lose it.
    #[tracing::instrument(skip(db))]
    pub async fn delete(self, db: &Database) -> Result<(), PantryError> {
        let mut conn = db.acquire().await?;
        sqlx::query("DELETE FROM tags WHERE id = $1 AND user_id = $2")
            .bind(self.id)
            .bind(self.user_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}

/// Trims a tag or ingredient name, refusing blank ones.
pub(crate) fn required_name(name: &str) -> Result<&str, PantryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PantryError::InvalidArgument("name may not be blank".into()));
    }

    Ok(name)
}
