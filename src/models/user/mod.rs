//! User accounts.
//!
//! Users are identified by email. Emails are lower-cased before they're
//! stored or compared, so `Test@SOMETHING.dev` and `test@something.dev` are
//! the same account.

use chrono::{DateTime, Utc};

use crate::{database::Database, error::PantryError};

pub mod password;

/// A user account, as stored in the `users` table.
#[derive(Clone, Debug, PartialEq, serde::Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique ID, assigned by the database.
    pub id: i64,

    /// The normalized (lower-case) email address.
    pub email: String,

    /// A display name. Can be empty.
    pub name: String,

    /// An Argon2id PHC string. Never the plaintext.
    #[serde(skip_serializing)]
    pub password: String,

    /// Inactive users can't authenticate.
    pub is_active: bool,

    /// Whether the user may use admin tooling.
    pub is_staff: bool,

    /// Whether the user has every permission.
    pub is_superuser: bool,

    /// When the account was created.
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Checks the given plaintext against this user's stored hash.
    pub fn check_password(&self, password: &str) -> bool {
        password::verify(password, &self.password)
    }

    /// Replaces this user's password, saving the new hash.
    #[tracing::instrument(skip_all, fields(user_id = self.id))]
    pub async fn set_password(&mut self, db: &Database, password: &str) -> Result<(), PantryError> {
        let hash = password::hash(password)?;

        let mut conn = db.acquire().await?;
        sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
            .bind(&hash)
            .bind(self.id)
            .execute(&mut *conn)
            .await
            .inspect_err(|e| tracing::error!("Failed to save new password hash. err: {e}"))?;

        self.password = hash;
        Ok(())
    }

    /// Finds a user by email. The lookup is case-insensitive.
    #[tracing::instrument(skip(db))]
    pub async fn get_by_email(db: &Database, email: &str) -> Result<Option<User>, PantryError> {
        let email = normalize_email(Some(email))?;

        let mut conn = db.acquire().await?;
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(user)
    }
}

/// Optional fields for [`UserManager::create_user`].
///
/// Anything left as `None` gets the default for a regular account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserExtra {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Creates and authenticates user accounts.
#[derive(Clone, Copy, Debug)]
pub struct UserManager<'db> {
    db: &'db Database,
}

impl<'db> UserManager<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }

    /// Creates a regular user.
    ///
    /// ## Errors
    ///
    /// Fails with [`PantryError::InvalidArgument`] when `email` is missing,
    /// empty, or already taken.
    #[tracing::instrument(skip(self, password))]
    pub async fn create_user(
        &self,
        email: Option<&str>,
        password: &str,
        extra: UserExtra,
    ) -> Result<User, PantryError> {
        let email = normalize_email(email)?;
        let hash = password::hash(password)?;

        let mut conn = self.db.acquire().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users
            (email, name, password, is_active, is_staff, is_superuser, date_joined)
            VALUES
            ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&email)
        .bind(extra.name.unwrap_or_default())
        .bind(hash)
        .bind(extra.is_active.unwrap_or(true))
        .bind(extra.is_staff.unwrap_or(false))
        .bind(extra.is_superuser.unwrap_or(false))
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| match e {
            // the `UNIQUE` email column catches duplicates, concurrent ones too
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                tracing::debug!("refusing to create duplicate account");
                PantryError::InvalidArgument(format!("a user with email `{email}` already exists"))
            }
            e => {
                tracing::error!("User insertion failed! err: {e}");
                PantryError::from(e)
            }
        })?;

        tracing::info!(user_id = user.id, "created user");
        Ok(user)
    }

    /// Creates a user with staff and superuser flags set.
    #[tracing::instrument(skip(self, password))]
    pub async fn create_superuser(&self, email: &str, password: &str) -> Result<User, PantryError> {
        self.create_user(
            Some(email),
            password,
            UserExtra {
                is_staff: Some(true),
                is_superuser: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    /// Returns the user only if they exist, are active, and the password
    /// matches.
    #[tracing::instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, PantryError> {
        let Some(user) = User::get_by_email(self.db, email).await? else {
            return Ok(None);
        };

        if !user.is_active {
            tracing::debug!(user_id = user.id, "inactive user tried to log in");
            return Ok(None);
        }

        Ok(user.check_password(password).then_some(user))
    }
}

/// Lower-cases an email, rejecting missing or blank ones.
pub fn normalize_email(email: Option<&str>) -> Result<String, PantryError> {
    match email.map(str::trim) {
        Some(e) if !e.is_empty() => Ok(e.to_lowercase()),
        _ => Err(PantryError::InvalidArgument(
            "users must have an email address".into(),
        )),
    }
}
