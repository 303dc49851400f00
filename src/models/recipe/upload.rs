//! Where uploaded recipe images go.
//!
//! Every upload gets a fresh random name, so two uploads of `myimage.jpg`
//! never collide and the original file name isn't exposed.

use camino::Utf8PathBuf;
use uuid::Uuid;

use crate::{config::Config, database::Database, error::PantryError};

use super::Recipe;

/// The folder (relative to the media directory) holding recipe images.
pub const RECIPE_UPLOAD_DIR: &str = "upload/recipe";

/// Hands out unique identifiers for upload file names.
///
/// Any `Fn() -> String` works, which is handy for pinning the identifier in
/// tests.
pub trait IdentifierSource: Send + Sync {
    fn next_identifier(&self) -> String;
}

/// Random v4 UUIDs (122 random bits).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RandomUuid;

impl IdentifierSource for RandomUuid {
    fn next_identifier(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F> IdentifierSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_identifier(&self) -> String {
        self()
    }
}

/// Makes the storage path for an uploaded recipe image:
/// `upload/recipe/{identifier}.{extension}`.
///
/// The extension is whatever follows the last `.` in `original_filename`. A
/// name without a dot is used whole. `_instance` is accepted so callers can
/// pass the recipe along, but the path never depends on it.
pub fn recipe_image_file_path(
    ids: &impl IdentifierSource,
    _instance: Option<&Recipe>,
    original_filename: &str,
) -> Utf8PathBuf {
    let ext = original_filename
        .rsplit('.')
        .next()
        .unwrap_or(original_filename);

    Utf8PathBuf::from(format!(
        "{RECIPE_UPLOAD_DIR}/{}.{ext}",
        ids.next_identifier()
    ))
}

impl Recipe {
    /// Stores an image for this recipe.
    ///
    /// The bytes must look like an image. They're written under the media
    /// directory, and the recipe's `image` field is updated to the new
    /// relative path. A previous image file is removed afterwards.
    #[tracing::instrument(skip(self, db, config, ids, bytes), fields(recipe_id = self.id))]
    pub async fn upload_image(
        &mut self,
        db: &Database,
        config: &Config,
        ids: &impl IdentifierSource,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<(), PantryError> {
        if !infer::is_image(bytes) {
            tracing::debug!("upload doesn't look like an image");
            return Err(PantryError::InvalidArgument(format!(
                "`{original_filename}` is not an image"
            )));
        }

        // the extension lands in the stored path, so it can't hold separators
        if original_filename.contains(['/', '\\']) {
            tracing::debug!("upload name contains a path separator");
            return Err(PantryError::InvalidArgument(format!(
                "`{original_filename}` must be a bare file name"
            )));
        }

        let relative = recipe_image_file_path(ids, Some(&*self), original_filename);
        let absolute = config.media_dir.join(&relative);

        if let Some(parent) = absolute.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| PantryError::Io {
                    path: parent.to_string(),
                    err,
                })?;
        }

        tokio::fs::write(&absolute, bytes)
            .await
            .inspect_err(|e| tracing::error!("Failed to write uploaded image. err: {e}"))
            .map_err(|err| PantryError::Io {
                path: absolute.to_string(),
                err,
            })?;

        let previous = self.image.replace(relative.to_string());
        if let Err(e) = self.save(db).await {
            // don't leave an orphan behind
            self.image = previous;
            remove_image_file(config, relative.as_str()).await;
            return Err(e);
        }

        if let Some(previous) = previous {
            remove_image_file(config, &previous).await;
        }

        tracing::debug!("stored recipe image at `{relative}`");
        Ok(())
    }
}

/// Removes an image file below the media directory.
///
/// A file that's already gone is fine. Other failures are only logged.
pub async fn remove_image_file(config: &Config, relative: &str) {
    let path = config.media_dir.join(relative);

    match tokio::fs::remove_file(&path).await {
        Ok(()) => tracing::debug!("removed old image at `{path}`"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => (),
        Err(e) => tracing::warn!("Failed to remove image at `{path}`. err: {e}"),
    }
}
