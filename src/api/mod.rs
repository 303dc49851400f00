//! Request handlers.
//!
//! These are the endpoints without the HTTP part. Each takes the caller
//! resolved by the authentication layer (`None` when the request carried no
//! valid credentials) and returns serializable views. A missing caller is
//! always rejected with [`PantryError::Unauthenticated`](crate::error::PantryError::Unauthenticated)
//! before anything else runs.
//!
//! | endpoint                              | handler                         |
//! |---------------------------------------|---------------------------------|
//! | `GET /recipes/`                       | [`Api::list_recipes`]           |
//! | `POST /recipes/`                      | [`Api::create_recipe`]          |
//! | `GET /recipes/{id}/`                  | [`Api::retrieve_recipe`]        |
//! | `PATCH /recipes/{id}/`                | [`Api::partial_update_recipe`]  |
//! | `DELETE /recipes/{id}/`               | [`Api::destroy_recipe`]         |
//! | `POST /recipes/{id}/upload-image/`    | [`Api::upload_recipe_image`]    |
//! | `GET /tags/`, `POST /tags/`           | [`Api::list_tags`], [`Api::create_tag`] |
//! | `GET /ingredients/`, `POST /ingredients/` | [`Api::list_ingredients`], [`Api::create_ingredient`] |

use crate::{
    config::Config,
    database::Database,
    models::recipe::upload::{IdentifierSource, RandomUuid},
};

mod recipes;
mod tags;
pub mod views;

pub use recipes::RecipeListParams;

/// The handlers, bound to a database and config.
///
/// `I` names upload files. It's [`RandomUuid`] unless swapped with
/// [`Api::with_identifiers`].
#[derive(Clone, Debug)]
pub struct Api<'a, I = RandomUuid> {
    db: &'a Database,
    config: &'a Config,
    ids: I,
}

impl<'a> Api<'a> {
    pub fn new(db: &'a Database, config: &'a Config) -> Self {
        Self {
            db,
            config,
            ids: RandomUuid,
        }
    }
}

impl<'a, I: IdentifierSource> Api<'a, I> {
    /// Uses another identifier source for upload file names.
    pub fn with_identifiers<J: IdentifierSource>(self, ids: J) -> Api<'a, J> {
        Api {
            db: self.db,
            config: self.config,
            ids,
        }
    }
}
