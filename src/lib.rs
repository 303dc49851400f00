/*! # `pantry`

The backend of a recipe box. It keeps user accounts and, for each user, their
own tags, ingredients, and recipes.

## Layout

- [`models::user`]: accounts. Emails are normalized, passwords are hashed.
- [`models::tags`], [`models::ingredients`], [`models::recipe`]: the records
  a user owns. Recipes link to tags and ingredients.
- [`models::recipe::upload`]: where uploaded recipe images are stored.
- [`search`]: ownership-scoped listings and filters.
- [`api`]: request handlers, minus the HTTP. Callers come from whatever
  authentication layer sits in front.

Nothing is global. Open a [`database::Database`] from a [`config::Config`]
and pass both to whatever needs them.

```no_run
use pantry::{api::Api, auth::Caller, config::Config, database::Database};
use pantry::models::user::{UserExtra, UserManager};

# async fn run() -> Result<(), pantry::error::PantryError> {
let config = Config::new("/var/lib/pantry".into(), "/var/lib/pantry/media".into());
let db = Database::connect(&config).await?;

let user = UserManager::new(&db)
    .create_user(Some("cook@example.com"), "hunter2", UserExtra::default())
    .await?;

let api = Api::new(&db, &config);
let _recipes = api
    .list_recipes(Some(&Caller::from(&user)), Default::default())
    .await?;
# Ok(())
# }
```
*/

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod search;
