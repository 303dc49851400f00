//! The parent of the other tests.
//!
//! Mostly to import the setup stuff below.

use camino::Utf8PathBuf;
use temp_dir::TempDir;

use pantry::{
    config::Config,
    database::Database,
    models::{
        recipe::{NewRecipe, Price, Recipe},
        user::{User, UserExtra, UserManager},
    },
};

/// A throwaway data directory with a migrated database in it.
///
/// Keep it alive for the whole test. Dropping it deletes the folder.
#[allow(dead_code, reason = "it's used in the other tests")]
pub struct Setup {
    pub dir: TempDir,
    pub config: Config,
    pub db: Database,
}

/// call this at the top of any new test func! :)
#[allow(dead_code, reason = "it's used in the other tests")]
pub async fn setup() -> Setup {
    // several tests share a process, so only the first one gets to init
    _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    let dir = TempDir::new().expect("create temp dir");
    let data_dir = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
    let config = Config::new(data_dir.clone(), data_dir.join("media"));

    let db = Database::connect(&config)
        .await
        .expect("connect to fresh database");

    Setup { dir, config, db }
}

/// Creates a sample user.
#[allow(dead_code, reason = "it's used in the other tests")]
pub async fn sample_user(db: &Database, email: &str) -> User {
    UserManager::new(db)
        .create_user(Some(email), "testpass", UserExtra::default())
        .await
        .expect("create sample user")
}

/// Creates a sample recipe: "Sample recipe", 15 minutes, 3.00.
#[allow(dead_code, reason = "it's used in the other tests")]
pub async fn sample_recipe(db: &Database, user: &User) -> Recipe {
    sample_recipe_with(
        db,
        user,
        NewRecipe {
            title: "Sample recipe".into(),
            time_minutes: 15,
            price: Price::from_cents(300),
            ..Default::default()
        },
    )
    .await
}

#[allow(dead_code, reason = "it's used in the other tests")]
pub async fn sample_recipe_with(db: &Database, user: &User, new: NewRecipe) -> Recipe {
    Recipe::create(db, user.id, new)
        .await
        .expect("create sample recipe")
}

/// The first bytes of a PNG file. Enough to pass as an image.
#[allow(dead_code, reason = "it's used in the other tests")]
pub const PNG_BYTES: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
];
