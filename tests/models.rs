//! Tests the models: accounts, the owned records, and recipe images.

mod common;

#[cfg(test)]
mod tests {
    mod accounts {
        use pantry::{
            error::PantryError,
            models::user::{User, UserExtra, UserManager},
        };

        use crate::common::setup;

        /// Creating a new user with an email is successful.
        #[tokio::test]
        async fn create_user_email_successful() {
            let s = setup().await;
            let email = "test@somehing.dev";
            let password = "Testpass123";

            let user = UserManager::new(&s.db)
                .create_user(Some(email), password, UserExtra::default())
                .await
                .unwrap();

            assert_eq!(user.email, email);
            assert!(user.check_password(password));
            assert_ne!(user.password, password, "stored hashed, not plain");

            assert!(user.is_active);
            assert!(!user.is_staff);
            assert!(!user.is_superuser);
        }

        /// The email for a new user is normalized.
        #[tokio::test]
        async fn new_user_email_normalized() {
            let s = setup().await;
            let email = "test@SOMETHING.DEV";

            let user = UserManager::new(&s.db)
                .create_user(Some(email), "test123", UserExtra::default())
                .await
                .unwrap();

            assert_eq!(user.email, email.to_lowercase());

            // and it's found again no matter the casing
            let found = User::get_by_email(&s.db, "TEST@something.dev")
                .await
                .unwrap()
                .expect("user should be found");
            assert_eq!(found.id, user.id);
        }

        /// Creating a user with no email fails.
        #[tokio::test]
        async fn invalid_user_email() {
            let s = setup().await;
            let manager = UserManager::new(&s.db);

            for email in [None, Some("")] {
                let res = manager
                    .create_user(email, "test123", UserExtra::default())
                    .await;
                assert!(
                    matches!(res, Err(PantryError::InvalidArgument(_))),
                    "email {email:?} should be rejected"
                );
            }
        }

        #[tokio::test]
        async fn create_new_superuser() {
            let s = setup().await;

            let user = UserManager::new(&s.db)
                .create_superuser("test@something.dev", "test123")
                .await
                .unwrap();

            assert!(user.is_superuser);
            assert!(user.is_staff);
            assert!(user.is_active);
        }

        #[tokio::test]
        async fn extra_fields_are_applied() {
            let s = setup().await;

            let user = UserManager::new(&s.db)
                .create_user(
                    Some("chef@something.dev"),
                    "test123",
                    UserExtra {
                        name: Some("Chef".into()),
                        is_staff: Some(true),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            assert_eq!(user.name, "Chef");
            assert!(user.is_staff);
            assert!(!user.is_superuser);
        }

        /// Emails differing only by case are the same account.
        #[tokio::test]
        async fn duplicate_email_rejected() {
            let s = setup().await;
            let manager = UserManager::new(&s.db);

            manager
                .create_user(Some("dupe@something.dev"), "a", UserExtra::default())
                .await
                .unwrap();
            let res = manager
                .create_user(Some("DUPE@something.dev"), "b", UserExtra::default())
                .await;

            assert!(matches!(res, Err(PantryError::InvalidArgument(_))));
        }

        /// Two sign-ups racing for one email: one wins, the other is told why.
        #[tokio::test]
        async fn concurrent_duplicate_email_rejected() {
            let s = setup().await;
            let manager = UserManager::new(&s.db);

            let (a, b) = tokio::join!(
                manager.create_user(Some("race@something.dev"), "a", UserExtra::default()),
                manager.create_user(Some("Race@something.dev"), "b", UserExtra::default()),
            );

            let (ok, err): (Vec<_>, Vec<_>) = [a, b].into_iter().partition(Result::is_ok);
            assert_eq!(ok.len(), 1);
            assert!(matches!(err[0], Err(PantryError::InvalidArgument(_))));
        }

        #[tokio::test]
        async fn authenticate() {
            let s = setup().await;
            let manager = UserManager::new(&s.db);

            let user = manager
                .create_user(Some("cook@something.dev"), "right", UserExtra::default())
                .await
                .unwrap();
            manager
                .create_user(
                    Some("sleepy@something.dev"),
                    "right",
                    UserExtra {
                        is_active: Some(false),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            let authed = manager.authenticate("Cook@something.dev", "right").await.unwrap();
            assert_eq!(authed.map(|u| u.id), Some(user.id));

            assert!(manager.authenticate("cook@something.dev", "wrong").await.unwrap().is_none());
            assert!(manager.authenticate("nobody@something.dev", "right").await.unwrap().is_none());
            assert!(
                manager.authenticate("sleepy@something.dev", "right").await.unwrap().is_none(),
                "inactive users can't log in"
            );
        }

        #[tokio::test]
        async fn set_password() {
            let s = setup().await;
            let manager = UserManager::new(&s.db);

            let mut user = manager
                .create_user(Some("cook@something.dev"), "old", UserExtra::default())
                .await
                .unwrap();
            user.set_password(&s.db, "new").await.unwrap();

            assert!(user.check_password("new"));
            assert!(!user.check_password("old"));

            // the new hash was saved, too
            let reloaded = User::get_by_email(&s.db, "cook@something.dev")
                .await
                .unwrap()
                .unwrap();
            assert!(reloaded.check_password("new"));
        }
    }

    mod records {
        use pantry::{
            error::PantryError,
            models::{
                ingredients::Ingredient,
                recipe::{NewRecipe, Price, Recipe, RecipePatch},
                tags::Tag,
            },
        };

        use crate::common::{sample_recipe, sample_user, setup};

        /// The tag string representation is its name.
        #[tokio::test]
        async fn tag_str() {
            let s = setup().await;
            let user = sample_user(&s.db, "test@something.dev").await;

            let tag = Tag::create(&s.db, user.id, "Vegan").await.unwrap();

            assert_eq!(tag.to_string(), tag.name);
            assert_eq!(tag.name, "Vegan");
        }

        #[tokio::test]
        async fn ingredient_str() {
            let s = setup().await;
            let user = sample_user(&s.db, "test@something.dev").await;

            let ingredient = Ingredient::create(&s.db, user.id, "Cucumber").await.unwrap();

            assert_eq!(ingredient.to_string(), ingredient.name);
        }

        #[tokio::test]
        async fn recipe_str() {
            let s = setup().await;
            let user = sample_user(&s.db, "test@something.dev").await;

            let recipe = Recipe::create(
                &s.db,
                user.id,
                NewRecipe {
                    title: "Chilly Cheese Fries".into(),
                    time_minutes: 15,
                    price: Price::from_cents(500),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

            assert_eq!(recipe.to_string(), recipe.title);
            assert_eq!(recipe.price.to_string(), "5.00");
            assert_eq!(recipe.link, "");
            assert_eq!(recipe.image, None);
        }

        #[tokio::test]
        async fn blank_names_rejected() {
            let s = setup().await;
            let user = sample_user(&s.db, "test@something.dev").await;

            assert!(matches!(
                Tag::create(&s.db, user.id, "  ").await,
                Err(PantryError::InvalidArgument(_))
            ));
            assert!(matches!(
                Ingredient::create(&s.db, user.id, "").await,
                Err(PantryError::InvalidArgument(_))
            ));
            assert!(matches!(
                Recipe::create(&s.db, user.id, NewRecipe::default()).await,
                Err(PantryError::InvalidArgument(_))
            ));
        }

        /// Someone else's tag is invisible, so it can't be attached either.
        #[tokio::test]
        async fn cant_attach_foreign_tag() {
            let s = setup().await;
            let me = sample_user(&s.db, "me@something.dev").await;
            let them = sample_user(&s.db, "them@something.dev").await;

            let their_tag = Tag::create(&s.db, them.id, "Secret").await.unwrap();
            let recipe = sample_recipe(&s.db, &me).await;

            let res = recipe.attach_tag(&s.db, their_tag.id).await;
            assert!(matches!(res, Err(PantryError::NotFound { what: "tag", .. })));

            assert!(matches!(
                Tag::get(&s.db, me.id, their_tag.id).await,
                Err(PantryError::NotFound { .. })
            ));

            // creating with it fails as a whole
            let res = Recipe::create(
                &s.db,
                me.id,
                NewRecipe {
                    title: "Stolen".into(),
                    tags: vec![their_tag.id],
                    ..Default::default()
                },
            )
            .await;
            assert!(res.is_err());

            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE title = 'Stolen'")
                .fetch_one(s.db.pool())
                .await
                .unwrap();
            assert_eq!(count, 0, "transaction rolled back");
        }

        #[tokio::test]
        async fn attach_and_detach() {
            let s = setup().await;
            let user = sample_user(&s.db, "test@something.dev").await;

            let vegan = Tag::create(&s.db, user.id, "Vegan").await.unwrap();
            let dessert = Tag::create(&s.db, user.id, "Dessert").await.unwrap();
            let salt = Ingredient::create(&s.db, user.id, "Salt").await.unwrap();
            let recipe = sample_recipe(&s.db, &user).await;

            recipe.attach_tag(&s.db, vegan.id).await.unwrap();
            recipe.attach_tag(&s.db, dessert.id).await.unwrap();
            // attaching twice is fine
            recipe.attach_tag(&s.db, vegan.id).await.unwrap();
            recipe.attach_ingredient(&s.db, salt.id).await.unwrap();

            assert_eq!(recipe.tags(&s.db).await.unwrap(), vec![vegan.clone(), dessert.clone()]);
            assert_eq!(recipe.ingredients(&s.db).await.unwrap(), vec![salt.clone()]);

            recipe.detach_tag(&s.db, vegan.id).await.unwrap();
            recipe.detach_ingredient(&s.db, salt.id).await.unwrap();

            assert_eq!(recipe.tags(&s.db).await.unwrap(), vec![dessert]);
            assert!(recipe.ingredients(&s.db).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn deleting_tag_unlinks_it() {
            let s = setup().await;
            let user = sample_user(&s.db, "test@something.dev").await;

            let tag = Tag::create(&s.db, user.id, "Gone").await.unwrap();
            let recipe = sample_recipe(&s.db, &user).await;
            recipe.attach_tag(&s.db, tag.id).await.unwrap();

            tag.delete(&s.db).await.unwrap();

            assert!(recipe.tags(&s.db).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn rename() {
            let s = setup().await;
            let user = sample_user(&s.db, "test@something.dev").await;

            let mut tag = Tag::create(&s.db, user.id, "Old").await.unwrap();
            tag.rename(&s.db, "New").await.unwrap();

            let reloaded = Tag::get(&s.db, user.id, tag.id).await.unwrap();
            assert_eq!(reloaded.name, "New");
        }

        #[tokio::test]
        async fn partial_update() {
            let s = setup().await;
            let user = sample_user(&s.db, "test@something.dev").await;

            let old_tag = Tag::create(&s.db, user.id, "Old").await.unwrap();
            let new_tag = Tag::create(&s.db, user.id, "New").await.unwrap();
            let mut recipe = sample_recipe(&s.db, &user).await;
            recipe.attach_tag(&s.db, old_tag.id).await.unwrap();

            recipe
                .update(
                    &s.db,
                    RecipePatch {
                        title: Some("Chicken tikka".into()),
                        price: Some("7.5".parse().unwrap()),
                        tags: Some(vec![new_tag.id]),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            let reloaded = Recipe::get(&s.db, user.id, recipe.id).await.unwrap();
            assert_eq!(reloaded, recipe);
            assert_eq!(reloaded.title, "Chicken tikka");
            assert_eq!(reloaded.price, Price::from_cents(750));
            assert_eq!(reloaded.time_minutes, 15, "untouched");
            assert_eq!(reloaded.tags(&s.db).await.unwrap(), vec![new_tag]);
        }

        /// Updating a recipe someone already deleted must not recreate it.
        #[tokio::test]
        async fn update_after_delete_is_not_found() {
            let s = setup().await;
            let user = sample_user(&s.db, "test@something.dev").await;

            let mut stale = sample_recipe(&s.db, &user).await;
            stale.clone().delete(&s.db).await.unwrap();

            let res = stale
                .update(
                    &s.db,
                    RecipePatch {
                        title: Some("Back again".into()),
                        ..Default::default()
                    },
                )
                .await;
            assert!(matches!(res, Err(PantryError::NotFound { .. })));
            assert_eq!(stale.title, "Sample recipe", "left alone on failure");

            assert!(matches!(
                stale.save(&s.db).await,
                Err(PantryError::NotFound { .. })
            ));
            assert!(matches!(
                Recipe::get(&s.db, user.id, stale.id).await,
                Err(PantryError::NotFound { .. })
            ));
        }
    }

    mod images {
        use pantry::{
            error::PantryError,
            models::recipe::{upload::RandomUuid, Recipe},
        };

        use crate::common::{sample_recipe, sample_user, setup, PNG_BYTES};

        #[tokio::test]
        async fn upload_stores_file_and_path() {
            let s = setup().await;
            let user = sample_user(&s.db, "test@something.dev").await;
            let mut recipe = sample_recipe(&s.db, &user).await;

            let fixed = || String::from("test-uuid");
            recipe
                .upload_image(&s.db, &s.config, &fixed, "myimage.png", PNG_BYTES)
                .await
                .unwrap();

            assert_eq!(recipe.image.as_deref(), Some("upload/recipe/test-uuid.png"));

            let on_disk = tokio::fs::read(s.config.media_dir.join("upload/recipe/test-uuid.png"))
                .await
                .expect("image file written");
            assert_eq!(on_disk, PNG_BYTES);

            let reloaded = Recipe::get(&s.db, user.id, recipe.id).await.unwrap();
            assert_eq!(reloaded.image, recipe.image);
        }

        /// Uploading again replaces the old file.
        #[tokio::test]
        async fn reupload_removes_old_file() {
            let s = setup().await;
            let user = sample_user(&s.db, "test@something.dev").await;
            let mut recipe = sample_recipe(&s.db, &user).await;

            recipe
                .upload_image(&s.db, &s.config, &RandomUuid, "a.png", PNG_BYTES)
                .await
                .unwrap();
            let first = recipe.image.clone().unwrap();

            recipe
                .upload_image(&s.db, &s.config, &RandomUuid, "b.png", PNG_BYTES)
                .await
                .unwrap();
            let second = recipe.image.clone().unwrap();

            assert_ne!(first, second);
            assert!(!s.config.media_dir.join(&first).exists(), "old file removed");
            assert!(s.config.media_dir.join(&second).exists());
        }

        #[tokio::test]
        async fn non_image_rejected() {
            let s = setup().await;
            let user = sample_user(&s.db, "test@something.dev").await;
            let mut recipe = sample_recipe(&s.db, &user).await;

            let res = recipe
                .upload_image(&s.db, &s.config, &RandomUuid, "notes.txt", b"just some text")
                .await;

            assert!(matches!(res, Err(PantryError::InvalidArgument(_))));
            assert_eq!(recipe.image, None);
        }

        /// A name with path separators can't steer where the file goes.
        #[tokio::test]
        async fn name_with_separators_rejected() {
            let s = setup().await;
            let user = sample_user(&s.db, "test@something.dev").await;
            let mut recipe = sample_recipe(&s.db, &user).await;
            let fixed = || String::from("id");

            for name in ["x.png/../../../../evil", r"x.png\..\evil"] {
                let res = recipe
                    .upload_image(&s.db, &s.config, &fixed, name, PNG_BYTES)
                    .await;
                assert!(matches!(res, Err(PantryError::InvalidArgument(_))), "{name}");
            }

            assert_eq!(recipe.image, None);
            assert!(!s.config.media_dir.join("upload/recipe/id.").exists());
        }

        /// Uploading to a recipe that was deleted meanwhile doesn't bring it back.
        #[tokio::test]
        async fn upload_to_deleted_recipe_fails() {
            let s = setup().await;
            let user = sample_user(&s.db, "test@something.dev").await;
            let mut recipe = sample_recipe(&s.db, &user).await;
            Recipe::get(&s.db, user.id, recipe.id)
                .await
                .unwrap()
                .delete(&s.db)
                .await
                .unwrap();

            let fixed = || String::from("gone");
            let res = recipe
                .upload_image(&s.db, &s.config, &fixed, "a.png", PNG_BYTES)
                .await;

            assert!(matches!(res, Err(PantryError::NotFound { .. })));
            assert_eq!(recipe.image, None);
            assert!(!s.config.media_dir.join("upload/recipe/gone.png").exists());
            assert!(matches!(
                Recipe::get(&s.db, user.id, recipe.id).await,
                Err(PantryError::NotFound { .. })
            ));
        }
    }
}
