//! Types that are really the bedrock of the app.
//!
//! Every [`Tag`](tags::Tag), [`Ingredient`](ingredients::Ingredient), and
//! [`Recipe`](recipe::Recipe) belongs to exactly one [`User`](user::User).

pub mod ingredients;
pub mod recipe;
pub mod tags;
pub mod user;
