//! Filters narrow down a listing.
//!
//! They're always combined with `AND`, and always on top of the ownership
//! clause. A filter can't widen what a user sees.

use sea_query::SimpleExpr;

use crate::error::PantryError;

/// One condition on a recipe listing.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RecipeFilter {
    /// Recipes with at least one of these tags.
    Tags(Vec<i64>),
    /// Recipes with at least one of these ingredients.
    Ingredients(Vec<i64>),
    /// Recipes whose title contains this text, ignoring case.
    Title(String),
}

impl RecipeFilter {
    /// Builds filters from raw query parameters, like `tags=1,2` and
    /// `ingredients=3`.
    ///
    /// Missing or empty parameters add no filter.
    pub fn from_params(
        tags: Option<&str>,
        ingredients: Option<&str>,
    ) -> Result<Vec<Self>, PantryError> {
        let mut filters = Vec::new();

        if let Some(ids) = tags.map(parse_ids).transpose()?.filter(|ids| !ids.is_empty()) {
            filters.push(Self::Tags(ids));
        }
        if let Some(ids) = ingredients
            .map(parse_ids)
            .transpose()?
            .filter(|ids| !ids.is_empty())
        {
            filters.push(Self::Ingredients(ids));
        }

        Ok(filters)
    }
}

/// Parses a comma-separated list of ids. Blank entries are skipped.
pub fn parse_ids(s: &str) -> Result<Vec<i64>, PantryError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| PantryError::InvalidArgument(format!("`{part}` is not a valid id")))
        })
        .collect()
}

/// A filter must become a query to be used.
pub trait ToQuery {
    /// Converts the filter into a `WHERE` clause expression.
    fn to_query(self) -> SimpleExpr;
}
