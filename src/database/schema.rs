use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::TypeError;

pub type Uuid = i32;

#[derive(
    Clone, Debug, PartialEq, PartialOrd, sqlx::Type, Serialize, Eq, Ord, Hash, Deserialize,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    Admin,
}

/// The two named lists a recipe can belong to for a given user. Favorites
/// and the shopping cart share one membership table keyed by this kind.
#[derive(
    Clone, Copy, Debug, PartialEq, PartialOrd, sqlx::Type, Serialize, Eq, Ord, Hash, Deserialize,
)]
#[sqlx(type_name = "list_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Favorite,
    ShoppingCart,
}

impl ListKind {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::ShoppingCart => "the shopping cart",
        }
    }
}

impl TryFrom<Value> for ListKind {
    type Error = TypeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value.as_str() {
            Some(value) => match value {
                "favorite" => Ok(Self::Favorite),
                "shopping_cart" => Ok(Self::ShoppingCart),
                _ => Err(TypeError::new("Invalid variant")),
            },
            None => Err(TypeError::new("Failed to parse value as string")),
        }
    }
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: UserRole,
}

/// Public view of a user, password stripped, annotated with the viewer's
/// follow state.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl Profile {
    pub fn from_user(user: &User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email.to_owned(),
            username: user.username.to_owned(),
            first_name: user.first_name.to_owned(),
            last_name: user.last_name.to_owned(),
            is_subscribed,
        }
    }
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
}

/// Short recipe representation used in list contexts.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct RecipeRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<Recipe> for RecipeRow {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            author_id: recipe.author_id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Short representation plus the `COUNT(*) OVER()` window column carried by
/// paginated queries.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct RecipeRowPage {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,

    pub count: i64,
}

impl From<RecipeRowPage> for RecipeRow {
    fn from(row: RecipeRowPage) -> Self {
        Self {
            id: row.id,
            author_id: row.author_id,
            name: row.name,
            image: row.image,
            cooking_time: row.cooking_time,
        }
    }
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct RecipeIngredientRow {
    pub ingredient_id: Uuid,
    pub name: String,
    pub unit: String,
    pub amount: i32,
}

/// Full recipe representation assembled for detail pages.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetails {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
    pub author: Profile,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredientRow>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// One (ingredient, unit, amount) contribution from a recipe in the cart.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct PurchaseRow {
    pub name: String,
    pub unit: String,
    pub amount: i32,
}

/// One aggregated shopping-list group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseItem {
    pub name: String,
    pub unit: String,
    pub amount: i64,
}

/// An author the user follows, with their recipe count and a capped sample.
#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    #[serde(flatten)]
    pub author: Profile,
    pub recipes_count: i64,
    pub recipes: Vec<RecipeRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipeIngredientSpec {
    pub id: Uuid,
    pub amount: i32,
}

/// Payload for recipe create/update. The full ingredient and tag sets are
/// replaced on every write.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub tags: Vec<Uuid>,
    pub ingredients: Vec<RecipeIngredientSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Recipe listing filter dimensions, composed with AND; values within one
/// dimension are OR'd.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub authors: Vec<Uuid>,
    pub tags: Vec<String>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

impl RecipeFilter {
    /// Builds a filter from decoded query pairs; `author` and `tags` are
    /// repeatable, the boolean flags accept `true`/`false` and `1`/`0`.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = Self::default();

        for (key, value) in pairs {
            match key {
                "author" => {
                    let id = value
                        .parse()
                        .map_err(|_| TypeError::new("Invalid author id"))?;
                    filter.authors.push(id);
                }
                "tags" => filter.tags.push(value.to_string()),
                "is_favorited" => filter.is_favorited = Some(parse_flag(value)?),
                "is_in_shopping_cart" => filter.is_in_shopping_cart = Some(parse_flag(value)?),
                _ => {}
            }
        }

        Ok(filter)
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
            && self.tags.is_empty()
            && self.is_favorited.is_none()
            && self.is_in_shopping_cart.is_none()
    }
}

fn parse_flag(value: &str) -> Result<bool, TypeError> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(TypeError::new("Invalid boolean flag")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_kind_parses_known_variants() {
        assert_eq!(
            ListKind::try_from(json!("favorite")).unwrap(),
            ListKind::Favorite
        );
        assert_eq!(
            ListKind::try_from(json!("shopping_cart")).unwrap(),
            ListKind::ShoppingCart
        );
        assert!(ListKind::try_from(json!("wishlist")).is_err());
        assert!(ListKind::try_from(json!(3)).is_err());
    }

    #[test]
    fn filter_accumulates_repeated_parameters() {
        let filter = RecipeFilter::from_pairs([
            ("author", "1"),
            ("author", "7"),
            ("tags", "breakfast"),
            ("tags", "vegan"),
            ("is_favorited", "1"),
            ("page", "2"),
        ])
        .unwrap();

        assert_eq!(filter.authors, vec![1, 7]);
        assert_eq!(filter.tags, vec!["breakfast", "vegan"]);
        assert_eq!(filter.is_favorited, Some(true));
        assert_eq!(filter.is_in_shopping_cart, None);
    }

    #[test]
    fn filter_rejects_malformed_values() {
        assert!(RecipeFilter::from_pairs([("author", "seven")]).is_err());
        assert!(RecipeFilter::from_pairs([("is_favorited", "yes")]).is_err());
    }

    #[test]
    fn empty_filter_is_empty() {
        assert!(RecipeFilter::from_pairs([]).unwrap().is_empty());
        assert!(!RecipeFilter::from_pairs([("tags", "vegan")])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn profile_strips_password() {
        let user = User {
            id: 1,
            email: String::from("a@b.c"),
            username: String::from("ann"),
            first_name: String::from("Ann"),
            last_name: String::from("Lee"),
            password: String::from("secret-hash"),
            role: UserRole::User,
        };

        let profile = Profile::from_user(&user, true);
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["is_subscribed"], json!(true));
    }
}
