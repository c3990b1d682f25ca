use crate::{
    error::{Error, QueryError},
    schema::{Ingredient, Uuid},
};

use sqlx::{Pool, Postgres};

/// Ingredient search. An empty prefix lists everything; matching is
/// case-insensitive against the start of the name.
pub async fn list_ingredients(
    name_prefix: &str,
    pool: &Pool<Postgres>,
) -> Result<Vec<Ingredient>, Error> {
    let pattern = format!("{}%", escape_like(name_prefix));

    let list: Vec<Ingredient> =
        sqlx::query_as("SELECT * FROM ingredients WHERE name ILIKE $1 ORDER BY name")
            .bind(pattern)
            .fetch_all(pool)
            .await
            .map_err(|e| QueryError::from(e))?;

    Ok(list)
}

pub async fn get_ingredient(id: Uuid, pool: &Pool<Postgres>) -> Result<Option<Ingredient>, Error> {
    let ingredient: Option<Ingredient> = sqlx::query_as("SELECT * FROM ingredients WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| QueryError::from(e))?;

    Ok(ingredient)
}

/// Import/admin path; the (name, unit) pair is unique.
pub async fn create_ingredient(
    name: &str,
    unit: &str,
    pool: &Pool<Postgres>,
) -> Result<Uuid, Error> {
    if name.trim().is_empty() || unit.trim().is_empty() {
        return Err(Error::validation("Ingredient name and unit must not be empty"));
    }

    let row: Option<(Uuid,)> = sqlx::query_as(
        "INSERT INTO ingredients (name, unit) VALUES ($1, $2) ON CONFLICT DO NOTHING RETURNING id",
    )
    .bind(name)
    .bind(unit)
    .fetch_optional(pool)
    .await
    .map_err(|e| QueryError::from(e))?;

    match row {
        Some((id,)) => Ok(id),
        None => Err(Error::conflict("This ingredient already exists with this unit")),
    }
}

fn escape_like(value: &str) -> String {
    value.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100% rye"), "100\\% rye");
        assert_eq!(escape_like("salt_fine"), "salt\\_fine");
        assert_eq!(escape_like("plain"), "plain");
    }
}
