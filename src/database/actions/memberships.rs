use sqlx::{Pool, Postgres};

use crate::{
    error::{Error, QueryError},
    pagination::PageContext,
    schema::{ListKind, RecipeRow, RecipeRowPage, Uuid},
    RECIPE_COUNT_PER_PAGE,
};

use super::get_recipe;

/// Adds a recipe to one of the user's named lists and returns its short
/// representation. Repeated add is a client error, not a no-op: the unique
/// (user, recipe, kind) constraint decides races, and the losing writer
/// gets the conflict.
pub async fn add_to_list(
    user_id: Uuid,
    recipe_id: Uuid,
    kind: ListKind,
    pool: &Pool<Postgres>,
) -> Result<RecipeRow, Error> {
    let recipe = get_recipe(recipe_id, pool)
        .await?
        .ok_or_else(|| Error::not_found("No recipe exists with specified id"))?;

    let result = sqlx::query(
        "INSERT INTO user_recipe_lists (user_id, recipe_id, kind) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(recipe_id)
    .bind(kind)
    .execute(pool)
    .await
    .map_err(|e| QueryError::from(e))?;

    if result.rows_affected() == 0 {
        return Err(Error::Conflict(format!(
            "Recipe is already in {}",
            kind.describe()
        )));
    }

    Ok(RecipeRow::from(recipe))
}

/// Removes a membership row; removing an absent membership is a not-found
/// error and touches nothing else.
pub async fn remove_from_list(
    user_id: Uuid,
    recipe_id: Uuid,
    kind: ListKind,
    pool: &Pool<Postgres>,
) -> Result<(), Error> {
    let result = sqlx::query(
        "DELETE FROM user_recipe_lists WHERE user_id = $1 AND recipe_id = $2 AND kind = $3",
    )
    .bind(user_id)
    .bind(recipe_id)
    .bind(kind)
    .execute(pool)
    .await
    .map_err(|e| QueryError::from(e))?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!(
            "Recipe was not in {}",
            kind.describe()
        )));
    }

    Ok(())
}

/// Membership check used by recipe serialization; never mutates, and an
/// anonymous viewer is unconditionally outside every list.
pub async fn in_list(
    viewer: Option<Uuid>,
    recipe_id: Uuid,
    kind: ListKind,
    pool: &Pool<Postgres>,
) -> Result<bool, Error> {
    let user_id = match viewer {
        Some(user_id) => user_id,
        None => return Ok(false),
    };

    let row: Option<(Uuid,)> = sqlx::query_as(
        "SELECT recipe_id FROM user_recipe_lists WHERE user_id = $1 AND recipe_id = $2 AND kind = $3",
    )
    .bind(user_id)
    .bind(recipe_id)
    .bind(kind)
    .fetch_optional(pool)
    .await
    .map_err(|e| QueryError::from(e))?;

    Ok(row.is_some())
}

/// Paginated short representations of the user's list, newest membership
/// first.
pub async fn list_recipes_in(
    user_id: Uuid,
    kind: ListKind,
    offset: i64,
    pool: &Pool<Postgres>,
) -> Result<PageContext<RecipeRow>, Error> {
    let rows: Vec<RecipeRowPage> = sqlx::query_as(
        "
        SELECT r.id, r.author_id, r.name, r.image, r.cooking_time, COUNT(*) OVER() AS count
        FROM user_recipe_lists l
        INNER JOIN recipes r ON r.id = l.recipe_id
        WHERE l.user_id = $1 AND l.kind = $2
        ORDER BY l.id DESC
        LIMIT $3 OFFSET $4
    ",
    )
    .bind(user_id)
    .bind(kind)
    .bind(RECIPE_COUNT_PER_PAGE)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(|e| QueryError::from(e))?;

    let total_count = rows.first().map(|p| p.count).unwrap_or(0);
    let rows: Vec<RecipeRow> = rows.into_iter().map(RecipeRow::from).collect();

    Ok(PageContext::from_rows(
        rows,
        total_count,
        RECIPE_COUNT_PER_PAGE,
        offset,
    ))
}
