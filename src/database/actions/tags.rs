use crate::{
    error::{Error, QueryError},
    schema::{Tag, Uuid},
};

use sqlx::{Pool, Postgres};

pub async fn list_tags(pool: &Pool<Postgres>) -> Result<Vec<Tag>, Error> {
    let list: Vec<Tag> = sqlx::query_as("SELECT * FROM tags ORDER BY name")
        .fetch_all(pool)
        .await
        .map_err(|e| QueryError::from(e))?;

    Ok(list)
}

pub async fn get_tag(id: Uuid, pool: &Pool<Postgres>) -> Result<Option<Tag>, Error> {
    let tag: Option<Tag> = sqlx::query_as("SELECT * FROM tags WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| QueryError::from(e))?;

    Ok(tag)
}

pub async fn find_tag(slug: &str, pool: &Pool<Postgres>) -> Result<Option<Uuid>, Error> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM tags WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
        .map_err(|e| QueryError::from(e))?;

    Ok(row.map(|tag| tag.0))
}

/// Import/admin path. Name, color and slug are each globally unique; the
/// (name, color) pair carries its own constraint as well.
pub async fn create_tag(
    name: &str,
    color: &str,
    slug: &str,
    pool: &Pool<Postgres>,
) -> Result<Uuid, Error> {
    if name.trim().is_empty() || slug.trim().is_empty() {
        return Err(Error::validation("Tag name and slug must not be empty"));
    }

    let row: Option<(Uuid,)> = sqlx::query_as(
        "INSERT INTO tags (name, color, slug) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING RETURNING id",
    )
    .bind(name)
    .bind(color)
    .bind(slug)
    .fetch_optional(pool)
    .await
    .map_err(|e| QueryError::from(e))?;

    match row {
        Some((id,)) => Ok(id),
        None => Err(Error::conflict("A tag with this name, color or slug already exists")),
    }
}
