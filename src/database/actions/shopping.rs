use std::collections::HashMap;

use sqlx::{Pool, Postgres};

use crate::{
    error::{Error, QueryError},
    schema::{PurchaseItem, PurchaseRow, Uuid},
    SHOPPING_LIST_HEADER,
};

use super::get_user_by_id;

/// Every (ingredient, unit, amount) contribution from the recipes in the
/// user's shopping cart, one row per recipe-ingredient pair.
pub async fn list_purchase_rows(
    user_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<Vec<PurchaseRow>, Error> {
    let rows: Vec<PurchaseRow> = sqlx::query_as(
        "
        SELECT i.name AS name, i.unit AS unit, ri.amount AS amount
        FROM user_recipe_lists l
        INNER JOIN recipe_ingredients ri ON ri.recipe_id = l.recipe_id
        INNER JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE l.user_id = $1 AND l.kind = 'shopping_cart'
    ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(|e| QueryError::from(e))?;

    Ok(rows)
}

/// Groups contributions strictly by (name, unit) and sums amounts. The
/// same ingredient under different units stays in distinct groups; no
/// unit conversion happens here. Output is sorted by name, then unit.
pub fn merge_purchases(rows: Vec<PurchaseRow>) -> Vec<PurchaseItem> {
    let mut groups: HashMap<(String, String), i64> = HashMap::new();
    for row in rows {
        *groups.entry((row.name, row.unit)).or_insert(0) += row.amount as i64;
    }

    let mut items: Vec<PurchaseItem> = groups
        .into_iter()
        .map(|((name, unit), amount)| PurchaseItem { name, unit, amount })
        .collect();
    items.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.unit.cmp(&b.unit)));

    items
}

/// The consolidated shopping list for an authenticated user. An empty cart
/// yields an empty list, not an error; an unknown caller is rejected.
pub async fn aggregate_shopping_list(
    user_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<Vec<PurchaseItem>, Error> {
    if get_user_by_id(pool, user_id).await?.is_none() {
        return Err(Error::unauthorized("Authentication required"));
    }

    let rows = list_purchase_rows(user_id, pool).await?;
    Ok(merge_purchases(rows))
}

/// Renders the downloadable text artifact, one line per group.
pub fn render_shopping_list(items: &[PurchaseItem]) -> String {
    let mut body = String::from(SHOPPING_LIST_HEADER);
    for item in items {
        body.push_str(&format!(
            "\n- {} ({}) - {}",
            item.name, item.unit, item.amount
        ));
    }
    body
}
