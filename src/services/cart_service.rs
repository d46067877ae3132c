use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartLineView, CartSummary, CartView, UpdateQuantityRequest},
    entity::{
        Carts, Clothes, carts,
        carts::{CartLine, CartLines},
        clothes,
    },
    error::{AppError, AppResult},
    models::ClothingItem,
    state::AppState,
};

/// Return the user's cart with lines resolved against the catalog, creating
/// and persisting an empty cart on first read. Only a store failure errors.
pub async fn get_cart(state: &AppState, user_id: &str) -> AppResult<CartSummary> {
    let cart = match find_by_user(&state.orm, user_id).await? {
        Some(cart) => cart,
        None => create_empty(&state.orm, user_id).await?,
    };
    summarize(&state.orm, cart).await
}

/// Merge-add: an existing line for the same item has its quantity incremented,
/// otherwise a new line is appended.
pub async fn add_item(
    state: &AppState,
    user_id: &str,
    payload: AddToCartRequest,
) -> AppResult<CartSummary> {
    if payload.quantity < 1 {
        return Err(AppError::BadRequest("quantity must be at least 1".into()));
    }
    let item = Clothes::find_by_id(payload.clothes_id).one(&state.orm).await?;
    if item.is_none() {
        return Err(AppError::NotFound("clothing item not found".into()));
    }

    let txn = state.orm.begin().await?;
    let cart = match locked_cart(&txn, user_id).await? {
        Some(cart) => cart,
        None => create_empty(&txn, user_id).await?,
    };

    let mut lines = cart.items.0.clone();
    merge_add(&mut lines, payload.clothes_id, payload.quantity);
    let cart = write_lines(&txn, cart, lines).await?;
    txn.commit().await?;

    summarize(&state.orm, cart).await
}

/// Overwrite a line's quantity exactly. The cart and the line must both exist.
pub async fn set_quantity(
    state: &AppState,
    user_id: &str,
    clothes_id: Uuid,
    payload: UpdateQuantityRequest,
) -> AppResult<CartSummary> {
    if payload.quantity < 1 {
        return Err(AppError::BadRequest("quantity must be at least 1".into()));
    }

    let txn = state.orm.begin().await?;
    let cart = locked_cart(&txn, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("cart not found".into()))?;

    let mut lines = cart.items.0.clone();
    let line = lines
        .iter_mut()
        .find(|line| line.clothes_id == clothes_id)
        .ok_or_else(|| AppError::NotFound("item not found in cart".into()))?;
    line.quantity = payload.quantity;

    let cart = write_lines(&txn, cart, lines).await?;
    txn.commit().await?;

    summarize(&state.orm, cart).await
}

/// Remove a line. Removing an absent line is an idempotent success; a missing
/// cart is not.
pub async fn remove_item(
    state: &AppState,
    user_id: &str,
    clothes_id: Uuid,
) -> AppResult<CartSummary> {
    let txn = state.orm.begin().await?;
    let cart = locked_cart(&txn, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("cart not found".into()))?;

    let mut lines = cart.items.0.clone();
    lines.retain(|line| line.clothes_id != clothes_id);

    let cart = write_lines(&txn, cart, lines).await?;
    txn.commit().await?;

    summarize(&state.orm, cart).await
}

/// Empty the line list, creating the cart first when absent. Always succeeds.
pub async fn clear_cart(state: &AppState, user_id: &str) -> AppResult<CartSummary> {
    let txn = state.orm.begin().await?;
    let cart = match locked_cart(&txn, user_id).await? {
        Some(cart) => cart,
        None => create_empty(&txn, user_id).await?,
    };

    let cart = write_lines(&txn, cart, Vec::new()).await?;
    txn.commit().await?;

    summarize(&state.orm, cart).await
}

/// Increment the matching line or append a new one, keeping at most one line
/// per distinct clothes id.
pub fn merge_add(lines: &mut Vec<CartLine>, clothes_id: Uuid, quantity: i32) {
    if let Some(line) = lines.iter_mut().find(|line| line.clothes_id == clothes_id) {
        line.quantity += quantity;
    } else {
        lines.push(CartLine {
            clothes_id,
            quantity,
        });
    }
}

/// Derived totals over the current catalog prices. A line whose reference is
/// missing from `prices` (deleted item) counts its quantity but prices at 0.
pub fn compute_totals(lines: &[CartLine], prices: &HashMap<Uuid, i64>) -> (i64, i64) {
    let total_items = lines.iter().map(|line| i64::from(line.quantity)).sum();
    let total_price = lines
        .iter()
        .map(|line| {
            i64::from(line.quantity) * prices.get(&line.clothes_id).copied().unwrap_or(0)
        })
        .sum();
    (total_items, total_price)
}

async fn find_by_user<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
) -> Result<Option<carts::Model>, DbErr> {
    Carts::find()
        .filter(carts::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

/// Select the cart row `FOR UPDATE` so concurrent mutations for the same user
/// serialize on the row lock instead of losing increments.
async fn locked_cart(
    txn: &DatabaseTransaction,
    user_id: &str,
) -> Result<Option<carts::Model>, DbErr> {
    Carts::find()
        .filter(carts::Column::UserId.eq(user_id))
        .lock(LockType::Update)
        .one(txn)
        .await
}

async fn create_empty<C: ConnectionTrait>(conn: &C, user_id: &str) -> AppResult<carts::Model> {
    let insert = carts::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id.to_owned()),
        items: Set(CartLines::default()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(conn)
    .await;

    match insert {
        Ok(cart) => Ok(cart),
        // Lost a first-write race. The unique index on user_id guarantees a
        // winning row exists, so read it back instead of failing the request.
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            let cart = find_by_user(conn, user_id).await?;
            cart.ok_or_else(|| AppError::Db(err))
        }
        Err(err) => Err(err.into()),
    }
}

/// Persist the whole line list; there is no partial-field update contract.
async fn write_lines<C: ConnectionTrait>(
    conn: &C,
    cart: carts::Model,
    lines: Vec<CartLine>,
) -> AppResult<carts::Model> {
    let mut active: carts::ActiveModel = cart.into();
    active.items = Set(CartLines(lines));
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(conn).await?)
}

async fn summarize<C: ConnectionTrait>(conn: &C, cart: carts::Model) -> AppResult<CartSummary> {
    let ids: Vec<Uuid> = cart.items.0.iter().map(|line| line.clothes_id).collect();
    let resolved: HashMap<Uuid, ClothingItem> = if ids.is_empty() {
        HashMap::new()
    } else {
        Clothes::find()
            .filter(clothes::Column::Id.is_in(ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|model| (model.id, ClothingItem::from(model)))
            .collect()
    };

    let prices: HashMap<Uuid, i64> = resolved
        .iter()
        .map(|(id, item)| (*id, item.price))
        .collect();
    let (total_items, total_price) = compute_totals(&cart.items.0, &prices);

    let items = cart
        .items
        .0
        .iter()
        .map(|line| CartLineView {
            clothes_id: line.clothes_id,
            quantity: line.quantity,
            clothes: resolved.get(&line.clothes_id).cloned(),
        })
        .collect();

    Ok(CartSummary {
        cart: CartView {
            id: cart.id,
            user_id: cart.user_id,
            items,
            created_at: cart.created_at.with_timezone(&Utc),
            updated_at: cart.updated_at.with_timezone(&Utc),
        },
        total_price,
        total_items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(clothes_id: Uuid, quantity: i32) -> CartLine {
        CartLine {
            clothes_id,
            quantity,
        }
    }

    #[test]
    fn merge_add_increments_instead_of_duplicating() {
        let id = Uuid::new_v4();
        let mut lines = Vec::new();

        merge_add(&mut lines, id, 2);
        merge_add(&mut lines, id, 3);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
    }

    #[test]
    fn merge_add_appends_distinct_items_in_order() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut lines = Vec::new();

        merge_add(&mut lines, first, 1);
        merge_add(&mut lines, second, 2);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].clothes_id, first);
        assert_eq!(lines[1].clothes_id, second);
    }

    #[test]
    fn totals_follow_the_storefront_scenario() {
        // Item A costs 1000, item B costs 500.
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let prices = HashMap::from([(a, 1000), (b, 500)]);

        let mut lines = Vec::new();
        merge_add(&mut lines, a, 1);
        merge_add(&mut lines, b, 2);
        assert_eq!(compute_totals(&lines, &prices), (3, 2000));

        // SetQuantity(A, 3) overwrites, it does not increment.
        lines
            .iter_mut()
            .find(|l| l.clothes_id == a)
            .unwrap()
            .quantity = 3;
        assert_eq!(compute_totals(&lines, &prices), (5, 4000));

        lines.retain(|l| l.clothes_id != b);
        assert_eq!(compute_totals(&lines, &prices), (3, 3000));
    }

    #[test]
    fn dangling_reference_prices_at_zero() {
        let known = Uuid::new_v4();
        let deleted = Uuid::new_v4();
        let prices = HashMap::from([(known, 250)]);
        let lines = vec![line(known, 2), line(deleted, 4)];

        let (total_items, total_price) = compute_totals(&lines, &prices);
        assert_eq!(total_items, 6);
        assert_eq!(total_price, 500);
    }

    #[test]
    fn totals_of_empty_cart_are_zero() {
        assert_eq!(compute_totals(&[], &HashMap::new()), (0, 0));
    }

    #[test]
    fn totals_track_live_price_changes() {
        let id = Uuid::new_v4();
        let lines = vec![line(id, 2)];

        let before = HashMap::from([(id, 100)]);
        let after = HashMap::from([(id, 150)]);

        assert_eq!(compute_totals(&lines, &before).1, 200);
        // Same cart, new catalog price: the recomputed total moves with it.
        assert_eq!(compute_totals(&lines, &after).1, 300);
    }
}
