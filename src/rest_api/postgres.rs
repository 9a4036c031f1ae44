//! # Postgres Order Store
//!
//! [`OrderStore`] backed by the persistence gateway. Multi-statement writes
//! run inside one transaction; a failed statement rolls back everything the
//! request wrote before it.

use async_trait::async_trait;
use tokio_postgres::{types::ToSql, Row, Transaction};
use tracing::debug;

use crate::database::gateway::{to_column, to_signed, to_unsigned};
use crate::database::{Database, DatabaseResult};
use crate::model::{attach_items, Item, Order, OrderRequest};

use super::errors::RestResult;
use super::store::OrderStore;

const SELECT_ORDERS: &str = "
    SELECT order_id, customer_name, ordered_at
    FROM orders
    ORDER BY order_id ASC";

const SELECT_ORDER: &str = "
    SELECT order_id, customer_name, ordered_at
    FROM orders
    WHERE order_id = $1";

const SELECT_ITEMS_FOR_ORDERS: &str = "
    SELECT item_id, item_code, description, quantity, order_id
    FROM items
    WHERE order_id = ANY($1)
    ORDER BY order_id ASC, item_id ASC";

const SELECT_ITEMS_FOR_ORDER: &str = "
    SELECT item_id, item_code, description, quantity, order_id
    FROM items
    WHERE order_id = $1
    ORDER BY order_id ASC, item_id ASC";

const INSERT_ORDER: &str = "
    INSERT INTO orders (customer_name, ordered_at)
    VALUES ($1, $2)
    RETURNING order_id";

const INSERT_ITEM: &str = "
    INSERT INTO items (item_code, description, quantity, order_id)
    VALUES ($1, $2, $3, $4)
    RETURNING item_id";

const UPDATE_ORDER: &str = "
    UPDATE orders
    SET customer_name = $1, ordered_at = $2
    WHERE order_id = $3";

const UPDATE_ITEM: &str = "
    UPDATE items
    SET item_code = $1, description = $2, quantity = $3
    WHERE item_id = $4 AND order_id = $5";

const DELETE_ITEMS: &str = "DELETE FROM items WHERE order_id = $1";

const DELETE_ORDER: &str = "DELETE FROM orders WHERE order_id = $1";

/// Order store over PostgreSQL
#[derive(Clone)]
pub struct PostgresOrderStore {
    db: Database,
}

impl PostgresOrderStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn select_order(&self, order_id: i64) -> DatabaseResult<Option<Order>> {
        self.db
            .query_opt(SELECT_ORDER, &[&order_id])
            .await?
            .map(|row| order_from_row(&row))
            .transpose()
    }

    async fn select_items(&self, sql: &str, param: &(dyn ToSql + Sync)) -> DatabaseResult<Vec<Item>> {
        self.db
            .query(sql, &[param])
            .await?
            .iter()
            .map(item_from_row)
            .collect()
    }

    async fn insert_order(&self, request: OrderRequest) -> DatabaseResult<Order> {
        let mut conn = self.db.connection().await?;
        let tx = conn.transaction().await?;

        let row = tx
            .query_one(INSERT_ORDER, &[&request.customer_name, &request.ordered_at])
            .await?;
        let id: i64 = row.try_get("order_id")?;

        let mut order = request.into_order(to_unsigned("order_id", id)?);
        for item in order.items.iter_mut() {
            item.line_item_id = insert_item(&tx, item, id).await?;
        }

        tx.commit().await?;
        Ok(order)
    }

    async fn replace_order(&self, id: i64, order: &mut Order) -> DatabaseResult<()> {
        let mut conn = self.db.connection().await?;
        let tx = conn.transaction().await?;

        tx.execute(UPDATE_ORDER, &[&order.customer_name, &order.ordered_at, &id])
            .await?;

        let mut updated = Vec::with_capacity(order.items.len());
        for item in order.items.drain(..) {
            if update_item(&tx, &item, id).await? {
                updated.push(item);
            }
        }
        order.items = updated;

        tx.commit().await?;
        Ok(())
    }

    /// Returns the number of items removed with the order
    async fn remove_order(&self, id: i64) -> DatabaseResult<u64> {
        let mut conn = self.db.connection().await?;
        let tx = conn.transaction().await?;

        let items = tx.execute(DELETE_ITEMS, &[&id]).await?;
        tx.execute(DELETE_ORDER, &[&id]).await?;

        tx.commit().await?;
        Ok(items)
    }
}

fn order_from_row(row: &Row) -> DatabaseResult<Order> {
    Ok(Order {
        order_id: to_unsigned("order_id", row.try_get("order_id")?)?,
        customer_name: row.try_get("customer_name")?,
        ordered_at: row.try_get("ordered_at")?,
        items: vec![],
    })
}

fn item_from_row(row: &Row) -> DatabaseResult<Item> {
    Ok(Item {
        line_item_id: to_unsigned("item_id", row.try_get("item_id")?)?,
        item_code: row.try_get("item_code")?,
        description: row.try_get("description")?,
        quantity: to_unsigned("quantity", row.try_get("quantity")?)?,
        order_id: to_unsigned("order_id", row.try_get("order_id")?)?,
    })
}

async fn insert_item(tx: &Transaction<'_>, item: &Item, order_id: i64) -> DatabaseResult<u64> {
    let quantity = to_column("quantity", item.quantity)?;
    let row = tx
        .query_one(INSERT_ITEM, &[&item.item_code, &item.description, &quantity, &order_id])
        .await?;
    to_unsigned("item_id", row.try_get("item_id")?)
}

/// Returns whether a row of this order was updated
async fn update_item(tx: &Transaction<'_>, item: &Item, order_id: i64) -> DatabaseResult<bool> {
    let Some(item_id) = to_signed(item.line_item_id) else {
        return Ok(false);
    };
    let quantity = to_column("quantity", item.quantity)?;
    let affected = tx
        .execute(
            UPDATE_ITEM,
            &[&item.item_code, &item.description, &quantity, &item_id, &order_id],
        )
        .await?;
    Ok(affected > 0)
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn list_orders(&self) -> RestResult<Vec<Order>> {
        let mut orders = self
            .db
            .query(SELECT_ORDERS, &[])
            .await?
            .iter()
            .map(order_from_row)
            .collect::<DatabaseResult<Vec<_>>>()?;

        if orders.is_empty() {
            return Ok(orders);
        }

        let ids = orders
            .iter()
            .filter_map(|o| to_signed(o.order_id))
            .collect::<Vec<i64>>();
        let items = self.select_items(SELECT_ITEMS_FOR_ORDERS, &ids).await?;

        debug!(orders = orders.len(), items = items.len(), "listed orders");
        attach_items(&mut orders, items);
        Ok(orders)
    }

    async fn find_order(&self, order_id: u64) -> RestResult<Option<Order>> {
        let Some(id) = to_signed(order_id) else {
            return Ok(None);
        };
        let Some(mut order) = self.select_order(id).await? else {
            return Ok(None);
        };

        order.items = self.select_items(SELECT_ITEMS_FOR_ORDER, &id).await?;
        Ok(Some(order))
    }

    async fn create_order(&self, request: OrderRequest) -> RestResult<Order> {
        let order = self.insert_order(request).await?;
        debug!(order_id = order.order_id, items = order.items.len(), "created order");
        Ok(order)
    }

    async fn update_order(&self, order_id: u64, request: OrderRequest) -> RestResult<Option<Order>> {
        let Some(id) = to_signed(order_id) else {
            return Ok(None);
        };
        if self.select_order(id).await?.is_none() {
            return Ok(None);
        }

        let mut order = request.into_order(order_id);
        self.replace_order(id, &mut order).await?;
        debug!(order_id, items = order.items.len(), "updated order");
        Ok(Some(order))
    }

    async fn delete_order(&self, order_id: u64) -> RestResult<bool> {
        let Some(id) = to_signed(order_id) else {
            return Ok(false);
        };
        if self.select_order(id).await?.is_none() {
            return Ok(false);
        }

        let items = self.remove_order(id).await?;
        debug!(order_id, items, "deleted order");
        Ok(true)
    }
}
