//! # Order Store
//!
//! The five order operations behind a trait, plus an in-memory
//! implementation with the same observable semantics as the Postgres one.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::model::{attach_items, Item, Order, OrderRequest};

use super::errors::{RestError, RestResult};

/// Store trait for order operations
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders ascending by identifier, each with its items
    async fn list_orders(&self) -> RestResult<Vec<Order>>;

    /// A single order with its items, or `None` if it does not exist
    async fn find_order(&self, order_id: u64) -> RestResult<Option<Order>>;

    /// Insert an order and its items, returning them with generated ids
    async fn create_order(&self, request: OrderRequest) -> RestResult<Order>;

    /// Replace an order's scalar fields and update the items it names.
    ///
    /// Only items that matched an existing row of this order are returned.
    /// `None` if the order does not exist.
    async fn update_order(&self, order_id: u64, request: OrderRequest) -> RestResult<Option<Order>>;

    /// Remove an order and its items. `false` if the order does not exist.
    async fn delete_order(&self, order_id: u64) -> RestResult<bool>;
}

/// In-memory order store for testing
pub struct InMemoryOrderStore {
    data: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    /// Orders by id; `items` is always empty here
    orders: BTreeMap<u64, Order>,
    /// Items by id
    items: BTreeMap<u64, Item>,
    next_order_id: u64,
    next_item_id: u64,
}

impl Tables {
    /// Items of the given orders, ascending by owner then id
    fn items_for(&self, order_ids: &[u64]) -> Vec<Item> {
        let mut items: Vec<Item> = self
            .items
            .values()
            .filter(|item| order_ids.contains(&item.order_id))
            .cloned()
            .collect();
        items.sort_by_key(|item| (item.order_id, item.line_item_id));
        items
    }
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(Tables {
                next_order_id: 1,
                next_item_id: 1,
                ..Default::default()
            }),
        }
    }

    fn lock_poisoned<T>(_: T) -> RestError {
        RestError::Internal("Lock poisoned".to_string())
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn list_orders(&self) -> RestResult<Vec<Order>> {
        let data = self.data.read().map_err(Self::lock_poisoned)?;

        let mut orders: Vec<Order> = data.orders.values().cloned().collect();
        let ids: Vec<u64> = orders.iter().map(|o| o.order_id).collect();
        attach_items(&mut orders, data.items_for(&ids));

        Ok(orders)
    }

    async fn find_order(&self, order_id: u64) -> RestResult<Option<Order>> {
        let data = self.data.read().map_err(Self::lock_poisoned)?;

        Ok(data.orders.get(&order_id).cloned().map(|mut order| {
            order.items = data.items_for(&[order_id]);
            order
        }))
    }

    async fn create_order(&self, request: OrderRequest) -> RestResult<Order> {
        let mut data = self.data.write().map_err(Self::lock_poisoned)?;

        let order_id = data.next_order_id;
        data.next_order_id += 1;

        let mut order = request.into_order(order_id);
        data.orders.insert(
            order_id,
            Order {
                items: vec![],
                ..order.clone()
            },
        );

        for item in order.items.iter_mut() {
            item.line_item_id = data.next_item_id;
            data.next_item_id += 1;
            data.items.insert(item.line_item_id, item.clone());
        }

        Ok(order)
    }

    async fn update_order(&self, order_id: u64, request: OrderRequest) -> RestResult<Option<Order>> {
        let mut data = self.data.write().map_err(Self::lock_poisoned)?;

        let Some(stored) = data.orders.get_mut(&order_id) else {
            return Ok(None);
        };
        stored.customer_name = request.customer_name.clone();
        stored.ordered_at = request.ordered_at;

        let mut order = request.into_order(order_id);
        order.items.retain(|item| match data.items.get_mut(&item.line_item_id) {
            Some(existing) if existing.order_id == order_id => {
                existing.item_code = item.item_code.clone();
                existing.description = item.description.clone();
                existing.quantity = item.quantity;
                true
            }
            _ => false,
        });

        Ok(Some(order))
    }

    async fn delete_order(&self, order_id: u64) -> RestResult<bool> {
        let mut data = self.data.write().map_err(Self::lock_poisoned)?;

        if !data.orders.contains_key(&order_id) {
            return Ok(false);
        }
        data.items.retain(|_, item| item.order_id != order_id);
        data.orders.remove(&order_id);

        Ok(true)
    }
}
