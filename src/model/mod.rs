//! # Order Data Model
//!
//! Records returned by the API and the typed request bodies accepted by it.
//!
//! Wire names follow the public JSON contract (`orderID`, `lineItemID`, ...),
//! so every field carries an explicit rename rather than a blanket
//! `rename_all`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer order with its line items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "orderID")]
    pub order_id: u64,

    #[serde(rename = "customerName")]
    pub customer_name: String,

    #[serde(rename = "orderedAt")]
    pub ordered_at: DateTime<Utc>,

    #[serde(default)]
    pub items: Vec<Item>,
}

/// A line item owned by exactly one order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "lineItemID")]
    pub line_item_id: u64,

    #[serde(rename = "itemCode")]
    pub item_code: String,

    pub description: String,

    pub quantity: u64,

    #[serde(rename = "orderID")]
    pub order_id: u64,
}

/// Body of a create or update request.
///
/// Server-assigned identifiers (`orderID` on the order, `orderID` on items)
/// are not part of the schema and are ignored if a client sends them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderRequest {
    #[serde(rename = "customerName")]
    pub customer_name: String,

    #[serde(rename = "orderedAt")]
    pub ordered_at: DateTime<Utc>,

    #[serde(default)]
    pub items: Vec<ItemRequest>,
}

/// A line item inside an [`OrderRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemRequest {
    /// Only meaningful for updates, where it selects the row to change.
    /// Zero never matches a stored item.
    #[serde(rename = "lineItemID", default)]
    pub line_item_id: u64,

    #[serde(rename = "itemCode")]
    pub item_code: String,

    pub description: String,

    pub quantity: u64,
}

/// Largest quantity the store can hold (`BIGINT`)
pub const MAX_QUANTITY: u64 = i64::MAX as u64;

impl OrderRequest {
    /// Checks that need more than the JSON types to express.
    ///
    /// Returns the message for a 400 response.
    pub fn validate(&self) -> Result<(), String> {
        match self.items.iter().find(|item| item.quantity > MAX_QUANTITY) {
            Some(item) => Err(format!(
                "quantity {} of item {:?} exceeds {}",
                item.quantity, item.item_code, MAX_QUANTITY
            )),
            None => Ok(()),
        }
    }

    /// Build the order this request describes under the given identifier.
    ///
    /// Items keep whatever `lineItemID` the client sent; create overwrites
    /// them with generated ids.
    pub fn into_order(self, order_id: u64) -> Order {
        Order {
            order_id,
            customer_name: self.customer_name,
            ordered_at: self.ordered_at,
            items: self
                .items
                .into_iter()
                .map(|item| item.into_item(order_id))
                .collect(),
        }
    }
}

impl ItemRequest {
    pub fn into_item(self, order_id: u64) -> Item {
        Item {
            line_item_id: self.line_item_id,
            item_code: self.item_code,
            description: self.description,
            quantity: self.quantity,
            order_id,
        }
    }
}

/// Attach items to their owning orders.
///
/// Items are grouped by `order_id` and appended in the order given; orders
/// with no matching items end up with an empty list. Items whose owner is not
/// in `orders` are discarded.
pub fn attach_items(orders: &mut [Order], items: Vec<Item>) {
    let mut grouped: BTreeMap<u64, Vec<Item>> = BTreeMap::new();
    for item in items {
        grouped.entry(item.order_id).or_default().push(item);
    }

    for order in orders.iter_mut() {
        order.items = grouped.remove(&order.order_id).unwrap_or_default();
    }
}
