//! Shopping cart and checkout

use crate::content::edit::new_id;
use crate::content::types::{Collectable, OrderItem, OrderStatus, ShopOrder};
use crate::content::store::SHOP_ORDERS;
use crate::content::ContentStore;
use crate::error::{Error, Result};
use serde::Deserialize;

/// Upper bound on a single line, guards the total against overflow
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Cart lines keyed by collectable id
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<OrderItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of `collectable`, merging with an existing line.
    ///
    /// Only an explicit out-of-stock flag rejects the item.
    pub fn add(&mut self, collectable: &Collectable, quantity: u32) -> Result<()> {
        if !collectable.is_purchasable() {
            return Err(Error::OutOfStock(collectable.name.clone()));
        }
        if quantity == 0 {
            return Err(Error::Validation("quantity must be at least 1".to_string()));
        }

        let mut lines = self.lines.clone();
        match lines
            .iter_mut()
            .find(|line| line.collectable.id == collectable.id)
        {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity).min(MAX_LINE_QUANTITY);
                line.collectable = collectable.clone();
            }
            None => lines.push(OrderItem {
                collectable: collectable.clone(),
                quantity: quantity.min(MAX_LINE_QUANTITY),
            }),
        }
        sum_lines(&lines)?;
        self.lines = lines;
        Ok(())
    }

    /// Drop the line for `collectable_id`
    pub fn remove(&mut self, collectable_id: &str) {
        self.lines.retain(|line| line.collectable.id != collectable_id);
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of `price * quantity` over all lines
    pub fn total(&self) -> Result<u64> {
        sum_lines(&self.lines)
    }

    /// Turn the cart into a pending order
    pub fn checkout(self, customer_name: &str, email: &str) -> Result<ShopOrder> {
        if self.is_empty() {
            return Err(Error::Validation("cart is empty".to_string()));
        }
        let customer_name = customer_name.trim();
        let email = email.trim();
        if customer_name.is_empty() || !email.contains('@') {
            return Err(Error::Validation(
                "customer name and a valid email are required".to_string(),
            ));
        }

        let total_amount = self.total()?;
        Ok(ShopOrder {
            id: new_id("ord"),
            customer_name: customer_name.to_string(),
            email: email.to_string(),
            items: self.lines,
            total_amount,
            created_at: chrono::Utc::now(),
            status: OrderStatus::Pending,
        })
    }
}

fn sum_lines(lines: &[OrderItem]) -> Result<u64> {
    lines.iter().try_fold(0u64, |acc, line| {
        line.line_total()
            .and_then(|total| acc.checked_add(total))
            .ok_or_else(|| Error::Validation("order total is too large".to_string()))
    })
}

/// Checkout request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub email: String,
    pub items: Vec<CheckoutLine>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub collectable_id: String,
    pub quantity: u32,
}

/// Resolve the request against the catalogue, build the order and append
/// it to the order log
pub fn place_order(store: &ContentStore, request: CheckoutRequest) -> Result<ShopOrder> {
    let mut cart = Cart::new();
    for line in &request.items {
        let collectable = store
            .collectable(&line.collectable_id)
            .ok_or_else(|| Error::NotFound(format!("collectable '{}'", line.collectable_id)))?;
        cart.add(&collectable, line.quantity)?;
    }

    let order = cart.checkout(&request.customer_name, &request.email)?;
    if !store.save_shop_order(order.clone()) {
        return Err(Error::Storage("failed to record order".to_string()));
    }
    tracing::info!(
        "Order {} placed: {} items, total {}",
        order.id,
        order.items.len(),
        order.total_amount
    );
    Ok(order)
}

/// Mark an order fulfilled by replacing its whole record
pub fn fulfill_order(store: &ContentStore, id: &str) -> Result<ShopOrder> {
    let order = store.update_records(&SHOP_ORDERS, |orders| {
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| Error::NotFound(format!("order '{}'", id)))?;
        order.status = OrderStatus::Fulfilled;
        Ok(order.clone())
    })?;
    tracing::info!("Order {} fulfilled", order.id);
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::content::defaults;
    use std::sync::Arc;

    fn collectable(id: &str, price: u64, in_stock: Option<bool>) -> Collectable {
        Collectable {
            id: id.to_string(),
            name: format!("Item {}", id),
            price,
            category: "Gifts".to_string(),
            image: String::new(),
            description: String::new(),
            in_stock,
        }
    }

    #[test]
    fn test_stock_flag_is_the_only_rejection() {
        let mut cart = Cart::new();
        assert!(cart.add(&collectable("a", 100, None), 1).is_ok());
        assert!(cart.add(&collectable("b", 100, Some(true)), 1).is_ok());

        let err = cart.add(&collectable("c", 100, Some(false)), 1).unwrap_err();
        assert!(matches!(err, Error::OutOfStock(_)));
        assert_eq!(cart.items().len(), 2);
    }

    #[test]
    fn test_add_merges_lines_and_totals() {
        let mut cart = Cart::new();
        let scarf = collectable("scarf", 6000, None);
        cart.add(&scarf, 1).unwrap();
        cart.add(&scarf, 2).unwrap();
        cart.add(&collectable("book", 4500, None), 1).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.total().unwrap(), 3 * 6000 + 4500);

        cart.remove("scarf");
        assert_eq!(cart.total().unwrap(), 4500);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut cart = Cart::new();
        assert!(cart.add(&collectable("a", 100, None), 0).is_err());
    }

    #[test]
    fn test_quantity_capped() {
        let mut cart = Cart::new();
        let item = collectable("a", 1, None);
        cart.add(&item, 80).unwrap();
        cart.add(&item, 80).unwrap();
        assert_eq!(cart.items()[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_oversized_total_rejected() {
        let mut cart = Cart::new();
        let relic = collectable("relic", u64::MAX / 2, None);
        let err = cart.add(&relic, 3).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(cart.is_empty());

        cart.add(&relic, 1).unwrap();
        assert!(cart.add(&collectable("gem", u64::MAX / 2 + 2, None), 1).is_err());
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total().unwrap(), u64::MAX / 2);
    }

    #[test]
    fn test_checkout_builds_pending_order() {
        let mut cart = Cart::new();
        cart.add(&collectable("a", 1200, None), 1).unwrap();
        let order = cart.checkout(" Ada ", "ada@example.org").unwrap();
        assert!(order.id.starts_with("ord-"));
        assert_eq!(order.customer_name, "Ada");
        assert_eq!(order.total_amount, 1200);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_checkout_validation() {
        assert!(Cart::new().checkout("Ada", "ada@example.org").is_err());

        let mut cart = Cart::new();
        cart.add(&collectable("a", 1, None), 1).unwrap();
        assert!(cart.clone().checkout("", "ada@example.org").is_err());
        assert!(cart.checkout("Ada", "not-an-email").is_err());
    }

    #[tokio::test]
    async fn test_place_and_fulfill_order() {
        let store = ContentStore::init(Arc::new(MemoryBlobStore::new())).await;
        let catalogue = defaults::collectables();

        let request = CheckoutRequest {
            customer_name: "Ada".to_string(),
            email: "ada@example.org".to_string(),
            items: vec![CheckoutLine {
                collectable_id: catalogue[0].id.clone(),
                quantity: 2,
            }],
        };
        let order = place_order(&store, request).unwrap();
        assert_eq!(order.total_amount, catalogue[0].price * 2);
        assert_eq!(store.shop_orders(), vec![order.clone()]);

        let fulfilled = fulfill_order(&store, &order.id).unwrap();
        assert_eq!(fulfilled.status, OrderStatus::Fulfilled);
        assert_eq!(store.shop_orders()[0].status, OrderStatus::Fulfilled);
        assert_eq!(store.shop_orders()[0].id, order.id);

        assert!(matches!(
            fulfill_order(&store, "ord-missing"),
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_place_order_rejects_out_of_stock_and_unknown() {
        let store = ContentStore::init(Arc::new(MemoryBlobStore::new())).await;
        let sold_out = defaults::collectables()
            .into_iter()
            .find(|c| c.in_stock == Some(false))
            .unwrap();

        let request = CheckoutRequest {
            customer_name: "Ada".to_string(),
            email: "ada@example.org".to_string(),
            items: vec![CheckoutLine {
                collectable_id: sold_out.id,
                quantity: 1,
            }],
        };
        assert!(matches!(
            place_order(&store, request),
            Err(Error::OutOfStock(_))
        ));

        let request = CheckoutRequest {
            customer_name: "Ada".to_string(),
            email: "ada@example.org".to_string(),
            items: vec![CheckoutLine {
                collectable_id: "col-999".to_string(),
                quantity: 1,
            }],
        };
        assert!(matches!(place_order(&store, request), Err(Error::NotFound(_))));
        assert!(store.shop_orders().is_empty());
    }

    #[tokio::test]
    async fn test_fulfilment_never_drops_concurrent_checkouts() {
        let store = ContentStore::init(Arc::new(MemoryBlobStore::new())).await;
        let request = |name: &str| CheckoutRequest {
            customer_name: name.to_string(),
            email: "ada@example.org".to_string(),
            items: vec![CheckoutLine {
                collectable_id: "col-1".to_string(),
                quantity: 1,
            }],
        };
        let first = place_order(&store, request("First")).unwrap();

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for _ in 0..300 {
                    fulfill_order(&store, &first.id).unwrap();
                }
            });
            for i in 0..300 {
                place_order(&store, request(&format!("Visitor {}", i))).unwrap();
            }
        });

        let orders = store.shop_orders();
        assert_eq!(orders.len(), 301);
        assert_eq!(orders.last().unwrap().id, first.id);
        assert_eq!(orders.last().unwrap().status, OrderStatus::Fulfilled);
    }
}
