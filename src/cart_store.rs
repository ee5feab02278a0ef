//! In-memory cart state, one cart per authenticated user.
//!
//! Carts live only for the lifetime of the process (a restart empties them),
//! matching their role as staging state: nothing is written to the database
//! until checkout.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::domain::cart::{Cart, CartProduct};

#[derive(Debug, Default)]
pub struct CartStore {
    carts: Mutex<HashMap<Uuid, Cart>>,
}

impl CartStore {
    pub fn add(&self, user_id: Uuid, product: CartProduct) -> Cart {
        let mut carts = self.lock();
        let cart = carts.entry(user_id).or_default();
        cart.add(product);
        cart.clone()
    }

    pub fn update_quantity(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> Cart {
        let mut carts = self.lock();
        let cart = carts.entry(user_id).or_default();
        cart.update_quantity(product_id, quantity);
        cart.clone()
    }

    /// Current cart contents; an empty cart for users who have none yet.
    pub fn snapshot(&self, user_id: Uuid) -> Cart {
        self.lock().get(&user_id).cloned().unwrap_or_default()
    }

    /// Drop the user's cart, e.g. after a successful checkout.
    pub fn clear(&self, user_id: Uuid) {
        self.lock().remove(&user_id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Cart>> {
        self.carts.lock().expect("cart store mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;

    fn product(stock: i32) -> CartProduct {
        CartProduct {
            id: Uuid::new_v4(),
            name: "Fabric Softener".to_string(),
            unit_price: BigDecimal::from_str("7.25").expect("valid decimal"),
            stock_quantity: stock,
        }
    }

    #[test]
    fn carts_are_isolated_per_user() {
        let store = CartStore::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.add(alice, product(5));

        assert_eq!(store.snapshot(alice).len(), 1);
        assert!(store.snapshot(bob).is_empty());
    }

    #[test]
    fn clear_drops_the_cart() {
        let store = CartStore::default();
        let user = Uuid::new_v4();
        store.add(user, product(5));

        store.clear(user);

        assert!(store.snapshot(user).is_empty());
    }

    #[test]
    fn snapshot_is_a_copy_not_a_handle() {
        let store = CartStore::default();
        let user = Uuid::new_v4();
        let p = product(5);
        let id = p.id;
        store.add(user, p);

        let mut snapshot = store.snapshot(user);
        snapshot.update_quantity(id, 0);

        assert_eq!(store.snapshot(user).len(), 1);
    }
}
