//! Pure cart arithmetic. Carts hold product snapshots taken at add time and
//! are never persisted; checkout turns the current lines into order rows.

use bigdecimal::BigDecimal;
use uuid::Uuid;

/// Snapshot of a product at the moment it entered the cart. Price and stock
/// are frozen here; a concurrent catalog edit does not retroactively change
/// a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartProduct {
    pub id: Uuid,
    pub name: String,
    pub unit_price: BigDecimal,
    pub stock_quantity: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: CartProduct,
    pub quantity: i32,
}

impl CartLine {
    pub fn line_total(&self) -> BigDecimal {
        &self.product.unit_price * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Add one unit of `product`. An existing line is incremented but
    /// silently clamped to the product's stock level; a new line starts at
    /// quantity 1. An out-of-stock product never creates a line, so the
    /// quantity-bounded-by-stock invariant holds at add time.
    pub fn add(&mut self, product: CartProduct) {
        if product.stock_quantity < 1 {
            return;
        }
        match self.lines.iter_mut().find(|l| l.product.id == product.id) {
            Some(line) => {
                line.quantity = (line.quantity + 1).min(product.stock_quantity);
            }
            None => self.lines.push(CartLine {
                product,
                quantity: 1,
            }),
        }
    }

    /// Set a line's quantity directly. Zero removes the line; an unknown
    /// product id is a no-op.
    ///
    /// Unlike [`Cart::add`], no stock clamp is applied here, so a caller can
    /// push a line above `stock_quantity`; the store of record owns the real
    /// inventory constraint.
    pub fn update_quantity(&mut self, product_id: Uuid, quantity: i32) {
        if quantity == 0 {
            self.lines.retain(|l| l.product.id != product_id);
        } else if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product_id) {
            line.quantity = quantity;
        }
    }

    /// Sum of `price * quantity` over all lines.
    pub fn total_amount(&self) -> BigDecimal {
        self.lines
            .iter()
            .fold(BigDecimal::from(0), |acc, line| acc + line.line_total())
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn product(price: &str, stock: i32) -> CartProduct {
        CartProduct {
            id: Uuid::new_v4(),
            name: "Eco Detergent".to_string(),
            unit_price: BigDecimal::from_str(price).expect("valid decimal"),
            stock_quantity: stock,
        }
    }

    #[test]
    fn add_appends_new_line_with_quantity_one() {
        let mut cart = Cart::default();
        cart.add(product("9.99", 5));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn add_increments_existing_line() {
        let mut cart = Cart::default();
        let p = product("9.99", 5);
        cart.add(p.clone());
        cart.add(p);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn add_clamps_to_stock_without_error() {
        let mut cart = Cart::default();
        let p = product("3.50", 2);
        cart.add(p.clone());
        cart.add(p.clone());
        cart.add(p);

        assert_eq!(cart.lines()[0].quantity, 2, "third add must clamp to stock");
    }

    #[test]
    fn add_out_of_stock_product_creates_no_line() {
        let mut cart = Cart::default();
        cart.add(product("9.99", 0));

        assert!(cart.is_empty());
        assert_eq!(cart.total_amount(), BigDecimal::from(0));
    }

    #[test]
    fn update_quantity_zero_removes_the_line() {
        let mut cart = Cart::default();
        let p = product("4.00", 10);
        let id = p.id;
        cart.add(p);
        cart.add(product("2.00", 10));

        cart.update_quantity(id, 0);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_amount(), BigDecimal::from_str("2.00").unwrap());
    }

    #[test]
    fn update_quantity_sets_directly_and_can_exceed_stock() {
        // Documents the observed asymmetry with add(): no clamp is applied
        // on direct quantity updates.
        let mut cart = Cart::default();
        let p = product("1.00", 3);
        let id = p.id;
        cart.add(p);

        cart.update_quantity(id, 7);

        assert_eq!(cart.lines()[0].quantity, 7);
        assert!(cart.lines()[0].quantity > cart.lines()[0].product.stock_quantity);
    }

    #[test]
    fn update_quantity_unknown_product_is_a_noop() {
        let mut cart = Cart::default();
        cart.add(product("1.00", 3));

        cart.update_quantity(Uuid::new_v4(), 4);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn total_amount_is_sum_of_price_times_quantity() {
        let mut cart = Cart::default();
        let a = product("9.99", 10);
        let a_id = a.id;
        cart.add(a);
        cart.update_quantity(a_id, 3); // 29.97
        cart.add(product("5.50", 10)); // 5.50

        assert_eq!(
            cart.total_amount(),
            BigDecimal::from_str("35.47").expect("valid decimal")
        );
    }

    #[test]
    fn empty_cart_total_is_zero() {
        assert_eq!(Cart::default().total_amount(), BigDecimal::from(0));
    }
}
