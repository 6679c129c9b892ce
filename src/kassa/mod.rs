//! Point-of-sale ("Kassa") state.

pub mod cart;
pub mod input;

pub use cart::{Cart, CartError, CartItem, ScanOutcome};
pub use input::{EditField, InputAction, InputState, InputTarget, LookupOutcome, NumpadKey};

use chrono::{DateTime, Utc};

use crate::config::KassaConfig;
use crate::models::permission::KASSE;
use crate::models::{AccessRights, CheckoutSession, Order};

/// Payloads sent when the cashier completes a sale.
#[derive(Debug, Clone)]
pub struct Checkout {
    pub order: Order,
    pub session: CheckoutSession,
    /// `kassa/checkout` already accepted this order; only the payment
    /// session is still missing.
    pub order_recorded: bool,
}

impl Checkout {
    /// Same lines, quantities and total, ignoring the timestamp.
    fn same_sale(&self, other: &Checkout) -> bool {
        self.session == other.session
            && self.order.product_names == other.order.product_names
            && self.order.total_price == other.order.total_price
    }
}

/// Cart plus input state of the kassa screen.
#[derive(Debug, Clone, Default)]
pub struct KassaSession {
    pub cart: Cart,
    pub input: InputState,
    pub show_numpad: bool,
    /// Checkout sent to the backend and not answered yet.
    in_flight: Option<Checkout>,
    /// Order stored by the backend whose payment session failed.
    recorded: Option<Checkout>,
}

impl KassaSession {
    pub fn new(config: &KassaConfig) -> Self {
        Self {
            cart: Cart::new(config.group_items),
            input: InputState::default(),
            show_numpad: config.show_numpad,
            in_flight: None,
            recorded: None,
        }
    }

    pub fn can_access(rights: &AccessRights) -> bool {
        rights.allows(KASSE)
    }

    /// The cart is frozen while a checkout is in flight.
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn press(&mut self, key: NumpadKey) -> InputAction {
        if self.is_pending() {
            return InputAction::None;
        }
        self.input.press(key, &mut self.cart)
    }

    pub fn apply_lookup(&mut self, outcome: LookupOutcome) {
        if self.is_pending() {
            self.input.set_error(CartError::CheckoutPending.to_string());
            return;
        }
        self.input.apply_lookup(outcome, &mut self.cart);
    }

    /// Build the sale record and payment session for the current cart.
    pub fn checkout(&self, employee_id: Option<i32>, now: DateTime<Utc>) -> Result<Checkout, CartError> {
        let products = self.cart.checkout_products();
        if products.is_empty() {
            return Err(CartError::Empty);
        }
        Ok(Checkout {
            order: self.cart.order(employee_id, now),
            session: CheckoutSession { products },
            order_recorded: false,
        })
    }

    /// Start a checkout and freeze the cart until it is answered.
    ///
    /// When the backend already recorded the order for an unchanged cart,
    /// the returned checkout only needs a payment session.
    pub fn begin_checkout(&mut self, employee_id: Option<i32>, now: DateTime<Utc>) -> Result<Checkout, CartError> {
        if self.is_pending() {
            return Err(CartError::CheckoutPending);
        }
        let fresh = self.checkout(employee_id, now)?;
        let checkout = match self.recorded.take() {
            Some(recorded) if recorded.same_sale(&fresh) => recorded,
            _ => fresh,
        };
        self.input.cancel_edit();
        self.in_flight = Some(checkout.clone());
        Ok(checkout)
    }

    /// `kassa/checkout` accepted the in-flight order.
    pub fn sale_recorded(&mut self) {
        if let Some(checkout) = &mut self.in_flight {
            checkout.order_recorded = true;
        }
    }

    /// Unfreeze the cart after a failed checkout, remembering a recorded order.
    pub fn checkout_failed(&mut self, message: impl Into<String>) {
        if let Some(checkout) = self.in_flight.take()
            && checkout.order_recorded
        {
            self.recorded = Some(checkout);
        }
        self.input.set_error(message);
    }

    /// Clear the cart once the backend has accepted the sale.
    pub fn finish_checkout(&mut self) {
        self.cart.clear();
        self.input.reset();
        self.in_flight = None;
        self.recorded = None;
    }
}

#[cfg(test)]
mod tests {
    use super::cart::tests::product;
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_access() {
        assert!(KassaSession::can_access(&AccessRights::new(["kasse"])));
        assert!(KassaSession::can_access(&AccessRights::new(["admin"])));
        assert!(!KassaSession::can_access(&AccessRights::new(["product.read"])));
    }

    #[test]
    fn test_checkout_requires_items() {
        let session = KassaSession::default();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        assert_eq!(session.checkout(Some(1), now).unwrap_err(), CartError::Empty);
    }

    #[test]
    fn test_checkout_and_finish() {
        let mut session = KassaSession::new(&KassaConfig::default());
        session.cart.add_product(&product("1", "Brot", 2.5));
        session.cart.set_quantity(0, "2").unwrap();
        session.input.select(Some(0));

        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let checkout = session.checkout(Some(1001), now).unwrap();
        assert_eq!(checkout.order.total_price, 5.0);
        assert_eq!(checkout.session.products[0].quantity, 2);
        assert_eq!(session.cart.len(), 1);

        session.finish_checkout();
        assert!(session.cart.is_empty());
        assert_eq!(session.input.selected(), None);
    }

    #[test]
    fn test_press_goes_through_cart() {
        let mut session = KassaSession::default();
        session.press(NumpadKey::Digit(4));
        session.press(NumpadKey::Digit(2));
        assert_eq!(session.press(NumpadKey::Enter), InputAction::LookupEan("42".into()));

        session.apply_lookup(LookupOutcome::Found(product("42", "Apfel", 0.5)));
        assert_eq!(session.cart.len(), 1);
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_cart_is_frozen_during_checkout() {
        let mut session = KassaSession::default();
        session.cart.add_product(&product("1", "Brot", 2.5));
        let checkout = session.begin_checkout(Some(1), now()).unwrap();
        assert_eq!(checkout.order.product_names, vec!["Brot".to_string()]);
        assert!(session.is_pending());

        session.press(NumpadKey::Digit(7));
        assert_eq!(session.press(NumpadKey::Enter), InputAction::None);
        session.apply_lookup(LookupOutcome::Found(product("7", "Milch", 1.0)));
        assert_eq!(session.cart.len(), 1);
        assert_eq!(session.begin_checkout(Some(1), now()).unwrap_err(), CartError::CheckoutPending);

        session.finish_checkout();
        assert!(session.cart.is_empty());
        assert!(!session.is_pending());
    }

    #[test]
    fn test_retry_after_recorded_sale_skips_order() {
        let mut session = KassaSession::default();
        session.cart.add_product(&product("1", "Brot", 2.5));

        let first = session.begin_checkout(Some(1), now()).unwrap();
        assert!(!first.order_recorded);
        session.sale_recorded();
        session.checkout_failed("Zahlung fehlgeschlagen");
        assert!(!session.is_pending());
        assert_eq!(session.cart.len(), 1);
        assert_eq!(session.input.error(), Some("Zahlung fehlgeschlagen"));

        let retry = session.begin_checkout(Some(1), now() + chrono::Duration::minutes(1)).unwrap();
        assert!(retry.order_recorded);
        assert_eq!(retry.order.date, first.order.date);
    }

    #[test]
    fn test_changed_cart_records_new_order() {
        let mut session = KassaSession::default();
        session.cart.add_product(&product("1", "Brot", 2.5));
        session.begin_checkout(Some(1), now()).unwrap();
        session.sale_recorded();
        session.checkout_failed("Zahlung fehlgeschlagen");

        session.cart.set_quantity(0, "2").unwrap();
        let retry = session.begin_checkout(Some(1), now()).unwrap();
        assert!(!retry.order_recorded);
        assert_eq!(retry.order.total_price, 5.0);
    }

    #[test]
    fn test_failure_before_recording_forgets_order() {
        let mut session = KassaSession::default();
        session.cart.add_product(&product("1", "Brot", 2.5));
        session.begin_checkout(Some(1), now()).unwrap();
        session.checkout_failed("Server nicht erreichbar");

        assert!(!session.begin_checkout(Some(1), now()).unwrap().order_recorded);
    }
}
