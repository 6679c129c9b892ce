//! Numpad and EAN field state machine.
//!
//! The kassa screen has one focused input at a time: the EAN field or the
//! quantity/discount/price cell of one cart line. Key presses from the
//! on-screen numpad and from the keyboard both go through [`InputState::press`].

use super::cart::{Cart, CartError, ScanOutcome};
use crate::models::Product;

/// Editable cell of a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Quantity,
    Discount,
    Price,
}

impl EditField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Quantity => "Menge",
            Self::Discount => "Rabatt",
            Self::Price => "Ist-Preis",
        }
    }
}

/// Where key presses go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputTarget {
    #[default]
    Ean,
    Edit(EditField, usize),
}

/// Numpad keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumpadKey {
    Digit(u8),
    Dot,
    Enter,
    /// "Löschen"
    Delete,
}

impl NumpadKey {
    /// Numpad layout, row by row.
    pub const LAYOUT: [[NumpadKey; 3]; 4] = [
        [Self::Digit(1), Self::Digit(2), Self::Digit(3)],
        [Self::Digit(4), Self::Digit(5), Self::Digit(6)],
        [Self::Digit(7), Self::Digit(8), Self::Digit(9)],
        [Self::Dot, Self::Digit(0), Self::Enter],
    ];

    pub fn label(self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::Dot => ".".to_string(),
            Self::Enter => "Enter".to_string(),
            Self::Delete => "Löschen".to_string(),
        }
    }
}

/// Side effect the caller has to perform after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    None,
    LookupEan(String),
}

/// Outcome of an EAN lookup started by [`InputAction::LookupEan`].
#[derive(Debug, Clone)]
pub enum LookupOutcome {
    Found(Product),
    NotFound,
    Failed,
}

pub const MSG_NOT_FOUND: &str = "Kein Produkt mit diesem EAN gefunden!";
pub const MSG_LOOKUP_FAILED: &str = "Fehler beim Laden des Produkts!";

#[derive(Debug, Clone, Default)]
pub struct InputState {
    target: InputTarget,
    /// EAN field text; bound directly to the text edit.
    pub ean: String,
    buffer: String,
    selected: Option<usize>,
    error: Option<String>,
}

impl InputState {
    pub fn target(&self) -> InputTarget {
        self.target
    }

    /// Pending text of the cell being edited.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.target, InputTarget::Edit(..))
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index;
    }

    /// Start editing a cell; the line becomes selected.
    pub fn begin_edit(&mut self, field: EditField, index: usize) {
        self.target = InputTarget::Edit(field, index);
        self.selected = Some(index);
        self.buffer.clear();
    }

    pub fn cancel_edit(&mut self) {
        self.target = InputTarget::Ean;
        self.buffer.clear();
    }

    /// Replace the edit buffer, used when typing into the cell directly.
    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    pub fn press(&mut self, key: NumpadKey, cart: &mut Cart) -> InputAction {
        match (key, self.target) {
            (NumpadKey::Digit(d), InputTarget::Ean) => {
                self.ean.push(digit_char(d));
                self.error = None;
                InputAction::None
            }
            (NumpadKey::Dot, InputTarget::Ean) => {
                self.error = Some(CartError::InvalidEan.to_string());
                InputAction::None
            }
            (NumpadKey::Digit(d), InputTarget::Edit(..)) => {
                self.buffer.push(digit_char(d));
                InputAction::None
            }
            (NumpadKey::Dot, InputTarget::Edit(..)) => {
                self.buffer.push('.');
                InputAction::None
            }
            (NumpadKey::Enter, InputTarget::Ean) => self.submit_ean(cart),
            (NumpadKey::Enter, InputTarget::Edit(field, index)) => {
                self.commit(field, index, cart);
                InputAction::None
            }
            (NumpadKey::Delete, _) => {
                self.delete(cart);
                InputAction::None
            }
        }
    }

    fn submit_ean(&mut self, cart: &mut Cart) -> InputAction {
        match cart.scan(&self.ean) {
            Err(e) => {
                self.error = Some(e.to_string());
                InputAction::None
            }
            Ok(outcome) => {
                self.ean.clear();
                self.error = None;
                match outcome {
                    ScanOutcome::Grouped(_) => InputAction::None,
                    ScanOutcome::NeedsLookup(ean) => InputAction::LookupEan(ean),
                }
            }
        }
    }

    fn commit(&mut self, field: EditField, index: usize, cart: &mut Cart) {
        let result = match field {
            EditField::Quantity => cart.set_quantity(index, &self.buffer),
            EditField::Discount => cart.set_discount(index, &self.buffer),
            EditField::Price => cart.set_price(index, &self.buffer),
        };
        self.error = result.err().map(|e| e.to_string());
        self.cancel_edit();
    }

    fn delete(&mut self, cart: &mut Cart) {
        if self.is_editing() {
            self.buffer.pop();
        } else if let Some(index) = self.selected.take() {
            if let Err(e) = cart.remove(index) {
                self.error = Some(e.to_string());
            }
        } else {
            self.ean.pop();
        }
    }

    /// Apply the result of an EAN lookup.
    pub fn apply_lookup(&mut self, outcome: LookupOutcome, cart: &mut Cart) {
        match outcome {
            LookupOutcome::Found(product) => {
                cart.add_product(&product);
                self.error = None;
            }
            LookupOutcome::NotFound => self.error = Some(MSG_NOT_FOUND.to_string()),
            LookupOutcome::Failed => self.error = Some(MSG_LOOKUP_FAILED.to_string()),
        }
    }

    /// Back to a blank EAN field with nothing selected.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn digit_char(d: u8) -> char {
    char::from(b'0' + d.min(9))
}

#[cfg(test)]
mod tests {
    use super::super::cart::tests::product;
    use super::*;

    fn type_digits(state: &mut InputState, cart: &mut Cart, digits: &str) {
        for c in digits.chars() {
            let d = c.to_digit(10).unwrap() as u8;
            assert_eq!(state.press(NumpadKey::Digit(d), cart), InputAction::None);
        }
    }

    #[test]
    fn test_ean_entry_requests_lookup() {
        let mut cart = Cart::default();
        let mut state = InputState::default();

        type_digits(&mut state, &mut cart, "4006");
        assert_eq!(state.ean, "4006");

        let action = state.press(NumpadKey::Enter, &mut cart);
        assert_eq!(action, InputAction::LookupEan("4006".into()));
        assert!(state.ean.is_empty());
    }

    #[test]
    fn test_dot_rejected_for_ean() {
        let mut cart = Cart::default();
        let mut state = InputState::default();
        type_digits(&mut state, &mut cart, "12");
        state.press(NumpadKey::Dot, &mut cart);

        assert_eq!(state.error(), Some("Nur Zahlen erlaubt!"));
        assert_eq!(state.ean, "12");
    }

    #[test]
    fn test_enter_on_empty_ean_sets_error() {
        let mut cart = Cart::default();
        let mut state = InputState::default();
        assert_eq!(state.press(NumpadKey::Enter, &mut cart), InputAction::None);
        assert_eq!(state.error(), Some("Nur Zahlen erlaubt!"));
    }

    #[test]
    fn test_grouped_scan_needs_no_lookup() {
        let mut cart = Cart::new(true);
        cart.add_product(&product("77", "Brot", 2.0));
        let mut state = InputState::default();

        type_digits(&mut state, &mut cart, "77");
        assert_eq!(state.press(NumpadKey::Enter, &mut cart), InputAction::None);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_edit_commit_returns_to_ean() {
        let mut cart = Cart::default();
        cart.add_product(&product("77", "Brot", 2.0));
        let mut state = InputState::default();

        state.begin_edit(EditField::Discount, 0);
        assert_eq!(state.target(), InputTarget::Edit(EditField::Discount, 0));
        assert_eq!(state.selected(), Some(0));

        type_digits(&mut state, &mut cart, "1");
        state.press(NumpadKey::Dot, &mut cart);
        type_digits(&mut state, &mut cart, "5");
        assert_eq!(state.buffer(), "1.5");

        state.press(NumpadKey::Enter, &mut cart);
        assert_eq!(cart.items()[0].discount_percent, 1.5);
        assert_eq!(state.target(), InputTarget::Ean);
        assert!(state.buffer().is_empty());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_invalid_commit_reports_error() {
        let mut cart = Cart::default();
        cart.add_product(&product("77", "Brot", 2.0));
        let mut state = InputState::default();

        state.begin_edit(EditField::Discount, 0);
        type_digits(&mut state, &mut cart, "150");
        state.press(NumpadKey::Enter, &mut cart);

        assert_eq!(cart.items()[0].discount_percent, 0.0);
        assert_eq!(state.error(), Some("Rabatt muss zwischen 0 und 100 liegen"));
        assert_eq!(state.target(), InputTarget::Ean);
    }

    #[test]
    fn test_cancel_edit() {
        let mut cart = Cart::default();
        cart.add_product(&product("77", "Brot", 2.0));
        let mut state = InputState::default();

        state.begin_edit(EditField::Quantity, 0);
        type_digits(&mut state, &mut cart, "9");
        state.cancel_edit();

        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(state.target(), InputTarget::Ean);
        assert!(state.buffer().is_empty());
    }

    #[test]
    fn test_delete_semantics() {
        let mut cart = Cart::default();
        cart.add_product(&product("1", "Brot", 2.0));
        cart.add_product(&product("2", "Milch", 1.0));
        let mut state = InputState::default();

        // Editing: trims the buffer.
        state.begin_edit(EditField::Price, 1);
        type_digits(&mut state, &mut cart, "12");
        state.press(NumpadKey::Delete, &mut cart);
        assert_eq!(state.buffer(), "1");
        state.cancel_edit();

        // Selected line: removes it.
        assert_eq!(state.selected(), Some(1));
        state.press(NumpadKey::Delete, &mut cart);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].name, "Brot");
        assert_eq!(state.selected(), None);

        // Otherwise: trims the EAN.
        type_digits(&mut state, &mut cart, "99");
        state.press(NumpadKey::Delete, &mut cart);
        assert_eq!(state.ean, "9");
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_lookup_outcomes() {
        let mut cart = Cart::default();
        let mut state = InputState::default();

        state.apply_lookup(LookupOutcome::NotFound, &mut cart);
        assert_eq!(state.error(), Some(MSG_NOT_FOUND));

        state.apply_lookup(LookupOutcome::Failed, &mut cart);
        assert_eq!(state.error(), Some(MSG_LOOKUP_FAILED));

        state.apply_lookup(LookupOutcome::Found(product("5", "Käse", 3.0)), &mut cart);
        assert!(state.error().is_none());
        assert_eq!(cart.items()[0].name, "Käse");
    }

    #[test]
    fn test_layout_matches_numpad() {
        let labels: Vec<String> = NumpadKey::LAYOUT.iter().flatten().map(|k| k.label()).collect();
        assert_eq!(labels, ["1", "2", "3", "4", "5", "6", "7", "8", "9", ".", "0", "Enter"]);
    }
}
