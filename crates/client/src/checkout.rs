//! Checkout form, lifecycle and space write-back plan.

use std::collections::BTreeMap;

use thiserror::Error;

use lesson_shop_core::{
    CustomerName, CustomerNameError, Lesson, LessonId, OrderId, PhoneError, PhoneNumber,
};

use crate::api::ClientError;
use crate::cart::Cart;

/// Customer details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
}

/// Form validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("invalid name: {0}")]
    Name(#[from] CustomerNameError),
    #[error("invalid phone: {0}")]
    Phone(#[from] PhoneError),
}

impl CheckoutForm {
    /// Validate both fields.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails, name before phone.
    pub fn validate(&self) -> Result<(CustomerName, PhoneNumber), FormError> {
        let name = CustomerName::parse(&self.name)?;
        let phone = PhoneNumber::parse(&self.phone)?;
        Ok((name, phone))
    }

    /// Whether the checkout button may be enabled.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.phone.clear();
    }
}

/// Where a session is in the buying flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutPhase {
    /// Cart is empty.
    #[default]
    Browsing,
    /// Cart has at least one unit.
    CartBuilding,
    /// Order and space updates are in flight.
    CheckoutPending,
    /// Last checkout succeeded; cart and form are empty.
    Completed,
    /// Last checkout failed. The cart and form are as they were, so this
    /// is cart-building with an error to show.
    Failed,
}

impl CheckoutPhase {
    /// Whether the customer can edit the cart and submit it.
    #[must_use]
    pub const fn is_cart_building(self) -> bool {
        matches!(self, Self::CartBuilding | Self::Failed)
    }
}

/// Why a checkout did not complete.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    InvalidForm(#[from] FormError),

    #[error("cart is empty")]
    EmptyCart,

    #[error("order could not be placed: {0}")]
    OrderFailed(#[source] ClientError),

    /// The order exists but at least one lesson's spaces were not written.
    /// Every other update ran to completion; `source` is the first failure.
    #[error("order {order_id} was placed but {failed} lesson update(s) failed: {source}")]
    SpacesUpdateFailed {
        order_id: OrderId,
        failed: usize,
        #[source]
        source: ClientError,
    },
}

impl CheckoutError {
    /// Short message suitable for showing to the customer.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidForm(FormError::Name(_)) => "Please enter a name using letters only.",
            Self::InvalidForm(FormError::Phone(_)) => "Please enter a phone number using digits only.",
            Self::EmptyCart => "Your cart is empty.",
            Self::OrderFailed(_) | Self::SpacesUpdateFailed { .. } => {
                "Something went wrong placing your order, please try again."
            }
        }
    }
}

/// Outcome of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    /// The lessons as the server holds them after the space updates.
    pub lessons: Vec<Lesson>,
}

/// Final `spaces` to write back for every distinct lesson in the cart.
///
/// Counts come from `inventory`, the working copy already decremented by
/// the cart. Lessons missing from `inventory` fall back to the snapshot
/// taken when the last unit was added.
#[must_use]
pub fn final_spaces(cart: &Cart, inventory: &BTreeMap<LessonId, Lesson>) -> BTreeMap<LessonId, u32> {
    let mut out = BTreeMap::new();
    for item in cart.items() {
        let id = item.lesson_id();
        let spaces = inventory.get(&id).map_or(item.lesson.spaces, |l| l.spaces);
        out.insert(id, spaces);
    }
    out
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use lesson_shop_core::Price;

    use super::*;

    fn lesson(spaces: u32) -> Lesson {
        Lesson {
            id: LessonId::generate(),
            subject: "Math".to_owned(),
            location: "Hendon".to_owned(),
            price: Price::from_units(100),
            spaces,
            image: String::new(),
        }
    }

    fn form(name: &str, phone: &str) -> CheckoutForm {
        CheckoutForm {
            name: name.to_owned(),
            phone: phone.to_owned(),
        }
    }

    #[test]
    fn test_form_validation() {
        assert!(form("Ada Lovelace", "0123456789").is_valid());
        assert!(matches!(
            form("Ada 2", "0123").validate(),
            Err(FormError::Name(CustomerNameError::InvalidCharacters))
        ));
        assert!(matches!(
            form("Ada", "").validate(),
            Err(FormError::Phone(PhoneError::Empty))
        ));
        assert!(matches!(
            form("Ada", "+44 123").validate(),
            Err(FormError::Phone(PhoneError::InvalidCharacters))
        ));
    }

    #[test]
    fn test_form_clear() {
        let mut f = form("Ada", "123");
        f.clear();
        assert_eq!(f, CheckoutForm::default());
    }

    #[test]
    fn test_final_spaces_one_entry_per_lesson() {
        let mut cart = Cart::new();
        let mut math = lesson(5);
        let mut art = lesson(1);
        cart.add(&mut math);
        cart.add(&mut math);
        cart.add(&mut art);

        let inventory: BTreeMap<_, _> = [(math.id, math.clone()), (art.id, art.clone())].into();
        let plan = final_spaces(&cart, &inventory);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[&math.id], 3);
        assert_eq!(plan[&art.id], 0);
    }

    #[test]
    fn test_final_spaces_falls_back_to_snapshot() {
        let mut cart = Cart::new();
        let mut math = lesson(5);
        cart.add(&mut math);
        cart.add(&mut math);

        let plan = final_spaces(&cart, &BTreeMap::new());
        assert_eq!(plan[&math.id], 3);
    }

    #[test]
    fn test_user_message_asks_to_retry() {
        let err = CheckoutError::OrderFailed(ClientError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        });
        assert!(err.user_message().contains("try again"));
    }

    #[test]
    fn test_failed_phase_is_cart_building() {
        assert!(CheckoutPhase::CartBuilding.is_cart_building());
        assert!(CheckoutPhase::Failed.is_cart_building());
        assert!(!CheckoutPhase::CheckoutPending.is_cart_building());
        assert!(!CheckoutPhase::Browsing.is_cart_building());
        assert!(!CheckoutPhase::Completed.is_cart_building());
    }
}
