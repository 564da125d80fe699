//! Cart Store

use appointime::{
    cart::{Cart, CartLine, CartTotals, LineKey},
    money::AmountError,
};
use rustc_hash::FxHashMap;

use crate::sessions::records::SessionUuid;

/// In-memory cart store, one cart per session.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStore {
    carts: FxHashMap<SessionUuid, Cart>,
}

impl MemoryCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_line(&self, session: SessionUuid, line_key: &LineKey) -> Option<&CartLine> {
        self.carts.get(&session)?.line(line_key)
    }

    /// Stores a line. A later write to the same key replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] when the cart's totals would no
    /// longer fit. The cart is left unchanged.
    pub fn put_line(
        &mut self,
        session: SessionUuid,
        line: CartLine,
    ) -> Result<Option<CartLine>, AmountError> {
        let cart = self.carts.entry(session).or_default();

        let mut updated = cart.clone();
        let replaced = updated.put_line(line);

        updated.totals()?;

        *cart = updated;

        Ok(replaced)
    }

    pub fn remove_line(&mut self, session: SessionUuid, line_key: &LineKey) -> Option<CartLine> {
        self.carts.get_mut(&session)?.remove_line(line_key)
    }

    /// The session's cart, empty when nothing was added yet.
    #[must_use]
    pub fn cart(&self, session: SessionUuid) -> Cart {
        self.carts.get(&session).cloned().unwrap_or_default()
    }

    pub fn recalc_totals(&self, session: SessionUuid) -> Result<CartTotals, AmountError> {
        self.carts
            .get(&session)
            .map_or_else(|| Cart::new().totals(), Cart::totals)
    }

    /// Drops the carts of ended sessions, returning how many existed.
    pub fn remove_carts(&mut self, sessions: &[SessionUuid]) -> usize {
        sessions
            .iter()
            .filter(|session| self.carts.remove(session).is_some())
            .count()
    }
}
