//! Cart

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    durations::{DurationBucket, FreeFormDuration},
    money::{AmountError, checked_add},
    products::{Product, ProductId},
    surcharge::{self, SurchargeError, SurchargeSelection, recompute_cart_total},
    table::DurationPriceTable,
};

/// Cart line key, unique within one cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineKey(String);

impl LineKey {
    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LineKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for LineKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single line in a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    key: LineKey,
    product: ProductId,
    base_price: Decimal,
    quantity: u32,
    appointment: bool,
    selection: SurchargeSelection,
}

impl CartLine {
    /// Creates a line for a regular product.
    pub fn standard(key: LineKey, product: ProductId, price: Decimal, quantity: u32) -> Self {
        Self {
            key,
            product,
            base_price: price,
            quantity: quantity.max(1),
            appointment: false,
            selection: SurchargeSelection::default(),
        }
    }

    /// Creates an appointment line. Appointments are always booked one at a time.
    pub fn appointment(key: LineKey, product: ProductId, base_price: Decimal) -> Self {
        Self {
            key,
            product,
            base_price,
            quantity: 1,
            appointment: true,
            selection: SurchargeSelection::default(),
        }
    }

    /// Creates a line for `product`, normalizing the quantity of appointments to one.
    pub fn for_product(key: LineKey, product: &Product, quantity: u32) -> Self {
        if product.is_appointment() {
            Self::appointment(key, product.id(), product.price())
        } else {
            Self::standard(key, product.id(), product.price(), quantity)
        }
    }

    /// Line key
    pub fn key(&self) -> &LineKey {
        &self.key
    }

    /// Product on this line
    pub fn product(&self) -> ProductId {
        self.product
    }

    /// Unit price before any surcharge.
    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    /// Quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns `true` when the line books an appointment.
    pub fn is_appointment(&self) -> bool {
        self.appointment
    }

    /// Current surcharge selection.
    pub fn selection(&self) -> &SurchargeSelection {
        &self.selection
    }

    /// Changes the quantity. Appointment lines stay at one.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = if self.appointment { 1 } else { quantity.max(1) };
    }

    /// Selects a preset package for this line.
    ///
    /// # Errors
    ///
    /// Returns [`SurchargeError::PresetUnavailable`] when the bucket has no
    /// price. The line is left unchanged.
    pub fn apply_preset(
        &mut self,
        table: &DurationPriceTable,
        bucket: DurationBucket,
    ) -> Result<&SurchargeSelection, SurchargeError> {
        self.selection = surcharge::apply_preset(table, bucket)?;

        Ok(&self.selection)
    }

    /// Books a custom amount of extra time on this line.
    ///
    /// # Errors
    ///
    /// Returns [`SurchargeError::InvalidDuration`] or
    /// [`SurchargeError::ReferenceRateUnset`]. The line is left unchanged.
    pub fn apply_free_form(
        &mut self,
        table: &DurationPriceTable,
        duration: FreeFormDuration,
    ) -> Result<&SurchargeSelection, SurchargeError> {
        self.selection = surcharge::apply_duration(table, duration)?;

        Ok(&self.selection)
    }

    /// Clears the selection, restoring the base price.
    pub fn reset(&mut self) {
        self.selection = SurchargeSelection::default();
    }

    /// Mutes or unmutes the surcharge without discarding it.
    pub fn toggle_no_customization(&mut self, enabled: bool) {
        self.selection.set_no_customization(enabled);
    }

    /// Base price times quantity.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] when the product does not fit.
    pub fn base_subtotal(&self) -> Result<Decimal, AmountError> {
        self.base_price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or(AmountError::Overflow)
    }

    /// Returns `true` when an active preset package replaces the base price.
    pub fn has_package(&self) -> bool {
        self.selection.is_package()
    }

    /// What the line contributes to the base total: nothing while a package
    /// replaces the base price.
    ///
    /// # Errors
    ///
    /// See [`CartLine::base_subtotal`].
    pub fn base_contribution(&self) -> Result<Decimal, AmountError> {
        if self.has_package() {
            Ok(Decimal::ZERO)
        } else {
            self.base_subtotal()
        }
    }

    /// Line total including any unmuted surcharge.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] when the total does not fit.
    pub fn total(&self) -> Result<Decimal, AmountError> {
        checked_add(self.base_contribution()?, self.selection.effective_cost())
    }
}

/// Totals for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    /// Base subtotals of lines without a package.
    pub base_total: Decimal,

    /// Unmuted surcharges across all lines.
    pub surcharge_total: Decimal,

    /// Grand total.
    pub total: Decimal,
}

impl CartTotals {
    /// The "Additional Service Cost" row, shown only when positive.
    pub fn additional_service_cost(&self) -> Option<Decimal> {
        (self.surcharge_total > Decimal::ZERO).then_some(self.surcharge_total)
    }
}

/// A session's cart, in the order lines were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a line, replacing any line with the same key. Returns the
    /// replaced line.
    pub fn put_line(&mut self, line: CartLine) -> Option<CartLine> {
        if let Some(existing) = self.line_mut(line.key()) {
            return Some(std::mem::replace(existing, line));
        }

        self.lines.push(line);

        None
    }

    /// Looks up a line by key.
    pub fn line(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.key() == key)
    }

    /// Looks up a line by key for editing.
    pub fn line_mut(&mut self, key: &LineKey) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.key() == key)
    }

    /// Removes a line, returning it.
    pub fn remove_line(&mut self, key: &LineKey) -> Option<CartLine> {
        let index = self.lines.iter().position(|line| line.key() == key)?;

        Some(self.lines.remove(index))
    }

    /// Lines in the order they were added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` when the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of base subtotals over lines without an active package.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] when the sum does not fit.
    pub fn base_total(&self) -> Result<Decimal, AmountError> {
        self.lines.iter().try_fold(Decimal::ZERO, |total, line| {
            checked_add(total, line.base_contribution()?)
        })
    }

    /// Grand total including unmuted surcharges.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] when the total does not fit.
    pub fn total(&self) -> Result<Decimal, AmountError> {
        recompute_cart_total(&self.lines, self.base_total()?)
    }

    /// Base, surcharge and grand totals.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] when any total does not fit.
    pub fn totals(&self) -> Result<CartTotals, AmountError> {
        let base_total = self.base_total()?;
        let surcharge_total = recompute_cart_total(&self.lines, Decimal::ZERO)?;

        Ok(CartTotals {
            base_total,
            surcharge_total,
            total: checked_add(base_total, surcharge_total)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{durations::TimeUnit, products::ProductKind};

    use super::*;

    fn massage_table() -> TestResult<DurationPriceTable> {
        let mut table = DurationPriceTable::from_per_minute_rate(Decimal::ONE)?;

        table.set_base_price(Decimal::from(50))?;

        Ok(table)
    }

    fn massage_line(key: &str) -> CartLine {
        CartLine::appointment(LineKey::from(key), ProductId::new(1), Decimal::from(50))
    }

    #[test]
    fn appointment_quantity_is_normalized_to_one() -> TestResult {
        let product = Product::new(
            ProductId::new(1),
            "Massage",
            ProductKind::Appointment(massage_table()?),
        );

        let mut line = CartLine::for_product(LineKey::from("a"), &product, 3);

        assert_eq!(line.quantity(), 1);
        assert!(line.is_appointment());

        line.set_quantity(4);

        assert_eq!(line.quantity(), 1);

        Ok(())
    }

    #[test]
    fn standard_lines_keep_their_quantity() -> TestResult {
        let mut line = CartLine::standard(LineKey::from("b"), ProductId::new(2), Decimal::from(5), 3);

        assert_eq!(line.base_subtotal()?, Decimal::from(15));

        line.set_quantity(2);

        assert_eq!(line.total()?, Decimal::from(10));

        Ok(())
    }

    #[test]
    fn one_hour_package_replaces_the_base_price() -> TestResult {
        let table = massage_table()?;
        let mut line = massage_line("a");

        line.apply_preset(&table, DurationBucket::OneHour)?;

        assert_eq!(line.total()?, Decimal::from(60));
        assert_eq!(line.base_contribution()?, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn free_form_time_is_added_on_top_of_the_base() -> TestResult {
        let table = massage_table()?;
        let mut line = massage_line("a");

        let duration = surcharge::parse_free_form("30", TimeUnit::Minutes)?;
        line.apply_free_form(&table, duration)?;

        assert_eq!(line.total()?, Decimal::from(80));

        Ok(())
    }

    #[test]
    fn failed_preset_leaves_the_line_unchanged() -> TestResult {
        let mut table = massage_table()?;
        table.clear(DurationBucket::SixHours);

        let mut line = massage_line("a");
        line.apply_preset(&table, DurationBucket::OneHour)?;
        let before = line.clone();

        let result = line.apply_preset(&table, DurationBucket::SixHours);

        assert_eq!(
            result.err(),
            Some(SurchargeError::PresetUnavailable(DurationBucket::SixHours))
        );
        assert_eq!(line, before);

        Ok(())
    }

    #[test]
    fn muted_package_falls_back_to_the_base_price() -> TestResult {
        let table = massage_table()?;
        let mut line = massage_line("a");

        line.apply_preset(&table, DurationBucket::TwoHours)?;
        line.toggle_no_customization(true);

        assert_eq!(line.total()?, Decimal::from(50));

        line.toggle_no_customization(false);

        assert_eq!(line.total()?, Decimal::from(120));

        Ok(())
    }

    #[test]
    fn put_line_is_last_write_wins() {
        let mut cart = Cart::new();

        assert!(cart.put_line(massage_line("a")).is_none());
        assert!(cart.put_line(massage_line("a")).is_some());
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn remove_line_drops_the_selection_with_the_line() -> TestResult {
        let mut cart = Cart::new();
        let mut line = massage_line("a");
        line.apply_preset(&massage_table()?, DurationBucket::OneHour)?;
        cart.put_line(line);

        assert!(cart.remove_line(&LineKey::from("a")).is_some());
        assert!(cart.is_empty());
        assert_eq!(cart.total()?, Decimal::ZERO);
        assert!(cart.remove_line(&LineKey::from("a")).is_none());

        Ok(())
    }

    #[test]
    fn totals_split_base_and_surcharge() -> TestResult {
        let table = massage_table()?;
        let mut cart = Cart::new();

        let mut package = massage_line("a");
        package.apply_preset(&table, DurationBucket::OneHour)?;
        cart.put_line(package);

        cart.put_line(massage_line("b"));
        cart.put_line(CartLine::standard(LineKey::from("c"), ProductId::new(2), Decimal::from(5), 2));

        let totals = cart.totals()?;

        assert_eq!(totals.base_total, Decimal::from(60));
        assert_eq!(totals.surcharge_total, Decimal::from(60));
        assert_eq!(totals.total, Decimal::from(120));
        assert_eq!(totals.additional_service_cost(), Some(Decimal::from(60)));
        assert_eq!(cart.total()?, totals.total);

        Ok(())
    }

    #[test]
    fn no_additional_service_cost_without_surcharges() -> TestResult {
        let mut cart = Cart::new();
        cart.put_line(massage_line("a"));

        assert_eq!(cart.totals()?.additional_service_cost(), None);

        Ok(())
    }

    #[test]
    fn oversized_totals_are_reported_not_panicked() {
        let mut cart = Cart::new();

        cart.put_line(CartLine::standard(LineKey::from("a"), ProductId::new(2), Decimal::MAX, 1));
        cart.put_line(CartLine::standard(LineKey::from("b"), ProductId::new(2), Decimal::MAX, 1));

        let line = CartLine::standard(LineKey::from("c"), ProductId::new(2), Decimal::MAX, 2);

        assert_eq!(line.base_subtotal(), Err(AmountError::Overflow));
        assert_eq!(cart.base_total(), Err(AmountError::Overflow));
        assert_eq!(cart.total(), Err(AmountError::Overflow));
        assert_eq!(cart.totals(), Err(AmountError::Overflow));
    }
}
