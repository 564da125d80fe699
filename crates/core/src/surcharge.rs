//! Cart Line Surcharges

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::{
    cart::CartLine,
    durations::{DurationBucket, FreeFormDuration, MAX_ADDITIONAL_MINUTES, TimeUnit},
    money::{AmountError, checked_add, round_to_minor},
    table::DurationPriceTable,
};

/// Errors raised while calculating a surcharge.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurchargeError {
    /// The requested preset has no stored price for this product.
    #[error("duration preset {0} is not available for this product")]
    PresetUnavailable(DurationBucket),

    /// The requested duration is zero, negative, non-numeric, fractional or too long.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// The product has no hourly rate to price a free-form duration with.
    #[error("product has no hourly rate for custom durations")]
    ReferenceRateUnset,
}

/// Where a selection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeSource {
    /// A named duration package.
    Preset(DurationBucket),

    /// A custom amount of extra time.
    FreeForm(FreeFormDuration),
}

/// The extra time chosen for a cart line and what it costs.
///
/// The empty selection carries no source and costs nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SurchargeSelection {
    additional_minutes: u32,
    additional_cost: Decimal,
    no_customization: bool,
    source: Option<SurchargeSource>,
}

impl SurchargeSelection {
    /// Extra minutes booked on top of the base appointment.
    pub fn additional_minutes(&self) -> u32 {
        self.additional_minutes
    }

    /// Cost of the selection, whether or not it is muted.
    pub fn additional_cost(&self) -> Decimal {
        self.additional_cost
    }

    /// Whether the customer opted out of customization for this line.
    pub fn no_customization(&self) -> bool {
        self.no_customization
    }

    /// Where the selection came from, if anything was selected.
    pub fn source(&self) -> Option<SurchargeSource> {
        self.source
    }

    /// Returns `true` when a selection exists and is not muted.
    pub fn is_active(&self) -> bool {
        self.source.is_some() && !self.no_customization
    }

    /// Returns `true` when an active preset package replaces the base price.
    pub fn is_package(&self) -> bool {
        self.is_active() && matches!(self.source, Some(SurchargeSource::Preset(_)))
    }

    /// Cost that counts towards totals: zero while muted.
    pub fn effective_cost(&self) -> Decimal {
        if self.no_customization {
            Decimal::ZERO
        } else {
            self.additional_cost
        }
    }

    pub(crate) fn set_no_customization(&mut self, enabled: bool) {
        self.no_customization = enabled;
    }
}

/// Selects a preset duration package.
///
/// # Errors
///
/// Returns [`SurchargeError::PresetUnavailable`] when the bucket has no price.
pub fn apply_preset(
    table: &DurationPriceTable,
    bucket: DurationBucket,
) -> Result<SurchargeSelection, SurchargeError> {
    let price = table
        .price_for(bucket)
        .ok_or(SurchargeError::PresetUnavailable(bucket))?;

    Ok(SurchargeSelection {
        additional_minutes: bucket.minutes(),
        additional_cost: price,
        no_customization: false,
        source: Some(SurchargeSource::Preset(bucket)),
    })
}

/// Prices a custom amount of extra time at the table's hourly rate.
///
/// The cost is `minutes * hourly_rate / 60`, rounded half-up to cents.
///
/// # Errors
///
/// Returns [`SurchargeError::InvalidDuration`] when the amount is zero or
/// negative, not a whole number of minutes, or longer than 24 hours, and
/// [`SurchargeError::ReferenceRateUnset`] when the table has no hourly rate.
pub fn apply_free_form(
    table: &DurationPriceTable,
    amount: Decimal,
    unit: TimeUnit,
) -> Result<SurchargeSelection, SurchargeError> {
    let duration = FreeFormDuration::new(amount, unit)
        .ok_or_else(|| SurchargeError::InvalidDuration(amount.to_string()))?;

    apply_duration(table, duration)
}

/// Prices an already validated [`FreeFormDuration`].
///
/// # Errors
///
/// See [`apply_free_form`].
pub fn apply_duration(
    table: &DurationPriceTable,
    duration: FreeFormDuration,
) -> Result<SurchargeSelection, SurchargeError> {
    let invalid = || {
        SurchargeError::InvalidDuration(format!("{} {:?}", duration.amount(), duration.unit()))
    };

    let minutes = duration
        .whole_minutes()
        .filter(|minutes| (1..=MAX_ADDITIONAL_MINUTES).contains(minutes))
        .ok_or_else(invalid)?;

    let rate = table.hourly_rate().ok_or(SurchargeError::ReferenceRateUnset)?;

    let cost = Decimal::from(minutes)
        .checked_mul(rate)
        .and_then(|total| total.checked_div(Decimal::from(60)))
        .map(round_to_minor)
        .ok_or_else(invalid)?;

    Ok(SurchargeSelection {
        additional_minutes: minutes,
        additional_cost: cost,
        no_customization: false,
        source: Some(SurchargeSource::FreeForm(duration)),
    })
}

/// Parses a free-form amount entered at the boundary.
///
/// # Errors
///
/// Returns [`SurchargeError::InvalidDuration`] for empty, non-numeric or
/// negative input.
pub fn parse_free_form(amount: &str, unit: TimeUnit) -> Result<FreeFormDuration, SurchargeError> {
    Decimal::from_str(amount.trim())
        .ok()
        .filter(|amount| !amount.is_sign_negative())
        .and_then(|amount| FreeFormDuration::new(amount, unit))
        .ok_or_else(|| SurchargeError::InvalidDuration(amount.to_string()))
}

/// Returns the line with its selection cleared. Applying it twice changes nothing.
#[must_use]
pub fn reset(line: &CartLine) -> CartLine {
    let mut line = line.clone();

    line.reset();

    line
}

/// Returns the line with its surcharge muted or unmuted. The stored selection
/// is kept either way.
#[must_use]
pub fn toggle_no_customization(line: &CartLine, enabled: bool) -> CartLine {
    let mut line = line.clone();

    line.toggle_no_customization(enabled);

    line
}

/// Adds every unmuted line's surcharge to `base_total`.
///
/// # Errors
///
/// Returns [`AmountError::Overflow`] when the total does not fit.
pub fn recompute_cart_total<'a, I>(lines: I, base_total: Decimal) -> Result<Decimal, AmountError>
where
    I: IntoIterator<Item = &'a CartLine>,
{
    lines
        .into_iter()
        .map(|line| line.selection().effective_cost())
        .try_fold(base_total, checked_add)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{cart::LineKey, products::ProductId};

    use super::*;

    fn hourly_table(rate: i64) -> TestResult<DurationPriceTable> {
        let mut table = DurationPriceTable::new(Decimal::from(50))?;

        table.set_hourly_rate(Decimal::from(rate))?;

        Ok(table)
    }

    fn line_with_cost(key: &str, cost: i64) -> TestResult<CartLine> {
        let mut table = DurationPriceTable::new(Decimal::from(50))?;
        table.set_manual(DurationBucket::OneHour, Decimal::from(cost))?;

        let mut line = CartLine::appointment(LineKey::from(key), ProductId::new(1), Decimal::from(50));
        line.apply_preset(&table, DurationBucket::OneHour)?;

        Ok(line)
    }

    #[test]
    fn preset_uses_stored_price_and_minutes() -> TestResult {
        let table = DurationPriceTable::from_per_minute_rate(Decimal::ONE)?;

        let selection = apply_preset(&table, DurationBucket::OneHour)?;

        assert_eq!(selection.additional_minutes(), 60);
        assert_eq!(selection.additional_cost(), Decimal::from(60));
        assert_eq!(
            selection.source(),
            Some(SurchargeSource::Preset(DurationBucket::OneHour))
        );
        assert!(selection.is_package());

        Ok(())
    }

    #[test]
    fn unset_preset_is_unavailable() -> TestResult {
        let table = DurationPriceTable::new(Decimal::from(50))?;

        assert_eq!(
            apply_preset(&table, DurationBucket::SixHours),
            Err(SurchargeError::PresetUnavailable(DurationBucket::SixHours))
        );

        Ok(())
    }

    #[test]
    fn ninety_minutes_at_twenty_an_hour_costs_thirty() -> TestResult {
        let table = hourly_table(20)?;

        let selection = apply_free_form(&table, Decimal::from(90), TimeUnit::Minutes)?;

        assert_eq!(selection.additional_minutes(), 90);
        assert_eq!(selection.additional_cost(), Decimal::new(3000, 2));
        assert!(!selection.is_package());

        Ok(())
    }

    #[test]
    fn free_form_hours_convert_to_minutes() -> TestResult {
        let table = hourly_table(20)?;

        let selection = apply_free_form(&table, Decimal::new(25, 1), TimeUnit::Hours)?;

        assert_eq!(selection.additional_minutes(), 150);
        assert_eq!(selection.additional_cost(), Decimal::from(50));

        Ok(())
    }

    #[test]
    fn free_form_rounds_half_up_to_cents() -> TestResult {
        let mut table = DurationPriceTable::new(Decimal::from(50))?;
        table.set_hourly_rate(Decimal::new(1, 1))?;

        let selection = apply_free_form(&table, Decimal::from(5), TimeUnit::Minutes)?;

        assert_eq!(selection.additional_cost(), Decimal::new(1, 2));

        Ok(())
    }

    #[test]
    fn free_form_requires_an_hourly_rate() -> TestResult {
        let table = DurationPriceTable::new(Decimal::from(50))?;

        assert_eq!(
            apply_free_form(&table, Decimal::from(30), TimeUnit::Minutes),
            Err(SurchargeError::ReferenceRateUnset)
        );

        Ok(())
    }

    #[test]
    fn free_form_rejects_invalid_durations() -> TestResult {
        let table = hourly_table(20)?;

        for (amount, unit) in [
            (Decimal::from(-5), TimeUnit::Minutes),
            (Decimal::new(5, 1), TimeUnit::Minutes),
            (Decimal::from(25), TimeUnit::Hours),
            (Decimal::from(1441), TimeUnit::Minutes),
            (Decimal::ZERO, TimeUnit::Minutes),
            (Decimal::ZERO, TimeUnit::Hours),
        ] {
            assert!(
                matches!(
                    apply_free_form(&table, amount, unit),
                    Err(SurchargeError::InvalidDuration(_))
                ),
                "{amount} {unit:?} should be rejected"
            );
        }

        assert!(apply_free_form(&table, Decimal::from(24), TimeUnit::Hours).is_ok());

        Ok(())
    }

    #[test]
    fn parse_free_form_rejects_non_numeric_input() {
        assert!(matches!(
            parse_free_form("ninety", TimeUnit::Minutes),
            Err(SurchargeError::InvalidDuration(_))
        ));
        assert!(matches!(
            parse_free_form("-1", TimeUnit::Hours),
            Err(SurchargeError::InvalidDuration(_))
        ));
        assert!(matches!(
            parse_free_form("$30", TimeUnit::Minutes),
            Err(SurchargeError::InvalidDuration(_))
        ));
        assert!(parse_free_form(" 90 ", TimeUnit::Minutes).is_ok());
    }

    #[test]
    fn reset_is_idempotent() -> TestResult {
        let line = line_with_cost("a", 10)?;

        let once = reset(&line);

        assert_eq!(reset(&once), once);
        assert_eq!(once.selection(), &SurchargeSelection::default());

        Ok(())
    }

    #[test]
    fn toggling_on_then_off_restores_the_selection() -> TestResult {
        let line = line_with_cost("a", 10)?;

        let muted = toggle_no_customization(&line, true);
        let restored = toggle_no_customization(&muted, false);

        assert_eq!(muted.selection().effective_cost(), Decimal::ZERO);
        assert_eq!(muted.selection().additional_cost(), Decimal::from(10));
        assert_eq!(restored, line);

        Ok(())
    }

    #[test]
    fn muted_lines_are_excluded_from_the_total() -> TestResult {
        let lines = [
            line_with_cost("a", 10)?,
            line_with_cost("b", 15)?,
            toggle_no_customization(&line_with_cost("c", 5)?, true),
        ];

        assert_eq!(recompute_cart_total(&lines, Decimal::ZERO)?, Decimal::from(25));

        Ok(())
    }

    #[test]
    fn total_does_not_depend_on_line_order() -> TestResult {
        let forward = [line_with_cost("a", 10)?, line_with_cost("b", 15)?];
        let backward = [line_with_cost("b", 15)?, line_with_cost("a", 10)?];

        assert_eq!(
            recompute_cart_total(&forward, Decimal::from(7))?,
            recompute_cart_total(&backward, Decimal::from(7))?
        );

        Ok(())
    }
}
