//! Duration Price Tables

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::{
    durations::{BASE_MINUTES, DurationBucket},
    money::{MAX_AMOUNT, parse_non_negative, round_to_minor},
};

/// Stored field holding the fixed 30-minute base price.
pub const BASE_PRICE_FIELD: &str = "_appointment_base_price";

/// Stored field holding the nominal hourly rate used for free-form durations.
pub const HOURLY_RATE_FIELD: &str = "_appointment_hourly_rate";

const BUCKET_FIELD_PREFIX: &str = "_price_";

/// Errors raised while building or editing a price table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceTableError {
    /// A price was negative, non-numeric or out of range.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// A stored field name did not match any known price field.
    #[error("unknown price field: {0}")]
    UnknownField(String),

    /// A required price field was absent.
    #[error("missing price field: {0}")]
    MissingField(&'static str),
}

/// Prices for one appointment product: a base price for the fixed 30-minute
/// unit and an optional price per duration bucket.
///
/// Buckets without a price are unavailable, which is different from free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationPriceTable {
    base_price: Decimal,
    hourly_rate: Option<Decimal>,
    prices: BTreeMap<DurationBucket, Decimal>,
}

impl DurationPriceTable {
    /// Creates a table with only a base price; every bucket is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`PriceTableError::InvalidPrice`] when the base price is negative
    /// or above [`MAX_AMOUNT`].
    pub fn new(base_price: Decimal) -> Result<Self, PriceTableError> {
        Ok(Self {
            base_price: ensure_non_negative(base_price)?,
            hourly_rate: None,
            prices: BTreeMap::new(),
        })
    }

    /// Derives every price from a single per-minute rate.
    ///
    /// Each bucket costs `rate * minutes`, the base price is `rate * 30` and the
    /// hourly rate is `rate * 60`, all rounded to the minor unit.
    ///
    /// # Errors
    ///
    /// Returns [`PriceTableError::InvalidPrice`] when the rate is not positive
    /// or a derived price is above [`MAX_AMOUNT`].
    pub fn from_per_minute_rate(rate: Decimal) -> Result<Self, PriceTableError> {
        if rate <= Decimal::ZERO {
            return Err(PriceTableError::InvalidPrice(rate.to_string()));
        }

        let derive = |minutes: u32| {
            rate.checked_mul(Decimal::from(minutes))
                .map(round_to_minor)
                .filter(|price| *price <= MAX_AMOUNT)
                .ok_or_else(|| PriceTableError::InvalidPrice(rate.to_string()))
        };

        let prices = DurationBucket::ALL
            .into_iter()
            .map(|bucket| derive(bucket.minutes()).map(|price| (bucket, price)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(Self {
            base_price: derive(BASE_MINUTES)?,
            hourly_rate: Some(derive(60)?),
            prices,
        })
    }

    /// Parses a price entered at the boundary.
    ///
    /// # Errors
    ///
    /// Returns [`PriceTableError::InvalidPrice`] for empty, non-numeric, negative
    /// or out of range input.
    pub fn parse_price(input: &str) -> Result<Decimal, PriceTableError> {
        parse_non_negative(input).ok_or_else(|| PriceTableError::InvalidPrice(input.to_string()))
    }

    /// Overrides the price of a single bucket.
    ///
    /// # Errors
    ///
    /// Returns [`PriceTableError::InvalidPrice`] when the price is negative or
    /// above [`MAX_AMOUNT`].
    pub fn set_manual(
        &mut self,
        bucket: DurationBucket,
        price: Decimal,
    ) -> Result<(), PriceTableError> {
        self.prices.insert(bucket, ensure_non_negative(price)?);

        Ok(())
    }

    /// Makes a bucket unavailable again, returning its previous price.
    pub fn clear(&mut self, bucket: DurationBucket) -> Option<Decimal> {
        self.prices.remove(&bucket)
    }

    /// Sets the price of the fixed 30-minute unit.
    ///
    /// # Errors
    ///
    /// Returns [`PriceTableError::InvalidPrice`] when the price is negative or
    /// above [`MAX_AMOUNT`].
    pub fn set_base_price(&mut self, price: Decimal) -> Result<(), PriceTableError> {
        self.base_price = ensure_non_negative(price)?;

        Ok(())
    }

    /// Sets the nominal hourly rate charged for free-form durations.
    ///
    /// # Errors
    ///
    /// Returns [`PriceTableError::InvalidPrice`] when the rate is negative or
    /// above [`MAX_AMOUNT`].
    pub fn set_hourly_rate(&mut self, rate: Decimal) -> Result<(), PriceTableError> {
        self.hourly_rate = Some(ensure_non_negative(rate)?);

        Ok(())
    }

    /// Price of the fixed 30-minute unit.
    #[must_use]
    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    /// Nominal hourly rate for free-form durations, if one is set.
    #[must_use]
    pub fn hourly_rate(&self) -> Option<Decimal> {
        self.hourly_rate
    }

    /// Price of a bucket, or `None` when the bucket is unavailable.
    #[must_use]
    pub fn price_for(&self, bucket: DurationBucket) -> Option<Decimal> {
        self.prices.get(&bucket).copied()
    }

    /// Iterates over the available buckets, shortest first.
    pub fn iter(&self) -> impl Iterator<Item = (DurationBucket, Decimal)> + '_ {
        self.prices.iter().map(|(bucket, price)| (*bucket, *price))
    }

    /// Renders the table as named price fields for the product price store.
    #[must_use]
    pub fn price_fields(&self) -> Vec<(String, Decimal)> {
        let mut fields = Vec::with_capacity(self.prices.len() + 2);

        fields.push((BASE_PRICE_FIELD.to_string(), self.base_price));

        if let Some(rate) = self.hourly_rate {
            fields.push((HOURLY_RATE_FIELD.to_string(), rate));
        }

        fields.extend(self.iter().map(|(bucket, price)| (bucket_field(bucket), price)));

        fields
    }

    /// Rebuilds a table from named price fields.
    ///
    /// # Errors
    ///
    /// Returns an error when a field is unknown, a value is not a valid price,
    /// or the base price field is absent.
    pub fn from_price_fields<I, K, V>(fields: I) -> Result<Self, PriceTableError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut base_price = None;
        let mut hourly_rate = None;
        let mut prices = BTreeMap::new();

        for (name, value) in fields {
            let name = name.as_ref();
            let price = Self::parse_price(value.as_ref())?;

            if name == BASE_PRICE_FIELD {
                base_price = Some(price);
            } else if name == HOURLY_RATE_FIELD {
                hourly_rate = Some(price);
            } else {
                let bucket = name
                    .strip_prefix(BUCKET_FIELD_PREFIX)
                    .and_then(|key| key.parse::<DurationBucket>().ok())
                    .ok_or_else(|| PriceTableError::UnknownField(name.to_string()))?;

                prices.insert(bucket, price);
            }
        }

        Ok(Self {
            base_price: base_price.ok_or(PriceTableError::MissingField(BASE_PRICE_FIELD))?,
            hourly_rate,
            prices,
        })
    }
}

/// Name of the stored field holding a bucket's price, e.g. `_price_1h`.
#[must_use]
pub fn bucket_field(bucket: DurationBucket) -> String {
    format!("{BUCKET_FIELD_PREFIX}{}", bucket.key())
}

fn ensure_non_negative(price: Decimal) -> Result<Decimal, PriceTableError> {
    if price < Decimal::ZERO || price > MAX_AMOUNT {
        return Err(PriceTableError::InvalidPrice(price.to_string()));
    }

    Ok(price)
}
