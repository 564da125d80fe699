//! Products Data

use appointime::durations::DurationBucket;

/// Price Table Update Data
///
/// Prices arrive as entered and are validated as a whole before anything is
/// stored. A per-minute rate replaces every derived price first; the other
/// fields are then applied on top of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceTableUpdate {
    pub per_minute_rate: Option<String>,
    pub base_price: Option<String>,
    pub hourly_rate: Option<String>,
    pub prices: Vec<(DurationBucket, String)>,
    pub cleared: Vec<DurationBucket>,
}

impl PriceTableUpdate {
    /// An update that derives the whole table from a per-minute rate.
    #[must_use]
    pub fn per_minute_rate(rate: impl Into<String>) -> Self {
        Self {
            per_minute_rate: Some(rate.into()),
            ..Self::default()
        }
    }

    /// An update that overrides a single bucket price.
    #[must_use]
    pub fn bucket_price(bucket: DurationBucket, price: impl Into<String>) -> Self {
        Self {
            prices: vec![(bucket, price.into())],
            ..Self::default()
        }
    }
}
