//! Cart Data

use appointime::{
    cart::LineKey, durations::DurationBucket, products::ProductId, surcharge::SurchargeError,
};
use rust_decimal::Decimal;

/// New Cart Line Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartLine {
    pub product: ProductId,
    pub quantity: u32,
}

/// How much extra time the customer asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurationRequest {
    Preset(DurationBucket),
    Hours(String),
    Minutes(String),
}

impl DurationRequest {
    /// Picks the duration from the raw request fields. A preset wins over
    /// hours, and hours win over minutes. Blank fields count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`SurchargeError::InvalidDuration`] when no field is given or
    /// the preset key is unknown.
    pub fn from_fields(
        preset: Option<&str>,
        hours: Option<&str>,
        minutes: Option<&str>,
    ) -> Result<Self, SurchargeError> {
        fn present(field: Option<&str>) -> Option<&str> {
            field.map(str::trim).filter(|value| !value.is_empty())
        }

        if let Some(key) = present(preset) {
            return key
                .parse()
                .map(Self::Preset)
                .map_err(|_| SurchargeError::InvalidDuration(key.to_string()));
        }

        if let Some(amount) = present(hours) {
            return Ok(Self::Hours(amount.to_string()));
        }

        present(minutes)
            .map(|amount| Self::Minutes(amount.to_string()))
            .ok_or_else(|| SurchargeError::InvalidDuration("no duration given".to_string()))
    }
}

/// Surcharge Update Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurchargeRequest {
    pub line_key: LineKey,
    pub duration: DurationRequest,

    /// Cost the client displayed. Only compared against the computed cost.
    pub quoted_cost: Option<String>,
}

/// Result of applying a surcharge to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurchargeOutcome {
    pub additional_minutes: u32,
    pub additional_cost: Decimal,
    pub updated_total: Decimal,
}
