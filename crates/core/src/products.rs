//! Products

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::table::DurationPriceTable;

/// Product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Wraps a raw product id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw product id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How a product is priced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductKind {
    /// A regular product with a single price.
    Standard {
        /// Unit price
        price: Decimal,
    },

    /// A bookable appointment priced by duration.
    Appointment(DurationPriceTable),
}

/// Product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    kind: ProductKind,
}

impl Product {
    /// Creates a product.
    pub fn new(id: ProductId, name: impl Into<String>, kind: ProductKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }

    /// Product id
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Product kind
    pub fn kind(&self) -> &ProductKind {
        &self.kind
    }

    /// Catalogue price: the unit price, or the base price of an appointment.
    pub fn price(&self) -> Decimal {
        match &self.kind {
            ProductKind::Standard { price } => *price,
            ProductKind::Appointment(table) => table.base_price(),
        }
    }

    /// Returns `true` for appointment products.
    pub fn is_appointment(&self) -> bool {
        matches!(self.kind, ProductKind::Appointment(_))
    }

    /// The duration price table of an appointment product.
    pub fn price_table(&self) -> Option<&DurationPriceTable> {
        match &self.kind {
            ProductKind::Appointment(table) => Some(table),
            ProductKind::Standard { .. } => None,
        }
    }

    /// Replaces the price table, turning the product into an appointment.
    pub fn set_price_table(&mut self, table: DurationPriceTable) {
        self.kind = ProductKind::Appointment(table);
    }

    /// Returns `true` for products that need no shipping.
    pub fn is_virtual(&self) -> bool {
        self.is_appointment()
    }
}
