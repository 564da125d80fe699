//! Catalogue
//!
//! Seeds products and their duration price tables from a YAML file:
//!
//! ```yaml
//! products:
//!   101:
//!     name: Deep Tissue Massage
//!     kind: appointment
//!     per_minute_rate: "1.00"
//!   201:
//!     name: Gift Card
//!     kind: standard
//!     price: "25.00"
//! ```

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    durations::DurationBucket,
    products::{Product, ProductId, ProductKind},
    table::{DurationPriceTable, PriceTableError},
};

/// Catalogue loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalogue file
    #[error("Failed to read catalogue file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price for product {product}: {reason}")]
    InvalidPrice {
        /// Product the price belongs to
        product: ProductId,
        /// What was wrong with it
        reason: String,
    },

    /// Unknown duration bucket key
    #[error("Unknown duration bucket for product {product}: {key}")]
    UnknownBucket {
        /// Product the bucket belongs to
        product: ProductId,
        /// The offending key
        key: String,
    },

    /// Appointment without a base price or per-minute rate
    #[error("Product {0} needs a per_minute_rate or a base_price")]
    MissingPrice(ProductId),
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: FxHashMap<u64, ProductFixture>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ProductFixture {
    Appointment {
        name: String,
        per_minute_rate: Option<String>,
        base_price: Option<String>,
        hourly_rate: Option<String>,
        #[serde(default)]
        prices: FxHashMap<String, String>,
    },
    Standard {
        name: String,
        price: String,
    },
}

/// Products loaded from a catalogue, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: FxHashMap<ProductId, Product>,
}

impl Catalog {
    /// Reads and parses a catalogue file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or any entry is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parses a catalogue from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a price is invalid, a
    /// bucket key is unknown, or an appointment has no price at all.
    pub fn from_yaml(contents: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(contents)?;

        let products = fixture
            .products
            .into_iter()
            .map(|(id, entry)| {
                let id = ProductId::new(id);

                build_product(id, entry).map(|product| (id, product))
            })
            .collect::<Result<FxHashMap<_, _>, _>>()?;

        Ok(Self { products })
    }

    /// Looks up a product.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Products ordered by id.
    pub fn products(&self) -> Vec<&Product> {
        let mut products: Vec<_> = self.products.values().collect();

        products.sort_by_key(|product| product.id());

        products
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` when the catalogue has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Consumes the catalogue, returning its products ordered by id.
    pub fn into_products(self) -> Vec<Product> {
        let mut products: Vec<_> = self.products.into_values().collect();

        products.sort_by_key(Product::id);

        products
    }
}

fn build_product(id: ProductId, entry: ProductFixture) -> Result<Product, CatalogError> {
    let invalid = |error: PriceTableError| CatalogError::InvalidPrice {
        product: id,
        reason: error.to_string(),
    };

    let parse = |input: &str| DurationPriceTable::parse_price(input).map_err(invalid);

    match entry {
        ProductFixture::Standard { name, price } => Ok(Product::new(
            id,
            name,
            ProductKind::Standard {
                price: parse(&price)?,
            },
        )),
        ProductFixture::Appointment {
            name,
            per_minute_rate,
            base_price,
            hourly_rate,
            prices,
        } => {
            let mut table = match (per_minute_rate, &base_price) {
                (Some(rate), _) => DurationPriceTable::from_per_minute_rate(parse(&rate)?),
                (None, Some(base)) => DurationPriceTable::new(parse(base)?),
                (None, None) => return Err(CatalogError::MissingPrice(id)),
            }
            .map_err(invalid)?;

            if let Some(base) = base_price {
                table.set_base_price(parse(&base)?).map_err(invalid)?;
            }

            if let Some(rate) = hourly_rate {
                table.set_hourly_rate(parse(&rate)?).map_err(invalid)?;
            }

            for (key, price) in prices {
                let bucket = key
                    .parse::<DurationBucket>()
                    .map_err(|_err| CatalogError::UnknownBucket { product: id, key })?;

                table.set_manual(bucket, parse(&price)?).map_err(invalid)?;
            }

            Ok(Product::new(id, name, ProductKind::Appointment(table)))
        }
    }
}
