//! Products Repository

use appointime::{
    products::{Product, ProductId, ProductKind},
    table::{DurationPriceTable, PriceTableError},
};
use rustc_hash::FxHashMap;

use crate::domain::products::errors::ProductsServiceError;

/// Stored field holding a standard product's unit price.
pub const PRICE_FIELD: &str = "_price";

/// A product as the store keeps it: a name plus named price fields.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProductRecord {
    name: String,
    appointment: bool,
    fields: FxHashMap<String, String>,
}

impl ProductRecord {
    fn from_product(product: &Product) -> Self {
        let (appointment, fields) = match product.kind() {
            ProductKind::Standard { price } => {
                (false, [(PRICE_FIELD.to_string(), price.to_string())].into_iter().collect())
            }
            ProductKind::Appointment(table) => (true, price_fields(table)),
        };

        Self {
            name: product.name().to_string(),
            appointment,
            fields,
        }
    }

    fn price_table(&self) -> Result<DurationPriceTable, ProductsServiceError> {
        Ok(DurationPriceTable::from_price_fields(&self.fields)?)
    }

    fn to_product(&self, id: ProductId) -> Result<Product, ProductsServiceError> {
        let kind = if self.appointment {
            ProductKind::Appointment(self.price_table()?)
        } else {
            let price = self
                .fields
                .get(PRICE_FIELD)
                .ok_or(PriceTableError::MissingField(PRICE_FIELD))?;

            ProductKind::Standard {
                price: DurationPriceTable::parse_price(price)?,
            }
        };

        Ok(Product::new(id, self.name.clone(), kind))
    }
}

fn price_fields(table: &DurationPriceTable) -> FxHashMap<String, String> {
    table
        .price_fields()
        .into_iter()
        .map(|(name, price)| (name, price.to_string()))
        .collect()
}

/// In-memory product price store, keeping prices as named fields.
#[derive(Debug, Clone, Default)]
pub struct MemoryProductsRepository {
    products: FxHashMap<ProductId, ProductRecord>,
}

impl MemoryProductsRepository {
    #[must_use]
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products
                .into_iter()
                .map(|product| (product.id(), ProductRecord::from_product(&product)))
                .collect(),
        }
    }

    fn record(&self, product: ProductId) -> Result<&ProductRecord, ProductsServiceError> {
        self.products
            .get(&product)
            .ok_or(ProductsServiceError::NotFound)
    }

    pub(crate) fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let mut products = self
            .products
            .iter()
            .map(|(id, record)| record.to_product(*id))
            .collect::<Result<Vec<_>, _>>()?;

        products.sort_by_key(Product::id);

        Ok(products)
    }

    pub(crate) fn get_product(&self, product: ProductId) -> Result<Product, ProductsServiceError> {
        self.record(product)?.to_product(product)
    }

    /// Reads a product's price table back from its stored fields.
    pub(crate) fn get(&self, product: ProductId) -> Result<DurationPriceTable, ProductsServiceError> {
        let record = self.record(product)?;

        if !record.appointment {
            return Err(ProductsServiceError::NotAppointment);
        }

        record.price_table()
    }

    /// Stores a product's price table as named fields, making it an
    /// appointment. Fields of buckets the table no longer prices are dropped.
    pub(crate) fn put(
        &mut self,
        product: ProductId,
        table: &DurationPriceTable,
    ) -> Result<(), ProductsServiceError> {
        let record = self
            .products
            .get_mut(&product)
            .ok_or(ProductsServiceError::NotFound)?;

        record.appointment = true;
        record.fields = price_fields(table);

        Ok(())
    }
}
