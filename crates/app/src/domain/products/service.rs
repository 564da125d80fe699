//! Products service.

use std::sync::Arc;

use appointime::{
    products::{Product, ProductId},
    table::DurationPriceTable,
};
use async_trait::async_trait;
use mockall::automock;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::products::{
    data::PriceTableUpdate, errors::ProductsServiceError, repository::MemoryProductsRepository,
};

#[derive(Debug, Clone, Default)]
pub struct MemoryProductsService {
    repository: Arc<RwLock<MemoryProductsRepository>>,
}

impl MemoryProductsService {
    #[must_use]
    pub fn new(repository: MemoryProductsRepository) -> Self {
        Self {
            repository: Arc::new(RwLock::new(repository)),
        }
    }
}

#[async_trait]
impl ProductsService for MemoryProductsService {
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        self.repository.read().await.list_products()
    }

    async fn get_product(&self, product: ProductId) -> Result<Product, ProductsServiceError> {
        self.repository.read().await.get_product(product)
    }

    async fn get_price_table(
        &self,
        product: ProductId,
    ) -> Result<DurationPriceTable, ProductsServiceError> {
        self.repository.read().await.get(product)
    }

    #[tracing::instrument(
        name = "products.service.put_price_table",
        skip(self, table),
        fields(product_id = %product),
        err
    )]
    async fn put_price_table(
        &self,
        product: ProductId,
        table: DurationPriceTable,
    ) -> Result<(), ProductsServiceError> {
        self.repository.write().await.put(product, &table)?;

        info!(product_id = %product, "stored price table");

        Ok(())
    }

    #[tracing::instrument(
        name = "products.service.update_price_table",
        skip(self, update),
        fields(
            product_id = %product,
            per_minute_rate = update.per_minute_rate.is_some(),
            bucket_count = update.prices.len()
        ),
        err
    )]
    async fn update_price_table(
        &self,
        product: ProductId,
        update: PriceTableUpdate,
    ) -> Result<DurationPriceTable, ProductsServiceError> {
        let mut repository = self.repository.write().await;

        let mut table = match &update.per_minute_rate {
            Some(rate) => {
                repository.get(product)?;

                DurationPriceTable::from_per_minute_rate(DurationPriceTable::parse_price(rate)?)?
            }
            None => repository.get(product)?,
        };

        if let Some(price) = &update.base_price {
            table.set_base_price(DurationPriceTable::parse_price(price)?)?;
        }

        if let Some(rate) = &update.hourly_rate {
            table.set_hourly_rate(DurationPriceTable::parse_price(rate)?)?;
        }

        for (bucket, price) in &update.prices {
            table.set_manual(*bucket, DurationPriceTable::parse_price(price)?)?;
        }

        for bucket in &update.cleared {
            table.clear(*bucket);
        }

        repository.put(product, &table)?;

        info!(product_id = %product, "updated price table");

        Ok(table)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products.
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductId) -> Result<Product, ProductsServiceError>;

    /// Retrieve the duration price table of an appointment product.
    async fn get_price_table(
        &self,
        product: ProductId,
    ) -> Result<DurationPriceTable, ProductsServiceError>;

    /// Replaces a product's duration price table.
    async fn put_price_table(
        &self,
        product: ProductId,
        table: DurationPriceTable,
    ) -> Result<(), ProductsServiceError>;

    /// Applies admin price edits to an appointment product's table.
    async fn update_price_table(
        &self,
        product: ProductId,
        update: PriceTableUpdate,
    ) -> Result<DurationPriceTable, ProductsServiceError>;
}
