//! Test Helpers

use std::sync::Arc;

use appointime::{
    cart::{Cart, CartLine},
    catalog::Catalog,
    products::ProductId,
};
use testresult::TestResult;

use crate::{
    domain::{
        carts::{CartsService, CartsServiceError, MemoryCartsService, data::NewCartLine},
        products::{MemoryProductsRepository, MemoryProductsService},
    },
    sessions::{MemorySessionsService, SessionsService, records::SessionUuid},
};

const CATALOG: &str = include_str!("../../../../fixtures/catalog.yml");

/// $50 base, derived from $1 per minute.
pub(crate) const MASSAGE: ProductId = ProductId::new(101);

/// $40 base, $20 per hour, no 6h preset.
pub(crate) const CONSULTATION: ProductId = ProductId::new(102);

/// $25 standard product.
pub(crate) const GIFT_CARD: ProductId = ProductId::new(201);

pub(crate) fn products_service() -> TestResult<MemoryProductsService> {
    let catalog = Catalog::from_yaml(CATALOG)?;

    Ok(MemoryProductsService::new(MemoryProductsRepository::new(
        catalog.into_products(),
    )))
}

/// A carts service over the fixture catalogue with one started session.
pub(crate) struct TestCarts {
    pub carts: MemoryCartsService,
    pub sessions: Arc<MemorySessionsService>,
    pub session: SessionUuid,
    pub token: String,
}

impl TestCarts {
    pub(crate) async fn new() -> TestResult<Self> {
        let sessions = Arc::new(MemorySessionsService::default());
        let issued = sessions.start_session().await?;

        Ok(Self {
            carts: MemoryCartsService::new(Arc::new(products_service()?), sessions.clone()),
            sessions,
            session: issued.session,
            token: issued.form_token,
        })
    }

    pub(crate) async fn add(
        &self,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartLine, CartsServiceError> {
        self.carts
            .add_line(self.session, &self.token, NewCartLine { product, quantity })
            .await
    }

    pub(crate) async fn cart(&self) -> Result<Cart, CartsServiceError> {
        self.carts.get_cart(self.session).await
    }
}
