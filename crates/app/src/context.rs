//! App Context

use std::sync::Arc;

use appointime::catalog::Catalog;
use tracing::info;

use crate::{
    domain::{
        carts::{CartsService, MemoryCartsService},
        products::{MemoryProductsRepository, MemoryProductsService, ProductsService},
    },
    sessions::{MemorySessionsService, SessionsService},
};

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub sessions: Arc<dyn SessionsService>,
}

impl AppContext {
    /// Build application context from a product catalogue.
    #[must_use]
    pub fn from_catalog(catalog: Catalog, form_token_ttl_secs: u64) -> Self {
        let products: Arc<dyn ProductsService> = Arc::new(MemoryProductsService::new(
            MemoryProductsRepository::new(catalog.into_products()),
        ));

        let sessions: Arc<dyn SessionsService> =
            Arc::new(MemorySessionsService::new(form_token_ttl_secs));

        Self {
            carts: Arc::new(MemoryCartsService::new(products.clone(), sessions.clone())),
            products,
            sessions,
        }
    }

    /// Removes expired sessions along with their carts, returning how many
    /// sessions were removed.
    #[tracing::instrument(name = "context.purge_expired_sessions", skip(self))]
    pub async fn purge_expired_sessions(&self) -> usize {
        let expired = self.sessions.purge_expired().await;

        if expired.is_empty() {
            return 0;
        }

        let carts = self.carts.drop_carts(&expired).await;

        info!(sessions = expired.len(), carts, "purged expired sessions");

        expired.len()
    }
}

#[cfg(test)]
mod tests {
    use appointime::{durations::DurationBucket, products::ProductId};
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::carts::data::{DurationRequest, NewCartLine, SurchargeRequest},
        sessions::{MockSessionsService, records::SessionUuid},
        test::helpers::products_service,
    };

    use super::*;

    #[tokio::test]
    async fn services_share_products_and_sessions() -> TestResult {
        let catalog = Catalog::from_yaml(include_str!("../../../fixtures/catalog.yml"))?;
        let ctx = AppContext::from_catalog(catalog, 60);

        let issued = ctx.sessions.start_session().await?;

        let line = ctx
            .carts
            .add_line(
                issued.session,
                &issued.form_token,
                NewCartLine {
                    product: ProductId::new(101),
                    quantity: 1,
                },
            )
            .await?;

        let outcome = ctx
            .carts
            .apply_surcharge(
                issued.session,
                &issued.form_token,
                SurchargeRequest {
                    line_key: line.key().clone(),
                    duration: DurationRequest::Preset(DurationBucket::TwoHours),
                    quoted_cost: Some("$120.00".to_string()),
                },
            )
            .await?;

        assert_eq!(outcome.updated_total, Decimal::from(120));
        assert_eq!(ctx.products.list_products().await?.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn purge_drops_expired_sessions_and_their_carts() -> TestResult {
        let expired = SessionUuid::new();
        let active = SessionUuid::new();

        let mut sessions = MockSessionsService::new();

        sessions.expect_verify_form_token().returning(|_, _| Ok(()));
        sessions
            .expect_purge_expired()
            .once()
            .return_once(move || vec![expired]);

        let products: Arc<dyn ProductsService> = Arc::new(products_service()?);
        let sessions: Arc<dyn SessionsService> = Arc::new(sessions);

        let ctx = AppContext {
            carts: Arc::new(MemoryCartsService::new(products.clone(), sessions.clone())),
            products,
            sessions,
        };

        for session in [expired, active] {
            ctx.carts
                .add_line(
                    session,
                    "token",
                    NewCartLine {
                        product: ProductId::new(201),
                        quantity: 1,
                    },
                )
                .await?;
        }

        assert_eq!(ctx.purge_expired_sessions().await, 1);
        assert!(ctx.carts.get_cart(expired).await?.is_empty());
        assert_eq!(ctx.carts.get_cart(active).await?.len(), 1);

        Ok(())
    }
}
