//! Carts service.

use std::sync::Arc;

use appointime::{
    cart::{Cart, CartLine, LineKey},
    durations::TimeUnit,
    money::parse_non_negative,
    surcharge::parse_free_form,
};
use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{Span, info, warn};
use uuid::Uuid;

use crate::{
    domain::{
        carts::{
            data::{DurationRequest, NewCartLine, SurchargeOutcome, SurchargeRequest},
            errors::CartsServiceError,
            repository::MemoryCartStore,
        },
        products::ProductsService,
    },
    sessions::{SessionsService, SessionsServiceError, records::SessionUuid},
};

#[derive(Clone)]
pub struct MemoryCartsService {
    store: Arc<RwLock<MemoryCartStore>>,
    products: Arc<dyn ProductsService>,
    sessions: Arc<dyn SessionsService>,
}

impl MemoryCartsService {
    #[must_use]
    pub fn new(products: Arc<dyn ProductsService>, sessions: Arc<dyn SessionsService>) -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryCartStore::new())),
            products,
            sessions,
        }
    }

    /// Checks the form token. An expired session loses its cart.
    async fn authorize(&self, session: SessionUuid, token: &str) -> Result<(), CartsServiceError> {
        let Err(error) = self.sessions.verify_form_token(session, token).await else {
            return Ok(());
        };

        if error == SessionsServiceError::Expired
            && self.store.write().await.remove_carts(&[session]) > 0
        {
            info!(session = %session, "dropped cart of expired session");
        }

        Err(error.into())
    }

    /// Loads a line, applies `change` to a copy and stores the copy. Nothing
    /// is stored when `change` fails.
    async fn update_line<F>(
        &self,
        session: SessionUuid,
        line_key: &LineKey,
        change: F,
    ) -> Result<(CartLine, Decimal), CartsServiceError>
    where
        F: FnOnce(&mut CartLine) -> Result<(), CartsServiceError> + Send,
    {
        let mut store = self.store.write().await;

        let mut line = store
            .get_line(session, line_key)
            .cloned()
            .ok_or(CartsServiceError::LineNotFound)?;

        change(&mut line)?;

        store.put_line(session, line.clone())?;

        Ok((line, store.recalc_totals(session)?.total))
    }
}

#[async_trait]
impl CartsService for MemoryCartsService {
    #[tracing::instrument(
        name = "carts.service.add_line",
        skip(self, token, line),
        fields(session = %session, product_id = %line.product, line_key = tracing::field::Empty),
        err
    )]
    async fn add_line(
        &self,
        session: SessionUuid,
        token: &str,
        line: NewCartLine,
    ) -> Result<CartLine, CartsServiceError> {
        self.authorize(session, token).await?;

        let product = self.products.get_product(line.product).await?;

        let line_key = LineKey::from(Uuid::now_v7().simple().to_string());

        Span::current().record("line_key", tracing::field::display(&line_key));

        let line = CartLine::for_product(line_key, &product, line.quantity);

        self.store.write().await.put_line(session, line.clone())?;

        info!(line_key = %line.key(), "added cart line");

        Ok(line)
    }

    async fn get_cart(&self, session: SessionUuid) -> Result<Cart, CartsServiceError> {
        Ok(self.store.read().await.cart(session))
    }

    #[tracing::instrument(
        name = "carts.service.remove_line",
        skip(self, token),
        fields(session = %session, line_key = %line_key),
        err
    )]
    async fn remove_line(
        &self,
        session: SessionUuid,
        token: &str,
        line_key: &LineKey,
    ) -> Result<Decimal, CartsServiceError> {
        self.authorize(session, token).await?;

        let mut store = self.store.write().await;

        store
            .remove_line(session, line_key)
            .ok_or(CartsServiceError::LineNotFound)?;

        info!(line_key = %line_key, "removed cart line");

        Ok(store.recalc_totals(session)?.total)
    }

    #[tracing::instrument(
        name = "carts.service.apply_surcharge",
        skip(self, token, request),
        fields(
            session = %session,
            line_key = %request.line_key,
            additional_minutes = tracing::field::Empty,
            additional_cost = tracing::field::Empty
        ),
        err
    )]
    async fn apply_surcharge(
        &self,
        session: SessionUuid,
        token: &str,
        request: SurchargeRequest,
    ) -> Result<SurchargeOutcome, CartsServiceError> {
        self.authorize(session, token).await?;

        let product = {
            let store = self.store.read().await;

            let line = store
                .get_line(session, &request.line_key)
                .ok_or(CartsServiceError::LineNotFound)?;

            if !line.is_appointment() {
                return Err(CartsServiceError::NotAppointment);
            }

            line.product()
        };

        let table = self.products.get_price_table(product).await?;

        let (line, updated_total) = self
            .update_line(session, &request.line_key, |line| {
                match &request.duration {
                    DurationRequest::Preset(bucket) => line.apply_preset(&table, *bucket)?,
                    DurationRequest::Hours(amount) => {
                        line.apply_free_form(&table, parse_free_form(amount, TimeUnit::Hours)?)?
                    }
                    DurationRequest::Minutes(amount) => {
                        line.apply_free_form(&table, parse_free_form(amount, TimeUnit::Minutes)?)?
                    }
                };

                Ok(())
            })
            .await?;

        let selection = line.selection();

        let span = Span::current();

        span.record("additional_minutes", selection.additional_minutes());
        span.record(
            "additional_cost",
            tracing::field::display(selection.additional_cost()),
        );

        if let Some(quoted) = request.quoted_cost.as_deref()
            && parse_non_negative(quoted) != Some(selection.additional_cost())
        {
            warn!(
                line_key = %request.line_key,
                quoted,
                computed = %selection.additional_cost(),
                "quoted additional cost differs from computed cost"
            );
        }

        info!(line_key = %request.line_key, "applied surcharge");

        Ok(SurchargeOutcome {
            additional_minutes: selection.additional_minutes(),
            additional_cost: selection.additional_cost(),
            updated_total,
        })
    }

    #[tracing::instrument(
        name = "carts.service.reset_line",
        skip(self, token),
        fields(session = %session, line_key = %line_key),
        err
    )]
    async fn reset_line(
        &self,
        session: SessionUuid,
        token: &str,
        line_key: &LineKey,
    ) -> Result<Decimal, CartsServiceError> {
        self.authorize(session, token).await?;

        let (_, updated_total) = self
            .update_line(session, line_key, |line| {
                line.reset();

                Ok(())
            })
            .await?;

        info!(line_key = %line_key, "reset cart line");

        Ok(updated_total)
    }

    #[tracing::instrument(
        name = "carts.service.toggle_no_customization",
        skip(self, token),
        fields(session = %session, line_key = %line_key, enabled),
        err
    )]
    async fn toggle_no_customization(
        &self,
        session: SessionUuid,
        token: &str,
        line_key: &LineKey,
        enabled: bool,
    ) -> Result<Decimal, CartsServiceError> {
        self.authorize(session, token).await?;

        let (_, updated_total) = self
            .update_line(session, line_key, |line| {
                if !line.is_appointment() {
                    return Err(CartsServiceError::NotAppointment);
                }

                line.toggle_no_customization(enabled);

                Ok(())
            })
            .await?;

        Ok(updated_total)
    }

    async fn drop_carts(&self, sessions: &[SessionUuid]) -> usize {
        self.store.write().await.remove_carts(sessions)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Adds a product to the session's cart.
    async fn add_line(
        &self,
        session: SessionUuid,
        token: &str,
        line: NewCartLine,
    ) -> Result<CartLine, CartsServiceError>;

    /// Retrieve the session's cart.
    async fn get_cart(&self, session: SessionUuid) -> Result<Cart, CartsServiceError>;

    /// Removes a line, returning the updated cart total.
    async fn remove_line(
        &self,
        session: SessionUuid,
        token: &str,
        line_key: &LineKey,
    ) -> Result<Decimal, CartsServiceError>;

    /// Applies a preset or free-form duration to an appointment line.
    async fn apply_surcharge(
        &self,
        session: SessionUuid,
        token: &str,
        request: SurchargeRequest,
    ) -> Result<SurchargeOutcome, CartsServiceError>;

    /// Clears a line's surcharge, returning the updated cart total.
    async fn reset_line(
        &self,
        session: SessionUuid,
        token: &str,
        line_key: &LineKey,
    ) -> Result<Decimal, CartsServiceError>;

    /// Mutes or unmutes a line's surcharge, returning the updated cart total.
    async fn toggle_no_customization(
        &self,
        session: SessionUuid,
        token: &str,
        line_key: &LineKey,
        enabled: bool,
    ) -> Result<Decimal, CartsServiceError>;

    /// Drops the carts of ended sessions, returning how many were dropped.
    async fn drop_carts(&self, sessions: &[SessionUuid]) -> usize;
}
