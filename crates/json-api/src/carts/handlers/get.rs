//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use appointime::{
    cart::{Cart, CartLine, CartTotals},
    money::{AmountError, format_amount},
    storefront::{LineQuote, line_item_data},
};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The lines in the cart, in insertion order
    pub lines: Vec<CartLineResponse>,

    /// Cart totals
    pub totals: CartTotalsResponse,
}

impl TryFrom<Cart> for CartResponse {
    type Error = AmountError;

    fn try_from(cart: Cart) -> Result<Self, Self::Error> {
        Ok(Self {
            totals: cart.totals()?.into(),
            lines: cart
                .lines()
                .iter()
                .map(CartLineResponse::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    /// Key of the line, used by every line mutation
    pub line_key: String,

    /// Product id
    pub product: u64,

    /// Quantity; always 1 for appointments
    pub quantity: u32,

    /// Unit price, or the base 30 minute price of an appointment
    pub base_price: String,

    /// What the line contributes to the cart total
    pub total: String,

    /// Custom duration panel, for appointment lines
    pub quote: Option<LineQuoteResponse>,

    /// Metadata rows shown under the line
    pub item_data: Vec<ItemDataResponse>,
}

impl TryFrom<&CartLine> for CartLineResponse {
    type Error = AmountError;

    fn try_from(line: &CartLine) -> Result<Self, Self::Error> {
        let quote = if line.is_appointment() {
            Some(LineQuote::for_line(line)?.into())
        } else {
            None
        };

        Ok(Self {
            line_key: line.key().to_string(),
            product: line.product().get(),
            quantity: line.quantity(),
            base_price: format_amount(line.base_price()),
            total: format_amount(line.total()?),
            quote,
            item_data: line_item_data(line)
                .into_iter()
                .map(|(name, value)| ItemDataResponse {
                    name: name.to_string(),
                    value,
                })
                .collect(),
        })
    }
}

/// Line Quote Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LineQuoteResponse {
    pub session_duration: String,
    pub standard_package: String,
    pub additional_time: String,
    pub additional_cost: String,
    pub total: String,
}

impl From<LineQuote> for LineQuoteResponse {
    fn from(quote: LineQuote) -> Self {
        Self {
            session_duration: quote.session_duration,
            standard_package: format_amount(quote.standard_package),
            additional_time: quote.additional_time,
            additional_cost: format_amount(quote.additional_cost),
            total: format_amount(quote.total),
        }
    }
}

/// Item Data Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ItemDataResponse {
    pub name: String,
    pub value: String,
}

/// Cart Totals Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartTotalsResponse {
    /// Sum of the base contributions of every line
    pub base_total: String,

    /// Sum of the active surcharges
    pub surcharge_total: String,

    /// Shown as a separate cart row when positive
    pub additional_service_cost: Option<String>,

    /// Grand total
    pub total: String,
}

impl From<CartTotals> for CartTotalsResponse {
    fn from(totals: CartTotals) -> Self {
        Self {
            base_total: format_amount(totals.base_total),
            surcharge_total: format_amount(totals.surcharge_total),
            additional_service_cost: totals.additional_service_cost().map(format_amount),
            total: format_amount(totals.total),
        }
    }
}

/// Get Cart Handler
///
/// Returns the session's cart with line quotes and totals.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing session"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(session)
        .await
        .map_err(into_status_error)?;

    let cart = CartResponse::try_from(cart).map_err(|source| into_status_error(source.into()))?;

    Ok(Json(cart))
}

#[cfg(test)]
mod tests {
    use appointime::{cart::LineKey, durations::DurationBucket, table::DurationPriceTable};
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use appointime_app::domain::carts::MockCartsService;

    use crate::{
        sessions::middleware::SESSION_HEADER,
        test_helpers::{LINE_KEY, TEST_SESSION, carts_service, make_cart},
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_lines_and_totals() -> TestResult {
        let mut cart = make_cart();

        let line = cart
            .line_mut(&LineKey::from(LINE_KEY))
            .ok_or("missing appointment line")?;

        line.apply_preset(
            &DurationPriceTable::from_per_minute_rate(Decimal::ONE)?,
            DurationBucket::OneHour,
        )?;

        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .withf(|session| *session == TEST_SESSION)
            .return_once(move |_| Ok(cart));

        let mut res = TestClient::get("http://example.com/cart")
            .add_header(SESSION_HEADER, TEST_SESSION.to_string(), true)
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        let appointment = body.lines.first().ok_or("missing appointment line")?;
        let gift = body.lines.last().ok_or("missing gift line")?;
        let quote = appointment.quote.as_ref().ok_or("missing quote")?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(appointment.total, "$60.00");
        assert_eq!(quote.session_duration, "1 hour");
        assert_eq!(quote.additional_cost, "$60.00");
        assert!(gift.quote.is_none());
        assert_eq!(gift.total, "$50.00");
        assert_eq!(body.totals.total, "$110.00");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_without_session_returns_401() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_get_cart().never();

        let res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
