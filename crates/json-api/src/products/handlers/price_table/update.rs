//! Update Price Table Handler

use std::{collections::BTreeMap, sync::Arc};

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use appointime::{
    durations::{DurationBucket, DurationError},
    products::ProductId,
};
use appointime_app::domain::products::data::PriceTableUpdate;

use crate::{
    extensions::*,
    products::{errors::into_status_error, price_table::PriceTableResponse},
    state::State,
};

/// Update Price Table Request
///
/// Prices are decimal strings, with or without a leading `$`. A per-minute
/// rate re-derives the whole table before the other fields are applied.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct UpdatePriceTableRequest {
    pub per_minute_rate: Option<String>,
    pub base_price: Option<String>,
    pub hourly_rate: Option<String>,

    /// Bucket key to price, e.g. `{"2h": "110.00"}`
    pub prices: BTreeMap<String, String>,

    /// Bucket keys to make unavailable
    pub cleared: Vec<String>,
}

impl TryFrom<UpdatePriceTableRequest> for PriceTableUpdate {
    type Error = DurationError;

    fn try_from(request: UpdatePriceTableRequest) -> Result<Self, Self::Error> {
        Ok(PriceTableUpdate {
            per_minute_rate: request.per_minute_rate,
            base_price: request.base_price,
            hourly_rate: request.hourly_rate,
            prices: request
                .prices
                .into_iter()
                .map(|(key, price)| key.parse::<DurationBucket>().map(|bucket| (bucket, price)))
                .collect::<Result<_, _>>()?,
            cleared: request
                .cleared
                .iter()
                .map(|key| key.parse::<DurationBucket>())
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Update Price Table Handler
///
/// The edit is validated as a whole; on any invalid price nothing is stored.
#[endpoint(
    tags("admin"),
    summary = "Update Price Table",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Price table updated"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid admin token"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
#[tracing::instrument(
    name = "products.price_table.update",
    skip(product, json, depot),
    fields(
        product_id = tracing::field::Empty,
        bucket_count = tracing::field::Empty,
        cleared_count = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    product: PathParam<u64>,
    json: JsonBody<UpdatePriceTableRequest>,
    depot: &mut Depot,
) -> Result<Json<PriceTableResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = ProductId::new(product.into_inner());
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("product_id", tracing::field::display(product));
    span.record("bucket_count", request.prices.len());
    span.record("cleared_count", request.cleared.len());

    let update = PriceTableUpdate::try_from(request).or_400("Unknown duration bucket")?;

    let table = state
        .app
        .products
        .update_price_table(product, update)
        .await
        .map_err(into_status_error)?;

    tracing::info!(product_id = %product, "updated price table");

    Ok(Json(PriceTableResponse::new(product, &table)))
}

#[cfg(test)]
mod tests {
    use appointime::table::{DurationPriceTable, PriceTableError};
    use rust_decimal::Decimal;
    use salvo::{
        http::header::AUTHORIZATION,
        test::{ResponseExt, TestClient},
    };
    use serde_json::json;
    use testresult::TestResult;

    use appointime_app::domain::products::{MockProductsService, ProductsServiceError};

    use crate::{
        admin,
        test_helpers::{TEST_ADMIN_TOKEN, products_service},
    };

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        products_service(
            products,
            Router::with_path("products/{product}/price-table")
                .hoop(admin::middleware::handler)
                .put(handler),
        )
    }

    fn bearer() -> String {
        format!("Bearer {TEST_ADMIN_TOKEN}")
    }

    #[tokio::test]
    async fn test_per_minute_rate_update_returns_derived_table() -> TestResult {
        let table = DurationPriceTable::from_per_minute_rate(Decimal::ONE)?;

        let mut products = MockProductsService::new();

        products
            .expect_update_price_table()
            .once()
            .withf(|product, update| {
                *product == ProductId::new(101) && *update == PriceTableUpdate::per_minute_rate("1")
            })
            .return_once(move |_, _| Ok(table));

        let mut res = TestClient::put("http://example.com/products/101/price-table")
            .add_header(AUTHORIZATION, bearer(), true)
            .json(&json!({ "per_minute_rate": "1" }))
            .send(&make_service(products))
            .await;

        let body: PriceTableResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.prices.get("1h").map(String::as_str), Some("$60.00"));

        Ok(())
    }

    #[tokio::test]
    async fn test_bucket_prices_and_clears_are_forwarded() -> TestResult {
        let table = DurationPriceTable::new(Decimal::from(40))?;

        let mut products = MockProductsService::new();

        products
            .expect_update_price_table()
            .once()
            .withf(|_, update| {
                *update
                    == PriceTableUpdate {
                        prices: vec![(DurationBucket::TwoHours, "110.00".to_string())],
                        cleared: vec![DurationBucket::SixHours],
                        ..PriceTableUpdate::default()
                    }
            })
            .return_once(move |_, _| Ok(table));

        let res = TestClient::put("http://example.com/products/102/price-table")
            .add_header(AUTHORIZATION, bearer(), true)
            .json(&json!({ "prices": { "2h": "110.00" }, "cleared": ["6h"] }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_bucket_returns_400() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_update_price_table().never();

        let res = TestClient::put("http://example.com/products/101/price-table")
            .add_header(AUTHORIZATION, bearer(), true)
            .json(&json!({ "prices": { "30min": "10" } }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_price_returns_400() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_update_price_table()
            .once()
            .return_once(|_, _| {
                Err(ProductsServiceError::InvalidPrice(
                    PriceTableError::InvalidPrice("-5".to_string()),
                ))
            });

        let res = TestClient::put("http://example.com/products/101/price-table")
            .add_header(AUTHORIZATION, bearer(), true)
            .json(&json!({ "base_price": "-5" }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_admin_token_returns_401() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_update_price_table().never();

        let res = TestClient::put("http://example.com/products/101/price-table")
            .add_header(AUTHORIZATION, "Bearer nope", true)
            .json(&json!({ "per_minute_rate": "1" }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
