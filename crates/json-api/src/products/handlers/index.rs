//! Product Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use appointime::{money::format_amount, products::Product};

use crate::{extensions::*, state::State};

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// Product id
    pub id: u64,

    /// Display name
    pub name: String,

    /// `appointment` or `standard`
    pub kind: String,

    /// Unit price, or the base 30 minute price of an appointment
    pub price: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let kind = if product.is_appointment() {
            "appointment"
        } else {
            "standard"
        };

        Self {
            id: product.id().get(),
            price: format_amount(product.price()),
            name: product.name().to_string(),
            kind: kind.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The list of products
    pub products: Vec<ProductResponse>,
}

/// Product Index Handler
///
/// Returns the catalogue.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = state
        .app
        .products
        .list_products()
        .await
        .or_500("failed to fetch products")?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use appointime::{
        products::{ProductId, ProductKind},
        table::DurationPriceTable,
    };
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use appointime_app::domain::products::MockProductsService;

    use crate::test_helpers::products_service;

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        products_service(products, Router::with_path("products").get(handler))
    }

    #[tokio::test]
    async fn test_index_returns_200() -> TestResult {
        let massage = Product::new(
            ProductId::new(101),
            "Deep Tissue Massage",
            ProductKind::Appointment(DurationPriceTable::new(Decimal::from(50))?),
        );

        let gift_card = Product::new(
            ProductId::new(201),
            "Gift Card",
            ProductKind::Standard {
                price: Decimal::from(25),
            },
        );

        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .return_once(move || Ok(vec![massage, gift_card]));

        let mut res = TestClient::get("http://example.com/products")
            .send(&make_service(products))
            .await;

        let body: ProductsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.products.len(), 2);

        let first = body.products.first().ok_or("missing first product")?;
        let last = body.products.last().ok_or("missing last product")?;

        assert_eq!(first.kind, "appointment");
        assert_eq!(first.price, "$50.00");
        assert_eq!(last.kind, "standard");
        assert_eq!(last.name, "Gift Card");

        Ok(())
    }
}
