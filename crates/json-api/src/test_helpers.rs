//! Test helpers.

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use appointime::{
    cart::{Cart, CartLine, LineKey},
    products::ProductId,
};
use appointime_app::{
    context::AppContext,
    domain::{carts::MockCartsService, products::MockProductsService},
    sessions::{MockSessionsService, records::SessionUuid},
};

use crate::{sessions::middleware, state::State};

pub(crate) const TEST_SESSION: SessionUuid = SessionUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_FORM_TOKEN: &str =
    "ft_00000000000000000000000000000000.abababababababababababababababababababababababababababababababab";

pub(crate) const TEST_ADMIN_TOKEN: &str = "admin-secret";

pub(crate) const LINE_KEY: &str = "0191c0ffee";

/// A $50 appointment line under [`LINE_KEY`] and two $25 gift cards.
pub(crate) fn make_cart() -> Cart {
    let mut cart = Cart::new();

    cart.put_line(CartLine::appointment(
        LineKey::from(LINE_KEY),
        ProductId::new(101),
        Decimal::from(50),
    ));

    cart.put_line(CartLine::standard(
        LineKey::from("gift"),
        ProductId::new(201),
        Decimal::from(25),
        2,
    ));

    cart
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_add_line().never();
    carts.expect_get_cart().never();
    carts.expect_remove_line().never();
    carts.expect_apply_surcharge().never();
    carts.expect_reset_line().never();
    carts.expect_toggle_no_customization().never();
    carts.expect_drop_carts().never();

    carts
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_get_price_table().never();
    products.expect_put_price_table().never();
    products.expect_update_price_table().never();

    products
}

fn strict_sessions_mock() -> MockSessionsService {
    let mut sessions = MockSessionsService::new();

    sessions.expect_start_session().never();
    sessions.expect_verify_form_token().never();
    sessions.expect_purge_expired().never();

    sessions
}

pub(crate) fn strict_app_context() -> AppContext {
    AppContext {
        products: Arc::new(strict_products_mock()),
        carts: Arc::new(strict_carts_mock()),
        sessions: Arc::new(strict_sessions_mock()),
    }
}

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    State::new(AppContext {
        carts: Arc::new(carts),
        ..strict_app_context()
    })
    .into_shared()
}

pub(crate) fn state_with_products(products: MockProductsService) -> Arc<State> {
    State::new(AppContext {
        products: Arc::new(products),
        ..strict_app_context()
    })
    .with_admin_token(Some(TEST_ADMIN_TOKEN.to_string()))
    .into_shared()
}

pub(crate) fn state_with_sessions(sessions: MockSessionsService) -> Arc<State> {
    State::new(AppContext {
        sessions: Arc::new(sessions),
        ..strict_app_context()
    })
    .into_shared()
}

/// Cart routes behind the session middleware, as mounted by the server.
pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .hoop(middleware::handler)
            .push(route),
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_products(products)))
            .push(route),
    )
}

pub(crate) fn sessions_service(sessions: MockSessionsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_sessions(sessions)))
            .push(route),
    )
}
