//! App Router

use salvo::Router;

use crate::{admin, carts, healthcheck, products, sessions};

pub fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("sessions").post(sessions::create::handler))
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(
                    Router::with_path("{product}")
                        .push(Router::with_path("presets").get(products::presets::handler))
                        .push(
                            Router::with_path("price-table")
                                .hoop(admin::middleware::handler)
                                .get(products::price_table::get::handler)
                                .put(products::price_table::update::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("cart")
                .hoop(sessions::middleware::handler)
                .get(carts::get::handler)
                .push(
                    Router::with_path("lines")
                        .post(carts::lines::create::handler)
                        .push(Router::with_path("{line_key}").delete(carts::lines::delete::handler)),
                )
                .push(Router::with_path("surcharge").post(carts::surcharge::handler))
                .push(Router::with_path("reset").post(carts::reset::handler))
                .push(Router::with_path("no-customization").post(carts::no_customization::handler)),
        )
}
