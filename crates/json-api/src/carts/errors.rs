//! Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use appointime::surcharge::SurchargeError;
use appointime_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::LineNotFound => StatusError::not_found().brief("Cart line not found"),
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CartsServiceError::Unauthorized(source) => {
            warn!("cart mutation rejected: {source}");

            StatusError::unauthorized().brief("Invalid or expired form token")
        }
        CartsServiceError::NotAppointment => {
            StatusError::bad_request().brief("Cart line is not an appointment")
        }
        CartsServiceError::Surcharge(source) => surcharge_status_error(&source),
        CartsServiceError::Totals(source) => {
            warn!("cart update rejected: {source}");

            StatusError::bad_request().brief("Cart total is out of range")
        }
        CartsServiceError::Products(source) => {
            error!("products service failed while updating cart: {source}");

            StatusError::internal_server_error()
        }
    }
}

fn surcharge_status_error(error: &SurchargeError) -> StatusError {
    match error {
        SurchargeError::PresetUnavailable(bucket) => StatusError::bad_request()
            .brief(format!("Duration preset {bucket} is not available for this product")),
        SurchargeError::InvalidDuration(_) => {
            StatusError::bad_request().brief("Invalid additional duration")
        }
        SurchargeError::ReferenceRateUnset => {
            warn!("free-form duration requested for a product without an hourly rate");

            StatusError::bad_request().brief("Custom durations are not available for this product")
        }
    }
}
