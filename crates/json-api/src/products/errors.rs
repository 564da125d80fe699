//! Product Errors

use salvo::http::StatusError;
use tracing::warn;

use appointime_app::domain::products::ProductsServiceError;

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        ProductsServiceError::NotAppointment => {
            StatusError::bad_request().brief("Product is not an appointment")
        }
        ProductsServiceError::InvalidPrice(source) => {
            warn!("rejected price table edit: {source}");

            StatusError::bad_request().brief("Invalid price")
        }
    }
}
