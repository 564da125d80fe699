//! Products service errors.

use appointime::table::PriceTableError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductsServiceError {
    #[error("product not found")]
    NotFound,

    #[error("product is not an appointment")]
    NotAppointment,

    #[error("invalid price value")]
    InvalidPrice(#[from] PriceTableError),
}
