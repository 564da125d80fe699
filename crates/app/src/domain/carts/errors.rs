//! Carts service errors.

use appointime::{money::AmountError, surcharge::SurchargeError};
use thiserror::Error;

use crate::{domain::products::ProductsServiceError, sessions::SessionsServiceError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartsServiceError {
    #[error("cart line not found")]
    LineNotFound,

    #[error("form token rejected")]
    Unauthorized(#[from] SessionsServiceError),

    #[error("product not found")]
    ProductNotFound,

    #[error("product is not an appointment")]
    NotAppointment,

    #[error(transparent)]
    Surcharge(#[from] SurchargeError),

    #[error("cart total is out of range")]
    Totals(#[from] AmountError),

    #[error("products service error")]
    Products(#[source] ProductsServiceError),
}

impl From<ProductsServiceError> for CartsServiceError {
    fn from(error: ProductsServiceError) -> Self {
        match error {
            ProductsServiceError::NotFound => Self::ProductNotFound,
            ProductsServiceError::NotAppointment => Self::NotAppointment,
            ProductsServiceError::InvalidPrice(_) => Self::Products(error),
        }
    }
}
