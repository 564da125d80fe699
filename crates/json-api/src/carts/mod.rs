//! Carts

pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod lines;

pub(crate) use handlers::*;
