//! Sessions

pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod middleware;
pub(crate) mod sweeper;

pub(crate) use handlers::*;
