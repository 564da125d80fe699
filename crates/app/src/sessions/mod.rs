//! Sessions and anti-forgery form tokens

pub mod errors;
pub mod records;
mod service;
pub mod token;

pub use errors::SessionsServiceError;
pub use service::*;
