//! Carts

pub mod data;
pub mod errors;
mod repository;
pub mod service;

pub use errors::CartsServiceError;
pub use repository::MemoryCartStore;
pub use service::*;
