//! Products

pub mod data;
pub mod errors;
mod repository;
pub mod service;

pub use errors::ProductsServiceError;
pub use repository::MemoryProductsRepository;
pub use service::*;
