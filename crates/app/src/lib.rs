//! Shared application services: products, carts and sessions.

pub mod context;
pub mod domain;
pub mod sessions;

#[cfg(test)]
mod test;
