//! Product Handlers

pub(crate) mod index;
pub(crate) mod presets;
pub(crate) mod price_table;
