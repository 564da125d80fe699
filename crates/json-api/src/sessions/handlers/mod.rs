//! Session Handlers

pub(crate) mod create;
