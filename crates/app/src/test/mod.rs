//! Test support for service-level tests.

pub(crate) mod helpers;
