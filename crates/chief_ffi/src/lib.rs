//! Flutter-facing bindings for the Chief of Staff core.

pub mod api;
