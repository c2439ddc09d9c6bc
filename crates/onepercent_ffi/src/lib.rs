//! Flutter bridge for the OnePercent journal core.

pub mod api;
