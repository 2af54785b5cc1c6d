//! Logging target shared by every event the crate emits through `tracing`.

pub(crate) const LOG_TARGET: &str = "spooky_wide_row";
