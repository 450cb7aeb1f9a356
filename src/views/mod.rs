/// Read-only derivations of the session table.
///
/// Each view is recomputed from the current table on every frame and reports
/// its own failures; nothing here writes back to the store.

pub mod chart;
pub mod export;
pub mod metrics;
