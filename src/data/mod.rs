/// Data layer: the session table, the operations that write it, and CSV import.
///
/// Architecture:
/// ```text
///   Add / Clear          table widget edits        .csv import
///        │                       │                      │
///        │                       ▼                      ▼
///        │                ┌──────────┐           ┌──────────┐
///        │                │   edit    │           │  loader   │
///        │                └──────────┘           └──────────┘
///        ▼                       │ edited Table         │
///   ┌───────────────────────────────────────────────────────┐
///   │ store::Session   add / clear / apply → TableStore      │
///   └───────────────────────────────────────────────────────┘
///        │
///        ▼
///   crate::views (metrics, chart, export) – read-only
/// ```

pub mod edit;
pub mod loader;
pub mod model;
pub mod store;
pub mod timestamp;
