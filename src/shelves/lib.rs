//! # Shelves Architecture
//!
//! Shelves keeps a personal book catalog and a reading log as two CSV tables
//! and keeps the catalog's derived columns (times read, average rating) in
//! step with the log. It is a library first; the `shelves` binary is one
//! client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prompts on the terminal, prints tables │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Update sessions, init, view, config, doctor              │
//! │  - Talks to the user only through the `Prompter` trait      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Domain (catalog.rs, reading_log.rs, sync.rs, model.rs)     │
//! │  - In-memory tables, validation, synchronization            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract DataStore trait                                 │
//! │  - CsvStore (production), InMemoryStore (testing)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward, code never writes to stdout or stderr and never
//! exits the process. Diagnostics go through `tracing`; the binary decides
//! where they end up.
//!
//! ## Testing
//!
//! Sessions are tested in `commands/*.rs` against `InMemoryStore` with a
//! scripted prompter. `CsvStore` is tested against temporary directories,
//! and the binary end to end in `tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Sessions and one-shot commands
//! - [`catalog`]: The books table
//! - [`reading_log`]: The reading table
//! - [`sync`]: Derived-field synchronization
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Records, fields and value parsing
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod reading_log;
pub mod store;
pub mod sync;
