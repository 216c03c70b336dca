//! Capture anything: one text box for notes, tasks, tracked values and more.
//!
//! Input such as `note hello`, `task buy milk` or `track sleep 7.5` is
//! classified by a prioritized chain of handlers, parsed into a generic row,
//! optionally saved (append `!save`) and answered with HTML fragments for an
//! [htmx](https://htmx.org) page.
//!
//! | Input | Kind | Stored as |
//! |-------|------|-----------|
//! | `note <text>` | note | summary, first URL as reference |
//! | `later <text>` | later | summary |
//! | `task <title>` | task | summary, `bool` = done |
//! | `track <category> <number> <notes>` | track | summary, `float`, content |
//! | `setting <key> <value>` | setting | summary = key, content = value |
//! | `remind <duration> <text>` | remind | in memory only |
//! | `js <code>` | javascript | summary |
//!
//! Dates (`2024-08`), `search`, arithmetic and `help` only answer, they
//! never store anything.
//!
//! # Modules
//!
//! - [`config`]: configuration from TOML and environment variables
//! - [`db`]: SQLite initialization, schema and migrations
//! - [`storage`]: the generic [`storage::Row`] and its queries
//! - [`handler`]: the handler chain, input pipeline and HTML renderers
//! - [`server`]: axum routes, namespace cookies and static files
//! - [`cli`]: export and stats commands

pub mod cli;
pub mod config;
pub mod db;
pub mod handler;
pub mod server;
pub mod storage;
