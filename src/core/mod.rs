//! # Core Application Logic
//!
//! This module contains the client's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  Backend   │      │   Export   │
//!     │  Adapter   │      │  Adapter   │      │  (files)   │
//!     │ (ratatui)  │      │ (reqwest)  │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct - all application state in one place
//! - [`action`]: The `Action` enum - everything that can happen in the app
//! - [`store`]: In-memory session collection (chat history)
//! - [`message`]: The conversation entry type
//! - [`export`]: Plain-text transcript files
//! - [`config`]: TOML config with env/CLI overrides

pub mod action;
pub mod config;
pub mod export;
pub mod message;
pub mod state;
pub mod store;
