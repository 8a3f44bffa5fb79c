//! # Core Application Logic
//!
//! The chat client's business logic. It knows nothing about terminals or
//! HTTP clients.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • App (controller)     │
//!                    │  • Action (events)      │
//!                    │  • update() → Effect    │
//!                    │                         │
//!                    │  No network. No UI.     │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │    API     │
//!           │  Adapter   │              │ (reqwest)  │
//!           │ (ratatui)  │              │            │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `App`, the controller holding all client state
//! - [`action`]: `Action`, `Effect` and the `update()` reducer
//! - [`conversation`]: messages and the append-only history
//! - [`files`]: pending upload buffers and dropped-path parsing
//! - [`render`]: pure message-to-view conversion
//! - [`session`]: session id bootstrap and key/value storage
//! - [`export`]: export file naming and writing
//! - [`config`]: layered configuration

pub mod action;
pub mod config;
pub mod conversation;
pub mod export;
pub mod files;
pub mod render;
pub mod session;
pub mod state;
