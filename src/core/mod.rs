//! # Core Application Logic
//!
//! This module contains the console's business logic: modes, surfaces,
//! the output sink and the command handlers. It knows nothing about any
//! specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (commands)    │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No UI. Effects only.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                ┌───────────────┴───────────────┐
//!                ▼                               ▼
//!         ┌────────────┐                  ┌────────────┐
//!         │    TUI     │                  │   Batch    │
//!         │  Adapter   │                  │   runner   │
//!         │ (ratatui)  │                  │  (--run)   │
//!         └────────────┘                  └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`controller`]: Mode transition, run dispatch, open and save
//! - [`mode`]: The closed set of language modes
//! - [`files`]: Extension table and save-name derivation
//! - [`surface`]: Editor surfaces and the layout they are shown in
//! - [`output`]: Output buffer and toast notifications
//! - [`preview`]: HTML document synthesis
//! - [`storage`]: Reading opened files and writing saves
//! - [`config`]: Settings with defaults → file → env → CLI precedence

pub mod action;
pub mod config;
pub mod controller;
pub mod files;
pub mod mode;
pub mod output;
pub mod preview;
pub mod state;
pub mod storage;
pub mod surface;
