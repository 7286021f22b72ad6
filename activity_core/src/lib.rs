//! # Activity Core
//!
//! The engine behind browser-hosted learning activities. This crate
//! drives the data model in `activity_rules` through the full activity
//! lifecycle: setup and state restoration, user interaction, validation,
//! and reset.
//!
//! ## Core Components
//!
//! - **persistence**: namespaced key-value store for per-activity state
//! - **matching**: couples the board to persistence and the view
//! - **validation**: per-kind comparison against the answer key
//! - **lifecycle**: page preparation, submit binding, and reset
//! - **collaborators**: seams for translation, sound, tracking, and
//!   navigation implemented by the host page
//! - **view**: projection seam the rendering layer subscribes to
//!
//! ## Design Philosophy
//!
//! - **Model-first**: placement state lives in memory; the rendering
//!   layer is a projection of it, never the source of truth
//! - **Lock-step persistence**: model mutation and the persisted write
//!   happen in the same call, so no torn state is observable
//! - **Degrade, never fail**: missing targets, corrupt persisted data,
//!   and unknown activity kinds log and no-op; nothing here is fatal to
//!   the page

pub mod collaborators;
pub mod error;
pub mod lifecycle;
pub mod matching;
pub mod persistence;
pub mod section;
pub mod validation;
pub mod view;

pub use collaborators::*;
pub use error::*;
pub use lifecycle::*;
pub use matching::*;
pub use persistence::*;
pub use section::*;
pub use validation::*;
pub use view::*;
