//! Domain models for the cost worksheet.
//!
//! # Core Concepts
//!
//! - [`RateTable`]: Static hourly rate per [`BandLevel`], loaded once per process.
//! - [`LineItem`]: One worksheet row (activity, sub-activity, band, hours, margin).
//!   Cost is never stored on the row.
//! - [`CostedLineItem`]: A row paired with its derived total cost.
//! - [`ActivitySummary`]: Per-activity roll-up, recomputed on every read.
//!
//! ## Ephemeral Entities
//!
//! - [`SessionInfo`]: An editing session that owns one worksheet and is
//!   discarded when it ends.

mod band;
mod line_item;
mod session;
mod summary;

pub use band::*;
pub use line_item::*;
pub use session::*;
pub use summary::*;
