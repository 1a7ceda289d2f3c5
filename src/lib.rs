//! Cost estimation worksheet for CRO project proposals.
//!
//! Rows of (activity, sub-activity, band, hours, margin) are priced as
//! `hours * rate(band) * (1 + margin)`, rolled up by activity and exported
//! as CSV. The [`store::Worksheet`] holds one session's rows; [`cost`] and
//! [`export`] are pure functions over them.

pub mod api;
pub mod catalog;
pub mod config;
pub mod cost;
pub mod error;
pub mod export;
pub mod models;
pub mod render;
pub mod store;
