//! Date- and season-filtered air quality summaries.
//!
//! A [`Dataset`](data::Dataset) is loaded once and shared read-only; each
//! change of [`FilterCriteria`](data::FilterCriteria) recomputes a
//! [`DashboardView`](view::DashboardView) holding the data behind every
//! dashboard panel.

pub mod config;
pub mod data;
pub mod state;
pub mod view;

pub use state::DashboardState;
pub use view::DashboardView;
