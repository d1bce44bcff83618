//! Exploratory dashboard over a raw and a cleaned used-car listings table.
//!
//! * `data`     – table model, file loading, memoization, row filtering
//! * `analysis` – statistics, chart dispatch, page metrics and insights
//! * `ui`       – egui pages, panels and chart rendering

pub mod analysis;
pub mod app;
pub mod color;
pub mod config;
pub mod content;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
