//! egui rendering.  Everything here reads `AppState` and draws; chart data
//! comes ready-made from `analysis::dispatch`.

pub mod charts;
pub mod pages;
pub mod panels;
pub mod table;
