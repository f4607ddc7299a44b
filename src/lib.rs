//! BauDash: construction-materials dashboard and envelope-thickness
//! calculator.
//!
//! The binary entry point lives in `main.rs`; the library exposes the data
//! layer and the thickness model so tests (and the doc examples) build
//! without linking the windowed app.

pub mod app;
pub mod calc;
pub mod color;
pub mod data;
pub mod state;
pub mod ui;
