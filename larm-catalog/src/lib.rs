//! # larm-catalog
//!
//! The stock event catalog for the arbitration engine: fixed alerts,
//! parametric generators and the context types they read, plus YAML
//! overlays for site-specific events.
//!
//! ### Key Submodules:
//! - `context`: static vehicle parameters and the per-tick live snapshot
//! - `generators`: pure functions building parametric alerts
//! - `stock`: the stock event table
//! - `overlay`: add-only YAML catalog extensions

use std::path::Path;

pub mod context;
pub mod generators;
pub mod overlay;
pub mod stock;

pub use context::{CarParams, LaneChange, LaneChangeAlert, LaneChangeDirection, LiveSnapshot, PandaType};
pub use overlay::{Overlay, OverlayError};
pub use stock::{stock_builder, stock_catalog, StockBuilder, StockCatalog};

/// Stock catalog with the optional overlay appended.
pub fn load_catalog(overlay: Option<&Path>) -> Result<StockCatalog, OverlayError> {
    let mut builder = stock_builder();
    if let Some(path) = overlay {
        Overlay::load(path)?.apply(&mut builder);
    }
    Ok(builder.build()?)
}
