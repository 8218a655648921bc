//! Catalog source selection.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Default, Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CatalogConfig {
    /// YAML overlay appended to the stock catalog.
    #[serde(default)]
    pub overlay: Option<PathBuf>,
}
