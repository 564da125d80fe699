//! Catalogue Config

use std::path::PathBuf;

use clap::Args;

/// Product catalogue settings.
#[derive(Debug, Args)]
pub struct CatalogConfig {
    /// Path to the YAML product catalogue
    #[arg(long, env = "CATALOG_PATH", default_value = "fixtures/catalog.yml")]
    pub catalog_path: PathBuf,
}
