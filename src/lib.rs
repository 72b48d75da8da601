pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{etl::GeneratorEngine, pipeline::SectionPipeline, render::latex_escape};
pub use domain::model::{GenerationReport, Section, SkipReason};
pub use utils::error::{GenError, Result};

use crate::config::toml_config::PathsConfig;
use std::path::{Path, PathBuf};

/// Generates every section whose source document is present and well formed.
///
/// Returns the fragment paths written in this run. Missing directories and
/// skipped sections are not errors.
pub async fn generate(data_dir: &Path, sections_dir: &Path) -> Result<Vec<PathBuf>> {
    let config = TomlConfig {
        paths: PathsConfig {
            data_dir: data_dir.to_path_buf(),
            sections_dir: sections_dir.to_path_buf(),
        },
        ..Default::default()
    };

    let engine = GeneratorEngine::new(SectionPipeline::new(LocalStorage::new(), config));
    let report = engine.run().await?;
    Ok(report.written)
}
