pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, Section};
#[cfg(feature = "cli")]
use clap::Parser;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_SECTIONS_DIR: &str = "sections";

pub fn default_data_dir() -> &'static Path {
    Path::new(DEFAULT_DATA_DIR)
}

pub fn default_sections_dir() -> &'static Path {
    Path::new(DEFAULT_SECTIONS_DIR)
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "resume-gen")]
#[command(about = "Generate LaTeX resume sections from YAML data")]
pub struct CliConfig {
    /// Directory holding the YAML source documents [default: data]
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory the .tex fragments are written to [default: sections]
    #[arg(long)]
    pub sections_dir: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Delete the fragment of any section that was skipped")]
    pub remove_stale: bool,

    #[arg(long, help = "Show what would be generated without writing anything")]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn data_dir(&self) -> &Path {
        self.data_dir.as_deref().unwrap_or(default_data_dir())
    }

    fn sections_dir(&self) -> &Path {
        self.sections_dir
            .as_deref()
            .unwrap_or(default_sections_dir())
    }

    fn source_file(&self, section: Section) -> &str {
        section.default_source_file()
    }

    fn fragment_file(&self, section: Section) -> &str {
        section.default_fragment_file()
    }

    fn remove_stale(&self) -> bool {
        self.remove_stale
    }
}

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        crate::utils::validation::validate_path("--data-dir", self.data_dir())?;
        crate::utils::validation::validate_path("--sections-dir", self.sections_dir())?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["resume-gen"]);
        assert_eq!(config.data_dir(), Path::new("data"));
        assert_eq!(config.sections_dir(), Path::new("sections"));
        assert!(!config.remove_stale());
        assert_eq!(config.fragment_file(Section::Skills), "30-skills.tex");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_flags() {
        let config = CliConfig::parse_from([
            "resume-gen",
            "--data-dir",
            "cv/data",
            "--sections-dir",
            "cv/sections",
            "--remove-stale",
            "--dry-run",
        ]);
        assert_eq!(config.data_dir(), Path::new("cv/data"));
        assert_eq!(config.sections_dir(), Path::new("cv/sections"));
        assert!(config.remove_stale());
        assert!(config.dry_run);
    }

    fn directories<C: ConfigProvider>(config: &C) -> (&Path, &Path) {
        (config.data_dir(), config.sections_dir())
    }

    #[test]
    fn test_cli_directories_borrow_from_config() {
        let explicit = CliConfig {
            data_dir: Some(PathBuf::from("resume/data")),
            ..Default::default()
        };
        assert_eq!(
            directories(&explicit),
            (Path::new("resume/data"), Path::new("sections"))
        );
    }

    #[test]
    fn test_verbose_with_json_logs() {
        let config = CliConfig::parse_from(["resume-gen", "-v", "--log-json"]);
        assert!(config.verbose);
        assert!(config.log_json);
    }
}
