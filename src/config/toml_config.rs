use crate::config::{DEFAULT_DATA_DIR, DEFAULT_SECTIONS_DIR};
use crate::core::{ConfigProvider, Section};
use crate::utils::error::{GenError, Result};
use crate::utils::validation::{self, Validate};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub paths: PathsConfig,
    pub generate: GenerateConfig,
    pub sections: BTreeMap<String, SectionFilesConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
    pub sections_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            sections_dir: PathBuf::from(DEFAULT_SECTIONS_DIR),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    pub remove_stale: bool,
}

/// Per-section override of the conventional file names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionFilesConfig {
    pub source: Option<String>,
    pub fragment: Option<String>,
}

impl TomlConfig {
    /// Loads and parses a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GenError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GenError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GenError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// CLI flags win over the file.
    #[cfg(feature = "cli")]
    pub fn apply_cli_overrides(&mut self, cli: &crate::config::CliConfig) {
        if let Some(data_dir) = &cli.data_dir {
            tracing::info!("🔧 data_dir overridden to: {}", data_dir.display());
            self.paths.data_dir = data_dir.clone();
        }
        if let Some(sections_dir) = &cli.sections_dir {
            tracing::info!("🔧 sections_dir overridden to: {}", sections_dir.display());
            self.paths.sections_dir = sections_dir.clone();
        }
        if cli.remove_stale {
            self.generate.remove_stale = true;
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("paths.data_dir", &self.paths.data_dir)?;
        validation::validate_path("paths.sections_dir", &self.paths.sections_dir)?;

        for (name, files) in &self.sections {
            let field = format!("sections.{}", name);
            if Section::from_name(name).is_none() {
                return Err(GenError::InvalidConfigValueError {
                    field,
                    value: name.clone(),
                    reason: format!(
                        "Unknown section. Valid sections: {}",
                        Section::ALL.map(Section::name).join(", ")
                    ),
                });
            }
            if let Some(source) = &files.source {
                validation::validate_file_extension(
                    &format!("{}.source", field),
                    source,
                    &["yml", "yaml"],
                )?;
            }
            if let Some(fragment) = &files.fragment {
                validation::validate_file_extension(
                    &format!("{}.fragment", field),
                    fragment,
                    &["tex"],
                )?;
            }
        }

        validation::validate_unique(
            "sections.*.fragment",
            Section::ALL.into_iter().map(|s| self.fragment_file(s)),
        )?;

        Ok(())
    }

    fn section_files(&self, section: Section) -> Option<&SectionFilesConfig> {
        self.sections.get(section.name())
    }
}

impl ConfigProvider for TomlConfig {
    fn data_dir(&self) -> &Path {
        &self.paths.data_dir
    }

    fn sections_dir(&self) -> &Path {
        &self.paths.sections_dir
    }

    fn source_file(&self, section: Section) -> &str {
        self.section_files(section)
            .and_then(|files| files.source.as_deref())
            .unwrap_or(section.default_source_file())
    }

    fn fragment_file(&self, section: Section) -> &str {
        self.section_files(section)
            .and_then(|files| files.fragment.as_deref())
            .unwrap_or(section.default_fragment_file())
    }

    fn remove_stale(&self) -> bool {
        self.generate.remove_stale
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[paths]
data_dir = "cv/data"
sections_dir = "cv/sections"

[generate]
remove_stale = true

[sections.projects]
fragment = "25-projects.tex"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.data_dir(), Path::new("cv/data"));
        assert_eq!(config.sections_dir(), Path::new("cv/sections"));
        assert!(config.remove_stale());
        assert_eq!(config.fragment_file(Section::Projects), "25-projects.tex");
        assert_eq!(config.source_file(Section::Projects), "30-projects.yml");
        assert_eq!(config.fragment_file(Section::Skills), "30-skills.tex");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.data_dir(), Path::new("data"));
        assert_eq!(config.sections_dir(), Path::new("sections"));
        assert!(!config.remove_stale());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RESUME_GEN_TEST_DATA_DIR", "/tmp/resume-data");

        let toml_content = r#"
[paths]
data_dir = "${RESUME_GEN_TEST_DATA_DIR}"
sections_dir = "${RESUME_GEN_TEST_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_dir(), Path::new("/tmp/resume-data"));
        assert_eq!(
            config.sections_dir(),
            Path::new("${RESUME_GEN_TEST_UNSET_VAR}")
        );

        std::env::remove_var("RESUME_GEN_TEST_DATA_DIR");
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let config = TomlConfig::from_toml_str("[sections.hobbies]\nsource = \"60-hobbies.yml\"\n")
            .unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, GenError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_bad_extensions_are_rejected() {
        let config =
            TomlConfig::from_toml_str("[sections.skills]\nsource = \"skills.json\"\n").unwrap();
        assert!(config.validate().is_err());

        let config =
            TomlConfig::from_toml_str("[sections.skills]\nfragment = \"skills.md\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_fragment_names_are_rejected() {
        let config =
            TomlConfig::from_toml_str("[sections.skills]\nfragment = \"00-summary.tex\"\n")
                .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_keys_fail_to_parse() {
        let err = TomlConfig::from_toml_str("[paths]\ndata = \"x\"\n").unwrap_err();
        assert!(matches!(err, GenError::ConfigValidationError { .. }));
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides() {
        let mut config = TomlConfig::from_toml_str("[paths]\ndata_dir = \"from-file\"\n").unwrap();
        let cli = crate::config::CliConfig {
            data_dir: Some(PathBuf::from("from-cli")),
            remove_stale: true,
            ..Default::default()
        };

        config.apply_cli_overrides(&cli);

        assert_eq!(config.data_dir(), Path::new("from-cli"));
        assert_eq!(config.sections_dir(), Path::new("sections"));
        assert!(config.remove_stale());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[paths]\nsections_dir = \"out/sections\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.sections_dir(), Path::new("out/sections"));
    }
}
