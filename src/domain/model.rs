use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::PathBuf;

/// One logical block of the final document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Summary,
    Experience,
    Education,
    Projects,
    Skills,
    Languages,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Summary,
        Section::Experience,
        Section::Education,
        Section::Projects,
        Section::Skills,
        Section::Languages,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::Summary => "summary",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Projects => "projects",
            Section::Skills => "skills",
            Section::Languages => "languages",
        }
    }

    /// Top-level key the source document must carry.
    pub fn required_key(self) -> &'static str {
        match self {
            Section::Summary => "summary",
            Section::Experience => "positions",
            Section::Education => "schools",
            Section::Projects => "projects",
            Section::Skills => "skills",
            Section::Languages => "languages",
        }
    }

    pub fn default_source_file(self) -> &'static str {
        match self {
            Section::Summary => "00-summary.yml",
            Section::Experience => "10-experience.yml",
            Section::Education => "20-education.yml",
            Section::Projects => "30-projects.yml",
            Section::Skills => "40-skills.yml",
            Section::Languages => "50-languages.yml",
        }
    }

    // Fragment numbering follows the include order of the document, not the data files.
    pub fn default_fragment_file(self) -> &'static str {
        match self {
            Section::Summary => "00-summary.tex",
            Section::Experience => "10-experience.tex",
            Section::Education => "50-education.tex",
            Section::Projects => "20-projects.tex",
            Section::Skills => "30-skills.tex",
            Section::Languages => "60-languages.tex",
        }
    }

    pub fn from_name(name: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummaryDoc {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExperienceDoc {
    pub positions: Vec<PositionEntry>,
    #[serde(default)]
    pub internships: Vec<PositionEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PositionEntry {
    #[serde(deserialize_with = "scalar_text")]
    pub title: String,
    #[serde(deserialize_with = "scalar_text")]
    pub company: String,
    #[serde(deserialize_with = "scalar_text")]
    pub location: String,
    #[serde(deserialize_with = "scalar_text")]
    pub dates: String,
    #[serde(deserialize_with = "scalar_list")]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EducationDoc {
    pub schools: Vec<SchoolEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchoolEntry {
    #[serde(deserialize_with = "scalar_text")]
    pub degree: String,
    #[serde(deserialize_with = "scalar_text")]
    pub institution: String,
    #[serde(deserialize_with = "scalar_text")]
    pub location: String,
    #[serde(deserialize_with = "scalar_text")]
    pub dates: String,
    #[serde(deserialize_with = "scalar_list")]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectsDoc {
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    #[serde(deserialize_with = "scalar_text")]
    pub name: String,
    #[serde(deserialize_with = "scalar_text")]
    pub subtitle: String,
    #[serde(deserialize_with = "scalar_list")]
    pub items: Vec<String>,
    #[serde(deserialize_with = "scalar_list")]
    pub tech: Vec<String>,
    #[serde(deserialize_with = "optional_scalar_text")]
    pub url: Option<String>,
    #[serde(rename = "urlLabel", deserialize_with = "optional_scalar_text")]
    pub url_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillsDoc {
    pub skills: Vec<SkillGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    #[serde(deserialize_with = "scalar_text")]
    pub category: String,
    #[serde(deserialize_with = "scalar_list")]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LanguagesDoc {
    pub languages: Vec<LanguageEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LanguageEntry {
    #[serde(deserialize_with = "scalar_text")]
    pub name: String,
    #[serde(deserialize_with = "scalar_text")]
    pub level: String,
}

/// A validated source document, tagged with the section it feeds.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionDocument {
    Summary(SummaryDoc),
    Experience(ExperienceDoc),
    Education(EducationDoc),
    Projects(ProjectsDoc),
    Skills(SkillsDoc),
    Languages(LanguagesDoc),
}

impl SectionDocument {
    pub fn section(&self) -> Section {
        match self {
            SectionDocument::Summary(_) => Section::Summary,
            SectionDocument::Experience(_) => Section::Experience,
            SectionDocument::Education(_) => Section::Education,
            SectionDocument::Projects(_) => Section::Projects,
            SectionDocument::Skills(_) => Section::Skills,
            SectionDocument::Languages(_) => Section::Languages,
        }
    }
}

/// Why a section produced no fragment in this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    DirectoryMissing(PathBuf),
    Absent,
    Unreadable(String),
    InvalidYaml(String),
    MissingKey(&'static str),
    WrongShape {
        key: &'static str,
        expected: &'static str,
    },
    EmptyValue(&'static str),
    InvalidEntry(String),
    EmptyContent,
}

impl SkipReason {
    /// Absence is the normal case for an optional document; everything else
    /// points at a problem in the data.
    pub fn is_malformed(&self) -> bool {
        !matches!(
            self,
            SkipReason::Absent | SkipReason::DirectoryMissing(_) | SkipReason::EmptyContent
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DirectoryMissing(path) => {
                write!(f, "directory {} does not exist", path.display())
            }
            SkipReason::Absent => f.write_str("source document is absent"),
            SkipReason::Unreadable(msg) => write!(f, "source document is unreadable: {}", msg),
            SkipReason::InvalidYaml(msg) => write!(f, "invalid YAML: {}", msg),
            SkipReason::MissingKey(key) => write!(f, "top-level key '{}' is missing", key),
            SkipReason::WrongShape { key, expected } => {
                write!(f, "top-level key '{}' is not a {}", key, expected)
            }
            SkipReason::EmptyValue(key) => write!(f, "top-level key '{}' is empty", key),
            SkipReason::InvalidEntry(msg) => write!(f, "invalid entry: {}", msg),
            SkipReason::EmptyContent => f.write_str("rendered content is empty"),
        }
    }
}

/// Raw text of one source document as read during extraction.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub section: Section,
    pub path: PathBuf,
    pub text: Result<String, SkipReason>,
}

/// Rendered markup for exactly one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub section: Section,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct SectionOutcome {
    pub section: Section,
    pub result: Result<Fragment, SkipReason>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub outcomes: Vec<SectionOutcome>,
}

impl TransformResult {
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn skipped(&self) -> impl Iterator<Item = (Section, &SkipReason)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|reason| (o.section, reason)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<(Section, SkipReason)>,
    pub removed: Vec<PathBuf>,
    pub failed: Vec<(Section, String)>,
}

impl GenerationReport {
    pub fn nothing_written(&self) -> bool {
        self.written.is_empty()
    }
}

fn scalar_to_text<E: serde::de::Error>(value: serde_yaml::Value) -> Result<String, E> {
    match value {
        serde_yaml::Value::Null => Ok(String::new()),
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => scalar_to_text(tagged.value),
        serde_yaml::Value::Sequence(_) => Err(E::custom("expected a scalar, found a sequence")),
        serde_yaml::Value::Mapping(_) => Err(E::custom("expected a scalar, found a mapping")),
    }
}

fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_to_text(serde_yaml::Value::deserialize(deserializer)?)
}

fn optional_scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = scalar_text(deserializer)?;
    Ok(if text.is_empty() { None } else { Some(text) })
}

fn scalar_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Vec<serde_yaml::Value>>::deserialize(deserializer)? {
        Some(values) => values.into_iter().map(scalar_to_text).collect(),
        None => Ok(Vec::new()),
    }
}
