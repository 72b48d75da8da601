//! Shape checks that turn loosely typed YAML into a [`SectionDocument`].
//!
//! Renderers only ever see the typed documents produced here; every
//! problem with the input is reported as a [`SkipReason`] instead.

use crate::domain::model::{
    EducationDoc, ExperienceDoc, LanguagesDoc, ProjectsDoc, Section, SectionDocument, SkillsDoc,
    SkipReason, SummaryDoc,
};
use serde::de::DeserializeOwned;
use serde_yaml::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    Valid(SectionDocument),
    Malformed(SkipReason),
    Absent,
}

impl DocumentOutcome {
    pub fn into_result(self) -> Result<SectionDocument, SkipReason> {
        match self {
            DocumentOutcome::Valid(doc) => Ok(doc),
            DocumentOutcome::Malformed(reason) => Err(reason),
            DocumentOutcome::Absent => Err(SkipReason::Absent),
        }
    }
}

/// Validates the raw text of a section's source document.
pub fn validate_document(section: Section, text: &str) -> DocumentOutcome {
    let mut value: Value = match serde_yaml::from_str(text) {
        Ok(value) => value,
        Err(e) => return DocumentOutcome::Malformed(SkipReason::InvalidYaml(e.to_string())),
    };

    // `<<: *anchor` keys are only expanded on request.
    if let Err(e) = value.apply_merge() {
        return DocumentOutcome::Malformed(SkipReason::InvalidYaml(e.to_string()));
    }

    match validate_value(section, value) {
        Ok(doc) => DocumentOutcome::Valid(doc),
        Err(reason) => DocumentOutcome::Malformed(reason),
    }
}

pub fn validate_value(section: Section, mut value: Value) -> Result<SectionDocument, SkipReason> {
    let key = section.required_key();

    let required = value.get(key).ok_or(SkipReason::MissingKey(key))?;

    if section == Section::Summary {
        match required {
            Value::String(s) if s.is_empty() => return Err(SkipReason::EmptyValue(key)),
            Value::String(_) => {}
            Value::Null => return Err(SkipReason::EmptyValue(key)),
            _ => {
                return Err(SkipReason::WrongShape {
                    key,
                    expected: "string",
                })
            }
        }
    } else if !required.is_sequence() {
        return Err(SkipReason::WrongShape {
            key,
            expected: "sequence",
        });
    }

    // Internships are an optional add-on; a bad value drops them, not the section.
    if section == Section::Experience {
        if let Value::Mapping(map) = &mut value {
            let drop_internships = map
                .get("internships")
                .map(|v| !v.is_sequence())
                .unwrap_or(false);
            if drop_internships {
                tracing::debug!("Ignoring experience.internships: not a sequence");
                map.remove("internships");
            }
        }
    }

    Ok(match section {
        Section::Summary => SectionDocument::Summary(typed::<SummaryDoc>(value)?),
        Section::Experience => SectionDocument::Experience(typed::<ExperienceDoc>(value)?),
        Section::Education => SectionDocument::Education(typed::<EducationDoc>(value)?),
        Section::Projects => SectionDocument::Projects(typed::<ProjectsDoc>(value)?),
        Section::Skills => SectionDocument::Skills(typed::<SkillsDoc>(value)?),
        Section::Languages => SectionDocument::Languages(typed::<LanguagesDoc>(value)?),
    })
}

fn typed<T: DeserializeOwned>(value: Value) -> Result<T, SkipReason> {
    serde_yaml::from_value(value).map_err(|e| SkipReason::InvalidEntry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(section: Section, text: &str) -> SkipReason {
        match validate_document(section, text) {
            DocumentOutcome::Malformed(reason) => reason,
            other => panic!("expected malformed document, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_summary() {
        let outcome = validate_document(Section::Summary, "summary: Systems engineer.\n");
        assert_eq!(
            outcome,
            DocumentOutcome::Valid(SectionDocument::Summary(SummaryDoc {
                summary: "Systems engineer.".to_string()
            }))
        );
    }

    #[test]
    fn test_summary_requires_non_empty_string() {
        assert_eq!(
            reason(Section::Summary, "summary: \"\"\n"),
            SkipReason::EmptyValue("summary")
        );
        assert_eq!(
            reason(Section::Summary, "summary:\n"),
            SkipReason::EmptyValue("summary")
        );
        assert!(matches!(
            reason(Section::Summary, "summary: [a, b]\n"),
            SkipReason::WrongShape { key: "summary", .. }
        ));
    }

    #[test]
    fn test_missing_required_key() {
        for section in Section::ALL {
            assert_eq!(
                reason(section, "unrelated: true\n"),
                SkipReason::MissingKey(section.required_key())
            );
        }
    }

    #[test]
    fn test_required_key_with_wrong_shape() {
        for section in Section::ALL {
            let key = section.required_key();
            let expected = if section == Section::Summary {
                "string"
            } else {
                "sequence"
            };
            let text = if section == Section::Summary {
                format!("{}:\n  nested: true\n", key)
            } else {
                format!("{}: just a scalar\n", key)
            };
            assert_eq!(
                reason(section, &text),
                SkipReason::WrongShape { key, expected },
                "section {}",
                section
            );
        }
    }

    #[test]
    fn test_merge_keys_are_expanded() {
        let text = r#"
base: &base
  company: Acme
  location: Berlin
positions:
  - <<: *base
    title: Engineer
"#;
        let doc = validate_document(Section::Experience, text).into_result().unwrap();
        let SectionDocument::Experience(doc) = doc else {
            panic!("expected experience document");
        };
        let position = &doc.positions[0];
        assert_eq!(position.title, "Engineer");
        assert_eq!(position.company, "Acme");
        assert_eq!(position.location, "Berlin");
    }

    #[test]
    fn test_invalid_merge_value() {
        assert!(matches!(
            reason(Section::Skills, "skills:\n  - <<: not-a-mapping\n"),
            SkipReason::InvalidYaml(_)
        ));
    }

    #[test]
    fn test_top_level_not_a_mapping() {
        assert_eq!(
            reason(Section::Languages, "- English\n- German\n"),
            SkipReason::MissingKey("languages")
        );
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            reason(Section::Projects, "projects: [unterminated\n"),
            SkipReason::InvalidYaml(_)
        ));
    }

    #[test]
    fn test_entry_that_is_not_a_mapping() {
        assert!(matches!(
            reason(Section::Experience, "positions:\n  - just a string\n"),
            SkipReason::InvalidEntry(_)
        ));
    }

    #[test]
    fn test_nested_value_where_scalar_expected() {
        let text = "schools:\n  - degree: {name: BSc}\n";
        assert!(matches!(
            reason(Section::Education, text),
            SkipReason::InvalidEntry(_)
        ));
    }

    #[test]
    fn test_scalars_are_coerced_to_text() {
        let text = r#"
positions:
  - title: Engineer
    dates: 2021
    location: ~
    items: [1, true, "three"]
"#;
        let doc = validate_document(Section::Experience, text).into_result().unwrap();
        let SectionDocument::Experience(doc) = doc else {
            panic!("expected experience document");
        };
        let position = &doc.positions[0];
        assert_eq!(position.dates, "2021");
        assert_eq!(position.location, "");
        assert_eq!(position.company, "");
        assert_eq!(position.items, vec!["1", "true", "three"]);
    }

    #[test]
    fn test_internships_with_wrong_shape_are_ignored() {
        let text = r#"
positions:
  - title: Engineer
internships: none
"#;
        let doc = validate_document(Section::Experience, text).into_result().unwrap();
        let SectionDocument::Experience(doc) = doc else {
            panic!("expected experience document");
        };
        assert_eq!(doc.positions.len(), 1);
        assert!(doc.internships.is_empty());
    }

    #[test]
    fn test_project_url_fields() {
        let text = r#"
projects:
  - name: Tool
    url: https://example.com
    urlLabel: ""
  - name: Other
"#;
        let doc = validate_document(Section::Projects, text).into_result().unwrap();
        let SectionDocument::Projects(doc) = doc else {
            panic!("expected projects document");
        };
        assert_eq!(doc.projects[0].url.as_deref(), Some("https://example.com"));
        assert_eq!(doc.projects[0].url_label, None);
        assert_eq!(doc.projects[1].url, None);
        assert!(doc.projects[1].tech.is_empty());
    }

    #[test]
    fn test_absent_outcome_maps_to_absent_reason() {
        assert_eq!(
            DocumentOutcome::Absent.into_result(),
            Err(SkipReason::Absent)
        );
    }
}
