//! LaTeX templates for each section.
//!
//! All functions here are pure: a typed document goes in, markup comes out.

use crate::domain::model::{
    EducationDoc, ExperienceDoc, Fragment, LanguagesDoc, PositionEntry, ProjectsDoc,
    SectionDocument, SkillsDoc, SkipReason, SummaryDoc,
};

/// Escapes the characters LaTeX treats specially in running text.
///
/// Single pass, so the braces of `\textbackslash{}` are never escaped again.
pub fn latex_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '%' => out.push_str("\\%"),
            '&' => out.push_str("\\&"),
            '#' => out.push_str("\\#"),
            '_' => out.push_str("\\_"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '$' => out.push_str("\\$"),
            other => out.push(other),
        }
    }
    out
}

pub fn render_document(document: &SectionDocument) -> Result<Fragment, SkipReason> {
    let content = match document {
        SectionDocument::Summary(doc) => render_summary(doc),
        SectionDocument::Experience(doc) => render_experience(doc),
        SectionDocument::Education(doc) => render_education(doc),
        SectionDocument::Projects(doc) => render_projects(doc),
        SectionDocument::Skills(doc) => render_skills(doc),
        SectionDocument::Languages(doc) => render_languages(doc),
    };

    if content.trim().is_empty() {
        return Err(SkipReason::EmptyContent);
    }

    Ok(Fragment {
        section: document.section(),
        content,
    })
}

/// The summary is author-controlled markup and is inserted verbatim.
pub fn render_summary(doc: &SummaryDoc) -> String {
    format!(
        "\\cvsection{{ABOUT ME}}\n\n\\begin{{cvparagraph}}\n  {}\n\\end{{cvparagraph}}\n",
        doc.summary
    )
}

fn bullets(items: &[String], indent: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}\\item {{{}}}", indent, latex_escape(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn position_entry(entry: &PositionEntry) -> String {
    format!(
        "    \\cventry\n        {{{}}}\n        {{{}}}\n        {{{}}}\n        {{{}}}\n        {{\n            \\begin{{cvitems}}\n{}\n            \\end{{cvitems}}\n        }}",
        latex_escape(&entry.title),
        latex_escape(&entry.company),
        latex_escape(&entry.location),
        latex_escape(&entry.dates),
        bullets(&entry.items, "                ")
    )
}

fn entries_block(header: &str, entries: &[String]) -> String {
    format!(
        "\\cvsection{{{}}}\n\n\\begin{{cventries}}\n\n{}\n\n\\end{{cventries}}\n",
        header,
        entries.join("\n\n")
    )
}

pub fn render_experience(doc: &ExperienceDoc) -> String {
    let positions: Vec<String> = doc.positions.iter().map(position_entry).collect();
    let mut tex = entries_block("PROFESSIONAL EXPERIENCE", &positions);

    if !doc.internships.is_empty() {
        let internships: Vec<String> = doc.internships.iter().map(position_entry).collect();
        tex.push('\n');
        tex.push_str(&entries_block("INTERNSHIPS", &internships));
    }

    tex
}

pub fn render_education(doc: &EducationDoc) -> String {
    let schools: Vec<String> = doc
        .schools
        .iter()
        .map(|school| {
            format!(
                "  \\cventry\n    {{{}}} \n    {{{}}} \n    {{{}}} \n    {{{}}} \n    {{\n      \\begin{{cvitems}}\n{}\n      \\end{{cvitems}}\n    }}",
                latex_escape(&school.degree),
                latex_escape(&school.institution),
                latex_escape(&school.location),
                latex_escape(&school.dates),
                bullets(&school.items, "        ")
            )
        })
        .collect();

    entries_block("EDUCATION", &schools)
}

pub fn render_projects(doc: &ProjectsDoc) -> String {
    let projects: Vec<String> = doc
        .projects
        .iter()
        .map(|project| {
            let tech = latex_escape(&project.tech.join(", "));
            // The address is literal; only the visible label is escaped.
            let link = match project.url.as_deref() {
                Some(url) => {
                    let label = project.url_label.as_deref().unwrap_or(url);
                    format!("\\href{{{}}}{{{}}}", url, latex_escape(label))
                }
                None => String::new(),
            };

            format!(
                "  \\cvproject\n    {{{}}}\n    {{{}}}\n    {{\n      \\begin{{cvitems}}\n{}\n      \\end{{cvitems}}\n    }}\n    {{{}}}\n    {{{}}}",
                latex_escape(&project.name),
                latex_escape(&project.subtitle),
                bullets(&project.items, "        "),
                tech,
                link
            )
        })
        .collect();

    entries_block("PROJECTS", &projects)
}

pub fn render_skills(doc: &SkillsDoc) -> String {
    let rows = doc
        .skills
        .iter()
        .map(|group| {
            format!(
                "        \\cvskill {{{}}} {{{}}}",
                latex_escape(&group.category),
                latex_escape(&group.items.join(", "))
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\\cvsection{{SKILLS}}\n    \\begin{{cvskills}}\n{}\n\\end{{cvskills}}\n",
        rows
    )
}

pub fn render_languages(doc: &LanguagesDoc) -> String {
    let rows = doc
        .languages
        .iter()
        .map(|language| {
            format!(
                "  \\cvskill\n    {{{}}}\n    {{{}}}",
                latex_escape(&language.name),
                latex_escape(&language.level)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "\\cvsection{{LANGUAGES}}\n\n\\begin{{cvskills}}\n\n{}\n\n\\end{{cvskills}}\n",
        rows
    )
}
