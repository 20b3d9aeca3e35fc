//! Content renderer: turns one résumé section into the plain text the
//! content typewriter reveals.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use anyhow::{Result, bail};

use crate::document::{Education, Project, ResumeDocument, WorkExperience};

/// A navigable page of the résumé.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    About,
    Experience,
    Education,
    Skills,
    Projects,
    Contact,
}

impl Section {
    /// Sections in navigation order.
    pub const ALL: [Section; 6] = [
        Section::About,
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Projects,
        Section::Contact,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::About => "about",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::Contact => "contact",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Section::About => "About Me",
            Section::Experience => "Work Experience",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Projects => "Projects",
            Section::Contact => "Contact",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        match Section::ALL.into_iter().find(|section| section.name() == wanted) {
            Some(section) => Ok(section),
            None => bail!(
                "Unknown section '{s}' (expected one of: {})",
                Section::ALL.map(Section::name).join(", ")
            ),
        }
    }
}

/// Human label for a 1..=5 proficiency score.
pub fn proficiency_label(proficiency: u8) -> &'static str {
    match proficiency {
        1 => "basic",
        2 => "familiar",
        3 => "proficient",
        4 => "advanced",
        5 => "expert",
        _ => "unrated",
    }
}

/// Renders `section` of `doc` as plain text.
///
/// Always ends with a blank line so consecutive renders can be concatenated.
pub fn render(section: Section, doc: &ResumeDocument) -> String {
    format!("{}\n\n{}", section.heading(), render_body(section, doc))
}

/// Section text without its heading, ending with a blank line.
pub fn render_body(section: Section, doc: &ResumeDocument) -> String {
    let mut out = String::new();
    match section {
        Section::About => render_about(&mut out, doc),
        Section::Experience => render_list(&mut out, &doc.work_experience, render_job),
        Section::Education => render_list(&mut out, &doc.education, render_school),
        Section::Skills => render_skills(&mut out, doc),
        Section::Projects => render_list(&mut out, &doc.projects, render_project),
        Section::Contact => render_contact(&mut out, doc),
    }
    if !out.ends_with("\n\n") {
        out.push('\n');
    }
    out
}

/// `start - end`, with `present` for an open end. Empty when neither is set.
fn date_range(start: &str, end: &str) -> String {
    match (start.is_empty(), end.is_empty()) {
        (true, true) => String::new(),
        (false, true) => format!("{start} - present"),
        (true, false) => end.to_string(),
        (false, false) => format!("{start} - {end}"),
    }
}

fn field(out: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        let _ = writeln!(out, "{label}: {value}");
    }
}

fn bullets(out: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{label}:");
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}

/// Joins non-empty parts with ` | `.
fn joined(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" | ")
}

fn render_list<T>(out: &mut String, items: &[T], entry: fn(&mut String, &T)) {
    if items.is_empty() {
        out.push_str("Nothing to show yet.\n");
        return;
    }
    for (i, item) in items.iter().enumerate() {
        let _ = write!(out, "{}. ", i + 1);
        entry(out, item);
        out.push('\n');
    }
}

fn render_about(out: &mut String, doc: &ResumeDocument) {
    let info = &doc.personal_info;
    field(out, "Name", &info.name);
    field(out, "Title", &info.title);
    field(out, "Location", &info.location);
    if !info.tagline.is_empty() {
        let _ = writeln!(out, "\n{}", info.tagline);
    }
}

fn render_job(out: &mut String, job: &WorkExperience) {
    let _ = writeln!(out, "{}", joined(&[&job.company, &job.location]));
    let dates = date_range(&job.start_date, &job.end_date);
    let _ = writeln!(out, "{}", joined(&[&job.position, &dates]));
    bullets(out, "Highlights", &job.highlights);
}

fn render_school(out: &mut String, school: &Education) {
    let dates = date_range(&school.start_date, &school.end_date);
    let _ = writeln!(
        out,
        "{}",
        joined(&[&school.institution, &school.degree, &school.major, &dates])
    );
    field(out, "Location", &school.location);
    bullets(out, "Achievements", &school.achievements);
}

fn render_project(out: &mut String, project: &Project) {
    let _ = writeln!(out, "{}", project.name);
    let dates = date_range(&project.start_date, &project.end_date);
    let meta = joined(&[&project.role, &dates]);
    if !meta.is_empty() {
        let _ = writeln!(out, "{meta}");
    }
    if !project.description.is_empty() {
        let _ = writeln!(out, "{}", project.description);
    }
    if !project.technologies.is_empty() {
        let _ = writeln!(out, "Technologies: {}", project.technologies.join(", "));
    }
    bullets(out, "Outcomes", &project.outcomes);
}

fn render_skills(out: &mut String, doc: &ResumeDocument) {
    if doc.skills.is_empty() {
        out.push_str("Nothing to show yet.\n");
        return;
    }
    for (category, skills) in doc.skills.categories() {
        let _ = writeln!(out, "{category}:");
        for skill in skills {
            let _ = writeln!(
                out,
                "- {} ({})",
                skill.name,
                proficiency_label(skill.proficiency)
            );
        }
        out.push('\n');
    }
}

fn render_contact(out: &mut String, doc: &ResumeDocument) {
    let info = &doc.personal_info;
    field(out, "Email", &info.email);
    field(out, "Phone", &info.phone);
    field(out, "Location", &info.location);
    for link in &info.social_links {
        field(out, &link.platform, &link.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Skill, SocialLink};

    fn sample() -> ResumeDocument {
        let mut doc = ResumeDocument::fallback();
        doc.personal_info.location = "Wuhan".to_string();
        doc.personal_info.social_links = vec![SocialLink {
            platform: "GitHub".to_string(),
            url: "https://github.com/becky".to_string(),
        }];
        doc.work_experience = vec![WorkExperience {
            company: "Economics Society".to_string(),
            position: "Deputy Head".to_string(),
            start_date: "2024-09".to_string(),
            highlights: vec!["Ran seminars".to_string(), "Star of the Year".to_string()],
            ..WorkExperience::default()
        }];
        doc.skills.design = vec![Skill {
            name: "Axure".to_string(),
            proficiency: 3,
        }];
        doc
    }

    #[test]
    fn test_section_parse_and_display() {
        assert_eq!("Skills".parse::<Section>().unwrap(), Section::Skills);
        assert_eq!(" contact ".parse::<Section>().unwrap(), Section::Contact);
        assert_eq!(Section::Projects.to_string(), "projects");
        let err = "hobbies".parse::<Section>().unwrap_err();
        assert!(err.to_string().contains("about, experience"));
    }

    #[test]
    fn test_render_about() {
        let text = render(Section::About, &sample());
        assert!(text.starts_with("About Me\n\n"));
        assert!(text.contains("Name: Becky\n"));
        assert!(text.contains("Location: Wuhan\n"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_render_experience_numbered_with_open_date_range() {
        let text = render(Section::Experience, &sample());
        assert!(text.contains("1. Economics Society\n"));
        assert!(text.contains("Deputy Head | 2024-09 - present\n"));
        assert!(text.contains("Highlights:\n- Ran seminars\n- Star of the Year\n"));
    }

    #[test]
    fn test_render_empty_list_placeholder() {
        let text = render(Section::Projects, &ResumeDocument::fallback());
        assert_eq!(text, "Projects\n\nNothing to show yet.\n\n");
    }

    #[test]
    fn test_render_skills_with_labels() {
        let text = render(Section::Skills, &sample());
        assert!(text.contains("Design:\n- Axure (proficient)\n"));
        assert!(!text.contains("Development:"));
    }

    #[test]
    fn test_render_contact_includes_links() {
        let text = render(Section::Contact, &sample());
        assert!(text.contains("Email: contact@example.com\n"));
        assert!(text.contains("GitHub: https://github.com/becky\n"));
    }

    #[test]
    fn test_render_is_deterministic_for_all_sections() {
        let doc = sample();
        for section in Section::ALL {
            assert_eq!(render(section, &doc), render(section, &doc));
            assert!(render(section, &doc).ends_with("\n\n"));
        }
    }

    #[test]
    fn test_body_is_render_without_heading() {
        let doc = sample();
        let body = render_body(Section::Skills, &doc);
        assert!(body.starts_with("Design:\n"));
        assert_eq!(render(Section::Skills, &doc), format!("Skills\n\n{body}"));
    }

    #[test]
    fn test_date_range_variants() {
        assert_eq!(date_range("", ""), "");
        assert_eq!(date_range("2020", ""), "2020 - present");
        assert_eq!(date_range("", "2021"), "2021");
        assert_eq!(date_range("2020", "2021"), "2020 - 2021");
    }

    #[test]
    fn test_proficiency_labels() {
        assert_eq!(proficiency_label(1), "basic");
        assert_eq!(proficiency_label(5), "expert");
        assert_eq!(proficiency_label(0), "unrated");
    }
}
