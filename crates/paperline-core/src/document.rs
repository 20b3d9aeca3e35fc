//! Résumé document model (the JSON shape served by the data source).

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub meta: Meta,
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Meta {
    pub site_title: String,
    pub site_description: String,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub tagline: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub avatar_url: String,
    pub social_links: Vec<SocialLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub major: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub design: Vec<Skill>,
    pub development: Vec<Skill>,
    pub other: Vec<Skill>,
}

impl Skills {
    /// Non-empty categories in display order.
    pub fn categories(&self) -> impl Iterator<Item = (&'static str, &[Skill])> {
        [
            ("Design", self.design.as_slice()),
            ("Development", self.development.as_slice()),
            ("Other", self.other.as_slice()),
        ]
        .into_iter()
        .filter(|(_, skills)| !skills.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.categories().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub name: String,
    /// 1 (basic) to 5 (expert); 0 when unrated.
    pub proficiency: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub name: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub outcomes: Vec<String>,
}

impl ResumeDocument {
    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: ResumeDocument = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Checks the fields every page depends on.
    pub fn validate(&self) -> Result<()> {
        if self.personal_info.name.trim().is_empty() {
            bail!("Missing required personal info field: name");
        }
        if self.personal_info.title.trim().is_empty() {
            bail!("Missing required personal info field: title");
        }
        Ok(())
    }

    /// Built-in document used when every source has failed.
    pub fn fallback() -> Self {
        Self {
            meta: Meta {
                site_title: "Becky's Resume".to_string(),
                site_description: "Personal resume of Becky, a Product Designer.".to_string(),
                last_updated: chrono::Local::now().format("%Y-%m-%d").to_string(),
            },
            personal_info: PersonalInfo {
                name: "Becky".to_string(),
                title: "Product Designer".to_string(),
                tagline: "Passionate about intuitive, delightful user experiences.".to_string(),
                location: "Unknown".to_string(),
                email: "contact@example.com".to_string(),
                phone: "+86 138 0000 0000".to_string(),
                avatar_url: String::new(),
                social_links: Vec::new(),
            },
            education: Vec::new(),
            work_experience: Vec::new(),
            skills: Skills::default(),
            projects: Vec::new(),
        }
    }

    /// Greeting typed on the title line.
    pub fn greeting(&self) -> String {
        format!("Hi, I'm {}!", self.personal_info.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "meta": { "siteTitle": "Site", "lastUpdated": "2024-05-01" },
        "personalInfo": {
            "name": "Becky",
            "title": "Product Designer",
            "socialLinks": [{ "platform": "GitHub", "url": "https://github.com/becky" }]
        },
        "workExperience": [{ "company": "Acme", "position": "Designer", "highlights": ["Shipped"] }],
        "skills": { "design": [{ "name": "Figma", "proficiency": 5 }] }
    }"#;

    #[test]
    fn test_parse_camel_case_document() {
        let doc = ResumeDocument::from_json(SAMPLE).unwrap();

        assert_eq!(doc.meta.last_updated, "2024-05-01");
        assert_eq!(doc.personal_info.social_links[0].platform, "GitHub");
        assert_eq!(doc.work_experience[0].highlights, vec!["Shipped"]);
        assert_eq!(doc.skills.design[0].proficiency, 5);
        assert!(doc.education.is_empty());
        assert!(doc.projects.is_empty());
    }

    #[test]
    fn test_missing_personal_info_fails_to_parse() {
        let err = ResumeDocument::from_json(r#"{ "meta": {} }"#).unwrap_err();
        assert!(err.to_string().contains("personalInfo"));
    }

    #[test]
    fn test_missing_name_fails_validation() {
        let json = r#"{ "meta": {}, "personalInfo": { "title": "Designer" } }"#;
        let err = ResumeDocument::from_json(json).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_missing_title_fails_validation() {
        let json = r#"{ "meta": {}, "personalInfo": { "name": "Becky", "title": "  " } }"#;
        let err = ResumeDocument::from_json(json).unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_fallback_is_valid() {
        let doc = ResumeDocument::fallback();
        assert!(doc.validate().is_ok());
        assert_eq!(doc.greeting(), "Hi, I'm Becky!");
        assert_eq!(doc.meta.last_updated.len(), "2024-01-01".len());
    }

    #[test]
    fn test_skill_categories_skip_empty() {
        let doc = ResumeDocument::from_json(SAMPLE).unwrap();
        let names: Vec<&str> = doc.skills.categories().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Design"]);
        assert!(Skills::default().is_empty());
    }
}
