//! Full résumé export as a text or HTML document.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use anyhow::{Result, bail};
use chrono::NaiveDate;

use crate::document::ResumeDocument;
use crate::render::{Section, render_body};
use crate::segment::cluster_count;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Html,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Html => "html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Text => "text",
            ExportFormat::Html => "html",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "html" => Ok(ExportFormat::Html),
            _ => bail!("Unknown export format '{s}' (expected text or html)"),
        }
    }
}

/// Document title: the site title, or `<name>'s Resume`.
pub fn title(doc: &ResumeDocument) -> String {
    let site_title = doc.meta.site_title.trim();
    if site_title.is_empty() {
        format!("{}'s Resume", doc.personal_info.name)
    } else {
        site_title.to_string()
    }
}

/// Every section in navigation order as one document.
pub fn export(doc: &ResumeDocument, format: ExportFormat) -> String {
    match format {
        ExportFormat::Text => export_text(doc),
        ExportFormat::Html => export_html(doc),
    }
}

/// `<name>_full_<YYYY_MM_DD>.<ext>`, with the name reduced to lowercase
/// ASCII letters, digits and underscores.
pub fn file_name(doc: &ResumeDocument, format: ExportFormat, date: NaiveDate) -> String {
    let mut stem = String::new();
    for c in doc.personal_info.name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }
    let stem = stem.trim_matches('_');
    let stem = if stem.is_empty() { "resume" } else { stem };
    format!(
        "{stem}_full_{}.{}",
        date.format("%Y_%m_%d"),
        format.extension()
    )
}

fn underline(text: &str, mark: char) -> String {
    std::iter::repeat_n(mark, cluster_count(text)).collect()
}

fn export_text(doc: &ResumeDocument) -> String {
    let title = title(doc);
    let mut out = format!("{title}\n{}\n\n", underline(&title, '='));
    for section in Section::ALL {
        let heading = section.heading();
        let _ = write!(
            out,
            "{heading}\n{}\n\n{}\n",
            underline(heading, '-'),
            render_body(section, doc)
        );
    }
    out
}

fn export_html(doc: &ResumeDocument) -> String {
    let title = escape_html(&title(doc));
    let mut out = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n"
    );
    for section in Section::ALL {
        let _ = write!(
            out,
            "<h2>{}</h2>\n<pre>{}</pre>\n",
            escape_html(section.heading()),
            escape_html(render_body(section, doc).trim_end())
        );
    }
    out.push_str("</body>\n</html>\n");
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> ResumeDocument {
        let mut doc = ResumeDocument::fallback();
        doc.meta.site_title = "Becky's Résumé".to_string();
        doc
    }

    #[test]
    fn test_text_title_and_headings_are_underlined() {
        let text = export(&doc(), ExportFormat::Text);

        assert!(text.starts_with("Becky's Résumé\n==============\n\n"));
        assert!(text.contains("Work Experience\n---------------\n\n"));
        assert!(text.contains("Name: Becky\n"));
    }

    #[test]
    fn test_text_sections_in_navigation_order() {
        let text = export(&doc(), ExportFormat::Text);
        let positions: Vec<usize> = Section::ALL
            .iter()
            .map(|section| text.find(&format!("{}\n-", section.heading())).unwrap())
            .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_html_escapes_content() {
        let mut doc = doc();
        doc.personal_info.tagline = "<b>bold</b> & more".to_string();

        let html = export(&doc, ExportFormat::Html);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Becky&#39;s Résumé</h1>"));
        assert!(html.contains("<h2>About Me</h2>\n<pre>Name: Becky"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; &amp; more"));
        assert_eq!(html.matches("<h2>").count(), Section::ALL.len());
    }

    #[test]
    fn test_title_falls_back_to_name() {
        let mut doc = doc();
        doc.meta.site_title = "  ".to_string();
        assert_eq!(title(&doc), "Becky's Resume");
    }

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let mut doc = doc();

        assert_eq!(
            file_name(&doc, ExportFormat::Text, date),
            "becky_full_2024_03_09.txt"
        );

        doc.personal_info.name = "Ada  Lovelace!".to_string();
        assert_eq!(
            file_name(&doc, ExportFormat::Html, date),
            "ada_lovelace_full_2024_03_09.html"
        );

        doc.personal_info.name = "李华".to_string();
        assert_eq!(
            file_name(&doc, ExportFormat::Text, date),
            "resume_full_2024_03_09.txt"
        );
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("HTML".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
