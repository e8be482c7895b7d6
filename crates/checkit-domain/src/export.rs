//! CSV export of the active tab.
//!
//! An export is a single CSV row: name, title, notes and link, followed by a
//! text/answer pair for every item of the tab.

use checkit_core::{CheckitError, CheckitResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub link: String,
}

impl ExportMetadata {
    pub fn validate(&self) -> CheckitResult<()> {
        if self.name.trim().is_empty() {
            return Err(CheckitError::Validation(
                "Name is required. Set a display name in the options.".to_string(),
            ));
        }
        if self.title.trim().is_empty() {
            return Err(CheckitError::Validation(
                "Business title is required.".to_string(),
            ));
        }
        let link = self.link.trim();
        if !link.is_empty() && !(link.starts_with("http://") || link.starts_with("https://")) {
            return Err(CheckitError::Validation(
                "Link must be a valid URL.".to_string(),
            ));
        }
        Ok(())
    }

    /// `"{title} by {name}.csv"`, with path separators replaced.
    pub fn filename(&self) -> String {
        let raw = format!("{} by {}.csv", self.title.trim(), self.name.trim());
        raw.chars()
            .map(|c| if matches!(c, '/' | '\\' | '\0') { '-' } else { c })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEntry {
    pub text: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct ChecklistExporter;

impl ChecklistExporter {
    /// Formats the export row. Fails with a validation error, producing
    /// nothing, when the name or title is blank.
    pub fn export(entries: &[ExportEntry], metadata: &ExportMetadata) -> CheckitResult<CsvExport> {
        metadata.validate()?;

        let mut record = vec![
            metadata.name.trim().to_string(),
            metadata.title.trim().to_string(),
            metadata.notes.clone(),
            metadata.link.clone(),
        ];
        for entry in entries {
            record.push(strip_markup(&entry.text));
            record.push(if entry.checked { "Yes" } else { "No" }.to_string());
        }

        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer
            .write_record(&record)
            .map_err(|e| CheckitError::Serialization(e.to_string()))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| CheckitError::Serialization(e.to_string()))?;

        Ok(CsvExport {
            filename: metadata.filename(),
            bytes,
        })
    }

    /// Writes the export into `dir` and returns the file path.
    pub fn write_to_dir(export: &CsvExport, dir: &Path) -> CheckitResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&export.filename);
        std::fs::write(&path, &export.bytes)?;
        tracing::info!("Exported {} bytes to {}", export.bytes.len(), path.display());
        Ok(path)
    }
}

/// Turns `<br>` variants into newlines, drops any other tag and decodes the
/// common entities.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        let is_tag = after[1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');
        match (is_tag, after.find('>')) {
            (true, Some(end)) => {
                let tag = after[1..end].trim().trim_end_matches('/').trim();
                if tag.eq_ignore_ascii_case("br") {
                    out.push('\n');
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push('<');
                rest = &after[1..];
            }
        }
    }
    out.push_str(rest);

    decode_entities(&out)
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn metadata(name: &str, title: &str) -> ExportMetadata {
        ExportMetadata {
            name: name.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn entry(text: &str, checked: bool) -> ExportEntry {
        ExportEntry {
            text: text.to_string(),
            checked,
        }
    }

    #[test]
    fn test_export_single_quoted_row() {
        let export = ChecklistExporter::export(
            &[entry("Check A", true), entry("Check,B", false)],
            &metadata("Alex", "Audit"),
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(export.bytes).unwrap(),
            "\"Alex\",\"Audit\",\"\",\"\",\"Check A\",\"Yes\",\"Check,B\",\"No\"\n"
        );
        assert_eq!(export.filename, "Audit by Alex.csv");
    }

    #[test]
    fn test_export_escapes_quotes_and_keeps_newlines() {
        let mut meta = metadata("Alex", "Audit");
        meta.notes = "said \"ok\"".to_string();
        let export =
            ChecklistExporter::export(&[entry("line one\nline two", false)], &meta).unwrap();
        assert_eq!(
            String::from_utf8(export.bytes).unwrap(),
            "\"Alex\",\"Audit\",\"said \"\"ok\"\"\",\"\",\"line one\nline two\",\"No\"\n"
        );
    }

    #[test]
    fn test_export_rejects_missing_title_or_name() {
        let err = ChecklistExporter::export(&[entry("a", true)], &metadata("Alex", "  "));
        assert!(matches!(err, Err(CheckitError::Validation(_))));

        let err = ChecklistExporter::export(&[], &metadata("", "Audit"));
        assert!(matches!(err, Err(CheckitError::Validation(_))));
    }

    #[test]
    fn test_notes_and_link_are_written_verbatim() {
        let mut meta = metadata("Alex", "Audit");
        meta.notes = "  keep spacing ".to_string();
        meta.link = "https://example.com/a ".to_string();
        let export = ChecklistExporter::export(&[], &meta).unwrap();
        assert_eq!(
            String::from_utf8(export.bytes).unwrap(),
            "\"Alex\",\"Audit\",\"  keep spacing \",\"https://example.com/a \"\n"
        );
    }

    #[test]
    fn test_link_must_be_http() {
        let mut meta = metadata("Alex", "Audit");
        meta.link = "ftp://example.com".to_string();
        assert!(matches!(meta.validate(), Err(CheckitError::Validation(_))));

        meta.link = "https://example.com/run".to_string();
        assert!(meta.validate().is_ok());
    }

    #[test]
    fn test_export_with_no_items() {
        let export = ChecklistExporter::export(&[], &metadata("Alex", "Audit")).unwrap();
        assert_eq!(
            String::from_utf8(export.bytes).unwrap(),
            "\"Alex\",\"Audit\",\"\",\"\"\n"
        );
    }

    #[test]
    fn test_filename_replaces_separators() {
        assert_eq!(metadata("A/B", "Q1\\Q2").filename(), "Q1-Q2 by A-B.csv");
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("one<br>two<BR/>three<br />four"), "one\ntwo\nthree\nfour");
        assert_eq!(strip_markup("<b>bold</b> &amp; <i>it</i>"), "bold & it");
        assert_eq!(strip_markup("a < b and c > d"), "a < b and c > d");
        assert_eq!(strip_markup("unclosed <tag"), "unclosed <tag");
        assert_eq!(strip_markup("&lt;b&gt;"), "<b>");
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempdir().unwrap();
        let export = ChecklistExporter::export(&[entry("a", true)], &metadata("Alex", "Audit")).unwrap();
        let path = ChecklistExporter::write_to_dir(&export, &dir.path().join("out")).unwrap();
        assert_eq!(path.file_name().unwrap(), "Audit by Alex.csv");
        assert_eq!(std::fs::read(&path).unwrap(), export.bytes);
    }
}
