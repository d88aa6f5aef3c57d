//! Download names for exported letters.

use chrono::NaiveDate;

use crate::models::JobTarget;
use crate::render::ExportFormat;

/// `"<company> - <position> - <Month DD, YYYY>"`, skipping empty parts.
///
/// Falls back to `fallback` when neither company nor position is known.
pub fn default_export_name(job: &JobTarget, today: NaiveDate, fallback: &str) -> String {
    let parts: Vec<&str> = [job.company.trim(), job.position.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        return fallback.to_string();
    }
    let date = today.format("%B %d, %Y").to_string();
    format!("{} - {}", parts.join(" - "), date)
}

/// Replaces path separators, reserved punctuation and control characters.
pub fn sanitize_file_name(name: &str, fallback: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let cleaned = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Sanitized name plus the format's extension.
pub fn attachment_name(name: &str, fallback: &str, format: ExportFormat) -> String {
    format!("{}.{}", sanitize_file_name(name, fallback), format.extension())
}

/// `Content-Disposition` value forcing a download.
///
/// Carries an ASCII `filename` for old clients and an RFC 5987 `filename*`
/// with the full UTF-8 name.
pub fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
    }

    fn job(company: &str, position: &str) -> JobTarget {
        JobTarget {
            company: company.to_string(),
            position: position.to_string(),
        }
    }

    #[test]
    fn test_default_export_name_full() {
        let name = default_export_name(&job("Acme", "Analyst"), date(), "cover_letter");
        assert_eq!(name, "Acme - Analyst - March 07, 2026");
    }

    #[test]
    fn test_default_export_name_partial_and_empty() {
        assert_eq!(
            default_export_name(&job("", "Analyst"), date(), "cover_letter"),
            "Analyst - March 07, 2026"
        );
        assert_eq!(default_export_name(&job(" ", ""), date(), "cover_letter"), "cover_letter");
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("A/B: \"C\"", "x"), "A_B_ _C_");
        assert_eq!(sanitize_file_name("  ..  ", "cover_letter"), "cover_letter");
        assert_eq!(sanitize_file_name("tab\there", "x"), "tab_here");
    }

    #[test]
    fn test_attachment_name_adds_extension() {
        assert_eq!(attachment_name("Acme", "x", ExportFormat::Pdf), "Acme.pdf");
        assert_eq!(attachment_name("", "cover_letter", ExportFormat::Docx), "cover_letter.docx");
    }

    #[test]
    fn test_content_disposition_non_ascii() {
        let header = content_disposition("Société.pdf");
        assert_eq!(
            header,
            "attachment; filename=\"Soci_t_.pdf\"; filename*=UTF-8''Soci%C3%A9t%C3%A9.pdf"
        );
    }

    #[test]
    fn test_content_disposition_encodes_spaces_and_commas() {
        let header = content_disposition("Acme - Analyst - March 07, 2026.pdf");
        assert!(header.ends_with("filename*=UTF-8''Acme%20-%20Analyst%20-%20March%2007%2C%202026.pdf"));
    }
}
