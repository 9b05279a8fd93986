//! Email bodies: the improved-titles report and the failure notice.
//!
//! The report is deterministic plain text: same input, same bytes. Every
//! suggestion is rendered in input order with its original title, improved
//! title, rationale and URL.

use tdoc_models::ImprovedTitle;

const RULER: &str = "============================================================";

/// Subject line for the report email.
pub fn report_subject(channel_name: &str) -> String {
    format!("Improved YouTube Titles for \"{}\"", channel_name)
}

/// Render the plain-text report.
pub fn render_report(channel_name: &str, improved_titles: &[ImprovedTitle]) -> String {
    let mut text = format!("TitleDoctor - Improved Titles for \"{}\"\n", channel_name);
    text.push_str(RULER);
    text.push_str("\n\n");

    for (idx, title) in improved_titles.iter().enumerate() {
        text.push_str(&format!("Video {}:\n", idx + 1));
        text.push_str("--------------------------\n");
        text.push_str(&format!("Original Title: {}\n", title.original_title));
        text.push_str(&format!("Improved Title: {}\n", title.improved_title));
        text.push_str(&format!("Why: {}\n", title.rationale));
        text.push_str(&format!("Video URL: {}\n\n", title.url));
    }

    text.push_str(RULER);
    text.push_str("\n\nPowered by TitleDoctor\n");
    text
}

/// Subject line for the failure notice.
pub fn failure_subject() -> &'static str {
    "Request failed for TitleDoctor"
}

/// Render the failure notice around a user-safe error string.
pub fn render_failure_notice(error: &str) -> String {
    format!(
        "Dear User, we ran into a problem while processing your request.\n\nError details: {}\n",
        error
    )
}
