use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Document;
use crate::models::TaskDetails;

pub const LINK_LABEL: &str = "asana";

static LIST_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+(?:\[[ xX]\]\s*)?").expect("valid regex"));
static OPEN_CHECKBOX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*(?:[-*+]|\d+[.)])\s+)\[ \]").expect("valid regex"));

/// Task name for a line: list bullet and checkbox stripped.
pub fn task_name_from_line(line: &str) -> String {
    LIST_PREFIX.replace(line, "").trim().to_string()
}

/// Task name for the document: the selection if any, else the cursor line.
pub fn task_name(document: &Document) -> String {
    match document.selection_text() {
        Some(selection) if !selection.trim().is_empty() => selection.trim().to_string(),
        _ => task_name_from_line(document.current_line()),
    }
}

/// `[asana#Project/Section](url)`, without the section part when none was resolved.
pub fn format_link(details: &TaskDetails, url: &str) -> String {
    match details.section_name.as_deref() {
        Some(section) => format!("[{}#{}/{}]({})", LINK_LABEL, details.project_name(), section, url),
        None => format!("[{}#{}]({})", LINK_LABEL, details.project_name(), url),
    }
}

/// Put `link` after the selection, or at the end of the cursor line.
pub fn insert_link(document: &mut Document, link: &str) {
    match document.selection_text() {
        Some(selection) => {
            // keep whitespace trailing the selection after the link
            let kept = selection.trim_end();
            let trailing = &selection[kept.len()..];
            document.replace_selection(&format!("{} {}{}", kept, link, trailing));
        }
        None => {
            let line = document.current_line();
            let updated = if line.trim_end().is_empty() {
                format!("{}{}", line, link)
            } else {
                format!("{} {}", line.trim_end(), link)
            };
            document.set_line(&updated);
        }
    }
}

/// Tick the checkbox of the cursor line. Returns false if the line had no open checkbox.
pub fn mark_completed(document: &mut Document) -> bool {
    let line = document.current_line();
    if !OPEN_CHECKBOX.is_match(line) {
        return false;
    }
    let updated = OPEN_CHECKBOX.replace(line, "${1}[x]").into_owned();
    document.set_line(&updated);
    true
}

/// Write the link for a created task back into the document.
pub fn write_back(
    document: &mut Document,
    details: &TaskDetails,
    url: &str,
    enable_link: bool,
    complete: bool,
) {
    if enable_link {
        insert_link(document, &format_link(details, url));
    }
    if complete {
        mark_completed(document);
    }
}
