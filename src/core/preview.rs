//! Preview document synthesis for the dual-surface mode.
//!
//! Pure string assembly: the style text and the content text are embedded
//! verbatim (no escaping) into a fixed skeleton.

/// Build the self-contained preview document from the two surface texts.
pub fn synthesize_document(content: &str, style: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<style>\n{style}\n</style>\n</head>\n<body>\n{content}\n</body>\n</html>"
    )
}
