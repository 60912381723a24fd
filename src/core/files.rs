//! # File Associations
//!
//! Pure mapping between file names and modes, plus save-name derivation.
//! Nothing in here touches the file system; reading and writing lives in
//! [`crate::core::storage`].

use std::path::PathBuf;

use crate::core::mode::Mode;

/// Base name used until a file is successfully opened.
pub const PLACEHOLDER_BASE_NAME: &str = "untitled";

/// Which of the two dual-surface editors a markup file belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkupRole {
    Content,
    Style,
}

/// Extension table. Lookups are case-insensitive against these lowercase keys.
pub const EXTENSIONS: &[(&str, Mode)] = &[
    ("js", Mode::JavaScript),
    ("mjs", Mode::JavaScript),
    ("cjs", Mode::JavaScript),
    ("ts", Mode::TypeScript),
    ("mts", Mode::TypeScript),
    ("cts", Mode::TypeScript),
    ("py", Mode::Python),
    ("pyw", Mode::Python),
    ("html", Mode::HtmlCss),
    ("htm", Mode::HtmlCss),
    ("css", Mode::HtmlCss),
];

const MARKUP_ROLES: &[(&str, MarkupRole)] = &[
    ("html", MarkupRole::Content),
    ("htm", MarkupRole::Content),
    ("css", MarkupRole::Style),
];

const ILLEGAL_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Text after the last `.`, lowercased. `None` when the name has no dot.
fn extension_of(name: &str) -> Option<String> {
    name.rfind('.').map(|i| name[i + 1..].to_ascii_lowercase())
}

/// Resolve a file name to the mode its extension is associated with.
pub fn resolve_extension(name: &str) -> Option<Mode> {
    let ext = extension_of(name)?;
    EXTENSIONS
        .iter()
        .find(|(key, _)| *key == ext)
        .map(|(_, mode)| *mode)
}

/// Which dual-surface editor a file belongs in, if any.
pub fn markup_role(name: &str) -> Option<MarkupRole> {
    let ext = extension_of(name)?;
    MARKUP_ROLES
        .iter()
        .find(|(key, _)| *key == ext)
        .map(|(_, role)| *role)
}

/// Canonical extension a single-surface mode saves with.
/// `None` for the dual-surface mode; see [`markup_extension`].
pub fn save_extension(mode: Mode) -> Option<&'static str> {
    match mode {
        Mode::JavaScript => Some("js"),
        Mode::TypeScript => Some("ts"),
        Mode::Python => Some("py"),
        Mode::HtmlCss => None,
    }
}

/// Canonical extension for one of the dual-surface editors.
pub fn markup_extension(role: MarkupRole) -> &'static str {
    match role {
        MarkupRole::Content => "html",
        MarkupRole::Style => "css",
    }
}

/// Derive the save base name from an opened file's name.
///
/// Strips any directory prefix (either slash style), strips the extension
/// unless the only dot is the leading one, replaces characters that are
/// illegal in file names with `_`, and falls back to [`PLACEHOLDER_BASE_NAME`].
pub fn derive_base_name(name: &str) -> String {
    let file_name = match name.rfind(['/', '\\']) {
        Some(i) => &name[i + 1..],
        None => name,
    };

    let stem = match file_name.rfind('.') {
        Some(i) if i > 0 => &file_name[..i],
        _ => file_name,
    };

    let sanitized: String = stem
        .chars()
        .map(|c| {
            if ILLEGAL_FILENAME_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    if sanitized.is_empty() {
        PLACEHOLDER_BASE_NAME.to_string()
    } else {
        sanitized
    }
}

/// Whether an open of these names loads into the dual-surface mode: several
/// files, or any file whose extension belongs to it.
pub fn is_dual_selection<S: AsRef<str>>(names: &[S]) -> bool {
    names.len() > 1
        || names
            .iter()
            .any(|n| resolve_extension(n.as_ref()).is_some_and(Mode::is_dual_surface))
}

/// Narrow a selection down to the files an open will actually load, in
/// selection order, judged from the names alone.
///
/// A dual selection keeps only the first content file and the first style
/// file; with neither, nothing needs reading. A single file is kept as is.
pub fn files_to_read(paths: &[PathBuf]) -> Vec<PathBuf> {
    let names: Vec<String> = paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    if !is_dual_selection(&names) {
        return paths.to_vec();
    }

    let first = |role| names.iter().position(|n| markup_role(n) == Some(role));
    let mut keep: Vec<usize> = [first(MarkupRole::Content), first(MarkupRole::Style)]
        .into_iter()
        .flatten()
        .collect();
    keep.sort_unstable();
    keep.into_iter().map(|i| paths[i].clone()).collect()
}

/// `{base}.{ext}`
pub fn file_name(base: &str, extension: &str) -> String {
    format!("{base}.{extension}")
}
