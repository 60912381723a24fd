//! # Editor Surfaces
//!
//! The text regions the controller reads from and writes to. The front end
//! owns cursors, scrolling and painting; the controller only sees the
//! contract below.
//!
//! ```text
//! SurfaceSet
//! ├── layout: Layout        // Single | Split { editor_percent }
//! ├── primary: Surface      // single-file modes
//! ├── content: Surface      // dual-surface mode, markup
//! ├── style: Surface        // dual-surface mode, stylesheet
//! └── preview: Preview      // dual-surface mode, rendered document
//! ```
//!
//! Visibility is derived from `layout` alone, so there is no way to end up
//! with both configurations (or neither) showing.

/// Width of the editor column in split layout, in percent of the main area.
pub const SPLIT_EDITOR_PERCENT: u16 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Primary surface at full width.
    Single,
    /// Content + style surfaces in the editor column, preview in the remainder.
    Split { editor_percent: u16 },
}

#[derive(Debug, Default)]
pub struct Surface {
    text: String,
    language: Option<&'static str>,
    layout_requested: bool,
}

impl Surface {
    pub fn new(language: Option<&'static str>) -> Self {
        Self {
            text: String::new(),
            language,
            layout_requested: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn language(&self) -> Option<&'static str> {
        self.language
    }

    /// Change the syntax language. Never touches the text.
    pub fn set_language_tag(&mut self, tag: &'static str) {
        self.language = Some(tag);
    }

    /// Ask for a relayout on the next frame. Safe while hidden.
    pub fn request_layout(&mut self) {
        self.layout_requested = true;
    }

    /// Consume a pending relayout request. Called by the front end while drawing.
    pub fn take_layout_request(&mut self) -> bool {
        std::mem::take(&mut self.layout_requested)
    }

    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Render target for the dual-surface mode.
#[derive(Debug, Default)]
pub struct Preview {
    pub document: String,
}

impl Preview {
    pub fn clear(&mut self) {
        self.document.clear();
    }
}

#[derive(Debug)]
pub struct SurfaceSet {
    layout: Layout,
    pub primary: Surface,
    pub content: Surface,
    pub style: Surface,
    pub preview: Preview,
}

impl Default for SurfaceSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceSet {
    pub fn new() -> Self {
        Self {
            layout: Layout::Single,
            primary: Surface::new(None),
            content: Surface::new(Some("html")),
            style: Surface::new(Some("css")),
            preview: Preview::default(),
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Only the controller's mode transition calls this.
    pub(crate) fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    pub fn primary_visible(&self) -> bool {
        matches!(self.layout, Layout::Single)
    }

    pub fn split_visible(&self) -> bool {
        matches!(self.layout, Layout::Split { .. })
    }

    /// The preview shares visibility with the split editors.
    pub fn preview_visible(&self) -> bool {
        self.split_visible()
    }
}
