//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as props:
//! - `TitleBar`: Mode, base name, readiness and the latest toast
//! - `PreviewPane`: Synthesized preview document
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components whose state persists in `TuiState` and which are wrapped by a
//! transient struct each frame:
//! - `Editor`: Code editor over one core surface
//! - `OutputPane`: Scrollable output buffer
//! - `OpenPrompt`: File picker overlay
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── editor/          (Code editor: cursor, navigation, highlighting)
//! ├── output_pane.rs   (Output buffer view)
//! ├── preview_pane.rs  (Preview document view)
//! └── open_prompt.rs   (Open overlay)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod editor;
pub use editor::{Editor, EditorState};
pub mod output_pane;
pub use output_pane::{OutputPane, OutputPaneState};
pub mod preview_pane;
pub use preview_pane::PreviewPane;
pub mod open_prompt;
pub use open_prompt::{OpenEvent, OpenPrompt, OpenPromptState};
