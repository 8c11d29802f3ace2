mod memory;
mod types;

use std::path::PathBuf;

use serde_json::Value;

pub use memory::MemoryView;
pub use types::{is_truthy, HostError, HostResult, QuickPanelItem};

/// Handle to an editor view, implemented by each host integration.
///
/// The trait is object safe so collaborators can work on `&mut dyn View`.
pub trait View {
    /// Whether the view is attached to a window.
    fn is_attached(&self) -> bool;

    /// Whether the view is a scratch buffer.
    fn is_scratch(&self) -> bool;

    /// Whether the view rejects edits.
    fn is_read_only(&self) -> bool;

    /// Name of the encoding the host uses for the buffer (e.g. `UTF-8`).
    fn encoding(&self) -> String;

    /// Path of the file backing the view, if it has been saved.
    fn file_name(&self) -> Option<PathBuf>;

    /// Read a per-view setting.
    fn setting(&self, key: &str) -> Option<Value>;

    /// Write a per-view setting.
    fn set_setting(&mut self, key: &str, value: Value);

    /// Full buffer content.
    fn text(&self) -> String;

    /// Zero-based row of the primary cursor.
    fn cursor_row(&self) -> u32;

    /// Move the primary cursor to the start of `row` and reveal it.
    fn move_cursor(&mut self, row: u32);

    /// Replace the rows drawn under the region `key`.
    fn add_regions(&mut self, key: &str, rows: &[u32]);

    /// Remove every row drawn under the region `key`.
    fn erase_regions(&mut self, key: &str);

    /// Show `text` in the status bar slot `key`.
    fn set_status(&mut self, key: &str, text: &str);

    /// Clear the status bar slot `key`.
    fn erase_status(&mut self, key: &str);

    /// Show a popup anchored at `row`.
    ///
    /// # Errors
    ///
    /// Returns an error when the host cannot display popups for the view.
    fn show_popup(&mut self, content: &str, row: u32) -> HostResult<()>;

    /// Show a modal message.
    fn message_dialog(&mut self, message: &str);

    /// Let the user pick one of `items`; `None` when cancelled.
    fn choose(&mut self, items: &[QuickPanelItem]) -> Option<usize>;

    /// Whether a per-view setting is present and truthy.
    fn setting_is_truthy(&self, key: &str) -> bool {
        self.setting(key).as_ref().is_some_and(is_truthy)
    }
}
