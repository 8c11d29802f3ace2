use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;

use serde_json::Value;

use crate::{HostError, HostResult, QuickPanelItem, View};

/// In-memory view used by headless front ends and tests.
///
/// Every host service records what it was asked to do so callers can
/// inspect the outcome.
#[derive(Debug, Clone)]
pub struct MemoryView {
    text: String,
    file_name: Option<PathBuf>,
    encoding: String,
    attached: bool,
    scratch: bool,
    read_only: bool,
    popups_supported: bool,
    cursor_row: u32,
    settings: BTreeMap<String, Value>,
    regions: BTreeMap<String, Vec<u32>>,
    statuses: BTreeMap<String, String>,
    popups: Vec<(String, u32)>,
    messages: Vec<String>,
    panels: Vec<Vec<QuickPanelItem>>,
    choices: VecDeque<Option<usize>>,
}

impl MemoryView {
    /// An attached, writable UTF-8 view holding `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            file_name: None,
            encoding: "UTF-8".to_owned(),
            attached: true,
            scratch: false,
            read_only: false,
            popups_supported: true,
            cursor_row: 0,
            settings: BTreeMap::new(),
            regions: BTreeMap::new(),
            statuses: BTreeMap::new(),
            popups: Vec::new(),
            messages: Vec::new(),
            panels: Vec::new(),
            choices: VecDeque::new(),
        }
    }

    /// Set the backing file path.
    #[must_use]
    pub fn with_file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_name = Some(path.into());
        self
    }

    /// Set the reported encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Set whether the view is attached to a window.
    #[must_use]
    pub const fn attached(mut self, attached: bool) -> Self {
        self.attached = attached;
        self
    }

    /// Set the scratch flag.
    #[must_use]
    pub const fn scratch(mut self, scratch: bool) -> Self {
        self.scratch = scratch;
        self
    }

    /// Set the read-only flag.
    #[must_use]
    pub const fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Set whether popups can be displayed.
    #[must_use]
    pub const fn popups_supported(mut self, supported: bool) -> Self {
        self.popups_supported = supported;
        self
    }

    /// Preset a per-view setting.
    #[must_use]
    pub fn with_setting(mut self, key: &str, value: Value) -> Self {
        self.settings.insert(key.to_owned(), value);
        self
    }

    /// Replace the buffer content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Queue the answer for the next quick panel.
    pub fn push_choice(&mut self, choice: Option<usize>) {
        self.choices.push_back(choice);
    }

    /// Rows currently drawn under `key`.
    #[must_use]
    pub fn regions(&self, key: &str) -> &[u32] {
        self.regions.get(key).map_or(&[], Vec::as_slice)
    }

    /// Text of the status slot `key`.
    #[must_use]
    pub fn status(&self, key: &str) -> Option<&str> {
        self.statuses.get(key).map(String::as_str)
    }

    /// Popups shown so far with their anchor rows.
    #[must_use]
    pub fn popups(&self) -> &[(String, u32)] {
        &self.popups
    }

    /// Messages shown so far.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Quick panels presented so far.
    #[must_use]
    pub fn panels(&self) -> &[Vec<QuickPanelItem>] {
        &self.panels
    }
}

impl View for MemoryView {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn is_scratch(&self) -> bool {
        self.scratch
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn encoding(&self) -> String {
        self.encoding.clone()
    }

    fn file_name(&self) -> Option<PathBuf> {
        self.file_name.clone()
    }

    fn setting(&self, key: &str) -> Option<Value> {
        self.settings.get(key).cloned()
    }

    fn set_setting(&mut self, key: &str, value: Value) {
        self.settings.insert(key.to_owned(), value);
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn cursor_row(&self) -> u32 {
        self.cursor_row
    }

    fn move_cursor(&mut self, row: u32) {
        self.cursor_row = row;
    }

    fn add_regions(&mut self, key: &str, rows: &[u32]) {
        self.regions.insert(key.to_owned(), rows.to_vec());
    }

    fn erase_regions(&mut self, key: &str) {
        self.regions.remove(key);
    }

    fn set_status(&mut self, key: &str, text: &str) {
        self.statuses.insert(key.to_owned(), text.to_owned());
    }

    fn erase_status(&mut self, key: &str) {
        self.statuses.remove(key);
    }

    fn show_popup(&mut self, content: &str, row: u32) -> HostResult<()> {
        if !self.popups_supported {
            return Err(HostError::Unsupported {
                operation: "show_popup",
            });
        }
        self.popups.push((content.to_owned(), row));
        Ok(())
    }

    fn message_dialog(&mut self, message: &str) {
        self.messages.push(message.to_owned());
    }

    fn choose(&mut self, items: &[QuickPanelItem]) -> Option<usize> {
        self.panels.push(items.to_vec());
        self.choices
            .pop_front()
            .flatten()
            .filter(|&index| index < items.len())
    }
}
