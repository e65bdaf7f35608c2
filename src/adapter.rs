//! List adapter boundary
//!
//! The engine produces list mutations; a shell-side adapter renders them.
//! [`ListAdapter`] is the entire surface the engine touches: replace the
//! backing list, remove one position, read one position. Filtering and
//! rendering live behind the adapter, outside the engine.

use crate::apps::AppEntry;

/// Rendering-side consumer of list mutations
pub trait ListAdapter: Send {
    /// Replace the backing list
    ///
    /// `force_refresh` asks the view to rebind every row even when the entry
    /// count did not change, because labels or icons may have.
    fn update_list(&mut self, entries: Vec<AppEntry>, force_refresh: bool);

    /// Remove the entry at one position
    fn remove_item(&mut self, index: usize);

    /// Entry at one position, if in range
    fn get_item(&self, index: usize) -> Option<AppEntry>;
}

/// Vec-backed adapter used by tests and the sandbox binary
///
/// Records how often the list was pushed and whether the last push forced a
/// refresh, which is what list-synchronization tests assert on.
#[derive(Debug, Default)]
pub struct BufferedAdapter {
    entries: Vec<AppEntry>,
    update_count: usize,
    last_force_refresh: bool,
    removed_positions: Vec<usize>,
}

impl BufferedAdapter {
    /// Create an empty adapter
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entries in display order
    pub fn entries(&self) -> &[AppEntry] {
        &self.entries
    }

    /// Display labels in order, for terse assertions
    pub fn labels(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.sort_label().to_string())
            .collect()
    }

    /// Number of `update_list` calls so far
    pub fn update_count(&self) -> usize {
        self.update_count
    }

    /// Whether the last update asked for a forced rebind
    pub fn last_force_refresh(&self) -> bool {
        self.last_force_refresh
    }

    /// Positions passed to `remove_item`, in call order
    pub fn removed_positions(&self) -> &[usize] {
        &self.removed_positions
    }
}

impl ListAdapter for BufferedAdapter {
    fn update_list(&mut self, entries: Vec<AppEntry>, force_refresh: bool) {
        self.entries = entries;
        self.update_count += 1;
        self.last_force_refresh = force_refresh;
    }

    fn remove_item(&mut self, index: usize) {
        if index < self.entries.len() {
            self.entries.remove(index);
            self.removed_positions.push(index);
        }
    }

    fn get_item(&self, index: usize) -> Option<AppEntry> {
        self.entries.get(index).cloned()
    }
}
