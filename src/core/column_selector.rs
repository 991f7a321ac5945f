use crate::core::types::ColumnInfo;

/// One selectable column: display label plus the column name it stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOption {
    pub label: String,
    pub value: String,
}

/// Column list kept in step with the active schema
#[derive(Debug, Clone, Default)]
pub struct ColumnSelector {
    options: Vec<ColumnOption>,
    selected: Option<usize>,
}

impl ColumnSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every option with one per schema entry and select the first
    pub fn sync(&mut self, schema: &[ColumnInfo]) {
        self.options = schema
            .iter()
            .map(|column| ColumnOption {
                label: column.label(),
                value: column.name.clone(),
            })
            .collect();
        self.selected = if self.options.is_empty() { None } else { Some(0) };
    }

    pub fn options(&self) -> &[ColumnOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Column name of the selected option. Empty names count as no selection.
    pub fn selected_value(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(|option| option.value.as_str())
            .filter(|value| !value.is_empty())
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index < self.options.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    pub fn select_value(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(index) => self.select(index),
            None => false,
        }
    }

    /// Move to the next option, wrapping at the end
    pub fn select_next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % self.options.len(),
            None => 0,
        });
    }

    /// Move to the previous option, wrapping at the start
    pub fn select_prev(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let last = self.options.len() - 1;
        self.selected = Some(match self.selected {
            Some(0) | None => last,
            Some(i) => i - 1,
        });
    }

    pub fn select_first(&mut self) {
        if !self.options.is_empty() {
            self.selected = Some(0);
        }
    }

    pub fn select_last(&mut self) {
        if let Some(last) = self.options.len().checked_sub(1) {
            self.selected = Some(last);
        }
    }
}
