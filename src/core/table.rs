use crate::core::types::Row;
use serde::{Deserialize, Serialize};

/// Placeholder shown when the table endpoint returns no rows
pub const NO_DATA_FOUND: &str = "No data found";
/// Placeholder shown when the table is requested before any upload
pub const NO_DATASET_LOADED: &str = "No dataset loaded";

/// How the header is derived from a page of rows
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMode {
    /// First row's keys, then keys first seen in later rows
    #[default]
    Union,
    /// First row's keys only; columns missing from row 0 are dropped
    FirstRow,
}

/// What the table widget shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableGrid {
    /// A single cell with a message and no header
    Placeholder(String),
    Grid {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl Default for TableGrid {
    fn default() -> Self {
        Self::Placeholder(NO_DATASET_LOADED.to_string())
    }
}

impl TableGrid {
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Self::Placeholder(message) => Some(message),
            Self::Grid { .. } => None,
        }
    }

    pub fn header(&self) -> &[String] {
        match self {
            Self::Placeholder(_) => &[],
            Self::Grid { header, .. } => header,
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        match self {
            Self::Placeholder(_) => &[],
            Self::Grid { rows, .. } => rows,
        }
    }

    /// Rendered rows, counting the placeholder as one
    pub fn row_count(&self) -> usize {
        match self {
            Self::Placeholder(_) => 1,
            Self::Grid { rows, .. } => rows.len(),
        }
    }
}

/// Build the grid for a table response. Every call starts from scratch.
pub fn render_table(rows: &[Row], mode: HeaderMode) -> TableGrid {
    if rows.is_empty() {
        return TableGrid::Placeholder(NO_DATA_FOUND.to_string());
    }

    let header = derive_header(rows, mode);
    let rows = rows
        .iter()
        .map(|row| {
            header
                .iter()
                .map(|column| row.cell(column).map(|v| v.to_string()).unwrap_or_default())
                .collect()
        })
        .collect();

    TableGrid::Grid { header, rows }
}

fn derive_header(rows: &[Row], mode: HeaderMode) -> Vec<String> {
    let mut header: Vec<String> = rows[0].keys().map(str::to_string).collect();
    if mode == HeaderMode::Union {
        for row in &rows[1..] {
            for key in row.keys() {
                if !header.iter().any(|h| h == key) {
                    header.push(key.to_string());
                }
            }
        }
    }
    header
}
