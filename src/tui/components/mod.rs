pub mod column_list;
pub mod data_table;
pub mod file_prompt;
pub mod histogram_chart;
pub mod results_pane;

pub use column_list::ColumnList;
pub use data_table::DataTable;
pub use file_prompt::FilePrompt;
pub use histogram_chart::HistogramChart;
pub use results_pane::ResultsPane;
