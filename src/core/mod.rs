pub mod column_selector;
pub mod histogram;
pub mod session;
pub mod table;
pub mod types;

pub use column_selector::{ColumnOption, ColumnSelector};
pub use histogram::{HistogramCanvas, HistogramGeometry, Surface};
pub use session::{Session, SessionState, SessionTicket, UploadTicket};
pub use table::{HeaderMode, TableGrid};
pub use types::*;
