pub mod dataset_client;
pub mod explorer;

pub use dataset_client::{ClientError, DatasetService, HttpDatasetClient};
pub use explorer::{execute, Completion, Explorer, Request, Results};
