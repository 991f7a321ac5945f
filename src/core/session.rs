use crate::core::types::{ColumnInfo, DatasetId, UploadReceipt};

/// Lifecycle of the exploration session. There is no way back to `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Loaded,
}

/// Identifies the dataset a request was issued against.
///
/// The epoch counts successful uploads, so a ticket also goes stale when the
/// service happens to reuse an id (it numbers datasets per process).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionTicket {
    dataset_id: DatasetId,
    epoch: u64,
}

impl SessionTicket {
    pub fn dataset_id(&self) -> &DatasetId {
        &self.dataset_id
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Orders uploads by when they were issued.
///
/// Only the newest upload to report back counts; an older one finishing
/// late must not replace what a newer one loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UploadTicket(u64);

impl UploadTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Which dataset is active and what its columns are
#[derive(Debug, Clone, Default)]
pub struct Session {
    dataset_id: Option<DatasetId>,
    schema: Vec<ColumnInfo>,
    epoch: u64,
    uploads_issued: u64,
    uploads_settled: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.dataset_id.is_some() {
            SessionState::Loaded
        } else {
            SessionState::Empty
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state() == SessionState::Loaded
    }

    pub fn dataset_id(&self) -> Option<&DatasetId> {
        self.dataset_id.as_ref()
    }

    pub fn schema(&self) -> &[ColumnInfo] {
        &self.schema
    }

    /// Ticket for the active dataset, `None` while empty
    pub fn ticket(&self) -> Option<SessionTicket> {
        self.dataset_id.as_ref().map(|id| SessionTicket {
            dataset_id: id.clone(),
            epoch: self.epoch,
        })
    }

    /// Whether a completion for `ticket` still belongs to the active dataset
    pub fn is_current(&self, ticket: &SessionTicket) -> bool {
        self.epoch == ticket.epoch && self.dataset_id.as_ref() == Some(&ticket.dataset_id)
    }

    /// Ticket for an upload about to be sent
    pub fn begin_upload(&mut self) -> UploadTicket {
        self.uploads_issued += 1;
        UploadTicket(self.uploads_issued)
    }

    /// Record that `upload` came back.
    ///
    /// Returns `false` when a newer upload has already come back, in which
    /// case the reply must be ignored.
    pub fn settle_upload(&mut self, upload: UploadTicket) -> bool {
        if upload.0 <= self.uploads_settled {
            return false;
        }
        self.uploads_settled = upload.0;
        true
    }

    /// Make an uploaded dataset active, replacing id and schema wholesale
    pub fn load(&mut self, receipt: UploadReceipt) -> SessionTicket {
        self.epoch += 1;
        self.dataset_id = Some(receipt.dataset_id.clone());
        self.schema = receipt.schema;
        SessionTicket {
            dataset_id: receipt.dataset_id,
            epoch: self.epoch,
        }
    }
}
