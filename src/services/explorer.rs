//! Exploration session controller.
//!
//! Every user operation is split in two halves so the UI never waits on the
//! network: a `request_*` method checks preconditions and returns the
//! [`Request`] to run, and [`Explorer::apply`] folds the finished
//! [`Completion`] back into the session. Requests scoped to a dataset carry
//! the [`SessionTicket`] they were issued against, and uploads carry an
//! [`UploadTicket`]; completions whose ticket is no longer current are
//! dropped.

use crate::core::histogram::{draw_histogram, HistogramCanvas, HistogramGeometry};
use crate::core::table::{render_table, HeaderMode, TableGrid, NO_DATASET_LOADED};
use crate::core::{
    ColumnSelector, ColumnStats, Histogram, Row, ServiceReply, Session, SessionTicket,
    UploadReceipt, UploadTicket,
};
use crate::services::dataset_client::{ClientError, DatasetService};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const CHOOSE_FILE_FIRST: &str = "Please choose a CSV file first.";
pub const NO_DATASET_UPLOADED: &str = "No dataset uploaded yet.";
pub const NO_COLUMN_SELECTED: &str = "No column selected.";

/// Content of the results pane
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Results {
    #[default]
    Empty,
    /// Precondition failure, service error, or transport failure
    Message(String),
    /// Pretty-printed JSON document
    Json(String),
}

impl Results {
    pub fn text(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Message(text) | Self::Json(text) => text,
        }
    }
}

/// Work to hand to a [`DatasetService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Upload { upload: UploadTicket, file: PathBuf },
    Table { ticket: SessionTicket },
    Stats { ticket: SessionTicket, column: String },
    Histogram { ticket: SessionTicket, column: String },
}

/// A finished [`Request`] with the service's answer
#[derive(Debug)]
pub enum Completion {
    Upload {
        upload: UploadTicket,
        file: PathBuf,
        outcome: Result<ServiceReply<UploadReceipt>, ClientError>,
    },
    Table {
        ticket: SessionTicket,
        outcome: Result<ServiceReply<Vec<Row>>, ClientError>,
    },
    Stats {
        ticket: SessionTicket,
        column: String,
        outcome: Result<ServiceReply<ColumnStats>, ClientError>,
    },
    Histogram {
        ticket: SessionTicket,
        column: String,
        outcome: Result<ServiceReply<Histogram>, ClientError>,
    },
}

/// Run one request against the service
pub async fn execute<S: DatasetService + ?Sized>(service: &S, request: Request) -> Completion {
    match request {
        Request::Upload { upload, file } => {
            let outcome = service.upload(&file).await;
            Completion::Upload {
                upload,
                file,
                outcome,
            }
        }
        Request::Table { ticket } => {
            let outcome = service.fetch_table(ticket.dataset_id()).await;
            Completion::Table { ticket, outcome }
        }
        Request::Stats { ticket, column } => {
            let outcome = service.fetch_stats(ticket.dataset_id(), &column).await;
            Completion::Stats { ticket, column, outcome }
        }
        Request::Histogram { ticket, column } => {
            let outcome = service.fetch_histogram(ticket.dataset_id(), &column).await;
            Completion::Histogram { ticket, column, outcome }
        }
    }
}

/// Owns the session and everything the views display
#[derive(Debug, Clone)]
pub struct Explorer {
    session: Session,
    selector: ColumnSelector,
    header_mode: HeaderMode,
    table: TableGrid,
    results: Results,
    canvas: HistogramCanvas,
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new(HeaderMode::default())
    }
}

impl Explorer {
    pub fn new(header_mode: HeaderMode) -> Self {
        Self {
            session: Session::new(),
            selector: ColumnSelector::new(),
            header_mode,
            table: TableGrid::default(),
            results: Results::Empty,
            canvas: HistogramCanvas::new(HistogramGeometry::default()),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn selector(&self) -> &ColumnSelector {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut ColumnSelector {
        &mut self.selector
    }

    pub fn table(&self) -> &TableGrid {
        &self.table
    }

    pub fn results(&self) -> &Results {
        &self.results
    }

    pub fn canvas(&self) -> &HistogramCanvas {
        &self.canvas
    }

    pub fn header_mode(&self) -> HeaderMode {
        self.header_mode
    }

    fn show_message(&mut self, message: impl Into<String>) {
        self.results = Results::Message(message.into());
    }

    fn show_failure(&mut self, err: &ClientError) {
        warn!("request failed: {}", err);
        self.show_message(format!("Request failed: {err}"));
    }

    /// Upload `file`; `None` means nothing was chosen
    pub fn request_upload(&mut self, file: Option<&Path>) -> Option<Request> {
        match file {
            Some(file) => Some(Request::Upload {
                upload: self.session.begin_upload(),
                file: file.to_path_buf(),
            }),
            None => {
                self.show_message(CHOOSE_FILE_FIRST);
                None
            }
        }
    }

    /// Refresh the table; shows an inline placeholder while empty
    pub fn request_table(&mut self) -> Option<Request> {
        match self.session.ticket() {
            Some(ticket) => Some(Request::Table { ticket }),
            None => {
                self.table = TableGrid::Placeholder(NO_DATASET_LOADED.to_string());
                None
            }
        }
    }

    pub fn request_stats(&mut self) -> Option<Request> {
        let (ticket, column) = self.column_request()?;
        Some(Request::Stats { ticket, column })
    }

    pub fn request_histogram(&mut self) -> Option<Request> {
        let (ticket, column) = self.column_request()?;
        Some(Request::Histogram { ticket, column })
    }

    fn column_request(&mut self) -> Option<(SessionTicket, String)> {
        let Some(ticket) = self.session.ticket() else {
            self.show_message(NO_DATASET_UPLOADED);
            return None;
        };
        let Some(column) = self.selector.selected_value().map(str::to_string) else {
            self.show_message(NO_COLUMN_SELECTED);
            return None;
        };
        Some((ticket, column))
    }

    /// Fold a completion into the session.
    ///
    /// Returns the follow-up request, if any: a successful upload always
    /// chains a table refresh.
    pub fn apply(&mut self, completion: Completion) -> Option<Request> {
        if self.is_stale(&completion) {
            return None;
        }

        match completion {
            Completion::Upload { file, outcome, .. } => match outcome {
                Ok(ServiceReply::Success(receipt)) => {
                    info!(
                        "uploaded {} as dataset {} ({} columns)",
                        file.display(),
                        receipt.dataset_id,
                        receipt.schema.len()
                    );
                    self.session.load(receipt);
                    self.selector.sync(self.session.schema());
                    self.request_table()
                }
                Ok(ServiceReply::Failed(error)) => {
                    info!("upload of {} rejected: {}", file.display(), error);
                    self.show_message(error);
                    None
                }
                Err(err) => {
                    self.show_failure(&err);
                    None
                }
            },
            Completion::Table { outcome, .. } => {
                match outcome {
                    Ok(ServiceReply::Success(rows)) => {
                        debug!("table refreshed with {} rows", rows.len());
                        self.table = render_table(&rows, self.header_mode);
                    }
                    Ok(ServiceReply::Failed(error)) => {
                        info!("table fetch rejected: {}", error);
                        self.show_message(error);
                    }
                    Err(err) => self.show_failure(&err),
                }
                None
            }
            Completion::Stats { column, outcome, .. } => {
                match outcome {
                    Ok(ServiceReply::Success(stats)) => {
                        self.results = Results::Json(stats.to_pretty());
                    }
                    Ok(ServiceReply::Failed(error)) => {
                        info!("stats for '{}' rejected: {}", column, error);
                        self.show_message(error);
                    }
                    Err(err) => self.show_failure(&err),
                }
                None
            }
            Completion::Histogram { column, outcome, .. } => {
                match outcome {
                    Ok(ServiceReply::Success(histogram)) => {
                        let geometry = *self.canvas.geometry();
                        let drawn = draw_histogram(&mut self.canvas, &histogram.counts, &geometry);
                        self.canvas.set_caption(Some(caption(&column, &histogram)));
                        debug!("drew {} bars for '{}'", drawn, column);
                    }
                    Ok(ServiceReply::Failed(error)) => {
                        info!("histogram for '{}' rejected: {}", column, error);
                        self.show_message(error);
                    }
                    Err(err) => self.show_failure(&err),
                }
                None
            }
        }
    }

    /// Whether `completion` was overtaken by a newer upload.
    ///
    /// Settles the upload sequence as a side effect, so each upload
    /// completion must pass through here exactly once.
    fn is_stale(&mut self, completion: &Completion) -> bool {
        match completion {
            Completion::Upload { upload, file, .. } => {
                if self.session.settle_upload(*upload) {
                    return false;
                }
                debug!(
                    "dropping late upload of {} (upload #{})",
                    file.display(),
                    upload.sequence()
                );
                true
            }
            Completion::Table { ticket, .. }
            | Completion::Stats { ticket, .. }
            | Completion::Histogram { ticket, .. } => {
                if self.session.is_current(ticket) {
                    return false;
                }
                debug!(
                    "dropping stale response for dataset {} (epoch {})",
                    ticket.dataset_id(),
                    ticket.epoch()
                );
                true
            }
        }
    }

    /// Run `request` and any follow-ups to completion
    async fn drive<S: DatasetService + ?Sized>(&mut self, service: &S, request: Option<Request>) {
        let mut next = request;
        while let Some(request) = next {
            let completion = execute(service, request).await;
            next = self.apply(completion);
        }
    }

    pub async fn upload<S: DatasetService + ?Sized>(&mut self, service: &S, file: Option<&Path>) {
        let request = self.request_upload(file);
        self.drive(service, request).await;
    }

    pub async fn view_table<S: DatasetService + ?Sized>(&mut self, service: &S) {
        let request = self.request_table();
        self.drive(service, request).await;
    }

    pub async fn view_stats<S: DatasetService + ?Sized>(&mut self, service: &S) {
        let request = self.request_stats();
        self.drive(service, request).await;
    }

    pub async fn view_histogram<S: DatasetService + ?Sized>(&mut self, service: &S) {
        let request = self.request_histogram();
        self.drive(service, request).await;
    }
}

fn caption(column: &str, histogram: &Histogram) -> String {
    let buckets = histogram.counts.len();
    match histogram.range() {
        Some((low, high)) => format!("{column}: {buckets} buckets [{low:.3} .. {high:.3}]"),
        None => format!("{column}: {buckets} buckets"),
    }
}
