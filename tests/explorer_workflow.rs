use dsview::core::histogram::FilledRect;
use dsview::core::{
    ColumnInfo, ColumnStats, DatasetId, Histogram, Row, ServiceReply, TableGrid, UploadReceipt,
};
use dsview::services::explorer::{CHOOSE_FILE_FIRST, NO_COLUMN_SELECTED, NO_DATASET_UPLOADED};
use dsview::services::{
    execute, ClientError, Completion, DatasetService, Explorer, Request, Results,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory service double that records every call it receives
#[derive(Default)]
struct FakeService {
    schema: Vec<ColumnInfo>,
    table: Value,
    stats: Value,
    histogram: Value,
    calls: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl FakeService {
    fn new(schema: Vec<ColumnInfo>) -> Self {
        Self {
            schema,
            table: json!([]),
            stats: json!({}),
            histogram: json!({"counts": []}),
            ..Self::default()
        }
    }

    fn with_table(mut self, table: Value) -> Self {
        self.table = table;
        self
    }

    fn with_stats(mut self, stats: Value) -> Self {
        self.stats = stats;
        self
    }

    fn with_histogram(mut self, histogram: Value) -> Self {
        self.histogram = histogram;
        self
    }

    fn record(&self, call: String) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(call);
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl DatasetService for FakeService {
    async fn upload(&self, file: &Path) -> Result<ServiceReply<UploadReceipt>, ClientError> {
        self.record(format!("upload {}", file.display()));
        Ok(ServiceReply::Success(UploadReceipt {
            dataset_id: DatasetId::new("42"),
            schema: self.schema.clone(),
        }))
    }

    async fn fetch_table(
        &self,
        dataset_id: &DatasetId,
    ) -> Result<ServiceReply<Vec<Row>>, ClientError> {
        self.record(format!("table {dataset_id}"));
        Ok(ServiceReply::from_value(self.table.clone())?)
    }

    async fn fetch_stats(
        &self,
        dataset_id: &DatasetId,
        column: &str,
    ) -> Result<ServiceReply<ColumnStats>, ClientError> {
        self.record(format!("stats {dataset_id} {column}"));
        Ok(ServiceReply::from_value(self.stats.clone())?)
    }

    async fn fetch_histogram(
        &self,
        dataset_id: &DatasetId,
        column: &str,
    ) -> Result<ServiceReply<Histogram>, ClientError> {
        self.record(format!("hist {dataset_id} {column}"));
        Ok(ServiceReply::from_value(self.histogram.clone())?)
    }
}

fn two_columns() -> Vec<ColumnInfo> {
    vec![ColumnInfo::new("a", "int64"), ColumnInfo::new("b", "int64")]
}

#[tokio::test]
async fn upload_without_file_makes_no_call() {
    let service = FakeService::new(two_columns());
    let mut explorer = Explorer::default();

    explorer.upload(&service, None).await;

    assert_eq!(service.call_count(), 0);
    assert_eq!(
        explorer.results(),
        &Results::Message(CHOOSE_FILE_FIRST.to_string())
    );
}

#[tokio::test]
async fn upload_fills_selector_and_refreshes_table() {
    let service = FakeService::new(vec![
        ColumnInfo::new("price", "float64"),
        ColumnInfo::new("city", "object"),
        ColumnInfo::new("qty", "int64"),
    ])
    .with_table(json!([{"price": 1.5, "city": "Oslo", "qty": 3}]));
    let mut explorer = Explorer::default();

    explorer
        .upload(&service, Some(Path::new("sales.csv")))
        .await;

    assert_eq!(service.calls(), vec!["upload sales.csv", "table 42"]);
    assert_eq!(explorer.selector().len(), 3);
    assert_eq!(explorer.selector().selected_value(), Some("price"));
    assert_eq!(explorer.table().header(), &["price", "city", "qty"]);
    assert_eq!(explorer.table().rows(), &[vec!["1.5", "Oslo", "3"]]);
}

#[tokio::test]
async fn empty_table_is_a_single_placeholder() {
    let service = FakeService::new(two_columns()).with_table(json!([]));
    let mut explorer = Explorer::default();

    explorer.upload(&service, Some(Path::new("empty.csv"))).await;

    assert_eq!(
        explorer.table(),
        &TableGrid::Placeholder("No data found".to_string())
    );
    assert_eq!(explorer.table().row_count(), 1);
    assert!(explorer.table().header().is_empty());
}

#[tokio::test]
async fn table_rows_render_in_order() {
    let service =
        FakeService::new(two_columns()).with_table(json!([{"a": 1, "b": 2}, {"a": 3, "b": 4}]));
    let mut explorer = Explorer::default();

    explorer.upload(&service, Some(Path::new("data.csv"))).await;

    assert_eq!(explorer.table().header(), &["a", "b"]);
    assert_eq!(
        explorer.table().rows(),
        &[vec!["1", "2"], vec!["3", "4"]]
    );

    // A manual refresh goes back to the service and rebuilds from scratch
    explorer.view_table(&service).await;
    assert_eq!(service.calls().last().map(String::as_str), Some("table 42"));
    assert_eq!(explorer.table().rows().len(), 2);
}

#[tokio::test]
async fn histogram_bars_scale_to_the_tallest_bucket() {
    let service = FakeService::new(two_columns()).with_histogram(json!({"counts": [2, 4, 8, 4, 2]}));
    let mut explorer = Explorer::default();
    explorer.upload(&service, Some(Path::new("data.csv"))).await;

    explorer.view_histogram(&service).await;

    assert_eq!(service.calls().last().map(String::as_str), Some("hist 42 a"));
    let rects = explorer.canvas().rects();
    let heights: Vec<f64> = rects.iter().map(|r| r.height).collect();
    assert_eq!(heights, vec![50.0, 100.0, 200.0, 100.0, 50.0]);
    assert_eq!(
        rects[2],
        FilledRect {
            x: 20.0,
            y: 0.0,
            width: 8.0,
            height: 200.0
        }
    );
    assert_eq!(explorer.canvas().caption(), Some("a: 5 buckets"));
}

#[tokio::test]
async fn stats_and_histogram_need_a_dataset() {
    let service = FakeService::new(two_columns());
    let mut explorer = Explorer::default();

    explorer.view_stats(&service).await;
    assert_eq!(explorer.results().text(), NO_DATASET_UPLOADED);
    explorer.view_histogram(&service).await;
    assert_eq!(explorer.results().text(), NO_DATASET_UPLOADED);
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn stats_and_histogram_need_a_column() {
    let service = FakeService::new(vec![]);
    let mut explorer = Explorer::default();
    explorer.upload(&service, Some(Path::new("no_columns.csv"))).await;
    let before = service.call_count();

    explorer.view_stats(&service).await;
    assert_eq!(explorer.results().text(), NO_COLUMN_SELECTED);
    explorer.view_histogram(&service).await;
    assert_eq!(explorer.results().text(), NO_COLUMN_SELECTED);
    assert_eq!(service.call_count(), before);
}

#[tokio::test]
async fn stats_for_selected_column_are_pretty_printed() {
    let service =
        FakeService::new(two_columns()).with_stats(json!({"count": 2, "mean": 2.0, "max": 3}));
    let mut explorer = Explorer::default();
    explorer.upload(&service, Some(Path::new("data.csv"))).await;
    explorer.selector_mut().select_value("b");

    explorer.view_stats(&service).await;

    assert_eq!(service.calls().last().map(String::as_str), Some("stats 42 b"));
    assert_eq!(
        explorer.results(),
        &Results::Json("{\n  \"count\": 2,\n  \"mean\": 2.0,\n  \"max\": 3\n}".to_string())
    );
}

#[tokio::test]
async fn histogram_error_draws_nothing() {
    let service = FakeService::new(vec![ColumnInfo::new("city", "object")])
        .with_histogram(json!({"error": "Histogram only for numeric columns"}));
    let mut explorer = Explorer::default();
    explorer.upload(&service, Some(Path::new("cities.csv"))).await;

    explorer.view_histogram(&service).await;

    assert_eq!(
        explorer.results().text(),
        "Histogram only for numeric columns"
    );
    assert!(explorer.canvas().is_blank());
    assert_eq!(explorer.canvas().clear_count(), 0);
}

#[tokio::test]
async fn all_zero_histogram_clears_without_bars() {
    let service = FakeService::new(two_columns()).with_histogram(json!({"counts": [0, 0, 0]}));
    let mut explorer = Explorer::default();
    explorer.upload(&service, Some(Path::new("data.csv"))).await;

    explorer.view_histogram(&service).await;

    assert!(explorer.canvas().is_blank());
    assert_eq!(explorer.canvas().clear_count(), 1);
}

#[tokio::test]
async fn reply_for_replaced_dataset_is_dropped() {
    let service = FakeService::new(two_columns()).with_table(json!([{"a": 1, "b": 2}]));
    let mut explorer = Explorer::default();
    explorer.upload(&service, Some(Path::new("first.csv"))).await;

    // Issue a stats request, then upload again before it completes
    let Some(stale) = explorer.request_stats() else {
        panic!("stats request should be issued");
    };
    let completion = execute(&service, stale).await;

    let upload = explorer.request_upload(Some(Path::new("second.csv")));
    let Some(upload @ Request::Upload { .. }) = upload else {
        panic!("upload request should be issued");
    };
    let follow_up = explorer.apply(execute(&service, upload).await);
    assert!(matches!(follow_up, Some(Request::Table { .. })));

    let results_before = explorer.results().clone();
    assert_eq!(explorer.apply(completion), None);
    assert_eq!(explorer.results(), &results_before);
}

#[tokio::test]
async fn late_upload_reply_does_not_replace_newer_dataset() {
    let service = FakeService::new(two_columns()).with_table(json!([{"b_col": 1}]));
    let mut explorer = Explorer::default();

    let Some(Request::Upload { upload: first, file: first_file }) =
        explorer.request_upload(Some(Path::new("a.csv")))
    else {
        panic!("first upload should be issued");
    };
    let Some(Request::Upload { upload: second, file: second_file }) =
        explorer.request_upload(Some(Path::new("b.csv")))
    else {
        panic!("second upload should be issued");
    };

    // The second upload finishes first
    let follow_up = explorer.apply(Completion::Upload {
        upload: second,
        file: second_file,
        outcome: Ok(ServiceReply::Success(UploadReceipt {
            dataset_id: DatasetId::new("2"),
            schema: vec![ColumnInfo::new("b_col", "int64")],
        })),
    });
    let Some(refresh) = follow_up else {
        panic!("upload should chain a table refresh");
    };
    assert_eq!(explorer.apply(execute(&service, refresh).await), None);

    let late = explorer.apply(Completion::Upload {
        upload: first,
        file: first_file,
        outcome: Ok(ServiceReply::Success(UploadReceipt {
            dataset_id: DatasetId::new("1"),
            schema: vec![ColumnInfo::new("a_col", "int64")],
        })),
    });

    assert_eq!(late, None);
    assert_eq!(explorer.session().dataset_id(), Some(&DatasetId::new("2")));
    assert_eq!(explorer.selector().selected_value(), Some("b_col"));
    assert_eq!(explorer.table().header(), &["b_col"]);
    assert_eq!(service.calls(), vec!["table 2"]);
}

#[tokio::test]
async fn uploads_finishing_in_order_both_apply() {
    let service = FakeService::new(two_columns());
    let mut explorer = Explorer::default();

    let first = explorer.request_upload(Some(Path::new("a.csv")));
    let second = explorer.request_upload(Some(Path::new("b.csv")));
    for request in [first, second] {
        let Some(request) = request else {
            panic!("upload should be issued");
        };
        let follow_up = explorer.apply(execute(&service, request).await);
        assert!(matches!(follow_up, Some(Request::Table { .. })));
    }

    assert_eq!(explorer.session().ticket().map(|t| t.epoch()), Some(2));
}
