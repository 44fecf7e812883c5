//! Maternal-health open dataset: one CSV fetch per dashboard view, typed
//! extraction, and the aggregate-row filter.

use reqwest::Url;
use reqwest::blocking::Client;
use serde::Serialize;

use crate::config::DatasetConfig;
use crate::error::{EDoctorError, Result};

pub const REGION_COLUMN: &str = "State/UT";
pub const NEED_ASSESSED_COLUMN: &str = "Need Assessed (2019-20) - (A)";
pub const ACHIEVEMENT_COLUMN: &str =
    "Achievement during April to June - Total Institutional Deliveries - (2019-20) - (B)";
pub const PERCENT_ACHIEVED_COLUMN: &str = "% Achvt of need assessed (2019-20) - (E=(B/A)*100)";

/// Country-wide summary row; never plotted next to the regions.
pub const AGGREGATE_REGION: &str = "All India";

/// CSV as received: header names in source order, one string cell per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        let columns = reader
            .headers()?
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        let rows = reader
            .records()
            .map(|record| record.map(|record| record.iter().map(ToString::to_string).collect()))
            .collect::<std::result::Result<Vec<Vec<String>>, csv::Error>>()?;
        Ok(Self { columns, rows })
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| {
            EDoctorError::SchemaMismatch(format!("missing expected column `{name}`"))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthRecord {
    pub region: String,
    pub need_assessed: f64,
    pub achieved_deliveries: f64,
    pub percent_achieved: f64,
}

impl HealthRecord {
    #[must_use]
    pub fn is_aggregate(&self) -> bool {
        self.region == AGGREGATE_REGION
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthTable {
    records: Vec<HealthRecord>,
}

impl HealthTable {
    #[must_use]
    pub fn new(records: Vec<HealthRecord>) -> Self {
        Self { records }
    }

    /// Pick the four known columns out of a fetched table.
    pub fn from_table(table: &DataTable) -> Result<Self> {
        let region = table.require_column(REGION_COLUMN)?;
        let need = table.require_column(NEED_ASSESSED_COLUMN)?;
        let achieved = table.require_column(ACHIEVEMENT_COLUMN)?;
        let percent = table.require_column(PERCENT_ACHIEVED_COLUMN)?;

        let records = table
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let row_number = index + 1;
                Ok(HealthRecord {
                    region: cell(row, region, REGION_COLUMN, row_number)?.to_string(),
                    need_assessed: numeric_cell(row, need, NEED_ASSESSED_COLUMN, row_number)?,
                    achieved_deliveries: numeric_cell(
                        row,
                        achieved,
                        ACHIEVEMENT_COLUMN,
                        row_number,
                    )?,
                    percent_achieved: numeric_cell(
                        row,
                        percent,
                        PERCENT_ACHIEVED_COLUMN,
                        row_number,
                    )?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { records })
    }

    /// Every row except the "All India" aggregate, in original order.
    #[must_use]
    pub fn exclude_aggregate(&self) -> Self {
        Self {
            records: self
                .records
                .iter()
                .filter(|record| !record.is_aggregate())
                .cloned()
                .collect(),
        }
    }

    #[must_use]
    pub fn records(&self) -> &[HealthRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn total_achieved(&self) -> f64 {
        self.records
            .iter()
            .map(|record| record.achieved_deliveries)
            .sum()
    }
}

fn cell<'a>(row: &'a [String], index: usize, column: &str, row_number: usize) -> Result<&'a str> {
    row.get(index).map(String::as_str).ok_or_else(|| {
        EDoctorError::SchemaMismatch(format!("row {row_number} has no `{column}` cell"))
    })
}

fn numeric_cell(row: &[String], index: usize, column: &str, row_number: usize) -> Result<f64> {
    let raw = cell(row, index, column, row_number)?;
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            EDoctorError::SchemaMismatch(format!(
                "row {row_number} column `{column}` is not numeric: '{raw}'"
            ))
        })
}

/// Blocking CSV fetcher for the configured endpoint.
#[derive(Debug, Clone)]
pub struct DatasetFetcher {
    config: DatasetConfig,
}

impl DatasetFetcher {
    #[must_use]
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// One GET, no retry. Must not be called from inside an async executor.
    pub fn fetch(&self) -> Result<DataTable> {
        let url = self.config.endpoint_url()?;
        let http = Client::builder().timeout(self.config.timeout()).build()?;
        fetch_csv(&http, &url)
    }

    /// Fetch and type the four dashboard columns.
    pub fn fetch_health_table(&self) -> Result<HealthTable> {
        HealthTable::from_table(&self.fetch()?)
    }
}

fn fetch_csv(http: &Client, url: &Url) -> Result<DataTable> {
    let response = http.get(url.clone()).send().map_err(|err| {
        // The URL carries the API key.
        let err = err.without_url();
        tracing::warn!(
            host = url.host_str().unwrap_or_default(),
            error = %err,
            "dataset request failed"
        );
        EDoctorError::from(err)
    })?;
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        tracing::warn!(status = status.as_u16(), "dataset endpoint returned non-200");
        return Err(EDoctorError::FetchStatus {
            status: status.as_u16(),
        });
    }
    let body = response.text().map_err(reqwest::Error::without_url)?;
    let table = DataTable::from_csv(&body)?;
    tracing::info!(
        rows = table.rows.len(),
        columns = table.columns.len(),
        "dataset fetched"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_support::{closed_port_url, serve_once, serve_silent};

    const SAMPLE_CSV: &str = "\
State/UT,Need Assessed (2019-20) - (A),Achievement during April to June - Total Institutional Deliveries - (2019-20) - (B),% Achvt of need assessed (2019-20) - (E=(B/A)*100)
All India,100,50,50
StateA,10,8,80
";

    fn fetcher(base_url: String, timeout_ms: u64) -> DatasetFetcher {
        DatasetFetcher::new(DatasetConfig {
            base_url,
            api_key: Some("test-key".to_string()),
            timeout_ms,
        })
    }

    #[test]
    fn from_csv_keeps_exact_source_columns() {
        let table = DataTable::from_csv(SAMPLE_CSV).expect("csv");
        assert_eq!(
            table.columns,
            vec![
                REGION_COLUMN,
                NEED_ASSESSED_COLUMN,
                ACHIEVEMENT_COLUMN,
                PERCENT_ACHIEVED_COLUMN
            ]
        );
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn exclude_aggregate_keeps_only_regions() {
        let table = HealthTable::from_table(&DataTable::from_csv(SAMPLE_CSV).expect("csv"))
            .expect("typed");
        let filtered = table.exclude_aggregate();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records()[0].region, "StateA");
        assert_eq!(filtered.records()[0].achieved_deliveries, 8.0);
        assert_eq!(table.len(), 2, "input table must not be mutated");
    }

    #[test]
    fn exclude_aggregate_preserves_order_and_count() {
        let regions = ["Kerala", "All India", "Goa", "Bihar", "All India", "Assam"];
        let table = HealthTable::new(
            regions
                .iter()
                .map(|region| HealthRecord {
                    region: (*region).to_string(),
                    need_assessed: 1.0,
                    achieved_deliveries: 1.0,
                    percent_achieved: 100.0,
                })
                .collect(),
        );
        let filtered = table.exclude_aggregate();
        let aggregate_count = regions.iter().filter(|r| **r == AGGREGATE_REGION).count();
        assert_eq!(filtered.len(), table.len() - aggregate_count);
        let kept = filtered
            .records()
            .iter()
            .map(|record| record.region.as_str())
            .collect::<Vec<_>>();
        assert_eq!(kept, vec!["Kerala", "Goa", "Bihar", "Assam"]);
    }

    #[test]
    fn aggregate_match_is_exact() {
        let table = HealthTable::new(vec![HealthRecord {
            region: "all india".to_string(),
            need_assessed: 1.0,
            achieved_deliveries: 1.0,
            percent_achieved: 100.0,
        }]);
        assert_eq!(table.exclude_aggregate().len(), 1);
    }

    #[test]
    fn missing_column_is_a_schema_mismatch() {
        let csv = "State/UT,Need Assessed (2019-20) - (A)\nStateA,10\n";
        let err = HealthTable::from_table(&DataTable::from_csv(csv).expect("csv"))
            .expect_err("missing column");
        assert_eq!(err.code(), "SCHEMA_MISMATCH");
        assert!(err.to_string().contains(ACHIEVEMENT_COLUMN));
    }

    #[test]
    fn non_numeric_cell_names_row_and_column() {
        let csv = SAMPLE_CSV.replace("StateA,10,8,80", "StateA,10,NA,80");
        let err = HealthTable::from_table(&DataTable::from_csv(&csv).expect("csv"))
            .expect_err("non-numeric");
        let message = err.to_string();
        assert!(message.contains("row 2"));
        assert!(message.contains("'NA'"));
    }

    #[test]
    fn fetch_ok_response_yields_table() {
        let url = serve_once(200, "text/csv", SAMPLE_CSV);
        let table = fetcher(url, 2_000).fetch().expect("fetch");
        assert_eq!(table.columns.len(), 4);
        assert_eq!(table.rows[1][0], "StateA");
    }

    #[test]
    fn fetch_non_200_yields_fetch_error_with_status() {
        let url = serve_once(503, "text/plain", "maintenance");
        let err = fetcher(url, 2_000).fetch().expect_err("non-200");
        assert!(matches!(err, EDoctorError::FetchStatus { status: 503 }));
    }

    #[test]
    fn fetch_connection_refused_yields_fetch_error() {
        let err = fetcher(closed_port_url(), 2_000)
            .fetch()
            .expect_err("refused");
        assert!(err.is_fetch_failure());
        assert!(!err.to_string().contains("test-key"));
    }

    #[test]
    fn fetch_is_bounded_by_timeout() {
        let url = serve_silent(Duration::from_secs(3));
        let started = std::time::Instant::now();
        let err = fetcher(url, 200).fetch().expect_err("timeout");
        assert!(err.is_fetch_failure());
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
