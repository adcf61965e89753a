//! Energi Data Service REST client.
//!
//! Both datasets are queried through the same endpoint shape
//! (`<base>/<dataset>?start=..&end=..&filter=..`); the response is a JSON
//! object with a `records` array of flat key/value rows. Records are kept as
//! raw maps here; column resolution happens in `series::normalize`.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{PriceArea, RawRecord, TimeWindow};
use crate::error::AppError;

const BASE_URL: &str = "https://api.energidataservice.dk/dataset";

/// Upper bound on a single blocking fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-dataset query shape.
#[derive(Debug, Clone, Copy)]
pub struct DatasetProfile {
    pub dataset: &'static str,
    /// Explicit column restriction, where the schema is known and fixed.
    pub columns: Option<&'static str>,
    pub sort: Option<&'static str>,
    /// Row cap; `0` means no cap.
    pub limit: usize,
}

/// Day-ahead spot prices. The column set is stable, so we ask for exactly
/// what we need.
pub const ELSPOT_PRICES: DatasetProfile = DatasetProfile {
    dataset: "Elspotprices",
    columns: Some("HourDK,PriceArea,SpotPriceDKK"),
    sort: Some("HourDK asc"),
    limit: 0,
};

/// Hourly settlement consumption. The column set has changed across API
/// revisions, so no `columns` restriction: we take everything and resolve
/// the schema dynamically. 2000 rows is ample for a 7-day hourly window.
pub const CONSUMPTION_SETTLEMENT: DatasetProfile = DatasetProfile {
    dataset: "ProductionConsumptionSettlement",
    columns: None,
    sort: Some("HourDK asc"),
    limit: 2000,
};

pub struct EdsClient {
    client: Client,
    base_url: String,
}

impl EdsClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("EDS_BASE_URL").unwrap_or_else(|_| BASE_URL.to_string());
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url })
    }

    /// Fetch all records for `profile` within `window`.
    ///
    /// A request can fail solely because the requested sort field does not
    /// exist in that dataset's schema; in that case we retry exactly once with
    /// the sort key dropped. Any further failure propagates to the caller.
    pub fn fetch_records(
        &self,
        profile: &DatasetProfile,
        window: &TimeWindow,
        area: PriceArea,
    ) -> Result<Vec<RawRecord>, AppError> {
        match self.fetch_once(profile, window, area, profile.sort) {
            Ok(records) => Ok(records),
            Err(_) if profile.sort.is_some() => self.fetch_once(profile, window, area, None),
            Err(e) => Err(e),
        }
    }

    fn fetch_once(
        &self,
        profile: &DatasetProfile,
        window: &TimeWindow,
        area: PriceArea,
        sort: Option<&'static str>,
    ) -> Result<Vec<RawRecord>, AppError> {
        let url = format!("{}/{}", self.base_url, profile.dataset);

        let mut req = self.client.get(&url).query(&[
            ("start", window.start_param()),
            ("end", window.end_param()),
            ("filter", filter_param(area)),
            ("limit", profile.limit.to_string()),
        ]);
        if let Some(columns) = profile.columns {
            req = req.query(&[("columns", columns)]);
        }
        if let Some(sort) = sort {
            req = req.query(&[("sort", sort)]);
        }

        let resp = req
            .send()
            .map_err(|e| AppError::new(4, format!("{} request failed: {e}", profile.dataset)))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!(
                    "{} request failed with status {}.",
                    profile.dataset,
                    resp.status()
                ),
            ));
        }

        let body: RecordsResponse = resp.json().map_err(|e| {
            AppError::new(
                4,
                format!("Failed to parse {} response: {e}", profile.dataset),
            )
        })?;

        Ok(body.records)
    }
}

/// Serialize the structured area selector the way the upstream expects:
/// a JSON object mapping the filter field to a list of accepted values.
pub fn filter_param(area: PriceArea) -> String {
    serde_json::json!({ "PriceArea": [area.as_str()] }).to_string()
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    records: Vec<RawRecord>,
}
