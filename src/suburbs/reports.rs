//! Explore and per-suburb report endpoints

use crate::config::ApiSettings;
use crate::error::FetchError;
use crate::network::ApiClient;
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Sections of a suburb report, one endpoint each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportSection {
    Livability,
    HousingMarket,
    DemandDevelopment,
    IncomeEmployment,
}

impl ReportSection {
    pub const ALL: [ReportSection; 4] = [
        ReportSection::Livability,
        ReportSection::HousingMarket,
        ReportSection::DemandDevelopment,
        ReportSection::IncomeEmployment,
    ];

    /// Trailing path segment of the section endpoint
    pub fn path_segment(&self) -> &'static str {
        match self {
            ReportSection::Livability => "livability",
            ReportSection::HousingMarket => "housing-market",
            ReportSection::DemandDevelopment => "demand-development",
            ReportSection::IncomeEmployment => "income-employment",
        }
    }
}

/// All report sections for one suburb; a section that failed to load is `None`
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuburbReports {
    pub suburb_id: u64,
    pub livability: Option<Value>,
    pub housing_market: Option<Value>,
    pub demand_development: Option<Value>,
    pub income_employment: Option<Value>,
}

impl SuburbReports {
    fn slot(&mut self, section: ReportSection) -> &mut Option<Value> {
        match section {
            ReportSection::Livability => &mut self.livability,
            ReportSection::HousingMarket => &mut self.housing_market,
            ReportSection::DemandDevelopment => &mut self.demand_development,
            ReportSection::IncomeEmployment => &mut self.income_employment,
        }
    }

    /// Number of sections that loaded
    pub fn loaded(&self) -> usize {
        [
            &self.livability,
            &self.housing_market,
            &self.demand_development,
            &self.income_employment,
        ]
        .iter()
        .filter(|s| s.is_some())
        .count()
    }
}

/// Endpoints reached through the "explore" call to action and the report pages
#[derive(Clone)]
pub struct SuburbApi {
    client: ApiClient,
    explore_path: String,
    reports_path: String,
    query_param: String,
}

impl SuburbApi {
    pub fn new(client: ApiClient, settings: &ApiSettings) -> Self {
        Self {
            client,
            explore_path: settings.explore_path.clone(),
            reports_path: settings.reports_path.trim_end_matches('/').to_string(),
            query_param: settings.query_param.clone(),
        }
    }

    /// Free-text explore request; the payload is passed through untouched
    pub async fn explore(&self, query: &str, cancel: &CancellationToken) -> Result<Value, FetchError> {
        debug!("Exploring '{}'", query);
        self.client
            .get_json(&self.explore_path, &[(self.query_param.as_str(), query)], cancel)
            .await
    }

    /// Fetch one report section
    pub async fn fetch_report(
        &self,
        suburb_id: u64,
        section: ReportSection,
        cancel: &CancellationToken,
    ) -> Result<Value, FetchError> {
        let path = format!(
            "{}/{}/{}",
            self.reports_path,
            suburb_id,
            section.path_segment()
        );
        self.client.get_json(&path, &[], cancel).await
    }

    /// Fetch every report section concurrently
    pub async fn fetch_all_reports(&self, suburb_id: u64, cancel: &CancellationToken) -> SuburbReports {
        let futures = ReportSection::ALL.iter().map(|&section| async move {
            (section, self.fetch_report(suburb_id, section, cancel).await)
        });

        let mut reports = SuburbReports {
            suburb_id,
            ..Default::default()
        };

        for (section, result) in join_all(futures).await {
            match result {
                Ok(value) => *reports.slot(section) = Some(value),
                Err(e) if e.is_cancelled() => {}
                Err(e) => warn!(
                    "Failed to load {} report for suburb {}: {}",
                    section.path_segment(),
                    suburb_id,
                    e
                ),
            }
        }

        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_segments() {
        let segments: Vec<_> = ReportSection::ALL.iter().map(|s| s.path_segment()).collect();
        assert_eq!(
            segments,
            vec!["livability", "housing-market", "demand-development", "income-employment"]
        );
    }

    #[test]
    fn test_loaded_count() {
        let mut reports = SuburbReports::default();
        assert_eq!(reports.loaded(), 0);
        *reports.slot(ReportSection::HousingMarket) = Some(Value::Null);
        assert_eq!(reports.loaded(), 1);
    }
}
