use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters, ServerHandler},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router, ErrorData as McpError,
};

use crate::analyzer::{analyze, list_cities};
use crate::config::Config;
use crate::error::ClimateError;
use crate::formatters::{
    format_cities, format_city_report, format_live_unavailable, format_live_verdict,
    format_season_norm,
};
use crate::live::{check_live, ApiKey, OpenWeatherSource, TemperatureSource};
use crate::models::{AnalyzeCityRequest, CityReport, CompareLiveRequest, Reading, ReportFormat};
use crate::season::season_of_date;

/// MCP service answering climate questions over a loaded dataset
#[derive(Clone)]
pub struct Climate {
    readings: Arc<Vec<Reading>>,
    config: Arc<Config>,
    tool_router: ToolRouter<Self>,
}

impl Climate {
    /// Creates a service over an already loaded dataset
    pub fn new(readings: Vec<Reading>, config: Config) -> Self {
        Self {
            readings: Arc::new(readings),
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    /// Runs the historical analysis, mapping failures to MCP errors
    fn build_report(&self, city: &str) -> Result<CityReport, McpError> {
        analyze(city, &self.readings).map_err(to_mcp_error)
    }
}

fn to_mcp_error(err: ClimateError) -> McpError {
    match err {
        ClimateError::UnknownCity(_)
        | ClimateError::InvalidInput(_)
        | ClimateError::NoProfileForSeason(_)
        | ClimateError::InsufficientData(_) => McpError::invalid_params(err.to_string(), None),
        _ => McpError::internal_error(err.to_string(), None),
    }
}

/// Parses an optional YYYY-MM-DD date, defaulting to today (UTC)
fn parse_as_of(raw: Option<&str>) -> Result<NaiveDate, McpError> {
    match raw {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
            McpError::invalid_params(format!("as_of must be YYYY-MM-DD: {}", e), None)
        }),
        None => Ok(Utc::now().date_naive()),
    }
}

/// Runs the live check and renders it. A failed fetch still yields the
/// seasonal norm followed by a reason-specific unavailable message.
async fn live_comparison_text<S: TemperatureSource>(
    source: &S,
    api_key: &ApiKey,
    report: &CityReport,
    as_of: NaiveDate,
    timeout: Duration,
) -> Result<String, McpError> {
    match check_live(source, api_key, report, as_of, timeout).await {
        Ok(verdict) => Ok(format_live_verdict(&verdict)),
        Err(ClimateError::ExternalFetchFailed { reason, detail }) => {
            let mut output = format_season_norm(report, season_of_date(as_of));
            output.push('\n');
            output.push_str(&format_live_unavailable(&report.city, reason, &detail));
            Ok(output)
        }
        Err(e) => Err(to_mcp_error(e)),
    }
}

#[tool_handler]
impl ServerHandler for Climate {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mcp-city-climate".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Historical temperature analysis per city: seasonal profiles, yearly trends, \
                anomalies, and a comparison of the current temperature against the seasonal norm."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl Climate {
    /// Lists the cities present in the dataset
    #[tool(description = "List the cities available in the loaded temperature dataset.")]
    async fn list_cities(&self) -> Result<CallToolResult, McpError> {
        tracing::info!("Listing cities");

        let cities = list_cities(&self.readings);
        Ok(CallToolResult::success(vec![Content::text(format_cities(&cities))]))
    }

    /// Analyzes one city's history
    #[tool(description = "Analyze a city's historical temperatures: per-season mean, std, min, max and trend; per-year trend; and anomalies against a 30-day rolling baseline. Optional format: 'text' (default) or 'json'.")]
    async fn analyze_city(
        &self,
        Parameters(request): Parameters<AnalyzeCityRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Analyzing city: {}", request.city);

        let report = self.build_report(&request.city)?;

        let body = match request.format.unwrap_or_default() {
            ReportFormat::Text => format_city_report(&report),
            ReportFormat::Json => serde_json::to_string_pretty(&report).map_err(|e| {
                McpError::internal_error(format!("Failed to serialize report: {}", e), None)
            })?,
        };

        Ok(CallToolResult::success(vec![Content::text(body)]))
    }

    /// Compares the live temperature with the seasonal norm
    #[tool(description = "Fetch the current temperature for a city and check whether it lies within two standard deviations of that city's historical mean for the current season. Optional as_of (YYYY-MM-DD) selects the season; defaults to today.")]
    async fn compare_live(
        &self,
        Parameters(request): Parameters<CompareLiveRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Comparing live temperature for: {}", request.city);

        let report = self.build_report(&request.city)?;
        let as_of = parse_as_of(request.as_of.as_deref())?;

        let Some(api_key) = self.config.api_key.as_ref() else {
            return Err(McpError::internal_error(
                "Live comparison is not configured. Set OPENWEATHER_API_KEY.",
                None,
            ));
        };

        let source = OpenWeatherSource::new(self.config.fetch_timeout);
        let body = live_comparison_text(
            &source,
            api_key,
            &report,
            as_of,
            self.config.fetch_timeout,
        )
        .await?;

        Ok(CallToolResult::success(vec![Content::text(body)]))
    }
}
