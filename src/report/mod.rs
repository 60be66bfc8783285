//! Report pipeline: sequence windows, fetch costs, aggregate series, analyze
//! trends, render. Any fetch failure aborts the whole run; the report is
//! never rendered with gaps.

pub mod analysis;
pub mod render;
pub mod series;

use chrono::NaiveDate;

use crate::billing::{BillingClient, CostQuery, GroupDimension};
use crate::calendar::{trailing_months, MonthWindow};
use crate::config::Config;
use crate::errors::CostError;

pub use analysis::{
    analyze, top_service_increases, Analysis, IncreaseSignal, ServiceBreakdown, ServiceIncrease,
    TrendSignal,
};
pub use render::ReportRenderer;
pub use series::{assemble_series, CostSeries, MONTHS_TRACKED};

/// How many services to call out per flagged account.
pub const TOP_SERVICES: usize = 2;

/// Runs the full report for the five months preceding `today` and returns
/// the rendered text.
pub fn run_report(
    client: &dyn BillingClient,
    config: &Config,
    today: NaiveDate,
    use_color: bool,
) -> Result<String, CostError> {
    let windows = trailing_months(today, MONTHS_TRACKED);
    let account_ids = config.account_ids();

    let mut window_costs = Vec::with_capacity(MONTHS_TRACKED);
    for window in &windows {
        tracing::info!(month = %window.label(), "fetching account costs");
        window_costs.push(client.grouped_costs(&CostQuery {
            account_ids: account_ids.clone(),
            window: *window,
            group_by: GroupDimension::LinkedAccount,
        })?);
    }

    let series = assemble_series(&window_costs);
    let analysis = analyze(&series, &config.thresholds);

    let breakdowns = fetch_breakdowns(client, &analysis, &windows)?;

    Ok(ReportRenderer::new(use_color).render(&windows, config, &analysis, &breakdowns))
}

/// Service-grouped fetches for the two latest windows, one pair per flagged
/// account, in the order the increases are reported.
fn fetch_breakdowns(
    client: &dyn BillingClient,
    analysis: &Analysis,
    windows: &[MonthWindow],
) -> Result<Vec<ServiceBreakdown>, CostError> {
    let prior_window = windows[MONTHS_TRACKED - 2];
    let latest_window = windows[MONTHS_TRACKED - 1];

    let mut breakdowns = Vec::with_capacity(analysis.increases.len());
    for signal in &analysis.increases {
        tracing::info!(account = %signal.account_id, "fetching service breakdown");
        let account_filter = vec![signal.account_id.clone()];
        let prior = client.grouped_costs(&CostQuery {
            account_ids: account_filter.clone(),
            window: prior_window,
            group_by: GroupDimension::Service,
        })?;
        let current = client.grouped_costs(&CostQuery {
            account_ids: account_filter,
            window: latest_window,
            group_by: GroupDimension::Service,
        })?;
        breakdowns.push(ServiceBreakdown {
            account_id: signal.account_id.clone(),
            services: top_service_increases(&current, &prior, TOP_SERVICES),
        });
    }
    Ok(breakdowns)
}
