//! Analytics: the summary counters and the per-day series, fetched as an
//! all-or-nothing pair, plus the client-side reductions the dashboard shows.

use chrono::NaiveDate;

use crate::api::ApiClient;
use crate::models::{StatsSummary, TimePoint};
use crate::workflows::WorkflowError;

/// Reductions computed from the time series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTotals {
    pub views: i64,
    pub videos: i64,
    /// Date with the most views, when the series is non-empty.
    pub peak_day: Option<(NaiveDate, i64)>,
    /// Mean views per point.
    pub daily_average: f64,
}

#[derive(Debug)]
pub struct StatsOverview {
    pub summary: StatsSummary,
    pub series: Vec<TimePoint>,
    pub totals: SeriesTotals,
}

/// Fetches summary and series concurrently; if either fails the whole load
/// fails and nothing is shown.
pub async fn load(api: &ApiClient, user_id: &str) -> Result<StatsOverview, WorkflowError> {
    let (summary, series) = tokio::try_join!(
        api.stats_summary(user_id),
        api.stats_timeseries(user_id)
    )?;
    let totals = fold_series(&series);
    Ok(StatsOverview {
        summary,
        series,
        totals,
    })
}

/// Folds the series into totals, the peak day, and the mean.
pub fn fold_series(series: &[TimePoint]) -> SeriesTotals {
    let mut totals = SeriesTotals {
        views: 0,
        videos: 0,
        peak_day: None,
        daily_average: 0.0,
    };

    for point in series {
        totals.views += point.views;
        totals.videos += point.videos;
        let beats_peak = totals
            .peak_day
            .map_or(true, |(_, views)| point.views > views);
        if beats_peak {
            totals.peak_day = Some((point.date, point.views));
        }
    }

    if !series.is_empty() {
        totals.daily_average = totals.views as f64 / series.len() as f64;
    }
    totals
}
