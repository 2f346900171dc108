//! The apportionment and aggregation engine: turns a flat expense history
//! into grouped totals, spreading multi-day stay costs across the nights
//! they cover.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::AnalyticsConfig;
use crate::domain::expense::{
    AggregationBucket, DailyContribution, ExpenseRecord, SummaryStats,
};

/// The dimension one grouping pass runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupDimension {
    Category,
    Location,
    Day,
}

/// Stateless aggregation over read-only expense snapshots.
///
/// Every call recomputes from scratch; there is no cache to invalidate.
pub struct AnalyticsService;

impl AnalyticsService {
    /// Expands each record into per-day contributions.
    ///
    /// A record with a valid stay range `[start, end)` contributes
    /// `amount / nights` on each covered day, unrounded so the expansion
    /// preserves the original amount. Anything else contributes once on
    /// its own date (or the dateless bucket).
    pub fn expand_to_daily_contributions(records: &[ExpenseRecord]) -> Vec<DailyContribution> {
        let mut contributions = Vec::new();
        for record in records {
            if record.has_stay_range() {
                // has_stay_range guarantees both bounds and start < end.
                let (Some(start), Some(end)) = (record.stay_start, record.stay_end) else {
                    continue;
                };
                let nights = end.signed_duration_since(start).num_days().max(1);
                let per_day = record.amount_base_currency / Decimal::from(nights);
                let mut day = start;
                while day < end {
                    contributions.push(DailyContribution {
                        date: Some(day),
                        amount: per_day,
                    });
                    match day.succ_opt() {
                        Some(next) => day = next,
                        None => break,
                    }
                }
            } else {
                contributions.push(DailyContribution {
                    date: record.date,
                    amount: record.amount_base_currency,
                });
            }
        }
        contributions
    }

    /// Groups records along one dimension into descending-total buckets.
    ///
    /// Missing keys land in the configured sentinel bucket. Ties keep the
    /// order keys were first encountered. Day grouping runs over daily
    /// contributions; category and location group raw records. The
    /// category-exclusion set applies to location and day views only —
    /// the category view always sees every record.
    pub fn group_by(
        records: &[ExpenseRecord],
        dimension: GroupDimension,
        config: &AnalyticsConfig,
    ) -> Vec<AggregationBucket> {
        let spending: Vec<&ExpenseRecord> =
            records.iter().filter(|r| !r.is_settlement()).collect();
        let mut buckets = match dimension {
            GroupDimension::Category => Self::accumulate(
                spending
                    .iter()
                    .map(|r| (Self::label_for(r.category.as_deref(), config), r.amount_base_currency)),
            ),
            GroupDimension::Location => Self::accumulate(
                spending
                    .iter()
                    .filter(|r| !config.is_excluded(r.category.as_deref()))
                    .map(|r| (Self::label_for(r.location.as_deref(), config), r.amount_base_currency)),
            ),
            GroupDimension::Day => {
                let filtered: Vec<ExpenseRecord> = spending
                    .iter()
                    .filter(|r| !config.is_excluded(r.category.as_deref()))
                    .map(|&r| r.clone())
                    .collect();
                Self::accumulate(Self::expand_to_daily_contributions(&filtered).into_iter().map(
                    |c| {
                        let label = c
                            .date
                            .map(|d| d.format("%Y-%m-%d").to_string())
                            .unwrap_or_else(|| config.missing_label.clone());
                        (label, c.amount)
                    },
                ))
            }
        };
        // Stable sort: ties keep first-encounter order.
        buckets.sort_by(|a, b| b.total.cmp(&a.total));
        debug!(?dimension, buckets = buckets.len(), "grouping pass complete");
        buckets
    }

    /// Headline figures across the whole history.
    ///
    /// The average is per record; the top buckets come from the same
    /// grouping passes the breakdown views use, so the category leader is
    /// unfiltered while location and day respect the exclusion set.
    pub fn summary_stats(records: &[ExpenseRecord], config: &AnalyticsConfig) -> SummaryStats {
        let spending: Vec<ExpenseRecord> = records
            .iter()
            .filter(|r| !r.is_settlement())
            .cloned()
            .collect();
        let count = spending.len();
        let grand_total: Decimal = spending.iter().map(|r| r.amount_base_currency).sum();
        let average = if count == 0 {
            Decimal::ZERO
        } else {
            grand_total / Decimal::from(count as u64)
        };
        let max_record = spending
            .iter()
            .fold(None::<&ExpenseRecord>, |best, candidate| match best {
                // Strict comparison: the first occurrence wins ties.
                Some(current) if candidate.amount_base_currency > current.amount_base_currency => {
                    Some(candidate)
                }
                Some(current) => Some(current),
                None => Some(candidate),
            })
            .cloned();
        SummaryStats {
            grand_total,
            count,
            average,
            max_record,
            top_category: Self::group_by(&spending, GroupDimension::Category, config)
                .into_iter()
                .next(),
            top_location: Self::group_by(&spending, GroupDimension::Location, config)
                .into_iter()
                .next(),
            top_date: Self::group_by(&spending, GroupDimension::Day, config)
                .into_iter()
                .next(),
        }
    }

    /// Mean bucket total across the distinct keys of one grouping pass,
    /// e.g. average spend per distinct day rather than per record.
    pub fn dimension_average(buckets: &[AggregationBucket]) -> Decimal {
        if buckets.is_empty() {
            return Decimal::ZERO;
        }
        let sum: Decimal = buckets.iter().map(|b| b.total).sum();
        sum / Decimal::from(buckets.len() as u64)
    }

    fn label_for(key: Option<&str>, config: &AnalyticsConfig) -> String {
        match key {
            Some(value) if !value.trim().is_empty() => value.to_string(),
            _ => config.missing_label.clone(),
        }
    }

    /// Sums labelled amounts, preserving first-encounter bucket order.
    fn accumulate(entries: impl Iterator<Item = (String, Decimal)>) -> Vec<AggregationBucket> {
        let mut buckets: Vec<AggregationBucket> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for (label, amount) in entries {
            match index.get(&label) {
                Some(&i) => buckets[i].total += amount,
                None => {
                    index.insert(label.clone(), buckets.len());
                    buckets.push(AggregationBucket {
                        label,
                        total: amount,
                    });
                }
            }
        }
        buckets
    }
}

/// Builds the calendar days covered by a half-open stay range.
///
/// Exposed for presentation layers that render one row per night.
pub fn stay_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day < end {
        days.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}
