//! Per-day income, expense and net profit totals for time-series charts.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

use super::{
    TransactionState,
    core::{Transaction, TransactionType, format_date},
    query::{DateRangeFilter, SortOrder, get_transactions},
};

/// Chart series where index `i` of every vector describes the date `labels[i]`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// The dates that have at least one transaction, in ascending order.
    pub labels: Vec<String>,
    /// The total income on each date.
    pub income: Vec<f64>,
    /// The total expenses on each date.
    pub expenses: Vec<f64>,
    /// Income minus expenses on each date, not carried over between dates.
    pub net_profit: Vec<f64>,
}

#[derive(Debug, Default, Clone, Copy)]
struct DailyTotals {
    income: f64,
    expenses: f64,
}

/// Group transactions by date and total each day's income and expenses.
///
/// Days without transactions are left out rather than filled with zeros.
pub fn aggregate_by_day(transactions: &[Transaction]) -> ChartData {
    let mut totals: BTreeMap<Date, DailyTotals> = BTreeMap::new();

    for transaction in transactions {
        let day = totals.entry(transaction.date).or_default();

        match transaction.transaction_type {
            TransactionType::Income => day.income += transaction.amount,
            TransactionType::Expense => day.expenses += transaction.amount,
        }
    }

    let mut chart_data = ChartData {
        labels: Vec::with_capacity(totals.len()),
        income: Vec::with_capacity(totals.len()),
        expenses: Vec::with_capacity(totals.len()),
        net_profit: Vec::with_capacity(totals.len()),
    };

    for (date, day) in totals {
        chart_data.labels.push(format_date(date));
        chart_data.income.push(day.income);
        chart_data.expenses.push(day.expenses);
        chart_data.net_profit.push(day.income - day.expenses);
    }

    chart_data
}

/// A route handler for the per-day chart series of all transactions between
/// the optional `start_date` and `end_date`.
pub async fn get_chart_data_endpoint(
    State(state): State<TransactionState>,
    query: Result<Query<DateRangeFilter>, QueryRejection>,
) -> Result<Json<ChartData>, Error> {
    let Query(range) = query?;

    let connection = state.connection()?;
    let transactions = get_transactions(&range.into(), SortOrder::Ascending, None, &connection)?;

    Ok(Json(aggregate_by_day(&transactions)))
}
