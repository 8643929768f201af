//! Income, expense and net profit totals over a date range.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};

use crate::Error;

use super::{
    TransactionState,
    core::{Transaction, TransactionType},
    query::{DateRangeFilter, SortOrder, get_transactions},
};

/// Aggregate totals over a set of transactions.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of all income amounts.
    pub total_income: f64,
    /// The sum of all expense amounts.
    pub total_expenses: f64,
    /// `total_income - total_expenses`.
    pub net_profit: f64,
    /// The number of transactions of either type.
    pub transaction_count: usize,
}

/// Sum the income and expenses in `transactions`.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => total_income += transaction.amount,
            TransactionType::Expense => total_expenses += transaction.amount,
        }
    }

    Summary {
        total_income,
        total_expenses,
        net_profit: total_income - total_expenses,
        transaction_count: transactions.len(),
    }
}

/// A route handler for the summary of all transactions between the optional
/// `start_date` and `end_date`.
pub async fn get_summary_endpoint(
    State(state): State<TransactionState>,
    query: Result<Query<DateRangeFilter>, QueryRejection>,
) -> Result<Json<Summary>, Error> {
    let Query(range) = query?;

    let connection = state.connection()?;
    let transactions = get_transactions(&range.into(), SortOrder::Ascending, None, &connection)?;

    Ok(Json(summarize(&transactions)))
}

#[cfg(test)]
mod tests {
    use axum::{
        Json,
        extract::{Query, State},
    };
    use time::macros::date;

    use crate::{
        Error,
        test_utils::{create_test_transaction, get_test_state},
        transaction::{DateRangeFilter, Transaction, TransactionType, create_transaction},
    };

    use super::{Summary, get_summary_endpoint, summarize};

    const TOLERANCE: f64 = 0.01;

    #[test]
    fn empty_summary_is_zero() {
        assert_eq!(summarize(&[]), Summary::default());
    }

    #[test]
    fn net_profit_is_income_minus_expenses() {
        let state = get_test_state();
        let connection = state.connection().unwrap();
        let amounts = [
            (TransactionType::Income, 2500.0),
            (TransactionType::Expense, 450.0),
            (TransactionType::Income, 1800.0),
            (TransactionType::Expense, 125.5),
            (TransactionType::Expense, 89.99),
        ];
        let transactions: Vec<Transaction> = amounts
            .iter()
            .map(|(transaction_type, amount)| {
                create_transaction(
                    Transaction::build(*transaction_type, *amount, date!(2024 - 01 - 10), ""),
                    &connection,
                )
                .unwrap()
            })
            .collect();

        let summary = summarize(&transactions);

        assert!((summary.total_income - 4300.0).abs() < TOLERANCE);
        assert!((summary.total_expenses - 665.49).abs() < TOLERANCE);
        assert!(
            (summary.net_profit - (summary.total_income - summary.total_expenses)).abs()
                < TOLERANCE
        );
        assert_eq!(summary.transaction_count, 5);
    }

    #[tokio::test]
    async fn summarizes_all_transactions() {
        let state = get_test_state();
        create_test_transaction(&state, TransactionType::Income, 2500.0, date!(2024 - 01 - 15));
        create_test_transaction(&state, TransactionType::Expense, 450.0, date!(2024 - 01 - 01));

        let Json(summary) = get_summary_endpoint(State(state), Ok(Query(Default::default())))
            .await
            .unwrap();

        assert_eq!(
            summary,
            Summary {
                total_income: 2500.0,
                total_expenses: 450.0,
                net_profit: 2050.0,
                transaction_count: 2,
            }
        );
    }

    #[tokio::test]
    async fn summarizes_date_range() {
        let state = get_test_state();
        create_test_transaction(&state, TransactionType::Income, 2500.0, date!(2024 - 01 - 15));
        create_test_transaction(&state, TransactionType::Expense, 450.0, date!(2024 - 01 - 01));
        create_test_transaction(&state, TransactionType::Expense, 99.0, date!(2024 - 02 - 01));

        let range = DateRangeFilter {
            start_date: Some(date!(2024 - 01 - 10)),
            end_date: Some(date!(2024 - 01 - 31)),
        };
        let Json(summary) = get_summary_endpoint(State(state), Ok(Query(range)))
            .await
            .unwrap();

        assert_eq!(summary.total_income, 2500.0);
        assert_eq!(summary.total_expenses, 0.0);
        assert_eq!(summary.transaction_count, 1);
    }

    #[tokio::test]
    async fn summary_of_reversed_range_is_zero() {
        let state = get_test_state();
        create_test_transaction(&state, TransactionType::Income, 10.0, date!(2024 - 01 - 15));

        let range = DateRangeFilter {
            start_date: Some(date!(2024 - 01 - 31)),
            end_date: Some(date!(2024 - 01 - 01)),
        };
        let result = get_summary_endpoint(State(state), Ok(Query(range))).await;

        assert_eq!(result.map(|Json(summary)| summary), Ok(Summary::default()));
    }

    #[tokio::test]
    async fn poisoned_lock_is_an_error() {
        let state = get_test_state();
        let poisoner = state.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.db_connection.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let result = get_summary_endpoint(State(state), Ok(Query(Default::default()))).await;

        assert_eq!(result.map(|Json(summary)| summary), Err(Error::DatabaseLockError));
    }
}
