//! Aggregates over a single user's transactions.
//!
//! Amounts are summed by absolute value; the transaction type decides the side.

use std::collections::BTreeMap;

use time::OffsetDateTime;

use crate::{
    auth::dto::UserProfile,
    dashboard::dto::{
        AlertLevel, CategoryAmount, DailyTotals, MonthlyTotals, SpendingAlert, Summary,
    },
    transactions::repo_types::{Transaction, TransactionKind},
};

const WARNING_SHARE: f64 = 0.8;

fn month_key(ts: OffsetDateTime) -> String {
    format!("{:04}-{:02}", ts.year(), u8::from(ts.month()))
}

fn day_key(ts: OffsetDateTime) -> String {
    format!("{}-{:02}", month_key(ts), ts.day())
}

fn split(tx: &Transaction) -> (f64, f64) {
    match tx.kind {
        TransactionKind::Income => (tx.amount.abs(), 0.0),
        TransactionKind::Expense => (0.0, tx.amount.abs()),
    }
}

pub fn summary(txs: &[Transaction]) -> Summary {
    let (total_income, total_expense) = txs.iter().map(split).fold((0.0, 0.0), |acc, (i, e)| {
        (acc.0 + i, acc.1 + e)
    });
    Summary {
        total_income,
        total_expense,
        net_savings: total_income - total_expense,
    }
}

/// Expense totals per category, largest first (ties by name).
pub fn category_breakdown(txs: &[Transaction]) -> Vec<CategoryAmount> {
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for tx in txs.iter().filter(|t| t.kind == TransactionKind::Expense) {
        *by_category.entry(tx.category.as_str()).or_default() += tx.amount.abs();
    }
    let mut out: Vec<CategoryAmount> = by_category
        .into_iter()
        .map(|(category, amount)| CategoryAmount {
            category: category.to_string(),
            amount,
        })
        .collect();
    out.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    out
}

fn bucket(txs: &[Transaction], key: fn(OffsetDateTime) -> String) -> BTreeMap<String, (f64, f64)> {
    let mut buckets: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for tx in txs {
        let (income, expense) = split(tx);
        let entry = buckets.entry(key(tx.date)).or_default();
        entry.0 += income;
        entry.1 += expense;
    }
    buckets
}

pub fn monthly_trend(txs: &[Transaction]) -> Vec<MonthlyTotals> {
    bucket(txs, month_key)
        .into_iter()
        .map(|(month, (income, expense))| MonthlyTotals {
            month,
            income,
            expense,
        })
        .collect()
}

pub fn daily_stats(txs: &[Transaction]) -> Vec<DailyTotals> {
    bucket(txs, day_key)
        .into_iter()
        .map(|(date, (income, expense))| DailyTotals {
            date,
            income,
            expense,
        })
        .collect()
}

/// Alerts against the profile's monthly income and savings goal for the month containing `now`.
pub fn spending_alerts(
    txs: &[Transaction],
    profile: &UserProfile,
    now: OffsetDateTime,
) -> Vec<SpendingAlert> {
    let current = month_key(now);
    let this_month: Vec<Transaction> = txs
        .iter()
        .filter(|t| month_key(t.date) == current)
        .cloned()
        .collect();
    let totals = summary(&this_month);
    let currency = profile.currency.as_deref().unwrap_or("");
    let mut alerts = Vec::new();

    if let Some(income) = profile.income.filter(|i| *i > 0.0) {
        if totals.total_expense > income {
            alerts.push(SpendingAlert {
                message: format!(
                    "Spending this month ({:.2}{}) exceeds your income ({:.2}{})",
                    totals.total_expense, currency, income, currency
                ),
                level: AlertLevel::Critical,
            });
        } else if totals.total_expense > income * WARNING_SHARE {
            alerts.push(SpendingAlert {
                message: format!(
                    "You have spent {:.0}% of your monthly income",
                    totals.total_expense / income * 100.0
                ),
                level: AlertLevel::Warning,
            });
        }
    }

    if let Some(goal) = profile.goal_amount.filter(|g| *g > 0.0) {
        if totals.net_savings < goal {
            let label = profile.goal.as_deref().filter(|g| !g.is_empty()).unwrap_or("savings goal");
            alerts.push(SpendingAlert {
                message: format!(
                    "Net savings this month ({:.2}{}) are below your {} target ({:.2}{})",
                    totals.net_savings, currency, label, goal, currency
                ),
                level: AlertLevel::Info,
            });
        }
    }

    if let Some(top) = category_breakdown(&this_month).first() {
        if totals.total_expense > 0.0 && top.amount / totals.total_expense > 0.5 {
            alerts.push(SpendingAlert {
                message: format!("High spending on {} this month!", top.category),
                level: AlertLevel::Warning,
            });
        }
    }

    alerts
}
