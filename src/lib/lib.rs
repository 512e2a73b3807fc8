mod config;
mod error;
mod io;
mod payments;
mod reports;
mod schedule;
mod store;
mod types;
mod utils;

use std::path::Path;

use chrono::{DateTime, Utc};
use im::HashMap;
use tracing::{debug, info, warn};

pub use config::{Interval, LedgerConfig, ReportConfig, ScheduleConfig};
pub use error::{LedgerError, Result};
pub use io::{parse_timestamp, process_csv as read_events, LedgerEvent};
pub use payments::{
    apply_payment as pay_installment, apply_payment_with_retry as pay_installment_with_retry,
    outstanding_balance, pay_specific_installment,
};
pub use reports::{
    customer_summaries, list_installments, list_purchases, monthly_report, monthly_trend,
    next_due, period_report, weekly_report, CustomerSummary, InstallmentFilter,
    InstallmentTotals, MonthlyTrend, PurchaseOverview, PurchaseTotals, ReportRow, ReportWindow,
    Scope,
};
pub use schedule::{create_purchase, generate as generate_schedule};
pub use store::{LedgerState, LedgerStore};
pub use types::{
    Customer, CustomerId, Installment, InstallmentId, InstallmentStatus, MonetaryAmount,
    Purchase, PurchaseId, Revision,
};

use io::{
    output_csv, process_csv, reference_of, InstallmentEntity, ReportRowEntity, SummaryEntity,
    TrendEntity,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Installments,
    Weekly,
    Monthly,
    Trend,
    Summary,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub report: ReportKind,
    pub as_of: DateTime<Utc>,
    pub config: LedgerConfig,
}

/// Outcome of replaying an events file: the populated store, the caller references of
/// every purchase, and how many rows the ledger refused.
pub struct Replay {
    pub store: LedgerStore,
    pub references: HashMap<PurchaseId, u32>,
    pub rejected: usize,
}

fn apply_event(
    store: &LedgerStore,
    purchases: &HashMap<u32, PurchaseId>,
    schedule: &ScheduleConfig,
    event: LedgerEvent,
) -> Result<Option<(u32, PurchaseId)>> {
    match event {
        LedgerEvent::RegisterCustomer(customer) => {
            store.register_customer(customer)?;
            Ok(None)
        }
        LedgerEvent::Purchase {
            customer,
            reference,
            total_price,
            quantity,
            purchased_at,
        } => {
            if purchases.contains_key(&reference) {
                return Err(LedgerError::InvalidInput(format!(
                    "purchase reference {} used twice",
                    reference
                )));
            }
            let id = create_purchase(store, customer, total_price, quantity, schedule, purchased_at)?;
            Ok(Some((reference, id)))
        }
        LedgerEvent::Payment {
            reference,
            amount,
            paid_at,
        } => {
            let purchase_id = purchases.get(&reference).copied().ok_or_else(|| {
                LedgerError::InvalidInput(format!("unknown purchase reference {}", reference))
            })?;
            pay_installment(store, purchase_id, amount, paid_at)?;
            Ok(None)
        }
    }
}

/// Replays events in order into a fresh store. Rows the ledger refuses are logged and
/// skipped; they never abort the replay.
pub fn replay<I>(events: I, schedule: &ScheduleConfig) -> Replay
where
    I: IntoIterator<Item = LedgerEvent>,
{
    let store = LedgerStore::new();
    let (purchases, rejected) = events.into_iter().enumerate().fold(
        (HashMap::<u32, PurchaseId>::new(), 0usize),
        |(purchases, rejected), (row, event)| {
            match apply_event(&store, &purchases, schedule, event) {
                Ok(Some((reference, id))) => (purchases.update(reference, id), rejected),
                Ok(None) => (purchases, rejected),
                Err(e) => {
                    warn!(row = row + 1, error = %e, "event rejected");
                    (purchases, rejected + 1)
                }
            }
        },
    );
    let references = purchases.into_iter().map(|(r, id)| (id, r)).collect();
    info!(rejected, "replay finished");
    Replay {
        store,
        references,
        rejected,
    }
}

pub fn render_report(replay: &Replay, options: &RunOptions) -> Result<String> {
    let store = &replay.store;
    let reports = &options.config.reports;
    debug!(report = ?options.report, as_of = %options.as_of, "rendering report");
    match options.report {
        ReportKind::Installments => {
            let installments =
                list_installments(store, Scope::All, &InstallmentFilter::default())?;
            output_csv(installments.iter().map(|i| {
                InstallmentEntity::from_installment(
                    i,
                    reference_of(&replay.references, i.purchase_id),
                )
            }))
        }
        ReportKind::Weekly | ReportKind::Monthly => {
            let rows = if options.report == ReportKind::Weekly {
                weekly_report(store, options.as_of, reports)?
            } else {
                monthly_report(store, options.as_of, reports)?
            };
            output_csv(rows.iter().map(|row| {
                ReportRowEntity::from_row(row, reference_of(&replay.references, row.purchase_id))
            }))
        }
        ReportKind::Trend => {
            let trend = monthly_trend(store, options.as_of.date_naive(), reports.trend_months)?;
            output_csv(TrendEntity::from_trend(&trend))
        }
        ReportKind::Summary => {
            let window = ReportWindow::trailing_days(options.as_of, reports.monthly_window_days)?;
            let summaries = customer_summaries(store, window)?;
            output_csv(summaries.iter().map(SummaryEntity::from_summary))
        }
    }
}

pub fn process_ledger(csv_path: &Path, options: &RunOptions) -> Result<String> {
    let events = process_csv(csv_path)?;

    let replayed = replay(events, &options.config.schedule);
    replayed.store.refresh_statuses(options.as_of.date_naive());

    let result = render_report(&replayed, options)?;
    Ok(result)
}
