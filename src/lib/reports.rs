//! Read-only views over a ledger snapshot: listings, the next-due lookup, windowed
//! payment reports, per-customer summaries and the monthly trend.
//!
//! Nothing here writes to the store. Every function takes one snapshot up front and
//! answers from it, so a report is internally consistent even while payments land.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use tracing::debug;

use crate::config::ReportConfig;
use crate::error::{LedgerError, Result};
use crate::payments::outstanding_balance;
use crate::store::{LedgerState, LedgerStore};
use crate::types::{
    Customer, CustomerId, Installment, InstallmentStatus, MonetaryAmount, Purchase, PurchaseId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Customer(CustomerId),
}

impl Scope {
    fn admits(&self, purchase: &Purchase) -> bool {
        match self {
            Scope::All => true,
            Scope::Customer(id) => purchase.customer_id == *id,
        }
    }

    fn check(&self, ledger: &LedgerState) -> Result<()> {
        match self {
            Scope::All => Ok(()),
            Scope::Customer(id) => ledger.customer(*id).map(|_| ()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallmentFilter {
    /// Keep only these statuses; `None` keeps all.
    pub statuses: Option<Vec<InstallmentStatus>>,
    pub outstanding_only: bool,
}

impl InstallmentFilter {
    pub fn outstanding() -> Self {
        Self {
            statuses: None,
            outstanding_only: true,
        }
    }

    fn admits(&self, installment: &Installment) -> bool {
        let status_ok = self
            .statuses
            .as_ref()
            .map_or(true, |statuses| statuses.contains(&installment.status));
        status_ok && (!self.outstanding_only || installment.is_outstanding())
    }
}

/// Installments in `scope` passing `filter`, ordered by due date, then purchase, then
/// installment number.
pub fn list_installments(
    store: &LedgerStore,
    scope: Scope,
    filter: &InstallmentFilter,
) -> Result<Vec<Installment>> {
    let ledger = store.snapshot();
    scope.check(&ledger)?;
    let mut installments: Vec<Installment> = ledger
        .installments()
        .filter(|(purchase, installment)| scope.admits(purchase) && filter.admits(installment))
        .map(|(_, installment)| installment.clone())
        .collect();
    installments.sort_by_key(|i| (i.due_date, i.purchase_id, i.installment_number));
    Ok(installments)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOverview {
    pub purchase: Purchase,
    pub installments: usize,
    pub total_paid: MonetaryAmount,
    pub total_due: MonetaryAmount,
}

/// Purchases in `scope` with their live balances, ordered by purchase date then id.
pub fn list_purchases(store: &LedgerStore, scope: Scope) -> Result<Vec<PurchaseOverview>> {
    let ledger = store.snapshot();
    scope.check(&ledger)?;
    let mut overviews = ledger
        .purchases()
        .filter(|purchase| scope.admits(purchase))
        .map(|purchase| -> Result<_> {
            let schedule = ledger.installments_of(purchase.id)?;
            Ok(PurchaseOverview {
                purchase: purchase.clone(),
                installments: schedule.len(),
                total_paid: MonetaryAmount::try_sum(schedule.iter().map(|i| i.paid_amount))?,
                total_due: outstanding_balance(schedule)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    overviews.sort_by_key(|o| (o.purchase.purchase_date, o.purchase.id));
    Ok(overviews)
}

/// The customer's unpaid installment with the earliest due date, if any.
pub fn next_due(store: &LedgerStore, customer_id: CustomerId) -> Result<Option<Installment>> {
    let ledger = store.snapshot();
    ledger.customer(customer_id)?;
    Ok(ledger
        .installments()
        .filter(|(purchase, installment)| {
            purchase.customer_id == customer_id && installment.is_outstanding()
        })
        .map(|(_, installment)| installment)
        .min_by_key(|i| (i.due_date, i.purchase_id, i.installment_number))
        .cloned())
}

/// A closed time range `[start, end]` for payment and purchase events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// The `days` leading up to and including `as_of`. Fails if the start falls outside
    /// the representable calendar.
    pub fn trailing_days(as_of: DateTime<Utc>, days: u32) -> Result<Self> {
        Duration::try_days(i64::from(days))
            .and_then(|span| as_of.checked_sub_signed(span))
            .map(|start| Self { start, end: as_of })
            .ok_or(LedgerError::DateOutOfRange(as_of.date_naive()))
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    fn contains_opt(&self, at: Option<DateTime<Utc>>) -> bool {
        at.map_or(false, |at| self.contains(at))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurchaseTotals {
    pub total_purchases: MonetaryAmount,
    pub total_items: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallmentTotals {
    /// Paid amounts of installments last paid inside the window.
    pub total_paid: MonetaryAmount,
    /// Live outstanding balance; deliberately not limited to the window.
    pub total_due: MonetaryAmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub customer: Customer,
    pub purchase_data: PurchaseTotals,
    pub installment_data: InstallmentTotals,
    pub purchase_id: PurchaseId,
    pub installment_number: u32,
    pub paid_amount: MonetaryAmount,
    pub due_amount: MonetaryAmount,
    pub status: InstallmentStatus,
    pub payment_date: DateTime<Utc>,
}

fn purchase_totals(
    ledger: &LedgerState,
    customer_id: CustomerId,
    window: &ReportWindow,
) -> Result<PurchaseTotals> {
    ledger
        .purchases_of(customer_id)
        .filter(|p| window.contains(p.purchase_date))
        .try_fold(PurchaseTotals::default(), |acc, p| -> Result<_> {
            Ok(PurchaseTotals {
                total_purchases: acc.total_purchases.checked_add(p.total_price)?,
                total_items: acc.total_items + u64::from(p.quantity),
            })
        })
}

fn windowed_paid<'a, I>(installments: I, window: &ReportWindow) -> Result<MonetaryAmount>
where
    I: IntoIterator<Item = &'a Installment>,
{
    MonetaryAmount::try_sum(
        installments
            .into_iter()
            .filter(|i| window.contains_opt(i.payment_date))
            .map(|i| i.paid_amount),
    )
}

fn installment_totals(
    ledger: &LedgerState,
    purchase_id: PurchaseId,
    window: &ReportWindow,
) -> Result<InstallmentTotals> {
    let schedule = ledger.installments_of(purchase_id)?;
    Ok(InstallmentTotals {
        total_paid: windowed_paid(schedule, window)?,
        total_due: outstanding_balance(schedule)?,
    })
}

/// One row per installment that received a payment inside `window`, ordered by payment
/// time, then purchase, then installment number.
pub fn period_report(store: &LedgerStore, window: ReportWindow) -> Result<Vec<ReportRow>> {
    let ledger = store.snapshot();
    let mut triggering: Vec<(&Purchase, &Installment, DateTime<Utc>)> = ledger
        .installments()
        .filter_map(|(purchase, installment)| {
            installment
                .payment_date
                .filter(|at| window.contains(*at))
                .map(|at| (purchase, installment, at))
        })
        .collect();
    triggering.sort_by_key(|(purchase, installment, at)| {
        (*at, purchase.id, installment.installment_number)
    });

    debug!(
        start = %window.start,
        end = %window.end,
        rows = triggering.len(),
        "building period report"
    );

    triggering
        .into_iter()
        .map(|(purchase, installment, at)| -> Result<_> {
            let customer = ledger.customer(purchase.customer_id)?;
            Ok(ReportRow {
                customer: customer.clone(),
                purchase_data: purchase_totals(&ledger, customer.id, &window)?,
                installment_data: installment_totals(&ledger, purchase.id, &window)?,
                purchase_id: purchase.id,
                installment_number: installment.installment_number,
                paid_amount: installment.paid_amount,
                due_amount: installment.due_amount,
                status: installment.status,
                payment_date: at,
            })
        })
        .collect()
}

pub fn weekly_report(
    store: &LedgerStore,
    as_of: DateTime<Utc>,
    config: &ReportConfig,
) -> Result<Vec<ReportRow>> {
    let window = ReportWindow::trailing_days(as_of, config.weekly_window_days)?;
    period_report(store, window)
}

pub fn monthly_report(
    store: &LedgerStore,
    as_of: DateTime<Utc>,
    config: &ReportConfig,
) -> Result<Vec<ReportRow>> {
    let window = ReportWindow::trailing_days(as_of, config.monthly_window_days)?;
    period_report(store, window)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSummary {
    pub customer: Customer,
    pub purchase_data: PurchaseTotals,
    pub total_paid: MonetaryAmount,
    pub total_due: MonetaryAmount,
}

/// One summary per registered customer, in customer id order, including customers with
/// no activity in the window.
pub fn customer_summaries(
    store: &LedgerStore,
    window: ReportWindow,
) -> Result<Vec<CustomerSummary>> {
    let ledger = store.snapshot();
    ledger
        .customers()
        .map(|customer| -> Result<_> {
            let owned: Vec<&Installment> = ledger
                .installments()
                .filter(|(purchase, _)| purchase.customer_id == customer.id)
                .map(|(_, installment)| installment)
                .collect();
            Ok(CustomerSummary {
                customer: customer.clone(),
                purchase_data: purchase_totals(&ledger, customer.id, &window)?,
                total_paid: windowed_paid(owned.iter().copied(), &window)?,
                total_due: outstanding_balance(owned.iter().copied())?,
            })
        })
        .collect()
}

/// Per-month totals, oldest month first. The three series line up with `labels`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyTrend {
    pub labels: Vec<String>,
    pub total_purchases: Vec<MonetaryAmount>,
    pub total_paid: Vec<MonetaryAmount>,
    pub total_due: Vec<MonetaryAmount>,
}

/// Totals for the `months` calendar months ending with the month of `as_of`. Purchases
/// are bucketed by purchase date, installments by due date.
pub fn monthly_trend(store: &LedgerStore, as_of: NaiveDate, months: u32) -> Result<MonthlyTrend> {
    let ledger = store.snapshot();
    let current = as_of
        .with_day(1)
        .ok_or(LedgerError::DateOutOfRange(as_of))?;

    (0..months).rev().try_fold(MonthlyTrend::default(), |mut trend, back| -> Result<_> {
        let month = current
            .checked_sub_months(Months::new(back))
            .ok_or(LedgerError::DateOutOfRange(as_of))?;
        let same_month = |d: NaiveDate| d.year() == month.year() && d.month() == month.month();

        let falling_due: Vec<&Installment> = ledger
            .installments()
            .map(|(_, installment)| installment)
            .filter(|i| same_month(i.due_date))
            .collect();

        trend.labels.push(month.format("%B").to_string());
        trend.total_purchases.push(MonetaryAmount::try_sum(
            ledger
                .purchases()
                .filter(|p| same_month(p.purchase_date.date_naive()))
                .map(|p| p.total_price),
        )?);
        trend
            .total_paid
            .push(MonetaryAmount::try_sum(falling_due.iter().map(|i| i.paid_amount))?);
        trend
            .total_due
            .push(outstanding_balance(falling_due.iter().copied())?);
        Ok(trend)
    })
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

    use super::{
        customer_summaries, list_installments, list_purchases, monthly_report, monthly_trend,
        next_due, period_report, weekly_report, InstallmentFilter, ReportWindow, Scope,
    };
    use crate::config::{Interval, ReportConfig, ScheduleConfig};
    use crate::error::LedgerError;
    use crate::payments::apply_payment;
    use crate::schedule::create_purchase;
    use crate::store::LedgerStore;
    use crate::types::{Customer, CustomerId, InstallmentStatus, MonetaryAmount, PurchaseId};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn amount(minor: i64) -> MonetaryAmount {
        MonetaryAmount::from_minor(minor)
    }

    fn register(store: &LedgerStore, id: u32, username: &str) -> CustomerId {
        let customer = Customer {
            id: CustomerId::new(id),
            username: username.to_string(),
            first_name: username.to_uppercase(),
            last_name: "Tester".to_string(),
            email: format!("{}@example.com", username),
        };
        store.register_customer(customer).unwrap();
        CustomerId::new(id)
    }

    fn monthly(count: u32) -> ScheduleConfig {
        ScheduleConfig {
            count,
            cadence: Interval::Months(1),
            first_due_offset: Interval::Months(1),
        }
    }

    fn buy(
        store: &LedgerStore,
        customer: CustomerId,
        total: i64,
        count: u32,
        when: DateTime<Utc>,
    ) -> PurchaseId {
        create_purchase(store, customer, amount(total), 2, &monthly(count), when).unwrap()
    }

    #[test]
    fn next_due_skips_paid_installments() {
        let store = LedgerStore::new();
        let ada = register(&store, 1, "ada");
        // Due 2024-04-01 (settled below), 2024-06-01 and 2024-05-01.
        let early = buy(&store, ada, 100, 1, at(2024, 3, 1));
        buy(&store, ada, 100, 1, at(2024, 5, 1));
        let middle = buy(&store, ada, 100, 1, at(2024, 4, 1));
        apply_payment(&store, early, amount(100), at(2024, 3, 20)).unwrap();

        let installment = next_due(&store, ada).unwrap().unwrap();
        assert_eq!(installment.purchase_id, middle);
        assert_eq!(installment.due_date, date(2024, 5, 1));
    }

    #[test]
    fn next_due_is_none_when_everything_is_paid() {
        let store = LedgerStore::new();
        let ada = register(&store, 1, "ada");
        let purchase = buy(&store, ada, 100, 2, at(2024, 3, 1));
        apply_payment(&store, purchase, amount(100), at(2024, 3, 2)).unwrap();
        assert_eq!(next_due(&store, ada).unwrap(), None);

        let unknown = next_due(&store, CustomerId::new(7));
        assert!(matches!(unknown, Err(LedgerError::CustomerNotFound(_))));
    }

    #[test]
    fn listing_scopes_to_customer_and_filters_status() {
        let store = LedgerStore::new();
        let ada = register(&store, 1, "ada");
        let bob = register(&store, 2, "bob");
        let purchase = buy(&store, ada, 300, 3, at(2024, 1, 1));
        buy(&store, bob, 200, 2, at(2024, 1, 1));
        apply_payment(&store, purchase, amount(100), at(2024, 1, 10)).unwrap();

        let all = list_installments(&store, Scope::All, &InstallmentFilter::default()).unwrap();
        assert_eq!(all.len(), 5);

        let ada_open =
            list_installments(&store, Scope::Customer(ada), &InstallmentFilter::outstanding())
                .unwrap();
        assert_eq!(ada_open.len(), 2);
        assert!(ada_open.iter().all(|i| i.purchase_id == purchase));

        let paid = InstallmentFilter {
            statuses: Some(vec![InstallmentStatus::Paid]),
            outstanding_only: false,
        };
        let paid = list_installments(&store, Scope::All, &paid).unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].installment_number, 1);
    }

    #[test]
    fn purchases_list_live_balances() {
        let store = LedgerStore::new();
        let ada = register(&store, 1, "ada");
        let purchase = buy(&store, ada, 300, 3, at(2024, 1, 1));
        apply_payment(&store, purchase, amount(120), at(2024, 1, 10)).unwrap();

        let overviews = list_purchases(&store, Scope::Customer(ada)).unwrap();
        assert_eq!(overviews.len(), 1);
        assert_eq!(overviews[0].installments, 3);
        assert_eq!(overviews[0].total_paid, amount(120));
        assert_eq!(overviews[0].total_due, amount(180));
    }

    #[test]
    fn weekly_report_rows_join_customer_and_totals() {
        let store = LedgerStore::new();
        let ada = register(&store, 1, "ada");
        let purchase = buy(&store, ada, 100, 2, at(2024, 3, 1));
        apply_payment(&store, purchase, amount(70), at(2024, 3, 5)).unwrap();

        let rows = weekly_report(&store, at(2024, 3, 6), &ReportConfig::default()).unwrap();
        assert_eq!(rows.len(), 2);
        let first = &rows[0];
        assert_eq!(first.customer.username, "ada");
        assert_eq!(first.customer.full_name(), "ADA Tester");
        assert_eq!(first.installment_number, 1);
        assert_eq!(first.status, InstallmentStatus::Paid);
        assert_eq!(first.installment_data.total_paid, amount(70));
        assert_eq!(first.installment_data.total_due, amount(30));
        assert_eq!(first.purchase_data.total_purchases, amount(100));
        assert_eq!(first.purchase_data.total_items, 2);
        assert_eq!(rows[1].status, InstallmentStatus::Due);
        assert_eq!(rows[1].due_amount, amount(30));
    }

    #[test]
    fn total_due_does_not_depend_on_window() {
        let store = LedgerStore::new();
        let ada = register(&store, 1, "ada");
        let purchase = buy(&store, ada, 300, 3, at(2024, 1, 1));
        apply_payment(&store, purchase, amount(100), at(2024, 1, 10)).unwrap();
        apply_payment(&store, purchase, amount(50), at(2024, 2, 10)).unwrap();

        let as_of = at(2024, 2, 12);
        let narrow_window = ReportWindow::trailing_days(as_of, 7).unwrap();
        let wide_window = ReportWindow::trailing_days(as_of, 60).unwrap();
        let narrow = period_report(&store, narrow_window).unwrap();
        let wide = period_report(&store, wide_window).unwrap();

        assert_eq!(narrow.len(), 1);
        assert_eq!(wide.len(), 2);
        assert_eq!(narrow[0].installment_data.total_paid, amount(50));
        assert_eq!(wide[0].installment_data.total_paid, amount(150));
        for row in narrow.iter().chain(wide.iter()) {
            assert_eq!(row.installment_data.total_due, amount(150));
        }
    }

    #[test]
    fn purchases_and_payments_use_separate_windows() {
        let store = LedgerStore::new();
        let ada = register(&store, 1, "ada");
        let old = buy(&store, ada, 100, 1, at(2024, 1, 1));
        buy(&store, ada, 40, 1, at(2024, 3, 1));
        apply_payment(&store, old, amount(10), at(2024, 3, 2)).unwrap();

        let rows = weekly_report(&store, at(2024, 3, 3), &ReportConfig::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].purchase_id, old);
        assert_eq!(rows[0].purchase_data.total_purchases, amount(40));
    }

    #[test]
    fn report_status_is_the_ledger_status() {
        let store = LedgerStore::new();
        let ada = register(&store, 1, "ada");
        let purchase = buy(&store, ada, 100, 2, at(2024, 1, 1));
        apply_payment(&store, purchase, amount(20), at(2024, 3, 20)).unwrap();

        let rows = weekly_report(&store, at(2024, 3, 21), &ReportConfig::default()).unwrap();
        let listed = list_installments(&store, Scope::All, &InstallmentFilter::default()).unwrap();
        assert_eq!(rows[0].status, listed[0].status);
        assert_eq!(rows[0].status, InstallmentStatus::Overdue);
    }

    #[test]
    fn summaries_cover_every_customer() {
        let store = LedgerStore::new();
        let ada = register(&store, 1, "ada");
        register(&store, 2, "bob");
        let purchase = buy(&store, ada, 300, 3, at(2024, 3, 1));
        apply_payment(&store, purchase, amount(120), at(2024, 3, 2)).unwrap();

        let window = ReportWindow::trailing_days(at(2024, 3, 3), 7).unwrap();
        let summaries = customer_summaries(&store, window).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].total_paid, amount(120));
        assert_eq!(summaries[0].total_due, amount(180));
        assert_eq!(summaries[0].purchase_data.total_purchases, amount(300));
        assert_eq!(summaries[1].customer.username, "bob");
        assert_eq!(summaries[1].total_due, MonetaryAmount::ZERO);
    }

    #[test]
    fn trend_buckets_six_calendar_months() {
        let store = LedgerStore::new();
        let ada = register(&store, 1, "ada");
        // Installments fall due in February, March and April.
        let purchase = buy(&store, ada, 300, 3, at(2024, 1, 15));
        buy(&store, ada, 50, 1, at(2023, 10, 3));
        apply_payment(&store, purchase, amount(130), at(2024, 2, 1)).unwrap();

        let trend = monthly_trend(&store, date(2024, 3, 31), 6).unwrap();
        assert_eq!(
            trend.labels,
            vec!["October", "November", "December", "January", "February", "March"]
        );
        assert_eq!(trend.total_purchases[0], amount(50));
        assert_eq!(trend.total_purchases[3], amount(300));
        assert_eq!(trend.total_paid[4], amount(100));
        assert_eq!(trend.total_paid[5], amount(30));
        assert_eq!(trend.total_due[5], amount(70));
        // October's purchase falls due in November.
        assert_eq!(trend.total_due[1], amount(50));
        assert_eq!(trend.total_due[2], MonetaryAmount::ZERO);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let as_of = at(2024, 3, 8);
        let window = ReportWindow::trailing_days(as_of, 7).unwrap();
        assert!(window.contains(as_of - Duration::days(7)));
        assert!(window.contains(as_of));
        assert!(!window.contains(as_of + Duration::seconds(1)));
    }

    #[test]
    fn report_windows_follow_config() {
        let store = LedgerStore::new();
        let ada = register(&store, 1, "ada");
        let purchase = buy(&store, ada, 300, 3, at(2024, 1, 1));
        apply_payment(&store, purchase, amount(100), at(2024, 3, 1)).unwrap();

        let as_of = at(2024, 3, 10);
        assert!(weekly_report(&store, as_of, &ReportConfig::default())
            .unwrap()
            .is_empty());
        let wider = ReportConfig {
            weekly_window_days: 14,
            ..ReportConfig::default()
        };
        assert_eq!(weekly_report(&store, as_of, &wider).unwrap().len(), 1);

        let narrower = ReportConfig {
            monthly_window_days: 5,
            ..ReportConfig::default()
        };
        let monthly = monthly_report(&store, as_of, &ReportConfig::default()).unwrap();
        assert_eq!(monthly.len(), 1);
        assert!(monthly_report(&store, as_of, &narrower).unwrap().is_empty());
    }

    #[test]
    fn windows_reaching_past_the_calendar_are_errors() {
        let result = ReportWindow::trailing_days(at(2024, 3, 8), u32::MAX);
        assert!(matches!(result, Err(LedgerError::DateOutOfRange(_))));

        let store = LedgerStore::new();
        let config = ReportConfig {
            weekly_window_days: u32::MAX,
            ..ReportConfig::default()
        };
        let result = weekly_report(&store, at(2024, 3, 8), &config);
        assert!(matches!(result, Err(LedgerError::DateOutOfRange(_))));
    }

    #[test]
    fn totals_past_i64_fail_instead_of_wrapping() {
        let store = LedgerStore::new();
        let ada = register(&store, 1, "ada");
        let first = buy(&store, ada, i64::MAX, 3, at(2024, 3, 1));
        buy(&store, ada, i64::MAX, 3, at(2024, 3, 2));
        apply_payment(&store, first, amount(1), at(2024, 3, 3)).unwrap();

        let as_of = at(2024, 3, 4);
        let weekly = weekly_report(&store, as_of, &ReportConfig::default());
        assert!(matches!(weekly, Err(LedgerError::AmountOverflow)));

        let window = ReportWindow::trailing_days(as_of, 7).unwrap();
        let summaries = customer_summaries(&store, window);
        assert!(matches!(summaries, Err(LedgerError::AmountOverflow)));

        let trend = monthly_trend(&store, date(2024, 3, 31), 6);
        assert!(matches!(trend, Err(LedgerError::AmountOverflow)));
    }
}
