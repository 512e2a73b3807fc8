use chrono::{DateTime, Utc};
use im::Vector;
use tracing::{debug, info, warn};

use crate::error::{LedgerError, Result};
use crate::store::LedgerStore;
use crate::types::{Installment, InstallmentId, MonetaryAmount, PurchaseId};
use crate::utils::PushImmut;

pub fn outstanding_balance<'a, I>(installments: I) -> Result<MonetaryAmount>
where
    I: IntoIterator<Item = &'a Installment>,
{
    MonetaryAmount::try_sum(installments.into_iter().map(|i| i.due_amount))
}

/// Spreads `amount` over `installments` oldest first and returns only the installments it
/// touched. Refuses the whole payment if it does not fit, so a rejection has no partial
/// effect.
fn allocate_payment(
    installments: &Vector<Installment>,
    amount: MonetaryAmount,
    paid_at: DateTime<Utc>,
) -> Result<Vector<Installment>> {
    if !amount.is_positive() {
        return Err(LedgerError::InvalidPayment(amount));
    }
    let outstanding = outstanding_balance(installments)?;
    if amount > outstanding {
        return Err(LedgerError::Overpayment {
            amount,
            outstanding,
        });
    }

    let mut open: Vec<&Installment> = installments.iter().filter(|i| i.is_outstanding()).collect();
    open.sort_by_key(|i| i.installment_number);

    let (remaining, touched) = open.into_iter().try_fold(
        (amount, Vector::new()),
        |(remaining, touched): (MonetaryAmount, Vector<Installment>),
         installment|
         -> Result<_> {
            if remaining.is_zero() {
                return Ok((remaining, touched));
            }
            let take = remaining.min(installment.due_amount);
            let received = installment.receive(take, paid_at)?;
            Ok((remaining - take, touched.push(received)))
        },
    )?;
    debug_assert!(remaining.is_zero());
    Ok(touched)
}

/// Applies `amount` to a purchase's outstanding installments, earliest first, and returns
/// the installments it changed.
///
/// The allocation is computed on a snapshot and committed against the purchase revision
/// that snapshot carried. If another payment landed in between, the commit fails with
/// [`LedgerError::ConcurrencyConflict`] and nothing is written; resubmitting is safe.
pub fn apply_payment(
    store: &LedgerStore,
    purchase_id: PurchaseId,
    amount: MonetaryAmount,
    paid_at: DateTime<Utc>,
) -> Result<Vec<Installment>> {
    let ledger = store.snapshot();
    let revision = ledger.revision(purchase_id)?;
    let touched = allocate_payment(ledger.installments_of(purchase_id)?, amount, paid_at)?;
    let touched: Vec<Installment> = touched.into_iter().collect();

    store.commit(purchase_id, revision, &touched)?;
    info!(
        purchase = %purchase_id,
        %amount,
        installments = touched.len(),
        "payment applied"
    );
    Ok(touched)
}

/// [`apply_payment`] retried while it keeps losing the race to concurrent writers, up to
/// `attempts` tries in total. Any other failure is returned immediately.
pub fn apply_payment_with_retry(
    store: &LedgerStore,
    purchase_id: PurchaseId,
    amount: MonetaryAmount,
    paid_at: DateTime<Utc>,
    attempts: u32,
) -> Result<Vec<Installment>> {
    let mut attempt = 1;
    loop {
        match apply_payment(store, purchase_id, amount, paid_at) {
            Err(e) if e.is_retryable() && attempt < attempts => {
                debug!(purchase = %purchase_id, attempt, "retrying after conflict");
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Pays down one named installment. Amounts above that installment's own balance are
/// refused instead of spilling into later installments.
pub fn pay_specific_installment(
    store: &LedgerStore,
    installment_id: InstallmentId,
    amount: MonetaryAmount,
    paid_at: DateTime<Utc>,
) -> Result<Installment> {
    let ledger = store.snapshot();
    let installment = ledger.installment(installment_id)?;
    let purchase_id = installment.purchase_id;
    let revision = ledger.revision(purchase_id)?;

    let touched = allocate_payment(&Vector::unit(installment.clone()), amount, paid_at)?;
    let updated = touched.head().cloned().ok_or_else(|| {
        warn!(installment = %installment_id, "allocation touched nothing");
        LedgerError::InstallmentNotFound(installment_id)
    })?;

    store.commit(purchase_id, revision, &[updated.clone()])?;
    info!(
        installment = %installment_id,
        purchase = %purchase_id,
        %amount,
        "installment payment applied"
    );
    Ok(updated)
}
