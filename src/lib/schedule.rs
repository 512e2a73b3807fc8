use chrono::{DateTime, Utc};
use im::Vector;

use crate::config::ScheduleConfig;
use crate::error::{LedgerError, Result};
use crate::store::LedgerStore;
use crate::types::{
    CustomerId, Installment, InstallmentId, InstallmentStatus, MonetaryAmount, Purchase,
    PurchaseId,
};

fn validate(purchase: &Purchase, config: &ScheduleConfig) -> Result<()> {
    if !purchase.total_price.is_positive() {
        return Err(LedgerError::InvalidSchedule(format!(
            "total price must be positive, got {}",
            purchase.total_price
        )));
    }
    if config.count == 0 {
        return Err(LedgerError::InvalidSchedule(
            "installment count must be positive".to_string(),
        ));
    }
    if config.cadence.is_zero() {
        return Err(LedgerError::InvalidSchedule(format!(
            "cadence {} does not advance",
            config.cadence
        )));
    }
    // Every installment must carry at least one minor unit.
    if purchase.total_price.minor_units() < i64::from(config.count) {
        return Err(LedgerError::InvalidSchedule(format!(
            "total price {} cannot be split into {} installments",
            purchase.total_price, config.count
        )));
    }
    Ok(())
}

/// Splits the total into `count` shares of whole minor units. The last share absorbs the
/// remainder, so the shares always add back up to the total.
fn split_evenly(total: MonetaryAmount, count: u32) -> Vec<MonetaryAmount> {
    let count = i64::from(count);
    let base = total.minor_units() / count;
    let remainder = total.minor_units() % count;
    (0..count)
        .map(|k| {
            if k == count - 1 {
                MonetaryAmount::from_minor(base + remainder)
            } else {
                MonetaryAmount::from_minor(base)
            }
        })
        .collect()
}

/// The repayment schedule for `purchase`, numbered from 1 with ids starting at `first_id`.
pub fn generate(
    purchase: &Purchase,
    config: &ScheduleConfig,
    first_id: InstallmentId,
) -> Result<Vector<Installment>> {
    validate(purchase, config)?;

    let first_due = config
        .first_due_offset
        .advance(purchase.purchase_date.date_naive(), 1)?;

    split_evenly(purchase.total_price, config.count)
        .into_iter()
        .zip(0u32..)
        .map(|(share, k)| {
            Ok(Installment {
                id: first_id.offset(k),
                purchase_id: purchase.id,
                installment_number: k + 1,
                due_date: config.cadence.advance(first_due, k)?,
                due_amount: share,
                paid_amount: MonetaryAmount::ZERO,
                payment_date: None,
                status: InstallmentStatus::Pending,
            })
        })
        .collect()
}

/// Records a purchase together with its generated schedule. Either both land in the store
/// or neither does.
pub fn create_purchase(
    store: &LedgerStore,
    customer_id: CustomerId,
    total_price: MonetaryAmount,
    quantity: u32,
    config: &ScheduleConfig,
    purchased_at: DateTime<Utc>,
) -> Result<PurchaseId> {
    let purchase = store.insert_purchase(customer_id, |purchase_id, first_id| {
        let purchase = Purchase {
            id: purchase_id,
            customer_id,
            purchase_date: purchased_at,
            total_price,
            quantity,
        };
        let schedule = generate(&purchase, config, first_id)?;
        Ok((purchase, schedule))
    })?;
    Ok(purchase.id)
}
