use chrono::NaiveDate;
use im::{HashMap, OrdMap, Vector};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{LedgerError, Result};
use crate::types::{
    Customer, CustomerId, Installment, InstallmentId, Purchase, PurchaseId, Revision,
};
use crate::utils::OrDefault;

/// An immutable view of the whole ledger. Built from persistent collections, so taking one
/// is a pointer copy and readers never block writers for longer than that copy.
#[derive(Default, Clone)]
pub struct LedgerState {
    customers: OrdMap<CustomerId, Customer>,
    purchases: OrdMap<PurchaseId, Purchase>,
    /// Each purchase's installments, ordered by installment_number.
    installments: HashMap<PurchaseId, Vector<Installment>>,
    installment_index: HashMap<InstallmentId, PurchaseId>,
    revisions: HashMap<PurchaseId, Revision>,
    last_purchase_id: u32,
    last_installment_id: u32,
}

impl LedgerState {
    pub fn customer(&self, id: CustomerId) -> Result<&Customer> {
        self.customers
            .get(&id)
            .ok_or(LedgerError::CustomerNotFound(id))
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    pub fn purchase(&self, id: PurchaseId) -> Result<&Purchase> {
        self.purchases.get(&id).ok_or(LedgerError::PurchaseNotFound(id))
    }

    pub fn purchases(&self) -> impl Iterator<Item = &Purchase> {
        self.purchases.values()
    }

    pub fn purchases_of(&self, customer_id: CustomerId) -> impl Iterator<Item = &Purchase> {
        self.purchases
            .values()
            .filter(move |p| p.customer_id == customer_id)
    }

    pub fn installments_of(&self, purchase_id: PurchaseId) -> Result<&Vector<Installment>> {
        self.installments
            .get(&purchase_id)
            .ok_or(LedgerError::PurchaseNotFound(purchase_id))
    }

    /// Every installment paired with its purchase, in purchase id then installment order.
    pub fn installments(&self) -> impl Iterator<Item = (&Purchase, &Installment)> {
        self.purchases.values().flat_map(move |purchase| {
            self.installments
                .get(&purchase.id)
                .into_iter()
                .flat_map(|schedule| schedule.iter())
                .map(move |installment| (purchase, installment))
        })
    }

    pub fn installment(&self, id: InstallmentId) -> Result<&Installment> {
        let purchase_id = self
            .installment_index
            .get(&id)
            .ok_or(LedgerError::InstallmentNotFound(id))?;
        self.installments_of(*purchase_id)?
            .iter()
            .find(|i| i.id == id)
            .ok_or(LedgerError::InstallmentNotFound(id))
    }

    pub fn revision(&self, purchase_id: PurchaseId) -> Result<Revision> {
        self.purchase(purchase_id)?;
        Ok(self.revisions.get_or_default(&purchase_id))
    }

    fn with_purchase(&self, purchase: Purchase, schedule: Vector<Installment>) -> Self {
        let mut next = self.clone();
        for installment in schedule.iter() {
            next.installment_index.insert(installment.id, purchase.id);
        }
        next.last_purchase_id = next.last_purchase_id.max(purchase.id.value());
        next.last_installment_id = schedule
            .iter()
            .map(|i| i.id.value())
            .fold(next.last_installment_id, u32::max);
        next.revisions.insert(purchase.id, Revision::default());
        next.installments.insert(purchase.id, schedule);
        next.purchases.insert(purchase.id, purchase);
        next
    }

    /// Replaces installments of one purchase, matched by installment_number.
    fn with_installments(
        &self,
        purchase_id: PurchaseId,
        changed: &[Installment],
        revision: Revision,
    ) -> Self {
        let mut next = self.clone();
        let schedule = next.installments.get_or_default(&purchase_id);
        let schedule = changed.iter().fold(schedule, |acc, updated| {
            acc.into_iter()
                .map(|current| {
                    if current.installment_number == updated.installment_number {
                        updated.clone()
                    } else {
                        current
                    }
                })
                .collect()
        });
        next.installments.insert(purchase_id, schedule);
        next.revisions.insert(purchase_id, revision);
        next
    }
}

/// The shared ledger. All writes go through a single write lock and validate against the
/// purchase revision the caller read, which gives row-level lost-update protection
/// without holding the lock while the caller computes.
#[derive(Default)]
pub struct LedgerStore {
    state: RwLock<LedgerState>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> LedgerState {
        self.state.read().clone()
    }

    pub fn register_customer(&self, customer: Customer) -> Result<()> {
        let mut state = self.state.write();
        if state.customers.contains_key(&customer.id) {
            return Err(LedgerError::DuplicateCustomer(customer.id));
        }
        debug!(customer = %customer.id, username = %customer.username, "registering customer");
        state.customers.insert(customer.id, customer);
        Ok(())
    }

    /// Allocates ids and inserts the purchase with its schedule as one unit. `build`
    /// receives the new purchase id and the first free installment id; if it fails
    /// nothing is written.
    pub fn insert_purchase<F>(&self, customer_id: CustomerId, build: F) -> Result<Purchase>
    where
        F: FnOnce(PurchaseId, InstallmentId) -> Result<(Purchase, Vector<Installment>)>,
    {
        let mut state = self.state.write();
        state.customer(customer_id)?;
        let purchase_id = PurchaseId::new(state.last_purchase_id + 1);
        let first_installment = InstallmentId::new(state.last_installment_id + 1);
        let (purchase, schedule) = build(purchase_id, first_installment)?;
        info!(
            purchase = %purchase.id,
            customer = %customer_id,
            total = %purchase.total_price,
            installments = schedule.len(),
            "purchase recorded"
        );
        *state = state.with_purchase(purchase.clone(), schedule);
        Ok(purchase)
    }

    /// Writes `changed` if the purchase is still at `expected`, returning the new revision.
    pub fn commit(
        &self,
        purchase_id: PurchaseId,
        expected: Revision,
        changed: &[Installment],
    ) -> Result<Revision> {
        let mut state = self.state.write();
        let found = state.revision(purchase_id)?;
        if found != expected {
            debug!(purchase = %purchase_id, %expected, %found, "stale commit refused");
            return Err(LedgerError::ConcurrencyConflict {
                purchase: purchase_id,
                expected,
                found,
            });
        }
        let revision = found.next();
        *state = state.with_installments(purchase_id, changed, revision);
        Ok(revision)
    }

    /// Recomputes the cached status of every unpaid installment as of `today`. Amounts are
    /// never touched. Returns how many installments changed status.
    pub fn refresh_statuses(&self, today: NaiveDate) -> usize {
        let mut state = self.state.write();
        let stale: Vec<(PurchaseId, Vec<Installment>)> = state
            .installments
            .iter()
            .map(|(purchase_id, schedule)| {
                let changed = schedule
                    .iter()
                    .filter(|i| i.derive_status(today) != i.status)
                    .map(|i| i.refresh_status(today))
                    .collect::<Vec<_>>();
                (*purchase_id, changed)
            })
            .filter(|(_, changed)| !changed.is_empty())
            .collect();

        let refreshed: usize = stale.iter().map(|(_, changed)| changed.len()).sum();
        *state = stale
            .into_iter()
            .fold(state.clone(), |acc, (purchase_id, changed)| {
                let revision = acc.revisions.get_or_default(&purchase_id).next();
                acc.with_installments(purchase_id, &changed, revision)
            });
        if refreshed > 0 {
            info!(%today, refreshed, "installment statuses refreshed");
        }
        refreshed
    }
}
