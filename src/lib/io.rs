use std::{fs::File, path::Path};

use ::serde::{Deserialize, Serialize, Serializer};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{LedgerError, Result};
use crate::reports::{CustomerSummary, MonthlyTrend, ReportRow};
use crate::types::{Customer, CustomerId, Installment, MonetaryAmount, PurchaseId};

#[derive(Debug, Deserialize)]
pub enum EventTypeEntity {
    #[serde(alias = "customer")]
    Customer,
    #[serde(alias = "purchase")]
    Purchase,
    #[serde(alias = "payment")]
    Payment,
}

#[derive(Debug, Deserialize)]
pub struct EventRowEntity {
    #[serde(alias = "type")]
    pub event_type: EventTypeEntity,
    pub customer: Option<u32>,
    pub purchase: Option<u32>,
    pub amount: Option<String>,
    pub quantity: Option<u32>,
    pub date: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// One replayable line of the events file. Purchases are named by a caller-side
/// reference; the store assigns the real id when the purchase is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    RegisterCustomer(Customer),
    Purchase {
        customer: CustomerId,
        reference: u32,
        total_price: MonetaryAmount,
        quantity: u32,
        purchased_at: DateTime<Utc>,
    },
    Payment {
        reference: u32,
        amount: MonetaryAmount,
        paid_at: DateTime<Utc>,
    },
}

/// Accepts RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS` (read as UTC) and bare dates
/// (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(at.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| LedgerError::InvalidInput(format!("unparseable date {:?}", raw)))
}

fn required<T>(value: Option<T>, column: &str, row: &EventRowEntity) -> Result<T> {
    value.ok_or_else(|| {
        LedgerError::InvalidInput(format!("missing {} in row {:?}", column, row))
    })
}

impl EventRowEntity {
    fn into_domain(self) -> Result<LedgerEvent> {
        match self.event_type {
            EventTypeEntity::Customer => {
                let id = required(self.customer, "customer", &self)?;
                Ok(LedgerEvent::RegisterCustomer(Customer {
                    id: CustomerId::new(id),
                    username: self.username.unwrap_or_else(|| format!("customer{}", id)),
                    first_name: self.first_name.unwrap_or_default(),
                    last_name: self.last_name.unwrap_or_default(),
                    email: self.email.unwrap_or_default(),
                }))
            }
            EventTypeEntity::Purchase => Ok(LedgerEvent::Purchase {
                customer: CustomerId::new(required(self.customer, "customer", &self)?),
                reference: required(self.purchase, "purchase", &self)?,
                total_price: required(self.amount.as_deref(), "amount", &self)?.parse()?,
                quantity: self.quantity.unwrap_or(1),
                purchased_at: parse_timestamp(required(self.date.as_deref(), "date", &self)?)?,
            }),
            EventTypeEntity::Payment => Ok(LedgerEvent::Payment {
                reference: required(self.purchase, "purchase", &self)?,
                amount: required(self.amount.as_deref(), "amount", &self)?.parse()?,
                paid_at: parse_timestamp(required(self.date.as_deref(), "date", &self)?)?,
            }),
        }
    }
}

pub fn process_csv(csv_path: &Path) -> Result<Vec<LedgerEvent>> {
    let file = File::open(csv_path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let mut rows: Vec<LedgerEvent> = Vec::new();
    for row in reader.deserialize::<EventRowEntity>() {
        // fail if cannot deserialise, a half-replayed ledger is worse than none
        rows.push(row?.into_domain()?);
    }

    Ok(rows)
}

fn two_places<S: Serializer>(x: &MonetaryAmount, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&format!("{:.2}", x.value()))
}

#[derive(Debug, Serialize)]
pub struct InstallmentEntity {
    installment: u32,
    purchase: u32,
    number: u32,
    due_date: String,
    #[serde(serialize_with = "two_places")]
    due_amount: MonetaryAmount,
    #[serde(serialize_with = "two_places")]
    paid_amount: MonetaryAmount,
    payment_date: String,
    status: String,
}

impl InstallmentEntity {
    pub fn from_installment(installment: &Installment, reference: u32) -> Self {
        Self {
            installment: installment.id.value(),
            purchase: reference,
            number: installment.installment_number,
            due_date: installment.due_date.to_string(),
            due_amount: installment.due_amount,
            paid_amount: installment.paid_amount,
            payment_date: installment
                .payment_date
                .map(|at| at.to_rfc3339())
                .unwrap_or_default(),
            status: installment.status.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportRowEntity {
    customer_id: u32,
    customer_username: String,
    customer_name: String,
    customer_email: String,
    #[serde(serialize_with = "two_places")]
    total_purchases: MonetaryAmount,
    total_items: u64,
    #[serde(serialize_with = "two_places")]
    total_paid: MonetaryAmount,
    #[serde(serialize_with = "two_places")]
    total_due: MonetaryAmount,
    purchase_id: u32,
    installment_number: u32,
    #[serde(serialize_with = "two_places")]
    paid_amount: MonetaryAmount,
    #[serde(serialize_with = "two_places")]
    due_amount: MonetaryAmount,
    status: String,
}

impl ReportRowEntity {
    pub fn from_row(row: &ReportRow, reference: u32) -> Self {
        Self {
            customer_id: row.customer.id.value(),
            customer_username: row.customer.username.clone(),
            customer_name: row.customer.full_name(),
            customer_email: row.customer.email.clone(),
            total_purchases: row.purchase_data.total_purchases,
            total_items: row.purchase_data.total_items,
            total_paid: row.installment_data.total_paid,
            total_due: row.installment_data.total_due,
            purchase_id: reference,
            installment_number: row.installment_number,
            paid_amount: row.paid_amount,
            due_amount: row.due_amount,
            status: row.status.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryEntity {
    customer_id: u32,
    customer_username: String,
    #[serde(serialize_with = "two_places")]
    total_purchases: MonetaryAmount,
    total_items: u64,
    #[serde(serialize_with = "two_places")]
    total_paid: MonetaryAmount,
    #[serde(serialize_with = "two_places")]
    total_due: MonetaryAmount,
}

impl SummaryEntity {
    pub fn from_summary(summary: &CustomerSummary) -> Self {
        Self {
            customer_id: summary.customer.id.value(),
            customer_username: summary.customer.username.clone(),
            total_purchases: summary.purchase_data.total_purchases,
            total_items: summary.purchase_data.total_items,
            total_paid: summary.total_paid,
            total_due: summary.total_due,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrendEntity {
    month: String,
    #[serde(serialize_with = "two_places")]
    total_purchases: MonetaryAmount,
    #[serde(serialize_with = "two_places")]
    total_paid: MonetaryAmount,
    #[serde(serialize_with = "two_places")]
    total_due: MonetaryAmount,
}

impl TrendEntity {
    pub fn from_trend(trend: &MonthlyTrend) -> Vec<Self> {
        trend
            .labels
            .iter()
            .zip(&trend.total_purchases)
            .zip(&trend.total_paid)
            .zip(&trend.total_due)
            .map(|(((month, purchases), paid), due)| Self {
                month: month.clone(),
                total_purchases: *purchases,
                total_paid: *paid,
                total_due: *due,
            })
            .collect()
    }
}

pub fn output_csv<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    for row in rows {
        wtr.serialize(row)?
    }

    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| LedgerError::Io(e.into_error()))?;
    let data = String::from_utf8(bytes)?;
    Ok(data)
}

/// Maps store-assigned purchase ids back to the references used in the events file.
pub fn reference_of(references: &im::HashMap<PurchaseId, u32>, purchase_id: PurchaseId) -> u32 {
    references
        .get(&purchase_id)
        .copied()
        .unwrap_or_else(|| purchase_id.value())
}
