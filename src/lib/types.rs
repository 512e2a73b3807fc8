use std::{fmt, ops::Sub, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::error::{LedgerError, Result};

#[derive(Default, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Copy)]
pub struct CustomerId(u32);

impl CustomerId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Default, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Copy)]
pub struct PurchaseId(u32);

impl PurchaseId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PurchaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Default, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Copy)]
pub struct InstallmentId(u32);

impl InstallmentId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn offset(&self, by: u32) -> Self {
        Self(self.0 + by)
    }
}

impl fmt::Display for InstallmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-purchase counter, bumped by every committed write to the purchase's installments.
#[derive(Default, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Copy)]
pub struct Revision(u64);

impl Revision {
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Money in integer minor units (cents). Decimal text only appears at the edges, when
/// parsing input or rendering output.
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct MonetaryAmount(i64);

impl MonetaryAmount {
    pub const ZERO: MonetaryAmount = MonetaryAmount(0);
    pub const MINOR_DIGITS: u32 = 2;

    pub fn from_minor(units: i64) -> Self {
        Self(units)
    }

    pub fn from_decimal(value: Decimal) -> Result<Self> {
        let scaled = value
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| LedgerError::InvalidAmount(value.to_string()))?;
        // Fractions of a cent are refused rather than rounded.
        if !scaled.fract().is_zero() {
            return Err(LedgerError::InvalidAmount(value.to_string()));
        }
        scaled
            .to_i64()
            .map(Self)
            .ok_or_else(|| LedgerError::InvalidAmount(value.to_string()))
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }

    pub fn value(&self) -> Decimal {
        Decimal::new(self.0, Self::MINOR_DIGITS)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(LedgerError::AmountOverflow)
    }

    /// Sums `amounts`, failing instead of wrapping when the total leaves the `i64` range.
    pub fn try_sum<I>(amounts: I) -> Result<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts.into_iter().try_fold(Self::ZERO, Self::checked_add)
    }
}

impl FromStr for MonetaryAmount {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let value = Decimal::from_str_exact(s.trim())?;
        Self::from_decimal(value)
    }
}

impl fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value())
    }
}

impl Sub for MonetaryAmount {
    type Output = MonetaryAmount;

    fn sub(self, rhs: Self) -> Self::Output {
        MonetaryAmount(self.0 - rhs.0)
    }
}

/// Identity fields copied from the external account system, kept so reports can be joined
/// without calling back into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub id: PurchaseId,
    pub customer_id: CustomerId,
    pub purchase_date: DateTime<Utc>,
    pub total_price: MonetaryAmount,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallmentStatus {
    Pending,
    Due,
    Paid,
    Overdue,
}

impl fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InstallmentStatus::Pending => "Pending",
            InstallmentStatus::Due => "Due",
            InstallmentStatus::Paid => "Paid",
            InstallmentStatus::Overdue => "Overdue",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installment {
    pub id: InstallmentId,
    pub purchase_id: PurchaseId,
    /// 1-based and contiguous within a purchase.
    pub installment_number: u32,
    pub due_date: NaiveDate,
    pub due_amount: MonetaryAmount,
    pub paid_amount: MonetaryAmount,
    /// Time of the most recent payment applied to this installment.
    pub payment_date: Option<DateTime<Utc>>,
    pub status: InstallmentStatus,
}

impl Installment {
    pub fn is_outstanding(&self) -> bool {
        self.due_amount.is_positive()
    }

    /// The single status rule. `Paid` holds exactly when nothing is left to pay; every
    /// other status describes an open balance relative to `today`.
    pub fn derive_status(&self, today: NaiveDate) -> InstallmentStatus {
        if self.due_amount.is_zero() {
            InstallmentStatus::Paid
        } else if today > self.due_date {
            InstallmentStatus::Overdue
        } else if today == self.due_date || self.paid_amount.is_positive() {
            InstallmentStatus::Due
        } else {
            InstallmentStatus::Pending
        }
    }

    pub fn refresh_status(&self, today: NaiveDate) -> Self {
        Self {
            status: self.derive_status(today),
            ..self.clone()
        }
    }

    /// Moves `take` from the due balance to the paid balance.
    pub fn receive(&self, take: MonetaryAmount, paid_at: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            due_amount: self.due_amount - take,
            paid_amount: self.paid_amount.checked_add(take)?,
            payment_date: Some(paid_at),
            ..self.clone()
        }
        .refresh_status(paid_at.date_naive()))
    }
}
