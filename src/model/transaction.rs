use crate::model::category::{default_category, is_known_category};
use crate::model::{Amount, MonthKey};
use crate::Result;
use anyhow::ensure;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::debug;

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// The unique id of a transaction. Ids created by this program are millisecond timestamps, but
/// imported data may carry string tokens.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(untagged)]
pub enum TransactionId {
    Number(u64),
    Text(String),
}

impl TransactionId {
    pub(crate) fn as_number(&self) -> Option<u64> {
        match self {
            TransactionId::Number(n) => Some(*n),
            TransactionId::Text(_) => None,
        }
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionId::Number(n) => write!(f, "{n}"),
            TransactionId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for TransactionId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<u64>() {
            Ok(n) => TransactionId::Number(n),
            Err(_) => TransactionId::Text(s.to_string()),
        })
    }
}

struct TransactionIdVisitor;

impl<'de> Visitor<'de> for TransactionIdVisitor {
    type Value = TransactionId;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a non-negative integer or a string id")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<TransactionId, E> {
        Ok(TransactionId::Number(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<TransactionId, E> {
        u64::try_from(v)
            .map(TransactionId::Number)
            .map_err(|_| E::custom(format!("{v} is not a valid id")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<TransactionId, E> {
        Ok(TransactionId::Text(v.to_string()))
    }

    // Exact numbers arrive as a one-entry map holding the number text.
    fn visit_map<A: de::MapAccess<'de>>(
        self,
        mut map: A,
    ) -> std::result::Result<TransactionId, A::Error> {
        let Some((_, text)) = map.next_entry::<String, String>()? else {
            return Err(de::Error::custom("expected an id"));
        };
        text.parse::<u64>()
            .map(TransactionId::Number)
            .map_err(|_| de::Error::custom(format!("{text} is not a valid id")))
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TransactionIdVisitor)
    }
}

impl From<u64> for TransactionId {
    fn from(value: u64) -> Self {
        TransactionId::Number(value)
    }
}

/// A single income or expense record.
///
/// The JSON field names match the persisted format: `id`, `type`, `amount`, `category`, `date`,
/// `note`, `recurring` and `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub(crate) id: TransactionId,
    #[serde(rename = "type")]
    pub(crate) transaction_type: TransactionType,
    pub(crate) amount: Amount,
    pub(crate) category: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub(crate) date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) note: Option<String>,
    #[serde(default)]
    pub(crate) recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn new(
        id: impl Into<TransactionId>,
        transaction_type: TransactionType,
        amount: impl Into<Amount>,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            transaction_type,
            amount: amount.into(),
            category: category.into(),
            date,
            note: None,
            recurring: false,
            created_at: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The note, treating an empty string the same as no note.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref().filter(|s| !s.is_empty())
    }

    pub fn recurring(&self) -> bool {
        self.recurring
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// The `YYYY-MM` bucket of this transaction.
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, of which only the date is kept.
pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_date(&s).map_err(serde::de::Error::custom)
}

/// Parses a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Ok(dt.date_naive()),
        Err(_) => anyhow::bail!("Invalid date '{s}', expected YYYY-MM-DD"),
    }
}

/// A transaction as collected from the user, before it has been given an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub transaction_type: TransactionType,
    pub amount: Amount,
    /// When `None`, the first category of the type's vocabulary is used.
    pub category: Option<String>,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub recurring: bool,
}

impl NewTransaction {
    /// Rejects amounts that are zero or negative.
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)
    }

    /// Validates and turns this into a `Transaction` with the given `id` and creation time.
    pub fn into_transaction(
        self,
        id: TransactionId,
        created_at: DateTime<Utc>,
    ) -> Result<Transaction> {
        self.validate()?;
        let category = self
            .category
            .unwrap_or_else(|| default_category(self.transaction_type).key.to_string());
        if !is_known_category(&category, self.transaction_type) {
            debug!(
                "Category '{category}' is not a known {} category",
                self.transaction_type
            );
        }
        Ok(Transaction {
            id,
            transaction_type: self.transaction_type,
            amount: self.amount,
            category,
            date: self.date,
            note: self.note.filter(|s| !s.is_empty()),
            recurring: self.recurring,
            created_at: Some(created_at),
        })
    }
}

/// A partial update to an existing transaction. Fields that are `None` are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionEdit {
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<Amount>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    /// `Some("")` clears the note.
    pub note: Option<String>,
    pub recurring: Option<bool>,
}

impl TransactionEdit {
    pub fn is_empty(&self) -> bool {
        self == &TransactionEdit::default()
    }

    /// Edits are held to the same amount rule as new transactions.
    pub fn validate(&self) -> Result<()> {
        match self.amount {
            Some(amount) => validate_amount(amount),
            None => Ok(()),
        }
    }

    /// Merges the fields that are present into `transaction`. The `id` and `createdAt` of the
    /// transaction are never changed.
    pub fn apply(&self, transaction: &mut Transaction) {
        if let Some(t) = self.transaction_type {
            transaction.transaction_type = t;
        }
        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }
        if let Some(category) = &self.category {
            transaction.category = category.clone();
        }
        if let Some(date) = self.date {
            transaction.date = date;
        }
        if let Some(note) = &self.note {
            transaction.note = Some(note.clone()).filter(|s| !s.is_empty());
        }
        if let Some(recurring) = self.recurring {
            transaction.recurring = recurring;
        }
    }
}

fn validate_amount(amount: Amount) -> Result<()> {
    ensure!(
        amount.is_positive(),
        "Please enter a valid amount: {} is not greater than zero",
        amount.value()
    );
    ensure!(
        amount.is_within_limit(),
        "Please enter a valid amount: {} is larger than {}",
        amount.value(),
        Amount::MAX.value()
    );
    Ok(())
}
