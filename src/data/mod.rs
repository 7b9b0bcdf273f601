//! Transaction log loading.
//!
//! Reads raw purchase events (`UserId, ServiceId, CategoryId, CreateDate`)
//! from CSV into an immutable in-memory log.

use crate::error::{BasketError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Header names the loader requires.
pub const REQUIRED_COLUMNS: [&str; 4] = ["UserId", "ServiceId", "CategoryId", "CreateDate"];

/// Naive formats tried in order before RFC 3339.
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// One purchase event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Customer id
    pub user_id: i64,
    /// Service id, only meaningful together with `category_id`
    pub service_id: i64,
    /// Category id
    pub category_id: i64,
    /// Purchase time
    pub created_at: NaiveDateTime,
}

impl Transaction {
    /// Creates a transaction from already parsed fields.
    #[must_use]
    pub fn new(user_id: i64, service_id: i64, category_id: i64, created_at: NaiveDateTime) -> Self {
        Self {
            user_id,
            service_id,
            category_id,
            created_at,
        }
    }

    /// Creates a transaction from a textual timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::InvalidTimestamp`] (line 0) if `created_at`
    /// is not a recognised date or date-time.
    ///
    /// # Examples
    ///
    /// ```
    /// use basket_arl::data::Transaction;
    ///
    /// let tx = Transaction::parse(25446, 4, 5, "2017-08-02 10:15:00").unwrap();
    /// assert_eq!(tx.user_id, 25446);
    /// ```
    pub fn parse(user_id: i64, service_id: i64, category_id: i64, created_at: &str) -> Result<Self> {
        let created_at = parse_timestamp(created_at).ok_or_else(|| BasketError::InvalidTimestamp {
            line: 0,
            value: created_at.to_string(),
        })?;
        Ok(Self::new(user_id, service_id, category_id, created_at))
    }
}

/// Parses `CreateDate` values.
///
/// Accepts `YYYY-MM-DD HH:MM[:SS[.fff]]` with a space or `T` separator,
/// RFC 3339 and a bare `YYYY-MM-DD` (midnight).
/// RFC 3339 values keep their local wall-clock time so the calendar month
/// is the one written in the file.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Row as it appears in the file, before validation.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "UserId")]
    user_id: Option<String>,
    #[serde(rename = "ServiceId")]
    service_id: Option<String>,
    #[serde(rename = "CategoryId")]
    category_id: Option<String>,
    #[serde(rename = "CreateDate")]
    create_date: Option<String>,
}

impl RawRow {
    fn into_transaction(self, line: u64) -> Result<Transaction> {
        let user_id = parse_id(self.user_id, "UserId", line)?;
        let service_id = parse_id(self.service_id, "ServiceId", line)?;
        let category_id = parse_id(self.category_id, "CategoryId", line)?;

        let raw_date = self
            .create_date
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| BasketError::invalid_row(line, "CreateDate", "is empty"))?;
        let created_at = parse_timestamp(&raw_date).ok_or(BasketError::InvalidTimestamp {
            line,
            value: raw_date,
        })?;

        Ok(Transaction::new(user_id, service_id, category_id, created_at))
    }
}

fn parse_id(value: Option<String>, field: &str, line: u64) -> Result<i64> {
    let value = value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BasketError::invalid_row(line, field, "is empty"))?;
    value
        .parse::<i64>()
        .map_err(|_| BasketError::invalid_row(line, field, &format!("is not an integer: '{value}'")))
}

/// Immutable, in-memory transaction log.
///
/// # Examples
///
/// ```
/// use basket_arl::data::TransactionLog;
///
/// let csv = "UserId,ServiceId,CategoryId,CreateDate\n\
///            25446,4,5,2017-08-02 00:00:00\n\
///            25446,48,5,2017-08-15 00:00:00\n";
/// let log = TransactionLog::from_reader(csv.as_bytes()).unwrap();
/// assert_eq!(log.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionLog {
    transactions: Vec<Transaction>,
}

impl TransactionLog {
    /// Wraps already parsed transactions.
    #[must_use]
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Loads a log from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, a required column is
    /// missing, or any row is invalid. The first bad row aborts the load.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening transaction log");
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Loads a log from any CSV source with a header row.
    ///
    /// # Errors
    ///
    /// Same conditions as [`TransactionLog::from_path`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(BasketError::MissingColumn {
                    column: column.to_string(),
                    available: headers.iter().collect::<Vec<_>>().join(","),
                });
            }
        }

        let mut transactions = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);
            let raw: RawRow = record.deserialize(Some(&headers))?;
            transactions.push(raw.into_transaction(line)?);
        }

        debug!(rows = transactions.len(), "transaction log loaded");
        Ok(Self { transactions })
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the log has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Iterates over the rows in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    /// Borrows the rows as a slice.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

impl From<Vec<Transaction>> for TransactionLog {
    fn from(transactions: Vec<Transaction>) -> Self {
        Self::new(transactions)
    }
}

impl<'a> IntoIterator for &'a TransactionLog {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
