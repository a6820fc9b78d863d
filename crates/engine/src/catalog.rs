//! The commitment catalog.
//!
//! The catalog is the read-only source of [`Commitment`] definitions. The
//! on-disk document looks like:
//!
//! ```json
//! {
//!   "commitments": [
//!     {
//!       "id": 1,
//!       "name": "S3 commitment",
//!       "company": "cyberdyne",
//!       "service": "s3",
//!       "checkins": [
//!         {"start": "2024-01-01 00:00:00", "end": "2024-02-01 00:00:00", "amount": 1000}
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Every entry is validated once, when the catalog is built, so the rest of
//! the engine works with typed values only. A malformed entry does not fail
//! the load: it is kept as a [`RejectedCommitment`] and reported as a data
//! error only to callers that ask for it (by id or by company).

use std::{collections::BTreeSet, path::Path};

use serde::Deserialize;

use crate::{
    CheckIn, Commitment, CommitmentId, EngineError, Money, ResultEngine,
    util::{parse_timestamp, required_text},
};

/// A catalog entry that failed validation at load time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedCommitment {
    /// `None` when the entry has no integer `id`.
    pub id: Option<CommitmentId>,
    /// `None` when the entry has no usable `company`.
    pub company: Option<String>,
    pub reason: String,
}

impl RejectedCommitment {
    pub fn error(&self) -> EngineError {
        EngineError::InvalidData(self.reason.clone())
    }
}

/// Read access to commitment definitions.
///
/// Implementations must preserve declaration order.
pub trait CommitmentCatalog: Send + Sync {
    /// Every valid commitment, in declaration order.
    fn all_commitments(&self) -> Vec<Commitment>;

    /// Entries that could not be turned into a [`Commitment`].
    fn rejected(&self) -> &[RejectedCommitment] {
        &[]
    }

    /// Commitments owned by `company`, in declaration order.
    ///
    /// An unknown company yields an empty list. A company owning a rejected
    /// entry yields that entry's data error.
    fn commitments_for_company(&self, company: &str) -> ResultEngine<Vec<Commitment>> {
        if let Some(rejected) = self
            .rejected()
            .iter()
            .find(|rejected| rejected.company.as_deref() == Some(company))
        {
            return Err(rejected.error());
        }
        Ok(self
            .all_commitments()
            .into_iter()
            .filter(|commitment| commitment.company == company)
            .collect())
    }

    /// A single commitment of `company`.
    fn commitment(&self, company: &str, id: CommitmentId) -> ResultEngine<Commitment> {
        if let Some(rejected) = self.rejected().iter().find(|rejected| {
            rejected.id == Some(id) && rejected.company.as_deref().is_none_or(|c| c == company)
        }) {
            return Err(rejected.error());
        }
        self.all_commitments()
            .into_iter()
            .find(|commitment| commitment.company == company && commitment.id == id)
            .ok_or_else(|| {
                EngineError::KeyNotFound(format!(
                    "Commitment '{id}' not found for company '{company}'"
                ))
            })
    }

    /// Distinct companies, sorted. Includes owners of rejected entries.
    fn companies(&self) -> BTreeSet<String> {
        let mut companies: BTreeSet<String> = self
            .all_commitments()
            .into_iter()
            .map(|commitment| commitment.company)
            .collect();
        companies.extend(
            self.rejected()
                .iter()
                .filter_map(|rejected| rejected.company.clone()),
        );
        companies
    }
}

/// Raw catalog document.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    commitments: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CommitmentRecord {
    id: CommitmentId,
    name: String,
    company: String,
    service: String,
    #[serde(default)]
    checkins: Vec<CheckInRecord>,
}

#[derive(Debug, Deserialize)]
struct CheckInRecord {
    start: String,
    end: String,
    amount: AmountRecord,
}

/// Amounts may be written as JSON numbers or as decimal strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AmountRecord {
    Number(serde_json::Number),
    Text(String),
}

impl TryFrom<AmountRecord> for Money {
    type Error = EngineError;

    fn try_from(value: AmountRecord) -> Result<Self, Self::Error> {
        match value {
            AmountRecord::Number(number) => number.to_string().parse(),
            AmountRecord::Text(text) => text.parse(),
        }
    }
}

impl TryFrom<CheckInRecord> for CheckIn {
    type Error = EngineError;

    fn try_from(record: CheckInRecord) -> Result<Self, Self::Error> {
        let amount = Money::try_from(record.amount).map_err(|err| match err {
            EngineError::InvalidAmount(msg) => EngineError::InvalidData(msg),
            other => other,
        })?;
        Ok(CheckIn {
            start: parse_timestamp(&record.start, "start")?,
            end: parse_timestamp(&record.end, "end")?,
            amount,
        })
    }
}

impl TryFrom<CommitmentRecord> for Commitment {
    type Error = EngineError;

    fn try_from(record: CommitmentRecord) -> Result<Self, Self::Error> {
        let id = record.id;
        let checkins = record
            .checkins
            .into_iter()
            .map(CheckIn::try_from)
            .collect::<ResultEngine<Vec<_>>>()
            .map_err(|err| match err {
                EngineError::InvalidData(msg) => {
                    EngineError::InvalidData(format!("commitment {id}: {msg}"))
                }
                other => other,
            })?;

        let commitment = Commitment {
            id,
            name: required_text(&record.name, "name")?,
            company: required_text(&record.company, "company")?,
            service: required_text(&record.service, "service")?,
            checkins,
        };
        Ok(commitment)
    }
}

/// Catalog held in memory, parsed once from a JSON document.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    commitments: Vec<Commitment>,
    rejected: Vec<RejectedCommitment>,
}

impl StaticCatalog {
    /// Parses a catalog document.
    ///
    /// Only a document that is not a catalog at all fails; malformed entries
    /// are rejected one by one.
    pub fn from_json_str(json: &str) -> ResultEngine<Self> {
        let document: CatalogDocument = serde_json::from_str(json)
            .map_err(|err| EngineError::InvalidData(format!("invalid catalog: {err}")))?;

        let mut catalog = Self::default();
        for (index, value) in document.commitments.into_iter().enumerate() {
            let id = value.get("id").and_then(serde_json::Value::as_i64);
            let company = value
                .get("company")
                .and_then(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|company| !company.is_empty())
                .map(str::to_string);

            let parsed = serde_json::from_value::<CommitmentRecord>(value)
                .map_err(|err| EngineError::InvalidData(format!("commitment #{index}: {err}")))
                .and_then(Commitment::try_from);
            match parsed {
                Ok(commitment) => catalog.push(commitment),
                Err(err) => catalog.reject(id, company, err),
            }
        }

        Ok(catalog)
    }

    /// Reads and parses a catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> ResultEngine<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| {
            EngineError::Configuration(format!(
                "cannot read catalog {}: {err}",
                path.display()
            ))
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::info!(
            "loaded {} commitment(s) from {} ({} rejected)",
            catalog.len(),
            path.display(),
            catalog.rejected.len()
        );
        Ok(catalog)
    }

    /// Number of valid commitments.
    pub fn len(&self) -> usize {
        self.commitments.len()
    }

    /// Keeps `commitment` unless it is invalid or repeats an id.
    fn push(&mut self, commitment: Commitment) {
        let checked = if self.commitments.iter().any(|c| c.id == commitment.id) {
            Err(EngineError::InvalidData(format!(
                "duplicate commitment id {}",
                commitment.id
            )))
        } else {
            commitment.validate()
        };

        match checked {
            Ok(()) => self.commitments.push(commitment),
            Err(err) => self.reject(Some(commitment.id), Some(commitment.company), err),
        }
    }

    fn reject(&mut self, id: Option<CommitmentId>, company: Option<String>, err: EngineError) {
        tracing::warn!("rejected catalog entry: {err}");
        let reason = match err {
            EngineError::InvalidData(msg) | EngineError::InvalidAmount(msg) => msg,
            other => other.to_string(),
        };
        self.rejected.push(RejectedCommitment {
            id,
            company,
            reason,
        });
    }
}

impl CommitmentCatalog for StaticCatalog {
    fn all_commitments(&self) -> Vec<Commitment> {
        self.commitments.clone()
    }

    fn rejected(&self) -> &[RejectedCommitment] {
        &self.rejected
    }
}
