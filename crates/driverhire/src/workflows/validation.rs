use chrono::NaiveDate;

/// Request-shape failures. Each maps to a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },
    #[error("{field} must be a YYYY-MM-DD date (found '{value}')")]
    InvalidDate { field: &'static str, value: String },
    #[error("kyc status must be 'approved' or 'rejected' (found '{0}')")]
    InvalidKycDecision(String),
    #[error("no updates provided")]
    NoUpdates,
    #[error("rating must be between 1 and 5 (found {0})")]
    RatingOutOfRange(i64),
}

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Collects every missing field of a request before failing, so callers see them all at once.
#[derive(Debug, Default)]
pub(crate) struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn take(&mut self, field: &'static str, value: Option<String>) -> String {
        match present(value) {
            Some(value) => value,
            None => {
                self.missing.push(field);
                String::new()
            }
        }
    }

    /// Non-string counterpart of `take`.
    pub(crate) fn require<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.missing.push(field);
        }
        value
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields {
                fields: self.missing,
            })
        }
    }
}

pub(crate) fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}
