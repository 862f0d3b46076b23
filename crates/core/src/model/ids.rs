use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for building an identifier from raw input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdError {
    #[error("{kind} cannot be empty")]
    Empty { kind: &'static str },

    #[error("invalid state code: {raw:?}")]
    InvalidStateCode { raw: String },

    #[error("test number must be between 1 and {max}, got {value}")]
    InvalidTestNumber { value: u8, max: u8 },
}

/// Two-letter style jurisdiction code owning a question set (e.g. `CA`, `ZZ`).
///
/// Stored upper-cased so `"ca"` and `"CA"` address the same bank entry.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateCode(String);

impl StateCode {
    /// Creates a new `StateCode`.
    ///
    /// # Errors
    ///
    /// Returns `IdError::InvalidStateCode` unless the trimmed input is non-empty ASCII letters.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(IdError::InvalidStateCode {
                raw: raw.as_ref().to_owned(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a question, unique within its state and category.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId(String);

impl QuestionId {
    /// Creates a new `QuestionId`.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the trimmed input is empty.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty { kind: "question id" });
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Topic tag grouping questions (signs, rules of the road, ...).
///
/// Lower-cased on construction.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Tag applied to records that do not carry one.
    pub const GENERAL: &'static str = "general";

    /// Creates a new `Category`.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the trimmed input is empty.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty { kind: "category" });
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    #[must_use]
    pub fn general() -> Self {
        Self(Self::GENERAL.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Opaque account identifier used as the persistence key for progress.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Creates a new `UserId`.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the trimmed input is empty.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty { kind: "user id" });
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Practice test slot, 1 through 4.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TestNumber(u8);

impl TestNumber {
    /// Number of practice tests offered.
    pub const COUNT: u8 = 4;

    /// Creates a new `TestNumber`.
    ///
    /// # Errors
    ///
    /// Returns `IdError::InvalidTestNumber` outside `1..=4`.
    pub fn new(value: u8) -> Result<Self, IdError> {
        if !(1..=Self::COUNT).contains(&value) {
            return Err(IdError::InvalidTestNumber {
                value,
                max: Self::COUNT,
            });
        }
        Ok(Self(value))
    }

    /// Returns the underlying 1-based value
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Zero-based slot, handy for indexing per-test tables.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// All test numbers in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=Self::COUNT).map(Self)
    }
}

// ─── Conversions ───────────────────────────────────────────────────────────────

impl TryFrom<String> for StateCode {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for QuestionId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Category {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for UserId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<u8> for TestNumber {
    type Error = IdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StateCode> for String {
    fn from(value: StateCode) -> Self {
        value.0
    }
}

impl From<QuestionId> for String {
    fn from(value: QuestionId) -> Self {
        value.0
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl From<TestNumber> for u8 {
    fn from(value: TestNumber) -> Self {
        value.0
    }
}

// ─── Debug / Display ───────────────────────────────────────────────────────────

impl fmt::Debug for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateCode({})", self.0)
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Category({})", self.0)
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Debug for TestNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestNumber({})", self.0)
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TestNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr ───────────────────────────────────────────────────────────────────

impl FromStr for StateCode {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for QuestionId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for UserId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for TestNumber {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u8>()
            .map_err(|_| IdError::InvalidTestNumber {
                value: 0,
                max: Self::COUNT,
            })?;
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_code_is_upper_cased() {
        let code = StateCode::new(" ca ").unwrap();
        assert_eq!(code.as_str(), "CA");
        assert_eq!(code, "CA".parse().unwrap());
    }

    #[test]
    fn state_code_rejects_digits_and_blank() {
        assert!(StateCode::new("C4").is_err());
        assert!(StateCode::new("   ").is_err());
    }

    #[test]
    fn question_id_trims_and_rejects_empty() {
        assert_eq!(QuestionId::new(" q-1 ").unwrap().as_str(), "q-1");
        assert_eq!(
            QuestionId::new("").unwrap_err(),
            IdError::Empty { kind: "question id" }
        );
    }

    #[test]
    fn category_is_lower_cased() {
        assert_eq!(Category::new("Signs").unwrap().as_str(), "signs");
        assert_eq!(Category::general().as_str(), Category::GENERAL);
    }

    #[test]
    fn test_number_bounds() {
        assert!(TestNumber::new(0).is_err());
        assert_eq!(TestNumber::new(4).unwrap().index(), 3);
        assert!(TestNumber::new(5).is_err());
        assert_eq!(TestNumber::all().count(), 4);
    }

    #[test]
    fn test_number_from_str() {
        let n: TestNumber = "2".parse().unwrap();
        assert_eq!(n.value(), 2);
        assert!("x".parse::<TestNumber>().is_err());
    }

    #[test]
    fn ids_serialize_as_plain_values() {
        let code = StateCode::new("zz").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"ZZ\"");
        let parsed: TestNumber = serde_json::from_str("3").unwrap();
        assert_eq!(parsed.value(), 3);
        assert!(serde_json::from_str::<TestNumber>("9").is_err());
    }
}
