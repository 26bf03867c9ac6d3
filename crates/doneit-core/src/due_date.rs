use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing::warn;

use crate::validate::ValidationError;

/// `dd-MM-yyyy`, the text form due dates are stored in.
const DUE_DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[day]-[month]-[year]");

/// Calendar due date of a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueDate(Date);

impl DueDate {
    /// Wrap a calendar date.
    #[must_use]
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// Parse the `dd-MM-yyyy` text form.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidDueDate`] when the text is not a valid date.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        Date::parse(trimmed, DUE_DATE_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDueDate(trimmed.to_owned()))
    }

    /// Underlying calendar date.
    #[must_use]
    pub const fn date(self) -> Date {
        self.0
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.format(DUE_DATE_FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl FromStr for DueDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DueDate {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Deserialize an optional due date.
///
/// Blank strings read as `None`. So does any value that is not a
/// `dd-MM-yyyy` date, which is logged and dropped so one bad record cannot
/// keep the rest of a file from loading.
///
/// # Errors
/// Fails only when the value is neither null nor a string.
pub fn deserialize_optional<'de, D>(d: D) -> Result<Option<DueDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(d)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => match DueDate::parse(text) {
            Ok(due) => Ok(Some(due)),
            Err(err) => {
                warn!(value = text, %err, "Ignoring unreadable due date");
                Ok(None)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn parses_day_month_year() {
        let due = DueDate::parse("07-03-2025").unwrap_or_else(|err| panic!("must parse: {err}"));
        assert_eq!(due.date().day(), 7);
        assert_eq!(due.date().month(), Month::March);
        assert_eq!(due.date().year(), 2025);
        assert_eq!(due.to_string(), "07-03-2025");
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(matches!(
            DueDate::parse("2025-03-07"),
            Err(ValidationError::InvalidDueDate(_))
        ));
        assert!(DueDate::parse("31-02-2025").is_err());
        assert!(DueDate::parse("").is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "deserialize_optional")]
        due: Option<DueDate>,
    }

    fn read_due(json: &str) -> Option<DueDate> {
        serde_json::from_str::<Holder>(json)
            .unwrap_or_else(|err| panic!("must deserialize {json}: {err}"))
            .due
    }

    #[test]
    fn optional_due_date_tolerates_blank_and_foreign_formats() {
        assert_eq!(read_due(r#"{}"#), None);
        assert_eq!(read_due(r#"{"due": null}"#), None);
        assert_eq!(read_due(r#"{"due": "  "}"#), None);
        assert_eq!(read_due(r#"{"due": "2025/12/24"}"#), None);
        assert_eq!(read_due(r#"{"due": "31-02-2025"}"#), None);
        assert_eq!(read_due(r#"{"due": "24-12-2025"}"#).map(|due| due.to_string()), Some("24-12-2025".to_owned()));
    }

    #[test]
    fn optional_due_date_still_rejects_non_strings() {
        assert!(serde_json::from_str::<Holder>(r#"{"due": 42}"#).is_err());
    }
}
