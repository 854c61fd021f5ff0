//! Row conversion helpers shared by the repositories.

use std::str::FromStr;

use chrono::NaiveDate;

/// Parse an ISO-8601 date column.
pub(crate) fn parse_date(value: String, column_index: usize) -> rusqlite::Result<NaiveDate> {
    value.parse::<NaiveDate>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            column_index,
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })
}

/// Parse a status column into its domain enum.
pub(crate) fn parse_enum<T>(value: String, column_index: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    value.parse::<T>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            column_index,
            rusqlite::types::Type::Text,
            err.into(),
        )
    })
}
