//! Case-insensitive regular expression search over transaction fields.

use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use rusqlite::{Connection, functions::FunctionFlags, types::ValueRef};

use crate::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A validated, case-insensitive search pattern.
///
/// The empty pattern matches every transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPattern(String);

impl SearchPattern {
    /// Validate `search` as a regular expression.
    ///
    /// # Errors
    /// Returns [Error::InvalidSearchPattern] if `search` is not a valid
    /// regular expression.
    pub fn new(search: &str) -> Result<Self, Error> {
        RegexBuilder::new(search)
            .case_insensitive(true)
            .build()
            .map_err(|error| Error::InvalidSearchPattern(error.to_string()))?;

        Ok(Self(search.to_owned()))
    }

    /// The pattern as passed to the SQL `REGEXP` operator.
    pub(crate) fn as_sql_pattern(&self) -> String {
        format!("(?i){}", self.0)
    }
}

/// Register the `regexp(pattern, value)` function that backs SQLite's
/// `value REGEXP pattern` operator.
///
/// Numbers are matched against their shortest decimal representation, so a
/// price of 150 is matched as "150" and a price of 15.99 as "15.99". NULL and
/// blob values never match.
pub fn register_regexp_function(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let pattern: Arc<Regex> =
                ctx.get_or_create_aux(0, |value| -> Result<Regex, BoxError> {
                    Ok(Regex::new(value.as_str()?)?)
                })?;

            let is_match = match ctx.get_raw(1) {
                ValueRef::Text(text) => pattern.is_match(&String::from_utf8_lossy(text)),
                ValueRef::Real(number) => pattern.is_match(&number.to_string()),
                ValueRef::Integer(number) => pattern.is_match(&number.to_string()),
                ValueRef::Null | ValueRef::Blob(_) => false,
            };

            Ok(is_match)
        },
    )
}
