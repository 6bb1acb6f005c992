//! Ordering of ordinal-coded attribute tokens.
//!
//! Attribute values arrive as strings that encode an underlying order
//! (`"0"`, `"1"`, ... for age brackets). A column whose every token parses
//! as an integer is ordered numerically, so `"9" < "10"`; any other column
//! falls back to lexical order.

use std::cmp::Ordering;

/// How the tokens of one attribute column are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdinalScale {
    /// Every token is an integer; compare by numeric value.
    Numeric,
    /// Compare tokens as plain strings.
    Lexical,
}

impl OrdinalScale {
    /// Picks the scale for a column of tokens.
    ///
    /// An empty column is treated as numeric.
    pub fn infer<'a, I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        if tokens.into_iter().all(|t| parse_integer(t).is_some()) {
            OrdinalScale::Numeric
        } else {
            OrdinalScale::Lexical
        }
    }

    /// Compares two tokens under this scale.
    ///
    /// Returns `None` on the numeric scale when either token is not an integer.
    pub fn compare(self, a: &str, b: &str) -> Option<Ordering> {
        match self {
            OrdinalScale::Numeric => Some(parse_integer(a)?.cmp(&parse_integer(b)?)),
            OrdinalScale::Lexical => Some(a.cmp(b)),
        }
    }
}

/// Parses an ordinal token as an integer, tolerating surrounding whitespace.
pub(crate) fn parse_integer(token: &str) -> Option<i64> {
    token.trim().parse().ok()
}
