use axum::http::{HeaderMap, header};

/// What the `Authorization` header holds.
///
/// "No header" and "header present but unusable" are kept apart: the first is
/// an anonymous caller, the second is a client error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential<'a> {
    Absent,
    Malformed,
    Bearer(&'a str),
}

impl<'a> Credential<'a> {
    pub fn from_headers(headers: &'a HeaderMap) -> Self {
        match headers.get(header::AUTHORIZATION) {
            None => Self::Absent,
            Some(value) => match value.to_str() {
                Ok(raw) => Self::parse(raw),
                // not visible ASCII
                Err(_) => Self::Malformed,
            },
        }
    }

    /// Split on whitespace; exactly two parts means the second is the token.
    ///
    /// The scheme word itself is not compared, `"Token abc"` is accepted like
    /// `"Bearer abc"`.
    pub fn parse(raw: &'a str) -> Self {
        let mut parts = raw.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(_scheme), Some(token), None) => Self::Bearer(token),
            _ => Self::Malformed,
        }
    }
}
