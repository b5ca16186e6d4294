//! List endpoint query string parsing.

use tablerest_core::query::{ParseError, QueryOptions};
use tablerest_core::Error;

/// Raw list parameters as they appear in the query string.
///
/// `filter` and `sort` may repeat; `limit` must be an integer when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub filter: Vec<String>,
    pub sort: Vec<String>,
    pub limit: i32,
    pub offset: String,
}

impl ListParams {
    /// Reads list parameters from a raw (still percent-encoded) query string.
    /// Unknown keys are ignored.
    pub fn from_query(query: Option<&str>) -> Result<Self, Error> {
        let mut params = Self::default();
        let Some(query) = query else {
            return Ok(params);
        };

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "filter" => params.filter.push(value.into_owned()),
                "sort" => params.sort.push(value.into_owned()),
                "limit" if value.is_empty() => params.limit = 0,
                "limit" => {
                    params.limit = value
                        .parse()
                        .map_err(|_| Error::Decode(format!("invalid limit: {value}")))?;
                }
                "offset" => params.offset = value.into_owned(),
                _ => {}
            }
        }

        Ok(params)
    }

    /// Runs the parameters through the query options codec.
    pub fn into_options(self) -> Result<QueryOptions, ParseError> {
        QueryOptions::parse(&self.offset, self.limit, &self.sort, &self.filter)
    }
}
