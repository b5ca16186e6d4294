use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ParseError;

const TOKEN_SEPARATOR: char = ':';

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Requested page size. Zero means "use the backend default"; negative
    /// values are kept as received and flagged through `limit_override`.
    pub limit: i32,
    /// Opaque continuation cursor, passed through untouched.
    pub cursor: Option<String>,
    /// True when the caller asked to bypass default paging (negative limit).
    pub limit_override: bool,
}

/// Structured form of the filter, sort and pagination parameters of a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Field → value equality filters. Values are untyped strings.
    pub filter: BTreeMap<String, String>,
    /// Field → direction, as written by the caller.
    pub sort: BTreeMap<String, String>,
    pub pagination: Pagination,
}

impl QueryOptions {
    /// Parses the flat list parameters of a request.
    ///
    /// Empty tokens are skipped before parsing; some gateways inject empty
    /// elements into repeated query parameters. A filter token must have
    /// exactly two `:`-separated parts. A sort token needs at least two, and
    /// anything after the direction is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablerest_core::query::QueryOptions;
    ///
    /// let opts = QueryOptions::parse("", 25, &["name:asc"], &["color:red"]).unwrap();
    /// assert_eq!(opts.filter["color"], "red");
    /// assert_eq!(opts.sort["name"], "asc");
    /// assert_eq!(opts.pagination.limit, 25);
    /// ```
    pub fn parse<S, F>(
        offset: &str,
        limit: i32,
        sort: &[S],
        filter: &[F],
    ) -> Result<Self, ParseError>
    where
        S: AsRef<str>,
        F: AsRef<str>,
    {
        let mut filters = BTreeMap::new();
        for token in non_empty(filter) {
            let parts: Vec<&str> = token.split(TOKEN_SEPARATOR).collect();
            let [field, value] = parts.as_slice() else {
                return Err(ParseError::InvalidFilter {
                    token: token.to_string(),
                });
            };
            filters.insert(field.to_string(), value.to_string());
        }

        let mut sorts = BTreeMap::new();
        for token in non_empty(sort) {
            let mut parts = token.split(TOKEN_SEPARATOR);
            match (parts.next(), parts.next()) {
                (Some(field), Some(direction)) => {
                    sorts.insert(field.to_string(), direction.to_string());
                }
                _ => {
                    return Err(ParseError::InvalidSort {
                        token: token.to_string(),
                    })
                }
            }
        }

        Ok(Self {
            filter: filters,
            sort: sorts,
            pagination: Pagination {
                limit,
                cursor: (!offset.is_empty()).then(|| offset.to_string()),
                limit_override: limit < 0,
            },
        })
    }

    /// Returns the parsed direction requested for `field`, if any.
    ///
    /// Unrecognized direction strings yield `None`.
    pub fn direction_for(&self, field: &str) -> Option<SortDirection> {
        self.sort.get(field).and_then(|d| SortDirection::parse(d))
    }
}

fn non_empty<T: AsRef<str>>(tokens: &[T]) -> impl Iterator<Item = &str> {
    tokens.iter().map(AsRef::as_ref).filter(|t| !t.is_empty())
}

/// Ordering direction over a sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    /// Parses `asc`/`ascending`/`desc`/`descending`, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    pub fn is_ascending(self) -> bool {
        matches!(self, Self::Ascending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_filter_token_parses_field_and_value() {
        let opts = QueryOptions::parse("", 0, &NONE, &["color:red", "size:xl"]).unwrap();

        assert_eq!(opts.filter.len(), 2);
        assert_eq!(opts.filter["color"], "red");
        assert_eq!(opts.filter["size"], "xl");
    }

    #[test]
    fn test_filter_without_colon_is_rejected() {
        let result = QueryOptions::parse("", 0, &NONE, &["color"]);

        assert_eq!(
            result,
            Err(ParseError::InvalidFilter {
                token: "color".to_string()
            })
        );
    }

    #[test]
    fn test_filter_with_two_colons_is_rejected() {
        let result = QueryOptions::parse("", 0, &NONE, &["color:red:dark"]);

        assert!(
            matches!(result, Err(ParseError::InvalidFilter { token }) if token == "color:red:dark")
        );
    }

    #[test]
    fn test_filter_with_empty_value_is_kept() {
        let opts = QueryOptions::parse("", 0, &NONE, &["color:"]).unwrap();
        assert_eq!(opts.filter["color"], "");
    }

    #[test]
    fn test_sort_token_parses_field_and_direction() {
        let opts = QueryOptions::parse("", 0, &["name:desc"], &NONE).unwrap();
        assert_eq!(opts.sort["name"], "desc");
    }

    #[test]
    fn test_sort_token_ignores_trailing_parts() {
        let opts = QueryOptions::parse("", 0, &["name:asc:nulls-last"], &NONE).unwrap();
        assert_eq!(opts.sort["name"], "asc");
    }

    #[test]
    fn test_sort_without_colon_is_rejected() {
        let result = QueryOptions::parse("", 0, &["name"], &NONE);

        assert_eq!(
            result,
            Err(ParseError::InvalidSort {
                token: "name".to_string()
            })
        );
    }

    #[test]
    fn test_empty_tokens_are_ignored() {
        let opts = QueryOptions::parse("", 0, &["", "name:asc", ""], &["", ""]).unwrap();

        assert!(opts.filter.is_empty());
        assert_eq!(opts.sort.len(), 1);
    }

    #[test]
    fn test_negative_limit_sets_override() {
        let opts = QueryOptions::parse("x", -1, &NONE, &NONE).unwrap();

        assert!(opts.pagination.limit_override);
        assert_eq!(opts.pagination.limit, -1);
        assert_eq!(opts.pagination.cursor.as_deref(), Some("x"));
    }

    #[test]
    fn test_positive_limit_has_no_override() {
        let opts = QueryOptions::parse("", 20, &NONE, &NONE).unwrap();

        assert!(!opts.pagination.limit_override);
        assert_eq!(opts.pagination.limit, 20);
        assert_eq!(opts.pagination.cursor, None);
    }

    #[test]
    fn test_offset_is_carried_verbatim() {
        let opts = QueryOptions::parse("item#a1:b2", 5, &NONE, &NONE).unwrap();
        assert_eq!(opts.pagination.cursor.as_deref(), Some("item#a1:b2"));
    }

    #[test]
    fn test_first_bad_token_is_reported() {
        let result = QueryOptions::parse("", 0, &NONE, &["a:1", "bad", "worse"]);
        assert_eq!(result.unwrap_err().token(), "bad");
    }

    #[test]
    fn test_direction_for() {
        let opts = QueryOptions::parse("", 0, &["id:ASC", "name:sideways"], &NONE).unwrap();

        assert_eq!(opts.direction_for("id"), Some(SortDirection::Ascending));
        assert_eq!(opts.direction_for("name"), None);
        assert_eq!(opts.direction_for("missing"), None);
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Ascending));
        assert_eq!(
            SortDirection::parse("Descending"),
            Some(SortDirection::Descending)
        );
        assert_eq!(SortDirection::parse(""), None);
        assert_eq!(SortDirection::default(), SortDirection::Descending);
    }

    #[test]
    fn test_default_options_are_empty() {
        let opts = QueryOptions::default();

        assert!(opts.filter.is_empty());
        assert!(opts.sort.is_empty());
        assert_eq!(opts.pagination, Pagination::default());
    }

    #[test]
    fn test_options_serialize() {
        let opts = QueryOptions::parse("", 3, &["id:asc"], &["color:red"]).unwrap();
        let json = serde_json::to_value(&opts).unwrap();

        assert_eq!(json["filter"]["color"], "red");
        assert_eq!(json["pagination"]["limit"], 3);
        assert_eq!(json["pagination"]["limit_override"], false);
    }
}
