//! Filtering, sorting and paging shared by the list endpoints.
//!
//! List endpoints accept the same handful of query parameters:
//! - `sort`: `"<field>,<direction>"`, e.g. `"name,asc"` or `"createdAt,desc"`,
//! - `keyword`: a case-insensitive substring to search for,
//! - `page` and `limit`: optional pagination.
//!
//! [ListQuery] turns these into a parameterised SQL query. Only whitelisted
//! fields can be sorted on, so user input never ends up in the SQL text.

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error,
    pagination::{PageRequest, Pagination},
};

/// Maps the field names clients may sort by to the SQL column they sort.
pub type SortableFields = [(&'static str, &'static str)];

/// Named sort orders offered by every list, e.g. `?sort=newest`.
pub const SORT_PRESETS: [(&str, &str); 3] = [
    ("name", "name,asc"),
    ("newest", "createdAt,desc"),
    ("oldest", "createdAt,asc"),
];

/// The order to sort records in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}

impl SortDirection {
    fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// A validated sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    /// The SQL column to sort by.
    pub column: &'static str,
    /// Which way to sort.
    pub direction: SortDirection,
}

impl Sort {
    /// Parse a `"<field>,<direction>"` string, e.g. `"createdAt,desc"`.
    ///
    /// The direction defaults to ascending when omitted. The names in [SORT_PRESETS] may be used
    /// in place of a field and direction.
    ///
    /// # Errors
    /// Returns [Error::InvalidSort] if the field is not in `fields` or the
    /// direction is neither `asc` nor `desc`.
    pub fn parse(raw: &str, fields: &SortableFields) -> Result<Self, Error> {
        let expanded = SORT_PRESETS
            .iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(raw.trim()))
            .map_or(raw, |(_, sort)| *sort);

        let (field, direction) = match expanded.split_once(',') {
            Some((field, direction)) => (field.trim(), direction.trim()),
            None => (expanded.trim(), ""),
        };

        let column = fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .ok_or_else(|| Error::InvalidSort(raw.to_owned()))?;

        let direction = match direction.to_ascii_lowercase().as_str() {
            "" | "asc" => SortDirection::Ascending,
            "desc" => SortDirection::Descending,
            _ => return Err(Error::InvalidSort(raw.to_owned())),
        };

        Ok(Self { column, direction })
    }

    /// Parse an optional sort parameter, treating an empty string as absent.
    pub fn parse_optional(
        raw: Option<&str>,
        fields: &SortableFields,
    ) -> Result<Option<Self>, Error> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Self::parse(raw, fields).map(Some),
        }
    }
}

/// One page (or all) of the records matching a list query.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    /// The matching records.
    pub items: Vec<T>,
    /// Set when the records were paginated.
    pub pagination: Option<Pagination>,
}

/// Builder for a filtered, sorted and optionally paginated `SELECT`.
#[derive(Debug)]
pub struct ListQuery {
    from: String,
    conditions: Vec<String>,
    params: Vec<Value>,
    sort: Option<Sort>,
    default_order: String,
}

impl ListQuery {
    /// Start a query over `from`, the `FROM` clause including any joins.
    ///
    /// `default_order` is the `ORDER BY` body used when no sort is given and
    /// as the tie-breaker after a requested sort, e.g. `"account.created_at ASC, account.rowid ASC"`.
    pub fn new(from: &str, default_order: &str) -> Self {
        Self {
            from: from.to_owned(),
            conditions: Vec::new(),
            params: Vec::new(),
            sort: None,
            default_order: default_order.to_owned(),
        }
    }

    /// Add a condition using `?` placeholders bound to `params` in order.
    pub fn filter(mut self, condition: &str, params: impl IntoIterator<Item = Value>) -> Self {
        self.conditions.push(format!("({condition})"));
        self.params.extend(params);
        self
    }

    /// Keep rows where any of `columns` contains `keyword`, ignoring case.
    ///
    /// Does nothing if `keyword` is missing or blank.
    pub fn keyword(mut self, columns: &[&str], keyword: Option<&str>) -> Self {
        let keyword = match keyword.map(str::trim) {
            None | Some("") => return self,
            Some(keyword) => keyword,
        };

        let pattern = format!("%{}%", escape_like(keyword));
        let condition = columns
            .iter()
            .map(|column| format!("{column} LIKE ? ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");

        self.conditions.push(format!("({condition})"));
        self.params
            .extend(columns.iter().map(|_| Value::Text(pattern.clone())));
        self
    }

    /// Keep rows where `column` equals one of `values`.
    ///
    /// Does nothing if `values` is empty.
    pub fn any_of(mut self, column: &str, values: impl IntoIterator<Item = String>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Value::Text).collect();

        if values.is_empty() {
            return self;
        }

        let placeholders = vec!["?"; values.len()].join(", ");
        self.conditions
            .push(format!("({column} IN ({placeholders}))"));
        self.params.extend(values);
        self
    }

    /// Sort by `sort`, if given.
    pub fn sort(mut self, sort: Option<Sort>) -> Self {
        self.sort = sort;
        self
    }

    /// Run the query, selecting `columns` and converting rows with `map_row`.
    ///
    /// When `page` is given, only that page is returned along with the
    /// pagination details for the whole result set.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the query fails.
    pub fn fetch<T, F>(
        &self,
        columns: &str,
        page: Option<PageRequest>,
        connection: &Connection,
        map_row: F,
    ) -> Result<Listing<T>, Error>
    where
        F: FnMut(&Row<'_>) -> Result<T, rusqlite::Error>,
    {
        let where_clause = self.where_clause();
        let order_clause = match self.sort {
            Some(sort) => format!(
                "ORDER BY {} {}, {}",
                sort.column,
                sort.direction.as_sql(),
                self.default_order
            ),
            None => format!("ORDER BY {}", self.default_order),
        };

        let mut params = self.params.clone();
        let limit_clause = match page {
            Some(page) => {
                params.push(Value::Integer(to_sql_integer(page.limit)));
                params.push(Value::Integer(to_sql_integer(page.offset())));
                "LIMIT ? OFFSET ?"
            }
            None => "",
        };

        let query = format!(
            "SELECT {columns} {} {where_clause} {order_clause} {limit_clause}",
            self.from
        );

        let items = connection
            .prepare(&query)?
            .query_map(params_from_iter(params), map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let pagination = match page {
            Some(page) => Some(Pagination::new(page, self.count(connection)?)),
            None => None,
        };

        Ok(Listing { items, pagination })
    }

    /// Count the rows matching the filters.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the query fails.
    pub fn count(&self, connection: &Connection) -> Result<u64, Error> {
        let query = format!("SELECT COUNT(*) {} {}", self.from, self.where_clause());

        let count: i64 = connection.query_row(
            &query,
            params_from_iter(self.params.iter()),
            |row| row.get(0),
        )?;

        Ok(count.max(0) as u64)
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }
}

fn escape_like(keyword: &str) -> String {
    keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn to_sql_integer(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
