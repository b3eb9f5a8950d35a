//! Core category domain types.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId, timestamp::Timestamp};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(try_from = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyField] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyField("name"))
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl TryFrom<String> for CategoryName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a category is for incomes, expenses or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
    /// Usable for both incomes and expenses.
    General,
}

impl CategoryType {
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
            CategoryType::General => "general",
        }
    }

    /// Parse a type code, e.g. "income".
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "income" => Some(CategoryType::Income),
            "expense" => Some(CategoryType::Expense),
            "general" => Some(CategoryType::General),
            _ => None,
        }
    }

    /// Parse a list of type codes, ignoring blanks and repeats.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidRequest] if a code is not a category type.
    pub fn parse_codes(codes: &[String]) -> Result<Vec<CategoryType>, Error> {
        let mut types = Vec::new();

        for code in codes.iter().map(|code| code.trim()).filter(|code| !code.is_empty()) {
            let category_type = Self::from_code(code).ok_or_else(|| {
                Error::InvalidRequest(format!("unknown category type \"{code}\""))
            })?;

            if !types.contains(&category_type) {
                types.push(category_type);
            }
        }

        Ok(types)
    }

    /// Parse the type filter of a category list request.
    ///
    /// When any type is requested, general categories are included too.
    pub fn parse_filter(codes: &[String]) -> Result<Vec<CategoryType>, Error> {
        let mut types = Self::parse_codes(codes)?;

        if !types.is_empty() && !types.contains(&CategoryType::General) {
            types.push(CategoryType::General);
        }

        Ok(types)
    }
}

impl ToSql for CategoryType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CategoryType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_str()?;

        Self::from_code(code)
            .ok_or_else(|| FromSqlError::Other(format!("unknown category type {code}").into()))
    }
}

/// A category for classifying incomes and expenses (e.g., 'Groceries', 'Salary').
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: DatabaseId,
    pub name: CategoryName,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One row of the category form.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: CategoryName,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

/// The fields of a category to change. Missing fields are left as is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<CategoryName>,
    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{CategoryName, CategoryType, NewCategory};

    #[test]
    fn name_fails_on_just_whitespace() {
        assert_eq!(CategoryName::new("\n\t \r"), Err(Error::EmptyField("name")));
    }

    #[test]
    fn name_is_trimmed() {
        assert_eq!(CategoryName::new("  Food ").unwrap().as_ref(), "Food");
    }

    #[test]
    fn deserializing_validates_name() {
        let result: Result<NewCategory, _> =
            serde_json::from_str(r#"{"name": "  ", "type": "income"}"#);

        assert!(result.is_err());
    }

    #[test]
    fn filter_adds_general() {
        let types = CategoryType::parse_filter(&["income".to_owned()]).unwrap();

        assert_eq!(types, vec![CategoryType::Income, CategoryType::General]);
    }

    #[test]
    fn empty_filter_stays_empty() {
        assert_eq!(CategoryType::parse_filter(&[]), Ok(vec![]));
        assert_eq!(CategoryType::parse_filter(&[String::new()]), Ok(vec![]));
    }

    #[test]
    fn filter_rejects_unknown_type() {
        assert!(CategoryType::parse_filter(&["savings".to_owned()]).is_err());
    }
}
