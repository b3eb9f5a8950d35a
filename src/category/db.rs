//! Database operations for categories.

use rusqlite::{Connection, Row, params};

use crate::{
    Error,
    category::{Category, CategoryName, CategoryType, CategoryUpdate, NewCategory},
    database_id::new_database_id,
    list_filter::{ListQuery, Listing, Sort, SortableFields},
    pagination::PageRequest,
    timestamp::Timestamp,
};

pub const CATEGORY_COLUMNS: &str = "category.id, category.name, category.type, \
    category.created_at, category.updated_at";

/// The fields categories can be sorted by.
pub const CATEGORY_SORT_FIELDS: &SortableFields = &[
    ("name", "category.name"),
    ("type", "category.type"),
    ("createdAt", "category.created_at"),
    ("updatedAt", "category.updated_at"),
];

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense', 'general')),
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_category_type ON category(type);",
    )?;

    Ok(())
}

/// Map a row selected with [CATEGORY_COLUMNS], starting at column `offset`.
pub fn map_row_to_category(row: &Row, offset: usize) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(offset + 1)?;

    Ok(Category {
        id: row.get(offset)?,
        name: CategoryName::new_unchecked(&raw_name),
        category_type: row.get(offset + 2)?,
        created_at: row.get(offset + 3)?,
        updated_at: row.get(offset + 4)?,
    })
}

/// Create the categories in `new_categories`, all or none.
pub fn create_categories(
    new_categories: Vec<NewCategory>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    let transaction = connection.unchecked_transaction()?;
    let mut categories = Vec::with_capacity(new_categories.len());

    for new_category in new_categories {
        categories.push(insert_category(new_category, &transaction)?);
    }

    transaction.commit()?;

    Ok(categories)
}

fn insert_category(new_category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    let now = Timestamp::now();
    let category = Category {
        id: new_database_id(),
        name: new_category.name,
        category_type: new_category.category_type,
        created_at: now,
        updated_at: now,
    };

    connection.execute(
        "INSERT INTO category (id, name, type, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            category.id,
            category.name.as_ref(),
            category.category_type,
            category.created_at,
            category.updated_at,
        ],
    )?;

    Ok(category)
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: &str, connection: &Connection) -> Result<Category, Error> {
    connection
        .query_one(
            &format!("SELECT {CATEGORY_COLUMNS} FROM category WHERE id = ?1"),
            params![category_id],
            |row| map_row_to_category(row, 0),
        )
        .map_err(|error| error.into())
}

/// Filters for listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    pub keyword: Option<String>,
    /// Only include these types. Empty means every type.
    pub types: Vec<CategoryType>,
    pub sort: Option<Sort>,
}

pub fn list_categories(
    filter: &CategoryFilter,
    page: Option<PageRequest>,
    connection: &Connection,
) -> Result<Listing<Category>, Error> {
    ListQuery::new(
        "FROM category",
        "category.created_at ASC, category.rowid ASC",
    )
    .keyword(&["category.name"], filter.keyword.as_deref())
    .any_of(
        "category.type",
        filter
            .types
            .iter()
            .map(|category_type| category_type.as_str().to_owned()),
    )
    .sort(filter.sort)
    .fetch(CATEGORY_COLUMNS, page, connection, |row| {
        map_row_to_category(row, 0)
    })
}

/// Apply `update` to a category and return the changed category.
///
/// Returns [Error::NotFound] if the category doesn't exist.
pub fn update_category(
    category_id: &str,
    update: CategoryUpdate,
    connection: &Connection,
) -> Result<Category, Error> {
    let mut category = get_category(category_id, connection)?;

    if let Some(name) = update.name {
        category.name = name;
    }

    if let Some(category_type) = update.category_type {
        category.category_type = category_type;
    }

    category.updated_at = Timestamp::now();

    connection.execute(
        "UPDATE category SET name = ?1, type = ?2, updated_at = ?3 WHERE id = ?4",
        params![
            category.name.as_ref(),
            category.category_type,
            category.updated_at,
            category.id,
        ],
    )?;

    Ok(category)
}

/// Delete a category by ID. Returns an error if the category doesn't exist.
///
/// Incomes and expenses in the category are kept, without a category.
pub fn delete_category(category_id: &str, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM category WHERE id = ?1", params![category_id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

#[cfg(test)]
mod category_query_tests {
    use crate::{
        Error,
        category::{CategoryName, CategoryType, CategoryUpdate, NewCategory},
        test_utils::must_create_test_connection,
    };

    use super::{
        CategoryFilter, create_categories, delete_category, get_category, list_categories,
        update_category,
    };

    fn new_category(name: &str, category_type: CategoryType) -> NewCategory {
        NewCategory {
            name: CategoryName::new_unchecked(name),
            category_type,
        }
    }

    #[test]
    fn create_categories_succeeds() {
        let connection = must_create_test_connection();

        let created = create_categories(
            vec![
                new_category("Salary", CategoryType::Income),
                new_category("Food", CategoryType::Expense),
            ],
            &connection,
        )
        .expect("Could not create categories");

        assert_eq!(created.len(), 2);
        assert_eq!(get_category(&created[1].id, &connection), Ok(created[1].clone()));
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let connection = must_create_test_connection();

        assert_eq!(get_category("missing", &connection), Err(Error::NotFound));
    }

    #[test]
    fn type_filter_matches_listed_types() {
        let connection = must_create_test_connection();
        create_categories(
            vec![
                new_category("Salary", CategoryType::Income),
                new_category("Food", CategoryType::Expense),
                new_category("Gifts", CategoryType::General),
            ],
            &connection,
        )
        .unwrap();

        let listing = list_categories(
            &CategoryFilter {
                types: CategoryType::parse_filter(&["expense".to_owned()]).unwrap(),
                ..Default::default()
            },
            None,
            &connection,
        )
        .unwrap();

        let names: Vec<_> = listing
            .items
            .iter()
            .map(|category| category.name.as_ref())
            .collect();
        assert_eq!(names, vec!["Food", "Gifts"]);
    }

    #[test]
    fn update_category_succeeds() {
        let connection = must_create_test_connection();
        let category =
            create_categories(vec![new_category("Food", CategoryType::Expense)], &connection)
                .unwrap()
                .remove(0);

        let updated = update_category(
            &category.id,
            CategoryUpdate {
                name: Some(CategoryName::new_unchecked("Groceries")),
                category_type: None,
            },
            &connection,
        )
        .unwrap();

        assert_eq!(updated.name.as_ref(), "Groceries");
        assert_eq!(updated.category_type, CategoryType::Expense);
        assert_eq!(get_category(&category.id, &connection), Ok(updated));
    }

    #[test]
    fn update_category_with_invalid_id_returns_not_found() {
        let connection = must_create_test_connection();

        let result = update_category("missing", CategoryUpdate::default(), &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_category_succeeds() {
        let connection = must_create_test_connection();
        let category =
            create_categories(vec![new_category("Food", CategoryType::Expense)], &connection)
                .unwrap()
                .remove(0);

        assert_eq!(delete_category(&category.id, &connection), Ok(()));
        assert_eq!(
            delete_category(&category.id, &connection),
            Err(Error::NotFound)
        );
    }
}
