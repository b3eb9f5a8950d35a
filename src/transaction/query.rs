//! Queries over many incomes or expenses: filtered lists, recent activity and totals.

use rusqlite::{Connection, params, types::Value};
use time::Date;

use crate::{
    Error,
    category::CategoryType,
    list_filter::{ListQuery, Listing, Sort, SortableFields},
    pagination::PageRequest,
    transaction::{
        Transaction, TransactionKind,
        core::{TRANSACTION_FROM, map_transaction_row, transaction_columns},
    },
    user::UserId,
};

/// The fields incomes and expenses can be sorted by.
pub const TRANSACTION_SORT_FIELDS: &SortableFields = &[
    ("title", "t.title"),
    ("amount", "t.amount"),
    ("date", "t.date"),
    ("createdAt", "t.created_at"),
    ("updatedAt", "t.updated_at"),
];

/// The number of incomes, and separately expenses, in the recent activity list.
pub const RECENT_TRANSACTION_LIMIT: u32 = 10;

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

/// Filters for listing incomes or expenses.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only include transactions whose title contains this text.
    pub keyword: Option<String>,
    /// Only include transactions in a category of one of these types.
    pub category_types: Vec<CategoryType>,
    /// Only include transactions in this category.
    pub category_id: Option<String>,
    /// Only include transactions dated within this range.
    pub date_range: Option<DateRange>,
    pub sort: Option<Sort>,
}

fn base_query(kind: TransactionKind, user_id: &UserId) -> ListQuery {
    ListQuery::new(TRANSACTION_FROM, "t.created_at ASC, t.rowid ASC")
        .filter("t.user_id = ?", [Value::Text(user_id.as_str().to_owned())])
        .filter("t.kind = ?", [Value::Text(kind.as_str().to_owned())])
}

/// List the incomes or expenses of `user_id` matching `filter`, with their categories.
pub fn list_transactions(
    kind: TransactionKind,
    user_id: &UserId,
    filter: &TransactionFilter,
    page: Option<PageRequest>,
    connection: &Connection,
) -> Result<Listing<Transaction>, Error> {
    let mut query = base_query(kind, user_id)
        .keyword(&["t.title"], filter.keyword.as_deref())
        .any_of(
            "category.type",
            filter
                .category_types
                .iter()
                .map(|category_type| category_type.as_str().to_owned()),
        )
        .sort(filter.sort);

    if let Some(category_id) = &filter.category_id {
        query = query.filter("t.category_id = ?", [Value::Text(category_id.clone())]);
    }

    if let Some(range) = filter.date_range {
        query = query.filter(
            "t.date BETWEEN ? AND ?",
            [
                Value::Text(range.start.to_string()),
                Value::Text(range.end.to_string()),
            ],
        );
    }

    query.fetch(&transaction_columns(), page, connection, map_transaction_row)
}

/// The latest incomes and expenses of `user_id`.
///
/// Takes the [RECENT_TRANSACTION_LIMIT] most recently created incomes and expenses, merged and
/// ordered by the date they happened on.
pub fn get_recent_transactions(
    user_id: &UserId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut statement = connection.prepare(&format!(
        "SELECT {} {TRANSACTION_FROM} WHERE t.user_id = ?1 AND t.kind = ?2 \
        ORDER BY t.created_at DESC, t.rowid DESC LIMIT ?3",
        transaction_columns()
    ))?;

    let mut transactions = Vec::new();

    for kind in [TransactionKind::Income, TransactionKind::Expense] {
        let rows = statement
            .query_map(
                params![user_id, kind, RECENT_TRANSACTION_LIMIT],
                map_transaction_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        transactions.extend(rows);
    }

    transactions.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });

    Ok(transactions)
}

/// The total amount of `user_id`'s incomes or expenses dated within `range`.
pub fn sum_transactions(
    kind: TransactionKind,
    user_id: &UserId,
    range: DateRange,
    connection: &Connection,
) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM \"transaction\"
            WHERE user_id = ?1 AND kind = ?2 AND date BETWEEN ?3 AND ?4",
            params![user_id, kind, range.start, range.end],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// The date and amount of each of `user_id`'s incomes or expenses dated within `range`.
pub fn get_amounts_by_date(
    kind: TransactionKind,
    user_id: &UserId,
    range: DateRange,
    connection: &Connection,
) -> Result<Vec<(Date, f64)>, Error> {
    connection
        .prepare(
            "SELECT date, amount FROM \"transaction\"
            WHERE user_id = ?1 AND kind = ?2 AND date BETWEEN ?3 AND ?4
            ORDER BY date ASC",
        )?
        .query_map(params![user_id, kind, range.start, range.end], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        category::{CategoryName, CategoryType, NewCategory, create_categories},
        list_filter::{Sort, SortDirection},
        pagination::PageRequest,
        test_utils::{must_create_test_connection, must_create_test_user},
        transaction::{NewTransaction, TransactionKind, create_transaction},
        user::UserId,
    };

    use super::{
        DateRange, TransactionFilter, get_amounts_by_date, get_recent_transactions,
        list_transactions, sum_transactions,
    };

    fn must_create(
        kind: TransactionKind,
        title: &str,
        amount: f64,
        date: Date,
        category_id: Option<&str>,
        user_id: &UserId,
        connection: &Connection,
    ) {
        create_transaction(
            kind,
            NewTransaction {
                title: title.to_owned(),
                amount,
                description: String::new(),
                category_id: category_id.map(str::to_owned),
                account_id: None,
                date,
                recurring: false,
            },
            user_id,
            connection,
        )
        .expect("could not create test transaction");
    }

    fn titles(transactions: &[crate::transaction::Transaction]) -> Vec<&str> {
        transactions
            .iter()
            .map(|transaction| transaction.title.as_str())
            .collect()
    }

    struct Fixture {
        connection: Connection,
        user_id: UserId,
        food_id: String,
        gifts_id: String,
    }

    fn setup() -> Fixture {
        let connection = must_create_test_connection();
        let user_id = must_create_test_user("foo@bar.baz", &connection);
        let categories = create_categories(
            vec![
                NewCategory {
                    name: CategoryName::new_unchecked("Food"),
                    category_type: CategoryType::Expense,
                },
                NewCategory {
                    name: CategoryName::new_unchecked("Gifts"),
                    category_type: CategoryType::General,
                },
            ],
            &connection,
        )
        .unwrap();
        let food_id = categories[0].id.clone();
        let gifts_id = categories[1].id.clone();

        let expense = TransactionKind::Expense;
        must_create(
            expense,
            "Lunch",
            15.0,
            date!(2025 - 01 - 10),
            Some(&food_id),
            &user_id,
            &connection,
        );
        must_create(
            expense,
            "Birthday present",
            50.0,
            date!(2025 - 02 - 01),
            Some(&gifts_id),
            &user_id,
            &connection,
        );
        must_create(
            expense,
            "Dinner",
            40.0,
            date!(2025 - 02 - 20),
            Some(&food_id),
            &user_id,
            &connection,
        );
        must_create(
            expense,
            "Parking",
            5.0,
            date!(2025 - 03 - 05),
            None,
            &user_id,
            &connection,
        );
        must_create(
            TransactionKind::Income,
            "Salary",
            1000.0,
            date!(2025 - 02 - 15),
            None,
            &user_id,
            &connection,
        );

        Fixture {
            connection,
            user_id,
            food_id,
            gifts_id,
        }
    }

    fn list(fixture: &Fixture, filter: TransactionFilter) -> Vec<String> {
        list_transactions(
            TransactionKind::Expense,
            &fixture.user_id,
            &filter,
            None,
            &fixture.connection,
        )
        .unwrap()
        .items
        .into_iter()
        .map(|transaction| transaction.title)
        .collect()
    }

    #[test]
    fn lists_only_requested_kind() {
        let fixture = setup();

        assert_eq!(
            list(&fixture, TransactionFilter::default()),
            vec!["Lunch", "Birthday present", "Dinner", "Parking"]
        );
    }

    #[test]
    fn filters_by_keyword() {
        let fixture = setup();

        let filter = TransactionFilter {
            keyword: Some("DIN".to_owned()),
            ..Default::default()
        };

        assert_eq!(list(&fixture, filter), vec!["Dinner"]);
    }

    #[test]
    fn filters_by_category_type() {
        let fixture = setup();

        let filter = TransactionFilter {
            category_types: vec![CategoryType::General],
            ..Default::default()
        };

        assert_eq!(list(&fixture, filter), vec!["Birthday present"]);
    }

    #[test]
    fn filters_by_category() {
        let fixture = setup();

        let filter = TransactionFilter {
            category_id: Some(fixture.food_id.clone()),
            ..Default::default()
        };

        assert_eq!(list(&fixture, filter), vec!["Lunch", "Dinner"]);
        assert_ne!(fixture.food_id, fixture.gifts_id);
    }

    #[test]
    fn date_range_is_inclusive() {
        let fixture = setup();

        let filter = TransactionFilter {
            date_range: Some(DateRange {
                start: date!(2025 - 02 - 01),
                end: date!(2025 - 02 - 20),
            }),
            ..Default::default()
        };

        assert_eq!(list(&fixture, filter), vec!["Birthday present", "Dinner"]);
    }

    #[test]
    fn sorts_and_paginates() {
        let fixture = setup();
        let filter = TransactionFilter {
            sort: Some(Sort {
                column: "t.amount",
                direction: SortDirection::Descending,
            }),
            ..Default::default()
        };

        let listing = list_transactions(
            TransactionKind::Expense,
            &fixture.user_id,
            &filter,
            Some(PageRequest { page: 2, limit: 2 }),
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(titles(&listing.items), vec!["Lunch", "Parking"]);
        assert_eq!(listing.pagination.map(|pagination| pagination.total), Some(4));
    }

    #[test]
    fn recent_merges_kinds_by_date() {
        let fixture = setup();

        let recent = get_recent_transactions(&fixture.user_id, &fixture.connection).unwrap();

        assert_eq!(
            titles(&recent),
            vec!["Lunch", "Birthday present", "Salary", "Dinner", "Parking"]
        );
    }

    #[test]
    fn recent_keeps_ten_newest_of_each_kind() {
        let connection = must_create_test_connection();
        let user_id = must_create_test_user("foo@bar.baz", &connection);

        for day in 1..=12 {
            let date = Date::from_calendar_date(2025, time::Month::May, day).unwrap();
            must_create(
                TransactionKind::Expense,
                &format!("Expense {day}"),
                1.0,
                date,
                None,
                &user_id,
                &connection,
            );
        }
        must_create(
            TransactionKind::Income,
            "Salary",
            1.0,
            date!(2025 - 05 - 01),
            None,
            &user_id,
            &connection,
        );

        let recent = get_recent_transactions(&user_id, &connection).unwrap();

        assert_eq!(recent.len(), 11);
        assert_eq!(recent[0].title, "Salary");
        assert_eq!(recent[1].title, "Expense 3");
        assert_eq!(recent[10].title, "Expense 12");
    }

    #[test]
    fn sums_within_range() {
        let fixture = setup();
        let february = DateRange {
            start: date!(2025 - 02 - 01),
            end: date!(2025 - 02 - 28),
        };

        assert_eq!(
            sum_transactions(
                TransactionKind::Expense,
                &fixture.user_id,
                february,
                &fixture.connection
            ),
            Ok(90.0)
        );
        assert_eq!(
            sum_transactions(
                TransactionKind::Income,
                &fixture.user_id,
                february,
                &fixture.connection
            ),
            Ok(1000.0)
        );
    }

    #[test]
    fn amounts_by_date_within_range() {
        let fixture = setup();
        let range = DateRange {
            start: date!(2025 - 02 - 01),
            end: date!(2025 - 03 - 31),
        };

        let amounts = get_amounts_by_date(
            TransactionKind::Expense,
            &fixture.user_id,
            range,
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(
            amounts,
            vec![
                (date!(2025 - 02 - 01), 50.0),
                (date!(2025 - 02 - 20), 40.0),
                (date!(2025 - 03 - 05), 5.0),
            ]
        );
    }
}
