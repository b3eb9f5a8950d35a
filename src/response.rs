//! The JSON envelope shared by all API responses.

use axum::Json;
use serde::Serialize;

use crate::{list_filter::Listing, pagination::Pagination};

/// Message sent after a record was created.
pub const ADDED_MESSAGE: &str = "Successfully added data";
/// Message sent after a record was deleted.
pub const DELETED_MESSAGE: &str = "Successfully deleted data";

/// A successful response body, `{ data, pagination? }`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    /// The payload.
    pub data: T,
    /// Present when `data` is one page of a larger list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Wrap `data` in the response envelope.
pub fn data<T: Serialize>(data: T) -> Json<DataResponse<T>> {
    Json(DataResponse {
        data,
        pagination: None,
    })
}

/// Wrap a list of records, and its pagination if any, in the response envelope.
pub fn listing<T: Serialize>(listing: Listing<T>) -> Json<DataResponse<Vec<T>>> {
    Json(DataResponse {
        data: listing.items,
        pagination: listing.pagination,
    })
}

/// The response body for a successful create.
pub fn added() -> Json<DataResponse<&'static str>> {
    data(ADDED_MESSAGE)
}

/// The response body for a successful delete.
pub fn deleted() -> Json<DataResponse<&'static str>> {
    data(DELETED_MESSAGE)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        list_filter::Listing,
        pagination::{PageRequest, Pagination},
    };

    use super::{added, listing};

    #[test]
    fn omits_missing_pagination() {
        let body = serde_json::to_value(&added().0).unwrap();

        assert_eq!(body, json!({ "data": "Successfully added data" }));
    }

    #[test]
    fn includes_pagination() {
        let body = serde_json::to_value(
            &listing(Listing {
                items: vec![1, 2],
                pagination: Some(Pagination::new(PageRequest { page: 1, limit: 2 }, 5)),
            })
            .0,
        )
        .unwrap();

        assert_eq!(
            body,
            json!({
                "data": [1, 2],
                "pagination": { "total": 5, "page": 1, "limit": 2, "totalPage": 3 }
            })
        );
    }
}
