//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `RepositoryError` from `taskmanager_core::storage`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use taskmanager_core::storage::RepositoryError;

/// Shared classification. `on_condition` is what a failed condition
/// expression means for the calling operation.
fn map_sdk_error<E, R>(
    err: SdkError<E, R>,
    operation: &str,
    on_condition: Option<RepositoryError>,
) -> RepositoryError
where
    E: ProvideErrorMetadata + Debug,
    R: Debug,
{
    match err {
        SdkError::ServiceError(context) => {
            let service_err = context.into_err();
            match service_err.code() {
                Some("ConditionalCheckFailedException") => on_condition.unwrap_or_else(|| {
                    RepositoryError::QueryFailed(format!("{operation} condition check failed"))
                }),
                Some("ResourceNotFoundException") => {
                    RepositoryError::QueryFailed("Table not found".to_string())
                }
                Some(
                    "ProvisionedThroughputExceededException"
                    | "RequestLimitExceeded"
                    | "ThrottlingException",
                ) => RepositoryError::QueryFailed("Throughput exceeded, please retry".to_string()),
                Some("TransactionConflictException") => {
                    RepositoryError::QueryFailed("Transaction conflict, please retry".to_string())
                }
                Some("InternalServerError") => {
                    RepositoryError::QueryFailed("DynamoDB internal server error".to_string())
                }
                _ => RepositoryError::QueryFailed(format!("{operation} failed: {service_err:?}")),
            }
        }
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            RepositoryError::ConnectionFailed(format!("{operation} could not reach DynamoDB"))
        }
        other => RepositoryError::QueryFailed(format!("{operation} failed: {other:?}")),
    }
}

/// Map a GetItem SDK error to RepositoryError.
pub fn map_get_item_error<R: Debug>(err: SdkError<GetItemError, R>) -> RepositoryError {
    map_sdk_error(err, "GetItem", None)
}

/// Map a Query SDK error to RepositoryError.
pub fn map_query_error<R: Debug>(err: SdkError<QueryError, R>) -> RepositoryError {
    map_sdk_error(err, "Query", None)
}

/// Map a PutItem SDK error. A failed `attribute_not_exists` guard means
/// the key is taken.
pub fn map_put_item_error<R: Debug>(
    err: SdkError<PutItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    let on_condition = RepositoryError::AlreadyExists {
        entity_type,
        id: id.into(),
    };
    map_sdk_error(err, "PutItem", Some(on_condition))
}

/// Map an UpdateItem SDK error. A failed `attribute_exists` guard means
/// the item is gone.
pub fn map_update_item_error<R: Debug>(
    err: SdkError<UpdateItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    let on_condition = RepositoryError::NotFound {
        entity_type,
        id: id.into(),
    };
    map_sdk_error(err, "UpdateItem", Some(on_condition))
}

/// Map a DeleteItem SDK error to RepositoryError.
pub fn map_delete_item_error<R: Debug>(err: SdkError<DeleteItemError, R>) -> RepositoryError {
    map_sdk_error(err, "DeleteItem", None)
}

/// Map a generic connection/config error to RepositoryError.
pub fn map_connection_error(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::ConnectionFailed(err.to_string())
}
