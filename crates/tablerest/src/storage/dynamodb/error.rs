//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to the store-level `KvError`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;

use crate::storage::kv::KvError;

/// Map a GetItem SDK error to KvError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
    table_name: &str,
) -> KvError {
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => {
            KvError::ResourceNotFound(table_name.to_string())
        }
        GetItemError::ProvisionedThroughputExceededException(_) => {
            KvError::Throttled("GetItem".to_string())
        }
        GetItemError::RequestLimitExceeded(_) => {
            KvError::Throttled("GetItem request limit".to_string())
        }
        GetItemError::InternalServerError(_) => {
            KvError::Request("DynamoDB internal server error".to_string())
        }
        err => KvError::Request(format!("GetItem failed: {:?}", err)),
    }
}

/// Map a Query SDK error to KvError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
    table_name: &str,
) -> KvError {
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => {
            KvError::ResourceNotFound(table_name.to_string())
        }
        QueryError::ProvisionedThroughputExceededException(_) => {
            KvError::Throttled("Query".to_string())
        }
        QueryError::RequestLimitExceeded(_) => {
            KvError::Throttled("Query request limit".to_string())
        }
        QueryError::InternalServerError(_) => {
            KvError::Request("DynamoDB internal server error".to_string())
        }
        err => KvError::Request(format!("Query failed: {:?}", err)),
    }
}

/// Map a PutItem SDK error to KvError.
///
/// A missing table is a request failure here: writes never read as absence.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table_name: &str,
) -> KvError {
    match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => {
            KvError::Request(format!("Table not found: {table_name}"))
        }
        PutItemError::ProvisionedThroughputExceededException(_) => {
            KvError::Throttled("PutItem".to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            KvError::Throttled("PutItem request limit".to_string())
        }
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            KvError::Request("Item collection size limit exceeded".to_string())
        }
        PutItemError::TransactionConflictException(_) => {
            KvError::Request("Transaction conflict, please retry".to_string())
        }
        PutItemError::InternalServerError(_) => {
            KvError::Request("DynamoDB internal server error".to_string())
        }
        err => KvError::Request(format!("PutItem failed: {:?}", err)),
    }
}

/// Map a DeleteItem SDK error to KvError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    table_name: &str,
) -> KvError {
    match err.into_service_error() {
        DeleteItemError::ResourceNotFoundException(_) => {
            KvError::Request(format!("Table not found: {table_name}"))
        }
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            KvError::Throttled("DeleteItem".to_string())
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            KvError::Throttled("DeleteItem request limit".to_string())
        }
        DeleteItemError::TransactionConflictException(_) => {
            KvError::Request("Transaction conflict, please retry".to_string())
        }
        DeleteItemError::InternalServerError(_) => {
            KvError::Request("DynamoDB internal server error".to_string())
        }
        err => KvError::Request(format!("DeleteItem failed: {:?}", err)),
    }
}
