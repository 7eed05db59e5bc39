//! Domain service errors

use thiserror::Error;

use crate::data::filter::FilterError;
use crate::data::query::QueryError;
use crate::data::value::DecodeError;
use crate::utils::password::PasswordError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A stored row did not have the expected shape
    #[error("Malformed row: {0}")]
    Decode(#[from] DecodeError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl From<FilterError> for ServiceError {
    fn from(e: FilterError) -> Self {
        Self::Query(QueryError::from(e))
    }
}

impl ServiceError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}
