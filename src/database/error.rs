use std::fmt::{self, Display};

use warp::reject::Rejection;

/// Error taxonomy surfaced by every repository function. The four client
/// categories stay distinct so a route layer can map them onto HTTP codes
/// without inspecting messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Validation(String),
    Conflict(String),
    NotFound(String),
    Unauthorized(String),
    Internal(String),
}

impl Error {
    pub fn validation(info: &str) -> Self {
        Self::Validation(info.to_string())
    }

    pub fn conflict(info: &str) -> Self {
        Self::Conflict(info.to_string())
    }

    pub fn not_found(info: &str) -> Self {
        Self::NotFound(info.to_string())
    }

    pub fn unauthorized(info: &str) -> Self {
        Self::Unauthorized(info.to_string())
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Conflict(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }

    pub fn info(&self) -> &str {
        match self {
            Self::Validation(info)
            | Self::Conflict(info)
            | Self::NotFound(info)
            | Self::Unauthorized(info)
            | Self::Internal(info) => info,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status(), self.info())
    }
}

impl std::error::Error for Error {}

// warp's blanket `impl<T: Reject> From<T> for Rejection` covers the
// conversion; a manual From impl here would collide with it.
impl warp::reject::Reject for Error {}

pub struct QueryError {
    info: String,
    kind: QueryErrorKind,
}

enum QueryErrorKind {
    UniqueViolation,
    RowNotFound,
    Other,
}

impl QueryError {
    pub fn new(info: String) -> Self {
        Self {
            info,
            kind: QueryErrorKind::Other,
        }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::Configuration(e) => Self::new(format!("{e}")),
            sqlx::Error::Database(e) => {
                if matches!(e.kind(), sqlx::error::ErrorKind::UniqueViolation) {
                    Self {
                        info: format!("{e}"),
                        kind: QueryErrorKind::UniqueViolation,
                    }
                } else {
                    Self::new(format!("{e}"))
                }
            }
            sqlx::Error::Io(e) => Self::new(format!("{e}")),
            sqlx::Error::Tls(e) => Self::new(format!("{e}")),
            sqlx::Error::Protocol(e) => Self::new(format!("{e}")),
            sqlx::Error::RowNotFound => Self {
                info: String::from("RowNotFound"),
                kind: QueryErrorKind::RowNotFound,
            },
            sqlx::Error::TypeNotFound { type_name } => {
                Self::new(format!("Type not found: {type_name}"))
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => {
                Self::new(format!("Column index out of bounds {index} ({len})"))
            }
            sqlx::Error::ColumnNotFound(e) => Self::new(format!("{e}")),
            sqlx::Error::ColumnDecode { index, source } => {
                Self::new(format!("Column decode {index} ({source})"))
            }
            sqlx::Error::Decode(e) => Self::new(format!("{e}")),
            sqlx::Error::AnyDriverError(e) => Self::new(format!("{e}")),
            sqlx::Error::PoolTimedOut => Self::new(String::from("Pool timed out")),
            sqlx::Error::PoolClosed => Self::new(String::from("Pool closed")),
            sqlx::Error::WorkerCrashed => Self::new(String::from("Worker crashed")),
            sqlx::Error::Migrate(e) => Self::new(format!("{e}")),
            _ => Self::new(String::from("Unknown error")),
        }
    }
}

impl From<QueryError> for Error {
    fn from(value: QueryError) -> Self {
        // Unique constraints are the final arbiter for racing writers; the
        // losing insert surfaces as a conflict, not an internal failure.
        match value.kind {
            QueryErrorKind::UniqueViolation => Error::Conflict(value.info),
            QueryErrorKind::RowNotFound => Error::NotFound(value.info),
            QueryErrorKind::Other => {
                log::error!("query failed: {}", value.info);
                Error::Internal(value.info)
            }
        }
    }
}

#[derive(Debug)]
pub struct TypeError {
    info: String,
}

impl TypeError {
    pub fn new(info: &str) -> Self {
        Self {
            info: info.to_string(),
        }
    }
}

impl From<TypeError> for Error {
    fn from(value: TypeError) -> Self {
        Error::Validation(value.info)
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.info)
    }
}

impl std::error::Error for TypeError {}

impl From<TypeError> for Rejection {
    fn from(value: TypeError) -> Self {
        warp::reject::custom(Error::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_categories_map_to_distinct_statuses() {
        assert_eq!(Error::validation("empty ingredient list").status(), 400);
        assert_eq!(Error::conflict("already in favorites").status(), 400);
        assert_eq!(Error::not_found("no such recipe").status(), 404);
        assert_eq!(Error::unauthorized("login required").status(), 401);
        assert_eq!(Error::Internal(String::from("db down")).status(), 500);
    }

    #[test]
    fn type_error_becomes_validation() {
        let err: Error = TypeError::new("Invalid variant").into();
        assert_eq!(err, Error::Validation(String::from("Invalid variant")));
    }

    #[test]
    fn error_is_findable_in_a_rejection() {
        let rejection = Rejection::from(Error::not_found("no such recipe"));
        assert_eq!(
            rejection.find::<Error>(),
            Some(&Error::NotFound(String::from("no such recipe")))
        );
    }

    #[test]
    fn type_error_rejection_carries_the_validation_error() {
        let rejection = Rejection::from(TypeError::new("Invalid boolean flag"));
        assert_eq!(
            rejection.find::<Error>(),
            Some(&Error::Validation(String::from("Invalid boolean flag")))
        );
    }
}
