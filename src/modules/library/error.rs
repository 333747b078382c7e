use shelf_authz::AuthzError;
use shelf_http::AppError;
use thiserror::Error;

/// Revert reasons. The exact strings are relied upon by existing clients.
pub mod reason {
    pub const EMPTY_NAME: &str = "Book name cannot be empty!";
    pub const EMPTY_AUTHOR: &str = "Author name cannot be empty!";
    pub const ZERO_COPIES: &str = "Book copies cannot be 0!";
    pub const UNKNOWN_ID: &str = "Book with given id does not exist!";
    pub const UNKNOWN_NAME: &str = "Book with given name does not exist!";
    pub const OUT_OF_STOCK: &str = "Cannot borrow book. No more books in stock.";
    pub const ALREADY_BORROWED: &str = "Cannot borrow same book twice!";
    pub const NOT_BORROWED: &str = "Cannot return book, which wasn't borrowed!";
    pub const COPIES_OVERFLOW: &str = "Book copies overflow!";
}

/// Why a registry call was rejected. A rejected call changes nothing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LibraryError {
    #[error(transparent)]
    Authorization(#[from] AuthzError),

    #[error("{0}")]
    Validation(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    OutOfStock(&'static str),

    #[error("{0}")]
    State(&'static str),
}

impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        let message = err.to_string();
        match err {
            LibraryError::Authorization(_) => AppError::forbidden(message).with_code("not_owner"),
            LibraryError::Validation(_) => AppError::validation(Vec::new(), message),
            LibraryError::NotFound(_) => AppError::not_found(message).with_code("book_not_found"),
            LibraryError::OutOfStock(_) => {
                AppError::conflict(Vec::new(), message).with_code("out_of_stock")
            }
            LibraryError::State(_) => {
                AppError::conflict(Vec::new(), message).with_code("invalid_loan_state")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use shelf_authz::{Address, NOT_OWNER_REASON};

    #[test]
    fn maps_each_kind_to_status_and_code() {
        let cases = [
            (
                LibraryError::Authorization(AuthzError::NotOwner {
                    caller: Address::from_bytes([9; 20]),
                }),
                StatusCode::FORBIDDEN,
                "not_owner",
                NOT_OWNER_REASON,
            ),
            (
                LibraryError::Validation(reason::ZERO_COPIES),
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                reason::ZERO_COPIES,
            ),
            (
                LibraryError::NotFound(reason::UNKNOWN_ID),
                StatusCode::NOT_FOUND,
                "book_not_found",
                reason::UNKNOWN_ID,
            ),
            (
                LibraryError::OutOfStock(reason::OUT_OF_STOCK),
                StatusCode::CONFLICT,
                "out_of_stock",
                reason::OUT_OF_STOCK,
            ),
            (
                LibraryError::State(reason::ALREADY_BORROWED),
                StatusCode::CONFLICT,
                "invalid_loan_state",
                reason::ALREADY_BORROWED,
            ),
        ];

        for (err, status, code, message) in cases {
            assert_eq!(err.to_string(), message);
            let app: AppError = err.into();
            assert_eq!(app.status(), status);
            assert_eq!(app.code(), code);
        }
    }
}
