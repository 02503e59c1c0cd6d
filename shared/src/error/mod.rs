//! Error codes, categories and the `AppError` every handler returns
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorResponse};
//!
//! let err = AppError::with_message(ErrorCode::CategoryInUse, "Category is used by 3 ingredients")
//!     .with_detail("category_id", 12);
//!
//! let body = ErrorResponse::from(err);
//! assert_eq!(body.code.code(), 6102);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, ErrorResponse};
