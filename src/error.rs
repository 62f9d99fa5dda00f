//! Error module for the engine: typed error with (code, message).
//!
//! - Use `ErrorType` when you know the semantic category
//! - Use `EngineError` as the concrete error type
//! - Format: Display -> "[{code}] {message}"

use thiserror::Error;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ErrorType {
    // 10xx General issues
    Default,

    // 11xx Request issues
    InvalidPrice,
    InvalidQuantity,
    OrderNotFound,
    UnknownSymbol,

    // 12xx Resource issues
    QueueFull,
}

impl ErrorType {
    /// Numeric code for the error type.
    pub fn code(self) -> u32 {
        match self {
            // 10xx General issues
            ErrorType::Default => 1000,

            // 11xx Request issues
            ErrorType::InvalidQuantity => 1102,
            ErrorType::InvalidPrice => 1103,
            ErrorType::OrderNotFound => 1110,
            ErrorType::UnknownSymbol => 1111,

            // 12xx Resource issues
            ErrorType::QueueFull => 1200,
        }
    }

    /// Default human message for the error type.
    pub const fn message(self) -> &'static str {
        match self {
            // 10xx General issues
            ErrorType::Default => "Something wrong",

            // 11xx Request issues
            ErrorType::InvalidQuantity => "Invalid order quantity",
            ErrorType::InvalidPrice => "Invalid order price",
            ErrorType::OrderNotFound => "Order not found",
            ErrorType::UnknownSymbol => "Unknown symbol",

            // 12xx Resource issues
            ErrorType::QueueFull => "Order queue is full",
        }
    }
}

/// Concrete error type carrying both code and message.
///
/// `Display` renders as `"[{code}] {message}"`.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("[{code}] {message}")]
#[non_exhaustive]
pub struct EngineError {
    pub code: u32,
    pub message: String,
}

impl EngineError {
    /// Create from explicit code and message.
    #[inline]
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Create from a free-form message, using the default code (1000).
    #[inline]
    pub fn from_message(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Default.code(), message)
    }

    /// True if this error carries the code of `t`.
    #[inline]
    pub fn is(&self, t: ErrorType) -> bool {
        self.code == t.code()
    }
}

impl From<ErrorType> for EngineError {
    #[inline]
    fn from(t: ErrorType) -> Self {
        Self::new(t.code(), t.message())
    }
}

/// Trait to create an `EngineError` from different inputs (type or message).
pub trait IntoEngineError {
    fn into_error(self) -> EngineError;
}

impl IntoEngineError for ErrorType {
    #[inline]
    fn into_error(self) -> EngineError {
        self.into()
    }
}

impl IntoEngineError for &str {
    #[inline]
    fn into_error(self) -> EngineError {
        EngineError::from_message(self)
    }
}

impl IntoEngineError for String {
    #[inline]
    fn into_error(self) -> EngineError {
        EngineError::from_message(self)
    }
}

/// One-stop utility: accepts either an `ErrorType` or a message.
#[inline]
pub fn make_error<E: IntoEngineError>(e: E) -> EngineError {
    e.into_error()
}

/// Result alias for the library.
pub type Result<T> = std::result::Result<T, EngineError>;
