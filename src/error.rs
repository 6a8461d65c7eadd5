/*
 * Central error type for the backend. Every fallible platform operation returns
 * `error::Result<T>`. Resolution misses inside message handlers are not errors:
 * they are dropped silently and never reach this type.
 */
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Startup could not complete (class registration, common controls).
    InitializationFailed(String),
    /// An app, slot, control or window handle is unknown or no longer valid.
    InvalidHandle(String),
    /// A requested operation was rejected or could not be carried out.
    OperationFailed(String),
    /// A Win32 call failed; carries the function name and HRESULT bits.
    Win32 { function: &'static str, code: u32 },
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::InitializationFailed(msg) => {
                write!(f, "Platform initialization failed: {msg}")
            }
            PlatformError::InvalidHandle(msg) => write!(f, "Invalid handle: {msg}"),
            PlatformError::OperationFailed(msg) => write!(f, "Operation failed: {msg}"),
            PlatformError::Win32 { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
        }
    }
}

impl std::error::Error for PlatformError {}

#[cfg(target_os = "windows")]
impl From<windows::core::Error> for PlatformError {
    fn from(e: windows::core::Error) -> Self {
        PlatformError::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
