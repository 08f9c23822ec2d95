//! Caught failure values and their error-like coercion.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

/// Boxed error accepted from wrapped operations.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A failure caught while running an operation.
///
/// This is the raw value handed to normalizers, loggers and reporters. It is
/// either the `Err` the operation produced, or a panic raised while the
/// operation ran. Normalizers can recover the concrete error type with
/// [`Caught::downcast_ref`].
#[derive(Debug)]
pub enum Caught {
    /// The operation returned an error.
    Error {
        /// `std::any::type_name` of the error the operation returned.
        type_name: &'static str,
        /// The boxed error.
        error: BoxError,
    },
    /// The operation panicked.
    Panic {
        /// The panic payload, stringified.
        message: String,
    },
}

impl Caught {
    /// Capture an error returned by an operation.
    pub fn from_error<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Error {
            type_name: std::any::type_name::<E>(),
            error: error.into(),
        }
    }

    /// Capture a panic payload from `catch_unwind`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&'static str>() {
            (*message).to_owned()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "Box<dyn Any>".to_owned()
        };
        Self::Panic { message }
    }

    /// Whether this failure came from a panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panic { .. })
    }

    /// Type name of the original value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Error { type_name, .. } => type_name,
            Self::Panic { .. } => "panic",
        }
    }

    /// Human-readable message of the original value.
    pub fn message(&self) -> String {
        match self {
            Self::Error { error, .. } => error.to_string(),
            Self::Panic { message } => message.clone(),
        }
    }

    /// Borrow the original error as `E`, if that is what the operation returned.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        match self {
            Self::Error { error, .. } => error.downcast_ref::<E>(),
            Self::Panic { .. } => None,
        }
    }

    /// Messages of the error's `source()` chain, outermost first.
    pub fn causes(&self) -> Vec<String> {
        let mut causes = Vec::new();
        if let Self::Error { error, .. } = self {
            let mut source = error.source();
            while let Some(cause) = source {
                causes.push(cause.to_string());
                source = cause.source();
            }
        }
        causes
    }

    /// Coerce into the serializable error-like shape stored in internal failures.
    pub fn to_raw(&self) -> RawError {
        RawError {
            name: self.type_name().to_owned(),
            message: self.message(),
            causes: self.causes(),
        }
    }
}

impl fmt::Display for Caught {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error { error, .. } => write!(f, "{}", error),
            Self::Panic { message } => write!(f, "panicked: {}", message),
        }
    }
}

impl StdError for Caught {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Error { error, .. } => error.source(),
            Self::Panic { .. } => None,
        }
    }
}

/// Error-like view of a caught value.
///
/// Whatever the operation failed with (an error of any type, a bare string,
/// or a panic) ends up here as a name, a message and the messages of its
/// cause chain. It holds no handles, so it serializes to plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct RawError {
    /// Type name of the original value, or `panic`.
    pub name: String,
    /// Display message of the original value.
    pub message: String,
    /// Messages of the cause chain, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    #[derive(Debug, thiserror::Error)]
    #[error("loading config failed")]
    struct LoadError {
        #[source]
        cause: io::Error,
    }

    #[test]
    fn test_plain_string_becomes_error_like() {
        let caught = Caught::from_error("plain string");

        assert_eq!(caught.message(), "plain string");
        assert_eq!(caught.type_name(), "&str");
        assert_eq!(
            caught.to_raw(),
            RawError {
                name: "&str".to_string(),
                message: "plain string".to_string(),
                causes: vec![],
            }
        );
    }

    #[test]
    fn test_downcast_to_original_type() {
        let caught = Caught::from_error(io::Error::new(io::ErrorKind::NotFound, "missing"));

        let original = caught.downcast_ref::<io::Error>().unwrap();
        assert_eq!(original.kind(), io::ErrorKind::NotFound);
        assert!(caught.downcast_ref::<std::fmt::Error>().is_none());
    }

    #[test]
    fn test_cause_chain_collected() {
        let caught = Caught::from_error(LoadError {
            cause: io::Error::other("disk on fire"),
        });

        assert_eq!(caught.causes(), vec!["disk on fire".to_string()]);
        assert!(caught.source().is_some());
        assert_eq!(caught.to_raw().message, "loading config failed");
    }

    #[test]
    fn test_panic_payloads() {
        let caught = Caught::from_panic(Box::new("static message"));
        assert!(caught.is_panic());
        assert_eq!(caught.message(), "static message");
        assert_eq!(caught.to_string(), "panicked: static message");

        let caught = Caught::from_panic(Box::new(String::from("owned message")));
        assert_eq!(caught.message(), "owned message");

        let caught = Caught::from_panic(Box::new(17_u8));
        assert_eq!(caught.to_raw().name, "panic");
        assert_eq!(caught.message(), "Box<dyn Any>");
        assert!(caught.downcast_ref::<io::Error>().is_none());
    }

    #[test]
    fn test_raw_error_omits_empty_causes() {
        let raw = Caught::from_error("x").to_raw();
        let json = serde_json::to_value(&raw).unwrap();

        assert_eq!(json, serde_json::json!({ "name": "&str", "message": "x" }));
    }
}
