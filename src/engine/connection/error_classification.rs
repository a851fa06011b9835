//! Maps `Bollard` connection errors onto actionable `ContainerError`s.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::ContainerError;

/// Returns the filesystem path of a `unix://` or `npipe://` endpoint.
pub(super) fn socket_path(host: &str) -> Option<&Path> {
    host.strip_prefix("unix://")
        .or_else(|| host.strip_prefix("npipe://"))
        .map(Path::new)
}

/// Classify a connection error for `host`.
///
/// Socket endpoints get `SocketNotFound` or `PermissionDenied` when the
/// underlying I/O error says so. Everything else is `ConnectionFailed`.
pub(super) fn classify_connection_error(
    error: &bollard::errors::Error,
    host: &str,
) -> ContainerError {
    let message = error.to_string();
    let Some(path) = socket_path(host) else {
        return ContainerError::ConnectionFailed { message };
    };

    let kind = match error {
        bollard::errors::Error::SocketNotFoundError(_) => Some(ErrorKind::NotFound),
        bollard::errors::Error::IOError { err } => {
            Some(io_error_kind_in_chain(err).unwrap_or_else(|| err.kind()))
        }
        other => io_error_kind_in_chain(other),
    };

    match kind {
        Some(ErrorKind::NotFound) => ContainerError::SocketNotFound {
            path: path.to_path_buf(),
        },
        Some(ErrorKind::PermissionDenied) => ContainerError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ContainerError::ConnectionFailed { message },
    }
}

/// Walk the error source chain looking for an `io::Error` kind.
fn io_error_kind_in_chain(error: &dyn std::error::Error) -> Option<ErrorKind> {
    let mut current = error.source();
    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<std::io::Error>() {
            return Some(io_err.kind());
        }
        current = err.source();
    }
    None
}
