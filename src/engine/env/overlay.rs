//! Overlay of the standard `DOCKER_*` process environment variables.

use tracing::debug;

use super::{
    DOCKER_API_VERSION, DOCKER_CERT_PATH, DOCKER_HOST, DOCKER_TLS_VERIFY, DockerEnv,
    parse_docker_host,
};
use crate::error::EnvError;

/// Applies the operator's `DOCKER_*` variables on top of a base environment.
///
/// # Type Parameters
///
/// * `E` - An environment provider implementing the `mockable::Env` trait,
///   allowing for testable environment variable access.
pub struct EnvOverlay<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> EnvOverlay<'a, E> {
    /// Creates an overlay reading from the given environment provider.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// Overlays the process environment onto `base`.
    ///
    /// When `DOCKER_HOST` is set and normalises to a different endpoint than
    /// `base.host`, the base is discarded entirely: API version, certificate
    /// path, TLS setting and the runtime-bug flag all belonged to the other
    /// daemon. `DOCKER_API_VERSION`, `DOCKER_CERT_PATH` and
    /// `DOCKER_TLS_VERIFY` then overwrite their fields whenever non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::EndpointParse`] as soon as `DOCKER_HOST` fails to
    /// parse. No other variable is consulted in that case.
    pub fn apply(&self, base: DockerEnv) -> Result<DockerEnv, EnvError> {
        let mut result = base;

        if let Some(raw_host) = self.non_empty(DOCKER_HOST) {
            let host = parse_docker_host(&raw_host).map_err(|reason| EnvError::EndpointParse {
                value: raw_host.clone(),
                reason,
            })?;

            if host != result.host {
                debug!(
                    from = %result.host,
                    to = %host,
                    "DOCKER_HOST points at a different daemon; ignoring cluster docker settings"
                );
                result = DockerEnv::with_host(host);
            }
        }

        if let Some(api_version) = self.non_empty(DOCKER_API_VERSION) {
            result.api_version = api_version;
        }
        if let Some(cert_path) = self.non_empty(DOCKER_CERT_PATH) {
            result.cert_path = cert_path;
        }
        if let Some(tls_verify) = self.non_empty(DOCKER_TLS_VERIFY) {
            result.tls_verify = tls_verify;
        }

        Ok(result)
    }

    fn non_empty(&self, name: &str) -> Option<String> {
        self.env.string(name).filter(|value| !value.is_empty())
    }
}
