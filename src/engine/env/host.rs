//! Daemon endpoint normalisation.
//!
//! Mirrors the rules the Docker CLI applies to `DOCKER_HOST`, so that a host
//! reported by a cluster tool and the same host typed by the operator compare
//! equal after normalisation.

use url::Host;

/// Endpoint used when `DOCKER_HOST` is blank and TLS is the default.
pub const DEFAULT_TLS_HOST: &str = "tcp://localhost:2376";

/// Endpoint used for a bare `tcp://` address.
pub const DEFAULT_TCP_HOST: &str = "tcp://localhost:2375";

const DEFAULT_TCP_ADDR: &str = "localhost";
const DEFAULT_TCP_PORT: &str = "2375";
const DEFAULT_UNIX_SOCKET: &str = "/var/run/docker.sock";
const DEFAULT_NAMED_PIPE: &str = "//./pipe/docker_engine";
const SCHEME_SEPARATOR: &str = "://";

/// Normalises a daemon endpoint address.
///
/// Blank input resolves to [`DEFAULT_TLS_HOST`]. Addresses without a scheme
/// are treated as TCP. TCP addresses get `localhost` and port `2375` filled in
/// when missing. `unix` and `npipe` addresses default to the platform socket
/// path when empty. `fd` and `ssh` addresses are passed through untouched.
///
/// # Errors
///
/// Returns a human-readable reason when the scheme is unknown, a scheme is
/// nested inside the address, the host is not a valid domain or IP address,
/// or the port is not numeric.
pub fn parse_docker_host(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(String::from(DEFAULT_TLS_HOST));
    }

    let (scheme, addr) = trimmed
        .split_once(SCHEME_SEPARATOR)
        .unwrap_or(("tcp", trimmed));

    match scheme {
        "tcp" => parse_tcp_addr(addr),
        "unix" => parse_simple_proto_addr("unix", addr, DEFAULT_UNIX_SOCKET),
        "npipe" => parse_simple_proto_addr("npipe", addr, DEFAULT_NAMED_PIPE),
        "fd" | "ssh" => Ok(String::from(trimmed)),
        _ => Err(format!("invalid bind address format: {trimmed}")),
    }
}

fn parse_simple_proto_addr(proto: &str, addr: &str, default_addr: &str) -> Result<String, String> {
    if addr.contains(SCHEME_SEPARATOR) {
        return Err(format!("invalid proto, expected {proto}: {addr}"));
    }
    let path = if addr.is_empty() { default_addr } else { addr };
    Ok(format!("{proto}://{path}"))
}

fn parse_tcp_addr(addr: &str) -> Result<String, String> {
    if addr.is_empty() {
        return Ok(String::from(DEFAULT_TCP_HOST));
    }
    if addr.contains(SCHEME_SEPARATOR) {
        return Err(format!("invalid proto, expected tcp: {addr}"));
    }

    // Query, fragment and userinfo are accepted and dropped.
    let addr = addr.find(['?', '#']).map_or(addr, |index| &addr[..index]);
    let (authority, path) = addr
        .find('/')
        .map_or((addr, ""), |index| addr.split_at(index));
    let authority = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);

    let (raw_host, raw_port) =
        split_host_port(authority).ok_or_else(|| format!("invalid bind address format: {addr}"))?;

    let host = if raw_host.is_empty() {
        DEFAULT_TCP_ADDR
    } else {
        validate_host(raw_host).map_err(|reason| format!("invalid bind address format: {addr}: {reason}"))?;
        raw_host
    };

    // Only numeric; the range is left to the dialler.
    let port = if raw_port.is_empty() {
        DEFAULT_TCP_PORT
    } else {
        raw_port
            .parse::<u64>()
            .map_err(|_| format!("invalid bind address format: {addr}"))?;
        raw_port
    };

    Ok(format!("tcp://{}{path}", join_host_port(host, port)))
}

/// Splits `host:port`, `[v6]:port`, `host` or `[v6]` into its parts.
///
/// The IPv6 brackets are stripped from the returned host. Returns `None` for
/// malformed bracket usage or unbracketed IPv6 literals with a port.
fn split_host_port(authority: &str) -> Option<(&str, &str)> {
    if let Some(rest) = authority.strip_prefix('[') {
        let (host, after) = rest.split_once(']')?;
        return match after {
            "" => Some((host, "")),
            _ => after.strip_prefix(':').map(|port| (host, port)),
        };
    }

    match authority.matches(':').count() {
        0 => Some((authority, "")),
        1 => authority.split_once(':'),
        _ => None,
    }
}

fn validate_host(host: &str) -> Result<(), String> {
    let candidate = if host.contains(':') {
        format!("[{host}]")
    } else {
        String::from(host)
    };
    Host::parse(&candidate)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn join_host_port(host: &str, port: &str) -> String {
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}
