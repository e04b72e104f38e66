//! Container reference classification and tag extraction.
//!
//! A reference is either a Singularity image URL (`https://...`) or a
//! Docker-style `org/image:tag` name. Each ecosystem has its own tag
//! convention:
//! - Singularity: `<image>:<tag>` or `<image>_v<digit>...` in the last URL
//!   path segment, ignoring an `.img` / `.sif` extension.
//! - Docker: everything after the last `:`.
//!
//! Failures are returned as closed error enums whose `Display` is the
//! diagnostic text reported by the container rules.

use std::fmt;
use tracing::trace;
use url::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerType {
    Docker,
    Singularity,
}

impl ContainerType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerType::Docker => "docker",
            ContainerType::Singularity => "singularity",
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    #[error("invalid singularity container URL '{0}'")]
    InvalidSingularityUrl(String),

    #[error("unknown container type '{0}'")]
    UnknownContainerType(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("invalid container URL: no path segments")]
    NoPathSegments,

    #[error("invalid container URL '{name}': {reason}")]
    InvalidUrl { name: String, reason: String },

    #[error("singularity container '{0}' must specify a tag")]
    MissingSingularityTag(String),

    #[error("invalid docker tag format for container '{0}'")]
    InvalidDockerTag(String),

    #[error("docker container '{0}' must specify a tag")]
    MissingDockerTag(String),

    #[error(
        "container '{0}': please use 'organization/container:tag' format instead of full registry URL"
    )]
    RegistryUrl(String),
}

/// Decide which ecosystem a container reference belongs to.
pub fn classify(name: &str) -> Result<ContainerType, ClassificationError> {
    // the depot prefix is already covered by https://
    if name.starts_with("https://") || name.starts_with("https://depot") {
        return match raw_path(name) {
            Ok(_) => Ok(ContainerType::Singularity),
            Err(reason) => {
                trace!(name, %reason, "singularity URL did not parse");
                Err(ClassificationError::InvalidSingularityUrl(name.to_string()))
            }
        };
    }
    if name.contains('/') || name.contains(':') {
        return Ok(ContainerType::Docker);
    }
    Err(ClassificationError::UnknownContainerType(name.to_string()))
}

/// Path of a `scheme://authority/path` reference exactly as written.
///
/// Only structural faults are rejected: control characters, bad `%`
/// escapes, unbalanced or invalid `[...]` hosts and non-numeric ports.
/// Dot segments and non-ASCII text are left untouched.
fn raw_path(name: &str) -> Result<&str, String> {
    if let Some(c) = name.chars().find(|c| c.is_ascii_control()) {
        return Err(format!("invalid control character {:?} in URL", c));
    }
    let (_, rest) = name
        .split_once("://")
        .ok_or_else(|| "missing scheme".to_string())?;
    let end = rest.find(|c: char| c == '?' || c == '#').unwrap_or(rest.len());
    let rest = &rest[..end];
    let (authority, path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    check_host(host)?;
    check_escapes(path)?;
    Ok(path)
}

fn check_host(host: &str) -> Result<(), String> {
    if let Some(inner) = host.strip_prefix('[') {
        let close = inner
            .find(']')
            .ok_or_else(|| "missing ']' in host".to_string())?;
        let literal = &host[..close + 2];
        Host::parse(literal).map_err(|err| format!("invalid host {}: {}", literal, err))?;
        return check_port(&inner[close + 1..]);
    }
    if host.contains(|c: char| c == '[' || c == ']') {
        return Err(format!("unexpected bracket in host {:?}", host));
    }
    check_escapes(host)?;
    match host.rfind(':') {
        Some(idx) => check_port(&host[idx..]),
        None => Ok(()),
    }
}

/// Empty, or `:` followed by ASCII digits only. Range is not checked.
fn check_port(port: &str) -> Result<(), String> {
    match port.strip_prefix(':') {
        None if port.is_empty() => Ok(()),
        Some(digits) if digits.bytes().all(|b| b.is_ascii_digit()) => Ok(()),
        _ => Err(format!("invalid port {:?} after host", port)),
    }
}

fn check_escapes(text: &str) -> Result<(), String> {
    for (idx, _) in text.match_indices('%') {
        let hex = text.as_bytes().get(idx + 1..idx + 3);
        if !hex.is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)) {
            let shown: String = text[idx..].chars().take(3).collect();
            return Err(format!("invalid URL escape {:?}", shown));
        }
    }
    Ok(())
}

/// A tag is non-empty and made of alphanumerics, `-`, `_` and `.` only.
pub fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Extract the tag of a Singularity image URL.
pub fn singularity_tag(name: &str) -> Result<String, TagError> {
    let path = raw_path(name).map_err(|reason| TagError::InvalidUrl {
        name: name.to_string(),
        reason,
    })?;
    let base = base_name(path);
    if base == "." || base == "/" {
        return Err(TagError::NoPathSegments);
    }
    let segment = base
        .strip_suffix(".img")
        .or_else(|| base.strip_suffix(".sif"))
        .unwrap_or(base);

    if let Some((_, tag)) = segment.rsplit_once(':') {
        if is_valid_tag(tag) {
            return Ok(tag.to_string());
        }
    }
    if let Some(idx) = segment.rfind("_v") {
        // keep the `v`: `fastqc_v0.11.9` -> `v0.11.9`
        let tag = &segment[idx + 1..];
        let versioned = tag[1..].chars().next().is_some_and(char::is_numeric);
        if versioned && is_valid_tag(tag) {
            return Ok(tag.to_string());
        }
    }
    Err(TagError::MissingSingularityTag(name.to_string()))
}

/// Extract the tag of a Docker reference (text after the last `:`).
pub fn docker_tag(name: &str) -> Result<&str, TagError> {
    match name.rsplit_once(':') {
        Some((_, tag)) if is_valid_tag(tag) => Ok(tag),
        Some(_) => Err(TagError::InvalidDockerTag(name.to_string())),
        None => Err(TagError::MissingDockerTag(name.to_string())),
    }
}

/// References spelled with the full `quay.io` registry host.
pub fn registry_url_error(name: &str) -> Option<TagError> {
    name.starts_with("quay.io")
        .then(|| TagError::RegistryUrl(name.to_string()))
}

/// Every tag problem of a classified reference, in report order.
pub fn tag_errors(name: &str, kind: ContainerType) -> Vec<TagError> {
    let mut errors = Vec::new();
    match kind {
        ContainerType::Singularity => {
            if let Err(err) = singularity_tag(name) {
                errors.push(err);
            }
        }
        ContainerType::Docker => {
            if let Err(err) = docker_tag(name) {
                errors.push(err);
            }
            errors.extend(registry_url_error(name));
        }
    }
    errors
}

/// Last element of a slash-separated path, following `path.Base` rules:
/// trailing slashes are ignored, an empty path is `"."` and a path of only
/// slashes is `"/"`.
fn base_name(path: &str) -> &str {
    if path.is_empty() {
        return ".";
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}
