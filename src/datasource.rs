// src/datasource.rs
//! Structured view over a layer's raw connection string.
//!
//! Parsing is lenient by contract: malformed input degrades to absent
//! fields, never to an error, because every rule that inspects a
//! connection must keep running on projects the checker has never seen
//! before. The descriptor also round-trips back to a canonical string,
//! with the password optionally redacted for display, and with the SQL
//! filter stripped for duplicate-datasource grouping.

use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Coarse provider family, the first thing every connection rule checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Postgres,
    /// Provider whose source decodes to a filesystem path.
    FileBased,
    /// Anything else; skipped by the file and database rules.
    Other,
}

impl ProviderKind {
    #[must_use]
    pub fn classify(provider: &str) -> Self {
        match provider.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "postgresraster" => Self::Postgres,
            "ogr" | "gdal" | "spatialite" | "delimitedtext" | "mdal" => Self::FileBased,
            _ => Self::Other,
        }
    }
}

/// Parsed connection-string fields. Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSourceDescriptor {
    pub authcfg: String,
    pub service: String,
    pub host: String,
    pub port: String,
    pub dbname: String,
    pub user: String,
    pub password: String,
    /// Declared key column, e.g. `id` or a provider-invented row id.
    pub key_column: String,
    pub estimated_metadata: bool,
    /// SQL filter clause; always the last component of the raw string.
    pub sql: String,
    /// Table reference, kept verbatim (may include a schema).
    pub table: String,
    /// Geometry column named in parentheses after the table reference.
    pub geometry_column: String,
    /// Explicit path component, when the provider stores one.
    pub path: String,
    /// Unrecognized `key=value` pairs, kept verbatim in order. A provider
    /// carries options this crate does not model (`sslmode`, `srid`, ...);
    /// a rewritten source string must not lose them.
    pub extra: Vec<String>,
}

impl DataSourceDescriptor {
    /// Parses a raw connection string. Total: unknown keys are ignored and
    /// garbage tokens are skipped.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut descriptor = Self::default();
        let mut rest = raw.trim_start();
        while let Some(eq) = rest.find('=') {
            // A bare token before the key (e.g. the geometry-column suffix
            // of a table reference) is not a pair; only the last word
            // counts as the key candidate.
            let before = rest[..eq].trim_end();
            let key = before.rsplit(char::is_whitespace).next().unwrap_or("");
            let after = &rest[eq + 1..];
            if !key_token_re().is_match(key) {
                rest = after;
                continue;
            }
            if key.eq_ignore_ascii_case("sql") {
                // The filter consumes the remainder of the string.
                descriptor.sql = after.trim().to_string();
                break;
            }
            let (value, consumed) = take_value(after);
            if !descriptor.assign(key, &value) {
                descriptor.extra.push(format!("{key}={}", &after[..consumed]));
            }
            let mut remainder = after[consumed..].trim_start();
            if key.eq_ignore_ascii_case("table") {
                if let Some((geometry, after_suffix)) = take_geometry_suffix(remainder) {
                    descriptor.geometry_column = geometry;
                    remainder = after_suffix;
                }
            }
            rest = remainder;
        }
        descriptor
    }

    /// Returns false when the key is not one of the modeled fields, so the
    /// caller can keep the raw pair instead.
    fn assign(&mut self, key: &str, value: &str) -> bool {
        match key.to_ascii_lowercase().as_str() {
            "authcfg" => self.authcfg = value.to_string(),
            "service" => self.service = value.to_string(),
            "host" => self.host = value.to_string(),
            "port" => self.port = value.to_string(),
            "dbname" => self.dbname = value.to_string(),
            "user" | "username" => self.user = value.to_string(),
            "password" => self.password = value.to_string(),
            "key" => self.key_column = value.to_string(),
            "estimatedmetadata" => {
                self.estimated_metadata = matches!(value, "true" | "1");
            }
            "table" => self.table = value.to_string(),
            "path" => self.path = value.to_string(),
            _ => return false,
        }
        true
    }

    /// Canonical serialization, lossless apart from field ordering: modeled
    /// fields come out in canonical order, unrecognized pairs verbatim. With
    /// `include_password` unset the password is dropped entirely, the safe
    /// form for display and narratives.
    #[must_use]
    pub fn to_connection_string(&self, include_password: bool) -> String {
        let mut parts: Vec<String> = Vec::new();
        push_quoted(&mut parts, "service", &self.service);
        push_quoted(&mut parts, "dbname", &self.dbname);
        push_bare(&mut parts, "host", &self.host);
        push_bare(&mut parts, "port", &self.port);
        push_quoted(&mut parts, "user", &self.user);
        if include_password {
            push_quoted(&mut parts, "password", &self.password);
        }
        push_bare(&mut parts, "authcfg", &self.authcfg);
        push_quoted(&mut parts, "key", &self.key_column);
        if self.estimated_metadata {
            parts.push("estimatedmetadata=true".to_string());
        }
        parts.extend(self.extra.iter().cloned());
        if !self.path.is_empty() {
            parts.push(format!("path={}", quote(&self.path)));
        }
        if !self.table.is_empty() {
            if self.geometry_column.is_empty() {
                parts.push(format!("table={}", self.table));
            } else {
                parts.push(format!("table={} ({})", self.table, self.geometry_column));
            }
        }
        if !self.sql.is_empty() {
            parts.push(format!("sql={}", self.sql));
        }
        parts.join(" ")
    }

    /// Serialization with the SQL filter cleared and the password kept: the
    /// grouping key for detecting one datasource shared under different
    /// filters.
    #[must_use]
    pub fn without_filter(&self) -> String {
        let mut stripped = self.clone();
        stripped.sql.clear();
        stripped.to_connection_string(true)
    }

    #[must_use]
    pub fn has_filter(&self) -> bool {
        !self.sql.is_empty()
    }
}

/// Decodes the filesystem path of a file-based layer source. `None` for
/// database and other non-file providers, or when no path component exists.
#[must_use]
pub fn decode_file_path(provider: &str, source: &str) -> Option<PathBuf> {
    if ProviderKind::classify(provider) != ProviderKind::FileBased {
        return None;
    }
    match provider.to_ascii_lowercase().as_str() {
        "delimitedtext" => {
            // file:///path/data.csv?delimiter=,
            let trimmed = source.strip_prefix("file://").unwrap_or(source);
            let end = trimmed.find('?').unwrap_or(trimmed.len());
            non_empty_path(&trimmed[..end])
        }
        "spatialite" => {
            let descriptor = DataSourceDescriptor::parse(source);
            non_empty_path(&descriptor.dbname)
        }
        _ => {
            // OGR/GDAL append sublayer options after a pipe:
            // /data/roads.gpkg|layername=roads
            let end = source.find('|').unwrap_or(source.len());
            non_empty_path(source[..end].trim())
        }
    }
}

fn non_empty_path(raw: &str) -> Option<PathBuf> {
    if raw.is_empty() {
        None
    } else {
        Some(PathBuf::from(raw))
    }
}

/// Takes one value off the front of `input`: a single-quoted run with
/// `\'` / `\\` escapes, or a bare token ending at the next whitespace.
/// Returns the unescaped value and the number of bytes consumed.
fn take_value(input: &str) -> (String, usize) {
    if input.starts_with('\'') {
        let mut value = String::new();
        let mut escaped = false;
        for (index, character) in input.char_indices().skip(1) {
            if escaped {
                value.push(character);
                escaped = false;
                continue;
            }
            match character {
                '\\' => escaped = true,
                '\'' => return (value, index + 1),
                _ => value.push(character),
            }
        }
        // Unterminated quote: take everything, stay lenient.
        (value, input.len())
    } else {
        let end = input.find(char::is_whitespace).unwrap_or(input.len());
        (input[..end].to_string(), end)
    }
}

/// Takes a `(geometry_column)` suffix off the front of `input`, as written
/// after a table reference.
fn take_geometry_suffix(input: &str) -> Option<(String, &str)> {
    let inner = input.strip_prefix('(')?;
    let close = inner.find(')')?;
    Some((inner[..close].trim().to_string(), inner[close + 1..].trim_start()))
}

fn push_quoted(parts: &mut Vec<String>, key: &str, value: &str) {
    if !value.is_empty() {
        parts.push(format!("{key}={}", quote(value)));
    }
}

fn push_bare(parts: &mut Vec<String>, key: &str, value: &str) {
    if !value.is_empty() {
        parts.push(format!("{key}={value}"));
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// The pattern is hardcoded; an invalid pattern is a developer error caught
/// by the test suite, hence the expect.
fn key_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("key pattern is valid"))
}
