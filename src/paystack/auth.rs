//! Paystack Authentication
//!
//! Resolves the secret key from environment variables, in-process properties,
//! or configuration files (YAML, `.properties`, `.env`) found next to the
//! running executable, in the working directory, or in the user's home.

use crate::error::{PaystackError, Result};
use anyhow::Context;
use secrecy::SecretString;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration files searched, highest priority first
pub const CONFIG_FILES: &[&str] = &[
    "application.yml",
    "application.yaml",
    "application.properties",
    "paystack.yml",
    "paystack.yaml",
    "paystack.properties",
    ".env",
];

/// Key looked up in `.properties` files, and as a nested path in YAML files
const PROPERTIES_KEY: &str = "paystack.secretKey";

/// Key looked up in `.env` files
const DOTENV_KEY: &str = "PAYSTACK_SECRET_KEY";

/// Which Paystack key namespace to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Live,
    Test,
}

impl KeyType {
    /// Environment variable and property names, in lookup order
    pub fn lookup_names(self) -> [&'static str; 2] {
        match self {
            KeyType::Live => ["PAYSTACK_LIVE_SECRET_KEY", "paystack.live.secretKey"],
            KeyType::Test => ["PAYSTACK_TEST_SECRET_KEY", "paystack.test.secretKey"],
        }
    }

    /// Prefix Paystack puts on secret keys of this type
    fn expected_prefix(self) -> &'static str {
        match self {
            KeyType::Live => "sk_live_",
            KeyType::Test => "sk_test_",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Live => f.write_str("live"),
            KeyType::Test => f.write_str("test"),
        }
    }
}

impl FromStr for KeyType {
    type Err = PaystackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(KeyType::Live),
            "test" => Ok(KeyType::Test),
            other => Err(PaystackError::Config(format!("unknown key type: {}", other))),
        }
    }
}

/// Directory a configuration file is looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Resources shipped alongside the application
    Bundled,
    WorkingDir,
    Home,
}

impl Location {
    /// Search order for each file name
    pub const ALL: [Location; 3] = [Location::Bundled, Location::WorkingDir, Location::Home];

    fn describe(self) -> &'static str {
        match self {
            Location::Bundled => "bundled resources",
            Location::WorkingDir => "current directory",
            Location::Home => "user home directory",
        }
    }
}

/// How a configuration file stores the secret key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Yaml,
    Properties,
    Dotenv,
}

impl FileFormat {
    fn for_file_name(name: &str) -> Option<Self> {
        if name.ends_with(".yml") || name.ends_with(".yaml") {
            Some(FileFormat::Yaml)
        } else if name.ends_with(".properties") {
            Some(FileFormat::Properties)
        } else if name == ".env" {
            Some(FileFormat::Dotenv)
        } else {
            None
        }
    }

    fn extract(self, content: &str) -> anyhow::Result<Option<String>> {
        match self {
            FileFormat::Yaml => {
                let doc: serde_yaml::Value =
                    serde_yaml::from_str(content).context("invalid YAML")?;
                Ok(doc
                    .get("paystack")
                    .and_then(|v| v.get("secretKey"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string))
            },
            FileFormat::Properties => Ok(parse_properties(content).remove(PROPERTIES_KEY)),
            FileFormat::Dotenv => Ok(parse_properties(content)
                .remove(DOTENV_KEY)
                .map(|value| unquote(&value).to_string())),
        }
    }
}

/// Parse `.properties` content into a map. Later definitions win.
///
/// Keys end at the first unescaped `=`, `:` or whitespace. Lines starting
/// with `#` or `!` are comments, and a trailing odd `\` continues the line.
/// Values are taken as written; there is no variable expansion.
fn parse_properties(content: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in logical_lines(content) {
        if let Some((key, value)) = split_property(&line) {
            map.insert(key, value);
        }
    }
    map
}

/// Join `\`-continued lines, dropping blanks and comments
fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut continuing = false;

    for raw in content.lines() {
        let line = raw.trim_start();
        if !continuing && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }

        let backslashes = line.len() - line.trim_end_matches('\\').len();
        if backslashes % 2 == 1 {
            current.push_str(&line[..line.len() - 1]);
            continuing = true;
        } else {
            current.push_str(line);
            lines.push(std::mem::take(&mut current));
            continuing = false;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_property(line: &str) -> Option<(String, String)> {
    let mut chars = line.chars().peekable();
    let mut key = String::new();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    key.push(unescape(next, &mut chars));
                }
            },
            '=' | ':' => break,
            c if c.is_whitespace() => {
                while chars.next_if(|c| c.is_whitespace()).is_some() {}
                chars.next_if(|c| *c == '=' || *c == ':');
                break;
            },
            c => key.push(c),
        }
    }

    while chars.next_if(|c| c.is_whitespace()).is_some() {}

    let mut value = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    value.push(unescape(next, &mut chars));
                }
            },
            c => value.push(c),
        }
    }

    if key.is_empty() {
        return None;
    }
    Some((key, value.trim_end().to_string()))
}

/// Character for the escape `\c`; `\uXXXX` reads four hex digits
fn unescape(c: char, chars: &mut impl Iterator<Item = char>) -> char {
    match c {
        't' => '\t',
        'n' => '\n',
        'r' => '\r',
        'f' => '\u{c}',
        'u' => {
            let hex: String = chars.by_ref().take(4).collect();
            u32::from_str_radix(&hex, 16)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER)
        },
        other => other,
    }
}

/// Strip one pair of matching surrounding quotes
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Snapshot of everything the resolver may look at
///
/// Probes only read from this value, so resolution can be exercised against
/// a synthetic environment.
#[derive(Clone, Default)]
pub struct ConfigEnvironment {
    vars: HashMap<String, String>,
    properties: HashMap<String, String>,
    resource_dir: Option<PathBuf>,
    working_dir: Option<PathBuf>,
    home_dir: Option<PathBuf>,
}

impl ConfigEnvironment {
    /// An environment with no variables, properties or directories
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture the running process: environment variables, the directory of
    /// the current executable, the working directory and the home directory
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();

        let resource_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        Self {
            vars,
            properties: HashMap::new(),
            resource_dir,
            working_dir: std::env::current_dir().ok(),
            home_dir: dirs::home_dir(),
        }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Set an in-process property, consulted after environment variables
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dir = Some(dir.into());
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(dir.into());
        self
    }

    /// Environment variable captured in this snapshot
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    fn dir(&self, location: Location) -> Option<&Path> {
        match location {
            Location::Bundled => self.resource_dir.as_deref(),
            Location::WorkingDir => self.working_dir.as_deref(),
            Location::Home => self.home_dir.as_deref(),
        }
    }
}

// Variable and property values may be secrets; only their names are shown.
impl fmt::Debug for ConfigEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigEnvironment")
            .field("vars", &self.vars.len())
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .field("resource_dir", &self.resource_dir)
            .field("working_dir", &self.working_dir)
            .field("home_dir", &self.home_dir)
            .finish()
    }
}

/// One place the secret key may come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    EnvVar(&'static str),
    Property(&'static str),
    File {
        name: &'static str,
        location: Location,
    },
}

impl Probe {
    /// Look this source up. Read and parse failures count as "not found".
    pub fn probe(&self, env: &ConfigEnvironment) -> Option<String> {
        let value = match *self {
            Probe::EnvVar(name) => env.vars.get(name).cloned(),
            Probe::Property(name) => env.properties.get(name).cloned(),
            Probe::File { name, location } => {
                let dir = env.dir(location)?;
                match read_key_from_file(&dir.join(name)) {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::trace!(
                            "Could not read {} from {}: {:#}",
                            name,
                            location.describe(),
                            e
                        );
                        None
                    },
                }
            },
        };

        value.filter(|v| !v.trim().is_empty())
    }

    /// Source class, for logging
    fn source(&self) -> &'static str {
        match self {
            Probe::EnvVar(_) => "environment variables",
            Probe::Property(_) => "system properties",
            Probe::File { .. } => "configuration files",
        }
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probe::EnvVar(name) => write!(f, "environment variable {}", name),
            Probe::Property(name) => write!(f, "system property {}", name),
            Probe::File { name, location } => write!(f, "{} in {}", name, location.describe()),
        }
    }
}

fn read_key_from_file(path: &Path) -> anyhow::Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }

    let Some(format) = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(FileFormat::for_file_name)
    else {
        return Ok(None);
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    format.extract(&content)
}

/// Every probe for `key_type`, highest priority first
pub fn probe_order(key_type: KeyType) -> Vec<Probe> {
    let names = key_type.lookup_names();

    let mut probes: Vec<Probe> = names.into_iter().map(Probe::EnvVar).collect();
    probes.extend(names.into_iter().map(Probe::Property));

    for &name in CONFIG_FILES {
        for location in Location::ALL {
            probes.push(Probe::File { name, location });
        }
    }

    probes
}

/// Resolve the secret key for `key_type`; the first non-empty source wins
pub fn resolve_secret_key(key_type: KeyType, env: &ConfigEnvironment) -> Result<SecretString> {
    for probe in probe_order(key_type) {
        if let Some(key) = probe.probe(env) {
            tracing::info!("Found Paystack API key in {}", probe.source());
            tracing::debug!("Found API key in {}", probe);

            if !key.starts_with(key_type.expected_prefix()) {
                tracing::warn!(
                    "Paystack {} key does not start with {}",
                    key_type,
                    key_type.expected_prefix()
                );
            }

            return Ok(SecretString::from(key));
        }
    }

    tracing::error!("No Paystack API key found in any configuration source");
    Err(PaystackError::no_key_found(key_type))
}
