// src/flags.rs

//! Command-line flag definitions and their application to an argument list.
//!
//! A [`FlagDefinition`] carries its type in the variant of its default
//! [`FlagValue`], so a definition can never disagree with itself about what
//! it parses. Definitions are turned into a `clap` command at apply time and
//! the parsed values come back as an owned [`FlagValues`].
//!
//! The accepted argument grammar is the classic single-dash one:
//!
//! - `-name value`, `-name=value`, `--name value`, `--name=value`
//! - bool flags: `-name` (sets `true`) or `-name=false`; never `-name false`
//! - parsing stops at `--` or at the first argument that is not a flag;
//!   everything after that ends up in [`FlagValues::remaining`]
//! - int values take a base prefix (`0x10`, `0o17`, `0b101`, `017`), see
//!   [`parse_int`]

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use tracing::debug;

use crate::errors::{JsonfigError, Result};

pub const CONFIG_DIR_FLAG: &str = "configDir";
pub const ENVIRONMENT_FLAG: &str = "environment";
pub const DEFAULT_CONFIG_DIR: &str = "./config/";
pub const DEFAULT_ENVIRONMENT: &str = "prod";

// '=' is never valid in a flag name, so this id cannot collide.
const REMAINING_ID: &str = "=remaining";

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Type tag of a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    String,
    Int,
    Bool,
    Duration,
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlagKind::String => "string",
            FlagKind::Int => "int",
            FlagKind::Bool => "bool",
            FlagKind::Duration => "duration",
        };
        f.write_str(s)
    }
}

impl FromStr for FlagKind {
    type Err = JsonfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" => Ok(FlagKind::String),
            "int" => Ok(FlagKind::Int),
            "bool" => Ok(FlagKind::Bool),
            "duration" => Ok(FlagKind::Duration),
            _ => Err(JsonfigError::UnknownFlagType(s.to_string())),
        }
    }
}

/// A typed flag value, used both for defaults and for parsed results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    String(String),
    Int(i64),
    Bool(bool),
    Duration(Duration),
}

impl FlagValue {
    pub fn kind(&self) -> FlagKind {
        match self {
            FlagValue::String(_) => FlagKind::String,
            FlagValue::Int(_) => FlagKind::Int,
            FlagValue::Bool(_) => FlagKind::Bool,
            FlagValue::Duration(_) => FlagKind::Duration,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FlagValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            FlagValue::Duration(v) => Some(*v),
            _ => None,
        }
    }
}

/// Declares one named command-line option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDefinition {
    name: String,
    usage: String,
    default: FlagValue,
}

impl FlagDefinition {
    pub fn new(name: impl Into<String>, default: FlagValue, usage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            usage: usage.into(),
            default,
        }
    }

    pub fn string(
        name: impl Into<String>,
        default: impl Into<String>,
        usage: impl Into<String>,
    ) -> Self {
        Self::new(name, FlagValue::String(default.into()), usage)
    }

    pub fn int(name: impl Into<String>, default: i64, usage: impl Into<String>) -> Self {
        Self::new(name, FlagValue::Int(default), usage)
    }

    pub fn bool(name: impl Into<String>, default: bool, usage: impl Into<String>) -> Self {
        Self::new(name, FlagValue::Bool(default), usage)
    }

    pub fn duration(name: impl Into<String>, default: Duration, usage: impl Into<String>) -> Self {
        Self::new(name, FlagValue::Duration(default), usage)
    }

    /// Build a definition from a textual type tag and default, e.g. when flag
    /// definitions come from a file rather than from code.
    ///
    /// Unknown tags fail with [`JsonfigError::UnknownFlagType`]; a default that
    /// does not parse as the tagged type fails with
    /// [`JsonfigError::InvalidFlagDefault`].
    pub fn from_tag(
        tag: &str,
        name: impl Into<String>,
        default: &str,
        usage: impl Into<String>,
    ) -> Result<Self> {
        let kind: FlagKind = tag.parse()?;
        let name = name.into();

        let parsed = match kind {
            FlagKind::String => Some(FlagValue::String(default.to_string())),
            FlagKind::Int => parse_int(default.trim()).ok().map(FlagValue::Int),
            FlagKind::Bool => parse_bool(default).ok().map(FlagValue::Bool),
            FlagKind::Duration => parse_duration(default).ok().map(FlagValue::Duration),
        };

        match parsed {
            Some(value) => Ok(Self::new(name, value, usage)),
            None => Err(JsonfigError::InvalidFlagDefault {
                name,
                kind,
                value: default.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn default_value(&self) -> &FlagValue {
        &self.default
    }

    pub fn kind(&self) -> FlagKind {
        self.default.kind()
    }
}

/// The `-configDir` and `-environment` flags used to derive the file path.
pub fn default_definitions() -> Vec<FlagDefinition> {
    vec![
        FlagDefinition::string(
            CONFIG_DIR_FLAG,
            DEFAULT_CONFIG_DIR,
            "full path to the config directory with slash at the end.",
        ),
        FlagDefinition::string(ENVIRONMENT_FLAG, DEFAULT_ENVIRONMENT, "the system environment"),
    ]
}

/// Result of applying flag definitions to an argument list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagValues {
    values: BTreeMap<String, FlagValue>,
    remaining: Vec<String>,
}

impl FlagValues {
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.values.get(name)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FlagValue::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FlagValue::as_int)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FlagValue::as_bool)
    }

    pub fn duration(&self, name: &str) -> Option<Duration> {
        self.get(name).and_then(FlagValue::as_duration)
    }

    /// Arguments left over after flag parsing stopped.
    pub fn remaining(&self) -> &[String] {
        &self.remaining
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Parse `args` (program name first) against `definitions`.
///
/// Parse failures are returned as [`JsonfigError::FlagParse`]; this never
/// exits the process, including for `-help`.
pub fn apply_flags(args: &[String], definitions: &[FlagDefinition]) -> Result<FlagValues> {
    debug!(?args, "applying flag definitions");

    let Some((program, rest)) = args.split_first() else {
        return Err(JsonfigError::ArgumentsEmpty);
    };

    validate_definitions(definitions)?;

    let help_enabled = !definitions
        .iter()
        .any(|d| d.name == "help" || d.name == "h");

    let mut cmd = Command::new(program.clone())
        .args_override_self(true)
        .disable_version_flag(true)
        .disable_help_flag(!help_enabled);

    for def in definitions {
        cmd = cmd.arg(build_arg(def));
    }
    cmd = cmd.arg(
        Arg::new(REMAINING_ID)
            .value_name("ARGS")
            .num_args(1..)
            .action(ArgAction::Append)
            .value_parser(value_parser!(String))
            .hide(true),
    );

    let mut full = Vec::with_capacity(args.len() + 1);
    full.push(program.clone());
    full.extend(normalize_args(rest, definitions, help_enabled));

    let matches = cmd.try_get_matches_from(full)?;
    let flags = collect_values(&matches, definitions);

    debug!(
        flags = flags.values.len(),
        remaining = flags.remaining.len(),
        "flag definitions applied"
    );

    Ok(flags)
}

fn validate_definitions(definitions: &[FlagDefinition]) -> Result<()> {
    for (i, def) in definitions.iter().enumerate() {
        let name = def.name.as_str();
        if name.is_empty()
            || name.starts_with('-')
            || name.contains('=')
            || name.chars().any(char::is_whitespace)
        {
            return Err(JsonfigError::InvalidFlagName(name.to_string()));
        }
        if definitions[..i].iter().any(|d| d.name == name) {
            return Err(JsonfigError::DuplicateFlag(name.to_string()));
        }
    }
    Ok(())
}

fn build_arg(def: &FlagDefinition) -> Arg {
    let arg = Arg::new(def.name.clone())
        .long(def.name.clone())
        .help(def.usage.clone())
        .action(ArgAction::Set);

    match &def.default {
        FlagValue::String(v) => arg
            .default_value(v.clone())
            .value_parser(value_parser!(String)),
        FlagValue::Int(v) => arg
            .default_value(v.to_string())
            .value_parser(parse_int),
        FlagValue::Bool(v) => arg
            .default_value(v.to_string())
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .value_parser(parse_bool),
        FlagValue::Duration(v) => arg
            .default_value(format_duration(*v))
            .value_parser(parse_duration),
    }
}

/// Rewrite single-dash options into the `--name=value` form `clap` expects.
///
/// Values of non-bool flags are glued to their flag with `=` so that values
/// starting with `-` (negative ints, odd strings) are never mistaken for flags.
fn normalize_args(
    args: &[String],
    definitions: &[FlagDefinition],
    help_enabled: bool,
) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len() + 1);
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "--" {
            out.push(arg.clone());
            out.extend(iter.by_ref().cloned());
            break;
        }

        let Some(body) = flag_body(arg) else {
            out.push("--".to_string());
            out.push(arg.clone());
            out.extend(iter.by_ref().cloned());
            break;
        };

        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        if help_enabled && value.is_none() && (name == "h" || name == "help") {
            out.push("--help".to_string());
            continue;
        }

        let takes_value = definitions
            .iter()
            .find(|d| d.name == name)
            .is_some_and(|d| d.kind() != FlagKind::Bool);

        match value {
            Some(value) => out.push(format!("--{name}={value}")),
            None if takes_value => match iter.next() {
                Some(next) => out.push(format!("--{name}={next}")),
                None => out.push(format!("--{name}")),
            },
            None => out.push(format!("--{name}")),
        }
    }

    out
}

fn flag_body(arg: &str) -> Option<&str> {
    let body = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-'))?;
    if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
        None
    } else {
        Some(body)
    }
}

fn collect_values(matches: &ArgMatches, definitions: &[FlagDefinition]) -> FlagValues {
    let mut values = BTreeMap::new();

    for def in definitions {
        let name = def.name.as_str();
        let parsed = match def.kind() {
            FlagKind::String => matches
                .try_get_one::<String>(name)
                .ok()
                .flatten()
                .cloned()
                .map(FlagValue::String),
            FlagKind::Int => matches
                .try_get_one::<i64>(name)
                .ok()
                .flatten()
                .copied()
                .map(FlagValue::Int),
            FlagKind::Bool => matches
                .try_get_one::<bool>(name)
                .ok()
                .flatten()
                .copied()
                .map(FlagValue::Bool),
            FlagKind::Duration => matches
                .try_get_one::<Duration>(name)
                .ok()
                .flatten()
                .copied()
                .map(FlagValue::Duration),
        };
        values.insert(def.name.clone(), parsed.unwrap_or_else(|| def.default.clone()));
    }

    let remaining = matches
        .try_get_many::<String>(REMAINING_ID)
        .ok()
        .flatten()
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default();

    FlagValues { values, remaining }
}

/// Parse a boolean the way classic flag parsers do.
pub fn parse_bool(s: &str) -> std::result::Result<bool, String> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(format!("invalid boolean value '{other}'")),
    }
}

/// Parse an integer with its base taken from the prefix: `0x` (hex), `0o` or
/// a bare leading `0` (octal), `0b` (binary), decimal otherwise.
///
/// Underscores may separate digits, but only in prefixed literals
/// (`0x_ff`, `0b1010_0101`); `1_000` is rejected.
pub fn parse_int(s: &str) -> std::result::Result<i64, String> {
    let invalid = || format!("invalid integer value '{s}'");

    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let lower = unsigned.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits, prefixed) = match lower.as_deref() {
        Some("0x") => (16, &unsigned[2..], true),
        Some("0o") => (8, &unsigned[2..], true),
        Some("0b") => (2, &unsigned[2..], true),
        _ if unsigned.len() > 1 && unsigned.starts_with('0') => (8, &unsigned[1..], true),
        _ => (10, unsigned, false),
    };

    if digits.contains('_') && (!prefixed || digits.ends_with('_') || digits.contains("__")) {
        return Err(invalid());
    }
    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(invalid());
    }

    let signed = if negative { format!("-{digits}") } else { digits };
    i64::from_str_radix(&signed, radix).map_err(|e| format!("{}: {e}", invalid()))
}

/// Parse a duration such as `300ms`, `1.5s` or `1h20m`.
///
/// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. A bare `0` is
/// accepted; negative durations other than zero are rejected.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("empty duration string".to_string());
    }

    let (negative, body) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let dur = parse_unsigned_duration(body).map_err(|e| format!("invalid duration '{s}': {e}"))?;
    if negative && !dur.is_zero() {
        return Err(format!("invalid duration '{s}': negative durations are not supported"));
    }
    Ok(dur)
}

fn parse_unsigned_duration(mut s: &str) -> std::result::Result<Duration, String> {
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err("missing value".to_string());
    }

    let mut total: u128 = 0;
    while !s.is_empty() {
        let num_end = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(s.len());
        let (num, rest) = s.split_at(num_end);
        if num.is_empty() || num == "." {
            return Err("expected a number".to_string());
        }

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let (unit, tail) = rest.split_at(unit_end);

        let per_unit: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => NANOS_PER_SEC,
            "m" => 60 * NANOS_PER_SEC,
            "h" => 60 * 60 * NANOS_PER_SEC,
            "" => return Err("missing unit".to_string()),
            other => {
                return Err(format!(
                    "unknown unit '{other}'; expected ns, us, ms, s, m, or h"
                ));
            }
        };

        let (whole, frac) = num.split_once('.').unwrap_or((num, ""));
        if frac.contains('.') {
            return Err(format!("malformed number '{num}'"));
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|e| format!("invalid number '{num}': {e}"))?
        };
        let mut nanos = whole
            .checked_mul(per_unit)
            .ok_or_else(|| "duration out of range".to_string())?;

        if !frac.is_empty() {
            let digits = &frac[..frac.len().min(18)];
            let frac_value: u128 = digits
                .parse()
                .map_err(|e| format!("invalid number '{num}': {e}"))?;
            nanos += frac_value * per_unit / 10u128.pow(digits.len() as u32);
        }

        total = total
            .checked_add(nanos)
            .ok_or_else(|| "duration out of range".to_string())?;
        s = tail;
    }

    let total = u64::try_from(total).map_err(|_| "duration out of range".to_string())?;
    Ok(Duration::from_nanos(total))
}

/// Render a duration so that [`parse_duration`] reads it back unchanged.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        "0s".to_string()
    } else if nanos % NANOS_PER_SEC == 0 {
        format!("{}s", nanos / NANOS_PER_SEC)
    } else if nanos % 1_000_000 == 0 {
        format!("{}ms", nanos / 1_000_000)
    } else {
        format!("{nanos}ns")
    }
}
