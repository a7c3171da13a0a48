// Typed accessors over `yaml_rust::Yaml` values. Every accessor takes the key
// path of the value so errors point at the offending node.

use crate::{Error, Result};
use std::str::FromStr;
use std::time::Duration;
use yaml_rust::{yaml, Yaml};

pub(crate) fn child(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

pub(crate) fn index(path: &str, i: usize) -> String {
    format!("{}[{}]", path, i)
}

pub(crate) fn unknown_key(path: &str) -> Error {
    Error::decode(path, "unknown key")
}

/// Attaches the path of the decoded node to the errors a builder raised
/// while consuming it. Errors already carrying a path are kept as they are.
pub(crate) fn located<T>(result: Result<T>, path: &str) -> Result<T> {
    result.map_err(|err| match err {
        Error::InvalidArgument { .. } | Error::Referential { .. } if !path.is_empty() => {
            Error::decode(path, err.to_string())
        }
        err => err,
    })
}

pub(crate) fn as_hash<'a>(v: &'a Yaml, path: &str) -> Result<&'a yaml::Hash> {
    match v {
        Yaml::Hash(map) => Ok(map),
        _ => Err(Error::decode(path, "expected a mapping")),
    }
}

/// Key/value pairs of a mapping, in document order, with the path of each
/// value.
pub(crate) fn entries<'a>(v: &'a Yaml, path: &str) -> Result<Vec<(&'a str, &'a Yaml, String)>> {
    let map = as_hash(v, path)?;
    let mut entries = Vec::with_capacity(map.len());
    for (k, v) in map.iter() {
        match k {
            Yaml::String(key) => entries.push((key.as_str(), v, child(path, key))),
            _ => return Err(Error::decode(path, "mapping keys must be strings")),
        }
    }
    Ok(entries)
}

/// Items of a sequence, with the path of each item.
pub(crate) fn items<'a>(v: &'a Yaml, path: &str) -> Result<Vec<(&'a Yaml, String)>> {
    match v {
        Yaml::Array(seq) => Ok(seq
            .iter()
            .enumerate()
            .map(|(i, item)| (item, index(path, i)))
            .collect()),
        _ => Err(Error::decode(path, "expected a sequence")),
    }
}

/// The only entry of a mapping used as a tagged union, e.g. `{graph: {...}}`.
pub(crate) fn variant<'a>(
    v: &'a Yaml,
    path: &str,
    kinds: &[&str],
) -> Result<(&'a str, &'a Yaml, String)> {
    let mut entries = entries(v, path)?;
    if entries.len() != 1 {
        return Err(Error::decode(
            path,
            format!("expected exactly one of: {}", kinds.join(", ")),
        ));
    }
    let (kind, value, path) = entries.remove(0);
    if !kinds.contains(&kind) {
        return Err(unknown_key(&path));
    }
    Ok((kind, value, path))
}

/// Looks up a key without consuming the mapping.
pub(crate) fn lookup<'a>(v: &'a Yaml, key: &str) -> Option<&'a Yaml> {
    match v {
        Yaml::Hash(map) => map.get(&Yaml::String(key.to_string())),
        _ => None,
    }
}

pub(crate) fn required_string(v: &Yaml, path: &str, key: &str) -> Result<String> {
    match lookup(v, key) {
        Some(value) => as_string(value, &child(path, key)),
        None => Err(Error::decode(child(path, key), "missing required key")),
    }
}

pub(crate) fn optional_string(v: &Yaml, path: &str, key: &str) -> Result<Option<String>> {
    lookup(v, key)
        .map(|value| as_string(value, &child(path, key)))
        .transpose()
}

/// Any scalar, rendered as a string.
pub(crate) fn as_string(v: &Yaml, path: &str) -> Result<String> {
    match v {
        Yaml::String(s) | Yaml::Real(s) => Ok(s.clone()),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Boolean(b) => Ok(b.to_string()),
        _ => Err(Error::decode(path, "expected a string")),
    }
}

/// Applies a flag setter when the value is `true`.
pub(crate) fn flag<T>(builder: T, v: &Yaml, path: &str, set: impl FnOnce(T) -> T) -> Result<T> {
    Ok(if as_bool(v, path)? { set(builder) } else { builder })
}

pub(crate) fn as_bool(v: &Yaml, path: &str) -> Result<bool> {
    match v {
        Yaml::Boolean(b) => Ok(*b),
        _ => Err(Error::decode(path, "expected a boolean")),
    }
}

pub(crate) fn as_u32(v: &Yaml, path: &str) -> Result<u32> {
    match v {
        Yaml::Integer(i) => u32::try_from(*i)
            .map_err(|_| Error::decode(path, "expected a non-negative integer")),
        _ => Err(Error::decode(path, "expected an integer")),
    }
}

pub(crate) fn as_f64(v: &Yaml, path: &str) -> Result<f64> {
    match v {
        Yaml::Integer(i) => Ok(*i as f64),
        Yaml::Real(_) => v
            .as_f64()
            .ok_or_else(|| Error::decode(path, "expected a number")),
        _ => Err(Error::decode(path, "expected a number")),
    }
}

pub(crate) fn as_f32(v: &Yaml, path: &str) -> Result<f32> {
    as_f64(v, path).map(|f| f as f32)
}

pub(crate) fn as_string_list(v: &Yaml, path: &str) -> Result<Vec<String>> {
    items(v, path)?
        .into_iter()
        .map(|(item, path)| as_string(item, &path))
        .collect()
}

/// A mapping of scalars, in document order.
pub(crate) fn as_string_pairs(v: &Yaml, path: &str) -> Result<Vec<(String, String)>> {
    entries(v, path)?
        .into_iter()
        .map(|(key, value, path)| Ok((key.to_string(), as_string(value, &path)?)))
        .collect()
}

pub(crate) fn as_duration(v: &Yaml, path: &str) -> Result<Duration> {
    let value = as_string(v, path)?;
    humantime::parse_duration(&value).map_err(|e| Error::decode(path, e.to_string()))
}

/// Parses a scalar through the `FromStr` of a builder enum.
pub(crate) fn parse<T>(v: &Yaml, path: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    as_string(v, path)?
        .parse()
        .map_err(|e: String| Error::decode(path, e))
}
