//! Path normalization utilities for datasource paths
//!
//! Project files are written on every platform, so paths are handled as
//! strings in forward-slash form instead of going through [`std::path::Path`],
//! whose parsing depends on the host OS. Three root forms are understood:
//! POSIX (`/`), drive (`C:/`) and UNC share (`//host/share/`).
//!
//! A path starting with `.` is relative; anything else is treated as absolute,
//! which is the convention QGIS itself uses for datasource strings.

use std::collections::HashMap;

use log::debug;

/// Convert backslashes to forward slashes
///
/// Makes a path usable both on DOS and Unix. Idempotent.
pub fn to_slash(path: &str) -> String {
    path.replace('\\', "/")
}

/// Resolve a relative path against `anchor_dir`
///
/// Only paths starting with a `.` are resolved; the joined result is
/// lexically normalized (`.` and `..` collapsed). Any other path is returned
/// in slash form, unchanged in structure.
pub fn to_absolute(path: &str, anchor_dir: &str) -> String {
    let path = to_slash(path);
    if !path.starts_with('.') {
        return path;
    }

    let anchor = to_slash(anchor_dir);
    let joined = if anchor.is_empty() {
        path
    } else {
        format!("{}/{}", anchor.trim_end_matches('/'), path)
    };
    normalize(&joined)
}

/// Express `path` relative to `anchor_dir`
///
/// Paths already starting with a `.` are only slash-normalized. When the two
/// locations share no root (another drive, another share, or an unrooted
/// path) the input is returned unchanged. Results always start with `./` or
/// `../` so that [`to_absolute`] recognizes them as relative again.
pub fn to_relative(path: &str, anchor_dir: &str) -> String {
    let slashed = to_slash(path);
    if slashed.starts_with('.') {
        return slashed;
    }

    let target = normalize(&slashed);
    let base = normalize(&to_slash(anchor_dir));
    let (target_root, target_rest) = split_root(&target);
    let (base_root, base_rest) = split_root(&base);

    if target_root.is_empty() || !same_root(target_root, base_root) {
        debug!("Cannot relate {} to {}, keeping it as is", slashed, anchor_dir);
        return slashed;
    }

    let fold_case = is_case_insensitive_root(target_root);
    let target_parts: Vec<&str> = segments(target_rest).collect();
    let base_parts: Vec<&str> = segments(base_rest).collect();

    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(t, b)| {
            if fold_case {
                t.eq_ignore_ascii_case(b)
            } else {
                t == b
            }
        })
        .count();

    let mut parts: Vec<&str> = vec![".."; base_parts.len() - common];
    parts.extend_from_slice(&target_parts[common..]);

    if parts.is_empty() {
        return ".".to_string();
    }

    let relative = parts.join("/");
    if relative.starts_with("..") {
        relative
    } else {
        format!("./{}", relative)
    }
}

/// Swap a path following a reference mapping
///
/// Input is expected absolute; keys and values of `mapping` are slash-normalized
/// absolute paths. Returns the mapped value, or the input when there is none.
pub fn apply_swap(path: &str, mapping: &HashMap<String, String>) -> String {
    let slashed = to_slash(path);
    match mapping.get(&slashed) {
        Some(swapped) => to_slash(swapped),
        None => slashed,
    }
}

/// File extension of the last path segment, leading dot included
///
/// Mirrors the usual `splitext` rule: dots leading the file name do not start
/// an extension, so `.hidden` has none.
pub fn extension_of(path: &str) -> Option<&str> {
    let name_start = path.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let name = &path[name_start..];
    let stem_start = name.len() - name.trim_start_matches('.').len();
    name[stem_start..]
        .rfind('.')
        .map(|dot| &name[stem_start + dot..])
}

/// Lexically normalize a slash-form path
///
/// `..` above a root is dropped; leading `..` of an unrooted path are kept.
pub fn normalize(path: &str) -> String {
    let (root, rest) = split_root(path);
    let mut parts: Vec<&str> = Vec::new();

    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if root.is_empty() {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if root.is_empty() {
        if joined.is_empty() {
            ".".to_string()
        } else {
            joined
        }
    } else if root.starts_with("//") && !root.ends_with('/') && !joined.is_empty() {
        format!("{}/{}", root, joined)
    } else {
        format!("{}{}", root, joined)
    }
}

/// Split a slash-form path into its root prefix and the remainder
fn split_root(path: &str) -> (&str, &str) {
    if let Some(rest) = path.strip_prefix("//") {
        let host_end = rest.find('/').unwrap_or(rest.len());
        let after_host = &rest[host_end..];
        let share_end = after_host
            .get(1..)
            .and_then(|s| s.find('/'))
            .map_or(after_host.len(), |i| i + 2);
        let end = 2 + host_end + share_end;
        return path.split_at(end);
    }

    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        let end = if bytes.get(2) == Some(&b'/') { 3 } else { 2 };
        return path.split_at(end);
    }

    if path.starts_with('/') {
        return path.split_at(1);
    }

    ("", path)
}

fn is_case_insensitive_root(root: &str) -> bool {
    root.starts_with("//") || root.as_bytes().get(1) == Some(&b':')
}

fn same_root(a: &str, b: &str) -> bool {
    if is_case_insensitive_root(a) {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

fn segments(rest: &str) -> impl Iterator<Item = &str> {
    rest.split('/').filter(|s| !s.is_empty())
}
