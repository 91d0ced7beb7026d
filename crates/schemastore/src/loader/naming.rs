//! Mapping between fully-qualified schema names and file paths
//!
//! A schema named `com.example.Widget` lives at
//! `<root>/com/example/Widget.<ext>`.
//!
//! Copyright (c) 2025 SchemaStore Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{StoreError, StoreResult};
use std::path::{Component, Path, PathBuf};

/// Separator between namespace segments
pub const NAMESPACE_SEPARATOR: char = '.';

/// Build a fully-qualified name from a name and an optional namespace.
///
/// The namespace only applies when `name` has no namespace of its own.
pub fn make_fullname(name: &str, namespace: Option<&str>) -> StoreResult<String> {
    if name.is_empty() {
        return Err(StoreError::invalid_name(name, "name cannot be empty"));
    }

    let fullname = match namespace {
        Some(ns) if !ns.is_empty() && !name.contains(NAMESPACE_SEPARATOR) => {
            format!("{}{}{}", ns, NAMESPACE_SEPARATOR, name)
        }
        _ => name.to_string(),
    };

    validate_fullname(&fullname)?;
    Ok(fullname)
}

/// Relative path of the schema file for a fully-qualified name
pub fn name_to_path(fullname: &str, extension: &str) -> StoreResult<PathBuf> {
    validate_fullname(fullname)?;

    let mut path: PathBuf = fullname.split(NAMESPACE_SEPARATOR).collect();
    path.set_extension(extension);
    Ok(path)
}

/// Fully-qualified name of a schema file found under `root`
pub fn path_to_name(root: &Path, path: &Path, extension: &str) -> StoreResult<String> {
    let display = path.display().to_string();

    let relative = path
        .strip_prefix(root)
        .map_err(|_| StoreError::invalid_name(&display, "path is outside the schema root"))?;

    if relative.extension().and_then(|ext| ext.to_str()) != Some(extension) {
        return Err(StoreError::invalid_name(
            &display,
            format!("expected a .{} file", extension),
        ));
    }

    let mut segments = Vec::new();
    for component in relative.with_extension("").components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment
                    .to_str()
                    .ok_or_else(|| StoreError::invalid_name(&display, "path is not valid UTF-8"))?;
                if segment.contains(NAMESPACE_SEPARATOR) {
                    return Err(StoreError::invalid_name(
                        &display,
                        format!("path segment '{}' contains '{}'", segment, NAMESPACE_SEPARATOR),
                    ));
                }
                segments.push(segment.to_string());
            }
            Component::CurDir => {}
            _ => {
                return Err(StoreError::invalid_name(&display, "unexpected path component"));
            }
        }
    }

    let fullname = segments.join(&NAMESPACE_SEPARATOR.to_string());
    validate_fullname(&fullname)
        .map_err(|_| StoreError::invalid_name(&display, "path does not map to a schema name"))?;
    Ok(fullname)
}

fn validate_fullname(fullname: &str) -> StoreResult<()> {
    if fullname.is_empty() {
        return Err(StoreError::invalid_name(fullname, "name cannot be empty"));
    }

    for segment in fullname.split(NAMESPACE_SEPARATOR) {
        if segment.is_empty() {
            return Err(StoreError::invalid_name(fullname, "empty namespace segment"));
        }
        if segment.contains(['/', '\\']) || segment.contains('\0') {
            return Err(StoreError::invalid_name(
                fullname,
                format!("segment '{}' contains a path separator", segment),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_fullname() {
        assert_eq!(make_fullname("Widget", Some("com.example")).unwrap(), "com.example.Widget");
        assert_eq!(make_fullname("Widget", None).unwrap(), "Widget");
        // an embedded namespace wins over the given one
        assert_eq!(make_fullname("org.other.Widget", Some("com.example")).unwrap(), "org.other.Widget");
        assert_eq!(make_fullname("Widget", Some("")).unwrap(), "Widget");
    }

    #[test]
    fn test_make_fullname_rejects_malformed() {
        assert!(matches!(make_fullname("", None), Err(StoreError::InvalidName { .. })));
        assert!(make_fullname("a..b", None).is_err());
        assert!(make_fullname(".a", None).is_err());
        assert!(make_fullname("a.", None).is_err());
        assert!(make_fullname("../etc", None).is_err());
        assert!(make_fullname("a/b", None).is_err());
    }

    #[test]
    fn test_name_to_path() {
        assert_eq!(
            name_to_path("com.example.Widget", "avsc").unwrap(),
            Path::new("com").join("example").join("Widget.avsc")
        );
        assert_eq!(name_to_path("x", "avsc").unwrap(), PathBuf::from("x.avsc"));
    }

    #[test]
    fn test_path_to_name() {
        let root = Path::new("/schemas");
        assert_eq!(
            path_to_name(root, &root.join("y").join("z").join("Z.avsc"), "avsc").unwrap(),
            "y.z.Z"
        );
        assert_eq!(path_to_name(root, &root.join("x.avsc"), "avsc").unwrap(), "x");
    }

    #[test]
    fn test_path_to_name_rejects_foreign_paths() {
        let root = Path::new("/schemas");
        assert!(path_to_name(root, Path::new("/elsewhere/x.avsc"), "avsc").is_err());
        assert!(path_to_name(root, &root.join("x.json"), "avsc").is_err());
        // a dotted file stem would not map back to the same file
        assert!(path_to_name(root, &root.join("x.y.avsc"), "avsc").is_err());
    }
}
