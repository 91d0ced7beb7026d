//! Resolving schema store with on-demand dependency loading
//!
//! Copyright (c) 2025 SchemaStore Team
//! Licensed under the Apache-2.0 license

use crate::avro::AvroParser;
use crate::loader::{
    cache::SchemaCache,
    error::{StoreError, StoreResult},
    naming::{make_fullname, name_to_path, path_to_name},
    parser::{DocumentFormat, NamedSchema, ParseError, SchemaParser},
    resolver::{ResolutionContext, ResolutionScope, ResolutionStack, DEFAULT_MAX_RESOLUTION_DEPTH},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument, trace};
use walkdir::WalkDir;

/// Default schema file extension
pub const DEFAULT_EXTENSION: &str = "avsc";

/// Configuration for schema store behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the schema tree (required)
    pub root: Option<PathBuf>,
    /// Schema file extension, without the leading dot
    pub extension: String,
    /// Maximum number of nested dependency loads.
    ///
    /// Guards the thread stack against very long acyclic chains; cycles are
    /// detected regardless of this value.
    pub max_resolution_depth: usize,
}

impl StoreConfig {
    /// Default configuration rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Default::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: None,
            extension: DEFAULT_EXTENSION.to_string(),
            max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
        }
    }
}

/// Counters describing the work a store has done
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Schema files read from disk
    pub file_reads: u64,
    /// Lookups served from the cache
    pub cache_hits: u64,
    /// Parse retries after loading a missing dependency
    pub dependency_retries: u64,
    /// Schemas parsed and cached
    pub schemas_parsed: u64,
}

/// Directory-backed schema store.
///
/// Each fully-qualified name is read and parsed at most once; the result is
/// shared through `Arc` for the lifetime of the store.
pub struct SchemaStore<P: SchemaParser = AvroParser> {
    root: PathBuf,
    config: StoreConfig,
    format: DocumentFormat,
    parser: P,
    cache: SchemaCache<P::Schema>,
    stack: ResolutionStack,
    stats: StoreStats,
}

impl SchemaStore<AvroParser> {
    /// Create an Avro schema store rooted at `root` with default configuration
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let config = StoreConfig::new(root);
        Self {
            root: config.root.clone().unwrap_or_default(),
            format: DocumentFormat::Json,
            parser: AvroParser::new(),
            cache: SchemaCache::new(),
            stack: ResolutionStack::new(config.max_resolution_depth),
            stats: StoreStats::default(),
            config,
        }
    }

    /// Create an Avro schema store from configuration
    pub fn from_config(config: StoreConfig) -> StoreResult<Self> {
        Self::with_config(config, AvroParser::new())
    }
}

impl<P: SchemaParser> SchemaStore<P> {
    /// Create a store with a custom parser.
    ///
    /// Fails when the configuration has no root or an unsupported extension.
    pub fn with_config(config: StoreConfig, parser: P) -> StoreResult<Self> {
        let root = config.root.clone().ok_or(StoreError::MissingRoot)?;
        let format = DocumentFormat::from_extension(&config.extension)?;

        Ok(Self {
            root,
            format,
            parser,
            cache: SchemaCache::new(),
            stack: ResolutionStack::new(config.max_resolution_depth),
            stats: StoreStats::default(),
            config,
        })
    }

    /// Resolve a schema by name, loading it and its dependencies on demand
    pub fn find(&mut self, name: &str, namespace: Option<&str>) -> StoreResult<Arc<P::Schema>> {
        let fullname = make_fullname(name, namespace)?;
        let path = self.schema_path(&fullname)?;
        self.load_schema(&fullname, &path)
    }

    /// Load every schema file under the root.
    ///
    /// Returns the names covered by the walk in walk order. Schemas already
    /// cached are not read again.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load_all(&mut self) -> StoreResult<Vec<String>> {
        let extension = self.config.extension.clone();
        let mut names = Vec::new();

        for entry in WalkDir::new(&self.root).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.root.as_path()).to_path_buf();
                StoreError::io_error(path, e.into())
            })?;

            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(extension.as_str()) {
                continue;
            }

            let fullname = path_to_name(&self.root, path, &extension)?;
            self.load_schema(&fullname, path)?;
            names.push(fullname);
        }

        debug!(loaded = names.len(), cached = self.cache.len(), "loaded schema tree");
        Ok(names)
    }

    /// Absolute location of the schema file for a fully-qualified name
    pub fn schema_path(&self, fullname: &str) -> StoreResult<PathBuf> {
        Ok(self.root.join(name_to_path(fullname, &self.config.extension)?))
    }

    /// Cached schema, without touching the file system
    pub fn get(&self, fullname: &str) -> Option<Arc<P::Schema>> {
        self.cache.get(fullname).cloned()
    }

    /// Check if a schema is cached
    pub fn is_cached(&self, fullname: &str) -> bool {
        self.cache.contains(fullname)
    }

    /// All cached schemas, in no particular order
    pub fn schemas(&self) -> impl Iterator<Item = (&str, &Arc<P::Schema>)> {
        self.cache.iter()
    }

    /// Cached names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.cache.names()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    #[instrument(level = "debug", skip(self, path), fields(path = %path.display()))]
    fn load_schema(&mut self, fullname: &str, path: &Path) -> StoreResult<Arc<P::Schema>> {
        if let Some(schema) = self.cache.get(fullname) {
            self.stats.cache_hits += 1;
            trace!("cache hit");
            return Ok(Arc::clone(schema));
        }

        self.stack.push(fullname)?;
        let result = self.read_document(fullname, path).and_then(|document| {
            self.resolve_document(fullname, path, &document)
        });
        self.stack.pop();
        result
    }

    /// Parse `document` as `fullname`, loading missing dependencies until the
    /// parse succeeds or fails for another reason.
    fn resolve_document(
        &mut self,
        fullname: &str,
        path: &Path,
        document: &Value,
    ) -> StoreResult<Arc<P::Schema>> {
        let mut resolved: Vec<String> = Vec::new();

        loop {
            let mut scope = ResolutionScope::new(&mut self.cache);

            match self.parser.parse(document, &mut scope) {
                Ok(schema) => {
                    if let Some(actual) = schema.fullname() {
                        if actual != fullname {
                            let actual = actual.to_string();
                            scope.rollback();
                            return Err(StoreError::SchemaMismatch {
                                name: fullname.to_string(),
                                path: path.to_path_buf(),
                                actual,
                            });
                        }
                    }

                    // An unnamed document must not share its name with a named type
                    if schema.fullname().is_none() && scope.lookup(fullname).is_some() {
                        scope.rollback();
                        return Err(StoreError::AmbiguousSchema {
                            name: fullname.to_string(),
                            path: path.to_path_buf(),
                        });
                    }

                    let defined = scope.commit();
                    let cached = match self.cache.get(fullname) {
                        Some(existing) => Arc::clone(existing),
                        None => schema,
                    };
                    self.cache.insert(fullname.to_string(), Arc::clone(&cached));
                    self.stats.schemas_parsed += 1;

                    debug!(defined = defined.len(), retries = resolved.len(), "schema resolved");
                    return Ok(cached);
                }
                Err(ParseError::UnresolvedReference { name: dependency }) => {
                    // Entries of the failed attempt stay cached until the dependency has loaded
                    let journal = scope.detach();

                    if resolved.contains(&dependency) {
                        journal.rollback(&mut self.cache);
                        return Err(StoreError::UnresolvedReference {
                            name: dependency,
                            referenced_by: fullname.to_string(),
                        });
                    }

                    debug!(%dependency, pending = journal.len(), "loading missing dependency");
                    let loaded = self.find(&dependency, None);
                    journal.rollback(&mut self.cache);
                    loaded?;

                    self.stats.dependency_retries += 1;
                    resolved.push(dependency);
                }
                Err(source) => {
                    scope.rollback();
                    return Err(StoreError::Parse {
                        path: path.to_path_buf(),
                        source,
                    });
                }
            }
        }
    }

    fn read_document(&mut self, fullname: &str, path: &Path) -> StoreResult<Value> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if is_missing_file(&e) => {
                return Err(StoreError::not_found(fullname, path.to_path_buf()));
            }
            Err(e) => return Err(StoreError::io_error(path.to_path_buf(), e)),
        };

        self.stats.file_reads += 1;
        debug!(bytes = content.len(), "read schema file");

        self.format.parse_content(&content, path)
    }
}

fn is_missing_file(error: &std::io::Error) -> bool {
    matches!(
        error.kind(),
        ErrorKind::NotFound | ErrorKind::NotADirectory | ErrorKind::InvalidFilename
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use tempfile::tempdir;

    /// Parser that names each document after its "name" key and treats every
    /// string in "refs" as a reference. A "stubborn" document reports its
    /// first reference as unresolved no matter what the context holds.
    #[derive(Default)]
    struct RefParser {
        calls: Cell<usize>,
    }

    #[derive(Debug)]
    struct Named(Option<String>);

    impl NamedSchema for Named {
        fn fullname(&self) -> Option<&str> {
            self.0.as_deref()
        }
    }

    impl SchemaParser for RefParser {
        type Schema = Named;

        fn parse(
            &self,
            document: &Value,
            context: &mut dyn ResolutionContext<Named>,
        ) -> Result<Arc<Named>, ParseError> {
            self.calls.set(self.calls.get() + 1);
            let name = document["name"].as_str().map(str::to_string);

            // leave a partial entry behind before checking references
            if let Some(name) = &name {
                context.insert(name.clone(), Arc::new(Named(None)));
            }

            let stubborn = document["stubborn"].as_bool().unwrap_or(false);
            for reference in document["refs"].as_array().into_iter().flatten() {
                let reference = reference.as_str().unwrap_or_default();
                if stubborn || context.lookup(reference).is_none() {
                    return Err(ParseError::unresolved(reference));
                }
            }

            let schema = Arc::new(Named(name.clone()));
            if let Some(name) = name {
                context.insert(name, Arc::clone(&schema));
            }
            Ok(schema)
        }
    }

    fn write(root: &Path, relative: &str, document: Value) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, document.to_string()).unwrap();
    }

    #[test]
    fn test_store_requires_root() {
        let result = SchemaStore::with_config(StoreConfig::default(), RefParser::default());
        assert!(matches!(result, Err(StoreError::MissingRoot)));
    }

    #[test]
    fn test_store_rejects_unknown_extension() {
        let config = StoreConfig {
            extension: "txt".to_string(),
            ..StoreConfig::new("schemas")
        };
        assert!(matches!(
            SchemaStore::with_config(config, RefParser::default()),
            Err(StoreError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_partial_entry_discarded_before_retry() -> StoreResult<()> {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.avsc", json!({"name": "a", "refs": ["b.B"]}));
        write(dir.path(), "b/B.avsc", json!({"name": "b.B"}));

        let mut store = SchemaStore::with_config(StoreConfig::new(dir.path()), RefParser::default())?;
        let a = store.find("a", None)?;

        assert_eq!(a.fullname(), Some("a"));
        assert!(Arc::ptr_eq(&store.get("a").unwrap(), &a));
        assert_eq!(store.names(), vec!["a", "b.B"]);
        assert_eq!(store.parser().calls.get(), 3);
        assert_eq!(store.stats().dependency_retries, 1);
        assert_eq!(store.stats().file_reads, 2);
        Ok(())
    }

    #[test]
    fn test_cross_file_cycle_with_forward_tolerant_parser() -> StoreResult<()> {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.avsc", json!({"name": "a", "refs": ["b"]}));
        write(dir.path(), "b.avsc", json!({"name": "b", "refs": ["a"]}));

        let mut store = SchemaStore::with_config(StoreConfig::new(dir.path()), RefParser::default())?;
        let a = store.find("a", None)?;

        assert_eq!(a.fullname(), Some("a"));
        assert_eq!(store.names(), vec!["a", "b"]);
        assert_eq!(store.get("b").unwrap().fullname(), Some("b"));
        assert_eq!(store.stats().file_reads, 2);
        assert_eq!(store.stats().dependency_retries, 1);
        assert_eq!(store.parser().calls.get(), 3);
        Ok(())
    }

    #[test]
    fn test_failed_dependency_still_discards_partial_entry() -> StoreResult<()> {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.avsc", json!({"name": "a", "refs": ["gone"]}));

        let mut store = SchemaStore::with_config(StoreConfig::new(dir.path()), RefParser::default())?;
        let err = store.find("a", None).unwrap_err();

        assert!(matches!(err, StoreError::SchemaNotFound { ref name, .. } if name == "gone"));
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn test_unnamed_schema_is_cached_under_requested_name() -> StoreResult<()> {
        let dir = tempdir().unwrap();
        write(dir.path(), "anon.avsc", json!({"refs": []}));

        let mut store = SchemaStore::with_config(StoreConfig::new(dir.path()), RefParser::default())?;
        let first = store.find("anon", None)?;
        let second = store.find("anon", None)?;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.stats().file_reads, 1);
        assert_eq!(store.stats().cache_hits, 1);
        Ok(())
    }

    #[test]
    fn test_self_reference_reported_as_cycle() -> StoreResult<()> {
        let dir = tempdir().unwrap();
        write(dir.path(), "loop.avsc", json!({"refs": ["loop"]}));

        let mut store = SchemaStore::with_config(StoreConfig::new(dir.path()), RefParser::default())?;
        let err = store.find("loop", None).unwrap_err();

        assert!(matches!(err, StoreError::CircularReference { .. }));
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn test_dependency_that_never_resolves() -> StoreResult<()> {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.avsc", json!({"name": "a", "refs": ["b.B"], "stubborn": true}));
        write(dir.path(), "b/B.avsc", json!({"name": "b.B"}));

        let mut store = SchemaStore::with_config(StoreConfig::new(dir.path()), RefParser::default())?;
        let err = store.find("a", None).unwrap_err();

        assert!(matches!(
            err,
            StoreError::UnresolvedReference { ref name, ref referenced_by } if name == "b.B" && referenced_by == "a"
        ));
        // the dependency itself stays resolved
        assert_eq!(store.names(), vec!["b.B"]);
        Ok(())
    }

    #[test]
    fn test_mismatched_dependency_propagates() -> StoreResult<()> {
        let dir = tempdir().unwrap();
        write(dir.path(), "c.avsc", json!({"name": "c", "refs": ["d"]}));
        write(dir.path(), "d.avsc", json!({"name": "other"}));

        let mut store = SchemaStore::with_config(StoreConfig::new(dir.path()), RefParser::default())?;
        let err = store.find("c", None).unwrap_err();

        assert!(matches!(err, StoreError::SchemaMismatch { ref name, ref actual, .. } if name == "d" && actual == "other"));
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn test_depth_limit() -> StoreResult<()> {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.avsc", json!({"name": "a", "refs": ["b"]}));
        write(dir.path(), "b.avsc", json!({"name": "b", "refs": ["c"]}));
        write(dir.path(), "c.avsc", json!({"name": "c"}));

        let config = StoreConfig {
            max_resolution_depth: 2,
            ..StoreConfig::new(dir.path())
        };
        let mut store = SchemaStore::with_config(config, RefParser::default())?;
        let err = store.find("a", None).unwrap_err();

        assert!(matches!(err, StoreError::ResolutionDepthExceeded { depth: 2, ref name } if name == "c"));
        Ok(())
    }

    #[test]
    fn test_missing_root_on_load_all() {
        let dir = tempdir().unwrap();
        let mut store = SchemaStore::new(dir.path().join("missing"));
        assert!(matches!(store.load_all(), Err(StoreError::Io { .. })));
    }
}
