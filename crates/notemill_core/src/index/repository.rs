//! Cached repository index over the sandboxed store.
//!
//! # Responsibility
//! - Scan the vault into a directory tree plus a flat id lookup and keep
//!   both cached behind one reader-writer lock.
//! - Resolve ids, page names, and temporal timestamps to document
//!   metadata; create missing documents with minimal front matter.
//!
//! # Invariants
//! - `reload_all` and `reload_subtree` replace cached structures wholesale
//!   under the write lock; the only in-place tree mutation is splicing in a
//!   freshly created file.
//! - A subtree that cannot be located degrades to a full reload with a
//!   warning, never a hard error.
//! - Scanning skips hidden entries, editor temp files, and non-markdown
//!   extensions.

use crate::doc::document::Document;
use crate::index::canonical::{canonical_id, doc_id_for_path, strip_markdown_extension,
    title_from_stem};
use crate::index::{IndexError, IndexResult};
use crate::model::config::VaultConfig;
use crate::model::document::{DirectoryNode, DocumentInfo};
use crate::store::sandbox::SandboxedStore;
use chrono::{DateTime, Local};
use log::{info, warn};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

struct IndexCache {
    tree: DirectoryNode,
    index: HashMap<String, DocumentInfo>,
    last_reload: Option<DateTime<Local>>,
}

/// Root-wide document index with an instance-scoped cache.
///
/// The index is the only component shared across concurrent callers:
/// lookups take the read lock, reloads take the write lock. Documents
/// borrow the index and must not outlive it.
pub struct RepositoryIndex {
    store: SandboxedStore,
    config: VaultConfig,
    cache: RwLock<IndexCache>,
}

impl RepositoryIndex {
    /// Creates an index over `root` with the supplied layout. The cache
    /// starts empty; call [`RepositoryIndex::initialize`] before serving
    /// lookups.
    pub fn new(root: impl Into<PathBuf>, config: VaultConfig) -> Self {
        Self {
            store: SandboxedStore::new(root),
            config,
            cache: RwLock::new(IndexCache {
                tree: DirectoryNode::new(""),
                index: HashMap::new(),
                last_reload: None,
            }),
        }
    }

    /// Returns the sandboxed store backing this index.
    pub fn store(&self) -> &SandboxedStore {
        &self.store
    }

    /// Returns the vault layout configuration.
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Ensures the root, the special directories, and every core file
    /// exist, then performs the initial full reload. Idempotent.
    pub fn initialize(&self) -> IndexResult<()> {
        self.store.ensure_root()?;
        for dir in [
            &self.config.resources_dir,
            &self.config.daily_dir,
            &self.config.journal_dir,
        ] {
            self.store.mkdir_all(dir)?;
        }
        for file in &self.config.core_files {
            if self.store.exists(file)? {
                continue;
            }
            let info = describe_file(file, &self.config);
            self.store.write(file, &default_front_matter(&info.title))?;
            info!("event=core_file_create module=index status=ok path={file}");
        }
        self.reload_all()
    }

    /// Rescans the whole vault and replaces the cached tree and flat index
    /// under the write lock.
    pub fn reload_all(&self) -> IndexResult<()> {
        let (tree, index) = scan_tree(&self.store, &self.config)?;
        let docs = index.len();
        let mut cache = self.write_cache();
        cache.tree = tree;
        cache.index = index;
        cache.last_reload = Some(Local::now());
        drop(cache);
        info!("event=index_reload module=index status=ok docs={docs}");
        Ok(())
    }

    /// Rescans one top-level subtree and splices it into the cached tree
    /// without disturbing siblings. Falls back to [`Self::reload_all`]
    /// when the subtree cannot be located.
    pub fn reload_subtree(&self, directory_name: &str) -> IndexResult<()> {
        let locatable = !directory_name.is_empty()
            && !directory_name.contains('/')
            && matches!(self.store.exists(directory_name), Ok(true));
        if !locatable {
            warn!(
                "event=subtree_reload module=index status=fallback dir={directory_name} \
                 reason=subtree_not_located"
            );
            return self.reload_all();
        }

        match scan_subtree(&self.store, &self.config, directory_name) {
            Ok((node, infos)) => {
                let docs = infos.len();
                let prefix = format!("{directory_name}/");
                let mut cache = self.write_cache();
                cache.index.retain(|_, info| !info.path.starts_with(&prefix));
                for info in infos {
                    cache.index.insert(info.id.clone(), info);
                }
                cache
                    .tree
                    .children
                    .insert(directory_name.to_string(), node);
                drop(cache);
                info!(
                    "event=subtree_reload module=index status=ok dir={directory_name} docs={docs}"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=subtree_reload module=index status=fallback dir={directory_name} \
                     reason={err}"
                );
                self.reload_all()
            }
        }
    }

    /// Resolves an id to document metadata, consulting the flat index
    /// first and then matching directories for browsing.
    pub fn resolve(&self, id: &str) -> IndexResult<DocumentInfo> {
        let cache = self.read_cache();
        if let Some(info) = cache.index.get(id) {
            return Ok(info.clone());
        }
        if let Some(info) = find_directory_info(&cache.tree, id, &self.config) {
            return Ok(info);
        }
        Err(IndexError::NotFound { id: id.to_string() })
    }

    /// Looks up a free-form page name, as written inside `[[...]]`
    /// references.
    ///
    /// The name is canonicalized (a trailing `.md` is ignored) and matched
    /// against the flat index; a bare name that misses is then matched as a
    /// path suffix, preferring the shallowest id and breaking ties
    /// lexicographically. Absence is `None`, never an error.
    pub fn resolve_page_name(&self, name: &str) -> Option<DocumentInfo> {
        let wanted = doc_id_for_path(name);
        let cache = self.read_cache();
        if let Some(info) = cache.index.get(&wanted) {
            return Some(info.clone());
        }

        let suffix = format!("/{wanted}");
        cache
            .index
            .values()
            .filter(|info| info.id.ends_with(&suffix))
            .min_by(|a, b| {
                a.depth
                    .cmp(&b.depth)
                    .then_with(|| a.id.cmp(&b.id))
            })
            .cloned()
    }

    /// Computes the temporal file location for a timestamp without creating
    /// anything, reporting whether the file already exists.
    ///
    /// # Errors
    /// - `NotFound` when `bucket` is not a configured temporal root.
    pub fn resolve_temporal(
        &self,
        bucket: &str,
        timestamp: DateTime<Local>,
    ) -> IndexResult<(DocumentInfo, bool)> {
        if !self.config.is_temporal_bucket(bucket) {
            return Err(IndexError::NotFound {
                id: bucket.to_string(),
            });
        }
        let path = temporal_path(bucket, timestamp);
        let info = describe_file(&path, &self.config);
        let existed = self.store.exists(&path)?;
        Ok((info, existed))
    }

    /// Resolves `id` to a document, creating the file with minimal front
    /// matter when it does not exist yet. Directory ids are not documents
    /// and resolve to `NotFound`.
    pub fn get_or_create_document(&self, id: &str) -> IndexResult<Document<'_>> {
        match self.resolve(id) {
            Ok(info) if info.is_directory => Err(IndexError::NotFound { id: id.to_string() }),
            Ok(info) => Ok(Document::new(self, info)),
            Err(IndexError::NotFound { .. }) => self.create_document(id),
            Err(err) => Err(err),
        }
    }

    /// Resolves the temporal file for `timestamp`, creating it with
    /// minimal front matter when absent.
    pub fn get_or_create_temporal_document(
        &self,
        bucket: &str,
        timestamp: DateTime<Local>,
    ) -> IndexResult<Document<'_>> {
        let (info, existed) = self.resolve_temporal(bucket, timestamp)?;
        if !existed {
            if !info.directory_path.is_empty() {
                self.store.mkdir_all(&info.directory_path)?;
            }
            self.store
                .write(&info.path, &default_front_matter(&month_title(timestamp)))?;
            info!(
                "event=doc_create module=index status=ok id={} path={} kind=temporal",
                info.id, info.path
            );
        }
        self.insert_created_file(info.clone());
        Ok(Document::new(self, info))
    }

    /// Number of documents currently in the flat index.
    pub fn document_count(&self) -> usize {
        self.read_cache().index.len()
    }

    /// Timestamp of the last full reload, if one has run.
    pub fn last_reload(&self) -> Option<DateTime<Local>> {
        self.read_cache().last_reload
    }

    /// Snapshot of the cached directory tree for browsing.
    pub fn tree(&self) -> DirectoryNode {
        self.read_cache().tree.clone()
    }

    fn create_document(&self, id: &str) -> IndexResult<Document<'_>> {
        let path = format!("{}.md", doc_id_for_path(id));
        let info = describe_file(&path, &self.config);
        if !info.directory_path.is_empty() {
            self.store.mkdir_all(&info.directory_path)?;
        }
        // The id may be missing from a stale cache while the file exists on
        // disk; creating must never clobber existing content.
        if !self.store.exists(&path)? {
            self.store
                .write(&path, &default_front_matter(&info.title))?;
            info!(
                "event=doc_create module=index status=ok id={} path={}",
                info.id, info.path
            );
        }
        self.insert_created_file(info.clone());
        Ok(Document::new(self, info))
    }

    /// Splices one freshly created file into the cached tree and flat
    /// index. This is the single sanctioned in-place tree mutation.
    fn insert_created_file(&self, info: DocumentInfo) {
        {
            let cache = self.read_cache();
            if cache.index.contains_key(&info.id) {
                return;
            }
        }
        let dir = info.directory_path.clone();
        let mut cache = self.write_cache();
        cache.index.insert(info.id.clone(), info.clone());
        insert_under(&mut cache.tree, &dir, info);
    }

    // Poisoning is recovered by adopting the inner value: cached structures
    // are only ever replaced whole, so they stay consistent even when a
    // writer panicked.
    fn read_cache(&self) -> RwLockReadGuard<'_, IndexCache> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, IndexCache> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builds document metadata for one root-relative file path.
pub(crate) fn describe_file(path: &str, config: &VaultConfig) -> DocumentInfo {
    let (directory_path, file_name) = match path.rsplit_once('/') {
        Some((dir, name)) => (dir.to_string(), name),
        None => (String::new(), path),
    };
    let stem = strip_markdown_extension(file_name);
    let first_segment = path.split('/').next().unwrap_or(path);

    DocumentInfo {
        id: doc_id_for_path(path),
        path: path.to_string(),
        title: title_from_stem(stem),
        title_base: stem.to_string(),
        directory_path,
        depth: path.matches('/').count(),
        is_temporal: config.is_temporal_bucket(first_segment),
        is_resource: first_segment == config.resources_dir,
        is_directory: false,
    }
}

/// Returns whether a walked path belongs in the index: no hidden segments,
/// no editor temp files, markdown extension only.
fn is_indexable(path: &str) -> bool {
    for segment in path.split('/') {
        if segment.starts_with('.') || segment.ends_with('~') {
            return false;
        }
    }
    let name = path.rsplit('/').next().unwrap_or(path);
    matches!(name.rsplit_once('.'), Some((_, ext)) if ext.eq_ignore_ascii_case("md"))
}

fn scan_tree(
    store: &SandboxedStore,
    config: &VaultConfig,
) -> IndexResult<(DirectoryNode, HashMap<String, DocumentInfo>)> {
    let mut tree = DirectoryNode::new("");
    let mut index = HashMap::new();

    for path in store.walk("")? {
        if !is_indexable(&path) {
            continue;
        }
        let info = describe_file(&path, config);
        let dir = info.directory_path.clone();
        index.insert(info.id.clone(), info.clone());
        insert_under(&mut tree, &dir, info);
    }

    // The special directories stay addressable for browsing even while
    // they hold no documents.
    for dir in [
        &config.resources_dir,
        &config.daily_dir,
        &config.journal_dir,
    ] {
        tree.ensure_child(dir);
    }

    Ok((tree, index))
}

fn scan_subtree(
    store: &SandboxedStore,
    config: &VaultConfig,
    directory_name: &str,
) -> IndexResult<(DirectoryNode, Vec<DocumentInfo>)> {
    let mut node = DirectoryNode::new(directory_name);
    let mut infos = Vec::new();
    let prefix = format!("{directory_name}/");

    for path in store.walk(directory_name)? {
        if !is_indexable(&path) {
            continue;
        }
        let info = describe_file(&path, config);
        let below = info
            .directory_path
            .strip_prefix(&prefix)
            .unwrap_or("")
            .to_string();
        infos.push(info.clone());
        insert_under(&mut node, &below, info);
    }

    Ok((node, infos))
}

/// Inserts `info` under `relative_dir` (possibly empty), creating
/// intermediate nodes and keeping the file list ordered by path.
fn insert_under(node: &mut DirectoryNode, relative_dir: &str, info: DocumentInfo) {
    let mut target = node;
    if !relative_dir.is_empty() {
        for segment in relative_dir.split('/') {
            target = target.ensure_child(segment);
        }
    }
    match target
        .files
        .binary_search_by(|existing| existing.path.as_str().cmp(info.path.as_str()))
    {
        Ok(found) => target.files[found] = info,
        Err(slot) => target.files.insert(slot, info),
    }
}

/// Matches an id against directory names, canonical segment by segment,
/// and synthesizes browsing metadata for the directory it lands on.
fn find_directory_info(
    root: &DirectoryNode,
    id: &str,
    config: &VaultConfig,
) -> Option<DocumentInfo> {
    if id.is_empty() {
        return None;
    }

    let mut node = root;
    let mut real_segments: Vec<String> = Vec::new();
    for wanted in id.split('/') {
        let (name, child) = node
            .children
            .iter()
            .find(|(name, _)| canonical_id(name) == wanted)?;
        real_segments.push(name.clone());
        node = child;
    }

    let path = real_segments.join("/");
    let name = real_segments.last()?.clone();
    let first = real_segments.first()?.clone();
    let directory_path = match path.rsplit_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => String::new(),
    };

    Some(DocumentInfo {
        id: id.to_string(),
        path: path.clone(),
        title: title_from_stem(&name),
        title_base: name,
        directory_path,
        depth: path.matches('/').count(),
        is_temporal: config.is_temporal_bucket(&first),
        is_resource: first == config.resources_dir,
        is_directory: true,
    })
}

fn temporal_path(bucket: &str, timestamp: DateTime<Local>) -> String {
    format!(
        "{}/{}/{}.md",
        bucket,
        timestamp.format("%Y"),
        month_segment(timestamp)
    )
}

/// Zero-padded month number plus lowercase month name: `09-september`.
fn month_segment(timestamp: DateTime<Local>) -> String {
    timestamp.format("%m-%B").to_string().to_lowercase()
}

fn month_title(timestamp: DateTime<Local>) -> String {
    timestamp.format("%B %Y").to_string()
}

fn default_front_matter(title: &str) -> String {
    format!("---\ntitle: {title}\n---\n\n")
}

#[cfg(test)]
mod tests {
    use super::{describe_file, find_directory_info, insert_under, is_indexable, month_segment,
        temporal_path};
    use crate::model::config::VaultConfig;
    use crate::model::document::DirectoryNode;
    use chrono::{Local, TimeZone};

    fn sept_15() -> chrono::DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 9, 15, 10, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn describe_file_derives_identity_and_flags() {
        let config = VaultConfig::default();

        let core = describe_file("inbox.md", &config);
        assert_eq!(core.id, "inbox");
        assert_eq!(core.title, "inbox");
        assert_eq!(core.title_base, "inbox");
        assert_eq!(core.directory_path, "");
        assert_eq!(core.depth, 0);
        assert!(!core.is_temporal);
        assert!(!core.is_resource);
        assert!(!core.is_directory);

        let resource = describe_file("resources/Project Ideas.md", &config);
        assert_eq!(resource.id, "resources/project-ideas");
        assert_eq!(resource.title, "Project Ideas");
        assert_eq!(resource.title_base, "Project Ideas");
        assert_eq!(resource.directory_path, "resources");
        assert_eq!(resource.depth, 1);
        assert!(resource.is_resource);

        let temporal = describe_file("daily/2025/09-september.md", &config);
        assert_eq!(temporal.id, "daily/2025/09-september");
        assert_eq!(temporal.directory_path, "daily/2025");
        assert_eq!(temporal.depth, 2);
        assert!(temporal.is_temporal);
        assert!(!temporal.is_resource);
    }

    #[test]
    fn is_indexable_filters_hidden_temp_and_extensions() {
        assert!(is_indexable("inbox.md"));
        assert!(is_indexable("resources/deep/note.MD"));
        assert!(!is_indexable(".hidden.md"));
        assert!(!is_indexable(".git/config.md"));
        assert!(!is_indexable("notes/draft.md~"));
        assert!(!is_indexable("notes/draft.tmp"));
        assert!(!is_indexable("image.png"));
        assert!(!is_indexable("plain"));
    }

    #[test]
    fn temporal_path_formats_year_and_month() {
        assert_eq!(temporal_path("daily", sept_15()), "daily/2025/09-september.md");
        assert_eq!(month_segment(sept_15()), "09-september");
    }

    #[test]
    fn insert_under_keeps_files_ordered_and_replaces_duplicates() {
        let config = VaultConfig::default();
        let mut root = DirectoryNode::new("");

        insert_under(
            &mut root,
            "resources",
            describe_file("resources/b.md", &config),
        );
        insert_under(
            &mut root,
            "resources",
            describe_file("resources/a.md", &config),
        );
        insert_under(
            &mut root,
            "resources",
            describe_file("resources/a.md", &config),
        );

        let files = &root.children["resources"].files;
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "resources/a.md");
        assert_eq!(files[1].path, "resources/b.md");
    }

    #[test]
    fn find_directory_info_matches_canonical_segments() {
        let config = VaultConfig::default();
        let mut root = DirectoryNode::new("");
        root.ensure_child("Resources").ensure_child("My Projects");

        let info = find_directory_info(&root, "resources/my-projects", &config)
            .expect("directory should resolve");
        assert!(info.is_directory);
        assert_eq!(info.path, "Resources/My Projects");
        assert_eq!(info.title, "My Projects");
        assert_eq!(info.depth, 1);

        assert!(find_directory_info(&root, "resources/missing", &config).is_none());
        assert!(find_directory_info(&root, "", &config).is_none());
    }
}
