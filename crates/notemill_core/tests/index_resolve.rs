use chrono::{DateTime, Local, TimeZone};
use notemill_core::{IndexError, RepositoryIndex, VaultConfig};
use tempfile::TempDir;

fn setup() -> (TempDir, RepositoryIndex) {
    let dir = TempDir::new().unwrap();
    let index = RepositoryIndex::new(dir.path(), VaultConfig::default());
    index.initialize().unwrap();
    (dir, index)
}

fn sept(day: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2025, 9, day, 10, 30, 0)
        .single()
        .unwrap()
}

#[test]
fn initialize_creates_layout_and_indexes_core_files() {
    let (_dir, index) = setup();
    let store = index.store();

    assert!(store.stat("resources").unwrap().is_dir());
    assert!(store.stat("daily").unwrap().is_dir());
    assert!(store.stat("journal").unwrap().is_dir());
    assert_eq!(store.read("inbox.md").unwrap(), "---\ntitle: inbox\n---\n\n");
    assert!(store.exists("active.md").unwrap());

    let info = index.resolve("inbox").unwrap();
    assert_eq!(info.path, "inbox.md");
    assert!(!info.is_directory);
    assert_eq!(index.document_count(), 2);
    assert!(index.last_reload().is_some());
}

#[test]
fn initialize_preserves_existing_content() {
    let (_dir, index) = setup();
    index.store().write("inbox.md", "custom\n").unwrap();

    index.initialize().unwrap();
    assert_eq!(index.store().read("inbox.md").unwrap(), "custom\n");
}

#[test]
fn resolve_indexes_nested_resources_after_reload() {
    let (_dir, index) = setup();
    let store = index.store();
    store.mkdir_all("resources/projects").unwrap();
    store
        .write("resources/projects/Space Elevator.md", "# notes\n")
        .unwrap();
    index.reload_all().unwrap();

    let info = index.resolve("resources/projects/space-elevator").unwrap();
    assert_eq!(info.path, "resources/projects/Space Elevator.md");
    assert_eq!(info.title, "Space Elevator");
    assert_eq!(info.depth, 2);
    assert!(info.is_resource);
    assert!(!info.is_temporal);
}

#[test]
fn resolve_matches_directories_by_canonical_segments() {
    let (_dir, index) = setup();
    let store = index.store();
    store.mkdir_all("resources/My Projects").unwrap();
    store.write("resources/My Projects/roadmap.md", "x").unwrap();
    index.reload_all().unwrap();

    let info = index.resolve("resources/my-projects").unwrap();
    assert!(info.is_directory);
    assert_eq!(info.path, "resources/My Projects");
    assert_eq!(info.directory_path, "resources");
    assert!(info.is_resource);
}

#[test]
fn unknown_id_is_not_found() {
    let (_dir, index) = setup();
    let err = index.resolve("ghost").unwrap_err();
    assert!(matches!(err, IndexError::NotFound { id } if id == "ghost"));
}

#[test]
fn reload_subtree_splices_without_touching_siblings() {
    let (_dir, index) = setup();
    let store = index.store();
    store.write("resources/spliced.md", "x").unwrap();
    store.mkdir_all("journal/2025").unwrap();
    store.write("journal/2025/09-september.md", "x").unwrap();

    index.reload_subtree("resources").unwrap();
    assert!(index.resolve("resources/spliced").is_ok());
    // The journal file was written after the last full reload and a
    // resources-only splice must not pick it up.
    assert!(index.resolve("journal/2025/09-september").is_err());

    index.reload_all().unwrap();
    assert!(index.resolve("journal/2025/09-september").is_ok());
}

#[test]
fn reload_subtree_falls_back_to_full_reload() {
    let (_dir, index) = setup();
    let store = index.store();
    store.mkdir_all("journal/2025").unwrap();
    store.write("journal/2025/09-september.md", "x").unwrap();

    index.reload_subtree("no-such-dir").unwrap();
    assert!(index.resolve("journal/2025/09-september").is_ok());
}

#[test]
fn resolve_page_name_matches_bare_names() {
    let (_dir, index) = setup();
    let store = index.store();
    store.mkdir_all("resources/alpha").unwrap();
    store.mkdir_all("resources/zz/sub").unwrap();
    store.write("resources/alpha/Guide.md", "x").unwrap();
    store.write("resources/zz/sub/Guide.md", "x").unwrap();
    index.reload_all().unwrap();

    let direct = index.resolve_page_name("Inbox").unwrap();
    assert_eq!(direct.id, "inbox");

    let shallow = index.resolve_page_name("Guide").unwrap();
    assert_eq!(shallow.id, "resources/alpha/guide");

    let with_extension = index.resolve_page_name("Guide.md").unwrap();
    assert_eq!(with_extension.id, shallow.id);

    assert!(index.resolve_page_name("Nowhere").is_none());
}

#[test]
fn resolve_temporal_reports_location_and_existence() {
    let (_dir, index) = setup();

    let (info, existed) = index.resolve_temporal("daily", sept(15)).unwrap();
    assert_eq!(info.path, "daily/2025/09-september.md");
    assert_eq!(info.id, "daily/2025/09-september");
    assert!(info.is_temporal);
    assert!(!existed);

    index
        .get_or_create_temporal_document("daily", sept(15))
        .unwrap();
    let (_, existed) = index.resolve_temporal("daily", sept(15)).unwrap();
    assert!(existed);

    let err = index.resolve_temporal("resources", sept(15)).unwrap_err();
    assert!(matches!(err, IndexError::NotFound { id } if id == "resources"));
}

#[test]
fn get_or_create_document_creates_file_and_indexes_it() {
    let (_dir, index) = setup();
    let before = index.document_count();

    let doc = index
        .get_or_create_document("resources/ideas/Travel Plans")
        .unwrap();
    assert_eq!(doc.info().path, "resources/ideas/travel-plans.md");
    assert!(index
        .store()
        .exists("resources/ideas/travel-plans.md")
        .unwrap());
    assert_eq!(index.document_count(), before + 1);
    // Visible immediately, no reload in between.
    assert!(index.resolve("resources/ideas/travel-plans").is_ok());
}

#[test]
fn get_or_create_document_does_not_clobber_unindexed_files() {
    let (_dir, index) = setup();
    index
        .store()
        .write("resources/draft.md", "precious\n")
        .unwrap();

    // The id is missing from the cache, but the file is on disk.
    let mut doc = index.get_or_create_document("resources/draft").unwrap();
    assert_eq!(doc.content().unwrap(), "precious\n");
    assert_eq!(
        index.store().read("resources/draft.md").unwrap(),
        "precious\n"
    );
}

#[test]
fn created_files_land_in_the_cached_tree() {
    let (_dir, index) = setup();

    index
        .get_or_create_document("resources/ideas/travel-plans")
        .unwrap();
    index.get_or_create_document("scratch").unwrap();
    index.reload_all().unwrap();

    let tree = index.tree();
    let ideas = &tree.children["resources"].children["ideas"];
    assert_eq!(ideas.files.len(), 1);
    assert_eq!(ideas.files[0].path, "resources/ideas/travel-plans.md");
    assert!(tree
        .files
        .iter()
        .any(|info| info.path == "scratch.md"));
}

#[test]
fn document_debug_shows_identity_not_cache_internals() {
    let (_dir, index) = setup();
    let doc = index.get_or_create_document("inbox").unwrap();

    let rendered = format!("{doc:?}");
    assert!(rendered.contains("inbox.md"));
    assert!(rendered.contains("loaded: false"));
}

#[test]
fn get_or_create_document_rejects_directories() {
    let (_dir, index) = setup();
    let err = index.get_or_create_document("resources").unwrap_err();
    assert!(matches!(err, IndexError::NotFound { id } if id == "resources"));
}

#[test]
fn temporal_documents_carry_month_front_matter() {
    let (_dir, index) = setup();

    let mut doc = index
        .get_or_create_temporal_document("journal", sept(15))
        .unwrap();
    assert!(doc.info().is_temporal);
    assert!(!doc.info().is_resource);
    assert_eq!(doc.info().path, "journal/2025/09-september.md");
    assert_eq!(
        doc.content().unwrap(),
        "---\ntitle: September 2025\n---\n\n"
    );
    assert!(index.resolve("journal/2025/09-september").is_ok());
}

#[test]
fn tree_snapshot_exposes_special_directories() {
    let (_dir, index) = setup();
    let tree = index.tree();

    assert!(tree.children.contains_key("resources"));
    assert!(tree.children.contains_key("daily"));
    assert!(tree.children.contains_key("journal"));
    assert_eq!(tree.total_files(), 2);
}
