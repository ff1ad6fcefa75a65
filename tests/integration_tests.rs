/// Integration tests for nutrikeep
///
/// These tests simulate real-world usage of the catalog: creating items
/// through the store and the interactive menu, aggregating the whole tree,
/// and mutating individual leaf files.
///
/// Test categories:
/// 1. Create-then-aggregate round trips
/// 2. Empty and missing trees
/// 3. Delete and update isolation (only the owning leaf changes)
/// 4. Duplicate-name disambiguation
/// 5. Writer round trips
/// 6. Full menu sessions
use nutrikeep::catalog::Catalog;
use nutrikeep::cli::Menu;
use nutrikeep::paths::Hierarchy;
use nutrikeep::store::{ItemStore, write_leaf};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A test fixture holding a temporary catalog root.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    fn store(&self) -> ItemStore {
        ItemStore::new(self.root())
    }

    fn catalog(&self) -> Catalog {
        Catalog::load(self.root())
    }

    /// Resolves the leaf file for raw (unnormalized) labels.
    fn leaf_path(&self, category: &str, kind: &str, processing: &str) -> PathBuf {
        Hierarchy::from_labels(category, kind, processing).leaf_file(self.root())
    }

    fn leaf_bytes(&self, category: &str, kind: &str, processing: &str) -> Vec<u8> {
        fs::read(self.leaf_path(category, kind, processing)).expect("Failed to read leaf file")
    }

    /// Drives a whole menu session from a scripted input.
    fn run_menu(&self, script: &str) {
        let mut menu = Menu::new(self.root(), Cursor::new(script.to_string()));
        menu.run().expect("menu session failed");
    }
}

// ============================================================================
// Test Suite 1: Create-then-aggregate round trips
// ============================================================================

#[test]
fn test_create_then_aggregate_yields_normalized_hierarchy() {
    let fixture = TestFixture::new();
    fixture
        .store()
        .append(
            &Hierarchy::from_labels("Frutas", "Cítricos", "Fresco"),
            "Naranja",
            47.0,
        )
        .expect("append failed");

    let catalog = fixture.catalog();
    assert_eq!(catalog.len(), 1);

    let record = &catalog.records()[0];
    assert_eq!(record.name(), "Naranja");
    assert_eq!(record.calories(), Some(47.0));

    let hierarchy = record.hierarchy().expect("hierarchy should be set");
    assert_eq!(hierarchy.category, "frutas");
    assert_eq!(hierarchy.kind, "citricos");
    assert_eq!(hierarchy.processing, "fresco");
}

#[test]
fn test_naranja_example_lifecycle() {
    // root empty -> aggregate -> []; create -> one record; delete -> []
    let fixture = TestFixture::new();
    assert!(fixture.catalog().is_empty());

    fixture
        .store()
        .append(
            &Hierarchy::from_labels("Frutas", "Citricos", "Fresco"),
            "Naranja",
            47.0,
        )
        .expect("append failed");
    let catalog = fixture.catalog();
    assert_eq!(catalog.len(), 1);

    let target = catalog.find_by_name("Naranja")[0];
    let removed = fixture.store().delete(target).expect("delete failed");
    assert_eq!(removed, 1);
    assert!(fixture.catalog().is_empty());
}

#[test]
fn test_aggregate_spans_multiple_leaves() {
    let fixture = TestFixture::new();
    let store = fixture.store();
    store
        .append(
            &Hierarchy::from_labels("Frutas", "Cítricos", "Fresco"),
            "Naranja",
            47.0,
        )
        .expect("append");
    store
        .append(
            &Hierarchy::from_labels("Frutas", "Tropicales", "Fresco"),
            "Mango",
            60.0,
        )
        .expect("append");
    store
        .append(
            &Hierarchy::from_labels("Verduras", "Hoja", "Fresco"),
            "Acelga",
            19.0,
        )
        .expect("append");

    let catalog = fixture.catalog();
    assert_eq!(catalog.len(), 3);
    assert!(catalog.skipped_files().is_empty());
}

#[test]
fn test_aggregate_skips_malformed_leaf_and_keeps_the_rest() {
    let fixture = TestFixture::new();
    fixture
        .store()
        .append(
            &Hierarchy::from_labels("Frutas", "Cítricos", "Fresco"),
            "Naranja",
            47.0,
        )
        .expect("append");

    let broken = fixture.leaf_path("Verduras", "Hoja", "Fresco");
    fs::create_dir_all(broken.parent().expect("parent")).expect("create dirs");
    fs::write(&broken, "id,name,calories_per_100g\n1,\"Acelga,19\n").expect("seed broken leaf");

    let catalog = fixture.catalog();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.skipped_files().len(), 1);
}

// ============================================================================
// Test Suite 2: Empty and missing trees
// ============================================================================

#[test]
fn test_aggregate_empty_root() {
    let fixture = TestFixture::new();
    let catalog = fixture.catalog();
    assert!(catalog.is_empty());
    assert!(catalog.skipped_files().is_empty());
}

#[test]
fn test_aggregate_missing_root() {
    let catalog = Catalog::load(Path::new("/definitely/not/a/catalog"));
    assert!(catalog.is_empty());
}

// ============================================================================
// Test Suite 3: Delete and update isolation
// ============================================================================

#[test]
fn test_delete_touches_only_the_owning_leaf() {
    let fixture = TestFixture::new();
    let store = fixture.store();
    store
        .append(
            &Hierarchy::from_labels("Frutas", "Cítricos", "Fresco"),
            "Naranja",
            47.0,
        )
        .expect("append");
    store
        .append(
            &Hierarchy::from_labels("Frutas", "Tropicales", "Fresco"),
            "Mango",
            60.0,
        )
        .expect("append");
    store
        .append(
            &Hierarchy::from_labels("Verduras", "Hoja", "Fresco"),
            "Acelga",
            19.0,
        )
        .expect("append");

    let mango_before = fixture.leaf_bytes("Frutas", "Tropicales", "Fresco");
    let acelga_before = fixture.leaf_bytes("Verduras", "Hoja", "Fresco");

    let catalog = fixture.catalog();
    let before = catalog.len();
    let target = catalog.find_by_name("Naranja")[0];
    let removed = store.delete(target).expect("delete failed");
    assert_eq!(removed, 1);

    let catalog = fixture.catalog();
    assert_eq!(catalog.len(), before - 1);

    // Unrelated leaf files are byte-for-byte unchanged.
    assert_eq!(
        fixture.leaf_bytes("Frutas", "Tropicales", "Fresco"),
        mango_before
    );
    assert_eq!(
        fixture.leaf_bytes("Verduras", "Hoja", "Fresco"),
        acelga_before
    );
}

#[test]
fn test_update_keeps_record_in_its_leaf_and_header_clean() {
    let fixture = TestFixture::new();
    let store = fixture.store();
    store
        .append(
            &Hierarchy::from_labels("Frutas", "Cítricos", "Fresco"),
            "Naranja",
            47.0,
        )
        .expect("append");

    let catalog = fixture.catalog();
    let target = catalog.find_by_name("Naranja")[0];
    let updated = store
        .update(target, "Naranja Valencia", 49.0)
        .expect("update failed");
    assert_eq!(updated, 1);

    // Still in the same leaf file, header untouched by hierarchy fields.
    let content = String::from_utf8(fixture.leaf_bytes("Frutas", "Cítricos", "Fresco"))
        .expect("utf8 leaf");
    let header = content.lines().next().expect("header line");
    assert_eq!(header, "id,name,calories_per_100g");
    assert!(!content.contains("category"));
    assert!(!content.contains("processing"));

    let catalog = fixture.catalog();
    assert_eq!(catalog.len(), 1);
    let record = &catalog.records()[0];
    assert_eq!(record.name(), "Naranja Valencia");
    assert_eq!(
        record.hierarchy().expect("hierarchy").to_string(),
        "frutas/citricos/fresco"
    );
}

// ============================================================================
// Test Suite 4: Duplicate-name disambiguation
// ============================================================================

#[test]
fn test_duplicates_across_leaves_delete_only_the_selected_one() {
    let fixture = TestFixture::new();
    let store = fixture.store();
    store
        .append(
            &Hierarchy::from_labels("Frutas", "Cítricos", "Fresco"),
            "Naranja",
            47.0,
        )
        .expect("append");
    store
        .append(
            &Hierarchy::from_labels("Frutas", "Cítricos", "Jugo"),
            "Naranja",
            45.0,
        )
        .expect("append");

    let juice_before = fixture.leaf_bytes("Frutas", "Cítricos", "Jugo");

    let catalog = fixture.catalog();
    let candidates = catalog.find_by_name("Naranja");
    assert_eq!(candidates.len(), 2, "both duplicates must surface");

    let fresh = candidates
        .iter()
        .find(|r| r.calories() == Some(47.0))
        .expect("fresh candidate");
    store.delete(fresh).expect("delete failed");

    let catalog = fixture.catalog();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.records()[0].calories(), Some(45.0));
    assert_eq!(
        fixture.leaf_bytes("Frutas", "Cítricos", "Jugo"),
        juice_before,
        "the unselected candidate's leaf is untouched"
    );
}

#[test]
fn test_duplicates_within_one_leaf_are_told_apart_by_id() {
    let fixture = TestFixture::new();
    let store = fixture.store();
    let hierarchy = Hierarchy::from_labels("Frutas", "Cítricos", "Fresco");
    store.append(&hierarchy, "Naranja", 47.0).expect("append");
    store.append(&hierarchy, "Naranja", 47.0).expect("append");

    let catalog = fixture.catalog();
    let candidates = catalog.find_by_name("Naranja");
    assert_eq!(candidates.len(), 2);

    let second = candidates
        .iter()
        .find(|r| r.id() == Some(2))
        .expect("second copy");
    let removed = store.delete(second).expect("delete failed");
    assert_eq!(removed, 1, "identical name and calories, only one row goes");

    let catalog = fixture.catalog();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.records()[0].id(), Some(1));
}

// ============================================================================
// Test Suite 5: Writer round trips
// ============================================================================

#[test]
fn test_writer_round_trip_preserves_names_and_calories() {
    let fixture = TestFixture::new();
    let leaf = fixture.leaf_path("Frutas", "Cítricos", "Fresco");
    fs::create_dir_all(leaf.parent().expect("parent")).expect("create dirs");

    let header = vec![
        "id".to_string(),
        "name".to_string(),
        "calories_per_100g".to_string(),
    ];
    let rows: Vec<Vec<String>> = (1..=10)
        .map(|i| {
            vec![
                i.to_string(),
                format!("Item {}", i),
                format!("{}", i * 10),
            ]
        })
        .collect();
    write_leaf(&leaf, &header, &rows).expect("write failed");

    let catalog = fixture.catalog();
    assert_eq!(catalog.len(), 10);
    for (i, record) in nutrikeep::stats::sorted_by_calories(&catalog).iter().enumerate() {
        assert_eq!(record.name(), format!("Item {}", i + 1));
        assert_eq!(record.calories(), Some((i as f64 + 1.0) * 10.0));
    }
}

// ============================================================================
// Test Suite 6: Full menu sessions
// ============================================================================

#[test]
fn test_menu_session_add_update_delete() {
    let fixture = TestFixture::new();

    // Add two items, rename the second, delete the first, then quit.
    fixture.run_menu(concat!(
        "1\nFrutas\nCítricos\nFresco\nNaranja\n47\n",
        "1\nFrutas\nTropicales\nFresco\nMango\n60\n",
        "3\nMango\nMango Maduro\n65\n",
        "4\nNaranja\ny\n",
        "6\n",
    ));

    let catalog = fixture.catalog();
    assert_eq!(catalog.len(), 1);
    let record = &catalog.records()[0];
    assert_eq!(record.name(), "Mango Maduro");
    assert_eq!(record.calories(), Some(65.0));
    assert_eq!(
        record.hierarchy().expect("hierarchy").to_string(),
        "frutas/tropicales/fresco"
    );
}

#[test]
fn test_menu_session_accented_labels_share_one_leaf() {
    let fixture = TestFixture::new();

    // The same classification typed with and without accents lands in the
    // same leaf file.
    fixture.run_menu(concat!(
        "1\nFrutas\nCítricos\nFresco\nNaranja\n47\n",
        "1\nfrutas\ncitricos\nFRESCO\nLimón\n29\n",
        "6\n",
    ));

    let catalog = fixture.catalog();
    assert_eq!(catalog.len(), 2);

    let leaf = fixture.leaf_path("Frutas", "Cítricos", "Fresco");
    let content = fs::read_to_string(&leaf).expect("leaf should exist");
    assert!(content.contains("Naranja"));
    assert!(content.contains("Limón"));
}

#[test]
fn test_menu_session_on_empty_catalog_is_harmless() {
    let fixture = TestFixture::new();
    // List, stats, delete and update against an empty tree, then quit.
    fixture.run_menu("2\n5\n4\nNaranja\n3\nNaranja\n6\n");
    assert!(fixture.catalog().is_empty());
}
