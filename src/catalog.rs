/// In-memory aggregation of the whole catalog tree.
///
/// A [`Catalog`] is rebuilt fresh from disk on every call to [`Catalog::load`]
/// and returned to the caller as a plain value; nothing is cached between
/// operations, so the on-disk tree stays the single source of truth.
use crate::paths::{Hierarchy, LEAF_FILENAME};
use crate::scanner;
use std::path::{Path, PathBuf};

/// Column holding the generated per-leaf record identifier.
pub const FIELD_ID: &str = "id";
/// Column holding the item name.
pub const FIELD_NAME: &str = "name";
/// Column holding the calorie value per 100 g, stored as text.
pub const FIELD_CALORIES: &str = "calories_per_100g";

/// One row of a leaf file.
///
/// Fields are kept as ordered (column, value) string pairs preserving the
/// leaf file's header order; numeric columns stay textual until a consumer
/// parses them. The hierarchy annotation lives outside the field list, so
/// rewriting a leaf can never leak hierarchy columns into the file.
#[derive(Debug, Clone)]
pub struct Record {
    fields: Vec<(String, String)>,
    hierarchy: Option<Hierarchy>,
}

impl Record {
    /// Creates a record from ordered (column, value) pairs, with no
    /// hierarchy annotation.
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self {
            fields,
            hierarchy: None,
        }
    }

    pub(crate) fn with_hierarchy(
        fields: Vec<(String, String)>,
        hierarchy: Option<Hierarchy>,
    ) -> Self {
        Self { fields, hierarchy }
    }

    /// Looks up a field value by column name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// The item name, or an empty string when the column is absent.
    pub fn name(&self) -> &str {
        self.get(FIELD_NAME).unwrap_or("")
    }

    /// The calorie value parsed as a number, if present and well formed.
    pub fn calories(&self) -> Option<f64> {
        self.get(FIELD_CALORIES)
            .and_then(|value| value.trim().parse().ok())
    }

    /// The generated record id, if this row carries one.
    pub fn id(&self) -> Option<u64> {
        self.get(FIELD_ID)
            .and_then(|value| value.trim().parse().ok())
    }

    /// Where this record was loaded from, when aggregated from a tree deep
    /// enough to carry the full classification.
    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        self.hierarchy.as_ref()
    }

    /// Iterates the (column, value) pairs in header order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Case-insensitive, whitespace-trimmed comparison against `query`.
    pub fn name_matches(&self, query: &str) -> bool {
        self.name().trim().to_lowercase() == query.trim().to_lowercase()
    }
}

/// The full in-memory collection of records across all leaf files.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<Record>,
    skipped_files: Vec<(PathBuf, String)>,
}

impl Catalog {
    /// Walks `root` and aggregates every leaf file into one collection.
    ///
    /// A missing or empty tree produces an empty catalog, never an error.
    /// A leaf file that cannot be read or parsed is skipped, with its path
    /// and the failure reason recorded in [`Catalog::skipped_files`], and
    /// aggregation continues with the remaining files.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use nutrikeep::catalog::Catalog;
    /// use std::path::Path;
    ///
    /// let catalog = Catalog::load(Path::new("nutrition_catalog"));
    /// println!("{} items on record", catalog.len());
    /// ```
    pub fn load(root: &Path) -> Self {
        let mut catalog = Catalog::default();
        for path in scanner::scan(root, LEAF_FILENAME) {
            if let Err(err) = catalog.load_leaf(root, &path) {
                catalog.skipped_files.push((path, err.to_string()));
            }
        }
        catalog
    }

    fn load_leaf(&mut self, root: &Path, path: &Path) -> Result<(), csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_path(path)?;
        let headers = reader.headers()?.clone();
        let hierarchy = hierarchy_from_path(root, path);

        for row in reader.records() {
            let row = row?;
            let fields = headers
                .iter()
                .zip(row.iter())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            self.records
                .push(Record::with_hierarchy(fields, hierarchy.clone()));
        }
        Ok(())
    }

    /// All aggregated records, in no guaranteed order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Leaf files that failed to parse during aggregation, with the reason.
    pub fn skipped_files(&self) -> &[(PathBuf, String)] {
        &self.skipped_files
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records whose name matches `query` under a trimmed,
    /// case-insensitive comparison. Duplicates are legal, so this may return
    /// more than one record; disambiguation is the caller's job.
    pub fn find_by_name(&self, query: &str) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|record| record.name_matches(query))
            .collect()
    }
}

/// Derives the classification from the three directory names immediately
/// preceding the leaf filename, relative to the catalog root.
///
/// Returns `None` when the leaf sits too shallow under the root to carry a
/// full (category, type, processing) triple.
fn hierarchy_from_path(root: &Path, leaf: &Path) -> Option<Hierarchy> {
    let relative = leaf.strip_prefix(root).ok()?;
    let mut names: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    // category/type/processing plus the filename itself
    if names.len() < 4 {
        return None;
    }
    names.pop();
    let processing = names.pop()?;
    let kind = names.pop()?;
    let category = names.pop()?;
    Some(Hierarchy::from_normalized(category, kind, processing))
}
