/// Leaf-file persistence: appending new items and rewriting a single leaf
/// during delete and update operations.
///
/// Every mutation follows the same discipline: resolve the owning leaf file
/// from the record's hierarchy, re-read that file fresh from disk, build the
/// replacement row set fully in memory, then swap the file through a sibling
/// temp file and a rename. A failed write therefore never leaves the
/// original leaf truncated.
use crate::catalog::{FIELD_CALORIES, FIELD_ID, FIELD_NAME, Record};
use crate::paths::Hierarchy;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while persisting or mutating leaf files.
#[derive(Debug)]
pub enum StoreError {
    /// Failed to create the directory chain for a leaf file.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to read or parse a leaf file.
    LeafReadFailed { path: PathBuf, source: csv::Error },
    /// Failed to serialize rows into a leaf file.
    LeafWriteFailed { path: PathBuf, source: csv::Error },
    /// Failed to flush or swap the rewritten leaf into place.
    PersistFailed { path: PathBuf, source: io::Error },
    /// The target record carries no hierarchy fields, so its owning leaf
    /// file cannot be resolved.
    MissingHierarchy { name: String },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::LeafReadFailed { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            Self::LeafWriteFailed { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            Self::PersistFailed { path, source } => {
                write!(f, "Failed to persist {}: {}", path.display(), source)
            }
            Self::MissingHierarchy { name } => {
                write!(
                    f,
                    "Item '{}' has no category/type/processing information; its file cannot be located",
                    name
                )
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Columns written to a freshly created leaf file.
const DEFAULT_HEADER: [&str; 3] = [FIELD_ID, FIELD_NAME, FIELD_CALORIES];

/// Performs all disk mutations for one catalog root.
///
/// The store holds no state beyond the root path; each operation re-derives
/// its working set from the leaf file it touches.
pub struct ItemStore {
    root: PathBuf,
}

impl ItemStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Appends a new item to the leaf file for `hierarchy`, creating the
    /// directory chain and the file itself on first use.
    ///
    /// Each appended row receives a generated `id`, unique within its leaf
    /// file, which later lets delete and update target an exact row even
    /// when names repeat. Appending to a pre-existing file keeps that file's
    /// header order; a fresh file gets `id,name,calories_per_100g`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use nutrikeep::paths::Hierarchy;
    /// use nutrikeep::store::ItemStore;
    ///
    /// let store = ItemStore::new("nutrition_catalog");
    /// let hierarchy = Hierarchy::from_labels("Frutas", "Cítricos", "Fresco");
    /// let record = store.append(&hierarchy, "Naranja", 47.0)?;
    /// println!("stored with id {:?}", record.id());
    /// # Ok::<(), nutrikeep::store::StoreError>(())
    /// ```
    pub fn append(&self, hierarchy: &Hierarchy, name: &str, calories: f64) -> StoreResult<Record> {
        let leaf = hierarchy.leaf_file(&self.root);
        if let Some(dir) = leaf.parent() {
            fs::create_dir_all(dir).map_err(|e| StoreError::DirectoryCreationFailed {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let (header, mut rows) = if leaf.exists() {
            read_leaf(&leaf)?
        } else {
            (
                DEFAULT_HEADER.iter().map(|c| c.to_string()).collect(),
                Vec::new(),
            )
        };

        let next_id = rows
            .iter()
            .filter_map(|row| field(&header, row, FIELD_ID))
            .filter_map(|value| value.trim().parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);

        let mut row = vec![String::new(); header.len()];
        set_field(&header, &mut row, FIELD_ID, &next_id.to_string());
        set_field(&header, &mut row, FIELD_NAME, name);
        set_field(&header, &mut row, FIELD_CALORIES, &calories.to_string());

        let fields = header.iter().cloned().zip(row.iter().cloned()).collect();
        rows.push(row);
        write_leaf(&leaf, &header, &rows)?;

        Ok(Record::with_hierarchy(fields, Some(hierarchy.clone())))
    }

    /// Removes the leaf row backing `target`.
    ///
    /// The target must carry hierarchy information from aggregation; its
    /// leaf file is re-read fresh from disk so the decision is made against
    /// the authoritative rows, not the in-memory catalog. Returns the number
    /// of rows removed; 0 means the row disappeared between aggregation and
    /// this call, and the file is left untouched.
    pub fn delete(&self, target: &Record) -> StoreResult<usize> {
        let leaf = self.leaf_for(target)?;
        let (header, rows) = read_leaf(&leaf)?;

        let before = rows.len();
        let kept: Vec<Vec<String>> = rows
            .into_iter()
            .filter(|row| !row_matches(&header, row, target))
            .collect();
        let removed = before - kept.len();

        if removed > 0 {
            write_leaf(&leaf, &header, &kept)?;
        }
        Ok(removed)
    }

    /// Replaces the name and calorie value of the leaf row backing `target`,
    /// keeping the row in its leaf file and its id intact.
    ///
    /// Returns the number of rows rewritten, 0 when the row is gone.
    pub fn update(
        &self,
        target: &Record,
        new_name: &str,
        new_calories: f64,
    ) -> StoreResult<usize> {
        let leaf = self.leaf_for(target)?;
        let (header, mut rows) = read_leaf(&leaf)?;

        let mut updated = 0;
        for row in &mut rows {
            if row_matches(&header, row, target) {
                set_field(&header, row, FIELD_NAME, new_name);
                set_field(&header, row, FIELD_CALORIES, &new_calories.to_string());
                updated += 1;
            }
        }

        if updated > 0 {
            write_leaf(&leaf, &header, &rows)?;
        }
        Ok(updated)
    }

    fn leaf_for(&self, target: &Record) -> StoreResult<PathBuf> {
        let hierarchy = target
            .hierarchy()
            .ok_or_else(|| StoreError::MissingHierarchy {
                name: target.name().to_string(),
            })?;
        Ok(hierarchy.leaf_file(&self.root))
    }
}

/// Decides whether a freshly read leaf row is the one backing `target`.
///
/// The stable id wins when both sides carry one. Rows from legacy files
/// without an id fall back to a normalized-name plus parsed-calorie
/// comparison; a row whose calorie value fails to parse is a non-match.
fn row_matches(header: &[String], row: &[String], target: &Record) -> bool {
    if let Some(target_id) = target.id()
        && let Some(row_id) =
            field(header, row, FIELD_ID).and_then(|value| value.trim().parse::<u64>().ok())
    {
        return row_id == target_id;
    }

    let name_matches = field(header, row, FIELD_NAME)
        .is_some_and(|value| value.trim().to_lowercase() == target.name().trim().to_lowercase());
    if !name_matches {
        return false;
    }

    match (
        target.calories(),
        field(header, row, FIELD_CALORIES).and_then(|value| value.trim().parse::<f64>().ok()),
    ) {
        (Some(target_calories), Some(row_calories)) => target_calories == row_calories,
        _ => false,
    }
}

fn field<'a>(header: &[String], row: &'a [String], column: &str) -> Option<&'a str> {
    header
        .iter()
        .position(|name| name == column)
        .and_then(|index| row.get(index))
        .map(String::as_str)
}

fn set_field(header: &[String], row: &mut [String], column: &str, value: &str) {
    if let Some(index) = header.iter().position(|name| name == column)
        && let Some(slot) = row.get_mut(index)
    {
        *slot = value.to_string();
    }
}

/// Reads a leaf file into its header and rows.
///
/// Short rows are padded to the header width so later column lookups stay
/// in bounds.
pub(crate) fn read_leaf(path: &Path) -> StoreResult<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)
        .map_err(|e| StoreError::LeafReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| StoreError::LeafReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| StoreError::LeafReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(header.len(), String::new());
        rows.push(row);
    }
    Ok((header, rows))
}

/// Overwrites `path` with `header` followed by `rows`, in order.
///
/// The content is written to a sibling temp file and renamed over the
/// original, so the previous content survives any failure before the swap.
pub fn write_leaf(path: &Path, header: &[String], rows: &[Vec<String>]) -> StoreResult<()> {
    let tmp = path.with_extension("csv.tmp");
    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&tmp)
            .map_err(|e| StoreError::LeafWriteFailed {
                path: tmp.clone(),
                source: e,
            })?;
        writer
            .write_record(header)
            .map_err(|e| StoreError::LeafWriteFailed {
                path: tmp.clone(),
                source: e,
            })?;
        for row in rows {
            writer
                .write_record(row)
                .map_err(|e| StoreError::LeafWriteFailed {
                    path: tmp.clone(),
                    source: e,
                })?;
        }
        writer.flush().map_err(|e| StoreError::PersistFailed {
            path: tmp.clone(),
            source: e,
        })?;
    }
    fs::rename(&tmp, path).map_err(|e| StoreError::PersistFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
