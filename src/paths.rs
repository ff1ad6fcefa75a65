/// Hierarchy paths and label normalization.
///
/// Every item lives at a fixed relative location derived from its
/// three-level classification: `<root>/<category>/<type>/<processing>/items.csv`.
/// Directory names are always the normalized form of the labels the user
/// entered, so "Cítricos", "citricos" and " CITRICOS " all resolve to the
/// same leaf file.
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the CSV file terminating every hierarchy path.
pub const LEAF_FILENAME: &str = "items.csv";

/// A normalized (category, type, processing) classification triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hierarchy {
    /// Top classification level (e.g. "frutas").
    pub category: String,
    /// Middle level, the food type (e.g. "citricos").
    pub kind: String,
    /// Leaf level, the processing applied (e.g. "fresco").
    pub processing: String,
}

impl Hierarchy {
    /// Builds a hierarchy from raw user-entered labels, normalizing each one.
    ///
    /// # Examples
    ///
    /// ```
    /// use nutrikeep::paths::Hierarchy;
    ///
    /// let h = Hierarchy::from_labels("Frutas", " Cítricos ", "FRESCO");
    /// assert_eq!(h.category, "frutas");
    /// assert_eq!(h.kind, "citricos");
    /// assert_eq!(h.processing, "fresco");
    /// ```
    pub fn from_labels(category: &str, kind: &str, processing: &str) -> Self {
        Self {
            category: normalize_label(category),
            kind: normalize_label(kind),
            processing: normalize_label(processing),
        }
    }

    /// Builds a hierarchy from directory names that are already normalized,
    /// e.g. names read back from the storage tree.
    pub fn from_normalized(category: String, kind: String, processing: String) -> Self {
        Self {
            category,
            kind,
            processing,
        }
    }

    /// Returns true if any of the three segments is empty.
    ///
    /// The resolver itself accepts empty segments; interactive callers use
    /// this to reject them before touching the disk.
    pub fn has_empty_segment(&self) -> bool {
        self.category.is_empty() || self.kind.is_empty() || self.processing.is_empty()
    }

    /// Resolves the leaf file path for this hierarchy under `root`.
    ///
    /// Pure path composition, no I/O and no validation.
    pub fn leaf_file(&self, root: &Path) -> PathBuf {
        root.join(&self.category)
            .join(&self.kind)
            .join(&self.processing)
            .join(LEAF_FILENAME)
    }
}

impl fmt::Display for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.category, self.kind, self.processing)
    }
}

/// Normalizes a user-entered label for use as a directory name.
///
/// Trims surrounding whitespace, lowercases, and folds diacritics to their
/// ASCII base letter.
///
/// # Examples
///
/// ```
/// use nutrikeep::paths::normalize_label;
///
/// assert_eq!(normalize_label("  Cítricos "), "citricos");
/// assert_eq!(normalize_label("Añejo"), "anejo");
/// ```
pub fn normalize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(fold_diacritic)
        .flat_map(char::to_lowercase)
        .collect()
}

/// Maps accented Latin letters to their base letter; everything else passes
/// through unchanged.
fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize_label("  Frutas  "), "frutas");
        assert_eq!(normalize_label("FRESCO"), "fresco");
    }

    #[test]
    fn test_normalize_strips_diacritics() {
        assert_eq!(normalize_label("Cítricos"), "citricos");
        assert_eq!(normalize_label("Lácteos"), "lacteos");
        assert_eq!(normalize_label("Añejo"), "anejo");
        assert_eq!(normalize_label("açaí"), "acai");
    }

    #[test]
    fn test_normalize_empty_and_whitespace() {
        assert_eq!(normalize_label(""), "");
        assert_eq!(normalize_label("   "), "");
    }

    #[test]
    fn test_from_labels_normalizes_all_segments() {
        let h = Hierarchy::from_labels(" Frutas", "CÍTRICOS", "Fresco ");
        assert_eq!(h.category, "frutas");
        assert_eq!(h.kind, "citricos");
        assert_eq!(h.processing, "fresco");
    }

    #[test]
    fn test_leaf_file_layout() {
        let h = Hierarchy::from_labels("Frutas", "Cítricos", "Fresco");
        let path = h.leaf_file(Path::new("data"));
        assert_eq!(
            path,
            Path::new("data")
                .join("frutas")
                .join("citricos")
                .join("fresco")
                .join("items.csv")
        );
    }

    #[test]
    fn test_same_label_variants_share_a_leaf() {
        let a = Hierarchy::from_labels("Frutas", "Cítricos", "Fresco");
        let b = Hierarchy::from_labels("  frutas", "citricos", "FRESCO  ");
        assert_eq!(a, b);
        assert_eq!(a.leaf_file(Path::new("x")), b.leaf_file(Path::new("x")));
    }

    #[test]
    fn test_has_empty_segment() {
        assert!(Hierarchy::from_labels("", "a", "b").has_empty_segment());
        assert!(Hierarchy::from_labels("a", "  ", "b").has_empty_segment());
        assert!(!Hierarchy::from_labels("a", "b", "c").has_empty_segment());
    }

    #[test]
    fn test_display_joins_with_slashes() {
        let h = Hierarchy::from_labels("Frutas", "Cítricos", "Fresco");
        assert_eq!(h.to_string(), "frutas/citricos/fresco");
    }
}
