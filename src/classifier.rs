/// Extension-based file classification.
///
/// This module maps filenames to category labels through an ordered rule
/// table. Lookup is by the filename's lower-cased extension (leading dot
/// included); the first category whose extension set contains it wins, and
/// anything unmatched falls back to [`FALLBACK_CATEGORY`].
///
/// # Examples
///
/// ```
/// use sortbox::classifier::CategoryTable;
///
/// let table = CategoryTable::default();
/// assert_eq!(table.categorize("report.PDF"), "Documents");
/// assert_eq!(table.categorize("song.mp3"), "Music");
/// assert_eq!(table.categorize("mystery.xyz"), "Other");
/// ```
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Category assigned when no rule matches a filename's extension.
pub const FALLBACK_CATEGORY: &str = "Other";

/// One category and the extensions routed to it.
///
/// Extensions are stored case-normalized with a leading dot; [`CategoryRule::new`]
/// and [`CategoryTable::merge_rules`] take care of the normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category label, also used as the subfolder name.
    pub name: String,
    /// Extensions belonging to this category, e.g. `[".jpg", ".png"]`.
    pub extensions: Vec<String>,
}

impl CategoryRule {
    /// Creates a rule, normalizing every extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortbox::classifier::CategoryRule;
    ///
    /// let rule = CategoryRule::new("Images", ["HEIC", ".raw"]);
    /// assert_eq!(rule.extensions, vec![".heic", ".raw"]);
    /// ```
    pub fn new<N, I, E>(name: N, extensions: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = E>,
        E: AsRef<str>,
    {
        Self {
            name: name.into(),
            extensions: extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
        }
    }
}

/// Lower-cases an extension and guarantees the leading dot.
fn normalize_extension(ext: &str) -> String {
    let lowered = ext.to_lowercase();
    if lowered.starts_with('.') {
        lowered
    } else {
        format!(".{lowered}")
    }
}

/// Extracts the lookup key for a filename: its lower-cased extension with
/// the leading dot, or the empty string when there is none.
fn extension_of(filename: &str) -> String {
    match Path::new(filename).extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy().to_lowercase()),
        None => String::new(),
    }
}

/// An ordered extension-to-category rule table.
///
/// The table is a plain ordered list rather than a map: iteration order is
/// the order rules were defined or merged, which makes the first-match
/// tie-break deterministic when two categories claim the same extension.
/// The table is never mutated during a scan; [`CategoryTable::merge_rules`]
/// is the only mutation point.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

impl CategoryTable {
    /// Creates an empty table. Every lookup resolves to [`FALLBACK_CATEGORY`].
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Creates the standard table.
    ///
    /// The categories and their order are fixed for compatibility:
    /// Images, Videos, Documents, Music, Archives, Codes.
    pub fn with_defaults() -> Self {
        Self {
            rules: vec![
                CategoryRule::new(
                    "Images",
                    [".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff"],
                ),
                CategoryRule::new("Videos", [".mp4", ".avi", ".mov", ".mkv", ".wmv"]),
                CategoryRule::new("Documents", [".pdf", ".docx", ".txt", ".xlsx", ".pptx"]),
                CategoryRule::new("Music", [".mp3", ".wav", ".flac", ".aac"]),
                CategoryRule::new("Archives", [".zip", ".rar", ".7z", ".tar", ".gz"]),
                CategoryRule::new(
                    "Codes",
                    [
                        ".py", ".java", ".c", ".cpp", ".html", ".css", ".js", ".php", ".sql",
                        ".json", ".ts", ".sh", ".bat",
                    ],
                ),
            ],
        }
    }

    /// Returns the category label for a filename.
    ///
    /// Pure with respect to the filename and the current rules: the lookup
    /// key is the lower-cased extension (empty for extension-less names),
    /// and rules are consulted in table order.
    pub fn categorize(&self, filename: &str) -> &str {
        let key = extension_of(filename);
        for rule in &self.rules {
            if rule.extensions.iter().any(|ext| *ext == key) {
                return &rule.name;
            }
        }
        FALLBACK_CATEGORY
    }

    /// Merges custom rules into the table.
    ///
    /// A custom rule for an existing category replaces that category's
    /// extension set wholesale; a rule for an unseen category is appended,
    /// so it ranks after every existing category in the tie-break order.
    /// There is no removal operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortbox::classifier::{CategoryRule, CategoryTable};
    ///
    /// let mut table = CategoryTable::default();
    /// table.merge_rules([CategoryRule::new("Images", [".heic", ".jpg"])]);
    /// assert_eq!(table.categorize("photo.heic"), "Images");
    /// ```
    pub fn merge_rules<I>(&mut self, custom: I)
    where
        I: IntoIterator<Item = CategoryRule>,
    {
        for rule in custom {
            let normalized = CategoryRule::new(rule.name, rule.extensions);
            match self.rules.iter_mut().find(|r| r.name == normalized.name) {
                Some(existing) => existing.extensions = normalized.extensions,
                None => self.rules.push(normalized),
            }
        }
    }

    /// The rules in their current tie-break order.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Iterates category labels in table order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name.as_str())
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}
