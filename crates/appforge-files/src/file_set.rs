//! Ordered file sets
//!
//! A [`FileSet`] is used for three independent roles: the scaffold baseline,
//! one incoming model batch, and the merged working set. Instances are never
//! aliased; cloning produces an independent copy.

use crate::path::{CanonicalPath, PathError};
use crate::record::FileRecord;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Group name used by [`OrganizedView`] for root-level files
pub const ROOT_GROUP: &str = ".";

/// Insertion-ordered mapping from [`CanonicalPath`] to [`FileRecord`]
///
/// Keys are unique. Inserting an existing path replaces the record in place
/// (last write wins) and keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    files: IndexMap<CanonicalPath, FileRecord>,
}

impl FileSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records, later duplicates overwrite earlier ones
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = FileRecord>) -> Self {
        let mut set = Self::new();
        for record in records {
            set.insert(record);
        }
        set
    }

    /// Build from raw `path -> content` pairs, as produced by the scaffold generator
    ///
    /// # Errors
    /// Fails on the first path that does not clean.
    pub fn try_from_entries<P, C>(
        entries: impl IntoIterator<Item = (P, C)>,
    ) -> Result<Self, PathError>
    where
        P: AsRef<str>,
        C: Into<String>,
    {
        let mut set = Self::new();
        for (path, content) in entries {
            set.insert(FileRecord::parse(path.as_ref(), content)?);
        }
        Ok(set)
    }

    /// Insert or replace, returning the previous record for that path
    pub fn insert(&mut self, record: FileRecord) -> Option<FileRecord> {
        self.files.insert(record.path().clone(), record)
    }

    /// Remove a path, preserving the order of the remaining records
    pub fn remove(&mut self, path: &str) -> Option<FileRecord> {
        self.files.shift_remove(path)
    }

    /// Look up a record
    #[inline]
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.files.get(path)
    }

    /// Content for a path
    #[inline]
    #[must_use]
    pub fn content(&self, path: &str) -> Option<&str> {
        self.get(path).map(FileRecord::content)
    }

    /// Check membership
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Number of files
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths in insertion order
    #[inline]
    pub fn paths(&self) -> impl Iterator<Item = &CanonicalPath> {
        self.files.keys()
    }

    /// Records in insertion order
    #[inline]
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.values()
    }

    /// Paths present in `self` but missing from `other`, in `self`'s order
    #[must_use]
    pub fn missing_from(&self, other: &FileSet) -> Vec<CanonicalPath> {
        self.paths()
            .filter(|path| !other.contains(path.as_str()))
            .cloned()
            .collect()
    }

    /// Plain `path -> content` mapping for packaging collaborators
    #[must_use]
    pub fn to_content_map(&self) -> BTreeMap<String, String> {
        self.records()
            .map(|r| (r.path().to_string(), r.content().to_string()))
            .collect()
    }

    /// Read-only grouping of paths by top-level directory
    #[must_use]
    pub fn organized_view(&self) -> OrganizedView {
        OrganizedView::from_paths(self.paths())
    }
}

impl FromIterator<FileRecord> for FileSet {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

impl IntoIterator for FileSet {
    type Item = FileRecord;
    type IntoIter = indexmap::map::IntoValues<CanonicalPath, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_values()
    }
}

impl Serialize for FileSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.files.len()))?;
        for record in self.records() {
            map.serialize_entry(record.path().as_str(), record.content())?;
        }
        map.end()
    }
}

/// Paths grouped by top-level directory, for display
///
/// A pure projection of a [`FileSet`]; root-level files are grouped under
/// [`ROOT_GROUP`]. Groups and the paths inside them are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct OrganizedView {
    groups: BTreeMap<String, BTreeSet<CanonicalPath>>,
}

impl OrganizedView {
    fn from_paths<'a>(paths: impl Iterator<Item = &'a CanonicalPath>) -> Self {
        let mut groups: BTreeMap<String, BTreeSet<CanonicalPath>> = BTreeMap::new();
        for path in paths {
            let group = path.top_level_dir().unwrap_or(ROOT_GROUP);
            groups
                .entry(group.to_string())
                .or_default()
                .insert(path.clone());
        }
        Self { groups }
    }

    /// Group names
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Paths in one group
    pub fn group(&self, name: &str) -> impl Iterator<Item = &CanonicalPath> {
        self.groups.get(name).into_iter().flatten()
    }

    /// Iterate groups with their paths
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<CanonicalPath>)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if there are no groups
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(path: &str, content: &str) -> FileRecord {
        FileRecord::parse(path, content).unwrap()
    }

    #[test]
    fn insert_is_last_write_wins_and_keeps_position() {
        let mut set = FileSet::new();
        set.insert(record("a.ts", "1"));
        set.insert(record("b.ts", "2"));
        let previous = set.insert(record("a.ts", "3"));

        assert_eq!(previous.unwrap().content(), "1");
        assert_eq!(set.len(), 2);
        assert_eq!(set.content("a.ts"), Some("3"));
        let order: Vec<_> = set.paths().map(CanonicalPath::as_str).collect();
        assert_eq!(order, vec!["a.ts", "b.ts"]);
    }

    #[test]
    fn try_from_entries_cleans_paths() {
        let set = FileSet::try_from_entries([("/app/index.tsx", "x"), ("package.json", "{}")])
            .unwrap();
        assert!(set.contains("app/index.tsx"));
        assert!(set.contains("package.json"));
    }

    #[test]
    fn try_from_entries_keeps_annotated_looking_names_apart() {
        let set = FileSet::try_from_entries([
            ("docs/notes - draft.md", "a"),
            ("docs/notes - final.md", "b"),
            ("assets/report (1).md", "c"),
            ("assets/report.md", "d"),
        ])
        .unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.content("docs/notes - draft.md"), Some("a"));
        assert_eq!(set.content("docs/notes - final.md"), Some("b"));
        assert_eq!(set.content("assets/report (1).md"), Some("c"));
    }

    #[test]
    fn try_from_entries_rejects_unsafe_paths() {
        let result = FileSet::try_from_entries([("../escape.ts", "x")]);
        assert!(matches!(result, Err(PathError::Unsafe { .. })));
    }

    #[test]
    fn missing_from_reports_in_order() {
        let baseline = FileSet::from_records([record("a", "1"), record("b", "2"), record("c", "3")]);
        let merged = FileSet::from_records([record("b", "2")]);
        let missing: Vec<_> = baseline
            .missing_from(&merged)
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(missing, vec!["a", "c"]);
    }

    #[test]
    fn remove_preserves_order() {
        let mut set = FileSet::from_records([record("a", "1"), record("b", "2"), record("c", "3")]);
        assert!(set.remove("b").is_some());
        let order: Vec<_> = set.paths().map(CanonicalPath::as_str).collect();
        assert_eq!(order, vec!["a", "c"]);
    }

    #[test]
    fn organized_view_groups_by_top_level_dir() {
        let set = FileSet::from_records([
            record("package.json", "{}"),
            record("app/(tabs)/index.tsx", ""),
            record("app/_layout.tsx", ""),
            record("components/Badge.tsx", ""),
        ]);
        let view = set.organized_view();

        let names: Vec<_> = view.group_names().collect();
        assert_eq!(names, vec![".", "app", "components"]);
        let app: Vec<_> = view.group("app").map(CanonicalPath::as_str).collect();
        assert_eq!(app, vec!["app/(tabs)/index.tsx", "app/_layout.tsx"]);
        assert_eq!(view.group(ROOT_GROUP).count(), 1);
        assert_eq!(view.group("missing").count(), 0);
    }

    #[test]
    fn serializes_as_path_content_map() {
        let set = FileSet::from_records([record("b.ts", "2"), record("a.ts", "1")]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"b.ts":"2","a.ts":"1"}"#);
    }

    #[test]
    fn content_map_is_sorted() {
        let set = FileSet::from_records([record("b.ts", "2"), record("a.ts", "1")]);
        let keys: Vec<_> = set.to_content_map().into_keys().collect();
        assert_eq!(keys, vec!["a.ts", "b.ts"]);
    }
}
