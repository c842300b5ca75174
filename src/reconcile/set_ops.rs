use super::collection::{FileRecord, FileSet};
use std::collections::HashSet;

/// Name index for repeated membership tests against `set`.
#[must_use]
pub fn name_index(set: &[FileRecord]) -> HashSet<&str> {
    set.iter().map(|r| r.name.as_str()).collect()
}

/// Records of `from` whose name is not in `exclude`, in `from` order.
#[must_use]
pub fn difference(from: &[FileRecord], exclude: &HashSet<&str>) -> FileSet {
    from.iter()
        .filter(|r| !exclude.contains(r.name.as_str()))
        .cloned()
        .collect()
}
