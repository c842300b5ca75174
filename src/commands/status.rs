use crate::output;
use crate::reconcile::{Collection, Reconciler, set_ops};
use anyhow::Result;
use std::io::Write;

/// Collections printed by `status`.
pub const STATUS_COLLECTIONS: [Collection; 2] =
    [Collection::MissingInRepo, Collection::DifferentInRepo];

/// Prints what still needs to be captured in the mirror and what diverged.
///
/// Long form is the same as `ls missing-in-repo different-in-repo`.
///
/// # Errors
///
/// Returns the first fatal error from any collection, or a write error.
pub fn execute<W: Write>(reconciler: &mut Reconciler, short: bool, out: &mut W) -> Result<()> {
    if short {
        let entries = short_entries(reconciler)?;
        output::write_short_status(out, &entries)?;
        return Ok(());
    }

    super::ls::execute(reconciler, &STATUS_COLLECTIONS, out)
}

/// One `(code, name)` per file, sorted by name:
/// `R` differs from the mirror, `B` modified backup, `?` unpackaged,
/// `D` deleted package file.
///
/// # Errors
///
/// Returns the first fatal error from any collection.
pub fn short_entries(reconciler: &mut Reconciler) -> Result<Vec<(char, String)>> {
    let missing = reconciler.missing_in_repo()?;
    let different = reconciler.modified_repo_files()?;
    let modified = reconciler.modified_backup_files()?;
    let deleted = reconciler.missing_from_disk()?;

    let modified = set_ops::name_index(&modified);
    let mut entries: Vec<(char, String)> = missing
        .iter()
        .map(|r| {
            let code = if modified.contains(r.name.as_str()) { 'B' } else { '?' };
            (code, r.name.clone())
        })
        .chain(different.iter().map(|r| ('R', r.name.clone())))
        .chain(deleted.iter().map(|r| ('D', r.name.clone())))
        .collect();

    entries.sort_by(|(_, a), (_, b)| a.cmp(b));
    Ok(entries)
}
