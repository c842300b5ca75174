use super::compute_all;
use crate::output;
use crate::reconcile::{Collection, Reconciler};
use anyhow::Result;
use std::io::Write;

/// Prints each named collection followed by its entries.
///
/// # Errors
///
/// Returns the first fatal error from any collection, or a write error.
pub fn execute<W: Write>(
    reconciler: &mut Reconciler,
    names: &[Collection],
    out: &mut W,
) -> Result<()> {
    let listings = compute_all(reconciler, names)?;
    for (name, files) in &listings {
        output::write_listing(out, name.name(), files)?;
    }
    Ok(())
}

/// Prints every collection name with a short description.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn describe<W: Write>(out: &mut W) -> Result<()> {
    let width = Collection::ALL
        .iter()
        .map(|c| c.name().len())
        .max()
        .unwrap_or(0);
    for collection in Collection::ALL {
        writeln!(
            out,
            "{:<width$}  {}",
            collection.name(),
            collection.description()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_lists_every_collection() {
        let mut out = Vec::new();
        describe(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), Collection::ALL.len());
        assert!(text.contains("missing-in-repo"));
        assert!(text.contains("deleted"));
    }
}
