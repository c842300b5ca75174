//! Command implementations.
//!
//! Every command computes all the collections it needs before printing
//! anything, so a fatal error leaves stdout empty.

pub mod ls;
pub mod status;

use crate::reconcile::{Collection, FileSet, Reconciler};
use anyhow::Result;
use std::sync::Arc;

/// Computes `names` in order, failing on the first fatal error.
///
/// # Errors
///
/// Returns the first fatal error from any collection.
pub fn compute_all(
    reconciler: &mut Reconciler,
    names: &[Collection],
) -> Result<Vec<(Collection, Arc<FileSet>)>> {
    names
        .iter()
        .map(|&name| Ok((name, reconciler.collection(name)?)))
        .collect()
}
