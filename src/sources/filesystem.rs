use super::{FilesystemSource, Visit, WalkAction};
use anyhow::Result;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Walks the real filesystem without following symlinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkdirSource;

impl FilesystemSource for WalkdirSource {
    fn walk(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(Visit<'_>) -> Result<WalkAction>,
    ) -> Result<()> {
        let mut entries = WalkDir::new(root).follow_links(false).into_iter();

        while let Some(next) = entries.next() {
            match next {
                Ok(entry) => {
                    let is_dir = entry.file_type().is_dir();
                    let action = visit(Visit::Entry {
                        path: entry.path(),
                        is_dir,
                    })?;
                    if is_dir && action == WalkAction::SkipSubtree {
                        entries.skip_current_dir();
                    }
                }
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf);
                    let message = err.to_string();
                    let error = err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other(message));
                    visit(Visit::Unreadable {
                        path: path.as_deref(),
                        error: &error,
                    })?;
                }
            }
        }

        Ok(())
    }
}
