use std::env;
use std::path::{Path, PathBuf};

use nix::unistd::{AccessFlags, access};

/// Looks a command name up the way exec would: names containing a slash
/// are taken as paths, anything else is searched for in each `PATH`
/// directory in order. Only entries executable by this process count.
pub struct PathResolver;

impl PathResolver {
    pub fn resolve(&self, command: &str) -> Option<PathBuf> {
        if command.contains('/') {
            let path = Path::new(command);
            if access(path, AccessFlags::X_OK).is_ok() {
                return Some(path.to_path_buf());
            }
            return None;
        }

        let paths = env::var_os("PATH")?;
        for dir in env::split_paths(&paths) {
            let full_path = dir.join(command);
            if access(&full_path, AccessFlags::X_OK).is_ok() {
                return Some(full_path);
            }
        }

        None
    }
}
