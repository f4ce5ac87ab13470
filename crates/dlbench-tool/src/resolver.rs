//! Executable lookup.
//!
//! A [`TargetResolver`] maps a command name to an absolute binary path.
//! Resolvers compose: [`TripleResolver`] asks each stage in turn and keeps
//! the first hit.

use std::path::PathBuf;

pub trait TargetResolver {
    fn resolve(&self, command: &str) -> Option<PathBuf>;
}

impl<R: TargetResolver + ?Sized> TargetResolver for &R {
    fn resolve(&self, command: &str) -> Option<PathBuf> {
        (**self).resolve(command)
    }
}

/// Lookup through the executable search path (`PATH`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchPath;

impl TargetResolver for SearchPath {
    fn resolve(&self, command: &str) -> Option<PathBuf> {
        which::which(command).ok()
    }
}

/// Lookup of `<dir>/<command>` in a fixed directory.
#[derive(Debug, Clone)]
pub struct LocalDir(PathBuf);

impl LocalDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self(dir.into())
    }
}

impl TargetResolver for LocalDir {
    fn resolve(&self, command: &str) -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        let exe_path = self.0.join(format!("{command}.exe"));
        #[cfg(not(target_os = "windows"))]
        let exe_path = self.0.join(command);

        if !exe_path.is_file() {
            return None;
        }
        std::path::absolute(&exe_path).ok()
    }
}

#[derive(Clone)]
pub struct TripleResolver<R1, R2, R3> {
    first: R1,
    second: R2,
    third: R3,
}

impl<R1, R2, R3> TripleResolver<R1, R2, R3>
where
    R1: TargetResolver,
    R2: TargetResolver,
    R3: TargetResolver,
{
    pub fn new(first: R1, second: R2, third: R3) -> Self {
        Self {
            first,
            second,
            third,
        }
    }
}

impl<R1, R2, R3> TargetResolver for TripleResolver<R1, R2, R3>
where
    R1: TargetResolver,
    R2: TargetResolver,
    R3: TargetResolver,
{
    fn resolve(&self, command: &str) -> Option<PathBuf> {
        self.first
            .resolve(command)
            .or_else(|| self.second.resolve(command))
            .or_else(|| self.third.resolve(command))
    }
}
