use super::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A filesystem path guaranteed to be relative and confined to its root.
///
/// Invariant: never absolute, never climbs above the root with `..`.
/// Enforced at construction. Every plan destination passes through this
/// type before the materializer joins it onto a target root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Fallible constructor.
    ///
    /// `.` components are dropped, so `./cmd/main.go` and `cmd/main.go`
    /// compare equal.
    pub fn try_new(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let display = || path.display().to_string();

        if path.has_root() || path.is_absolute() {
            return Err(DomainError::AbsolutePathNotAllowed { path: display() });
        }

        let mut normalized = PathBuf::new();
        let mut depth = 0usize;
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::Normal(part) => {
                    normalized.push(part);
                    depth += 1;
                }
                Component::ParentDir => {
                    if depth == 0 {
                        return Err(DomainError::PathEscapesRoot { path: display() });
                    }
                    normalized.pop();
                    depth -= 1;
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(DomainError::AbsolutePathNotAllowed { path: display() });
                }
            }
        }

        Ok(Self(normalized))
    }

    /// `true` for the root itself (`""` or `"."`).
    pub fn is_root(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Resolve against a concrete root directory.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_relative_paths() {
        let path = RelativePath::try_new("internal/user/user.model.go").unwrap();
        assert_eq!(path.to_string(), "internal/user/user.model.go");
    }

    #[test]
    fn normalises_current_dir_segments() {
        let a = RelativePath::try_new("./cmd/./main.go").unwrap();
        let b = RelativePath::try_new("cmd/main.go").unwrap();
        assert_eq!(a, b);
        assert!(RelativePath::try_new(".").unwrap().is_root());
    }

    #[test]
    fn rejects_absolute_paths() {
        assert!(matches!(
            RelativePath::try_new("/etc/passwd"),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
    }

    #[test]
    fn rejects_escaping_paths() {
        assert!(matches!(
            RelativePath::try_new("../outside"),
            Err(DomainError::PathEscapesRoot { .. })
        ));
        assert!(matches!(
            RelativePath::try_new("a/../../outside"),
            Err(DomainError::PathEscapesRoot { .. })
        ));
        assert!(RelativePath::try_new("a/../b").is_ok());
    }

    #[test]
    fn joins_onto_root() {
        let path = RelativePath::try_new("cmd/main.go").unwrap();
        assert_eq!(
            path.under(Path::new("/tmp/svc")),
            PathBuf::from("/tmp/svc/cmd/main.go")
        );
    }
}
