use std::{path::Path, sync::Arc};

/// Cheaply clonable, immutable string shared between actors.
pub type ArcStr = Arc<str>;

/// Cheaply clonable, immutable path shared between actors.
pub type ArcPath = Arc<Path>;

/// Builds an [`ArcPath`] from anything that can be viewed as a path.
///
/// # Examples
/// ```
/// let path = articles::arc_path("/tmp/articles/logs");
/// assert_eq!(path.to_str(), Some("/tmp/articles/logs"));
/// ```
pub fn arc_path<P: AsRef<Path>>(path: P) -> ArcPath {
    ArcPath::from(path.as_ref())
}
