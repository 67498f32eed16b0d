use std::path::{Path, PathBuf};

/// Expand a leading `~` or `~/` to the current user's home directory.
///
/// Paths without a leading tilde are returned unchanged. Returns `None` when
/// the path is not valid UTF-8 or `HOME` is unset.
///
/// # Examples
///
/// ```
/// use onego::utils::path::expand_tilde;
///
/// let path = expand_tilde("~/.one/one_auth").unwrap();
/// assert!(path.ends_with(".one/one_auth"));
///
/// let path = expand_tilde("/etc/one/one_auth").unwrap();
/// assert_eq!(path.to_str(), Some("/etc/one/one_auth"));
/// ```
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    let path = path.as_ref();
    let path_str = path.to_str()?;

    let Some(after_tilde) = path_str.strip_prefix('~') else {
        return Some(path.to_path_buf());
    };

    // ~user forms are left alone; OpenNebula auth paths never use them
    if !(after_tilde.is_empty() || after_tilde.starts_with('/')) {
        return Some(path.to_path_buf());
    }

    let home = home_dir()?;
    Some(home.join(after_tilde.trim_start_matches('/')))
}

pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
