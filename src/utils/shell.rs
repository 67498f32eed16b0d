/// Quote a string for display as a single shell word.
///
/// Words made only of characters the shell never interprets are returned
/// unchanged; anything else is wrapped in single quotes.
///
/// # Examples
///
/// ```
/// use onego::utils::shell::escape;
///
/// assert_eq!(escape("10.0.0.1"), "10.0.0.1");
/// assert_eq!(escape("StrictHostKeyChecking=no"), "StrictHostKeyChecking=no");
/// assert_eq!(escape("echo hi"), "'echo hi'");
/// assert_eq!(escape("it's"), "'it'\\''s'");
/// ```
pub fn escape(s: &str) -> String {
    let is_plain = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,@+%".contains(c));

    if is_plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Join command arguments into a copy-pasteable shell command line
///
/// # Examples
///
/// ```
/// use onego::utils::shell::join_args;
///
/// let args = vec!["ssh", "10.0.0.1", "-l", "root", "uptime -p"];
/// assert_eq!(join_args(&args), "ssh 10.0.0.1 -l root 'uptime -p'");
/// ```
pub fn join_args(args: &[impl AsRef<str>]) -> String {
    args.iter()
        .map(|arg| escape(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
