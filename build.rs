use std::env;
use std::process::Command;

fn main() {
    let version = env::var("CARGO_PKG_VERSION").unwrap();
    let profile = env::var("PROFILE").unwrap();

    // Dev builds carry the short commit hash so bug reports are traceable
    let full_version = match (profile.as_str(), git_short_hash()) {
        ("debug", Some(hash)) => format!("{}-dev+{}", version, hash),
        _ => version,
    };

    println!("cargo:rustc-env=ONEGO_VERSION={}", full_version);
    println!("cargo:rerun-if-changed=.git/HEAD");
}

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;

    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}
