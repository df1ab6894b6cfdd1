use std::process::Command;

/// `git describe` of the checkout being built, e.g. `v0.1.0-3-gabc1234-dirty`.
fn git_version() -> Option<String> {
    let output = Command::new("git").args(["describe", "--tags", "--always", "--dirty"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let version = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!version.is_empty()).then_some(version)
}

fn main() {
    let version = git_version().unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=EULER_GIT_VERSION={}", version);

    // Commits move HEAD; staging or reverting edits changes the -dirty suffix
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/index");
}
