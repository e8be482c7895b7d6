use std::process::Command;

/// Embeds the short commit hash so `checkit --version` identifies the build.
fn main() {
    println!("cargo::rerun-if-changed=../../.git/HEAD");
    println!("cargo::rerun-if-changed=../../.git/refs/heads/");
    println!("cargo::rerun-if-env-changed=CHECKIT_BUILD_COMMIT");

    let from_env = std::env::var("CHECKIT_BUILD_COMMIT")
        .ok()
        .filter(|hash| !hash.is_empty());

    let commit = from_env
        .or_else(git_head)
        .map(|hash| hash.chars().take(12).collect::<String>())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo::rustc-env=CHECKIT_BUILD_COMMIT={}", commit);
}

fn git_head() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|hash| hash.trim().to_string())
}
