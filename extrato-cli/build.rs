//! Sets `EXTRATO_VERSION` for `extrato --version`: the package version, plus
//! the short commit when the workspace is a git checkout.

use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    let pkg_version = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let git_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(|dir| PathBuf::from(dir).join("..").join(".git"))
        .ok()
        .filter(|dir| dir.is_dir());

    let version = match git_dir.as_deref().and_then(head_commit) {
        Some(sha) => format!("{pkg_version} ({sha})"),
        None => pkg_version,
    };
    println!("cargo:rustc-env=EXTRATO_VERSION={version}");
}

/// Resolve `.git/HEAD` to a short commit without shelling out. Registers the
/// files read so a new commit rebuilds the version string.
fn head_commit(git_dir: &Path) -> Option<String> {
    let head_path = git_dir.join("HEAD");
    println!("cargo:rerun-if-changed={}", head_path.display());
    let head = fs::read_to_string(&head_path).ok()?;
    let head = head.trim();

    let full = match head.strip_prefix("ref: ") {
        Some(reference) => {
            let ref_path = git_dir.join(reference);
            println!("cargo:rerun-if-changed={}", ref_path.display());
            match fs::read_to_string(&ref_path) {
                Ok(sha) => sha.trim().to_string(),
                Err(_) => packed_ref(git_dir, reference)?,
            }
        }
        // detached HEAD
        None => head.to_string(),
    };

    let short: String = full.chars().take(7).collect();
    (short.len() == 7 && short.chars().all(|c| c.is_ascii_hexdigit())).then_some(short)
}

fn packed_ref(git_dir: &Path, reference: &str) -> Option<String> {
    let packed_path = git_dir.join("packed-refs");
    println!("cargo:rerun-if-changed={}", packed_path.display());
    let packed = fs::read_to_string(packed_path).ok()?;
    packed.lines().find_map(|line| {
        let (sha, name) = line.split_once(' ')?;
        (name == reference).then(|| sha.to_string())
    })
}
