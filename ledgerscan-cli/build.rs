use std::env;
use std::path::Path;
use std::process::Command;

// Set by packagers building outside a git checkout.
const BUILD_ID_VAR: &str = "LEDGERSCAN_BUILD_ID";

fn describe(workspace: &Path) -> Option<String> {
    let out = Command::new("git")
        .current_dir(workspace)
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?;
    let rev = rev.trim();
    (!rev.is_empty()).then(|| rev.to_owned())
}

fn main() {
    let manifest = env::var("CARGO_MANIFEST_DIR").unwrap_or_default();
    let workspace = Path::new(&manifest).parent().unwrap_or(Path::new("."));

    println!("cargo:rerun-if-env-changed={BUILD_ID_VAR}");
    let head = workspace.join(".git/HEAD");
    if head.exists() {
        println!("cargo:rerun-if-changed={}", head.display());
    }

    let build_id = env::var(BUILD_ID_VAR)
        .ok()
        .filter(|id| !id.trim().is_empty())
        .or_else(|| describe(workspace))
        .unwrap_or_else(|| "source build".to_owned());

    println!("cargo:rustc-env={BUILD_ID_VAR}={build_id}");
}
