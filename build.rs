use std::process::Command;
use vergen::EmitBuilder;

// Embeds VERGEN_BUILD_TIMESTAMP, plus VERGEN_GIT_SHA when building from a checkout,
// for `deal-pipeline version`.
fn main() {
    let in_checkout = Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .output()
        .is_ok_and(|output| output.status.success());

    let mut builder = EmitBuilder::builder();
    builder.build_timestamp();
    if in_checkout {
        builder.git_sha(true);
    }

    if let Err(e) = builder.emit() {
        println!("cargo:warning=build metadata unavailable: {e}");
    }
}
