use anyhow::Result;
use vergen::EmitBuilder;

// Embeds the git SHA and commit date shown by `--version`.
fn main() -> Result<()> {
    EmitBuilder::builder()
        .git_sha(true)
        .git_commit_date()
        .emit()?;
    Ok(())
}
