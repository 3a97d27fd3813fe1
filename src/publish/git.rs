//! Best-effort git publish: stage, commit, push.
//!
//! "Nothing to commit" is the normal outcome on unchanged data and is
//! reported as such rather than as a failure, so the caller can log it
//! at the right level and tell a broken push apart from a quiet run.

use super::{PublishError, Result};
use std::path::Path;
use std::process::Command;

/// What the publish step achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Artifacts changed; a commit was created and pushed.
    Committed,
    /// Working tree was clean; nothing to do.
    NothingToCommit,
}

/// Stage the given paths, commit with the given message, and push.
///
/// Paths are relative to `repo`. Any git invocation that fails for a
/// reason other than a clean tree is a `PublishError::Git`.
pub fn commit_and_push(repo: &Path, files: &[&Path], message: &str) -> Result<PublishOutcome> {
    let mut add = Command::new("git");
    add.arg("-C").arg(repo).arg("add").args(files);
    run_checked(add, "add")?;

    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["commit", "-m", message])
        .output()?;
    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.contains("nothing to commit") || stdout.contains("nothing added to commit") {
            return Ok(PublishOutcome::NothingToCommit);
        }
        return Err(git_error("commit", &output));
    }

    let mut push = Command::new("git");
    push.arg("-C").arg(repo).arg("push");
    run_checked(push, "push")?;

    Ok(PublishOutcome::Committed)
}

fn run_checked(mut cmd: Command, name: &'static str) -> Result<()> {
    let output = cmd.output()?;
    if !output.status.success() {
        return Err(git_error(name, &output));
    }
    Ok(())
}

fn git_error(command: &'static str, output: &std::process::Output) -> PublishError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let detail = if stderr.trim().is_empty() {
        stdout.trim().to_string()
    } else {
        stderr.trim().to_string()
    };
    PublishError::Git { command, detail }
}
