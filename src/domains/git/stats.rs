use std::path::Path;

use serde::Serialize;

use crate::domains::process::{CommandRunner, run_for_stdout};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub added: u32,
    pub removed: u32,
}

/// Added/removed line counts of the working tree against `HEAD`.
/// Failures read as an empty diff.
pub async fn diff_stats<R: CommandRunner + ?Sized>(runner: &R, worktree_path: &Path) -> DiffStats {
    run_for_stdout(
        runner,
        "git",
        &["diff", "HEAD", "--shortstat"],
        Some(worktree_path),
    )
    .await
    .map(|stdout| parse_shortstat(&stdout))
    .unwrap_or_default()
}

/// Parse `git diff --shortstat` output such as
/// ` 3 files changed, 42 insertions(+), 10 deletions(-)`.
/// Either phrase may be absent.
pub fn parse_shortstat(output: &str) -> DiffStats {
    DiffStats {
        added: count_before(output, "insertion").unwrap_or(0),
        removed: count_before(output, "deletion").unwrap_or(0),
    }
}

fn count_before(output: &str, token: &str) -> Option<u32> {
    let words: Vec<&str> = output.split_whitespace().collect();
    words.windows(2).find_map(|pair| {
        if pair[1].starts_with(token) {
            pair[0].parse().ok()
        } else {
            None
        }
    })
}
