use std::path::{Path, PathBuf};

use crate::domains::process::{CommandRunner, run_for_stdout};
use crate::utils::path_utils::last_component_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredWorktree {
    /// Branch short name, or the directory name for detached checkouts.
    pub name: String,
    pub path: PathBuf,
}

/// List the worktrees of the repository at `root_path` via
/// `git worktree list --porcelain`. Any failure yields an empty list; callers
/// treat that as "nothing discovered" and fall back to the root itself.
pub async fn list_worktrees<R: CommandRunner + ?Sized>(
    runner: &R,
    root_path: &Path,
) -> Vec<DiscoveredWorktree> {
    match run_for_stdout(
        runner,
        "git",
        &["worktree", "list", "--porcelain"],
        Some(root_path),
    )
    .await
    {
        Some(stdout) => parse_worktree_porcelain(&stdout),
        None => {
            log::debug!("No worktrees discovered for {}", root_path.display());
            Vec::new()
        }
    }
}

/// Parse porcelain output. Records open on `worktree <path>`; a later
/// `branch <ref>` names the record after the ref's last segment; `bare`
/// discards the open record.
pub fn parse_worktree_porcelain(output: &str) -> Vec<DiscoveredWorktree> {
    let mut worktrees = Vec::new();
    let mut current_path: Option<PathBuf> = None;
    let mut current_branch: Option<String> = None;

    let flush = |path: Option<PathBuf>, branch: Option<String>, out: &mut Vec<DiscoveredWorktree>| {
        if let Some(path) = path {
            let name = branch.unwrap_or_else(|| last_component_name(&path));
            out.push(DiscoveredWorktree { name, path });
        }
    };

    for raw_line in output.lines() {
        let line = raw_line.trim_end_matches('\r');
        if let Some(path) = line.strip_prefix("worktree ") {
            flush(current_path.take(), current_branch.take(), &mut worktrees);
            current_path = Some(PathBuf::from(path));
        } else if let Some(reference) = line.strip_prefix("branch ") {
            current_branch = reference
                .rsplit('/')
                .next()
                .filter(|segment| !segment.is_empty())
                .map(str::to_string);
        } else if line == "bare" {
            current_path = None;
            current_branch = None;
        }
    }
    flush(current_path, current_branch, &mut worktrees);

    worktrees
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::process::testing::{MockRunner, failed_output, ok_output};

    const TWO_WORKTREES: &str = "worktree /src/app\n\
HEAD 1111111111111111111111111111111111111111\n\
detached\n\
\n\
worktree /src/app-feature\n\
HEAD 2222222222222222222222222222222222222222\n\
branch refs/heads/feature-x\n";

    #[test]
    fn parses_two_blocks_and_names_by_branch_or_directory() {
        let worktrees = parse_worktree_porcelain(TWO_WORKTREES);
        assert_eq!(
            worktrees,
            vec![
                DiscoveredWorktree {
                    name: "app".into(),
                    path: PathBuf::from("/src/app"),
                },
                DiscoveredWorktree {
                    name: "feature-x".into(),
                    path: PathBuf::from("/src/app-feature"),
                },
            ]
        );
    }

    #[test]
    fn nested_branch_refs_use_last_segment() {
        let output = "worktree /w/one\nbranch refs/heads/team/topic/fix-42\n";
        let worktrees = parse_worktree_porcelain(output);
        assert_eq!(worktrees[0].name, "fix-42");
    }

    #[test]
    fn bare_repository_contributes_no_worktree() {
        let output = "worktree /repos/mirror.git\nbare\n\nworktree /repos/checkout\nbranch refs/heads/main\n";
        let worktrees = parse_worktree_porcelain(output);
        assert_eq!(worktrees.len(), 1);
        assert_eq!(worktrees[0].path, PathBuf::from("/repos/checkout"));
        assert_eq!(worktrees[0].name, "main");
    }

    #[test]
    fn tolerates_crlf_and_empty_output() {
        assert!(parse_worktree_porcelain("").is_empty());
        let worktrees = parse_worktree_porcelain("worktree /w/a\r\nbranch refs/heads/dev\r\n");
        assert_eq!(worktrees[0].path, PathBuf::from("/w/a"));
        assert_eq!(worktrees[0].name, "dev");
    }

    #[tokio::test]
    async fn list_runs_porcelain_in_root_directory() {
        let runner = MockRunner::default();
        let root = Path::new("/src/app");
        runner.respond(
            "git",
            &["worktree", "list", "--porcelain"],
            Some(root),
            ok_output(TWO_WORKTREES),
        );

        let worktrees = list_worktrees(&runner, root).await;

        assert_eq!(worktrees.len(), 2);
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].cwd.as_deref(), Some(root));
    }

    #[tokio::test]
    async fn list_degrades_to_empty_on_failure() {
        let runner = MockRunner::default();
        let root = Path::new("/not/a/repo");
        runner.respond(
            "git",
            &["worktree", "list", "--porcelain"],
            Some(root),
            failed_output(128, "fatal: not a git repository"),
        );
        assert!(list_worktrees(&runner, root).await.is_empty());

        let missing = Path::new("/no/git");
        runner.fail_spawn("git", &["worktree", "list", "--porcelain"], Some(missing));
        assert!(list_worktrees(&runner, missing).await.is_empty());
    }
}
