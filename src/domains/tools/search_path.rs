use std::collections::HashSet;
use std::path::Path;

const FALLBACK_PATH: &str = "/usr/bin:/bin:/usr/sbin:/sbin";

/// Install locations GUI-launched processes usually miss. Checked before the
/// inherited `PATH`.
pub fn extra_search_dirs(home: Option<&Path>) -> Vec<String> {
    let mut dirs = vec![
        "/usr/local/bin".to_string(),
        "/opt/homebrew/bin".to_string(),
        "/opt/homebrew/sbin".to_string(),
    ];
    if let Some(home) = home {
        let home = home.display();
        dirs.extend([
            format!("{home}/.local/bin"),
            format!("{home}/.cargo/bin"),
            format!("{home}/.bun/bin"),
            format!("{home}/.local/share/mise/shims"),
        ]);
    }
    dirs
}

/// Extra directories first, then `inherited` (or the system fallback), with
/// duplicates and empty entries dropped in first-seen order.
pub fn augmented_search_path(inherited: Option<&str>, extra: &[String]) -> String {
    let inherited = inherited
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(FALLBACK_PATH);

    let mut seen = HashSet::new();
    let mut components = Vec::new();
    for entry in extra.iter().map(String::as_str).chain(inherited.split(':')) {
        let entry = entry.trim();
        if !entry.is_empty() && seen.insert(entry) {
            components.push(entry);
        }
    }
    components.join(":")
}

/// The search path for the current process environment.
pub fn current_search_path() -> String {
    let inherited = std::env::var("PATH").ok();
    let home = dirs::home_dir();
    augmented_search_path(
        inherited.as_deref(),
        &extra_search_dirs(home.as_deref()),
    )
}
