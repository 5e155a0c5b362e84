//! Filesystem layout of a lesson.
//!
//! ```text
//! <root>/
//!   home/
//!     <actor>/
//!       .ssh/config        (mode 0600)
//!       .ssh/origin        (private key, mode 0600)
//!       <project>/         (cloned working tree)
//! ```
//!
//! All helpers are pure; nothing here touches the disk.

use std::path::{Component, Path, PathBuf};

use crate::types::{ActorName, ProjectName};

pub const HOMES_DIR: &str = "home";
pub const SSH_DIR: &str = ".ssh";
pub const SSH_CONFIG: &str = "config";
pub const SSH_KEY: &str = "origin";

/// `<root>/home`
pub fn homes_root(root: &Path) -> PathBuf {
    root.join(HOMES_DIR)
}

/// `<root>/home/<actor>`
pub fn actor_home(root: &Path, actor: &ActorName) -> PathBuf {
    homes_root(root).join(&actor.0)
}

/// `<home>/<project>`
pub fn project_path(home: &Path, project: &ProjectName) -> PathBuf {
    home.join(&project.0)
}

/// `<home>/.ssh`
pub fn ssh_dir(home: &Path) -> PathBuf {
    home.join(SSH_DIR)
}

/// `<home>/.ssh/config`
pub fn ssh_config_path(home: &Path) -> PathBuf {
    ssh_dir(home).join(SSH_CONFIG)
}

/// `<home>/.ssh/origin`
pub fn ssh_key_path(home: &Path) -> PathBuf {
    ssh_dir(home).join(SSH_KEY)
}

/// `name` joins onto a directory as exactly one new child: not empty, not
/// `.` or `..`, no separators.
pub fn is_plain_segment(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_home_is_under_root_home() {
        let home = actor_home(Path::new("/work"), &ActorName::from("thor"));
        assert_eq!(home, PathBuf::from("/work/home/thor"));
    }

    #[test]
    fn ssh_files_live_in_dot_ssh() {
        let home = Path::new("/work/home/thor");
        assert!(ssh_config_path(home).ends_with(".ssh/config"));
        assert!(ssh_key_path(home).ends_with(".ssh/origin"));
    }

    #[test]
    fn plain_segments_exclude_dots_and_separators() {
        for ok in ["demo", "demo.git", ".hidden", "a..b"] {
            assert!(is_plain_segment(ok), "{ok}");
        }
        for bad in ["", ".", "..", "a/b", "a\\b", "/abs"] {
            assert!(!is_plain_segment(bad), "{bad}");
        }
    }
}
