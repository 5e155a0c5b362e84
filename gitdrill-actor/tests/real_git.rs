//! End-to-end actor verbs against the real `git` binary and a local bare
//! repository standing in for the shared remote.
//!
//! Every test returns early when `git` is not installed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use gitdrill_actor::{ActorAgent, ActorEnvironment, Collaborator, GitCli, Recipe};
use gitdrill_core::RemoteDescriptor;
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git as the fixture author, isolated from the operator's config.
fn git(home: &Path, dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("HOME", home)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_AUTHOR_NAME", "seed")
        .env("GIT_AUTHOR_EMAIL", "seed@example.com")
        .env("GIT_COMMITTER_NAME", "seed")
        .env("GIT_COMMITTER_EMAIL", "seed@example.com")
        .output()
        .expect("spawn git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Bare `demo.git` with one commit on `main`.
fn seeded_remote(root: &Path) -> PathBuf {
    let fixture_home = root.join("fixture-home");
    fs::create_dir_all(&fixture_home).expect("fixture home");

    let bare = root.join("remote").join("demo.git");
    fs::create_dir_all(&bare).expect("bare dir");
    git(&fixture_home, &bare, &["init", "--bare", "--quiet"]);
    git(&fixture_home, &bare, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    let seed = root.join("seed");
    fs::create_dir_all(&seed).expect("seed dir");
    git(&fixture_home, &seed, &["init", "--quiet"]);
    git(&fixture_home, &seed, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    fs::write(seed.join("README.md"), "# demo\n").expect("readme");
    git(&fixture_home, &seed, &["add", "README.md"]);
    git(&fixture_home, &seed, &["commit", "--quiet", "-m", "seed"]);
    let bare_str = bare.display().to_string();
    git(&fixture_home, &seed, &["push", "--quiet", &bare_str, "main"]);
    bare
}

fn actor(root: &Path, name: &str) -> ActorAgent {
    let env = ActorEnvironment::rooted(name, root).expect("env");
    ActorAgent::new(env, Arc::new(GitCli::default()))
}

fn demo() -> RemoteDescriptor {
    RemoteDescriptor::parse("alice/demo").expect("parse")
}

#[test]
fn level_one_round_trip_reaches_the_remote() {
    if !git_available() {
        return;
    }
    let root = TempDir::new().expect("root");
    let bare = seeded_remote(root.path());
    let url = bare.display().to_string();
    let remote = demo();
    let mut thor = actor(root.path(), "thor");

    assert!(thor.clone_from(&remote, &url).expect("clone").succeeded());
    thor.apply_level_edit(&remote.project, Recipe::ScriptStub).expect("edit");
    assert!(thor.stage(&remote.project, &[]).expect("stage").succeeded());
    assert!(thor.commit(&remote.project, "Level 1").expect("commit").succeeded());
    let push = thor.push(&remote.project, &url, "main").expect("push");
    assert!(push.succeeded(), "{push:?}");

    let fixture_home = root.path().join("fixture-home");
    let subject = git(&fixture_home, &bare, &["log", "-1", "--format=%s", "main"]);
    let author = git(&fixture_home, &bare, &["log", "-1", "--format=%an <%ae>", "main"]);
    assert_eq!(subject, "Level 1");
    assert_eq!(author, "thor <thor@gitdrill.local>");
}

#[test]
fn push_switches_origin_between_url_forms() {
    if !git_available() {
        return;
    }
    let root = TempDir::new().expect("root");
    let bare = seeded_remote(root.path());
    let path_url = bare.display().to_string();
    let file_url = format!("file://{}", bare.display());
    let remote = demo();
    let mut thor = actor(root.path(), "thor");
    thor.clone_from(&remote, &path_url).expect("clone");
    let tree = thor.handle(&remote.project).unwrap().local_path.clone();

    for url in [&file_url, &path_url, &file_url] {
        let report = thor.push(&remote.project, url, "main").expect("push");
        assert!(report.succeeded(), "{url}: {report:?}");
        let origin = git(root.path(), &tree, &["remote", "get-url", "origin"]);
        assert_eq!(&origin, url);
    }
}

#[test]
fn behind_actor_is_rejected_then_recovers_by_pulling() {
    if !git_available() {
        return;
    }
    let root = TempDir::new().expect("root");
    let bare = seeded_remote(root.path());
    let url = bare.display().to_string();
    let remote = demo();
    let mut captain = actor(root.path(), "captain");
    let mut hulk = actor(root.path(), "hulk");
    captain.clone_from(&remote, &url).expect("clone captain");
    hulk.clone_from(&remote, &url).expect("clone hulk");

    captain.apply_level_edit(&remote.project, Recipe::ScriptStub).expect("edit");
    captain.stage(&remote.project, &[]).expect("stage");
    captain.commit(&remote.project, "Level 1").expect("commit");
    assert!(captain.push(&remote.project, &url, "main").expect("push").succeeded());

    hulk.apply_level_edit(&remote.project, Recipe::NewFile).expect("edit");
    hulk.stage(&remote.project, &[]).expect("stage");
    hulk.commit(&remote.project, "Level 4").expect("commit");
    let rejected = hulk.push(&remote.project, &url, "main").expect("push");
    assert!(!rejected.succeeded(), "behind actor must be rejected");

    assert!(hulk.pull(&remote.project, "main").expect("pull").succeeded());
    assert!(hulk.push(&remote.project, &url, "main").expect("push").succeeded());
}

#[test]
fn branch_then_merge_brings_changes_back() {
    if !git_available() {
        return;
    }
    let root = TempDir::new().expect("root");
    let bare = seeded_remote(root.path());
    let url = bare.display().to_string();
    let remote = demo();
    let mut thor = actor(root.path(), "thor");
    thor.clone_from(&remote, &url).expect("clone");
    let tree = thor.handle(&remote.project).unwrap().local_path.clone();

    assert!(thor.branch(&remote.project, "feature").expect("branch").succeeded());
    thor.apply_level_edit(&remote.project, Recipe::ScriptStub).expect("edit");
    thor.stage(&remote.project, &[]).expect("stage");
    thor.commit(&remote.project, "feature work").expect("commit");

    git(root.path(), &tree, &["checkout", "--quiet", "main"]);
    assert!(thor.merge(&remote.project, "feature").expect("merge").succeeded());
    assert!(tree.join("lesson.sh").exists());
}
