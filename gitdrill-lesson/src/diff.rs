//! Unified diffs of scripted edits, for the lesson report.

use std::path::Path;

use similar::TextDiff;

use gitdrill_actor::EditOutcome;

/// A single edited file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FileDiff {
    /// Path relative to the working tree.
    pub path: String,
    pub unified_diff: String,
}

/// Diff `edit` with headers relative to `tree`. `None` when nothing changed.
pub fn edit_diff(edit: &EditOutcome, tree: &Path) -> Option<FileDiff> {
    if !edit.changed() {
        return None;
    }
    let before = normalize_line_endings(&edit.before);
    let after = normalize_line_endings(&edit.after);

    let relative = edit.path.strip_prefix(tree).unwrap_or(edit.path.as_path());
    let old_header = if before.is_empty() {
        "/dev/null".to_string()
    } else {
        format!("a/{}", relative.display())
    };
    let new_header = format!("b/{}", relative.display());
    let unified = TextDiff::from_lines(&before, &after)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();

    Some(FileDiff {
        path: relative.display().to_string(),
        unified_diff: unified,
    })
}

fn normalize_line_endings(s: &str) -> String {
    s.replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use gitdrill_actor::Recipe;

    use super::*;

    fn outcome(recipe: Recipe, before: &str) -> EditOutcome {
        EditOutcome {
            recipe,
            path: PathBuf::from("/root/home/thor/demo").join(recipe.file_name()),
            before: before.to_string(),
            after: recipe.apply(before),
        }
    }

    #[test]
    fn new_file_diff_starts_from_dev_null() {
        let diff = edit_diff(&outcome(Recipe::ScriptStub, ""), Path::new("/root/home/thor/demo"))
            .expect("changed");
        assert_eq!(diff.path, "lesson.sh");
        assert!(diff.unified_diff.starts_with("--- /dev/null\n+++ b/lesson.sh\n"));
        assert!(diff.unified_diff.contains("+echo \"hello world\"\n"));
    }

    #[test]
    fn capitalize_shows_replaced_lines() {
        let before = Recipe::AppendLine.apply(&Recipe::ScriptStub.apply(""));
        let diff = edit_diff(&outcome(Recipe::Capitalize, &before), Path::new("/root/home/thor/demo"))
            .expect("changed");
        assert!(diff.unified_diff.contains("--- a/lesson.sh"));
        assert!(diff.unified_diff.contains("-echo \"hello world\"\n"));
        assert!(diff.unified_diff.contains("+echo \"Hello world\"\n"));
        assert!(diff.unified_diff.contains("+echo \"goodbye\"\n"));
    }

    #[test]
    fn unchanged_edit_has_no_diff() {
        let edit = EditOutcome {
            recipe: Recipe::AppendLine,
            path: PathBuf::from("/t/lesson.sh"),
            before: "x\n".into(),
            after: "x\n".into(),
        };
        assert!(edit_diff(&edit, Path::new("/t")).is_none());
    }
}
