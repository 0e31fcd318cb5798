//! Unified diffs between local content and its remote counterpart

use std::fmt;
use std::fs;
use std::path::Path;

use similar::TextDiff;

/// What the operator is shown before choosing a conflict action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffView {
    /// One side is not valid UTF-8 text
    Binary,
    /// One side could not be read
    Unavailable(String),
    /// Both sides have the same lines
    Identical,
    /// Unified diff, remote as the old side
    Unified(String),
}

impl fmt::Display for DiffView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "Cannot show diff for binary file"),
            Self::Unavailable(reason) => write!(f, "Cannot show diff: {}", reason),
            Self::Identical => write!(f, "Files are identical in content."),
            Self::Unified(text) => write!(f, "{}", text),
        }
    }
}

enum Side {
    Text(String),
    Binary,
}

fn read_side(path: &Path) -> Result<Side, String> {
    let bytes = fs::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => Side::Text(text),
        Err(_) => Side::Binary,
    })
}

/// Compare `local` against the staged remote copy at `remote`.
///
/// Never fails: unreadable or non-text input produces a notice instead of
/// a diff. Neither file is modified.
pub fn show_diff(local: &Path, remote: &Path, filename: &str) -> DiffView {
    let local_text = match read_side(local) {
        Ok(Side::Text(text)) => text,
        Ok(Side::Binary) => return DiffView::Binary,
        Err(reason) => return DiffView::Unavailable(reason),
    };
    let remote_text = match read_side(remote) {
        Ok(Side::Text(text)) => text,
        Ok(Side::Binary) => return DiffView::Binary,
        Err(reason) => return DiffView::Unavailable(reason),
    };

    render(&remote_text, &local_text, filename)
}

fn render(remote: &str, local: &str, filename: &str) -> DiffView {
    let diff = TextDiff::from_lines(remote, local);
    let text = diff
        .unified_diff()
        .header(&format!("Remote: {}", filename), &format!("Local: {}", filename))
        .to_string();

    if text.is_empty() {
        DiffView::Identical
    } else {
        DiffView::Unified(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn pair(local: &[u8], remote: &[u8]) -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let temp = TempDir::new().unwrap();
        let local_path = temp.path().join("page.html");
        let remote_path = temp.path().join("page_remote_temp.html");
        fs::write(&local_path, local).unwrap();
        fs::write(&remote_path, remote).unwrap();
        (temp, local_path, remote_path)
    }

    #[test]
    fn remote_is_the_old_side() {
        let (_temp, local, remote) = pair(b"one\ntwo\nthree\n", b"one\nTWO\nthree\n");

        let DiffView::Unified(text) = show_diff(&local, &remote, "page.html") else {
            panic!("expected a unified diff");
        };
        assert!(text.starts_with("--- Remote: page.html\n+++ Local: page.html\n"));
        assert!(text.contains("-TWO\n"));
        assert!(text.contains("+two\n"));
    }

    #[test]
    fn equal_text_is_identical() {
        let (_temp, local, remote) = pair(b"same\n", b"same\n");
        assert_eq!(show_diff(&local, &remote, "page.html"), DiffView::Identical);
    }

    #[test]
    fn invalid_utf8_is_binary() {
        let (_temp, local, remote) = pair(b"text\n", &[0xff, 0xfe, 0x00, 0x81]);
        assert_eq!(show_diff(&local, &remote, "page.html"), DiffView::Binary);

        let (_temp, local, remote) = pair(&[0xc3, 0x28], b"text\n");
        assert_eq!(show_diff(&local, &remote, "page.html"), DiffView::Binary);
    }

    #[test]
    fn missing_side_is_unavailable() {
        let temp = TempDir::new().unwrap();
        let local = temp.path().join("page.html");
        fs::write(&local, "x").unwrap();

        let view = show_diff(&local, &temp.path().join("gone"), "page.html");
        assert!(matches!(view, DiffView::Unavailable(_)));
        assert!(view.to_string().starts_with("Cannot show diff:"));
    }

    #[test]
    fn display_is_verbatim_diff() {
        let view = render("a\n", "b\n", "f.txt");
        let DiffView::Unified(text) = &view else {
            panic!("expected a unified diff, got {:?}", view);
        };
        assert_eq!(&view.to_string(), text);
        assert!(text.starts_with("--- Remote: f.txt\n+++ Local: f.txt\n@@ "));
        assert!(text.ends_with("-a\n+b\n"));
    }
}
