use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Char-column range `[start, end)` on the cursor line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

/// A text file held as lines, with the cursor on the line a task is created from.
#[derive(Debug, Clone)]
pub struct Document {
    pub content: Vec<String>,
    pub cursor_row: usize,
    pub selection: Option<Selection>,
    pub is_dirty: bool,
    line_ending: &'static str,
    trailing_newline: bool,
}

impl Document {
    pub fn new(content: &str) -> Self {
        let lines: Vec<String> = if content.is_empty() {
            vec![String::new()]
        } else {
            content.lines().map(|s| s.to_string()).collect()
        };

        Document {
            content: lines,
            cursor_row: 0,
            selection: None,
            is_dirty: false,
            line_ending: if content.contains("\r\n") { "\r\n" } else { "\n" },
            trailing_newline: content.ends_with('\n'),
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::new(&content))
    }

    /// Put the cursor on 1-based `line` and optionally select char columns `[from, to)`.
    pub fn place_cursor(&mut self, line: usize, selection: Option<(usize, usize)>) -> Result<()> {
        if line == 0 || line > self.content.len() {
            bail!(
                "Line {} is outside the document (1-{})",
                line,
                self.content.len()
            );
        }
        self.cursor_row = line - 1;

        self.selection = match selection {
            None => None,
            Some((start, end)) => {
                let len = self.content[self.cursor_row].chars().count();
                if start > end || end > len {
                    bail!("Selection {}..{} is outside line {} ({} chars)", start, end, line, len);
                }
                (start < end).then_some(Selection { start, end })
            }
        };
        Ok(())
    }

    pub fn current_line(&self) -> &str {
        &self.content[self.cursor_row]
    }

    pub fn selection_text(&self) -> Option<String> {
        let selection = self.selection?;
        let text: String = self
            .current_line()
            .chars()
            .skip(selection.start)
            .take(selection.end - selection.start)
            .collect();
        Some(text)
    }

    /// Replace the selected text; the selection then covers the new text.
    pub fn replace_selection(&mut self, text: &str) {
        let Some(selection) = self.selection else {
            return;
        };
        let line: Vec<char> = self.current_line().chars().collect();
        let mut updated: String = line[..selection.start].iter().collect();
        updated.push_str(text);
        updated.extend(line[selection.end..].iter());

        self.content[self.cursor_row] = updated;
        self.selection = Some(Selection {
            start: selection.start,
            end: selection.start + text.chars().count(),
        });
        self.is_dirty = true;
    }

    pub fn set_line(&mut self, text: &str) {
        if self.content[self.cursor_row] != text {
            self.content[self.cursor_row] = text.to_string();
            self.is_dirty = true;
        }
    }

    pub fn get_content(&self) -> String {
        let mut content = self.content.join(self.line_ending);
        if self.trailing_newline {
            content.push_str(self.line_ending);
        }
        content
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        fs::write(path, self.get_content())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        self.is_dirty = false;
        Ok(())
    }
}

/// A document together with the file it came from.
pub struct FileDocument {
    pub path: PathBuf,
    pub document: Document,
}

impl FileDocument {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = Document::open(&path)?;
        Ok(FileDocument { path, document })
    }

    pub fn save_if_dirty(&mut self) -> Result<bool> {
        if !self.document.is_dirty {
            return Ok(false);
        }
        self.document.save(&self.path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_trailing_newline() {
        let doc = Document::new("a\nb\n");
        assert_eq!(doc.get_content(), "a\nb\n");
        assert_eq!(Document::new("a\nb").get_content(), "a\nb");
    }

    #[test]
    fn keeps_crlf_line_endings() {
        let mut doc = Document::new("# Notes\r\n- [ ] buy milk\r\n- [ ] other\r\n");
        doc.place_cursor(2, None).unwrap();
        assert_eq!(doc.current_line(), "- [ ] buy milk");

        doc.set_line("- [ ] buy milk [asana#P](u)");
        assert_eq!(
            doc.get_content(),
            "# Notes\r\n- [ ] buy milk [asana#P](u)\r\n- [ ] other\r\n"
        );
        assert_eq!(Document::new("a\r\nb").get_content(), "a\r\nb");
    }

    #[test]
    fn selection_uses_char_columns() {
        let mut doc = Document::new("- [ ] café au lait\n");
        doc.place_cursor(1, Some((6, 10))).unwrap();
        assert_eq!(doc.selection_text().as_deref(), Some("café"));

        doc.replace_selection("thé");
        assert_eq!(doc.current_line(), "- [ ] thé au lait");
        assert_eq!(doc.selection_text().as_deref(), Some("thé"));
        assert!(doc.is_dirty);
    }

    #[test]
    fn rejects_out_of_range_positions() {
        let mut doc = Document::new("one\ntwo");
        assert!(doc.place_cursor(0, None).is_err());
        assert!(doc.place_cursor(3, None).is_err());
        assert!(doc.place_cursor(2, Some((1, 9))).is_err());
    }

    #[test]
    fn empty_selection_counts_as_none() {
        let mut doc = Document::new("one");
        doc.place_cursor(1, Some((2, 2))).unwrap();
        assert_eq!(doc.selection, None);
    }

    #[test]
    fn save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "- [ ] one\n").unwrap();

        let mut file = FileDocument::open(&path).unwrap();
        assert!(!file.save_if_dirty().unwrap());
        file.document.set_line("- [x] one");
        assert!(file.save_if_dirty().unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "- [x] one\n");
    }
}
