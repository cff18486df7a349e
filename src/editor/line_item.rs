//! Line grammar for the managed markdown subset.
//!
//! Every non-blank line of the file is either a checkbox task or a `##`
//! section header; anything else is skipped on load and therefore absent from
//! the next save. That lossy policy is part of the on-disk contract and must
//! not be "fixed" here without changing the format.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static TASK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)([-*])\s+\[([ xX])\]\s*(.*)$").unwrap());
static SECTION_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^##\s+(.*)$").unwrap());

/// The four supported indent levels: 0, 4, 8 and 12 spaces.
pub const INDENT_LEVELS: [&str; 4] = ["", "    ", "        ", "            "];

const INDENT_WIDTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub indent: String,
    pub bullet: char,
    pub completed: bool,
    pub text: String,
}

impl Task {
    /// A fresh, unchecked task carrying this task's indent and bullet.
    pub fn template(&self) -> Task {
        Task {
            indent: self.indent.clone(),
            bullet: self.bullet,
            completed: false,
            text: String::new(),
        }
    }

    /// The indent with tabs normalized to four spaces, as shown on screen.
    pub fn display_indent(&self) -> String {
        self.indent.replace('\t', "    ")
    }

    pub fn indent_level(&self) -> usize {
        indent_level(&self.indent)
    }

    pub fn set_indent_level(&mut self, level: usize) {
        self.indent = INDENT_LEVELS[level.min(INDENT_LEVELS.len() - 1)].to_string();
    }
}

impl Default for Task {
    fn default() -> Self {
        Task {
            indent: String::new(),
            bullet: '-',
            completed: false,
            text: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineItem {
    Task(Task),
    Section { title: String },
}

impl LineItem {
    /// Parses one raw line. `None` means the line is not part of the managed
    /// subset (blank, prose, other heading levels) and is dropped.
    pub fn parse(raw: &str) -> Option<LineItem> {
        if raw.trim().is_empty() {
            return None;
        }
        if let Some(captures) = SECTION_PATTERN.captures(raw) {
            return Some(LineItem::Section {
                title: captures[1].to_string(),
            });
        }
        let captures = TASK_PATTERN.captures(raw)?;
        Some(LineItem::Task(Task {
            indent: captures[1].to_string(),
            bullet: captures[2].chars().next().unwrap_or('-'),
            completed: captures[3].eq_ignore_ascii_case("x"),
            text: captures[4].to_string(),
        }))
    }

    pub fn is_task(&self) -> bool {
        matches!(self, LineItem::Task(_))
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            LineItem::Task(task) => Some(task),
            LineItem::Section { .. } => None,
        }
    }

    pub fn as_task_mut(&mut self) -> Option<&mut Task> {
        match self {
            LineItem::Task(task) => Some(task),
            LineItem::Section { .. } => None,
        }
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineItem::Task(task) => {
                let mark = if task.completed { 'x' } else { ' ' };
                write!(f, "{}{} [{}] {}", task.indent, task.bullet, mark, task.text)
            }
            LineItem::Section { title } => write!(f, "## {title}"),
        }
    }
}

/// Maps an indent string to its level in `[0, 3]`. Tabs count as four spaces.
pub fn indent_level(indent: &str) -> usize {
    let normalized = indent.replace('\t', "    ");
    (normalized.chars().count() / INDENT_WIDTH).min(INDENT_LEVELS.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_task(raw: &str) -> Task {
        match LineItem::parse(raw) {
            Some(LineItem::Task(task)) => task,
            other => panic!("expected task from {raw:?}, got {other:?}"),
        }
    }

    #[test]
    fn parses_open_and_completed_tasks() {
        let open = parse_task("- [ ] buy milk");
        assert!(!open.completed);
        assert_eq!(open.text, "buy milk");
        assert_eq!(open.bullet, '-');
        assert_eq!(open.indent, "");

        assert!(parse_task("- [x] pay rent").completed);
        assert!(parse_task("- [X] pay rent").completed);
    }

    #[test]
    fn parses_star_bullet_and_indent() {
        let task = parse_task("    * [ ] nested");
        assert_eq!(task.bullet, '*');
        assert_eq!(task.indent, "    ");
        assert_eq!(task.indent_level(), 1);
    }

    #[test]
    fn tab_indent_counts_as_four_spaces() {
        let task = parse_task("\t- [ ] tabbed");
        assert_eq!(task.indent, "\t");
        assert_eq!(task.indent_level(), 1);
        assert_eq!(task.display_indent(), "    ");
    }

    #[test]
    fn parses_section_title_verbatim() {
        assert_eq!(
            LineItem::parse("## Work  "),
            Some(LineItem::Section {
                title: "Work  ".to_string()
            })
        );
    }

    #[test]
    fn skips_lines_outside_the_subset() {
        assert_eq!(LineItem::parse(""), None);
        assert_eq!(LineItem::parse("   "), None);
        assert_eq!(LineItem::parse("just some prose"), None);
        assert_eq!(LineItem::parse("# top heading"), None);
        assert_eq!(LineItem::parse("### deep heading"), None);
        assert_eq!(LineItem::parse("-[ ] missing space"), None);
        assert_eq!(LineItem::parse("- [y] bad mark"), None);
    }

    #[test]
    fn serialize_parse_round_trip() {
        let items = [
            LineItem::Task(Task {
                indent: "        ".to_string(),
                bullet: '*',
                completed: true,
                text: "ship the release".to_string(),
            }),
            LineItem::Task(Task::default()),
            LineItem::Section {
                title: "Later".to_string(),
            },
        ];
        for item in items {
            assert_eq!(LineItem::parse(&item.to_string()), Some(item));
        }
    }

    #[test]
    fn indent_level_clamps_at_deepest() {
        assert_eq!(indent_level(""), 0);
        assert_eq!(indent_level("    "), 1);
        assert_eq!(indent_level("            "), 3);
        assert_eq!(indent_level("                    "), 3);
    }

    #[test]
    fn set_indent_level_uses_canonical_spaces() {
        let mut task = parse_task("\t\t- [ ] deep");
        task.set_indent_level(2);
        assert_eq!(task.indent, "        ");
        task.set_indent_level(9);
        assert_eq!(task.indent_level(), 3);
    }
}
