use serde::{Serialize, Serializer};

use super::align::{align, cell_count};
use super::types::CharEdit;

/// Length product above which a changed line pair is not aligned
/// character by character.
pub const DEFAULT_CHAR_DIFF_LIMIT: usize = 500_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Plain,
    /// Present only on the old side.
    Deleted,
    /// Present only on the new side.
    Inserted,
}

impl FragmentKind {
    pub fn class_name(self) -> &'static str {
        match self {
            FragmentKind::Plain => "",
            FragmentKind::Deleted => "char-del",
            FragmentKind::Inserted => "char-add",
        }
    }
}

impl Serialize for FragmentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.class_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub text: String,
    pub kind: FragmentKind,
}

impl Fragment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: FragmentKind::Plain,
        }
    }
}

/// Highlighted fragments for both sides of a changed line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeFragments {
    pub old: Vec<Fragment>,
    pub new: Vec<Fragment>,
}

/// Split a changed line pair into plain / deleted / inserted fragments.
///
/// Pairs whose character-count product exceeds `limit` are returned whole as
/// plain text on both sides.
pub fn highlight_change(old: &str, new: &str, limit: usize) -> ChangeFragments {
    let old_chars: Vec<char> = old.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();

    if cell_count(old_chars.len(), new_chars.len()) > limit {
        return ChangeFragments {
            old: plain_side(old),
            new: plain_side(new),
        };
    }

    let script: Vec<CharEdit> = align(&old_chars, &new_chars);
    let mut out = ChangeFragments::default();
    for edit in script {
        let highlighted = !edit.is_equal();
        if let Some(&ch) = edit.old_value() {
            let kind = if highlighted { FragmentKind::Deleted } else { FragmentKind::Plain };
            push_char(&mut out.old, ch, kind);
        }
        if let Some(&ch) = edit.new_value() {
            let kind = if highlighted { FragmentKind::Inserted } else { FragmentKind::Plain };
            push_char(&mut out.new, ch, kind);
        }
    }
    out
}

fn plain_side(text: &str) -> Vec<Fragment> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Fragment::plain(text)]
    }
}

/// Append a character, extending the last fragment when the kind matches.
fn push_char(side: &mut Vec<Fragment>, ch: char, kind: FragmentKind) {
    match side.last_mut() {
        Some(last) if last.kind == kind => last.text.push(ch),
        _ => side.push(Fragment {
            text: ch.to_string(),
            kind,
        }),
    }
}
