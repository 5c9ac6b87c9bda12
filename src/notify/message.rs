use std::fmt;

use crate::diff::Delta;
use crate::models::Snapshot;

/// Line terminator used by every rendered message
pub const LINE_ENDING: &str = "\r\n";

const ADDED_HEADER: &str = "次の物件が追加されました";
const REMOVED_HEADER: &str = "次の物件が削除されました";
const CHANGED_HEADER: &str = "次の物件価格が変更されました";

/// Delta category a message reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Added,
    Removed,
    Changed,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Added => "added",
            Category::Removed => "removed",
            Category::Changed => "changed",
        };
        f.write_str(name)
    }
}

/// Rendered text for one delta category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub category: Category,
    pub text: String,
}

/// Render one message per non-empty delta category, in the order
/// added, removed, changed.
///
/// Added and removed ids are listed in id order. Added lines take the url
/// from `current`, removed lines take name/price/location from `previous`,
/// and changed entries take name/url from `current`.
pub fn render(delta: &Delta, previous: &Snapshot, current: &Snapshot) -> Vec<Notification> {
    let mut out = Vec::with_capacity(3);

    if !delta.added.is_empty() {
        let now = current.index();
        let mut text = header(ADDED_HEADER);
        for id in &delta.added {
            if let Some(record) = now.get(id) {
                push_line(&mut text, &record.url);
            }
        }
        out.push(Notification {
            category: Category::Added,
            text,
        });
    }

    if !delta.removed.is_empty() {
        let before = previous.index();
        let mut text = header(REMOVED_HEADER);
        for id in &delta.removed {
            if let Some(record) = before.get(id) {
                push_line(
                    &mut text,
                    &format!("{} {} {}", record.name, record.price, record.location),
                );
            }
        }
        out.push(Notification {
            category: Category::Removed,
            text,
        });
    }

    if !delta.changed.is_empty() {
        let now = current.index();
        let mut text = header(CHANGED_HEADER);
        for change in &delta.changed {
            if let Some(record) = now.get(&change.id) {
                push_line(
                    &mut text,
                    &format!("{} {} => {}", record.name, change.old, change.new),
                );
                push_line(&mut text, &record.url);
            }
        }
        out.push(Notification {
            category: Category::Changed,
            text,
        });
    }

    out
}

fn header(title: &str) -> String {
    let mut text = String::from(title);
    text.push_str(LINE_ENDING);
    text
}

fn push_line(text: &mut String, line: &str) {
    text.push_str(line);
    text.push_str(LINE_ENDING);
}
