use crate::menu::MenuEntry;

/// Concatenates non-empty contributions with one separator between each
/// consecutive pair, never leading, trailing or doubled.
///
/// A contribution made only of separators is kept as a single separator
/// unless `separator_only_is_empty`, in which case it is dropped.
pub fn join_contributions<I>(contributions: I, separator_only_is_empty: bool) -> Vec<MenuEntry>
where
    I: IntoIterator<Item = Vec<MenuEntry>>,
{
    let mut out: Vec<MenuEntry> = Vec::new();
    for entries in contributions {
        if entries.is_empty() {
            continue;
        }
        if entries.iter().all(MenuEntry::is_separator) {
            if !separator_only_is_empty && !ends_with_separator(&out) {
                out.push(MenuEntry::Separator);
            }
            continue;
        }

        if !out.is_empty() && !ends_with_separator(&out) {
            out.push(MenuEntry::Separator);
        }
        for entry in entries {
            if entry.is_separator() && (out.is_empty() || ends_with_separator(&out)) {
                continue;
            }
            out.push(entry);
        }
        if ends_with_separator(&out) {
            out.pop();
        }
    }
    out
}

fn ends_with_separator(entries: &[MenuEntry]) -> bool {
    entries.last().is_some_and(MenuEntry::is_separator)
}
