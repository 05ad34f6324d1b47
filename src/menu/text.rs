use unicode_width::UnicodeWidthStr;

use super::types::MenuEntry;

const INDENT: &str = "  ";
const SEPARATOR_WIDTH: usize = 12;

/// Plain-text rendering used by the command-line front end.
pub fn render_text(entries: &[MenuEntry], max_depth: usize) -> String {
    let mut out = String::new();
    render_level(entries, 0, max_depth.max(1), &mut out);
    out
}

fn render_level(entries: &[MenuEntry], depth: usize, max_depth: usize, out: &mut String) {
    let indent = INDENT.repeat(depth);
    let label_width = entries
        .iter()
        .filter_map(|entry| match entry {
            MenuEntry::Action(action) => Some(action.label.width()),
            _ => None,
        })
        .max()
        .unwrap_or(0);

    for entry in entries {
        match entry {
            MenuEntry::Separator => {
                out.push_str(&indent);
                out.push_str(&"─".repeat(SEPARATOR_WIDTH));
                out.push('\n');
            }
            MenuEntry::Action(action) => {
                out.push_str(&indent);
                if !action.enabled {
                    out.push('(');
                }
                out.push_str(&action.label);
                if !action.enabled {
                    out.push(')');
                }
                if let Some(shortcut) = &action.shortcut {
                    let used = action.label.width() + if action.enabled { 0 } else { 2 };
                    let pad = label_width.saturating_sub(used) + 2;
                    out.push_str(&" ".repeat(pad));
                    out.push_str(shortcut);
                }
                out.push('\n');
            }
            MenuEntry::Submenu(submenu) => {
                out.push_str(&indent);
                out.push_str(&submenu.label);
                if depth + 1 >= max_depth {
                    out.push_str(" ▸ …\n");
                } else {
                    out.push_str(" ▸\n");
                    render_level(&submenu.entries, depth + 1, max_depth, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::render_text;
    use crate::menu::{MenuAction, MenuEntry};

    #[test]
    fn render_text_aligns_shortcuts_and_nests_submenus() {
        let entries = vec![
            MenuAction::new("open", "Open").with_shortcut("Enter").into(),
            MenuAction::new("copy-path", "Copy Path").into(),
            MenuEntry::Separator,
            MenuEntry::submenu("Search With", vec![MenuEntry::action("ddg", "DuckDuckGo")]),
        ];

        let text = render_text(&entries, 4);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Open       Enter");
        assert_eq!(lines[1], "Copy Path");
        assert!(lines[2].starts_with('─'));
        assert_eq!(lines[3], "Search With ▸");
        assert_eq!(lines[4], "  DuckDuckGo");
    }

    #[test]
    fn render_text_collapses_submenus_past_max_depth() {
        let entries = vec![MenuEntry::submenu(
            "More",
            vec![MenuEntry::action("hidden", "Hidden")],
        )];

        assert_eq!(render_text(&entries, 1), "More ▸ …\n");
    }

    #[test]
    fn render_text_marks_disabled_actions() {
        let entries = vec![MenuAction::new("paste", "Paste").disabled().into()];
        assert_eq!(render_text(&entries, 4), "(Paste)\n");
    }
}
