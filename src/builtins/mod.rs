pub mod files;
pub mod search;

use std::sync::Arc;

use crate::compose::{ComposeOptions, Composer};
use crate::config::Config;
use crate::directory::{CapabilityInfo, InstanceDirectory};
use crate::error::MenuResult;
use crate::menu::MenuEntry;
use crate::selection::Input;

use files::{FileMenuContext, Node};

pub struct FileBrowserMenu {
    composer: Composer<FileMenuContext, Node>,
    context: FileMenuContext,
}

impl FileBrowserMenu {
    pub fn new(config: &Config) -> MenuResult<Self> {
        let mut directory = InstanceDirectory::builder();
        search::register(&mut directory)?;
        let directory = Arc::new(directory.build_with_preferences(&config.strategies)?);

        let catalog = Arc::new(files::catalog()?);
        let mut builder = Composer::builder(catalog).options(ComposeOptions::from(&config.menu));
        files::register(&mut builder);
        let composer = builder.build()?;

        Ok(Self {
            composer,
            context: FileMenuContext {
                directory,
                clipboard: None,
            },
        })
    }

    pub fn with_clipboard(mut self, clipboard: Option<String>) -> Self {
        self.context.clipboard = clipboard;
        self
    }

    pub fn menu_for(&self, nodes: &[Node]) -> Vec<MenuEntry> {
        self.composer.build(&self.context, Input::Many(nodes))
    }

    pub fn strategies(&self) -> Vec<(CapabilityInfo, Vec<&'static str>)> {
        self.context
            .directory
            .capabilities()
            .into_iter()
            .map(|info| (info, self.context.directory.ids_of(info.key)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::FileBrowserMenu;
    use super::files::Node;
    use crate::config::Config;
    use crate::error::MenuError;
    use crate::menu::{MenuEntry, labels};

    fn menu() -> FileBrowserMenu {
        FileBrowserMenu::new(&Config::default()).expect("default wiring should build")
    }

    #[test]
    fn directory_menu_lists_most_specific_actions_first() {
        let entries = menu().menu_for(&[Node::Directory(PathBuf::from("/srv"))]);

        assert_eq!(
            labels(&entries),
            vec![
                "Explore",
                "Open Terminal Here",
                "-",
                "Open",
                "Open With…",
                "-",
                "Copy Path",
                "-",
                "Paste",
                "-",
                "Refresh",
                "-",
                "Compress…",
                "-",
                "Move to Trash",
            ]
        );
    }

    #[test]
    fn text_menu_offers_search_engines() {
        let entries = menu().menu_for(&[Node::Text("ferris crab".to_string())]);

        assert_eq!(
            labels(&entries),
            vec![
                "Copy",
                "Search DuckDuckGo for “ferris crab”",
                "Search With",
                "-",
                "Paste",
                "-",
                "Refresh",
            ]
        );
        let Some(MenuEntry::Submenu(submenu)) = entries.get(2) else {
            panic!("third entry should be the search submenu");
        };
        assert_eq!(labels(&submenu.entries), vec!["DuckDuckGo", "Google", "Wikipedia"]);
    }

    #[test]
    fn preferred_engine_follows_config() {
        let mut config = Config::default();
        config
            .strategies
            .insert("search-url".to_string(), "wikipedia".to_string());
        let entries = FileBrowserMenu::new(&config)
            .expect("wiring should build")
            .menu_for(&[Node::Text("Ferris".to_string())]);

        match &entries[1] {
            MenuEntry::Action(action) => {
                assert_eq!(action.id, "open-url:https://en.wikipedia.org/wiki/Ferris");
            }
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[test]
    fn unknown_preferred_engine_fails_startup() {
        let mut config = Config::default();
        config.strategies = BTreeMap::from([("search-url".to_string(), "altavista".to_string())]);

        let err = FileBrowserMenu::new(&config)
            .err()
            .expect("unknown engine should fail");
        assert!(matches!(err, MenuError::UnknownStrategy { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn mixed_selection_keeps_only_shared_actions() {
        let entries = menu().menu_for(&[
            Node::File(PathBuf::from("a.txt")),
            Node::Text("loose text".to_string()),
        ]);

        assert_eq!(labels(&entries), vec!["Paste", "-", "Refresh"]);
    }

    #[test]
    fn file_group_offers_group_actions() {
        let entries = menu().menu_for(&[
            Node::File(PathBuf::from("a.txt")),
            Node::Directory(PathBuf::from("b")),
        ]);

        assert_eq!(
            labels(&entries),
            vec![
                "Paste",
                "-",
                "Refresh",
                "-",
                "Compress 2 Items…",
                "-",
                "Move 2 Items to Trash",
            ]
        );
    }

    #[test]
    fn empty_selection_enables_paste_from_clipboard() {
        let entries = menu()
            .with_clipboard(Some("copied".to_string()))
            .menu_for(&[]);

        assert_eq!(labels(&entries), vec!["Paste", "-", "Refresh"]);
        match &entries[0] {
            MenuEntry::Action(action) => assert!(action.enabled),
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[test]
    fn strategies_enumerate_registered_engines() {
        let strategies = menu().strategies();

        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].0.display_name, "Web search");
        assert_eq!(strategies[0].1, vec!["duckduckgo", "google", "wikipedia"]);
    }
}
