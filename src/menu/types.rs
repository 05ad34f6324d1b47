#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuAction {
    pub id: String,
    pub label: String,
    pub shortcut: Option<String>,
    pub enabled: bool,
}

impl MenuAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shortcut: None,
            enabled: true,
        }
    }

    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submenu {
    pub label: String,
    pub entries: Vec<MenuEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Action(MenuAction),
    Separator,
    Submenu(Submenu),
}

impl MenuEntry {
    pub fn action(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Action(MenuAction::new(id, label))
    }

    pub fn submenu(label: impl Into<String>, entries: Vec<MenuEntry>) -> Self {
        Self::Submenu(Submenu {
            label: label.into(),
            entries,
        })
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Self::Separator)
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Action(action) => Some(&action.label),
            Self::Submenu(submenu) => Some(&submenu.label),
            Self::Separator => None,
        }
    }
}

impl From<MenuAction> for MenuEntry {
    fn from(action: MenuAction) -> Self {
        Self::Action(action)
    }
}

pub fn labels(entries: &[MenuEntry]) -> Vec<&str> {
    entries
        .iter()
        .map(|entry| entry.label().unwrap_or("-"))
        .collect()
}
