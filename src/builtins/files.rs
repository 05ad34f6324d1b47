use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::compose::ComposerBuilder;
use crate::directory::InstanceDirectory;
use crate::error::MenuResult;
use crate::menu::{MenuAction, MenuEntry};
use crate::selection::{Input, SelectionAdapter};
use crate::types::{TypeCatalog, TypeDecl, TypeKey, Typed};

use super::search::SEARCH_URL;

pub const ENTRY: TypeKey = TypeKey::new("entry");
pub const OPENABLE: TypeKey = TypeKey::new("openable");
pub const FILE: TypeKey = TypeKey::new("file");
pub const DIRECTORY: TypeKey = TypeKey::new("directory");
pub const SYMLINK: TypeKey = TypeKey::new("symlink");
pub const TEXT: TypeKey = TypeKey::new("text");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File(PathBuf),
    Directory(PathBuf),
    Symlink { path: PathBuf, target: Option<PathBuf> },
    Text(String),
}

impl Typed for Node {
    fn type_key(&self) -> TypeKey {
        match self {
            Self::File(_) => FILE,
            Self::Directory(_) => DIRECTORY,
            Self::Symlink { .. } => SYMLINK,
            Self::Text(_) => TEXT,
        }
    }
}

impl Node {
    /// Probes the filesystem; anything that is not an existing path is text.
    pub fn from_arg(arg: &str) -> Self {
        let path = Path::new(arg);
        let Ok(meta) = fs::symlink_metadata(path) else {
            return Self::Text(arg.to_string());
        };
        if meta.file_type().is_symlink() {
            Self::Symlink {
                path: path.to_path_buf(),
                target: fs::read_link(path).ok(),
            }
        } else if meta.is_dir() {
            Self::Directory(path.to_path_buf())
        } else {
            Self::File(path.to_path_buf())
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) | Self::Directory(path) | Self::Symlink { path, .. } => {
                Some(path.as_path())
            }
            Self::Text(_) => None,
        }
    }
}

pub struct FileMenuContext {
    pub directory: Arc<InstanceDirectory>,
    pub clipboard: Option<String>,
}

pub fn catalog() -> MenuResult<TypeCatalog> {
    let mut builder = TypeCatalog::builder();
    builder
        .declare(TypeDecl::interface(ENTRY))?
        .declare(TypeDecl::interface(OPENABLE).implements(ENTRY))?
        .declare(TypeDecl::class(FILE).implements(OPENABLE))?
        .declare(TypeDecl::class(DIRECTORY).extends(FILE))?
        .declare(TypeDecl::class(SYMLINK).extends(FILE))?
        .declare(TypeDecl::class(TEXT))?;
    Ok(builder.build())
}

pub fn register(builder: &mut ComposerBuilder<FileMenuContext, Node>) {
    builder.register_single(DIRECTORY, "explore", |_, _| {
        Ok(vec![
            MenuAction::new("explore", "Explore").with_shortcut("Enter").into(),
            MenuEntry::action("open-terminal", "Open Terminal Here"),
        ])
    });
    builder.register_single(SYMLINK, "follow-link", |_, input| {
        let Some(Node::Symlink { target, .. }) = SelectionAdapter::to_single(input) else {
            return Ok(Vec::new());
        };
        let action = MenuAction::new("follow-link", "Go to Target");
        Ok(vec![match target {
            Some(_) => action.into(),
            None => action.disabled().into(),
        }])
    });
    builder.register_single(FILE, "open", |_, _| {
        Ok(vec![
            MenuAction::new("open", "Open").with_shortcut("Ctrl+O").into(),
            MenuEntry::action("open-with", "Open With…"),
        ])
    });
    builder.register_single(ENTRY, "copy-path", |_, _| {
        Ok(vec![
            MenuAction::new("copy-path", "Copy Path")
                .with_shortcut("Ctrl+Shift+C")
                .into(),
        ])
    });
    builder.register_single(TEXT, "search-with", search_with);
    builder.register_single(TypeKey::UNIVERSAL, "clipboard", |ctx, _| {
        let paste = MenuAction::new("paste", "Paste").with_shortcut("Ctrl+V");
        Ok(vec![if ctx.clipboard.is_some() {
            paste.into()
        } else {
            paste.disabled().into()
        }])
    });
    builder.register_single(TypeKey::UNIVERSAL, "refresh", |_, _| {
        Ok(vec![
            MenuAction::new("refresh", "Refresh").with_shortcut("F5").into(),
        ])
    });

    builder.register_group(FILE, "compress", |_, input| {
        let count = SelectionAdapter::to_group(input).map_or(0, |group| group.len());
        Ok(vec![MenuEntry::action(
            "compress",
            if count == 1 {
                "Compress…".to_string()
            } else {
                format!("Compress {count} Items…")
            },
        )])
    });
    builder.register_group(ENTRY, "move-to-trash", |_, input| {
        let paths = SelectionAdapter::to_group(input)
            .map_or(0, |group| group.iter().filter_map(Node::path).count());
        let label = if paths > 1 {
            format!("Move {paths} Items to Trash")
        } else {
            "Move to Trash".to_string()
        };
        Ok(vec![
            MenuAction::new("move-to-trash", label)
                .with_shortcut("Del")
                .into(),
        ])
    });
}

fn search_with(ctx: &FileMenuContext, input: Input<'_, Node>) -> MenuResult<Vec<MenuEntry>> {
    let Some(Node::Text(text)) = SelectionAdapter::to_single(input) else {
        return Ok(Vec::new());
    };
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut entries = vec![MenuEntry::action("copy-text", "Copy")];
    if let Some(preferred) = ctx.directory.preferred(&SEARCH_URL) {
        let url = preferred.build_url(text)?;
        entries.push(MenuEntry::action(
            format!("open-url:{url}"),
            format!("Search {} for “{}”", preferred.label(), text.trim()),
        ));
    }

    let mut engines = Vec::new();
    for engine in ctx.directory.instances_of(&SEARCH_URL) {
        let url = engine.build_url(text)?;
        engines.push(MenuEntry::action(format!("open-url:{url}"), engine.label()));
    }
    if !engines.is_empty() {
        entries.push(MenuEntry::submenu("Search With", engines));
    }
    Ok(entries)
}
