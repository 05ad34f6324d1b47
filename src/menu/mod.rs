mod text;
mod types;

pub use text::render_text;
pub use types::{MenuAction, MenuEntry, Submenu, labels};
