use std::fmt;
use std::sync::Arc;

use crate::error::MenuResult;
use crate::menu::MenuEntry;
use crate::selection::Input;
use crate::types::TypeKey;

pub type ContributionResult = MenuResult<Vec<MenuEntry>>;

type ContributeFn<C, V> = dyn Fn(&C, Input<'_, V>) -> ContributionResult + Send + Sync;

/// A handler bound to the declared type it was registered for.
///
/// Clones share the same handler; equality is handler identity, so a clone
/// kept at registration time can later deregister exactly that instance.
pub struct Contribution<C, V> {
    key: TypeKey,
    name: &'static str,
    run: Arc<ContributeFn<C, V>>,
}

impl<C, V> Contribution<C, V> {
    pub fn new<F>(key: TypeKey, name: &'static str, handler: F) -> Self
    where
        F: Fn(&C, Input<'_, V>) -> ContributionResult + Send + Sync + 'static,
    {
        Self {
            key,
            name,
            run: Arc::new(handler),
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn invoke(&self, ctx: &C, input: Input<'_, V>) -> ContributionResult {
        (self.run)(ctx, input)
    }
}

impl<C, V> Clone for Contribution<C, V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            name: self.name,
            run: Arc::clone(&self.run),
        }
    }
}

impl<C, V> PartialEq for Contribution<C, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && Arc::ptr_eq(&self.run, &other.run)
    }
}

impl<C, V> fmt::Debug for Contribution<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contribution")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
