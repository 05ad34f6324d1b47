use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::{MenuError, MenuResult};
use crate::menu::MenuEntry;
use crate::selection::Input;
use crate::types::Typed;

use super::composer::Composer;
use super::contribution::Contribution;

/// Composer that accepts plugin load and unload after startup.
///
/// Every change copies the current snapshot, edits the copy and swaps it in
/// atomically. Queries already running keep the snapshot they loaded.
pub struct SharedComposer<C, V> {
    snap: ArcSwap<Composer<C, V>>,
}

impl<C, V> SharedComposer<C, V> {
    pub fn new(composer: Composer<C, V>) -> Self {
        Self {
            snap: ArcSwap::from_pointee(composer),
        }
    }

    pub fn snapshot(&self) -> Arc<Composer<C, V>> {
        self.snap.load_full()
    }

    pub fn add_single(&self, contribution: Contribution<C, V>) -> MenuResult<()> {
        self.check_declared(&contribution)?;
        self.snap.rcu(|current| {
            let mut next = Composer::clone(current);
            next.insert_single(contribution.clone());
            next
        });
        tracing::info!(contributor = contribution.name(), "single contributor plugged");
        Ok(())
    }

    pub fn add_group(&self, contribution: Contribution<C, V>) -> MenuResult<()> {
        self.check_declared(&contribution)?;
        self.snap.rcu(|current| {
            let mut next = Composer::clone(current);
            next.insert_group(contribution.clone());
            next
        });
        tracing::info!(contributor = contribution.name(), "group contributor plugged");
        Ok(())
    }

    pub fn remove_single(&self, contribution: &Contribution<C, V>) -> bool {
        let mut removed = false;
        self.snap.rcu(|current| {
            let mut next = Composer::clone(current);
            removed = next.deregister_single(contribution);
            next
        });
        if removed {
            tracing::info!(contributor = contribution.name(), "single contributor unplugged");
        }
        removed
    }

    pub fn remove_group(&self, contribution: &Contribution<C, V>) -> bool {
        let mut removed = false;
        self.snap.rcu(|current| {
            let mut next = Composer::clone(current);
            removed = next.deregister_group(contribution);
            next
        });
        if removed {
            tracing::info!(contributor = contribution.name(), "group contributor unplugged");
        }
        removed
    }

    fn check_declared(&self, contribution: &Contribution<C, V>) -> MenuResult<()> {
        let snap = self.snap.load();
        if snap.is_strict() && !snap.catalog().contains(contribution.key()) {
            return Err(MenuError::UndeclaredType(contribution.key()));
        }
        Ok(())
    }
}

impl<C, V: Typed> SharedComposer<C, V> {
    pub fn build(&self, ctx: &C, input: Input<'_, V>) -> Vec<MenuEntry> {
        self.snap.load().build(ctx, input)
    }
}
