use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::config::MenuConfig;
use crate::error::{MenuError, MenuResult};
use crate::menu::MenuEntry;
use crate::registry::TypeKeyRegistry;
use crate::selection::{Input, SelectionAdapter};
use crate::types::{TypeCatalog, TypeKey, Typed};

use super::contribution::{Contribution, ContributionResult};
use super::join::join_contributions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeOptions {
    pub separator_only_is_empty: bool,
    pub catch_panics: bool,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            separator_only_is_empty: false,
            catch_panics: true,
        }
    }
}

impl From<&MenuConfig> for ComposeOptions {
    fn from(config: &MenuConfig) -> Self {
        Self {
            separator_only_is_empty: config.separator_only_is_empty,
            catch_panics: config.catch_panics,
        }
    }
}

pub struct ComposerBuilder<C, V> {
    single: TypeKeyRegistry<Contribution<C, V>>,
    group: TypeKeyRegistry<Contribution<C, V>>,
    options: ComposeOptions,
    strict: bool,
}

impl<C, V> ComposerBuilder<C, V> {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self {
            single: TypeKeyRegistry::new(Arc::clone(&catalog)),
            group: TypeKeyRegistry::new(catalog),
            options: ComposeOptions::default(),
            strict: true,
        }
    }

    pub fn options(mut self, options: ComposeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn register_single<F>(
        &mut self,
        key: TypeKey,
        name: &'static str,
        handler: F,
    ) -> Contribution<C, V>
    where
        F: Fn(&C, Input<'_, V>) -> ContributionResult + Send + Sync + 'static,
    {
        let contribution = Contribution::new(key, name, handler);
        self.insert_single(contribution.clone());
        contribution
    }

    pub fn register_group<F>(
        &mut self,
        key: TypeKey,
        name: &'static str,
        handler: F,
    ) -> Contribution<C, V>
    where
        F: Fn(&C, Input<'_, V>) -> ContributionResult + Send + Sync + 'static,
    {
        let contribution = Contribution::new(key, name, handler);
        self.insert_group(contribution.clone());
        contribution
    }

    pub fn insert_single(&mut self, contribution: Contribution<C, V>) {
        self.single.register(contribution.key(), contribution);
    }

    pub fn insert_group(&mut self, contribution: Contribution<C, V>) {
        self.group.register(contribution.key(), contribution);
    }

    pub fn build(self) -> MenuResult<Composer<C, V>> {
        if self.strict
            && let Some(key) = self
                .single
                .undeclared_keys()
                .chain(self.group.undeclared_keys())
                .next()
        {
            return Err(MenuError::UndeclaredType(key));
        }

        tracing::debug!(
            single = self.single.len(),
            group = self.group.len(),
            "composer frozen"
        );
        Ok(Composer {
            single: self.single,
            group: self.group,
            options: self.options,
            strict: self.strict,
        })
    }
}

pub struct Composer<C, V> {
    single: TypeKeyRegistry<Contribution<C, V>>,
    group: TypeKeyRegistry<Contribution<C, V>>,
    options: ComposeOptions,
    strict: bool,
}

impl<C, V> Clone for Composer<C, V> {
    fn clone(&self) -> Self {
        Self {
            single: self.single.clone(),
            group: self.group.clone(),
            options: self.options,
            strict: self.strict,
        }
    }
}

impl<C, V> Composer<C, V> {
    pub fn builder(catalog: Arc<TypeCatalog>) -> ComposerBuilder<C, V> {
        ComposerBuilder::new(catalog)
    }

    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        self.single.catalog()
    }

    pub fn options(&self) -> ComposeOptions {
        self.options
    }

    pub fn single_registry(&self) -> &TypeKeyRegistry<Contribution<C, V>> {
        &self.single
    }

    pub fn group_registry(&self) -> &TypeKeyRegistry<Contribution<C, V>> {
        &self.group
    }

    pub fn into_builder(self) -> ComposerBuilder<C, V> {
        ComposerBuilder {
            single: self.single,
            group: self.group,
            options: self.options,
            strict: self.strict,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub(super) fn insert_single(&mut self, contribution: Contribution<C, V>) {
        self.single.register(contribution.key(), contribution);
    }

    pub(super) fn insert_group(&mut self, contribution: Contribution<C, V>) {
        self.group.register(contribution.key(), contribution);
    }

    pub(super) fn deregister_single(&mut self, contribution: &Contribution<C, V>) -> bool {
        self.single.deregister(contribution.key(), contribution)
    }

    pub(super) fn deregister_group(&mut self, contribution: &Contribution<C, V>) -> bool {
        self.group.deregister(contribution.key(), contribution)
    }

    fn run(
        &self,
        contribution: &Contribution<C, V>,
        ctx: &C,
        input: Input<'_, V>,
    ) -> Vec<MenuEntry> {
        let result = if self.options.catch_panics {
            match catch_unwind(AssertUnwindSafe(|| contribution.invoke(ctx, input))) {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        contributor = contribution.name(),
                        key = %contribution.key(),
                        "menu contributor panicked; skipping its entries"
                    );
                    return Vec::new();
                }
            }
        } else {
            contribution.invoke(ctx, input)
        };

        match result {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(
                    contributor = contribution.name(),
                    key = %contribution.key(),
                    error = %err,
                    "menu contributor failed; skipping its entries"
                );
                Vec::new()
            }
        }
    }
}

impl<C, V: Typed> Composer<C, V> {
    pub fn matching(&self, input: Input<'_, V>) -> Vec<&Contribution<C, V>> {
        let single_key = SelectionAdapter::to_single(input)
            .map_or(TypeKey::UNIVERSAL, |value| value.type_key());
        let mut matched = self.single.resolve(single_key);

        if let Some(group) = SelectionAdapter::to_group(input) {
            let common = SelectionAdapter::common_type(self.catalog(), group);
            matched.extend(self.group.resolve(common));
        }
        matched
    }

    /// Contributors that return nothing, fail, or panic add neither entries
    /// nor a separator.
    pub fn build(&self, ctx: &C, input: Input<'_, V>) -> Vec<MenuEntry> {
        let matched = self.matching(input);
        tracing::debug!(contributors = matched.len(), "composing menu");

        let contributions = matched
            .into_iter()
            .map(|contribution| self.run(contribution, ctx, input));
        join_contributions(contributions, self.options.separator_only_is_empty)
    }
}
