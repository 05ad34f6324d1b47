use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{TypeCatalog, TypeKey};

#[derive(Debug)]
pub struct TypeKeyRegistry<H> {
    catalog: Arc<TypeCatalog>,
    entries: HashMap<TypeKey, Vec<H>>,
    order: Vec<TypeKey>,
}

impl<H: Clone> Clone for TypeKeyRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            entries: self.entries.clone(),
            order: self.order.clone(),
        }
    }
}

impl<H> TypeKeyRegistry<H> {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self {
            catalog,
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    pub fn register(&mut self, key: TypeKey, handler: H) {
        let handlers = self.entries.entry(key).or_insert_with(|| {
            self.order.push(key);
            Vec::new()
        });
        handlers.push(handler);
    }

    pub fn exact(&self, key: TypeKey) -> &[H] {
        self.entries.get(&key).map_or(&[], Vec::as_slice)
    }

    pub fn resolve(&self, key: TypeKey) -> Vec<&H> {
        self.catalog
            .ancestors(key)
            .iter()
            .flat_map(|&ancestor| self.exact(ancestor))
            .collect()
    }

    pub fn keys(&self) -> &[TypeKey] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn undeclared_keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|&key| !self.catalog.contains(key))
    }
}

impl<H: PartialEq> TypeKeyRegistry<H> {
    pub fn deregister(&mut self, key: TypeKey, handler: &H) -> bool {
        let Some(handlers) = self.entries.get_mut(&key) else {
            return false;
        };
        let Some(pos) = handlers.iter().position(|candidate| candidate == handler) else {
            return false;
        };
        handlers.remove(pos);
        if handlers.is_empty() {
            self.entries.remove(&key);
            self.order.retain(|&registered| registered != key);
        }
        true
    }
}
