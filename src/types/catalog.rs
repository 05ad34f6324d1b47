use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use crate::error::{MenuError, MenuResult};

use super::key::TypeKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub key: TypeKey,
    pub kind: TypeKind,
    pub superclass: Option<TypeKey>,
    /// Directly implemented interfaces, or super-interfaces for an interface.
    pub interfaces: Vec<TypeKey>,
}

impl TypeDecl {
    pub fn class(key: TypeKey) -> Self {
        Self {
            key,
            kind: TypeKind::Class,
            superclass: None,
            interfaces: Vec::new(),
        }
    }

    pub fn interface(key: TypeKey) -> Self {
        Self {
            key,
            kind: TypeKind::Interface,
            superclass: None,
            interfaces: Vec::new(),
        }
    }

    pub fn extends(mut self, parent: TypeKey) -> Self {
        self.superclass = Some(parent);
        self
    }

    pub fn implements(mut self, interface: TypeKey) -> Self {
        self.interfaces.push(interface);
        self
    }
}

/// Collects declarations during startup.
///
/// A parent must be declared before any type naming it, which keeps the
/// hierarchy acyclic without a separate check.
#[derive(Debug, Default)]
pub struct TypeCatalogBuilder {
    decls: Vec<TypeDecl>,
    index: HashMap<TypeKey, usize>,
}

impl TypeCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, decl: TypeDecl) -> MenuResult<&mut Self> {
        if decl.key.is_universal() {
            return Err(MenuError::invalid_argument(
                "the universal key cannot be declared",
            ));
        }
        if self.index.contains_key(&decl.key) {
            return Err(MenuError::DuplicateType(decl.key));
        }
        if let Some(parent) = decl.superclass {
            match self.kind_of(parent) {
                None => {
                    return Err(MenuError::UnknownParent {
                        ty: decl.key,
                        parent,
                    });
                }
                Some(TypeKind::Interface) => {
                    return Err(MenuError::invalid_argument(format!(
                        "{} cannot extend interface {parent}",
                        decl.key
                    )));
                }
                Some(TypeKind::Class) if decl.kind == TypeKind::Interface => {
                    return Err(MenuError::invalid_argument(format!(
                        "interface {} cannot extend class {parent}",
                        decl.key
                    )));
                }
                Some(TypeKind::Class) => {}
            }
        }
        for &parent in &decl.interfaces {
            match self.kind_of(parent) {
                None => {
                    return Err(MenuError::UnknownParent {
                        ty: decl.key,
                        parent,
                    });
                }
                Some(TypeKind::Class) => {
                    return Err(MenuError::invalid_argument(format!(
                        "{} cannot implement class {parent}",
                        decl.key
                    )));
                }
                Some(TypeKind::Interface) => {}
            }
        }

        self.index.insert(decl.key, self.decls.len());
        self.decls.push(decl);
        Ok(self)
    }

    fn kind_of(&self, key: TypeKey) -> Option<TypeKind> {
        self.index.get(&key).map(|&idx| self.decls[idx].kind)
    }

    pub fn build(self) -> TypeCatalog {
        let mut catalog = TypeCatalog {
            decls: HashMap::with_capacity(self.decls.len()),
            chains: HashMap::with_capacity(self.decls.len()),
            order: Vec::with_capacity(self.decls.len()),
        };
        for decl in self.decls {
            catalog.order.push(decl.key);
            catalog.decls.insert(decl.key, decl);
        }
        for &key in &catalog.order {
            let chain = catalog.compute_chain(key);
            catalog.chains.insert(key, chain);
        }
        tracing::debug!(types = catalog.order.len(), "type catalog frozen");
        catalog
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    decls: HashMap<TypeKey, TypeDecl>,
    chains: HashMap<TypeKey, Vec<TypeKey>>,
    order: Vec<TypeKey>,
}

impl TypeCatalog {
    pub fn builder() -> TypeCatalogBuilder {
        TypeCatalogBuilder::new()
    }

    pub fn contains(&self, key: TypeKey) -> bool {
        key.is_universal() || self.decls.contains_key(&key)
    }

    pub fn get(&self, key: TypeKey) -> Option<&TypeDecl> {
        self.decls.get(&key)
    }

    pub fn keys(&self) -> &[TypeKey] {
        &self.order
    }

    /// Ancestor chain of `key`: the key itself, its superclasses nearest
    /// first, then interfaces depth-first, then [`TypeKey::UNIVERSAL`].
    ///
    /// Undeclared keys get `[key, UNIVERSAL]`.
    pub fn ancestors(&self, key: TypeKey) -> Cow<'_, [TypeKey]> {
        if let Some(chain) = self.chains.get(&key) {
            return Cow::Borrowed(chain.as_slice());
        }
        if key.is_universal() {
            Cow::Owned(vec![TypeKey::UNIVERSAL])
        } else {
            Cow::Owned(vec![key, TypeKey::UNIVERSAL])
        }
    }

    pub fn is_subtype(&self, ty: TypeKey, ancestor: TypeKey) -> bool {
        self.ancestors(ty).contains(&ancestor)
    }

    fn compute_chain(&self, key: TypeKey) -> Vec<TypeKey> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();

        let mut classes = Vec::new();
        let mut cursor = Some(key);
        while let Some(current) = cursor {
            classes.push(current);
            cursor = self.decls.get(&current).and_then(|decl| decl.superclass);
        }
        for &class in &classes {
            if seen.insert(class) {
                chain.push(class);
            }
        }
        for &class in &classes {
            if let Some(decl) = self.decls.get(&class) {
                for &interface in &decl.interfaces {
                    self.visit_interface(interface, &mut seen, &mut chain);
                }
            }
        }
        if seen.insert(TypeKey::UNIVERSAL) {
            chain.push(TypeKey::UNIVERSAL);
        }
        chain
    }

    fn visit_interface(
        &self,
        interface: TypeKey,
        seen: &mut HashSet<TypeKey>,
        chain: &mut Vec<TypeKey>,
    ) {
        if !seen.insert(interface) {
            return;
        }
        chain.push(interface);
        if let Some(decl) = self.decls.get(&interface) {
            for &parent in &decl.interfaces {
                self.visit_interface(parent, seen, chain);
            }
        }
    }
}
