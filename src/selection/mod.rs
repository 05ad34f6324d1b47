use std::borrow::Cow;

use crate::types::{TypeCatalog, TypeKey, Typed};

#[derive(Debug)]
pub enum Input<'a, V> {
    None,
    One(&'a V),
    Many(&'a [V]),
}

impl<V> Clone for Input<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Input<'_, V> {}

impl<'a, V> Input<'a, V> {
    pub fn from_option(value: Option<&'a V>) -> Self {
        match value {
            Some(value) => Self::One(value),
            None => Self::None,
        }
    }
}

#[derive(Debug)]
pub struct Group<'a, V> {
    items: &'a [V],
}

impl<V> Clone for Group<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Group<'_, V> {}

impl<'a, V> Group<'a, V> {
    pub fn new(items: &'a [V]) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(Self { items })
        }
    }

    pub fn first(&self) -> &'a V {
        &self.items[0]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn as_slice(&self) -> &'a [V] {
        self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'a, V> {
        self.items.iter()
    }
}

/// A one-element collection is reported as `Single`.
#[derive(Debug)]
pub enum Selection<'a, V> {
    Empty,
    Single(&'a V),
    Group(Group<'a, V>),
}

impl<'a, V> Selection<'a, V> {
    pub fn from_input(input: Input<'a, V>) -> Self {
        if let Some(value) = SelectionAdapter::to_single(input) {
            return Self::Single(value);
        }
        match SelectionAdapter::to_group(input) {
            Some(group) => Self::Group(group),
            None => Self::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

pub struct SelectionAdapter;

impl SelectionAdapter {
    pub fn to_single<V>(input: Input<'_, V>) -> Option<&V> {
        match input {
            Input::One(value) => Some(value),
            Input::Many([value]) => Some(value),
            Input::Many(_) | Input::None => None,
        }
    }

    pub fn to_group<V>(input: Input<'_, V>) -> Option<Group<'_, V>> {
        match input {
            Input::One(value) => Group::new(std::slice::from_ref(value)),
            Input::Many(values) => Group::new(values),
            Input::None => None,
        }
    }

    /// Most specific type shared by every element of `group`.
    ///
    /// Walks the first element's ancestor chain and returns the first key
    /// present in the chain of every other distinct element type, which is
    /// [`TypeKey::UNIVERSAL`] when nothing more specific is shared.
    pub fn common_type<V: Typed>(catalog: &TypeCatalog, group: Group<'_, V>) -> TypeKey {
        let first = group.first().type_key();
        let mut others: Vec<TypeKey> = Vec::new();
        for value in group.iter().skip(1) {
            let key = value.type_key();
            if key != first && !others.contains(&key) {
                others.push(key);
            }
        }
        if others.is_empty() {
            return first;
        }

        let other_chains: Vec<Cow<'_, [TypeKey]>> =
            others.iter().map(|&key| catalog.ancestors(key)).collect();
        catalog
            .ancestors(first)
            .iter()
            .copied()
            .find(|candidate| other_chains.iter().all(|chain| chain.contains(candidate)))
            .unwrap_or(TypeKey::UNIVERSAL)
    }
}
