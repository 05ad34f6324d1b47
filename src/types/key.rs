use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(Option<&'static str>);

impl TypeKey {
    /// Wildcard key matched after every declared ancestor, and on its own
    /// when there is no value at all.
    pub const UNIVERSAL: Self = Self(None);

    pub const fn new(name: &'static str) -> Self {
        Self(Some(name))
    }

    pub fn name(self) -> &'static str {
        self.0.unwrap_or("*")
    }

    pub fn is_universal(self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub trait Typed {
    fn type_key(&self) -> TypeKey;
}

impl<T: Typed + ?Sized> Typed for &T {
    fn type_key(&self) -> TypeKey {
        (**self).type_key()
    }
}
