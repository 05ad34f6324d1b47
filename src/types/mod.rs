mod catalog;
mod key;

pub use catalog::{TypeCatalog, TypeCatalogBuilder, TypeDecl, TypeKind};
pub use key::{TypeKey, Typed};
