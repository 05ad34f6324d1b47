use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{MenuError, MenuResult};
use crate::types::TypeKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityInfo {
    pub key: TypeKey,
    pub display_name: &'static str,
    pub description: &'static str,
}

pub struct Capability<T: ?Sized> {
    info: CapabilityInfo,
    requires_default: bool,
    _instance: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized> Capability<T> {
    pub const fn new(
        key: TypeKey,
        display_name: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            info: CapabilityInfo {
                key,
                display_name,
                description,
            },
            requires_default: false,
            _instance: PhantomData,
        }
    }

    pub const fn required(mut self) -> Self {
        self.requires_default = true;
        self
    }

    pub fn key(&self) -> TypeKey {
        self.info.key
    }

    pub fn info(&self) -> CapabilityInfo {
        self.info
    }
}

impl<T: ?Sized> fmt::Debug for Capability<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("info", &self.info)
            .field("requires_default", &self.requires_default)
            .finish()
    }
}

struct Registered {
    id: &'static str,
    // Always an `Arc<T>` for the capability's `T`.
    instance: Box<dyn Any + Send + Sync>,
}

struct Slot {
    info: CapabilityInfo,
    requires_default: bool,
    instance_type: TypeId,
    entries: Vec<Registered>,
}

#[derive(Default)]
pub struct DirectoryBuilder {
    slots: HashMap<TypeKey, Slot>,
    order: Vec<TypeKey>,
}

impl DirectoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare<T>(&mut self, capability: &Capability<T>) -> MenuResult<&mut Self>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.slot_for(capability)?;
        Ok(self)
    }

    pub fn register<T>(
        &mut self,
        capability: &Capability<T>,
        id: &'static str,
        instance: Arc<T>,
    ) -> MenuResult<&mut Self>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let slot = self.slot_for(capability)?;
        if slot.entries.iter().any(|entry| entry.id == id) {
            return Err(MenuError::invalid_argument(format!(
                "capability {} already has an instance with id {id:?}",
                capability.key()
            )));
        }
        slot.entries.push(Registered {
            id,
            instance: Box::new(instance),
        });
        Ok(self)
    }

    fn slot_for<T>(&mut self, capability: &Capability<T>) -> MenuResult<&mut Slot>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = capability.key();
        let instance_type = TypeId::of::<Arc<T>>();
        if !self.slots.contains_key(&key) {
            self.order.push(key);
        }
        let slot = self.slots.entry(key).or_insert_with(|| Slot {
            info: capability.info(),
            requires_default: false,
            instance_type,
            entries: Vec::new(),
        });
        if slot.instance_type != instance_type {
            return Err(MenuError::invalid_argument(format!(
                "capability {key} is already declared with another instance type"
            )));
        }
        slot.requires_default |= capability.requires_default;
        Ok(slot)
    }

    pub fn build(self) -> MenuResult<InstanceDirectory> {
        self.build_with_preferences(&BTreeMap::new())
    }

    /// Freezes the directory, applying `preferences` (capability name to
    /// instance id), typically the `[strategies]` config table.
    pub fn build_with_preferences(
        self,
        preferences: &BTreeMap<String, String>,
    ) -> MenuResult<InstanceDirectory> {
        for key in &self.order {
            let slot = &self.slots[key];
            if slot.requires_default && slot.entries.is_empty() {
                return Err(MenuError::MissingDefault(*key));
            }
        }

        let mut preferred = HashMap::new();
        for (name, id) in preferences {
            let Some(key) = self.order.iter().copied().find(|key| key.name() == name) else {
                return Err(MenuError::invalid_argument(format!(
                    "unknown capability in preferences: {name}"
                )));
            };
            let slot = &self.slots[&key];
            let Some(pos) = slot.entries.iter().position(|entry| entry.id == id) else {
                return Err(MenuError::UnknownStrategy {
                    capability: key,
                    id: id.clone(),
                });
            };
            preferred.insert(key, pos);
        }

        tracing::debug!(
            capabilities = self.order.len(),
            preferences = preferred.len(),
            "instance directory frozen"
        );
        Ok(InstanceDirectory {
            slots: self.slots,
            order: self.order,
            preferred,
        })
    }
}

pub struct InstanceDirectory {
    slots: HashMap<TypeKey, Slot>,
    order: Vec<TypeKey>,
    preferred: HashMap<TypeKey, usize>,
}

impl InstanceDirectory {
    pub fn builder() -> DirectoryBuilder {
        DirectoryBuilder::new()
    }

    pub fn instances_of<T>(&self, capability: &Capability<T>) -> Vec<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.entries(capability.key())
            .iter()
            .filter_map(|entry| entry.instance.downcast_ref::<Arc<T>>().cloned())
            .collect()
    }

    pub fn find<T>(&self, capability: &Capability<T>, id: &str) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.entries(capability.key())
            .iter()
            .find(|entry| entry.id == id)
            .and_then(|entry| entry.instance.downcast_ref::<Arc<T>>().cloned())
    }

    /// The configured preference, or the first registered instance.
    pub fn preferred<T>(&self, capability: &Capability<T>) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let entries = self.entries(capability.key());
        let pos = self
            .preferred
            .get(&capability.key())
            .copied()
            .unwrap_or(0);
        entries
            .get(pos)
            .and_then(|entry| entry.instance.downcast_ref::<Arc<T>>().cloned())
    }

    pub fn ids_of(&self, key: TypeKey) -> Vec<&'static str> {
        self.entries(key).iter().map(|entry| entry.id).collect()
    }

    pub fn capabilities(&self) -> Vec<CapabilityInfo> {
        self.order.iter().map(|key| self.slots[key].info).collect()
    }

    fn entries(&self, key: TypeKey) -> &[Registered] {
        self.slots
            .get(&key)
            .map_or(&[], |slot| slot.entries.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use super::{Capability, InstanceDirectory};
    use crate::error::MenuError;
    use crate::types::TypeKey;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;
    struct French;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    impl Greeter for French {
        fn greet(&self) -> String {
            "bonjour".to_string()
        }
    }

    const GREETER: Capability<dyn Greeter> =
        Capability::new(TypeKey::new("greeter"), "Greeter", "Says hello");
    const POLITE: Capability<dyn Greeter> =
        Capability::new(TypeKey::new("polite-greeter"), "Polite greeter", "Says hello nicely");

    fn greetings(
        directory: &InstanceDirectory,
        capability: &Capability<dyn Greeter>,
    ) -> Vec<String> {
        directory
            .instances_of(capability)
            .iter()
            .map(|greeter| greeter.greet())
            .collect()
    }

    #[test]
    fn instances_of_keeps_registration_order() {
        let mut builder = InstanceDirectory::builder();
        builder
            .register(&GREETER, "en", Arc::new(English))
            .and_then(|b| b.register(&GREETER, "fr", Arc::new(French)))
            .expect("greeters should register");
        let directory = builder.build().expect("directory should build");

        assert_eq!(greetings(&directory, &GREETER), vec!["hello", "bonjour"]);
        assert_eq!(directory.ids_of(GREETER.key()), vec!["en", "fr"]);
    }

    #[test]
    fn lookup_is_exact_only() {
        let mut builder = InstanceDirectory::builder();
        builder
            .register(&GREETER, "en", Arc::new(English))
            .and_then(|b| b.declare(&POLITE))
            .expect("greeters should register");
        let directory = builder.build().expect("directory should build");

        assert!(directory.instances_of(&POLITE).is_empty());
        assert_eq!(directory.capabilities().len(), 2);
        assert_eq!(directory.capabilities()[1].display_name, "Polite greeter");
    }

    #[test]
    fn required_capability_without_instances_fails_at_build() {
        let required: Capability<dyn Greeter> = GREETER.required();
        let mut builder = InstanceDirectory::builder();
        builder.declare(&required).expect("declare should succeed");

        let err = builder.build().err().expect("missing default must fail");
        assert!(matches!(err, MenuError::MissingDefault(key) if key == GREETER.key()));
    }

    #[test]
    fn preferences_select_instance_and_reject_unknown_ids() {
        let register = || {
            let mut builder = InstanceDirectory::builder();
            builder
                .register(&GREETER, "en", Arc::new(English))
                .and_then(|b| b.register(&GREETER, "fr", Arc::new(French)))
                .expect("greeters should register");
            builder
        };

        let directory = register().build().expect("directory should build");
        let first = directory.preferred(&GREETER).expect("first instance");
        assert_eq!(first.greet(), "hello");

        let prefs = BTreeMap::from([("greeter".to_string(), "fr".to_string())]);
        let directory = register()
            .build_with_preferences(&prefs)
            .expect("directory should build");
        let chosen = directory.preferred(&GREETER).expect("preferred instance");
        assert_eq!(chosen.greet(), "bonjour");
        assert!(directory.find(&GREETER, "en").is_some());
        assert!(directory.find(&GREETER, "de").is_none());

        let prefs = BTreeMap::from([("greeter".to_string(), "de".to_string())]);
        let err = register()
            .build_with_preferences(&prefs)
            .err()
            .expect("unknown id must fail");
        assert!(matches!(err, MenuError::UnknownStrategy { ref id, .. } if id == "de"));
    }

    #[test]
    fn register_rejects_duplicate_ids_and_mismatched_types() {
        let mut builder = InstanceDirectory::builder();
        builder
            .register(&GREETER, "en", Arc::new(English))
            .expect("first registration");
        assert!(builder.register(&GREETER, "en", Arc::new(English)).is_err());

        let numbers: Capability<u32> = Capability::new(GREETER.key(), "Numbers", "");
        assert!(builder.register(&numbers, "one", Arc::new(1)).is_err());
    }
}
