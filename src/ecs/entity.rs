use crate::error::{EngineError, EngineResult};

use super::components::{Battle, ComponentKind, Display, Health, Input, Name, Solid};

/// Data-level entity: one optional slot per component kind.
///
/// This is what the factory produces and what maps author. It is turned into
/// live `specs` entities by [`super::EcsWorld::populate`]. A slot is either
/// filled or absent; nothing is defaulted on the way in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entity {
    pub(crate) display: Option<Display>,
    pub(crate) input: Option<Input>,
    pub(crate) health: Option<Health>,
    pub(crate) battle: Option<Battle>,
    pub(crate) solid: Option<Solid>,
    pub(crate) name: Option<Name>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ComponentValue {
    Display(Display),
    Input(Input),
    Health(Health),
    Battle(Battle),
    Solid(Solid),
    Name(Name),
}

}

/// Typed handle on one component slot of an [`Entity`].
pub trait ComponentSlot: Clone + Sized {
    const KIND: ComponentKind;

    fn slot(entity: &Entity) -> &Option<Self>;

    fn slot_mut(entity: &mut Entity) -> &mut Option<Self>;
}

macro_rules! component_slot {
    ($ty:ty, $field:ident, $kind:expr) => {
        impl ComponentSlot for $ty {
            const KIND: ComponentKind = $kind;

            fn slot(entity: &Entity) -> &Option<Self> {
                &entity.$field
            }

            fn slot_mut(entity: &mut Entity) -> &mut Option<Self> {
                &mut entity.$field
            }
        }
    };
}

component_slot!(Display, display, ComponentKind::Display);
component_slot!(Input, input, ComponentKind::Input);
component_slot!(Health, health, ComponentKind::Health);
component_slot!(Battle, battle, ComponentKind::Battle);
component_slot!(Solid, solid, ComponentKind::Solid);
component_slot!(Name, name, ComponentKind::Name);

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores exactly the given components. A repeated kind keeps the last value.
    pub fn from_components<I>(values: I) -> Self
    where
        I: IntoIterator<Item = ComponentValue>,
    {
        let mut entity = Self::new();
        for value in values {
            entity.insert(value);
        }
        entity
    }

    pub fn with<C: ComponentSlot>(mut self, component: C) -> Self {
        *C::slot_mut(&mut self) = Some(component);
        self
    }

    pub fn insert(&mut self, value: ComponentValue) {
        match value {
            ComponentValue::Display(c) => self.display = Some(c),
            ComponentValue::Input(c) => self.input = Some(c),
            ComponentValue::Health(c) => self.health = Some(c),
            ComponentValue::Battle(c) => self.battle = Some(c),
            ComponentValue::Solid(c) => self.solid = Some(c),
            ComponentValue::Name(c) => self.name = Some(c),
        }
    }

    pub fn has(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Display => self.display.is_some(),
            ComponentKind::Input => self.input.is_some(),
            ComponentKind::Health => self.health.is_some(),
            ComponentKind::Battle => self.battle.is_some(),
            ComponentKind::Solid => self.solid.is_some(),
            ComponentKind::Name => self.name.is_some(),
        }
    }

    pub fn get<C: ComponentSlot>(&self) -> EngineResult<&C> {
        C::slot(self)
            .as_ref()
            .ok_or(EngineError::MissingComponent { kind: C::KIND })
    }

    pub fn get_mut<C: ComponentSlot>(&mut self) -> EngineResult<&mut C> {
        C::slot_mut(self)
            .as_mut()
            .ok_or(EngineError::MissingComponent { kind: C::KIND })
    }

    pub fn try_get<C: ComponentSlot>(&self) -> Option<&C> {
        C::slot(self).as_ref()
    }

    #[cfg(test)]
    pub fn kinds(&self) -> Vec<ComponentKind> {
        ComponentKind::ALL
            .into_iter()
            .filter(|kind| self.has(*kind))
            .collect()
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_ref().is_some_and(|n| n.0 == name)
    }

    pub fn is_solid(&self) -> bool {
        self.solid.is_some_and(|solid| solid.0)
    }
}

#[cfg(test)]
mod tests {
    use bracket_terminal::prelude::RGB;

    use super::*;

    fn wall() -> Entity {
        Entity::from_components([
            ComponentValue::Display(Display::new(1, 2, '#', RGB::from_u8(255, 255, 255))),
            ComponentValue::Solid(Solid(true)),
        ])
    }

    #[test]
    fn stores_exactly_the_given_kinds() {
        let entity = wall();
        assert_eq!(
            entity.kinds(),
            vec![ComponentKind::Display, ComponentKind::Solid]
        );
        assert!(entity.has(ComponentKind::Display));
        assert!(!entity.has(ComponentKind::Health));
        assert!(entity.is_solid());
    }

    #[test]
    fn missing_component_is_an_error() {
        let entity = wall();
        match entity.get::<Health>() {
            Err(EngineError::MissingComponent { kind }) => assert_eq!(kind, ComponentKind::Health),
            other => panic!("expected a missing component, got {other:?}"),
        }
        assert_eq!(entity.get::<Display>().unwrap().glyph, '#');
    }

    #[test]
    fn component_values_are_owned_per_entity() {
        let mut first = Entity::new().with(Health::full(10));
        let second = first.clone();
        first.get_mut::<Health>().unwrap().current = 3;
        assert_eq!(first.get::<Health>().unwrap().current, 3);
        assert_eq!(second.get::<Health>().unwrap().current, 10);
    }

    #[test]
    fn absent_solid_is_not_solid() {
        let entity = Entity::new().with(Name("Ghost".to_string()));
        assert!(!entity.is_solid());
        assert!(entity.is_named("Ghost"));
        assert!(!entity.is_named("Player"));
    }
}
