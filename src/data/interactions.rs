use std::collections::HashMap;

use serde::Deserialize;

use crate::{
    ecs::components::{Effect, Interaction},
    input::Action,
};

/// A game-defined interaction: pressing `key` requests `effect`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CustomInteraction {
    pub key: char,
    pub effect: Effect,
}

/// Maps an entity's interaction kind and the player's action to an effect.
#[derive(Clone, Debug, Default)]
pub struct InteractionTable {
    custom: HashMap<String, CustomInteraction>,
}

impl InteractionTable {
    pub fn register<S: Into<String>>(&mut self, id: S, interaction: CustomInteraction) {
        self.custom.insert(id.into(), interaction);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.custom.contains_key(id)
    }

    pub fn react(&self, interaction: &Interaction, action: &Action) -> Option<Effect> {
        match interaction {
            Interaction::StairsUp => {
                (*action == Action::Char('<')).then_some(Effect::ChangeFloor(-1))
            }
            Interaction::StairsDown => {
                (*action == Action::Char('>')).then_some(Effect::ChangeFloor(1))
            }
            Interaction::Custom(id) => self
                .custom
                .get(id)
                .filter(|custom| *action == Action::Char(custom.key))
                .map(|custom| custom.effect.clone()),
        }
    }
}
