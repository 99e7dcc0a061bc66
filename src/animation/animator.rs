//! Named animation parameters for a character.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

/// Parameter names shared between gameplay systems.
pub mod params {
    pub const IS_RUNNING: &str = "IsRunning";
    pub const IS_SWIMMING: &str = "IsSwimming";
    pub const IS_FLOATING: &str = "IsFloating";
    pub const COMBO_INDEX: &str = "ComboIndex";
}

/// Parameter store for one animated character.
///
/// Unknown bools read as `false`, unknown integers as `0` and unknown layers
/// as weight `0.0`.
#[derive(Component, Debug, Default, Clone)]
pub struct Animator {
    bools: HashMap<&'static str, bool>,
    ints: HashMap<&'static str, i32>,
    layer_weights: HashMap<&'static str, f32>,
    triggers: HashSet<&'static str>,
}

impl Animator {
    pub fn set_bool(&mut self, name: &'static str, value: bool) {
        self.bools.insert(name, value);
    }

    pub fn get_bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    pub fn set_integer(&mut self, name: &'static str, value: i32) {
        self.ints.insert(name, value);
    }

    pub fn get_integer(&self, name: &str) -> i32 {
        self.ints.get(name).copied().unwrap_or(0)
    }

    pub fn set_layer_weight(&mut self, layer: &'static str, weight: f32) {
        self.layer_weights.insert(layer, weight.clamp(0.0, 1.0));
    }

    pub fn layer_weight(&self, layer: &str) -> f32 {
        self.layer_weights.get(layer).copied().unwrap_or(0.0)
    }

    /// Arm a one-shot trigger; it stays set until consumed or reset.
    pub fn set_trigger(&mut self, name: &'static str) {
        self.triggers.insert(name);
    }

    pub fn reset_trigger(&mut self, name: &str) {
        self.triggers.remove(name);
    }

    pub fn is_trigger_set(&self, name: &str) -> bool {
        self.triggers.contains(name)
    }

    pub fn has_triggers(&self) -> bool {
        !self.triggers.is_empty()
    }

    /// Clear every armed trigger and return the ones that were set.
    pub fn take_triggers(&mut self) -> Vec<&'static str> {
        self.triggers.drain().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_parameters_have_neutral_values() {
        let animator = Animator::default();
        assert!(!animator.get_bool(params::IS_RUNNING));
        assert_eq!(animator.get_integer(params::COMBO_INDEX), 0);
        assert_eq!(animator.layer_weight("Physical Layer"), 0.0);
    }

    #[test]
    fn triggers_fire_once() {
        let mut animator = Animator::default();
        animator.set_trigger("PhysicalAttack");
        assert_eq!(animator.take_triggers(), vec!["PhysicalAttack"]);
        assert!(!animator.is_trigger_set("PhysicalAttack"));
        assert!(animator.take_triggers().is_empty());
    }

    #[test]
    fn layer_weight_is_clamped() {
        let mut animator = Animator::default();
        animator.set_layer_weight("Magic Layer", 3.0);
        assert_eq!(animator.layer_weight("Magic Layer"), 1.0);
    }
}
