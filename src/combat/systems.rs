//! Combat systems - attack input, combo ticking and weapon visibility.

use bevy::prelude::*;

use super::components::*;
use crate::animation::{params, Animator};
use crate::core::{GameState, PlayState};
use crate::player::Player;

/// System set ordering for combat.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSet {
    Input,
    Action,
}

/// Configure combat systems.
pub fn setup_combat_systems(app: &mut App) {
    app
        // System ordering
        .configure_sets(
            Update,
            (CombatSet::Input, CombatSet::Action)
                .chain()
                .run_if(in_state(GameState::InGame))
                .run_if(in_state(PlayState::Exploring)),
        )

        // Input systems
        .add_systems(
            Update,
            (update_input_gate, toggle_weapon_prop).in_set(CombatSet::Input),
        )

        // Action systems
        .add_systems(Update, tick_attack_channels.in_set(CombatSet::Action));
}

/// Open the attack input gate once the mouse buttons are released.
fn update_input_gate(
    mouse: Res<ButtonInput<MouseButton>>,
    mut query: Query<&mut AttackInputGate, With<Player>>,
) {
    let held = AttackChannel::ALL
        .iter()
        .any(|channel| mouse.pressed(channel.button()));

    for mut gate in query.iter_mut() {
        if gate.is_open() {
            continue;
        }
        gate.update(held);
        if gate.is_open() {
            debug!("Attack input unblocked (mouse released)");
        }
    }
}

/// Feed attack edges into both combo channels and apply the resulting effects.
fn tick_attack_channels(
    time: Res<Time>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut player_query: Query<
        (&mut AttackChannels, &mut Animator, &AttackInputGate, Option<&WeaponProp>),
        With<Player>,
    >,
    mut visibility_query: Query<&mut Visibility>,
) {
    let dt = time.delta_secs();

    for (mut channels, mut animator, gate, weapon) in player_query.iter_mut() {
        for channel in AttackChannel::ALL {
            let edge = gate.is_open() && mouse.just_pressed(channel.button());
            let effects = channels.get_mut(channel).on_tick(dt, edge);

            for effect in effects {
                apply_combo_effect(channel, effect, &mut animator);
                if channel.uses_weapon_prop() {
                    if let Some(visible) = weapon_visibility_for(effect) {
                        set_weapon_visible(weapon, &mut visibility_query, visible);
                    }
                }
            }

            let weight = if channels.get(channel).is_attacking() { 1.0 } else { 0.0 };
            animator.set_layer_weight(channel.layer(), weight);
        }
    }
}

/// Translate a combo effect into animation parameter writes.
pub fn apply_combo_effect(channel: AttackChannel, effect: ComboEffect, animator: &mut Animator) {
    match effect {
        ComboEffect::Strike { combo_index } => {
            animator.set_integer(params::COMBO_INDEX, i32::from(combo_index));
            animator.set_trigger(channel.trigger());
        }
        ComboEffect::Finish | ComboEffect::ForceIdle => {
            animator.set_integer(params::COMBO_INDEX, 0);
        }
        ComboEffect::Unlocked => {
            debug!("{:?} animation unlocked, ready for next attack", channel);
        }
    }
}

/// Whether the weapon prop should be shown (Some(true)) or hidden after an effect.
pub fn weapon_visibility_for(effect: ComboEffect) -> Option<bool> {
    match effect {
        ComboEffect::Strike { .. } => Some(true),
        ComboEffect::Finish | ComboEffect::ForceIdle => Some(false),
        ComboEffect::Unlocked => None,
    }
}

/// Force idle parameters for a channel (used when restoring a save).
pub fn reset_channel_animation(channel: AttackChannel, animator: &mut Animator) {
    animator.reset_trigger(channel.trigger());
    animator.set_integer(params::COMBO_INDEX, 0);
    animator.set_layer_weight(channel.layer(), 0.0);
}

/// Show or hide the weapon prop, if the character has one.
pub fn set_weapon_visible<F: bevy::ecs::query::QueryFilter>(
    weapon: Option<&WeaponProp>,
    visibility_query: &mut Query<&mut Visibility, F>,
    visible: bool,
) {
    let Some(weapon) = weapon else {
        return;
    };
    if let Ok(mut visibility) = visibility_query.get_mut(weapon.entity) {
        *visibility = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

/// Toggle the weapon prop with T.
fn toggle_weapon_prop(
    keyboard: Res<ButtonInput<KeyCode>>,
    player_query: Query<&WeaponProp, With<Player>>,
    mut visibility_query: Query<&mut Visibility>,
) {
    if !keyboard.just_pressed(KeyCode::KeyT) {
        return;
    }
    for weapon in player_query.iter() {
        if let Ok(mut visibility) = visibility_query.get_mut(weapon.entity) {
            *visibility = match *visibility {
                Visibility::Hidden => Visibility::Inherited,
                _ => Visibility::Hidden,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strike_sets_index_and_trigger() {
        let mut animator = Animator::default();
        apply_combo_effect(
            AttackChannel::Magical,
            ComboEffect::Strike { combo_index: 2 },
            &mut animator,
        );
        assert_eq!(animator.get_integer(params::COMBO_INDEX), 2);
        assert!(animator.is_trigger_set("MagicAttack"));
        assert!(!animator.is_trigger_set("PhysicalAttack"));
    }

    #[test]
    fn force_idle_clears_index() {
        let mut animator = Animator::default();
        animator.set_integer(params::COMBO_INDEX, 3);
        apply_combo_effect(AttackChannel::Physical, ComboEffect::ForceIdle, &mut animator);
        assert_eq!(animator.get_integer(params::COMBO_INDEX), 0);
    }

    #[test]
    fn reset_channel_animation_clears_layer_and_trigger() {
        let mut animator = Animator::default();
        animator.set_trigger("PhysicalAttack");
        animator.set_layer_weight("Physical Layer", 1.0);
        animator.set_integer(params::COMBO_INDEX, 2);

        reset_channel_animation(AttackChannel::Physical, &mut animator);

        assert!(!animator.is_trigger_set("PhysicalAttack"));
        assert_eq!(animator.layer_weight("Physical Layer"), 0.0);
        assert_eq!(animator.get_integer(params::COMBO_INDEX), 0);
    }

    #[test]
    fn weapon_follows_strike_and_idle() {
        assert_eq!(weapon_visibility_for(ComboEffect::Strike { combo_index: 1 }), Some(true));
        assert_eq!(weapon_visibility_for(ComboEffect::Finish), Some(false));
        assert_eq!(weapon_visibility_for(ComboEffect::ForceIdle), Some(false));
        assert_eq!(weapon_visibility_for(ComboEffect::Unlocked), None);
    }
}
