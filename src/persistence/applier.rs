//! Applying a loaded [`SaveRecord`] to the live player.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::record::SaveRecord;
use crate::animation::{params, Animator};
use crate::combat::{reset_channel_animation, AttackChannel, AttackChannels};
use crate::player::{MovementState, PlayerStats, WaterState};

/// Mutable borrows of everything a load touches.
pub struct PlayerTarget<'a> {
    pub transform: &'a mut Transform,
    pub controller: Option<&'a mut KinematicCharacterController>,
    pub movement: &'a mut MovementState,
    pub stats: &'a mut PlayerStats,
    pub water: &'a mut WaterState,
    pub channels: &'a mut AttackChannels,
    pub animator: &'a mut Animator,
}

/// Write `record` onto the player and leave both attack channels idle.
///
/// The weapon prop is not reachable from here; callers hide it.
pub fn apply_record(record: &SaveRecord, target: PlayerTarget) {
    // Drop queued controller motion so the teleport sticks.
    target.transform.translation = record.player_position.into();
    if let Some(controller) = target.controller {
        controller.translation = None;
    }
    target.movement.vertical_velocity = 0.0;
    target.movement.is_grounded = false;

    target.stats.set_health(record.health);
    target.stats.set_mana(record.mana);

    target.water.is_swimming = record.is_swimming;
    target.water.was_swimming_last_frame = record.is_swimming;
    target.water.swim_smoothing = if record.is_swimming { 1.0 } else { 0.0 };
    target.animator.set_bool(params::IS_SWIMMING, record.is_swimming);
    target.animator.set_bool(params::IS_FLOATING, record.is_floating);
    target.animator.set_bool(params::IS_RUNNING, record.is_running);

    let saved = [
        (AttackChannel::Physical, record.is_physical_attacking, record.physical_combo_index),
        (AttackChannel::Magical, record.is_magical_attacking, record.magical_combo_index),
    ];
    for (channel, is_attacking, combo_index) in saved {
        let state = target.channels.get_mut(channel);
        state.restore_flags(is_attacking, combo_index);
        target
            .animator
            .set_integer(params::COMBO_INDEX, i32::from(state.combo_index()));
        let weight = if state.is_attacking() { 1.0 } else { 0.0 };
        target.animator.set_layer_weight(channel.layer(), weight);
    }

    // Saved attack flags are informational; never resume a swing on load.
    target.channels.reset_all();
    for channel in AttackChannel::ALL {
        reset_channel_animation(channel, target.animator);
    }
}
