//! Applying a pending load once the player exists.
//!
//! A scene is built through `Commands`, so the player may not be queryable
//! when [`SceneLoaded`] arrives. The record is kept in [`PendingReconcile`]
//! and the lookup is retried on real time until it succeeds or the policy
//! runs out.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::applier::{apply_record, PlayerTarget};
use super::error::ReconcileError;
use super::record::SaveRecord;
use super::session::SessionManager;
use crate::animation::Animator;
use crate::combat::{set_weapon_visible, AttackChannels, WeaponProp};
use crate::core::{GameConfig, RetryOutcome, RetryPolicy, RetrySchedule, SceneLoaded, UiMessage};
use crate::player::{MovementState, Player, PlayerStats, WaterState};

/// A loaded record waiting for the player to appear.
#[derive(Resource, Debug)]
pub struct PendingReconcile {
    pub record: SaveRecord,
    pub schedule: RetrySchedule,
}

impl PendingReconcile {
    pub fn new(record: SaveRecord, policy: RetryPolicy) -> Self {
        Self {
            record,
            schedule: RetrySchedule::new(policy),
        }
    }
}

type PlayerTargetQuery = (
    &'static mut Transform,
    Option<&'static mut KinematicCharacterController>,
    &'static mut MovementState,
    &'static mut PlayerStats,
    &'static mut WaterState,
    &'static mut AttackChannels,
    &'static mut Animator,
    Option<&'static WeaponProp>,
);

/// Take the session's pending load when a scene finishes loading.
pub fn begin_reconcile(
    mut commands: Commands,
    mut loaded: EventReader<SceneLoaded>,
    mut session: ResMut<SessionManager>,
    config: Res<GameConfig>,
) {
    let Some(event) = loaded.read().last() else {
        return;
    };
    let Some(record) = session.take_pending_load() else {
        return;
    };

    if record.scene_name != event.name {
        warn!(
            "Discarding save for scene '{}' after loading '{}'",
            record.scene_name, event.name
        );
        return;
    }

    debug!("Reconciling loaded save into '{}'", event.name);
    commands.insert_resource(PendingReconcile::new(
        record,
        config.persistence.reconcile_policy(),
    ));
}

/// Try to apply the pending record to the player.
pub fn run_reconcile(
    mut commands: Commands,
    time: Res<Time<Real>>,
    pending: Option<ResMut<PendingReconcile>>,
    mut player_query: Query<PlayerTargetQuery, With<Player>>,
    mut visibility_query: Query<&mut Visibility, Without<Player>>,
    mut messages: EventWriter<UiMessage>,
) {
    let Some(mut pending) = pending else {
        return;
    };
    if !pending.schedule.tick(time.delta()) {
        return;
    }

    if let Ok((transform, controller, movement, stats, water, channels, animator, weapon)) =
        player_query.get_single_mut()
    {
        apply_record(
            &pending.record,
            PlayerTarget {
                transform: transform.into_inner(),
                controller: controller.map(Mut::into_inner),
                movement: movement.into_inner(),
                stats: stats.into_inner(),
                water: water.into_inner(),
                channels: channels.into_inner(),
                animator: animator.into_inner(),
            },
        );
        set_weapon_visible(weapon, &mut visibility_query, false);

        info!("Player state restored");
        messages.send(UiMessage::info("Game loaded"));
        commands.remove_resource::<PendingReconcile>();
        return;
    }

    match pending.schedule.fail() {
        RetryOutcome::Retrying {
            attempt,
            max_attempts,
        } => {
            warn!("Player not found (attempt {}/{})", attempt, max_attempts);
        }
        RetryOutcome::Exhausted { attempts } => {
            error!("{}", ReconcileError::LookupTimeout { attempts });
            messages.send(UiMessage::error("Could not restore saved state"));
            commands.remove_resource::<PendingReconcile>();
        }
    }
}

/// Drop any unfinished reconcile when leaving gameplay.
pub fn cancel_reconcile(mut commands: Commands) {
    commands.remove_resource::<PendingReconcile>();
}
