//! Capturing a [`SaveRecord`] from live player components.

use bevy::prelude::*;

use super::error::SessionError;
use super::record::SaveRecord;
use crate::animation::{params, Animator};
use crate::combat::AttackChannels;
use crate::player::{PlayerStats, WaterState};

/// Borrowed view of the components a save needs. Any of them may be absent.
#[derive(Default, Clone, Copy)]
pub struct PlayerView<'a> {
    pub transform: Option<&'a Transform>,
    pub stats: Option<&'a PlayerStats>,
    pub water: Option<&'a WaterState>,
    pub channels: Option<&'a AttackChannels>,
    pub animator: Option<&'a Animator>,
}

/// Build a record for `scene_name`, or list what is missing.
pub fn capture_record(scene_name: &str, view: PlayerView) -> Result<SaveRecord, SessionError> {
    let (Some(transform), Some(stats), Some(water), Some(channels), Some(animator)) =
        (view.transform, view.stats, view.water, view.channels, view.animator)
    else {
        let missing: Vec<&'static str> = [
            ("Transform", view.transform.is_none()),
            ("PlayerStats", view.stats.is_none()),
            ("WaterState", view.water.is_none()),
            ("AttackChannels", view.channels.is_none()),
            ("Animator", view.animator.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect();
        return Err(SessionError::IncompleteState(missing));
    };

    Ok(SaveRecord {
        save_name: None,
        timestamp: String::new(),
        sequence: 0,
        scene_name: scene_name.to_string(),
        player_position: transform.translation.into(),
        is_running: animator.get_bool(params::IS_RUNNING),
        is_swimming: water.is_swimming,
        is_floating: animator.get_bool(params::IS_FLOATING),
        is_physical_attacking: channels.physical.is_attacking(),
        physical_combo_index: channels.physical.combo_index(),
        is_magical_attacking: channels.magical.is_attacking(),
        magical_combo_index: channels.magical.combo_index(),
        health: stats.current_health,
        mana: stats.current_mana,
    })
}
