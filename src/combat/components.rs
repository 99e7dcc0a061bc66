//! Combat-related components.

use std::time::Duration;

use bevy::prelude::*;

use crate::core::ComboConfig;

/// An independent attack track with its own combo progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackChannel {
    /// Scythe swings (left mouse)
    Physical,
    /// Spell casts (right mouse)
    Magical,
}

impl AttackChannel {
    pub const ALL: [AttackChannel; 2] = [AttackChannel::Physical, AttackChannel::Magical];

    /// Animation layer that plays this channel's attacks.
    pub fn layer(self) -> &'static str {
        match self {
            AttackChannel::Physical => "Physical Layer",
            AttackChannel::Magical => "Magic Layer",
        }
    }

    /// Animation trigger fired on every combo step.
    pub fn trigger(self) -> &'static str {
        match self {
            AttackChannel::Physical => "PhysicalAttack",
            AttackChannel::Magical => "MagicAttack",
        }
    }

    pub fn button(self) -> MouseButton {
        match self {
            AttackChannel::Physical => MouseButton::Left,
            AttackChannel::Magical => MouseButton::Right,
        }
    }

    /// Whether this channel shows the weapon prop while attacking.
    pub fn uses_weapon_prop(self) -> bool {
        matches!(self, AttackChannel::Physical)
    }
}

/// Something the animation layer has to do after a combo tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboEffect {
    /// An attack was accepted and advanced the combo to this step.
    Strike { combo_index: u8 },
    /// The last step was pressed again; the chain ended early.
    Finish,
    /// The reset window ran out; force the idle animation.
    ForceIdle,
    /// The animation lock was released.
    Unlocked,
}

/// Combo progression, animation lockout and timeout decay for one channel.
///
/// `combo_index` counts accepted attacks in the current chain (0 = idle).
/// An accepted attack locks further input for `animation_length` seconds
/// and restarts the `reset_window` countdown; when that countdown expires
/// the channel drops back to idle.
#[derive(Debug, Clone)]
pub struct ComboAttackState {
    combo_index: u8,
    combo_timer: f32,
    is_attacking: bool,
    is_locked: bool,
    /// Pending unlock callback (game time). `None` when nothing is scheduled.
    unlock: Option<Timer>,
    reset_window: f32,
    animation_length: f32,
    max_combo: u8,
}

impl Default for ComboAttackState {
    fn default() -> Self {
        Self::new(&ComboConfig::default())
    }
}

impl ComboAttackState {
    pub fn new(config: &ComboConfig) -> Self {
        let config = config.validated();
        Self {
            combo_index: 0,
            combo_timer: 0.0,
            is_attacking: false,
            is_locked: false,
            unlock: None,
            reset_window: config.reset_window,
            animation_length: config.animation_length,
            max_combo: config.max_combo,
        }
    }

    pub fn combo_index(&self) -> u8 {
        self.combo_index
    }

    pub fn combo_timer(&self) -> f32 {
        self.combo_timer
    }

    pub fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn has_pending_unlock(&self) -> bool {
        self.unlock.is_some()
    }

    /// Advance timers by `dt` seconds and process this frame's input edge.
    pub fn on_tick(&mut self, dt: f32, attack_input_edge: bool) -> Vec<ComboEffect> {
        let dt = dt.max(0.0);
        let mut effects = Vec::new();

        if let Some(unlock) = self.unlock.as_mut() {
            unlock.tick(Duration::from_secs_f32(dt));
            if unlock.finished() {
                self.unlock = None;
                self.on_animation_unlock_timeout();
                effects.push(ComboEffect::Unlocked);
            }
        }

        if self.combo_timer > 0.0 {
            self.combo_timer -= dt;
            if self.combo_timer <= 0.0 {
                self.reset();
                effects.push(ComboEffect::ForceIdle);
            }
        }

        if attack_input_edge && !self.is_locked {
            if self.combo_index == 0 {
                self.is_attacking = true;
            }
            if self.combo_index < self.max_combo {
                self.combo_index += 1;
                self.combo_timer = self.reset_window;
                self.is_locked = true;
                self.unlock = Some(Timer::from_seconds(self.animation_length, TimerMode::Once));
                effects.push(ComboEffect::Strike {
                    combo_index: self.combo_index,
                });
            } else {
                self.reset();
                effects.push(ComboEffect::Finish);
            }
        }

        effects
    }

    /// Release the animation lock.
    pub fn on_animation_unlock_timeout(&mut self) {
        self.is_locked = false;
    }

    /// Force idle and cancel any pending unlock. Safe to call at any time.
    pub fn reset(&mut self) {
        self.combo_index = 0;
        self.combo_timer = 0.0;
        self.is_attacking = false;
        self.is_locked = false;
        self.unlock = None;
    }

    /// Overwrite the visible attack flags from a save file.
    ///
    /// Does not lock input or start timers, so the result is not consistent
    /// until the caller runs [`ComboAttackState::reset`].
    pub(crate) fn restore_flags(&mut self, is_attacking: bool, combo_index: u8) {
        self.is_attacking = is_attacking || combo_index > 0;
        self.combo_index = combo_index.min(self.max_combo);
    }

    /// Whether the idle/timer invariants currently hold.
    pub fn is_consistent(&self) -> bool {
        let index_ok = self.combo_index <= self.max_combo;
        let attacking_ok = self.combo_index == 0 || self.is_attacking;
        let idle_ok = self.combo_timer > 0.0
            || (self.combo_index == 0 && !self.is_attacking && !self.is_locked);
        index_ok && attacking_ok && idle_ok
    }
}

/// Both attack channels of a character.
#[derive(Component, Debug, Clone, Default)]
pub struct AttackChannels {
    pub physical: ComboAttackState,
    pub magical: ComboAttackState,
}

impl AttackChannels {
    pub fn new(config: &ComboConfig) -> Self {
        Self {
            physical: ComboAttackState::new(config),
            magical: ComboAttackState::new(config),
        }
    }

    pub fn get(&self, channel: AttackChannel) -> &ComboAttackState {
        match channel {
            AttackChannel::Physical => &self.physical,
            AttackChannel::Magical => &self.magical,
        }
    }

    pub fn get_mut(&mut self, channel: AttackChannel) -> &mut ComboAttackState {
        match channel {
            AttackChannel::Physical => &mut self.physical,
            AttackChannel::Magical => &mut self.magical,
        }
    }

    pub fn reset_all(&mut self) {
        self.physical.reset();
        self.magical.reset();
    }
}

/// The weapon model shown while the physical channel attacks.
#[derive(Component, Debug, Clone, Copy)]
pub struct WeaponProp {
    pub entity: Entity,
}

/// Blocks attack input after a scene load until the mouse is released,
/// so the click that closed a menu does not start a combo.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttackInputGate {
    /// Let UI clicks of the spawn frame settle first
    #[default]
    AwaitFrame,
    /// Waiting for both attack buttons to be up
    AwaitRelease,
    Open,
}

impl AttackInputGate {
    /// Advance the gate given whether any attack button is held.
    pub fn update(&mut self, any_button_held: bool) {
        *self = match *self {
            AttackInputGate::AwaitFrame => AttackInputGate::AwaitRelease,
            AttackInputGate::AwaitRelease if !any_button_held => AttackInputGate::Open,
            other => other,
        };
    }

    pub fn is_open(&self) -> bool {
        matches!(self, AttackInputGate::Open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn state() -> ComboAttackState {
        ComboAttackState::default()
    }

    /// Tick in small steps for `seconds` without input.
    fn idle_for(state: &mut ComboAttackState, seconds: f32) -> Vec<ComboEffect> {
        let mut effects = Vec::new();
        let mut elapsed = 0.0;
        while elapsed < seconds {
            effects.extend(state.on_tick(FRAME, false));
            elapsed += FRAME;
        }
        effects
    }

    #[test]
    fn first_press_starts_combo() {
        let mut combo = state();
        let effects = combo.on_tick(FRAME, true);

        assert_eq!(effects, vec![ComboEffect::Strike { combo_index: 1 }]);
        assert!(combo.is_attacking());
        assert!(combo.is_locked());
        assert_eq!(combo.combo_index(), 1);
        assert_eq!(combo.combo_timer(), 1.0);
        assert!(combo.has_pending_unlock());
    }

    #[test]
    fn input_is_ignored_while_locked() {
        let mut combo = state();
        combo.on_tick(FRAME, true);
        let effects = combo.on_tick(FRAME, true);

        assert!(effects.is_empty());
        assert_eq!(combo.combo_index(), 1);
    }

    #[test]
    fn unlock_fires_after_animation_length() {
        let mut combo = state();
        combo.on_tick(FRAME, true);

        let effects = idle_for(&mut combo, 0.45);
        assert!(!effects.contains(&ComboEffect::Unlocked));
        assert!(combo.is_locked());

        let effects = idle_for(&mut combo, 0.1);
        assert!(effects.contains(&ComboEffect::Unlocked));
        assert!(!combo.is_locked());
        assert!(combo.is_attacking());
    }

    #[test]
    fn full_chain_then_fourth_press_finishes() {
        let mut combo = state();
        for step in 1..=3 {
            let effects = combo.on_tick(FRAME, true);
            assert_eq!(effects, vec![ComboEffect::Strike { combo_index: step }]);
            idle_for(&mut combo, 0.55);
        }

        let effects = combo.on_tick(FRAME, true);
        assert_eq!(effects, vec![ComboEffect::Finish]);
        assert_eq!(combo.combo_index(), 0);
        assert!(!combo.is_attacking());
        assert!(!combo.is_locked());
    }

    #[test]
    fn combo_resets_after_window_without_input() {
        let mut combo = state();
        combo.on_tick(FRAME, true);

        let effects = idle_for(&mut combo, 1.05);
        assert!(effects.contains(&ComboEffect::ForceIdle));
        assert_eq!(combo.combo_index(), 0);
        assert!(!combo.is_attacking());
        assert!(!combo.is_locked());
    }

    #[test]
    fn accepted_press_restarts_reset_window() {
        let mut combo = state();
        combo.on_tick(FRAME, true);
        idle_for(&mut combo, 0.8);
        combo.on_tick(FRAME, true);
        idle_for(&mut combo, 0.8);

        assert_eq!(combo.combo_index(), 2);
        assert!(combo.is_attacking());
    }

    #[test]
    fn reset_mid_lock_cancels_pending_unlock() {
        let mut combo = state();
        combo.on_tick(FRAME, true);
        combo.reset();

        assert_eq!(combo.combo_index(), 0);
        assert!(!combo.is_attacking());
        assert!(!combo.is_locked());
        assert!(!combo.has_pending_unlock());

        // The cancelled unlock never fires later
        let effects = idle_for(&mut combo, 2.0);
        assert!(effects.is_empty());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut combo = state();
        combo.reset();
        combo.reset();
        assert!(combo.is_consistent());
        assert_eq!(combo.combo_index(), 0);
    }

    #[test]
    fn press_after_reset_starts_fresh_combo() {
        let mut combo = state();
        combo.on_tick(FRAME, true);
        combo.reset();
        let effects = combo.on_tick(FRAME, true);
        assert_eq!(effects, vec![ComboEffect::Strike { combo_index: 1 }]);
    }

    #[test]
    fn index_stays_in_range_for_any_input_pattern() {
        let mut combo = state();
        // Deterministic pseudo-random press pattern and frame times
        let mut seed: u32 = 0x9E37_79B9;
        for _ in 0..5_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let pressed = seed % 3 == 0;
            let dt = 0.005 + (seed % 50) as f32 / 1000.0;

            let before = combo.combo_index();
            let was_locked = combo.is_locked();
            let effects = combo.on_tick(dt, pressed);

            assert!(combo.combo_index() <= 3);
            assert!(combo.is_consistent(), "inconsistent state: {combo:?}");
            if combo.combo_index() > before {
                assert!(pressed);
                assert!(effects
                    .iter()
                    .any(|e| matches!(e, ComboEffect::Strike { .. })));
                // Advancing requires the lock to have been released this frame or earlier
                assert!(!was_locked || effects.contains(&ComboEffect::Unlocked));
            }
        }
    }

    #[test]
    fn restore_flags_does_not_lock() {
        let mut combo = state();
        combo.restore_flags(true, 2);
        assert_eq!(combo.combo_index(), 2);
        assert!(combo.is_attacking());
        assert!(!combo.is_locked());
        assert!(!combo.has_pending_unlock());

        combo.reset();
        assert!(combo.is_consistent());
    }

    #[test]
    fn zero_reset_window_still_decays_to_idle() {
        let mut combo = ComboAttackState::new(&ComboConfig {
            reset_window: 0.0,
            ..ComboConfig::default()
        });
        combo.on_tick(FRAME, true);
        assert!(combo.combo_timer() > 0.0);

        let effects = idle_for(&mut combo, 1.05);
        assert!(effects.contains(&ComboEffect::ForceIdle));
        assert_eq!(combo.combo_index(), 0);
        assert!(!combo.is_attacking());
        assert!(combo.is_consistent());
    }

    #[test]
    fn negative_animation_length_does_not_panic() {
        let mut combo = ComboAttackState::new(&ComboConfig {
            animation_length: -1.0,
            ..ComboConfig::default()
        });
        combo.on_tick(FRAME, true);
        let effects = idle_for(&mut combo, 0.55);
        assert!(effects.contains(&ComboEffect::Unlocked));
    }

    #[test]
    fn oversized_max_combo_is_capped_at_three() {
        let mut combo = ComboAttackState::new(&ComboConfig {
            max_combo: 5,
            ..ComboConfig::default()
        });
        for _ in 0..3 {
            combo.on_tick(FRAME, true);
            idle_for(&mut combo, 0.55);
        }
        assert_eq!(combo.combo_index(), 3);

        let effects = combo.on_tick(FRAME, true);
        assert_eq!(effects, vec![ComboEffect::Finish]);
        assert_eq!(combo.combo_index(), 0);
    }

    #[test]
    fn input_gate_waits_for_release() {
        let mut gate = AttackInputGate::default();
        gate.update(false);
        assert!(!gate.is_open());
        gate.update(true);
        assert!(!gate.is_open());
        gate.update(false);
        assert!(gate.is_open());
        gate.update(true);
        assert!(gate.is_open());
    }

    #[test]
    fn channels_have_distinct_identity() {
        assert_ne!(AttackChannel::Physical.layer(), AttackChannel::Magical.layer());
        assert_ne!(AttackChannel::Physical.trigger(), AttackChannel::Magical.trigger());
        assert!(AttackChannel::Physical.uses_weapon_prop());
        assert!(!AttackChannel::Magical.uses_weapon_prop());
    }
}
