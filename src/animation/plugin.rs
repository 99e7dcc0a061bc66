//! Animation plugin - end-of-frame handling of animator parameters.

use bevy::prelude::*;

use super::Animator;

/// Animation plugin - consumes one-shot triggers once the frame is done.
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, consume_fired_triggers);
    }
}

/// Clear triggers armed during this frame so each fires exactly once.
pub fn consume_fired_triggers(mut query: Query<(Entity, &mut Animator)>) {
    for (entity, mut animator) in query.iter_mut() {
        if !animator.has_triggers() {
            continue;
        }
        for trigger in animator.take_triggers() {
            debug!("{:?} fired animation trigger {}", entity, trigger);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_are_cleared_after_the_frame() {
        let mut app = App::new();
        app.add_plugins(AnimationPlugin);

        let mut animator = Animator::default();
        animator.set_trigger("MagicAttack");
        let entity = app.world_mut().spawn(animator).id();

        app.update();

        let animator = app.world().get::<Animator>(entity).unwrap();
        assert!(!animator.is_trigger_set("MagicAttack"));
    }

    #[test]
    fn other_parameters_survive() {
        let mut app = App::new();
        app.add_plugins(AnimationPlugin);

        let mut animator = Animator::default();
        animator.set_trigger("PhysicalAttack");
        animator.set_integer("ComboIndex", 2);
        animator.set_layer_weight("Physical Layer", 1.0);
        let entity = app.world_mut().spawn(animator).id();

        app.update();

        let animator = app.world().get::<Animator>(entity).unwrap();
        assert_eq!(animator.get_integer("ComboIndex"), 2);
        assert_eq!(animator.layer_weight("Physical Layer"), 1.0);
    }
}
