//! Frame-rate independent transform smoothing used by the follow camera.

use bevy::prelude::*;

/// Component for smooth transform interpolation.
#[derive(Component)]
pub struct SmoothTransform {
    /// Target translation (None = don't animate)
    pub target_translation: Option<Vec3>,
    /// Point to keep facing (None = keep current rotation)
    pub look_at: Option<Vec3>,
    /// Interpolation speed multiplier (higher = faster)
    pub translation_speed: f32,
}

impl Default for SmoothTransform {
    fn default() -> Self {
        Self {
            target_translation: None,
            look_at: None,
            translation_speed: 7.5,
        }
    }
}

impl SmoothTransform {
    pub fn new(translation_speed: f32) -> Self {
        Self {
            translation_speed,
            ..default()
        }
    }
}

/// Interpolation factor for one frame, clamped so large frames snap.
pub fn lerp_factor(speed: f32, dt: f32) -> f32 {
    (speed * dt).clamp(0.0, 1.0)
}

/// System that interpolates transforms toward their targets.
pub fn update_smooth_transforms(
    time: Res<Time>,
    mut query: Query<(&mut Transform, &SmoothTransform)>,
) {
    let dt = time.delta_secs();

    for (mut transform, smooth) in query.iter_mut() {
        if let Some(target) = smooth.target_translation {
            let t = lerp_factor(smooth.translation_speed, dt);
            transform.translation = transform.translation.lerp(target, t);
        }

        if let Some(focus) = smooth.look_at {
            if focus != transform.translation {
                transform.look_at(focus, Vec3::Y);
            }
        }
    }
}
