//! Frame construction
//!
//! Turns a [`GameState`] into an ordered list of sprite draws. Later commands
//! paint over earlier ones.

use serde::Serialize;

use crate::consts::DEATH_HIDE_SHIP_AT;
use crate::sim::entities::{HazardRank, PickupKind};
use crate::sim::geometry::Rect;
use crate::sim::state::{BossEncounter, GameState, RunPhase};

/// Which image a command draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteKind {
    Background,
    Spaceship,
    Rocket,
    HostileRocket,
    Comet,
    GoldComet,
    Boss { open: bool },
    Explosion,
    ExtraRocketPickup,
    RadiusBoostPickup,
}

/// One sprite blit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawCommand {
    pub sprite: SpriteKind,
    pub dest: Rect,
    /// Clockwise degrees about the centre
    pub rotation: Option<f32>,
    /// Sheet frame for animated sprites
    pub frame: Option<usize>,
}

impl DrawCommand {
    fn sprite(sprite: SpriteKind, dest: Rect) -> Self {
        Self {
            sprite,
            dest,
            rotation: None,
            frame: None,
        }
    }
}

/// Everything the rasterizer needs for one presented frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
    /// HUD score readout
    pub score: u64,
}

/// Whether the ship is still drawn
pub fn ship_visible(state: &GameState) -> bool {
    match state.phase {
        RunPhase::Alive | RunPhase::Victory => true,
        RunPhase::Dying { countdown } => countdown > DEATH_HIDE_SHIP_AT,
        RunPhase::GameOver => false,
    }
}

/// Build the draw list for the current state
pub fn build_frame(state: &GameState) -> Frame {
    let mut commands = Vec::with_capacity(
        3 + state.projectiles.len() + state.hazards.len() + state.effects.len() + state.pickups.len(),
    );

    // Two stacked copies of the background scroll down and wrap
    let width = state.settings.playfield_width;
    let height = state.settings.background_height;
    let offset = state.background_offset;
    commands.push(DrawCommand::sprite(
        SpriteKind::Background,
        Rect::new(0, offset, width, height),
    ));
    commands.push(DrawCommand::sprite(
        SpriteKind::Background,
        Rect::new(0, offset - height, width, height),
    ));

    if ship_visible(state) {
        commands.push(DrawCommand::sprite(
            SpriteKind::Spaceship,
            state.spaceship.bounds(),
        ));
    }

    for rocket in &state.projectiles {
        let sprite = if rocket.is_friendly() {
            SpriteKind::Rocket
        } else {
            SpriteKind::HostileRocket
        };
        commands.push(DrawCommand {
            rotation: Some(rocket.rotation_degrees()),
            ..DrawCommand::sprite(sprite, rocket.bounds())
        });
    }

    for hazard in &state.hazards {
        let sprite = match hazard.rank {
            HazardRank::Common => SpriteKind::Comet,
            HazardRank::Rare => SpriteKind::GoldComet,
        };
        commands.push(DrawCommand::sprite(sprite, hazard.bounds()));
    }

    if let BossEncounter::Active(boss) = &state.boss {
        if !boss.is_destroyed() {
            commands.push(DrawCommand::sprite(
                SpriteKind::Boss { open: boss.is_open },
                boss.bounds(),
            ));
        }
    }

    for effect in &state.effects {
        commands.push(DrawCommand {
            frame: Some(effect.animation.current_frame()),
            ..DrawCommand::sprite(SpriteKind::Explosion, effect.area)
        });
    }

    for pickup in &state.pickups {
        let sprite = match pickup.kind {
            PickupKind::ExtraRocket => SpriteKind::ExtraRocketPickup,
            PickupKind::RadiusBoost => SpriteKind::RadiusBoostPickup,
        };
        commands.push(DrawCommand::sprite(sprite, pickup.bounds()));
    }

    Frame {
        commands,
        score: state.score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{GameVariant, Settings};
    use crate::sim::boss::Boss;
    use glam::IVec2;

    fn state() -> GameState {
        GameState::new(Settings::for_variant(GameVariant::Classic), 7)
    }

    fn sprites(frame: &Frame) -> Vec<SpriteKind> {
        frame.commands.iter().map(|c| c.sprite).collect()
    }

    #[test]
    fn test_empty_frame_is_background_and_ship() {
        let frame = build_frame(&state());
        assert_eq!(
            sprites(&frame),
            vec![
                SpriteKind::Background,
                SpriteKind::Background,
                SpriteKind::Spaceship
            ]
        );
        assert_eq!(frame.commands[0].dest, Rect::new(0, 0, 800, 600));
        assert_eq!(frame.commands[1].dest, Rect::new(0, -600, 800, 600));
        assert_eq!(frame.score, 0);
    }

    #[test]
    fn test_background_follows_scroll() {
        let mut state = state();
        state.background_offset = 120;
        let frame = build_frame(&state);
        assert_eq!(frame.commands[0].dest.y, 120);
        assert_eq!(frame.commands[1].dest.y, -480);
    }

    #[test]
    fn test_ship_hidden_late_in_death_sequence() {
        let mut state = state();
        state.phase = RunPhase::Dying { countdown: 51 };
        assert!(ship_visible(&state));
        state.phase = RunPhase::Dying { countdown: 50 };
        assert!(!ship_visible(&state));
        state.phase = RunPhase::GameOver;
        assert!(!sprites(&build_frame(&state)).contains(&SpriteKind::Spaceship));
    }

    #[test]
    fn test_layer_order_and_sprites() {
        let mut state = state();
        state.score = 40;
        state.try_fire();
        state.fire_hostile(IVec2::new(400, 100), IVec2::new(400, 500));
        let id = state.next_entity_id();
        state.hazards.push(crate::sim::entities::Hazard {
            id,
            pos: IVec2::new(100, 100),
            velocity: IVec2::new(0, 3),
            size: 80,
            rank: HazardRank::Rare,
        });
        state.apply_pickup(PickupKind::ExtraRocket);
        let id = state.next_entity_id();
        state.pickups.push(crate::sim::entities::Pickup {
            id,
            pos: IVec2::new(300, 300),
            kind: PickupKind::RadiusBoost,
        });
        state.spawn_effect(Rect::new(10, 10, 50, 50));
        state.boss = BossEncounter::Active(Boss::spawn(800, 500, 50));

        let frame = build_frame(&state);
        assert_eq!(
            sprites(&frame)[2..],
            [
                SpriteKind::Spaceship,
                SpriteKind::Rocket,
                SpriteKind::HostileRocket,
                SpriteKind::GoldComet,
                SpriteKind::Boss { open: false },
                SpriteKind::Explosion,
                SpriteKind::RadiusBoostPickup,
            ]
        );
        assert_eq!(frame.score, 40);

        let rocket = &frame.commands[3];
        assert_eq!(rocket.rotation, Some(0.0));
        let hostile = &frame.commands[4];
        assert_eq!(hostile.rotation.map(|r| r.round()), Some(180.0));
        let explosion = &frame.commands[7];
        assert_eq!(explosion.frame, Some(0));
    }
}
