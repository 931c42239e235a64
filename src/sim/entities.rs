//! Per-entity state and motion rules
//!
//! No entity reads another entity while advancing; interactions all happen
//! in the collision pass.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::animation::Animation;
use super::geometry::Rect;
use crate::consts::*;

/// The player's craft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spaceship {
    pub pos: IVec2,
    /// Per-tick step on each axis
    pub direction: IVec2,
}

impl Spaceship {
    /// Spawn centred at the bottom of the playfield
    pub fn new(playfield_width: i32, playfield_height: i32) -> Self {
        Self {
            pos: IVec2::new(
                playfield_width / 2 - SHIP_SIZE / 2,
                playfield_height - SHIP_START_BOTTOM_OFFSET,
            ),
            direction: IVec2::ZERO,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::at(self.pos, IVec2::splat(SHIP_SIZE))
    }

    pub fn center(&self) -> IVec2 {
        self.bounds().center()
    }

    /// Set the movement intent, clamped to one step per axis
    pub fn steer(&mut self, intent: IVec2) {
        self.direction = intent.clamp(IVec2::splat(-SHIP_STEP), IVec2::splat(SHIP_STEP));
    }

    /// Slow to a third of the current intent (integer truncation)
    pub fn dampen(&mut self) {
        self.direction /= 3;
    }

    pub fn halt(&mut self) {
        self.direction = IVec2::ZERO;
    }

    /// Move one step and clamp to the playfield
    pub fn advance(&mut self, playfield_width: i32, playfield_height: i32) {
        let next = self.pos + self.direction;
        let max = IVec2::new(
            (playfield_width - SHIP_SIZE).max(0),
            (playfield_height - SHIP_SIZE).max(0),
        );
        self.pos = next.clamp(IVec2::ZERO, max);
    }

    /// Where a freshly fired rocket appears
    pub fn muzzle(&self) -> IVec2 {
        self.pos + IVec2::new(20, -10)
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Boss,
}

/// A rocket
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u32,
    pub pos: IVec2,
    /// Unit direction of travel
    pub direction: Vec2,
    /// Integer step per tick derived from direction and speed
    pub velocity: IVec2,
    /// Fixed at creation; later radius changes do not affect it
    pub explosion_radius: i32,
    pub owner: Owner,
}

impl Projectile {
    /// A player rocket flying straight up from `pos`
    pub fn friendly(id: u32, pos: IVec2, explosion_radius: i32) -> Self {
        Self::new(id, pos, Vec2::NEG_Y, ROCKET_SPEED, explosion_radius, Owner::Player)
    }

    /// A boss rocket launched from `origin` (top centre) toward `target`
    pub fn hostile(id: u32, origin: IVec2, target: IVec2, explosion_radius: i32) -> Self {
        let aim = (target - origin).as_vec2();
        let direction = aim.try_normalize().unwrap_or(Vec2::Y);
        let pos = origin - IVec2::new(ROCKET_WIDTH / 2, 0);
        Self::new(id, pos, direction, HOSTILE_ROCKET_SPEED, explosion_radius, Owner::Boss)
    }

    fn new(
        id: u32,
        pos: IVec2,
        direction: Vec2,
        speed: f32,
        explosion_radius: i32,
        owner: Owner,
    ) -> Self {
        Self {
            id,
            pos,
            direction,
            velocity: (direction * speed).round().as_ivec2(),
            explosion_radius,
            owner,
        }
    }

    pub fn is_friendly(&self) -> bool {
        self.owner == Owner::Player
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, ROCKET_WIDTH, ROCKET_HEIGHT)
    }

    /// Square blast zone centred on the rocket, side = 2 × radius
    pub fn explosion_area(&self) -> Rect {
        let side = self.explosion_radius * 2;
        Rect::centered(self.bounds().center(), side, side)
    }

    pub fn advance(&mut self) {
        self.pos += self.velocity;
    }

    /// Player rockets only leave through the top; boss rockets through any edge plus a margin
    pub fn is_out_of_bounds(&self, playfield_width: i32, playfield_height: i32) -> bool {
        match self.owner {
            Owner::Player => self.pos.y < 0,
            Owner::Boss => {
                let b = self.bounds();
                let m = HOSTILE_ROCKET_MARGIN;
                b.top() > playfield_height + m
                    || b.bottom() < -m
                    || b.left() > playfield_width + m
                    || b.right() < -m
            }
        }
    }

    /// Sprite rotation in degrees, clockwise from pointing up
    pub fn rotation_degrees(&self) -> f32 {
        self.direction.x.atan2(-self.direction.y).to_degrees()
    }
}

/// Hazard rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HazardRank {
    #[default]
    Common,
    Rare,
}

impl HazardRank {
    /// Points awarded when a player rocket destroys the hazard
    pub fn points(&self) -> u64 {
        match self {
            HazardRank::Common => COMMON_HAZARD_SCORE,
            HazardRank::Rare => RARE_HAZARD_SCORE,
        }
    }
}

/// A comet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hazard {
    pub id: u32,
    pub pos: IVec2,
    pub velocity: IVec2,
    /// Side of the square bounding box, fixed at spawn
    pub size: i32,
    pub rank: HazardRank,
}

impl Hazard {
    pub fn bounds(&self) -> Rect {
        Rect::at(self.pos, IVec2::splat(self.size))
    }

    pub fn advance(&mut self) {
        self.pos += self.velocity;
    }

    pub fn is_out_of_bounds(&self, playfield_width: i32, playfield_height: i32) -> bool {
        self.pos.y > playfield_height
            || self.pos.x > playfield_width + HAZARD_SIDE_MARGIN
            || self.pos.x < -self.size - HAZARD_SIDE_MARGIN
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// +1 concurrent rocket, permanent
    ExtraRocket,
    /// Doubles the explosion radius for a while
    RadiusBoost,
}

/// A falling collectible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pickup {
    pub id: u32,
    pub pos: IVec2,
    pub kind: PickupKind,
}

impl Pickup {
    pub fn bounds(&self) -> Rect {
        Rect::at(self.pos, IVec2::splat(PICKUP_SIZE))
    }

    pub fn advance(&mut self) {
        self.pos.y += PICKUP_FALL_SPEED;
    }

    pub fn is_out_of_bounds(&self, playfield_height: i32) -> bool {
        self.pos.y > playfield_height
    }
}

/// An explosion; purely presentational
#[derive(Debug, Clone)]
pub struct VisualEffect {
    pub area: Rect,
    pub animation: Animation,
}

impl VisualEffect {
    pub fn new(area: Rect, animation: Animation) -> Self {
        Self { area, animation }
    }

    pub fn update(&mut self) {
        self.animation.update();
    }

    pub fn is_finished(&self) -> bool {
        self.animation.is_last_frame()
    }
}
