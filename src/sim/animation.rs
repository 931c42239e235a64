//! Frame/delay sequencer for explosion effects

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::consts::ANIMATION_STEP_MS;

/// Frame table of an animation: how many frames and how long each is shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationSheet {
    pub frame_count: usize,
    /// Display time of each frame in milliseconds
    pub frame_delays_ms: Vec<u32>,
}

impl Default for AnimationSheet {
    fn default() -> Self {
        Self::uniform(12, 30)
    }
}

impl AnimationSheet {
    /// `frame_count` frames that all share the same delay
    pub fn uniform(frame_count: usize, delay_ms: u32) -> Self {
        Self {
            frame_count,
            frame_delays_ms: vec![delay_ms; frame_count],
        }
    }

    /// Delay of `frame`, clamped to the last entry if the delay table is short
    pub fn delay_of(&self, frame: usize) -> u32 {
        self.frame_delays_ms
            .get(frame)
            .or_else(|| self.frame_delays_ms.last())
            .copied()
            .unwrap_or(0)
    }

    pub fn last_frame(&self) -> usize {
        self.frame_count.saturating_sub(1)
    }
}

/// A running instance of an [`AnimationSheet`]
#[derive(Debug, Clone)]
pub struct Animation {
    sheet: Arc<AnimationSheet>,
    current_frame: usize,
    frame_timer_ms: u32,
}

impl Animation {
    pub fn new(sheet: Arc<AnimationSheet>) -> Self {
        Self {
            sheet,
            current_frame: 0,
            frame_timer_ms: 0,
        }
    }

    /// Advance the animation clock by one tick
    pub fn update(&mut self) {
        if self.sheet.frame_count == 0 {
            return;
        }
        self.frame_timer_ms += ANIMATION_STEP_MS;
        if self.frame_timer_ms >= self.sheet.delay_of(self.current_frame) {
            self.frame_timer_ms = 0;
            self.current_frame = (self.current_frame + 1) % self.sheet.frame_count;
        }
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// An empty sheet counts as finished
    pub fn is_last_frame(&self) -> bool {
        self.current_frame >= self.sheet.last_frame()
    }
}
