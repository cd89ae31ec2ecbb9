//! Frame-timed animation descriptors
//!
//! Projectiles own and advance their own animation, decoupling visual
//! frame state from physics state. Descriptors come from the embedding
//! game through `AnimationProvider`.

use serde::{Deserialize, Serialize};

/// One animation frame: texture/atlas id plus how long it shows
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnimFrame {
    pub id: u32,
    pub duration: f32,
}

/// A frame-timed animation advanced by its owner once per frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation {
    frames: Vec<AnimFrame>,
    looped: bool,
    cursor: usize,
    elapsed: f32,
    finished: bool,
}

impl Animation {
    /// Frame durations are floored to a small positive value so a
    /// mis-authored zero-duration loop cannot spin forever.
    pub fn new(mut frames: Vec<AnimFrame>, looped: bool) -> Self {
        for frame in &mut frames {
            frame.duration = frame.duration.max(1e-4);
        }
        let finished = frames.is_empty();
        Self {
            frames,
            looped,
            cursor: 0,
            elapsed: 0.0,
            finished,
        }
    }

    /// A single static frame that is already finished. Used as the
    /// fallback when the provider has no animation for a key.
    pub fn still(id: u32) -> Self {
        Self {
            frames: vec![AnimFrame { id, duration: 1e-4 }],
            looped: false,
            cursor: 0,
            elapsed: 0.0,
            finished: true,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        if self.finished || self.frames.is_empty() {
            return;
        }
        self.elapsed += dt;
        while self.elapsed >= self.frames[self.cursor].duration {
            self.elapsed -= self.frames[self.cursor].duration;
            if self.cursor + 1 < self.frames.len() {
                self.cursor += 1;
            } else if self.looped {
                self.cursor = 0;
            } else {
                self.finished = true;
                return;
            }
        }
    }

    /// Current frame id (0 when the animation has no frames)
    pub fn current_frame(&self) -> u32 {
        self.frames.get(self.cursor).map(|f| f.id).unwrap_or(0)
    }

    /// A looping animation never finishes
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn restart(&mut self) {
        self.cursor = 0;
        self.elapsed = 0.0;
        self.finished = self.frames.is_empty();
    }
}

/// Maps a logical key (e.g. "finger_extend") to an animation descriptor.
/// Implemented by the embedding game's asset layer.
pub trait AnimationProvider {
    fn animation(&self, key: &str) -> Option<Animation>;
}

/// Provider with no animations; every lookup falls back to a still frame
pub struct NullAnimations;

impl AnimationProvider for NullAnimations {
    fn animation(&self, _key: &str) -> Option<Animation> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_frames(looped: bool) -> Animation {
        Animation::new(
            vec![
                AnimFrame { id: 10, duration: 0.1 },
                AnimFrame { id: 11, duration: 0.1 },
                AnimFrame { id: 12, duration: 0.1 },
            ],
            looped,
        )
    }

    #[test]
    fn test_advance_through_frames() {
        let mut anim = three_frames(false);
        assert_eq!(anim.current_frame(), 10);
        anim.advance(0.15);
        assert_eq!(anim.current_frame(), 11);
        anim.advance(0.1);
        assert_eq!(anim.current_frame(), 12);
        assert!(!anim.is_finished());
        anim.advance(0.1);
        assert!(anim.is_finished());
        // Finished animation holds its last frame
        assert_eq!(anim.current_frame(), 12);
    }

    #[test]
    fn test_looped_never_finishes() {
        let mut anim = three_frames(true);
        anim.advance(10.0);
        assert!(!anim.is_finished());
    }

    #[test]
    fn test_restart() {
        let mut anim = three_frames(false);
        anim.advance(1.0);
        assert!(anim.is_finished());
        anim.restart();
        assert!(!anim.is_finished());
        assert_eq!(anim.current_frame(), 10);
    }

    #[test]
    fn test_still_is_finished_immediately() {
        let anim = Animation::still(7);
        assert!(anim.is_finished());
        assert_eq!(anim.current_frame(), 7);
    }
}
