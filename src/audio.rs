//! Sound triggers
//!
//! The simulation only reports events. Front ends map them to named sound
//! effects and hand those to a [`SoundSink`]; failures are swallowed since
//! muted devices and autoplay restrictions are expected.

use crate::sim::{GameEvent, GamePhase};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Wing flap
    Flap,
    /// Pipe passed
    Point,
    /// Impact with a pipe or the ground
    Hit,
    /// Falling after the impact
    Die,
    /// Screen transition
    Swoosh,
}

impl SoundEffect {
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::Flap => "flap",
            SoundEffect::Point => "point",
            SoundEffect::Hit => "hit",
            SoundEffect::Die => "die",
            SoundEffect::Swoosh => "swoosh",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "flap" => Some(SoundEffect::Flap),
            "point" => Some(SoundEffect::Point),
            "hit" => Some(SoundEffect::Hit),
            "die" => Some(SoundEffect::Die),
            "swoosh" => Some(SoundEffect::Swoosh),
            _ => None,
        }
    }

    /// Relative loudness before master/SFX volume
    pub fn default_volume(&self) -> f32 {
        match self {
            SoundEffect::Flap => 0.3,
            SoundEffect::Point => 0.5,
            SoundEffect::Hit => 0.6,
            SoundEffect::Die => 0.5,
            SoundEffect::Swoosh => 0.3,
        }
    }

    /// Sounds triggered by a simulation event
    pub fn for_event(event: &GameEvent) -> &'static [SoundEffect] {
        match event {
            GameEvent::Flapped => &[SoundEffect::Flap],
            GameEvent::Scored { .. } => &[SoundEffect::Point],
            GameEvent::Collided { .. } => &[SoundEffect::Hit, SoundEffect::Die],
            GameEvent::PhaseChanged {
                to: GamePhase::Playing,
                from: GamePhase::Start | GamePhase::GameOver,
            } => &[SoundEffect::Swoosh],
            _ => &[],
        }
    }
}

/// Fire-and-forget sound output
pub trait SoundSink {
    /// Play a named sound at `volume` (0.0 - 1.0); never fails
    fn play_sound(&self, name: &str, volume: f32);
}

/// Play every sound an event calls for, scaled by `volume`
pub fn play_event<S: SoundSink + ?Sized>(sink: &S, event: &GameEvent, volume: f32) {
    for effect in SoundEffect::for_event(event) {
        let vol = (effect.default_volume() * volume).clamp(0.0, 1.0);
        if vol > 0.0 {
            sink.play_sound(effect.name(), vol);
        }
    }
}

/// Sink that only logs, for native builds
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl SoundSink for LogSink {
    fn play_sound(&self, name: &str, volume: f32) {
        log::trace!("sound {} at {:.2}", name, volume);
    }
}

/// Audio system using Web Audio API
///
/// Procedurally generated sound effects - no external files needed!
#[cfg(target_arch = "wasm32")]
pub mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, SoundSink};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Pitch sweep with an exponential decay
        fn sweep(
            &self,
            ctx: &AudioContext,
            osc_type: OscillatorType,
            from: f32,
            to: f32,
            duration: f64,
            vol: f32,
        ) -> Option<()> {
            let (osc, gain) = self.create_osc(ctx, from, osc_type)?;
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + duration)
                .ok()?;
            osc.frequency().set_value_at_time(from, t).ok()?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + duration)
                .ok()?;

            osc.start().ok()?;
            osc.stop_with_when(t + duration + 0.02).ok()?;
            Some(())
        }

        /// Two rising notes
        fn play_point(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
            let t = ctx.current_time();
            for (i, freq) in [520.0, 680.0].into_iter().enumerate() {
                let (osc, gain) = self.create_osc(ctx, freq, OscillatorType::Sine)?;
                let start = t + i as f64 * 0.1;
                gain.gain().set_value_at_time(0.0, t).ok()?;
                gain.gain().set_value_at_time(vol, start).ok()?;
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.001, start + 0.15)
                    .ok()?;
                osc.start_with_when(start).ok()?;
                osc.stop_with_when(start + 0.17).ok()?;
            }
            Some(())
        }

        fn synth(&self, ctx: &AudioContext, effect: SoundEffect, vol: f32) -> Option<()> {
            match effect {
                SoundEffect::Flap => {
                    self.sweep(ctx, OscillatorType::Sine, 400.0, 800.0, 0.12, vol)
                }
                SoundEffect::Point => self.play_point(ctx, vol),
                SoundEffect::Hit => {
                    self.sweep(ctx, OscillatorType::Square, 180.0, 60.0, 0.15, vol)
                }
                SoundEffect::Die => {
                    self.sweep(ctx, OscillatorType::Sawtooth, 400.0, 80.0, 0.5, vol)
                }
                SoundEffect::Swoosh => {
                    self.sweep(ctx, OscillatorType::Triangle, 1200.0, 300.0, 0.08, vol)
                }
            }
        }
    }

    impl SoundSink for AudioManager {
        fn play_sound(&self, name: &str, volume: f32) {
            let Some(ctx) = &self.ctx else { return };
            let Some(effect) = SoundEffect::from_name(name) else {
                log::warn!("Unknown sound: {}", name);
                return;
            };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            if self.synth(ctx, effect, volume).is_none() {
                log::debug!("Failed to play {}", name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::CollisionKind;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        played: RefCell<Vec<(String, f32)>>,
    }

    impl SoundSink for Recorder {
        fn play_sound(&self, name: &str, volume: f32) {
            self.played.borrow_mut().push((name.to_string(), volume));
        }
    }

    #[test]
    fn test_names_round_trip() {
        for effect in [
            SoundEffect::Flap,
            SoundEffect::Point,
            SoundEffect::Hit,
            SoundEffect::Die,
            SoundEffect::Swoosh,
        ] {
            assert_eq!(SoundEffect::from_name(effect.name()), Some(effect));
        }
        assert_eq!(SoundEffect::from_name("boing"), None);
    }

    #[test]
    fn test_collision_plays_hit_then_die() {
        let sink = Recorder::default();
        play_event(
            &sink,
            &GameEvent::Collided {
                kind: CollisionKind::Pipe,
            },
            1.0,
        );
        let names: Vec<String> = sink.played.borrow().iter().map(|(n, _)| n.clone()).collect();
        assert_eq!(names, vec!["hit", "die"]);
    }

    #[test]
    fn test_swoosh_only_when_a_run_begins() {
        let begin = GameEvent::PhaseChanged {
            from: GamePhase::GameOver,
            to: GamePhase::Playing,
        };
        let resume = GameEvent::PhaseChanged {
            from: GamePhase::Paused,
            to: GamePhase::Playing,
        };
        assert_eq!(SoundEffect::for_event(&begin), &[SoundEffect::Swoosh]);
        assert!(SoundEffect::for_event(&resume).is_empty());
    }

    #[test]
    fn test_volume_scaling_and_mute() {
        let sink = Recorder::default();
        play_event(&sink, &GameEvent::Flapped, 0.5);
        play_event(&sink, &GameEvent::Flapped, 0.0);
        let played = sink.played.borrow();
        assert_eq!(played.len(), 1);
        assert!((played[0].1 - 0.15).abs() < 1e-6);
    }
}
