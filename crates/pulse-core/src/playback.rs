// File: crates/pulse-core/src/playback.rs
// Summary: Playback state machine (Ready/Playing/Paused), pure interpolation stepper and frame driver.
// Notes:
// - `AnimationState::index` counts revealed points: `k + f` means points `0..k`
//   are drawn and the line is `f` of the way from point `k-1` to point `k`.
// - Side effects (selection, dot resize, pause) are returned as intents; the
//   owner of the selection applies them.
// - Pending timers carry the generation they were scheduled in; every explicit
//   transition bumps the generation, so a stale timer can never fire.

use std::time::Duration;

use skia_safe as skia;

use crate::geometry::lerp;
use crate::series::PointId;
use crate::settings::PlaybackSettings;

/// Index every series starts from: only its first point revealed.
pub const MIN_INDEX: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Ready,
    Playing,
    Paused,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationState {
    pub state: PlaybackState,
    pub series: usize,
    pub index: f64,
    /// Category value of the animated marker.
    pub progress: f64,
    /// Category value of the last point of the last series.
    pub max_progress: f64,
    pub control_color: skia::Color,
}

impl AnimationState {
    pub fn new(control_color: skia::Color) -> Self {
        Self {
            state: PlaybackState::Ready,
            series: 0,
            index: MIN_INDEX,
            progress: 0.0,
            max_progress: 0.0,
            control_color,
        }
    }

    fn reset(&mut self) {
        self.state = PlaybackState::Ready;
        self.series = 0;
        self.index = MIN_INDEX;
    }

    /// `(segment start point, fraction)` of the step in flight.
    pub fn segment(&self) -> (usize, f64) {
        let whole = self.index.floor().max(MIN_INDEX);
        ((whole as usize) - 1, (self.index - whole).clamp(0.0, 1.0))
    }

    /// Marker progress in `[0, 1]` between `origin` and `max_progress`.
    pub fn progress_fraction(&self, origin: f64) -> f64 {
        let span = self.max_progress - origin;
        if span <= 0.0 || !span.is_finite() {
            return 0.0;
        }
        ((self.progress - origin) / span).clamp(0.0, 1.0)
    }
}

/// A data point as playback sees it: plot-local position plus event info.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackPoint {
    pub id: PointId,
    pub category: f64,
    pub x: f64,
    pub y: f64,
    /// Event dot radius; `Some` iff the point carries popup data.
    pub event_size: Option<f32>,
}

/// Interpolated marker position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepFrame {
    pub series: usize,
    /// Fractional point position within the series.
    pub index: f64,
    pub category: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackIntent {
    /// Drop everything drawn so far.
    ClearChart,
    /// Re-render for the current state.
    Redraw,
    MoveMarker(StepFrame),
    /// Halt the in-flight transition where it is.
    FreezeTransition,
    ClearSelection,
    Select(PointId),
    ResizeDot { id: PointId, radius: f32 },
    Pause,
    ScheduleResume(Duration),
}

#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub frame: StepFrame,
    pub intents: Vec<PlaybackIntent>,
}

/// Interpolate the step in flight at fraction `t`.
///
/// Pure: reads `anim` and `tracks` only. At `t >= 1` the point reached is
/// activated; an event point yields selection, resize and pause intents.
/// Returns `None` when the current series has no step left.
pub fn step(anim: &AnimationState, tracks: &[Vec<TrackPoint>], t: f64, pause: Duration) -> Option<StepOutcome> {
    let track = tracks.get(anim.series)?;
    let (start, _) = anim.segment();
    let from = track.get(start)?;
    let to = track.get(start + 1)?;
    let t = t.clamp(0.0, 1.0);

    let index = start as f64 + t;
    let frame = StepFrame {
        series: anim.series,
        index,
        category: lerp(from.category, to.category, t),
        x: lerp(from.x, to.x, t),
        y: lerp(from.y, to.y, t),
    };

    let mut intents = vec![PlaybackIntent::MoveMarker(frame)];
    if t >= 1.0 {
        let reached = &track[index.floor() as usize];
        if let Some(radius) = reached.event_size {
            intents.push(PlaybackIntent::ClearSelection);
            intents.push(PlaybackIntent::Select(reached.id));
            intents.push(PlaybackIntent::ResizeDot { id: reached.id, radius });
            intents.push(PlaybackIntent::Pause);
            intents.push(PlaybackIntent::ScheduleResume(pause));
        }
    }
    Some(StepOutcome { frame, intents })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerKind {
    Resume,
    Autoplay,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingTimer {
    kind: TimerKind,
    generation: u64,
    remaining: Duration,
}

/// Owns the animation state and drives it from elapsed time.
#[derive(Clone, Debug)]
pub struct Playback {
    anim: AnimationState,
    step_duration: Duration,
    pause_duration: Duration,
    generation: u64,
    timer: Option<PendingTimer>,
}

impl Playback {
    pub fn new(settings: &PlaybackSettings) -> Self {
        Self {
            anim: AnimationState::new(settings.color),
            step_duration: settings.step_duration(),
            pause_duration: settings.pause_duration(),
            generation: 0,
            timer: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.anim.state
    }

    pub fn animation(&self) -> &AnimationState {
        &self.anim
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn step_duration(&self) -> Duration {
        self.step_duration
    }

    /// Whether a resume/autoplay timer is pending.
    pub fn has_pending_timer(&self) -> bool {
        self.timer.is_some_and(|t| t.generation == self.generation)
    }

    /// New data: adopt settings, return to Ready and arm autoplay if enabled.
    pub fn load(&mut self, settings: &PlaybackSettings, max_progress: f64, origin: f64) {
        self.step_duration = settings.step_duration();
        self.pause_duration = settings.pause_duration();
        self.anim.control_color = settings.color;
        self.anim.max_progress = max_progress;
        self.anim.progress = origin;
        self.anim.reset();
        self.invalidate_timers();
        if settings.autoplay {
            self.timer = Some(PendingTimer {
                kind: TimerKind::Autoplay,
                generation: self.generation,
                remaining: settings.autoplay_delay(),
            });
            log::debug!("autoplay armed, starting in {:?}", settings.autoplay_delay());
        }
    }

    fn invalidate_timers(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.timer = None;
    }

    /// Ready -> Playing from the first series; Paused -> Playing from the
    /// current fractional index. No-op while Playing.
    pub fn play(&mut self) -> Vec<PlaybackIntent> {
        match self.anim.state {
            PlaybackState::Playing => Vec::new(),
            PlaybackState::Ready => {
                self.invalidate_timers();
                self.anim.series = 0;
                self.anim.index = MIN_INDEX;
                self.anim.state = PlaybackState::Playing;
                log::debug!("playback: Ready -> Playing");
                vec![PlaybackIntent::ClearChart, PlaybackIntent::Redraw]
            }
            PlaybackState::Paused => {
                self.invalidate_timers();
                self.anim.state = PlaybackState::Playing;
                log::debug!("playback: Paused -> Playing at {}:{:.3}", self.anim.series, self.anim.index);
                vec![PlaybackIntent::ClearSelection]
            }
        }
    }

    /// Playing -> Paused, freezing the step in flight. No-op otherwise.
    pub fn pause(&mut self) -> Vec<PlaybackIntent> {
        if self.anim.state != PlaybackState::Playing {
            return Vec::new();
        }
        self.invalidate_timers();
        self.anim.state = PlaybackState::Paused;
        log::debug!("playback: Playing -> Paused at {}:{:.3}", self.anim.series, self.anim.index);
        vec![PlaybackIntent::FreezeTransition]
    }

    /// Any state -> Ready; cancels the step in flight and any pending timer.
    pub fn stop(&mut self) -> Vec<PlaybackIntent> {
        self.invalidate_timers();
        if self.anim.state != PlaybackState::Ready {
            log::debug!("playback: {:?} -> Ready", self.anim.state);
        }
        self.anim.reset();
        vec![
            PlaybackIntent::FreezeTransition,
            PlaybackIntent::ClearSelection,
            PlaybackIntent::ClearChart,
        ]
    }

    pub fn to_start(&mut self) -> Vec<PlaybackIntent> {
        self.stop()
    }

    /// Stop, then redraw the complete chart statically.
    pub fn to_end(&mut self) -> Vec<PlaybackIntent> {
        let mut intents = self.stop();
        self.anim.progress = self.anim.max_progress;
        intents.push(PlaybackIntent::Redraw);
        intents
    }

    /// Move on to the next series, or finish playback when none is left.
    fn play_next(&mut self, series_count: usize) -> Vec<PlaybackIntent> {
        if self.anim.series + 1 < series_count {
            self.anim.series += 1;
            self.anim.index = MIN_INDEX;
            log::debug!("playback: advancing to series {}", self.anim.series);
            Vec::new()
        } else {
            log::debug!("playback: finished, Playing -> Ready");
            self.anim.reset();
            self.anim.progress = self.anim.max_progress;
            vec![PlaybackIntent::ClearSelection, PlaybackIntent::Redraw]
        }
    }

    /// Count the pending timer down by `dt`. Returns the intents of a timer
    /// that fired and the part of `dt` left over after it fired.
    fn fire_due_timer(&mut self, dt: Duration) -> (Vec<PlaybackIntent>, Duration) {
        let Some(mut timer) = self.timer else {
            return (Vec::new(), dt);
        };
        if timer.generation != self.generation {
            self.timer = None;
            return (Vec::new(), dt);
        }
        if dt < timer.remaining {
            timer.remaining -= dt;
            self.timer = Some(timer);
            return (Vec::new(), Duration::ZERO);
        }
        self.timer = None;
        let leftover = dt - timer.remaining;
        let intents = match timer.kind {
            TimerKind::Resume => {
                let mut intents = vec![PlaybackIntent::ClearSelection];
                intents.extend(self.play());
                intents
            }
            TimerKind::Autoplay => self.play(),
        };
        (intents, leftover)
    }

    /// Frame driver: advance by `dt` of wall time over `tracks` (one per series).
    pub fn advance(&mut self, dt: Duration, tracks: &[Vec<TrackPoint>]) -> Vec<PlaybackIntent> {
        let (mut intents, dt) = self.fire_due_timer(dt);
        let step_secs = self.step_duration.as_secs_f64();
        let mut budget = dt.as_secs_f64();

        while self.anim.state == PlaybackState::Playing {
            let len = tracks.get(self.anim.series).map(Vec::len).unwrap_or(0);
            if self.anim.index >= len as f64 {
                intents.extend(self.play_next(tracks.len()));
                continue;
            }

            let (start, frac) = self.anim.segment();
            let remaining = (1.0 - frac) * step_secs;
            if budget < remaining {
                // Strictly below 1: reaching the point is the other branch's job.
                let t = (frac + budget / step_secs).min(1.0 - f64::EPSILON);
                if let Some(outcome) = step(&self.anim, tracks, t, self.pause_duration) {
                    self.anim.index = (start + 1) as f64 + t;
                    self.anim.progress = outcome.frame.category;
                    intents.extend(outcome.intents);
                }
                break;
            }

            budget -= remaining;
            let Some(outcome) = step(&self.anim, tracks, 1.0, self.pause_duration) else {
                self.anim.index = len as f64;
                continue;
            };
            self.anim.index = (start + 2) as f64;
            self.anim.progress = outcome.frame.category;
            log::trace!("playback: reached point {} of series {}", start + 1, self.anim.series);
            for intent in outcome.intents {
                match intent {
                    PlaybackIntent::Pause => {
                        self.anim.state = PlaybackState::Paused;
                    }
                    PlaybackIntent::ScheduleResume(after) => {
                        self.generation = self.generation.wrapping_add(1);
                        self.timer = Some(PendingTimer {
                            kind: TimerKind::Resume,
                            generation: self.generation,
                            remaining: after,
                        });
                        log::debug!("playback: paused on event, resuming in {:?}", after);
                    }
                    other => intents.push(other),
                }
            }
        }
        intents
    }
}
