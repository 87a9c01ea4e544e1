// File: crates/pulse-core/src/chart.rs
// Summary: PulseChart host-facing visual: data updates, playback driving, interaction and frame building.

use std::collections::HashMap;
use std::time::Duration;

use crate::axis::{format_category, series_ticks, SeriesTicks};
use crate::controls::{hit_test, layout_controls, PlaybackControl};
use crate::convert::{convert, ChartData, ConvertError};
use crate::geometry::PointF;
use crate::payload::CategoricalPayload;
use crate::playback::{AnimationState, Playback, PlaybackIntent, PlaybackState, StepFrame, TrackPoint};
use crate::render::{build_frame, visible_dots, DrawList, FrameContext};
use crate::scale::ChartScales;
use crate::selection::Selection;
use crate::series::{PointId, TooltipBearing};
use crate::settings::{Settings, SettingsOverrides};
use crate::text::{MonospaceMeasure, TextMeasure};
use crate::theme::{ColorRole, Palette, Theme};
use crate::types::Viewport;

/// Extra pixels around a dot that still count as a hit.
const HIT_SLOP: f32 = 2.0;

/// What a click at a surface position landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    Control(PlaybackControl),
    Point(PointId),
    /// Empty plot area; the selection was cleared.
    ClearCatcher,
    Nothing,
}

/// Converted data plus everything derived from it for one viewport.
struct Prepared {
    data: ChartData,
    scales: ChartScales,
    ticks: Vec<SeriesTicks>,
    /// Plot-local positions per series, consumed by the playback driver.
    tracks: Vec<Vec<TrackPoint>>,
}

pub struct PulseChart {
    theme: Theme,
    measure: Box<dyn TextMeasure>,
    settings: Settings,
    viewport: Viewport,
    prepared: Option<Prepared>,
    playback: Playback,
    marker: Option<StepFrame>,
    selection: Selection,
    dot_sizes: HashMap<PointId, f32>,
}

impl Default for PulseChart {
    fn default() -> Self {
        Self::new(Theme::default(), Box::new(MonospaceMeasure::default()))
    }
}

impl PulseChart {
    pub fn new(theme: Theme, measure: Box<dyn TextMeasure>) -> Self {
        let settings = Settings::resolve(&SettingsOverrides::default(), &theme);
        let playback = Playback::new(&settings.playback);
        Self {
            theme,
            measure,
            settings,
            viewport: Viewport::default(),
            prepared: None,
            playback,
            marker: None,
            selection: Selection::new(),
            dot_sizes: HashMap::new(),
        }
    }

    /// Host update: resolve settings, convert the payload and reset playback.
    ///
    /// On a conversion error the chart is cleared and renders nothing until
    /// the next successful update.
    pub fn update(
        &mut self,
        payload: &CategoricalPayload,
        overrides: &SettingsOverrides,
        viewport: Viewport,
    ) -> Result<(), ConvertError> {
        self.viewport = viewport;
        self.settings = Settings::resolve(overrides, &self.theme);
        self.selection.clear();
        self.dot_sizes.clear();
        self.marker = None;

        let data = match convert(payload, &self.settings, self.measure.as_ref()) {
            Ok(data) => data,
            Err(err) => {
                log::warn!("payload rejected, clearing chart: {err}");
                self.prepared = None;
                self.playback.load(&self.settings.playback, 0.0, 0.0);
                return Err(err);
            }
        };
        self.settings.popup.fit_to_label(data.labels.time_label_width);

        let plot_width = f64::from(viewport.plot_width());
        let plot_height = f64::from(viewport.plot_height());
        let Some(scales) = ChartScales::build(&data, plot_width, plot_height) else {
            self.prepared = None;
            return Err(ConvertError::NoPoints);
        };
        let ticks = series_ticks(&data, &scales, &self.settings);
        let tracks = data
            .series
            .iter()
            .map(|s| {
                s.points()
                    .iter()
                    .map(|p| {
                        let (x, y) = scales.project(p.category, p.value, p.group_index);
                        TrackPoint {
                            id: p.id,
                            category: p.category,
                            x,
                            y,
                            event_size: p.tooltip().map(|e| e.size),
                        }
                    })
                    .collect()
            })
            .collect();

        let origin = data.series.first().map(|s| s.first().category).unwrap_or(0.0);
        self.playback.load(&self.settings.playback, data.max_progress(), origin);
        log::debug!(
            "chart updated: {} series, {} points, viewport {}x{}",
            data.series.len(),
            data.point_count(),
            viewport.width,
            viewport.height
        );
        self.prepared = Some(Prepared { data, scales, ticks, tracks });
        Ok(())
    }

    /// Change the surface size, keeping data, selection and playback position.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let Some(prepared) = self.prepared.as_mut() else {
            return;
        };
        let plot_width = f64::from(viewport.plot_width());
        let plot_height = f64::from(viewport.plot_height());
        if let Some(scales) = ChartScales::build(&prepared.data, plot_width, plot_height) {
            prepared.ticks = series_ticks(&prepared.data, &scales, &self.settings);
            for (track, series) in prepared.tracks.iter_mut().zip(&prepared.data.series) {
                for (tp, p) in track.iter_mut().zip(series.points()) {
                    let (x, y) = scales.project(p.category, p.value, p.group_index);
                    tp.x = x;
                    tp.y = y;
                }
            }
            prepared.scales = scales;
        }
        // Marker pixels are stale; the next step recomputes them.
        self.marker = None;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn data(&self) -> Option<&ChartData> {
        self.prepared.as_ref().map(|p| &p.data)
    }

    pub fn scales(&self) -> Option<&ChartScales> {
        self.prepared.as_ref().map(|p| &p.scales)
    }

    pub fn ticks(&self) -> &[SeriesTicks] {
        self.prepared.as_ref().map(|p| p.ticks.as_slice()).unwrap_or(&[])
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn animation(&self) -> &AnimationState {
        self.playback.animation()
    }

    pub fn marker(&self) -> Option<StepFrame> {
        self.marker
    }

    /// Radius a dot was resized to during playback, if any.
    pub fn activated_radius(&self, id: PointId) -> Option<f32> {
        self.dot_sizes.get(&id).copied()
    }

    /// Category value of the marker, formatted like an axis label.
    pub fn progress_label(&self) -> Option<String> {
        let data = self.data()?;
        Some(format_category(self.animation().progress, data.is_scalar, &self.settings))
    }

    /// Marker position as a fraction of the chart's category range.
    pub fn progress_fraction(&self) -> f64 {
        let origin = self
            .data()
            .and_then(|d| d.series.first())
            .map(|s| s.first().category)
            .unwrap_or(0.0);
        self.animation().progress_fraction(origin)
    }

    fn apply(&mut self, intents: Vec<PlaybackIntent>) {
        for intent in intents {
            match intent {
                PlaybackIntent::ClearChart => {
                    self.marker = None;
                    self.dot_sizes.clear();
                }
                PlaybackIntent::MoveMarker(frame) => self.marker = Some(frame),
                PlaybackIntent::ClearSelection => {
                    self.selection.clear();
                }
                PlaybackIntent::Select(id) => self.selection.set_single(id),
                PlaybackIntent::ResizeDot { id, radius } => {
                    self.dot_sizes.insert(id, radius);
                }
                // Frames are pulled by the host; the marker stays where the
                // last step left it.
                PlaybackIntent::Redraw | PlaybackIntent::FreezeTransition => {}
                PlaybackIntent::Pause | PlaybackIntent::ScheduleResume(_) => {}
            }
        }
    }

    /// Frame tick: advance playback by `dt` of wall time.
    pub fn advance(&mut self, dt: Duration) {
        let intents = match &self.prepared {
            Some(p) => self.playback.advance(dt, &p.tracks),
            None => self.playback.advance(dt, &[]),
        };
        self.apply(intents);
    }

    pub fn play(&mut self) {
        let intents = self.playback.play();
        self.apply(intents);
    }

    pub fn pause(&mut self) {
        let intents = self.playback.pause();
        self.apply(intents);
    }

    pub fn stop(&mut self) {
        let intents = self.playback.stop();
        self.apply(intents);
    }

    pub fn to_start(&mut self) {
        let intents = self.playback.to_start();
        self.apply(intents);
    }

    pub fn to_end(&mut self) {
        let intents = self.playback.to_end();
        self.apply(intents);
    }

    /// Route a control press to the state machine. Disabled controls are ignored.
    pub fn press_control(&mut self, control: PlaybackControl) {
        if !control.is_enabled(self.state()) {
            return;
        }
        match control {
            PlaybackControl::Play => self.play(),
            PlaybackControl::Pause => self.pause(),
            PlaybackControl::ToStart => self.to_start(),
            PlaybackControl::ToEnd => self.to_end(),
        }
    }

    /// Click on an event point. Returns false when `id` is not an event point.
    pub fn click_point(&mut self, id: PointId, multi: bool) -> bool {
        let is_event = self
            .data()
            .and_then(|d| d.find_point(id))
            .is_some_and(|(_, _, p)| p.has_tooltip());
        if is_event {
            self.selection.select(id, multi);
        }
        is_event
    }

    /// Click on empty chart area.
    pub fn clear_catcher_click(&mut self) {
        if self.selection.clear() {
            log::trace!("selection cleared");
        }
    }

    /// Hit test a click at surface position `p` and apply it: controls first,
    /// then the topmost dot, then the clear-catcher.
    pub fn click_at(&mut self, p: PointF, multi: bool) -> ClickTarget {
        let buttons = layout_controls(&self.viewport, self.state());
        if let Some(control) = hit_test(&buttons, p) {
            self.press_control(control);
            return ClickTarget::Control(control);
        }
        let hit = self.with_frame_context(|ctx| {
            visible_dots(ctx)
                .into_iter()
                .rev()
                .find(|d| d.center.distance_sq(p) <= (d.radius + HIT_SLOP).powi(2))
                .map(|d| d.id)
        });
        if let Some(id) = hit.flatten() {
            self.click_point(id, multi);
            return ClickTarget::Point(id);
        }
        if self.viewport.plot_rect().contains(p) {
            self.clear_catcher_click();
            return ClickTarget::ClearCatcher;
        }
        ClickTarget::Nothing
    }

    /// Marker to draw: the last step's frame, or the newest revealed point
    /// when no step has run yet in the current series.
    fn current_marker(&self, tracks: &[Vec<TrackPoint>]) -> Option<StepFrame> {
        let anim = self.animation();
        if anim.state == PlaybackState::Ready {
            return None;
        }
        if let Some(m) = self.marker.filter(|m| m.series == anim.series) {
            return Some(m);
        }
        let track = tracks.get(anim.series)?;
        let k = (anim.index.floor() as usize).clamp(1, track.len());
        let p = track.get(k - 1)?;
        Some(StepFrame { series: anim.series, index: (k - 1) as f64, category: p.category, x: p.x, y: p.y })
    }

    fn with_frame_context<R>(&self, f: impl FnOnce(&FrameContext<'_>) -> R) -> Option<R> {
        let prepared = self.prepared.as_ref()?;
        let ctx = FrameContext {
            data: &prepared.data,
            scales: &prepared.scales,
            ticks: &prepared.ticks,
            settings: &self.settings,
            viewport: self.viewport,
            animation: self.playback.animation(),
            marker: self.current_marker(&prepared.tracks),
            selection: &self.selection,
            dot_sizes: &self.dot_sizes,
            measure: self.measure.as_ref(),
        };
        Some(f(&ctx))
    }

    /// Build the draw list for the current state; empty after a rejected update.
    pub fn frame(&self) -> DrawList {
        let background = self.theme.color(ColorRole::Background);
        self.with_frame_context(|ctx| build_frame(ctx, background))
            .unwrap_or_else(|| DrawList::new(background))
    }
}
