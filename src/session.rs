//! Level session driver
//!
//! Owns one level's simulation and its collaborators. Each display frame the
//! host calls `frame`; pointer input arrives in device coordinates and is
//! mapped into the playfield first. Audio and progress failures are logged
//! and never interrupt play.

use glam::Vec2;
use serde::Serialize;

use crate::audio::AudioSink;
use crate::error::{GameError, GameResult};
use crate::levels::{Catalogue, Level};
use crate::platform::Viewport;
use crate::progress::{LevelProgress, ProgressStore};
use crate::sim::machine;
use crate::sim::shape::Shape;
use crate::sim::state::{GameEvent, GamePhase, SimulationState};
use crate::sim::tick::tick;
use crate::tuning::Tuning;

pub struct Session {
    catalogue: Catalogue,
    tuning: Tuning,
    level: Level,
    state: SimulationState,
    audio: Box<dyn AudioSink>,
    store: Box<dyn ProgressStore>,
    viewport: Viewport,
    seed: u64,
}

/// What a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    /// Level number (1-based)
    pub level: usize,
    pub phase: GamePhase,
    pub ball_pos: Vec2,
    pub ball_radius: f32,
    pub dragging: bool,
    /// Pointer position, for the pull band
    pub pointer: Vec2,
    /// Visible shapes only
    pub shapes: Vec<Shape>,
    pub attempts: u32,
    pub attempts_left: u32,
    pub best_stars: u8,
}

impl Session {
    /// Enter `level_index` of `catalogue`
    pub fn new(
        catalogue: Catalogue,
        tuning: Tuning,
        level_index: usize,
        audio: Box<dyn AudioSink>,
        store: Box<dyn ProgressStore>,
        seed: u64,
    ) -> GameResult<Self> {
        tuning.validate()?;
        let level = catalogue
            .get(level_index)
            .cloned()
            .ok_or(GameError::LevelNotFound(level_index))?;
        level.validate()?;
        let state =
            SimulationState::new(level_index, &level, &tuning, seed.wrapping_add(level_index as u64));
        let viewport = Viewport::identity(tuning.playfield());

        let mut session = Self {
            catalogue,
            tuning,
            level,
            state,
            audio,
            store,
            viewport,
            seed,
        };
        session.load_best_stars();
        log::info!("Entered level {}", level_index + 1);
        Ok(session)
    }

    /// Switch to another level of the catalogue. On error the current level
    /// is kept.
    pub fn enter(&mut self, level_index: usize) -> GameResult<()> {
        let level = self
            .catalogue
            .get(level_index)
            .cloned()
            .ok_or(GameError::LevelNotFound(level_index))?;
        level.validate()?;
        self.state = SimulationState::new(
            level_index,
            &level,
            &self.tuning,
            self.seed.wrapping_add(level_index as u64),
        );
        self.level = level;
        self.load_best_stars();
        log::info!("Entered level {}", level_index + 1);
        Ok(())
    }

    /// Advance to the next level, if there is one
    pub fn next_level(&mut self) -> GameResult<()> {
        self.enter(self.state.level_index + 1)
    }

    /// Restart the current level
    pub fn retry(&mut self) {
        machine::retry(&mut self.state, &self.level);
    }

    /// Run one tick and hand back every event raised since the last frame
    pub fn frame(&mut self) -> Vec<GameEvent> {
        tick(&mut self.state, &self.level, &self.tuning);

        let events = self.state.drain_events();
        for event in &events {
            self.dispatch(event);
        }
        events
    }

    pub fn pointer_down(&mut self, client: Vec2) {
        let pos = self.viewport.to_internal(client);
        machine::pointer_down(&mut self.state, pos, &self.tuning);
    }

    pub fn pointer_move(&mut self, client: Vec2) {
        let pos = self.viewport.to_internal(client);
        machine::pointer_move(&mut self.state, pos);
    }

    pub fn pointer_up(&mut self, client: Vec2) {
        let pos = self.viewport.to_internal(client);
        machine::pointer_up(&mut self.state, pos, &self.tuning);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn level_count(&self) -> usize {
        self.catalogue.len()
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let state = &self.state;
        RenderSnapshot {
            level: state.level_index + 1,
            phase: state.phase,
            ball_pos: state.ball.pos,
            ball_radius: state.ball.radius,
            dragging: state.ball.dragging,
            pointer: state.pointer,
            shapes: state
                .shapes
                .iter()
                .filter(|s| !s.invisible)
                .cloned()
                .collect(),
            attempts: state.attempts,
            attempts_left: state.attempts_left(&self.tuning),
            best_stars: state.best_stars,
        }
    }

    fn load_best_stars(&mut self) {
        let level = self.state.level_index + 1;
        match self.store.load(level) {
            Ok(Some(progress)) => self.state.best_stars = progress.stars,
            Ok(None) => {}
            Err(e) => log::warn!("Could not load progress for level {}: {}", level, e),
        }
    }

    fn dispatch(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Cue(cue) => {
                if let Err(e) = self.audio.play(cue) {
                    log::warn!("Failed to play {} cue: {}", cue.as_str(), e);
                }
            }
            GameEvent::Won {
                level,
                stars,
                attempts,
                completed,
                ..
            } => {
                let result = LevelProgress {
                    level: level + 1,
                    stars,
                    attempts,
                    completed,
                };
                if let Err(e) = self.store.record(&result) {
                    log::warn!("Failed to save progress for level {}: {}", level + 1, e);
                }
            }
            GameEvent::OutOfAttempts => {
                log::info!("Level {}: out of attempts", self.state.level_index + 1);
            }
            GameEvent::Status(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::audio::{Cue, NullAudio, RecordingAudio};
    use crate::levels::Animation;
    use crate::progress::{MemoryStore, UnavailableStore};
    use crate::sim::state::StatusMessage;

    /// Lets a test keep a handle on a collaborator it boxed into the session
    #[derive(Clone, Default)]
    struct Shared<T>(Rc<RefCell<T>>);

    impl<T: AudioSink> AudioSink for Shared<T> {
        fn play(&mut self, cue: Cue) -> GameResult<()> {
            self.0.borrow_mut().play(cue)
        }
    }

    impl<T: ProgressStore> ProgressStore for Shared<T> {
        fn load(&self, level: usize) -> GameResult<Option<LevelProgress>> {
            self.0.borrow().load(level)
        }

        fn record(&mut self, result: &LevelProgress) -> GameResult<()> {
            self.0.borrow_mut().record(result)
        }
    }

    struct BrokenAudio;

    impl AudioSink for BrokenAudio {
        fn play(&mut self, _cue: Cue) -> GameResult<()> {
            Err(GameError::Audio("device lost".into()))
        }
    }

    /// Two levels; the first has a square whose top-left corner sits at (650, 350)
    fn catalogue() -> Catalogue {
        let start = Vec2::new(100.0, 384.0);
        Catalogue::new(vec![
            Level::new(
                start,
                vec![
                    Shape::rectangle(Vec2::new(700.0, 400.0), 100.0, 100.0, 0.0, 0),
                    Shape::rectangle(Vec2::new(300.0, 700.0), 20.0, 20.0, 0.0, 0).invisible(),
                ],
            ),
            Level::new(start, Vec::new()),
        ])
    }

    fn session_with(
        audio: Box<dyn AudioSink>,
        store: Box<dyn ProgressStore>,
    ) -> Session {
        Session::new(catalogue(), Tuning::default(), 0, audio, store, 9).unwrap()
    }

    /// Put the ball in play right next to the popping corner
    fn about_to_pop(session: &mut Session) {
        session.state.drain_events();
        session.state.phase = GamePhase::Playing;
        session.state.attempts = 1;
        session.state.ball.pos = Vec2::new(626.0, 326.0);
        session.state.ball.vel = Vec2::ZERO;
    }

    #[test]
    fn test_unknown_level_is_not_found() {
        let result = Session::new(
            catalogue(),
            Tuning::default(),
            2,
            Box::new(NullAudio),
            Box::new(MemoryStore::default()),
            1,
        );
        assert!(matches!(result, Err(GameError::LevelNotFound(2))));
    }

    #[test]
    fn test_invalid_tuning_is_rejected() {
        let tuning = Tuning {
            max_attempts: 0,
            ..Tuning::default()
        };
        let result = Session::new(
            catalogue(),
            tuning,
            0,
            Box::new(NullAudio),
            Box::new(MemoryStore::default()),
            1,
        );
        assert!(matches!(result, Err(GameError::InvalidTuning(_))));
    }

    #[test]
    fn test_invalid_level_is_rejected_on_enter() {
        let start = Vec2::new(100.0, 384.0);
        let broken = Level::new(start, Vec::new()).with_animation(Animation::Teleport {
            interval: -1.0,
            min: Vec2::new(300.0, 200.0),
            max: Vec2::new(1100.0, 600.0),
        });
        let catalogue = Catalogue::new(vec![Level::new(start, Vec::new()), broken]);
        let mut session = Session::new(
            catalogue,
            Tuning::default(),
            0,
            Box::new(NullAudio),
            Box::new(MemoryStore::default()),
            1,
        )
        .unwrap();

        let err = session.next_level();
        assert!(matches!(err, Err(GameError::InvalidLevel(_))));
        assert_eq!(session.state().level_index, 0);
    }

    #[test]
    fn test_enter_loads_best_stars() {
        let mut store = MemoryStore::default();
        store.book.record(LevelProgress::new(1, 2, 3));
        let session = session_with(Box::new(NullAudio), Box::new(store));
        assert_eq!(session.state().best_stars, 2);
    }

    #[test]
    fn test_unavailable_store_still_plays() {
        let mut session = session_with(Box::new(NullAudio), Box::new(UnavailableStore));
        assert_eq!(session.state().best_stars, 0);

        about_to_pop(&mut session);
        let events = session.frame();
        assert_eq!(session.state().phase, GamePhase::Won);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Won { .. })));
    }

    #[test]
    fn test_broken_audio_still_plays() {
        let mut session = session_with(Box::new(BrokenAudio), Box::new(MemoryStore::default()));
        session.pointer_down(Vec2::new(100.0, 384.0));
        session.pointer_up(Vec2::new(300.0, 384.0));
        let events = session.frame();
        assert_eq!(session.state().phase, GamePhase::Playing);
        assert!(events.contains(&GameEvent::Cue(Cue::Snap)));
    }

    #[test]
    fn test_shot_cues_reach_audio() {
        let audio = Shared::<RecordingAudio>::default();
        let mut session = session_with(Box::new(audio.clone()), Box::new(MemoryStore::default()));

        let events = session.frame();
        assert_eq!(events, vec![GameEvent::Status(StatusMessage::PullBack)]);

        session.pointer_down(Vec2::new(100.0, 384.0));
        session.pointer_move(Vec2::new(300.0, 384.0));
        session.pointer_up(Vec2::new(300.0, 384.0));
        session.frame();

        assert_eq!(audio.0.borrow().played, vec![Cue::Stretch, Cue::Snap]);
        assert_eq!(session.state().attempts, 1);
        assert!(session.state().ball.vel.x < 0.0);
    }

    #[test]
    fn test_win_is_recorded_once() {
        let audio = Shared::<RecordingAudio>::default();
        let store = Shared::<MemoryStore>::default();
        let mut session = session_with(Box::new(audio.clone()), Box::new(store.clone()));

        about_to_pop(&mut session);
        session.frame();
        session.frame();

        let stored = store.0.borrow().book.get(1).copied();
        assert_eq!(stored, Some(LevelProgress::new(1, 3, 1)));
        assert_eq!(
            audio.0.borrow().played.iter().filter(|c| **c == Cue::Pop).count(),
            1
        );
    }

    #[test]
    fn test_pointer_goes_through_viewport() {
        let mut session = session_with(Box::new(NullAudio), Box::new(MemoryStore::default()));
        session.set_viewport(Viewport::new(
            Vec2::new(10.0, 0.0),
            Vec2::new(683.0, 384.0),
            Vec2::new(1366.0, 768.0),
        ));

        // Client (60, 192) is internal (100, 384): right on the ball
        session.pointer_down(Vec2::new(60.0, 192.0));
        assert_eq!(session.state().phase, GamePhase::Pulling);
    }

    #[test]
    fn test_next_level_and_past_the_end() {
        let mut session = session_with(Box::new(NullAudio), Box::new(MemoryStore::default()));
        session.next_level().unwrap();
        assert_eq!(session.state().level_index, 1);
        assert!(session.level().shapes.is_empty());

        let err = session.next_level();
        assert!(matches!(err, Err(GameError::LevelNotFound(2))));
        assert_eq!(session.state().level_index, 1);
    }

    #[test]
    fn test_retry_after_win() {
        let mut session = session_with(Box::new(NullAudio), Box::new(MemoryStore::default()));
        about_to_pop(&mut session);
        session.frame();

        session.retry();
        assert_eq!(session.state().phase, GamePhase::Ready);
        assert_eq!(session.state().attempts, 0);
        assert_eq!(session.state().ball.pos, Vec2::new(100.0, 384.0));
        // Best stars survive a retry
        assert_eq!(session.state().best_stars, 3);
    }

    #[test]
    fn test_snapshot_hides_invisible_shapes() {
        let session = session_with(Box::new(NullAudio), Box::new(MemoryStore::default()));
        let snap = session.snapshot();
        assert_eq!(snap.level, 1);
        assert_eq!(snap.shapes.len(), 1);
        assert_eq!(snap.attempts_left, 4);
        assert!(serde_json::to_string(&snap).is_ok());
    }
}
