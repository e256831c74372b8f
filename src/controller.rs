//! Session orchestration and the host protocol
//!
//! The controller owns the world and the clock. The host drives it with
//! `tick` once per frame and feeds input, answers and early termination in
//! between. Outbound notifications go to a [`SessionHost`] and are also
//! queued as [`GameEvent`]s for hosts that poll.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, Tuning, WorldConfig};
use crate::consts::{MAX_FRAME_DT, MAX_QUEUED_EVENTS, MAX_SUBSTEPS, SIM_DT};
use crate::hud::Scoreboard;
use crate::sim::{
    Avatar, Camera, GameEvent, Prop, SessionClock, SessionTally, Terrain, TickInput, WorldState,
    step,
};

pub use crate::sim::EndReason;

/// Host protocol misuse
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session has already ended")]
    Ended,
    #[error("no triggered question is waiting for an answer")]
    NoPendingQuestion,
}

/// Final result, computed once when the session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub final_score: u32,
    pub coins_collected: u32,
    pub gates_collected: u32,
    pub correct_answers: u32,
    pub reason: EndReason,
}

/// Outbound notifications. Both are fire-and-forget: the simulation never
/// waits on the host.
pub trait SessionHost {
    /// A gate fired. Called at most once per gate, in encounter order.
    fn on_question_triggered(&mut self, question_index: u32);
    /// The session ended. Called exactly once.
    fn on_session_ended(&mut self, outcome: &SessionOutcome);
}

/// Host that ignores notifications (for hosts that poll `drain_events`)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl SessionHost for NullHost {
    fn on_question_triggered(&mut self, _question_index: u32) {}
    fn on_session_ended(&mut self, _outcome: &SessionOutcome) {}
}

/// Closure pair adapter: `on_question(question_index)` and
/// `on_ended(final_score, coins_collected)`
pub struct Callbacks<Q, E> {
    on_question: Q,
    on_ended: E,
}

impl<Q, E> Callbacks<Q, E>
where
    Q: FnMut(u32),
    E: FnMut(u32, u32),
{
    pub fn new(on_question: Q, on_ended: E) -> Self {
        Self {
            on_question,
            on_ended,
        }
    }
}

impl<Q, E> SessionHost for Callbacks<Q, E>
where
    Q: FnMut(u32),
    E: FnMut(u32, u32),
{
    fn on_question_triggered(&mut self, question_index: u32) {
        (self.on_question)(question_index);
    }

    fn on_session_ended(&mut self, outcome: &SessionOutcome) {
        (self.on_ended)(outcome.final_score, outcome.coins_collected);
    }
}

/// Session lifecycle. `Ended` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionPhase {
    Active,
    /// Every gate is collected; the session seals once session time reaches
    /// `deadline` (seconds), unless the clock runs out first
    Grace { deadline: f64 },
    Ended,
}

/// Owns the world and arbitrates the end of the session
pub struct SimulationController {
    world: WorldState,
    tuning: Tuning,
    clock: SessionClock,
    phase: SessionPhase,
    run_intent: bool,
    jump_requested: bool,
    /// Physics time not yet simulated
    accumulator: f32,
    /// Real session time fed through `tick`
    elapsed: f64,
    /// Triggered questions without an answer, oldest first
    pending_answers: VecDeque<u32>,
    /// The avatar was parked by an open question, not by the host
    frozen_by_question: bool,
    outcome: Option<SessionOutcome>,
    /// Polled feedback; holds at most `MAX_QUEUED_EVENTS`, oldest dropped first
    events: Vec<GameEvent>,
    host: Box<dyn SessionHost>,
}

impl SimulationController {
    /// Build the world, arm the clock and begin the session.
    ///
    /// This is the only constructor, so a controller cannot be started twice.
    pub fn start(
        config: WorldConfig,
        host: impl SessionHost + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let world = WorldState::build(&config);
        log::info!(
            "Session started: {}s, {} gates, {} props",
            config.duration_secs,
            world.tally.gates_total,
            world.props.len()
        );

        Ok(Self {
            world,
            tuning: config.tuning,
            clock: SessionClock::new(config.duration_secs),
            phase: SessionPhase::Active,
            run_intent: false,
            jump_requested: false,
            accumulator: 0.0,
            elapsed: 0.0,
            pending_answers: VecDeque::new(),
            frozen_by_question: false,
            outcome: None,
            events: Vec::new(),
            host: Box::new(host),
        })
    }

    /// Advance the session by `dt` seconds of real time. No-op once ended.
    pub fn tick(&mut self, dt: f32) {
        if self.is_ended() {
            return;
        }
        // A zero-length session ends before anything else can happen
        if self.clock.is_expired() {
            self.finish(EndReason::TimeUp);
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let frame_start = self.elapsed;

        self.accumulator += dt.min(MAX_FRAME_DT);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                run: self.run_intent,
                jump: std::mem::take(&mut self.jump_requested),
            };
            step(&mut self.world, &input, &self.tuning, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
            self.dispatch_world_events(frame_start);
        }

        let target = self.world.avatar.body.pos;
        self.world.camera.follow(target, dt.min(MAX_FRAME_DT));
        self.elapsed += f64::from(dt);

        // Clock first: it wins over the grace deadline on the same tick
        if self.clock.advance(dt) > 0 {
            self.queue_event(GameEvent::ClockTick {
                remaining: self.clock.remaining(),
            });
        }
        if self.clock.is_expired() {
            self.finish(EndReason::TimeUp);
            return;
        }
        if let SessionPhase::Grace { deadline } = self.phase {
            if self.elapsed >= deadline {
                self.finish(EndReason::AllGatesFound);
            }
        }
    }

    /// Forward step events to the host and react to gate triggers
    fn dispatch_world_events(&mut self, frame_start: f64) {
        for event in self.world.drain_events() {
            if let GameEvent::QuestionTriggered { question_index } = event {
                self.pending_answers.push_back(question_index);
                if self.tuning.freeze_on_question && self.world.avatar.body.enabled {
                    self.world.avatar.body.set_enabled(false);
                    self.frozen_by_question = true;
                }
                self.host.on_question_triggered(question_index);

                if self.phase == SessionPhase::Active && self.world.tally.all_gates_collected() {
                    let deadline = frame_start + f64::from(self.tuning.grace_secs);
                    self.phase = SessionPhase::Grace { deadline };
                    log::info!(
                        "All {} gates collected, sealing in {}s",
                        self.world.tally.gates_total,
                        self.tuning.grace_secs
                    );
                }
            }
            self.queue_event(event);
        }
    }

    fn queue_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_QUEUED_EVENTS {
            let excess = self.events.len() + 1 - MAX_QUEUED_EVENTS;
            self.events.drain(..excess);
        }
        self.events.push(event);
    }

    /// Answer for the oldest triggered question. Returns the bonus applied.
    ///
    /// Each triggered gate accepts exactly one answer; extra calls fail with
    /// [`SessionError::NoPendingQuestion`].
    pub fn report_answer(&mut self, answered_correctly: bool) -> Result<u32, SessionError> {
        if self.is_ended() {
            log::warn!("report_answer after session end");
            return Err(SessionError::Ended);
        }
        let Some(question_index) = self.pending_answers.pop_front() else {
            log::warn!("report_answer with no open question");
            return Err(SessionError::NoPendingQuestion);
        };

        let bonus = if answered_correctly {
            self.tuning.answer_bonus
        } else {
            0
        };
        let tally = &mut self.world.tally;
        tally.score = tally.score.saturating_add(bonus);
        if answered_correctly {
            tally.correct_answers += 1;
        }
        self.queue_event(GameEvent::AnswerScored {
            question_index,
            correct: answered_correctly,
            bonus,
        });
        log::debug!(
            "Question {} answered ({}), +{}",
            question_index,
            if answered_correctly { "correct" } else { "wrong" },
            bonus
        );

        if self.frozen_by_question && self.pending_answers.is_empty() {
            self.world.avatar.body.set_enabled(true);
            self.frozen_by_question = false;
        }
        Ok(bonus)
    }

    /// Horizontal intent from any input source
    pub fn set_run_intent(&mut self, active: bool) {
        if !self.is_ended() {
            self.run_intent = active;
        }
    }

    /// Jump on the next step if grounded
    pub fn request_jump(&mut self) {
        if !self.is_ended() {
            self.jump_requested = true;
        }
    }

    /// Park or release the avatar body without touching the clock.
    ///
    /// Overrides any freeze from an open question.
    pub fn set_avatar_enabled(&mut self, enabled: bool) {
        if !self.is_ended() {
            self.world.avatar.body.set_enabled(enabled);
            self.frozen_by_question = false;
        }
    }

    /// End the session now. Returns false if it had already ended.
    pub fn force_end(&mut self) -> bool {
        if self.is_ended() {
            return false;
        }
        self.finish(EndReason::Forced);
        true
    }

    /// The single transition into `Ended`
    fn finish(&mut self, reason: EndReason) {
        if self.is_ended() {
            return;
        }
        self.phase = SessionPhase::Ended;
        self.clock.stop();
        self.world.avatar.body.set_enabled(false);
        self.pending_answers.clear();
        self.frozen_by_question = false;
        self.run_intent = false;
        self.jump_requested = false;

        let tally = self.world.tally;
        let outcome = SessionOutcome {
            final_score: tally.score,
            coins_collected: tally.coins,
            gates_collected: tally.gates_collected,
            correct_answers: tally.correct_answers,
            reason,
        };
        self.outcome = Some(outcome);
        self.queue_event(GameEvent::SessionEnded {
            final_score: outcome.final_score,
            coins_collected: outcome.coins_collected,
            reason,
        });
        log::info!(
            "Session ended ({:?}): score {}, coins {}, gates {}/{}",
            reason,
            outcome.final_score,
            outcome.coins_collected,
            tally.gates_collected,
            tally.gates_total
        );
        self.host.on_session_ended(&outcome);
    }

    /// Take every event queued since the last drain.
    ///
    /// Hosts that rely on [`SessionHost`] callbacks may ignore the queue; it
    /// keeps only the newest `MAX_QUEUED_EVENTS` entries.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard::project(&self.world.tally, &self.clock, self.is_ended())
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    pub fn tally(&self) -> &SessionTally {
        &self.world.tally
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn avatar(&self) -> &Avatar {
        &self.world.avatar
    }

    pub fn camera(&self) -> &Camera {
        &self.world.camera
    }

    pub fn terrain(&self) -> &Terrain {
        &self.world.terrain
    }

    pub fn props(&self) -> &[Prop] {
        &self.world.props
    }

    /// Questions triggered but not yet answered, oldest first
    pub fn pending_questions(&self) -> impl Iterator<Item = u32> + '_ {
        self.pending_answers.iter().copied()
    }

    /// Real time fed through `tick` so far
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GateSpec;
    use crate::consts::ANSWER_BONUS;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn gate_under_avatar(question_index: u32) -> WorldConfig {
        WorldConfig {
            gates: vec![GateSpec {
                x: WorldConfig::default().spawn_x,
                elevation: 0.0,
                question_index,
            }],
            ..WorldConfig::empty(60)
        }
    }

    #[test]
    fn test_start_rejects_invalid_config() {
        let config = WorldConfig {
            height: -5.0,
            ..WorldConfig::empty(10)
        };
        assert!(SimulationController::start(config, NullHost).is_err());
    }

    #[test]
    fn test_zero_duration_ends_on_first_tick() {
        let ended = Rc::new(RefCell::new(Vec::new()));
        let sink = ended.clone();
        let mut session = SimulationController::start(
            WorldConfig::empty(0),
            Callbacks::new(|_: u32| {}, move |score: u32, coins: u32| sink.borrow_mut().push((score, coins))),
        )
        .unwrap();

        assert_eq!(session.phase(), SessionPhase::Active);
        session.tick(SIM_DT);
        assert!(session.is_ended());
        assert_eq!(session.outcome().unwrap().reason, EndReason::TimeUp);
        assert_eq!(*ended.borrow(), vec![(0, 0)]);
    }

    #[test]
    fn test_gate_freezes_avatar_until_answer() {
        let mut session = SimulationController::start(gate_under_avatar(0), NullHost).unwrap();
        session.set_run_intent(true);
        session.tick(SIM_DT);

        assert!(!session.avatar().body.enabled, "Avatar parked while question open");
        assert_eq!(session.pending_questions().collect::<Vec<_>>(), vec![0]);
        // The clock keeps running while the question is open
        session.tick(1.0);
        assert_eq!(session.clock().remaining(), 59);

        assert_eq!(session.report_answer(true), Ok(ANSWER_BONUS));
        assert!(session.avatar().body.enabled);
        assert_eq!(session.tally().score, ANSWER_BONUS);
    }

    #[test]
    fn test_answer_keeps_host_parked_avatar() {
        let mut session = SimulationController::start(gate_under_avatar(0), NullHost).unwrap();
        session.tick(SIM_DT);
        session.set_avatar_enabled(false);

        assert_eq!(session.report_answer(true), Ok(ANSWER_BONUS));
        assert!(!session.avatar().body.enabled, "Host decides when to release");

        session.set_avatar_enabled(true);
        assert!(session.avatar().body.enabled);
    }

    #[test]
    fn test_zero_duration_fires_no_question() {
        let questions = Rc::new(RefCell::new(Vec::new()));
        let sink = questions.clone();
        let mut config = gate_under_avatar(0);
        config.duration_secs = 0;
        let mut session = SimulationController::start(
            config,
            Callbacks::new(move |index: u32| sink.borrow_mut().push(index), |_: u32, _: u32| {}),
        )
        .unwrap();

        session.tick(SIM_DT);
        assert!(session.is_ended());
        assert!(questions.borrow().is_empty());
        assert_eq!(session.tally().gates_collected, 0);
    }

    #[test]
    fn test_undrained_queue_is_bounded() {
        let mut session = SimulationController::start(WorldConfig::empty(1000), NullHost).unwrap();
        for _ in 0..400 {
            session.tick(1.0);
        }
        let events = session.drain_events();
        assert_eq!(events.len(), MAX_QUEUED_EVENTS);
        assert_eq!(
            events.last(),
            Some(&GameEvent::ClockTick { remaining: 600 })
        );
    }

    #[test]
    fn test_freeze_can_be_disabled() {
        let mut config = gate_under_avatar(0);
        config.tuning.freeze_on_question = false;
        let mut session = SimulationController::start(config, NullHost).unwrap();
        session.tick(SIM_DT);
        assert_eq!(session.tally().gates_collected, 1);
        assert!(session.avatar().body.enabled);
    }

    #[test]
    fn test_second_answer_for_same_gate_rejected() {
        let mut session = SimulationController::start(gate_under_avatar(3), NullHost).unwrap();
        session.tick(SIM_DT);

        assert_eq!(session.report_answer(true), Ok(ANSWER_BONUS));
        assert_eq!(
            session.report_answer(true),
            Err(SessionError::NoPendingQuestion)
        );
        assert_eq!(session.tally().score, ANSWER_BONUS);
        assert_eq!(session.tally().correct_answers, 1);
    }

    #[test]
    fn test_wrong_answer_costs_nothing() {
        let mut session = SimulationController::start(gate_under_avatar(0), NullHost).unwrap();
        session.tick(SIM_DT);
        assert_eq!(session.report_answer(false), Ok(0));
        assert_eq!(session.tally().score, 0);
        assert_eq!(session.tally().correct_answers, 0);
    }

    #[test]
    fn test_answer_without_question_rejected() {
        let mut session = SimulationController::start(WorldConfig::empty(30), NullHost).unwrap();
        assert_eq!(
            session.report_answer(true),
            Err(SessionError::NoPendingQuestion)
        );
    }

    #[test]
    fn test_answer_after_end_rejected() {
        let mut session = SimulationController::start(gate_under_avatar(0), NullHost).unwrap();
        session.tick(SIM_DT);
        assert!(session.force_end());
        assert_eq!(session.report_answer(true), Err(SessionError::Ended));
    }

    #[test]
    fn test_force_end_is_idempotent() {
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        let mut session = SimulationController::start(
            WorldConfig::empty(5),
            Callbacks::new(|_: u32| {}, move |_: u32, _: u32| *counter.borrow_mut() += 1),
        )
        .unwrap();

        assert!(session.force_end());
        assert!(!session.force_end());
        session.tick(10.0);
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(session.outcome().unwrap().reason, EndReason::Forced);
        // Clock frozen at the moment of the forced end
        assert_eq!(session.clock().remaining(), 5);
    }

    #[test]
    fn test_tick_after_end_is_noop() {
        let mut session = SimulationController::start(WorldConfig::empty(1), NullHost).unwrap();
        session.set_run_intent(true);
        session.tick(1.0);
        assert!(session.is_ended());
        let pos = session.avatar().body.pos;
        let _ = session.drain_events();

        session.set_run_intent(true);
        session.request_jump();
        for _ in 0..10 {
            session.tick(SIM_DT);
        }
        assert_eq!(session.avatar().body.pos, pos);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_events_queue_mirrors_callbacks() {
        let mut session = SimulationController::start(gate_under_avatar(6), NullHost).unwrap();
        session.tick(SIM_DT);
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::QuestionTriggered { question_index: 6 }));
        assert!(session.drain_events().is_empty(), "Drain empties the queue");
    }

    #[test]
    fn test_scoreboard_projection() {
        let mut session = SimulationController::start(gate_under_avatar(0), NullHost).unwrap();
        session.tick(SIM_DT);
        session.report_answer(true).unwrap();
        session.tick(1.0);

        let board = session.scoreboard();
        assert_eq!(board.score, ANSWER_BONUS);
        assert_eq!(board.gates_collected, 1);
        assert_eq!(board.gates_total, 1);
        assert_eq!(board.remaining_secs, 59);
        assert!(!board.ended);
    }
}
