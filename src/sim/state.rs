//! World state and the events it produces
//!
//! Everything the fixed-timestep step reads or writes lives here. Props are
//! kept sorted by id so iteration order is stable.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::avatar::Avatar;
use super::camera::Camera;
use super::layout::collectible_positions;
use super::prop::Prop;
use super::terrain::Terrain;
use crate::config::WorldConfig;

/// Running totals for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTally {
    /// Collectibles consumed
    pub coins: u32,
    /// Accumulated score (coins plus answer bonuses); never decreases
    pub score: u32,
    pub gates_collected: u32,
    pub gates_total: u32,
    pub correct_answers: u32,
}

impl SessionTally {
    /// True once every configured gate has fired. Never true with zero gates.
    pub fn all_gates_collected(&self) -> bool {
        self.gates_total > 0 && self.gates_collected == self.gates_total
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// The clock reached zero
    TimeUp,
    /// Every gate was collected and the grace window elapsed
    AllGatesFound,
    /// The host called `force_end`
    Forced,
}

/// Outbound notifications, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    QuestionTriggered { question_index: u32 },
    CoinCollected { id: u32, value: u32 },
    ObstacleHit { id: u32 },
    Jumped,
    Landed,
    AnswerScored { question_index: u32, correct: bool, bonus: u32 },
    ClockTick { remaining: u32 },
    SessionEnded {
        final_score: u32,
        coins_collected: u32,
        reason: EndReason,
    },
}

/// The simulated world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    pub size: Vec2,
    pub gravity: f32,
    pub terrain: Terrain,
    pub avatar: Avatar,
    /// Live props (sorted by id)
    pub props: Vec<Prop>,
    pub camera: Camera,
    pub tally: SessionTally,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Simulation step counter
    pub time_ticks: u64,
    next_id: u32,
}

impl WorldState {
    /// Build terrain, avatar and every prop from `config`
    pub fn build(config: &WorldConfig) -> Self {
        let tuning = &config.tuning;
        let size = Vec2::new(config.width, config.height);
        let terrain = Terrain::tiled(
            config.width,
            config.height,
            config.ground_height,
            config.tile_width,
        );
        let ground = terrain.top();

        let spawn = Vec2::new(config.spawn_x, ground - tuning.avatar_size.y * 0.5);
        let mut camera = Camera::new(tuning.view_size, size, tuning.camera_lerp);
        camera.snap_to(spawn);

        let mut state = Self {
            size,
            gravity: config.gravity,
            terrain,
            avatar: Avatar::new(spawn, tuning.avatar_size),
            props: Vec::new(),
            camera,
            tally: SessionTally::default(),
            events: Vec::new(),
            time_ticks: 0,
            next_id: 1,
        };

        for pos in collectible_positions(
            &config.collectibles,
            config.width,
            ground,
            tuning.coin_size,
            config.seed,
        ) {
            let id = state.next_entity_id();
            state
                .props
                .push(Prop::collectible(id, pos, tuning.coin_size, tuning.coin_value));
        }

        for gate in &config.gates {
            let id = state.next_entity_id();
            let pos = Vec2::new(gate.x, ground - gate.elevation - tuning.gate_size.y * 0.5);
            state
                .props
                .push(Prop::gate(id, pos, tuning.gate_size, gate.question_index));
        }
        state.tally.gates_total = config.gates.len() as u32;

        for obstacle in &config.obstacles {
            let id = state.next_entity_id();
            let pos = Vec2::new(obstacle.x, ground - tuning.obstacle_size * 0.5);
            state
                .props
                .push(Prop::obstacle(id, pos, tuning.obstacle_size));
        }

        log::debug!(
            "World built: {}x{}, {} props, {} gates",
            config.width,
            config.height,
            state.props.len(),
            state.tally.gates_total
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take every pending event
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of live gates (not yet collected)
    pub fn gates_remaining(&self) -> usize {
        self.props
            .iter()
            .filter(|p| p.question_index().is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CollectibleLayout, GateSpec, ObstacleSpec};
    use crate::sim::PropKind;

    #[test]
    fn test_build_world() {
        let config = WorldConfig {
            gates: vec![
                GateSpec { x: 500.0, elevation: 0.0, question_index: 0 },
                GateSpec { x: 900.0, elevation: 20.0, question_index: 1 },
            ],
            obstacles: vec![ObstacleSpec { x: 700.0 }],
            collectibles: CollectibleLayout::Positions {
                points: vec![Vec2::new(300.0, 450.0)],
            },
            ..WorldConfig::empty(60)
        };
        let world = WorldState::build(&config);

        assert_eq!(world.props.len(), 4);
        assert_eq!(world.tally.gates_total, 2);
        assert_eq!(world.gates_remaining(), 2);
        assert!(world.props.windows(2).all(|w| w[0].id < w[1].id));

        let ground = config.ground_top();
        // Avatar spawns standing on the ground
        assert_eq!(
            world.avatar.body.aabb().max.y,
            ground,
            "Avatar feet should rest on terrain"
        );

        let raised = world
            .props
            .iter()
            .find(|p| p.question_index() == Some(1))
            .unwrap();
        assert_eq!(raised.body.aabb().max.y, ground - 20.0);

        let obstacle = world
            .props
            .iter()
            .find(|p| p.kind == PropKind::Obstacle)
            .unwrap();
        assert_eq!(obstacle.body.aabb().max.y, ground);
    }

    #[test]
    fn test_all_gates_collected_needs_gates() {
        let mut tally = SessionTally::default();
        assert!(!tally.all_gates_collected());
        tally.gates_total = 2;
        tally.gates_collected = 1;
        assert!(!tally.all_gates_collected());
        tally.gates_collected = 2;
        assert!(tally.all_gates_collected());
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_string(&GameEvent::QuestionTriggered { question_index: 3 }).unwrap();
        assert_eq!(json, r#"{"type":"question_triggered","question_index":3}"#);
    }
}
