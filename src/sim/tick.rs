//! Fixed timestep simulation step
//!
//! Order inside one step:
//! 1. Avatar gravity, integration and terrain resolution (grounded flag)
//! 2. Input: run intent and jump, evaluated against the fresh grounded flag
//! 3. Avatar vs props, dispatched on prop kind

use super::collision::{clamp_to_bounds, move_and_collide};
use super::prop::PropKind;
use super::state::{GameEvent, SessionTally, WorldState};
use crate::config::Tuning;

/// Input commands for a single step
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Horizontal intent (key, touch-drag or auto-run)
    pub run: bool,
    /// One-shot jump request
    pub jump: bool,
}

/// Advance the world by one fixed timestep
pub fn step(world: &mut WorldState, input: &TickInput, tuning: &Tuning, dt: f32) {
    world.time_ticks += 1;

    let avatar = &mut world.avatar;
    avatar.update_timers(dt);

    // A disabled avatar is parked: no gravity, no input, no overlaps
    if !avatar.body.enabled {
        return;
    }

    let was_grounded = avatar.grounded;
    avatar.body.vel.y += world.gravity * dt;
    let contact = move_and_collide(&mut avatar.body, dt, world.terrain.tiles())
        .merge(clamp_to_bounds(&mut avatar.body, world.size));
    avatar.set_grounded(contact.grounded);
    if contact.grounded && !was_grounded {
        world.events.push(GameEvent::Landed);
    }

    avatar.apply_run(input.run, tuning.run_speed);
    if input.jump && avatar.try_jump(tuning.jump_impulse) {
        world.events.push(GameEvent::Jumped);
    }

    resolve_props(world, tuning);
}

/// Handle every prop the avatar currently overlaps
fn resolve_props(world: &mut WorldState, tuning: &Tuning) {
    let mut i = 0;
    while i < world.props.len() {
        if !world.avatar.body.touches(&world.props[i].body) {
            i += 1;
            continue;
        }

        match world.props[i].kind {
            PropKind::Collectible { value } => {
                let coin = world.props.remove(i);
                world.tally.coins += 1;
                world.tally.score = world.tally.score.saturating_add(value);
                world.events.push(GameEvent::CoinCollected { id: coin.id, value });
            }
            PropKind::Gate { .. } => {
                if !collect_gate(world, i) {
                    i += 1;
                }
            }
            PropKind::Obstacle => {
                if world.avatar.can_be_knocked() {
                    world.avatar.knock_back(
                        tuning.knockback,
                        tuning.knockback_secs,
                        tuning.flicker_secs,
                    );
                    world.events.push(GameEvent::ObstacleHit {
                        id: world.props[i].id,
                    });
                }
                i += 1;
            }
        }
    }
}

/// Gate transition `Pending -> Collected -> Removed`.
///
/// Returns true if the gate at `index` was removed.
fn collect_gate(world: &mut WorldState, index: usize) -> bool {
    let PropKind::Gate {
        question_index,
        collected,
    } = &mut world.props[index].kind
    else {
        return false;
    };

    // (a) guard, (b) mark
    if *collected {
        return false;
    }
    *collected = true;
    let question_index = *question_index;

    // (c) remove, (d) count, (e) notify
    world.props.remove(index);
    count_gate(&mut world.tally);
    world.events.push(GameEvent::QuestionTriggered { question_index });
    log::debug!(
        "Gate {} collected ({}/{})",
        question_index,
        world.tally.gates_collected,
        world.tally.gates_total
    );
    true
}

fn count_gate(tally: &mut SessionTally) {
    tally.gates_collected = (tally.gates_collected + 1).min(tally.gates_total);
}
