//! Quiz Runner headless entry point
//!
//! Native builds run a scripted session: auto-run, hop every couple of
//! seconds, and answer every question correctly half a second after it
//! opens. The browser build is driven through the `web` module instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use quiz_runner::consts::SIM_DT;
    use quiz_runner::sim::GameEvent;
    use quiz_runner::{GateSpec, NullHost, ObstacleSpec, SimulationController, WorldConfig};

    env_logger::init();
    log::info!("Quiz Runner (headless) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = match std::fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) => {
                    log::error!("Cannot read {}: {}", path, e);
                    std::process::exit(1);
                }
            };
            match WorldConfig::from_json(&json) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("Bad config {}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => WorldConfig {
            gates: [600.0, 1400.0, 2200.0]
                .iter()
                .enumerate()
                .map(|(i, &x)| GateSpec {
                    x,
                    elevation: 0.0,
                    question_index: i as u32,
                })
                .collect(),
            obstacles: vec![ObstacleSpec { x: 1000.0 }, ObstacleSpec { x: 1800.0 }],
            ..WorldConfig::default()
        },
    };

    let mut session = match SimulationController::start(config, NullHost) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Cannot start session: {}", e);
            std::process::exit(1);
        }
    };

    session.set_run_intent(true);
    let mut answer_timer: Option<f32> = None;
    let mut frame: u64 = 0;

    while !session.is_ended() {
        if frame % 120 == 60 {
            session.request_jump();
        }
        session.tick(SIM_DT);
        frame += 1;

        for event in session.drain_events() {
            match event {
                GameEvent::QuestionTriggered { question_index } => {
                    log::info!("Question {} opened", question_index);
                    answer_timer = Some(0.5);
                }
                GameEvent::SessionEnded { .. } => {}
                other => log::debug!("{:?}", other),
            }
        }

        if let Some(t) = answer_timer.as_mut() {
            *t -= SIM_DT;
            if *t <= 0.0 {
                answer_timer = None;
                if let Err(e) = session.report_answer(true) {
                    log::warn!("Answer rejected: {}", e);
                }
            }
        }

        if frame % 60 == 0 {
            log::info!("{}", session.scoreboard());
        }
    }

    if let Some(outcome) = session.outcome() {
        println!(
            "Session over ({:?}): score {}, coins {}, gates {}, correct {}",
            outcome.reason,
            outcome.final_score,
            outcome.coins_collected,
            outcome.gates_collected,
            outcome.correct_answers
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_init, this is just to satisfy the compiler
}
