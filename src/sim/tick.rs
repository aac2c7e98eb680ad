//! Per-frame simulation tick
//!
//! Advances one session step: player physics, every pursuer in spawn
//! order, captures, flag pickups, the win/lose check and the camera.

use super::collision::circles_touch;
use super::state::{GameEvent, GamePhase, GameState};
use super::vehicle::DriveInput;
use crate::consts::{FLAG_SCORE, MAX_DT};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Continuous driving controls
    pub drive: DriveInput,
    /// Drop a smoke cloud (one-shot)
    pub smoke: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

/// Clamp a frame time into [0, MAX_DT]
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 }
}

/// Advance the game state by one step of (at most) `MAX_DT` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return events;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    // Don't tick if paused or finished
    if state.phase != GamePhase::Playing {
        return events;
    }

    let dt = clamp_dt(dt);
    state.time_ticks += 1;

    if input.smoke {
        deploy_smoke(state, &mut events);
    }

    state.player.set_inputs(input.drive);
    state.player.update(dt, &state.map);
    let player_pos = state.player.pos();

    for pursuer in &mut state.pursuers {
        pursuer.update(dt, &state.map, player_pos, &mut state.rng);
    }

    // Captures: lose a life and respawn the whole roster
    let capture_radius = state.config.capture_radius;
    if state
        .pursuers
        .iter()
        .any(|p| circles_touch(p.pos(), player_pos, capture_radius))
    {
        state.lives = state.lives.saturating_sub(1);
        log::info!("Captured! {} lives left", state.lives);
        events.push(GameEvent::Captured {
            lives_left: state.lives,
        });
        state.respawn_all();
    }

    collect_flags(state, &mut events);

    if state.lives == 0 {
        state.phase = GamePhase::Lost;
        log::info!("Game over. {}", state.status_line());
        events.push(GameEvent::Lost { score: state.score });
    } else if state.flags_remaining() == 0 {
        state.phase = GamePhase::Won;
        log::info!("All flags collected! {}", state.status_line());
        events.push(GameEvent::Won { score: state.score });
    }

    state.camera.follow(
        state.player.pos(),
        state.map.world_pixel_width(),
        state.map.world_pixel_height(),
    );

    events
}

fn deploy_smoke(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.smoke_charges == 0 {
        log::debug!("Smoke requested with no charges left");
        return;
    }
    state.smoke_charges -= 1;

    let center = state.player.pos();
    let radius = state.config.smoke_radius;
    let duration = state.config.smoke_duration;
    let mut blinded = 0;
    for pursuer in &mut state.pursuers {
        if circles_touch(pursuer.pos(), center, radius) {
            pursuer.blind(duration);
            blinded += 1;
        }
    }
    log::debug!("Smoke deployed, {blinded} pursuers blinded");
    events.push(GameEvent::SmokeDeployed { blinded });
}

fn collect_flags(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player_pos = state.player.pos();
    let radius = state.config.flag_pickup_radius;
    for index in 0..state.flags.len() {
        let flag = &mut state.flags[index];
        if flag.taken || !circles_touch(flag.pos, player_pos, radius) {
            continue;
        }
        flag.taken = true;
        state.score += FLAG_SCORE;
        let remaining = state.flags_remaining();
        log::info!("Flag collected ({remaining} left)");
        events.push(GameEvent::FlagCollected { index, remaining });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::sim::level::Level;
    use crate::sim::pursuer::PursuerMode;

    fn state(text: &str) -> GameState {
        state_with(text, &Settings::default())
    }

    fn state_with(text: &str, settings: &Settings) -> GameState {
        GameState::new(Level::from_text(text, 32).unwrap(), settings, 12345)
    }

    /// Pursuer spawned one tile from the player, inside capture range
    fn adjacent_pursuer() -> GameState {
        let mut settings = Settings::default();
        settings.session.capture_radius = 40.0;
        state_with("######\n#PE.F#\n######", &settings)
    }

    fn drive(throttle: f32) -> TickInput {
        TickInput {
            drive: DriveInput::new(throttle, 0.0, 0.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(1.0), MAX_DT);
        assert_eq!(clamp_dt(-0.5), 0.0);
        assert_eq!(clamp_dt(f32::NAN), 0.0);
        assert_eq!(clamp_dt(0.01), 0.01);
    }

    #[test]
    fn test_tick_pause() {
        let mut s = state("#####\n#P.F#\n#####");
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut s, &pause, MAX_DT);
        assert_eq!(s.phase, GamePhase::Paused);

        let ticks = s.time_ticks;
        tick(&mut s, &drive(1.0), MAX_DT);
        assert_eq!(s.time_ticks, ticks);

        // Unpause
        tick(&mut s, &pause, MAX_DT);
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.time_ticks, ticks + 1);
    }

    #[test]
    fn test_level_without_flags_is_won_immediately() {
        let mut s = state("#####\n#P..#\n#####");
        let events = tick(&mut s, &TickInput::default(), MAX_DT);
        assert_eq!(s.phase, GamePhase::Won);
        assert!(events.contains(&GameEvent::Won { score: 0 }));
    }

    #[test]
    fn test_flag_pickup_scores_and_wins() {
        // Flag directly above the player, who faces up
        let mut s = state("###\n#F#\n#.#\n#P#\n###");
        let mut collected = false;
        for _ in 0..120 {
            let events = tick(&mut s, &drive(1.0), MAX_DT);
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::FlagCollected { .. }))
            {
                collected = true;
            }
            if s.phase == GamePhase::Won {
                break;
            }
        }
        assert!(collected);
        assert_eq!(s.phase, GamePhase::Won);
        assert_eq!(s.score, FLAG_SCORE);
    }

    #[test]
    fn test_capture_costs_life_and_respawns() {
        let mut s = adjacent_pursuer();
        let events = tick(&mut s, &TickInput::default(), MAX_DT);
        assert!(events.contains(&GameEvent::Captured { lives_left: 2 }));
        assert_eq!(s.lives, 2);
        assert_eq!(s.player.pos(), s.layout.player_spawn);
        assert_eq!(s.pursuers[0].pos(), s.layout.enemy_spawns[0]);
    }

    #[test]
    fn test_out_of_lives_is_lost() {
        let mut s = adjacent_pursuer();
        for _ in 0..3 {
            tick(&mut s, &TickInput::default(), MAX_DT);
        }
        assert_eq!(s.lives, 0);
        assert_eq!(s.phase, GamePhase::Lost);

        // Terminal: further ticks are ignored
        let ticks = s.time_ticks;
        tick(&mut s, &drive(1.0), MAX_DT);
        assert_eq!(s.time_ticks, ticks);
    }

    #[test]
    fn test_smoke_blinds_nearby_and_spends_charge() {
        // Pursuer walled off in a pocket, within smoke range
        let mut s = state("#########\n#P....#E#\n#.....#F#\n#########");
        let smoke = TickInput {
            smoke: true,
            ..Default::default()
        };
        let events = tick(&mut s, &smoke, MAX_DT);
        assert!(events.contains(&GameEvent::SmokeDeployed { blinded: 1 }));
        assert_eq!(s.pursuers[0].mode(), PursuerMode::Blinded);
        assert_eq!(s.smoke_charges, 2);

        for _ in 0..2 {
            tick(&mut s, &smoke, MAX_DT);
        }
        assert_eq!(s.smoke_charges, 0);
        let events = tick(&mut s, &smoke, MAX_DT);
        assert!(events.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let level = crate::sim::level::DEMO_LEVEL;
        let mut a = state(level);
        let mut b = state(level);
        let inputs = [drive(1.0), drive(0.5), TickInput::default(), drive(-1.0)];
        for _ in 0..50 {
            for input in &inputs {
                tick(&mut a, input, MAX_DT);
                tick(&mut b, input, MAX_DT);
            }
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.player.pos(), b.player.pos());
        for (pa, pb) in a.pursuers.iter().zip(&b.pursuers) {
            assert_eq!(pa.pos(), pb.pos());
            assert_eq!(pa.heading(), pb.heading());
        }
    }

    #[test]
    fn test_camera_follows_player() {
        let mut s = state(crate::sim::level::DEMO_LEVEL);
        for _ in 0..30 {
            tick(&mut s, &drive(1.0), MAX_DT);
        }
        let world_w = s.map.world_pixel_width();
        let world_h = s.map.world_pixel_height();
        let view = s.camera.view;
        assert!(view.x >= 0.0 && view.x <= (world_w - view.w).max(0.0));
        assert!(view.y >= 0.0 && view.y <= (world_h - view.h).max(0.0));
    }
}
