#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Top-level arena running one game session of the maze chase.
//!
//! [`Simulation`] owns the [`World`], Pac-Man, the four ghosts and the
//! door controller. Agents refer to each other by [`GhostId`] only and
//! receive explicit borrows of the world on every call.
//!
//! One [`Simulation::update`] runs a fixed pipeline:
//!
//! 1. every state machine consumes the events of the previous tick,
//! 2. the door controller may release one locked ghost,
//! 3. doors follow the ghosts passing through them,
//! 4. the power timer and the attack schedule advance,
//! 5. every agent steers and moves, ghosts targeting positions taken
//!    before anyone moved,
//! 6. Pac-Man eats, then collisions are resolved,
//! 7. the world clock advances.
//!
//! Events produced during a tick are returned and queued for the next one.

mod config;
mod ghost;
mod pacman;
pub mod personality;
mod snapshot;
mod waves;

use std::mem;

use maze_chase_core::{
    ticks_from_secs, ActorId, AttackPhase, Command, Direction, Event, FoodKind, GhostId,
    InputState, LevelParams, Tile, BASE_SPEED,
};
use maze_chase_system_fsm::FsmError;
use maze_chase_system_house::{door_commands, DoorController};
use maze_chase_system_movement::{Mover, Point};
use maze_chase_system_steering::{Drive, HouseExit, Steer, SteeringContext};
use maze_chase_world::{apply, query, Access, MazeError, World};

pub use config::GameConfig;
pub use ghost::GhostState;
pub use pacman::PacManState;
pub use snapshot::{ActorSnapshot, DoorView, Snapshot, TimerView};
pub use waves::AttackSchedule;

use ghost::{Ghost, GhostAction, GhostView};
use pacman::{PacMan, PacManAction};
use personality::Pursued;

/// Speed inside the house as a fraction of [`BASE_SPEED`].
const HOUSE_SPEED: f32 = 0.5;
/// Speed of an eaten ghost as a fraction of [`BASE_SPEED`].
const DEAD_SPEED: f32 = 2.0;
/// Eaten-food counts at which the bonus appears.
const BONUS_MILESTONES: [u32; 2] = [70, 170];
/// Seconds the bonus stays on its tile.
const BONUS_SECS: f32 = 9.5;
const FIRST_BOUNTY: u32 = 200;
const MAX_BOUNTY: u32 = 1600;

/// Errors raised while setting up or driving a session.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    /// The maze definition was rejected.
    #[error(transparent)]
    Maze(#[from] MazeError),
    /// A state table is incomplete.
    #[error(transparent)]
    Fsm(#[from] FsmError),
    /// Levels are numbered from 1.
    #[error("levels start at 1, got {level}")]
    InvalidLevel {
        /// Requested level.
        level: u32,
    },
    /// The session has no lives left to play.
    #[error("no lives left")]
    NoLives,
}

/// Session-wide values every ghost observes.
#[derive(Clone, Copy, Debug)]
struct Tempo {
    phase: AttackPhase,
    elroy: u8,
    powered: bool,
    frightened_ticks: u32,
}

/// One game session.
pub struct Simulation {
    world: World,
    config: GameConfig,
    params: LevelParams,
    pacman: PacMan,
    ghosts: Vec<Ghost>,
    doors: DoorController,
    schedule: AttackSchedule,
    power_ticks: u32,
    next_bounty: u32,
    score: u32,
    lives: u32,
    completed: bool,
    pending: Vec<Event>,
}

impl Simulation {
    /// Starts a session in `world` at the configured level.
    pub fn new(world: World, config: GameConfig) -> Result<Self, SimulationError> {
        if config.lives == 0 {
            return Err(SimulationError::NoLives);
        }
        let level = config.start_level;
        if level == 0 {
            return Err(SimulationError::InvalidLevel { level });
        }

        let params = LevelParams::for_level(level);
        let tempo = Tempo {
            phase: AttackPhase::Scatter,
            elroy: 0,
            powered: false,
            frightened_ticks: params.frightened_ticks(),
        };
        let pacman = PacMan {
            mover: Mover::new(query::pacman_start(&world), Direction::Left),
            machine: pacman::machine(&config)?,
        };
        let ghosts = GhostId::ALL
            .into_iter()
            .map(|id| spawn(id, &world, &config, &tempo))
            .collect::<Result<Vec<_>, _>>()?;

        let mut simulation = Self {
            doors: DoorController::new(&params),
            schedule: AttackSchedule::new(&params),
            params,
            lives: config.lives,
            config,
            world,
            pacman,
            ghosts,
            power_ticks: 0,
            next_bounty: FIRST_BOUNTY,
            score: 0,
            completed: false,
            pending: Vec::new(),
        };
        let _ = simulation.start_level(level)?;
        Ok(simulation)
    }

    /// Starts a session in the classic arcade maze.
    pub fn classic(config: GameConfig) -> Result<Self, SimulationError> {
        Self::new(World::classic()?, config)
    }

    /// The maze.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current level number.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.params.level
    }

    /// Tuning of the current level.
    #[must_use]
    pub const fn params(&self) -> &LevelParams {
        &self.params
    }

    /// Score so far.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Lives left.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Ticks of power left.
    #[must_use]
    pub const fn power_ticks(&self) -> u32 {
        self.power_ticks
    }

    /// Scatter/chase schedule.
    #[must_use]
    pub const fn attack_schedule(&self) -> &AttackSchedule {
        &self.schedule
    }

    /// Ghost house door controller.
    #[must_use]
    pub const fn door_controller(&self) -> &DoorController {
        &self.doors
    }

    /// Pac-Man's state.
    #[must_use]
    pub fn pacman_state(&self) -> PacManState {
        self.pacman.machine.state()
    }

    /// State of a ghost.
    #[must_use]
    pub fn ghost_state(&self, ghost: GhostId) -> Option<GhostState> {
        self.ghost(ghost).map(Ghost::state)
    }

    /// Whether the last food item of the level was eaten.
    #[must_use]
    pub const fn is_level_complete(&self) -> bool {
        self.completed
    }

    /// Whether every life was lost.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    /// Whether Pac-Man died and [`Simulation::reset_after_death`] should
    /// start the next round.
    #[must_use]
    pub fn is_waiting_for_reset(&self) -> bool {
        self.lives > 0 && self.pacman_state() == PacManState::Dead
    }

    /// Restores the food and starts `level` from its initial positions.
    pub fn start_level(&mut self, level: u32) -> Result<Vec<Event>, SimulationError> {
        if level == 0 {
            return Err(SimulationError::InvalidLevel { level });
        }
        self.params = LevelParams::for_level(level);
        let mut events = Vec::new();
        apply(&mut self.world, Command::RestoreFood, &mut events);
        self.doors.start_level(&self.params);
        self.completed = false;
        self.reset_round();

        tracing::info!(level, food = query::remaining_food(&self.world), "level started");
        events.push(Event::LevelStarted { level });
        self.pending.clone_from(&events);
        Ok(events)
    }

    /// Puts every agent back in place after Pac-Man died, keeping the
    /// eaten food. Fails once no lives are left.
    pub fn reset_after_death(&mut self) -> Result<(), SimulationError> {
        if self.lives == 0 {
            return Err(SimulationError::NoLives);
        }
        self.doors.life_lost();
        self.reset_round();
        tracing::info!(lives = self.lives, "round restarted");
        Ok(())
    }

    /// Advances the session by one tick.
    ///
    /// Nothing happens while the level is complete or Pac-Man is dead; the
    /// caller decides how to continue.
    pub fn update(&mut self, input: InputState) -> Result<Vec<Event>, SimulationError> {
        if self.completed || self.pacman_state() == PacManState::Dead {
            return Ok(Vec::new());
        }
        let pending = mem::take(&mut self.pending);
        let mut events = Vec::new();

        self.update_pacman_machine(&pending, &mut events);
        self.update_ghost_machines(&pending)?;

        let running = self.pacman_state() == PacManState::Running;
        if running {
            self.release_ghost(&pending, &mut events);
        }
        self.update_doors(&mut events);

        if running {
            self.update_power(&mut events);
            let _ = self.schedule.tick(self.power_ticks > 0);
            self.steer_and_move(input)?;
            self.eat(&mut events);
            self.collide(&mut events);
        }

        apply(&mut self.world, Command::Tick, &mut events);
        self.pending.clone_from(&events);
        Ok(events)
    }

    /// Observable state of every agent.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let mut actors = Vec::with_capacity(1 + self.ghosts.len());
        let machine = &self.pacman.machine;
        actors.push(ActorSnapshot {
            actor: ActorId::PacMan,
            tile: self.pacman.mover.tile(),
            offset: self.pacman.mover.offset(),
            move_dir: self.pacman.mover.move_dir(),
            wish_dir: self.pacman.mover.wish_dir(),
            state: machine.state().into(),
            timer: machine.timer().into(),
            target: None,
            route: Vec::new(),
        });
        for ghost in &self.ghosts {
            let route = ghost
                .machine
                .behavior()
                .map(|steering| steering.route().to_vec())
                .unwrap_or_default();
            actors.push(ActorSnapshot {
                actor: ActorId::Ghost(ghost.id),
                tile: ghost.mover.tile(),
                offset: ghost.mover.offset(),
                move_dir: ghost.mover.move_dir(),
                wish_dir: ghost.mover.wish_dir(),
                state: ghost.state().into(),
                timer: ghost.machine.timer().into(),
                target: ghost.target,
                route,
            });
        }

        Snapshot {
            tick: query::tick_index(&self.world),
            level: self.level(),
            score: self.score,
            lives: self.lives,
            remaining_food: query::remaining_food(&self.world),
            total_food: query::total_food(&self.world),
            phase: self.schedule.phase(),
            power_ticks: self.power_ticks,
            actors,
            doors: query::doors(&self.world)
                .iter()
                .map(|door| DoorView {
                    door: door.id(),
                    tile: door.tile(),
                    open: door.is_open(),
                })
                .collect(),
        }
    }

    fn ghost(&self, ghost: GhostId) -> Option<&Ghost> {
        self.ghosts.iter().find(|candidate| candidate.id == ghost)
    }

    fn tempo(&self) -> Tempo {
        let remaining = query::remaining_food(&self.world);
        let elroy = if remaining <= self.params.elroy2_dots_left {
            2
        } else if remaining <= self.params.elroy1_dots_left {
            1
        } else {
            0
        };
        Tempo {
            phase: self.schedule.phase(),
            elroy,
            powered: self.power_ticks > 0,
            frightened_ticks: self.params.frightened_ticks(),
        }
    }

    fn reset_round(&mut self) {
        self.schedule = AttackSchedule::new(&self.params);
        self.power_ticks = 0;
        self.next_bounty = FIRST_BOUNTY;
        self.pending.clear();

        let mut ignored = Vec::new();
        apply(&mut self.world, Command::ClearBonus, &mut ignored);

        self.pacman
            .mover
            .place(query::pacman_start(&self.world), Direction::Left);
        self.pacman.machine.restart(PacManState::Running, &());
        self.pacman.machine.behaviors_mut().for_each(|steering| steering.reset());

        let tempo = self.tempo();
        for ghost in &mut self.ghosts {
            let bed = query::house(&self.world).bed(ghost.id);
            ghost.mover.place(bed.tile(), bed.facing());
            ghost.target = None;
            let view = observe(ghost.id, &ghost.mover, &self.world, &tempo);
            ghost.machine.restart(GhostState::Locked, &view);
            ghost.machine.behaviors_mut().for_each(|steering| steering.reset());
        }

        for command in door_commands(&self.world, &[]) {
            apply(&mut self.world, command, &mut ignored);
        }
    }

    fn update_pacman_machine(&mut self, pending: &[Event], events: &mut Vec<Event>) {
        for fired in self.pacman.machine.update(&(), pending) {
            if fired.action == Some(PacManAction::LoseLife) {
                self.lives = self.lives.saturating_sub(1);
                tracing::info!(lives = self.lives, "life lost");
                events.push(Event::LifeLost { lives: self.lives });
            }
        }
    }

    fn update_ghost_machines(&mut self, pending: &[Event]) -> Result<(), SimulationError> {
        let tempo = self.tempo();
        for ghost in &mut self.ghosts {
            let view = observe(ghost.id, &ghost.mover, &self.world, &tempo);
            let fired = ghost.machine.update(&view, pending);
            if fired
                .iter()
                .any(|fired| fired.action == Some(GhostAction::ForgetRoute))
            {
                ghost.machine.behavior_mut()?.reset();
            }
        }
        Ok(())
    }

    fn release_ghost(&mut self, pending: &[Event], events: &mut Vec<Event>) {
        let eaten = pending
            .iter()
            .filter(|event| matches!(event, Event::FoodEaten { .. }))
            .count();
        let locked: Vec<GhostId> = self
            .ghosts
            .iter()
            .filter(|ghost| ghost.state() == GhostState::Locked)
            .map(|ghost| ghost.id)
            .collect();
        let eaten = u32::try_from(eaten).unwrap_or(u32::MAX);
        if let Some(release) = self.doors.update(eaten, &locked) {
            events.push(Event::GhostReleased {
                ghost: release.ghost,
            });
        }
    }

    fn update_doors(&mut self, events: &mut Vec<Event>) {
        let passing: Vec<Tile> = self
            .ghosts
            .iter()
            .filter(|ghost| {
                matches!(
                    ghost.state(),
                    GhostState::LeavingHouse | GhostState::EnteringHouse
                )
            })
            .map(|ghost| ghost.mover.tile())
            .collect();
        for command in door_commands(&self.world, &passing) {
            apply(&mut self.world, command, events);
        }
    }

    fn update_power(&mut self, events: &mut Vec<Event>) {
        if self.power_ticks == 0 {
            return;
        }
        self.power_ticks -= 1;
        if self.power_ticks == 0 {
            tracing::debug!("pac-man lost power");
            events.push(Event::PacManLostPower);
        }
    }

    fn steer_and_move(&mut self, input: InputState) -> Result<(), SimulationError> {
        let tempo = self.tempo();
        let pursued = Pursued {
            pacman: self.pacman.mover.tile(),
            heading: self.pacman.mover.move_dir(),
            blinky: self
                .ghost(GhostId::Blinky)
                .map_or(self.pacman.mover.tile(), |blinky| blinky.mover.tile()),
        };

        let fraction = if tempo.powered {
            self.params.pacman_power_speed
        } else {
            self.params.pacman_speed
        };
        let context = SteeringContext {
            world: &self.world,
            access: Access::Outside,
            target: None,
            input,
        };
        let drive = self
            .pacman
            .machine
            .behavior_mut()?
            .steer(&mut self.pacman.mover, &context);
        move_agent(
            &mut self.pacman.mover,
            &self.world,
            Access::Outside,
            drive,
            fraction * BASE_SPEED,
        );

        for ghost in &mut self.ghosts {
            let state = ghost.state();
            ghost.target = target_of(state, ghost.id, ghost.mover.tile(), pursued, &self.world);
            let speed = ghost_speed(state, ghost, &self.world, &self.params, tempo.elroy);
            let context = SteeringContext {
                world: &self.world,
                access: state.access(),
                target: ghost.target,
                input: InputState::default(),
            };
            let drive = ghost.machine.behavior_mut()?.steer(&mut ghost.mover, &context);
            move_agent(&mut ghost.mover, &self.world, state.access(), drive, speed);
        }
        Ok(())
    }

    fn eat(&mut self, events: &mut Vec<Event>) {
        let tile = self.pacman.mover.tile();
        let mut eaten = Vec::new();
        if query::has_food(&self.world, tile) {
            apply(&mut self.world, Command::ConsumeFood { tile }, &mut eaten);
        }
        if query::bonus(&self.world).is_some() && query::bonus_tile(&self.world) == Some(tile) {
            apply(&mut self.world, Command::ConsumeBonus, &mut eaten);
        }

        for event in eaten {
            match event {
                Event::FoodEaten {
                    kind, remaining, ..
                } => {
                    self.score = self.score.saturating_add(kind.points());
                    events.push(event);
                    if kind == FoodKind::Energizer {
                        self.energize(events);
                    }
                    if BONUS_MILESTONES.contains(&query::eaten_food(&self.world)) {
                        let command = Command::ActivateBonus {
                            symbol: self.params.bonus_symbol,
                            value: self.params.bonus_value,
                            ticks: ticks_from_secs(BONUS_SECS),
                        };
                        apply(&mut self.world, command, events);
                    }
                    if remaining == 0 {
                        self.completed = true;
                        let level = self.level();
                        tracing::info!(level, score = self.score, "level completed");
                        events.push(Event::LevelCompleted { level });
                    }
                }
                Event::BonusEaten { value } => {
                    self.score = self.score.saturating_add(value);
                    events.push(event);
                }
                other => events.push(other),
            }
        }
    }

    fn energize(&mut self, events: &mut Vec<Event>) {
        let ticks = self.params.frightened_ticks();
        if ticks == 0 {
            return;
        }
        self.power_ticks = ticks;
        self.next_bounty = FIRST_BOUNTY;
        tracing::debug!(ticks, "pac-man gains power");
        events.push(Event::PacManGainsPower);
    }

    /// Ghosts that Pac-Man's power reaches only on the next tick do not
    /// catch him on the tick he eats the energizer.
    fn collide(&mut self, events: &mut Vec<Event>) {
        let tile = self.pacman.mover.tile();
        let just_powered = events.contains(&Event::PacManGainsPower);
        let mut caught = false;
        for ghost in &self.ghosts {
            if ghost.mover.tile() != tile {
                continue;
            }
            let state = ghost.state();
            if state == GhostState::Frightened {
                let bounty = self.next_bounty;
                self.next_bounty = bounty.saturating_mul(2).min(MAX_BOUNTY);
                self.score = self.score.saturating_add(bounty);
                tracing::debug!(ghost = ghost::name(ghost.id), bounty, "ghost eaten");
                events.push(Event::GhostKilled {
                    ghost: ghost.id,
                    bounty,
                });
            } else if state.is_dangerous() && !caught && !just_powered {
                caught = true;
                tracing::info!(ghost = ghost::name(ghost.id), "pac-man caught");
                events.push(Event::PacManKilled { by: ghost.id });
            }
        }
    }
}

fn spawn(
    id: GhostId,
    world: &World,
    config: &GameConfig,
    tempo: &Tempo,
) -> Result<Ghost, FsmError> {
    let bed = query::house(world).bed(id);
    let mover = Mover::new(bed.tile(), bed.facing());
    let view = observe(id, &mover, world, tempo);
    Ok(Ghost {
        id,
        machine: ghost::machine(id, config, &view)?,
        mover,
        target: None,
    })
}

fn observe(ghost: GhostId, mover: &Mover, world: &World, tempo: &Tempo) -> GhostView {
    let house = query::house(world);
    GhostView {
        ghost,
        phase: tempo.phase,
        elroy: ghost == GhostId::Blinky && tempo.elroy > 0,
        powered: tempo.powered,
        frightened_ticks: tempo.frightened_ticks,
        outside: HouseExit::is_outside(mover, world),
        at_entry: mover.tile() == house.entry() && mover.is_aligned(),
        seated: mover.position() == Point::of_tile(house.revival_bed(ghost).tile()),
    }
}

fn target_of(
    state: GhostState,
    ghost: GhostId,
    own: Tile,
    pursued: Pursued,
    world: &World,
) -> Option<Tile> {
    let house = query::house(world);
    match state {
        GhostState::Scattering => Some(personality::scatter_corner(ghost, world)),
        GhostState::Chasing => Some(personality::chase_target(ghost, own, pursued, world)),
        GhostState::Dead => Some(house.entry()),
        GhostState::EnteringHouse => Some(house.revival_bed(ghost).tile()),
        GhostState::Locked | GhostState::LeavingHouse | GhostState::Frightened => None,
    }
}

fn ghost_speed(
    state: GhostState,
    ghost: &Ghost,
    world: &World,
    params: &LevelParams,
    elroy: u8,
) -> f32 {
    let fraction = if state.is_in_house() {
        HOUSE_SPEED
    } else if state == GhostState::Dead {
        DEAD_SPEED
    } else if query::is_tunnel(world, ghost.mover.tile()) {
        params.ghost_tunnel_speed
    } else if state == GhostState::Frightened {
        params.ghost_frightened_speed
    } else if ghost.id == GhostId::Blinky && elroy == 2 {
        params.elroy2_speed
    } else if ghost.id == GhostId::Blinky && elroy == 1 {
        params.elroy1_speed
    } else {
        params.ghost_speed
    };
    fraction * BASE_SPEED
}

fn move_agent(mover: &mut Mover, world: &World, access: Access, drive: Drive, speed: f32) {
    match drive {
        Drive::Grid => mover.advance(world, access, speed),
        Drive::Glide(point) => {
            let _ = mover.glide(point, speed);
        }
        Drive::Hold => mover.hold(),
    }
}
