//! Obstacles and dynamic hazards
//!
//! Every hazard is an `Obstacle` tagged with its kind. Time-based behavior
//! (mover steps, gate toggles, crumbling) runs off a `TimerRegistry`
//! owned by `Hazards`, ticked once per engine tick whether or not the
//! snake is frozen.

use std::collections::HashSet;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, Grid, Position, manhattan};
use super::level::LevelState;
use super::snake::Snake;
use super::timers::TimerRegistry;
use crate::tuning::Tuning;

pub type ObstacleId = u32;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Static wall cell
    Block,
    /// Part of the solid 3x3 core on boss levels
    BossCore,
    /// Slides one cell per step, reversing when blocked
    MovingBlock { velocity: IVec2 },
    /// Alternates between solid and passable
    Gate { solid: bool },
    /// Solid until its lifetime runs out, then removed
    CrumblingTile,
}

/// A single obstacle cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub pos: Position,
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// True if moving into this cell is a collision right now
    pub fn is_solid(&self) -> bool {
        match self.kind {
            ObstacleKind::Gate { solid } => solid,
            _ => true,
        }
    }
}

/// Hazard timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum HazardTimer {
    MoverStep,
    Gate(ObstacleId),
    Crumble(ObstacleId),
}

/// What changed during a hazard tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HazardChanges {
    pub movers_stepped: bool,
    pub gates_toggled: u32,
    pub crumbled: Vec<Position>,
}

/// All obstacles on the board
#[derive(Debug, Clone, Default)]
pub struct Hazards {
    /// Sorted by id for deterministic iteration
    obstacles: Vec<Obstacle>,
    timers: TimerRegistry<HazardTimer>,
    next_id: ObstacleId,
}

impl Hazards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.timers.clear();
    }

    /// Any obstacle (solid or not) on this cell; blocks spawning
    pub fn occupies(&self, pos: Position) -> bool {
        self.obstacles.iter().any(|o| o.pos == pos)
    }

    /// A solid obstacle on this cell; blocks movement
    pub fn is_solid_at(&self, pos: Position) -> bool {
        self.obstacles.iter().any(|o| o.pos == pos && o.is_solid())
    }

    /// Ticks left before the crumbling tile `id` disappears
    pub fn crumble_remaining(&self, id: ObstacleId) -> Option<u32> {
        self.timers.remaining(HazardTimer::Crumble(id))
    }

    pub fn count(&self, pred: impl Fn(&ObstacleKind) -> bool) -> usize {
        self.obstacles.iter().filter(|o| pred(&o.kind)).count()
    }

    fn push(&mut self, pos: Position, kind: ObstacleKind) -> ObstacleId {
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(Obstacle { id, pos, kind });
        id
    }

    /// Add a static block (also used by tests and scripted layouts)
    pub fn add_block(&mut self, pos: Position) -> ObstacleId {
        self.push(pos, ObstacleKind::Block)
    }

    pub fn add_moving(&mut self, pos: Position, velocity: IVec2, tuning: &Tuning) -> ObstacleId {
        let id = self.push(pos, ObstacleKind::MovingBlock { velocity });
        if !self.timers.is_active(HazardTimer::MoverStep) {
            self.timers
                .register(HazardTimer::MoverStep, tuning.hazards.mover_step_ticks.max(1));
        }
        id
    }

    /// Add a gate whose first toggle happens after `first_toggle` ticks
    pub fn add_gate(&mut self, pos: Position, solid: bool, first_toggle: u32) -> ObstacleId {
        let id = self.push(pos, ObstacleKind::Gate { solid });
        self.timers.register(HazardTimer::Gate(id), first_toggle.max(1));
        id
    }

    pub fn add_crumbling(&mut self, pos: Position, lifetime: u32) -> ObstacleId {
        let id = self.push(pos, ObstacleKind::CrumblingTile);
        self.timers.register(HazardTimer::Crumble(id), lifetime.max(1));
        id
    }

    /// Regenerate every hazard for `level`, keeping clear of the snake and
    /// its head.
    pub fn build_for_level<R: Rng>(
        &mut self,
        level: &LevelState,
        grid: &Grid,
        snake: &Snake,
        rng: &mut R,
        tuning: &Tuning,
    ) {
        self.clear();
        let head = snake.head();
        let min_distance = tuning.snake.min_spawn_distance;
        let ht = &tuning.hazards;
        let budget = level.hazards;
        let mut occupied: HashSet<Position> = snake.segments().collect();

        if budget.boss_core {
            if let Some(cells) = place_boss_core(grid, &occupied, head, rng, tuning) {
                for pos in cells {
                    self.push(pos, ObstacleKind::BossCore);
                    occupied.insert(pos);
                }
            }
        }

        // Static clusters
        let target = budget.static_cells as usize;
        let max_attempts = (target * 12).max(12);
        let cluster_max = tuning.level.obstacle_cluster_max.max(1);
        let mut placed = 0usize;
        let mut attempts = 0usize;
        while placed < target && attempts < max_attempts {
            attempts += 1;
            let size = rng.random_range(1..=cluster_max);
            let ox = rng.random_range(0..=(grid.width - size).max(0));
            let oy = rng.random_range(0..=(grid.height - size).max(0));
            let cells: Vec<Position> = (oy..oy + size)
                .flat_map(|y| (ox..ox + size).map(move |x| IVec2::new(x, y)))
                .collect();
            let clear = cells.iter().all(|&pos| {
                grid.in_bounds(pos) && !occupied.contains(&pos) && manhattan(pos, head) >= min_distance
            });
            if !clear {
                continue;
            }
            for pos in cells {
                self.push(pos, ObstacleKind::Block);
                occupied.insert(pos);
                placed += 1;
            }
        }

        for _ in 0..budget.moving {
            let Some(pos) = grid.random_free_cell(rng, head, min_distance, |p| occupied.contains(&p))
            else {
                break;
            };
            let dir = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
            self.add_moving(pos, dir.delta(), tuning);
            occupied.insert(pos);
        }

        let gate_cycle = ht.gate_solid_ticks + ht.gate_open_ticks;
        for _ in 0..budget.gates {
            let Some(pos) = grid.random_free_cell(rng, head, min_distance, |p| occupied.contains(&p))
            else {
                break;
            };
            let solid = rng.random_bool(0.5);
            let first_toggle = rng.random_range(1..=gate_cycle.max(1));
            self.add_gate(pos, solid, first_toggle);
            occupied.insert(pos);
        }

        for _ in 0..budget.crumbling {
            let Some(pos) = grid.random_free_cell(rng, head, min_distance, |p| occupied.contains(&p))
            else {
                break;
            };
            self.add_crumbling(pos, ht.crumble_lifetime);
            occupied.insert(pos);
        }

        log::debug!(
            "Built level {} hazards: {} obstacles ({} static of {} requested)",
            level.level,
            self.obstacles.len(),
            placed,
            target
        );
    }

    /// Advance hazard timers by one tick and react to expiries
    pub fn tick(&mut self, grid: &Grid, snake: &Snake, tuning: &Tuning) -> HazardChanges {
        let ht = &tuning.hazards;
        let mut changes = HazardChanges::default();

        for expired in self.timers.tick() {
            match expired {
                HazardTimer::MoverStep => {
                    self.step_movers(grid, snake);
                    changes.movers_stepped = true;
                    self.timers
                        .register(HazardTimer::MoverStep, ht.mover_step_ticks.max(1));
                }
                HazardTimer::Gate(id) => {
                    let Some(gate) = self.obstacles.iter_mut().find(|o| o.id == id) else {
                        continue;
                    };
                    let ObstacleKind::Gate { solid } = gate.kind else {
                        continue;
                    };
                    let next = if solid {
                        gate.kind = ObstacleKind::Gate { solid: false };
                        changes.gates_toggled += 1;
                        ht.gate_open_ticks
                    } else if snake.occupies(gate.pos) {
                        // Never close onto the snake
                        ht.gate_retry_ticks
                    } else {
                        gate.kind = ObstacleKind::Gate { solid: true };
                        changes.gates_toggled += 1;
                        ht.gate_solid_ticks
                    };
                    self.timers.register(HazardTimer::Gate(id), next.max(1));
                }
                HazardTimer::Crumble(id) => {
                    if let Some(idx) = self.obstacles.iter().position(|o| o.id == id) {
                        let tile = self.obstacles.remove(idx);
                        changes.crumbled.push(tile.pos);
                    }
                }
            }
        }

        changes
    }

    /// Move every moving block one cell, bouncing off walls, other
    /// obstacles and the snake.
    fn step_movers(&mut self, grid: &Grid, snake: &Snake) {
        for i in 0..self.obstacles.len() {
            let ObstacleKind::MovingBlock { velocity } = self.obstacles[i].kind else {
                continue;
            };
            let id = self.obstacles[i].id;
            let pos = self.obstacles[i].pos;
            let blocked = |cell: Position| {
                !grid.in_bounds(cell)
                    || snake.occupies(cell)
                    || self.obstacles.iter().any(|o| o.id != id && o.pos == cell)
            };

            let (new_pos, new_velocity) = if !blocked(pos + velocity) {
                (pos + velocity, velocity)
            } else if !blocked(pos - velocity) {
                (pos - velocity, -velocity)
            } else {
                (pos, -velocity)
            };

            self.obstacles[i].pos = new_pos;
            self.obstacles[i].kind = ObstacleKind::MovingBlock {
                velocity: new_velocity,
            };
        }
    }
}

/// Find a square boss core away from the head; `None` if nothing fits
fn place_boss_core<R: Rng>(
    grid: &Grid,
    occupied: &HashSet<Position>,
    head: Position,
    rng: &mut R,
    tuning: &Tuning,
) -> Option<Vec<Position>> {
    let size = tuning.hazards.boss_core_size.max(1);
    let min_distance = tuning.snake.min_spawn_distance + 2;
    for _ in 0..80 {
        let ox = rng.random_range(1..=(grid.width - size - 1).max(1));
        let oy = rng.random_range(1..=(grid.height - size - 1).max(1));
        let cells: Vec<Position> = (oy..oy + size)
            .flat_map(|y| (ox..ox + size).map(move |x| IVec2::new(x, y)))
            .collect();
        let fits = cells.iter().all(|&pos| {
            grid.in_bounds(pos) && !occupied.contains(&pos) && manhattan(pos, head) >= min_distance
        });
        if fits {
            return Some(cells);
        }
    }
    None
}
