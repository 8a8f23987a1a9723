#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze state for the chase engine.
//!
//! The world owns the immutable [`TileGraph`] together with the regions the
//! game layers on top of it: the ghost house, the portals, the food overlay
//! and the bonus tile. It owns no agents. Mutations arrive as
//! [`Command`] values through [`apply`]; reads go through [`query`].

mod maze;
mod navigation;

use maze_chase_core::{BonusSymbol, Command, Direction, DoorId, Event, FoodKind, GhostId, Tile};

pub use maze::{MazeError, CLASSIC_MAZE};
pub use navigation::{DistanceField, TileContent, TileGraph};

/// Errors reported by world queries.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// A direction was requested between tiles that are not 4-adjacent.
    #[error("tiles {from:?} and {to:?} are not adjacent")]
    NotAdjacent {
        /// Origin tile.
        from: Tile,
        /// Destination tile.
        to: Tile,
    },
}

/// Movement privilege of an agent, deciding which tiles it may enter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    /// Walls, doors and the house interior are closed.
    Outside,
    /// Only walls are closed.
    ThroughDoors,
}

/// Gateway tile between the house interior and the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Door {
    id: DoorId,
    tile: Tile,
    open: bool,
}

impl Door {
    pub(crate) const fn new(index: u32, tile: Tile) -> Self {
        Self {
            id: DoorId::new(index),
            tile,
            open: false,
        }
    }

    /// Identifier of the door.
    #[must_use]
    pub const fn id(&self) -> DoorId {
        self.id
    }

    /// Tile occupied by the door.
    #[must_use]
    pub const fn tile(&self) -> Tile {
        self.tile
    }

    /// Whether the door is currently shown open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Reports whether `tile` lies within two steps of the door.
    #[must_use]
    pub fn is_near(&self, tile: Tile) -> bool {
        self.tile.manhattan_distance(tile) <= 2
    }
}

/// Resting spot of a ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bed {
    ghost: GhostId,
    tile: Tile,
    facing: Direction,
}

impl Bed {
    pub(crate) const fn new(ghost: GhostId, tile: Tile, facing: Direction) -> Self {
        Self {
            ghost,
            tile,
            facing,
        }
    }

    /// Ghost the bed belongs to.
    #[must_use]
    pub const fn ghost(&self) -> GhostId {
        self.ghost
    }

    /// Tile of the bed.
    #[must_use]
    pub const fn tile(&self) -> Tile {
        self.tile
    }

    /// Direction a ghost faces while resting.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }
}

/// The ghost house: entry tile, doors, enclosed interior and beds.
#[derive(Clone, Debug)]
pub struct House {
    entry: Tile,
    doors: Vec<Door>,
    interior: Vec<Tile>,
    beds: [Bed; 4],
}

impl House {
    pub(crate) fn new(entry: Tile, doors: Vec<Door>, interior: Vec<Tile>, beds: [Bed; 4]) -> Self {
        let mut interior = interior;
        interior.sort_unstable();
        Self {
            entry,
            doors,
            interior,
            beds,
        }
    }

    /// Tile directly above a door through which ghosts enter and leave.
    #[must_use]
    pub const fn entry(&self) -> Tile {
        self.entry
    }

    /// Doors of the house ordered by identifier.
    #[must_use]
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// Door beneath the entry tile, if present.
    #[must_use]
    pub fn entry_door(&self) -> Option<&Door> {
        let below = self.entry.neighbor(Direction::Down);
        self.doors.iter().find(|door| door.tile == below)
    }

    /// Reports whether `tile` lies inside the enclosure.
    #[must_use]
    pub fn contains(&self, tile: Tile) -> bool {
        self.interior.binary_search(&tile).is_ok()
    }

    /// Tiles inside the enclosure in sorted order.
    #[must_use]
    pub fn interior(&self) -> &[Tile] {
        &self.interior
    }

    /// Bed a ghost occupies at the start of a level.
    #[must_use]
    pub const fn bed(&self, ghost: GhostId) -> Bed {
        self.beds[ghost.index()]
    }

    /// Bed a ghost returns to after being eaten.
    ///
    /// Blinky's starting seat is outside the enclosure, so he is revived on
    /// Pinky's bed instead.
    #[must_use]
    pub const fn revival_bed(&self, ghost: GhostId) -> Bed {
        match ghost {
            GhostId::Blinky => {
                let pinky = self.beds[GhostId::Pinky.index()];
                Bed::new(GhostId::Blinky, pinky.tile, pinky.facing)
            }
            _ => self.beds[ghost.index()],
        }
    }

    fn door_mut(&mut self, id: DoorId) -> Option<&mut Door> {
        self.doors.iter_mut().find(|door| door.id == id)
    }
}

/// Wraparound link between two tiles just beyond opposite grid edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Portal {
    first: Tile,
    second: Tile,
}

impl Portal {
    pub(crate) const fn new(first: Tile, second: Tile) -> Self {
        Self { first, second }
    }

    /// Both outside tiles of the portal.
    #[must_use]
    pub const fn ends(&self) -> (Tile, Tile) {
        (self.first, self.second)
    }

    /// The opposite end when `tile` is one end of this portal.
    #[must_use]
    pub fn counterpart(&self, tile: Tile) -> Option<Tile> {
        if tile == self.first {
            Some(self.second)
        } else if tile == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

/// Bonus currently shown on the bonus tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveBonus {
    symbol: BonusSymbol,
    value: u32,
    remaining_ticks: u32,
}

impl ActiveBonus {
    /// Symbol of the bonus.
    #[must_use]
    pub const fn symbol(&self) -> BonusSymbol {
        self.symbol
    }

    /// Points awarded when eaten.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Ticks until the bonus disappears.
    #[must_use]
    pub const fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }
}

/// Represents the authoritative maze state.
#[derive(Clone, Debug)]
pub struct World {
    graph: TileGraph,
    initial_food: Vec<Option<FoodKind>>,
    food: Vec<Option<FoodKind>>,
    total_food: u32,
    remaining_food: u32,
    house: House,
    portals: Vec<Portal>,
    pacman_start: Tile,
    bonus_tile: Option<Tile>,
    bonus: Option<ActiveBonus>,
    tick_index: u64,
}

impl World {
    /// Builds a world from an ASCII maze definition.
    pub fn from_text(text: &str) -> Result<Self, MazeError> {
        let blueprint = maze::parse(text)?;
        let total_food = blueprint.food.iter().filter(|food| food.is_some()).count() as u32;
        tracing::debug!(
            columns = blueprint.graph.columns(),
            rows = blueprint.graph.rows(),
            food = total_food,
            portals = blueprint.portals.len(),
            "maze parsed"
        );
        Ok(Self {
            graph: blueprint.graph,
            initial_food: blueprint.food.clone(),
            food: blueprint.food,
            total_food,
            remaining_food: total_food,
            house: blueprint.house,
            portals: blueprint.portals,
            pacman_start: blueprint.pacman_start,
            bonus_tile: blueprint.bonus,
            bonus: None,
            tick_index: 0,
        })
    }

    /// Builds the classic arcade maze.
    pub fn classic() -> Result<Self, MazeError> {
        Self::from_text(CLASSIC_MAZE)
    }

    fn consume_food(&mut self, tile: Tile, out_events: &mut Vec<Event>) {
        let Some(index) = self.graph.index(tile) else {
            return;
        };
        let Some(kind) = self.food[index].take() else {
            return;
        };
        self.remaining_food = self.remaining_food.saturating_sub(1);
        out_events.push(Event::FoodEaten {
            tile,
            kind,
            remaining: self.remaining_food,
        });
    }

    fn set_door(&mut self, id: DoorId, open: bool, out_events: &mut Vec<Event>) {
        let Some(door) = self.house.door_mut(id) else {
            tracing::warn!(door = id.get(), "ignoring command for unknown door");
            return;
        };
        if door.open == open {
            return;
        }
        door.open = open;
        out_events.push(if open {
            Event::DoorOpened { door: id }
        } else {
            Event::DoorClosed { door: id }
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            if let Some(bonus) = world.bonus.as_mut() {
                bonus.remaining_ticks = bonus.remaining_ticks.saturating_sub(1);
                if bonus.remaining_ticks == 0 {
                    world.bonus = None;
                    out_events.push(Event::BonusExpired);
                }
            }
        }
        Command::ConsumeFood { tile } => world.consume_food(tile, out_events),
        Command::RestoreFood => {
            world.food.clone_from(&world.initial_food);
            world.remaining_food = world.total_food;
        }
        Command::SetDoor { door, open } => world.set_door(door, open, out_events),
        Command::ActivateBonus {
            symbol,
            value,
            ticks,
        } => {
            let Some(tile) = world.bonus_tile else {
                return;
            };
            if ticks == 0 {
                return;
            }
            world.bonus = Some(ActiveBonus {
                symbol,
                value,
                remaining_ticks: ticks,
            });
            out_events.push(Event::BonusActivated {
                tile,
                symbol,
                value,
            });
        }
        Command::ConsumeBonus => {
            if let Some(bonus) = world.bonus.take() {
                out_events.push(Event::BonusEaten { value: bonus.value });
            }
        }
        Command::ClearBonus => world.bonus = None,
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_chase_core::{Direction, FoodKind, Tile};

    use super::{Access, ActiveBonus, DistanceField, Door, House, Portal, TileGraph, World};

    /// Provides read-only access to the maze graph.
    #[must_use]
    pub fn graph(world: &World) -> &TileGraph {
        &world.graph
    }

    /// Number of ticks the world clock has advanced.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Reports whether an agent with the given privilege may enter `tile`.
    ///
    /// Walls are never accessible. Doors and the house interior are only
    /// accessible through [`Access::ThroughDoors`]. Tiles beyond the grid are
    /// accessible only when they are portal ends.
    #[must_use]
    pub fn is_accessible(world: &World, tile: Tile, access: Access) -> bool {
        if !world.graph.contains(tile) {
            return is_portal(world, tile);
        }
        if world.graph.is_wall(tile) {
            return false;
        }
        match access {
            Access::ThroughDoors => true,
            Access::Outside => !world.graph.is_door(tile) && !world.house.contains(tile),
        }
    }

    /// Reports whether food lies on the tile.
    #[must_use]
    pub fn has_food(world: &World, tile: Tile) -> bool {
        food_at(world, tile).is_some()
    }

    /// Food lying on the tile, if any.
    #[must_use]
    pub fn food_at(world: &World, tile: Tile) -> Option<FoodKind> {
        world.graph.index(tile).and_then(|index| world.food[index])
    }

    /// Food items still present.
    #[must_use]
    pub fn remaining_food(world: &World) -> u32 {
        world.remaining_food
    }

    /// Food items eaten since the food was last restored.
    #[must_use]
    pub fn eaten_food(world: &World) -> u32 {
        world.total_food - world.remaining_food
    }

    /// Food items the maze started with.
    #[must_use]
    pub fn total_food(world: &World) -> u32 {
        world.total_food
    }

    /// Shortest path over tiles accessible with `access`, both ends included.
    ///
    /// When `forbidden_first` is set, the path may not leave `from` in that
    /// direction. An empty path is returned when no such path exists.
    #[must_use]
    pub fn shortest_path(
        world: &World,
        from: Tile,
        to: Tile,
        access: Access,
        forbidden_first: Option<Direction>,
    ) -> Vec<Tile> {
        world.graph.shortest_path(from, to, |a, b| {
            if a == from && forbidden_first.is_some_and(|dir| a.neighbor(dir) == b) {
                return false;
            }
            is_accessible(world, b, access)
        })
    }

    /// Breadth-first distances from `source` over accessible tiles.
    #[must_use]
    pub fn distance_field(world: &World, source: Tile, access: Access) -> DistanceField {
        world
            .graph
            .distance_field(source, |_, to| is_accessible(world, to, access))
    }

    /// Provides read-only access to the ghost house.
    #[must_use]
    pub fn house(world: &World) -> &House {
        &world.house
    }

    /// Doors of the house.
    #[must_use]
    pub fn doors(world: &World) -> &[Door] {
        world.house.doors()
    }

    /// Portals of the maze.
    #[must_use]
    pub fn portals(world: &World) -> &[Portal] {
        &world.portals
    }

    /// Reports whether the tile is one end of a portal.
    #[must_use]
    pub fn is_portal(world: &World, tile: Tile) -> bool {
        portal_counterpart(world, tile).is_some()
    }

    /// The opposite end of the portal whose end is `tile`.
    #[must_use]
    pub fn portal_counterpart(world: &World, tile: Tile) -> Option<Tile> {
        world
            .portals
            .iter()
            .find_map(|portal| portal.counterpart(tile))
    }

    /// Reports whether the tile slows ghosts down.
    ///
    /// Portal ends count as tunnel tiles.
    #[must_use]
    pub fn is_tunnel(world: &World, tile: Tile) -> bool {
        world.graph.is_tunnel(tile) || is_portal(world, tile)
    }

    /// Tile on which Pac-Man starts each life.
    #[must_use]
    pub fn pacman_start(world: &World) -> Tile {
        world.pacman_start
    }

    /// Tile on which the bonus appears, if the maze has one.
    #[must_use]
    pub fn bonus_tile(world: &World) -> Option<Tile> {
        world.bonus_tile
    }

    /// Bonus currently shown, if any.
    #[must_use]
    pub fn bonus(world: &World) -> Option<&ActiveBonus> {
        world.bonus.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> World {
        World::classic().expect("classic maze parses")
    }

    #[test]
    fn consuming_food_is_idempotent() {
        let mut world = classic();
        let tile = Tile::new(1, 1);
        let mut events = Vec::new();

        apply(&mut world, Command::ConsumeFood { tile }, &mut events);
        apply(&mut world, Command::ConsumeFood { tile }, &mut events);

        assert_eq!(
            events,
            vec![Event::FoodEaten {
                tile,
                kind: FoodKind::Pellet,
                remaining: 243,
            }]
        );
        assert!(!query::has_food(&world, tile));
        assert_eq!(query::remaining_food(&world), 243);
        assert_eq!(query::eaten_food(&world), 1);
    }

    #[test]
    fn restore_food_refills_every_tile() {
        let mut world = classic();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConsumeFood {
                tile: Tile::new(1, 3),
            },
            &mut events,
        );
        assert_eq!(
            events[0],
            Event::FoodEaten {
                tile: Tile::new(1, 3),
                kind: FoodKind::Energizer,
                remaining: 243,
            }
        );

        apply(&mut world, Command::RestoreFood, &mut events);
        assert_eq!(query::remaining_food(&world), 244);
        assert_eq!(query::food_at(&world, Tile::new(1, 3)), Some(FoodKind::Energizer));
    }

    #[test]
    fn access_depends_on_privilege() {
        let world = classic();
        let door = Tile::new(13, 12);
        let interior = Tile::new(13, 14);

        assert!(!query::is_accessible(&world, Tile::new(0, 0), Access::ThroughDoors));
        assert!(!query::is_accessible(&world, door, Access::Outside));
        assert!(query::is_accessible(&world, door, Access::ThroughDoors));
        assert!(!query::is_accessible(&world, interior, Access::Outside));
        assert!(query::is_accessible(&world, interior, Access::ThroughDoors));
        assert!(query::is_accessible(&world, Tile::new(-1, 14), Access::Outside));
        assert!(!query::is_accessible(&world, Tile::new(-2, 14), Access::Outside));
        assert!(!query::is_accessible(&world, Tile::new(-1, 13), Access::Outside));
    }

    #[test]
    fn portals_pair_opposite_edges() {
        let world = classic();
        assert_eq!(
            query::portal_counterpart(&world, Tile::new(-1, 14)),
            Some(Tile::new(28, 14))
        );
        assert_eq!(
            query::portal_counterpart(&world, Tile::new(28, 14)),
            Some(Tile::new(-1, 14))
        );
        assert!(query::is_tunnel(&world, Tile::new(2, 14)));
        assert!(!query::is_tunnel(&world, Tile::new(7, 14)));
    }

    #[test]
    fn door_commands_emit_only_on_change() {
        let mut world = classic();
        let door = query::doors(&world)[0].id();
        let mut events = Vec::new();

        apply(&mut world, Command::SetDoor { door, open: true }, &mut events);
        apply(&mut world, Command::SetDoor { door, open: true }, &mut events);
        apply(&mut world, Command::SetDoor { door, open: false }, &mut events);
        apply(
            &mut world,
            Command::SetDoor {
                door: DoorId::new(99),
                open: true,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::DoorOpened { door }, Event::DoorClosed { door }]
        );
        assert!(!query::doors(&world)[0].is_open());
    }

    #[test]
    fn bonus_expires_after_its_ticks() {
        let mut world = classic();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ActivateBonus {
                symbol: BonusSymbol::Cherries,
                value: 100,
                ticks: 2,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::BonusActivated {
                tile: Tile::new(13, 17),
                symbol: BonusSymbol::Cherries,
                value: 100,
            }]
        );

        events.clear();
        apply(&mut world, Command::Tick, &mut events);
        assert!(events.is_empty());
        assert_eq!(query::bonus(&world).map(ActiveBonus::remaining_ticks), Some(1));
        apply(&mut world, Command::Tick, &mut events);
        assert_eq!(events, vec![Event::BonusExpired]);
        assert!(query::bonus(&world).is_none());
        assert_eq!(query::tick_index(&world), 2);
    }

    #[test]
    fn eating_bonus_awards_value_once() {
        let mut world = classic();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ActivateBonus {
                symbol: BonusSymbol::Key,
                value: 5000,
                ticks: 600,
            },
            &mut events,
        );
        events.clear();
        apply(&mut world, Command::ConsumeBonus, &mut events);
        apply(&mut world, Command::ConsumeBonus, &mut events);
        assert_eq!(events, vec![Event::BonusEaten { value: 5000 }]);
    }

    #[test]
    fn revival_bed_of_blinky_is_inside_the_house() {
        let world = classic();
        let house = query::house(&world);
        assert!(!house.contains(house.bed(GhostId::Blinky).tile()));
        assert_eq!(house.revival_bed(GhostId::Blinky).tile(), Tile::new(13, 14));
        assert_eq!(house.revival_bed(GhostId::Inky), house.bed(GhostId::Inky));
        assert_eq!(house.entry_door().map(Door::tile), Some(Tile::new(13, 12)));
    }

    #[test]
    fn shortest_path_can_forbid_first_step() {
        let world = classic();
        let from = Tile::new(6, 5);
        let to = Tile::new(9, 5);

        let direct = query::shortest_path(&world, from, to, Access::Outside, None);
        assert_eq!(direct.len(), 4);

        let detour = query::shortest_path(&world, from, to, Access::Outside, Some(Direction::Right));
        assert!(detour.len() > 4);
        assert_ne!(detour[1], Tile::new(7, 5));
    }
}
