use std::io::Write;

use tracing::debug;

use crate::navigation::navigate_to_edge;
use crate::{
    BoardError, Config, Edge, ForecastError, GameMap, ParseError, Player, PlayerIndexError, Position, RemoveError,
    RemoveFailureReason, Resource, SpawnCommand, SpawnError, SpawnFailureReason, StateMessage, Unit, UnitType,
    UnitTypeError, Verbosity, HALF_ARENA, RANGE_TOLERANCE,
};

/// The highest number of turns [`GameState::project_future_bits()`] looks ahead.
pub const MAX_FORECAST_TURNS: u32 = 99;

/// Everything known about the game at the start of a turn.
///
/// Besides answering questions about the game, this collects the actions of
/// the turn. Each accepted spawn or removal is applied to the map and the
/// resources right away, so that later checks in the same turn see it, and
/// recorded for [`Self::submit_turn()`].
#[derive(Clone, Debug)]
pub struct GameState<'c> {
    config: &'c Config,
    map: GameMap<'c>,
    verbosity: Verbosity,
    turn_number: u32,
    players: [Player; 2],
    build_stack: Vec<SpawnCommand>,
    deploy_stack: Vec<SpawnCommand>,
}

impl<'c> GameState<'c> {
    /// Parses a state message line sent by the engine.
    pub fn parse(config: &'c Config, line: &str, verbosity: Verbosity) -> Result<Self, ParseError> {
        let message: StateMessage = serde_json::from_str(line)?;
        Self::from_message(config, &message, verbosity)
    }

    pub fn from_message(config: &'c Config, message: &StateMessage, verbosity: Verbosity) -> Result<Self, ParseError> {
        let turn_number = *message.turn_info.get(1).ok_or(ParseError::MissingField("turnInfo"))?;
        let players = [
            Player::from_stats(0, &message.p1_stats)?,
            Player::from_stats(1, &message.p2_stats)?,
        ];

        let mut map = GameMap::new(config, verbosity);
        for (owner, units) in [&message.p1_units, &message.p2_units].into_iter().enumerate() {
            // Remove markers come last, after the units they refer to
            for (index, entries) in units.iter().enumerate() {
                let unit_type = UnitType::from_index(index)?;
                for entry in entries {
                    map.add_unit(unit_type, entry.position(), owner, entry.health())?;
                }
            }
        }

        Ok(GameState {
            config,
            map,
            verbosity,
            turn_number: turn_number.max(0.0) as u32,
            players,
            build_stack: Vec::new(),
            deploy_stack: Vec::new(),
        })
    }

    pub fn config(&self) -> &'c Config {
        self.config
    }

    pub fn map(&self) -> &GameMap<'c> {
        &self.map
    }

    /// The current turn number, starting at 0.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
        self.map.set_verbosity(verbosity);
    }

    pub fn player(&self, index: usize) -> Result<&Player, PlayerIndexError> {
        self.players.get(index).ok_or(PlayerIndexError(index))
    }

    pub fn resource(&self, resource: Resource, player: usize) -> Result<f64, PlayerIndexError> {
        Ok(self.player(player)?.resource(resource))
    }

    /// The `[bits, cores]` of a player.
    pub fn resources(&self, player: usize) -> Result<[f64; 2], PlayerIndexError> {
        let player = self.player(player)?;
        Ok([player.bits, player.cores])
    }

    pub fn type_cost(&self, unit_type: UnitType) -> Result<f64, UnitTypeError> {
        Ok(self.config.unit_information(unit_type)?.cost)
    }

    pub fn resource_required(&self, unit_type: UnitType) -> Resource {
        if unit_type.is_stationary() {
            Resource::Cores
        } else {
            Resource::Bits
        }
    }

    /// How many units of a type you can afford. Free units saturate at `u32::MAX`.
    pub fn number_affordable(&self, unit_type: UnitType) -> Result<u32, UnitTypeError> {
        let cost = self.type_cost(unit_type)?;
        let held = self.players[0].resource(self.resource_required(unit_type));
        if cost <= 0.0 {
            return Ok(u32::MAX);
        }
        Ok((held / cost).floor().max(0.0) as u32)
    }

    /// Checks whether you could spawn `num` units of a type at a location.
    ///
    /// Stationary units need an empty cell in your own half of the arena and
    /// can only be placed one at a time. Mobile units must be deployed on
    /// one of your deploy edges, and can share a cell with other mobile units.
    pub fn check_spawn(&self, unit_type: UnitType, position: Position, num: u32) -> Result<(), SpawnError> {
        let fail = |reason| {
            Err(SpawnError {
                unit_type,
                position,
                reason,
            })
        };
        if !unit_type.is_stationary() && !unit_type.is_mobile() {
            return fail(SpawnFailureReason::NotSpawnable);
        }
        if num < 1 {
            return fail(SpawnFailureReason::FewerThanOneUnit);
        }
        let Some(units) = self.map.get(position) else {
            return fail(SpawnFailureReason::OutOfBounds);
        };
        match self.number_affordable(unit_type) {
            Ok(affordable) if affordable >= num => {}
            Ok(_) => return fail(SpawnFailureReason::NotEnoughResources),
            Err(_) => return fail(SpawnFailureReason::NotSpawnable),
        }
        let stationary = unit_type.is_stationary();
        if self.map.contains_stationary_unit(position) || (stationary && !units.is_empty()) {
            return fail(SpawnFailureReason::Blocked);
        }
        if position.y >= HALF_ARENA {
            return fail(SpawnFailureReason::EnemyTerritory);
        }
        if !stationary && !is_deploy_location(position) {
            return fail(SpawnFailureReason::NotOnDeployEdge);
        }
        if stationary && num != 1 {
            return fail(SpawnFailureReason::MultipleStationary);
        }
        Ok(())
    }

    pub fn can_spawn(&self, unit_type: UnitType, position: Position, num: u32) -> bool {
        self.check_spawn(unit_type, position, num).is_ok()
    }

    /// Spawns `num` units of a type at each of the given locations, as far
    /// as possible.
    ///
    /// Each unit is checked and paid for separately. The first unit that
    /// cannot be spawned is handled according to the verbosity: it becomes
    /// an error under [`Verbosity::Invariant`] and above, otherwise the
    /// remaining units for that location are skipped. Units spawned before
    /// an error stay spawned.
    ///
    /// Returns the number of units spawned.
    pub fn attempt_spawn(&mut self, unit_type: UnitType, locations: &[Position], num: u32) -> Result<usize, SpawnError> {
        let mut spawned = 0;
        for &position in locations {
            for _ in 0..num.max(1) {
                let checked = self.check_spawn(unit_type, position, num.min(1));
                // Resources and cells only get scarcer, the rest would fail too
                if !self.verbosity.check(Verbosity::Warning, checked)? {
                    break;
                }
                self.spawn_unchecked(unit_type, position)?;
                spawned += 1;
            }
        }
        Ok(spawned)
    }

    fn spawn_unchecked(&mut self, unit_type: UnitType, position: Position) -> Result<(), SpawnError> {
        let blocked = SpawnError {
            unit_type,
            position,
            reason: SpawnFailureReason::Blocked,
        };
        let cost = self.type_cost(unit_type).map_err(|_| SpawnError {
            reason: SpawnFailureReason::NotSpawnable,
            ..blocked.clone()
        })?;
        if self.map.add_unit(unit_type, position, 0, 0.0) != Ok(true) {
            return Err(blocked);
        }
        let resource = self.resource_required(unit_type);
        self.players[0].spend(resource, cost);

        let command = SpawnCommand::new(self.config.shorthand(unit_type), position);
        debug!("Queued {} at {}", unit_type, position);
        if unit_type.is_stationary() {
            self.build_stack.push(command);
        } else {
            self.deploy_stack.push(command);
        }
        Ok(())
    }

    /// Flags your own stationary units at the given locations for removal
    /// at the end of the turn.
    ///
    /// Failures are handled like in [`Self::attempt_spawn()`]. Returns the
    /// number of units flagged.
    pub fn attempt_remove(&mut self, locations: &[Position]) -> Result<usize, RemoveError> {
        let mut removed = 0;
        for &position in locations {
            let reason = if !self.map.in_arena_bounds(position) {
                Some(RemoveFailureReason::OutOfBounds)
            } else if position.y >= HALF_ARENA {
                Some(RemoveFailureReason::EnemyTerritory)
            } else if !self.map.contains_stationary_unit(position) {
                Some(RemoveFailureReason::NoStationaryUnit)
            } else {
                None
            };
            let checked = match reason {
                Some(reason) => Err(RemoveError { position, reason }),
                None => Ok(()),
            };
            if !self.verbosity.check(Verbosity::Warning, checked)? {
                continue;
            }
            self.build_stack
                .push(SpawnCommand::new(self.config.shorthand(UnitType::Remove), position));
            removed += 1;
        }
        Ok(removed)
    }

    /// Predicts how many bits a player will hold after the given number of turns.
    ///
    /// Each turn, the held bits decay and the income is added, which grows
    /// every `turnIntervalForBitSchedule` turns. The amount is rounded to two
    /// decimals after every turn. Starts from `current_bits`, or from what
    /// the player holds now.
    pub fn project_future_bits(
        &self,
        turns: u32,
        player: usize,
        current_bits: Option<f64>,
    ) -> Result<f64, ForecastError> {
        let turns_valid = if (1..=MAX_FORECAST_TURNS).contains(&turns) {
            Ok(())
        } else {
            Err(ForecastError::TurnsOutOfRange(turns))
        };
        self.verbosity.check(Verbosity::Warning, turns_valid)?;
        if let Some(bits) = current_bits.filter(|&bits| bits < 0.0) {
            self.verbosity.check(Verbosity::Warning, Err(ForecastError::NegativeBits(bits)))?;
        }

        let held = match self.player(player) {
            Ok(player) => player.bits,
            Err(err) => {
                self.verbosity.check(Verbosity::Warning, Err(ForecastError::PlayerIndex(err)))?;
                0.0
            }
        };
        let resources = &self.config.resources;
        let mut bits = current_bits.unwrap_or(held);
        for increment in 1..=turns.min(MAX_FORECAST_TURNS) {
            let turn = f64::from(self.turn_number + increment);
            let schedule = (turn / resources.turn_interval_for_bit_schedule).floor();
            bits = bits * (1.0 - resources.bit_decay_per_round)
                + resources.bits_per_round
                + resources.bit_growth_rate * schedule;
            bits = (bits * 100.0).round() / 100.0;
        }
        Ok(bits)
    }

    /// The edge a mobile unit deployed at `start` walks towards, i.e. the
    /// edge opposite of the quadrant it starts in.
    pub fn target_edge(&self, start: Position) -> Edge {
        let start_edge = match (start.x < HALF_ARENA, start.y < HALF_ARENA) {
            (true, true) => Edge::BottomLeft,
            (false, true) => Edge::BottomRight,
            (true, false) => Edge::TopLeft,
            (false, false) => Edge::TopRight,
        };
        start_edge.opposite()
    }

    /// The path a mobile unit at `start` would take to an edge, by default
    /// the one given by [`Self::target_edge()`].
    ///
    /// Empty if the start is blocked or outside of the arena.
    pub fn find_path_to_edge(&self, start: Position, edge: Option<Edge>) -> Vec<Position> {
        let edge = edge.unwrap_or_else(|| self.target_edge(start));
        if self.map.contains_stationary_unit(start) {
            debug!("Not pathing from {}, it is blocked", start);
        }
        navigate_to_edge(&self.map.occupancy(), start, &edge.locations())
    }

    /// The stationary units of the opponent of `player` that would damage a
    /// unit of `player` standing at `position`.
    pub fn attackers(&self, position: Position, player: usize) -> Result<Vec<&Unit>, PlayerIndexError> {
        self.player(player)?;
        Ok(self
            .map
            .units()
            .filter(|unit| unit.stationary && unit.owner != player && unit.deals_damage())
            .filter(|unit| unit.position.distance(position) < unit.range + RANGE_TOLERANCE)
            .collect())
    }

    /// The unit `attacker` would shoot at right now, if any.
    ///
    /// Mobile units are preferred over stationary ones, then the nearest unit,
    /// then the one with the least health, then the one closest to the
    /// attacker's own side, and finally the one furthest from the center column.
    pub fn target(&self, attacker: &Unit) -> Result<Option<&Unit>, BoardError> {
        let in_range = self.map.locations_in_range(attacker.position, attacker.range)?;
        let own_side = |unit: &Unit| {
            if attacker.owner == 0 {
                f64::from(unit.position.y)
            } else {
                -f64::from(unit.position.y)
            }
        };
        let center_offset = |unit: &Unit| (f64::from(HALF_ARENA) - 0.5 - f64::from(unit.position.x)).abs();

        let target = in_range
            .into_iter()
            .flat_map(|position| self.map[position].iter())
            .filter(|unit| unit.owner != attacker.owner && unit.unit_type != UnitType::Remove)
            .filter(|unit| {
                if unit.stationary {
                    attacker.damage_to_stationary > 0.0
                } else {
                    attacker.damage_to_mobile > 0.0
                }
            })
            .min_by(|a, b| {
                a.stationary
                    .cmp(&b.stationary)
                    .then(attacker.position.distance(a.position).total_cmp(&attacker.position.distance(b.position)))
                    .then(a.health.total_cmp(&b.health))
                    .then(own_side(*a).total_cmp(&own_side(*b)))
                    .then(center_offset(*b).total_cmp(&center_offset(*a)))
            });
        Ok(target)
    }

    /// The queued stationary spawns and removals.
    pub fn build_stack(&self) -> &[SpawnCommand] {
        &self.build_stack
    }

    /// The queued mobile spawns.
    pub fn deploy_stack(&self) -> &[SpawnCommand] {
        &self.deploy_stack
    }

    /// Sends the queued actions: one line of builds, then one line of deploys.
    pub fn submit_turn<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for stack in [&self.build_stack, &self.deploy_stack] {
            serde_json::to_writer(&mut writer, stack)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }
}

/// Whether a mobile unit of yours can be deployed here.
pub fn is_deploy_location(position: Position) -> bool {
    Edge::BottomLeft.locations().contains(&position) || Edge::BottomRight.locations().contains(&position)
}
