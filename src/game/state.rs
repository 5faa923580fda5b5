//! Turn controller: platoon rotation, selection and activation
//!
//! The game owns the board and every platoon. All recomputation for one
//! input happens synchronously inside the call that handles it: cells are
//! cleared before they are rebuilt, and a unit's old target highlights are
//! unregistered before new ones go in.

use ahash::AHashSet;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, OverlayItem, Structure, OVERLAY_LAYER};
use crate::core::config::GameConfig;
use crate::core::error::{Result, WarError};
use crate::core::types::{CellCoord, OverlayId, PlatoonId, UnitId};
use crate::game::events::{GameEvent, GameEventKind};
use crate::geometry::Footprint;
use crate::units::combat::{self, AttackKind, AttackOutcome};
use crate::units::constants::{ATTACK_COST, MELEE_RANGE, MOVE_BASE_COST};
use crate::units::movement::{altitude_at, reachable_cells};
use crate::units::{Platoon, Unit, UnitStatus};

/// Controls the presentation layer should offer right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    ActivateUnit,
    EndTurn,
}

pub(crate) fn find_unit(platoons: &[Platoon], id: UnitId) -> Option<&Unit> {
    platoons.iter().find_map(|p| p.unit(id))
}

pub(crate) fn find_unit_mut(platoons: &mut [Platoon], id: UnitId) -> Option<&mut Unit> {
    platoons.iter_mut().find_map(|p| p.unit_mut(id))
}

#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    pub(crate) board: Board,
    pub(crate) platoons: Vec<Platoon>,
    turn_number: u64,
    round: u64,
    selected_unit: Option<UnitId>,
    active_unit: Option<UnitId>,
    action_points_remaining: u32,
    events: Vec<GameEvent>,
    rng: ChaCha8Rng,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate().map_err(WarError::Config)?;
        let board = Board::from_config(&config);
        // Offset keeps combat rolls independent of the overlay id stream
        let rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(1));

        Ok(Self {
            config,
            board,
            platoons: Vec::new(),
            turn_number: 0,
            round: 1,
            selected_unit: None,
            active_unit: None,
            action_points_remaining: 0,
            events: Vec::new(),
            rng,
        })
    }

    // === QUERIES ===

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn platoons(&self) -> &[Platoon] {
        &self.platoons
    }

    pub fn platoon(&self, id: PlatoonId) -> Option<&Platoon> {
        self.platoons.iter().find(|p| p.id == id)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        find_unit(&self.platoons, id)
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.platoons.iter().flat_map(|p| p.units().iter())
    }

    pub fn turn_number(&self) -> u64 {
        self.turn_number
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn selected_unit(&self) -> Option<UnitId> {
        self.selected_unit
    }

    pub fn active_unit(&self) -> Option<UnitId> {
        self.active_unit
    }

    pub fn action_points_remaining(&self) -> u32 {
        self.action_points_remaining
    }

    /// Platoon whose turn it is
    pub fn active_platoon(&self) -> Option<&Platoon> {
        if self.platoons.is_empty() {
            return None;
        }
        let index = (self.turn_number % self.platoons.len() as u64) as usize;
        self.platoons.get(index)
    }

    /// A game needs at least two sides
    pub fn is_ready(&self) -> bool {
        self.platoons.len() > 1
    }

    pub fn controls(&self) -> Vec<Control> {
        let mut controls = Vec::new();
        if self.selected_unit.is_some() && self.active_unit.is_none() {
            controls.push(Control::ActivateUnit);
        }
        controls.push(Control::EndTurn);
        controls
    }

    /// Cell positions of a unit's current targets
    pub fn target_positions(&self, id: UnitId) -> Vec<CellCoord> {
        let Some(unit) = self.unit(id) else {
            return Vec::new();
        };
        unit.valid_targets()
            .iter()
            .filter_map(|t| self.unit(*t))
            .map(|t| t.position)
            .collect()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hand the accumulated events to the caller
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn log_event(&mut self, kind: GameEventKind, description: String) {
        tracing::info!(turn = self.turn_number, "{}", description);
        self.events.push(GameEvent {
            turn: self.turn_number,
            kind,
            description,
        });
    }

    // === REGISTRATION ===

    /// Add a structure to the board. The cells are rebuilt, so every unit's
    /// occupancy and altitude is stamped again afterwards.
    pub fn register_structure(&mut self, structure: Structure) -> Result<()> {
        self.board.register_structure(structure)?;

        let living: Vec<UnitId> = self
            .units()
            .filter(|u| u.is_alive())
            .map(|u| u.id)
            .collect();
        for id in living {
            self.stamp_unit(id);
        }

        if let Some(id) = self.active_unit.or(self.selected_unit) {
            self.recompute_reachable_cells(id);
            self.recompute_targets(id);
        }
        Ok(())
    }

    pub fn register_entity(&mut self, item: OverlayItem, layer: &str) -> Option<OverlayId> {
        self.board.register_entity(item, layer)
    }

    pub fn unregister_entity(&mut self, layer: &str, id: OverlayId) -> Option<OverlayItem> {
        self.board.unregister_entity(layer, id)
    }

    pub fn set_cell_scale(&mut self, scale: f32) {
        self.board.set_cell_scale(scale);
    }

    /// Add a prepared roster; each unit is placed on the board.
    ///
    /// The whole roster is rejected, with nothing placed, if any living
    /// member stands off the board or on a cell that is already taken.
    pub fn register_platoon(&mut self, platoon: Platoon) -> Result<PlatoonId> {
        let mut claimed = AHashSet::new();
        for unit in platoon.living_units() {
            let cell = self
                .board
                .cell(unit.position)
                .ok_or(WarError::CellOutOfBounds(unit.position))?;
            if cell.occupant.is_some() || !claimed.insert(unit.position) {
                return Err(WarError::CellOccupied(unit.position));
            }
        }

        let id = platoon.id;
        let members: Vec<UnitId> = platoon.living_units().map(|u| u.id).collect();
        tracing::info!(
            "Registering platoon {} with {} units",
            platoon.name,
            members.len()
        );
        self.platoons.push(platoon);
        for unit in members {
            self.stamp_unit(unit);
        }
        Ok(id)
    }

    /// Spawn a configured roster on random free cells
    pub fn spawn_platoon(&mut self, name: &str) -> Result<PlatoonId> {
        let mut occupied: AHashSet<CellCoord> = self
            .board
            .cells()
            .iter()
            .filter(|c| c.occupant.is_some())
            .map(|c| c.coord)
            .collect();
        let platoon = Platoon::spawn(
            name,
            self.config.platoon_size,
            &self.config.unit_defaults,
            self.board.width(),
            self.board.height(),
            &mut occupied,
            &mut self.rng,
        );
        self.register_platoon(platoon)
    }

    /// Recompute altitude and footing, and claim the unit's cell
    fn stamp_unit(&mut self, id: UnitId) {
        let Some(position) = self.unit(id).map(|u| u.position) else {
            return;
        };
        let (altitude, standing_on) = altitude_at(&self.board, position);
        if let Some(unit) = find_unit_mut(&mut self.platoons, id) {
            unit.altitude = altitude;
            unit.standing_on = standing_on;
        }
        self.board.place_occupant(position, id);
    }

    // === RECOMPUTATION ===

    /// Rebuild the reachable-cell highlight for a unit
    pub fn recompute_reachable_cells(&mut self, id: UnitId) {
        self.board.clear_cells();
        let Some(unit) = find_unit(&self.platoons, id) else {
            return;
        };
        let reachable = reachable_cells(unit, &self.board, self.config.movement_tolerance);
        tracing::debug!("{} reachable cells for {:?}", reachable.len(), id);
        self.board.mark_reachable(id, &reachable);
    }

    /// Rebuild a unit's visible enemies and their highlights.
    /// Safe to repeat: old highlights are always unregistered first.
    pub fn recompute_targets(&mut self, id: UnitId) {
        let Some(actor) = find_unit(&self.platoons, id) else {
            return;
        };
        let targets: Vec<(UnitId, CellCoord)> = if actor.is_alive() {
            self.platoons
                .iter()
                .filter(|p| p.id != actor.platoon)
                .flat_map(|p| p.living_units())
                .filter(|candidate| !self.board.occludes(*candidate, actor))
                .map(|candidate| (candidate.id, candidate.position))
                .collect()
        } else {
            Vec::new()
        };

        self.release_targets(id);

        let mut overlays = Vec::with_capacity(targets.len());
        for (target, position) in &targets {
            let outline = OverlayItem::TargetOutline {
                target: *target,
                footprint: Footprint::cell(*position),
            };
            if let Some(overlay) = self.board.register_entity(outline, OVERLAY_LAYER) {
                overlays.push(overlay);
            }
        }

        tracing::debug!("{} valid targets for {:?}", targets.len(), id);
        if let Some(unit) = find_unit_mut(&mut self.platoons, id) {
            unit.set_targets(targets.into_iter().map(|(t, _)| t).collect(), overlays);
        }
    }

    /// Forget a unit's targets and unregister their highlights
    fn release_targets(&mut self, id: UnitId) {
        let stale = match find_unit_mut(&mut self.platoons, id) {
            Some(unit) => unit.take_targets(),
            None => return,
        };
        for overlay in stale {
            self.board.unregister_entity(OVERLAY_LAYER, overlay);
        }
    }

    /// Start (or restart, after a move) the active phase at the unit's position
    fn on_activate(&mut self, id: UnitId) {
        self.recompute_reachable_cells(id);
        self.recompute_targets(id);
    }

    // === SELECTION AND ACTIVATION ===

    /// Select an unactivated unit of the active platoon. Any previous
    /// selection is dropped first.
    pub fn select_unit(&mut self, id: UnitId) -> Result<()> {
        let unit = self.unit(id).ok_or(WarError::UnitNotFound(id))?;
        let (status, platoon) = (unit.status(), unit.platoon);

        if self.active_unit.is_some() {
            return Err(WarError::InvalidStateTransition {
                unit: id,
                status,
                action: "select while another unit is active",
            });
        }
        if self.active_platoon().map(|p| p.id) != Some(platoon) {
            return Err(WarError::NotYourTurn(id));
        }
        if status != UnitStatus::Unactivated {
            return Err(WarError::InvalidStateTransition {
                unit: id,
                status,
                action: "select",
            });
        }

        if self.selected_unit.is_some() {
            self.deselect_unit()?;
        }

        if let Some(unit) = find_unit_mut(&mut self.platoons, id) {
            unit.select()?;
        }
        self.selected_unit = Some(id);
        self.recompute_reachable_cells(id);
        self.recompute_targets(id);

        self.log_event(
            GameEventKind::UnitSelected { unit: id },
            format!("Unit {:?} selected", id),
        );
        Ok(())
    }

    pub fn deselect_unit(&mut self) -> Result<()> {
        let id = self
            .selected_unit
            .ok_or(WarError::NoSelection { action: "deselect" })?;

        if let Some(unit) = find_unit_mut(&mut self.platoons, id) {
            unit.deselect()?;
        }
        self.selected_unit = None;
        self.board.clear_cells();
        self.release_targets(id);

        self.log_event(
            GameEventKind::UnitDeselected { unit: id },
            format!("Unit {:?} deselected", id),
        );
        Ok(())
    }

    /// Promote the selected unit to active and fill the action point pool
    pub fn activate_unit(&mut self) -> Result<()> {
        let id = self
            .selected_unit
            .ok_or(WarError::NoSelection { action: "activate" })?;
        let unit = find_unit_mut(&mut self.platoons, id).ok_or(WarError::UnitNotFound(id))?;

        if self.active_unit.is_some() {
            return Err(WarError::InvalidStateTransition {
                unit: id,
                status: unit.status(),
                action: "activate while another unit is active",
            });
        }

        unit.activate()?;
        let action_points = unit.stats.action_points;
        self.selected_unit = None;
        self.active_unit = Some(id);
        self.action_points_remaining = action_points;

        self.log_event(
            GameEventKind::UnitActivated { unit: id },
            format!("Unit {:?} activated with {} action points", id, action_points),
        );

        if action_points == 0 {
            self.exhaust_active_unit();
        } else {
            self.on_activate(id);
        }
        Ok(())
    }

    fn check_active(active_unit: Option<UnitId>, unit: &Unit, action: &'static str) -> Result<()> {
        if active_unit == Some(unit.id) && unit.status() == UnitStatus::Active {
            Ok(())
        } else {
            Err(WarError::InvalidStateTransition {
                unit: unit.id,
                status: unit.status(),
                action,
            })
        }
    }

    fn check_action_points(&self, needed: u32) -> Result<()> {
        if needed > self.action_points_remaining {
            return Err(WarError::InsufficientActionPoints {
                needed,
                remaining: self.action_points_remaining,
            });
        }
        Ok(())
    }

    /// After an action: either keep acting from the new state or end the activation
    fn finish_action(&mut self, id: UnitId) {
        if self.action_points_remaining == 0 {
            self.exhaust_active_unit();
            return;
        }
        if let Some(unit) = find_unit_mut(&mut self.platoons, id) {
            if let Err(e) = unit.activate() {
                tracing::debug!("Could not restart activation: {}", e);
                return;
            }
        }
        self.on_activate(id);
    }

    /// The active unit is spent for this round
    fn exhaust_active_unit(&mut self) {
        let Some(id) = self.active_unit.take() else {
            return;
        };
        if let Some(unit) = find_unit_mut(&mut self.platoons, id) {
            if let Err(e) = unit.exhaust() {
                tracing::debug!("Exhausting {:?}: {}", id, e);
            }
        }
        self.action_points_remaining = 0;
        self.board.clear_cells();
        self.release_targets(id);
        self.clear_hover_lines();

        self.log_event(
            GameEventKind::UnitExhausted { unit: id },
            format!("Unit {:?} has finished its activation", id),
        );
    }

    // === ACTIONS ===

    /// Move the active unit onto one of its highlighted cells
    pub fn move_unit(&mut self, id: UnitId, destination: CellCoord) -> Result<()> {
        let unit = find_unit(&self.platoons, id).ok_or(WarError::UnitNotFound(id))?;
        Self::check_active(self.active_unit, unit, "move")?;
        let from = unit.position;

        let cell = self
            .board
            .cell(destination)
            .ok_or(WarError::CellOutOfBounds(destination))?;
        if cell.occupant.is_some() {
            return Err(WarError::CellOccupied(destination));
        }
        if !cell.visible || !cell.callbacks().iter().any(|intent| intent.unit == id) {
            return Err(WarError::Unreachable(destination));
        }
        let cost = MOVE_BASE_COST + cell.action_penalty;
        self.check_action_points(cost)?;

        self.board.vacate(from, id);
        if let Some(unit) = find_unit_mut(&mut self.platoons, id) {
            unit.position = destination;
        }
        self.stamp_unit(id);
        self.recompute_targets(id);
        self.board.clear_cells();
        self.clear_hover_lines();
        self.action_points_remaining -= cost;

        self.log_event(
            GameEventKind::UnitMoved {
                unit: id,
                from,
                to: destination,
            },
            format!(
                "Unit {:?} moved from {:?} to {:?} for {} action points",
                id, from, destination, cost
            ),
        );

        self.finish_action(id);
        Ok(())
    }

    /// Ranged attack against a visible enemy
    pub fn shoot(&mut self, attacker: UnitId, target: UnitId) -> Result<AttackOutcome> {
        self.attack(AttackKind::Ranged, attacker, target)
    }

    /// Melee attack against an adjacent enemy; needs no line of sight
    pub fn fight(&mut self, attacker: UnitId, target: UnitId) -> Result<AttackOutcome> {
        self.attack(AttackKind::Melee, attacker, target)
    }

    fn attack(&mut self, kind: AttackKind, attacker: UnitId, target: UnitId) -> Result<AttackOutcome> {
        let action = match kind {
            AttackKind::Ranged => "shoot",
            AttackKind::Melee => "fight",
        };
        let attacker_unit =
            find_unit(&self.platoons, attacker).ok_or(WarError::UnitNotFound(attacker))?;
        Self::check_active(self.active_unit, attacker_unit, action)?;

        let defender = find_unit(&self.platoons, target).ok_or(WarError::UnitNotFound(target))?;
        if !defender.is_alive() || defender.platoon == attacker_unit.platoon {
            return Err(WarError::InvalidTarget(target));
        }
        let in_reach = match kind {
            AttackKind::Ranged => attacker_unit.can_target(target),
            AttackKind::Melee => attacker_unit.is_within_melee(defender, MELEE_RANGE),
        };
        if !in_reach {
            return Err(WarError::InvalidTarget(target));
        }
        self.check_action_points(ATTACK_COST)?;

        let (hit, damage) = combat::roll_attack(kind, attacker_unit, defender, &mut self.rng);
        let killed = find_unit_mut(&mut self.platoons, target)
            .map(|d| d.take_damage(damage))
            .unwrap_or(false);
        self.action_points_remaining -= ATTACK_COST;

        let (event, verb) = match kind {
            AttackKind::Ranged => (
                GameEventKind::ShotFired {
                    attacker,
                    target,
                    hit,
                },
                "shot at",
            ),
            AttackKind::Melee => (
                GameEventKind::MeleeFought {
                    attacker,
                    target,
                    hit,
                },
                "fought",
            ),
        };
        self.log_event(
            event,
            format!(
                "Unit {:?} {} {:?}: {} for {:.1} damage",
                attacker,
                verb,
                target,
                if hit { "hit" } else { "miss" },
                damage
            ),
        );

        if killed {
            self.on_unit_killed(target);
        }
        self.finish_action(attacker);

        Ok(AttackOutcome {
            kind,
            hit,
            damage,
            killed,
        })
    }

    fn on_unit_killed(&mut self, id: UnitId) {
        let Some(position) = self.unit(id).map(|u| u.position) else {
            return;
        };
        self.board.vacate(position, id);
        self.release_targets(id);
        self.hide_target_line(id);
        self.log_event(
            GameEventKind::UnitKilled { unit: id },
            format!("Unit {:?} was killed at {:?}", id, position),
        );
    }

    // === TURN ORDER ===

    /// Finish whatever the current platoon was doing and pass the turn on.
    ///
    /// Platoons with nobody left to activate are skipped. Once every living
    /// unit has acted, a new round begins and all of them are ready again.
    pub fn end_turn(&mut self) {
        self.exhaust_active_unit();
        if self.selected_unit.is_some() {
            if let Err(e) = self.deselect_unit() {
                tracing::debug!("Deselect on end of turn failed: {}", e);
            }
        }
        self.selected_unit = None;
        self.active_unit = None;
        self.turn_number += 1;

        if !self.platoons.iter().any(|p| p.has_unactivated()) {
            self.start_round();
        }
        for _ in 0..self.platoons.len() {
            if self.active_platoon().map_or(true, |p| p.has_unactivated()) {
                break;
            }
            self.turn_number += 1;
        }

        let next = self.active_platoon().map(|p| (p.id, p.name.clone()));
        self.log_event(
            GameEventKind::TurnEnded {
                next_platoon: next.as_ref().map(|(id, _)| *id),
            },
            format!(
                "Turn ended; platoon {} to act",
                next.map_or_else(|| "none".to_string(), |(_, name)| name)
            ),
        );
    }

    fn start_round(&mut self) {
        self.round += 1;
        for platoon in &mut self.platoons {
            for unit in platoon.units_mut().iter_mut().filter(|u| u.is_alive()) {
                if let Err(e) = unit.ready() {
                    tracing::debug!("Unit {:?} not readied: {}", unit.id, e);
                }
            }
        }
        let round = self.round;
        self.log_event(
            GameEventKind::RoundStarted { round },
            format!("Round {} begins", round),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::UnitStats;

    fn small_config() -> GameConfig {
        GameConfig {
            grid_width: 20,
            grid_height: 20,
            ..GameConfig::default()
        }
    }

    /// Two single-unit platoons; returns (game, green unit, red unit)
    fn duel(green_at: CellCoord, red_at: CellCoord, stats: UnitStats) -> (Game, UnitId, UnitId) {
        let mut game = Game::new(small_config()).unwrap();
        let mut green = Platoon::new("green");
        let g = green.add_unit(green_at, stats.clone());
        let mut red = Platoon::new("red");
        let r = red.add_unit(red_at, stats);
        game.register_platoon(green).unwrap();
        game.register_platoon(red).unwrap();
        (game, g, r)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            cell_scale: 0.0,
            ..GameConfig::default()
        };
        assert!(matches!(Game::new(config), Err(WarError::Config(_))));
    }

    #[test]
    fn test_active_platoon_rotates() {
        let (mut game, g, r) = duel(CellCoord::new(1, 1), CellCoord::new(5, 5), UnitStats::default());
        assert!(game.is_ready());
        let green = game.unit(g).unwrap().platoon;
        let red = game.unit(r).unwrap().platoon;

        assert_eq!(game.active_platoon().map(|p| p.id), Some(green));
        game.end_turn();
        assert_eq!(game.turn_number(), 1);
        assert_eq!(game.active_platoon().map(|p| p.id), Some(red));
    }

    #[test]
    fn test_registration_claims_cells() {
        let (game, g, _) = duel(CellCoord::new(1, 1), CellCoord::new(5, 5), UnitStats::default());
        assert_eq!(game.board().cell(CellCoord::new(1, 1)).unwrap().occupant, Some(g));
    }

    #[test]
    fn test_select_then_activate() {
        let (mut game, g, _) = duel(CellCoord::new(1, 1), CellCoord::new(5, 5), UnitStats::default());

        game.select_unit(g).unwrap();
        assert_eq!(game.selected_unit(), Some(g));
        assert_eq!(game.controls(), vec![Control::ActivateUnit, Control::EndTurn]);
        assert!(game.board().reachable_cells().count() > 0);

        game.activate_unit().unwrap();
        assert_eq!(game.active_unit(), Some(g));
        assert_eq!(game.selected_unit(), None);
        assert_eq!(game.action_points_remaining(), 3);
        assert_eq!(game.unit(g).unwrap().status(), UnitStatus::Active);
        assert_eq!(game.controls(), vec![Control::EndTurn]);
    }

    #[test]
    fn test_activate_without_selection_is_rejected() {
        let (mut game, _, _) = duel(CellCoord::new(1, 1), CellCoord::new(5, 5), UnitStats::default());
        assert!(matches!(
            game.activate_unit(),
            Err(WarError::NoSelection { action: "activate" })
        ));
        assert!(matches!(
            game.deselect_unit(),
            Err(WarError::NoSelection { action: "deselect" })
        ));
        assert_eq!(game.active_unit(), None);
        assert_eq!(game.action_points_remaining(), 0);
    }

    #[test]
    fn test_cannot_select_enemy_on_their_off_turn() {
        let (mut game, _, r) = duel(CellCoord::new(1, 1), CellCoord::new(5, 5), UnitStats::default());
        assert!(matches!(game.select_unit(r), Err(WarError::NotYourTurn(_))));
        assert_eq!(game.unit(r).unwrap().status(), UnitStatus::Unactivated);
    }

    #[test]
    fn test_cannot_select_while_a_unit_is_active() {
        let mut game = Game::new(small_config()).unwrap();
        let mut green = Platoon::new("green");
        let first = green.add_unit(CellCoord::new(1, 1), UnitStats::default());
        let second = green.add_unit(CellCoord::new(3, 3), UnitStats::default());
        game.register_platoon(green).unwrap();
        game.register_platoon(Platoon::new("red")).unwrap();

        game.select_unit(first).unwrap();
        game.activate_unit().unwrap();
        let err = game.select_unit(second).unwrap_err();
        assert!(matches!(err, WarError::InvalidStateTransition { .. }));
        assert_eq!(game.unit(second).unwrap().status(), UnitStatus::Unactivated);
    }

    #[test]
    fn test_reselecting_moves_selection() {
        let mut game = Game::new(small_config()).unwrap();
        let mut green = Platoon::new("green");
        let first = green.add_unit(CellCoord::new(1, 1), UnitStats::default());
        let second = green.add_unit(CellCoord::new(3, 3), UnitStats::default());
        game.register_platoon(green).unwrap();
        game.register_platoon(Platoon::new("red")).unwrap();

        game.select_unit(first).unwrap();
        game.select_unit(second).unwrap();
        assert_eq!(game.selected_unit(), Some(second));
        assert_eq!(game.unit(first).unwrap().status(), UnitStatus::Unactivated);
        assert_eq!(game.unit(second).unwrap().status(), UnitStatus::Selected);
    }

    #[test]
    fn test_deselect_clears_cells_and_overlays() {
        let (mut game, g, _) = duel(CellCoord::new(1, 1), CellCoord::new(5, 5), UnitStats::default());
        game.select_unit(g).unwrap();
        assert_eq!(game.board().overlay_count(OVERLAY_LAYER), 1);

        game.deselect_unit().unwrap();
        assert_eq!(game.board().reachable_cells().count(), 0);
        assert_eq!(game.board().overlay_count(OVERLAY_LAYER), 0);
        assert!(game.unit(g).unwrap().valid_targets().is_empty());
    }

    #[test]
    fn test_move_updates_occupancy_and_spends_points() {
        let (mut game, g, _) = duel(CellCoord::new(1, 1), CellCoord::new(15, 15), UnitStats::default());
        game.select_unit(g).unwrap();
        game.activate_unit().unwrap();

        game.move_unit(g, CellCoord::new(4, 4)).unwrap();
        assert_eq!(game.unit(g).unwrap().position, CellCoord::new(4, 4));
        assert_eq!(game.board().cell(CellCoord::new(1, 1)).unwrap().occupant, None);
        assert_eq!(game.board().cell(CellCoord::new(4, 4)).unwrap().occupant, Some(g));
        assert_eq!(game.action_points_remaining(), 2);
        // Still active, with cells rebuilt around the new position
        assert_eq!(game.unit(g).unwrap().status(), UnitStatus::Active);
        assert!(game.board().cell(CellCoord::new(1, 1)).unwrap().visible);
        assert!(!game.board().cell(CellCoord::new(4, 4)).unwrap().visible);
    }

    #[test]
    fn test_move_rejections_do_not_mutate() {
        let (mut game, g, r) = duel(CellCoord::new(1, 1), CellCoord::new(2, 2), UnitStats::default());

        // Not active yet
        assert!(matches!(
            game.move_unit(g, CellCoord::new(3, 3)),
            Err(WarError::InvalidStateTransition { .. })
        ));

        game.select_unit(g).unwrap();
        game.activate_unit().unwrap();
        assert!(matches!(
            game.move_unit(g, CellCoord::new(2, 2)),
            Err(WarError::CellOccupied(_))
        ));
        assert!(matches!(
            game.move_unit(g, CellCoord::new(19, 19)),
            Err(WarError::Unreachable(_))
        ));
        assert!(matches!(
            game.move_unit(g, CellCoord::new(-1, 0)),
            Err(WarError::CellOutOfBounds(_))
        ));
        // The enemy cannot move during our activation
        assert!(game.move_unit(r, CellCoord::new(3, 3)).is_err());

        assert_eq!(game.unit(g).unwrap().position, CellCoord::new(1, 1));
        assert_eq!(game.action_points_remaining(), 3);
    }

    #[test]
    fn test_running_out_of_points_exhausts_unit() {
        let (mut game, g, _) = duel(CellCoord::new(1, 1), CellCoord::new(15, 15), UnitStats::default());
        game.select_unit(g).unwrap();
        game.activate_unit().unwrap();

        game.move_unit(g, CellCoord::new(2, 1)).unwrap();
        game.move_unit(g, CellCoord::new(3, 1)).unwrap();
        game.move_unit(g, CellCoord::new(4, 1)).unwrap();

        assert_eq!(game.unit(g).unwrap().status(), UnitStatus::Activated);
        assert_eq!(game.active_unit(), None);
        assert_eq!(game.board().reachable_cells().count(), 0);
        assert_eq!(game.board().overlay_count(OVERLAY_LAYER), 0);
    }

    #[test]
    fn test_certain_shot_kills_and_frees_cell() {
        let stats = UnitStats {
            shooting_skill: 1.0,
            health: 4.0,
            ..UnitStats::default()
        };
        let (mut game, g, r) = duel(CellCoord::new(1, 1), CellCoord::new(10, 10), stats);
        game.select_unit(g).unwrap();
        game.activate_unit().unwrap();
        assert_eq!(game.unit(g).unwrap().valid_targets(), &[r]);

        let outcome = game.shoot(g, r).unwrap();
        assert!(outcome.hit && outcome.killed);
        assert_eq!(game.unit(r).unwrap().status(), UnitStatus::Dead);
        assert_eq!(game.board().cell(CellCoord::new(10, 10)).unwrap().occupant, None);
        assert!(game.unit(g).unwrap().valid_targets().is_empty());
        assert_eq!(game.action_points_remaining(), 2);
        assert!(game
            .events()
            .iter()
            .any(|e| e.kind == GameEventKind::UnitKilled { unit: r }));
    }

    #[test]
    fn test_melee_needs_adjacency() {
        let stats = UnitStats {
            fighting_skill: 1.0,
            ..UnitStats::default()
        };
        let (mut game, g, r) = duel(CellCoord::new(1, 1), CellCoord::new(3, 3), stats);
        game.select_unit(g).unwrap();
        game.activate_unit().unwrap();
        assert!(matches!(game.fight(g, r), Err(WarError::InvalidTarget(_))));

        game.move_unit(g, CellCoord::new(2, 2)).unwrap();
        let outcome = game.fight(g, r).unwrap();
        assert_eq!(outcome.kind, AttackKind::Melee);
        assert!(game.unit(r).unwrap().health < 10.0 || !outcome.hit);
    }

    #[test]
    fn test_end_turn_resets_selection_and_starts_rounds() {
        let (mut game, g, r) = duel(CellCoord::new(1, 1), CellCoord::new(5, 5), UnitStats::default());

        game.select_unit(g).unwrap();
        game.activate_unit().unwrap();
        game.end_turn();
        assert_eq!(game.active_unit(), None);
        assert_eq!(game.unit(g).unwrap().status(), UnitStatus::Activated);
        assert_eq!(game.round(), 1);

        game.select_unit(r).unwrap();
        game.end_turn();
        // Red never activated, so the round continues with red again
        assert_eq!(game.unit(r).unwrap().status(), UnitStatus::Unactivated);
        assert_eq!(game.active_platoon().map(|p| p.id), Some(game.unit(r).unwrap().platoon));

        game.select_unit(r).unwrap();
        game.activate_unit().unwrap();
        game.end_turn();
        assert_eq!(game.round(), 2);
        assert_eq!(game.unit(g).unwrap().status(), UnitStatus::Unactivated);
        assert_eq!(game.unit(r).unwrap().status(), UnitStatus::Unactivated);
    }

    #[test]
    fn test_register_structure_restamps_units() {
        let (mut game, g, _) = duel(CellCoord::new(6, 6), CellCoord::new(15, 15), UnitStats::default());
        game.register_structure(Structure::new(Footprint::new(5, 5, 3, 3))).unwrap();

        let unit = game.unit(g).unwrap();
        assert_eq!(unit.altitude, 1);
        assert!(unit.standing_on.is_some());
        assert_eq!(game.board().cell(CellCoord::new(6, 6)).unwrap().occupant, Some(g));
    }
}
