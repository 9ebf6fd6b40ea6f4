use std::cmp::Reverse;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Point;
use crate::error::GoError;
use crate::goban::{Goban, Group};
use crate::stone::Stone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Capture,
    Defense,
    Expansion,
    Fallback,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Capture => write!(f, "capture"),
            Phase::Defense => write!(f, "defense"),
            Phase::Expansion => write!(f, "expansion"),
            Phase::Fallback => write!(f, "fallback"),
        }
    }
}

/// A move the selector played, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub point: Point,
    pub phase: Phase,
    pub captured: usize,
}

/// The liberty of a group in atari, tagged with the size of that group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtariCandidate {
    pub point: Point,
    pub group_size: usize,
}

/// Weights of the positional score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Per step closer to the center.
    pub center: i32,
    /// Per friendly stone among the 8 surrounding points.
    pub friendly: i32,
    /// Per enemy stone among the 8 surrounding points.
    pub enemy: i32,
    /// Per empty orthogonal neighbor.
    pub liberty: i32,
    /// Extra per-enemy penalty once `crowding_threshold` enemies surround the point.
    pub crowding: i32,
    pub crowding_threshold: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            center: 3,
            friendly: 5,
            enemy: 4,
            liberty: 6,
            crowding: 15,
            crowding_threshold: 2,
        }
    }
}

/// One-ply move selection for the computer-controlled side.
///
/// Candidates are tried phase by phase and the first legal one is played on
/// the board passed in. Nothing is remembered between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selector {
    weights: Weights,
}

impl Selector {
    pub fn new(weights: Weights) -> Self {
        Selector { weights }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Choose a move for `stone` and play it on `goban`.
    ///
    /// Returns [`GoError::NoLegalMove`] when `stone` has nowhere to play; the
    /// board is unchanged in that case.
    pub fn select_move(&self, goban: &mut Goban, stone: Stone) -> Result<Selection, GoError> {
        let captures = atari_liberties(goban, stone.opp());
        if let Some(sel) = Self::play_first(goban, stone, Phase::Capture, points(&captures)) {
            return Ok(sel);
        }

        let rescues = atari_liberties(goban, stone);
        if let Some(sel) = Self::play_first(goban, stone, Phase::Defense, points(&rescues)) {
            return Ok(sel);
        }

        let mut open = expansion_candidates(goban, stone);
        self.rank(goban, stone, &mut open);
        if let Some(sel) = Self::play_first(goban, stone, Phase::Expansion, open) {
            return Ok(sel);
        }

        let mut legal: Vec<Point> = goban
            .empty_points()
            .filter(|&p| goban.is_legal(p, stone))
            .collect();
        self.rank(goban, stone, &mut legal);
        if let Some(sel) = Self::play_first(goban, stone, Phase::Fallback, legal) {
            return Ok(sel);
        }

        tracing::debug!("{stone} has no legal move");
        Err(GoError::NoLegalMove)
    }

    /// Positional score of `point` for `stone`. Higher is better.
    pub fn score(&self, goban: &Goban, point: Point, stone: Stone) -> i32 {
        let w = &self.weights;
        let (cc, cr) = goban.center();
        let distance = (point.0 as i32 - cc as i32).abs() + (point.1 as i32 - cr as i32).abs();

        let (mut friendly, mut enemy) = (0, 0);
        for n in goban.surrounding(point) {
            match goban.stone_at(n) {
                Some(s) if s == stone => friendly += 1,
                Some(_) => enemy += 1,
                None => {}
            }
        }

        let liberties = goban
            .neighbors(point)
            .iter()
            .filter(|&&n| goban.stone_at(n).is_none())
            .count() as i32;

        let mut score = (goban.size() as i32 - distance) * w.center + friendly * w.friendly
            - enemy * w.enemy
            + liberties * w.liberty;
        if enemy >= w.crowding_threshold {
            score -= w.crowding * enemy;
        }
        score
    }

    /// Stable sort by descending score, so ties keep scan order.
    fn rank(&self, goban: &Goban, stone: Stone, points: &mut [Point]) {
        points.sort_by_cached_key(|&p| Reverse(self.score(goban, p, stone)));
    }

    fn play_first(
        goban: &mut Goban,
        stone: Stone,
        phase: Phase,
        candidates: impl IntoIterator<Item = Point>,
    ) -> Option<Selection> {
        for point in candidates {
            match goban.play(point, stone) {
                Ok(captured) => {
                    tracing::debug!("{stone} plays {point:?} ({phase}, captured {captured})");
                    return Some(Selection {
                        point,
                        phase,
                        captured,
                    });
                }
                Err(e) => tracing::trace!("{phase} candidate {point:?} skipped: {e}"),
            }
        }
        None
    }
}

/// Choose and play a move for `stone` with the default weights.
pub fn select_move(goban: &mut Goban, stone: Stone) -> Result<Selection, GoError> {
    Selector::default().select_move(goban, stone)
}

/// Liberties of every `target` group in atari, largest group first.
///
/// A liberty shared by several groups appears once, tagged with the largest.
pub fn atari_liberties(goban: &Goban, target: Stone) -> Vec<AtariCandidate> {
    let mut candidates: Vec<AtariCandidate> = Vec::new();
    let mut index: HashMap<Point, usize> = HashMap::new();

    for group in goban.groups(target).into_iter().filter(Group::in_atari) {
        let point = group.liberties[0];
        match index.entry(point) {
            Entry::Occupied(e) => {
                let c = &mut candidates[*e.get()];
                c.group_size = c.group_size.max(group.len());
            }
            Entry::Vacant(e) => {
                e.insert(candidates.len());
                candidates.push(AtariCandidate {
                    point,
                    group_size: group.len(),
                });
            }
        }
    }

    candidates.sort_by(|a, b| b.group_size.cmp(&a.group_size));
    candidates
}

/// Empty points with room to grow: at least three empty orthogonal
/// neighbors and no more than three friendly ones.
pub fn expansion_candidates(goban: &Goban, stone: Stone) -> Vec<Point> {
    goban
        .empty_points()
        .filter(|&p| {
            let neighbors = goban.neighbors(p);
            let empty = neighbors.iter().filter(|&&n| goban.stone_at(n).is_none()).count();
            let friendly = neighbors
                .iter()
                .filter(|&&n| goban.stone_at(n) == Some(stone))
                .count();
            empty >= 3 && friendly <= 3
        })
        .collect()
}

fn points(candidates: &[AtariCandidate]) -> Vec<Point> {
    candidates.iter().map(|c| c.point).collect()
}
