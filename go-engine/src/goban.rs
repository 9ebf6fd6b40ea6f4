use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::Point;
use crate::error::GoError;
use crate::stone::Stone;

/// Side length of a standard board.
pub const BOARD_SIZE: u8 = 19;

/// Stones captured, indexed by the color that did the capturing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stone: Stone) -> u32 {
        match stone {
            Stone::Black => self.black,
            Stone::White => self.white,
        }
    }

    fn add(&mut self, stone: Stone, count: u32) {
        match stone {
            Stone::Black => self.black += count,
            Stone::White => self.white += count,
        }
    }
}

/// A maximal set of same-colored, 4-adjacent stones and its distinct liberties.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Group {
    pub stones: Vec<Point>,
    pub liberties: Vec<Point>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.stones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stones.is_empty()
    }

    pub fn liberty_count(&self) -> usize {
        self.liberties.len()
    }

    pub fn in_atari(&self) -> bool {
        self.liberties.len() == 1
    }
}

/// The result of simulating a move on a scratch copy of the board.
///
/// Holding a `Placement` does not change the board it came from; pass it to
/// [`Goban::commit`] to make the move real.
#[derive(Debug, Clone)]
pub struct Placement {
    goban: Goban,
    point: Point,
    captured: usize,
}

impl Placement {
    pub fn point(&self) -> Point {
        self.point
    }

    /// Number of enemy stones the move removes.
    pub fn captured(&self) -> usize {
        self.captured
    }

    /// The ko point the move would leave behind, if it forms the
    /// single-stone recapture shape.
    pub fn ko(&self) -> Option<Point> {
        self.goban.ko
    }

    pub fn creates_ko(&self) -> bool {
        self.goban.ko.is_some()
    }

    /// The board as it would look after the move.
    pub fn goban(&self) -> &Goban {
        &self.goban
    }
}

/// The Go board stored as a flat, row-major array of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Goban {
    board: Vec<i8>,
    size: u8,
    captures: Captures,
    ko: Option<Point>,
}

impl Default for Goban {
    fn default() -> Self {
        Self::new()
    }
}

impl Goban {
    /// Create an empty 19x19 board.
    pub fn new() -> Self {
        Self::with_size(BOARD_SIZE)
    }

    /// Create an empty square board with the given side length.
    pub fn with_size(size: u8) -> Self {
        Goban {
            board: vec![0i8; size as usize * size as usize],
            size,
            captures: Captures::new(),
            ko: None,
        }
    }

    /// Create a board from an existing square matrix of cell values.
    pub fn from_rows(rows: Vec<Vec<i8>>) -> Self {
        let size = u8::try_from(rows.len()).ok();

        assert!(
            size.is_some_and(|n| rows.iter().all(|row| row.len() == n as usize)),
            "malformed board matrix"
        );
        let size = size.unwrap_or_default();

        Goban {
            board: rows
                .into_iter()
                .flatten()
                .map(|v| Stone::from_int(v).map_or(0, Stone::to_int))
                .collect(),
            size,
            captures: Captures::new(),
            ko: None,
        }
    }

    /// Clear every stone, the ko point and the capture tallies.
    pub fn reset(&mut self) {
        self.board.fill(0);
        self.captures = Captures::new();
        self.ko = None;
    }

    // -- Accessors --

    pub fn board(&self) -> &[i8] {
        &self.board
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    pub fn ko(&self) -> Option<Point> {
        self.ko
    }

    pub fn center(&self) -> Point {
        (self.size / 2, self.size / 2)
    }

    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        if self.on_board(point) {
            Stone::from_int(self.board[self.idx(point)])
        } else {
            None
        }
    }

    pub fn on_board(&self, (col, row): Point) -> bool {
        col < self.size && row < self.size
    }

    pub fn is_empty(&self) -> bool {
        self.board.iter().all(|&s| s == 0)
    }

    /// Every point on the board, in row-major scan order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let size = self.size as usize;
        (0..self.board.len()).map(move |i| ((i % size) as u8, (i / size) as u8))
    }

    pub fn empty_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.points().filter(|&p| self.stone_at(p).is_none())
    }

    // -- Game actions --

    /// Simulate `stone` at `point` without touching this board.
    pub fn check_move(&self, point: Point, stone: Stone) -> Result<Placement, GoError> {
        if !self.on_board(point) {
            return Err(GoError::NotOnBoard);
        }

        if self.stone_at(point).is_some() {
            return Err(GoError::Overwrite);
        }

        if self.ko == Some(point) {
            return Err(GoError::KoViolation);
        }

        let mut goban = self.clone();
        goban.set_stone(point, stone);
        let captured = goban.remove_dead_groups(stone.opp());

        let own = goban.group(point, stone);
        if own.liberties.is_empty() {
            return Err(GoError::Suicide);
        }

        // A lone stone that took exactly one stone and now hangs on the
        // vacated point can be retaken at once.
        goban.ko = (captured == 1 && own.len() == 1 && own.in_atari()).then(|| own.liberties[0]);

        Ok(Placement {
            goban,
            point,
            captured,
        })
    }

    pub fn is_legal(&self, point: Point, stone: Stone) -> bool {
        self.check_move(point, stone).is_ok()
    }

    /// Adopt a simulated move as the real board state.
    pub fn commit(&mut self, placement: Placement) -> usize {
        if let Some(ko) = placement.ko() {
            tracing::debug!("ko at {:?} after play at {:?}", ko, placement.point);
        }
        let captured = placement.captured;
        *self = placement.goban;
        captured
    }

    /// Place a stone, resolve captures and update the ko point.
    /// Returns the number of stones captured.
    pub fn play(&mut self, point: Point, stone: Stone) -> Result<usize, GoError> {
        let placement = self.check_move(point, stone)?;
        Ok(self.commit(placement))
    }

    /// Like [`Goban::play`], reporting only whether the move went through.
    pub fn apply(&mut self, point: Point, stone: Stone) -> bool {
        match self.play(point, stone) {
            Ok(_) => true,
            Err(e) => {
                tracing::trace!("{stone} at {point:?} rejected: {e}");
                false
            }
        }
    }

    /// Pass: clears ko in place.
    pub fn pass(&mut self) {
        self.ko = None;
    }

    /// Remove every group of `stone` that has no liberties, crediting the
    /// opponent. Returns the number of stones removed.
    pub fn remove_dead_groups(&mut self, stone: Stone) -> usize {
        let dead: Vec<Point> = self
            .groups(stone)
            .into_iter()
            .filter(|g| g.liberties.is_empty())
            .flat_map(|g| g.stones)
            .collect();

        for &pt in &dead {
            self.clear_stone(pt);
        }
        self.captures.add(stone.opp(), dead.len() as u32);
        dead.len()
    }

    // -- Graph algorithms --

    /// Get the 4-connected neighbors that are on the board.
    pub fn neighbors(&self, (col, row): Point) -> ArrayVec<Point, 4> {
        let mut result = ArrayVec::new();
        if col > 0 {
            result.push((col - 1, row));
        }
        if col + 1 < self.size {
            result.push((col + 1, row));
        }
        if row > 0 {
            result.push((col, row - 1));
        }
        if row + 1 < self.size {
            result.push((col, row + 1));
        }
        result
    }

    /// Get the 8-connected neighbors (orthogonal and diagonal) on the board.
    pub fn surrounding(&self, (col, row): Point) -> ArrayVec<Point, 8> {
        let mut result = ArrayVec::new();
        for dr in -1i16..=1 {
            for dc in -1i16..=1 {
                if dc == 0 && dr == 0 {
                    continue;
                }
                let c = col as i16 + dc;
                let r = row as i16 + dr;
                if c >= 0 && r >= 0 && self.on_board((c as u8, r as u8)) {
                    result.push((c as u8, r as u8));
                }
            }
        }
        result
    }

    /// The group of `stone` containing `point`. Empty if `point` does not
    /// hold a `stone`.
    pub fn group(&self, point: Point, stone: Stone) -> Group {
        let mut visited = vec![false; self.board.len()];
        let mut seen_liberty = vec![false; self.board.len()];
        self.group_from(point, stone, &mut visited, &mut seen_liberty)
    }

    /// Every group of `stone` on the board, in scan order of their first stone.
    pub fn groups(&self, stone: Stone) -> Vec<Group> {
        let mut visited = vec![false; self.board.len()];
        let mut seen_liberty = vec![false; self.board.len()];
        let mut groups = Vec::new();

        for p in self.points() {
            if self.stone_at(p) == Some(stone) && !visited[self.idx(p)] {
                groups.push(self.group_from(p, stone, &mut visited, &mut seen_liberty));
            }
        }

        groups
    }

    /// Group flood-fill using a shared visited bitset. `seen_liberty` must be
    /// all false on entry and is left that way on return.
    fn group_from(
        &self,
        point: Point,
        stone: Stone,
        visited: &mut [bool],
        seen_liberty: &mut [bool],
    ) -> Group {
        if self.stone_at(point) != Some(stone) {
            return Group::default();
        }

        let mut group = Group::default();
        let mut stack = vec![point];
        visited[self.idx(point)] = true;

        while let Some(p) = stack.pop() {
            group.stones.push(p);
            for n in self.neighbors(p) {
                let ni = self.idx(n);
                match self.stone_at(n) {
                    None if !seen_liberty[ni] => {
                        seen_liberty[ni] = true;
                        group.liberties.push(n);
                    }
                    Some(s) if s == stone && !visited[ni] => {
                        visited[ni] = true;
                        stack.push(n);
                    }
                    _ => {}
                }
            }
        }

        for &lib in &group.liberties {
            seen_liberty[self.idx(lib)] = false;
        }
        group
    }

    // -- Internal helpers --

    #[inline]
    fn idx(&self, (col, row): Point) -> usize {
        row as usize * self.size as usize + col as usize
    }

    fn set_stone(&mut self, point: Point, stone: Stone) {
        if self.on_board(point) {
            let i = self.idx(point);
            self.board[i] = stone.to_int();
        }
    }

    fn clear_stone(&mut self, point: Point) {
        if self.on_board(point) {
            let i = self.idx(point);
            self.board[i] = 0;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Test helper: build a goban from an ASCII layout. 'B' = Black, 'W' = White, '+' = Empty.
    pub(crate) fn goban_from_layout(layout: &[&str]) -> Goban {
        let rows: Vec<Vec<i8>> = layout
            .iter()
            .map(|row| {
                row.chars()
                    .map(|c| match c {
                        'B' => Stone::Black.to_int(),
                        'W' => Stone::White.to_int(),
                        _ => 0,
                    })
                    .collect()
            })
            .collect();
        Goban::from_rows(rows)
    }

    fn no_dead_groups(goban: &Goban) -> bool {
        [Stone::Black, Stone::White]
            .iter()
            .all(|&s| goban.groups(s).iter().all(|g| g.liberty_count() > 0))
    }

    #[test]
    fn creates_empty_standard_board() {
        let goban = Goban::new();
        assert_eq!(goban.size(), 19);
        assert_eq!(goban.board().len(), 361);
        assert!(goban.is_empty());
        assert_eq!(goban.ko(), None);
        assert_eq!(goban.center(), (9, 9));
    }

    #[test]
    #[should_panic(expected = "malformed")]
    fn rejects_malformed_board() {
        Goban::from_rows(vec![vec![0], vec![0, 0]]);
    }

    #[test]
    #[should_panic(expected = "malformed")]
    fn rejects_board_too_large_for_coordinates() {
        // 258 rows truncate to a side length of 2, matching every row.
        Goban::from_rows(vec![vec![0; 2]; 258]);
    }

    #[test]
    fn on_board_check() {
        let goban = Goban::with_size(4);
        assert!(goban.on_board((0, 0)));
        assert!(goban.on_board((3, 3)));
        assert!(!goban.on_board((4, 0)));
        assert!(!goban.on_board((0, 4)));
    }

    #[test]
    fn neighbor_counts_at_edges() {
        let goban = Goban::with_size(5);
        assert_eq!(goban.neighbors((0, 0)).len(), 2);
        assert_eq!(goban.neighbors((2, 0)).len(), 3);
        assert_eq!(goban.neighbors((2, 2)).len(), 4);
        assert_eq!(goban.surrounding((0, 0)).len(), 3);
        assert_eq!(goban.surrounding((4, 2)).len(), 5);
        assert_eq!(goban.surrounding((2, 2)).len(), 8);
    }

    #[test]
    fn scan_order_is_row_major() {
        let goban = Goban::with_size(3);
        let points: Vec<Point> = goban.points().take(4).collect();
        assert_eq!(points, vec![(0, 0), (1, 0), (2, 0), (0, 1)]);
    }

    #[test]
    fn group_counts_shared_liberty_once() {
        // (1, 0) borders both (0, 0) and (1, 1).
        let goban = goban_from_layout(&["B++", "BB+", "+++"]);
        let group = goban.group((0, 0), Stone::Black);
        assert_eq!(group.len(), 3);
        assert_eq!(group.liberty_count(), 4);

        let square = goban_from_layout(&["+++++", "+BB++", "+BB++", "+++++", "+++++"]);
        let group = square.group((1, 1), Stone::Black);
        assert_eq!(group.len(), 4);
        assert_eq!(group.liberty_count(), 8);
    }

    #[test]
    fn group_of_wrong_color_is_empty() {
        let goban = goban_from_layout(&["B+", "++"]);
        assert!(goban.group((0, 0), Stone::White).is_empty());
        assert!(goban.group((1, 1), Stone::Black).is_empty());
    }

    #[test]
    fn sweep_keeps_liberties_separate_between_groups() {
        // Both black groups border (1, 1) and (1, 0); each must count them.
        let goban = goban_from_layout(&["B+B", "B+B", "+++"]);
        let groups = goban.groups(Stone::Black);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].liberty_count(), 3);
        assert_eq!(groups[1].liberty_count(), 3);
        assert_eq!(groups[0].liberty_count(), goban.group((0, 0), Stone::Black).liberty_count());
    }

    #[test]
    fn groups_finds_each_chain_once() {
        let goban = goban_from_layout(&["B+B", "B+B", "+W+"]);
        assert_eq!(goban.groups(Stone::Black).len(), 2);
        assert_eq!(goban.groups(Stone::White).len(), 1);
    }

    #[test]
    fn prevents_overwrite() {
        let mut goban = Goban::with_size(4);
        goban.play((0, 0), Stone::Black).unwrap();
        assert_eq!(goban.play((0, 0), Stone::White), Err(GoError::Overwrite));
    }

    #[test]
    fn prevents_off_board() {
        let goban = Goban::with_size(4);
        assert_eq!(
            goban.check_move((4, 1), Stone::Black).unwrap_err(),
            GoError::NotOnBoard
        );
        assert!(!goban.is_legal((0, 19), Stone::Black));
    }

    #[test]
    fn prevents_suicide() {
        let goban = goban_from_layout(&["+B++", "B+++", "++++", "++++"]);
        assert_eq!(
            goban.check_move((0, 0), Stone::White).unwrap_err(),
            GoError::Suicide
        );
        assert!(!goban.is_legal((0, 0), Stone::White));
    }

    #[test]
    fn prevents_multi_stone_suicide() {
        let goban = goban_from_layout(&["W+B+", "WB++", "B+++", "++++"]);
        assert!(!goban.is_legal((1, 0), Stone::White));
    }

    #[test]
    fn capture_restores_liberty_for_otherwise_suicidal_move() {
        let goban = goban_from_layout(&["+WB+", "WB++", "B+++", "++++"]);
        let placement = goban.check_move((0, 0), Stone::Black).unwrap();
        assert_eq!(placement.captured(), 2);
    }

    #[test]
    fn legality_check_leaves_board_untouched() {
        let goban = goban_from_layout(&["+B++", "BWB+", "++++", "++++"]);
        let before = goban.clone();
        assert!(goban.is_legal((1, 2), Stone::Black));
        assert!(!goban.is_legal((0, 0), Stone::White));
        assert_eq!(goban, before);
    }

    #[test]
    fn illegal_play_leaves_board_untouched() {
        let mut goban = goban_from_layout(&["+B++", "B+++", "++++", "++++"]);
        let before = goban.clone();
        assert!(!goban.apply((0, 0), Stone::White));
        assert_eq!(goban, before);
    }

    #[test]
    fn captures_single_stone() {
        let mut goban = goban_from_layout(&["+B++", "BWB+", "++++", "++++"]);
        assert_eq!(goban.play((1, 2), Stone::Black), Ok(1));
        assert_eq!(goban.stone_at((1, 1)), None);
        assert_eq!(goban.captures().black, 1);
    }

    #[test]
    fn captures_four_stone_group() {
        let mut goban = goban_from_layout(&[
            "++BB++", "+BWWB+", "+BWWB+", "++B+++", "++++++", "++++++",
        ]);
        assert_eq!(goban.play((3, 3), Stone::Black), Ok(4));
        for p in [(2, 1), (3, 1), (2, 2), (3, 2)] {
            assert_eq!(goban.stone_at(p), None);
        }
        assert_eq!(goban.stone_at((3, 3)), Some(Stone::Black));
        assert_eq!(goban.captures().get(Stone::Black), 4);
        assert!(no_dead_groups(&goban));
    }

    #[test]
    fn captures_corner_stone() {
        let mut goban = Goban::with_size(4);
        goban.play((0, 0), Stone::Black).unwrap();
        goban.play((1, 0), Stone::White).unwrap();
        goban.play((0, 1), Stone::White).unwrap();

        assert_eq!(goban.stone_at((0, 0)), None);
        assert_eq!(goban.captures().white, 1);
    }

    #[test]
    fn removes_several_dead_groups_in_one_sweep() {
        let mut goban = goban_from_layout(&["WB+BW", "B+++B", "+++++", "+++++", "+++++"]);
        // Both corner stones were already surrounded when the layout was built.
        assert_eq!(goban.remove_dead_groups(Stone::White), 2);
        assert_eq!(goban.stone_at((0, 0)), None);
        assert_eq!(goban.stone_at((4, 0)), None);
        assert_eq!(goban.captures().black, 2);
        assert_eq!(goban.remove_dead_groups(Stone::White), 0);
    }

    #[test]
    fn ko_blocks_immediate_recapture() {
        let mut goban = goban_from_layout(&["+BW+", "BW+W", "+BW+", "++++"]);
        assert_eq!(goban.play((2, 1), Stone::Black), Ok(1));
        assert_eq!(goban.ko(), Some((1, 1)));
        assert_eq!(goban.play((1, 1), Stone::White), Err(GoError::KoViolation));
    }

    #[test]
    fn ko_released_after_another_move() {
        let mut goban = goban_from_layout(&["+BW+", "BW+W", "+BW+", "++++"]);
        goban.play((2, 1), Stone::Black).unwrap();
        goban.play((3, 3), Stone::White).unwrap();
        assert_eq!(goban.ko(), None);
        goban.play((0, 3), Stone::Black).unwrap();
        assert!(goban.is_legal((1, 1), Stone::White));
    }

    #[test]
    fn capturing_two_stones_sets_no_ko() {
        let mut goban = goban_from_layout(&["+BBW+", "BWW+W", "+BBW+", "+++++", "+++++"]);
        assert_eq!(goban.play((3, 1), Stone::Black), Ok(2));
        assert_eq!(goban.ko(), None);
    }

    #[test]
    fn placement_reports_ko_shape_without_committing() {
        let goban = goban_from_layout(&["+BW+", "BW+W", "+BW+", "++++"]);
        let placement = goban.check_move((2, 1), Stone::Black).unwrap();
        assert!(placement.creates_ko());
        assert_eq!(placement.point(), (2, 1));
        assert_eq!(placement.ko(), Some((1, 1)));
        assert_eq!(placement.goban().stone_at((1, 1)), None);
        assert_eq!(placement.goban().stone_at((2, 1)), Some(Stone::Black));
        assert_eq!(goban.ko(), None);
        assert_eq!(goban.stone_at((1, 1)), Some(Stone::White));
    }

    #[test]
    fn pass_clears_ko() {
        let mut goban = goban_from_layout(&["+BW+", "BW+W", "+BW+", "++++"]);
        goban.play((2, 1), Stone::Black).unwrap();
        assert!(goban.ko().is_some());

        goban.pass();
        assert!(goban.ko().is_none());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut goban = goban_from_layout(&["+BW+", "BW+W", "+BW+", "++++"]);
        goban.play((2, 1), Stone::Black).unwrap();

        goban.reset();
        assert!(goban.is_empty());
        assert_eq!(goban.ko(), None);
        assert_eq!(goban.captures(), &Captures::new());

        goban.reset();
        assert_eq!(goban, Goban::with_size(4));
    }
}
