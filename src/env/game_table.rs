use super::base_env::{BaseEnv, Direction};
use rand::Rng;

const WINNING_TILE: u32 = 2048;

/// The 2048 board. A shift compacts each line in a single pass, so a tile
/// travels at most one cell per move.
pub struct GameTable {
    cells: Vec<u32>,
    table_size: usize,
    current_score: u32,
    max_score: u32,
    won: bool,
    lost: bool,
}

impl GameTable {
    pub fn new(table_size: usize) -> Self {
        assert!(table_size >= 2);
        let mut table = GameTable {
            cells: vec![0; table_size * table_size],
            table_size,
            current_score: 0,
            max_score: 0,
            won: false,
            lost: false,
        };
        table.reset();
        table
    }

    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    // `line` is ordered from the destination edge outwards.
    fn compact_line(&mut self, line: &[usize]) -> bool {
        let mut moved = false;
        for k in 1..line.len() {
            let (dst, src) = (line[k - 1], line[k]);
            if self.cells[src] == 0 {
                continue;
            }
            if self.cells[src] == self.cells[dst] {
                self.update_score(self.cells[src] * 2);
            } else if self.cells[dst] != 0 {
                continue;
            }
            self.cells[dst] += self.cells[src];
            self.cells[src] = 0;
            moved = true;
            if self.cells[dst] == WINNING_TILE {
                self.won = true;
            }
        }
        moved
    }

    fn line(&self, direction: Direction, lane: usize) -> Vec<usize> {
        let s = self.table_size;
        let mut indices: Vec<usize> = match direction {
            Direction::Left | Direction::Right => (0..s).map(|j| lane * s + j).collect(),
            Direction::Up | Direction::Down => (0..s).map(|i| i * s + lane).collect(),
        };
        if matches!(direction, Direction::Right | Direction::Down) {
            indices.reverse();
        }
        indices
    }

    fn update_score(&mut self, points: u32) {
        self.current_score += points;
        if self.current_score > self.max_score {
            self.max_score = self.current_score;
        }
    }

    fn generate_tile(&mut self) {
        if self.lost || self.won {
            return;
        }
        let empty_indexes: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(i, _)| i)
            .collect();
        if empty_indexes.is_empty() {
            self.lost = true;
            return;
        }
        let slot = empty_indexes[rand::thread_rng().gen_range(0..empty_indexes.len())];
        self.cells[slot] = 2;
        if !self.has_moves() {
            self.lost = true;
        }
    }

    fn has_moves(&self) -> bool {
        let s = self.table_size;
        for i in 0..s {
            for j in 0..s {
                let v = self.cells[i * s + j];
                if v == 0 {
                    return true;
                }
                if j + 1 < s && self.cells[i * s + j + 1] == v {
                    return true;
                }
                if i + 1 < s && self.cells[(i + 1) * s + j] == v {
                    return true;
                }
            }
        }
        false
    }

    #[cfg(test)]
    fn from_cells(table_size: usize, cells: Vec<u32>) -> Self {
        assert_eq!(cells.len(), table_size * table_size);
        GameTable {
            cells,
            table_size,
            current_score: 0,
            max_score: 0,
            won: false,
            lost: false,
        }
    }
}

impl BaseEnv for GameTable {
    fn state(&self) -> &[u32] {
        &self.cells
    }

    fn shift(&mut self, direction: Direction) -> bool {
        if self.lost || self.won {
            return false;
        }
        let mut moved = false;
        for lane in 0..self.table_size {
            let line = self.line(direction, lane);
            moved |= self.compact_line(&line);
        }
        if moved {
            self.generate_tile();
        }
        moved
    }

    fn current_score(&self) -> u32 {
        self.current_score
    }

    fn is_won(&self) -> bool {
        self.won
    }

    fn is_lost(&self) -> bool {
        self.lost
    }

    fn reset(&mut self) {
        self.current_score = 0;
        self.cells.iter_mut().for_each(|c| *c = 0);
        self.won = false;
        self.lost = false;
        self.generate_tile();
    }
}
