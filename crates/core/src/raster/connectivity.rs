//! Cell adjacency for region growing

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Cardinal neighbours as (row_offset, col_offset): W, E, N, S
const ROOK: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Cardinal then diagonal neighbours: W, E, N, S, NW, SW, NE, SE
const QUEEN: [(isize, isize); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Which neighbours of a cell count as adjacent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Connectivity {
    /// Edge-sharing neighbours only (no diagonals)
    Four,
    /// Edge- and corner-sharing neighbours
    #[default]
    Eight,
}

impl Connectivity {
    /// Neighbour offsets as (row_offset, col_offset), centre excluded
    pub fn offsets(&self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::Four => &ROOK,
            Connectivity::Eight => &QUEEN,
        }
    }

    /// In-bounds neighbours of (row, col) in a `rows` x `cols` grid
    pub fn neighbors(
        &self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> impl Iterator<Item = (usize, usize)> {
        self.offsets().iter().filter_map(move |&(dr, dc)| {
            let nr = row.checked_add_signed(dr)?;
            let nc = col.checked_add_signed(dc)?;
            (nr < rows && nc < cols).then_some((nr, nc))
        })
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connectivity::Four => write!(f, "4"),
            Connectivity::Eight => write!(f, "8"),
        }
    }
}

impl FromStr for Connectivity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "4" | "four" | "rook" => Ok(Connectivity::Four),
            "8" | "eight" | "queen" => Ok(Connectivity::Eight),
            _ => Err(Error::InvalidParameter {
                name: "connectivity",
                value: s.to_string(),
                reason: "expected 4 or 8".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        assert_eq!(Connectivity::Four.offsets().len(), 4);
        assert_eq!(Connectivity::Eight.offsets().len(), 8);
        assert!(Connectivity::Eight
            .offsets()
            .iter()
            .all(|&(dr, dc)| (dr, dc) != (0, 0) && dr.abs() <= 1 && dc.abs() <= 1));
    }

    #[test]
    fn test_neighbors_clipped_at_corner() {
        let n: Vec<_> = Connectivity::Eight.neighbors(0, 0, 3, 3).collect();
        assert_eq!(n.len(), 3);
        assert!(n.contains(&(0, 1)));
        assert!(n.contains(&(1, 0)));
        assert!(n.contains(&(1, 1)));

        let n: Vec<_> = Connectivity::Four.neighbors(2, 2, 3, 3).collect();
        assert_eq!(n, vec![(2, 1), (1, 2)]);
    }

    #[test]
    fn test_parse() {
        assert_eq!("4".parse::<Connectivity>().unwrap(), Connectivity::Four);
        assert_eq!("Queen".parse::<Connectivity>().unwrap(), Connectivity::Eight);
        assert!("6".parse::<Connectivity>().is_err());
    }
}
