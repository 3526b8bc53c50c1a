//! Parser for the terse cell-range language used by constraint options.
//!
//! A cell list is written as one or more `r<rows>c<cols>` segments, where
//! rows and columns accept ranges (`1-3`) and enumerations (`1,3`), followed
//! by an optional `d<digits>` suffix that walks numpad compass directions
//! from the last cell:
//!
//! - `r2c3` — one cell
//! - `r1-3c5` — three cells down column 5
//! - `r1,3c2,4` — the four corners of that sub-grid
//! - `r1c1r9c9` — two cells
//! - `r1c1d322` — `r1c1` then down-right, down, down
//!
//! Malformed strings are rejected outright; constraint construction is the
//! only place parse errors can surface (solving never parses).

use crate::cell_id::CellId;
use crate::layout::Layout;

impl Layout {
    /// Parses a single ordered cell list.
    ///
    /// ```
    /// # use variant_solver_lib::layout::Layout;
    /// let lay = Layout::new(9);
    /// let cells = lay.parse_cells("r2c3-4").unwrap();
    /// assert_eq!(cells, vec![lay.cell(1, 2), lay.cell(1, 3)]);
    /// assert!(lay.parse_cells("r1c1-").is_err());
    /// ```
    pub fn parse_cells(&self, text: &str) -> Result<Vec<CellId>, String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err("empty cell specification".to_owned());
        }
        if !trimmed.is_ascii() {
            return Err(format!("invalid characters in cell specification: {}", text));
        }

        let lower = trimmed.to_ascii_lowercase();
        let bytes = lower.as_bytes();
        let mut cells: Vec<CellId> = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            match bytes[pos] {
                b'r' => {
                    pos += 1;
                    let rows = self.parse_number_list(bytes, &mut pos, text)?;
                    if pos >= bytes.len() || bytes[pos] != b'c' {
                        return Err(format!("expected columns after rows in: {}", text));
                    }
                    pos += 1;
                    let cols = self.parse_number_list(bytes, &mut pos, text)?;
                    for &row in &rows {
                        for &col in &cols {
                            cells.push(self.cell(row - 1, col - 1));
                        }
                    }
                }
                b'd' => {
                    pos += 1;
                    self.parse_walk(bytes, &mut pos, &mut cells, text)?;
                }
                _ => {
                    return Err(format!("unexpected character in cell specification: {}", text));
                }
            }
        }

        Ok(cells)
    }

    /// Parses a `;`-separated list of cell lists. Unlike [`Layout::parse_cells`],
    /// each group keeps its written order but the groups themselves are
    /// returned sorted so the result is independent of group ordering.
    pub fn parse_cell_groups(&self, text: &str) -> Result<Vec<Vec<CellId>>, String> {
        let mut groups = text
            .split(';')
            .map(|part| self.parse_cells(part))
            .collect::<Result<Vec<_>, _>>()?;
        groups.sort();
        Ok(groups)
    }

    // One comma-separated list of numbers and ranges, 1-based, bounds checked.
    fn parse_number_list(
        &self,
        bytes: &[u8],
        pos: &mut usize,
        text: &str,
    ) -> Result<Vec<usize>, String> {
        let mut values = Vec::new();
        loop {
            let start = self.parse_number(bytes, pos, text)?;
            if *pos < bytes.len() && bytes[*pos] == b'-' {
                *pos += 1;
                let end = self.parse_number(bytes, pos, text)?;
                let (low, high) = (start.min(end), start.max(end));
                values.extend(low..=high);
            } else {
                values.push(start);
            }

            if *pos < bytes.len() && bytes[*pos] == b',' {
                *pos += 1;
            } else {
                return Ok(values);
            }
        }
    }

    fn parse_number(&self, bytes: &[u8], pos: &mut usize, text: &str) -> Result<usize, String> {
        let mut value = 0usize;
        let mut digits = 0;
        while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
            value = value * 10 + (bytes[*pos] - b'0') as usize;
            digits += 1;
            *pos += 1;
        }
        if digits == 0 {
            return Err(format!("expected a number in: {}", text));
        }
        if value == 0 || value > self.size() {
            return Err(format!("index {} out of range in: {}", value, text));
        }
        Ok(value)
    }

    // Numpad walk appended to the cells parsed so far.
    fn parse_walk(
        &self,
        bytes: &[u8],
        pos: &mut usize,
        cells: &mut Vec<CellId>,
        text: &str,
    ) -> Result<(), String> {
        if cells.is_empty() {
            return Err(format!("direction walk needs a starting cell in: {}", text));
        }

        let mut steps = 0;
        while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
            let step = match bytes[*pos] {
                b'1' => (1, -1),
                b'2' => (1, 0),
                b'3' => (1, 1),
                b'4' => (0, -1),
                b'6' => (0, 1),
                b'7' => (-1, -1),
                b'8' => (-1, 0),
                b'9' => (-1, 1),
                other => {
                    return Err(format!(
                        "'{}' is not a direction in: {}",
                        other as char, text
                    ));
                }
            };
            let last = *cells.last().unwrap();
            match last.offset(step.0, step.1) {
                Some(next) => cells.push(next),
                None => return Err(format!("direction walk leaves the grid in: {}", text)),
            }
            steps += 1;
            *pos += 1;
        }

        if steps == 0 {
            return Err(format!("empty direction walk in: {}", text));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn single_cells_and_ranges() {
        let lay = Layout::new(9);
        assert_eq!(lay.parse_cells("r1c1").unwrap(), vec![lay.cell(0, 0)]);
        assert_eq!(lay.parse_cells("R5C5").unwrap(), vec![lay.cell(4, 4)]);
        assert_eq!(
            lay.parse_cells("r1-3c5").unwrap(),
            vec![lay.cell(0, 4), lay.cell(1, 4), lay.cell(2, 4)]
        );
        assert_eq!(
            lay.parse_cells("r1,3c2").unwrap(),
            vec![lay.cell(0, 1), lay.cell(2, 1)]
        );
        assert_eq!(
            lay.parse_cells("r2c1,3-4").unwrap(),
            vec![lay.cell(1, 0), lay.cell(1, 2), lay.cell(1, 3)]
        );
        assert_eq!(
            lay.parse_cells("r1c1r9c9").unwrap(),
            vec![lay.cell(0, 0), lay.cell(8, 8)]
        );
    }

    #[test]
    fn direction_walks() {
        let lay = Layout::new(9);
        assert_eq!(
            lay.parse_cells("r1c1d222").unwrap(),
            vec![
                lay.cell(0, 0),
                lay.cell(1, 0),
                lay.cell(2, 0),
                lay.cell(3, 0)
            ]
        );
        assert_eq!(
            lay.parse_cells("r1c1d33").unwrap(),
            vec![lay.cell(0, 0), lay.cell(1, 1), lay.cell(2, 2)]
        );
        // Walking off the top edge.
        assert!(lay.parse_cells("r1c1d8").is_err());
        // 5 and 0 are not compass directions.
        assert!(lay.parse_cells("r1c1d5").is_err());
        assert!(lay.parse_cells("r1c1d0").is_err());
        // A walk needs a start and at least one step.
        assert!(lay.parse_cells("d22").is_err());
        assert!(lay.parse_cells("r1c1d").is_err());
    }

    #[test]
    fn rejects_malformed_strings() {
        let lay = Layout::new(9);
        for bad in ["", " ", "r", "r1", "c1", "r0c1", "r10c1", "r1c0", "r1c10", "r1c1-", "r1c1,", "r1c1-,2", "x1c1", "r1x1"] {
            assert!(lay.parse_cells(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn range_direction_is_normalized() {
        let lay = Layout::new(9);
        assert_eq!(
            lay.parse_cells("r3-1c1").unwrap(),
            vec![lay.cell(0, 0), lay.cell(1, 0), lay.cell(2, 0)]
        );
    }

    #[test]
    fn groups() {
        let lay = Layout::new(9);
        let groups = lay.parse_cell_groups("r2c2;r1c1").unwrap();
        assert_eq!(groups, vec![vec![lay.cell(0, 0)], vec![lay.cell(1, 1)]]);
        assert!(lay.parse_cell_groups("").is_err());
        assert!(lay.parse_cell_groups("r1c1;;r2c2").is_err());
    }

    #[test]
    fn small_grid_bounds() {
        let lay = Layout::new(4);
        assert!(lay.parse_cells("r4c4").is_ok());
        assert!(lay.parse_cells("r5c1").is_err());
    }
}
