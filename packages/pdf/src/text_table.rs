//! Table recovery from positioned page lines.
//!
//! The header row is the line that splits into the most cells (at least
//! `min_cells`; the first one wins a tie). Its cells fix the columns: each
//! boundary sits halfway between two neighbouring header cells, the same
//! way a fixed-width report is cut at known column starts. Every later line
//! becomes a row with one slot per column, and each word lands in the
//! column holding its midpoint. A column no word reaches stays `None`, so
//! blank cells keep their position.
//!
//! Tables that run over several pages usually repeat the header. A page
//! that does not is read with the columns of the page before it.

use serde::Serialize;

use crate::layout::Line;

/// One table row. `None` marks a cell with no text.
pub type Row = Vec<Option<String>>;

/// Cells recovered from one page, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Rows in top-to-bottom order, starting with the header row when the
    /// page has one.
    pub rows: Vec<Row>,
}

impl Table {
    /// Widest row in the table.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Column layout taken from a header row.
#[derive(Debug, Clone, PartialEq)]
pub struct Columns {
    titles: Vec<String>,
    bounds: Vec<f64>,
}

impl Columns {
    fn from_header(line: &Line) -> Self {
        let cells = line.cells();
        let bounds = cells
            .windows(2)
            .map(|pair| f64::midpoint(pair[0].end, pair[1].start))
            .collect();
        Self {
            titles: cells.into_iter().map(|cell| cell.text).collect(),
            bounds,
        }
    }

    /// Header cell texts, left to right.
    #[must_use]
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Whether there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    fn index_of(&self, x: f64) -> usize {
        self.bounds.partition_point(|&bound| bound <= x)
    }

    fn is_header(&self, line: &Line) -> bool {
        let cells = line.cells();
        cells.len() == self.titles.len()
            && cells.iter().zip(&self.titles).all(|(cell, title)| &cell.text == title)
    }

    fn place(&self, line: &Line) -> Row {
        let mut row: Row = vec![None; self.len()];
        for word in &line.words {
            let Some(slot) = row.get_mut(self.index_of(word.center())) else {
                continue;
            };
            match slot {
                Some(text) => {
                    text.push(' ');
                    text.push_str(&word.text);
                }
                None => *slot = Some(word.text.clone()),
            }
        }
        row
    }
}

/// Recovers the table of one page.
///
/// With `carried` columns from an earlier page, only a line repeating that
/// header starts a new layout; otherwise the carried columns apply to every
/// line. Returns the table together with the columns used, or `None` when
/// no header is found and nothing is carried.
#[must_use]
pub fn detect(
    lines: &[Line],
    min_cells: usize,
    carried: Option<&Columns>,
) -> Option<(Table, Columns)> {
    let (columns, body) = match find_header(lines, min_cells, carried) {
        Some(index) => (Columns::from_header(&lines[index]), index),
        None => (carried?.clone(), 0),
    };

    let rows: Vec<Row> = lines[body..]
        .iter()
        .filter(|line| !line.is_empty())
        .map(|line| columns.place(line))
        .collect();

    log::trace!(
        "Detected {} table rows over {} columns",
        rows.len(),
        columns.len()
    );

    Some((Table { rows }, columns))
}

fn find_header(lines: &[Line], min_cells: usize, carried: Option<&Columns>) -> Option<usize> {
    if let Some(columns) = carried {
        return lines.iter().position(|line| columns.is_header(line));
    }

    let mut widest: Option<(usize, usize)> = None;
    for (index, line) in lines.iter().enumerate() {
        let count = line.cells().len();
        if count >= min_cells.max(1) && widest.is_none_or(|(_, most)| count > most) {
            widest = Some((index, count));
        }
    }
    widest.map(|(index, _)| index)
}
