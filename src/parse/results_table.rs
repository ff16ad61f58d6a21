//! End-game results table.
//!
//! Column layout of `table.game_end_table` body rows:
//!
//! | idx | content                                   |
//! |-----|-------------------------------------------|
//! | 0   | player link + corporation `div`s          |
//! | 1   | terraforming rating                       |
//! | 2-3 | milestone / award points (not trusted)    |
//! | 4   | greenery points                           |
//! | 5   | city points                               |
//! | 6   | victory points                            |
//! | 7   | final score                               |
//! | 8   | mega-credits                              |
//! | 9   | elapsed time                              |
//! | 10  | actions taken                             |
//!
//! Games with the Escape Velocity expansion insert a penalty column before
//! the final score, shifting 7..=10 right by one.

use scraper::{ElementRef, Html, Selector};

use super::parse_leading_int;
use crate::models::{PlayerData, Timer};

/// Present in the table header when the Escape Velocity penalty column exists.
pub const ESCAPE_VELOCITY_MARKER: &str = r#"data-tooltip="Escape Velocity penalty""#;

const COL_TR: usize = 1;
const COL_GREENERY: usize = 4;
const COL_CITY: usize = 5;
const COL_VP: usize = 6;
const COL_SCORE: usize = 7;
const COL_MC: usize = 8;
const COL_TIMER: usize = 9;
const COL_ACTIONS: usize = 10;

/// Parsed results table.
#[derive(Debug, Default)]
pub struct ResultsTable {
    /// Player rows in table (finishing) order
    pub rows: Vec<PlayerData>,

    /// Inner HTML of every body row's cells, including skipped rows
    pub raw_rows: Vec<Vec<String>>,
}

pub fn has_escape_velocity(html: &str) -> bool {
    html.contains(ESCAPE_VELOCITY_MARKER)
}

/// Extract player rows from the results table.
///
/// A missing table gives an empty result. Rows without a player link are
/// skipped.
pub fn parse_results(document: &Html, html: &str) -> ResultsTable {
    let shift = usize::from(has_escape_velocity(html));

    let table_sel = Selector::parse("table.game_end_table").unwrap();
    let row_sel = Selector::parse("tbody tr").unwrap();

    let mut out = ResultsTable::default();

    let Some(table) = document.select(&table_sel).next() else {
        return out;
    };

    for row in table.select(&row_sel) {
        let cells: Vec<ElementRef> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "td")
            .collect();

        out.raw_rows
            .push(cells.iter().map(|c| c.inner_html()).collect());

        if let Some(player) = parse_row(&cells, shift) {
            out.rows.push(player);
        }
    }

    out
}

fn parse_row(cells: &[ElementRef], shift: usize) -> Option<PlayerData> {
    let link_sel = Selector::parse("a").unwrap();
    let div_sel = Selector::parse("div").unwrap();

    let first = cells.first()?;
    let link = first.select(&link_sel).next()?;
    let name = link.text().collect::<String>().trim().to_string();

    // Corporation names sit in bare, attribute-less divs.
    let corporations = first
        .select(&div_sel)
        .filter(|div| div.value().attrs().next().is_none())
        .map(|div| div.text().collect::<String>().trim().to_string())
        .collect();

    let int = |idx: usize| parse_leading_int(&cell_text(cells, idx));

    let mut player = PlayerData::new(name);
    player.corporations = corporations;
    player.terraforming_rating = int(COL_TR);
    player.greenery_points = int(COL_GREENERY);
    player.city_points = int(COL_CITY);
    player.victory_points = int(COL_VP);
    player.final_score = int(COL_SCORE + shift);
    player.mega_credits = int(COL_MC + shift);
    player.timer = Timer::parse(&cell_text(cells, COL_TIMER + shift));
    player.actions_taken = int(COL_ACTIONS + shift);

    Some(player)
}

fn cell_text(cells: &[ElementRef], idx: usize) -> String {
    cells
        .get(idx)
        .map(|c| c.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}
