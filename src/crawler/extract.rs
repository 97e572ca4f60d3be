//! HTML extraction for the index and detail pages
//!
//! Pure functions over already-fetched page content. The query paths here are
//! the contract with the remote site: a `writeups_table` on the index page
//! with anchors in columns 1, 2 and 5, and a `id_description` container plus
//! an optional "Original writeup" anchor on detail pages.

use crate::ExtractError;
use scraper::{ElementRef, Html, Selector};

/// Visible text of the anchor pointing at the externally hosted write-up
const ORIGINAL_WRITEUP_MARKER: &str = "Original writeup";

/// One row of the index table
///
/// Immutable once extracted; order reflects document order on the index page
/// and carries no guarantee downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteupRow {
    /// CTF event name (column 1)
    pub event: String,

    /// Task name (column 2)
    pub task: String,

    /// Relative link to the write-up detail page (column 5)
    pub path: String,
}

/// Links found on a detail page
///
/// Both are optional and their absence is meaningful, not an error: the
/// resolver falls back through them in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailLinks {
    /// First anchor inside the description container
    pub inline: Option<String>,

    /// Anchor whose visible text is exactly "Original writeup"
    pub original: Option<String>,
}

fn selector(css: &'static str) -> Selector {
    // All selectors in this module are static literals.
    Selector::parse(css).expect("static selector")
}

/// Extracts the catalog rows from the index page
///
/// A row whose expected structure is absent (missing anchor or text) is a
/// hard error for the whole extraction: the index layout drifted, which is a
/// systemic problem rather than something retries can fix. A present table
/// with zero rows is fine and yields an empty list.
pub fn extract_rows(html: &str) -> Result<Vec<WriteupRow>, ExtractError> {
    let document = Html::parse_document(html);

    let table_sel = selector("table#writeups_table");
    if document.select(&table_sel).next().is_none() {
        return Err(ExtractError::TableMissing);
    }

    let row_sel = selector("table#writeups_table tbody tr");
    let cell_sel = selector("td");
    let anchor_sel = selector("a");

    let mut rows = Vec::new();

    for (index, row) in document.select(&row_sel).enumerate() {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();

        let event = cell_anchor_text(&cells, 0, &anchor_sel).ok_or(ExtractError::RowField {
            index,
            field: "event link",
        })?;

        let task = cell_anchor_text(&cells, 1, &anchor_sel).ok_or(ExtractError::RowField {
            index,
            field: "task link",
        })?;

        let path = cells
            .get(4)
            .and_then(|cell| cell.select(&anchor_sel).next())
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string)
            .ok_or(ExtractError::RowField {
                index,
                field: "detail link",
            })?;

        rows.push(WriteupRow { event, task, path });
    }

    Ok(rows)
}

/// Text of the first anchor in the cell at `position`, if any
fn cell_anchor_text(
    cells: &[ElementRef],
    position: usize,
    anchor_sel: &Selector,
) -> Option<String> {
    let text: String = cells
        .get(position)?
        .select(anchor_sel)
        .next()?
        .text()
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Extracts the candidate write-up links from a detail page
///
/// `inline` is the href of the first anchor inside the description
/// container's paragraphs; `original` is the href of the anchor labelled
/// "Original writeup". Either or both may be absent.
pub fn extract_detail_links(html: &str) -> DetailLinks {
    let document = Html::parse_document(html);

    let inline = document
        .select(&selector("div#id_description p a"))
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);

    let original = document
        .select(&selector("a"))
        .find(|a| a.text().collect::<String>() == ORIGINAL_WRITEUP_MARKER)
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);

    DetailLinks { inline, original }
}
