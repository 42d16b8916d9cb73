use crate::{data::Record, error::ExtractError, utils::element_text};
use itertools::Itertools;
use lazy_static::lazy_static;
use scraper::{ElementRef, Selector};

const E: &str = "Invalid selector";
lazy_static! {
    static ref THEAD_TH: Selector = Selector::parse("thead th").expect(E);
    static ref TBODY_TR: Selector = Selector::parse("tbody tr").expect(E);
    static ref TR: Selector = Selector::parse("tr").expect(E);
    static ref TH: Selector = Selector::parse("th").expect(E);
    static ref TD: Selector = Selector::parse("td").expect(E);
    static ref CELL: Selector = Selector::parse("th, td").expect(E);
    static ref IMG: Selector = Selector::parse("img").expect(E);
}

/// Column whose value is the `src` of the image in the cell rather than its text.
pub const IMAGE_COLUMN: &str = "Image";

/// `thead th` headers zipped with the cells of every `tbody tr`, one record per body row.
pub fn header_rows(table: ElementRef) -> Result<Vec<Record>, ExtractError> {
    let headers = table.select(&THEAD_TH).map(|th| element_text(&th)).collect_vec();
    if headers.is_empty() {
        return Err(ExtractError::MissingElement("thead th"));
    }

    Ok(table
        .select(&TBODY_TR)
        .map(|row| {
            headers
                .iter()
                .cloned()
                .zip(row.select(&CELL).map(|c| element_text(&c)))
                .collect()
        })
        .collect())
}

/// One `th` label and one `td` value per `tr`.
pub fn label_rows(container: ElementRef) -> Result<Record, ExtractError> {
    let mut record = Record::new();
    for row in container.select(&TR) {
        let header = row
            .select(&TH)
            .next()
            .ok_or(ExtractError::MissingElement("th"))?;
        let value = row
            .select(&TD)
            .next()
            .ok_or(ExtractError::MissingElement("td"))?;

        let header = element_text(&header);
        if header == IMAGE_COLUMN {
            let src = value
                .select(&IMG)
                .next()
                .and_then(|img| img.value().attr("src"))
                .ok_or(ExtractError::MissingAttribute {
                    element: "img",
                    attribute: "src",
                })?;
            record.insert(header, src.trim());
        } else {
            record.insert(header, element_text(&value));
        }
    }
    Ok(record)
}

/// `td` cells taken pairwise as label, value. A trailing unpaired label is dropped.
pub fn alternating_cells(container: ElementRef) -> Record {
    container
        .select(&TD)
        .map(|td| element_text(&td))
        .tuples::<(_, _)>()
        .collect()
}
