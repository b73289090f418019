use crate::domain::model::ReadingEntry;
use crate::utils::error::{CatalogError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// Collect `(series, year, issueNumber)` triples from every `.cbl` file
/// under `dir`, recursively. A file that fails to parse is skipped with a
/// warning; a missing directory is an empty input.
pub fn load_reading_lists(dir: &Path) -> Result<Vec<ReadingEntry>> {
    let mut entries = Vec::new();
    if !dir.is_dir() {
        tracing::warn!("reading-list directory {} not found", dir.display());
        return Ok(entries);
    }

    tracing::debug!("checking reading lists in {}", dir.display());
    walk(dir, &mut entries)?;
    Ok(entries)
}

fn walk(dir: &Path, out: &mut Vec<ReadingEntry>) -> Result<()> {
    for dir_entry in fs::read_dir(dir)? {
        let path = dir_entry?.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("cbl"))
        {
            match parse_file(&path) {
                Ok(mut parsed) => {
                    tracing::debug!("{}: {} books", path.display(), parsed.len());
                    out.append(&mut parsed);
                }
                Err(e) => {
                    tracing::warn!("unable to process {}: {}", path.display(), e);
                }
            }
        }
    }
    Ok(())
}

fn parse_file(path: &Path) -> Result<Vec<ReadingEntry>> {
    let content = fs::read_to_string(path)?;
    parse_document(&content)
}

/// Parse one CBL document: `<Book>` elements under `<Books>`, with the
/// series name, issue number and series year in the `Series`, `Number` and
/// `Volume` attributes.
pub fn parse_document(xml: &str) -> Result<Vec<ReadingEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut in_books = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.name().as_ref() == b"Books" => in_books = true,
            Event::End(ref e) if e.name().as_ref() == b"Books" => in_books = false,
            Event::Start(ref e) | Event::Empty(ref e)
                if in_books && e.name().as_ref() == b"Book" =>
            {
                let mut series = None;
                let mut number = None;
                let mut year = None;

                for attr in e.attributes().flatten() {
                    let value = attr.unescape_value().map_err(|err| {
                        CatalogError::ParseError {
                            message: format!("bad attribute value: {}", err),
                        }
                    })?;
                    match attr.key.as_ref() {
                        b"Series" => series = Some(value.into_owned()),
                        b"Number" => number = Some(value.into_owned()),
                        b"Volume" => year = Some(value.into_owned()),
                        _ => {}
                    }
                }

                match (series, number, year) {
                    (Some(series), Some(number), Some(year)) => entries.push(ReadingEntry {
                        series,
                        year,
                        number,
                    }),
                    _ => {
                        return Err(CatalogError::ParseError {
                            message: "Book element missing Series, Number or Volume attribute"
                                .to_string(),
                        })
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}
