//! # Ticket files
//!
//! One ticket per line, elements as decimal integers. Writers emit sorted, comma-separated
//! lines. Readers accept commas, whitespace or both as delimiters, skip blank lines, and
//! treat each line as a set: order does not matter but a repeated element is rejected.
//! Leading zeros (`09`) are accepted.
//!
//! ```rust
//! use covergen::io::{parse_tickets, write_tickets};
//!
//! let tickets = parse_tickets("3, 1 2\n\n4 5 6\n", 6).unwrap();
//! assert_eq!(tickets.len(), 2);
//!
//! let mut out = Vec::new();
//! write_tickets(&mut out, &tickets).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "1,2,3\n4,5,6\n");
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::combinatorics::Element;
use crate::error::{CoverError, Result, ResultExt};
use crate::ticket::{Ticket, TicketCollection};

/// Parses one line into a ticket. Blank lines yield `None`. `line_number` is 1-based and only
/// used in errors.
pub fn parse_line(line: &str, line_number: usize, universe_size: u32) -> Result<Option<Ticket>> {
    let elements = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<Element>().map_err(|_| CoverError::Parse {
                line: line_number,
                message: format!("'{}' is not a non-negative integer", token),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if elements.is_empty() {
        return Ok(None);
    }
    Ticket::new(elements, universe_size)
        .map(Some)
        .map_err(|e| CoverError::Parse {
            line: line_number,
            message: e.to_string(),
        })
}

/// Reads every ticket from `reader`.
pub fn read_tickets<R: BufRead>(reader: R, universe_size: u32) -> Result<TicketCollection> {
    let mut tickets = TicketCollection::new();
    for (index, line) in reader.lines().enumerate() {
        if let Some(ticket) = parse_line(&line?, index + 1, universe_size)? {
            tickets.push(ticket);
        }
    }
    Ok(tickets)
}

/// Parses tickets from in-memory text.
pub fn parse_tickets(text: &str, universe_size: u32) -> Result<TicketCollection> {
    read_tickets(text.as_bytes(), universe_size)
}

/// Loads a ticket file.
///
/// # Errors
/// Returns an error if the file cannot be read or a line is malformed.
pub fn load_tickets(path: impl AsRef<Path>, universe_size: u32) -> Result<TicketCollection> {
    let path = path.as_ref();
    let file = File::open(path).context(format!("Failed to open {}", path.display()))?;
    read_tickets(BufReader::new(file), universe_size)
}

/// Writes `tickets` one per line, comma-separated.
pub fn write_tickets<W: Write>(mut writer: W, tickets: &TicketCollection) -> Result<()> {
    for ticket in tickets {
        writeln!(writer, "{}", ticket)?;
    }
    writer.flush()?;
    Ok(())
}

/// Saves `tickets` to `path`, replacing any existing file.
pub fn save_tickets(path: impl AsRef<Path>, tickets: &TicketCollection) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).context(format!("Failed to create {}", path.display()))?;
    write_tickets(BufWriter::new(file), tickets)
}
