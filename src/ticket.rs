//! # Tickets
//!
//! A [`Ticket`] is a set of distinct universe elements stored as a sorted sequence. Tickets
//! produced by construction have exactly `m` elements; tickets shrunk by element-level
//! pruning may hold anywhere between `d` and `m`. A [`TicketCollection`] is an ordered
//! sequence of tickets whose order is acceptance order.

use std::collections::BTreeSet;
use std::fmt;

use crate::combinatorics::Element;
use crate::error::{CoverError, Result};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket {
    elements: Vec<Element>,
}

impl Ticket {
    /// Builds a ticket from elements in any order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTicket` if the ticket is empty, repeats an element, or holds a value
    /// outside `[1, universe_size]`. Nothing is coerced.
    pub fn new(mut elements: Vec<Element>, universe_size: u32) -> Result<Self> {
        if elements.is_empty() {
            return Err(CoverError::InvalidTicket("ticket is empty".to_string()));
        }
        elements.sort_unstable();
        if let Some(pair) = elements.windows(2).find(|w| w[0] == w[1]) {
            return Err(CoverError::InvalidTicket(format!(
                "element {} appears more than once",
                pair[0]
            )));
        }
        if let Some(&bad) = elements.iter().find(|&&e| e == 0 || e > universe_size) {
            return Err(CoverError::InvalidTicket(format!(
                "element {} is outside [1, {}]",
                bad, universe_size
            )));
        }
        Ok(Self { elements })
    }

    /// Wraps elements known to be sorted, distinct and in range.
    pub(crate) fn from_sorted(elements: Vec<Element>) -> Self {
        debug_assert!(elements.windows(2).all(|w| w[0] < w[1]));
        Self { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, element: Element) -> bool {
        self.elements.binary_search(&element).is_ok()
    }

    /// True when every element of `subset` is on this ticket.
    pub fn is_superset_of(&self, subset: &[Element]) -> bool {
        subset.iter().all(|&e| self.contains(e))
    }

    /// Checks the ticket has exactly `size` elements.
    pub fn expect_size(&self, size: usize) -> Result<()> {
        if self.len() != size {
            return Err(CoverError::InvalidTicket(format!(
                "ticket {} has {} elements, expected {}",
                self,
                self.len(),
                size
            )));
        }
        Ok(())
    }

    /// A copy of this ticket without the element at `position`.
    pub fn without_position(&self, position: usize) -> Ticket {
        let mut elements = self.elements.clone();
        elements.remove(position);
        Ticket { elements }
    }

    /// A copy with `removed` swapped for `added`; `added` must not already be present.
    pub(crate) fn with_replacement(&self, removed: Element, added: Element) -> Ticket {
        debug_assert!(self.contains(removed) && !self.contains(added));
        let mut elements: Vec<Element> = self
            .elements
            .iter()
            .copied()
            .filter(|&e| e != removed)
            .collect();
        let at = elements.partition_point(|&e| e < added);
        elements.insert(at, added);
        Ticket { elements }
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}

impl AsRef<[Element]> for Ticket {
    fn as_ref(&self) -> &[Element] {
        &self.elements
    }
}

/// Tickets in acceptance order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketCollection {
    tickets: Vec<Ticket>,
}

impl TicketCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ticket: Ticket) {
        self.tickets.push(ticket);
    }

    pub fn remove(&mut self, index: usize) -> Ticket {
        self.tickets.remove(index)
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub(crate) fn tickets_mut(&mut self) -> &mut [Ticket] {
        &mut self.tickets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ticket> {
        self.tickets.iter()
    }

    pub fn into_inner(self) -> Vec<Ticket> {
        self.tickets
    }

    /// The tickets as an unordered set, for comparisons that ignore acceptance order.
    pub fn as_set(&self) -> BTreeSet<&Ticket> {
        self.tickets.iter().collect()
    }

    /// The collection minus the ticket at `index`, leaving `self` untouched.
    pub fn without(&self, index: usize) -> TicketCollection {
        let mut tickets = self.tickets.clone();
        tickets.remove(index);
        TicketCollection { tickets }
    }
}

impl From<Vec<Ticket>> for TicketCollection {
    fn from(tickets: Vec<Ticket>) -> Self {
        Self { tickets }
    }
}

impl FromIterator<Ticket> for TicketCollection {
    fn from_iter<I: IntoIterator<Item = Ticket>>(iter: I) -> Self {
        Self {
            tickets: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TicketCollection {
    type Item = Ticket;
    type IntoIter = std::vec::IntoIter<Ticket>;

    fn into_iter(self) -> Self::IntoIter {
        self.tickets.into_iter()
    }
}

impl<'a> IntoIterator for &'a TicketCollection {
    type Item = &'a Ticket;
    type IntoIter = std::slice::Iter<'a, Ticket>;

    fn into_iter(self) -> Self::IntoIter {
        self.tickets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_is_sorted() {
        let ticket = Ticket::new(vec![9, 3, 7, 1], 10).unwrap();
        assert_eq!(ticket.elements(), &[1, 3, 7, 9]);
        assert_eq!(ticket.to_string(), "1,3,7,9");
        assert!(ticket.contains(7));
        assert!(!ticket.contains(8));
        assert!(ticket.is_superset_of(&[1, 9]));
        assert!(!ticket.is_superset_of(&[1, 2]));
    }

    #[test]
    fn test_ticket_rejects_bad_input() {
        assert!(matches!(Ticket::new(vec![], 10), Err(CoverError::InvalidTicket(_))));
        assert!(Ticket::new(vec![1, 2, 2], 10).is_err());
        assert!(Ticket::new(vec![0, 2, 3], 10).is_err());
        assert!(Ticket::new(vec![1, 2, 11], 10).is_err());
    }

    #[test]
    fn test_expect_size() {
        let ticket = Ticket::new(vec![1, 2, 3], 10).unwrap();
        assert!(ticket.expect_size(3).is_ok());
        assert!(ticket.expect_size(4).is_err());
    }

    #[test]
    fn test_replacement_keeps_order() {
        let ticket = Ticket::new(vec![2, 4, 6], 10).unwrap();
        let replaced = ticket.with_replacement(4, 9);
        assert_eq!(replaced.elements(), &[2, 6, 9]);
        let replaced = ticket.with_replacement(6, 1);
        assert_eq!(replaced.elements(), &[1, 2, 4]);
        assert_eq!(ticket.without_position(0).elements(), &[4, 6]);
    }

    #[test]
    fn test_collection_without() {
        let collection: TicketCollection = vec![
            Ticket::new(vec![1, 2], 5).unwrap(),
            Ticket::new(vec![3, 4], 5).unwrap(),
        ]
        .into();
        let reduced = collection.without(0);
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced.tickets()[0].elements(), &[3, 4]);
        assert_eq!(collection.len(), 2);
    }
}
