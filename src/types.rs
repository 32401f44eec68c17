use crate::constants::SUMMARY_COLUMNS;

/// One municipality discovered on the index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MunicipalityRef {
    pub id: String,
    pub name: String,
    pub detail_url: String,
}

/// The three fixed per-municipality counters. `None` means the cell was absent or unreadable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MunicipalitySummary {
    pub eligible_voters: Option<u64>,
    pub envelopes_issued: Option<u64>,
    pub valid_votes: Option<u64>,
}

/// Party name -> vote count, in the order the parties first appear on the page.
///
/// The set of keys differs from page to page; it only becomes a fixed set of
/// columns once every record is reconciled into a [`ResultTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyVoteMap {
    entries: Vec<(String, u64)>,
}

impl PartyVoteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a party's count. An overwritten party keeps its original position.
    pub fn insert(&mut self, party: impl Into<String>, votes: u64) -> Option<u64> {
        let party = party.into();
        match self.entries.iter_mut().find(|(name, _)| *name == party) {
            Some((_, existing)) => Some(std::mem::replace(existing, votes)),
            None => {
                self.entries.push((party, votes));
                None
            }
        }
    }

    pub fn get(&self, party: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(name, _)| name == party)
            .map(|(_, votes)| *votes)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, votes)| (name.as_str(), *votes))
    }

    pub fn parties(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for PartyVoteMap {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut map = PartyVoteMap::new();
        for (party, votes) in iter {
            map.insert(party, votes);
        }
        map
    }
}

/// Everything scraped from one municipality detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPage {
    pub summary: MunicipalitySummary,
    pub parties: PartyVoteMap,
}

/// Unit produced per municipality
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MunicipalityRecord {
    pub reference: MunicipalityRef,
    pub summary: MunicipalitySummary,
    pub parties: PartyVoteMap,
}

impl MunicipalityRecord {
    pub fn new(reference: MunicipalityRef, page: DetailPage) -> Self {
        Self {
            reference,
            summary: page.summary,
            parties: page.parties,
        }
    }

    /// Record kept for a page that could not be parsed at all: null counters, no parties.
    pub fn degraded(reference: MunicipalityRef) -> Self {
        Self::new(reference, DetailPage::default())
    }
}

/// A single rendered cell of the result table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    Text(&'a str),
    Count(Option<u64>),
}

impl Cell<'_> {
    /// Output form: nulls become `0`, same as a party with no votes.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(text) => text.to_string(),
            Cell::Count(Some(n)) => n.to_string(),
            Cell::Count(None) => "0".to_string(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Cell::Count(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub id: String,
    pub name: String,
    pub eligible_voters: Option<u64>,
    pub envelopes_issued: Option<u64>,
    pub valid_votes: Option<u64>,
    /// One count per party column of the owning table, same order
    pub votes: Vec<u64>,
}

impl ResultRow {
    pub fn cells(&self) -> Vec<Cell<'_>> {
        let mut cells = vec![
            Cell::Text(&self.id),
            Cell::Text(&self.name),
            Cell::Count(self.eligible_voters),
            Cell::Count(self.envelopes_issued),
            Cell::Count(self.valid_votes),
        ];
        cells.extend(self.votes.iter().map(|v| Cell::Count(Some(*v))));
        cells
    }
}

/// Rectangular table: the fixed summary columns followed by one column per party
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    pub party_columns: Vec<String>,
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = SUMMARY_COLUMNS.to_vec();
        columns.extend(self.party_columns.iter().map(String::as_str));
        columns
    }

    pub fn column_count(&self) -> usize {
        SUMMARY_COLUMNS.len() + self.party_columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a party count by column name for the row with the given municipality id.
    pub fn party_votes(&self, id: &str, party: &str) -> Option<u64> {
        let column = self.party_columns.iter().position(|c| c == party)?;
        let row = self.rows.iter().find(|r| r.id == id)?;
        row.votes.get(column).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_map_keeps_first_position_on_overwrite() {
        let mut map = PartyVoteMap::new();
        map.insert("ODS", 10);
        map.insert("ANO", 20);
        assert_eq!(map.insert("ODS", 15), Some(10));

        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, vec![("ODS", 15), ("ANO", 20)]);
    }

    #[test]
    fn test_null_count_renders_as_zero() {
        assert_eq!(Cell::Count(None).render(), "0");
        assert_eq!(Cell::Count(Some(1234)).render(), "1234");
        assert_eq!(Cell::Text("Alojzov").render(), "Alojzov");
    }

    #[test]
    fn test_row_cells_follow_column_order() {
        let row = ResultRow {
            id: "506761".to_string(),
            name: "Alojzov".to_string(),
            eligible_voters: Some(205),
            envelopes_issued: None,
            valid_votes: Some(144),
            votes: vec![29, 0],
        };
        let rendered: Vec<String> = row.cells().iter().map(Cell::render).collect();
        assert_eq!(rendered, vec!["506761", "Alojzov", "205", "0", "144", "29", "0"]);
    }
}
