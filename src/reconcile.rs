use std::collections::{BTreeSet, HashMap};

use crate::types::{MunicipalityRecord, ResultRow, ResultTable};

/// Merge per-municipality records into one rectangular table.
///
/// Party columns are the sorted union of every party seen in any record. A
/// party missing from a municipality's page is filled with `0` (no votes
/// there), while unknown summary counters stay `None`. Row order follows the
/// input order.
pub fn reconcile(records: &[MunicipalityRecord]) -> ResultTable {
    let party_columns: Vec<String> = records
        .iter()
        .flat_map(|record| record.parties.parties())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let positions: HashMap<&str, usize> = party_columns
        .iter()
        .enumerate()
        .map(|(i, party)| (party.as_str(), i))
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            let mut votes = vec![0; party_columns.len()];
            for (party, count) in record.parties.iter() {
                if let Some(&i) = positions.get(party) {
                    votes[i] = count;
                }
            }
            ResultRow {
                id: record.reference.id.clone(),
                name: record.reference.name.clone(),
                eligible_voters: record.summary.eligible_voters,
                envelopes_issued: record.summary.envelopes_issued,
                valid_votes: record.summary.valid_votes,
                votes,
            }
        })
        .collect();

    ResultTable {
        party_columns,
        rows,
    }
}
