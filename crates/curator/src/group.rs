use crate::category::{classify_armed, classify_race, Armed, Race};
use crate::incident::Incident;

/// One cell of the race × armed-status cross-product.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub race: Race,
    pub armed: Armed,
    pub members: Vec<&'a Incident>,
}

impl Group<'_> {
    /// Returns the number of incidents in the cell.
    #[inline]
    pub fn n(&self) -> usize {
        self.members.len()
    }
}

#[inline]
fn cell(race: Race, armed: Armed) -> usize {
    race as usize * Armed::ALL.len() + armed as usize
}

/// Partitions `incidents` into all 16 cells of the cross-product.
///
/// Cells are created with races in the outer and armed statuses in
/// the inner loop, both in declaration order, and then sorted
/// ascending by size. The sort is stable, so equally sized cells keep
/// their cross-product order. Members keep the order of `incidents`.
pub fn group(incidents: &[Incident]) -> Vec<Group<'_>> {
    let mut groups: Vec<Group> = Race::ALL
        .into_iter()
        .flat_map(|race| {
            Armed::ALL.into_iter().map(move |armed| Group {
                race,
                armed,
                members: vec![],
            })
        })
        .collect();

    for incident in incidents {
        let race = classify_race(&incident.race);
        let armed = classify_armed(&incident.armed);
        groups[cell(race, armed)].members.push(incident);
    }

    groups.sort_by_key(Group::n);
    groups
}
