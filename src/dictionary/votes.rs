use std::collections::HashMap;

use crate::core::snarl::{LeafSnarl, SentinelIndex};
use crate::core::types::{OrientedNode, SnarlId};
use crate::parsing::gaf::AlignmentRecord;

/// How often each walk through each leaf snarl was seen in alignments
#[derive(Debug, Clone, Default)]
pub struct ReadPathVotes {
    votes: HashMap<SnarlId, HashMap<Vec<OrientedNode>, usize>>,
}

impl ReadPathVotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally the crossings of `leaves` found in `records`
    pub fn collect<'r>(
        leaves: &[LeafSnarl],
        records: impl IntoIterator<Item = &'r AlignmentRecord>,
    ) -> Self {
        let mut collector = VoteCollector::new(leaves);
        for record in records {
            collector.add_record(record);
        }
        collector.finish()
    }

    /// Record one vote for `walk` through `snarl`
    pub fn add(&mut self, snarl: SnarlId, walk: Vec<OrientedNode>) {
        *self.votes.entry(snarl).or_default().entry(walk).or_default() += 1;
    }

    /// Most frequent walk; ties go to the lexicographically least walk
    pub fn winner(&self, snarl: SnarlId) -> Option<&[OrientedNode]> {
        self.votes
            .get(&snarl)?
            .iter()
            .max_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then_with(|| b.cmp(a)))
            .map(|(walk, _)| walk.as_slice())
    }

    /// Number of snarls with at least one vote
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}

/// Streaming tally of snarl crossings, one alignment record at a time
pub struct VoteCollector<'a> {
    leaves: &'a [LeafSnarl],
    index: SentinelIndex,
    votes: ReadPathVotes,
}

impl<'a> VoteCollector<'a> {
    pub fn new(leaves: &'a [LeafSnarl]) -> Self {
        Self {
            leaves,
            index: SentinelIndex::new(leaves),
            votes: ReadPathVotes::new(),
        }
    }

    pub fn add_record(&mut self, record: &AlignmentRecord) {
        let walk = &record.traversed_path;
        for (at, node) in walk.iter().enumerate() {
            for &position in self.index.leaves_at(*node) {
                let leaf = &self.leaves[position];
                if let Some(crossing) = leaf.crossing_at(walk, at) {
                    self.votes.add(leaf.id, crossing);
                }
            }
        }
    }

    pub fn finish(self) -> ReadPathVotes {
        self.votes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fwd, gaf_line};

    fn leaves() -> Vec<LeafSnarl> {
        vec![
            LeafSnarl::new(SnarlId(1), OrientedNode::forward(1), OrientedNode::forward(5), [2, 3, 4]),
            LeafSnarl::new(SnarlId(2), OrientedNode::forward(5), OrientedNode::forward(9), [7, 8]),
        ]
    }

    fn record(read: &str, path: &str) -> AlignmentRecord {
        AlignmentRecord::from_gaf(&gaf_line(read, path, 20, None)).unwrap()
    }

    #[test]
    fn test_majority_walk_wins() {
        let records = vec![
            record("a", ">1>2>4>5>8>9"),
            record("b", "<9<8<5<4<2<1"),
            record("c", ">1>2>3>4>5>7>9"),
        ];
        let votes = ReadPathVotes::collect(&leaves(), &records);
        assert_eq!(votes.len(), 2);
        assert_eq!(votes.winner(SnarlId(1)), Some(fwd(&[1, 2, 4, 5]).as_slice()));
        assert_eq!(votes.winner(SnarlId(2)), Some(fwd(&[5, 8, 9]).as_slice()));
    }

    #[test]
    fn test_tie_goes_to_least_walk() {
        let mut votes = ReadPathVotes::new();
        votes.add(SnarlId(2), fwd(&[5, 8, 9]));
        votes.add(SnarlId(2), fwd(&[5, 7, 9]));
        assert_eq!(votes.winner(SnarlId(2)), Some(fwd(&[5, 7, 9]).as_slice()));
        assert_eq!(votes.winner(SnarlId(1)), None);
    }

    #[test]
    fn test_partial_crossings_ignored() {
        let records = vec![record("a", ">2>4>5>8"), record("b", ">1>2>4")];
        let votes = ReadPathVotes::collect(&leaves(), &records);
        assert!(votes.is_empty());
    }
}
