//! Hand scoring.
//!
//! Maps a private two-card hand plus the shared community cards onto a single
//! comparable score. Categories occupy non-overlapping integer bands so the
//! category dominates the tiebreak rank within it:
//!
//! | band    | category                           |
//! |---------|------------------------------------|
//! | 2-14    | high card                          |
//! | 20-34   | pair                               |
//! | 40-54   | two pair                           |
//! | 60-74   | three of a kind                    |
//! | 80-94   | straight                           |
//! | 100     | flush (flat, no high-card tiebreak)|
//! | 120-134 | full house                         |
//! | 140-154 | four of a kind                     |
//!
//! The checks run in a fixed order and a later match overwrites an earlier
//! one ("last matching rule wins"). Reordering them changes observable scores
//! on hands that satisfy several categories at once, so the order is part of
//! the scoring contract. Straight flushes and royal flushes are not detected,
//! and only ranks and suits held in the private hand can qualify a category.

use std::collections::BTreeMap;

use super::entities::{Card, Rank};

/// A comparable hand score. Only meaningful against other scores computed
/// from the same community cards in the same round.
pub type Score = u32;

#[must_use]
pub fn score_hand(hole: &[Card], community: &[Card]) -> Score {
    let pool: Vec<Card> = hole.iter().chain(community.iter()).copied().collect();
    let hole_ranks: Vec<Rank> = hole.iter().map(|card| card.0).collect();

    // High card, from the private hand alone.
    let mut score = Score::from(hole_ranks.iter().copied().max().unwrap_or(0));

    // Pair, two pair, three of a kind, full house, four of a kind: one pass
    // over the pool's rank counts in ascending rank order. Ranks the private
    // hand does not hold never qualify. The pair branch deliberately ignores
    // the trips counter, so a pair found above a three of a kind overwrites
    // it.
    let mut rank_counts: BTreeMap<Rank, usize> = BTreeMap::new();
    for card in &pool {
        *rank_counts.entry(card.0).or_default() += 1;
    }
    let mut pairs = 0;
    let mut trips = 0;
    for (&rank, &count) in &rank_counts {
        if !hole_ranks.contains(&rank) {
            continue;
        }
        match count {
            2 => {
                let base = if pairs == 0 { 20 } else { 40 };
                score = base + Score::from(rank);
                pairs += 1;
            }
            3 => {
                let base = if pairs == 0 && trips == 0 { 60 } else { 120 };
                score = base + Score::from(rank);
                trips += 1;
            }
            4 => score = 140 + Score::from(rank),
            _ => {}
        }
    }

    // Straight: slide a 5-card window over the sorted rank multiset.
    // Duplicates stay in (an adjacent gap of 0 or 1 keeps the run alive) and
    // the run must touch at least one private rank.
    let mut pool_ranks: Vec<Rank> = pool.iter().map(|card| card.0).collect();
    pool_ranks.sort_unstable();
    for window in pool_ranks.windows(5) {
        let connected = window.windows(2).all(|pair| pair[1] - pair[0] <= 1);
        let uses_hole = window.iter().any(|rank| hole_ranks.contains(rank));
        if connected && uses_hole {
            score = 80 + Score::from(window[4]);
        }
    }

    // Flush: five of a private suit anywhere in the pool, flat score.
    for card in hole {
        if pool.iter().filter(|other| other.1 == card.1).count() >= 5 {
            score = 100;
        }
    }

    score
}
