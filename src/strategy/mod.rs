pub mod eligibility;
pub mod registry;
pub mod selector;

use alloc::vec::Vec;

use crate::{
    face::Face,
    tables::{FibEntry, PendingRequest},
    timestamp::Timestamp,
};

use eligibility::is_next_hop_eligible;
use selector::{FirstEligible, Flood, NextHopSelector, RandomCandidate};

pub use registry::{AnyStrategy, StrategyKind, StrategyNameError};

// What the forwarder does on behalf of a strategy
pub trait StrategyActions<P: PendingRequest> {
    fn send_request(&mut self, pit_entry: &mut P, face: &Face);

    fn reject_pending_request(&mut self, pit_entry: &mut P);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    // Number of times the request was sent
    Forwarded(usize),
    NoEligibleNextHop,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StrategyConfig {
    // Seed of the strategy's own random generator
    pub seed: u64,
    // Whether to reject the pending request when nothing was forwarded.
    // Off by default, the forwarder can act on `Outcome::NoEligibleNextHop` instead.
    pub reject_unforwarded: bool,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            seed: 5489,
            reject_unforwarded: false,
        }
    }
}

pub trait ForwardingStrategy {
    fn name(&self) -> &'static str;

    // Decides where a newly received request goes.
    // `fib_entry` is the longest prefix match in the base routing table,
    //  `sit_entry` the one in the search table, if any.
    fn after_receive_request<P, A>(
        &mut self,
        in_face: &Face,
        fib_entry: Option<&FibEntry>,
        sit_entry: Option<&FibEntry>,
        pit_entry: &mut P,
        now: Timestamp,
        actions: &mut A,
    ) -> Outcome
    where
        P: PendingRequest,
        A: StrategyActions<P>;
}

// Scoped search: follow a pinned path through the search table, or spend budget
//  searching through it, and in addition fall back to the cheapest base-table hop
//  while the path is unpinned and budget remains.
#[derive(Clone, Debug)]
pub struct SearchStrategy<S> {
    selector: S,
    config: StrategyConfig,
    candidates: Vec<Face>,
}

pub type MulticastStrategy = SearchStrategy<Flood>;
pub type PickOneStrategy = SearchStrategy<RandomCandidate>;
pub type PickLatestOneStrategy = SearchStrategy<FirstEligible>;

impl<S: NextHopSelector> SearchStrategy<S> {
    pub fn new(config: StrategyConfig) -> Self {
        Self {
            selector: S::with_seed(config.seed),
            config,
            candidates: Vec::new(),
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }
}

impl<S: NextHopSelector> Default for SearchStrategy<S> {
    fn default() -> Self {
        Self::new(StrategyConfig::default())
    }
}

impl<S: NextHopSelector> ForwardingStrategy for SearchStrategy<S> {
    fn name(&self) -> &'static str {
        S::STRATEGY_NAME
    }

    fn after_receive_request<P, A>(
        &mut self,
        in_face: &Face,
        fib_entry: Option<&FibEntry>,
        sit_entry: Option<&FibEntry>,
        pit_entry: &mut P,
        now: Timestamp,
        actions: &mut A,
    ) -> Outcome
    where
        P: PendingRequest,
        A: StrategyActions<P>,
    {
        tracing::debug!(
            strategy = S::STRATEGY_NAME,
            request = %pit_entry.name(),
            in_face = in_face.id.0,
            "after receive request"
        );

        let fib_hops = fib_entry.map(|e| e.next_hops()).unwrap_or(&[]);
        // Zero cost in the base table means nothing is known to be reachable
        let cost = fib_hops.first().map(|hop| hop.cost).unwrap_or(1);
        let mut forwarded = 0;

        match sit_entry {
            Some(sit_entry) if pit_entry.path_pin().is_pinned() => {
                // Budget is not spent on following a pinned path
                let face = self
                    .selector
                    .pick(sit_entry.next_hops(), &*pit_entry, in_face.id, now);
                if let Some(face) = face {
                    tracing::info!(
                        request = %pit_entry.name(),
                        face = face.id.0,
                        "forwarding along pinned path using search table"
                    );
                    actions.send_request(pit_entry, &face);
                    forwarded += 1;
                }
            }
            Some(sit_entry) if !pit_entry.search_budget().is_exhausted() && cost > 0 => {
                self.candidates.clear();
                self.selector.search(
                    sit_entry.next_hops(),
                    &*pit_entry,
                    in_face.id,
                    now,
                    pit_entry.search_budget().get(),
                    &mut self.candidates,
                );
                for face in self.candidates.drain(..) {
                    let remaining = pit_entry.search_budget_mut().consume();
                    tracing::info!(
                        request = %pit_entry.name(),
                        face = face.id.0,
                        remaining,
                        "searching using search table"
                    );
                    // The pin travels with this forward only
                    pit_entry.path_pin_mut().pin();
                    actions.send_request(pit_entry, &face);
                    pit_entry.path_pin_mut().clear();
                    forwarded += 1;
                    if remaining == 0 {
                        break;
                    }
                }
            }
            _ => {}
        }

        // Not exclusive with the search above
        if !pit_entry.path_pin().is_pinned() && !pit_entry.search_budget().is_exhausted() {
            let next_hop = fib_hops.iter().find(|hop| {
                is_next_hop_eligible(&*pit_entry, hop, in_face.id, false, Timestamp::MIN)
            });
            match next_hop {
                Some(next_hop) => {
                    let remaining = pit_entry.search_budget_mut().consume();
                    tracing::info!(
                        request = %pit_entry.name(),
                        face = next_hop.face.id.0,
                        remaining,
                        "forwarding using base table"
                    );
                    actions.send_request(pit_entry, &next_hop.face);
                    forwarded += 1;
                }
                None => {
                    tracing::info!(
                        request = %pit_entry.name(),
                        in_face = in_face.id.0,
                        "no eligible next hop in base table"
                    );
                }
            }
        }

        if forwarded > 0 {
            return Outcome::Forwarded(forwarded);
        }
        if self.config.reject_unforwarded {
            tracing::debug!(request = %pit_entry.name(), "rejecting pending request");
            actions.reject_pending_request(pit_entry);
        }
        Outcome::NoEligibleNextHop
    }
}
