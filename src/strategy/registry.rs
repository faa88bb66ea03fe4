use core::{fmt, str::FromStr};

use crate::{
    face::Face,
    name::{Name, NameError},
    tables::{FibEntry, PendingRequest},
    timestamp::Timestamp,
};

use super::{
    selector::{FirstEligible, Flood, NextHopSelector, RandomCandidate},
    ForwardingStrategy, MulticastStrategy, Outcome, PickLatestOneStrategy, PickOneStrategy,
    StrategyActions, StrategyConfig,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StrategyNameError {
    #[error(transparent)]
    InvalidName(#[from] NameError),
    #[error("no strategy named {0}")]
    Unknown(Name),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrategyKind {
    Multicast,
    PickOne,
    PickLatestOne,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Multicast,
        StrategyKind::PickOne,
        StrategyKind::PickLatestOne,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Multicast => Flood::STRATEGY_NAME,
            StrategyKind::PickOne => RandomCandidate::STRATEGY_NAME,
            StrategyKind::PickLatestOne => FirstEligible::STRATEGY_NAME,
        }
    }

    // The name may carry one more component than the canonical one, the version
    pub fn from_name(name: &Name) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| {
            kind.name().parse::<Name>().is_ok_and(|canonical| {
                canonical.is_prefix_of(name)
                    && name.component_count() <= canonical.component_count() + 1
            })
        })
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name: Name = s.parse()?;
        Self::from_name(&name).ok_or(StrategyNameError::Unknown(name))
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// One of the strategies, chosen at runtime
#[derive(Clone, Debug)]
pub enum AnyStrategy {
    Multicast(MulticastStrategy),
    PickOne(PickOneStrategy),
    PickLatestOne(PickLatestOneStrategy),
}

impl AnyStrategy {
    pub fn new(kind: StrategyKind, config: StrategyConfig) -> Self {
        match kind {
            StrategyKind::Multicast => AnyStrategy::Multicast(MulticastStrategy::new(config)),
            StrategyKind::PickOne => AnyStrategy::PickOne(PickOneStrategy::new(config)),
            StrategyKind::PickLatestOne => {
                AnyStrategy::PickLatestOne(PickLatestOneStrategy::new(config))
            }
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            AnyStrategy::Multicast(_) => StrategyKind::Multicast,
            AnyStrategy::PickOne(_) => StrategyKind::PickOne,
            AnyStrategy::PickLatestOne(_) => StrategyKind::PickLatestOne,
        }
    }
}

impl ForwardingStrategy for AnyStrategy {
    fn name(&self) -> &'static str {
        self.kind().name()
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
        match self {
            AnyStrategy::Multicast(s) => {
                s.after_receive_request(in_face, fib_entry, sit_entry, pit_entry, now, actions)
            }
            AnyStrategy::PickOne(s) => {
                s.after_receive_request(in_face, fib_entry, sit_entry, pit_entry, now, actions)
            }
            AnyStrategy::PickLatestOne(s) => {
                s.after_receive_request(in_face, fib_entry, sit_entry, pit_entry, now, actions)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::{
        name::NameError,
        strategy::{ForwardingStrategy, StrategyConfig},
    };

    use super::{AnyStrategy, StrategyKind, StrategyNameError};

    #[test]
    fn test_from_name() {
        assert_eq!(
            "ndn:/localhost/nfd/strategy/multicast".parse(),
            Ok(StrategyKind::Multicast)
        );
        assert_eq!(
            "/localhost/nfd/strategy/pickone".parse(),
            Ok(StrategyKind::PickOne)
        );
        assert_eq!(
            "/localhost/nfd/strategy/picklatestone/%FD%01".parse(),
            Ok(StrategyKind::PickLatestOne)
        );

        assert!(matches!(
            "/localhost/nfd/strategy/best-route".parse::<StrategyKind>(),
            Err(StrategyNameError::Unknown(_))
        ));
        assert!(matches!(
            "/localhost/nfd/strategy/pickone/1/2".parse::<StrategyKind>(),
            Err(StrategyNameError::Unknown(_))
        ));
        assert_eq!(
            "/localhost/%zz".parse::<StrategyKind>(),
            Err(StrategyNameError::InvalidName(NameError::InvalidPercentEncoding))
        );
    }

    #[test]
    fn test_names_round_trip() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse(), Ok(kind));
            let strategy = AnyStrategy::new(kind, StrategyConfig::default());
            assert_eq!(strategy.kind(), kind);
            assert_eq!(strategy.name(), kind.name());
        }
    }
}
