//! Per-state decision strategies.
//!
//! Each strategy is a pure function of the cycle's probe results that returns
//! either "keep the current route" or the desired ordering of links. Ranking,
//! tie-breaking and issuing commands happen in the engine.

use crate::connection::{ConnectionHealthyResult, ConnectionState};

/// Probe results of one cycle, by slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleChecks {
    pub primary: ConnectionHealthyResult,
    pub backup: ConnectionHealthyResult,
    /// `None` when no fallback link is configured.
    pub fallback: Option<ConnectionHealthyResult>,
}

impl CycleChecks {
    pub fn iter(&self) -> impl Iterator<Item = &ConnectionHealthyResult> {
        [Some(&self.primary), Some(&self.backup), self.fallback.as_ref()]
            .into_iter()
            .flatten()
    }

    /// Every configured link reported unhealthy.
    pub fn all_down(&self) -> bool {
        self.iter().all(|check| !check.healthy)
    }

    fn fallback_healthy(&self) -> bool {
        self.fallback.map_or(false, |f| f.healthy)
    }

    fn any_standby_healthy(&self) -> bool {
        self.backup.healthy || self.fallback_healthy()
    }

    /// [primary, backup, fallback]
    fn primary_first(&self) -> Vec<Option<ConnectionHealthyResult>> {
        vec![Some(self.primary), Some(self.backup), self.fallback]
    }

    /// [backup, fallback, primary]
    fn standby_first(&self) -> Vec<Option<ConnectionHealthyResult>> {
        vec![Some(self.backup), self.fallback, Some(self.primary)]
    }
}

/// Why the engine wants to move the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchReason {
    /// First decision after startup (or after a revert to NONE).
    Initial,
    PrimaryDown,
    PrimaryRestored,
    BackupDown,
    FallbackDown,
}

/// Why the engine leaves the route alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepReason {
    PrimaryHealthy,
    /// Primary still down, the active standby still up.
    StandbyStillActive(ConnectionState),
    NoHealthyCandidate,
}

/// Outcome of a strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Keep(KeepReason),
    Switch {
        order: Vec<Option<ConnectionHealthyResult>>,
        reason: SwitchReason,
    },
}

/// Dispatch to the strategy of the current state.
pub fn plan(current: ConnectionState, checks: &CycleChecks) -> Plan {
    match current {
        ConnectionState::None => from_none(checks),
        ConnectionState::Primary => from_primary(checks),
        ConnectionState::Backup => from_backup(checks),
        ConnectionState::Fallback => from_fallback(checks),
    }
}

pub fn from_none(checks: &CycleChecks) -> Plan {
    if checks.primary.healthy {
        return Plan::Switch {
            order: checks.primary_first(),
            reason: SwitchReason::Initial,
        };
    }
    if checks.any_standby_healthy() {
        return Plan::Switch {
            order: checks.standby_first(),
            reason: SwitchReason::Initial,
        };
    }
    Plan::Keep(KeepReason::NoHealthyCandidate)
}

pub fn from_primary(checks: &CycleChecks) -> Plan {
    if checks.primary.healthy {
        return Plan::Keep(KeepReason::PrimaryHealthy);
    }
    if checks.any_standby_healthy() {
        return Plan::Switch {
            order: checks.standby_first(),
            reason: SwitchReason::PrimaryDown,
        };
    }
    Plan::Keep(KeepReason::NoHealthyCandidate)
}

pub fn from_backup(checks: &CycleChecks) -> Plan {
    if checks.primary.healthy {
        return Plan::Switch {
            order: checks.primary_first(),
            reason: SwitchReason::PrimaryRestored,
        };
    }
    if !checks.backup.healthy && checks.fallback_healthy() {
        return Plan::Switch {
            order: vec![checks.fallback, Some(checks.backup), Some(checks.primary)],
            reason: SwitchReason::BackupDown,
        };
    }
    Plan::Keep(KeepReason::StandbyStillActive(ConnectionState::Backup))
}

pub fn from_fallback(checks: &CycleChecks) -> Plan {
    if checks.primary.healthy {
        return Plan::Switch {
            order: checks.primary_first(),
            reason: SwitchReason::PrimaryRestored,
        };
    }
    if !checks.fallback_healthy() && checks.backup.healthy {
        return Plan::Switch {
            order: vec![Some(checks.backup), Some(checks.primary), checks.fallback],
            reason: SwitchReason::FallbackDown,
        };
    }
    Plan::Keep(KeepReason::StandbyStillActive(ConnectionState::Fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionType;
    use std::time::Duration;

    fn check(connection_type: ConnectionType, healthy: bool) -> ConnectionHealthyResult {
        ConnectionHealthyResult::new(connection_type, healthy, Duration::from_millis(10))
    }

    fn checks(primary: bool, backup: bool, fallback: Option<bool>) -> CycleChecks {
        CycleChecks {
            primary: check(ConnectionType::Primary, primary),
            backup: check(ConnectionType::Backup, backup),
            fallback: fallback.map(|h| check(ConnectionType::Fallback, h)),
        }
    }

    fn order_of(plan: &Plan) -> Vec<Option<ConnectionType>> {
        match plan {
            Plan::Switch { order, .. } => order.iter().map(|r| r.map(|r| r.connection_type)).collect(),
            Plan::Keep(reason) => panic!("expected a switch, got keep ({:?})", reason),
        }
    }

    use ConnectionType::{Backup as B, Fallback as F, Primary as P};

    #[test]
    fn test_all_down() {
        assert!(checks(false, false, None).all_down());
        assert!(checks(false, false, Some(false)).all_down());
        assert!(!checks(false, false, Some(true)).all_down());
        assert!(!checks(true, false, None).all_down());
    }

    #[test]
    fn test_from_none() {
        let plan = from_none(&checks(true, true, Some(true)));
        assert_eq!(order_of(&plan), vec![Some(P), Some(B), Some(F)]);

        let plan = from_none(&checks(false, true, None));
        assert_eq!(order_of(&plan), vec![Some(B), None, Some(P)]);

        assert_eq!(
            from_none(&checks(false, false, Some(false))),
            Plan::Keep(KeepReason::NoHealthyCandidate)
        );
    }

    #[test]
    fn test_from_primary() {
        assert_eq!(
            from_primary(&checks(true, false, None)),
            Plan::Keep(KeepReason::PrimaryHealthy)
        );

        let plan = from_primary(&checks(false, false, Some(true)));
        assert_eq!(order_of(&plan), vec![Some(B), Some(F), Some(P)]);
        assert!(matches!(plan, Plan::Switch { reason: SwitchReason::PrimaryDown, .. }));
    }

    #[test]
    fn test_from_backup() {
        let plan = from_backup(&checks(true, true, Some(true)));
        assert_eq!(order_of(&plan), vec![Some(P), Some(B), Some(F)]);
        assert!(matches!(plan, Plan::Switch { reason: SwitchReason::PrimaryRestored, .. }));

        let plan = from_backup(&checks(false, false, Some(true)));
        assert_eq!(order_of(&plan), vec![Some(F), Some(B), Some(P)]);
        assert!(matches!(plan, Plan::Switch { reason: SwitchReason::BackupDown, .. }));

        assert_eq!(
            from_backup(&checks(false, true, Some(true))),
            Plan::Keep(KeepReason::StandbyStillActive(ConnectionState::Backup))
        );
    }

    #[test]
    fn test_from_fallback() {
        let plan = from_fallback(&checks(true, false, Some(false)));
        assert_eq!(order_of(&plan), vec![Some(P), Some(B), Some(F)]);

        let plan = from_fallback(&checks(false, true, Some(false)));
        assert_eq!(order_of(&plan), vec![Some(B), Some(P), Some(F)]);
        assert!(matches!(plan, Plan::Switch { reason: SwitchReason::FallbackDown, .. }));

        // fallback slot removed by a reload while FALLBACK was active
        let plan = from_fallback(&checks(false, true, None));
        assert_eq!(order_of(&plan), vec![Some(B), Some(P), None]);

        assert_eq!(
            from_fallback(&checks(false, true, Some(true))),
            Plan::Keep(KeepReason::StandbyStillActive(ConnectionState::Fallback))
        );
    }

    #[test]
    fn test_dispatch_follows_state() {
        let c = checks(true, true, None);
        assert!(matches!(plan(ConnectionState::None, &c), Plan::Switch { reason: SwitchReason::Initial, .. }));
        assert_eq!(plan(ConnectionState::Primary, &c), Plan::Keep(KeepReason::PrimaryHealthy));
        assert!(matches!(plan(ConnectionState::Backup, &c), Plan::Switch { reason: SwitchReason::PrimaryRestored, .. }));
        assert!(matches!(plan(ConnectionState::Fallback, &c), Plan::Switch { reason: SwitchReason::PrimaryRestored, .. }));
    }
}
