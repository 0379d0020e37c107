// ============================================================================
// HortiTech Core - Greenhouse Lifecycle Guard
// File: crates/hortitech-core/src/services/lifecycle_guard.rs
// Description: Decides whether a greenhouse may be created, change status,
//              or be deleted, before any write happens
// ============================================================================
//! The guard is stateless. Every check reads through a [`LifecycleView`], which
//! the service obtains from an open unit of work, so the decision and the write
//! that follows it see the same locked rows.
//!
//! Rules:
//! - creation is refused once the greenhouse count reaches the ceiling;
//! - moving to any status other than `active` requires zero active zones;
//! - moving to `active` is always allowed;
//! - re-applying the current status is always allowed;
//! - deletion requires status `inactive` and zero active zones.
//!
//! A missing greenhouse is reported as `GreenhouseNotFound` before any rule is
//! evaluated.

use tracing::{debug, warn};

use hortitech_shared::constants::MAX_GREENHOUSES;

use crate::domain::{GreenhouseId, GreenhouseStatus};
use crate::error::DomainError;
use crate::repositories::LifecycleView;

#[derive(Debug, Clone, Copy)]
pub struct LifecycleGuard {
    max_greenhouses: i64,
}

impl Default for LifecycleGuard {
    fn default() -> Self {
        Self::new(MAX_GREENHOUSES)
    }
}

impl LifecycleGuard {
    pub fn new(max_greenhouses: i64) -> Self {
        Self { max_greenhouses }
    }

    pub fn max_greenhouses(&self) -> i64 {
        self.max_greenhouses
    }

    /// Pure capacity rule over an already-known count.
    pub fn check_capacity(&self, total: i64) -> Result<(), DomainError> {
        if total >= self.max_greenhouses {
            warn!("Greenhouse creation refused: {} of {} already exist", total, self.max_greenhouses);
            return Err(DomainError::GreenhouseLimitExceeded { limit: self.max_greenhouses });
        }
        Ok(())
    }

    pub async fn can_create<V>(&self, view: &mut V) -> Result<(), DomainError>
    where
        V: LifecycleView + ?Sized,
    {
        let total = view.count_greenhouses().await?;
        self.check_capacity(total)
    }

    /// Returns the parsed target status when the transition is allowed.
    pub async fn can_transition<V>(
        &self,
        view: &mut V,
        id: GreenhouseId,
        target: &str,
    ) -> Result<GreenhouseStatus, DomainError>
    where
        V: LifecycleView + ?Sized,
    {
        let current = view
            .lock_status(id)
            .await?
            .ok_or(DomainError::GreenhouseNotFound(id))?;

        let target = GreenhouseStatus::from_str(target)
            .ok_or_else(|| DomainError::InvalidStatus(target.to_string()))?;

        // Re-applying the current status writes nothing the zones could conflict with
        if target == current {
            debug!("Greenhouse {} already {}", id, current);
            return Ok(target);
        }

        if !target.is_active() {
            let count = view.count_active_zones(id).await?;
            if count > 0 {
                warn!(
                    "Greenhouse {} cannot move {} -> {}: {} active zone(s)",
                    id, current, target, count
                );
                return Err(DomainError::ActiveZonesPresent { greenhouse_id: id, count });
            }
        }

        debug!("Greenhouse {} may move {} -> {}", id, current, target);
        Ok(target)
    }

    pub async fn can_delete<V>(&self, view: &mut V, id: GreenhouseId) -> Result<(), DomainError>
    where
        V: LifecycleView + ?Sized,
    {
        let current = view
            .lock_status(id)
            .await?
            .ok_or(DomainError::GreenhouseNotFound(id))?;

        if current != GreenhouseStatus::Inactive {
            warn!("Greenhouse {} cannot be deleted while {}", id, current);
            return Err(DomainError::GreenhouseNotInactive(current));
        }

        let count = view.count_active_zones(id).await?;
        if count > 0 {
            warn!("Greenhouse {} cannot be deleted: {} active zone(s)", id, count);
            return Err(DomainError::ActiveZonesPresent { greenhouse_id: id, count });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::error::ErrorKind;

    /// Fixed snapshot that records whether zones were queried.
    #[derive(Default)]
    struct Snapshot {
        total: i64,
        statuses: HashMap<GreenhouseId, GreenhouseStatus>,
        active_zones: HashMap<GreenhouseId, i64>,
        zone_queries: usize,
    }

    impl Snapshot {
        fn with(id: GreenhouseId, status: GreenhouseStatus, active_zones: i64) -> Self {
            let mut snapshot = Self { total: 1, ..Default::default() };
            snapshot.statuses.insert(id, status);
            snapshot.active_zones.insert(id, active_zones);
            snapshot
        }
    }

    #[async_trait]
    impl LifecycleView for Snapshot {
        async fn count_greenhouses(&mut self) -> Result<i64, DomainError> {
            Ok(self.total)
        }

        async fn lock_status(&mut self, id: GreenhouseId) -> Result<Option<GreenhouseStatus>, DomainError> {
            Ok(self.statuses.get(&id).copied())
        }

        async fn count_active_zones(&mut self, id: GreenhouseId) -> Result<i64, DomainError> {
            self.zone_queries += 1;
            Ok(self.active_zones.get(&id).copied().unwrap_or(0))
        }
    }

    fn kind<T>(result: Result<T, DomainError>) -> ErrorKind {
        match result {
            Ok(_) => panic!("expected a refusal"),
            Err(e) => e.kind(),
        }
    }

    #[tokio::test]
    async fn test_create_refused_at_and_above_limit() {
        let guard = LifecycleGuard::default();
        for total in [10, 11, 50] {
            let mut view = Snapshot { total, ..Default::default() };
            assert_eq!(kind(guard.can_create(&mut view).await), ErrorKind::LimitExceeded);
        }
    }

    #[tokio::test]
    async fn test_create_allowed_below_limit() {
        let guard = LifecycleGuard::default();
        for total in 0..10 {
            let mut view = Snapshot { total, ..Default::default() };
            assert!(guard.can_create(&mut view).await.is_ok(), "count {total} should pass");
        }
    }

    #[tokio::test]
    async fn test_leaving_active_with_active_zones_is_refused() {
        let guard = LifecycleGuard::default();
        for target in ["inactive", "maintenance"] {
            let mut view = Snapshot::with(5, GreenhouseStatus::Active, 2);
            let result = guard.can_transition(&mut view, 5, target).await;
            assert_eq!(kind(result), ErrorKind::ActiveZonesPresent);
        }
    }

    #[tokio::test]
    async fn test_leaving_active_without_active_zones_is_allowed() {
        let guard = LifecycleGuard::default();
        let mut view = Snapshot::with(5, GreenhouseStatus::Active, 0);

        let target = guard.can_transition(&mut view, 5, "maintenance").await.unwrap();
        assert_eq!(target, GreenhouseStatus::Maintenance);
    }

    #[tokio::test]
    async fn test_activation_never_checks_zones() {
        let guard = LifecycleGuard::default();
        for current in GreenhouseStatus::ALL {
            let mut view = Snapshot::with(3, current, 4);
            let target = guard.can_transition(&mut view, 3, "active").await.unwrap();
            assert_eq!(target, GreenhouseStatus::Active);
            assert_eq!(view.zone_queries, 0);
        }
    }

    #[tokio::test]
    async fn test_same_status_transition_never_checks_zones() {
        let guard = LifecycleGuard::default();
        for current in GreenhouseStatus::ALL {
            let mut view = Snapshot::with(4, current, 3);
            let target = guard.can_transition(&mut view, 4, current.as_str()).await.unwrap();
            assert_eq!(target, current);
            assert_eq!(view.zone_queries, 0);
        }
    }

    #[tokio::test]
    async fn test_unknown_target_status_is_invalid_state() {
        let guard = LifecycleGuard::default();
        let mut view = Snapshot::with(5, GreenhouseStatus::Active, 0);

        let result = guard.can_transition(&mut view, 5, "archived").await;
        assert_eq!(kind(result), ErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn test_delete_active_greenhouse_is_invalid_state() {
        let guard = LifecycleGuard::default();
        let mut view = Snapshot::with(7, GreenhouseStatus::Active, 0);

        assert_eq!(kind(guard.can_delete(&mut view, 7).await), ErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn test_delete_status_check_takes_precedence_over_zones() {
        let guard = LifecycleGuard::default();
        let mut view = Snapshot::with(7, GreenhouseStatus::Maintenance, 3);

        assert_eq!(kind(guard.can_delete(&mut view, 7).await), ErrorKind::InvalidState);
        assert_eq!(view.zone_queries, 0);
    }

    #[tokio::test]
    async fn test_delete_inactive_with_active_zones_is_refused() {
        let guard = LifecycleGuard::default();
        let mut view = Snapshot::with(7, GreenhouseStatus::Inactive, 1);

        assert_eq!(kind(guard.can_delete(&mut view, 7).await), ErrorKind::ActiveZonesPresent);
    }

    #[tokio::test]
    async fn test_delete_inactive_without_active_zones_is_allowed() {
        let guard = LifecycleGuard::default();
        let mut view = Snapshot::with(7, GreenhouseStatus::Inactive, 0);

        assert!(guard.can_delete(&mut view, 7).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_allowed_iff_inactive_and_no_active_zones() {
        let guard = LifecycleGuard::default();
        for status in GreenhouseStatus::ALL {
            for zones in [0, 1, 3] {
                let mut view = Snapshot::with(9, status, zones);
                let allowed = guard.can_delete(&mut view, 9).await.is_ok();
                assert_eq!(allowed, status == GreenhouseStatus::Inactive && zones == 0);
            }
        }
    }

    #[tokio::test]
    async fn test_unknown_greenhouse_is_not_found_before_any_rule() {
        let guard = LifecycleGuard::default();
        let mut view = Snapshot::default();

        assert_eq!(kind(guard.can_transition(&mut view, 999, "inactive").await), ErrorKind::NotFound);
        assert_eq!(kind(guard.can_transition(&mut view, 999, "bogus").await), ErrorKind::NotFound);
        assert_eq!(kind(guard.can_delete(&mut view, 999).await), ErrorKind::NotFound);
        assert_eq!(view.zone_queries, 0);
    }

    #[tokio::test]
    async fn test_custom_ceiling() {
        let guard = LifecycleGuard::new(2);
        assert!(guard.check_capacity(1).is_ok());
        assert!(guard.check_capacity(2).is_err());
        assert_eq!(guard.max_greenhouses(), 2);
    }
}
