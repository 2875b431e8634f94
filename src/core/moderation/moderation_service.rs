// Warn service - core business logic for staff warnings.
//
// This service handles:
// - Staff role and target validation
// - Case id generation
// - Appending warnings and reading a user's history
//
// NO Discord dependencies here - just pure domain logic.

use super::moderation_models::{WarnRequest, Warning, WarningHistory, STAFF_ROLE_NAME};
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use thiserror::Error;

const CASE_ID_LEN: usize = 8;
const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum WarnError {
    #[error("You need the Staff role to do that.")]
    MissingStaffRole,

    #[error("Invalid target: {0}")]
    InvalidTarget(&'static str),

    #[error("A reason is required.")]
    EmptyReason,

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl WarnError {
    /// Validation failures are answered to the user; everything else is a
    /// real failure worth logging.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, WarnError::StorageError(_))
    }
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Append-only persistence for warnings.
#[async_trait]
pub trait WarningStore: Send + Sync {
    /// Append a warning after every record already stored.
    async fn append(&self, warning: Warning) -> Result<(), WarnError>;

    /// Every stored warning in append order.
    async fn load_all(&self) -> Result<Vec<Warning>, WarnError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct WarnService<S: WarningStore> {
    store: S,
}

impl<S: WarningStore> WarnService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate and record a warning. Nothing is written when validation fails.
    pub async fn warn(&self, request: WarnRequest) -> Result<Warning, WarnError> {
        if !is_staff(&request.staff_role_names) {
            return Err(WarnError::MissingStaffRole);
        }
        if request.target.is_bot {
            return Err(WarnError::InvalidTarget("bots cannot be warned"));
        }
        if !request.target.is_member {
            return Err(WarnError::InvalidTarget("user is not a member of this server"));
        }

        let reason = request.reason.trim();
        if reason.is_empty() {
            return Err(WarnError::EmptyReason);
        }

        let warning = Warning {
            case_id: generate_case_id(),
            guild_id: Some(request.guild_id),
            user_id: request.target.user_id,
            staff_id: request.staff_id,
            reason: reason.to_string(),
            timestamp: Utc::now(),
        };

        self.store.append(warning.clone()).await?;

        tracing::info!(
            case_id = %warning.case_id,
            guild_id = request.guild_id,
            user_id = warning.user_id,
            staff_id = warning.staff_id,
            "Warning issued"
        );

        Ok(warning)
    }

    /// Warnings for a user in a guild. Records without a guild id are
    /// included since they predate guild scoping.
    pub async fn history(
        &self,
        guild_id: u64,
        user_id: u64,
        staff_role_names: &[String],
    ) -> Result<WarningHistory, WarnError> {
        if !is_staff(staff_role_names) {
            return Err(WarnError::MissingStaffRole);
        }

        let warnings = self
            .store
            .load_all()
            .await?
            .into_iter()
            .filter(|w| w.user_id == user_id)
            .filter(|w| w.guild_id.map_or(true, |g| g == guild_id))
            .collect();

        Ok(WarningHistory { user_id, warnings })
    }
}

fn is_staff(role_names: &[String]) -> bool {
    role_names.iter().any(|name| name == STAFF_ROLE_NAME)
}

/// Random base-36 case id, e.g. `K3Z09QAD`.
pub fn generate_case_id() -> String {
    let mut rng = rand::thread_rng();
    (0..CASE_ID_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::moderation::WarnTarget;
    use std::sync::Mutex;

    /// In-memory store for testing
    #[derive(Default)]
    struct MockWarningStore {
        warnings: Mutex<Vec<Warning>>,
    }

    #[async_trait]
    impl WarningStore for MockWarningStore {
        async fn append(&self, warning: Warning) -> Result<(), WarnError> {
            self.warnings.lock().unwrap().push(warning);
            Ok(())
        }

        async fn load_all(&self) -> Result<Vec<Warning>, WarnError> {
            Ok(self.warnings.lock().unwrap().clone())
        }
    }

    fn staff_roles() -> Vec<String> {
        vec!["Member".to_string(), "Staff".to_string()]
    }

    fn request(roles: Vec<String>, is_bot: bool) -> WarnRequest {
        WarnRequest {
            guild_id: 456,
            staff_id: 1,
            staff_role_names: roles,
            target: WarnTarget {
                user_id: 123,
                is_bot,
                is_member: true,
            },
            reason: "  Spamming in general  ".to_string(),
        }
    }

    #[tokio::test]
    async fn staff_can_warn_member() {
        let service = WarnService::new(MockWarningStore::default());

        let warning = service.warn(request(staff_roles(), false)).await.unwrap();

        assert_eq!(warning.user_id, 123);
        assert_eq!(warning.staff_id, 1);
        assert_eq!(warning.guild_id, Some(456));
        assert_eq!(warning.reason, "Spamming in general");
        assert_eq!(warning.case_id.len(), CASE_ID_LEN);
        assert_eq!(service.store.load_all().await.unwrap(), vec![warning]);
    }

    #[tokio::test]
    async fn missing_staff_role_writes_nothing() {
        let service = WarnService::new(MockWarningStore::default());

        // Role names are compared literally
        for roles in [vec![], vec!["staff".to_string()], vec!["Staff ".to_string()]] {
            let result = service.warn(request(roles, false)).await;
            assert!(matches!(result, Err(WarnError::MissingStaffRole)));
        }
        assert!(service.store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bot_target_writes_nothing() {
        let service = WarnService::new(MockWarningStore::default());

        let result = service.warn(request(staff_roles(), true)).await;

        assert!(matches!(result, Err(WarnError::InvalidTarget(_))));
        assert!(service.store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_member_target_is_rejected() {
        let service = WarnService::new(MockWarningStore::default());
        let mut req = request(staff_roles(), false);
        req.target.is_member = false;

        assert!(matches!(
            service.warn(req).await,
            Err(WarnError::InvalidTarget(_))
        ));
    }

    #[tokio::test]
    async fn blank_reason_is_rejected() {
        let service = WarnService::new(MockWarningStore::default());
        let mut req = request(staff_roles(), false);
        req.reason = "   ".to_string();

        assert!(matches!(service.warn(req).await, Err(WarnError::EmptyReason)));
    }

    #[tokio::test]
    async fn history_filters_by_user_and_guild() {
        let service = WarnService::new(MockWarningStore::default());
        service.warn(request(staff_roles(), false)).await.unwrap();
        service.warn(request(staff_roles(), false)).await.unwrap();

        let mut other_guild = request(staff_roles(), false);
        other_guild.guild_id = 999;
        service.warn(other_guild).await.unwrap();

        let mut other_user = request(staff_roles(), false);
        other_user.target.user_id = 777;
        service.warn(other_user).await.unwrap();

        let history = service.history(456, 123, &staff_roles()).await.unwrap();
        assert_eq!(history.count(), 2);
        assert!(history.warnings.iter().all(|w| w.user_id == 123));

        assert!(matches!(
            service.history(456, 123, &[]).await,
            Err(WarnError::MissingStaffRole)
        ));
    }

    #[test]
    fn case_ids_are_base36() {
        for _ in 0..100 {
            let id = generate_case_id();
            assert_eq!(id.len(), CASE_ID_LEN);
            assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }
}
