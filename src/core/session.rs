//! Authenticated session context.
//!
//! A `Session` is the explicit bundle of "who is acting" and "under which
//! shop settings" that every screen needs. Callers thread it (or the user
//! it carries) through the core operations instead of relying on any
//! ambient global state.

use crate::{
    config::seed::SettingsConfig,
    core::{audit, settings, users},
    entities::{AuditKind, View, shop_settings, user},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing::info;

/// One logged-in user plus the settings snapshot taken at login.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: user::Model,
    pub settings: shop_settings::Model,
}

impl Session {
    /// Authenticates `username`/`password` and opens a session. Logs the
    /// login to the audit trail.
    ///
    /// # Errors
    /// `Error::InvalidCredentials` on a failed login.
    pub async fn open(
        db: &DatabaseConnection,
        seed: &SettingsConfig,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        let user = users::authenticate(db, username, password).await?;
        let shop = settings::get_settings(db, seed).await?;
        audit::append(
            db,
            &user,
            "Logged in",
            format!("{} signed in", user.username),
            AuditKind::System,
        )
        .await?;
        info!(username = %user.username, role = ?user.role, "session opened");
        Ok(Self {
            user,
            settings: shop,
        })
    }

    /// Records the logout in the audit trail. The session value is consumed;
    /// there is no server-side state to tear down.
    pub async fn close(self, db: &DatabaseConnection) -> Result<()> {
        audit::append(
            db,
            &self.user,
            "Logged out",
            format!("{} signed out", self.user.username),
            AuditKind::System,
        )
        .await?;
        Ok(())
    }

    /// Whether this session's user may open the given screen.
    #[must_use]
    pub fn can_access(&self, view: View) -> bool {
        self.user.can_access(view)
    }

    /// Re-reads the settings row, e.g. after a save from the settings
    /// screen.
    pub async fn refresh_settings(
        &mut self,
        db: &DatabaseConnection,
        seed: &SettingsConfig,
    ) -> Result<()> {
        self.settings = settings::get_settings(db, seed).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_open_requires_valid_credentials() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_admin(&db).await?;
        let seed = SettingsConfig::default();

        let session = Session::open(&db, &seed, "admin", "123").await?;
        assert_eq!(session.user.username, "admin");
        assert_eq!(session.settings.currency, "EGP");

        let bad = Session::open(&db, &seed, "admin", "wrong").await;
        assert!(matches!(bad.unwrap_err(), Error::InvalidCredentials));
        Ok(())
    }

    #[tokio::test]
    async fn test_login_and_logout_are_audited() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_admin(&db).await?;
        let seed = SettingsConfig::default();

        let session = Session::open(&db, &seed, "admin", "123").await?;
        session.close(&db).await?;

        let entries = audit::list_recent(&db, None).await?;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "Logged out");
        assert_eq!(entries[1].action, "Logged in");
        assert_eq!(entries[0].kind, AuditKind::System);
        Ok(())
    }

    #[tokio::test]
    async fn test_permission_gate_follows_role() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_admin(&db).await?;
        create_test_technician(&db, 20.0).await?;
        let seed = SettingsConfig::default();

        let admin = Session::open(&db, &seed, "admin", "123").await?;
        assert!(admin.can_access(View::Settings));

        let tech = Session::open(&db, &seed, "tech", "123").await?;
        assert!(tech.can_access(View::Tickets));
        assert!(!tech.can_access(View::Finance));
        assert!(!tech.can_access(View::Settings));
        Ok(())
    }
}
