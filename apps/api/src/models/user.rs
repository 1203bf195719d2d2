use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::entitlements::{effective_plan, is_admin_email, premium_flag, Subject};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub plan: String,
    pub is_premium: bool,
    pub plan_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// The borrowed view the entitlement library resolves against.
    pub fn as_subject(&self) -> Subject<'_> {
        Subject {
            email: &self.email,
            plan: Some(&self.plan),
            is_premium: self.is_premium,
        }
    }
}

/// The user shape returned to clients: password scrubbed, admin override
/// applied to `plan`/`isPremium` so the UI gates features correctly. The
/// override is response-only; the stored row is never mutated by it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub plan: String,
    pub is_premium: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Surfaced for debugging/UI purposes only; carries no extra privilege.
    pub is_admin: bool,
}

impl PublicUser {
    pub fn from_row(row: &UserRow, admin_email: Option<&str>) -> Self {
        let subject = row.as_subject();
        let is_admin = is_admin_email(admin_email, &row.email);
        Self {
            id: row.id,
            name: row.name.clone(),
            email: row.email.clone(),
            plan: effective_plan(admin_email, Some(&subject))
                .as_str()
                .to_string(),
            is_premium: premium_flag(admin_email, Some(&subject)),
            plan_expires_at: row.plan_expires_at,
            created_at: row.created_at,
            is_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(email: &str, plan: &str, is_premium: bool) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "x".to_string(),
            plan: plan.to_string(),
            is_premium,
            plan_expires_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_user_applies_admin_override() {
        let u = PublicUser::from_row(&row("admin@site.com", "free", false), Some("ADMIN@site.com"));
        assert_eq!(u.plan, "pro_monthly");
        assert!(u.is_premium);
        assert!(u.is_admin);
    }

    #[test]
    fn test_public_user_keeps_regular_fields() {
        let u = PublicUser::from_row(&row("user@x.com", "one_time", true), Some("admin@site.com"));
        assert_eq!(u.plan, "one_time");
        assert!(u.is_premium);
        assert!(!u.is_admin);
    }

    #[test]
    fn test_public_user_never_serializes_password() {
        let u = PublicUser::from_row(&row("user@x.com", "free", false), None);
        let json = serde_json::to_string(&u).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("isPremium"));
    }
}
