//! Premium Service
//!
//! Plan catalogue and subscription bookkeeping on the user record.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PremiumSettings;
use crate::domain::{User, UserRepository};
use crate::shared::error::AppError;

/// Subscription plans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Monthly,
    Yearly,
}

impl Plan {
    pub const ALL: [Plan; 2] = [Plan::Monthly, Plan::Yearly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Monthly => "monthly",
            Plan::Yearly => "yearly",
        }
    }

    /// Plan length in days under `settings`
    pub fn days(&self, settings: &PremiumSettings) -> i64 {
        match self {
            Plan::Monthly => settings.monthly_days,
            Plan::Yearly => settings.yearly_days,
        }
    }
}

/// A plan as offered to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanOffer {
    pub plan: Plan,
    pub days: i64,
}

/// Premium state of a user at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PremiumStatus {
    pub premium: bool,
    pub premium_until: Option<DateTime<Utc>>,
}

impl PremiumStatus {
    pub fn of(user: &User, now: DateTime<Utc>) -> Self {
        Self {
            premium: user.is_premium_at(now),
            premium_until: user.premium_until,
        }
    }
}

/// Premium service trait
#[async_trait]
pub trait PremiumService: Send + Sync {
    /// Configured plans
    fn plans(&self) -> Vec<PlanOffer>;

    /// Extend the subscription by one plan period
    async fn subscribe(&self, user_id: i64, plan: Plan) -> Result<User, PremiumError>;

    /// End the subscription immediately
    async fn cancel(&self, user_id: i64) -> Result<User, PremiumError>;
}

/// Premium service errors
#[derive(Debug, thiserror::Error)]
pub enum PremiumError {
    #[error("No user found with that ID")]
    UserNotFound,

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<PremiumError> for AppError {
    fn from(err: PremiumError) -> Self {
        match err {
            PremiumError::UserNotFound => AppError::NotFound(err.to_string()),
            PremiumError::Store(inner) => inner,
        }
    }
}

/// New expiry after buying `days` at `now`; unexpired time carries over.
pub fn extended_until(
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    days: i64,
) -> DateTime<Utc> {
    let start = current.filter(|until| *until > now).unwrap_or(now);
    start + Duration::days(days)
}

/// PremiumService implementation
pub struct PremiumServiceImpl<U: UserRepository + ?Sized> {
    users: Arc<U>,
    settings: PremiumSettings,
}

impl<U: UserRepository + ?Sized> PremiumServiceImpl<U> {
    pub fn new(users: Arc<U>, settings: PremiumSettings) -> Self {
        Self { users, settings }
    }

    async fn active_user(&self, user_id: i64) -> Result<User, PremiumError> {
        self.users
            .find_by_id(user_id)
            .await?
            .filter(|user| user.active)
            .ok_or(PremiumError::UserNotFound)
    }
}

#[async_trait]
impl<U: UserRepository + ?Sized> PremiumService for PremiumServiceImpl<U> {
    fn plans(&self) -> Vec<PlanOffer> {
        Plan::ALL
            .iter()
            .map(|plan| PlanOffer {
                plan: *plan,
                days: plan.days(&self.settings),
            })
            .collect()
    }

    async fn subscribe(&self, user_id: i64, plan: Plan) -> Result<User, PremiumError> {
        let mut user = self.active_user(user_id).await?;
        let until = extended_until(user.premium_until, Utc::now(), plan.days(&self.settings));
        user.premium_until = Some(until);

        let updated = self.users.update(&user).await?;
        tracing::info!(user_id, plan = plan.as_str(), %until, "Premium subscription extended");
        Ok(updated)
    }

    async fn cancel(&self, user_id: i64) -> Result<User, PremiumError> {
        let mut user = self.active_user(user_id).await?;
        user.premium_until = None;

        let updated = self.users.update(&user).await?;
        tracing::info!(user_id, "Premium subscription cancelled");
        Ok(updated)
    }
}
