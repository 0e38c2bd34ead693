use std::fmt::Debug;

use log::*;

use crate::{
    amb_api::{
        errors::AmbassadorApiError,
        link_objects::{group_orders_by_link, LinkStats, LinkWithOrders},
    },
    cache::{KeyValueCache, AMBASSADORS_WITH_REVENUE_KEY, RANKINGS_KEY, SNAPSHOT_TTL},
    revenue::{aggregate_ambassador_revenue, ambassador_revenue, AmbassadorRevenue},
    traits::AmbassadorManagement,
};

/// A single leaderboard position.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Ranking {
    pub name: String,
    pub revenue: f64,
}

/// `AmbassadorApi` serves the ambassador revenue views.
///
/// The revenue list is expensive to compute, so it is cached as a snapshot under [`AMBASSADORS_WITH_REVENUE_KEY`]
/// and rebuilt on a miss. Writers never touch the snapshot directly; they queue it for invalidation instead.
pub struct AmbassadorApi<B, C> {
    db: B,
    cache: C,
}

impl<B, C> Debug for AmbassadorApi<B, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AmbassadorApi")
    }
}

impl<B, C> AmbassadorApi<B, C> {
    pub fn new(db: B, cache: C) -> Self {
        Self { db, cache }
    }
}

impl<B, C> AmbassadorApi<B, C>
where
    B: AmbassadorManagement,
    C: KeyValueCache,
{
    /// All ambassadors with the revenue they have earned from completed orders.
    ///
    /// Cache failures never fail the request. An unreadable or corrupt snapshot is treated as a miss, and a failure
    /// to store the fresh snapshot is only logged.
    pub async fn ambassadors_with_revenue(&self) -> Result<Vec<AmbassadorRevenue>, AmbassadorApiError> {
        match self.cache.get(AMBASSADORS_WITH_REVENUE_KEY).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<AmbassadorRevenue>>(&bytes) {
                Ok(snapshot) => {
                    trace!("🧹️ Serving ambassador revenue from the cache");
                    return Ok(snapshot);
                },
                Err(e) => warn!("🧹️ Cached ambassador revenue snapshot is corrupt. Rebuilding it. {e}"),
            },
            Ok(None) => trace!("🧹️ Ambassador revenue cache miss"),
            Err(e) => warn!("🧹️ Could not read the ambassador revenue cache. Rebuilding it. {e}"),
        }
        let ambassadors = self.db.fetch_ambassadors().await?;
        let orders = self.db.fetch_completed_ambassador_orders().await?;
        let result = aggregate_ambassador_revenue(ambassadors, orders);
        match serde_json::to_vec(&result) {
            Ok(bytes) => {
                if let Err(e) = self.cache.set(AMBASSADORS_WITH_REVENUE_KEY, bytes, SNAPSHOT_TTL).await {
                    warn!("🧹️ Could not store the ambassador revenue snapshot. {e}");
                }
            },
            Err(e) => warn!("🧹️ Could not serialize the ambassador revenue snapshot. {e}"),
        }
        Ok(result)
    }

    /// The ambassador's own record with their earnings to date. These are read from the database, never the cache.
    pub async fn ambassador_profile(&self, user_id: i64) -> Result<AmbassadorRevenue, AmbassadorApiError> {
        let user = self.db.fetch_ambassador(user_id).await?.ok_or(AmbassadorApiError::AmbassadorNotFound(user_id))?;
        let orders = self.db.fetch_completed_orders_for_user(user_id).await?;
        let revenue = ambassador_revenue(&orders);
        Ok(AmbassadorRevenue { user, revenue })
    }

    /// Every referral link owned by `user_id`, with the completed orders placed through it.
    pub async fn links_with_orders(&self, user_id: i64) -> Result<Vec<LinkWithOrders>, AmbassadorApiError> {
        let links = self.db.fetch_links_for_user(user_id).await?;
        if links.is_empty() {
            return Ok(vec![]);
        }
        let orders = self.db.fetch_completed_orders_for_user(user_id).await?;
        Ok(group_orders_by_link(links, orders))
    }

    /// Order count and sales for each of the ambassador's referral links.
    pub async fn link_stats(&self, user_id: i64) -> Result<Vec<LinkStats>, AmbassadorApiError> {
        let links = self.links_with_orders(user_id).await?;
        Ok(links.iter().map(LinkStats::from).collect())
    }

    /// The ambassador leaderboard, highest revenue first.
    pub async fn rankings(&self) -> Result<Vec<Ranking>, AmbassadorApiError> {
        let scores = self
            .cache
            .scores_desc(RANKINGS_KEY)
            .await
            .map_err(|e| AmbassadorApiError::CacheError(e.to_string()))?;
        Ok(scores.into_iter().map(|(name, revenue)| Ranking { name, revenue }).collect())
    }
}
