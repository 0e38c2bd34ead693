use std::fmt::Debug;

use amb_common::Cents;
use log::*;

use crate::{
    amb_api::{
        errors::SettlementError,
        link_objects::LinkDetails,
        order_objects::{CompletionResult, CreateOrderRequest, OrderSummary},
        payment_objects::{CheckoutConfig, CheckoutSession, CheckoutSessionRequest, PaymentLineItem},
    },
    cache::{CacheInvalidator, KeyValueCache, AMBASSADORS_WITH_REVENUE_KEY, RANKINGS_KEY},
    db_types::{NewOrderItem, OrderWithItems, ReferralLink, User},
    events::{EventProducers, OrderCompletedEvent},
    revenue::split_revenue,
    traits::{OrderTransaction, PaymentSessionProvider, SettlementDatabase},
};

/// `OrderSettlementApi` drives the two phases of a referral order.
///
/// 1. [`Self::create_order`] stages the order and its items, and opens a hosted checkout session with the payment
///    provider. The order only becomes visible once the provider has accepted the session.
/// 2. [`Self::complete_order`] is called when the provider reports that the buyer has paid. It marks the order as
///    complete, credits the ambassador on the leaderboard and notifies the order-completed hook subscribers.
pub struct OrderSettlementApi<B, P, C> {
    db: B,
    provider: P,
    cache: C,
    invalidator: CacheInvalidator,
    producers: EventProducers,
    config: CheckoutConfig,
}

impl<B, P, C> Debug for OrderSettlementApi<B, P, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderSettlementApi ({} -> {})", self.config.success_url, self.config.cancel_url)
    }
}

impl<B, P, C> OrderSettlementApi<B, P, C> {
    pub fn new(db: B, provider: P, cache: C, invalidator: CacheInvalidator, producers: EventProducers) -> Self {
        Self { db, provider, cache, invalidator, producers, config: CheckoutConfig::default() }
    }

    pub fn with_checkout_config(mut self, config: CheckoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B, P, C> OrderSettlementApi<B, P, C>
where
    B: SettlementDatabase,
    P: PaymentSessionProvider,
    C: KeyValueCache,
{
    /// Creates a pending order for the buyer and a payment session for it.
    ///
    /// The order, its items and the session's transaction id are written in a single database transaction, which is
    /// only committed once the payment provider has created the session. If any product does not exist, or the
    /// provider fails, nothing is written.
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<CheckoutSession, SettlementError> {
        request.validate()?;
        let link = self
            .db
            .fetch_link_by_code(&request.code)
            .await?
            .ok_or_else(|| SettlementError::InvalidLink(request.code.clone()))?;
        let mut tx = self.db.begin_order_transaction().await?;
        match self.stage_order(&mut tx, &request, &link).await {
            Ok(session) => {
                tx.commit().await?;
                info!("🔄️ Checkout session {} created for referral code '{}'", session.id, link.code);
                Ok(session)
            },
            Err(e) => {
                debug!("🔄️ Could not create order for referral code '{}': {e}. Rolling back.", link.code);
                if let Err(rb) = tx.rollback().await {
                    warn!("🔄️ Rolling back the order transaction failed: {rb}");
                }
                Err(e)
            },
        }
    }

    async fn stage_order(
        &self,
        tx: &mut B::Transaction,
        request: &CreateOrderRequest,
        link: &ReferralLink,
    ) -> Result<CheckoutSession, SettlementError> {
        let order = tx.insert_order(request.new_order(link)).await?;
        let mut line_items = Vec::with_capacity(request.products.len());
        for requested in &request.products {
            let product = tx
                .fetch_product(requested.product_id)
                .await?
                .ok_or(SettlementError::InvalidProduct(requested.product_id))?;
            let quantity = u32::try_from(requested.quantity).map_err(|_| SettlementError::InvalidQuantity {
                product_id: requested.product_id,
                quantity: requested.quantity,
            })?;
            let split = split_revenue(product.price, quantity);
            let item = NewOrderItem {
                order_id: order.id,
                product_title: product.title.clone(),
                price: product.price,
                quantity: requested.quantity,
                ambassador_revenue: split.ambassador_revenue,
                admin_revenue: split.admin_revenue,
            };
            tx.insert_order_item(item).await?;
            let unit_amount =
                Cents::from_dollars(product.price).map_err(|e| SettlementError::ProviderError(e.to_string()))?;
            trace!(
                "🔄️ Order #{}: {} x '{}' at {unit_amount} staged (line total {})",
                order.id,
                quantity,
                product.title,
                split.line_total
            );
            line_items.push(PaymentLineItem {
                name: product.title,
                description: product.description,
                image: product.image,
                unit_amount,
                currency: self.config.currency.clone(),
                quantity: requested.quantity,
            });
        }
        let session_request = CheckoutSessionRequest {
            line_items,
            success_url: self.config.success_url.clone(),
            cancel_url: self.config.cancel_url.clone(),
        };
        let session = self
            .provider
            .create_checkout_session(session_request)
            .await
            .map_err(|e| SettlementError::ProviderError(e.to_string()))?;
        tx.assign_transaction_id(order.id, &session.id).await?;
        Ok(session)
    }

    /// Completes the order that the payment provider knows as `source`.
    ///
    /// Only the first call for an order has any effect. Subsequent calls return
    /// [`CompletionResult::AlreadyComplete`] and leave the leaderboard and notifications alone.
    ///
    /// Once the order row is marked complete there is no compensation: if the ambassador record cannot be found
    /// afterwards, the order stays complete and [`SettlementError::UserLookupFailed`] is returned.
    pub async fn complete_order(&self, source: &str) -> Result<CompletionResult, SettlementError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(SettlementError::MissingSource);
        }
        let mut order = self
            .db
            .fetch_order_by_transaction_id(source)
            .await?
            .ok_or_else(|| SettlementError::OrderNotFound(source.to_string()))?;
        let order_id = order.order.id;
        if !self.db.mark_order_complete(order_id).await? {
            warn!("🔄️ Order #{order_id} (session {source}) has already been completed. Ignoring the repeat request.");
            return Ok(CompletionResult::AlreadyComplete(order));
        }
        order.order.complete = true;
        self.invalidator.clear_cache([AMBASSADORS_WITH_REVENUE_KEY]);
        let ambassador_revenue = order.ambassador_revenue();
        let admin_revenue = order.admin_revenue();
        debug!("🔄️ Order #{order_id} is complete. Ambassador earns {ambassador_revenue:.2}, admin earns {admin_revenue:.2}");
        let user_id = order.order.user_id;
        let ambassador = self.db.fetch_user(user_id).await?.ok_or(SettlementError::UserLookupFailed(user_id))?;
        let name = ambassador.name();
        match self.cache.incr_score(RANKINGS_KEY, &name, ambassador_revenue).await {
            Ok(score) => debug!("🔄️ {name} now has a leaderboard score of {score:.2}"),
            Err(e) => warn!("🔄️ Could not update the leaderboard for {name}: {e}"),
        }
        self.call_order_completed_hook(&order, &ambassador);
        Ok(CompletionResult::Completed(order))
    }

    fn call_order_completed_hook(&self, order: &OrderWithItems, ambassador: &User) {
        for emitter in &self.producers.order_completed_producer {
            debug!("🔄️ Notifying order completed hook subscribers");
            let event = OrderCompletedEvent::new(order.clone(), ambassador.clone());
            emitter.publish_detached(event);
        }
    }

    /// The referral link `code` and the products it promotes.
    pub async fn link(&self, code: &str) -> Result<LinkDetails, SettlementError> {
        let link =
            self.db.fetch_link_by_code(code).await?.ok_or_else(|| SettlementError::InvalidLink(code.to_string()))?;
        let products = self.db.fetch_link_products(link.id).await?;
        Ok(LinkDetails { link, products })
    }

    /// Every order, with its items, buyer name and total.
    pub async fn orders(&self) -> Result<Vec<OrderSummary>, SettlementError> {
        let orders = self.db.fetch_orders_with_items().await?;
        Ok(orders.into_iter().map(OrderSummary::from).collect())
    }
}
