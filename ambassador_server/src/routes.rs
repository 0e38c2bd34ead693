//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g. I/O,
//! database operations, etc.) should be expressed as futures or asynchronous functions.
use actix_web::{get, web, HttpResponse, Responder};
use ambassador_engine::{
    cache::KeyValueCache,
    catalog_objects::ProductQuery,
    db_types::{NewProduct, NewUser, UserInfoUpdate},
    order_objects::CreateOrderRequest,
    AmbassadorApi,
    AmbassadorManagement,
    CatalogApi,
    CatalogManagement,
    OrderSettlementApi,
    PaymentSessionProvider,
    SettlementDatabase,
    UserApi,
    UserManagement,
};
use log::*;

use crate::{
    auth::AuthenticatedUser,
    data_objects::{ConfirmOrderRequest, JsonResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Checkout  ----------------------------------------------------
route!(create_order => Post "/checkout/orders" impl SettlementDatabase, PaymentSessionProvider, KeyValueCache);
/// Route handler for the checkout endpoint
///
/// Buyers arrive through an ambassador's referral link. The request carries the buyer's details, the referral `code`
/// and the products to buy. On success, the response holds the payment provider's checkout session: its `id`, and the
/// `url` of the hosted payment page that the buyer should be redirected to.
///
/// Nothing is stored if the link or any of the products do not exist, or if the payment provider fails.
pub async fn create_order<B, P, C>(
    body: web::Json<CreateOrderRequest>,
    api: web::Data<OrderSettlementApi<B, P, C>>,
) -> Result<HttpResponse, ServerError>
where
    B: SettlementDatabase,
    P: PaymentSessionProvider,
    C: KeyValueCache,
{
    let request = body.into_inner();
    debug!("💻️ POST checkout order for referral code '{}'", request.code);
    let session = api.create_order(request).await?;
    Ok(HttpResponse::Ok().json(session))
}

route!(confirm_order => Post "/checkout/orders/confirm" impl SettlementDatabase, PaymentSessionProvider, KeyValueCache);
/// Route handler for the payment confirmation endpoint
///
/// The storefront calls this once the payment provider has redirected the buyer back with `source`, the checkout
/// session id. The order is completed, the ambassador is credited and the notification emails are queued.
///
/// Confirming the same session twice is harmless. The second call reports `already_complete` and changes nothing.
pub async fn confirm_order<B, P, C>(
    body: web::Json<ConfirmOrderRequest>,
    api: web::Data<OrderSettlementApi<B, P, C>>,
) -> Result<HttpResponse, ServerError>
where
    B: SettlementDatabase,
    P: PaymentSessionProvider,
    C: KeyValueCache,
{
    let ConfirmOrderRequest { source } = body.into_inner();
    debug!("💻️ POST order confirmation for session '{source}'");
    let result = api.complete_order(&source).await?;
    Ok(HttpResponse::Ok().json(result))
}

route!(link => Get "/checkout/links/{code}" impl SettlementDatabase, PaymentSessionProvider, KeyValueCache);
/// The referral link and the products it promotes, for the storefront to render before checkout.
pub async fn link<B, P, C>(
    path: web::Path<String>,
    api: web::Data<OrderSettlementApi<B, P, C>>,
) -> Result<HttpResponse, ServerError>
where
    B: SettlementDatabase,
    P: PaymentSessionProvider,
    C: KeyValueCache,
{
    let code = path.into_inner();
    debug!("💻️ GET link '{code}'");
    let link = api.link(&code).await?;
    Ok(HttpResponse::Ok().json(link))
}

//----------------------------------------------   Admin  ----------------------------------------------------
route!(orders => Get "/admin/orders" impl SettlementDatabase, PaymentSessionProvider, KeyValueCache);
pub async fn orders<B, P, C>(api: web::Data<OrderSettlementApi<B, P, C>>) -> Result<HttpResponse, ServerError>
where
    B: SettlementDatabase,
    P: PaymentSessionProvider,
    C: KeyValueCache,
{
    debug!("💻️ GET orders");
    let orders = api.orders().await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(ambassadors => Get "/admin/ambassadors" impl AmbassadorManagement, KeyValueCache);
/// Route handler for the ambassador list
///
/// Every ambassador, with the sum of their share of all completed orders. The list is served from the cache and is
/// rebuilt after registrations, profile updates and order completions.
pub async fn ambassadors<B, C>(api: web::Data<AmbassadorApi<B, C>>) -> Result<HttpResponse, ServerError>
where
    B: AmbassadorManagement,
    C: KeyValueCache,
{
    debug!("💻️ GET ambassadors");
    let ambassadors = api.ambassadors_with_revenue().await?;
    Ok(HttpResponse::Ok().json(ambassadors))
}

route!(user_links => Get "/admin/users/{id}/links" impl AmbassadorManagement, KeyValueCache);
/// The user's referral links, each with the completed orders placed through it.
pub async fn user_links<B, C>(path: web::Path<i64>, api: web::Data<AmbassadorApi<B, C>>) -> Result<HttpResponse, ServerError>
where
    B: AmbassadorManagement,
    C: KeyValueCache,
{
    let user_id = path.into_inner();
    debug!("💻️ GET links for user {user_id}");
    let links = api.links_with_orders(user_id).await?;
    Ok(HttpResponse::Ok().json(links))
}

route!(create_product => Post "/admin/products" impl CatalogManagement, KeyValueCache);
pub async fn create_product<B, C>(
    body: web::Json<NewProduct>,
    api: web::Data<CatalogApi<B, C>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement,
    C: KeyValueCache,
{
    let product = body.into_inner();
    debug!("💻️ POST new product '{}'", product.title);
    let product = api.create_product(product).await?;
    Ok(HttpResponse::Created().json(product))
}

route!(update_product => Put "/admin/products/{id}" impl CatalogManagement, KeyValueCache);
pub async fn update_product<B, C>(
    path: web::Path<i64>,
    body: web::Json<NewProduct>,
    api: web::Data<CatalogApi<B, C>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement,
    C: KeyValueCache,
{
    let id = path.into_inner();
    debug!("💻️ PUT product {id}");
    let product = api.update_product(id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(delete_product => Delete "/admin/products/{id}" impl CatalogManagement, KeyValueCache);
pub async fn delete_product<B, C>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B, C>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement,
    C: KeyValueCache,
{
    let id = path.into_inner();
    debug!("💻️ DELETE product {id}");
    api.delete_product(id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Product {id} deleted"))))
}

//----------------------------------------------   Ambassador  ----------------------------------------------------
route!(products_frontend => Get "/ambassador/products/frontend" impl CatalogManagement, KeyValueCache);
pub async fn products_frontend<B, C>(api: web::Data<CatalogApi<B, C>>) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement,
    C: KeyValueCache,
{
    trace!("💻️ GET products_frontend");
    let products = api.products_frontend().await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(products_backend => Get "/ambassador/products/backend" impl CatalogManagement, KeyValueCache);
/// Route handler for the searchable product listing
///
/// Query parameters: `s` filters on title and description, `sort` is `asc` or `desc` by price, and `page` selects a
/// page of nine products. The response carries the page in `data` and the paging details in `meta`.
pub async fn products_backend<B, C>(
    query: web::Query<ProductQuery>,
    api: web::Data<CatalogApi<B, C>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement,
    C: KeyValueCache,
{
    let query = query.into_inner();
    trace!("💻️ GET products_backend {query:?}");
    let page = api.products_backend(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

route!(ambassador_user => Get "/ambassador/user" impl AmbassadorManagement, KeyValueCache);
/// The signed-in ambassador, with their revenue from completed orders.
pub async fn ambassador_user<B, C>(
    user: AuthenticatedUser,
    api: web::Data<AmbassadorApi<B, C>>,
) -> Result<HttpResponse, ServerError>
where
    B: AmbassadorManagement,
    C: KeyValueCache,
{
    debug!("💻️ GET ambassador profile for user {}", user.user_id);
    let profile = api.ambassador_profile(user.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

route!(stats => Get "/ambassador/stats" impl AmbassadorManagement, KeyValueCache);
pub async fn stats<B, C>(user: AuthenticatedUser, api: web::Data<AmbassadorApi<B, C>>) -> Result<HttpResponse, ServerError>
where
    B: AmbassadorManagement,
    C: KeyValueCache,
{
    debug!("💻️ GET link stats for user {}", user.user_id);
    let stats = api.link_stats(user.user_id).await?;
    Ok(HttpResponse::Ok().json(stats))
}

route!(rankings => Get "/ambassador/rankings" impl AmbassadorManagement, KeyValueCache);
/// The ambassador leaderboard, highest earner first.
pub async fn rankings<B, C>(api: web::Data<AmbassadorApi<B, C>>) -> Result<HttpResponse, ServerError>
where
    B: AmbassadorManagement,
    C: KeyValueCache,
{
    trace!("💻️ GET rankings");
    let rankings = api.rankings().await?;
    Ok(HttpResponse::Ok().json(rankings))
}

//----------------------------------------------   Users  ----------------------------------------------------
route!(register => Post "/register" impl UserManagement);
pub async fn register<B: UserManagement>(
    body: web::Json<NewUser>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user = body.into_inner();
    debug!("💻️ POST register {}", user.email);
    let user = api.register_user(user).await?;
    Ok(HttpResponse::Created().json(user))
}

route!(update_info => Put "/users/info" impl UserManagement);
/// Route handler for profile updates
///
/// Signed-in users can change their name and email address. Only the fields present in the body are changed.
pub async fn update_info<B: UserManagement>(
    user: AuthenticatedUser,
    body: web::Json<UserInfoUpdate>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ PUT user info for user {}", user.user_id);
    let updated = api.update_user_info(user.user_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}
