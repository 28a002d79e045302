//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g. I/O,
//! database operations, etc.) should be expressed as futures or asynchronous functions. Async handlers get executed
//! concurrently by worker threads and thus don't block execution.
use std::str::FromStr;

use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use tabletab_engine::{
    db_types::{ItemStatusType, ItemStatusUpdate, MenuItemUpdate, NewMenuItem, OrderStatusType},
    order_objects::OrderQueryFilter,
    MenuApi,
    MenuManagement,
    OrderFlowApi,
    OrderFlowDatabase,
    OrderQueries,
    OrderQueryApi,
};

use crate::{
    data_objects::{ItemStatusParams, JsonResponse, OrderListQuery, OrderSubmissionRequest},
    errors::ServerError,
    push::{sse_stream, OrderBroadcast},
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

//----------------------------------------------    Menu   ----------------------------------------------------
route!(menu_items => Get "/menu" impl MenuManagement);
pub async fn menu_items<B: MenuManagement>(api: web::Data<MenuApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET menu");
    let items = api.fetch_menu_items().await?;
    Ok(HttpResponse::Ok().json(items))
}

route!(create_menu_item => Post "/menu" impl MenuManagement);
pub async fn create_menu_item<B: MenuManagement>(
    api: web::Data<MenuApi<B>>,
    body: web::Json<NewMenuItem>,
) -> Result<HttpResponse, ServerError> {
    let item = body.into_inner();
    debug!("💻️ POST menu item [{}]", item.name);
    let item = api.create_menu_item(item).await?;
    Ok(HttpResponse::Created().json(item))
}

route!(menu_item => Get "/menu/{id}" impl MenuManagement);
pub async fn menu_item<B: MenuManagement>(
    path: web::Path<i64>,
    api: web::Data<MenuApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET menu item #{id}");
    let item =
        api.fetch_menu_item(id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Menu item #{id}")))?;
    Ok(HttpResponse::Ok().json(item))
}

route!(patch_menu_item => Patch "/menu/{id}" impl MenuManagement);
pub async fn patch_menu_item<B: MenuManagement>(
    path: web::Path<i64>,
    api: web::Data<MenuApi<B>>,
    body: web::Json<MenuItemUpdate>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ PATCH menu item #{id}");
    let item = api.update_menu_item(id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

route!(replace_menu_item => Put "/menu/{id}" impl MenuManagement);
pub async fn replace_menu_item<B: MenuManagement>(
    path: web::Path<i64>,
    api: web::Data<MenuApi<B>>,
    body: web::Json<NewMenuItem>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ PUT menu item #{id}");
    let item = api.replace_menu_item(id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(orders => Get "/orders" impl OrderQueries);
/// Lists orders, open ones by default. `?status=completed` lists archived-side live records
/// instead, and `?customer_id=..` narrows the result to one customer.
pub async fn orders<B: OrderQueries>(
    query: web::Query<OrderListQuery>,
    api: web::Data<OrderQueryApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let query = query.into_inner();
    let status = match query.status.as_deref() {
        None => OrderStatusType::Open,
        Some(s) => OrderStatusType::from_str(s).map_err(|e| ServerError::InvalidRequestPath(e.to_string()))?,
    };
    trace!("💻️ GET orders, status {status}");
    let mut filter = OrderQueryFilter::default().with_status(status);
    if let Some(customer_id) = query.customer_id {
        filter = filter.with_customer_id(customer_id);
    }
    let orders = api.search_orders(filter).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(submit_order => Post "/orders" impl OrderFlowDatabase);
pub async fn submit_order<B: OrderFlowDatabase>(
    api: web::Data<OrderFlowApi<B>>,
    body: web::Json<OrderSubmissionRequest>,
) -> Result<HttpResponse, ServerError> {
    let submission = body.into_inner();
    debug!("💻️ POST order submission from customer [{}]", submission.customer_id);
    let order = api.submit_order(submission.into()).await?;
    Ok(HttpResponse::Created().json(order))
}

route!(order_by_id => Get "/orders/{id}" impl OrderQueries);
pub async fn order_by_id<B: OrderQueries>(
    path: web::Path<i64>,
    api: web::Data<OrderQueryApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET order #{id}");
    let order = api.fetch_order(id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Order #{id}")))?;
    Ok(HttpResponse::Ok().json(order))
}

route!(update_item_status => Patch "/order-items/{id}/status" impl OrderFlowDatabase);
pub async fn update_item_status<B: OrderFlowDatabase>(
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B>>,
    body: web::Json<ItemStatusParams>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let params = body.into_inner();
    debug!("💻️ PATCH item #{id} status to [{}]", params.status);
    let status = ItemStatusType::from_str(&params.status)
        .map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
    let update = ItemStatusUpdate { status, preparation_time: params.preparation_time };
    let item = api.update_item_status(id, update).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Item #{} is now {}", item.id, item.status))))
}

route!(complete_order => Patch "/orders/{id}/complete" impl OrderFlowDatabase);
pub async fn complete_order<B: OrderFlowDatabase>(
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ PATCH complete order #{id}");
    let completed = api.complete_order(id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Order #{} completed and archived", completed.order_id))))
}

//----------------------------------------   Completed orders  ------------------------------------------------
route!(completed_orders => Get "/completed-orders" impl OrderQueries);
pub async fn completed_orders<B: OrderQueries>(api: web::Data<OrderQueryApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET completed orders");
    let orders = api.fetch_completed_orders().await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(completed_order => Get "/completed-orders/{id}" impl OrderQueries);
/// `{id}` is the id the order had while it was live.
pub async fn completed_order<B: OrderQueries>(
    path: web::Path<i64>,
    api: web::Data<OrderQueryApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET completed order #{id}");
    let order = api
        .fetch_completed_order(id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Completed order #{id}")))?;
    Ok(HttpResponse::Ok().json(order))
}

//----------------------------------------------   Events  ----------------------------------------------------
#[get("/events")]
pub async fn event_stream(fanout: web::Data<OrderBroadcast>) -> impl Responder {
    debug!("💻️ New SSE subscriber connected");
    let receiver = fanout.subscribe();
    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(sse_stream(receiver))
}
