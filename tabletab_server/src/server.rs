use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::info;
use tabletab_engine::{
    events::{EventHandlers, EventProducers},
    MenuApi,
    OrderFlowApi,
    OrderQueryApi,
    SqliteDatabase,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    push::OrderBroadcast,
    routes::{
        event_stream,
        health,
        CompleteOrderRoute,
        CompletedOrderRoute,
        CompletedOrdersRoute,
        CreateMenuItemRoute,
        MenuItemRoute,
        MenuItemsRoute,
        OrderByIdRoute,
        OrdersRoute,
        PatchMenuItemRoute,
        ReplaceMenuItemRoute,
        SubmitOrderRoute,
        UpdateItemStatusRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;

    // Wire the engine's event hooks into the SSE broadcast channel before the server starts,
    // so no committed mutation can slip past the push channel.
    let fanout = OrderBroadcast::new(config.event_buffer_size);
    let handlers = EventHandlers::new(config.event_buffer_size, fanout.event_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    info!("🚀️ Event handlers started, push channel is live");

    let srv = create_server_instance(config, db, producers, fanout)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
    fanout: OrderBroadcast,
) -> Result<Server, ServerError> {
    // The APIs are built once, outside the factory closure. The order flow API carries the
    // per-customer submission locks, which must span every worker thread.
    let order_flow_api = web::Data::new(OrderFlowApi::new(db.clone(), producers));
    let menu_api = web::Data::new(MenuApi::new(db.clone()));
    let query_api = web::Data::new(OrderQueryApi::new(db));
    let fanout = web::Data::new(fanout);
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("ttb::access_log"))
            .app_data(order_flow_api.clone())
            .app_data(menu_api.clone())
            .app_data(query_api.clone())
            .app_data(fanout.clone())
            .service(health)
            .service(event_stream)
            .service(MenuItemsRoute::<SqliteDatabase>::new())
            .service(CreateMenuItemRoute::<SqliteDatabase>::new())
            .service(MenuItemRoute::<SqliteDatabase>::new())
            .service(PatchMenuItemRoute::<SqliteDatabase>::new())
            .service(ReplaceMenuItemRoute::<SqliteDatabase>::new())
            .service(OrdersRoute::<SqliteDatabase>::new())
            .service(SubmitOrderRoute::<SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new())
            .service(UpdateItemStatusRoute::<SqliteDatabase>::new())
            .service(CompleteOrderRoute::<SqliteDatabase>::new())
            .service(CompletedOrdersRoute::<SqliteDatabase>::new())
            .service(CompletedOrderRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
