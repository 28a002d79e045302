use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{
    EventHandler,
    EventProducer,
    Handler,
    OrderChangedEvent,
    OrderCompletedEvent,
    OrderItemChangedEvent,
};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_changed_producers: Vec<EventProducer<OrderChangedEvent>>,
    pub order_item_changed_producers: Vec<EventProducer<OrderItemChangedEvent>>,
    pub order_completed_producers: Vec<EventProducer<OrderCompletedEvent>>,
}

pub struct EventHandlers {
    pub on_order_changed: Option<EventHandler<OrderChangedEvent>>,
    pub on_order_item_changed: Option<EventHandler<OrderItemChangedEvent>>,
    pub on_order_completed: Option<EventHandler<OrderCompletedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_order_changed = hooks.on_order_changed.map(|f| EventHandler::new(buffer_size, f));
        let on_order_item_changed = hooks.on_order_item_changed.map(|f| EventHandler::new(buffer_size, f));
        let on_order_completed = hooks.on_order_completed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_order_changed, on_order_item_changed, on_order_completed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_order_changed {
            result.order_changed_producers.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_order_item_changed {
            result.order_item_changed_producers.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_order_completed {
            result.order_completed_producers.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_order_changed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_order_item_changed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_order_completed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_order_changed: Option<Handler<OrderChangedEvent>>,
    pub on_order_item_changed: Option<Handler<OrderItemChangedEvent>>,
    pub on_order_completed: Option<Handler<OrderCompletedEvent>>,
}

impl EventHooks {
    pub fn on_order_changed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderChangedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_changed = Some(Arc::new(f));
        self
    }

    pub fn on_order_item_changed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderItemChangedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_item_changed = Some(Arc::new(f));
        self
    }

    pub fn on_order_completed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderCompletedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_completed = Some(Arc::new(f));
        self
    }
}
