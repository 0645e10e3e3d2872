//! Drives the rider animation for one displayed order.
//!
//! At most one animation task runs per tracker. It is aborted when the view
//! is torn down, when another order is displayed, and when the order leaves
//! the in-transit phase. It ends by itself once the rider arrives or nobody
//! is watching.
//!
//! This is the library-side driver for a presentation layer that holds one
//! tracking view open. The HTTP server does not use it: requests are
//! stateless, so `GET /orders/{id}/position` evaluates the same
//! interpolation once for a caller-supplied `elapsed_ms`.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::config::TrackingConfig;
use crate::domain::lifecycle::OrderStatus;
use crate::domain::order::Order;
use crate::domain::tracking::{current_position, is_in_transit, progress, Coordinate, ZoneDirectory};

struct TrackedOrder {
    order_id: Uuid,
    status: OrderStatus,
    destination: Coordinate,
    position: watch::Sender<Coordinate>,
    animation: Option<JoinHandle<()>>,
}

impl TrackedOrder {
    fn stop(&mut self) {
        if let Some(handle) = self.animation.take() {
            handle.abort();
        }
    }
}

pub struct DeliveryTracker {
    config: TrackingConfig,
    directory: ZoneDirectory,
    current: Option<TrackedOrder>,
}

impl DeliveryTracker {
    pub fn new(config: TrackingConfig, directory: ZoneDirectory) -> Self {
        Self {
            config,
            directory,
            current: None,
        }
    }

    /// Starts tracking `order`, replacing whatever was displayed before.
    /// Must be called from within a Tokio runtime.
    pub fn display(&mut self, order: &Order) -> watch::Receiver<Coordinate> {
        self.teardown();

        let destination = self.directory.destination_for(order);
        let initial = self.resting_position(order.status, destination);
        let (position, receiver) = watch::channel(initial);

        let mut tracked = TrackedOrder {
            order_id: order.id,
            status: order.status,
            destination,
            position,
            animation: None,
        };
        if is_in_transit(order.status) {
            tracked.animation = Some(self.spawn_animation(&tracked));
        }
        log::debug!("Tracking order {} from {}", order.id, order.status);
        self.current = Some(tracked);
        receiver
    }

    /// Feeds a status read back from the store into the displayed view.
    /// Entering transit restarts the animation from the origin; leaving it
    /// stops the animation and pins the marker.
    pub fn update_status(&mut self, order_id: Uuid, status: OrderStatus) {
        let Some(mut tracked) = self.current.take() else {
            return;
        };
        if tracked.order_id != order_id {
            log::debug!("Ignoring status for order {order_id}; tracking {}", tracked.order_id);
            self.current = Some(tracked);
            return;
        }

        let was_in_transit = is_in_transit(tracked.status);
        tracked.status = status;

        if !is_in_transit(status) {
            tracked.stop();
            tracked
                .position
                .send_replace(self.resting_position(status, tracked.destination));
        } else if !was_in_transit {
            tracked.stop();
            tracked.position.send_replace(self.config.origin);
            tracked.animation = Some(self.spawn_animation(&tracked));
        }
        self.current = Some(tracked);
    }

    pub fn subscribe(&self) -> Option<watch::Receiver<Coordinate>> {
        self.current.as_ref().map(|t| t.position.subscribe())
    }

    pub fn tracked_order(&self) -> Option<Uuid> {
        self.current.as_ref().map(|t| t.order_id)
    }

    pub fn is_animating(&self) -> bool {
        self.current
            .as_ref()
            .and_then(|t| t.animation.as_ref())
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops any running animation and forgets the displayed order.
    pub fn teardown(&mut self) {
        if let Some(mut tracked) = self.current.take() {
            tracked.stop();
            log::debug!("Stopped tracking order {}", tracked.order_id);
        }
    }

    fn resting_position(&self, status: OrderStatus, destination: Coordinate) -> Coordinate {
        current_position(
            status,
            self.config.origin,
            destination,
            Duration::ZERO,
            self.config.duration,
        )
    }

    fn spawn_animation(&self, tracked: &TrackedOrder) -> JoinHandle<()> {
        tokio::spawn(animate(
            tracked.position.clone(),
            self.config.origin,
            tracked.destination,
            self.config.duration,
            self.config.tick,
        ))
    }
}

impl Drop for DeliveryTracker {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn animate(
    position: watch::Sender<Coordinate>,
    origin: Coordinate,
    destination: Coordinate,
    duration: Duration,
    tick: Duration,
) {
    let started = Instant::now();
    let mut ticks = tokio::time::interval(tick);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticks.tick().await;
        let t = progress(started.elapsed(), duration);
        if position.send(origin.lerp(destination, t)).is_err() {
            return;
        }
        if t >= 1.0 {
            return;
        }
    }
}
