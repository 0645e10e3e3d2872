//! Simulated rider position.
//!
//! There is no location feed. The displayed position is a straight-line
//! interpolation between origin and destination driven only by the order's
//! phase and the time spent in it. Destinations come from a fixed table of
//! zone coordinates, not from geocoding, and do not generalise to arbitrary
//! addresses.

use std::time::Duration;

use super::lifecycle::OrderStatus;
use super::order::{Order, ZONE_MARKER};

pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(8000);
pub const DEFAULT_TICK: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Point a fraction `t` of the way from `self` to `to`, per axis.
    pub fn lerp(self, to: Coordinate, t: f64) -> Coordinate {
        Coordinate {
            lat: self.lat + (to.lat - self.lat) * t,
            lng: self.lng + (to.lng - self.lng) * t,
        }
    }
}

pub const ILIGAN_CENTER: Coordinate = Coordinate::new(8.2280, 124.2452);

/// Fraction of the animation completed, clamped to `0.0..=1.0`.
pub fn progress(elapsed: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
}

/// Whether the rider marker should be moving for this status.
pub fn is_in_transit(status: OrderStatus) -> bool {
    status.is_shipped() && !status.is_completed()
}

/// Position to display for an order in `status`, `elapsed` after its
/// current phase began.
pub fn current_position(
    status: OrderStatus,
    origin: Coordinate,
    destination: Coordinate,
    elapsed: Duration,
    total: Duration,
) -> Coordinate {
    if !status.is_shipped() {
        return origin;
    }
    if status.is_completed() {
        return destination;
    }
    origin.lerp(destination, progress(elapsed, total))
}

const ILIGAN_BARANGAYS: [&str; 44] = [
    "Abuno", "Acmac", "Bagong Silang", "Bonbonon", "Bunawan", "Buru-un",
    "Dalipuga", "Del Carmen", "Digkilaan", "Ditucalan", "Dulag", "Hinaplanon",
    "Hindang", "Kabacsanan", "Kalilangan", "Kiwalan", "Lanipao", "Luinab",
    "Mahayahay", "Mainit", "Mandulog", "Maria Cristina", "Palao", "Panoroganan",
    "Poblacion", "Puga-an", "Rogongon", "San Miguel", "San Roque", "Santiago",
    "Saray", "Santa Elena", "Santa Filomena", "Santo Rosario", "Suarez",
    "Tambacan", "Tibanga", "Tipanoy", "Tomas L. Cabili", "Tubod", "Ubaldo Laya",
    "Upper Hinaplanon", "Upper Tominobo", "Villa Verde",
];

const GRID_STEP: f64 = 0.001;

/// Fixed zone-to-coordinate table with a fallback for unknown zones.
#[derive(Debug, Clone)]
pub struct ZoneDirectory {
    zones: Vec<(String, Coordinate)>,
    fallback: Coordinate,
}

impl ZoneDirectory {
    pub fn new(zones: Vec<(String, Coordinate)>, fallback: Coordinate) -> Self {
        Self { zones, fallback }
    }

    /// Iligan barangays laid out on a 5x5 grid of 0.001° steps around the
    /// city centre.
    pub fn iligan() -> Self {
        let zones = ILIGAN_BARANGAYS
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let coordinate = Coordinate::new(
                    ILIGAN_CENTER.lat + (index % 5) as f64 * GRID_STEP,
                    ILIGAN_CENTER.lng + ((index / 5) % 5) as f64 * GRID_STEP,
                );
                (name.to_string(), coordinate)
            })
            .collect();
        Self::new(zones, ILIGAN_CENTER)
    }

    pub fn fallback(&self) -> Coordinate {
        self.fallback
    }

    pub fn zone_names(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(|(name, _)| name.as_str())
    }

    /// Exact lookup by zone name.
    pub fn resolve_zone(&self, zone: &str) -> Option<Coordinate> {
        let zone = zone.trim();
        self.zones
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(zone))
            .map(|(_, coordinate)| *coordinate)
    }

    /// Finds `Brgy. {zone}` inside a composed address. When several zone
    /// names match, the longest wins so "Upper Hinaplanon" is not read as
    /// "Hinaplanon".
    pub fn resolve_address(&self, address: &str) -> Option<Coordinate> {
        self.zones
            .iter()
            .filter(|(name, _)| address.contains(&format!("{ZONE_MARKER}{name}")))
            .max_by_key(|(name, _)| name.len())
            .map(|(_, coordinate)| *coordinate)
    }

    /// Destination for an order: stored zone first, then the address text,
    /// then the fallback.
    pub fn destination_for(&self, order: &Order) -> Coordinate {
        order
            .delivery_zone
            .as_deref()
            .and_then(|zone| self.resolve_zone(zone))
            .or_else(|| self.resolve_address(&order.shipping_address))
            .unwrap_or(self.fallback)
    }
}

impl Default for ZoneDirectory {
    fn default() -> Self {
        Self::iligan()
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::order::PaymentMethod;

    const ORIGIN: Coordinate = Coordinate::new(8.47, 124.64);
    const DEST: Coordinate = Coordinate::new(8.23, 124.25);

    fn assert_close(actual: Coordinate, expected: Coordinate) {
        assert!(
            (actual.lat - expected.lat).abs() < 1e-9 && (actual.lng - expected.lng).abs() < 1e-9,
            "{actual:?} != {expected:?}"
        );
    }

    fn order(address: &str, zone: Option<&str>) -> Order {
        Order {
            id: Uuid::new_v4(),
            buyer_id: Uuid::new_v4(),
            created_at: Utc::now(),
            status: OrderStatus::OutForDelivery,
            total: BigDecimal::from(0),
            shipping_address: address.to_string(),
            delivery_zone: zone.map(str::to_string),
            contact_name: "Juan".to_string(),
            contact_phone: "0917".to_string(),
            payment_method: PaymentMethod::CashOnDelivery,
            lines: vec![],
        }
    }

    #[test]
    fn not_yet_shipped_stays_at_origin() {
        for elapsed in [0, 4000, 60_000] {
            let pos = current_position(
                OrderStatus::Preparing,
                ORIGIN,
                DEST,
                Duration::from_millis(elapsed),
                DEFAULT_ANIMATION_DURATION,
            );
            assert_eq!(pos, ORIGIN);
        }
    }

    #[test]
    fn cancelled_stays_at_origin() {
        let pos = current_position(
            OrderStatus::Cancelled,
            ORIGIN,
            DEST,
            Duration::from_millis(5000),
            DEFAULT_ANIMATION_DURATION,
        );
        assert_eq!(pos, ORIGIN);
    }

    #[test]
    fn completed_sits_at_destination() {
        for status in [OrderStatus::Delivered, OrderStatus::Completed] {
            let pos = current_position(status, ORIGIN, DEST, Duration::ZERO, DEFAULT_ANIMATION_DURATION);
            assert_eq!(pos, DEST);
        }
    }

    #[test]
    fn halfway_through_is_the_midpoint() {
        let pos = current_position(
            OrderStatus::OutForDelivery,
            ORIGIN,
            DEST,
            Duration::from_millis(4000),
            DEFAULT_ANIMATION_DURATION,
        );
        assert_close(pos, Coordinate::new((8.47 + 8.23) / 2.0, (124.64 + 124.25) / 2.0));
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress(Duration::from_secs(20), DEFAULT_ANIMATION_DURATION), 1.0);
        assert_eq!(progress(Duration::ZERO, DEFAULT_ANIMATION_DURATION), 0.0);
        assert_eq!(progress(Duration::from_secs(1), Duration::ZERO), 1.0);

        let pos = current_position(
            OrderStatus::OutForDelivery,
            ORIGIN,
            DEST,
            Duration::from_secs(60),
            DEFAULT_ANIMATION_DURATION,
        );
        assert_close(pos, DEST);
    }

    #[test]
    fn directory_prefers_stored_zone() {
        let directory = ZoneDirectory::iligan();
        let order = order("Iligan City, Brgy. Tibanga • Purok 1", Some("Abuno"));
        assert_eq!(directory.destination_for(&order), directory.resolve_zone("Abuno").unwrap());
    }

    #[test]
    fn directory_falls_back_to_address_text() {
        let directory = ZoneDirectory::iligan();
        let order = order("Iligan City, Brgy. Tibanga • Purok 1", None);
        assert_eq!(directory.destination_for(&order), directory.resolve_zone("Tibanga").unwrap());
    }

    #[test]
    fn longest_zone_name_wins() {
        let directory = ZoneDirectory::iligan();
        let upper = directory.resolve_zone("Upper Hinaplanon").unwrap();
        let lower = directory.resolve_zone("Hinaplanon").unwrap();
        assert_ne!(upper, lower);

        let found = directory
            .resolve_address("Iligan City, Brgy. Upper Hinaplanon • Block 4")
            .unwrap();
        assert_eq!(found, upper);
    }

    #[test]
    fn unknown_zone_uses_fallback() {
        let directory = ZoneDirectory::iligan();
        let order = order("Cagayan de Oro, Carmen", Some("Carmen"));
        assert_eq!(directory.destination_for(&order), ILIGAN_CENTER);
    }

    #[test]
    fn iligan_directory_lists_all_barangays() {
        let directory = ZoneDirectory::iligan();
        assert_eq!(directory.zone_names().count(), 44);
        assert_eq!(directory.resolve_zone("abuno"), Some(ILIGAN_CENTER));
    }
}
