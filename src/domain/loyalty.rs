//! Loyalty points and tier computation.
//!
//! Points are derived on every read from the user's full booking and order
//! history; nothing is persisted or cached, so the numbers can never drift
//! from the store of record.

use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Flat bonus awarded on top of the dollar value of every booking.
pub const BOOKING_BONUS_POINTS: i64 = 10;

/// The activity feed shows only the most recent entries.
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    pub fn from_points(points: i64) -> Tier {
        if points >= 1000 {
            Tier::Platinum
        } else if points >= 500 {
            Tier::Gold
        } else if points >= 200 {
            Tier::Silver
        } else {
            Tier::Bronze
        }
    }

    /// Points needed to reach the next tier, or `None` at Platinum.
    pub fn next_threshold(&self) -> Option<i64> {
        match self {
            Tier::Bronze => Some(200),
            Tier::Silver => Some(500),
            Tier::Gold => Some(1000),
            Tier::Platinum => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Booking,
    Order,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Activity {
    pub kind: ActivityKind,
    pub description: String,
    pub points: i64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PointsSummary {
    pub total_points: i64,
    pub tier: Tier,
    pub next_tier_at: Option<i64>,
    pub recent_activity: Vec<Activity>,
}

/// A completed service booking, as read from the store.
#[derive(Debug, Clone)]
pub struct BookingEvent {
    pub service_name: String,
    pub total_amount: BigDecimal,
    pub created_at: DateTime<Utc>,
}

/// A product order, as read from the store.
#[derive(Debug, Clone)]
pub struct OrderEvent {
    pub total_amount: BigDecimal,
    pub created_at: DateTime<Utc>,
}

/// One point per whole dollar spent, plus a flat bonus per booking.
pub fn booking_points(total_amount: &BigDecimal) -> i64 {
    whole_dollars(total_amount) + BOOKING_BONUS_POINTS
}

/// One point per whole dollar spent.
pub fn order_points(total_amount: &BigDecimal) -> i64 {
    whole_dollars(total_amount)
}

fn whole_dollars(amount: &BigDecimal) -> i64 {
    amount
        .with_scale_round(0, RoundingMode::Floor)
        .to_i64()
        .unwrap_or(0)
}

/// Fold the user's full history into a points total, tier, and the ten most
/// recent activity entries (newest first).
pub fn summarize(bookings: &[BookingEvent], orders: &[OrderEvent]) -> PointsSummary {
    let mut total_points = 0;
    let mut activity = Vec::with_capacity(bookings.len() + orders.len());

    for booking in bookings {
        let points = booking_points(&booking.total_amount);
        total_points += points;
        activity.push(Activity {
            kind: ActivityKind::Booking,
            description: format!("Service booking: {}", booking.service_name),
            points,
            date: booking.created_at,
        });
    }

    for order in orders {
        let points = order_points(&order.total_amount);
        total_points += points;
        activity.push(Activity {
            kind: ActivityKind::Order,
            description: "Product purchase".to_string(),
            points,
            date: order.created_at,
        });
    }

    activity.sort_by(|a, b| b.date.cmp(&a.date));
    activity.truncate(RECENT_ACTIVITY_LIMIT);

    let tier = Tier::from_points(total_points);
    PointsSummary {
        total_points,
        tier,
        next_tier_at: tier.next_threshold(),
        recent_activity: activity,
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;

    use super::*;

    fn amount(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn booking_points_floor_plus_bonus() {
        assert_eq!(booking_points(&amount("120.40")), 130);
        assert_eq!(booking_points(&amount("0.99")), 10);
    }

    #[test]
    fn order_points_floor_only() {
        assert_eq!(order_points(&amount("45.90")), 45);
        assert_eq!(order_points(&amount("0.50")), 0);
    }

    #[test]
    fn one_booking_and_one_order_lands_in_bronze() {
        // floor(120.40) + 10 + floor(45.90) = 130 + 45 = 175 < 200
        let bookings = [BookingEvent {
            service_name: "Wash & Fold".to_string(),
            total_amount: amount("120.40"),
            created_at: at(100),
        }];
        let orders = [OrderEvent {
            total_amount: amount("45.90"),
            created_at: at(200),
        }];

        let summary = summarize(&bookings, &orders);

        assert_eq!(summary.total_points, 175);
        assert_eq!(summary.tier, Tier::Bronze);
        assert_eq!(summary.next_tier_at, Some(200));
    }

    #[test]
    fn tier_thresholds_are_strict_cutoffs() {
        assert_eq!(Tier::from_points(0), Tier::Bronze);
        assert_eq!(Tier::from_points(199), Tier::Bronze);
        assert_eq!(Tier::from_points(200), Tier::Silver);
        assert_eq!(Tier::from_points(499), Tier::Silver);
        assert_eq!(Tier::from_points(500), Tier::Gold);
        assert_eq!(Tier::from_points(999), Tier::Gold);
        assert_eq!(Tier::from_points(1000), Tier::Platinum);
    }

    #[test]
    fn platinum_has_no_next_threshold() {
        assert_eq!(Tier::Platinum.next_threshold(), None);
    }

    #[test]
    fn activity_is_sorted_newest_first_and_truncated() {
        let bookings: Vec<BookingEvent> = (0..8)
            .map(|i| BookingEvent {
                service_name: "Dry Cleaning".to_string(),
                total_amount: amount("10.00"),
                created_at: at(i * 10),
            })
            .collect();
        let orders: Vec<OrderEvent> = (0..8)
            .map(|i| OrderEvent {
                total_amount: amount("5.00"),
                created_at: at(i * 10 + 5),
            })
            .collect();

        let summary = summarize(&bookings, &orders);

        assert_eq!(summary.recent_activity.len(), RECENT_ACTIVITY_LIMIT);
        for pair in summary.recent_activity.windows(2) {
            assert!(pair[0].date >= pair[1].date, "must be newest first");
        }
        // Newest overall event is the last order (t = 75).
        assert_eq!(summary.recent_activity[0].date, at(75));
    }

    #[test]
    fn empty_history_is_bronze_with_no_activity() {
        let summary = summarize(&[], &[]);
        assert_eq!(summary.total_points, 0);
        assert_eq!(summary.tier, Tier::Bronze);
        assert!(summary.recent_activity.is_empty());
    }
}
