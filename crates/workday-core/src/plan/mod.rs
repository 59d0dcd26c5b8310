//! Schedule planner.
//!
//! Pure computation from a clock-in instant and a lunch-start offset to the
//! ordered list of planned alert events. No sink access, no id minting --
//! calling twice with the same inputs yields the same output.
//!
//! Domain constants: lunch is 30 minutes unpaid, the paid shift is 8 hours,
//! so the day ends at clock-in + 8 h 30 m regardless of when lunch starts.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Unpaid lunch duration in minutes.
pub const LUNCH_DURATION_MIN: i64 = 30;
/// Full day length (8 h paid + 30 m lunch) in minutes.
pub const DAY_LENGTH_MIN: i64 = 8 * 60 + 30;
/// Lunch must start strictly before this many minutes of work.
pub const MAX_LUNCH_OFFSET_MIN: i64 = 4 * 60 + 30;
/// Warnings fire this many minutes before their primary event.
pub const WARNING_LEAD_MIN: i64 = 2;
/// Number of loop follow-up reminders per primary event.
pub const FOLLOW_UP_COUNT: u32 = 10;
/// Spacing between loop follow-ups, in seconds.
pub const FOLLOW_UP_INTERVAL_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LunchOut,
    LunchIn,
    DayOut,
}

impl AlertKind {
    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::LunchOut => "Clock-out for lunch",
            AlertKind::LunchIn => "Clock-in after lunch",
            AlertKind::DayOut => "Clock-out for the day",
        }
    }
}

/// One planned alert, either a primary event or its 2-minute pre-warning.
///
/// Generated fresh on every scheduling call and replaced wholesale; never
/// mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedEvent {
    pub kind: AlertKind,
    pub title: String,
    pub fire_at: DateTime<Utc>,
    pub is_warning: bool,
    /// For warnings, the primary kind this warns about.
    pub warning_of: Option<AlertKind>,
    /// Primaries get loop follow-up reminders; warnings never do.
    pub repeat_eligible: bool,
}

/// Check the lunch offset against the open interval (0, 4 h 30 m).
pub fn validate_offset(lunch_offset: Duration) -> Result<(), ValidationError> {
    if lunch_offset <= Duration::zero() {
        return Err(ValidationError::TooEarly);
    }
    if lunch_offset >= Duration::minutes(MAX_LUNCH_OFFSET_MIN) {
        return Err(ValidationError::TooLate);
    }
    Ok(())
}

/// Plan the workday alerts for one clock-in.
///
/// Returns the six planned events in emission order: primary + warning for
/// lunch-out, lunch-in, day-out. Consumers re-sort chronologically when
/// presenting.
///
/// # Errors
/// `TooEarly` if the offset is not positive, `TooLate` if it reaches the
/// 4 h 30 m cap. Validation happens before anything else.
pub fn plan(
    clock_in: DateTime<Utc>,
    lunch_offset: Duration,
) -> Result<Vec<PlannedEvent>, ValidationError> {
    validate_offset(lunch_offset)?;

    let lunch_out = clock_in + lunch_offset;
    let lunch_in = lunch_out + Duration::minutes(LUNCH_DURATION_MIN);
    let day_out = clock_in + Duration::minutes(DAY_LENGTH_MIN);

    let primaries = [
        (AlertKind::LunchOut, lunch_out),
        (AlertKind::LunchIn, lunch_in),
        (AlertKind::DayOut, day_out),
    ];

    let mut events = Vec::with_capacity(primaries.len() * 2);
    for (kind, fire_at) in primaries {
        events.push(PlannedEvent {
            kind,
            title: kind.title().to_string(),
            fire_at,
            is_warning: false,
            warning_of: None,
            repeat_eligible: true,
        });
        events.push(PlannedEvent {
            kind,
            title: warning_title(kind),
            fire_at: fire_at - Duration::minutes(WARNING_LEAD_MIN),
            is_warning: true,
            warning_of: Some(kind),
            repeat_eligible: false,
        });
    }
    Ok(events)
}

fn warning_title(kind: AlertKind) -> String {
    format!("⏰ 2-minute warning: {}", kind.title().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn nine_am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 12, 9, 0, 0).unwrap()
    }

    #[test]
    fn plan_emits_six_events() {
        let events = plan(nine_am(), Duration::hours(4)).unwrap();
        assert_eq!(events.len(), 6);
        assert_eq!(events.iter().filter(|e| e.is_warning).count(), 3);
        assert_eq!(events.iter().filter(|e| e.repeat_eligible).count(), 3);
    }

    #[test]
    fn plan_times_for_four_hour_offset() {
        let clock_in = nine_am();
        let events = plan(clock_in, Duration::hours(4)).unwrap();
        let primary = |kind| {
            events
                .iter()
                .find(|e| !e.is_warning && e.kind == kind)
                .unwrap()
                .fire_at
        };
        assert_eq!(
            primary(AlertKind::LunchOut),
            Utc.with_ymd_and_hms(2025, 5, 12, 13, 0, 0).unwrap()
        );
        assert_eq!(
            primary(AlertKind::LunchIn),
            Utc.with_ymd_and_hms(2025, 5, 12, 13, 30, 0).unwrap()
        );
        assert_eq!(
            primary(AlertKind::DayOut),
            Utc.with_ymd_and_hms(2025, 5, 12, 17, 30, 0).unwrap()
        );
    }

    #[test]
    fn day_out_is_independent_of_offset() {
        let clock_in = nine_am();
        for offset_min in [1, 60, 150, 269] {
            let events = plan(clock_in, Duration::minutes(offset_min)).unwrap();
            let day_out = events
                .iter()
                .find(|e| !e.is_warning && e.kind == AlertKind::DayOut)
                .unwrap();
            assert_eq!(day_out.fire_at, clock_in + Duration::minutes(DAY_LENGTH_MIN));
        }
    }

    #[test]
    fn warnings_fire_two_minutes_before_their_primary() {
        let events = plan(nine_am(), Duration::minutes(125)).unwrap();
        for pair in events.chunks(2) {
            let (primary, warning) = (&pair[0], &pair[1]);
            assert!(!primary.is_warning);
            assert!(warning.is_warning);
            assert_eq!(warning.warning_of, Some(primary.kind));
            assert_eq!(warning.fire_at, primary.fire_at - Duration::minutes(2));
            assert!(warning.title.contains("2-minute warning"));
            assert!(warning.title.contains(&primary.title.to_lowercase()));
        }
    }

    #[test]
    fn emission_order_is_lunch_out_lunch_in_day_out() {
        let events = plan(nine_am(), Duration::hours(2)).unwrap();
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AlertKind::LunchOut,
                AlertKind::LunchOut,
                AlertKind::LunchIn,
                AlertKind::LunchIn,
                AlertKind::DayOut,
                AlertKind::DayOut,
            ]
        );
    }

    #[test]
    fn zero_offset_is_too_early() {
        assert_eq!(
            plan(nine_am(), Duration::zero()).unwrap_err(),
            ValidationError::TooEarly
        );
    }

    #[test]
    fn negative_offset_is_too_early() {
        assert_eq!(
            plan(nine_am(), Duration::minutes(-5)).unwrap_err(),
            ValidationError::TooEarly
        );
    }

    #[test]
    fn boundary_offset_is_too_late() {
        assert_eq!(
            plan(nine_am(), Duration::minutes(270)).unwrap_err(),
            ValidationError::TooLate
        );
        assert_eq!(
            plan(nine_am(), Duration::hours(9)).unwrap_err(),
            ValidationError::TooLate
        );
    }

    #[test]
    fn one_second_offset_is_valid() {
        assert!(plan(nine_am(), Duration::seconds(1)).is_ok());
    }

    proptest! {
        #[test]
        fn valid_offsets_always_yield_six_events(offset_secs in 1i64..(270 * 60)) {
            let clock_in = nine_am();
            let offset = Duration::seconds(offset_secs);
            let events = plan(clock_in, offset).unwrap();
            prop_assert_eq!(events.len(), 6);

            let lunch_out = events
                .iter()
                .find(|e| !e.is_warning && e.kind == AlertKind::LunchOut)
                .unwrap();
            let lunch_in = events
                .iter()
                .find(|e| !e.is_warning && e.kind == AlertKind::LunchIn)
                .unwrap();
            prop_assert_eq!(lunch_out.fire_at, clock_in + offset);
            prop_assert_eq!(
                lunch_in.fire_at,
                lunch_out.fire_at + Duration::minutes(LUNCH_DURATION_MIN)
            );
        }

        #[test]
        fn offsets_at_or_past_cap_are_too_late(extra_secs in 0i64..100_000) {
            let offset = Duration::minutes(MAX_LUNCH_OFFSET_MIN) + Duration::seconds(extra_secs);
            prop_assert_eq!(plan(nine_am(), offset).unwrap_err(), ValidationError::TooLate);
        }

        #[test]
        fn non_positive_offsets_are_too_early(secs in -100_000i64..=0) {
            prop_assert_eq!(
                plan(nine_am(), Duration::seconds(secs)).unwrap_err(),
                ValidationError::TooEarly
            );
        }
    }
}
