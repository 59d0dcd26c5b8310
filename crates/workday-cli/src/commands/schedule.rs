use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};
use clap::Args;
use workday_core::Config;

#[derive(Args)]
pub struct ScheduleArgs {
    /// Clock-in time: RFC 3339, or "HH:MM" for today. Defaults to now.
    #[arg(long)]
    clock_in: Option<String>,

    /// Hours worked before lunch starts
    #[arg(long)]
    offset_hours: Option<u32>,

    /// Minutes worked before lunch starts (added to --offset-hours)
    #[arg(long)]
    offset_minutes: Option<u32>,

    /// Print the resulting pending alerts as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ScheduleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    if !config.notifications.enabled {
        eprintln!("notifications are disabled in config; nothing scheduled");
        return Ok(());
    }

    let clock_in = parse_clock_in(args.clock_in.as_deref())?;
    let offset = match (args.offset_hours, args.offset_minutes) {
        (None, None) => Duration::minutes(i64::from(config.alerts.default_lunch_offset_min)),
        (hours, minutes) => {
            Duration::minutes(i64::from(hours.unwrap_or(0)) * 60 + i64::from(minutes.unwrap_or(0)))
        }
    };

    let reconciler = super::open_reconciler()?;
    let pending = super::runtime()?.block_on(async {
        reconciler.request_permission().await;
        reconciler.schedule_alerts(clock_in, offset).await
    })?;
    super::print_pending(&pending, args.json)
}

fn parse_clock_in(raw: Option<&str>) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    let Some(raw) = raw else {
        return Ok(Utc::now());
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let time = NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| format!("cannot parse clock-in time '{raw}' (expected RFC 3339 or HH:MM)"))?;
    let local = Local
        .from_local_datetime(&Local::now().date_naive().and_time(time))
        .single()
        .ok_or_else(|| format!("ambiguous local time '{raw}'"))?;
    Ok(local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_clock_in_parses_to_utc() {
        let parsed = parse_clock_in(Some("2025-05-12T09:00:00+02:00")).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 5, 12, 7, 0, 0).unwrap());
    }

    #[test]
    fn hhmm_clock_in_lands_on_today() {
        let parsed = parse_clock_in(Some("09:30")).unwrap();
        let local = parsed.with_timezone(&Local);
        assert_eq!(local.date_naive(), Local::now().date_naive());
    }

    #[test]
    fn garbage_clock_in_is_rejected() {
        assert!(parse_clock_in(Some("not a time")).is_err());
    }
}
