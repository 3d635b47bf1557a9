//! Turns one appointment center into at most one announcement.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::models::{Announcement, AppointmentCenter, Coordinate, SlotIdentity};

pub fn extract(
    center: &AppointmentCenter,
    min_doses: u32,
    timezone: Tz,
    now: DateTime<Utc>,
) -> Option<Announcement> {
    if !center.appointment_schedules.iter().any(|s| s.is_chronodose()) {
        return None;
    }

    let doses = center.chronodose_count();
    if doses == 0 || doses < min_doses {
        return None;
    }

    let Some(raw_next) = center.next_appointment.as_deref() else {
        tracing::debug!(center = %center.url, "no next appointment, skipping");
        return None;
    };
    let Some(next) = center.next_appointment_at() else {
        tracing::debug!(center = %center.url, raw = %raw_next, "unparseable next appointment, skipping");
        return None;
    };

    let when = relative_date(next.with_timezone(&timezone), now.with_timezone(&timezone));

    Some(Announcement {
        identity: SlotIdentity::new(&center.url, raw_next, doses),
        message: compose_message(center, doses, &when),
        coordinate: Coordinate {
            latitude: center.location.latitude,
            longitude: center.location.longitude,
        },
    })
}

/// "aujourd'hui à 9:05", "demain à 14:30" or "le 24/05/2021 à 8:00",
/// by calendar day in the given zone.
pub fn relative_date(at: DateTime<Tz>, now: DateTime<Tz>) -> String {
    let time = at.format("%-H:%M");
    match (at.date_naive() - now.date_naive()).num_days() {
        0 => format!("aujourd'hui à {time}"),
        1 => format!("demain à {time}"),
        _ => format!("le {} à {time}", at.format("%d/%m/%Y")),
    }
}

pub fn compose_message(center: &AppointmentCenter, doses: u32, when: &str) -> String {
    let intro = if doses == 1 {
        format!("{doses} dose est disponible {when}")
    } else {
        format!("{doses} doses sont disponibles {when}")
    };

    let place = match center.vaccine_types() {
        [] => format!("à {}", center.name),
        types => format!("à {} ({})", center.name, types.join(", ")),
    };

    format!("{intro}\n{place}\n{}\n{}", center.url, center.metadata.address)
}

/// Whether the next appointment falls within `max_hours_ahead` of `now`.
/// No limit, or no parseable date, lets the center through.
pub fn within_horizon(
    center: &AppointmentCenter,
    max_hours_ahead: Option<u32>,
    now: DateTime<Utc>,
) -> bool {
    let (Some(hours), Some(next)) = (max_hours_ahead, center.next_appointment_at()) else {
        return true;
    };
    next.with_timezone(&Utc) - now <= Duration::hours(i64::from(hours))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::Europe::Paris;

    use super::*;
    use crate::models::{AppointmentSchedule, CenterLocation, CenterMetadata};

    fn schedule(name: &str, total: u32) -> AppointmentSchedule {
        AppointmentSchedule {
            name: name.to_string(),
            from: String::new(),
            to: String::new(),
            total,
        }
    }

    fn make_center(schedules: Vec<AppointmentSchedule>) -> AppointmentCenter {
        AppointmentCenter {
            name: "Centre Mériadeck".to_string(),
            url: "https://partners.doctolib.fr/meriadeck".to_string(),
            location: CenterLocation {
                latitude: 44.838,
                longitude: -0.586,
                city: "Bordeaux".to_string(),
            },
            metadata: CenterMetadata {
                address: "5 rue Jean Fleuret, 33000 Bordeaux".to_string(),
            },
            appointment_schedules: schedules,
            next_appointment: Some("2021-05-20T14:30:00+02:00".to_string()),
            vaccine_types: Some(vec!["Pfizer-BioNTech".to_string()]),
        }
    }

    fn paris(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        Paris.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    /// 2021-05-20 08:00 in Paris.
    fn morning_of_appointment() -> DateTime<Utc> {
        paris(2021, 5, 20, 8, 0).with_timezone(&Utc)
    }

    #[test]
    fn test_threshold_below_and_above() {
        let center = make_center(vec![schedule("chronodose", 3)]);
        assert!(extract(&center, 2, Paris, morning_of_appointment()).is_some());
        assert!(extract(&center, 3, Paris, morning_of_appointment()).is_some());
        assert!(extract(&center, 4, Paris, morning_of_appointment()).is_none());
    }

    #[test]
    fn test_no_chronodose_entry() {
        let center = make_center(vec![schedule("1_days", 12)]);
        assert!(extract(&center, 0, Paris, morning_of_appointment()).is_none());
    }

    #[test]
    fn test_zero_chronodoses() {
        let center = make_center(vec![schedule("chronodose", 0)]);
        assert!(extract(&center, 0, Paris, morning_of_appointment()).is_none());
    }

    #[test]
    fn test_sums_every_chronodose_bucket() {
        let center = make_center(vec![
            schedule("chronodose", 2),
            schedule("7_days", 40),
            schedule("chronodose", 1),
        ]);
        let a = extract(&center, 0, Paris, morning_of_appointment()).unwrap();
        assert!(a.message.starts_with("3 doses sont disponibles"));
        assert_eq!(
            a.identity.as_str(),
            "https://partners.doctolib.fr/meriadeck - 2021-05-20T14:30:00+02:00 - 3"
        );
    }

    #[test]
    fn test_identity_stable_across_calls() {
        let center = make_center(vec![schedule("chronodose", 2)]);
        let first = extract(&center, 0, Paris, morning_of_appointment()).unwrap();
        let later = paris(2021, 5, 21, 9, 0).with_timezone(&Utc);
        let second = extract(&center, 0, Paris, later).unwrap();
        assert_eq!(first.identity, second.identity);
    }

    #[test]
    fn test_singular_message() {
        let center = make_center(vec![schedule("chronodose", 1)]);
        let a = extract(&center, 0, Paris, morning_of_appointment()).unwrap();
        assert_eq!(
            a.message,
            "1 dose est disponible aujourd'hui à 14:30\n\
             à Centre Mériadeck (Pfizer-BioNTech)\n\
             https://partners.doctolib.fr/meriadeck\n\
             5 rue Jean Fleuret, 33000 Bordeaux"
        );
        assert_eq!(a.coordinate.latitude, 44.838);
        assert_eq!(a.coordinate.longitude, -0.586);
    }

    #[test]
    fn test_message_without_vaccine_types() {
        let mut center = make_center(vec![schedule("chronodose", 2)]);
        center.vaccine_types = None;
        let a = extract(&center, 0, Paris, morning_of_appointment()).unwrap();
        assert!(a.message.contains("\nà Centre Mériadeck\n"));
    }

    #[test]
    fn test_multiple_vaccine_types_joined() {
        let mut center = make_center(vec![schedule("chronodose", 2)]);
        center.vaccine_types = Some(vec!["Pfizer-BioNTech".to_string(), "Moderna".to_string()]);
        let a = extract(&center, 0, Paris, morning_of_appointment()).unwrap();
        assert!(a.message.contains("(Pfizer-BioNTech, Moderna)"));
    }

    #[test]
    fn test_missing_or_bad_next_appointment_skips() {
        let mut center = make_center(vec![schedule("chronodose", 2)]);
        center.next_appointment = None;
        assert!(extract(&center, 0, Paris, morning_of_appointment()).is_none());
        center.next_appointment = Some("demain".to_string());
        assert!(extract(&center, 0, Paris, morning_of_appointment()).is_none());
    }

    #[test]
    fn test_relative_date_cases() {
        let now = paris(2021, 5, 20, 8, 0);
        assert_eq!(relative_date(paris(2021, 5, 20, 9, 5), now), "aujourd'hui à 9:05");
        assert_eq!(relative_date(paris(2021, 5, 21, 14, 30), now), "demain à 14:30");
        assert_eq!(relative_date(paris(2021, 5, 24, 8, 0), now), "le 24/05/2021 à 8:00");
        assert_eq!(relative_date(paris(2021, 5, 19, 23, 0), now), "le 19/05/2021 à 23:00");
    }

    #[test]
    fn test_relative_date_uses_configured_zone() {
        // 23:30 UTC on the 19th is already the 20th in Paris.
        let mut center = make_center(vec![schedule("chronodose", 2)]);
        center.next_appointment = Some("2021-05-19T23:30:00Z".to_string());
        let a = extract(&center, 0, Paris, morning_of_appointment()).unwrap();
        assert!(a.message.contains("aujourd'hui à 1:30"), "{}", a.message);
    }

    #[test]
    fn test_within_horizon() {
        let center = make_center(vec![schedule("chronodose", 2)]);
        let now = morning_of_appointment();
        assert!(within_horizon(&center, None, now));
        assert!(within_horizon(&center, Some(24), now));
        assert!(!within_horizon(&center, Some(6), now));
    }
}
