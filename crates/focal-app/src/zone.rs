use chrono_tz::Tz;
use focal_core::config::Settings;
use focal_rfc::ical::expand::TimeZoneResolver;

use crate::error::AppResult;

/// ## Summary
/// Picks the display timezone: the configured one if set, otherwise the
/// system zone, otherwise UTC. Resolved once at startup.
///
/// ## Errors
/// Returns an error if the configured timezone is unknown.
pub fn resolve_display_zone(settings: &Settings) -> AppResult<Tz> {
    let mut resolver = TimeZoneResolver::new();

    if let Some(name) = settings.display.timezone.as_deref() {
        let tz = resolver
            .resolve(name)
            .map_err(focal_rfc::error::RfcError::from)?;
        tracing::debug!(timezone = %tz, "Using configured display timezone");
        return Ok(tz);
    }

    match iana_time_zone::get_timezone() {
        Ok(name) => match resolver.resolve(&name) {
            Ok(tz) => {
                tracing::debug!(timezone = %tz, "Using system timezone");
                Ok(tz)
            }
            Err(err) => {
                tracing::warn!(system = %name, error = %err, "Unknown system timezone, using UTC");
                Ok(Tz::UTC)
            }
        },
        Err(err) => {
            tracing::warn!(error = %err, "Cannot determine system timezone, using UTC");
            Ok(Tz::UTC)
        }
    }
}
