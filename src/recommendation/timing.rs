//! Application Timing
//!
//! Ordered threshold rules turning current humidity and temperature into
//! a single application advisory. First matching rule wins and all
//! comparisons are strict, so a boundary value falls through to the next
//! rule.

const HUMID_ABOVE: f64 = 80.0;
const DRY_BELOW: f64 = 30.0;
const HOT_ABOVE: f64 = 30.0;
const COLD_BELOW: f64 = 10.0;

/// Application advisory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationTiming {
    /// humidity > 80%
    WaitForDrierConditions,
    /// humidity < 30%
    OffPeakHours,
    /// temperature > 30°C
    CoolerPartOfDay,
    /// temperature < 10°C
    WaitForWarmerConditions,
    Suitable,
}

impl ApplicationTiming {
    pub fn assess(humidity: f64, temperature: f64) -> Self {
        if humidity > HUMID_ABOVE {
            ApplicationTiming::WaitForDrierConditions
        } else if humidity < DRY_BELOW {
            ApplicationTiming::OffPeakHours
        } else if temperature > HOT_ABOVE {
            ApplicationTiming::CoolerPartOfDay
        } else if temperature < COLD_BELOW {
            ApplicationTiming::WaitForWarmerConditions
        } else {
            ApplicationTiming::Suitable
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            ApplicationTiming::WaitForDrierConditions => "Wait for drier conditions before application",
            ApplicationTiming::OffPeakHours => "Early morning or evening application recommended",
            ApplicationTiming::CoolerPartOfDay => "Apply during cooler parts of the day",
            ApplicationTiming::WaitForWarmerConditions => "Wait for warmer conditions for optimal nutrient uptake",
            ApplicationTiming::Suitable => "Current conditions are suitable for fertilizer application",
        }
    }
}

/// Advisory text for the given humidity (%) and temperature (°C)
///
/// # Examples
/// ```
/// use soil_sync::recommendation::advise_timing;
///
/// assert_eq!(advise_timing(85.0, 20.0), "Wait for drier conditions before application");
/// assert_eq!(advise_timing(80.0, 20.0), "Current conditions are suitable for fertilizer application");
/// ```
pub fn advise_timing(humidity: f64, temperature: f64) -> &'static str {
    ApplicationTiming::assess(humidity, temperature).display_text()
}
