//! CLI command implementations.

pub mod calendar;
pub mod expirations;
pub mod load;
pub mod pull;
pub mod reconcile;

// Re-export submodules for convenience
pub use calendar::CalendarArgs;
pub use expirations::ExpirationsArgs;
pub use load::LoadArgs;
pub use pull::PullArgs;
pub use reconcile::ReconcileArgs;

use anyhow::{Context as _, Result};

use divyield_config::PipelineConfig;
use divyield_core::calendars::{Calendar, HolidayListCalendar, Market};
use divyield_core::expirations::ExpirationGenerator;
use divyield_core::reconcile::MaturityReconciler;
use divyield_core::Date;

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub config: PipelineConfig,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Context {
    /// Date range from flags, falling back to the configuration.
    pub fn date_range(&self, start: Option<Date>, end: Option<Date>) -> CliResult<(Date, Date)> {
        let start = start.or(self.config.start_date).ok_or_else(|| {
            CliError::MissingArgument("--start (or start_date in the configuration)".into())
        })?;
        let end = end.or(self.config.end_date).ok_or_else(|| {
            CliError::MissingArgument("--end (or end_date in the configuration)".into())
        })?;
        if start > end {
            return Err(CliError::InvalidRange { start, end });
        }
        Ok((start, end))
    }

    /// Trading calendar: an explicit market flag wins, then a configured
    /// holiday file, then the configured market.
    pub fn calendar(&self, market: Option<Market>) -> Result<CalendarChoice> {
        if let Some(market) = market {
            return Ok(CalendarChoice::Builtin(market));
        }
        match &self.config.calendar_file {
            Some(path) => {
                let calendar = HolidayListCalendar::from_json_file(path)
                    .with_context(|| format!("loading calendar {}", path.display()))?;
                Ok(CalendarChoice::File(calendar))
            }
            None => Ok(CalendarChoice::Builtin(self.config.market)),
        }
    }

    /// Expiration generator configured from the pipeline settings.
    pub fn generator<'a>(&self, calendar: &'a dyn Calendar) -> ExpirationGenerator<'a> {
        ExpirationGenerator::new(calendar)
            .with_day_rule(self.config.day_rule)
            .with_max_adjustment_days(self.config.max_adjustment_days)
    }

    /// Maturity reconciler configured from the pipeline settings.
    pub fn reconciler<'a>(&self, calendar: &'a dyn Calendar) -> MaturityReconciler<'a> {
        MaturityReconciler::from_generator(self.generator(calendar))
            .with_maturities_per_date(self.config.maturities_per_date)
    }
}

/// A built-in market calendar or one loaded from a holiday file.
pub enum CalendarChoice {
    Builtin(Market),
    File(HolidayListCalendar),
}

impl CalendarChoice {
    pub fn as_calendar(&self) -> &dyn Calendar {
        match self {
            CalendarChoice::Builtin(market) => market.calendar(),
            CalendarChoice::File(calendar) => calendar,
        }
    }
}

/// Prints the effective configuration as TOML.
pub fn show_config(ctx: &Context) -> Result<()> {
    print!("{}", ctx.config.to_toml_string()?);
    Ok(())
}
