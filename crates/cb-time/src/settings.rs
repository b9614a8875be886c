//! Global valuation settings.
//!
//! [`Settings`] holds the process-wide defaults every valuation falls back
//! to when a caller does not override them:
//!
//! * the **evaluation date**: the date at which calculations are performed
//!   (today's date when unset);
//! * **include reference-date events**: whether a cash flow paid exactly on
//!   the reference (settlement) date still counts as pending.
//!
//! The singleton is lazily created through a `OnceLock`; both fields can be
//! changed from any thread.  Code that mutates the settings temporarily should
//! hold a [`SavedSettings`] guard, which restores the previous values on drop.
//! Guards are exclusive: a second guard blocks until the first is dropped, so
//! never create two on the same thread.

use crate::date::Date;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError, RwLock};

/// Process-wide settings used by the valuation stack.
#[derive(Debug)]
pub struct Settings {
    evaluation_date: RwLock<Option<Date>>,
    include_reference_date_events: AtomicBool,
}

static INSTANCE: OnceLock<Settings> = OnceLock::new();
static GUARD: Mutex<()> = Mutex::new(());

impl Settings {
    /// Return a reference to the global singleton.
    pub fn instance() -> &'static Settings {
        INSTANCE.get_or_init(|| Settings {
            evaluation_date: RwLock::new(None),
            include_reference_date_events: AtomicBool::new(false),
        })
    }

    /// The current evaluation date; today's date if none has been set.
    pub fn evaluation_date(&self) -> Date {
        self.evaluation_date
            .read()
            .expect("Settings lock poisoned")
            .unwrap_or_else(Date::today)
    }

    /// The explicitly configured evaluation date, if any.
    pub fn explicit_evaluation_date(&self) -> Option<Date> {
        *self.evaluation_date.read().expect("Settings lock poisoned")
    }

    /// Fix the evaluation date.
    pub fn set_evaluation_date(&self, date: Date) {
        *self.evaluation_date.write().expect("Settings lock poisoned") = Some(date);
    }

    /// Clear the evaluation date, reverting to "use today".
    pub fn reset_evaluation_date(&self) {
        *self.evaluation_date.write().expect("Settings lock poisoned") = None;
    }

    /// Whether cash flows paid on the reference date are still pending.
    /// Defaults to `false`.
    pub fn include_reference_date_events(&self) -> bool {
        self.include_reference_date_events.load(Ordering::SeqCst)
    }

    /// Change the reference-date-events default.
    pub fn set_include_reference_date_events(&self, include: bool) {
        self.include_reference_date_events
            .store(include, Ordering::SeqCst);
    }
}

/// RAII guard restoring the global [`Settings`] to the values they had
/// when the guard was created.
#[derive(Debug)]
#[must_use = "settings are restored when the guard is dropped"]
pub struct SavedSettings {
    evaluation_date: Option<Date>,
    include_reference_date_events: bool,
    _exclusive: MutexGuard<'static, ()>,
}

impl SavedSettings {
    /// Wait for any other guard to be dropped, then snapshot the current
    /// settings.
    pub fn new() -> Self {
        let exclusive = GUARD.lock().unwrap_or_else(PoisonError::into_inner);
        let s = Settings::instance();
        Self {
            evaluation_date: s.explicit_evaluation_date(),
            include_reference_date_events: s.include_reference_date_events(),
            _exclusive: exclusive,
        }
    }
}

impl Default for SavedSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SavedSettings {
    fn drop(&mut self) {
        let s = Settings::instance();
        match self.evaluation_date {
            Some(d) => s.set_evaluation_date(d),
            None => s.reset_evaluation_date(),
        }
        s.set_include_reference_date_events(self.include_reference_date_events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_settings_restore_on_drop() {
        let guard = SavedSettings::new();
        let before = Settings::instance().explicit_evaluation_date();
        let flag_before = Settings::instance().include_reference_date_events();
        let d = Date::from_ymd(2031, 5, 17).unwrap();
        Settings::instance().set_evaluation_date(d);
        Settings::instance().set_include_reference_date_events(!flag_before);
        assert_eq!(Settings::instance().evaluation_date(), d);
        drop(guard);

        let _check = SavedSettings::new();
        assert_eq!(Settings::instance().explicit_evaluation_date(), before);
        assert_eq!(
            Settings::instance().include_reference_date_events(),
            flag_before
        );
    }
}
