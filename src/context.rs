//! Service context bundling the port trait objects.

use std::path::Path;
use std::sync::Arc;

use chrono::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::adapters::live::{
    HttpClassifier, HttpScheduleLookup, LiveClock, LogNotifier, WebhookNotifier,
};
use crate::adapters::recording::{RecordingClassifier, RecordingClock, RecordingScheduleLookup};
use crate::adapters::replaying::{ReplayingClassifier, ReplayingClock, ReplayingScheduleLookup};
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::classify::model::{ContinueRequest, StartRequest};
use crate::config::AppConfig;
use crate::ports::{
    ClassifierApi, ClassifyFuture, Clock, HostNotifier, LookupFuture, ScheduleLookup,
};
use crate::session::VendorSessionStore;

/// Every external boundary the commands talk to.
///
/// Constructors wire live, recording or replaying adapters; commands only
/// see the traits.
pub struct ServiceContext {
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Vendor classification API.
    pub classifier: Box<dyn ClassifierApi>,
    /// Schedule B lookup.
    pub schedule: Box<dyn ScheduleLookup>,
    /// Host notification for selected codes.
    pub notifier: Box<dyn HostNotifier>,
}

impl ServiceContext {
    /// Live adapters talking to the configured vendor endpoints.
    ///
    /// A fresh client session key is generated so that vendor cookies from
    /// other sessions are never reused.
    #[must_use]
    pub fn live(config: &AppConfig) -> Self {
        Self::wire(config, Arc::new(LiveClock), |classifier, schedule| (classifier, schedule))
    }

    /// Live adapters wrapped in recorders writing under `base`.
    ///
    /// The caller must drop the context before finishing the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette directory cannot be created.
    pub fn recording_at(
        config: &AppConfig,
        base: &Path,
    ) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new_in(base)?;
        let clock: Arc<dyn Clock> =
            Arc::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&session.clock)));

        let ctx = Self::wire(config, clock, |classifier, schedule| {
            let classifier: Box<dyn ClassifierApi> =
                Box::new(RecordingClassifier::new(classifier, Arc::clone(&session.classifier)));
            let schedule: Box<dyn ScheduleLookup> =
                Box::new(RecordingScheduleLookup::new(schedule, Arc::clone(&session.schedule)));
            (classifier, schedule)
        });
        debug!(dir = %session.output_dir().display(), "recording port traffic");
        Ok((ctx, session))
    }

    /// Replays every port from a single cassette.
    ///
    /// Each port gets its own replayer so their cursors are independent.
    /// Notifications are only logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        Ok(Self {
            clock: Arc::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
            classifier: Box::new(ReplayingClassifier::new(CassetteReplayer::new(&cassette))),
            schedule: Box::new(ReplayingScheduleLookup::new(CassetteReplayer::new(&cassette))),
            notifier: Box::new(LogNotifier),
        })
    }

    /// Replays from per-port cassettes; unconfigured ports panic when used.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        Ok(Self {
            clock: match replayers.clock {
                Some(r) => Arc::new(ReplayingClock::new(r)),
                None => Arc::new(PanickingClock),
            },
            classifier: match replayers.classifier {
                Some(r) => Box::new(ReplayingClassifier::new(r)),
                None => Box::new(PanickingClassifier),
            },
            schedule: match replayers.schedule {
                Some(r) => Box::new(ReplayingScheduleLookup::new(r)),
                None => Box::new(PanickingScheduleLookup),
            },
            notifier: Box::new(LogNotifier),
        })
    }

    /// Replaces the host notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Box<dyn HostNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    fn wire<F>(config: &AppConfig, clock: Arc<dyn Clock>, decorate: F) -> Self
    where
        F: FnOnce(
            Box<dyn ClassifierApi>,
            Box<dyn ScheduleLookup>,
        ) -> (Box<dyn ClassifierApi>, Box<dyn ScheduleLookup>),
    {
        let ttl = Duration::seconds(config.vendor.session_ttl_secs);
        let sessions = Arc::new(VendorSessionStore::new(ttl, Arc::clone(&clock)));
        let client_key = Uuid::new_v4().to_string();

        let (classifier, schedule) = decorate(
            Box::new(HttpClassifier::new(&config.vendor, Arc::clone(&sessions), &client_key)),
            Box::new(HttpScheduleLookup::new(&config.vendor, sessions, &client_key)),
        );
        let notifier: Box<dyn HostNotifier> = match &config.notify_url {
            Some(url) => Box::new(WebhookNotifier::new(url)),
            None => Box::new(LogNotifier),
        };

        Self { clock, classifier, schedule, notifier }
    }
}

// --- Panicking adapters for unconfigured ports ---

struct PanickingClock;
impl Clock for PanickingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        panic!("Clock port not configured in CassetteConfig: no cassette loaded for clock");
    }
}

struct PanickingClassifier;
impl ClassifierApi for PanickingClassifier {
    fn start(&self, _request: &StartRequest) -> ClassifyFuture<'_> {
        panic!(
            "ClassifierApi port not configured in CassetteConfig: no cassette loaded for classifier"
        );
    }

    fn resume(&self, _request: &ContinueRequest) -> ClassifyFuture<'_> {
        panic!(
            "ClassifierApi port not configured in CassetteConfig: no cassette loaded for classifier"
        );
    }
}

struct PanickingScheduleLookup;
impl ScheduleLookup for PanickingScheduleLookup {
    fn find(&self, _hs_code: &str) -> LookupFuture<'_> {
        panic!(
            "ScheduleLookup port not configured in CassetteConfig: no cassette loaded for schedule"
        );
    }
}
