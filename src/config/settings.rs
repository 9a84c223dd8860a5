use serde::Deserialize;

use crate::notify::UnpublishSnapshot;

/// Top-level configuration settings for the application.
///
/// Includes settings for the record store, notifications, and logging.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub store: StoreSettings,
    pub notify: NotifySettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Sled,
}

/// Where mutation handlers keep their records.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    /// sled database directory; ignored by the memory backend.
    pub path: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct NotifySettings {
    pub unpublish_snapshot: UnpublishSnapshot,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Every field is optional; `Settings::merged` fills the gaps with defaults.
#[derive(Debug, Deserialize, Default)]
pub struct PartialSettings {
    pub store: Option<PartialStoreSettings>,
    pub notify: Option<PartialNotifySettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialStoreSettings {
    pub backend: Option<StoreBackend>,
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialNotifySettings {
    pub unpublish_snapshot: Option<UnpublishSnapshot>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store: StoreSettings {
                backend: StoreBackend::Memory,
                path: "blogsub_db".to_string(),
            },
            notify: NotifySettings {
                unpublish_snapshot: UnpublishSnapshot::After,
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl Settings {
    /// Fills every field missing from `partial` with the default value.
    pub fn merged(partial: PartialSettings) -> Self {
        let default = Settings::default();
        let store = partial.store;
        let notify = partial.notify;
        let log = partial.log;

        Settings {
            store: StoreSettings {
                backend: store
                    .as_ref()
                    .and_then(|s| s.backend)
                    .unwrap_or(default.store.backend),
                path: store
                    .and_then(|s| s.path)
                    .unwrap_or(default.store.path),
            },
            notify: NotifySettings {
                unpublish_snapshot: notify
                    .and_then(|n| n.unpublish_snapshot)
                    .unwrap_or(default.notify.unpublish_snapshot),
            },
            log: LogSettings {
                level: log.and_then(|l| l.level).unwrap_or(default.log.level),
            },
        }
    }
}
