//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`] and [`StoragePort`]. Config blobs are encoded
//! with `postcard` — compact, schema-stable, and cheap to decode at boot.
//!
//! - **`target_os = "espidf"`** — backed by the default NVS partition via
//!   `esp_idf_svc::nvs` (atomic commits come from ESP-IDF natively).
//! - **all other targets** — an in-memory map for host runs and tests.

use log::info;

use crate::config::KioskConfig;
use crate::kiosk::ports::{ConfigError, ConfigPort, StorageError, StoragePort};

#[cfg(not(target_os = "espidf"))]
use std::cell::RefCell;
#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

const CONFIG_NAMESPACE: &str = "scanpoint";
const CONFIG_KEY: &str = "kioskcfg";
const MAX_BLOB_SIZE: usize = 1024;

pub struct NvsStore {
    #[cfg(target_os = "espidf")]
    nvs: RefCellEspNvs,
    #[cfg(not(target_os = "espidf"))]
    store: RefCell<HashMap<String, Vec<u8>>>,
}

#[cfg(target_os = "espidf")]
type RefCellEspNvs = core::cell::RefCell<
    esp_idf_svc::nvs::EspNvs<esp_idf_svc::nvs::NvsDefault>,
>;

impl NvsStore {
    /// Create the store and initialise the backing partition.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs};

            let partition = EspDefaultNvsPartition::take().map_err(|_| ConfigError::IoError)?;
            let nvs =
                EspNvs::new(partition, CONFIG_NAMESPACE, true).map_err(|_| ConfigError::IoError)?;
            info!("NvsStore: ESP-IDF NVS initialised");
            Ok(Self {
                nvs: core::cell::RefCell::new(nvs),
            })
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("NvsStore: in-memory backend");
            Ok(Self {
                store: RefCell::new(HashMap::new()),
            })
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{namespace}::{key}")
    }
}

// ───────────────────────────────────────────────────────────────
// Config validation
// ───────────────────────────────────────────────────────────────

fn validate_config(cfg: &KioskConfig) -> Result<(), ConfigError> {
    if !(1_000..=120_000).contains(&cfg.automation_timeout_ms) {
        return Err(ConfigError::ValidationFailed(
            "automation_timeout_ms must be 1000-120000",
        ));
    }
    if !(500..=60_000).contains(&cfg.scan_timeout_ms) {
        return Err(ConfigError::ValidationFailed(
            "scan_timeout_ms must be 500-60000",
        ));
    }
    if cfg.automation_timeout_ms <= cfg.lighting_run_time_ms {
        return Err(ConfigError::ValidationFailed(
            "automation_timeout_ms must exceed lighting_run_time_ms",
        ));
    }
    if cfg.fixed_delay_hold_ms >= cfg.automation_timeout_ms {
        return Err(ConfigError::ValidationFailed(
            "fixed_delay_hold_ms must be below automation_timeout_ms",
        ));
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// ConfigPort
// ───────────────────────────────────────────────────────────────

impl ConfigPort for NvsStore {
    fn load(&self) -> Result<KioskConfig, ConfigError> {
        let mut buf = [0u8; MAX_BLOB_SIZE];
        match self.read(CONFIG_NAMESPACE, CONFIG_KEY, &mut buf) {
            Ok(len) => postcard::from_bytes(&buf[..len]).map_err(|_| ConfigError::Corrupted),
            Err(StorageError::NotFound) => Err(ConfigError::NotFound),
            Err(_) => Err(ConfigError::IoError),
        }
    }

    fn save(&self, config: &KioskConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;

        #[cfg(target_os = "espidf")]
        {
            self.nvs
                .borrow_mut()
                .set_blob(CONFIG_KEY, &bytes)
                .map_err(|_| ConfigError::IoError)
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.store
                .borrow_mut()
                .insert(Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY), bytes);
            Ok(())
        }
    }
}

// ───────────────────────────────────────────────────────────────
// StoragePort
// ───────────────────────────────────────────────────────────────

impl StoragePort for NvsStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            let _ = namespace; // one namespace per EspNvs handle
            match self.nvs.borrow_mut().get_blob(key, buf) {
                Ok(Some(data)) => Ok(data.len()),
                Ok(None) => Err(StorageError::NotFound),
                Err(_) => Err(StorageError::IoError),
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let store = self.store.borrow();
            match store.get(&Self::composite_key(namespace, key)) {
                Some(v) => {
                    let n = v.len().min(buf.len());
                    buf[..n].copy_from_slice(&v[..n]);
                    Ok(n)
                }
                None => Err(StorageError::NotFound),
            }
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if data.len() > MAX_BLOB_SIZE {
            return Err(StorageError::Full);
        }

        #[cfg(target_os = "espidf")]
        {
            let _ = namespace;
            self.nvs
                .borrow_mut()
                .set_blob(key, data)
                .map_err(|_| StorageError::IoError)
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.store
                .borrow_mut()
                .insert(Self::composite_key(namespace, key), data.to_vec());
            Ok(())
        }
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        #[cfg(target_os = "espidf")]
        {
            let _ = namespace;
            let _ = self.nvs.borrow_mut().remove(key);
            Ok(())
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.store
                .borrow_mut()
                .remove(&Self::composite_key(namespace, key));
            Ok(())
        }
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        #[cfg(target_os = "espidf")]
        {
            let _ = namespace;
            matches!(self.nvs.borrow_mut().blob_len(key), Ok(Some(_)))
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.store
                .borrow()
                .contains_key(&Self::composite_key(namespace, key))
        }
    }
}
