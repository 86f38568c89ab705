// ABOUTME: Owns the believed Metal HUD state and drives reads/writes of the global preference.
// ABOUTME: Records outcomes in the activity log, raises the banner, and mirrors the local flag.

use std::path::PathBuf;

use hudtoggle_defaults::CommandRunner;

use crate::activity::{ActivityLog, Banner};
use crate::persistence;

pub struct HudController<R: CommandRunner> {
    runner: R,
    enabled: bool,
    log: ActivityLog,
    banner: Banner,
    local_flag_path: PathBuf,
}

impl<R: CommandRunner> HudController<R> {
    /// Read the preference once. Any failure leaves the HUD believed off.
    pub fn new(runner: R, local_flag_path: PathBuf) -> Self {
        let mut log = ActivityLog::default();
        let enabled = match hudtoggle_defaults::try_read_enabled(&runner) {
            Ok(enabled) => enabled,
            Err(e) => {
                log.warn(format!("Failed to check Metal HUD status: {e}"));
                false
            }
        };
        tracing::info!("Metal HUD initially {}", if enabled { "enabled" } else { "disabled" });

        Self {
            runner,
            enabled,
            log,
            banner: Banner::default(),
            local_flag_path,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[allow(dead_code)]
    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    /// Write the preference. On success the believed state follows and the
    /// banner generation to expire is returned; on failure nothing changes.
    pub fn set_enabled(&mut self, enable: bool) -> Option<u64> {
        match hudtoggle_defaults::write_enabled(&self.runner, enable) {
            Ok(()) => {
                self.enabled = enable;
                self.log.info(if enable {
                    "Metal HUD enabled."
                } else {
                    "Metal HUD disabled."
                });
                if let Err(e) = persistence::save_local_flag(&self.local_flag_path, enable) {
                    tracing::warn!("Failed to save local HUD flag: {e}");
                }
                Some(self.banner.show())
            }
            Err(e) => {
                self.log.warn(format!("Failed to toggle Metal HUD: {e}"));
                None
            }
        }
    }

    pub fn toggle(&mut self) -> Option<u64> {
        self.set_enabled(!self.enabled)
    }

    /// Re-write YES when the demo opens so apps launched since see the HUD.
    /// Returns whether a write was attempted and succeeded.
    pub fn reassert_on_demo_enter(&self) -> bool {
        if !self.enabled {
            return false;
        }
        match hudtoggle_defaults::write_enabled(&self.runner, true) {
            Ok(()) => {
                tracing::debug!("Re-asserted Metal HUD preference");
                true
            }
            Err(e) => {
                tracing::warn!("Failed to re-assert Metal HUD preference: {e}");
                false
            }
        }
    }

    /// The delayed second re-assert only runs when the app-local flag is set.
    pub fn should_schedule_reassert(&self) -> bool {
        persistence::load_local_flag(&self.local_flag_path)
    }

    pub fn expire_banner(&mut self, generation: u64) -> bool {
        self.banner.expire(generation)
    }
}
