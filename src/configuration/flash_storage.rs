use std::ffi::CString;

use esp_idf_svc::sys::{
    esp, esp_vfs_fat_mount_config_t, esp_vfs_fat_spiflash_mount_rw_wl,
    esp_vfs_fat_spiflash_unmount_rw_wl, wl_handle_t,
};
use log::{error, info};

use super::storage::FileStorage;

pub const MOUNT_POINT: &str = "/settings";
const PARTITION_LABEL: &str = "storage";

/// Wear-levelled FAT partition mounted on [`MOUNT_POINT`]. Unmounted on drop.
pub struct SettingsPartition {
    base_path: CString,
    wl_handle: wl_handle_t,
}

impl SettingsPartition {
    pub fn mount() -> anyhow::Result<Self> {
        let base_path = CString::new(MOUNT_POINT)?;
        let label = CString::new(PARTITION_LABEL)?;
        let mount_config = esp_vfs_fat_mount_config_t {
            format_if_mount_failed: true,
            max_files: 4,
            allocation_unit_size: 4096,
            ..Default::default()
        };
        let mut wl_handle: wl_handle_t = 0;

        esp!(unsafe {
            esp_vfs_fat_spiflash_mount_rw_wl(
                base_path.as_ptr(),
                label.as_ptr(),
                &mount_config,
                &mut wl_handle,
            )
        })
        .map_err(|e| {
            error!("Failed to mount {}: {}", MOUNT_POINT, e);
            e
        })?;

        info!("Settings partition mounted on {}", MOUNT_POINT);

        Ok(Self {
            base_path,
            wl_handle,
        })
    }

    /// Storage rooted at `/`, so `/settings/sen/...` lands on this partition.
    pub fn storage(&self) -> FileStorage {
        FileStorage::new("/")
    }
}

impl Drop for SettingsPartition {
    fn drop(&mut self) {
        unsafe {
            esp_vfs_fat_spiflash_unmount_rw_wl(self.base_path.as_ptr(), self.wl_handle);
        }
    }
}
