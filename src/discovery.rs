//! Best-effort detection of local, cloud-synced and external storage roots.
//!
//! Probing never fails. A candidate that exists but cannot be listed is still
//! reported, flagged `accessible: false`.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::config::{LINUX_MOUNT_ROOTS, MACOS_VOLUMES_ROOT, SYSTEM_VOLUMES};
use crate::models::{LocationKind, StorageLocation};

/// Per-OS-family discovery of cloud and external locations.
pub trait PlatformProber: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    fn cloud_locations(&self) -> Vec<StorageLocation>;

    /// External volumes, excluding anything already reported in `cloud`.
    fn external_locations(&self, cloud: &[StorageLocation]) -> Vec<StorageLocation>;
}

pub struct LocationDiscoverer {
    home: Option<PathBuf>,
    prober: Box<dyn PlatformProber>,
}

impl LocationDiscoverer {
    pub fn new(home: Option<PathBuf>, prober: Box<dyn PlatformProber>) -> Self {
        Self { home, prober }
    }

    /// Discoverer for the running host.
    pub fn native() -> Self {
        let home = dirs::home_dir();
        let prober = native_prober(home.clone());
        Self::new(home, prober)
    }

    /// Home first, then cloud locations in table order, then external drives.
    pub fn discover(&self) -> Vec<StorageLocation> {
        let mut locations = Vec::new();

        if let Some(home) = &self.home {
            locations.push(StorageLocation {
                name: "Home Directory".to_string(),
                path: home.clone(),
                kind: LocationKind::Local,
                accessible: true,
                description: format!("User home directory ({})", home.display()),
            });
        }

        let cloud = self.prober.cloud_locations();
        let external = self.prober.external_locations(&cloud);
        debug!(
            prober = self.prober.name(),
            cloud = cloud.len(),
            external = external.len(),
            "Discovered storage locations"
        );

        locations.extend(cloud);
        locations.extend(external);
        locations
    }
}

pub fn native_prober(home: Option<PathBuf>) -> Box<dyn PlatformProber> {
    let Some(home) = home else {
        return Box::new(UnsupportedProber);
    };
    if cfg!(target_os = "macos") {
        Box::new(MacOsProber::new(home))
    } else if cfg!(target_os = "linux") {
        Box::new(LinuxProber::new(home))
    } else if cfg!(target_os = "windows") {
        Box::new(WindowsProber::new(home))
    } else {
        Box::new(UnsupportedProber)
    }
}

pub struct MacOsProber {
    pub home: PathBuf,
    pub volumes_root: PathBuf,
}

impl MacOsProber {
    pub fn new(home: PathBuf) -> Self {
        Self {
            home,
            volumes_root: PathBuf::from(MACOS_VOLUMES_ROOT),
        }
    }

    fn google_drive_candidates(&self) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = [
            "Google Drive",
            "GoogleDrive",
            "My Drive",
            "Google Drive File Stream",
            "GoogleDriveFileStream",
            "Google Drive for Desktop",
        ]
        .iter()
        .map(|name| self.home.join(name))
        .collect();

        candidates.extend(
            ["GoogleDrive", "Google Drive", "My Drive"]
                .iter()
                .map(|name| self.volumes_root.join(name)),
        );

        candidates.extend(
            list_subdirectories(&self.volumes_root)
                .into_iter()
                .filter(|volume| file_name_lossy(volume).to_lowercase().contains("google")),
        );

        candidates
    }
}

impl PlatformProber for MacOsProber {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn cloud_locations(&self) -> Vec<StorageLocation> {
        let mut locations = google_drive_locations(self.google_drive_candidates());

        let icloud = [
            self.home
                .join("Library")
                .join("Mobile Documents")
                .join("com~apple~CloudDocs"),
            self.home.join("iCloud Drive"),
            self.home.join("iCloudDrive"),
        ];
        if let Some(path) = icloud.into_iter().find(|path| path.exists()) {
            locations.push(probe_cloud("iCloud Drive".to_string(), "iCloud Drive", path));
        }

        locations.extend(common_sync_locations(&self.home));
        locations
    }

    fn external_locations(&self, cloud: &[StorageLocation]) -> Vec<StorageLocation> {
        list_subdirectories(&self.volumes_root)
            .into_iter()
            .filter(|volume| {
                let name = file_name_lossy(volume);
                !SYSTEM_VOLUMES.contains(&name.as_str())
                    && !name.to_lowercase().contains("google")
                    && !is_cloud_path(cloud, volume)
            })
            .map(|volume| external_location(volume, "External volume"))
            .collect()
    }
}

pub struct LinuxProber {
    pub home: PathBuf,
    pub mount_roots: Vec<PathBuf>,
}

impl LinuxProber {
    pub fn new(home: PathBuf) -> Self {
        Self {
            home,
            mount_roots: LINUX_MOUNT_ROOTS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl PlatformProber for LinuxProber {
    fn name(&self) -> &'static str {
        "linux"
    }

    fn cloud_locations(&self) -> Vec<StorageLocation> {
        let mut locations = google_drive_locations(standard_google_drive_candidates(&self.home));
        locations.extend(common_sync_locations(&self.home));
        locations
    }

    fn external_locations(&self, cloud: &[StorageLocation]) -> Vec<StorageLocation> {
        // Removable media is mounted one level below a per-user directory,
        // e.g. /media/<user>/<label>.
        self.mount_roots
            .iter()
            .flat_map(|root| list_subdirectories(root))
            .flat_map(|user_dir| list_subdirectories(&user_dir))
            .filter(|drive| !is_cloud_path(cloud, drive))
            .map(|drive| external_location(drive, "External drive"))
            .collect()
    }
}

/// Windows has no external-volume enumeration; only the sync folders are probed.
pub struct WindowsProber {
    pub home: PathBuf,
}

impl WindowsProber {
    pub fn new(home: PathBuf) -> Self {
        Self { home }
    }
}

impl PlatformProber for WindowsProber {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn cloud_locations(&self) -> Vec<StorageLocation> {
        let mut locations = google_drive_locations(standard_google_drive_candidates(&self.home));
        locations.extend(common_sync_locations(&self.home));
        locations
    }

    fn external_locations(&self, _cloud: &[StorageLocation]) -> Vec<StorageLocation> {
        Vec::new()
    }
}

pub struct UnsupportedProber;

impl PlatformProber for UnsupportedProber {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn cloud_locations(&self) -> Vec<StorageLocation> {
        Vec::new()
    }

    fn external_locations(&self, _cloud: &[StorageLocation]) -> Vec<StorageLocation> {
        Vec::new()
    }
}

fn standard_google_drive_candidates(home: &Path) -> Vec<PathBuf> {
    ["Google Drive", "GoogleDrive", "My Drive"]
        .iter()
        .map(|name| home.join(name))
        .collect()
}

fn google_drive_locations(candidates: Vec<PathBuf>) -> Vec<StorageLocation> {
    let mut seen: Vec<PathBuf> = Vec::new();
    let mut locations = Vec::new();
    for path in candidates {
        if !path.is_dir() || seen.contains(&path) {
            continue;
        }
        seen.push(path.clone());
        let name = format!("Google Drive ({})", file_name_lossy(&path));
        locations.push(probe_cloud(name, "Google Drive", path));
    }
    locations
}

/// Dropbox and OneDrive folders, in that order.
fn common_sync_locations(home: &Path) -> Vec<StorageLocation> {
    let dropbox = ["Dropbox", "Dropbox (Personal)", "Dropbox (Business)"]
        .iter()
        .map(|name| (home.join(name), "Dropbox"));
    let onedrive = ["OneDrive", "OneDrive - Personal", "OneDrive - Business"]
        .iter()
        .map(|name| (home.join(name), "OneDrive"));

    dropbox
        .chain(onedrive)
        .filter(|(path, _)| path.exists())
        .map(|(path, vendor)| {
            let name = format!("{} ({})", vendor, file_name_lossy(&path));
            probe_cloud(name, vendor, path)
        })
        .collect()
}

fn probe_cloud(name: String, vendor: &str, path: PathBuf) -> StorageLocation {
    match fs::read_dir(&path) {
        Ok(_) => StorageLocation {
            name,
            description: format!("{} sync folder ({})", vendor, path.display()),
            path,
            kind: LocationKind::Cloud,
            accessible: true,
        },
        Err(err) => {
            debug!(path = %path.display(), error = %err, "Cloud folder detected but not listable");
            StorageLocation {
                name: format!("{} - Access Denied", name),
                description: format!("{} detected but access denied ({})", vendor, path.display()),
                path,
                kind: LocationKind::Cloud,
                accessible: false,
            }
        }
    }
}

fn external_location(path: PathBuf, label: &str) -> StorageLocation {
    StorageLocation {
        name: format!("External Drive ({})", file_name_lossy(&path)),
        description: format!("{} ({})", label, path.display()),
        path,
        kind: LocationKind::External,
        accessible: true,
    }
}

fn is_cloud_path(cloud: &[StorageLocation], path: &Path) -> bool {
    cloud.iter().any(|location| location.path == path)
}

/// Directories directly below `root`, sorted by name. Unreadable roots yield nothing.
fn list_subdirectories(root: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            trace!(path = %root.display(), error = %err, "Skipping unreadable mount root");
            return Vec::new();
        }
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
