use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Part of the filesystem under reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// The whole installation root
    #[default]
    System,
    /// Only `<root>/etc`
    Etc,
}

/// Volatile or machine-generated paths on a full system.
const SYSTEM_IGNORE_GLOBS: &[&str] = &[
    "/boot/grub/*stage*",
    "/boot/initramfs-linux-fallback.img",
    "/boot/initramfs-linux.img",
    "/dev/*",
    "/etc/.pwd.lock",
    "/etc/group",
    "/etc/group-",
    "/etc/gshadow",
    "/etc/gshadow-",
    "/etc/ld.so.cache",
    "/etc/mtab",
    "/etc/pacman.d/gnupg/*",
    "/etc/passwd",
    "/etc/passwd-",
    "/etc/profile.d/locale.sh",
    "/etc/rndc.key",
    "/etc/shadow",
    "/etc/shadow-",
    "/etc/shells",
    "/etc/ssh/ssh_host_*key*",
    "/etc/ssl/certs/*",
    "/home/*",
    "/lib/modules/*/modules*",
    "/proc/*",
    "/root/.bash_history",
    "/root/.ssh/authorized_keys2",
    "/root/.ssh/known_hosts",
    "/run/*",
    "/sys/*",
    "/tmp/*",
    "/usr/lib/gdk-pixbuf-2.0/2.10.0/loaders.cache",
    "/usr/lib/locale/locale-archive",
    "/usr/share/applications/mimeinfo.cache",
    "/usr/share/fonts/*/fonts.dir",
    "/usr/share/fonts/*/fonts.scale",
    "/usr/share/glib-2.0/schemas/gschemas.compiled",
    "/usr/share/info/dir",
    "/usr/share/mime/version",
    "/var/cache/fontconfig/*",
    "/var/cache/ldconfig/*",
    "/var/cache/man/*",
    "/var/cache/pacman/*",
    "/var/db/sudo/*",
    "/var/lib/dbus/machine-id",
    "/var/lib/dhcpcd/dhcpcd-eth0.lease",
    "/var/lib/hwclock/adjtime",
    "/var/lib/logrotate.status",
    "/var/lib/misc/random-seed",
    "/var/lib/mlocate/mlocate.db",
    "/var/lib/pacman/*",
    "/var/lib/postgres/data/*",
    "/var/lib/random-seed",
    "/var/lib/redis/dump.rdb",
    "/var/lib/sudo/*",
    "/var/lib/syslog-ng/syslog-ng.persist",
    "/var/lock",
    "/var/log/*",
    "/var/run",
    "/var/spool/*",
];

/// Generated files under `/etc` only.
const ETC_IGNORE_GLOBS: &[&str] = &[
    "/etc/group",
    "/etc/gshadow",
    "/etc/passwd",
    "/etc/shadow",
    "/etc/shells",
    "/etc/.pwd.lock",
    "/etc/group-",
    "/etc/gshadow-",
    "/etc/ld.so.cache",
    "/etc/pacman.d/gnupg/*",
    "/etc/passwd-",
    "/etc/profile.d/locale.sh",
    "/etc/rndc.key",
    "/etc/shadow-",
    "/etc/ssh/ssh_host_*key*",
    "/etc/ssl/certs/*",
];

impl Scope {
    /// Built-in ignore list for this scope.
    #[must_use]
    pub const fn default_ignore_globs(self) -> &'static [&'static str] {
        match self {
            Self::System => SYSTEM_IGNORE_GLOBS,
            Self::Etc => ETC_IGNORE_GLOBS,
        }
    }

    /// Record-name prefix of files inside the scope, `None` for everything.
    #[must_use]
    pub const fn name_prefix(self) -> Option<&'static str> {
        match self {
            Self::System => None,
            Self::Etc => Some("etc/"),
        }
    }

    /// Directory the filesystem walk starts from.
    #[must_use]
    pub fn walk_root(self, root: &Path) -> PathBuf {
        match self {
            Self::System => root.to_path_buf(),
            Self::Etc => root.join("etc"),
        }
    }

    /// True when the record `name` lies inside this scope.
    #[must_use]
    pub fn contains(self, name: &str) -> bool {
        self.name_prefix()
            .is_none_or(|prefix| name.starts_with(prefix))
    }
}
