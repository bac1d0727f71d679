//! Device discovery — explicit paths or udev-tagged power buttons.

use std::path::{Path, PathBuf};

use super::{DeviceError, LocateError};

/// udev property marking a device as a power button source.
pub const POWER_BUTTON_PROPERTY: &str = "STEAMOS_POWER_BUTTON";

/// udev property excluding an otherwise tagged device.
pub const IGNORE_PROPERTY: &str = "STEAMOS_POWER_BUTTON_IGNORE";

/// A device reported by the enumeration service.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub syspath: PathBuf,
    pub devnode: Option<PathBuf>,
    /// The ignore property is present.
    pub ignored: bool,
}

/// Lists power button candidates.
pub trait Enumerator {
    fn scan(&self) -> Result<Vec<Candidate>, LocateError>;
}

/// Queries udev for `input` event nodes tagged as power buttons.
pub struct UdevEnumerator;

impl Enumerator for UdevEnumerator {
    fn scan(&self) -> Result<Vec<Candidate>, LocateError> {
        let mut enumerator = udev::Enumerator::new()?;
        enumerator.match_subsystem("input")?;
        enumerator.match_sysname("event*")?;
        enumerator.match_property(POWER_BUTTON_PROPERTY, "1")?;

        Ok(enumerator
            .scan_devices()?
            .map(|device| Candidate {
                syspath: device.syspath().to_path_buf(),
                devnode: device.devnode().map(Path::to_path_buf),
                ignored: device.property_value(IGNORE_PROPERTY).is_some(),
            })
            .collect())
    }
}

/// Finds and opens at most `max_devices` input sources.
pub struct DeviceLocator<E> {
    enumerator: E,
    max_devices: usize,
}

impl<E: Enumerator> DeviceLocator<E> {
    pub fn new(enumerator: E, max_devices: usize) -> Self {
        Self {
            enumerator,
            max_devices,
        }
    }

    /// Open explicit paths if any were given, otherwise discovered ones.
    ///
    /// Candidates that fail to open are skipped. Opening stops as soon as
    /// `max_devices` succeeded, later candidates are never touched. An
    /// empty result is not an error.
    pub fn locate<T>(
        &self,
        explicit: &[PathBuf],
        open: impl FnMut(&Path) -> Result<T, DeviceError>,
    ) -> Vec<T> {
        if explicit.is_empty() {
            self.discover(open)
        } else {
            self.open_explicit(explicit, open)
        }
    }

    fn open_explicit<T>(
        &self,
        paths: &[PathBuf],
        mut open: impl FnMut(&Path) -> Result<T, DeviceError>,
    ) -> Vec<T> {
        paths
            .iter()
            .filter_map(|path| match open(path) {
                Ok(device) => {
                    tracing::info!(path = %path.display(), "opened input device");
                    Some(device)
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping device");
                    None
                }
            })
            .take(self.max_devices)
            .collect()
    }

    fn discover<T>(&self, mut open: impl FnMut(&Path) -> Result<T, DeviceError>) -> Vec<T> {
        let candidates = match self.enumerator.scan() {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(error = %e, "device enumeration failed");
                return Vec::new();
            }
        };

        candidates
            .iter()
            .filter_map(|candidate| {
                if candidate.ignored {
                    tracing::debug!(syspath = %candidate.syspath.display(), "candidate marked ignore");
                    return None;
                }
                let Some(devnode) = &candidate.devnode else {
                    tracing::debug!(syspath = %candidate.syspath.display(), "candidate has no device node");
                    return None;
                };
                match open(devnode) {
                    Ok(device) => {
                        tracing::info!(path = %devnode.display(), "found power button device");
                        Some(device)
                    }
                    Err(e) => {
                        tracing::debug!(path = %devnode.display(), error = %e, "skipping candidate");
                        None
                    }
                }
            })
            .take(self.max_devices)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io;

    use super::*;

    struct FakeEnumerator(Result<Vec<Candidate>, ()>);

    impl Enumerator for FakeEnumerator {
        fn scan(&self) -> Result<Vec<Candidate>, LocateError> {
            self.0.clone().map_err(|()| {
                LocateError::Udev(io::Error::new(io::ErrorKind::NotFound, "no udev"))
            })
        }
    }

    fn candidate(n: u32) -> Candidate {
        Candidate {
            syspath: PathBuf::from(format!("/sys/class/input/event{n}")),
            devnode: Some(PathBuf::from(format!("/dev/input/event{n}"))),
            ignored: false,
        }
    }

    /// Opens anything except paths listed in `broken`, recording attempts.
    fn opener<'a>(
        broken: &'a [&'a str],
        attempts: &'a RefCell<Vec<PathBuf>>,
    ) -> impl FnMut(&Path) -> Result<PathBuf, DeviceError> + 'a {
        move |path| {
            attempts.borrow_mut().push(path.to_path_buf());
            if broken.iter().any(|b| Path::new(b) == path) {
                Err(DeviceError::Unsupported {
                    path: path.to_path_buf(),
                })
            } else {
                Ok(path.to_path_buf())
            }
        }
    }

    #[test]
    fn discovery_caps_at_max_and_stops_opening() {
        let locator = DeviceLocator::new(
            FakeEnumerator(Ok(vec![candidate(0), candidate(1), candidate(2)])),
            2,
        );
        let attempts = RefCell::new(Vec::new());
        let found = locator.locate(&[], opener(&[], &attempts));

        assert_eq!(
            found,
            vec![
                PathBuf::from("/dev/input/event0"),
                PathBuf::from("/dev/input/event1")
            ]
        );
        assert_eq!(attempts.borrow().len(), 2);
    }

    #[test]
    fn discovery_skips_ignored_and_nodeless() {
        let mut ignored = candidate(0);
        ignored.ignored = true;
        let mut nodeless = candidate(1);
        nodeless.devnode = None;

        let locator = DeviceLocator::new(
            FakeEnumerator(Ok(vec![ignored, nodeless, candidate(2)])),
            2,
        );
        let attempts = RefCell::new(Vec::new());
        let found = locator.locate(&[], opener(&[], &attempts));

        assert_eq!(found, vec![PathBuf::from("/dev/input/event2")]);
        assert_eq!(*attempts.borrow(), vec![PathBuf::from("/dev/input/event2")]);
    }

    #[test]
    fn discovery_skips_decoys_and_keeps_looking() {
        let locator = DeviceLocator::new(
            FakeEnumerator(Ok(vec![candidate(0), candidate(1), candidate(2)])),
            2,
        );
        let attempts = RefCell::new(Vec::new());
        let found = locator.locate(&[], opener(&["/dev/input/event0"], &attempts));

        assert_eq!(
            found,
            vec![
                PathBuf::from("/dev/input/event1"),
                PathBuf::from("/dev/input/event2")
            ]
        );
    }

    #[test]
    fn enumeration_failure_means_no_devices() {
        let locator = DeviceLocator::new(FakeEnumerator(Err(())), 2);
        let attempts = RefCell::new(Vec::new());
        let found = locator.locate(&[], opener(&[], &attempts));
        assert!(found.is_empty());
        assert!(attempts.borrow().is_empty());
    }

    #[test]
    fn explicit_paths_bypass_discovery() {
        let locator = DeviceLocator::new(FakeEnumerator(Ok(vec![candidate(9)])), 2);
        let attempts = RefCell::new(Vec::new());
        let explicit = vec![
            PathBuf::from("/dev/input/event3"),
            PathBuf::from("/dev/input/event4"),
            PathBuf::from("/dev/input/event5"),
            PathBuf::from("/dev/input/event6"),
        ];
        let found = locator.locate(&explicit, opener(&["/dev/input/event4"], &attempts));

        assert_eq!(
            found,
            vec![
                PathBuf::from("/dev/input/event3"),
                PathBuf::from("/dev/input/event5")
            ]
        );
        // event6 is never opened once the cap is reached.
        assert_eq!(attempts.borrow().len(), 3);
    }

    #[test]
    fn explicit_paths_all_failing_is_empty() {
        let locator = DeviceLocator::new(FakeEnumerator(Ok(vec![candidate(0)])), 2);
        let attempts = RefCell::new(Vec::new());
        let explicit = vec![PathBuf::from("/dev/input/event7")];
        let found = locator.locate(&explicit, opener(&["/dev/input/event7"], &attempts));
        assert!(found.is_empty());
    }
}
