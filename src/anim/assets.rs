//! Avatar clip discovery.
//!
//! Only what the state machine needs is pulled out of the glTF document:
//! each animation's name and its duration (the latest keyframe time over
//! all channels).  Loading runs on a worker thread; the frame loop polls
//! [`AvatarLoader::poll`] and keeps drawing the placeholder until the
//! status turns [`AssetStatus::Ready`].

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{info, warn};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("cannot import avatar {path}: {source}")]
    Import {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("avatar loader thread exited without a result")]
    LoaderGone,
}

/// Index of a clip inside its [`ClipLibrary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClipHandle(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub struct ClipInfo {
    pub name: String,
    /// Seconds.
    pub duration: f32,
}

/// Every clip found in one avatar file, in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClipLibrary {
    clips: Vec<ClipInfo>,
}

impl ClipLibrary {
    pub fn from_clips(clips: Vec<ClipInfo>) -> Self {
        Self { clips }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    #[inline]
    pub fn get(&self, handle: ClipHandle) -> Option<&ClipInfo> {
        self.clips.get(handle.0)
    }

    /// Exact, case-sensitive name lookup.
    pub fn find(&self, name: &str) -> Option<ClipHandle> {
        self.clips
            .iter()
            .position(|c| c.name == name)
            .map(ClipHandle)
    }

    /// First name in `candidates` that exists.
    pub fn find_any(&self, candidates: &[&str]) -> Option<ClipHandle> {
        candidates.iter().find_map(|n| self.find(n))
    }

    pub fn handles(&self) -> impl Iterator<Item = ClipHandle> + '_ {
        (0..self.clips.len()).map(ClipHandle)
    }
}

/// Read clip names and durations from a `.gltf` / `.glb` file.
pub fn load_clip_library(path: impl AsRef<Path>) -> Result<ClipLibrary, AssetError> {
    let path = path.as_ref();
    let (doc, buffers, _images) = gltf::import(path).map_err(|source| AssetError::Import {
        path: path.to_path_buf(),
        source,
    })?;

    let mut clips = Vec::new();
    for (i, anim) in doc.animations().enumerate() {
        let name = anim
            .name()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("clip{i}"));
        let mut duration = 0.0f32;
        for ch in anim.channels() {
            let reader = ch.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
            if let Some(inputs) = reader.read_inputs() {
                duration = inputs.fold(duration, f32::max);
            }
        }
        clips.push(ClipInfo { name, duration });
    }
    info!("avatar {}: {} clips", path.display(), clips.len());
    Ok(ClipLibrary { clips })
}

/*──────────────────────── background loader ──────────────────────*/

#[derive(Debug)]
pub enum AssetStatus {
    Loading,
    Ready(ClipLibrary),
    Failed(AssetError),
}

/// One-shot background load.  After `poll` has returned `Ready` or `Failed`
/// once, further polls return `Failed(LoaderGone)`.
pub struct AvatarLoader {
    rx: Receiver<Result<ClipLibrary, AssetError>>,
}

impl AvatarLoader {
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // receiver may be gone if the app quit first
            let _ = tx.send(load_clip_library(&path));
        });
        Self { rx }
    }

    pub fn poll(&self) -> AssetStatus {
        match self.rx.try_recv() {
            Ok(Ok(lib)) => AssetStatus::Ready(lib),
            Ok(Err(e)) => {
                warn!("{e}; keeping the placeholder avatar");
                AssetStatus::Failed(e)
            }
            Err(TryRecvError::Empty) => AssetStatus::Loading,
            Err(TryRecvError::Disconnected) => AssetStatus::Failed(AssetError::LoaderGone),
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn lib() -> ClipLibrary {
        ClipLibrary::from_clips(vec![
            ClipInfo { name: "Armature|Idle".into(), duration: 2.0 },
            ClipInfo { name: "Jog".into(), duration: 0.8 },
        ])
    }

    #[test]
    fn lookup_is_exact() {
        let lib = lib();
        assert_eq!(lib.find("Jog"), Some(ClipHandle(1)));
        assert_eq!(lib.find("jog"), None);
        assert_eq!(lib.find_any(&["Run", "Running", "Jog"]), Some(ClipHandle(1)));
        assert_eq!(lib.find_any(&["Jump"]), None);
    }

    #[test]
    fn missing_file_fails_without_panicking() {
        let err = load_clip_library("/definitely/not/here/avatar.glb").unwrap_err();
        assert!(matches!(err, AssetError::Import { .. }));
    }

    #[test]
    fn loader_reports_failure_then_disconnect() {
        let loader = AvatarLoader::spawn(PathBuf::from("/definitely/not/here/avatar.glb"));
        let deadline = Instant::now() + Duration::from_secs(5);
        let status = loop {
            match loader.poll() {
                AssetStatus::Loading if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(5))
                }
                other => break other,
            }
        };
        assert!(matches!(status, AssetStatus::Failed(AssetError::Import { .. })));
        assert!(matches!(loader.poll(), AssetStatus::Failed(AssetError::LoaderGone)));
    }
}
