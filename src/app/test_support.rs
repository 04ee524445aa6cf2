// In-memory port fakes shared by the interactor tests

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::{Rgb, RgbImage};

use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::ports::*;

pub fn layout() -> FolderLayout {
    FolderLayout {
        base_path: PathBuf::from("/cam"),
        raw_folder: "Raw".to_string(),
        dated_folder: "Dated".to_string(),
        video_folder: "Video".to_string(),
    }
}

#[derive(Default)]
struct FsState {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Option<RgbImage>>,
    deleted: Vec<PathBuf>,
}

impl FsState {
    fn add_dir_all(&mut self, dir: &Path) {
        for ancestor in dir.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }
}

/// Filesystem and image codec backed by maps
#[derive(Default)]
pub struct MemoryFs {
    state: Mutex<FsState>,
}

impl MemoryFs {
    /// Solid-colour image; the first channel doubles as a frame marker
    pub fn add_image(&self, path: &str, width: u32, height: u32, color: [u8; 3]) {
        let path = PathBuf::from(path);
        let mut state = self.state.lock().unwrap();
        if let Some(parent) = path.parent() {
            state.add_dir_all(parent);
        }
        state
            .files
            .insert(path, Some(RgbImage::from_pixel(width, height, Rgb(color))));
    }

    pub fn add_file(&self, path: &str) {
        let path = PathBuf::from(path);
        let mut state = self.state.lock().unwrap();
        if let Some(parent) = path.parent() {
            state.add_dir_all(parent);
        }
        state.files.insert(path, None);
    }

    pub fn add_dir(&self, path: &str) {
        self.state.lock().unwrap().add_dir_all(Path::new(path));
    }

    pub fn has_file(&self, path: &Path) -> bool {
        self.state.lock().unwrap().files.contains_key(path)
    }

    pub fn has_dir(&self, path: &Path) -> bool {
        self.state.lock().unwrap().dirs.contains(path)
    }

    pub fn deleted_files(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().deleted.clone()
    }
}

impl FsPort for MemoryFs {
    fn directory_exists(&self, dir_path: &Path) -> Result<bool, DomainError> {
        Ok(self.has_dir(dir_path))
    }

    fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError> {
        Ok(self.has_file(file_path))
    }

    fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        self.state.lock().unwrap().add_dir_all(dir_path);
        Ok(())
    }

    fn delete_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        if !state.dirs.contains(dir_path) {
            return Err(DomainError::FsFail(format!("{} not found", dir_path.display())));
        }
        state.dirs.retain(|d| !d.starts_with(dir_path));
        state.files.retain(|f, _| !f.starts_with(dir_path));
        Ok(())
    }

    fn delete_file(&self, file_path: &Path) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        if state.files.remove(file_path).is_none() {
            return Err(DomainError::FsFail(format!("{} not found", file_path.display())));
        }
        state.deleted.push(file_path.to_path_buf());
        Ok(())
    }

    fn list_files(
        &self,
        dir_path: &Path,
        extension: &str,
        recursive: bool,
    ) -> Result<Vec<PathBuf>, DomainError> {
        let state = self.state.lock().unwrap();
        // Reverse order so callers that forget to sort get caught
        Ok(state
            .files
            .keys()
            .rev()
            .filter(|f| {
                if recursive {
                    f.starts_with(dir_path)
                } else {
                    f.parent() == Some(dir_path)
                }
            })
            .filter(|f| {
                f.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.eq_ignore_ascii_case(extension))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}

impl ImagePort for MemoryFs {
    fn decode(&self, path: &Path) -> Result<RgbImage, DomainError> {
        match self.state.lock().unwrap().files.get(path) {
            Some(Some(image)) => Ok(image.clone()),
            Some(None) => Err(DomainError::ImageFail(format!(
                "{} is not an image",
                path.display()
            ))),
            None => Err(DomainError::FsFail(format!("{} not found", path.display()))),
        }
    }

    fn encode(&self, path: &Path, image: &RgbImage) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        let parent_exists = path.parent().map(|p| state.dirs.contains(p)).unwrap_or(false);
        if !parent_exists {
            return Err(DomainError::FsFail(format!(
                "parent of {} does not exist",
                path.display()
            )));
        }
        state.files.insert(path.to_path_buf(), Some(image.clone()));
        Ok(())
    }
}

/// Overlay that only records the labels it was asked to draw
#[derive(Default)]
pub struct RecordingOverlay {
    labels: Mutex<Vec<String>>,
}

impl RecordingOverlay {
    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().unwrap().clone()
    }
}

impl OverlayPort for RecordingOverlay {
    fn overlay(&self, _image: &mut RgbImage, spec: &OverlaySpec) -> Result<(), DomainError> {
        self.labels.lock().unwrap().push(spec.text.clone());
        Ok(())
    }
}

#[derive(Default)]
struct VideoState {
    spec: Option<VideoStreamSpec>,
    markers: Vec<u8>,
    closed: bool,
}

/// Video factory recording the first channel of each frame's top-left pixel
#[derive(Default)]
pub struct RecordingVideo {
    state: Arc<Mutex<VideoState>>,
    fs: Option<Arc<MemoryFs>>,
}

impl RecordingVideo {
    /// Also creates the output file in `fs` when a stream is opened
    pub fn with_fs(fs: Arc<MemoryFs>) -> Self {
        Self {
            state: Arc::default(),
            fs: Some(fs),
        }
    }

    pub fn spec(&self) -> Option<VideoStreamSpec> {
        self.state.lock().unwrap().spec.clone()
    }

    pub fn frame_markers(&self) -> Vec<u8> {
        self.state.lock().unwrap().markers.clone()
    }

    pub fn closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

impl VideoSinkFactory for RecordingVideo {
    fn open(&self, spec: &VideoStreamSpec) -> Result<Box<dyn VideoSink>, DomainError> {
        if let Some(fs) = &self.fs {
            fs.create_directory(spec.path.parent().unwrap_or(Path::new("/")))?;
            fs.state.lock().unwrap().files.insert(spec.path.clone(), None);
        }
        let mut state = self.state.lock().unwrap();
        state.spec = Some(spec.clone());
        state.markers.clear();
        state.closed = false;
        Ok(Box::new(RecordingSink {
            state: Arc::clone(&self.state),
        }))
    }
}

struct RecordingSink {
    state: Arc<Mutex<VideoState>>,
}

impl VideoSink for RecordingSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), DomainError> {
        self.state
            .lock()
            .unwrap()
            .markers
            .push(frame.get_pixel(0, 0)[0]);
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), DomainError> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}

/// Log port keeping every message
#[derive(Default)]
pub struct RecordingLog {
    messages: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingLog {
    pub fn messages(&self, level: &str) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl LogPort for RecordingLog {
    fn info(&self, message: &str) {
        self.messages.lock().unwrap().push(("info", message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push(("warn", message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(("error", message.to_string()));
    }

    fn debug(&self, message: &str) {
        self.messages.lock().unwrap().push(("debug", message.to_string()));
    }
}
