//! 帧输出
//!
//! 合成帧的去处：写 PNG 目录，或保存在内存中（测试用）。

use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{VizError, VizResult};

/// 合成帧接收端
pub trait FrameSink {
    fn write_frame(&mut self, index: u64, frame: &RgbaImage) -> VizResult<()>;
}

/// 把每一帧写成 `<dir>/frame_NNNNNN.png`
#[derive(Debug)]
pub struct PngDirSink {
    dir: PathBuf,
}

impl PngDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> VizResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.png"))
    }
}

impl FrameSink for PngDirSink {
    fn write_frame(&mut self, index: u64, frame: &RgbaImage) -> VizResult<()> {
        let path = self.frame_path(index);
        frame
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|source| VizError::FrameWrite { path, source })
    }
}

/// 内存中的帧列表；克隆共享同一份存储
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    frames: Arc<Mutex<Vec<RgbaImage>>>,
}

impl MemorySink {
    pub fn frames(&self) -> Vec<RgbaImage> {
        self.frames.lock().map(|f| f.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.frames.lock().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FrameSink for MemorySink {
    fn write_frame(&mut self, _index: u64, frame: &RgbaImage) -> VizResult<()> {
        let mut frames = self
            .frames
            .lock()
            .map_err(|_| std::io::Error::other("memory sink lock poisoned"))?;
        frames.push(frame.clone());
        Ok(())
    }
}
