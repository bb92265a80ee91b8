//! Surface 注册表
//!
//! 按实体名分配并查找 surface。创建是幂等的：同名第二次创建返回已有句柄。

use std::collections::HashMap;

use tracing::debug;

use super::surface::Surface;
use crate::config::Rgba8;

/// Surface 句柄（按创建顺序编号）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub usize);

#[derive(Debug)]
pub struct SurfaceRegistry {
    size_px: u32,
    background: Rgba8,
    surfaces: Vec<Surface>,
    by_name: HashMap<String, SurfaceId>,
}

impl SurfaceRegistry {
    pub fn new(size_px: u32, background: Rgba8) -> Self {
        Self {
            size_px,
            background,
            surfaces: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn size_px(&self) -> u32 {
        self.size_px
    }

    /// 为实体创建 surface；已存在时直接返回原句柄
    pub fn create(&mut self, name: &str) -> SurfaceId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = SurfaceId(self.surfaces.len());
        self.surfaces
            .push(Surface::new(name, self.size_px, self.background));
        self.by_name.insert(name.to_string(), id);
        debug!(entity = name, id = id.0, size_px = self.size_px, "创建 surface");
        id
    }

    pub fn get(&self, name: &str) -> Option<SurfaceId> {
        self.by_name.get(name).copied()
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.0)
    }

    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surfaces.get_mut(id.0)
    }

    /// 按实体名取可变 surface
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Surface> {
        let id = self.get(name)?;
        self.surfaces.get_mut(id.0)
    }

    pub fn lookup(&self, name: &str) -> Option<&Surface> {
        self.surface(self.get(name)?)
    }

    /// 按创建顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.iter()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// 所有 surface 恢复为背景色
    pub fn clear_all(&mut self) {
        self.surfaces.iter_mut().for_each(Surface::clear);
    }

    /// 销毁全部 surface（会话结束）
    pub fn teardown(&mut self) {
        self.surfaces.clear();
        self.by_name.clear();
    }
}
