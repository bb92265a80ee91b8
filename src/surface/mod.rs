//! 绘制区域模块
//!
//! 每个实体对应一个固定大小的正方形 RGBA 画布，由注册表按名字管理。

mod registry;
mod surface;

pub use registry::{SurfaceId, SurfaceRegistry};
pub use surface::Surface;
