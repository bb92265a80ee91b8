//! 可视化会话
//!
//! 一次会话的生命周期：`load_*` 解析 trace 并为每个实体分配 surface，
//! `start` 开始回放，`cancel` 放弃尚未执行的 tick，`stop` 一并销毁
//! 游标和注册表。

use std::any::Any;
use std::fs;
use std::path::Path;

use tracing::{debug, info, trace, warn};

use super::playback::{PlaybackCursor, PlaybackTick};
use super::sink::FrameSink;
use crate::config::VizConfig;
use crate::error::{RenderError, VizError, VizResult};
use crate::render::{RenderHandler, RenderOutcome, RenderStyle, compose_frame};
use crate::sim::{Simulator, TimerId, World};
use crate::surface::SurfaceRegistry;
use crate::trace::{TraceEvent, discover_entities, parse_trace};

/// 回放状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// 已加载，尚未开始
    Idle,
    Playing,
    /// 游标到达末尾（终止状态）
    Finished,
    /// 被宿主放弃
    Cancelled,
    /// 会话已销毁
    Stopped,
}

/// 回放统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    pub dispatched: u64,
    pub drawn: u64,
    pub skipped: u64,
    pub failed: u64,
    pub ticks: u64,
    pub loops: u64,
    pub frames: u64,
    pub frame_errors: u64,
}

/// 最近一次分发的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub index: usize,
    pub line: usize,
    pub result: Result<RenderOutcome, RenderError>,
}

pub struct Session {
    pub(crate) cfg: VizConfig,
    pub(crate) handler: RenderHandler,
    pub(crate) events: Vec<TraceEvent>,
    entities: Vec<String>,
    pub(crate) registry: SurfaceRegistry,
    pub(crate) cursor: PlaybackCursor,
    pub(crate) state: PlaybackState,
    pub(crate) pending: Option<TimerId>,
    /// 重新加载时遗留在调度器里的 tick，下次拿到调度器时取消
    stale_ticks: Vec<TimerId>,
    pub(crate) stats: PlaybackStats,
    pub(crate) last_dispatch: Option<Dispatch>,
    sink: Option<Box<dyn FrameSink>>,
    last_frame_tick: Option<u64>,
}

impl Session {
    pub fn new(cfg: VizConfig) -> VizResult<Self> {
        cfg.validate()?;
        Ok(Self {
            handler: RenderHandler::new(RenderStyle::from(&cfg)),
            registry: SurfaceRegistry::new(cfg.canvas_px, cfg.background),
            cfg,
            events: Vec::new(),
            entities: Vec::new(),
            cursor: PlaybackCursor::default(),
            state: PlaybackState::Idle,
            pending: None,
            stale_ticks: Vec::new(),
            stats: PlaybackStats::default(),
            last_dispatch: None,
            sink: None,
            last_frame_tick: None,
        })
    }

    /// 设置帧输出
    pub fn with_sink(mut self, sink: Box<dyn FrameSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 读取并加载 trace 文件；读取失败时不会开始回放
    #[tracing::instrument(skip(self, path), fields(path = %path.display()))]
    pub fn load_file(&mut self, path: &Path) -> VizResult<()> {
        let text = fs::read_to_string(path).map_err(|source| VizError::TraceLoad {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_text(&text);
        Ok(())
    }

    pub fn load_text(&mut self, text: &str) {
        self.load_events(parse_trace(text));
    }

    /// 加载已解析的事件：发现实体并按发现顺序创建 surface
    pub fn load_events(&mut self, events: Vec<TraceEvent>) {
        self.registry.teardown();
        self.entities = discover_entities(&events);
        for name in &self.entities {
            self.registry.create(name);
        }
        self.cursor = PlaybackCursor::new(events.len());
        self.events = events;
        self.state = PlaybackState::Idle;
        if let Some(id) = self.pending.take() {
            self.stale_ticks.push(id);
        }
        self.stats = PlaybackStats::default();
        self.last_dispatch = None;
        self.last_frame_tick = None;
        info!(
            events = self.events.len(),
            entities = self.entities.len(),
            "📄 trace 已加载"
        );
    }

    /// 开始回放：在当前时间调度第一个 tick。游标已在末尾时直接结束
    /// （非空 trace 照常输出最终帧）。
    #[tracing::instrument(skip(self, sim), fields(now = ?sim.now()))]
    pub fn start(&mut self, sim: &mut Simulator) {
        match self.state {
            PlaybackState::Playing => {
                warn!("回放已在进行，忽略重复 start");
                return;
            }
            PlaybackState::Stopped => {
                warn!("会话已销毁，无法开始回放");
                return;
            }
            _ => {}
        }
        self.retire_stale_ticks(sim);
        if self.cursor.is_terminal() {
            if self.cursor.is_empty() {
                self.state = PlaybackState::Finished;
                info!("没有可回放的事件，回放直接结束");
            } else if self.state != PlaybackState::Finished {
                self.finish();
            }
            return;
        }
        self.state = PlaybackState::Playing;
        self.pending = Some(sim.schedule(sim.now(), PlaybackTick));
        info!(
            from = self.cursor.position(),
            tick_ms = self.cfg.tick_ms,
            "▶️  开始回放"
        );
    }

    /// 放弃回放：取消在途 tick，不再访问任何 surface
    pub fn cancel(&mut self, sim: &mut Simulator) {
        self.retire_stale_ticks(sim);
        if let Some(id) = self.pending.take() {
            sim.cancel(id);
        }
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Cancelled;
            info!(cursor = self.cursor.position(), "⏹  回放已取消");
        }
    }

    /// 结束会话：游标和注册表一起销毁
    pub fn stop(&mut self, sim: &mut Simulator) {
        self.cancel(sim);
        self.registry.teardown();
        self.events.clear();
        self.entities.clear();
        self.cursor = PlaybackCursor::default();
        self.state = PlaybackState::Stopped;
        debug!("会话已销毁");
    }

    fn retire_stale_ticks(&mut self, sim: &mut Simulator) {
        for id in self.stale_ticks.drain(..) {
            if sim.cancel(id) {
                debug!(seq = id.0, "取消重新加载前遗留的 tick");
            }
        }
    }

    /// 跳转到第 `index` 个事件之前：清空画布并同步重放 `[0, index)`。
    /// 重放不计入 `stats`。
    pub fn seek(&mut self, index: usize) -> usize {
        self.registry.clear_all();
        let target = index.min(self.events.len());
        for (i, ev) in self.events[..target].iter().enumerate() {
            let result = match self.registry.lookup_mut(&ev.entity) {
                Some(surface) => self.handler.apply(surface, ev),
                None => Err(RenderError::UnknownEntity(ev.entity.clone())),
            };
            if let Err(err) = result {
                trace!(index = i, line = ev.line, entity = %ev.entity, %err, "跳转重放时事件渲染失败");
            }
        }
        let pos = self.cursor.seek(target);
        if self.state == PlaybackState::Finished && !self.cursor.is_terminal() {
            self.state = PlaybackState::Idle;
        }
        debug!(cursor = pos, "跳转完成");
        pos
    }

    pub fn config(&self) -> &VizConfig {
        &self.cfg
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// 按首次出现顺序的实体名
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SurfaceRegistry {
        &mut self.registry
    }

    pub fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn stats(&self) -> &PlaybackStats {
        &self.stats
    }

    pub fn last_dispatch(&self) -> Option<&Dispatch> {
        self.last_dispatch.as_ref()
    }

    /// 是否有尚未执行的 tick
    pub fn has_pending_tick(&self) -> bool {
        self.pending.is_some()
    }

    /// 合成当前帧并写入 `copies` 次
    pub(crate) fn emit_frames(&mut self, copies: u32) {
        self.last_frame_tick = Some(self.stats.ticks);
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        let Some(frame) = compose_frame(&self.registry, &self.cfg) else {
            return;
        };
        for _ in 0..copies {
            match sink.write_frame(self.stats.frames, &frame) {
                Ok(()) => self.stats.frames += 1,
                Err(err) => {
                    warn!(%err, "写出帧失败");
                    self.stats.frame_errors += 1;
                }
            }
        }
    }
}

impl World for Session {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, _sim: &mut Simulator) {
        let Some(every) = self.cfg.frame_every else {
            return;
        };
        let ticks = self.stats.ticks;
        let active = matches!(
            self.state,
            PlaybackState::Playing | PlaybackState::Finished
        );
        if active && ticks > 0 && ticks % every == 0 && self.last_frame_tick != Some(ticks) {
            self.emit_frames(1);
        }
    }
}
