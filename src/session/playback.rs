//! 回放调度
//!
//! 回放由一串单次定时器驱动：每个 `PlaybackTick` 恰好分发一个事件，
//! 只有在本次分发返回之后才调度下一个 tick，因此任意时刻最多只有一个
//! tick 在途。游标到达序列末尾后回放终止，不会自动重新开始
//! （除非开启 `loop_playback`）。

use tracing::{debug, info, trace, warn};

use super::session::{Dispatch, PlaybackState, Session};
use crate::error::RenderError;
use crate::sim::{Event, Simulator, World};

/// 回放游标：下一个待分发事件的下标
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackCursor {
    next: usize,
    len: usize,
}

impl PlaybackCursor {
    pub fn new(len: usize) -> Self {
        Self { next: 0, len }
    }

    pub fn position(&self) -> usize {
        self.next
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 游标已到达序列末尾
    pub fn is_terminal(&self) -> bool {
        self.next >= self.len
    }

    /// 取出当前下标并前进一步；已终止时返回 `None`
    pub fn advance(&mut self) -> Option<usize> {
        if self.is_terminal() {
            return None;
        }
        let idx = self.next;
        self.next += 1;
        Some(idx)
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }

    /// 移动到 `index`（截断到序列长度），返回实际位置
    pub fn seek(&mut self, index: usize) -> usize {
        self.next = index.min(self.len);
        self.next
    }
}

/// 回放 tick：分发一个事件后重新调度自身
#[derive(Debug)]
pub struct PlaybackTick;

impl Event for PlaybackTick {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let Some(session) = world.as_any_mut().downcast_mut::<Session>() else {
            warn!("PlaybackTick 的宿主不是 Session，忽略");
            return;
        };
        session.on_playback_tick(sim);
    }
}

impl Session {
    pub(crate) fn on_playback_tick(&mut self, sim: &mut Simulator) {
        self.pending = None;
        if self.state != PlaybackState::Playing {
            trace!(state = ?self.state, "回放未在进行，忽略 tick");
            return;
        }
        self.stats.ticks += 1;

        if let Some(index) = self.cursor.advance() {
            self.dispatch(index);
        }

        if self.cursor.is_terminal() {
            if self.cfg.loop_playback && !self.cursor.is_empty() {
                self.registry.clear_all();
                self.cursor.reset();
                self.stats.loops += 1;
                info!(loops = self.stats.loops, "🔁 回放到达末尾，从头循环");
            } else {
                self.finish();
                return;
            }
        }

        let id = sim.schedule_in(self.cfg.tick_period(), PlaybackTick);
        self.pending = Some(id);
    }

    /// 分发一个事件；渲染失败只记录日志，不影响后续 tick
    pub(crate) fn dispatch(&mut self, index: usize) {
        let Some(ev) = self.events.get(index) else {
            return;
        };
        let result = match self.registry.lookup_mut(&ev.entity) {
            Some(surface) => self.handler.apply(surface, ev),
            None => Err(RenderError::UnknownEntity(ev.entity.clone())),
        };

        self.stats.dispatched += 1;
        match &result {
            Ok(outcome) => {
                debug!(index, line = ev.line, kind = %ev.kind, entity = %ev.entity, ?outcome, "分发事件");
                if outcome.is_drawn() {
                    self.stats.drawn += 1;
                } else {
                    self.stats.skipped += 1;
                }
            }
            Err(err) => {
                warn!(index, line = ev.line, entity = %ev.entity, %err, "事件渲染失败，跳过");
                self.stats.failed += 1;
            }
        }
        self.last_dispatch = Some(Dispatch {
            index,
            line: ev.line,
            result,
        });
    }

    pub(crate) fn finish(&mut self) {
        self.state = PlaybackState::Finished;
        info!(
            dispatched = self.stats.dispatched,
            drawn = self.stats.drawn,
            skipped = self.stats.skipped,
            failed = self.stats.failed,
            ticks = self.stats.ticks,
            "✅ 回放完成"
        );
        self.emit_frames(1 + self.cfg.hold_frames);
    }
}
