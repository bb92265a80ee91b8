//! 调度器
//!
//! 定义虚拟时间调度器，维护当前时间与定时器队列。

use super::event::Event;
use super::scheduled_event::{ScheduledEvent, TimerId};
use super::time::SimTime;
use super::world::World;
use std::collections::{BinaryHeap, HashSet};
use tracing::{debug, info, trace};

/// 虚拟时间调度器：维护当前时间与定时器队列。
///
/// 一次只执行一个事件；事件内部调度的新定时器在当前事件返回后才可能被执行。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    q: BinaryHeap<ScheduledEvent>,
    cancelled: HashSet<TimerId>,
}

impl Simulator {
    /// 获取当前虚拟时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 调度事件在指定时间执行，返回可取消的句柄
    #[tracing::instrument(skip(self, ev), fields(event_type = std::any::type_name::<E>(), schedule_at = ?at))]
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) -> TimerId {
        let seq = self.next_seq;
        trace!(now = ?self.now, seq, "调度事件");

        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(ScheduledEvent {
            at,
            seq,
            ev: Box::new(ev),
        });

        debug!(queue_size = self.q.len(), "事件已加入队列");
        TimerId(seq)
    }

    /// 在当前时间之后 `delay` 调度事件
    pub fn schedule_in<E: Event>(&mut self, delay: SimTime, ev: E) -> TimerId {
        self.schedule(self.now.after(delay), ev)
    }

    /// 取消尚未执行的定时器。已执行或未知的句柄返回 `false`。
    pub fn cancel(&mut self, id: TimerId) -> bool {
        if self.cancelled.contains(&id) || !self.q.iter().any(|item| item.id() == id) {
            return false;
        }
        trace!(seq = id.0, "取消定时器");
        self.cancelled.insert(id)
    }

    /// 仍在等待执行（未被取消）的定时器数量
    pub fn pending(&self) -> usize {
        self.q.len().saturating_sub(self.cancelled.len())
    }

    /// 队列中没有任何待执行的定时器
    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// 下一个待执行定时器的时间
    pub fn next_at(&mut self) -> Option<SimTime> {
        self.discard_cancelled();
        self.q.peek().map(|item| item.at)
    }

    /// 执行恰好一个定时器；队列为空时返回 `false`。
    pub fn step(&mut self, world: &mut dyn World) -> bool {
        self.discard_cancelled();
        let Some(item) = self.q.pop() else {
            return false;
        };
        self.now = item.at;
        item.ev.execute(self, world);
        world.on_tick(self);
        true
    }

    /// 运行直到事件队列为空或到达 `until`。
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) {
        while let Some(at) = self.next_at() {
            if at > until {
                break;
            }
            self.step(world);
        }
        self.now = self.now.max(until);
    }

    /// 运行所有事件直到队列为空。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut dyn World) {
        info!("▶️  开始运行调度器");
        debug!(now = ?self.now, queue_size = self.q.len(), "初始状态");

        let mut event_count: u64 = 0;
        while self.step(world) {
            event_count += 1;
            debug!(
                event_num = event_count,
                now = ?self.now,
                remaining_queue = self.q.len(),
                "执行事件"
            );
        }

        info!(
            total_events = event_count,
            final_time = ?self.now,
            "✅ 调度完成"
        );
    }

    fn discard_cancelled(&mut self) {
        while let Some(top) = self.q.peek() {
            let id = top.id();
            if !self.cancelled.remove(&id) {
                break;
            }
            self.q.pop();
            trace!(seq = id.0, "丢弃已取消的定时器");
        }
    }
}
