//! Playback Context - FIFO 队列

use std::collections::VecDeque;

use super::PlaybackItem;

/// 单个 Guild 的播放队列
///
/// 严格按提交顺序出队，无优先级、无重排。
/// 并发安全由持有者（Guild worker 的单一所有权）保证。
#[derive(Debug, Default)]
pub struct PlaybackQueue {
    items: VecDeque<PlaybackItem>,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, item: PlaybackItem) {
        self.items.push_back(item);
    }

    pub fn dequeue_next(&mut self) -> Option<PlaybackItem> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 清空队列，返回丢弃的条目数
    pub fn clear(&mut self) -> usize {
        let n = self.items.len();
        self.items.clear();
        n
    }
}
