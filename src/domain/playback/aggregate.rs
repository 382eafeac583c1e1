//! Playback Context - Aggregate Root

use chrono::{DateTime, Utc};

use super::{PlaybackItem, PlaybackQueue, PlaybackState, PlayingPhase, Ticket};
use crate::domain::{ChannelId, GuildId};

/// 出队后交给执行方的条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub ticket: Ticket,
    pub item: PlaybackItem,
}

/// Guild 播放状态机
///
/// 不变量:
/// - 任意时刻至多一个条目处于 Playing
/// - 条目按入队顺序出队
/// - 只有当前凭证的完成才能把状态推回 Idle
#[derive(Debug)]
pub struct GuildPlayback {
    guild_id: GuildId,
    output_channel: ChannelId,
    notify_channel: ChannelId,
    queue: PlaybackQueue,
    state: PlaybackState,
    next_ticket: u64,
    connected_at: DateTime<Utc>,
}

impl GuildPlayback {
    pub fn new(guild_id: GuildId, output_channel: ChannelId, notify_channel: ChannelId) -> Self {
        Self {
            guild_id,
            output_channel,
            notify_channel,
            queue: PlaybackQueue::new(),
            state: PlaybackState::Idle,
            next_ticket: 1,
            connected_at: Utc::now(),
        }
    }

    /// 入队，返回是否需要立即 pump（当前空闲）
    pub fn enqueue(&mut self, item: PlaybackItem) -> bool {
        self.queue.enqueue(item);
        !self.state.is_playing()
    }

    /// 推进状态机
    ///
    /// - 已在 Playing：无操作，返回 None
    /// - 队列为空：保持 Idle，返回 None
    /// - 否则出队一条并进入 Playing
    pub fn pump(&mut self) -> Option<Dispatch> {
        if self.state.is_playing() {
            return None;
        }

        let item = self.queue.dequeue_next()?;
        let ticket = Ticket::new(self.next_ticket);
        self.next_ticket += 1;

        let phase = match item {
            PlaybackItem::Text { .. } => PlayingPhase::Synthesizing,
            PlaybackItem::Media { .. } => PlayingPhase::SendingMedia,
        };
        self.state = PlaybackState::Playing { ticket, phase };

        Some(Dispatch { ticket, item })
    }

    /// 合成完成、播放器开始播放
    pub fn mark_speaking(&mut self, ticket: Ticket) -> bool {
        match self.state {
            PlaybackState::Playing { ticket: current, .. } if current == ticket => {
                self.state = PlaybackState::Playing {
                    ticket,
                    phase: PlayingPhase::Speaking,
                };
                true
            }
            _ => false,
        }
    }

    /// 当前条目结束（成功、失败或被停止），回到 Idle
    ///
    /// 凭证不匹配时返回 false 且不改变状态
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        match self.state {
            PlaybackState::Playing { ticket: current, .. } if current == ticket => {
                self.state = PlaybackState::Idle;
                true
            }
            _ => false,
        }
    }

    /// 正在播放器中播放的凭证
    pub fn speaking_ticket(&self) -> Option<Ticket> {
        match self.state {
            PlaybackState::Playing {
                ticket,
                phase: PlayingPhase::Speaking,
            } => Some(ticket),
            _ => None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    pub fn output_channel(&self) -> ChannelId {
        self.output_channel
    }

    pub fn notify_channel(&self) -> ChannelId {
        self.notify_channel
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    fn guild() -> GuildPlayback {
        GuildPlayback::new(GuildId::new(1), ChannelId::new(10), ChannelId::new(20))
    }

    fn text(s: &str) -> PlaybackItem {
        PlaybackItem::text(UserId::new(7), s)
    }

    #[test]
    fn test_enqueue_on_idle_requests_pump() {
        let mut g = guild();
        assert!(g.enqueue(text("a")));
        let d = g.pump().unwrap();
        assert_eq!(d.item, text("a"));
        assert!(g.is_playing());

        // Playing 中入队不再请求 pump
        assert!(!g.enqueue(text("b")));
    }

    #[test]
    fn test_pump_while_playing_is_noop() {
        let mut g = guild();
        g.enqueue(text("a"));
        g.enqueue(text("b"));
        let first = g.pump().unwrap();

        let before = g.state();
        assert_eq!(g.pump(), None);
        assert_eq!(g.state(), before);
        assert_eq!(g.queue_len(), 1);

        assert!(g.finish(first.ticket));
        assert_eq!(g.pump().unwrap().item, text("b"));
    }

    #[test]
    fn test_pump_on_empty_stays_idle() {
        let mut g = guild();
        assert_eq!(g.pump(), None);
        assert_eq!(g.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut g = guild();
        g.enqueue(text("a"));
        g.enqueue(text("b"));
        let first = g.pump().unwrap();
        assert!(g.finish(first.ticket));
        let second = g.pump().unwrap();

        // 重复的旧完成回调不能结束新条目
        assert!(!g.finish(first.ticket));
        assert!(g.is_playing());
        assert!(g.finish(second.ticket));
    }

    #[test]
    fn test_phases() {
        let mut g = guild();
        g.enqueue(PlaybackItem::media("m"));
        g.enqueue(text("a"));

        let media = g.pump().unwrap();
        assert!(matches!(
            g.state(),
            PlaybackState::Playing { phase: PlayingPhase::SendingMedia, .. }
        ));
        assert_eq!(g.speaking_ticket(), None);
        g.finish(media.ticket);

        let speech = g.pump().unwrap();
        assert!(matches!(
            g.state(),
            PlaybackState::Playing { phase: PlayingPhase::Synthesizing, .. }
        ));
        assert!(g.mark_speaking(speech.ticket));
        assert_eq!(g.speaking_ticket(), Some(speech.ticket));
    }

    #[test]
    fn test_tickets_are_monotonic() {
        let mut g = guild();
        for s in ["a", "b", "c"] {
            g.enqueue(text(s));
        }
        let mut last = 0;
        while let Some(d) = g.pump() {
            assert!(d.ticket.get() > last);
            last = d.ticket.get();
            g.finish(d.ticket);
        }
        assert_eq!(last, 3);
    }
}
