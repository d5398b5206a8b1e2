//! Domain entities: shared room playback state and connection identity.

use serde_json::{Map, Value};

use super::value_object::{ConnectionId, Timestamp};

/// Playback state shared by every member of a room.
///
/// `current_time` is whatever the last writer claimed; no monotonicity is
/// enforced across writers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomState {
    pub is_playing: bool,
    /// Playback position in seconds
    pub current_time: f64,
    /// Time of the most recent mutation
    pub update_time: Timestamp,
}

impl RoomState {
    /// State of a room that nobody has played yet.
    pub fn initial(now: Timestamp) -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            update_time: now,
        }
    }

    /// Apply a playback command (last write wins).
    pub fn apply(&mut self, command: PlaybackCommand, now: Timestamp) {
        match command {
            PlaybackCommand::Play { current_time } => {
                self.is_playing = true;
                self.current_time = current_time;
            }
            PlaybackCommand::Pause { current_time } => {
                self.is_playing = false;
                self.current_time = current_time;
            }
            PlaybackCommand::Seek { current_time } => {
                self.current_time = current_time;
            }
        }
        self.update_time = now;
    }
}

/// A play/pause/seek action reported by a client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackCommand {
    Play { current_time: f64 },
    Pause { current_time: f64 },
    Seek { current_time: f64 },
}

impl PlaybackCommand {
    pub fn current_time(&self) -> f64 {
        match *self {
            Self::Play { current_time }
            | Self::Pause { current_time }
            | Self::Seek { current_time } => current_time,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Play { .. } => "play",
            Self::Pause { .. } => "pause",
            Self::Seek { .. } => "seek",
        }
    }
}

/// Verified identity attached to a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub username: String,
}

/// An accepted WebSocket connection, optionally authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub identity: Option<Identity>,
}

impl Connection {
    pub fn new(id: ConnectionId, identity: Option<Identity>) -> Self {
        Self { id, identity }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Label used in logs: the username when authenticated, the connection id otherwise.
    pub fn display_name(&self) -> &str {
        match &self.identity {
            Some(identity) => &identity.username,
            None => self.id.as_str(),
        }
    }
}

/// Free-form chat payload, relayed verbatim.
///
/// The payload carries its target room in `roomId` and usually a
/// client-asserted `username`, which is not checked against the connection's
/// identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPayload(Map<String, Value>);

impl ChatPayload {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Target room named by the sender, if present and a string.
    pub fn room_id(&self) -> Option<&str> {
        self.0.get("roomId").and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initial_state_is_paused_at_zero() {
        // テスト項目: 新規ルームは停止状態・再生位置 0 で始まる
        // when (操作):
        let state = RoomState::initial(Timestamp::new(1_000));

        // then (期待する結果):
        assert!(!state.is_playing);
        assert_eq!(state.current_time, 0.0);
        assert_eq!(state.update_time, Timestamp::new(1_000));
    }

    #[test]
    fn test_play_pause_seek_transitions() {
        // テスト項目: play / pause / seek がそれぞれ正しく状態を更新する
        // given (前提条件):
        let mut state = RoomState::initial(Timestamp::new(0));

        // when (操作): play
        state.apply(PlaybackCommand::Play { current_time: 42.5 }, Timestamp::new(10));
        // then (期待する結果):
        assert!(state.is_playing);
        assert_eq!(state.current_time, 42.5);
        assert_eq!(state.update_time, Timestamp::new(10));

        // when (操作): seek は再生状態を変えない
        state.apply(PlaybackCommand::Seek { current_time: 90.0 }, Timestamp::new(20));
        // then (期待する結果):
        assert!(state.is_playing);
        assert_eq!(state.current_time, 90.0);
        assert_eq!(state.update_time, Timestamp::new(20));

        // when (操作): pause
        state.apply(PlaybackCommand::Pause { current_time: 91.0 }, Timestamp::new(30));
        // then (期待する結果):
        assert!(!state.is_playing);
        assert_eq!(state.current_time, 91.0);
        assert_eq!(state.update_time, Timestamp::new(30));
    }

    #[test]
    fn test_position_may_move_backwards() {
        // テスト項目: 再生位置の巻き戻しも検証せずに受け入れる（最後の書き込みが勝つ）
        // given (前提条件):
        let mut state = RoomState::initial(Timestamp::new(0));
        state.apply(PlaybackCommand::Play { current_time: 300.0 }, Timestamp::new(1));

        // when (操作):
        state.apply(PlaybackCommand::Play { current_time: 5.0 }, Timestamp::new(2));

        // then (期待する結果):
        assert_eq!(state.current_time, 5.0);
    }

    #[test]
    fn test_connection_display_name() {
        // テスト項目: 認証済みならユーザー名、匿名なら接続 ID が表示名になる
        // given (前提条件):
        let id = ConnectionId::new("conn-1".to_string()).unwrap();
        let anonymous = Connection::new(id.clone(), None);
        let alice = Connection::new(
            id,
            Some(Identity {
                user_id: "u1".to_string(),
                username: "alice".to_string(),
            }),
        );

        // then (期待する結果):
        assert_eq!(anonymous.display_name(), "conn-1");
        assert!(!anonymous.is_authenticated());
        assert_eq!(alice.display_name(), "alice");
        assert!(alice.is_authenticated());
    }

    #[test]
    fn test_chat_payload_room_id() {
        // テスト項目: roomId が文字列の場合のみ取り出せる
        // given (前提条件):
        let valid = json!({"roomId": "R1", "username": "bob", "text": "hi"});
        let numeric = json!({"roomId": 7});

        // when (操作):
        let valid = ChatPayload::new(valid.as_object().unwrap().clone());
        let numeric = ChatPayload::new(numeric.as_object().unwrap().clone());

        // then (期待する結果):
        assert_eq!(valid.room_id(), Some("R1"));
        assert_eq!(numeric.room_id(), None);
    }
}
