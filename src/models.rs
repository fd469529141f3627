use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// 接続ID（WebSocketセッションごとに採番）
pub type ConnId = Uuid;

/// ルームID（ペアリングごとに採番）
pub type RoomId = Uuid;

/// デスロール開始時のロール上限
pub const DEFAULT_CEILING: u64 = 1000;

// プレイヤーロール（ペアリング時の順序で固定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerRole {
    PlayerA,
    PlayerB,
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerRole::PlayerA => write!(f, "PlayerA"),
            PlayerRole::PlayerB => write!(f, "PlayerB"),
        }
    }
}

// 1ルーム分のデスロール対戦状態
#[derive(Debug, Clone)]
pub struct Duel {
    /// プレイヤー2名（先にキューへ入った側が PlayerA）
    pub players: [ConnId; 2],
    /// 各プレイヤーの提示ベット額（最大2エントリ）
    pub bets: HashMap<ConnId, i64>,
    /// 現在のロール上限（単調減少）
    pub ceiling: u64,
    /// 手番プレイヤー
    pub turn: ConnId,
    /// ベット確定通知を送信済みか
    pub bet_locked: bool,
}

impl Duel {
    pub fn new(player_a: ConnId, player_b: ConnId) -> Self {
        Self {
            players: [player_a, player_b],
            bets: HashMap::new(),
            ceiling: DEFAULT_CEILING,
            turn: player_a,
            bet_locked: false,
        }
    }

    /// 前提: conn はこのルームのプレイヤー
    pub fn role_of(&self, conn: ConnId) -> PlayerRole {
        if conn == self.players[0] {
            PlayerRole::PlayerA
        } else {
            PlayerRole::PlayerB
        }
    }

    /// 前提: conn はこのルームのプレイヤー
    pub fn opponent_of(&self, conn: ConnId) -> ConnId {
        if conn == self.players[0] {
            self.players[1]
        } else {
            self.players[0]
        }
    }

    pub fn contains(&self, conn: ConnId) -> bool {
        self.players.contains(&conn)
    }

    /// ベット額を記録（同一プレイヤーの再提示は上書き）
    /// 両者の額が一致して確定に遷移した時だけ true
    pub fn record_bet(&mut self, conn: ConnId, amount: i64) -> bool {
        self.bets.insert(conn, amount);
        if !self.bet_locked && self.agreed_bet().is_some() {
            self.bet_locked = true;
            return true;
        }
        false
    }

    /// 両者が同額を提示していればその額
    pub fn agreed_bet(&self) -> Option<i64> {
        if self.bets.len() != 2 {
            return None;
        }
        let mut values = self.bets.values();
        let first = values.next().copied()?;
        values.all(|&v| v == first).then_some(first)
    }

    /// 決着時の清算額（合意がなければ 0）
    pub fn settled_bet(&self) -> i64 {
        self.agreed_bet().unwrap_or(0)
    }
}

// クライアント→サーバー メッセージ
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    /// マッチングキューに入る
    Queue,
    /// ベット額を提示する
    Bet { amount: i64 },
    /// 現在の上限値を指定してロールする
    Roll { max_roll: u64 },
    /// ルーム内チャット
    Chat { text: String },
}

// サーバー→クライアント メッセージ
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    System {
        message: String,
        timestamp: DateTime<Utc>,
    },
    Chat {
        message: String,
        timestamp: DateTime<Utc>,
    },
    Role {
        role: PlayerRole,
        timestamp: DateTime<Utc>,
    },
    Result {
        winner: PlayerRole,
        loser: PlayerRole,
        bet: i64,
        timestamp: DateTime<Utc>,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn system(message: impl Into<String>) -> Self {
        ServerMessage::System {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn chat(message: impl Into<String>) -> Self {
        ServerMessage::Chat {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn role(role: PlayerRole) -> Self {
        ServerMessage::Role {
            role,
            timestamp: Utc::now(),
        }
    }
}
