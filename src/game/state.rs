use crate::models::{ConnId, Duel, PlayerRole, RoomId, ServerMessage};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// サイコロ（[1, ceiling] の一様乱数）
pub trait Dice: Send {
    fn roll(&mut self, ceiling: u64) -> u64;
}

/// 本番用サイコロ
pub struct StandardDice {
    rng: SmallRng,
}

impl StandardDice {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl Default for StandardDice {
    fn default() -> Self {
        Self::new()
    }
}

impl Dice for StandardDice {
    fn roll(&mut self, ceiling: u64) -> u64 {
        self.rng.random_range(1..=ceiling)
    }
}

// 操作エラー。致命的なものはなく、すべて当該接続への
// systemメッセージとして報告される
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("You are already in the queue.")]
    AlreadyQueued,
    #[error("You are already in a match.")]
    AlreadyMatched,
    #[error("You are not in a match.")]
    NotInMatch,
    #[error("It is not your turn.")]
    NotYourTurn,
    #[error("Invalid roll range. You must roll 1–{ceiling}.")]
    InvalidRollRange { ceiling: u64 },
}

/// マッチングキュー・接続レジストリ・セッションテーブルの単一オーナー。
/// 全操作はDeathrollManagerアクターのメールボックス経由で直列化され、
/// 1操作が完了するまで次の操作は開始されない
pub struct DeathrollState {
    /// 対戦相手待ちの接続（FIFO）
    queue: VecDeque<ConnId>,
    /// 接続→所属ルーム。対戦中のプレイヤーだけが登録される
    registry: HashMap<ConnId, RoomId>,
    /// ルーム→対戦状態
    rooms: HashMap<RoomId, Duel>,
    /// 接続→送信チャンネル（送信は投げっぱなし）
    senders: HashMap<ConnId, mpsc::UnboundedSender<ServerMessage>>,
    dice: Box<dyn Dice>,
}

impl DeathrollState {
    pub fn new(dice: Box<dyn Dice>) -> Self {
        Self {
            queue: VecDeque::new(),
            registry: HashMap::new(),
            rooms: HashMap::new(),
            senders: HashMap::new(),
            dice,
        }
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_registered(&self, conn: ConnId) -> bool {
        self.registry.contains_key(&conn)
    }

    /// 接続確立。以降この接続宛のメッセージは tx に流れる
    pub fn connect(&mut self, conn: ConnId, tx: mpsc::UnboundedSender<ServerMessage>) {
        log::debug!("connected: conn={}", conn);
        self.senders.insert(conn, tx);
    }

    /// 切断処理。キュー待ちなら除去、対戦中なら相手の不戦勝で終了する
    pub fn disconnect(&mut self, conn: ConnId) {
        self.queue.retain(|c| *c != conn);

        let room_id = self.registry.get(&conn).copied();
        let forfeit = room_id.and_then(|room_id| {
            self.rooms
                .get(&room_id)
                .map(|duel| (room_id, duel.role_of(conn), duel.opponent_of(conn), duel.players))
        });
        if let Some((room_id, role, opponent, players)) = forfeit {
            log::info!("room {}: {} disconnected mid-match", room_id, role);
            self.broadcast(&players, ServerMessage::system(format!("{role} disconnected.")));
            self.finish(room_id, opponent, conn);
        }

        self.senders.remove(&conn);
        log::debug!("disconnected: conn={}", conn);
    }

    /// マッチングキューへの参加要求
    pub fn enter_queue(&mut self, conn: ConnId) {
        if self.registry.contains_key(&conn) {
            self.report(conn, GameError::AlreadyMatched);
            return;
        }
        if self.queue.contains(&conn) {
            self.report(conn, GameError::AlreadyQueued);
            return;
        }

        self.queue.push_back(conn);
        self.send_to(conn, ServerMessage::system("Searching for an opponent..."));
        log::debug!("queued: conn={} (waiting={})", conn, self.queue.len());

        // 2人揃ったら先着順にペアリング
        while self.queue.len() >= 2 {
            let (Some(player_a), Some(player_b)) = (self.queue.pop_front(), self.queue.pop_front())
            else {
                break;
            };
            self.create_room(player_a, player_b);
        }
    }

    /// ベット額の提示。両者の額が一致した時点で確定
    pub fn place_bet(&mut self, conn: ConnId, amount: i64) {
        let Some(&room_id) = self.registry.get(&conn) else {
            self.report(conn, GameError::NotInMatch);
            return;
        };
        let Some(duel) = self.rooms.get_mut(&room_id) else {
            return;
        };

        // 金額の数値検証は行わない（一致のみが合意条件）
        let locked = duel.record_bet(conn, amount);
        let role = duel.role_of(conn);
        let players = duel.players;
        let ceiling = duel.ceiling;

        self.broadcast(&players, ServerMessage::system(format!("{role} set bet: {amount}g")));
        if locked {
            log::info!("room {}: bets locked at {}g", room_id, amount);
            self.broadcast(
                &players,
                ServerMessage::system(format!("Bets locked. Type /roll {ceiling} to start.")),
            );
        }
    }

    /// ロール処理。手番と指定上限を検証し、1が出たら決着
    pub fn roll(&mut self, conn: ConnId, max_roll: u64) {
        let Some(&room_id) = self.registry.get(&conn) else {
            self.report(conn, GameError::NotInMatch);
            return;
        };
        let (players, turn, ceiling, role) = match self.rooms.get(&room_id) {
            Some(duel) => (duel.players, duel.turn, duel.ceiling, duel.role_of(conn)),
            None => return,
        };

        if turn != conn {
            self.report(conn, GameError::NotYourTurn);
            return;
        }
        // 上限は u64 同士の比較のみ（文字列比較はしない）
        if max_roll != ceiling {
            self.report(conn, GameError::InvalidRollRange { ceiling });
            return;
        }

        let rolled = self.dice.roll(ceiling);
        log::debug!("room {}: {} rolled {} (1–{})", room_id, role, rolled, ceiling);
        self.broadcast(&players, ServerMessage::chat(format!("{role} rolled {rolled} (1–{ceiling})")));

        if rolled == 1 {
            let winner = if conn == players[0] { players[1] } else { players[0] };
            self.finish(room_id, winner, conn);
        } else if let Some(duel) = self.rooms.get_mut(&room_id) {
            duel.ceiling = rolled;
            duel.turn = duel.opponent_of(conn);
        }
    }

    /// ルーム内チャット。空文字は黙って破棄
    pub fn chat(&mut self, conn: ConnId, text: &str) {
        let Some(&room_id) = self.registry.get(&conn) else {
            self.report(conn, GameError::NotInMatch);
            return;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        let Some(duel) = self.rooms.get(&room_id) else {
            return;
        };
        let role = duel.role_of(conn);
        let players = duel.players;
        self.broadcast(&players, ServerMessage::chat(format!("{role}: {trimmed}")));
    }

    /// ルーム作成。ロール通知と開始アナウンスまで行う
    fn create_room(&mut self, player_a: ConnId, player_b: ConnId) {
        let room_id = Uuid::new_v4();
        let duel = Duel::new(player_a, player_b);
        self.registry.insert(player_a, room_id);
        self.registry.insert(player_b, room_id);
        self.rooms.insert(room_id, duel);
        log::info!("room {}: matched {} vs {}", room_id, player_a, player_b);

        self.send_to(player_a, ServerMessage::role(PlayerRole::PlayerA));
        self.send_to(player_b, ServerMessage::role(PlayerRole::PlayerB));
        self.broadcast(
            &[player_a, player_b],
            ServerMessage::system("Match found! Agree on a bet."),
        );
    }

    /// 対戦終了。結果を配信してルームとレジストリを片付ける
    fn finish(&mut self, room_id: RoomId, winner: ConnId, loser: ConnId) {
        let Some(duel) = self.rooms.remove(&room_id) else {
            return;
        };
        for player in duel.players {
            self.registry.remove(&player);
        }

        let bet = duel.settled_bet();
        let winner_role = duel.role_of(winner);
        let loser_role = duel.role_of(loser);
        log::info!(
            "room {}: {} wins, {} loses (bet={}g)",
            room_id,
            winner_role,
            loser_role,
            bet
        );

        self.broadcast(
            &duel.players,
            ServerMessage::system(format!("{loser_role} loses the deathroll.")),
        );
        self.broadcast(
            &duel.players,
            ServerMessage::Result {
                winner: winner_role,
                loser: loser_role,
                bet,
                timestamp: chrono::Utc::now(),
            },
        );
    }

    /// エラーは当該接続へのsystemメッセージとして報告
    fn report(&self, conn: ConnId, error: GameError) {
        self.send_to(conn, ServerMessage::system(error.to_string()));
    }

    fn send_to(&self, conn: ConnId, msg: ServerMessage) {
        if let Some(tx) = self.senders.get(&conn) {
            let _ = tx.send(msg);
        }
    }

    fn broadcast(&self, players: &[ConnId], msg: ServerMessage) {
        for player in players {
            self.send_to(*player, msg.clone());
        }
    }
}
