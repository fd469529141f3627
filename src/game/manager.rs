use crate::game::state::{DeathrollState, Dice, StandardDice};
use crate::models::{ConnId, ServerMessage};
use actix::prelude::*;
use tokio::sync::mpsc;

/// デスロール管理アクター。
/// 全ての状態変更はこのアクターのメールボックスで直列化されるため、
/// キュー・レジストリ・ルームが操作の途中状態で観測されることはない
pub struct DeathrollManager {
    state: DeathrollState,
}

impl DeathrollManager {
    pub fn new() -> Self {
        Self {
            state: DeathrollState::new(Box::new(StandardDice::new())),
        }
    }

    /// テスト用: サイコロを差し替えて生成
    pub fn with_dice(dice: Box<dyn Dice>) -> Self {
        Self {
            state: DeathrollState::new(dice),
        }
    }
}

impl Default for DeathrollManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for DeathrollManager {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        log::info!("deathroll manager started");
    }
}

// メッセージ: 接続確立
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub conn_id: ConnId,
    pub tx: mpsc::UnboundedSender<ServerMessage>,
}

impl Handler<Connect> for DeathrollManager {
    type Result = ();

    fn handle(&mut self, msg: Connect, _ctx: &mut Self::Context) {
        self.state.connect(msg.conn_id, msg.tx);
    }
}

// メッセージ: 切断
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub conn_id: ConnId,
}

impl Handler<Disconnect> for DeathrollManager {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _ctx: &mut Self::Context) {
        self.state.disconnect(msg.conn_id);
    }
}

// メッセージ: マッチングキュー参加
#[derive(Message)]
#[rtype(result = "()")]
pub struct EnterQueue {
    pub conn_id: ConnId,
}

impl Handler<EnterQueue> for DeathrollManager {
    type Result = ();

    fn handle(&mut self, msg: EnterQueue, _ctx: &mut Self::Context) {
        self.state.enter_queue(msg.conn_id);
    }
}

// メッセージ: ベット提示
#[derive(Message)]
#[rtype(result = "()")]
pub struct PlaceBet {
    pub conn_id: ConnId,
    pub amount: i64,
}

impl Handler<PlaceBet> for DeathrollManager {
    type Result = ();

    fn handle(&mut self, msg: PlaceBet, _ctx: &mut Self::Context) {
        self.state.place_bet(msg.conn_id, msg.amount);
    }
}

// メッセージ: ロール
#[derive(Message)]
#[rtype(result = "()")]
pub struct RollDice {
    pub conn_id: ConnId,
    pub max_roll: u64,
}

impl Handler<RollDice> for DeathrollManager {
    type Result = ();

    fn handle(&mut self, msg: RollDice, _ctx: &mut Self::Context) {
        self.state.roll(msg.conn_id, msg.max_roll);
    }
}

// メッセージ: チャット
#[derive(Message)]
#[rtype(result = "()")]
pub struct SendChat {
    pub conn_id: ConnId,
    pub text: String,
}

impl Handler<SendChat> for DeathrollManager {
    type Result = ();

    fn handle(&mut self, msg: SendChat, _ctx: &mut Self::Context) {
        self.state.chat(msg.conn_id, &msg.text);
    }
}
