use crate::game::manager::{
    Connect, DeathrollManager, Disconnect, EnterQueue, PlaceBet, RollDice, SendChat,
};
use crate::models::{ClientMessage, ConnId, ServerMessage};
use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

/// WebSocketアクター。接続1本ごとに1つ生成される
pub struct WsSession {
    /// 接続ID
    conn_id: ConnId,
    /// ハートビート最終時刻
    hb: Instant,
    /// デスロール管理アクターのアドレス
    manager: Addr<DeathrollManager>,
    /// メッセージ受信チャンネル
    rx: Option<mpsc::UnboundedReceiver<ServerMessage>>,
    /// メッセージ送信チャンネル
    tx: mpsc::UnboundedSender<ServerMessage>,
}

impl WsSession {
    pub fn new(manager: Addr<DeathrollManager>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            conn_id: Uuid::new_v4(),
            hb: Instant::now(),
            manager,
            rx: Some(rx),
            tx,
        }
    }

    /// ハートビート送信
    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(Duration::from_secs(5), |act, ctx| {
            if Instant::now().duration_since(act.hb) > Duration::from_secs(10) {
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    /// メッセージポーリング
    fn poll_messages(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(Duration::from_millis(10), |act, ctx| {
            if let Some(rx) = &mut act.rx {
                while let Ok(msg) = rx.try_recv() {
                    if let Ok(json) = serde_json::to_string(&msg) {
                        ctx.text(json);
                    }
                }
            }
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        log::debug!("ws session started: conn={}", self.conn_id);
        self.hb(ctx);
        self.poll_messages(ctx);
        self.manager.do_send(Connect {
            conn_id: self.conn_id,
            tx: self.tx.clone(),
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        log::debug!("ws session stopped: conn={}", self.conn_id);
        self.manager.do_send(Disconnect {
            conn_id: self.conn_id,
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                // 不正なペイロード（数値でないベット額など）はここで弾いて
                // エラー報告に変換する。セッションは落とさない
                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Queue) => {
                        self.manager.do_send(EnterQueue {
                            conn_id: self.conn_id,
                        });
                    }
                    Ok(ClientMessage::Bet { amount }) => {
                        self.manager.do_send(PlaceBet {
                            conn_id: self.conn_id,
                            amount,
                        });
                    }
                    Ok(ClientMessage::Roll { max_roll }) => {
                        self.manager.do_send(RollDice {
                            conn_id: self.conn_id,
                            max_roll,
                        });
                    }
                    Ok(ClientMessage::Chat { text }) => {
                        self.manager.do_send(SendChat {
                            conn_id: self.conn_id,
                            text,
                        });
                    }
                    Err(e) => {
                        log::debug!("invalid ws message from {}: {}", self.conn_id, e);
                        let error_msg = ServerMessage::Error {
                            message: format!("Invalid message format: {}", text),
                        };
                        if let Ok(json) = serde_json::to_string(&error_msg) {
                            ctx.text(json);
                        }
                    }
                }
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            _ => {}
        }
    }
}

/// WebSocketエンドポイント
pub async fn ws_handler(
    req: HttpRequest,
    stream: web::Payload,
    manager: web::Data<Addr<DeathrollManager>>,
) -> Result<HttpResponse, Error> {
    ws::start(WsSession::new(manager.get_ref().clone()), &req, stream)
}
