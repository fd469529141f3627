use actix::Actor;
use actix_web::{web, App};
use deathroll_web_server::game::manager::DeathrollManager;
use deathroll_web_server::handlers::ws_handler;
use deathroll_web_server::models::{PlayerRole, ServerMessage};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::{connect_async, tungstenite::Message};

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn connect(srv: &actix_test::TestServer) -> WsStream {
    let url = format!("ws://127.0.0.1:{}/ws", srv.addr().port());
    let (stream, _) = connect_async(&url).await.expect("failed to connect");
    stream
}

async fn send_json(write: &mut SplitSink<WsStream, Message>, value: serde_json::Value) {
    write
        .send(Message::Text(value.to_string().into()))
        .await
        .expect("failed to send message");
}

/// 次のサーバーメッセージを読む（ハートビートは読み飛ばす）
async fn next_msg(read: &mut SplitStream<WsStream>) -> ServerMessage {
    loop {
        let msg = timeout(Duration::from_secs(5), read.next())
            .await
            .expect("timed out waiting for server message")
            .expect("stream closed")
            .expect("websocket error");
        match msg {
            Message::Text(text) => {
                return serde_json::from_str(&text).expect("failed to parse server message")
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {:?}", other),
        }
    }
}

fn start_server() -> actix_test::TestServer {
    let manager = DeathrollManager::new().start();
    actix_test::start(move || {
        App::new()
            .app_data(web::Data::new(manager.clone()))
            .route("/ws", web::get().to(ws_handler))
    })
}

#[actix_rt::test]
async fn test_queue_pairs_two_clients() {
    let srv = start_server();

    let (mut write_a, mut read_a) = connect(&srv).await.split();
    send_json(&mut write_a, json!({"type": "Queue"})).await;
    assert!(matches!(
        next_msg(&mut read_a).await,
        ServerMessage::System { message, .. } if message == "Searching for an opponent..."
    ));

    let (mut write_b, mut read_b) = connect(&srv).await.split();
    send_json(&mut write_b, json!({"type": "Queue"})).await;

    // 両者にロールが配られ、ルームに開始アナウンスが流れる
    assert!(matches!(
        next_msg(&mut read_a).await,
        ServerMessage::Role { role: PlayerRole::PlayerA, .. }
    ));
    assert!(matches!(
        next_msg(&mut read_a).await,
        ServerMessage::System { message, .. } if message == "Match found! Agree on a bet."
    ));

    assert!(matches!(
        next_msg(&mut read_b).await,
        ServerMessage::System { message, .. } if message == "Searching for an opponent..."
    ));
    assert!(matches!(
        next_msg(&mut read_b).await,
        ServerMessage::Role { role: PlayerRole::PlayerB, .. }
    ));
    assert!(matches!(
        next_msg(&mut read_b).await,
        ServerMessage::System { message, .. } if message == "Match found! Agree on a bet."
    ));
}

#[actix_rt::test]
async fn test_full_deathroll_match_over_websocket() {
    let srv = start_server();

    let (mut write_a, mut read_a) = connect(&srv).await.split();
    send_json(&mut write_a, json!({"type": "Queue"})).await;
    next_msg(&mut read_a).await; // 検索中ACKを待ってから相手を入れる
    let (mut write_b, mut read_b) = connect(&srv).await.split();
    send_json(&mut write_b, json!({"type": "Queue"})).await;

    // ペアリング完了まで読み進める
    for _ in 0..2 {
        next_msg(&mut read_a).await;
    }
    for _ in 0..3 {
        next_msg(&mut read_b).await;
    }

    // ベット合意
    send_json(&mut write_a, json!({"type": "Bet", "data": {"amount": 100}})).await;
    assert!(matches!(
        next_msg(&mut read_a).await,
        ServerMessage::System { message, .. } if message == "PlayerA set bet: 100g"
    ));
    send_json(&mut write_b, json!({"type": "Bet", "data": {"amount": 100}})).await;
    assert!(matches!(
        next_msg(&mut read_a).await,
        ServerMessage::System { message, .. } if message == "PlayerB set bet: 100g"
    ));
    assert!(matches!(
        next_msg(&mut read_a).await,
        ServerMessage::System { message, .. } if message == "Bets locked. Type /roll 1000 to start."
    ));

    // 1が出るまで交互にロールする（Aのストリームで進行を追う）
    let mut ceiling: u64 = 1000;
    let mut a_turn = true;
    let (winner, loser, bet) = 'game: loop {
        if a_turn {
            send_json(&mut write_a, json!({"type": "Roll", "data": {"max_roll": ceiling}})).await;
        } else {
            send_json(&mut write_b, json!({"type": "Roll", "data": {"max_roll": ceiling}})).await;
        }

        loop {
            match next_msg(&mut read_a).await {
                ServerMessage::Chat { message, .. } if message.contains(" rolled ") => {
                    let rolled: u64 = message
                        .split_whitespace()
                        .nth(2)
                        .expect("missing roll value")
                        .parse()
                        .expect("roll value is not a number");
                    assert!(rolled >= 1 && rolled <= ceiling);
                    if rolled > 1 {
                        ceiling = rolled;
                        a_turn = !a_turn;
                        continue 'game;
                    }
                }
                ServerMessage::Result { winner, loser, bet, .. } => {
                    break 'game (winner, loser, bet);
                }
                _ => {}
            }
        }
    };

    // 最後にロールした側が敗者
    let expected_loser = if a_turn {
        PlayerRole::PlayerA
    } else {
        PlayerRole::PlayerB
    };
    assert_eq!(loser, expected_loser);
    assert_ne!(winner, loser);
    assert_eq!(bet, 100);
}

#[actix_rt::test]
async fn test_invalid_roll_range_reported_privately() {
    let srv = start_server();

    let (mut write_a, mut read_a) = connect(&srv).await.split();
    send_json(&mut write_a, json!({"type": "Queue"})).await;
    next_msg(&mut read_a).await;
    let (mut write_b, mut read_b) = connect(&srv).await.split();
    send_json(&mut write_b, json!({"type": "Queue"})).await;
    for _ in 0..2 {
        next_msg(&mut read_a).await;
    }
    for _ in 0..3 {
        next_msg(&mut read_b).await;
    }

    send_json(&mut write_a, json!({"type": "Roll", "data": {"max_roll": 999}})).await;
    assert!(matches!(
        next_msg(&mut read_a).await,
        ServerMessage::System { message, .. }
            if message == "Invalid roll range. You must roll 1–1000."
    ));

    // 相手には何も流れていない: 次に正しいロールをすると
    // 相手が最初に受け取るのはそのロール行になる
    send_json(&mut write_a, json!({"type": "Roll", "data": {"max_roll": 1000}})).await;
    assert!(matches!(
        next_msg(&mut read_b).await,
        ServerMessage::Chat { message, .. } if message.starts_with("PlayerA rolled ")
    ));
}

#[actix_rt::test]
async fn test_malformed_messages_are_reported() {
    let srv = start_server();

    let (mut write, mut read) = connect(&srv).await.split();

    // JSONですらないペイロード
    write
        .send(Message::Text("this is not json".to_string().into()))
        .await
        .expect("failed to send");
    assert!(matches!(
        next_msg(&mut read).await,
        ServerMessage::Error { message } if message.contains("Invalid message format")
    ));

    // 数値でないベット額
    send_json(&mut write, json!({"type": "Bet", "data": {"amount": "all of it"}})).await;
    assert!(matches!(
        next_msg(&mut read).await,
        ServerMessage::Error { message } if message.contains("Invalid message format")
    ));

    // セッションは生きていて通常の操作を受け付ける
    send_json(&mut write, json!({"type": "Queue"})).await;
    assert!(matches!(
        next_msg(&mut read).await,
        ServerMessage::System { message, .. } if message == "Searching for an opponent..."
    ));
}

#[actix_rt::test]
async fn test_bet_before_match_reports_not_in_match() {
    let srv = start_server();

    let (mut write, mut read) = connect(&srv).await.split();
    send_json(&mut write, json!({"type": "Bet", "data": {"amount": 50}})).await;
    assert!(matches!(
        next_msg(&mut read).await,
        ServerMessage::System { message, .. } if message == "You are not in a match."
    ));
}

#[actix_rt::test]
async fn test_disconnect_mid_match_forfeits() {
    let srv = start_server();

    let (mut write_a, mut read_a) = connect(&srv).await.split();
    send_json(&mut write_a, json!({"type": "Queue"})).await;
    next_msg(&mut read_a).await;
    let (mut write_b, mut read_b) = connect(&srv).await.split();
    send_json(&mut write_b, json!({"type": "Queue"})).await;
    for _ in 0..2 {
        next_msg(&mut read_a).await;
    }
    for _ in 0..3 {
        next_msg(&mut read_b).await;
    }

    // Aが切断するとBの不戦勝
    write_a
        .send(Message::Close(None))
        .await
        .expect("failed to close");
    drop(write_a);
    drop(read_a);

    assert!(matches!(
        next_msg(&mut read_b).await,
        ServerMessage::System { message, .. } if message == "PlayerA disconnected."
    ));
    assert!(matches!(
        next_msg(&mut read_b).await,
        ServerMessage::System { message, .. } if message == "PlayerA loses the deathroll."
    ));
    assert!(matches!(
        next_msg(&mut read_b).await,
        ServerMessage::Result {
            winner: PlayerRole::PlayerB,
            loser: PlayerRole::PlayerA,
            bet: 0,
            ..
        }
    ));
}
