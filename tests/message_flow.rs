//! Integration tests for message routing and roster bookkeeping.

mod common;

use common::{logged_in_bot, SinkEvent};

#[tokio::test]
async fn chat_message_reaches_the_command_layer() {
    let mut bot = logged_in_bot().await;

    bot.handler.handle_frame("lobby|c|Bob|hello").await.unwrap();

    assert_eq!(
        bot.sink.messages(),
        vec![SinkEvent::Message {
            sender: "Bob".to_owned(),
            room: Some("lobby".to_owned()),
            text: "hello".to_owned(),
        }]
    );
}

#[tokio::test]
async fn private_message_has_no_room() {
    let mut bot = logged_in_bot().await;

    bot.handler
        .handle_frame("|pm|+Bob| Warble|hey there")
        .await
        .unwrap();

    assert_eq!(
        bot.sink.messages(),
        vec![SinkEvent::Message {
            sender: "+Bob".to_owned(),
            room: None,
            text: "hey there".to_owned(),
        }]
    );
}

#[tokio::test]
async fn own_messages_never_loop_back() {
    let mut bot = logged_in_bot().await;

    // Rank glyphs and case differences still normalize to our own id.
    bot.handler.handle_frame("lobby|c|Warble|echo?").await.unwrap();
    bot.handler
        .handle_frame("lobby|c|+WARBLE|echo?")
        .await
        .unwrap();
    bot.handler
        .handle_frame("|pm|Warble| Bob|echo?")
        .await
        .unwrap();
    bot.handler
        .handle_frame(">lobby\n|c:|1700000000|Warble|echo?")
        .await
        .unwrap();

    assert!(bot.sink.messages().is_empty());
}

#[tokio::test]
async fn timestamped_chat_is_always_logged() {
    let mut bot = logged_in_bot().await;

    // Our own line: suppressed for the command layer, logged anyway.
    bot.handler
        .handle_frame(">lobby\n|c:|1700000000|+Warble|mine")
        .await
        .unwrap();
    // Another user's line: logged and forwarded.
    bot.handler
        .handle_frame(">lobby\n|c:|1700000001|Bob|yours")
        .await
        .unwrap();

    let entries = bot.chat_log.entries.lock().clone();
    assert_eq!(
        entries,
        vec![
            (
                "1700000000".to_owned(),
                "lobby".to_owned(),
                "warble".to_owned(),
                "mine".to_owned()
            ),
            (
                "1700000001".to_owned(),
                "lobby".to_owned(),
                "bob".to_owned(),
                "yours".to_owned()
            ),
        ]
    );
    assert_eq!(bot.sink.messages().len(), 1);
}

#[tokio::test]
async fn messages_before_login_are_forwarded() {
    // Until authentication there is no own id to suppress.
    let mut bot = common::build_bot(
        common::test_config(&["lobby"]),
        common::StubAuth::ok("tok3n"),
        std::sync::Arc::new(warble::settings::MemorySettings::default()),
    );

    bot.handler.handle_frame("lobby|c|Warble|hi").await.unwrap();
    assert_eq!(bot.sink.messages().len(), 1);
}

#[tokio::test]
async fn tournament_batch_dispatches_in_order() {
    let mut bot = logged_in_bot().await;

    bot.handler
        .handle_frame(">tours\n|tournament|create|gen9ou|elimination\n|tournament|update|{\"format\":\"gen9ou\"}")
        .await
        .unwrap();

    let tournaments: Vec<SinkEvent> = bot
        .sink
        .events()
        .into_iter()
        .filter(|e| matches!(e, SinkEvent::Tournament { .. }))
        .collect();
    assert_eq!(
        tournaments,
        vec![
            SinkEvent::Tournament {
                room: "tours".to_owned(),
                tag: "create".to_owned(),
                args: vec!["gen9ou".to_owned(), "elimination".to_owned()],
            },
            SinkEvent::Tournament {
                room: "tours".to_owned(),
                tag: "update".to_owned(),
                args: vec!["{\"format\":\"gen9ou\"}".to_owned()],
            },
        ]
    );
}

#[tokio::test]
async fn modnote_reaches_the_note_sink() {
    let mut bot = logged_in_bot().await;

    bot.handler
        .handle_frame(">lobby\n(Bob was muted by Staff.)")
        .await
        .unwrap();

    assert_eq!(
        bot.sink.events(),
        vec![SinkEvent::Modnote {
            room: "lobby".to_owned(),
            note: "Bob was muted by Staff.".to_owned(),
        }]
    );
}

#[tokio::test]
async fn joins_and_leaves_track_the_roster() {
    let mut bot = logged_in_bot().await;

    bot.handler.handle_frame(">tech\n|J|+Bob").await.unwrap();
    assert!(bot.handler.roster().contains("tech", "bob"));
    assert!(bot.sink.events().contains(&SinkEvent::Join {
        user: "+Bob".to_owned(),
        room: "tech".to_owned(),
    }));

    bot.handler.handle_frame(">tech\n|L|+Bob").await.unwrap();
    assert!(!bot.handler.roster().contains("tech", "bob"));
}

#[tokio::test]
async fn rename_swaps_identities_atomically() {
    let mut bot = logged_in_bot().await;

    bot.handler.handle_frame(">tech\n|J|oldname").await.unwrap();
    bot.handler
        .handle_frame(">tech\n|N|New Name|oldname")
        .await
        .unwrap();

    assert!(!bot.handler.roster().contains("tech", "oldname"));
    assert!(bot.handler.roster().contains("tech", "newname"));
    assert_eq!(bot.handler.roster().room_len("tech"), 1);
}

#[tokio::test]
async fn room_init_replaces_the_roster() {
    let mut bot = logged_in_bot().await;

    bot.handler.handle_frame(">tech\n|J|Old Timer").await.unwrap();
    bot.handler
        .handle_frame(">tech\n|init|chat\n|title|Tech\n|users|3,@Ann,+Bob,cy\n")
        .await
        .unwrap();

    let roster = bot.handler.roster();
    assert_eq!(roster.room_len("tech"), 3);
    assert!(!roster.contains("tech", "oldtimer"));
    for id in ["ann", "bob", "cy"] {
        assert!(roster.contains("tech", id), "missing {id}");
    }
}

#[tokio::test]
async fn empty_and_unknown_frames_change_nothing() {
    let mut bot = logged_in_bot().await;
    let lines_before = bot.outbound.lines().len();

    bot.handler.handle_frame("").await.unwrap();
    bot.handler
        .handle_frame("lobby|raw|<div>motd</div>")
        .await
        .unwrap();
    bot.handler.handle_frame("lobby|queryresponse|x").await.unwrap();

    assert!(bot.sink.events().is_empty());
    assert_eq!(bot.outbound.lines().len(), lines_before);
}

#[tokio::test]
async fn handler_send_helpers_use_the_wire_format() {
    let bot = logged_in_bot().await;

    bot.handler.send(Some("lobby"), "hello").await;
    bot.handler.send(None, "/status").await;
    bot.handler.send_pm("Bob", "hi there").await;

    let lines = bot.outbound.lines();
    let tail = &lines[lines.len() - 3..];
    assert_eq!(
        tail,
        ["lobby|hello", "|/status", "|/w Bob, hi there"]
    );
}
