//! Unit tests for the framing heuristics, driven over in-memory duplex
//! streams with paused time so idle windows elapse instantly.

use std::time::Duration;

use tokio::io::AsyncWriteExt;

use super::{FrameReceiver, IdleTimeoutReceiver, NewlineDelimitedReceiver};

const WINDOW: Duration = Duration::from_millis(200);
const CAP: usize = 64 * 1024;

#[tokio::test(start_paused = true)]
async fn idle_window_ends_the_batch() {
    let (mut reader, mut writer) = tokio::io::duplex(256);
    writer.write_all(b"{\"status\":\"SUCCESS\"}").await.expect("write");

    let text = IdleTimeoutReceiver.receive(&mut reader, WINDOW, CAP).await;
    assert_eq!(text, "{\"status\":\"SUCCESS\"}");
    drop(writer);
}

#[tokio::test(start_paused = true)]
async fn peer_close_returns_buffered_bytes_not_an_error() {
    let (mut reader, mut writer) = tokio::io::duplex(256);
    writer.write_all(b"partial").await.expect("write");
    drop(writer);

    let text = IdleTimeoutReceiver.receive(&mut reader, WINDOW, CAP).await;
    assert_eq!(text, "partial");
}

#[tokio::test(start_paused = true)]
async fn immediate_peer_close_yields_empty_batch() {
    let (mut reader, writer) = tokio::io::duplex(256);
    drop(writer);

    let text = IdleTimeoutReceiver.receive(&mut reader, WINDOW, CAP).await;
    assert!(text.is_empty());
}

#[tokio::test(start_paused = true)]
async fn cap_stops_reading_but_keeps_the_straddling_chunk() {
    let (mut reader, mut writer) = tokio::io::duplex(256);
    writer.write_all(b"0123456789X").await.expect("write");

    // Eleven bytes arrive in one chunk against a ten byte cap: the chunk is
    // returned whole and no further read is attempted.
    let text = IdleTimeoutReceiver.receive(&mut reader, WINDOW, 10).await;
    assert_eq!(text, "0123456789X");
    drop(writer);
}

#[tokio::test(start_paused = true)]
async fn undecodable_bytes_are_replaced_not_fatal() {
    let (mut reader, mut writer) = tokio::io::duplex(256);
    writer.write_all(b"ok\xff\xfeok").await.expect("write");
    drop(writer);

    let text = IdleTimeoutReceiver.receive(&mut reader, WINDOW, CAP).await;
    assert!(text.starts_with("ok"));
    assert!(text.ends_with("ok"));
    assert!(text.contains('\u{fffd}'));
}

#[tokio::test(start_paused = true)]
async fn newline_receiver_terminates_on_first_newline_chunk() {
    let (mut reader, mut writer) = tokio::io::duplex(256);
    writer
        .write_all(b"{\"status\":\"success\"}\n")
        .await
        .expect("write");

    // Writer stays open: termination must come from the newline, not from
    // the peer closing.
    let text = NewlineDelimitedReceiver.receive(&mut reader, WINDOW, CAP).await;
    assert_eq!(text, "{\"status\":\"success\"}\n");
    drop(writer);
}

#[tokio::test(start_paused = true)]
async fn newline_receiver_falls_back_to_the_window_without_a_newline() {
    let (mut reader, mut writer) = tokio::io::duplex(256);
    writer.write_all(b"no terminator").await.expect("write");

    let text = NewlineDelimitedReceiver.receive(&mut reader, WINDOW, CAP).await;
    assert_eq!(text, "no terminator");
    drop(writer);
}
