//! Integration tests for the line-command wire shape against scripted mock
//! servers.

use ofswire::{EntryKind, UploadReply, WireShape};
use tokio::io::{AsyncWriteExt, BufReader};

mod common;
use common::{TestResult, bind, client_for, read_line};

#[tokio::test]
async fn dir_list_batch_becomes_an_ordered_listing() -> TestResult {
    let (listener, addr) = bind().await?;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut reader = BufReader::new(stream);
        let line = read_line(&mut reader).await.expect("command line");
        assert_eq!(line, "DIR_LIST /\n");
        reader
            .get_mut()
            .write_all(br#"{"param2":"D:docs"}{"param2":"F:readme.txt"}"#)
            .await
            .expect("write listing");
        reader
    });

    let mut client = client_for(addr, WireShape::LineCommand).connect().await?;
    let listing = client.list("/").await?;
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].name, "docs");
    assert_eq!(listing[0].kind, EntryKind::Dir);
    assert_eq!(listing[1].name, "readme.txt");
    assert_eq!(listing[1].kind, EntryKind::File);

    drop(server.await?);
    Ok(())
}

#[tokio::test]
async fn login_succeeds_only_on_the_exact_marker() -> TestResult {
    let (listener, addr) = bind().await?;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut reader = BufReader::new(stream);
        let line = read_line(&mut reader).await.expect("command line");
        assert_eq!(line, "LOGIN alice s3cret\n");
        reader
            .get_mut()
            .write_all(br#"{"status":"SUCCESS_LOGIN"}"#)
            .await
            .expect("write reply");
        reader
    });

    let mut client = client_for(addr, WireShape::LineCommand).connect().await?;
    assert!(client.login("alice", "s3cret").await?);
    assert!(client.session().logged_in());
    assert_eq!(client.session().username(), Some("alice"));

    drop(server.await?);
    Ok(())
}

#[tokio::test]
async fn rejected_login_leaves_the_session_anonymous() -> TestResult {
    let (listener, addr) = bind().await?;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut reader = BufReader::new(stream);
        let _ = read_line(&mut reader).await.expect("command line");
        // A generic SUCCESS is not good enough for login.
        reader
            .get_mut()
            .write_all(br#"{"status":"SUCCESS_NORELATION"}"#)
            .await
            .expect("write reply");
        reader
    });

    let mut client = client_for(addr, WireShape::LineCommand).connect().await?;
    assert!(!client.login("alice", "wrong").await?);
    assert!(!client.session().logged_in());
    assert_eq!(client.session().username(), None);

    drop(server.await?);
    Ok(())
}

#[tokio::test]
async fn server_greeting_is_drained_before_the_first_exchange() -> TestResult {
    let (listener, addr) = bind().await?;
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        stream
            .write_all(b"WELCOME TO OFS v2\n")
            .await
            .expect("write greeting");
        let mut reader = BufReader::new(stream);
        let line = read_line(&mut reader).await.expect("command line");
        assert_eq!(line, "LOGIN alice pw\n");
        reader
            .get_mut()
            .write_all(br#"{"status":"SUCCESS_LOGIN"}"#)
            .await
            .expect("write reply");
        reader
    });

    let mut client = client_for(addr, WireShape::LineCommand).connect().await?;
    // The greeting must not be mistaken for the login reply.
    assert!(client.login("alice", "pw").await?);

    drop(server.await?);
    Ok(())
}

#[tokio::test]
async fn logout_clears_local_state_even_when_the_server_is_gone() -> TestResult {
    // Reserve a port, then free it so the connect is refused.
    let (listener, addr) = bind().await?;
    drop(listener);

    let mut client = client_for(addr, WireShape::LineCommand).build();
    assert!(!client.logout().await);
    assert!(!client.session().logged_in());
    assert_eq!(client.session().username(), None);
    Ok(())
}

#[tokio::test]
async fn upload_handshake_frames_payload_with_one_newline_and_sentinel() -> TestResult {
    let (listener, addr) = bind().await?;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut reader = BufReader::new(stream);
        let line = read_line(&mut reader).await.expect("command line");
        assert_eq!(line, "CREATE /notes.txt\n");
        reader
            .get_mut()
            .write_all(br#"{"status":"SUCCESS_SEND_CONTENT"}"#)
            .await
            .expect("write prompt");

        // Collect payload lines up to and including the sentinel.
        let mut payload = String::new();
        loop {
            let line = read_line(&mut reader).await.expect("payload line");
            payload.push_str(&line);
            if line == "<<<EOF>>>\n" {
                break;
            }
        }
        reader
            .get_mut()
            .write_all(br#"{"status":"SUCCESS_CREATE"}"#)
            .await
            .expect("write result");
        payload
    });

    let mut client = client_for(addr, WireShape::LineCommand).connect().await?;
    let reply = client.create("/notes.txt", "hello world").await?;
    assert!(reply.acknowledged());
    assert!(matches!(reply, UploadReply::Completed { .. }));

    let payload = server.await?;
    assert_eq!(payload, "hello world\n<<<EOF>>>\n");
    Ok(())
}

#[tokio::test]
async fn silent_final_read_yields_the_prompt_only_variant() -> TestResult {
    let (listener, addr) = bind().await?;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut reader = BufReader::new(stream);
        let _ = read_line(&mut reader).await.expect("command line");
        reader
            .get_mut()
            .write_all(br#"{"status":"SUCCESS_SEND_CONTENT"}"#)
            .await
            .expect("write prompt");
        loop {
            let line = read_line(&mut reader).await.expect("payload line");
            if line == "<<<EOF>>>\n" {
                break;
            }
        }
        // Say nothing more, but hold the connection open through the
        // client's result window.
        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
        reader
    });

    let mut client = client_for(addr, WireShape::LineCommand).connect().await?;
    let reply = client.edit("/notes.txt", 0, "patched").await?;
    match reply {
        UploadReply::PromptOnly { ref prompt } => {
            assert!(prompt.contains("SUCCESS_SEND_CONTENT"));
        }
        UploadReply::Completed { .. } => panic!("expected the prompt-only variant"),
    }
    assert!(!reply.acknowledged());

    drop(server.await?);
    Ok(())
}

#[tokio::test]
async fn byte_cap_stops_reading_after_the_first_chunk() -> TestResult {
    let (listener, addr) = bind().await?;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut reader = BufReader::new(stream);
        let _ = read_line(&mut reader).await.expect("command line");
        reader
            .get_mut()
            .write_all(b"0123456789X")
            .await
            .expect("write first chunk");
        // Well past the cap by now; the client must not collect this.
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        let _ = reader.get_mut().write_all(b"MORE").await;
        reader
    });

    let mut client = client_for(addr, WireShape::LineCommand)
        .max_response_bytes(10)
        .connect()
        .await?;
    let text = client.read("/big.bin").await?;
    assert_eq!(text, "0123456789X");

    drop(server.await?);
    Ok(())
}

#[tokio::test]
async fn peer_close_mid_read_returns_the_buffered_prefix() -> TestResult {
    let (listener, addr) = bind().await?;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut reader = BufReader::new(stream);
        let _ = read_line(&mut reader).await.expect("command line");
        reader
            .get_mut()
            .write_all(br#"{"param2":"F:only.txt"}{"param2":"D:cut"#)
            .await
            .expect("write partial batch");
        // Drop closes the socket mid-batch.
    });

    let mut client = client_for(addr, WireShape::LineCommand).connect().await?;
    let listing = client.list("/").await?;
    // The truncated record is dropped by the tokenizer; the complete one
    // survives.
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].name, "only.txt");

    server.await?;
    Ok(())
}

#[tokio::test]
async fn list_users_keeps_only_user_records() -> TestResult {
    let (listener, addr) = bind().await?;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut reader = BufReader::new(stream);
        let line = read_line(&mut reader).await.expect("command line");
        assert_eq!(line, "LIST_USERS\n");
        reader
            .get_mut()
            .write_all(
                br#"{"user":"1","param2":"alice"}{"status":"SUCCESS_LIST"}{"user":"1","param2":"bob"}"#,
            )
            .await
            .expect("write users");
        reader
    });

    let mut client = client_for(addr, WireShape::LineCommand).connect().await?;
    let users = client.list_users().await?;
    assert_eq!(users, vec!["alice".to_owned(), "bob".to_owned()]);

    drop(server.await?);
    Ok(())
}

#[tokio::test]
async fn acknowledged_commands_report_the_success_marker() -> TestResult {
    let (listener, addr) = bind().await?;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut reader = BufReader::new(stream);

        let line = read_line(&mut reader).await.expect("command line");
        assert_eq!(line, "DIR_CREATE /new\n");
        reader
            .get_mut()
            .write_all(br#"{"status":"SUCCESS_MKDIR"}"#)
            .await
            .expect("write reply");

        let line = read_line(&mut reader).await.expect("command line");
        assert_eq!(line, "DELETE_FILE /gone.txt\n");
        reader
            .get_mut()
            .write_all(br#"{"status":"ERROR_NOT_FOUND"}"#)
            .await
            .expect("write reply");
        reader
    });

    let mut client = client_for(addr, WireShape::LineCommand).connect().await?;
    assert!(client.create_dir("/new").await?);
    assert!(!client.delete_file("/gone.txt").await?);

    drop(server.await?);
    Ok(())
}
