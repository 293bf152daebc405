//! Unit tests for request-line rendering, response classification, and
//! upload payload framing.

use rstest::rstest;

use super::{EOF_SENTINEL, LineCommand, ResponseMode, UploadReply, frame_upload_payload};

#[rstest]
#[case::login(
    LineCommand::Login { username: "alice".into(), password: "s3cret".into() },
    "LOGIN alice s3cret\n"
)]
#[case::logout(LineCommand::Logout, "LOGOUT\n")]
#[case::dir_list(LineCommand::DirList { path: "/docs".into() }, "DIR_LIST /docs\n")]
#[case::create(LineCommand::Create { path: "/a.txt".into() }, "CREATE /a.txt\n")]
#[case::edit(LineCommand::Edit { path: "/a.txt".into(), index: 0 }, "EDIT /a.txt 0\n")]
#[case::rename(
    LineCommand::RenameFile { old: "/a".into(), new: "/b".into() },
    "RENAME_FILE /a /b\n"
)]
#[case::set_permissions(
    LineCommand::SetPermissions { path: "/a".into(), mode: "0755".into() },
    "SET_PERMISSIONS /a 0755\n"
)]
#[case::set_owner(
    LineCommand::SetOwner { path: "/a".into(), user: "bob".into() },
    "SET_OWNER /a bob\n"
)]
#[case::create_user(
    LineCommand::CreateUser { username: "bob".into(), password: "pw".into(), role: "1".into() },
    "CREATE_USER bob pw 1\n"
)]
#[case::delete_user(LineCommand::DeleteUser { username: "bob".into() }, "DELETE_USER bob\n")]
#[case::stats(LineCommand::GetStats, "GET_STATS\n")]
#[case::exit(LineCommand::Exit, "EXIT\n")]
fn commands_encode_as_newline_terminated_lines(
    #[case] command: LineCommand,
    #[case] expected: &str,
) {
    assert_eq!(command.encode(), expected);
}

#[rstest]
#[case::dir_list(LineCommand::DirList { path: "/".into() }, ResponseMode::Multi)]
#[case::list_users(LineCommand::ListUsers, ResponseMode::Multi)]
#[case::read(LineCommand::Read { path: "/a".into() }, ResponseMode::Single)]
#[case::login(
    LineCommand::Login { username: "a".into(), password: "b".into() },
    ResponseMode::Single
)]
#[case::stats(LineCommand::GetStats, ResponseMode::Single)]
fn classification_table_marks_listing_verbs_multi(
    #[case] command: LineCommand,
    #[case] expected: ResponseMode,
) {
    assert_eq!(command.response_mode(), expected);
}

#[test]
fn payload_without_trailing_newline_gains_exactly_one() {
    let payload = frame_upload_payload("hello world");
    assert_eq!(payload, b"hello world\n<<<EOF>>>\n");
}

#[test]
fn payload_with_trailing_newline_is_not_doubled() {
    let payload = frame_upload_payload("line one\nline two\n");
    assert_eq!(payload, b"line one\nline two\n<<<EOF>>>\n");
}

#[test]
fn empty_payload_still_carries_the_sentinel_line() {
    let payload = frame_upload_payload("");
    let expected = format!("\n{EOF_SENTINEL}\n");
    assert_eq!(payload, expected.as_bytes());
}

#[test]
fn upload_reply_acknowledgement_is_confined_to_completed_results() {
    let done = UploadReply::Completed {
        acknowledged: true,
        reply: "{\"status\":\"SUCCESS_CREATE\"}".into(),
    };
    assert!(done.acknowledged());

    let prompt_only = UploadReply::PromptOnly {
        prompt: "{\"status\":\"SUCCESS_PROMPT\"}".into(),
    };
    assert!(!prompt_only.acknowledged());
    assert!(prompt_only.text().contains("PROMPT"));
}
