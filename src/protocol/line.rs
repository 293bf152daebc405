//! The line-command wire shape.
//!
//! Requests are single text lines, `OPERATION arg1 arg2 ...` terminated by
//! `\n`. Responses are whatever the idle-window receiver collects: zero or
//! more concatenated JSON-like fragments for the tokenizer to split.

/// Literal line marking the end of an uploaded payload.
pub const EOF_SENTINEL: &str = "<<<EOF>>>";

/// Exact marker the server includes in a successful login reply. Partial or
/// ambiguous replies are never trusted as success.
pub const LOGIN_SUCCESS_MARKER: &str = "SUCCESS_LOGIN";

/// Generic acknowledgement marker for all other operations.
pub const SUCCESS_MARKER: &str = "SUCCESS";

/// Verbs whose responses arrive as many concatenated records and therefore
/// need the longer idle window. A static table, not runtime inference, so
/// the list can grow without touching parsing logic.
const MULTI_RESPONSE_VERBS: &[&str] = &["DIR_LIST", "LIST_USERS"];

/// How many response records an operation is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// One record; short idle window.
    Single,
    /// A batch of records; longer idle window so the full batch arrives.
    Multi,
}

/// One request line of the line-command protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    /// `LOGIN user pass`
    Login {
        /// Account name.
        username: String,
        /// Account password, sent in the clear by this protocol.
        password: String,
    },
    /// `LOGOUT`
    Logout,
    /// `DIR_LIST path`
    DirList {
        /// Directory to list.
        path: String,
    },
    /// `DIR_CREATE path`
    DirCreate {
        /// Directory to create.
        path: String,
    },
    /// `CREATE path` — followed by the content-upload handshake.
    Create {
        /// File to create.
        path: String,
    },
    /// `EDIT path index` — followed by the content-upload handshake.
    Edit {
        /// File to edit.
        path: String,
        /// Write position; `0` appends.
        index: u64,
    },
    /// `READ path`
    Read {
        /// File to read.
        path: String,
    },
    /// `RENAME_FILE old new`
    RenameFile {
        /// Current path.
        old: String,
        /// New path.
        new: String,
    },
    /// `TRUNCATE path`
    Truncate {
        /// File to empty.
        path: String,
    },
    /// `DELETE_FILE path`
    DeleteFile {
        /// File to delete.
        path: String,
    },
    /// `DELETE_DIR path`
    DeleteDir {
        /// Directory to delete (must be empty).
        path: String,
    },
    /// `FILE_EXISTS path`
    FileExists {
        /// Path to probe.
        path: String,
    },
    /// `DIR_EXISTS path`
    DirExists {
        /// Path to probe.
        path: String,
    },
    /// `GET_METADATA path`
    GetMetadata {
        /// Path to inspect.
        path: String,
    },
    /// `SET_PERMISSIONS path mode`
    SetPermissions {
        /// Path to modify.
        path: String,
        /// Numeric mode string, e.g. `0755`, passed through opaquely.
        mode: String,
    },
    /// `SET_OWNER path user`
    SetOwner {
        /// Path to modify.
        path: String,
        /// New owning user.
        user: String,
    },
    /// `LIST_USERS`
    ListUsers,
    /// `CREATE_USER user pass role`
    CreateUser {
        /// New account name.
        username: String,
        /// New account password.
        password: String,
        /// Server-defined role token, passed through opaquely.
        role: String,
    },
    /// `DELETE_USER user`
    DeleteUser {
        /// Account to remove.
        username: String,
    },
    /// `GET_SESSION_INFO`
    GetSessionInfo,
    /// `GET_STATS`
    GetStats,
    /// `EXIT`
    Exit,
}

impl LineCommand {
    /// Protocol verb for this command, as it appears on the wire.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Login { .. } => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::DirList { .. } => "DIR_LIST",
            Self::DirCreate { .. } => "DIR_CREATE",
            Self::Create { .. } => "CREATE",
            Self::Edit { .. } => "EDIT",
            Self::Read { .. } => "READ",
            Self::RenameFile { .. } => "RENAME_FILE",
            Self::Truncate { .. } => "TRUNCATE",
            Self::DeleteFile { .. } => "DELETE_FILE",
            Self::DeleteDir { .. } => "DELETE_DIR",
            Self::FileExists { .. } => "FILE_EXISTS",
            Self::DirExists { .. } => "DIR_EXISTS",
            Self::GetMetadata { .. } => "GET_METADATA",
            Self::SetPermissions { .. } => "SET_PERMISSIONS",
            Self::SetOwner { .. } => "SET_OWNER",
            Self::ListUsers => "LIST_USERS",
            Self::CreateUser { .. } => "CREATE_USER",
            Self::DeleteUser { .. } => "DELETE_USER",
            Self::GetSessionInfo => "GET_SESSION_INFO",
            Self::GetStats => "GET_STATS",
            Self::Exit => "EXIT",
        }
    }

    /// Single- or multi-response classification from the static table.
    #[must_use]
    pub fn response_mode(&self) -> ResponseMode {
        if MULTI_RESPONSE_VERBS.contains(&self.verb()) {
            ResponseMode::Multi
        } else {
            ResponseMode::Single
        }
    }

    /// Render the newline-terminated request line.
    #[must_use]
    pub fn encode(&self) -> String {
        let verb = self.verb();
        let mut line = match self {
            Self::Login { username, password } => format!("{verb} {username} {password}"),
            Self::Logout | Self::ListUsers | Self::GetSessionInfo | Self::GetStats | Self::Exit => {
                verb.to_owned()
            }
            Self::DirList { path }
            | Self::DirCreate { path }
            | Self::Create { path }
            | Self::Read { path }
            | Self::Truncate { path }
            | Self::DeleteFile { path }
            | Self::DeleteDir { path }
            | Self::FileExists { path }
            | Self::DirExists { path }
            | Self::GetMetadata { path } => format!("{verb} {path}"),
            Self::Edit { path, index } => format!("{verb} {path} {index}"),
            Self::RenameFile { old, new } => format!("{verb} {old} {new}"),
            Self::SetPermissions { path, mode } => format!("{verb} {path} {mode}"),
            Self::SetOwner { path, user } => format!("{verb} {path} {user}"),
            Self::CreateUser {
                username,
                password,
                role,
            } => format!("{verb} {username} {password} {role}"),
            Self::DeleteUser { username } => format!("{verb} {username}"),
        };
        line.push('\n');
        line
    }
}

/// Outcome of the content-upload handshake.
///
/// The prompt-only case is deliberately a distinct variant rather than an
/// overload of the normal result: an empty final read tells the caller
/// nothing about whether the upload landed, and the prompt text is a
/// diagnostic aid, not a success signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadReply {
    /// The server sent a final result after the payload.
    Completed {
        /// Whether the result carried the acknowledgement marker.
        acknowledged: bool,
        /// Raw result text.
        reply: String,
    },
    /// The final read was empty; only the informational prompt is available.
    PromptOnly {
        /// Raw prompt text collected before the payload was sent.
        prompt: String,
    },
}

impl UploadReply {
    /// Whether the server positively acknowledged the upload.
    #[must_use]
    pub const fn acknowledged(&self) -> bool {
        matches!(
            self,
            Self::Completed {
                acknowledged: true,
                ..
            }
        )
    }

    /// Whatever text the handshake produced, result or prompt.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Completed { reply, .. } => reply,
            Self::PromptOnly { prompt } => prompt,
        }
    }
}

/// Frame `content` for upload: exactly one trailing newline, then the
/// sentinel on its own line.
#[must_use]
pub fn frame_upload_payload(content: &str) -> Vec<u8> {
    let mut payload = content.as_bytes().to_vec();
    if !payload.ends_with(b"\n") {
        payload.push(b'\n');
    }
    payload.extend_from_slice(EOF_SENTINEL.as_bytes());
    payload.push(b'\n');
    payload
}

#[cfg(test)]
mod tests;
