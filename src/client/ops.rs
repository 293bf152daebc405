//! Named logical operations of the client facade.
//!
//! Each operation dispatches on the configured wire shape. Acknowledgement
//! operations return `Ok(bool)`: an unexpected server marker is a plain
//! failure, not an error. The envelope shape speaks a smaller vocabulary;
//! operations outside it return [`OfsError::UnsupportedOperation`] rather
//! than silently falling back to the line shape.

use serde_json::{Value, json};

use super::OfsClient;
use crate::{
    error::OfsError,
    protocol::{
        WireShape,
        envelope::{EnvelopeResponse, ops},
        line::{LOGIN_SUCCESS_MARKER, LineCommand, UploadReply},
    },
    tokenizer::{DirEntry, EntryKind, Record, dir_entries, parse_records},
};

impl OfsClient {
    /// Authenticate. Records the session only when the server's reply
    /// carries the designated success marker.
    ///
    /// # Errors
    ///
    /// Transport and codec failures propagate; a rejected login is
    /// `Ok(false)`.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<bool, OfsError> {
        match self.config.shape {
            WireShape::LineCommand => {
                let reply = self
                    .execute_line(&LineCommand::Login {
                        username: username.to_owned(),
                        password: password.to_owned(),
                    })
                    .await?;
                if reply.contains(LOGIN_SUCCESS_MARKER) {
                    self.session.record_login(username, None);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            WireShape::Envelope => {
                let response = self
                    .execute_envelope(
                        ops::USER_LOGIN,
                        json!({ "username": username, "password": password }),
                    )
                    .await?;
                if response.is_success() {
                    let token = response.data_str("session_id").map(str::to_owned);
                    self.session.record_login(username, token);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }
    }

    /// Log out. Local session state is cleared unconditionally — the client
    /// must not stay in a logged-in state when the server is unreachable.
    /// The returned flag reflects server acknowledgement, for diagnostics
    /// only.
    pub async fn logout(&mut self) -> bool {
        let acknowledged = match self.config.shape {
            WireShape::LineCommand => self
                .execute_line_acknowledged(&LineCommand::Logout)
                .await
                .unwrap_or_else(|error| {
                    log::debug!("logout exchange failed: {error}");
                    false
                }),
            WireShape::Envelope => self
                .execute_envelope(ops::USER_LOGOUT, json!({}))
                .await
                .map(|response| response.is_success())
                .unwrap_or_else(|error| {
                    log::debug!("logout exchange failed: {error}");
                    false
                }),
        };
        self.session.clear();
        acknowledged
    }

    /// List a directory, in the order the server emitted.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; under the envelope shape a failure
    /// status becomes [`OfsError::Rejected`].
    pub async fn list(&mut self, path: &str) -> Result<Vec<DirEntry>, OfsError> {
        match self.config.shape {
            WireShape::LineCommand => {
                let reply = self
                    .execute_line(&LineCommand::DirList {
                        path: path.to_owned(),
                    })
                    .await?;
                Ok(dir_entries(&parse_records(&reply)))
            }
            WireShape::Envelope => {
                let response = self
                    .execute_envelope(ops::DIR_LIST, json!({ "path": path }))
                    .await?;
                let response = expect_success(ops::DIR_LIST, response)?;
                let files = response
                    .data
                    .get("files")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                Ok(files.iter().filter_map(envelope_entry).collect())
            }
        }
    }

    /// Create a file with the given content.
    ///
    /// Under the line shape this runs the content-upload handshake and can
    /// therefore yield [`UploadReply::PromptOnly`] when the final read came
    /// back empty.
    ///
    /// # Errors
    ///
    /// Transport and codec failures propagate. A failed upload is never
    /// retried automatically; re-issue the whole operation.
    pub async fn create(&mut self, path: &str, content: &str) -> Result<UploadReply, OfsError> {
        match self.config.shape {
            WireShape::LineCommand => {
                self.execute_line_with_content(
                    &LineCommand::Create {
                        path: path.to_owned(),
                    },
                    content,
                )
                .await
            }
            WireShape::Envelope => {
                let response = self
                    .execute_envelope(ops::FILE_CREATE, json!({ "path": path, "data": content }))
                    .await?;
                Ok(upload_reply_from_envelope(&response))
            }
        }
    }

    /// Edit a file at the given index (`0` appends). Line shape only.
    ///
    /// # Errors
    ///
    /// As for [`create`](Self::create), plus
    /// [`OfsError::UnsupportedOperation`] under the envelope shape.
    pub async fn edit(
        &mut self,
        path: &str,
        index: u64,
        content: &str,
    ) -> Result<UploadReply, OfsError> {
        self.require_line_shape("EDIT")?;
        self.execute_line_with_content(
            &LineCommand::Edit {
                path: path.to_owned(),
                index,
            },
            content,
        )
        .await
    }

    /// Read a file's content.
    ///
    /// Under the line shape the raw response text is returned as-is; the
    /// server frames file content no further than that.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; under the envelope shape a failure
    /// status becomes [`OfsError::Rejected`].
    pub async fn read(&mut self, path: &str) -> Result<String, OfsError> {
        match self.config.shape {
            WireShape::LineCommand => {
                self.execute_line(&LineCommand::Read {
                    path: path.to_owned(),
                })
                .await
            }
            WireShape::Envelope => {
                let response = self
                    .execute_envelope(ops::FILE_READ, json!({ "path": path }))
                    .await?;
                let response = expect_success(ops::FILE_READ, response)?;
                Ok(response.data_str("content").unwrap_or_default().to_owned())
            }
        }
    }

    /// Delete a file.
    ///
    /// # Errors
    ///
    /// Transport and codec failures propagate; a refused delete is
    /// `Ok(false)`.
    pub async fn delete_file(&mut self, path: &str) -> Result<bool, OfsError> {
        match self.config.shape {
            WireShape::LineCommand => {
                self.execute_line_acknowledged(&LineCommand::DeleteFile {
                    path: path.to_owned(),
                })
                .await
            }
            WireShape::Envelope => {
                let response = self
                    .execute_envelope(ops::FILE_DELETE, json!({ "path": path }))
                    .await?;
                Ok(response.is_success())
            }
        }
    }

    /// Create a directory.
    ///
    /// # Errors
    ///
    /// Transport and codec failures propagate; a refused create is
    /// `Ok(false)`.
    pub async fn create_dir(&mut self, path: &str) -> Result<bool, OfsError> {
        match self.config.shape {
            WireShape::LineCommand => {
                self.execute_line_acknowledged(&LineCommand::DirCreate {
                    path: path.to_owned(),
                })
                .await
            }
            WireShape::Envelope => {
                let response = self
                    .execute_envelope(ops::DIR_CREATE, json!({ "path": path }))
                    .await?;
                Ok(response.is_success())
            }
        }
    }

    /// Delete an empty directory. Line shape only.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; [`OfsError::UnsupportedOperation`]
    /// under the envelope shape.
    pub async fn delete_dir(&mut self, path: &str) -> Result<bool, OfsError> {
        self.require_line_shape("DELETE_DIR")?;
        self.execute_line_acknowledged(&LineCommand::DeleteDir {
            path: path.to_owned(),
        })
        .await
    }

    /// Rename a file. Line shape only.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; [`OfsError::UnsupportedOperation`]
    /// under the envelope shape.
    pub async fn rename(&mut self, old: &str, new: &str) -> Result<bool, OfsError> {
        self.require_line_shape("RENAME_FILE")?;
        self.execute_line_acknowledged(&LineCommand::RenameFile {
            old: old.to_owned(),
            new: new.to_owned(),
        })
        .await
    }

    /// Truncate a file to zero length. Line shape only.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; [`OfsError::UnsupportedOperation`]
    /// under the envelope shape.
    pub async fn truncate(&mut self, path: &str) -> Result<bool, OfsError> {
        self.require_line_shape("TRUNCATE")?;
        self.execute_line_acknowledged(&LineCommand::Truncate {
            path: path.to_owned(),
        })
        .await
    }

    /// Probe whether a path exists as the given kind. Line shape only.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; [`OfsError::UnsupportedOperation`]
    /// under the envelope shape.
    pub async fn exists(&mut self, path: &str, kind: EntryKind) -> Result<bool, OfsError> {
        self.require_line_shape("FILE_EXISTS")?;
        let command = match kind {
            EntryKind::File => LineCommand::FileExists {
                path: path.to_owned(),
            },
            EntryKind::Dir => LineCommand::DirExists {
                path: path.to_owned(),
            },
        };
        self.execute_line_acknowledged(&command).await
    }

    /// Fetch a path's metadata record, if the server produced one. Line
    /// shape only.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; [`OfsError::UnsupportedOperation`]
    /// under the envelope shape.
    pub async fn get_metadata(&mut self, path: &str) -> Result<Option<Record>, OfsError> {
        self.require_line_shape("GET_METADATA")?;
        let reply = self
            .execute_line(&LineCommand::GetMetadata {
                path: path.to_owned(),
            })
            .await?;
        Ok(parse_records(&reply).into_iter().next())
    }

    /// Change a path's permissions. Line shape only.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; [`OfsError::UnsupportedOperation`]
    /// under the envelope shape.
    pub async fn set_permissions(&mut self, path: &str, mode: &str) -> Result<bool, OfsError> {
        self.require_line_shape("SET_PERMISSIONS")?;
        self.execute_line_acknowledged(&LineCommand::SetPermissions {
            path: path.to_owned(),
            mode: mode.to_owned(),
        })
        .await
    }

    /// Change a path's owner. Line shape only.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; [`OfsError::UnsupportedOperation`]
    /// under the envelope shape.
    pub async fn set_owner(&mut self, path: &str, user: &str) -> Result<bool, OfsError> {
        self.require_line_shape("SET_OWNER")?;
        self.execute_line_acknowledged(&LineCommand::SetOwner {
            path: path.to_owned(),
            user: user.to_owned(),
        })
        .await
    }

    /// List user accounts. Line shape only.
    ///
    /// User records carry a `user` marker field alongside the username in
    /// the combined field; anything else in the batch is ignored.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; [`OfsError::UnsupportedOperation`]
    /// under the envelope shape.
    pub async fn list_users(&mut self) -> Result<Vec<String>, OfsError> {
        self.require_line_shape("LIST_USERS")?;
        let reply = self.execute_line(&LineCommand::ListUsers).await?;
        let users = parse_records(&reply)
            .iter()
            .filter(|record| record.get(crate::tokenizer::USER_FIELD).is_some())
            .filter_map(|record| record.get(crate::tokenizer::COMBINED_FIELD))
            .map(str::to_owned)
            .collect();
        Ok(users)
    }

    /// Create a user account. Line shape only.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; [`OfsError::UnsupportedOperation`]
    /// under the envelope shape.
    pub async fn create_user(
        &mut self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<bool, OfsError> {
        self.require_line_shape("CREATE_USER")?;
        self.execute_line_acknowledged(&LineCommand::CreateUser {
            username: username.to_owned(),
            password: password.to_owned(),
            role: role.to_owned(),
        })
        .await
    }

    /// Delete a user account. Line shape only.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; [`OfsError::UnsupportedOperation`]
    /// under the envelope shape.
    pub async fn delete_user(&mut self, username: &str) -> Result<bool, OfsError> {
        self.require_line_shape("DELETE_USER")?;
        self.execute_line_acknowledged(&LineCommand::DeleteUser {
            username: username.to_owned(),
        })
        .await
    }

    /// Fetch the server's view of the current session. Line shape only.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; [`OfsError::UnsupportedOperation`]
    /// under the envelope shape.
    pub async fn get_session_info(&mut self) -> Result<String, OfsError> {
        self.require_line_shape("GET_SESSION_INFO")?;
        self.execute_line(&LineCommand::GetSessionInfo).await
    }

    /// Fetch file-system statistics.
    ///
    /// The line shape returns the raw reply text; the envelope shape
    /// returns the `data` object rendered as JSON.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; under the envelope shape a failure
    /// status becomes [`OfsError::Rejected`].
    pub async fn get_stats(&mut self) -> Result<String, OfsError> {
        match self.config.shape {
            WireShape::LineCommand => self.execute_line(&LineCommand::GetStats).await,
            WireShape::Envelope => {
                let response = self.execute_envelope(ops::GET_STATS, json!({})).await?;
                let response = expect_success(ops::GET_STATS, response)?;
                Ok(response.data.to_string())
            }
        }
    }

    fn require_line_shape(&self, operation: &'static str) -> Result<(), OfsError> {
        match self.config.shape {
            WireShape::LineCommand => Ok(()),
            WireShape::Envelope => Err(OfsError::UnsupportedOperation(operation)),
        }
    }
}

fn expect_success(
    operation: &'static str,
    response: EnvelopeResponse,
) -> Result<EnvelopeResponse, OfsError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(OfsError::Rejected {
            operation,
            message: response.error_message,
        })
    }
}

fn upload_reply_from_envelope(response: &EnvelopeResponse) -> UploadReply {
    let acknowledged = response.is_success();
    let reply = if acknowledged {
        response.status.clone()
    } else {
        response.error_message.clone()
    };
    UploadReply::Completed {
        acknowledged,
        reply,
    }
}

fn envelope_entry(value: &Value) -> Option<DirEntry> {
    let name = value.get("name").and_then(Value::as_str)?;
    let kind = if value.get("type").and_then(Value::as_i64) == Some(1) {
        EntryKind::Dir
    } else {
        EntryKind::File
    };
    Some(DirEntry {
        name: name.to_owned(),
        kind,
    })
}
